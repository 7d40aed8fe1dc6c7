use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{policy::can_modify_job, repo_types::User},
    error::{ApiError, ApiResult},
    jobs::{
        dto::JobRequest,
        repo::JobStore,
        repo_types::{Job, JobChanges, JobStatus, JobType, NewJob},
    },
};

const MAX_NAME_LEN: usize = 100;
const JOB_NOT_FOUND: &str = "Job not found";

struct Required {
    missing: &'static str,
    too_long: Option<&'static str>,
}

const TITLE: Required = Required {
    missing: "Please add a job title",
    too_long: Some("Job title cannot be more than 100 characters"),
};
const COMPANY: Required = Required {
    missing: "Please add a company name",
    too_long: Some("Company name cannot be more than 100 characters"),
};
const LOCATION: Required = Required {
    missing: "Please add a location",
    too_long: None,
};
const EXPERIENCE: Required = Required {
    missing: "Please add required experience",
    too_long: None,
};
const DESCRIPTION: Required = Required {
    missing: "Please add a job description",
    too_long: None,
};
const REQUIREMENTS: Required = Required {
    missing: "Please add job requirements",
    too_long: None,
};

impl Required {
    fn check(&self, value: &str, errors: &mut Vec<String>) -> Option<String> {
        let value = value.trim();
        if value.is_empty() {
            errors.push(self.missing.to_string());
            return None;
        }
        if let Some(msg) = self.too_long {
            if value.chars().count() > MAX_NAME_LEN {
                errors.push(msg.to_string());
                return None;
            }
        }
        Some(value.to_string())
    }

    /// Absent on create counts as empty.
    fn check_present(&self, value: Option<&str>, errors: &mut Vec<String>) -> Option<String> {
        self.check(value.unwrap_or_default(), errors)
    }

    /// Absent on update means unchanged; present values must still be valid.
    fn check_changed(&self, value: Option<&str>, errors: &mut Vec<String>) -> Option<String> {
        value.and_then(|v| self.check(v, errors))
    }
}

fn parse_enum<T: std::str::FromStr<Err = String>>(
    value: Option<&str>,
    errors: &mut Vec<String>,
) -> Option<T> {
    match value.map(str::trim)?.parse::<T>() {
        Ok(v) => Some(v),
        Err(msg) => {
            errors.push(msg);
            None
        }
    }
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validation_failed(errors: Vec<String>) -> ApiError {
    ApiError::validation("Validation Error", errors)
}

pub(crate) fn validate_new_job(req: JobRequest) -> ApiResult<NewJob> {
    let mut errors = Vec::new();

    let title = TITLE.check_present(req.title.as_deref(), &mut errors);
    let company = COMPANY.check_present(req.company.as_deref(), &mut errors);
    let location = LOCATION.check_present(req.location.as_deref(), &mut errors);
    let job_type = match req.job_type.as_deref().map(str::trim) {
        None | Some("") => {
            errors.push("Please add job type".to_string());
            None
        }
        Some(raw) => parse_enum::<JobType>(Some(raw), &mut errors),
    };
    let experience = EXPERIENCE.check_present(req.experience.as_deref(), &mut errors);
    let description = DESCRIPTION.check_present(req.description.as_deref(), &mut errors);
    let requirements = REQUIREMENTS.check_present(req.requirements.as_deref(), &mut errors);
    let status = match req.status.as_deref() {
        None => Some(JobStatus::default()),
        raw => parse_enum::<JobStatus>(raw, &mut errors),
    };

    match (
        title,
        company,
        location,
        job_type,
        experience,
        description,
        requirements,
        status,
    ) {
        (
            Some(title),
            Some(company),
            Some(location),
            Some(job_type),
            Some(experience),
            Some(description),
            Some(requirements),
            Some(status),
        ) if errors.is_empty() => Ok(NewJob {
            title,
            company,
            location,
            job_type,
            experience,
            salary: optional_text(req.salary.flatten()),
            description,
            requirements,
            benefits: optional_text(req.benefits.flatten()),
            status,
        }),
        _ => Err(validation_failed(errors)),
    }
}

pub(crate) fn validate_job_changes(req: JobRequest) -> ApiResult<JobChanges> {
    let mut errors = Vec::new();

    let changes = JobChanges {
        title: TITLE.check_changed(req.title.as_deref(), &mut errors),
        company: COMPANY.check_changed(req.company.as_deref(), &mut errors),
        location: LOCATION.check_changed(req.location.as_deref(), &mut errors),
        job_type: parse_enum(req.job_type.as_deref(), &mut errors),
        experience: EXPERIENCE.check_changed(req.experience.as_deref(), &mut errors),
        salary: req.salary.map(optional_text),
        description: DESCRIPTION.check_changed(req.description.as_deref(), &mut errors),
        requirements: REQUIREMENTS.check_changed(req.requirements.as_deref(), &mut errors),
        benefits: req.benefits.map(optional_text),
        status: parse_enum(req.status.as_deref(), &mut errors),
    };

    if errors.is_empty() {
        Ok(changes)
    } else {
        Err(validation_failed(errors))
    }
}

pub async fn list_jobs(jobs: &dyn JobStore) -> ApiResult<Vec<Job>> {
    Ok(jobs.list().await?)
}

pub async fn get_job(jobs: &dyn JobStore, id: Uuid) -> ApiResult<Job> {
    jobs.get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(JOB_NOT_FOUND.into()))
}

/// The requester becomes the owner regardless of the payload.
pub async fn create_job(jobs: &dyn JobStore, requester: &User, req: JobRequest) -> ApiResult<Job> {
    let new_job = validate_new_job(req)?;
    let job = jobs.create(requester.id, new_job).await?;
    info!(job_id = %job.id, owner = %requester.id, "job created");
    Ok(job)
}

pub async fn update_job(
    jobs: &dyn JobStore,
    requester: &User,
    id: Uuid,
    req: JobRequest,
) -> ApiResult<Job> {
    let existing = get_job(jobs, id).await?;
    if !can_modify_job(requester, &existing) {
        warn!(job_id = %id, user_id = %requester.id, "update denied");
        return Err(ApiError::Unauthorized(
            "Not authorized to update this job".into(),
        ));
    }

    let changes = validate_job_changes(req)?;
    let job = jobs
        .update(id, changes)
        .await?
        .ok_or_else(|| ApiError::NotFound(JOB_NOT_FOUND.into()))?;
    info!(job_id = %job.id, user_id = %requester.id, "job updated");
    Ok(job)
}

pub async fn delete_job(jobs: &dyn JobStore, requester: &User, id: Uuid) -> ApiResult<()> {
    let existing = get_job(jobs, id).await?;
    if !can_modify_job(requester, &existing) {
        warn!(job_id = %id, user_id = %requester.id, "delete denied");
        return Err(ApiError::Unauthorized(
            "Not authorized to delete this job".into(),
        ));
    }

    if !jobs.delete(id).await? {
        return Err(ApiError::NotFound(JOB_NOT_FOUND.into()));
    }
    info!(job_id = %id, user_id = %requester.id, "job deleted");
    Ok(())
}

pub async fn list_my_jobs(jobs: &dyn JobStore, requester: &User) -> ApiResult<Vec<Job>> {
    Ok(jobs.list_by_owner(requester.id).await?)
}
