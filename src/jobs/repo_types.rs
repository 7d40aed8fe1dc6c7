use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(type_name = "job_type", rename_all = "kebab-case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
}

impl std::str::FromStr for JobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full-time" => Ok(JobType::FullTime),
            "part-time" => Ok(JobType::PartTime),
            "contract" => Ok(JobType::Contract),
            "internship" => Ok(JobType::Internship),
            other => Err(format!("Invalid job type '{other}'")),
        }
    }
}

/// Free-standing status; any value may follow any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "job_status", rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Active,
    Closed,
    Draft,
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(JobStatus::Active),
            "closed" => Ok(JobStatus::Closed),
            "draft" => Ok(JobStatus::Draft),
            other => Err(format!("Invalid job status '{other}'")),
        }
    }
}

/// Job row joined with its owner's public fields.
#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: JobType,
    pub experience: String,
    pub salary: Option<String>,
    pub description: String,
    pub requirements: String,
    pub benefits: Option<String>,
    pub status: JobStatus,
    pub posted_by: Uuid,
    pub owner_name: String,
    pub owner_company_name: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub struct ApplicantRow {
    pub job_id: Uuid,
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub id: Uuid,
    pub name: String,
    pub company_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Applicant {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// A job posting with its owner and applicants resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub experience: String,
    pub salary: Option<String>,
    pub description: String,
    pub requirements: String,
    pub benefits: Option<String>,
    pub status: JobStatus,
    pub posted_by: Owner,
    pub applicants: Vec<Applicant>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Job {
    pub fn owner_id(&self) -> Uuid {
        self.posted_by.id
    }

    pub(crate) fn from_row(r: JobRow, applicants: Vec<Applicant>) -> Self {
        Self {
            id: r.id,
            title: r.title,
            company: r.company,
            location: r.location,
            job_type: r.job_type,
            experience: r.experience,
            salary: r.salary,
            description: r.description,
            requirements: r.requirements,
            benefits: r.benefits,
            status: r.status,
            posted_by: Owner {
                id: r.posted_by,
                name: r.owner_name,
                company_name: r.owner_company_name,
            },
            applicants,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Validated fields of a new posting. The owner is supplied separately.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: JobType,
    pub experience: String,
    pub salary: Option<String>,
    pub description: String,
    pub requirements: String,
    pub benefits: Option<String>,
    pub status: JobStatus,
}

/// Validated partial update; `None` leaves the column untouched. The
/// optional text columns use `Some(None)` to clear a stored value.
#[derive(Debug, Clone, Default)]
pub struct JobChanges {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub experience: Option<String>,
    pub salary: Option<Option<String>>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub benefits: Option<Option<String>>,
    pub status: Option<JobStatus>,
}
