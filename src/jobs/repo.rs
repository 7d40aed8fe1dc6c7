use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::jobs::repo_types::{Applicant, ApplicantRow, Job, JobChanges, JobRow, NewJob};

const JOB_SELECT: &str = r#"
    SELECT j.id, j.title, j.company, j.location, j.job_type, j.experience, j.salary,
           j.description, j.requirements, j.benefits, j.status, j.posted_by,
           u.name AS owner_name, u.company_name AS owner_company_name,
           j.created_at, j.updated_at
      FROM jobs j
      JOIN users u ON u.id = j.posted_by
"#;

/// Persistence seam for job postings. Every returned job has its owner and
/// applicants resolved; lists are newest first.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn list(&self) -> anyhow::Result<Vec<Job>>;
    async fn list_by_owner(&self, owner: Uuid) -> anyhow::Result<Vec<Job>>;
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Job>>;
    async fn create(&self, owner: Uuid, job: NewJob) -> anyhow::Result<Job>;
    async fn update(&self, id: Uuid, changes: JobChanges) -> anyhow::Result<Option<Job>>;
    /// Returns false when no job had this id.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgJobStore {
    db: PgPool,
}

impl PgJobStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Attaches applicants to already-ordered rows.
    async fn resolve(&self, rows: Vec<JobRow>) -> anyhow::Result<Vec<Job>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let applicants = sqlx::query_as::<_, ApplicantRow>(
            r#"
            SELECT a.job_id, u.id, u.name, u.email
              FROM job_applicants a
              JOIN users u ON u.id = a.user_id
             WHERE a.job_id = ANY($1)
             ORDER BY a.applied_at ASC
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.db)
        .await
        .context("load applicants")?;

        let mut by_job: HashMap<Uuid, Vec<Applicant>> = HashMap::new();
        for a in applicants {
            by_job.entry(a.job_id).or_default().push(Applicant {
                id: a.id,
                name: a.name,
                email: a.email,
            });
        }

        Ok(rows
            .into_iter()
            .map(|r| {
                let applicants = by_job.remove(&r.id).unwrap_or_default();
                Job::from_row(r, applicants)
            })
            .collect())
    }

    async fn resolve_one(&self, row: Option<JobRow>) -> anyhow::Result<Option<Job>> {
        match row {
            Some(row) => Ok(self.resolve(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn list(&self) -> anyhow::Result<Vec<Job>> {
        let rows = sqlx::query_as::<_, JobRow>(&format!(
            "{JOB_SELECT} ORDER BY j.created_at DESC"
        ))
        .fetch_all(&self.db)
        .await
        .context("list jobs")?;
        self.resolve(rows).await
    }

    async fn list_by_owner(&self, owner: Uuid) -> anyhow::Result<Vec<Job>> {
        let rows = sqlx::query_as::<_, JobRow>(&format!(
            "{JOB_SELECT} WHERE j.posted_by = $1 ORDER BY j.created_at DESC"
        ))
        .bind(owner)
        .fetch_all(&self.db)
        .await
        .context("list jobs by owner")?;
        self.resolve(rows).await
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Job>> {
        let row = sqlx::query_as::<_, JobRow>(&format!("{JOB_SELECT} WHERE j.id = $1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .context("get job")?;
        self.resolve_one(row).await
    }

    async fn create(&self, owner: Uuid, job: NewJob) -> anyhow::Result<Job> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO jobs (title, company, location, job_type, experience, salary,
                              description, requirements, benefits, status, posted_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.location)
        .bind(job.job_type)
        .bind(&job.experience)
        .bind(&job.salary)
        .bind(&job.description)
        .bind(&job.requirements)
        .bind(&job.benefits)
        .bind(job.status)
        .bind(owner)
        .fetch_one(&self.db)
        .await
        .context("insert job")?;

        self.get(id)
            .await?
            .with_context(|| format!("job {id} vanished after insert"))
    }

    async fn update(&self, id: Uuid, changes: JobChanges) -> anyhow::Result<Option<Job>> {
        let updated: Option<Uuid> = sqlx::query_scalar(
            r#"
            UPDATE jobs
               SET title        = COALESCE($2, title),
                   company      = COALESCE($3, company),
                   location     = COALESCE($4, location),
                   job_type     = COALESCE($5, job_type),
                   experience   = COALESCE($6, experience),
                   salary       = CASE WHEN $12 THEN $7 ELSE salary END,
                   description  = COALESCE($8, description),
                   requirements = COALESCE($9, requirements),
                   benefits     = CASE WHEN $13 THEN $10 ELSE benefits END,
                   status       = COALESCE($11, status),
                   updated_at   = clock_timestamp()
             WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.company)
        .bind(&changes.location)
        .bind(changes.job_type)
        .bind(&changes.experience)
        .bind(changes.salary.clone().flatten())
        .bind(&changes.description)
        .bind(&changes.requirements)
        .bind(changes.benefits.clone().flatten())
        .bind(changes.status)
        .bind(changes.salary.is_some())
        .bind(changes.benefits.is_some())
        .fetch_optional(&self.db)
        .await
        .context("update job")?;

        match updated {
            Some(id) => self.get(id).await,
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete job")?;
        Ok(res.rows_affected() > 0)
    }
}
