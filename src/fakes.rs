//! In-memory stores backing `AppState::fake` in tests.

use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::{
        password::hash_password,
        repo::{CreateUserError, UserStore},
        repo_types::{NewUser, User, UserRole},
    },
    db::{ConnectionMonitor, ConnectionState},
    jobs::{
        repo::JobStore,
        repo_types::{Applicant, Job, JobChanges, NewJob, Owner},
    },
};

struct StoredJob {
    seq: u64,
    id: Uuid,
    owner: Uuid,
    fields: NewJob,
    applicants: Vec<Uuid>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    jobs: Vec<StoredJob>,
    next_seq: u64,
}

impl Inner {
    fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn resolve(&self, job: &StoredJob) -> anyhow::Result<Job> {
        let owner = self
            .user(job.owner)
            .ok_or_else(|| anyhow::anyhow!("owner {} missing", job.owner))?;
        let applicants = job
            .applicants
            .iter()
            .filter_map(|id| self.user(*id))
            .map(|u| Applicant {
                id: u.id,
                name: u.name.clone(),
                email: u.email.clone(),
            })
            .collect();
        let f = job.fields.clone();
        Ok(Job {
            id: job.id,
            title: f.title,
            company: f.company,
            location: f.location,
            job_type: f.job_type,
            experience: f.experience,
            salary: f.salary,
            description: f.description,
            requirements: f.requirements,
            benefits: f.benefits,
            status: f.status,
            posted_by: Owner {
                id: owner.id,
                name: owner.name.clone(),
                company_name: owner.company_name.clone(),
            },
            applicants,
            created_at: job.created_at,
            updated_at: job.updated_at,
        })
    }

    fn newest_first<'a>(&self, jobs: impl Iterator<Item = &'a StoredJob>) -> anyhow::Result<Vec<Job>> {
        let mut jobs: Vec<&StoredJob> = jobs.collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.seq.cmp(&a.seq)));
        jobs.into_iter().map(|j| self.resolve(j)).collect()
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_count(&self) -> usize {
        self.inner.lock().unwrap().users.len()
    }

    pub fn set_active(&self, id: Uuid, active: bool) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(u) = inner.users.iter_mut().find(|u| u.id == id) {
            u.active = active;
        }
    }

    /// Inserts an account whose password is `secret1`.
    pub fn seed_user(&self, email: &str, role: UserRole) -> User {
        let user = User {
            id: Uuid::new_v4(),
            name: email.split('@').next().unwrap_or_default().to_string(),
            email: email.to_lowercase(),
            password_hash: hash_password("secret1").unwrap(),
            company_name: format!("{email} Inc"),
            role,
            active: true,
            created_at: OffsetDateTime::now_utc(),
        };
        self.inner.lock().unwrap().users.push(user.clone());
        user
    }

    pub fn add_applicant(&self, job_id: Uuid, user_id: Uuid) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(job) = inner.jobs.iter_mut().find(|j| j.id == job_id) {
            if !job.applicants.contains(&user_id) {
                job.applicants.push(user_id);
            }
        }
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.inner.lock().unwrap().user(id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, CreateUserError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.users.iter().any(|u| u.email == user.email) {
            return Err(CreateUserError::DuplicateEmail);
        }
        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            company_name: user.company_name,
            role: user.role,
            active: true,
            created_at: OffsetDateTime::now_utc(),
        };
        inner.users.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl JobStore for InMemoryStore {
    async fn list(&self) -> anyhow::Result<Vec<Job>> {
        let inner = self.inner.lock().unwrap();
        inner.newest_first(inner.jobs.iter())
    }

    async fn list_by_owner(&self, owner: Uuid) -> anyhow::Result<Vec<Job>> {
        let inner = self.inner.lock().unwrap();
        inner.newest_first(inner.jobs.iter().filter(|j| j.owner == owner))
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Job>> {
        let inner = self.inner.lock().unwrap();
        inner
            .jobs
            .iter()
            .find(|j| j.id == id)
            .map(|j| inner.resolve(j))
            .transpose()
    }

    async fn create(&self, owner: Uuid, job: NewJob) -> anyhow::Result<Job> {
        let mut inner = self.inner.lock().unwrap();
        anyhow::ensure!(inner.user(owner).is_some(), "owner {owner} does not exist");
        let now = OffsetDateTime::now_utc();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        let stored = StoredJob {
            seq,
            id: Uuid::new_v4(),
            owner,
            fields: job,
            applicants: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        let resolved = inner.resolve(&stored)?;
        inner.jobs.push(stored);
        Ok(resolved)
    }

    async fn update(&self, id: Uuid, changes: JobChanges) -> anyhow::Result<Option<Job>> {
        let mut inner = self.inner.lock().unwrap();
        let Some(idx) = inner.jobs.iter().position(|j| j.id == id) else {
            return Ok(None);
        };
        let job = &mut inner.jobs[idx];
        let f = &mut job.fields;
        if let Some(v) = changes.title {
            f.title = v;
        }
        if let Some(v) = changes.company {
            f.company = v;
        }
        if let Some(v) = changes.location {
            f.location = v;
        }
        if let Some(v) = changes.job_type {
            f.job_type = v;
        }
        if let Some(v) = changes.experience {
            f.experience = v;
        }
        if let Some(v) = changes.salary {
            f.salary = v;
        }
        if let Some(v) = changes.description {
            f.description = v;
        }
        if let Some(v) = changes.requirements {
            f.requirements = v;
        }
        if let Some(v) = changes.benefits {
            f.benefits = v;
        }
        if let Some(v) = changes.status {
            f.status = v;
        }
        job.updated_at = OffsetDateTime::now_utc();
        inner.resolve(&inner.jobs[idx]).map(Some)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.jobs.len();
        inner.jobs.retain(|j| j.id != id);
        Ok(inner.jobs.len() != before)
    }
}

/// Connection monitor with a fixed answer.
pub struct StaticMonitor(pub ConnectionState);

#[async_trait]
impl ConnectionMonitor for StaticMonitor {
    async fn state(&self) -> ConnectionState {
        self.0
    }
}
