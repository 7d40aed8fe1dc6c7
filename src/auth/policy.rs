//! Authorization predicates. Pure functions over the requester and the
//! resource so they can be checked without any HTTP context.

use crate::{
    auth::repo_types::{User, UserRole},
    jobs::repo_types::Job,
};

/// Roles allowed to post and manage jobs.
pub const JOB_MANAGERS: &[UserRole] = &[UserRole::Employer, UserRole::Admin];

pub fn has_role(role: UserRole, allowed: &[UserRole]) -> bool {
    allowed.contains(&role)
}

/// Only the owner of a job or an admin may change or remove it.
pub fn can_modify_job(requester: &User, job: &Job) -> bool {
    requester.id == job.owner_id() || requester.role == UserRole::Admin
}
