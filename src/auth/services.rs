use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo::{CreateUserError, UserStore},
        repo_types::{NewUser, User, UserRole},
    },
    error::{ApiError, ApiResult},
};

pub(crate) const MIN_PASSWORD_LEN: usize = 6;
pub(crate) const NOT_AUTHENTICATED: &str = "Not authorized to access this route";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(
                r"^[A-Za-z0-9_]+([\.-]?[A-Za-z0-9_]+)*@[A-Za-z0-9_]+([\.-]?[A-Za-z0-9_]+)*(\.[A-Za-z0-9_]{2,3})+$"
            )
            .unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// A registration request that passed every field rule.
#[derive(Debug)]
pub(crate) struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub company_name: String,
}

/// Checks all fields and reports every failed rule at once.
pub(crate) fn validate_registration(req: &RegisterRequest) -> ApiResult<Registration> {
    let mut errors = Vec::new();

    let name = req.name.as_deref().map(str::trim).filter(|s| !s.is_empty());
    if name.is_none() {
        errors.push("Name is required".to_string());
    }
    let email = req
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| is_valid_email(e));
    if email.is_none() {
        errors.push("Valid email is required".to_string());
    }
    let password = req
        .password
        .as_deref()
        .filter(|p| p.chars().count() >= MIN_PASSWORD_LEN);
    if password.is_none() {
        errors.push(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }
    let company_name = req
        .company_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    if company_name.is_none() {
        errors.push("Company name is required".to_string());
    }

    match (name, email, password, company_name) {
        (Some(name), Some(email), Some(password), Some(company_name)) => Ok(Registration {
            name: name.to_string(),
            email: email.to_lowercase(),
            password: password.to_string(),
            company_name: company_name.to_string(),
        }),
        _ => Err(ApiError::validation("Validation failed", errors)),
    }
}

fn issue(keys: &JwtKeys, user: &User) -> ApiResult<AuthResponse> {
    let token = keys.sign(user.id)?;
    Ok(AuthResponse {
        success: true,
        token,
        user: PublicUser::from(user),
    })
}

/// Creates an employer account and opens a session for it.
pub async fn register(
    users: &dyn UserStore,
    keys: &JwtKeys,
    req: RegisterRequest,
) -> ApiResult<AuthResponse> {
    let reg = validate_registration(&req)?;

    if users.find_by_email(&reg.email).await?.is_some() {
        warn!(email = %reg.email, "email already registered");
        return Err(ApiError::Duplicate("Email already registered".into()));
    }

    let password_hash = hash_password(&reg.password)?;
    let user = users
        .create(NewUser {
            name: reg.name,
            email: reg.email,
            password_hash,
            company_name: reg.company_name,
            role: UserRole::Employer,
        })
        .await
        .map_err(|e| match e {
            CreateUserError::DuplicateEmail => {
                ApiError::Duplicate("Email already registered".into())
            }
            CreateUserError::Other(e) => ApiError::Internal(e),
        })?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    issue(keys, &user)
}

/// Exchanges credentials for a session. Unknown email and wrong password
/// are reported identically.
pub async fn login(
    users: &dyn UserStore,
    keys: &JwtKeys,
    req: LoginRequest,
) -> ApiResult<AuthResponse> {
    let (Some(email), Some(password)) = (
        req.email.as_deref().map(str::trim).filter(|s| !s.is_empty()),
        req.password.as_deref().filter(|s| !s.is_empty()),
    ) else {
        return Err(ApiError::BadRequest(
            "Please provide an email and password".into(),
        ));
    };
    let email = email.to_lowercase();

    let Some(user) = users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(ApiError::Unauthenticated(INVALID_CREDENTIALS.into()));
    };

    if !user.active {
        warn!(user_id = %user.id, "login on deactivated account");
        return Err(ApiError::Unauthenticated(
            "Your account has been deactivated".into(),
        ));
    }

    if !verify_password(password, &user.password_hash)? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthenticated(INVALID_CREDENTIALS.into()));
    }

    info!(user_id = %user.id, email = %user.email, "user logged in");
    issue(keys, &user)
}

/// Resolves a session token to the account it was issued for.
pub async fn current_user(users: &dyn UserStore, keys: &JwtKeys, token: &str) -> ApiResult<User> {
    let claims = keys.verify(token).map_err(|e| {
        warn!(error = %e, "invalid or expired token");
        ApiError::Unauthenticated(NOT_AUTHENTICATED.into())
    })?;
    users.find_by_id(claims.sub).await?.ok_or_else(|| {
        warn!(user_id = %claims.sub, "token subject no longer exists");
        ApiError::Unauthenticated(NOT_AUTHENTICATED.into())
    })
}
