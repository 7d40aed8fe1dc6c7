use anyhow::Context;
use serde::Deserialize;

const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:5173",
    "http://127.0.0.1:5173",
];
const DEFAULT_TTL_MINUTES: i64 = 60 * 24 * 30;
const MAX_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub database_name: String,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL is not defined")?;
        let database_name = std::env::var("DATABASE_NAME").unwrap_or_else(|_| "jobdb".into());
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(3001);
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not defined")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "jobboard".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "jobboard-users".into()),
            ttl_minutes: parse_ttl_minutes(std::env::var("JWT_TTL_MINUTES").ok().as_deref()),
        };
        let cors_origins = parse_origins(std::env::var("CORS_ORIGINS").ok().as_deref());
        Ok(Self {
            database_url,
            database_name,
            host,
            port,
            jwt,
            cors_origins,
        })
    }
}

/// Session lifetime in minutes, kept within one minute and one year.
fn parse_ttl_minutes(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(DEFAULT_TTL_MINUTES)
        .clamp(1, MAX_TTL_MINUTES)
}

/// Comma separated list; blank or missing falls back to the local dev origins.
fn parse_origins(raw: Option<&str>) -> Vec<String> {
    let origins: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    if origins.is_empty() {
        DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect()
    } else {
        origins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_default_when_unset_or_blank() {
        assert_eq!(parse_origins(None).len(), 3);
        assert_eq!(parse_origins(Some(" , ")), parse_origins(None));
    }

    #[test]
    fn ttl_defaults_to_thirty_days() {
        assert_eq!(parse_ttl_minutes(None), 43_200);
        assert_eq!(parse_ttl_minutes(Some("soon")), 43_200);
        assert_eq!(parse_ttl_minutes(Some(" 15 ")), 15);
    }

    #[test]
    fn ttl_is_clamped() {
        assert_eq!(parse_ttl_minutes(Some("9223372036854775807")), MAX_TTL_MINUTES);
        assert_eq!(parse_ttl_minutes(Some("0")), 1);
        assert_eq!(parse_ttl_minutes(Some("-30")), 1);
    }

    #[test]
    fn origins_are_split_and_trimmed() {
        let origins = parse_origins(Some("https://jobs.example.com, http://localhost:8080"));
        assert_eq!(
            origins,
            vec!["https://jobs.example.com", "http://localhost:8080"]
        );
    }
}
