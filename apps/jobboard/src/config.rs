use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::http_client::AuthPolicy;
use crate::models::account::Role;

/// Client configuration loaded from environment variables.
/// Each service URL falls back to `JOBBOARD_API_URL` when not set on its own.
#[derive(Debug, Clone)]
pub struct Config {
    pub auth_service_url: String,
    pub user_service_url: String,
    pub post_service_url: String,
    pub auth_policy: AuthPolicy,
    /// `None` inherits the HTTP stack's default.
    pub timeout: Option<Duration>,
    pub rust_log: String,
}

/// Login credentials for the command-line driver.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let fallback = std::env::var("JOBBOARD_API_URL").ok();

        Ok(Config {
            auth_service_url: service_url("JOBBOARD_AUTH_SERVICE_URL", fallback.as_deref())?,
            user_service_url: service_url("JOBBOARD_USER_SERVICE_URL", fallback.as_deref())?,
            post_service_url: service_url("JOBBOARD_POST_SERVICE_URL", fallback.as_deref())?,
            auth_policy: match std::env::var("JOBBOARD_AUTH_POLICY") {
                Ok(raw) => raw.parse()?,
                Err(_) => AuthPolicy::default(),
            },
            timeout: match std::env::var("JOBBOARD_TIMEOUT_SECS") {
                Ok(raw) => Some(Duration::from_secs(
                    raw.parse::<u64>()
                        .context("JOBBOARD_TIMEOUT_SECS must be a whole number of seconds")?,
                )),
                Err(_) => None,
            },
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Same base URL for every service. Used by tests and single-gateway deployments.
    pub fn single_host(base_url: &str) -> Self {
        let base = normalize_base_url(base_url);
        Config {
            auth_service_url: base.clone(),
            user_service_url: base.clone(),
            post_service_url: base,
            auth_policy: AuthPolicy::default(),
            timeout: None,
            rust_log: "info".to_string(),
        }
    }
}

impl Credentials {
    /// Returns `None` when no credentials are configured.
    pub fn from_env() -> Result<Option<Self>> {
        let (Ok(email), Ok(password)) = (
            std::env::var("JOBBOARD_EMAIL"),
            std::env::var("JOBBOARD_PASSWORD"),
        ) else {
            return Ok(None);
        };
        let role = match std::env::var("JOBBOARD_ROLE") {
            Ok(raw) => raw.parse()?,
            Err(_) => Role::Candidate,
        };
        Ok(Some(Credentials {
            email,
            password,
            role,
        }))
    }
}

fn service_url(key: &str, fallback: Option<&str>) -> Result<String> {
    let raw = match (std::env::var(key), fallback) {
        (Ok(v), _) => v,
        (Err(_), Some(f)) => f.to_string(),
        (Err(_), None) => bail!("Required environment variable '{key}' is not set (nor JOBBOARD_API_URL)"),
    };
    if !(raw.starts_with("http://") || raw.starts_with("https://")) {
        bail!("{key} must be an http(s) URL, got '{raw}'");
    }
    Ok(normalize_base_url(&raw))
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
