//! Resource repositories: typed operations over the HTTP client, one per entity kind.
//!
//! List policy: list operations never surface server or payload failures; they
//! degrade to an empty list and log the cause. The only error a list operation
//! returns is `Unauthenticated` from the strict auth policy.
//! Single-entity reads surface `NotFound` for absent or malformed data.
//!
//! View controllers depend on the traits below, not on the concrete repositories.

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::errors::{ApiError, ApiResult};
use crate::http_client::{FilePart, HttpClient, RequestOptions};
use crate::models::{
    Application, ApplicationStatus, ApplyOutcome, JobDraft, JobPosting, ProfileUpdate,
    SortOrder, UserProfile,
};

pub mod applications;
pub mod auth;
pub mod jobs;
pub mod profile;

pub use applications::ApplicationsRepository;
pub use auth::{AuthRepository, Registration};
pub use jobs::JobsRepository;
pub use profile::ProfileRepository;

// ────────────────────────────────────────────────────────────────────────────
// Traits at the controller seam
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait JobsApi: Send + Sync {
    async fn list_jobs(&self, sort_order: SortOrder, search_query: &str) -> Vec<JobPosting>;
    async fn get_job_detail(&self, job_id: &str) -> ApiResult<JobPosting>;
    async fn list_open_jobs(&self) -> ApiResult<Vec<JobPosting>>;
    async fn create_or_update_job_posting(
        &self,
        draft: &JobDraft,
        existing_id: Option<&str>,
    ) -> ApiResult<JobPosting>;
    async fn delete_job_posting(&self, job_id: &str) -> ApiResult<()>;
}

#[async_trait]
pub trait ApplicationsApi: Send + Sync {
    async fn apply_to_job(
        &self,
        job_id: &str,
        resume: Option<FilePart>,
        cover_letter: &str,
    ) -> ApiResult<ApplyOutcome>;
    async fn list_applied_jobs(&self) -> ApiResult<Vec<JobPosting>>;
    async fn list_applicants(&self, job_id: &str) -> ApiResult<Vec<Application>>;
    async fn change_application_status(
        &self,
        job_id: &str,
        candidate_id: &str,
        status: ApplicationStatus,
    ) -> ApiResult<()>;
}

#[async_trait]
pub trait ProfileApi: Send + Sync {
    async fn get_profile(&self, user_id: &str) -> ApiResult<UserProfile>;
    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate)
        -> ApiResult<UserProfile>;
}

// ────────────────────────────────────────────────────────────────────────────
// Shared payload handling
// ────────────────────────────────────────────────────────────────────────────

/// GETs a `{ "data": [...] }` list, applying the list policy.
pub(crate) async fn fetch_list<T: DeserializeOwned>(
    client: &HttpClient,
    path: &str,
    options: RequestOptions,
    resource: &str,
) -> ApiResult<Vec<T>> {
    match client.request(Method::GET, path, options).await {
        Ok(body) => Ok(decode_list(body, resource)),
        Err(ApiError::Unauthenticated) => Err(ApiError::Unauthenticated),
        Err(e) => {
            warn!(resource, error = %e, "List request failed, falling back to an empty list");
            Ok(Vec::new())
        }
    }
}

/// Reads `data` as a list. Absent or non-array `data` yields an empty list;
/// individual items that do not match `T` are dropped.
pub(crate) fn decode_list<T: DeserializeOwned>(body: Value, resource: &str) -> Vec<T> {
    let items = match take_data(body) {
        Some(Value::Array(items)) => items,
        Some(other) => {
            warn!(resource, kind = json_kind(&other), "List payload `data` is not an array");
            return Vec::new();
        }
        None => {
            warn!(resource, "List payload has no `data` field");
            return Vec::new();
        }
    };

    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(resource, error = %e, "Dropping malformed list item");
                None
            }
        })
        .collect();

    if decoded.len() < total {
        warn!(resource, kept = decoded.len(), total, "Some list items were malformed");
    }
    decoded
}

/// Reads `data` as one entity; `None` when absent, null or malformed.
pub(crate) fn decode_entity<T: DeserializeOwned>(body: Value, resource: &str) -> Option<T> {
    let data = take_data(body).filter(|v| !v.is_null())?;
    match serde_json::from_value(data) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(resource, error = %e, "Malformed entity payload");
            None
        }
    }
}

fn take_data(body: Value) -> Option<Value> {
    match body {
        Value::Object(mut map) => map.remove("data"),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Rejects blank path identifiers before they reach the URL.
pub(crate) fn require_id<'a>(id: &'a str, what: &str) -> ApiResult<&'a str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ApiError::Validation(format!("{what} id is required")));
    }
    Ok(id)
}
