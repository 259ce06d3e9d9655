use async_trait::async_trait;
use chrono::Utc;
use reqwest::Method;
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::{ApiError, ApiResult, GENERIC_FAILURE_MESSAGE};
use crate::http_client::{HttpClient, RequestOptions};
use crate::models::{JobDraft, JobPosting, SortOrder};
use crate::repositories::{decode_entity, fetch_list, require_id, JobsApi};

const ALL_JOBS_PATH: &str = "/post-service/all-jobs";
const JOB_DETAIL_PATH: &str = "/post-service/job/detail";
const OPEN_JOBS_PATH: &str = "/post-service/job/opened";
const CREATE_JOB_PATH: &str = "/post-service/job/add";
const UPDATE_JOB_PATH: &str = "/post-service/job/update";
const DELETE_JOB_PATH: &str = "/post-service/job/delete";

/// Job postings on the post service.
#[derive(Clone)]
pub struct JobsRepository {
    client: HttpClient,
}

impl JobsRepository {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobsApi for JobsRepository {
    /// Public listing. Never fails: any failure degrades to an empty list.
    async fn list_jobs(&self, sort_order: SortOrder, search_query: &str) -> Vec<JobPosting> {
        let options = RequestOptions::new()
            .query("sortOrder", sort_order.as_str())
            .query("searchQuery", search_query.trim());
        fetch_list(&self.client, ALL_JOBS_PATH, options, "jobs")
            .await
            .unwrap_or_default()
    }

    async fn get_job_detail(&self, job_id: &str) -> ApiResult<JobPosting> {
        let job_id = require_id(job_id, "Job")?;
        let path = format!("{JOB_DETAIL_PATH}/{job_id}");

        let body = match self.client.request(Method::GET, &path, RequestOptions::new()).await {
            Ok(body) => body,
            Err(ApiError::Http { status: 404, .. }) => {
                return Err(ApiError::NotFound(format!("Job {job_id}")))
            }
            Err(e) => return Err(e),
        };

        decode_entity(body, "job").ok_or_else(|| ApiError::NotFound(format!("Job {job_id}")))
    }

    /// The signed-in recruiter's own open postings.
    async fn list_open_jobs(&self) -> ApiResult<Vec<JobPosting>> {
        fetch_list(&self.client, OPEN_JOBS_PATH, RequestOptions::authed(), "open jobs").await
    }

    /// POST when `existing_id` is absent, PUT otherwise.
    async fn create_or_update_job_posting(
        &self,
        draft: &JobDraft,
        existing_id: Option<&str>,
    ) -> ApiResult<JobPosting> {
        draft.validate()?;
        let existing_id = existing_id.map(|id| require_id(id, "Job")).transpose()?;

        let (method, path) = match existing_id {
            Some(_) => (Method::PUT, UPDATE_JOB_PATH),
            None => (Method::POST, CREATE_JOB_PATH),
        };
        let body = draft.to_wire(existing_id, Utc::now());

        let response = self
            .client
            .request(method, path, RequestOptions::authed().json(body))
            .await?;

        let job: JobPosting = decode_entity(response, "job").ok_or_else(|| {
            ApiError::InvalidResponse("job posting missing from save response".to_string())
        })?;

        match existing_id {
            Some(_) => info!(job_id = %job.id, "Job posting updated"),
            None => info!(job_id = %job.id, "Job posting created"),
        }
        Ok(job)
    }

    /// Succeeds only on a 2xx reply carrying `success: true`.
    async fn delete_job_posting(&self, job_id: &str) -> ApiResult<()> {
        let job_id = require_id(job_id, "Job")?;
        let response = self
            .client
            .send(
                Method::DELETE,
                DELETE_JOB_PATH,
                RequestOptions::authed().query("idPost", job_id),
            )
            .await?;

        if response.body.get("success") != Some(&Value::Bool(true)) {
            let message = response
                .body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or(GENERIC_FAILURE_MESSAGE)
                .to_string();
            warn!(%job_id, %message, "Server did not confirm job deletion");
            return Err(ApiError::Http {
                status: response.status,
                message,
            });
        }

        info!(%job_id, "Job posting deleted");
        Ok(())
    }
}
