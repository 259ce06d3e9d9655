use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use tracing::{info, warn};

use crate::errors::{ApiError, ApiResult};
use crate::http_client::{FilePart, HttpClient, MultipartBody, RequestOptions};
use crate::models::{Application, ApplicationStatus, ApplyOutcome, JobPosting};
use crate::repositories::{fetch_list, require_id, ApplicationsApi};

const APPLIED_JOBS_PATH: &str = "/post-service/jobs-applied";
const APPLY_PATH: &str = "/post-service/jobs-applied/apply";
const EDIT_STATUS_PATH: &str = "/post-service/jobs-applied/editStatus";
const APPLICANTS_PATH: &str = "/post-service/candidate-applied";

/// Candidate applications on the post service.
#[derive(Clone)]
pub struct ApplicationsRepository {
    client: HttpClient,
}

impl ApplicationsRepository {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ApplicationsApi for ApplicationsRepository {
    /// Multipart upload of the resume plus cover letter.
    /// A missing or empty resume fails before any request is made.
    async fn apply_to_job(
        &self,
        job_id: &str,
        resume: Option<FilePart>,
        cover_letter: &str,
    ) -> ApiResult<ApplyOutcome> {
        let job_id = require_id(job_id, "Job")?;
        let resume = match resume {
            Some(file) if !file.is_empty() => file,
            _ => {
                return Err(ApiError::Validation(
                    "Please attach your resume".to_string(),
                ))
            }
        };

        let body = MultipartBody::new()
            .file("resume", resume)
            .text("coverLetter", cover_letter)
            .text("idPost", job_id);

        let response = self
            .client
            .request(Method::POST, APPLY_PATH, RequestOptions::authed().multipart(body))
            .await?;

        let confirmed = response.get("data").is_some_and(|d| !d.is_null());
        if confirmed {
            info!(%job_id, "Application submitted");
            Ok(ApplyOutcome::Applied)
        } else {
            warn!(%job_id, "Apply response did not confirm the application");
            Ok(ApplyOutcome::Failed)
        }
    }

    async fn list_applied_jobs(&self) -> ApiResult<Vec<JobPosting>> {
        fetch_list(
            &self.client,
            APPLIED_JOBS_PATH,
            RequestOptions::authed(),
            "applied jobs",
        )
        .await
    }

    async fn list_applicants(&self, job_id: &str) -> ApiResult<Vec<Application>> {
        let job_id = match require_id(job_id, "Job") {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "Applicants requested without a job id");
                return Ok(Vec::new());
            }
        };
        fetch_list(
            &self.client,
            APPLICANTS_PATH,
            RequestOptions::authed().query("idPost", job_id),
            "applicants",
        )
        .await
    }

    /// No local state is touched; callers refetch the applicant list on success.
    async fn change_application_status(
        &self,
        job_id: &str,
        candidate_id: &str,
        status: ApplicationStatus,
    ) -> ApiResult<()> {
        let job_id = require_id(job_id, "Job")?;
        let candidate_id = require_id(candidate_id, "Candidate")?;

        let body = json!({
            "idPost": job_id,
            "status": status,
            "idCandidate": candidate_id,
        });
        self.client
            .request(Method::POST, EDIT_STATUS_PATH, RequestOptions::authed().json(body))
            .await?;

        info!(%job_id, %candidate_id, %status, "Application status changed");
        Ok(())
    }
}
