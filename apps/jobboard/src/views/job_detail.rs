use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::errors::ApiResult;
use crate::http_client::FilePart;
use crate::models::{ApplyOutcome, JobPosting};
use crate::repositories::{ApplicationsApi, JobsApi};
use crate::views::present::{self, JobCard};
use crate::views::{Mountable, Screen, ViewController};

/// Job detail screen with the candidate's apply action.
///
/// A failed load ends in `ViewState::Failed` rather than an endless
/// loading state; calling `refresh` again is the retry.
pub struct JobDetailController {
    jobs: Arc<dyn JobsApi>,
    applications: Arc<dyn ApplicationsApi>,
    job_id: String,
    screen: Screen<JobPosting>,
}

impl JobDetailController {
    pub fn new(
        jobs: Arc<dyn JobsApi>,
        applications: Arc<dyn ApplicationsApi>,
        job_id: impl Into<String>,
    ) -> Self {
        Self {
            jobs,
            applications,
            job_id: job_id.into(),
            screen: Screen::new(),
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn view(&self) -> &Screen<JobPosting> {
        &self.screen
    }

    pub fn card(&self) -> Option<JobCard> {
        self.screen.data().as_ref().map(JobCard::from)
    }

    pub fn posted_on(&self) -> String {
        present::format_date(self.screen.data().and_then(|j| j.post_date))
    }

    pub fn is_applied(&self) -> bool {
        self.screen.data().is_some_and(|job| job.is_applied)
    }

    /// Submits an application, then reloads the job so `is_applied` reflects the server.
    /// On failure the shown job is left as is and the error becomes the notice.
    pub async fn apply(&self, resume: Option<FilePart>, cover_letter: &str) -> ApiResult<ApplyOutcome> {
        let ticket = self.screen.ticket();
        let result = self
            .applications
            .apply_to_job(&self.job_id, resume, cover_letter)
            .await;

        if let Ok(ApplyOutcome::Applied) = result {
            info!(job_id = %self.job_id, "Refetching job after apply");
            self.refresh().await;
        }

        let notice = match &result {
            Ok(ApplyOutcome::Applied) => "Application submitted".to_string(),
            Ok(ApplyOutcome::Failed) => "Your application could not be submitted".to_string(),
            Err(e) => e.user_message(),
        };
        if let Some(ticket) = ticket {
            self.screen.notify(ticket, notice);
        }
        result
    }
}

#[async_trait]
impl ViewController for JobDetailController {
    fn screen(&self) -> &dyn Mountable {
        &self.screen
    }

    async fn refresh(&self) {
        let Some(ticket) = self.screen.begin() else {
            return;
        };
        let result = self.jobs.get_job_detail(&self.job_id).await;
        self.screen.apply(ticket, result);
    }
}
