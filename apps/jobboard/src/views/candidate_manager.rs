use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::ApiResult;
use crate::models::{Application, ApplicationStatus, JobPosting};
use crate::repositories::ApplicationsApi;
use crate::views::present::{ApplicantRow, JobCard};
use crate::views::{Mountable, Screen, ViewController};

/// Applicants for one of the recruiter's postings.
pub struct CandidateManagerController {
    applications: Arc<dyn ApplicationsApi>,
    job: JobPosting,
    screen: Screen<Vec<Application>>,
}

impl CandidateManagerController {
    pub fn new(applications: Arc<dyn ApplicationsApi>, job: JobPosting) -> Self {
        Self {
            applications,
            job,
            screen: Screen::new(),
        }
    }

    pub fn view(&self) -> &Screen<Vec<Application>> {
        &self.screen
    }

    pub fn job_card(&self) -> JobCard {
        JobCard::from(&self.job)
    }

    pub fn rows(&self) -> Vec<ApplicantRow> {
        self.screen
            .data()
            .unwrap_or_default()
            .iter()
            .map(ApplicantRow::from)
            .collect()
    }

    /// Changes one applicant's status, then reloads the whole applicant list.
    pub async fn change_status(
        &self,
        candidate_id: &str,
        status: ApplicationStatus,
    ) -> ApiResult<()> {
        let ticket = self.screen.ticket();
        let result = self
            .applications
            .change_application_status(&self.job.id, candidate_id, status)
            .await;

        if result.is_ok() {
            self.refresh().await;
        }

        if let Some(ticket) = ticket {
            let notice = match &result {
                Ok(()) => format!("Status changed to {status}"),
                Err(e) => e.user_message(),
            };
            self.screen.notify(ticket, notice);
        }
        result
    }
}

#[async_trait]
impl ViewController for CandidateManagerController {
    fn screen(&self) -> &dyn Mountable {
        &self.screen
    }

    async fn refresh(&self) {
        let Some(ticket) = self.screen.begin() else {
            return;
        };
        let result = self.applications.list_applicants(&self.job.id).await;
        self.screen.apply(ticket, result);
    }
}
