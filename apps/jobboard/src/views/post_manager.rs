use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::ApiResult;
use crate::models::JobPosting;
use crate::repositories::JobsApi;
use crate::views::present::JobCard;
use crate::views::{Mountable, Screen, ViewController};

/// Recruiter's own open postings, with delete.
pub struct PostManagerController {
    jobs: Arc<dyn JobsApi>,
    screen: Screen<Vec<JobPosting>>,
}

impl PostManagerController {
    pub fn new(jobs: Arc<dyn JobsApi>) -> Self {
        Self {
            jobs,
            screen: Screen::new(),
        }
    }

    pub fn view(&self) -> &Screen<Vec<JobPosting>> {
        &self.screen
    }

    pub fn cards(&self) -> Vec<JobCard> {
        self.screen
            .data()
            .unwrap_or_default()
            .iter()
            .map(JobCard::from)
            .collect()
    }

    /// Deletes a posting and reloads the list. The item is never removed locally;
    /// it disappears only when the server stops returning it.
    pub async fn delete(&self, job_id: &str) -> ApiResult<()> {
        let ticket = self.screen.ticket();
        let result = self.jobs.delete_job_posting(job_id).await;

        if result.is_ok() {
            self.refresh().await;
        }

        if let Some(ticket) = ticket {
            let notice = match &result {
                Ok(()) => "Job deleted".to_string(),
                Err(e) => e.user_message(),
            };
            self.screen.notify(ticket, notice);
        }
        result
    }
}

#[async_trait]
impl ViewController for PostManagerController {
    fn screen(&self) -> &dyn Mountable {
        &self.screen
    }

    async fn refresh(&self) {
        let Some(ticket) = self.screen.begin() else {
            return;
        };
        let result = self.jobs.list_open_jobs().await;
        self.screen.apply(ticket, result);
    }
}
