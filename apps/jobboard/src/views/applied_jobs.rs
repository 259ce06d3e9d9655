use std::sync::Arc;

use async_trait::async_trait;

use crate::models::JobPosting;
use crate::repositories::ApplicationsApi;
use crate::views::present::JobCard;
use crate::views::{Mountable, Screen, ViewController};

/// Candidate's "my applications" list.
pub struct AppliedJobsController {
    applications: Arc<dyn ApplicationsApi>,
    screen: Screen<Vec<JobPosting>>,
}

impl AppliedJobsController {
    pub fn new(applications: Arc<dyn ApplicationsApi>) -> Self {
        Self {
            applications,
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
}

#[async_trait]
impl ViewController for AppliedJobsController {
    fn screen(&self) -> &dyn Mountable {
        &self.screen
    }

    async fn refresh(&self) {
        let Some(ticket) = self.screen.begin() else {
            return;
        };
        let result = self.applications.list_applied_jobs().await;
        self.screen.apply(ticket, result);
    }
}
