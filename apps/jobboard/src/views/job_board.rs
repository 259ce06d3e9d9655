use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::debug;

use crate::models::{JobPosting, SortOrder};
use crate::repositories::JobsApi;
use crate::views::present::JobCard;
use crate::views::{Mountable, Screen, ViewController};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobQuery {
    pub search: String,
    pub sort_order: SortOrder,
}

/// Home screen: the public job list with search, sort and local favorites.
pub struct JobBoardController {
    jobs: Arc<dyn JobsApi>,
    screen: Screen<Vec<JobPosting>>,
    query: Mutex<JobQuery>,
    favorites: Mutex<HashSet<String>>,
}

impl JobBoardController {
    pub fn new(jobs: Arc<dyn JobsApi>) -> Self {
        Self {
            jobs,
            screen: Screen::new(),
            query: Mutex::new(JobQuery::default()),
            favorites: Mutex::new(HashSet::new()),
        }
    }

    pub fn view(&self) -> &Screen<Vec<JobPosting>> {
        &self.screen
    }

    pub fn query(&self) -> JobQuery {
        self.query.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Sets the filter used by the next refresh without fetching.
    pub fn set_query(&self, search: &str, sort_order: SortOrder) {
        let mut query = self.query.lock().unwrap_or_else(|p| p.into_inner());
        query.search = search.trim().to_string();
        query.sort_order = sort_order;
    }

    /// Applies a new filter and reloads.
    pub async fn apply_filter(&self, search: &str, sort_order: SortOrder) {
        self.set_query(search, sort_order);
        self.refresh().await;
    }

    /// Flips a job's favorite mark; returns whether it is now a favorite.
    /// Favorites are local to this screen and never sent to the server.
    pub fn toggle_favorite(&self, job_id: &str) -> bool {
        let mut favorites = self.favorites.lock().unwrap_or_else(|p| p.into_inner());
        if favorites.remove(job_id) {
            false
        } else {
            favorites.insert(job_id.to_string());
            true
        }
    }

    pub fn is_favorite(&self, job_id: &str) -> bool {
        self.favorites
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .contains(job_id)
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
impl ViewController for JobBoardController {
    fn screen(&self) -> &dyn Mountable {
        &self.screen
    }

    async fn refresh(&self) {
        let Some(ticket) = self.screen.begin() else {
            debug!("Job board not mounted, skipping refresh");
            return;
        };
        let query = self.query();
        let jobs = self.jobs.list_jobs(query.sort_order, &query.search).await;
        self.screen.resolve(ticket, jobs);
    }
}
