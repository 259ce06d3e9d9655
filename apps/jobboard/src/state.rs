use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::http_client::{build_client, HttpClient};
use crate::repositories::{
    ApplicationsApi, ApplicationsRepository, AuthRepository, JobsApi, JobsRepository,
    ProfileApi, ProfileRepository,
};
use crate::session::SessionStore;

/// Shared client state handed to every view controller.
/// One session and one connection pool, fanned out to the three backend services.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub session: SessionStore,
    pub auth: AuthRepository,
    pub jobs: Arc<dyn JobsApi>,
    pub applications: Arc<dyn ApplicationsApi>,
    pub profile: Arc<dyn ProfileApi>,
}

impl AppState {
    pub fn from_config(config: Config) -> Result<Self> {
        let session = SessionStore::new();
        let pool = build_client(config.timeout)?;
        let client_for = |base_url: &str| {
            HttpClient::with_client(pool.clone(), base_url, session.clone(), config.auth_policy)
        };

        let auth = client_for(&config.auth_service_url);
        let users = client_for(&config.user_service_url);
        let posts = client_for(&config.post_service_url);

        Ok(AppState {
            auth: AuthRepository::new(auth, users.clone()),
            jobs: Arc::new(JobsRepository::new(posts.clone())),
            applications: Arc::new(ApplicationsRepository::new(posts)),
            profile: Arc::new(ProfileRepository::new(users)),
            session,
            config,
        })
    }
}
