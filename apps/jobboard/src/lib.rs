//! Job board client: session store, HTTP resource client, typed repositories
//! for jobs, applications and profiles, and per-screen view controllers.

pub mod config;
pub mod errors;
pub mod http_client;
pub mod models;
pub mod repositories;
pub mod session;
pub mod state;
pub mod views;

pub use errors::{ApiError, ApiResult};
pub use session::{Session, SessionStore};
pub use state::AppState;
