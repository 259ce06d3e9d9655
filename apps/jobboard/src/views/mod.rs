//! View controllers, one per screen.
//!
//! Lifecycle contract: `on_mount` and every `on_focus` re-read the screen's
//! resource and replace its state wholesale. User writes go through the
//! repository and, on success, trigger a full refetch of the affected
//! resource. Nothing is mutated locally on the strength of a write.

use async_trait::async_trait;

pub mod applied_jobs;
pub mod candidate_manager;
pub mod job_board;
pub mod job_detail;
pub mod job_editor;
pub mod post_manager;
pub mod present;
pub mod profile;
pub mod screen;

pub use applied_jobs::AppliedJobsController;
pub use candidate_manager::CandidateManagerController;
pub use job_board::JobBoardController;
pub use job_detail::JobDetailController;
pub use job_editor::JobEditorController;
pub use post_manager::PostManagerController;
pub use profile::ProfileController;
pub use screen::{Mountable, Screen, Ticket, ViewState};

#[async_trait]
pub trait ViewController: Send + Sync {
    fn screen(&self) -> &dyn Mountable;

    /// Re-reads the screen's resource. Safe to call while another refresh is in flight.
    async fn refresh(&self);

    async fn on_mount(&self) {
        self.screen().mount();
        self.refresh().await;
    }

    async fn on_focus(&self) {
        self.refresh().await;
    }

    fn on_unmount(&self) {
        self.screen().unmount();
    }
}
