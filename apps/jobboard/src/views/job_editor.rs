use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::info;

use crate::errors::ApiResult;
use crate::models::{JobDraft, JobPosting};
use crate::repositories::JobsApi;
use crate::views::{Mountable, Screen, ViewController};

struct Form {
    draft: JobDraft,
    /// Set once the user edits the form; a dirty form is never overwritten by a reload.
    dirty: bool,
}

/// Create/edit form for a job posting. The screen holds the server's copy of
/// the posting being edited (or the last one created).
pub struct JobEditorController {
    jobs: Arc<dyn JobsApi>,
    existing_id: Option<String>,
    form: Mutex<Form>,
    screen: Screen<JobPosting>,
}

impl JobEditorController {
    pub fn create(jobs: Arc<dyn JobsApi>) -> Self {
        Self {
            jobs,
            existing_id: None,
            form: Mutex::new(Form {
                draft: JobDraft::default(),
                dirty: false,
            }),
            screen: Screen::new(),
        }
    }

    pub fn edit(jobs: Arc<dyn JobsApi>, existing: &JobPosting) -> Self {
        Self {
            jobs,
            existing_id: Some(existing.id.clone()),
            form: Mutex::new(Form {
                draft: JobDraft::from(existing),
                dirty: false,
            }),
            screen: Screen::new(),
        }
    }

    fn form(&self) -> MutexGuard<'_, Form> {
        self.form.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn is_editing(&self) -> bool {
        self.existing_id.is_some()
    }

    pub fn view(&self) -> &Screen<JobPosting> {
        &self.screen
    }

    pub fn draft(&self) -> JobDraft {
        self.form().draft.clone()
    }

    pub fn update_draft(&self, edit: impl FnOnce(&mut JobDraft)) {
        let mut form = self.form();
        edit(&mut form.draft);
        form.dirty = true;
    }

    /// Sends the form. On success the screen shows the saved posting and a
    /// create form is cleared; on failure the form is kept as typed.
    pub async fn submit(&self) -> ApiResult<JobPosting> {
        let ticket = self.screen.ticket();
        let draft = self.draft();
        let result = self
            .jobs
            .create_or_update_job_posting(&draft, self.existing_id.as_deref())
            .await;

        match &result {
            Ok(saved) => {
                if let Some(ticket) = ticket {
                    self.screen.resolve(ticket, saved.clone());
                    let notice = if self.is_editing() {
                        "Job posting updated"
                    } else {
                        "Job posted"
                    };
                    self.screen.notify(ticket, notice);
                }
                let mut form = self.form();
                form.draft = if self.is_editing() {
                    JobDraft::from(saved)
                } else {
                    JobDraft::default()
                };
                form.dirty = false;
                info!(job_id = %saved.id, "Job form saved");
            }
            Err(e) => {
                if let Some(ticket) = ticket {
                    self.screen.notify(ticket, e.user_message());
                }
            }
        }
        result
    }
}

#[async_trait]
impl ViewController for JobEditorController {
    fn screen(&self) -> &dyn Mountable {
        &self.screen
    }

    /// Reloads the posting being edited; an untouched form is re-filled from it.
    async fn refresh(&self) {
        let Some(existing_id) = self.existing_id.as_deref() else {
            return;
        };
        let Some(ticket) = self.screen.begin() else {
            return;
        };
        let result = self.jobs.get_job_detail(existing_id).await;
        if let Ok(job) = &result {
            let mut form = self.form();
            if !form.dirty && self.screen.is_current(ticket) {
                form.draft = JobDraft::from(job);
            }
        }
        self.screen.apply(ticket, result);
    }
}
