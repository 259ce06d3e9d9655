//! The view-state cell every controller renders from.
//!
//! Each mount starts a new epoch. A request takes a `Ticket` for the current
//! epoch when it starts; its result is applied only if that epoch is still
//! current and the screen is still mounted, so responses landing after
//! navigation away are dropped. Within an epoch there is no deduplication:
//! overlapping requests each replace the state wholesale, and whichever
//! resolves last wins.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::errors::{ApiError, ApiResult};

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    /// A read failed and there was nothing to show; `refresh` retries.
    Failed(String),
}

impl<T> ViewState<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }
}

/// Proof that a request was issued during a given mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    epoch: u64,
}

/// Mount bookkeeping, independent of the data type a screen holds.
pub trait Mountable: Send + Sync {
    fn mount(&self) -> Ticket;
    fn unmount(&self);
    fn is_mounted(&self) -> bool;
}

struct Inner<T> {
    epoch: u64,
    mounted: bool,
    state: ViewState<T>,
    notice: Option<String>,
}

pub struct Screen<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for Screen<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Send> Default for Screen<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send> Screen<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                epoch: 0,
                mounted: false,
                state: ViewState::Idle,
                notice: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Starts a request. Returns `None` when unmounted. Shown data stays
    /// visible while reloading; otherwise the state becomes `Loading`.
    pub fn begin(&self) -> Option<Ticket> {
        let mut inner = self.lock();
        if !inner.mounted {
            return None;
        }
        if !matches!(inner.state, ViewState::Ready(_)) {
            inner.state = ViewState::Loading;
        }
        Some(Ticket { epoch: inner.epoch })
    }

    /// Ticket for the current mount without touching state (for writes).
    pub fn ticket(&self) -> Option<Ticket> {
        let inner = self.lock();
        inner.mounted.then_some(Ticket { epoch: inner.epoch })
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        let inner = self.lock();
        inner.mounted && inner.epoch == ticket.epoch
    }

    /// Replaces the state with freshly loaded data and clears any notice.
    /// Returns `false` if the ticket is stale.
    pub fn resolve(&self, ticket: Ticket, data: T) -> bool {
        let mut inner = self.lock();
        if !(inner.mounted && inner.epoch == ticket.epoch) {
            debug!("Dropping stale result");
            return false;
        }
        inner.state = ViewState::Ready(data);
        inner.notice = None;
        true
    }

    /// Records a failed read. Data already on screen is kept and only the
    /// notice is set; with nothing shown the state becomes `Failed`.
    pub fn fail(&self, ticket: Ticket, error: &ApiError) -> bool {
        let mut inner = self.lock();
        if !(inner.mounted && inner.epoch == ticket.epoch) {
            debug!("Dropping stale failure");
            return false;
        }
        let message = error.user_message();
        if matches!(inner.state, ViewState::Ready(_)) {
            inner.notice = Some(message);
        } else {
            inner.state = ViewState::Failed(message);
        }
        true
    }

    pub fn apply(&self, ticket: Ticket, result: ApiResult<T>) -> bool {
        match result {
            Ok(data) => self.resolve(ticket, data),
            Err(e) => self.fail(ticket, &e),
        }
    }

    /// Sets the user-facing notice without touching the state.
    pub fn notify(&self, ticket: Ticket, message: impl Into<String>) -> bool {
        let mut inner = self.lock();
        if !(inner.mounted && inner.epoch == ticket.epoch) {
            return false;
        }
        inner.notice = Some(message.into());
        true
    }

    pub fn clear_notice(&self) {
        self.lock().notice = None;
    }

    /// Drops shown data, e.g. after logout.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.state = ViewState::Idle;
        inner.notice = None;
    }

    pub fn state(&self) -> ViewState<T> {
        self.lock().state.clone()
    }

    pub fn data(&self) -> Option<T> {
        self.lock().state.data().cloned()
    }

    pub fn notice(&self) -> Option<String> {
        self.lock().notice.clone()
    }
}

impl<T: Clone + Send> Mountable for Screen<T> {
    fn mount(&self) -> Ticket {
        let mut inner = self.lock();
        inner.epoch += 1;
        inner.mounted = true;
        Ticket { epoch: inner.epoch }
    }

    fn unmount(&self) {
        let mut inner = self.lock();
        inner.mounted = false;
        inner.epoch += 1;
    }

    fn is_mounted(&self) -> bool {
        self.lock().mounted
    }
}
