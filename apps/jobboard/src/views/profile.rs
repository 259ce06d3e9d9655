use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::errors::{ApiError, ApiResult};
use crate::models::{ProfileUpdate, UserProfile};
use crate::repositories::ProfileApi;
use crate::session::SessionStore;
use crate::views::present::ProfileSummary;
use crate::views::{Mountable, Screen, ViewController};

/// The signed-in user's own profile.
pub struct ProfileController {
    profile: Arc<dyn ProfileApi>,
    session: SessionStore,
    screen: Screen<UserProfile>,
}

impl ProfileController {
    pub fn new(profile: Arc<dyn ProfileApi>, session: SessionStore) -> Self {
        Self {
            profile,
            session,
            screen: Screen::new(),
        }
    }

    pub fn view(&self) -> &Screen<UserProfile> {
        &self.screen
    }

    pub fn summary(&self) -> Option<ProfileSummary> {
        self.screen.data().as_ref().map(ProfileSummary::from)
    }

    /// Saves changes, then refetches the profile.
    pub async fn update(&self, update: &ProfileUpdate) -> ApiResult<()> {
        let ticket = self.screen.ticket();
        let user_id = self.session.current().user_id;
        let result = if user_id.is_empty() {
            Err(ApiError::Unauthenticated)
        } else {
            self.profile
                .update_profile(&user_id, update)
                .await
                .map(|_| ())
        };

        if result.is_ok() {
            self.refresh().await;
        }

        if let Some(ticket) = ticket {
            let notice = match &result {
                Ok(()) => "Profile saved".to_string(),
                Err(e) => e.user_message(),
            };
            self.screen.notify(ticket, notice);
        }
        result
    }

    /// Clears the session and drops the shown profile.
    pub fn logout(&self) {
        self.session.clear();
        self.screen.reset();
        info!("Signed out from profile screen");
    }
}

#[async_trait]
impl ViewController for ProfileController {
    fn screen(&self) -> &dyn Mountable {
        &self.screen
    }

    /// Without a signed-in user there is no profile path to request, so this
    /// fails as `Unauthenticated` under either auth policy.
    async fn refresh(&self) {
        let Some(ticket) = self.screen.begin() else {
            return;
        };
        let user_id = self.session.current().user_id;
        if user_id.is_empty() {
            self.screen.fail(ticket, &ApiError::Unauthenticated);
            return;
        }
        let result = self.profile.get_profile(&user_id).await;
        self.screen.apply(ticket, result);
    }
}
