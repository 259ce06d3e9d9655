use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::errors::{ApiError, ApiResult};
use crate::http_client::{HttpClient, RequestOptions};
use crate::models::{ProfileUpdate, UserProfile};
use crate::repositories::{require_id, ProfileApi};

const PROFILE_PATH: &str = "/api/user/profile";

/// User profiles on the user service.
#[derive(Clone)]
pub struct ProfileRepository {
    client: HttpClient,
}

impl ProfileRepository {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

/// The user service answers with the bare profile; some deployments wrap it in `data`.
fn decode_profile(body: Value, user_id: &str) -> Option<UserProfile> {
    let payload = match body {
        Value::Object(mut map) if map.get("data").is_some_and(Value::is_object) => {
            map.remove("data")?
        }
        other => other,
    };
    if !payload.is_object() {
        return None;
    }

    match serde_json::from_value::<UserProfile>(payload) {
        Ok(mut profile) => {
            if profile.user_id.is_empty() {
                profile.user_id = user_id.to_string();
            }
            Some(profile)
        }
        Err(e) => {
            warn!(%user_id, error = %e, "Malformed profile payload");
            None
        }
    }
}

#[async_trait]
impl ProfileApi for ProfileRepository {
    async fn get_profile(&self, user_id: &str) -> ApiResult<UserProfile> {
        let user_id = require_id(user_id, "User")?;
        let path = format!("{PROFILE_PATH}/{user_id}");

        let body = match self
            .client
            .request(Method::GET, &path, RequestOptions::authed())
            .await
        {
            Ok(body) => body,
            Err(ApiError::Http { status: 404, .. }) => {
                return Err(ApiError::NotFound(format!("Profile {user_id}")))
            }
            Err(e) => return Err(e),
        };

        decode_profile(body, user_id).ok_or_else(|| ApiError::NotFound(format!("Profile {user_id}")))
    }

    /// Returns the saved profile; refetches it when the server replies without a body.
    async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> ApiResult<UserProfile> {
        let user_id = require_id(user_id, "User")?;
        if update.is_empty() {
            return Err(ApiError::Validation("Nothing to update".to_string()));
        }
        if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(ApiError::Validation("Name cannot be empty".to_string()));
        }

        let body = serde_json::to_value(update)
            .map_err(|e| ApiError::Validation(format!("invalid profile update: {e}")))?;
        let path = format!("{PROFILE_PATH}/{user_id}");
        let response = self
            .client
            .request(Method::PUT, &path, RequestOptions::authed().json(body))
            .await?;

        info!(%user_id, "Profile updated");
        match decode_profile(response, user_id) {
            Some(profile) => Ok(profile),
            None => {
                debug!(%user_id, "Update reply carried no profile, refetching");
                self.get_profile(user_id).await
            }
        }
    }
}
