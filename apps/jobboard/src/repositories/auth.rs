use reqwest::Method;
use serde_json::json;
use tracing::{info, warn};

use crate::errors::{ApiError, ApiResult};
use crate::http_client::{HttpClient, RequestOptions};
use crate::models::{Account, Role};
use crate::session::SessionStore;

const LOGIN_PATH: &str = "/api/auth";
const REGISTER_PATH: &str = "/api/user/register";

/// Sign-up form as entered by the user.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl Registration {
    pub fn validate(&self) -> ApiResult<()> {
        let fields = [
            &self.name,
            &self.email,
            &self.password,
            &self.confirm_password,
        ];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(ApiError::Validation("Please fill in all fields".to_string()));
        }
        if !self.email.contains('@') {
            return Err(ApiError::Validation("Email address is invalid".to_string()));
        }
        if self.password != self.confirm_password {
            return Err(ApiError::Validation(
                "Password and confirmation do not match".to_string(),
            ));
        }
        Ok(())
    }
}

/// Login, registration and logout. Owns the only writes to the session store.
#[derive(Clone)]
pub struct AuthRepository {
    auth: HttpClient,
    users: HttpClient,
}

impl AuthRepository {
    /// `auth` talks to the auth service, `users` to the user service.
    pub fn new(auth: HttpClient, users: HttpClient) -> Self {
        Self { auth, users }
    }

    pub fn session(&self) -> &SessionStore {
        self.auth.session()
    }

    /// Signs in and stores the session. The token is taken verbatim from the
    /// response `Authorization` header. An account whose role differs from
    /// `expected_role` is rejected and the session is left untouched.
    pub async fn login(&self, email: &str, password: &str, expected_role: Role) -> ApiResult<Account> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ApiError::Validation("Please fill in all fields".to_string()));
        }

        let body = json!({ "email": email.trim(), "password": password });
        let response = self
            .auth
            .send(Method::POST, LOGIN_PATH, RequestOptions::new().json(body))
            .await?;

        let account = response
            .body
            .get("account")
            .cloned()
            .filter(|v| !v.is_null())
            .ok_or_else(|| ApiError::InvalidResponse("login reply has no account".to_string()))
            .and_then(|v| {
                serde_json::from_value::<Account>(v)
                    .map_err(|e| ApiError::InvalidResponse(format!("malformed account: {e}")))
            })?;

        if account.role != Some(expected_role) {
            warn!(user_id = %account.user_id, expected = %expected_role, "Login rejected: role mismatch");
            return Err(ApiError::Validation(
                "Incorrect account or password".to_string(),
            ));
        }

        let token = response
            .authorization
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                ApiError::InvalidResponse("login reply has no Authorization header".to_string())
            })?;

        self.session().set_session(token, account.user_id.clone());
        info!(user_id = %account.user_id, role = %expected_role, "Signed in");
        Ok(account)
    }

    /// Creates an account. Form checks run before any request is made.
    pub async fn register(&self, registration: &Registration) -> ApiResult<()> {
        registration.validate()?;

        let body = json!({
            "name": registration.name.trim(),
            "email": registration.email.trim(),
            "password": registration.password,
        });

        self.users
            .request(Method::POST, REGISTER_PATH, RequestOptions::new().json(body))
            .await?;

        info!(email = %registration.email.trim(), "Account registered");
        Ok(())
    }

    pub fn logout(&self) {
        self.session().clear();
        info!("Signed out");
    }
}
