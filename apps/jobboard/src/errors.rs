use thiserror::Error;

/// Generic message used when a failed response carries no `message` field.
pub const GENERIC_FAILURE_MESSAGE: &str = "request failed";
pub const NETWORK_FAILURE_MESSAGE: &str = "network error";

/// Error type shared by the HTTP client, the repositories and the view controllers.
/// Every outbound failure is normalized into one of these variants; nothing is retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Transport failure: DNS, timeout, refused connection.
    #[error("network error")]
    Network,

    #[error("HTTP error (status {status}): {message}")]
    Http { status: u16, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthenticated")]
    Unauthenticated,

    /// A 2xx reply whose body could not be read as the expected entity.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// HTTP status associated with the error. Transport failures report `0`,
    /// client-side failures report `None`.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Network => Some(0),
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network => NETWORK_FAILURE_MESSAGE.to_string(),
            ApiError::Http { status: 401, .. } | ApiError::Unauthenticated => {
                "Please sign in again".to_string()
            }
            ApiError::Http { message, .. } => message.clone(),
            ApiError::Validation(msg) => msg.clone(),
            ApiError::NotFound(what) => format!("{what} is no longer available"),
            ApiError::InvalidResponse(_) => "Unexpected response from server".to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
