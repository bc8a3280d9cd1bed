use thiserror::Error;

pub type Result<T, E = DashboardError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error(transparent)]
    Auth(#[from] AuthFailure),
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for DashboardError {
    fn from(error: serde_json::Error) -> Self {
        DashboardError::Decode(error.to_string())
    }
}

impl From<url::ParseError> for DashboardError {
    fn from(error: url::ParseError) -> Self {
        DashboardError::Config(error.to_string())
    }
}

/// Failures reported by the identity provider, keyed by its error code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("this account has been disabled")]
    UserDisabled,
    #[error("too many attempts, try again later")]
    TooManyAttempts,
    #[error("session expired, please log in again")]
    SessionExpired,
    #[error("{0}")]
    Other(String),
}

impl AuthFailure {
    pub fn from_code(code: &str) -> Self {
        match code {
            "INVALID_LOGIN_CREDENTIALS" | "INVALID_PASSWORD" | "EMAIL_NOT_FOUND"
            | "INVALID_EMAIL" | "MISSING_PASSWORD" => AuthFailure::InvalidCredentials,
            "USER_DISABLED" => AuthFailure::UserDisabled,
            "TOO_MANY_ATTEMPTS_TRY_LATER" => AuthFailure::TooManyAttempts,
            "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" | "USER_NOT_FOUND" => {
                AuthFailure::SessionExpired
            }
            other => AuthFailure::Other(other.to_string()),
        }
    }
}
