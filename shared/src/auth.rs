use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Tokens are treated as expired slightly ahead of time.
const EXPIRY_SKEW_SECONDS: i64 = 60;

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_SKEW_SECONDS) >= self.expires_at
    }

    /// Time left until the session should be refreshed, zero when already due.
    pub fn refresh_delay(&self, now: DateTime<Utc>) -> std::time::Duration {
        (self.expires_at - Duration::seconds(EXPIRY_SKEW_SECONDS) - now)
            .to_std()
            .unwrap_or_default()
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub enum AuthState {
    #[default]
    Initializing,
    LoggedOut { error: Option<String> },
    LoggedIn(Session),
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum AuthEvent {
    /// Initial or externally changed session as reported by the provider listener.
    Restored(Option<Session>),
    SignedIn(Session),
    SignInFailed(String),
    SignedOut,
}

impl AuthState {
    pub fn apply(self, event: AuthEvent) -> AuthState {
        match (self, event) {
            (_, AuthEvent::Restored(Some(session))) => AuthState::LoggedIn(session),
            (_, AuthEvent::Restored(None)) => AuthState::LoggedOut { error: None },
            (AuthState::Initializing, _) => AuthState::Initializing,
            (AuthState::LoggedOut { .. } | AuthState::LoggedIn(_), AuthEvent::SignedIn(session)) => {
                AuthState::LoggedIn(session)
            }
            (AuthState::LoggedOut { .. }, AuthEvent::SignInFailed(error)) => {
                AuthState::LoggedOut { error: Some(error) }
            }
            (AuthState::LoggedIn(_), AuthEvent::SignedOut) => AuthState::LoggedOut { error: None },
            (state, _) => state,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthState::LoggedIn(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        !matches!(self, AuthState::Initializing)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AuthState::LoggedOut { error } => error.as_deref(),
            _ => None,
        }
    }
}
