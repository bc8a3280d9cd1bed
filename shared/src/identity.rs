//! Wire types and client-side flows for the email/password identity provider.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    auth::{AuthEvent, Session},
    AuthFailure, DashboardError, Result,
};

pub(crate) mod constants {
    pub(crate) const DEFAULT_IDENTITY_ENDPOINT: &str = "https://identitytoolkit.googleapis.com";
    pub(crate) const DEFAULT_SECURE_TOKEN_ENDPOINT: &str = "https://securetoken.googleapis.com";
}

#[async_trait(?Send)]
pub trait IdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session>;
    async fn refresh(&self, session: &Session) -> Result<Session>;
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct IdentityEndpoints {
    pub identity: Url,
    pub secure_token: Url,
    pub api_key: String,
}

impl IdentityEndpoints {
    pub fn sign_in_url(&self) -> Result<Url> {
        self.keyed(&self.identity, "v1/accounts:signInWithPassword")
    }

    pub fn refresh_url(&self) -> Result<Url> {
        self.keyed(&self.secure_token, "v1/token")
    }

    fn keyed(&self, base: &Url, path: &str) -> Result<Url> {
        let mut url = with_trailing_slash(base).join(path)?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }
}

pub(crate) fn with_trailing_slash(base: &Url) -> Url {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub return_secure_token: bool,
}

impl<'a> SignInRequest<'a> {
    pub fn new(email: &'a str, password: &'a str) -> Self {
        Self {
            email,
            password,
            return_secure_token: true,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub id_token: String,
    pub email: String,
    pub refresh_token: String,
    pub expires_in: String,
    pub local_id: String,
}

impl SignInResponse {
    pub fn into_session(self, now: DateTime<Utc>) -> Result<Session> {
        Ok(Session {
            user_id: self.local_id,
            email: self.email,
            id_token: self.id_token,
            refresh_token: self.refresh_token,
            expires_at: expiry(now, &self.expires_in)?,
        })
    }
}

/// Secure token exchange answers in snake case.
#[derive(Deserialize, Clone, Debug)]
pub struct RefreshResponse {
    pub id_token: String,
    pub refresh_token: String,
    pub expires_in: String,
    pub user_id: String,
}

impl RefreshResponse {
    pub fn into_session(self, previous: &Session, now: DateTime<Utc>) -> Result<Session> {
        Ok(Session {
            user_id: self.user_id,
            email: previous.email.clone(),
            id_token: self.id_token,
            refresh_token: self.refresh_token,
            expires_at: expiry(now, &self.expires_in)?,
        })
    }
}

pub fn refresh_form(refresh_token: &str) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("grant_type", "refresh_token")
        .append_pair("refresh_token", refresh_token)
        .finish()
}

/// Absolute expiry of a token issued at `now` that lives `expires_in` seconds.
fn expiry(now: DateTime<Utc>, expires_in: &str) -> Result<DateTime<Utc>> {
    expires_in
        .parse::<i64>()
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| DashboardError::Decode(format!("invalid token lifetime '{expires_in}'")))
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Maps an error body such as `{"error":{"message":"TOO_MANY_ATTEMPTS_TRY_LATER : ..."}}`.
pub fn parse_error_body(status: u16, body: &str) -> DashboardError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => {
            let code = envelope
                .error
                .message
                .split(|c: char| c == ':' || c.is_whitespace())
                .next()
                .unwrap_or_default()
                .to_string();
            AuthFailure::from_code(&code).into()
        }
        Err(_) => DashboardError::HttpStatus(status),
    }
}

/// Restores a stored session, refreshing it when the id token has expired.
pub async fn restore_session<P: IdentityProvider + ?Sized>(
    provider: &P,
    stored: Option<Session>,
    now: DateTime<Utc>,
) -> Option<Session> {
    let session = stored?;
    if !session.is_expired(now) {
        return Some(session);
    }
    match provider.refresh(&session).await {
        Ok(refreshed) => Some(refreshed),
        Err(error) => {
            log::warn!("could not refresh session of {}: {error}", session.email);
            None
        }
    }
}

pub async fn sign_in<P: IdentityProvider + ?Sized>(
    provider: &P,
    email: &str,
    password: &str,
) -> AuthEvent {
    match provider.sign_in(email, password).await {
        Ok(session) => AuthEvent::SignedIn(session),
        Err(error) => {
            log::error!("login failed: {error}");
            AuthEvent::SignInFailed(format!("Login failed: {error}"))
        }
    }
}

#[cfg(test)]
pub(crate) mod test {
    use std::cell::Cell;

    use super::*;
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    pub(crate) fn session(expires_at: DateTime<Utc>) -> Session {
        Session {
            user_id: "uid-1".into(),
            email: "admin@example.com".into(),
            id_token: "id-token".into(),
            refresh_token: "refresh-token".into(),
            expires_at,
        }
    }

    #[derive(Default)]
    struct FakeProvider {
        refresh_fails: bool,
        refreshes: Cell<usize>,
    }

    #[async_trait(?Send)]
    impl IdentityProvider for FakeProvider {
        async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
            if email == "admin@example.com" && password == "hunter2" {
                Ok(session(Utc::now() + Duration::hours(1)))
            } else {
                Err(AuthFailure::InvalidCredentials.into())
            }
        }

        async fn refresh(&self, session: &Session) -> Result<Session> {
            self.refreshes.set(self.refreshes.get() + 1);
            if self.refresh_fails {
                Err(AuthFailure::SessionExpired.into())
            } else {
                Ok(Session {
                    id_token: "fresh-token".into(),
                    expires_at: Utc::now() + Duration::hours(1),
                    ..session.clone()
                })
            }
        }
    }

    fn endpoints() -> IdentityEndpoints {
        IdentityEndpoints {
            identity: Url::parse(constants::DEFAULT_IDENTITY_ENDPOINT).unwrap(),
            secure_token: Url::parse(constants::DEFAULT_SECURE_TOKEN_ENDPOINT).unwrap(),
            api_key: "AIza-test".into(),
        }
    }

    #[test]
    pub fn builds_keyed_urls() {
        assert_eq!(
            endpoints().sign_in_url().unwrap().as_str(),
            "https://identitytoolkit.googleapis.com/v1/accounts:signInWithPassword?key=AIza-test"
        );
        assert_eq!(
            endpoints().refresh_url().unwrap().as_str(),
            "https://securetoken.googleapis.com/v1/token?key=AIza-test"
        );
    }

    #[test]
    pub fn emulator_prefix_is_kept() {
        let endpoints = IdentityEndpoints {
            identity: Url::parse("http://localhost:9099/identitytoolkit.googleapis.com").unwrap(),
            ..endpoints()
        };
        assert_eq!(
            endpoints.sign_in_url().unwrap().as_str(),
            "http://localhost:9099/identitytoolkit.googleapis.com/v1/accounts:signInWithPassword?key=AIza-test"
        );
    }

    #[test]
    pub fn sign_in_request_is_camel_case() {
        let body = serde_json::to_value(SignInRequest::new("a@b.c", "pw")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "email": "a@b.c", "password": "pw", "returnSecureToken": true })
        );
    }

    #[test]
    pub fn sign_in_response_becomes_session() {
        let body = r#"{
            "kind": "identitytoolkit#VerifyPasswordResponse",
            "localId": "uid-1",
            "email": "admin@example.com",
            "displayName": "",
            "idToken": "id-token",
            "registered": true,
            "refreshToken": "refresh-token",
            "expiresIn": "3600"
        }"#;
        let now = Utc::now();
        let session = serde_json::from_str::<SignInResponse>(body)
            .unwrap()
            .into_session(now)
            .unwrap();
        assert_eq!(session.user_id, "uid-1");
        assert_eq!(session.expires_at, now + Duration::seconds(3600));
    }

    #[test]
    pub fn out_of_range_lifetime_is_a_decode_error() {
        let response = SignInResponse {
            id_token: "id-token".into(),
            email: "admin@example.com".into(),
            refresh_token: "refresh-token".into(),
            expires_in: i64::MAX.to_string(),
            local_id: "uid-1".into(),
        };
        assert!(matches!(
            response.clone().into_session(Utc::now()),
            Err(DashboardError::Decode(_))
        ));
        assert!(matches!(
            SignInResponse {
                expires_in: "soon".into(),
                ..response
            }
            .into_session(Utc::now()),
            Err(DashboardError::Decode(_))
        ));

        let refreshed = RefreshResponse {
            id_token: "fresh-token".into(),
            refresh_token: "refresh-token".into(),
            expires_in: "-9223372036854775808".into(),
            user_id: "uid-1".into(),
        };
        assert!(matches!(
            refreshed.into_session(&session(Utc::now()), Utc::now()),
            Err(DashboardError::Decode(_))
        ));
    }

    #[test]
    pub fn refresh_form_is_url_encoded() {
        assert_eq!(
            refresh_form("a/b+c"),
            "grant_type=refresh_token&refresh_token=a%2Fb%2Bc"
        );
    }

    #[test]
    pub fn maps_error_bodies() {
        let body = r#"{"error":{"code":400,"message":"TOO_MANY_ATTEMPTS_TRY_LATER : Access to this account has been temporarily disabled","errors":[]}}"#;
        assert_eq!(
            parse_error_body(400, body),
            DashboardError::Auth(AuthFailure::TooManyAttempts)
        );
        assert_eq!(
            parse_error_body(400, r#"{"error":{"message":"INVALID_LOGIN_CREDENTIALS"}}"#),
            DashboardError::Auth(AuthFailure::InvalidCredentials)
        );
        assert_eq!(parse_error_body(502, "<html>"), DashboardError::HttpStatus(502));
    }

    #[test]
    pub fn sign_in_reports_events() {
        let provider = FakeProvider::default();
        assert!(matches!(
            block_on(sign_in(&provider, "admin@example.com", "hunter2")),
            AuthEvent::SignedIn(_)
        ));
        assert_eq!(
            block_on(sign_in(&provider, "admin@example.com", "wrong")),
            AuthEvent::SignInFailed("Login failed: invalid email or password".into())
        );
    }

    #[test]
    pub fn restore_keeps_valid_session() {
        let provider = FakeProvider::default();
        let now = Utc::now();
        let stored = session(now + Duration::minutes(30));
        let restored = block_on(restore_session(&provider, Some(stored.clone()), now));
        assert_eq!(restored, Some(stored));
        assert_eq!(provider.refreshes.get(), 0);
    }

    #[test]
    pub fn restore_refreshes_expired_session() {
        let provider = FakeProvider::default();
        let now = Utc::now();
        let restored = block_on(restore_session(
            &provider,
            Some(session(now - Duration::minutes(1))),
            now,
        ));
        assert_eq!(restored.map(|s| s.id_token), Some("fresh-token".into()));
        assert_eq!(provider.refreshes.get(), 1);
    }

    #[test]
    pub fn restore_logs_out_when_refresh_fails() {
        let provider = FakeProvider {
            refresh_fails: true,
            ..Default::default()
        };
        let now = Utc::now();
        assert_eq!(
            block_on(restore_session(&provider, Some(session(now - Duration::hours(2))), now)),
            None
        );
        assert_eq!(block_on(restore_session(&provider, None, now)), None);
    }
}
