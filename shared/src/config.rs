//! Configuration injected into the browser app through `/config.json`.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    firestore::{self, DocumentPath},
    identity::{self, with_trailing_slash, IdentityEndpoints},
    DashboardError, Result,
};

pub const CONFIG_PATH: &str = "/config.json";

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct DashboardConfig {
    pub backend_url: Url,
    pub firebase: FirebaseConfig,
    #[serde(default)]
    pub settings_document: DocumentPath,
    #[serde(default = "default_status_poll_interval_ms")]
    pub status_poll_interval_ms: u32,
    #[serde(default = "default_settings_refresh_interval_ms")]
    pub settings_refresh_interval_ms: u32,
    #[serde(default = "default_sounds_path")]
    pub sounds_path: String,
}

/// Web app configuration as shown in the Firebase console.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseConfig {
    pub api_key: String,
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_bucket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messaging_sender_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firestore_endpoint: Option<Url>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_endpoint: Option<Url>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure_token_endpoint: Option<Url>,
}

fn default_status_poll_interval_ms() -> u32 {
    500
}

fn default_settings_refresh_interval_ms() -> u32 {
    2000
}

fn default_sounds_path() -> String {
    "/sounds".into()
}

/// Whether the host can serve a directory at `path`: a rooted path of
/// non-empty `[A-Za-z0-9._-]` segments that does not shadow the config route.
fn is_mountable(path: &str) -> bool {
    let Some(relative) = path.strip_prefix('/') else {
        return false;
    };
    let plain = |segment: &str| {
        !segment.is_empty()
            && segment != "."
            && segment != ".."
            && segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    };
    relative.split('/').all(plain)
        && relative.split('/').next() != Some(CONFIG_PATH.trim_start_matches('/'))
}

impl DashboardConfig {
    pub fn from_json(body: &str) -> Result<Self> {
        let config = serde_json::from_str::<DashboardConfig>(body)
            .map_err(|e| DashboardError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !matches!(self.backend_url.scheme(), "http" | "https") {
            return Err(DashboardError::Config(format!(
                "backend_url {} must be an http(s) URL",
                self.backend_url
            )));
        }
        if self.firebase.api_key.trim().is_empty() {
            return Err(DashboardError::Config("firebase.apiKey is empty".into()));
        }
        if self.firebase.project_id.trim().is_empty() {
            return Err(DashboardError::Config("firebase.projectId is empty".into()));
        }
        if self.status_poll_interval_ms == 0 || self.settings_refresh_interval_ms == 0 {
            return Err(DashboardError::Config(
                "poll intervals must be greater than zero".into(),
            ));
        }
        if !is_mountable(&self.sounds_path) {
            return Err(DashboardError::Config(format!(
                "sounds_path '{}' must be an absolute path of plain segments below the site root, other than {CONFIG_PATH}",
                self.sounds_path
            )));
        }
        Ok(())
    }

    pub fn status_url(&self) -> Result<Url> {
        Ok(with_trailing_slash(&self.backend_url).join("status")?)
    }

    pub fn video_feed_url(&self) -> Result<Url> {
        Ok(with_trailing_slash(&self.backend_url).join("video_feed")?)
    }

    pub fn settings_document_url(&self) -> Result<Url> {
        let endpoint = self
            .firebase
            .firestore_endpoint
            .clone()
            .unwrap_or_else(firestore::default_endpoint);
        firestore::document_url(&endpoint, &self.firebase.project_id, &self.settings_document)
    }

    pub fn identity_endpoints(&self) -> Result<IdentityEndpoints> {
        let parse = |configured: &Option<Url>, default: &str| match configured {
            Some(url) => Ok(url.clone()),
            None => Url::parse(default),
        };
        Ok(IdentityEndpoints {
            identity: parse(
                &self.firebase.identity_endpoint,
                identity::constants::DEFAULT_IDENTITY_ENDPOINT,
            )?,
            secure_token: parse(
                &self.firebase.secure_token_endpoint,
                identity::constants::DEFAULT_SECURE_TOKEN_ENDPOINT,
            )?,
            api_key: self.firebase.api_key.clone(),
        })
    }
}
