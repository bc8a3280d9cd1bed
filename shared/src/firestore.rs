//! Firestore REST document representation and the settings codec on top of it.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use url::Url;

use crate::{
    settings::{AlertSettings, PartialAlertSettings, SoundTone},
    DashboardError, Result,
};

pub(crate) mod constants {
    pub(crate) const DEFAULT_SETTINGS_DOCUMENT: &str = "user_settings/admin_config";
    pub(crate) const DEFAULT_FIRESTORE_ENDPOINT: &str = "https://firestore.googleapis.com";
}

mod fields {
    pub(super) const SOUND_ENABLED: &str = "sound_enabled";
    pub(super) const SOUND_TONE: &str = "sound_tone";
    pub(super) const EMAIL_ENABLED: &str = "email_enabled";
    pub(super) const EMERGENCY_EMAIL: &str = "emergency_email";
}

/// Slash separated `collection/document[/collection/document...]` path.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Hash, Debug)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentPath(String);

impl DocumentPath {
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DocumentPath {
    fn default() -> Self {
        DocumentPath(constants::DEFAULT_SETTINGS_DOCUMENT.into())
    }
}

impl FromStr for DocumentPath {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim_matches('/');
        let segments = trimmed.split('/').collect::<Vec<_>>();
        if trimmed.is_empty() || segments.iter().any(|s| s.is_empty()) {
            return Err(DashboardError::Config(format!(
                "document path '{s}' contains empty segments"
            )));
        }
        if segments.len() % 2 != 0 {
            return Err(DashboardError::Config(format!(
                "document path '{s}' must name a document, not a collection"
            )));
        }
        Ok(DocumentPath(trimmed.to_string()))
    }
}

impl TryFrom<String> for DocumentPath {
    type Error = DashboardError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DocumentPath> for String {
    fn from(path: DocumentPath) -> Self {
        path.0
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn default_endpoint() -> Url {
    // constant is a valid absolute URL
    Url::parse(constants::DEFAULT_FIRESTORE_ENDPOINT).expect("valid firestore endpoint")
}

/// REST URL of a single document in the project's default database.
pub fn document_url(endpoint: &Url, project_id: &str, path: &DocumentPath) -> Result<Url> {
    let mut url = endpoint.clone();
    url.path_segments_mut()
        .map_err(|_| DashboardError::Config(format!("{endpoint} cannot be used as a base URL")))?
        .pop_if_empty()
        .extend([
            "v1",
            "projects",
            project_id,
            "databases",
            "(default)",
            "documents",
        ])
        .extend(path.segments());
    Ok(url)
}

#[derive(Clone, PartialEq, Debug)]
pub enum FieldValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
}

impl FieldValue {
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => json!({ "nullValue": null }),
            FieldValue::Boolean(b) => json!({ "booleanValue": b }),
            // the REST API transports 64 bit integers as strings
            FieldValue::Integer(i) => json!({ "integerValue": i.to_string() }),
            FieldValue::Double(d) => json!({ "doubleValue": d }),
            FieldValue::String(s) => json!({ "stringValue": s }),
        }
    }

    /// Decodes a typed value. Value kinds the dashboard never stores yield `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let (kind, inner) = object.iter().next()?;
        match kind.as_str() {
            "nullValue" => Some(FieldValue::Null),
            "booleanValue" => inner.as_bool().map(FieldValue::Boolean),
            "integerValue" => match inner {
                Value::String(s) => s.parse().ok().map(FieldValue::Integer),
                other => other.as_i64().map(FieldValue::Integer),
            },
            "doubleValue" => inner.as_f64().map(FieldValue::Double),
            "stringValue" => inner.as_str().map(|s| FieldValue::String(s.to_string())),
            _ => None,
        }
    }

    fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    fn into_string(self) -> Option<String> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
}

impl Document {
    pub fn field(&self, name: &str) -> Option<FieldValue> {
        self.fields.get(name).and_then(FieldValue::from_json)
    }

    pub fn with_field(mut self, name: &str, value: FieldValue) -> Self {
        self.fields.insert(name.to_string(), value.to_json());
        self
    }

    pub fn revision(&self) -> Option<&str> {
        self.update_time.as_deref()
    }
}

impl From<&AlertSettings> for Document {
    fn from(settings: &AlertSettings) -> Self {
        Document::default()
            .with_field(
                fields::SOUND_ENABLED,
                FieldValue::Boolean(settings.sound_enabled),
            )
            .with_field(
                fields::SOUND_TONE,
                FieldValue::String(settings.sound_tone.to_string()),
            )
            .with_field(
                fields::EMAIL_ENABLED,
                FieldValue::Boolean(settings.email_enabled),
            )
            .with_field(
                fields::EMERGENCY_EMAIL,
                FieldValue::String(settings.emergency_email.clone()),
            )
    }
}

impl From<&Document> for PartialAlertSettings {
    fn from(document: &Document) -> Self {
        let sound_tone = document
            .field(fields::SOUND_TONE)
            .and_then(FieldValue::into_string)
            .and_then(|tone| match tone.parse::<SoundTone>() {
                Ok(tone) => Some(tone),
                Err(_) => {
                    log::warn!("ignoring unknown alarm tone '{tone}'");
                    None
                }
            });

        PartialAlertSettings {
            sound_enabled: document
                .field(fields::SOUND_ENABLED)
                .and_then(|v| v.as_bool()),
            sound_tone,
            email_enabled: document
                .field(fields::EMAIL_ENABLED)
                .and_then(|v| v.as_bool()),
            emergency_email: document
                .field(fields::EMERGENCY_EMAIL)
                .and_then(FieldValue::into_string),
        }
    }
}

impl From<&Document> for AlertSettings {
    fn from(document: &Document) -> Self {
        PartialAlertSettings::from(document).into()
    }
}
