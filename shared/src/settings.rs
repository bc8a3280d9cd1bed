use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Debug,
    Default,
    EnumIter,
    EnumString,
    Display,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SoundTone {
    #[default]
    Siren,
    Beep,
    Chime,
    Bell,
}

impl SoundTone {
    pub fn to_caption(&self) -> String {
        match self {
            SoundTone::Siren => "Siren".into(),
            SoundTone::Beep => "Beep".into(),
            SoundTone::Chime => "Chime".into(),
            SoundTone::Bell => "Bell".into(),
        }
    }

    /// Location of the tone file below the static sounds directory.
    pub fn asset_path(&self, sounds_path: &str) -> String {
        format!("{}/{}.mp3", sounds_path.trim_end_matches('/'), self)
    }
}

/// Alert configuration stored in the shared settings document.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct AlertSettings {
    pub sound_enabled: bool,
    pub sound_tone: SoundTone,
    pub email_enabled: bool,
    pub emergency_email: String,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            sound_tone: SoundTone::Siren,
            email_enabled: false,
            emergency_email: String::new(),
        }
    }
}

impl AlertSettings {
    pub fn sound_caption(&self) -> String {
        if self.sound_enabled {
            self.sound_tone.to_string().to_uppercase()
        } else {
            "DISABLED".into()
        }
    }

    pub fn email_caption(&self) -> String {
        let state = if self.email_enabled {
            "ENABLED"
        } else {
            "DISABLED"
        };
        let recipient = if self.emergency_email.is_empty() {
            "No Email Set"
        } else {
            self.emergency_email.as_str()
        };
        format!("{state} to {recipient}")
    }
}

/// Whatever subset of the settings the store returned.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct PartialAlertSettings {
    pub sound_enabled: Option<bool>,
    pub sound_tone: Option<SoundTone>,
    pub email_enabled: Option<bool>,
    pub emergency_email: Option<String>,
}

impl PartialAlertSettings {
    pub fn merge_over(self, defaults: &AlertSettings) -> AlertSettings {
        AlertSettings {
            sound_enabled: self.sound_enabled.unwrap_or(defaults.sound_enabled),
            sound_tone: self.sound_tone.unwrap_or(defaults.sound_tone),
            email_enabled: self.email_enabled.unwrap_or(defaults.email_enabled),
            emergency_email: self
                .emergency_email
                .unwrap_or_else(|| defaults.emergency_email.clone()),
        }
    }
}

impl From<PartialAlertSettings> for AlertSettings {
    fn from(partial: PartialAlertSettings) -> Self {
        partial.merge_over(&AlertSettings::default())
    }
}
