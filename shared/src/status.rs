use serde::{Deserialize, Serialize};

use crate::Result;

/// Body of the detection backend's `/status` endpoint.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub struct StatusSnapshot {
    pub is_drowsy: bool,
    #[serde(default)]
    pub ear: Option<f64>,
}

impl StatusSnapshot {
    pub fn parse(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Connection {
    #[default]
    Connecting,
    Online,
    Offline,
}

/// What the status page renders, derived from the latest poll.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct StatusView {
    pub connection: Connection,
    pub is_drowsy: bool,
    pub ear: Option<f64>,
}

impl StatusView {
    /// Any failed poll disarms the alarm: an unreachable backend never
    /// leaves a stale drowsy state behind.
    pub fn from_poll(outcome: Result<StatusSnapshot>) -> Self {
        match outcome {
            Ok(snapshot) => StatusView {
                connection: Connection::Online,
                is_drowsy: snapshot.is_drowsy,
                ear: snapshot.ear,
            },
            Err(error) => {
                log::warn!("could not fetch status from backend: {error}");
                StatusView {
                    connection: Connection::Offline,
                    is_drowsy: false,
                    ear: None,
                }
            }
        }
    }

    pub fn headline(&self) -> &'static str {
        match self.connection {
            Connection::Connecting => "System Ready (Connecting to Backend)",
            Connection::Offline => "Backend Offline/Error",
            Connection::Online if self.is_drowsy => "Drowsiness Detected!🚨",
            Connection::Online => "Driver is Alert",
        }
    }

    pub fn indicator(&self) -> &'static str {
        if self.is_drowsy {
            "🚨"
        } else {
            "✅"
        }
    }

    pub fn ear_caption(&self) -> String {
        match self.ear {
            Some(ear) => format!("{ear:.2}"),
            None => "N/A".into(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::DashboardError;

    #[test]
    pub fn drowsy_poll_shows_drowsy_variant() {
        let snapshot = StatusSnapshot::parse(r#"{"is_drowsy": true, "ear": 0.18}"#);
        let view = StatusView::from_poll(snapshot);

        assert_eq!(view.connection, Connection::Online);
        assert!(view.is_drowsy);
        assert_eq!(view.headline(), "Drowsiness Detected!🚨");
        assert_eq!(view.ear_caption(), "0.18");
        assert_eq!(view.indicator(), "🚨");
    }

    #[test]
    pub fn alert_poll_shows_alert_variant() {
        let view = StatusView::from_poll(StatusSnapshot::parse(r#"{"is_drowsy": false, "ear": 0.314}"#));
        assert_eq!(view.headline(), "Driver is Alert");
        assert_eq!(view.ear_caption(), "0.31");
    }

    #[test]
    pub fn null_or_missing_ear_is_not_available() {
        let null_ear = StatusSnapshot::parse(r#"{"is_drowsy": false, "ear": null}"#).unwrap();
        let no_ear = StatusSnapshot::parse(r#"{"is_drowsy": false}"#).unwrap();
        assert_eq!(null_ear.ear, None);
        assert_eq!(no_ear.ear, None);
        assert_eq!(StatusView::from_poll(Ok(no_ear)).ear_caption(), "N/A");
    }

    #[test]
    pub fn every_failure_disarms() {
        let malformed = [
            "",
            "not json",
            "[]",
            r#"{"ear": 0.2}"#,
            r#"{"is_drowsy": "true", "ear": 0.2}"#,
            r#"{"is_drowsy": 1}"#,
        ];
        for body in malformed {
            let view = StatusView::from_poll(StatusSnapshot::parse(body));
            assert!(!view.is_drowsy, "body {body:?} must not arm the alarm");
            assert_eq!(view.connection, Connection::Offline);
        }

        for error in [
            DashboardError::Network("connection refused".into()),
            DashboardError::HttpStatus(503),
        ] {
            let view = StatusView::from_poll(Err(error));
            assert!(!view.is_drowsy);
            assert_eq!(view.headline(), "Backend Offline/Error");
            assert_eq!(view.ear_caption(), "N/A");
        }
    }

    #[test]
    pub fn starts_connecting() {
        let view = StatusView::default();
        assert_eq!(view.headline(), "System Ready (Connecting to Backend)");
        assert!(!view.is_drowsy);
    }
}
