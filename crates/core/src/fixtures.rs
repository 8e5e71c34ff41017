//! Seed data for the dashboard.
//!
//! A fixture is a JSON document with the driver profile, their deliveries and
//! the opening chat log. Message timestamps are given as `minutes_ago` and
//! resolved against the moment the fixture is loaded.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::AppConfig;
use crate::controller::ViewController;
use crate::model::{Delivery, DeliveryStatus, DriverProfile, Message, Sender};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixture file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid fixture document {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("message {id} is {minutes_ago} minutes old, which is outside the supported time range")]
    Timestamp { id: String, minutes_ago: i64 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FixtureMessage {
    pub id: String,
    pub customer_name: String,
    pub text: String,
    pub sender: Sender,
    #[serde(default)]
    pub minutes_ago: i64,
}

impl FixtureMessage {
    fn resolve(self, now: chrono::DateTime<Utc>) -> Result<Message, FixtureError> {
        let Some(timestamp) = Duration::try_minutes(self.minutes_ago)
            .and_then(|ago| now.checked_sub_signed(ago))
        else {
            return Err(FixtureError::Timestamp {
                id: self.id,
                minutes_ago: self.minutes_ago,
            });
        };
        Ok(Message {
            id: self.id,
            customer_name: self.customer_name,
            text: self.text,
            sender: self.sender,
            timestamp,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Fixture {
    #[serde(default)]
    pub driver: DriverProfile,
    #[serde(default)]
    pub deliveries: Vec<Delivery>,
    #[serde(default)]
    pub messages: Vec<FixtureMessage>,
}

impl Fixture {
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let raw = fs::read_to_string(path).map_err(|source| FixtureError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let fixture: Fixture =
            serde_json::from_str(&raw).map_err(|source| FixtureError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(
            path = %path.display(),
            deliveries = fixture.deliveries.len(),
            messages = fixture.messages.len(),
            "loaded fixture"
        );
        Ok(fixture)
    }

    /// Use the configured fixture file when it exists, else the built-in data.
    pub fn resolve(config: &AppConfig) -> Result<Self, FixtureError> {
        match config.fixture_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::builtin()),
        }
    }

    pub fn messages_at(&self, now: chrono::DateTime<Utc>) -> Result<Vec<Message>, FixtureError> {
        self.messages
            .iter()
            .cloned()
            .map(|message| message.resolve(now))
            .collect()
    }

    pub fn into_controller(self) -> Result<ViewController, FixtureError> {
        let messages = self.messages_at(Utc::now())?;
        Ok(ViewController::new(self.driver, self.deliveries, messages))
    }

    /// Three Chinatown drop-offs and an opening exchange with the first customer.
    pub fn builtin() -> Self {
        let deliveries = vec![
            Delivery {
                id: "1".into(),
                customer_name: "Sarah Johnson".into(),
                customer_phone: "+44 20 7946 0958".into(),
                address: "15 Gerrard Street, Chinatown, London W1D 6JD".into(),
                latitude: 51.5108,
                longitude: -0.1320,
                status: DeliveryStatus::InProgress,
                order_details: "2x Sweet & Sour Pork, 1x Fried Rice, 1x Prawn Crackers".into(),
            },
            Delivery {
                id: "2".into(),
                customer_name: "Mike Chen".into(),
                customer_phone: "+44 20 7946 0123".into(),
                address: "8 Little Newport Street, Chinatown, London WC2H 7JJ".into(),
                latitude: 51.5128,
                longitude: -0.1280,
                status: DeliveryStatus::Pending,
                order_details: "3x Dim Sum Selection, 2x Jasmine Tea, 1x Fortune Cookies".into(),
            },
            Delivery {
                id: "3".into(),
                customer_name: "Emily Davis".into(),
                customer_phone: "+44 20 7946 0789".into(),
                address: "25 Lisle Street, Chinatown, London WC2H 7BA".into(),
                latitude: 51.5098,
                longitude: -0.1310,
                status: DeliveryStatus::Pending,
                order_details: "1x Peking Duck, 1x Pancakes, 1x Hoisin Sauce".into(),
            },
        ];

        let messages = vec![
            FixtureMessage {
                id: "1".into(),
                customer_name: "Sarah Johnson".into(),
                text: "Hi! Just checking on my Chinese order. How far away are you?".into(),
                sender: Sender::Customer,
                minutes_ago: 5,
            },
            FixtureMessage {
                id: "2".into(),
                customer_name: "Sarah Johnson".into(),
                text: "Hi Sarah! I'm about 5 minutes away from your Gerrard Street address. Your food is hot and ready!".into(),
                sender: Sender::Driver,
                minutes_ago: 3,
            },
            FixtureMessage {
                id: "3".into(),
                customer_name: "Sarah Johnson".into(),
                text: "Perfect! I'll be waiting by the front door.".into(),
                sender: Sender::Customer,
                minutes_ago: 1,
            },
        ];

        Self {
            driver: DriverProfile::default(),
            deliveries,
            messages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BadgeColor, StatusBadge};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn builtin_matches_opening_state() {
        let fixture = Fixture::builtin();
        assert_eq!(fixture.driver.id, "driver_001");
        assert_eq!(fixture.deliveries.len(), 3);
        assert_eq!(fixture.messages.len(), 3);
        assert_eq!(fixture.deliveries[0].status, DeliveryStatus::InProgress);
    }

    #[test]
    fn minutes_ago_resolves_to_ordered_timestamps() {
        let now = Utc::now();
        let messages = Fixture::builtin().messages_at(now).expect("timestamps");
        assert_eq!(messages[0].timestamp, now - Duration::minutes(5));
        assert!(messages[0].timestamp < messages[1].timestamp);
        assert!(messages[1].timestamp < messages[2].timestamp);
    }

    #[test]
    fn load_reads_json_document_with_defaults() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("fixtures.json");
        fs::write(
            &path,
            r#"{
                "deliveries": [{
                    "id": "a1",
                    "customer_name": "Ana Silva",
                    "customer_phone": "+44 20 0000 0000",
                    "address": "1 Wardour Street, London",
                    "latitude": 51.51,
                    "longitude": -0.13,
                    "status": "delivered",
                    "order_details": "1x Bao"
                }],
                "messages": [{
                    "id": "m1",
                    "customer_name": "Ana Silva",
                    "text": "Thanks!",
                    "sender": "customer"
                }]
            }"#,
        )
        .expect("write fixture");

        let fixture = Fixture::load(&path).expect("load fixture");
        assert_eq!(fixture.driver, DriverProfile::default());
        assert_eq!(fixture.deliveries[0].status, DeliveryStatus::Delivered);
        assert_eq!(fixture.messages[0].minutes_ago, 0);

        let controller = fixture.into_controller().expect("controller");
        assert_eq!(controller.active_customer(), "Ana Silva");
        assert_eq!(controller.active_delivery_count(), 0);
    }

    #[test]
    fn load_reports_path_on_failure() {
        let dir = TempDir::new().expect("temp dir");
        let missing = dir.path().join("missing.json");
        let err = Fixture::load(&missing).unwrap_err();
        assert!(matches!(err, FixtureError::Read { .. }));
        assert!(err.to_string().contains("missing.json"));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ not json").expect("write");
        let err = Fixture::load(&broken).unwrap_err();
        assert!(matches!(err, FixtureError::Parse { .. }));
    }

    #[test]
    fn out_of_range_minutes_ago_is_an_error() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("fixtures.json");
        fs::write(
            &path,
            r#"{
                "messages": [{
                    "id": "m",
                    "customer_name": "Ana Silva",
                    "text": "Hello?",
                    "sender": "customer",
                    "minutes_ago": 9223372036854775807
                }]
            }"#,
        )
        .expect("write fixture");

        let fixture = Fixture::load(&path).expect("load fixture");
        let err = fixture.clone().into_controller().unwrap_err();
        assert!(matches!(
            err,
            FixtureError::Timestamp { ref id, minutes_ago: i64::MAX } if id == "m"
        ));
        assert!(fixture.messages_at(Utc::now()).is_err());
    }

    #[test]
    fn unknown_delivery_status_loads_with_fallback_badge() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("fixtures.json");
        fs::write(
            &path,
            r#"{
                "deliveries": [{
                    "id": "c1",
                    "customer_name": "Ana Silva",
                    "customer_phone": "",
                    "address": "1 Wardour Street, London",
                    "latitude": 51.51,
                    "longitude": -0.13,
                    "status": "cancelled",
                    "order_details": "1x Bao"
                }]
            }"#,
        )
        .expect("write fixture");

        let fixture = Fixture::load(&path).expect("load fixture");
        let status = fixture.deliveries[0].status;
        assert_eq!(status, DeliveryStatus::Unknown);
        assert_eq!(status.badge(), StatusBadge::FALLBACK);
        assert_eq!(status.icon(), "📦");
        assert_eq!(status.color(), BadgeColor::Gray);
    }
}
