use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Pending,
    InProgress,
    Delivered,
    /// Any status this build does not know. Shown with the fallback badge and
    /// never accepted as user input.
    Unknown,
}

impl DeliveryStatus {
    pub const ALL: [DeliveryStatus; 3] = [
        DeliveryStatus::Pending,
        DeliveryStatus::InProgress,
        DeliveryStatus::Delivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "pending",
            DeliveryStatus::InProgress => "in_progress",
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::Unknown => "unknown",
        }
    }

    /// Lenient parse for data read back from fixtures or the store.
    pub fn from_raw(raw: &str) -> Self {
        raw.parse().unwrap_or(DeliveryStatus::Unknown)
    }

    /// Human label, e.g. `in progress`.
    pub fn label(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "pending",
            DeliveryStatus::InProgress => "in progress",
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::Unknown => "unknown",
        }
    }

    pub fn badge(&self) -> StatusBadge {
        match self {
            DeliveryStatus::Pending => StatusBadge::new(BadgeColor::Yellow, "⏳"),
            DeliveryStatus::InProgress => StatusBadge::new(BadgeColor::Purple, "🚗"),
            DeliveryStatus::Delivered => StatusBadge::new(BadgeColor::Green, "✅"),
            DeliveryStatus::Unknown => StatusBadge::FALLBACK,
        }
    }

    pub fn color(&self) -> BadgeColor {
        self.badge().color
    }

    pub fn icon(&self) -> &'static str {
        self.badge().icon
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, DeliveryStatus::Delivered)
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DeliveryStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(DeliveryStatus::Pending),
            "in_progress" | "in-progress" => Ok(DeliveryStatus::InProgress),
            "delivered" => Ok(DeliveryStatus::Delivered),
            other => Err(anyhow!(
                "Unknown status '{}': expected pending|in_progress|delivered",
                other
            )),
        }
    }
}

impl<'de> Deserialize<'de> for DeliveryStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_raw(&raw))
    }
}

impl ValueEnum for DeliveryStatus {
    fn value_variants<'a>() -> &'a [Self] {
        &Self::ALL
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        match self {
            DeliveryStatus::Unknown => None,
            known => Some(clap::builder::PossibleValue::new(known.as_str())),
        }
    }
}

/// Color family used to tint a status badge.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    Yellow,
    Purple,
    Green,
    Gray,
}

impl BadgeColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeColor::Yellow => "yellow",
            BadgeColor::Purple => "purple",
            BadgeColor::Green => "green",
            BadgeColor::Gray => "gray",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct StatusBadge {
    pub color: BadgeColor,
    pub icon: &'static str,
}

impl StatusBadge {
    pub const FALLBACK: StatusBadge = StatusBadge {
        color: BadgeColor::Gray,
        icon: "📦",
    };

    const fn new(color: BadgeColor, icon: &'static str) -> Self {
        Self { color, icon }
    }

    /// Badge for a raw status string; unknown values get [`StatusBadge::FALLBACK`].
    pub fn for_raw(raw: &str) -> Self {
        DeliveryStatus::from_raw(raw).badge()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Customer,
    Driver,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::Customer => "customer",
            Sender::Driver => "driver",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Sender {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "customer" => Ok(Sender::Customer),
            "driver" => Ok(Sender::Driver),
            other => Err(anyhow!(
                "Unknown sender '{}': expected customer|driver",
                other
            )),
        }
    }
}

impl ValueEnum for Sender {
    fn value_variants<'a>() -> &'a [Self] {
        const VARIANTS: [Sender; 2] = [Sender::Customer, Sender::Driver];
        &VARIANTS
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

/// Top-level screen of the dashboard.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    #[default]
    Dashboard,
    Chat,
    Deliveries,
}

impl Screen {
    pub const ALL: [Screen; 3] = [Screen::Dashboard, Screen::Chat, Screen::Deliveries];

    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Dashboard => "dashboard",
            Screen::Chat => "chat",
            Screen::Deliveries => "deliveries",
        }
    }

    /// Unrecognized names render the dashboard.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "chat" | "messages" => Screen::Chat,
            "deliveries" | "orders" => Screen::Deliveries,
            _ => Screen::Dashboard,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Screen::Dashboard => Screen::Chat,
            Screen::Chat => Screen::Deliveries,
            Screen::Deliveries => Screen::Dashboard,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Screen::Dashboard => Screen::Deliveries,
            Screen::Chat => Screen::Dashboard,
            Screen::Deliveries => Screen::Chat,
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriverProfile {
    pub id: String,
    pub name: String,
    pub location: GeoPoint,
}

impl Default for DriverProfile {
    fn default() -> Self {
        Self {
            id: DEFAULT_DRIVER_ID.to_string(),
            name: "John Smith".to_string(),
            location: GeoPoint::new(51.5118, -0.1300),
        }
    }
}

pub const DEFAULT_DRIVER_ID: &str = "driver_001";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Delivery {
    pub id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: DeliveryStatus,
    pub order_details: String,
}

impl Delivery {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// First comma-separated segment of the address, e.g. the street line.
    pub fn street(&self) -> &str {
        self.address
            .split(',')
            .next()
            .map(str::trim)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: String,
    pub customer_name: String,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn from_driver<C: Into<String>, T: Into<String>>(customer_name: C, text: T) -> Self {
        Self {
            id: Ulid::new().to_string(),
            customer_name: customer_name.into(),
            text: text.into(),
            sender: Sender::Driver,
            timestamp: Utc::now(),
        }
    }
}

/// Delivery as kept by the store.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StoredDelivery {
    pub driver_id: String,
    #[serde(flatten)]
    pub delivery: Delivery,
    pub created_at: DateTime<Utc>,
}

/// Message as kept by the store.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StoredMessage {
    pub driver_id: String,
    #[serde(flatten)]
    pub message: Message,
}

#[derive(Debug, Clone)]
pub struct NewDelivery {
    pub driver_id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub order_details: String,
}

impl NewDelivery {
    pub fn into_insertable(self) -> InsertableDelivery {
        InsertableDelivery {
            id: Ulid::new().to_string(),
            status: DeliveryStatus::Pending,
            created_at: Utc::now(),
            data: self,
        }
    }
}

pub struct InsertableDelivery {
    pub id: String,
    pub status: DeliveryStatus,
    pub created_at: DateTime<Utc>,
    pub data: NewDelivery,
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub driver_id: String,
    pub customer_name: String,
    pub text: String,
    pub sender: Sender,
}

impl NewMessage {
    pub fn into_insertable(self) -> StoredMessage {
        StoredMessage {
            driver_id: self.driver_id,
            message: Message {
                id: Ulid::new().to_string(),
                customer_name: self.customer_name,
                text: self.text,
                sender: self.sender,
                timestamp: Utc::now(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdate {
    pub id: String,
    pub changed: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ActiveCustomer {
    pub customer_name: String,
    pub customer_phone: String,
    pub latest_order: String,
    pub delivery_id: String,
}
