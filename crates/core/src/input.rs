use std::str::FromStr;

use thiserror::Error;

use crate::model::{NewDelivery, NewMessage, Sender};

/// Normalized request to record a chat message from any client (CLI, MCP).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageInput {
    pub driver_id: String,
    pub customer_name: String,
    pub text: String,
    pub sender: Option<String>,
}

/// Normalized request to assign a delivery to a driver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliveryInput {
    pub driver_id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub order_details: String,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),
    #[error("Unknown sender '{0}': expected customer|driver")]
    Sender(String),
    #[error("Latitude {0} is outside -90..=90")]
    Latitude(f64),
    #[error("Longitude {0} is outside -180..=180")]
    Longitude(f64),
}

fn require(value: &str, field: &'static str) -> Result<String, InputError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(InputError::Empty(field));
    }
    Ok(trimmed.to_string())
}

impl MessageInput {
    /// Validate and normalize. Message text keeps its inner whitespace; a
    /// missing sender means the driver wrote it.
    pub fn validate(&self) -> Result<NewMessage, InputError> {
        let driver_id = require(&self.driver_id, "Driver id")?;
        let customer_name = require(&self.customer_name, "Customer name")?;
        if self.text.trim().is_empty() {
            return Err(InputError::Empty("Message text"));
        }
        let sender = match self.sender.as_deref() {
            Some(raw) => {
                Sender::from_str(raw).map_err(|_| InputError::Sender(raw.trim().to_string()))?
            }
            None => Sender::Driver,
        };
        Ok(NewMessage {
            driver_id,
            customer_name,
            text: self.text.clone(),
            sender,
        })
    }
}

impl DeliveryInput {
    pub fn validate(&self) -> Result<NewDelivery, InputError> {
        let driver_id = require(&self.driver_id, "Driver id")?;
        let customer_name = require(&self.customer_name, "Customer name")?;
        let address = require(&self.address, "Address")?;
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(InputError::Latitude(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(InputError::Longitude(self.longitude));
        }
        Ok(NewDelivery {
            driver_id,
            customer_name,
            customer_phone: self.customer_phone.trim().to_string(),
            address,
            latitude: self.latitude,
            longitude: self.longitude,
            order_details: self.order_details.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn message(text: &str, sender: Option<&str>) -> MessageInput {
        MessageInput {
            driver_id: "driver_001".into(),
            customer_name: " Sarah Johnson ".into(),
            text: text.into(),
            sender: sender.map(str::to_string),
        }
    }

    #[test]
    fn message_defaults_to_driver_and_trims_names() {
        let parsed = message("On my way", None).validate().expect("valid");
        assert_eq!(parsed.sender, Sender::Driver);
        assert_eq!(parsed.customer_name, "Sarah Johnson");
        assert_eq!(parsed.text, "On my way");
    }

    #[rstest]
    #[case("", None, InputError::Empty("Message text"))]
    #[case("   ", None, InputError::Empty("Message text"))]
    #[case("hi", Some("robot"), InputError::Sender("robot".into()))]
    fn message_rejects_bad_input(
        #[case] text: &str,
        #[case] sender: Option<&str>,
        #[case] expected: InputError,
    ) {
        assert_eq!(message(text, sender).validate().unwrap_err(), expected);
    }

    #[test]
    fn delivery_checks_coordinates() {
        let mut input = DeliveryInput {
            driver_id: "driver_001".into(),
            customer_name: "Mike Chen".into(),
            customer_phone: "+44 20 7946 0123".into(),
            address: "8 Little Newport Street".into(),
            latitude: 51.5128,
            longitude: -0.1280,
            order_details: "3x Dim Sum".into(),
        };
        assert!(input.validate().is_ok());

        input.latitude = 91.0;
        assert_eq!(input.validate().unwrap_err(), InputError::Latitude(91.0));

        input.latitude = 51.0;
        input.longitude = -200.0;
        assert_eq!(input.validate().unwrap_err(), InputError::Longitude(-200.0));

        input.longitude = 0.0;
        input.address = " ".into();
        assert_eq!(input.validate().unwrap_err(), InputError::Empty("Address"));
    }
}
