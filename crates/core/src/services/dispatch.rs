use anyhow::Result;
use chrono::Utc;
use tracing::info;
use ulid::Ulid;

use crate::config::AppConfig;
use crate::database::Database;
use crate::fixtures::Fixture;
use crate::input::{DeliveryInput, MessageInput};
use crate::model::{
    ActiveCustomer, Delivery, DeliveryStatus, StatusUpdate, StoredDelivery, StoredMessage,
};

#[derive(Debug, Clone)]
pub struct DispatchService {
    config: AppConfig,
}

impl DispatchService {
    pub fn new(config: AppConfig) -> Result<Self> {
        Database::initialize(&config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn send_message(&self, input: MessageInput) -> Result<StoredMessage> {
        let new = input.validate()?;
        let db = self.open_database()?;
        db.insert_message(new)
    }

    pub fn driver_messages(&self, driver_id: &str) -> Result<Vec<StoredMessage>> {
        let db = self.open_database()?;
        db.messages_for_driver(driver_id)
    }

    pub fn conversation(&self, driver_id: &str, customer_name: &str) -> Result<Vec<StoredMessage>> {
        let db = self.open_database()?;
        db.conversation(driver_id, customer_name.trim())
    }

    pub fn create_delivery(&self, input: DeliveryInput) -> Result<StoredDelivery> {
        let new = input.validate()?;
        let db = self.open_database()?;
        db.insert_delivery(new)
    }

    pub fn driver_deliveries(&self, driver_id: &str) -> Result<Vec<StoredDelivery>> {
        let db = self.open_database()?;
        db.deliveries_for_driver(driver_id)
    }

    pub fn fetch_delivery(&self, id: &str) -> Result<Option<StoredDelivery>> {
        let db = self.open_database()?;
        db.fetch_delivery(id)
    }

    pub fn update_status(&self, id: &str, status: DeliveryStatus) -> Result<StatusUpdate> {
        let db = self.open_database()?;
        db.update_delivery_status(id.trim(), status)
    }

    pub fn active_customers(&self, driver_id: &str) -> Result<Vec<ActiveCustomer>> {
        let db = self.open_database()?;
        db.active_customers(driver_id)
    }

    /// Copy a fixture into the store for `driver_id` unless that driver
    /// already has deliveries. Returns whether anything was written.
    pub fn seed_from_fixture(&self, driver_id: &str, fixture: &Fixture) -> Result<bool> {
        let db = self.open_database()?;
        if db.count_deliveries(driver_id)? > 0 {
            return Ok(false);
        }

        let now = Utc::now();
        let messages = fixture.messages_at(now)?;
        let total = fixture.deliveries.len();
        // Earlier fixture entries get later timestamps so newest-first
        // listings keep fixture order.
        for (index, delivery) in fixture.deliveries.iter().enumerate() {
            let age = chrono::Duration::seconds(index as i64 + 1);
            let record = StoredDelivery {
                driver_id: driver_id.to_string(),
                delivery: Delivery {
                    id: Ulid::new().to_string(),
                    ..delivery.clone()
                },
                created_at: now - age,
            };
            db.insert_delivery_record(&record)?;
        }

        for mut message in messages {
            message.id = Ulid::new().to_string();
            db.insert_message_record(&StoredMessage {
                driver_id: driver_id.to_string(),
                message,
            })?;
        }

        info!(
            driver = driver_id,
            deliveries = total,
            messages = fixture.messages.len(),
            "seeded store from fixture"
        );
        Ok(true)
    }

    fn open_database(&self) -> Result<Database> {
        Database::initialize(&self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::FixtureError;
    use crate::input::InputError;
    use crate::model::Sender;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn service_with_temp_dir() -> (DispatchService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig::from_data_dir(temp_dir.path().to_path_buf()).unwrap();
        let service = DispatchService::new(config).unwrap();
        (service, temp_dir)
    }

    fn message(customer: &str, text: &str) -> MessageInput {
        MessageInput {
            driver_id: "driver_001".into(),
            customer_name: customer.into(),
            text: text.into(),
            sender: None,
        }
    }

    #[test]
    fn seeds_fixture_once() {
        let (service, _guard) = service_with_temp_dir();
        let fixture = Fixture::builtin();

        assert!(service.seed_from_fixture("driver_001", &fixture).unwrap());
        assert!(!service.seed_from_fixture("driver_001", &fixture).unwrap());

        let deliveries = service.driver_deliveries("driver_001").unwrap();
        let messages = service.driver_messages("driver_001").unwrap();
        assert_eq!(deliveries.len(), 3);
        assert_eq!(messages.len(), 3);
        let names: Vec<&str> = deliveries
            .iter()
            .map(|d| d.delivery.customer_name.as_str())
            .collect();
        assert_eq!(names, vec!["Sarah Johnson", "Mike Chen", "Emily Davis"]);
        assert_eq!(
            messages[0].message.text,
            "Hi! Just checking on my Chinese order. How far away are you?"
        );
    }

    #[test]
    fn fixture_with_bad_timestamp_seeds_nothing() {
        let (service, _guard) = service_with_temp_dir();
        let mut fixture = Fixture::builtin();
        fixture.messages[1].minutes_ago = i64::MAX;

        let err = service.seed_from_fixture("driver_001", &fixture).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FixtureError>(),
            Some(FixtureError::Timestamp { .. })
        ));
        assert!(service.driver_deliveries("driver_001").unwrap().is_empty());
        assert!(service.driver_messages("driver_001").unwrap().is_empty());
    }

    #[test]
    fn same_fixture_can_seed_two_drivers() {
        let (service, _guard) = service_with_temp_dir();
        let fixture = Fixture::builtin();
        assert!(service.seed_from_fixture("driver_001", &fixture).unwrap());
        assert!(service.seed_from_fixture("driver_002", &fixture).unwrap());
        assert_eq!(service.driver_deliveries("driver_002").unwrap().len(), 3);
    }

    #[test]
    fn send_message_validates_input() {
        let (service, _guard) = service_with_temp_dir();
        let err = service.send_message(message("Sarah Johnson", "  ")).unwrap_err();
        assert_eq!(
            err.downcast_ref::<InputError>(),
            Some(&InputError::Empty("Message text"))
        );

        let stored = service
            .send_message(message("Sarah Johnson", "Outside"))
            .unwrap();
        assert_eq!(stored.message.sender, Sender::Driver);
        let conversation = service
            .conversation("driver_001", " Sarah Johnson ")
            .unwrap();
        assert_eq!(conversation.len(), 1);
    }

    #[test]
    fn status_updates_flow_into_active_customers() {
        let (service, _guard) = service_with_temp_dir();
        service
            .seed_from_fixture("driver_001", &Fixture::builtin())
            .unwrap();
        assert_eq!(service.active_customers("driver_001").unwrap().len(), 3);

        let sarah = service
            .driver_deliveries("driver_001")
            .unwrap()
            .into_iter()
            .find(|d| d.delivery.customer_name == "Sarah Johnson")
            .unwrap();
        let update = service
            .update_status(&sarah.delivery.id, DeliveryStatus::Delivered)
            .unwrap();
        assert!(update.changed);

        let names: Vec<String> = service
            .active_customers("driver_001")
            .unwrap()
            .into_iter()
            .map(|c| c.customer_name)
            .collect();
        assert_eq!(names, vec!["Mike Chen", "Emily Davis"]);
    }
}
