//! In-memory view state for the driver dashboard.
//!
//! The controller owns the delivery list, the chat log and the current
//! screen. Every operation is total: nothing here touches the network or
//! the store, and bad input (an unknown customer, a blank message) simply
//! yields empty results or no change.

use tracing::debug;

use crate::model::{Delivery, DriverProfile, Message, Screen, Sender};

#[derive(Debug, Clone)]
pub struct ViewController {
    driver: DriverProfile,
    deliveries: Vec<Delivery>,
    messages: Vec<Message>,
    screen: Screen,
    active_customer: String,
    input: String,
}

impl ViewController {
    /// Start on the dashboard with the first delivery's customer active.
    pub fn new(driver: DriverProfile, deliveries: Vec<Delivery>, messages: Vec<Message>) -> Self {
        let active_customer = deliveries
            .first()
            .map(|delivery| delivery.customer_name.clone())
            .unwrap_or_default();
        Self {
            driver,
            deliveries,
            messages,
            screen: Screen::Dashboard,
            active_customer,
            input: String::new(),
        }
    }

    pub fn driver(&self) -> &DriverProfile {
        &self.driver
    }

    pub fn deliveries(&self) -> &[Delivery] {
        &self.deliveries
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn active_customer(&self) -> &str {
        &self.active_customer
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn select_view(&mut self, screen: Screen) {
        debug!(from = %self.screen, to = %screen, "view selected");
        self.screen = screen;
    }

    /// Make `name` the chat partner and open the chat screen. The name is not
    /// checked against the delivery list.
    pub fn select_customer<S: Into<String>>(&mut self, name: S) {
        self.active_customer = name.into();
        debug!(customer = %self.active_customer, "customer selected");
        self.select_view(Screen::Chat);
    }

    pub fn set_input<S: Into<String>>(&mut self, text: S) {
        self.input = text.into();
    }

    /// Send whatever is in the pending input.
    pub fn submit_input(&mut self) -> Option<&Message> {
        let text = std::mem::take(&mut self.input);
        if text.trim().is_empty() {
            self.input = text;
            return None;
        }
        self.push_driver_message(text)
    }

    /// Append a driver message to the active conversation and clear the
    /// pending input. Blank text is ignored.
    pub fn send_message(&mut self, text: &str) -> Option<&Message> {
        if text.trim().is_empty() {
            return None;
        }
        self.push_driver_message(text.to_string())
    }

    fn push_driver_message(&mut self, text: String) -> Option<&Message> {
        let message = Message::from_driver(self.active_customer.clone(), text);
        debug!(
            id = message.id.as_str(),
            customer = message.customer_name.as_str(),
            "driver message appended"
        );
        self.messages.push(message);
        self.input.clear();
        self.messages.last()
    }

    pub fn customer_messages(&self, name: &str) -> Vec<&Message> {
        self.messages
            .iter()
            .filter(|message| message.customer_name == name)
            .collect()
    }

    pub fn active_messages(&self) -> Vec<&Message> {
        self.customer_messages(&self.active_customer)
    }

    /// Messages the customer has sent. There is no read tracking, so this
    /// never goes down.
    pub fn unread_count(&self, name: &str) -> usize {
        self.messages
            .iter()
            .filter(|message| message.customer_name == name && message.sender == Sender::Customer)
            .count()
    }

    pub fn active_delivery_count(&self) -> usize {
        self.deliveries
            .iter()
            .filter(|delivery| delivery.status.is_active())
            .count()
    }

    pub fn deliveries_for(&self, name: &str) -> Vec<&Delivery> {
        self.deliveries
            .iter()
            .filter(|delivery| delivery.customer_name == name)
            .collect()
    }

    pub fn recent_customers(&self) -> &[Delivery] {
        let end = self.deliveries.len().min(RECENT_CUSTOMER_LIMIT);
        &self.deliveries[..end]
    }

    pub fn customers(&self) -> Vec<&str> {
        self.deliveries
            .iter()
            .map(|delivery| delivery.customer_name.as_str())
            .collect()
    }
}

const RECENT_CUSTOMER_LIMIT: usize = 2;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Fixture;
    use crate::model::DeliveryStatus;
    use pretty_assertions::assert_eq;

    fn builtin() -> ViewController {
        Fixture::builtin().into_controller().expect("builtin fixture")
    }

    #[test]
    fn starts_on_dashboard_with_first_customer_active() {
        let controller = builtin();
        assert_eq!(controller.screen(), Screen::Dashboard);
        assert_eq!(controller.active_customer(), "Sarah Johnson");
        assert_eq!(controller.deliveries().len(), 3);
        assert_eq!(controller.messages().len(), 3);
        assert!(controller
            .messages()
            .iter()
            .all(|message| message.customer_name == "Sarah Johnson"));
    }

    #[test]
    fn send_message_appends_one_driver_message() {
        let mut controller = builtin();
        controller.set_input("draft");
        let sent = controller.send_message("test").cloned().expect("sent");

        assert_eq!(controller.messages().len(), 4);
        let last = &controller.messages()[3];
        assert_eq!(last, &sent);
        assert_eq!(last.text, "test");
        assert_eq!(last.sender, Sender::Driver);
        assert_eq!(last.customer_name, "Sarah Johnson");
        assert_eq!(controller.input(), "");
    }

    #[test]
    fn blank_messages_are_ignored() {
        let mut controller = builtin();
        assert!(controller.send_message("").is_none());
        assert!(controller.send_message("   \t\n").is_none());
        assert_eq!(controller.messages().len(), 3);
    }

    #[test]
    fn submit_input_sends_and_clears_pending_text() {
        let mut controller = builtin();
        controller.set_input("On my way");
        assert!(controller.submit_input().is_some());
        assert_eq!(controller.input(), "");
        assert_eq!(controller.messages().last().unwrap().text, "On my way");

        controller.set_input("  ");
        assert!(controller.submit_input().is_none());
        assert_eq!(controller.input(), "  ");
        assert_eq!(controller.messages().len(), 4);
    }

    #[test]
    fn customer_messages_filters_by_exact_name_in_order() {
        let mut controller = builtin();
        controller.select_customer("Mike Chen");
        controller.send_message("Outside now");
        controller.select_customer("Sarah Johnson");
        controller.send_message("Thanks!");

        let texts: Vec<&str> = controller
            .customer_messages("Sarah Johnson")
            .iter()
            .map(|message| message.text.as_str())
            .collect();
        assert_eq!(texts.len(), 4);
        assert!(texts[0].starts_with("Hi! Just checking"));
        assert_eq!(texts[3], "Thanks!");
        assert!(controller.customer_messages("sarah johnson").is_empty());
        assert_eq!(controller.customer_messages("Mike Chen").len(), 1);
    }

    #[test]
    fn unknown_customer_has_no_messages_or_unread() {
        let mut controller = builtin();
        controller.select_customer("Nobody");
        assert_eq!(controller.screen(), Screen::Chat);
        assert!(controller.active_messages().is_empty());
        assert_eq!(controller.unread_count("Nobody"), 0);
        assert!(controller.deliveries_for("Nobody").is_empty());
    }

    #[test]
    fn unread_count_only_counts_customer_messages_and_never_drops() {
        let mut controller = builtin();
        assert_eq!(controller.unread_count("Sarah Johnson"), 2);
        controller.select_customer("Sarah Johnson");
        controller.send_message("reply");
        assert_eq!(controller.unread_count("Sarah Johnson"), 2);
    }

    #[test]
    fn dashboard_aggregates_follow_delivery_list() {
        let mut fixture = Fixture::builtin();
        fixture.deliveries[2].status = DeliveryStatus::Delivered;
        let controller = fixture.into_controller().expect("controller");

        assert_eq!(controller.active_delivery_count(), 2);
        let recent: Vec<&str> = controller
            .recent_customers()
            .iter()
            .map(|delivery| delivery.customer_name.as_str())
            .collect();
        assert_eq!(recent, vec!["Sarah Johnson", "Mike Chen"]);
        assert_eq!(
            controller.customers(),
            vec!["Sarah Johnson", "Mike Chen", "Emily Davis"]
        );
    }

    #[test]
    fn select_view_switches_screen_only() {
        let mut controller = builtin();
        controller.select_view(Screen::Deliveries);
        assert_eq!(controller.screen(), Screen::Deliveries);
        assert_eq!(controller.active_customer(), "Sarah Johnson");
        assert_eq!(controller.messages().len(), 3);
    }

    #[test]
    fn empty_delivery_list_is_handled() {
        let controller = ViewController::new(DriverProfile::default(), Vec::new(), Vec::new());
        assert_eq!(controller.active_customer(), "");
        assert!(controller.recent_customers().is_empty());
        assert_eq!(controller.active_delivery_count(), 0);
    }
}
