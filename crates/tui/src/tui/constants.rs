use std::time::Duration;

pub(crate) const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub(crate) const TICK_RATE: Duration = Duration::from_millis(200);
pub(crate) const STATUS_TTL: Duration = Duration::from_secs(5);

pub(crate) const COMMAND_HELP: &str = concat!(
    "Commands: /help, /view <dashboard|chat|deliveries>, /chat <customer>, ",
    "/send <text>, /quit"
);

pub(crate) const STATUS_COMPOSE: &str = "Type a message • Enter to send • Esc to cancel";
pub(crate) const STATUS_COMMAND_PALETTE: &str =
    "Type a /command • Up/Down: navigate • Tab/Right: complete • Enter: run • Esc: cancel";
pub(crate) const STATUS_HELP: &str = "Keyboard reference • Enter/Esc to close";
pub(crate) const STATUS_NO_CUSTOMER: &str = "No customer selected; pick one from Deliveries";
pub(crate) const STATUS_EMPTY_MESSAGE: &str = "Type something before sending";
pub(crate) const STATUS_NOTHING_SELECTED: &str = "Nothing selected";
