use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::core::input::{DeliveryInput, MessageInput};
use crate::model::{DeliveryStatus, Sender};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "courier",
    version,
    about = "Terminal dashboard for delivery drivers: map, deliveries and customer chat.",
    after_help = "Examples:\n  courier                 Launch the dashboard (same as `courier tui`)\n  courier --fixtures shift.json\n  courier seed && courier deliveries\n  courier send \"Sarah Johnson\" Two minutes away\n  courier status 01HZX3 delivered\n  courier mcp --seed --log debug"
)]
pub struct Cli {
    /// Override the data directory (defaults to platform-specific app dir)
    #[arg(long, value_name = "PATH", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Fixture document with deliveries and messages (defaults to fixtures.json in the data dir, then built-in data)
    #[arg(long, value_name = "PATH", global = true)]
    pub fixtures: Option<PathBuf>,

    /// Driver whose deliveries and messages are used
    #[arg(long = "driver", value_name = "ID", global = true)]
    pub driver_id: Option<String>,

    /// Print command results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// Launch the terminal dashboard (default command)
    Tui,
    /// Run the Model Context Protocol server over stdio
    Mcp(McpArgs),
    /// Copy the fixture data into the store for the driver
    Seed,
    /// List the driver's deliveries, newest first
    Deliveries,
    /// Assign a new delivery to the driver
    AddDelivery(AddDeliveryArgs),
    /// Change the status of a delivery
    Status(StatusArgs),
    /// Show stored messages, optionally for a single customer
    Messages(MessagesArgs),
    /// Record a chat message with a customer
    Send(SendArgs),
    /// Customers with pending or in-progress deliveries
    Customers,
}

#[derive(Args, Debug, Clone)]
pub struct McpArgs {
    /// Override the tracing filter for the MCP server (e.g. "info", "debug")
    #[arg(long = "log", value_name = "DIRECTIVE")]
    pub log_filter: Option<String>,

    /// Seed the store from fixtures before serving when the driver has no deliveries
    #[arg(long)]
    pub seed: bool,
}

#[derive(Args, Debug, Clone)]
pub struct AddDeliveryArgs {
    /// Customer receiving the order
    #[arg(long)]
    pub customer: String,

    /// Customer phone number
    #[arg(long, default_value = "")]
    pub phone: String,

    /// Drop-off address
    #[arg(long)]
    pub address: String,

    /// Drop-off latitude
    #[arg(long = "lat", allow_hyphen_values = true)]
    pub latitude: f64,

    /// Drop-off longitude
    #[arg(long = "lng", allow_hyphen_values = true)]
    pub longitude: f64,

    /// What was ordered
    #[arg(long, default_value = "")]
    pub order: String,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    /// Delivery id
    #[arg(value_name = "ID")]
    pub id: String,

    /// New status
    #[arg(value_enum)]
    pub status: DeliveryStatus,
}

#[derive(Args, Debug, Clone)]
pub struct MessagesArgs {
    /// Only show the conversation with this customer
    #[arg(long)]
    pub customer: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SendArgs {
    /// Customer the message belongs to
    #[arg(value_name = "CUSTOMER")]
    pub customer: String,

    /// Message text
    #[arg(value_name = "TEXT", required = true)]
    pub text: Vec<String>,

    /// Who wrote the message
    #[arg(long = "from", value_enum, default_value_t = Sender::Driver)]
    pub sender: Sender,
}

impl SendArgs {
    pub fn to_input(&self, driver_id: &str) -> MessageInput {
        MessageInput {
            driver_id: driver_id.to_string(),
            customer_name: self.customer.clone(),
            text: self.text.join(" "),
            sender: Some(self.sender.as_str().to_string()),
        }
    }
}

impl AddDeliveryArgs {
    pub fn to_input(&self, driver_id: &str) -> DeliveryInput {
        DeliveryInput {
            driver_id: driver_id.to_string(),
            customer_name: self.customer.clone(),
            customer_phone: self.phone.clone(),
            address: self.address.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            order_details: self.order.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_negative_longitude_for_new_delivery() {
        let cli = Cli::try_parse_from([
            "courier",
            "add-delivery",
            "--customer",
            "Mike Chen",
            "--address",
            "8 Little Newport Street",
            "--lat",
            "51.5128",
            "--lng",
            "-0.1280",
        ])
        .expect("parse");
        match cli.command {
            Some(CliCommand::AddDelivery(args)) => {
                assert_eq!(args.longitude, -0.1280);
                assert_eq!(args.phone, "");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn send_joins_words_and_defaults_to_driver() {
        let cli = Cli::try_parse_from([
            "courier",
            "--driver",
            "driver_009",
            "send",
            "Sarah Johnson",
            "Two",
            "minutes",
        ])
        .expect("parse");
        assert_eq!(cli.driver_id.as_deref(), Some("driver_009"));
        let Some(CliCommand::Send(args)) = cli.command else {
            panic!("expected send");
        };
        let input = args.to_input("driver_009");
        assert_eq!(input.text, "Two minutes");
        assert_eq!(input.sender.as_deref(), Some("driver"));
    }

    #[test]
    fn status_accepts_wire_names() {
        let cli = Cli::try_parse_from(["courier", "status", "abc", "in_progress"]).expect("parse");
        let Some(CliCommand::Status(args)) = cli.command else {
            panic!("expected status");
        };
        assert_eq!(args.status, DeliveryStatus::InProgress);
    }

    #[test]
    fn status_rejects_unknown_names() {
        assert!(Cli::try_parse_from(["courier", "status", "abc", "unknown"]).is_err());
        assert!(Cli::try_parse_from(["courier", "status", "abc", "cancelled"]).is_err());
    }

    #[test]
    fn mcp_takes_seed_and_global_fixtures() {
        let cli = Cli::try_parse_from(["courier", "mcp", "--seed", "--fixtures", "shift.json"])
            .expect("parse");
        assert_eq!(cli.fixtures.as_deref(), Some(std::path::Path::new("shift.json")));
        let Some(CliCommand::Mcp(args)) = cli.command else {
            panic!("expected mcp");
        };
        assert!(args.seed);
        assert_eq!(args.log_filter, None);
    }
}
