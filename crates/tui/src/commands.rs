use std::fmt;
use std::io::Write;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::cli::{AddDeliveryArgs, CliCommand, MessagesArgs, SendArgs, StatusArgs};
use crate::config::AppConfig;
use crate::core::commands as core_commands;
use crate::core::DispatchService;
use crate::model::{Sender, StatusUpdate, StoredDelivery, StoredMessage};

pub fn execute<W: Write>(
    config: &AppConfig,
    command: CliCommand,
    json: bool,
    mut writer: W,
) -> Result<()> {
    let output = Output { json };
    match command {
        CliCommand::Seed => handle_seed(config, output, &mut writer),
        CliCommand::Deliveries => handle_deliveries(config, output, &mut writer),
        CliCommand::AddDelivery(args) => handle_add_delivery(config, &args, output, &mut writer),
        CliCommand::Status(args) => handle_status(config, &args, output, &mut writer),
        CliCommand::Messages(args) => handle_messages(config, &args, output, &mut writer),
        CliCommand::Send(args) => handle_send(config, &args, output, &mut writer),
        CliCommand::Customers => handle_customers(config, output, &mut writer),
        CliCommand::Tui | CliCommand::Mcp(_) => {
            Err(anyhow!("launch interactive surfaces directly"))
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Output {
    json: bool,
}

impl Output {
    fn emit<W: Write, T: Serialize>(
        self,
        mut writer: W,
        value: &T,
        text: impl FnOnce(&mut W) -> Result<()>,
    ) -> Result<()> {
        if self.json {
            serde_json::to_writer_pretty(&mut writer, value)?;
            writeln!(writer)?;
            Ok(())
        } else {
            text(&mut writer)
        }
    }
}

fn handle_seed<W: Write>(config: &AppConfig, output: Output, writer: W) -> Result<()> {
    let seeded = core_commands::seed_store(config)?;
    let driver = config.driver_id();
    output.emit(
        writer,
        &serde_json::json!({ "driver_id": driver, "seeded": seeded }),
        |w| {
            if seeded {
                writeln!(w, "Seeded fixture data for {}", driver)?;
            } else {
                writeln!(w, "{} already has deliveries; nothing seeded", driver)?;
            }
            Ok(())
        },
    )
}

fn handle_deliveries<W: Write>(config: &AppConfig, output: Output, writer: W) -> Result<()> {
    let service = DispatchService::new(config.clone())?;
    let deliveries = service.driver_deliveries(config.driver_id())?;
    output.emit(writer, &deliveries, |w| {
        if deliveries.is_empty() {
            writeln!(
                w,
                "No deliveries for {} (run `courier seed` to load fixtures)",
                config.driver_id()
            )?;
            return Ok(());
        }
        let pending = deliveries
            .iter()
            .filter(|stored| stored.delivery.status.is_active())
            .count();
        writeln!(w, "{}", PendingLine(pending))?;
        for stored in &deliveries {
            writeln!(w, "{}", DeliveryLine(stored))?;
        }
        Ok(())
    })
}

fn handle_add_delivery<W: Write>(
    config: &AppConfig,
    args: &AddDeliveryArgs,
    output: Output,
    writer: W,
) -> Result<()> {
    let service = DispatchService::new(config.clone())?;
    let stored = service.create_delivery(args.to_input(config.driver_id()))?;
    output.emit(writer, &stored, |w| {
        writeln!(
            w,
            "Created delivery {} for {} [{}]",
            stored.delivery.id,
            stored.delivery.customer_name,
            stored.delivery.status.as_str()
        )?;
        Ok(())
    })
}

fn handle_status<W: Write>(
    config: &AppConfig,
    args: &StatusArgs,
    output: Output,
    writer: W,
) -> Result<()> {
    let service = DispatchService::new(config.clone())?;
    let update = service.update_status(&args.id, args.status)?;
    output.emit(writer, &update, |w| {
        writeln!(w, "{}", StatusLine::new(&update, args))?;
        Ok(())
    })
}

fn handle_messages<W: Write>(
    config: &AppConfig,
    args: &MessagesArgs,
    output: Output,
    writer: W,
) -> Result<()> {
    let service = DispatchService::new(config.clone())?;
    let messages = match &args.customer {
        Some(customer) => service.conversation(config.driver_id(), customer)?,
        None => service.driver_messages(config.driver_id())?,
    };
    output.emit(writer, &messages, |w| {
        if messages.is_empty() {
            writeln!(w, "No messages")?;
        }
        for stored in &messages {
            writeln!(w, "{}", MessageLine(stored))?;
        }
        Ok(())
    })
}

fn handle_send<W: Write>(
    config: &AppConfig,
    args: &SendArgs,
    output: Output,
    writer: W,
) -> Result<()> {
    let service = DispatchService::new(config.clone())?;
    let stored = service.send_message(args.to_input(config.driver_id()))?;
    output.emit(writer, &stored, |w| {
        writeln!(w, "{}", MessageLine(&stored))?;
        Ok(())
    })
}

fn handle_customers<W: Write>(config: &AppConfig, output: Output, writer: W) -> Result<()> {
    let service = DispatchService::new(config.clone())?;
    let customers = service.active_customers(config.driver_id())?;
    output.emit(writer, &customers, |w| {
        if customers.is_empty() {
            writeln!(w, "No active customers")?;
        }
        for customer in &customers {
            writeln!(
                w,
                "{} ({}) · {}",
                customer.customer_name, customer.customer_phone, customer.latest_order
            )?;
        }
        Ok(())
    })
}

struct PendingLine(usize);

impl fmt::Display for PendingLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} order{} pending",
            self.0,
            if self.0 == 1 { "" } else { "s" }
        )
    }
}

struct DeliveryLine<'a>(&'a StoredDelivery);

impl fmt::Display for DeliveryLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let delivery = &self.0.delivery;
        write!(
            f,
            "{} {:<11} {}  {} · {} · {}",
            delivery.status.icon(),
            delivery.status.label(),
            delivery.id,
            delivery.customer_name,
            delivery.street(),
            delivery.order_details
        )
    }
}

struct MessageLine<'a>(&'a StoredMessage);

impl fmt::Display for MessageLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = &self.0.message;
        write!(
            f,
            "[{}] {} {} {}: {}",
            clock(&message.timestamp),
            message.customer_name,
            if matches!(message.sender, Sender::Driver) { "<" } else { ">" },
            message.sender,
            message.text
        )
    }
}

enum StatusLine<'a> {
    Updated { id: &'a str, status: &'a str },
    NotFound(&'a str),
}

impl<'a> StatusLine<'a> {
    fn new(update: &'a StatusUpdate, args: &'a StatusArgs) -> Self {
        if update.changed {
            StatusLine::Updated {
                id: &update.id,
                status: args.status.label(),
            }
        } else {
            StatusLine::NotFound(&update.id)
        }
    }
}

impl fmt::Display for StatusLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusLine::Updated { id, status } => write!(f, "Delivery {} is now {}", id, status),
            StatusLine::NotFound(id) => write!(f, "Delivery not found: {}", id),
        }
    }
}

fn clock(timestamp: &DateTime<Utc>) -> String {
    let local: DateTime<Local> = (*timestamp).into();
    local.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::McpArgs;
    use crate::model::DeliveryStatus;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn temp_config() -> (AppConfig, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let data_dir = dir.path().to_path_buf();
        std::fs::create_dir_all(&data_dir).expect("create data dir");
        let config = AppConfig::from_data_dir(data_dir).expect("config");
        (config, dir)
    }

    fn run(config: &AppConfig, command: CliCommand, json: bool) -> String {
        let mut output = Vec::new();
        execute(config, command, json, &mut output).expect("execute");
        String::from_utf8(output).expect("utf8")
    }

    #[test]
    fn seed_then_list_deliveries() {
        let (config, _dir) = temp_config();
        let seeded = run(&config, CliCommand::Seed, false);
        assert!(seeded.contains("Seeded fixture data for driver_001"));
        let again = run(&config, CliCommand::Seed, false);
        assert!(again.contains("nothing seeded"));

        let listing = run(&config, CliCommand::Deliveries, false);
        assert!(listing.starts_with("3 orders pending"));
        assert!(listing.contains("Sarah Johnson · 15 Gerrard Street"));
        assert!(listing.contains("🚗 in progress"));
    }

    #[test]
    fn empty_store_suggests_seeding() {
        let (config, _dir) = temp_config();
        let listing = run(&config, CliCommand::Deliveries, false);
        assert!(listing.contains("run `courier seed`"));
    }

    #[test]
    fn status_command_reports_missing_delivery() {
        let (config, _dir) = temp_config();
        let args = StatusArgs {
            id: "missing".into(),
            status: DeliveryStatus::Delivered,
        };
        let output = run(&config, CliCommand::Status(args), false);
        assert_eq!(output.trim(), "Delivery not found: missing");
    }

    #[test]
    fn send_and_read_conversation_as_json() {
        let (config, _dir) = temp_config();
        let send = SendArgs {
            customer: "Mike Chen".into(),
            text: vec!["Ring".into(), "twice".into()],
            sender: Sender::Customer,
        };
        run(&config, CliCommand::Send(send), false);

        let output = run(
            &config,
            CliCommand::Messages(MessagesArgs {
                customer: Some("Mike Chen".into()),
            }),
            true,
        );
        let value: serde_json::Value = serde_json::from_str(&output).expect("json");
        let messages = value.as_array().expect("array");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["text"], "Ring twice");
        assert_eq!(messages[0]["sender"], "customer");
        assert_eq!(messages[0]["driver_id"], "driver_001");
    }

    #[test]
    fn add_delivery_then_update_status() {
        let (config, _dir) = temp_config();
        let add = AddDeliveryArgs {
            customer: "Emily Davis".into(),
            phone: "+44 20 7946 0789".into(),
            address: "25 Lisle Street, Chinatown".into(),
            latitude: 51.5098,
            longitude: -0.1310,
            order: "1x Peking Duck".into(),
        };
        let output = run(&config, CliCommand::AddDelivery(add), true);
        let value: serde_json::Value = serde_json::from_str(&output).expect("json");
        let id = value["id"].as_str().expect("id").to_string();
        assert_eq!(value["status"], "pending");

        let output = run(
            &config,
            CliCommand::Status(StatusArgs {
                id: id.clone(),
                status: DeliveryStatus::InProgress,
            }),
            false,
        );
        assert_eq!(output.trim(), format!("Delivery {} is now in progress", id));

        let customers = run(&config, CliCommand::Customers, false);
        assert!(customers.contains("Emily Davis (+44 20 7946 0789) · 1x Peking Duck"));
    }

    #[test]
    fn interactive_commands_are_rejected() {
        let (config, _dir) = temp_config();
        let mut output = Vec::new();
        let err = execute(
            &config,
            CliCommand::Mcp(McpArgs {
                log_filter: None,
                seed: false,
            }),
            false,
            &mut output,
        )
        .unwrap_err();
        assert!(err.to_string().contains("interactive"));
    }
}
