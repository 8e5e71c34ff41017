use anyhow::Result;

use crate::model::Screen;
use crate::tui::constants::COMMAND_HELP;

use super::{App, InputMode};

#[derive(Debug, Clone)]
pub(crate) struct Suggestion {
    pub(crate) fill: String,
    pub(crate) label: String,
}

impl Suggestion {
    fn new<F: Into<String>, L: Into<String>>(fill: F, label: L) -> Self {
        Self {
            fill: fill.into(),
            label: label.into(),
        }
    }
}

const VIEW_NAMES: [(&str, &str); 3] = [
    ("dashboard", "Route overview and map"),
    ("chat", "Conversation with the active customer"),
    ("deliveries", "Every assigned order"),
];

impl App {
    pub(crate) fn run_command(&mut self) -> Result<()> {
        let raw = self.command.as_str().trim().to_string();
        let Some(body) = raw.strip_prefix('/') else {
            self.set_status_error("Commands must start with '/'");
            self.finish_command();
            return Ok(());
        };
        let (cmd, rest) = match body.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd.to_ascii_lowercase(), rest.trim().to_string()),
            None => (body.to_ascii_lowercase(), String::new()),
        };

        self.finish_command();
        match cmd.as_str() {
            "" => self.set_status_error("Enter a command after '/'"),
            "help" | "h" => self.set_status_info(COMMAND_HELP),
            "quit" | "q" | "exit" => self.should_quit = true,
            "view" | "tab" => {
                if rest.is_empty() {
                    self.set_status_error("Usage: /view <dashboard|chat|deliveries>");
                } else {
                    let screen = Screen::from_name(&rest);
                    self.switch_screen(screen);
                    self.set_status_info(format!("Showing {}", screen));
                }
            }
            "chat" | "c" => {
                if rest.is_empty() {
                    self.set_status_error("Usage: /chat <customer>");
                } else {
                    let name = self.resolve_customer(&rest);
                    self.open_chat(name);
                }
            }
            "send" | "s" => {
                if rest.is_empty() {
                    self.set_status_error("Usage: /send <message>");
                } else {
                    self.send_text(&rest);
                }
            }
            unknown => {
                self.set_status_error(format!("Unknown command: {} (try /help)", unknown));
            }
        }
        Ok(())
    }

    /// Match a typed name against known customers, case-insensitively and by
    /// prefix. Anything else is used verbatim.
    fn resolve_customer(&self, typed: &str) -> String {
        let needle = typed.to_lowercase();
        let customers = self.controller.customers();
        customers
            .iter()
            .find(|name| name.to_lowercase() == needle)
            .or_else(|| {
                customers
                    .iter()
                    .find(|name| name.to_lowercase().starts_with(&needle))
            })
            .map(|name| name.to_string())
            .unwrap_or_else(|| typed.to_string())
    }

    pub(crate) fn finish_command(&mut self) {
        self.command.clear();
        self.suggestions.clear();
        self.suggestion_index = 0;
        self.input_mode = InputMode::Normal;
    }

    pub(crate) fn update_command_suggestions(&mut self) {
        self.suggestions = build_command_suggestions(self);
        if self.suggestion_index >= self.suggestions.len() {
            self.suggestion_index = 0;
        }
    }

    pub(crate) fn accept_suggestion(&mut self) {
        if let Some(s) = self.suggestions.get(self.suggestion_index) {
            self.command.set(s.fill.clone());
            self.update_command_suggestions();
        }
    }
}

fn build_command_suggestions(app: &App) -> Vec<Suggestion> {
    let raw = app.command.as_str();
    let Some(without) = raw.strip_prefix('/') else {
        return Vec::new();
    };
    let without = without.trim_start();
    let (first, rest) = match without.split_once(char::is_whitespace) {
        Some((first, rest)) => (first.to_ascii_lowercase(), Some(rest.trim_start())),
        None => (without.to_ascii_lowercase(), None),
    };

    let Some(rest) = rest else {
        let base = vec![
            Suggestion::new("/help", "❓ Help: show available commands"),
            Suggestion::new("/view ", "👀 Switch view (dashboard/chat/deliveries)"),
            Suggestion::new("/chat ", "💬 Chat with a customer"),
            Suggestion::new("/send ", "✉️ Message the active customer"),
            Suggestion::new("/quit", "🚪 Quit the dashboard"),
        ];
        return base
            .into_iter()
            .filter(|s| s.fill[1..].starts_with(&first))
            .collect();
    };

    match first.as_str() {
        "view" | "tab" => {
            let partial = rest.to_ascii_lowercase();
            VIEW_NAMES
                .iter()
                .filter(|(name, _)| name.starts_with(&partial))
                .map(|(name, desc)| Suggestion::new(format!("/view {}", name), *desc))
                .collect()
        }
        "chat" | "c" => {
            let partial = rest.to_lowercase();
            app.controller
                .deliveries()
                .iter()
                .filter(|delivery| delivery.customer_name.to_lowercase().starts_with(&partial))
                .map(|delivery| {
                    Suggestion::new(
                        format!("/chat {}", delivery.customer_name),
                        format!("{} {}", delivery.status.icon(), delivery.street()),
                    )
                })
                .collect()
        }
        "send" | "s" => {
            let customer = app.controller.active_customer();
            if rest.is_empty() {
                vec![Suggestion::new("/send ", format!("Type a message for {}", customer))]
            } else {
                vec![Suggestion::new(
                    format!("/send {}", rest.trim_end()),
                    format!("Send to {}", customer),
                )]
            }
        }
        _ => Vec::new(),
    }
}
