use std::time::Instant;

use ratatui::style::{Color, Style};
use ratatui::widgets::{ListState, TableState};
use tracing::info;

use super::buffer::TextBuffer;
use super::constants::*;
use crate::config::AppConfig;
use crate::controller::ViewController;
use crate::model::{Delivery, Screen};

mod commands;
mod input;
mod render;

use commands::Suggestion;

#[derive(Debug, Clone, Copy)]
struct ViewTab {
    label: &'static str,
    screen: Screen,
    description: &'static str,
}

const TABS: [ViewTab; 3] = [
    ViewTab {
        label: "🏠 Dashboard",
        screen: Screen::Dashboard,
        description: "Today's route",
    },
    ViewTab {
        label: "💬 Messages",
        screen: Screen::Chat,
        description: "Customer chat",
    },
    ViewTab {
        label: "📦 Deliveries",
        screen: Screen::Deliveries,
        description: "Assigned orders",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    Compose,
    Command,
    Help,
}

#[derive(Debug, Clone)]
struct StatusMessage {
    text: String,
    kind: StatusKind,
    created_at: Instant,
}

impl StatusMessage {
    fn new<T: Into<String>>(text: T, kind: StatusKind) -> Self {
        Self {
            text: text.into(),
            kind,
            created_at: Instant::now(),
        }
    }

    fn style(&self) -> Style {
        match self.kind {
            StatusKind::Info => Style::default().fg(Color::Cyan),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum StatusKind {
    Info,
    Error,
}

pub(crate) struct App {
    config: AppConfig,
    controller: ViewController,
    selected: usize,
    table_state: TableState,
    list_state: ListState,
    input_mode: InputMode,
    compose: TextBuffer,
    command: TextBuffer,
    suggestions: Vec<Suggestion>,
    suggestion_index: usize,
    status: Option<StatusMessage>,
    should_quit: bool,
}

impl App {
    pub(crate) fn new(config: AppConfig, controller: ViewController) -> Self {
        let mut app = Self {
            config,
            controller,
            selected: 0,
            table_state: TableState::default(),
            list_state: ListState::default(),
            input_mode: InputMode::Normal,
            compose: TextBuffer::new(),
            command: TextBuffer::new(),
            suggestions: Vec::new(),
            suggestion_index: 0,
            status: None,
            should_quit: false,
        };
        app.sync_selection();
        app
    }

    pub(crate) fn on_tick(&mut self) {
        if let Some(status) = &self.status {
            if status.created_at.elapsed() > STATUS_TTL {
                self.status = None;
            }
        }
    }

    pub(crate) fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub(crate) fn delivery_count(&self) -> usize {
        self.controller.deliveries().len()
    }

    fn screen(&self) -> Screen {
        self.controller.screen()
    }

    fn tab_index(&self) -> usize {
        TABS.iter()
            .position(|tab| tab.screen == self.screen())
            .unwrap_or(0)
    }

    /// Rows the selection moves over on the current screen.
    fn selectable(&self) -> &[Delivery] {
        match self.screen() {
            Screen::Dashboard => self.controller.recent_customers(),
            Screen::Deliveries => self.controller.deliveries(),
            Screen::Chat => &[],
        }
    }

    fn selected_delivery(&self) -> Option<&Delivery> {
        self.selectable().get(self.selected)
    }

    fn sync_selection(&mut self) {
        let len = self.selectable().len();
        if len == 0 {
            self.selected = 0;
            self.table_state.select(None);
            self.list_state.select(None);
            return;
        }
        if self.selected >= len {
            self.selected = len - 1;
        }
        self.table_state.select(Some(self.selected));
        self.list_state.select(Some(self.selected));
    }

    fn select_next(&mut self) {
        let len = self.selectable().len();
        if len == 0 {
            return;
        }
        self.selected = (self.selected + 1).min(len - 1);
        self.sync_selection();
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.sync_selection();
    }

    fn switch_screen(&mut self, screen: Screen) {
        if screen == self.screen() {
            return;
        }
        self.controller.select_view(screen);
        self.sync_selection();
    }

    fn next_tab(&mut self) {
        self.switch_screen(self.screen().next());
    }

    fn prev_tab(&mut self) {
        self.switch_screen(self.screen().prev());
    }

    /// Open the chat with whoever is under the cursor.
    fn chat_with_selected(&mut self) {
        let Some(name) = self
            .selected_delivery()
            .map(|delivery| delivery.customer_name.clone())
        else {
            self.set_status_info(STATUS_NOTHING_SELECTED);
            return;
        };
        self.open_chat(name);
    }

    fn open_chat(&mut self, name: String) {
        self.controller.select_customer(name);
        self.sync_selection();
        self.set_status_info(format!("Chatting with {}", self.controller.active_customer()));
    }

    fn start_compose(&mut self) {
        if self.controller.active_customer().is_empty() {
            self.set_status_error(STATUS_NO_CUSTOMER);
            return;
        }
        self.switch_screen(Screen::Chat);
        self.compose.set(self.controller.input());
        self.input_mode = InputMode::Compose;
        self.set_status_info(STATUS_COMPOSE);
    }

    fn cancel_compose(&mut self) {
        self.compose.clear();
        self.controller.set_input("");
        self.input_mode = InputMode::Normal;
        self.status = None;
    }

    fn sync_compose(&mut self) {
        self.controller.set_input(self.compose.as_str());
    }

    fn submit_compose(&mut self) {
        if self.compose.is_blank() {
            self.set_status_error(STATUS_EMPTY_MESSAGE);
            return;
        }
        self.sync_compose();
        let customer = self.controller.active_customer().to_string();
        match self.controller.submit_input() {
            Some(message) => {
                info!(customer = customer.as_str(), id = message.id.as_str(), "message sent");
                self.compose.clear();
                self.input_mode = InputMode::Normal;
                self.set_status_info(format!("Sent to {}", customer));
            }
            None => self.set_status_error(STATUS_EMPTY_MESSAGE),
        }
    }

    fn send_text(&mut self, text: &str) {
        if self.controller.active_customer().is_empty() {
            self.set_status_error(STATUS_NO_CUSTOMER);
            return;
        }
        let customer = self.controller.active_customer().to_string();
        match self.controller.send_message(text) {
            Some(message) => {
                info!(customer = customer.as_str(), id = message.id.as_str(), "message sent");
                self.compose.clear();
                self.set_status_info(format!("Sent to {}", customer));
            }
            None => self.set_status_error(STATUS_EMPTY_MESSAGE),
        }
    }

    fn show_help_overlay(&mut self) {
        self.input_mode = InputMode::Help;
        self.set_status_info(STATUS_HELP);
    }

    fn close_overlay(&mut self) {
        self.input_mode = InputMode::Normal;
        self.status = None;
    }

    pub(crate) fn set_status_info<T: Into<String>>(&mut self, message: T) {
        let mut text = String::from("ℹ️  ");
        text.push_str(&message.into());
        self.status = Some(StatusMessage::new(text, StatusKind::Info));
    }

    pub(crate) fn set_status_error<T: Into<String>>(&mut self, message: T) {
        let mut text = String::from("⚠️  ");
        text.push_str(&message.into());
        self.status = Some(StatusMessage::new(text, StatusKind::Error));
    }
}
