use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::Screen;
use crate::tui::constants::STATUS_COMMAND_PALETTE;

use super::{App, InputMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NormalAction {
    Quit,
    ShowScreen(Screen),
    NextTab,
    PrevTab,
    SelectNext,
    SelectPrev,
    SelectFirst,
    SelectLast,
    Activate,
    MessageSelected,
    Compose,
    ShowHelp,
    EnterCommand,
    Back,
}

impl NormalAction {
    pub(crate) fn from_event(key: &KeyEvent) -> Option<Self> {
        if matches!(key.code, KeyCode::Char('c')) && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Self::Quit);
        }

        match key.code {
            KeyCode::Char('q') => Some(Self::Quit),
            KeyCode::Char('1') => Some(Self::ShowScreen(Screen::Dashboard)),
            KeyCode::Char('2') => Some(Self::ShowScreen(Screen::Chat)),
            KeyCode::Char('3') => Some(Self::ShowScreen(Screen::Deliveries)),
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => Some(Self::NextTab),
            KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => Some(Self::PrevTab),
            KeyCode::Char('j') | KeyCode::Down => Some(Self::SelectNext),
            KeyCode::Char('k') | KeyCode::Up => Some(Self::SelectPrev),
            KeyCode::Home => Some(Self::SelectFirst),
            KeyCode::End => Some(Self::SelectLast),
            KeyCode::Enter => Some(Self::Activate),
            KeyCode::Char('m') => Some(Self::MessageSelected),
            KeyCode::Char('i') => Some(Self::Compose),
            KeyCode::Char('?') => Some(Self::ShowHelp),
            KeyCode::Char('/') => Some(Self::EnterCommand),
            KeyCode::Esc => Some(Self::Back),
            _ => None,
        }
    }
}

impl App {
    pub(crate) fn on_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.input_mode {
            InputMode::Normal => self.handle_normal_mode(key),
            InputMode::Compose => self.handle_compose_mode(key),
            InputMode::Command => self.handle_command_mode(key),
            InputMode::Help => self.handle_help_mode(key),
        }
    }

    fn handle_normal_mode(&mut self, key: KeyEvent) -> Result<()> {
        if let Some(action) = NormalAction::from_event(&key) {
            self.execute_normal_action(action)?;
        }
        Ok(())
    }

    fn execute_normal_action(&mut self, action: NormalAction) -> Result<()> {
        match action {
            NormalAction::Quit => {
                self.should_quit = true;
            }
            NormalAction::ShowScreen(screen) => self.switch_screen(screen),
            NormalAction::NextTab => self.next_tab(),
            NormalAction::PrevTab => self.prev_tab(),
            NormalAction::SelectNext => self.select_next(),
            NormalAction::SelectPrev => self.select_prev(),
            NormalAction::SelectFirst => {
                self.selected = 0;
                self.sync_selection();
            }
            NormalAction::SelectLast => {
                self.selected = self.selectable().len().saturating_sub(1);
                self.sync_selection();
            }
            NormalAction::Activate => {
                if self.screen() == Screen::Chat {
                    self.start_compose();
                } else {
                    self.chat_with_selected();
                }
            }
            NormalAction::MessageSelected => self.chat_with_selected(),
            NormalAction::Compose => self.start_compose(),
            NormalAction::ShowHelp => self.show_help_overlay(),
            NormalAction::EnterCommand => {
                self.input_mode = InputMode::Command;
                self.command.set("/");
                self.update_command_suggestions();
                self.set_status_info(STATUS_COMMAND_PALETTE);
            }
            NormalAction::Back => {
                self.switch_screen(Screen::Dashboard);
                self.status = None;
            }
        }
        Ok(())
    }

    fn handle_compose_mode(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Enter => self.submit_compose(),
            KeyCode::Esc => self.cancel_compose(),
            KeyCode::Backspace => {
                self.compose.backspace();
                self.sync_compose();
            }
            KeyCode::Delete => {
                self.compose.delete_char();
                self.sync_compose();
            }
            KeyCode::Char(c) => {
                self.compose.insert_char(c);
                self.sync_compose();
            }
            KeyCode::Left => self.compose.move_left(),
            KeyCode::Right => self.compose.move_right(),
            KeyCode::Home => self.compose.move_home(),
            KeyCode::End => self.compose.move_end(),
            _ => {}
        }
        Ok(())
    }

    fn handle_help_mode(&mut self, key: KeyEvent) -> Result<()> {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?')
        ) {
            self.close_overlay();
        }
        Ok(())
    }

    fn handle_command_mode(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Enter => {
                if let Some(s) = self.suggestions.get(self.suggestion_index) {
                    let fill = s.fill.clone();
                    let typed_further = self.command.as_str().len() > fill.len();
                    if fill.ends_with(' ') && !typed_further {
                        self.command.set(fill);
                        self.update_command_suggestions();
                        return Ok(());
                    }
                    if !typed_further {
                        self.command.set(fill);
                    }
                }
                self.run_command()
            }
            KeyCode::Esc => {
                self.finish_command();
                self.status = None;
                Ok(())
            }
            KeyCode::Backspace => {
                self.command.backspace();
                self.update_command_suggestions();
                Ok(())
            }
            KeyCode::Char(c) => {
                self.command.insert_char(c);
                self.update_command_suggestions();
                Ok(())
            }
            KeyCode::Delete => {
                self.command.delete_char();
                self.update_command_suggestions();
                Ok(())
            }
            KeyCode::Tab | KeyCode::Right => {
                self.accept_suggestion();
                Ok(())
            }
            KeyCode::Up => {
                if !self.suggestions.is_empty() {
                    if self.suggestion_index == 0 {
                        self.suggestion_index = self.suggestions.len() - 1;
                    } else {
                        self.suggestion_index -= 1;
                    }
                }
                Ok(())
            }
            KeyCode::Down => {
                if !self.suggestions.is_empty() {
                    self.suggestion_index = (self.suggestion_index + 1) % self.suggestions.len();
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
