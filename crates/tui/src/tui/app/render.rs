use std::cmp::min;

use chrono::Local;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Circle, Points};
use ratatui::widgets::{
    Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, Tabs, Wrap,
};
use ratatui::Frame;

use crate::model::{Delivery, Screen, Sender};
use crate::tui::constants::APP_VERSION;
use crate::tui::helpers::{
    accent_title, badge_color, build_help_lines, centered_rect, format_clock, initial, inset_rect,
    map_bounds, status_span, BG_ACCENT, BG_BASE, BG_PANEL, FG_ACCENT,
};

use super::{App, InputMode, TABS};

fn panel(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(accent_title(title))
        .border_style(Style::default().fg(Color::DarkGray))
        .style(Style::default().bg(BG_PANEL))
}

fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

impl App {
    pub(crate) fn draw(&mut self, f: &mut Frame<'_>) {
        let size = f.size();
        f.render_widget(Clear, size);
        f.render_widget(Block::default().style(Style::default().bg(BG_BASE)), size);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(2),
            ])
            .split(size);

        self.draw_header(f, chunks[0]);
        self.draw_tabs(f, chunks[1]);
        match self.screen() {
            Screen::Dashboard => self.draw_dashboard(f, chunks[2]),
            Screen::Chat => self.draw_chat(f, chunks[2]),
            Screen::Deliveries => self.draw_deliveries(f, chunks[2]),
        }
        self.draw_footer(f, chunks[3]);

        match self.input_mode {
            InputMode::Command => self.draw_command_overlay(f, size),
            InputMode::Help => self.draw_help_overlay(f, size),
            InputMode::Normal | InputMode::Compose => {}
        }
    }

    fn draw_header(&self, f: &mut Frame<'_>, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(area);

        let driver = self.controller.driver();
        let left_line = Line::from(vec![
            Span::styled(
                format!(" courier v{} 🚚 ", APP_VERSION),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("— {}", TABS[self.tab_index()].description)),
            Span::raw("  "),
            Span::styled(
                format!("👤 {}", driver.name),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled("● Online", Style::default().fg(Color::Green)),
        ]);
        f.render_widget(
            Paragraph::new(left_line).style(Style::default().bg(BG_BASE)),
            cols[0],
        );

        let backend = match self.config.backend_url() {
            Some(url) => format!("🌐 {} ", url),
            None => format!("🗂 {} ", driver.id),
        };
        let right_para = Paragraph::new(Line::from(vec![Span::styled(backend, dim())]))
            .alignment(Alignment::Right)
            .style(Style::default().bg(BG_BASE));
        f.render_widget(right_para, cols[1]);
    }

    fn draw_tabs(&self, f: &mut Frame<'_>, area: Rect) {
        let titles: Vec<Line> = TABS
            .iter()
            .enumerate()
            .map(|(idx, tab)| Line::from(format!("{} {}", idx + 1, tab.label)))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.tab_index())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(accent_title("Views"))
                    .border_style(Style::default().fg(Color::DarkGray))
                    .style(Style::default().bg(BG_PANEL)),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Green)
                    .bg(BG_ACCENT)
                    .add_modifier(Modifier::BOLD),
            );
        f.render_widget(tabs, area);
    }

    fn draw_empty_state(&self, f: &mut Frame<'_>, area: Rect, lines: Vec<Line<'static>>) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(area);
        f.render_widget(Clear, area);
        f.render_widget(block, area);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let width = inner.width.min(80).max(1);
        let height = (lines.len() as u16).saturating_add(2).min(inner.height);
        let content_area = centered_rect(width, height, inner);
        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Center)
            .style(Style::default().bg(BG_PANEL));
        f.render_widget(paragraph, content_area);
    }

    fn no_deliveries_state(&self) -> Vec<Line<'static>> {
        let hint_style = Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::BOLD);
        vec![
            Line::from(vec![Span::styled(
                "No deliveries assigned 📭",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::default(),
            Line::from(vec![Span::styled(
                format!(
                    "Drop a fixtures.json into `{}` or pass `--fixtures`.",
                    self.config.data_dir().display()
                ),
                hint_style,
            )]),
            Line::from(vec![Span::styled("Press '?' for keys, 'q' to quit.", hint_style)]),
        ]
    }

    fn draw_dashboard(&mut self, f: &mut Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(5)])
            .split(area);
        self.draw_stats(f, rows[0]);

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[1]);
        self.draw_map(f, cols[0]);

        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(3)])
            .split(cols[1]);
        self.draw_actions(f, side[0]);
        self.draw_recent_customers(f, side[1]);
    }

    fn draw_stats(&self, f: &mut Frame<'_>, area: Rect) {
        let active = self.controller.active_delivery_count();
        let line = Line::from(vec![
            Span::styled(
                format!("📦 {} ", active),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(if active == 1 {
                "active delivery"
            } else {
                "active deliveries"
            }),
            Span::raw("    "),
            Span::styled(
                format!("✅ {} ", self.controller.deliveries().len() - active),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("delivered"),
            Span::raw("    "),
            Span::styled(
                format!("🕒 {}", Local::now().format("%H:%M")),
                dim(),
            ),
        ]);
        f.render_widget(Paragraph::new(line).block(panel("Today")), area);
    }

    fn draw_map(&self, f: &mut Frame<'_>, area: Rect) {
        let driver = self.controller.driver();
        let deliveries = self.controller.deliveries();
        let (x_bounds, y_bounds) = map_bounds(driver.location, deliveries);
        let radius = (x_bounds[1] - x_bounds[0]) * 0.02;

        let markers: Vec<(f64, f64, String, Color)> = deliveries
            .iter()
            .map(|delivery| {
                (
                    delivery.longitude,
                    delivery.latitude,
                    format!("{} {}", delivery.status.icon(), initial(&delivery.customer_name)),
                    badge_color(delivery.status.color()),
                )
            })
            .collect();
        let driver_point = [(driver.location.longitude, driver.location.latitude)];
        let driver_label = format!("🚚 {}", driver.name);

        let canvas = Canvas::default()
            .block(panel("🗺 Route"))
            .marker(Marker::Braille)
            .background_color(BG_PANEL)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(|ctx| {
                for (x, y, _, color) in &markers {
                    ctx.draw(&Circle {
                        x: *x,
                        y: *y,
                        radius,
                        color: *color,
                    });
                }
                ctx.draw(&Points {
                    coords: &driver_point,
                    color: Color::Cyan,
                });
                ctx.layer();
                for (x, y, label, color) in &markers {
                    ctx.print(
                        *x,
                        *y,
                        Span::styled(label.clone(), Style::default().fg(*color)),
                    );
                }
                ctx.print(
                    driver_point[0].0,
                    driver_point[0].1,
                    Span::styled(
                        driver_label.clone(),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ),
                );
            });
        f.render_widget(canvas, area);
    }

    fn draw_actions(&self, f: &mut Frame<'_>, area: Rect) {
        let active = self.controller.active_delivery_count();
        let customer = self.controller.active_customer();
        let unread = self.controller.unread_count(customer);

        let mut messages = vec![
            Span::raw("💬 Messages "),
            Span::styled("(2)", dim()),
        ];
        if unread > 0 {
            messages.push(Span::raw(" "));
            messages.push(Span::styled(
                format!(" {} ", unread),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        let lines = vec![
            Line::from(vec![
                Span::raw("📦 Active Deliveries "),
                Span::styled("(3)", dim()),
                Span::raw(" "),
                Span::styled(
                    format!(" {} ", active),
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(messages),
        ];
        f.render_widget(Paragraph::new(lines).block(panel("Actions")), area);
    }

    fn draw_recent_customers(&mut self, f: &mut Frame<'_>, area: Rect) {
        let recent = self.controller.recent_customers();
        if recent.is_empty() {
            let lines = self.no_deliveries_state();
            self.draw_empty_state(f, area, lines);
            return;
        }

        let items: Vec<ListItem> = recent
            .iter()
            .map(|delivery| {
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(
                            format!(" {} ", initial(&delivery.customer_name)),
                            Style::default()
                                .fg(Color::Black)
                                .bg(FG_ACCENT)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(" "),
                        Span::styled(
                            delivery.customer_name.clone(),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::raw("  "),
                        status_span(delivery.status),
                    ]),
                    Line::from(vec![Span::styled(
                        format!("    {}", delivery.street()),
                        dim(),
                    )]),
                ])
            })
            .collect();

        let list = List::new(items)
            .block(panel("Recent Customers"))
            .highlight_style(Style::default().bg(BG_ACCENT))
            .highlight_symbol("▶ ");
        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn draw_chat(&self, f: &mut Frame<'_>, area: Rect) {
        let customer = self.controller.active_customer();
        if customer.is_empty() {
            let lines = vec![
                Line::from(vec![Span::styled(
                    "No conversation open 💬",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )]),
                Line::default(),
                Line::from("Pick a customer in Deliveries (3) and press Enter."),
            ];
            self.draw_empty_state(f, area, lines);
            return;
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(area);
        self.draw_order_cards(f, cols[0], customer);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(cols[1]);
        self.draw_messages(f, right[0], customer);
        self.draw_compose(f, right[1], customer);
    }

    fn draw_order_cards(&self, f: &mut Frame<'_>, area: Rect, customer: &str) {
        let orders = self.controller.deliveries_for(customer);
        let mut lines: Vec<Line> = Vec::new();
        if orders.is_empty() {
            lines.push(Line::from(vec![Span::styled(
                "No orders for this customer",
                dim(),
            )]));
        }
        for (idx, delivery) in orders.iter().enumerate() {
            if idx > 0 {
                lines.push(Line::default());
            }
            lines.extend(order_card_lines(delivery));
        }
        f.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .block(panel("🧾 Current Order")),
            area,
        );
    }

    fn draw_messages(&self, f: &mut Frame<'_>, area: Rect, customer: &str) {
        let block = panel(&format!("💬 {}", customer));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let messages = self.controller.customer_messages(customer);
        if messages.is_empty() {
            f.render_widget(
                Paragraph::new(Line::from(vec![Span::styled(
                    "No messages yet. Press 'i' to say hello.",
                    dim(),
                )]))
                .alignment(Alignment::Center),
                inner,
            );
            return;
        }

        let mut lines: Vec<Line> = Vec::new();
        for message in messages {
            let (alignment, text_style) = match message.sender {
                Sender::Driver => (
                    Alignment::Right,
                    Style::default().fg(Color::Black).bg(FG_ACCENT),
                ),
                Sender::Customer => (Alignment::Left, Style::default().bg(BG_ACCENT)),
            };
            lines.push(
                Line::from(vec![Span::styled(format!(" {} ", message.text), text_style)])
                    .alignment(alignment),
            );
            lines.push(
                Line::from(vec![Span::styled(format_clock(&message.timestamp), dim())])
                    .alignment(alignment),
            );
            lines.push(Line::default());
        }
        lines.pop();

        let overflow = (lines.len() as u16).saturating_sub(inner.height);
        f.render_widget(Paragraph::new(lines).scroll((overflow, 0)), inner);
    }

    fn draw_compose(&self, f: &mut Frame<'_>, area: Rect, customer: &str) {
        let composing = self.input_mode == InputMode::Compose;
        let border = if composing {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title(&format!("✉️ Message {}", customer)))
            .border_style(border)
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let content = if composing || !self.controller.input().is_empty() {
            Line::from(self.controller.input().to_string())
        } else {
            Line::from(vec![Span::styled("Press 'i' to type a message", dim())])
        };
        f.render_widget(Paragraph::new(content), inner);

        if composing && inner.width > 0 {
            let column = (self.compose.cursor_column() as u16).min(inner.width - 1);
            f.set_cursor(inner.x + column, inner.y);
        }
    }

    fn draw_deliveries(&mut self, f: &mut Frame<'_>, area: Rect) {
        let deliveries = self.controller.deliveries();
        if deliveries.is_empty() {
            let lines = self.no_deliveries_state();
            self.draw_empty_state(f, area, lines);
            return;
        }

        let header = Row::new(vec![
            Cell::from("🔖 Status"),
            Cell::from("👤 Customer"),
            Cell::from("📞 Phone"),
            Cell::from("📍 Address"),
            Cell::from("🧾 Order"),
        ])
        .style(Style::default().add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = deliveries
            .iter()
            .map(|delivery| {
                Row::new(vec![
                    Cell::from(Line::from(status_span(delivery.status))),
                    Cell::from(delivery.customer_name.clone()),
                    Cell::from(delivery.customer_phone.clone()),
                    Cell::from(delivery.address.clone()),
                    Cell::from(delivery.order_details.clone()),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(15),
            Constraint::Percentage(15),
            Constraint::Length(17),
            Constraint::Percentage(30),
            Constraint::Percentage(35),
        ];

        let title = format!("Deliveries ({}) • Enter/m to message", deliveries.len());
        let table = Table::new(rows, widths)
            .header(header)
            .block(panel(&title))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .bg(BG_ACCENT)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn draw_footer(&self, f: &mut Frame<'_>, area: Rect) {
        let lines = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.style())])
        } else {
            Line::from(vec![Span::raw("Ready")])
        };
        f.render_widget(Paragraph::new(status_line), lines[0]);

        let help = match (self.input_mode, self.screen()) {
            (InputMode::Normal, Screen::Chat) => {
                "views: 1/2/3 tab | i compose ✍️ | esc dashboard | / command ⌨️ | ? help ❔ | q quit"
            }
            (InputMode::Normal, _) => {
                "views: 1/2/3 tab | j/k move | enter/m message 💬 | i compose ✍️ | / command ⌨️ | ? help ❔ | q quit"
            }
            (InputMode::Compose, _) => "Enter to send ✉️ • Esc to cancel",
            (InputMode::Command, _) => {
                "Up/Down navigate • Tab/Right complete • Enter select/run • Esc cancel"
            }
            (InputMode::Help, _) => "Enter/Esc to close ❔",
        };
        f.render_widget(
            Paragraph::new(Line::from(vec![Span::styled(help, dim())])),
            lines[1],
        );
    }

    fn draw_command_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let width = min(area.width.saturating_sub(10), 80);
        let extra_height = self.suggestions.len().min(6) as u16;
        let popup_area = centered_rect(width, 5 + extra_height, area);
        f.render_widget(Clear, popup_area);
        let inner = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(popup_area);

        let input_block = panel("⌨️ Command");
        let input_area = input_block.inner(inner[0]);
        f.render_widget(input_block, inner[0]);
        f.render_widget(
            Paragraph::new(self.command.as_str()).style(Style::default().bg(BG_PANEL)),
            input_area,
        );
        if input_area.width > 0 {
            let column = (self.command.cursor_column() as u16).min(input_area.width - 1);
            f.set_cursor(input_area.x + column, input_area.y);
        }

        let mut lines: Vec<Line> = vec![Line::from(vec![Span::styled(
            "Suggestions",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )])];
        for (i, s) in self.suggestions.iter().enumerate() {
            let style = if i == self.suggestion_index {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            lines.push(Line::from(vec![
                Span::styled(s.fill.as_str(), style.add_modifier(Modifier::BOLD)),
                Span::raw("  "),
                Span::styled(s.label.as_str(), dim()),
            ]));
        }
        let suggestion_block = Block::default().style(Style::default().bg(BG_PANEL));
        let suggestion_inner = suggestion_block.inner(inner[1]);
        f.render_widget(suggestion_block, inner[1]);
        f.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .style(Style::default().bg(BG_PANEL)),
            suggestion_inner,
        );
    }

    fn draw_help_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let lines = build_help_lines();
        let width = min(area.width.saturating_sub(10), 80);
        let height = min(lines.len() as u16 + 4, area.height.saturating_sub(2)).max(6);
        let popup_area = centered_rect(width, height, area);
        f.render_widget(Clear, popup_area);

        let block = panel("⌨️ Keyboard Reference");
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);
        if inner.width < 3 || inner.height < 3 {
            return;
        }

        let help_lines: Vec<Line> = lines
            .into_iter()
            .map(|(combo, desc)| {
                Line::from(vec![
                    Span::styled(format!("{:<18}", combo), Style::default().fg(Color::Cyan)),
                    Span::raw(desc),
                ])
            })
            .collect();
        f.render_widget(
            Paragraph::new(help_lines)
                .wrap(Wrap { trim: true })
                .style(Style::default().bg(BG_PANEL)),
            inset_rect(inner, 1),
        );
    }
}

fn order_card_lines(delivery: &Delivery) -> Vec<Line<'static>> {
    let label = Style::default().fg(FG_ACCENT).add_modifier(Modifier::BOLD);
    vec![
        Line::from(vec![status_span(delivery.status)]),
        Line::from(vec![
            Span::styled("Order  ", label),
            Span::raw(delivery.order_details.clone()),
        ]),
        Line::from(vec![
            Span::styled("Phone  ", label),
            Span::raw(delivery.customer_phone.clone()),
        ]),
        Line::from(vec![
            Span::styled("Drop   ", label),
            Span::raw(delivery.address.clone()),
        ]),
    ]
}
