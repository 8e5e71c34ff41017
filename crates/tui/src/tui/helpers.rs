use std::cmp::min;

use chrono::{DateTime, Local, Utc};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::model::{BadgeColor, Delivery, DeliveryStatus, GeoPoint};

pub const BG_BASE: Color = Color::Rgb(14, 17, 23);
pub const BG_PANEL: Color = Color::Rgb(22, 26, 34);
pub const BG_ACCENT: Color = Color::Rgb(32, 37, 47);
pub const FG_ACCENT: Color = Color::Rgb(120, 161, 255);

const MAP_MIN_PADDING: f64 = 0.002;

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = min(width, area.width);
    let h = min(height, area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(w)) / 2,
        y: area.y + (area.height.saturating_sub(h)) / 2,
        width: w,
        height: h,
    }
}

pub fn inset_rect(area: Rect, padding: u16) -> Rect {
    if area.width == 0 || area.height == 0 {
        return area;
    }
    let px = padding.min(area.width / 2);
    let py = padding.min(area.height / 2);
    Rect {
        x: area.x + px,
        y: area.y + py,
        width: area.width.saturating_sub(px * 2),
        height: area.height.saturating_sub(py * 2),
    }
}

pub fn badge_color(color: BadgeColor) -> Color {
    match color {
        BadgeColor::Yellow => Color::Yellow,
        BadgeColor::Purple => Color::Magenta,
        BadgeColor::Green => Color::Green,
        BadgeColor::Gray => Color::Gray,
    }
}

pub fn status_span(status: DeliveryStatus) -> Span<'static> {
    Span::styled(
        format!("{} {}", status.icon(), status.label()),
        Style::default()
            .fg(badge_color(status.color()))
            .add_modifier(Modifier::BOLD),
    )
}

/// Avatar letter for a customer.
pub fn initial(name: &str) -> String {
    name.chars()
        .find(|ch| ch.is_alphanumeric())
        .map(|ch| ch.to_uppercase().to_string())
        .unwrap_or_else(|| String::from("?"))
}

pub fn format_clock(value: &DateTime<Utc>) -> String {
    let local: DateTime<Local> = (*value).into();
    local.format("%H:%M").to_string()
}

/// Canvas bounds as `(x = longitude, y = latitude)` covering the driver and
/// every drop-off, padded so markers never sit on the border.
pub fn map_bounds(driver: GeoPoint, deliveries: &[Delivery]) -> ([f64; 2], [f64; 2]) {
    let points = std::iter::once(driver).chain(deliveries.iter().map(Delivery::location));
    let (mut min_lng, mut max_lng) = (driver.longitude, driver.longitude);
    let (mut min_lat, mut max_lat) = (driver.latitude, driver.latitude);
    for point in points {
        min_lng = min_lng.min(point.longitude);
        max_lng = max_lng.max(point.longitude);
        min_lat = min_lat.min(point.latitude);
        max_lat = max_lat.max(point.latitude);
    }
    let pad_lng = ((max_lng - min_lng) * 0.15).max(MAP_MIN_PADDING);
    let pad_lat = ((max_lat - min_lat) * 0.15).max(MAP_MIN_PADDING);
    (
        [min_lng - pad_lng, max_lng + pad_lng],
        [min_lat - pad_lat, max_lat + pad_lat],
    )
}

pub fn build_help_lines() -> Vec<(&'static str, &'static str)> {
    vec![
        ("1 / 2 / 3", "Dashboard, Messages, Deliveries"),
        ("Tab / Shift+Tab", "Cycle views"),
        ("j / k or ↓ / ↑", "Move selection"),
        ("Enter / m", "Chat with the selected customer"),
        ("i", "Compose a message (Messages view)"),
        ("Enter (composing)", "Send the message"),
        ("Esc", "Cancel compose, close overlays, back to Dashboard"),
        ("/", "Command palette"),
        ("?", "Toggle this help overlay"),
        ("q", "Quit"),
    ]
}

pub fn accent_title(text: &str) -> Line<'static> {
    Line::from(vec![Span::styled(
        text.to_owned(),
        Style::default().fg(FG_ACCENT).add_modifier(Modifier::BOLD),
    )])
}
