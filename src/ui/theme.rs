//! Colour palette for the dashboard.
//!
//! Two palettes are provided, one per terminal background. Health colours are
//! shared between them; everything else is tuned for contrast.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::HealthStatus;

/// Backgrounds brighter than this luma get the light palette.
const LIGHT_BACKGROUND_LUMA: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct Theme {
    /// Tabs, help frame and transient status messages.
    pub accent: Color,
    pub border: Color,
    pub border_type: BorderType,

    pub healthy: Color,
    pub warning: Color,
    pub critical: Color,
    /// Statuses the dashboard cannot classify.
    pub unknown: Color,

    /// Parameter / Value / Status header row.
    pub column_header: Style,
    /// Reading values.
    pub value: Style,
    /// Header hint while the selected line has no data yet.
    pub switching: Style,
    /// Tab of the selected line.
    pub line_active: Style,
    pub line_inactive: Style,
    /// Secondary text: loading placeholders, the status bar.
    pub muted: Style,
}

impl Theme {
    /// Palette for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            accent: Color::Cyan,
            border: Color::Gray,
            border_type: BorderType::Rounded,
            healthy: Color::Green,
            warning: Color::Yellow,
            critical: Color::Red,
            unknown: Color::Magenta,
            column_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            value: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            switching: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
            line_active: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            line_inactive: Style::default().fg(Color::Gray),
            muted: Style::default().fg(Color::DarkGray),
        }
    }

    /// Palette for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            accent: Color::Blue,
            border: Color::DarkGray,
            border_type: BorderType::Rounded,
            healthy: Color::Green,
            warning: Color::Yellow,
            critical: Color::Red,
            unknown: Color::Magenta,
            column_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            value: Style::default().fg(Color::Black).add_modifier(Modifier::BOLD),
            switching: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::ITALIC),
            line_active: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            line_inactive: Style::default().fg(Color::DarkGray),
            muted: Style::default().fg(Color::Gray),
        }
    }

    /// Pick a palette for a measured background luma, dark when unknown.
    pub fn for_background(luma: Option<f32>) -> Self {
        match luma {
            Some(luma) if luma > LIGHT_BACKGROUND_LUMA => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Query the terminal background and pick a palette.
    pub fn auto_detect() -> Self {
        Self::for_background(terminal_light::luma().ok())
    }

    pub fn health_color(&self, health: HealthStatus) -> Color {
        match health {
            HealthStatus::Healthy => self.healthy,
            HealthStatus::Unknown => self.unknown,
            HealthStatus::Warning => self.warning,
            HealthStatus::Critical => self.critical,
        }
    }

    /// Style for a status cell. Critical readings are bold.
    pub fn health_style(&self, health: HealthStatus) -> Style {
        let style = Style::default().fg(self.health_color(health));
        if health == HealthStatus::Critical {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }
}
