//! Common UI components.
//!
//! This module contains the header bar, line tabs, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::App;
use crate::data::duration::format_age;
use crate::data::HealthStatus;
use crate::ui::Theme;

/// Render the header bar with the displayed line and its health overview.
///
/// Displays: status indicator, line name and position, reading counts by health.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let display = app.display();
    let registry = app.registry();

    let position = registry
        .position(display.line)
        .map(|i| format!("{}/{}", i + 1, registry.len()))
        .unwrap_or_default();

    let mut spans = Vec::new();

    if !display.is_loaded() {
        spans.push(Span::styled(" ○ ", app.theme.muted));
        spans.push(Span::styled(
            format!("{} ", display.line_name),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!("{} │ Loading...", position)));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
        return;
    }

    let mut healthy = 0;
    let mut warning = 0;
    let mut critical = 0;
    let mut unknown = 0;

    for reading in &display.readings {
        match reading.status.health() {
            HealthStatus::Healthy => healthy += 1,
            HealthStatus::Warning => warning += 1,
            HealthStatus::Critical => critical += 1,
            HealthStatus::Unknown => unknown += 1,
        }
    }

    let worst = display
        .readings
        .iter()
        .map(|r| r.status.health())
        .max()
        .unwrap_or(HealthStatus::Healthy);

    spans.push(Span::styled(" ● ", app.theme.health_style(worst)));
    spans.push(Span::styled(
        format!("{} ", display.line_name),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::raw(format!("{} │ ", position)));
    spans.push(Span::styled(
        healthy.to_string(),
        Style::default().fg(app.theme.healthy),
    ));
    spans.push(Span::raw(" ok "));
    spans.push(count_span(warning, HealthStatus::Warning, &app.theme));
    spans.push(Span::raw(" warn "));
    spans.push(count_span(critical, HealthStatus::Critical, &app.theme));
    spans.push(Span::raw(" crit"));
    if unknown > 0 {
        spans.push(Span::raw(" "));
        spans.push(count_span(unknown, HealthStatus::Unknown, &app.theme));
        spans.push(Span::raw(" other"));
    }

    if app.is_switching() {
        let target = registry.name(app.selected_line()).unwrap_or_default();
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            format!("switching to {}...", target),
            app.theme.switching,
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn count_span(count: usize, health: HealthStatus, theme: &Theme) -> Span<'static> {
    if count > 0 {
        Span::styled(count.to_string(), theme.health_style(health))
    } else {
        Span::styled("0", theme.muted)
    }
}

/// Render the line tabs.
///
/// Highlights the line the user selected, which may be ahead of the data.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let registry = app.registry();
    let titles: Vec<Line> = registry
        .iter()
        .map(|(id, name)| Line::from(format!(" {}:{} ", id, name)))
        .collect();

    let selected = registry.position(app.selected_line()).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.line_inactive)
        .highlight_style(app.theme.line_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: data source, time since last update, available controls.
/// Temporary status messages take precedence. Fetch errors are not shown;
/// the last good data stays on screen.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.accent));
        frame.render_widget(paragraph, area);
        return;
    }

    let display = app.display();
    let status = match display.last_updated {
        Some(updated) => format!(
            " {} | Updated {} ago | ←/→:line 1-9:jump ?:help q:quit",
            app.source_description(),
            format_age(updated.elapsed()),
        ),
        None => " Loading... | q:quit".to_string(),
    };

    let paragraph = Paragraph::new(status).style(app.theme.muted);
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard and mouse controls.
///
/// Displayed as a centered modal on top of the readings.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let help_text = vec![
        Line::from(vec![Span::styled("Controls", app.theme.column_header)]),
        Line::from(""),
        Line::from(vec![Span::styled(" Lines", bold)]),
        Line::from("  ← h         Previous line"),
        Line::from("  → l         Next line"),
        Line::from("  1-9         Jump to line"),
        Line::from(""),
        Line::from(vec![Span::styled(" Mouse", bold)]),
        Line::from("  Drag ←/→    Swipe lines"),
        Line::from("  Scroll ←/→  Swipe lines"),
        Line::from(""),
        Line::from(vec![Span::styled(" General", bold)]),
        Line::from("  ?           Toggle help"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled("Press any key to close", app.theme.muted)]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.accent));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 36u16.min(area.width.saturating_sub(4));
    let help_height = 18u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
