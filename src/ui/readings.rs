//! Readings table rendering.
//!
//! Shows every parameter of the displayed line in payload order, with the
//! status coloured by its health.

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::Style,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::data::{ParamStatus, Reading};

/// Render the readings of the displayed line.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let display = app.display();

    let title = if display.is_loaded() {
        format!(" {} ({} parameters) ", display.line_name, display.readings.len())
    } else {
        format!(" {} ", display.line_name)
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if display.readings.is_empty() {
        let msg = if display.is_loaded() {
            "No parameters reported"
        } else {
            "Waiting for data..."
        };
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(app.theme.muted)
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Parameter"),
        Cell::from("Value"),
        Cell::from("Status"),
    ])
    .height(1)
    .style(app.theme.column_header);

    let rows: Vec<Row> = display.readings.iter().map(|r| reading_row(r, app)).collect();

    let widths = [
        Constraint::Fill(3), // Parameter
        Constraint::Fill(2), // Value
        Constraint::Min(8),  // Status
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}

fn reading_row<'a>(reading: &'a Reading, app: &App) -> Row<'a> {
    let style = app.theme.health_style(reading.status.health());
    Row::new(vec![
        Cell::from(reading.name.as_str()),
        Cell::from(reading.value.to_string()).style(app.theme.value),
        Cell::from(status_text(&reading.status)).style(style),
    ])
}

/// Labels are shown as sent; numeric and boolean codes as their health symbol.
fn status_text(status: &ParamStatus) -> String {
    match status {
        ParamStatus::Label(label) => label.clone(),
        other => other.health().symbol().to_string(),
    }
}
