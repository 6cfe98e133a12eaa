use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::App;
use crate::lines::{LineId, Swipe};

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Dispatch a terminal event to the app
pub fn handle_event(app: &mut App, event: Event) {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        // Terminal will redraw on next iteration
        _ => {}
    }
}

/// Handle a key event
///
/// Only presses count; release and repeat reports (Windows, kitty keyboard
/// protocol) are ignored so one keystroke moves one line.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),

        // Swipes
        KeyCode::Left | KeyCode::Char('h') => app.swipe(Swipe::TowardLower),
        KeyCode::Right | KeyCode::Char('l') => app.swipe(Swipe::TowardHigher),

        // Direct line access
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(digit) = c.to_digit(10) {
                app.select_line(LineId::from(digit));
            }
        }

        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        // Horizontal scroll (trackpads, tilt wheels)
        MouseEventKind::ScrollLeft => app.swipe(Swipe::TowardLower),
        MouseEventKind::ScrollRight => app.swipe(Swipe::TowardHigher),

        // Drag to swipe
        MouseEventKind::Down(MouseButton::Left) => {
            app.swipe_tracker.press(mouse.column, mouse.row);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if let Some(swipe) = app.swipe_tracker.release(mouse.column, mouse.row) {
                app.swipe(swipe);
            }
        }

        _ => {}
    }
}
