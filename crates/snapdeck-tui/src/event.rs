use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEventKind};

/// Event handler for terminal events
pub struct EventHandler {
    wheel_notch_delta: f64,
}

impl EventHandler {
    pub fn new(wheel_notch_delta: f64) -> Self {
        Self { wheel_notch_delta }
    }

    /// Poll with a custom timeout (used for animation frames and timer deadlines)
    pub fn next_with_timeout(&self, timeout: Duration) -> Result<Option<AppEvent>> {
        if event::poll(timeout)? {
            Ok(self.translate(event::read()?))
        } else {
            Ok(Some(AppEvent::Tick))
        }
    }

    fn translate(&self, event: Event) -> Option<AppEvent> {
        match event {
            // Only handle key press events, ignore release events
            // (crossterm 0.27+ sends release events on some systems)
            Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollDown => Some(AppEvent::Wheel(self.wheel_notch_delta)),
                MouseEventKind::ScrollUp => Some(AppEvent::Wheel(-self.wheel_notch_delta)),
                _ => None,
            },
            Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
            _ => None,
        }
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// Mouse wheel notch; positive scrolls towards later sections
    Wheel(f64),
    /// Terminal was resized
    Resize(u16, u16),
    /// Tick event for periodic updates
    Tick,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers, MouseEvent};

    fn mouse(kind: MouseEventKind) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_wheel_notches_map_to_signed_delta() {
        let handler = EventHandler::new(120.0);
        assert!(matches!(
            handler.translate(mouse(MouseEventKind::ScrollDown)),
            Some(AppEvent::Wheel(d)) if d == 120.0
        ));
        assert!(matches!(
            handler.translate(mouse(MouseEventKind::ScrollUp)),
            Some(AppEvent::Wheel(d)) if d == -120.0
        ));
        assert!(handler.translate(mouse(MouseEventKind::Moved)).is_none());
    }

    #[test]
    fn test_key_release_is_dropped() {
        let handler = EventHandler::new(100.0);
        let mut key = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
        assert!(matches!(
            handler.translate(Event::Key(key)),
            Some(AppEvent::Key(_))
        ));
        key.kind = KeyEventKind::Release;
        assert!(handler.translate(Event::Key(key)).is_none());
    }
}
