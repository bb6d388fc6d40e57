use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use pulldown_core::TouchEvent;

use crate::app::{App, Mode};

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    ScrollUp,
    ScrollDown,
    ScrollHalfPageUp,
    ScrollHalfPageDown,
    JumpToTop,
    ToggleHelp,
    ExitMode,
    None,
}

/// Pointer input after mapping a mouse event
#[derive(Debug, Clone)]
pub enum PointerInput {
    /// Left-button press, drag or release, as a single-finger touch
    Touch(TouchEvent),
    /// Wheel notches, positive scrolls the page down
    Wheel(i32),
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App) -> Action {
    if app.mode == Mode::Help {
        // Any key exits help
        return Action::ExitMode;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, KeyModifiers::NONE) => {
            Action::ScrollDown
        }
        (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, KeyModifiers::NONE) => {
            Action::ScrollUp
        }
        (KeyCode::Char('d'), KeyModifiers::CONTROL) => Action::ScrollHalfPageDown,
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => Action::ScrollHalfPageUp,
        (KeyCode::Char('g'), KeyModifiers::NONE) | (KeyCode::Home, KeyModifiers::NONE) => {
            Action::JumpToTop
        }

        (KeyCode::Char('?'), _) => Action::ToggleHelp,
        (KeyCode::Esc, KeyModifiers::NONE) => Action::ExitMode,

        _ => Action::None,
    }
}

/// Map a mouse event onto touch or wheel input
///
/// Rows are scaled by `pixels_per_row` so drag distances line up with the
/// pull geometry, which is expressed in touch units.
pub fn map_mouse_event(mouse: MouseEvent, pixels_per_row: f64) -> Option<PointerInput> {
    let y = mouse.row as f64 * pixels_per_row;
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(PointerInput::Touch(TouchEvent::start(y))),
        MouseEventKind::Drag(MouseButton::Left) => Some(PointerInput::Touch(TouchEvent::moved(y))),
        MouseEventKind::Up(MouseButton::Left) => Some(PointerInput::Touch(TouchEvent::end(y))),
        MouseEventKind::ScrollDown => Some(PointerInput::Wheel(1)),
        MouseEventKind::ScrollUp => Some(PointerInput::Wheel(-1)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulldown_core::TouchPhase;

    fn mouse(kind: MouseEventKind, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column: 10,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_left_drag_maps_to_touch() {
        let Some(PointerInput::Touch(event)) =
            map_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 2), 16.0)
        else {
            panic!("expected touch start");
        };
        assert_eq!(event.phase, TouchPhase::Start);
        assert_eq!(event.primary_y(), Some(32.0));

        let Some(PointerInput::Touch(event)) =
            map_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 10), 16.0)
        else {
            panic!("expected touch move");
        };
        assert_eq!(event.phase, TouchPhase::Move);
        assert_eq!(event.primary_y(), Some(160.0));

        let Some(PointerInput::Touch(event)) =
            map_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 10), 16.0)
        else {
            panic!("expected touch end");
        };
        assert_eq!(event.phase, TouchPhase::End);
    }

    #[test]
    fn test_wheel_and_other_buttons() {
        assert!(matches!(
            map_mouse_event(mouse(MouseEventKind::ScrollDown, 0), 16.0),
            Some(PointerInput::Wheel(1))
        ));
        assert!(matches!(
            map_mouse_event(mouse(MouseEventKind::ScrollUp, 0), 16.0),
            Some(PointerInput::Wheel(-1))
        ));
        assert!(map_mouse_event(mouse(MouseEventKind::Down(MouseButton::Right), 0), 16.0).is_none());
        assert!(map_mouse_event(mouse(MouseEventKind::Moved, 0), 16.0).is_none());
    }
}
