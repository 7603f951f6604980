use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// Pointer and keyboard input forwarded by the embedding surface
///
/// Positions are container pixels, origin at the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Single click/tap
    Click {
        position: Point,
        button: MouseButton,
    },
    /// Double click/tap
    DoubleClick { position: Point },
    /// Mouse/finger move
    MouseMove { position: Point },
    /// Keyboard input
    KeyPress {
        key: KeyCode,
        modifiers: KeyModifiers,
    },
}

/// Keyboard key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Escape,
    Enter,
    Backspace,
    Space,
    Tab,
    Other(u32),
}

/// Keyboard modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct KeyModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Mouse button types
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Whether an event was handled
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventHandled {
    Handled,
    NotHandled,
}

impl EventHandled {
    pub fn is_handled(self) -> bool {
        self == EventHandled::Handled
    }
}

impl InputEvent {
    /// Left click at `(x, y)`
    pub fn click(x: f64, y: f64) -> Self {
        InputEvent::Click {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    pub fn double_click(x: f64, y: f64) -> Self {
        InputEvent::DoubleClick {
            position: Point::new(x, y),
        }
    }

    pub fn mouse_move(x: f64, y: f64) -> Self {
        InputEvent::MouseMove {
            position: Point::new(x, y),
        }
    }

    /// Key press without modifiers
    pub fn key(key: KeyCode) -> Self {
        InputEvent::KeyPress {
            key,
            modifiers: KeyModifiers::default(),
        }
    }

    /// Gets the primary position associated with this event, if any
    pub fn position(&self) -> Option<Point> {
        match self {
            InputEvent::Click { position, .. } => Some(*position),
            InputEvent::DoubleClick { position } => Some(*position),
            InputEvent::MouseMove { position } => Some(*position),
            InputEvent::KeyPress { .. } => None,
        }
    }

    /// Checks if this is a mouse/pointer event
    pub fn is_pointer_event(&self) -> bool {
        matches!(
            self,
            InputEvent::Click { .. } | InputEvent::DoubleClick { .. } | InputEvent::MouseMove { .. }
        )
    }

    /// Checks if this is a keyboard event
    pub fn is_keyboard_event(&self) -> bool {
        matches!(self, InputEvent::KeyPress { .. })
    }
}
