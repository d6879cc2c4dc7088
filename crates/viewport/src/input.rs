//! Host-neutral input events and the viewport key bindings.
//!
//! Hosts translate their native pointer/wheel/keyboard events into
//! [`ViewportEvent`]s. Key identifiers follow the web `KeyboardEvent.key`
//! naming ("g", "Escape", "Enter", ...), which every host adapter can produce.

use serde::{Deserialize, Serialize};

use crate::tool::{ToolEvent, ToolMode};
use crate::types::{Axis, ViewportRect};

/// Pointer button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Modifier key state at the time of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };
}

/// A decoded key identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    /// A printable character, lowercased
    Char(char),
    Escape,
    Enter,
    Delete,
    Backspace,
    /// Anything else, kept verbatim
    Named(String),
}

impl Key {
    /// Parse a web `KeyboardEvent.key` string
    pub fn from_web(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Key::Escape,
            "Enter" => Key::Enter,
            "Delete" | "Del" => Key::Delete,
            "Backspace" => Key::Backspace,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c.to_ascii_lowercase()),
                    _ => Key::Named(key.to_string()),
                }
            }
        }
    }
}

/// One input event for the viewport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewportEvent {
    PointerDown {
        x: f64,
        y: f64,
        button: PointerButton,
        modifiers: Modifiers,
    },
    PointerMove {
        x: f64,
        y: f64,
        modifiers: Modifiers,
    },
    PointerUp {
        x: f64,
        y: f64,
        button: PointerButton,
    },
    /// Signed wheel delta; positive is wheel-down
    Wheel { delta_y: f64 },
    KeyDown { key: Key, modifiers: Modifiers },
    /// The rendering surface moved or changed size
    Resize(ViewportRect),
}

/// Tool event bound to a key, if any
pub fn key_binding(key: &Key, modifiers: &Modifiers) -> Option<ToolEvent> {
    let event = match key {
        Key::Delete | Key::Backspace => ToolEvent::Delete,
        Key::Escape => ToolEvent::Cancel,
        Key::Enter => ToolEvent::Confirm,
        Key::Char('d') if modifiers.shift => ToolEvent::Duplicate,
        Key::Char('a') if modifiers.shift => ToolEvent::AddMenu,
        Key::Char('g') => ToolEvent::Begin(ToolMode::Grab),
        Key::Char('r') => ToolEvent::Begin(ToolMode::Rotate),
        Key::Char('s') => ToolEvent::Begin(ToolMode::Scale),
        Key::Char('x') => ToolEvent::Constrain(Axis::X),
        Key::Char('y') => ToolEvent::Constrain(Axis::Y),
        Key::Char('z') => ToolEvent::Constrain(Axis::Z),
        _ => return None,
    };
    Some(event)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_web_keys() {
        assert_eq!(Key::from_web("G"), Key::Char('g'));
        assert_eq!(Key::from_web("Escape"), Key::Escape);
        assert_eq!(Key::from_web("Backspace"), Key::Backspace);
        assert_eq!(Key::from_web("F5"), Key::Named("F5".to_string()));
    }

    #[test]
    fn test_bindings() {
        let none = Modifiers::NONE;
        assert_eq!(
            key_binding(&Key::Char('g'), &none),
            Some(ToolEvent::Begin(ToolMode::Grab))
        );
        assert_eq!(
            key_binding(&Key::Char('z'), &none),
            Some(ToolEvent::Constrain(Axis::Z))
        );
        assert_eq!(
            key_binding(&Key::Char('d'), &Modifiers::SHIFT),
            Some(ToolEvent::Duplicate)
        );
        assert_eq!(key_binding(&Key::Char('d'), &none), None);
        assert_eq!(
            key_binding(&Key::Char('a'), &Modifiers::SHIFT),
            Some(ToolEvent::AddMenu)
        );
        assert_eq!(key_binding(&Key::Backspace, &none), Some(ToolEvent::Delete));
        assert_eq!(key_binding(&Key::Named("Tab".into()), &none), None);
    }

    #[test]
    fn test_shift_does_not_block_tool_keys() {
        // Uppercase "G" from a held Shift still starts grab
        assert_eq!(
            key_binding(&Key::from_web("G"), &Modifiers::SHIFT),
            Some(ToolEvent::Begin(ToolMode::Grab))
        );
    }
}
