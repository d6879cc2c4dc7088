//! Input event types for mouse and keyboard forwarded by a UI layer.

use serde::{Deserialize, Serialize};

/// Mouse input events, in viewport client pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MouseEvent {
    Move {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    ButtonDown {
        button: MouseButton,
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    ButtonUp { button: MouseButton, x: f64, y: f64 },
    Scroll { delta_x: f64, delta_y: f64, x: f64, y: f64 },
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Keyboard input event. `key` uses web `KeyboardEvent.key` names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyboardEvent {
    pub key: String,
    pub pressed: bool,
    pub modifiers: Modifiers,
}

/// Keyboard modifier keys state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Any forwarded input event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    Mouse(MouseEvent),
    Keyboard(KeyboardEvent),
}
