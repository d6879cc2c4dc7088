//! Keyboard input handling
//!
//! This module handles:
//! - Key press forwarding (releases and auto-repeat are dropped)
//! - Modifier key tracking (shift, ctrl, alt, meta)
//! - Bevy KeyCode to engine key conversion

use bevy::input::keyboard::KeyboardInput;
use bevy::prelude::*;
use atelier_scene::ViewportInput;
use viewport::{Key, Modifiers, ViewportEvent};

/// Forward key presses to the engine
pub fn forward_keyboard(
    mut key_events: MessageReader<KeyboardInput>,
    key_input: Res<ButtonInput<KeyCode>>,
    mut input: MessageWriter<ViewportInput>,
) {
    let modifiers = build_modifiers(&key_input);

    for event in key_events.read() {
        if !event.state.is_pressed() || event.repeat {
            continue;
        }
        let Some(key) = keycode_to_key(event.key_code) else {
            continue;
        };
        input.write(ViewportInput(ViewportEvent::KeyDown { key, modifiers }));
    }
}

/// Build the current modifier state from Bevy's ButtonInput
pub fn build_modifiers(key_input: &ButtonInput<KeyCode>) -> Modifiers {
    Modifiers {
        shift: key_input.pressed(KeyCode::ShiftLeft) || key_input.pressed(KeyCode::ShiftRight),
        ctrl: key_input.pressed(KeyCode::ControlLeft) || key_input.pressed(KeyCode::ControlRight),
        alt: key_input.pressed(KeyCode::AltLeft) || key_input.pressed(KeyCode::AltRight),
        meta: key_input.pressed(KeyCode::SuperLeft) || key_input.pressed(KeyCode::SuperRight),
    }
}

/// Convert a Bevy KeyCode to an engine key.
///
/// Modifier keys themselves yield `None`; their state travels in `Modifiers`.
pub fn keycode_to_key(key_code: KeyCode) -> Option<Key> {
    let key = match key_code {
        KeyCode::KeyA => Key::Char('a'),
        KeyCode::KeyB => Key::Char('b'),
        KeyCode::KeyC => Key::Char('c'),
        KeyCode::KeyD => Key::Char('d'),
        KeyCode::KeyE => Key::Char('e'),
        KeyCode::KeyF => Key::Char('f'),
        KeyCode::KeyG => Key::Char('g'),
        KeyCode::KeyH => Key::Char('h'),
        KeyCode::KeyI => Key::Char('i'),
        KeyCode::KeyJ => Key::Char('j'),
        KeyCode::KeyK => Key::Char('k'),
        KeyCode::KeyL => Key::Char('l'),
        KeyCode::KeyM => Key::Char('m'),
        KeyCode::KeyN => Key::Char('n'),
        KeyCode::KeyO => Key::Char('o'),
        KeyCode::KeyP => Key::Char('p'),
        KeyCode::KeyQ => Key::Char('q'),
        KeyCode::KeyR => Key::Char('r'),
        KeyCode::KeyS => Key::Char('s'),
        KeyCode::KeyT => Key::Char('t'),
        KeyCode::KeyU => Key::Char('u'),
        KeyCode::KeyV => Key::Char('v'),
        KeyCode::KeyW => Key::Char('w'),
        KeyCode::KeyX => Key::Char('x'),
        KeyCode::KeyY => Key::Char('y'),
        KeyCode::KeyZ => Key::Char('z'),

        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        KeyCode::Escape => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,

        KeyCode::ShiftLeft
        | KeyCode::ShiftRight
        | KeyCode::ControlLeft
        | KeyCode::ControlRight
        | KeyCode::AltLeft
        | KeyCode::AltRight
        | KeyCode::SuperLeft
        | KeyCode::SuperRight => return None,

        other => Key::Named(format!("{:?}", other)),
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_and_named_keys() {
        assert_eq!(keycode_to_key(KeyCode::KeyG), Some(Key::Char('g')));
        assert_eq!(keycode_to_key(KeyCode::NumpadEnter), Some(Key::Enter));
        assert_eq!(keycode_to_key(KeyCode::Delete), Some(Key::Delete));
        assert_eq!(keycode_to_key(KeyCode::ShiftLeft), None);
        assert_eq!(keycode_to_key(KeyCode::F5), Some(Key::Named("F5".to_string())));
    }

    #[test]
    fn test_modifiers_from_either_side() {
        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::ShiftRight);
        keys.press(KeyCode::ControlLeft);
        let modifiers = build_modifiers(&keys);
        assert!(modifiers.shift);
        assert!(modifiers.ctrl);
        assert!(!modifiers.alt);
        assert!(!modifiers.meta);
    }
}
