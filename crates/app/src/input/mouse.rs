//! Mouse input handling
//!
//! This module handles:
//! - Cursor position tracking and pointer-move forwarding
//! - Button press/release forwarding
//! - Wheel forwarding with line deltas converted to pixels

use bevy::input::mouse::{MouseButtonInput, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::CursorMoved;
use atelier_scene::ViewportInput;
use viewport::{PointerButton, ViewportEvent};

use super::MouseState;
use super::keyboard::build_modifiers;

/// Pixels per scroll line
const LINE_HEIGHT: f32 = 40.0;

/// Track the cursor and forward one pointer move per frame
/// This system MUST run before forward_mouse_buttons and forward_mouse_scroll
pub fn track_mouse_position(
    mut mouse_state: ResMut<MouseState>,
    mut cursor_events: MessageReader<CursorMoved>,
    key_input: Res<ButtonInput<KeyCode>>,
    mut input: MessageWriter<ViewportInput>,
) {
    // Use the LAST event position as that's the most recent
    let Some(event) = cursor_events.read().last() else {
        return;
    };
    mouse_state.window_x = event.position.x;
    mouse_state.window_y = event.position.y;

    input.write(ViewportInput(ViewportEvent::PointerMove {
        x: mouse_state.window_x as f64,
        y: mouse_state.window_y as f64,
        modifiers: build_modifiers(&key_input),
    }));
}

pub fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

/// Forward mouse button events at the tracked position
/// Runs after track_mouse_position so MouseState is up-to-date
pub fn forward_mouse_buttons(
    mut button_events: MessageReader<MouseButtonInput>,
    mouse_state: Res<MouseState>,
    key_input: Res<ButtonInput<KeyCode>>,
    mut input: MessageWriter<ViewportInput>,
) {
    let x = mouse_state.window_x as f64;
    let y = mouse_state.window_y as f64;

    for event in button_events.read() {
        let Some(button) = pointer_button(event.button) else {
            continue;
        };
        let viewport_event = if event.state.is_pressed() {
            ViewportEvent::PointerDown {
                x,
                y,
                button,
                modifiers: build_modifiers(&key_input),
            }
        } else {
            ViewportEvent::PointerUp { x, y, button }
        };
        input.write(ViewportInput(viewport_event));
    }
}

/// Wheel delta in pixels, positive toward the user (wheel down)
pub fn convert_scroll_delta(unit: MouseScrollUnit, y: f32) -> f64 {
    let pixels = match unit {
        MouseScrollUnit::Line => y * LINE_HEIGHT,
        MouseScrollUnit::Pixel => y,
    };
    // Bevy reports wheel-up as positive
    -pixels as f64
}

/// Forward scroll events to the engine
pub fn forward_mouse_scroll(
    mut scroll_events: MessageReader<MouseWheel>,
    mut input: MessageWriter<ViewportInput>,
) {
    for event in scroll_events.read() {
        let delta_y = convert_scroll_delta(event.unit, event.y);
        if delta_y != 0.0 {
            input.write(ViewportInput(ViewportEvent::Wheel { delta_y }));
        }
    }
}
