//! Input adapter - turns Bevy window input into engine `ViewportEvent`s
//!
//! Positions are logical window pixels, which is also what the viewport
//! rectangle is measured in.

use bevy::input::InputSystems;
use bevy::prelude::*;
use atelier_scene::ViewportInput;
use viewport::{ViewportEvent, ViewportRect};

mod keyboard;
mod mouse;

pub use keyboard::{build_modifiers, keycode_to_key};
pub use mouse::{convert_scroll_delta, pointer_button};

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MouseState>()
            // Run in PreUpdate so the engine sees this frame's input in Update
            .add_systems(
                PreUpdate,
                (track_viewport_rect, mouse::track_mouse_position)
                    .chain()
                    .after(InputSystems),
            )
            // Same-frame input reaches the engine as buttons, then wheel, then keys
            .add_systems(
                PreUpdate,
                (
                    mouse::forward_mouse_buttons,
                    mouse::forward_mouse_scroll,
                    keyboard::forward_keyboard,
                )
                    .chain()
                    .after(mouse::track_mouse_position),
            );

        info!("Input plugin initialized");
    }
}

/// Last known cursor position in logical window pixels
#[derive(Resource, Default)]
pub struct MouseState {
    pub window_x: f32,
    pub window_y: f32,
}

/// Send a resize whenever the window's logical size changes
fn track_viewport_rect(
    windows: Query<&Window>,
    mut last_size: Local<Option<Vec2>>,
    mut input: MessageWriter<ViewportInput>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let size = Vec2::new(window.width(), window.height());
    if *last_size == Some(size) {
        return;
    }
    *last_size = Some(size);
    debug!("Viewport resized to {}x{}", size.x, size.y);
    input.write(ViewportInput(ViewportEvent::Resize(ViewportRect::from_size(
        size.x as f64,
        size.y as f64,
    ))));
}
