//! Atelier - Bevy desktop host for the viewport interaction engine

use atelier_config::{DEFAULT_HEIGHT, DEFAULT_WIDTH, DisplayConfig};
use atelier_scene::ScenePlugin;
use bevy::prelude::*;
use bevy::window::WindowResolution;

mod config;
mod input;
mod ui_link;

use config::{AtelierConfig, load_viewport_settings};

fn main() {
    // Parse configuration from environment
    let config = AtelierConfig::default();
    let viewport_settings = load_viewport_settings();

    info!("Starting Atelier with {:?} UI link", config.ui_link);

    // Display configuration - single source of truth for window size
    let display_config = DisplayConfig::default();

    let window_config = Window {
        title: "Atelier".into(),
        resolution: WindowResolution::new(DEFAULT_WIDTH, DEFAULT_HEIGHT),
        present_mode: bevy::window::PresentMode::AutoVsync,
        ..default()
    };

    let mut app = App::new();

    // ScenePlugin and UiLinkPlugin read these while building
    app.insert_resource(config)
        .insert_resource(display_config)
        .insert_resource(viewport_settings);

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(window_config),
                ..default()
            })
            .set(bevy::log::LogPlugin {
                level: bevy::log::Level::INFO,
                ..default()
            }),
    );

    app.add_plugins(ScenePlugin)
        .add_plugins(input::InputPlugin)
        .add_plugins(ui_link::UiLinkPlugin)
        .run();
}
