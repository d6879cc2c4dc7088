//! Fixed key light and ambient fill for the editor scene

use bevy::light::GlobalAmbientLight;
use bevy::prelude::*;

/// Marker component for the sun directional light
#[derive(Component)]
pub struct SunLight;

/// Direction toward the sun
const SUN_DIRECTION: Vec3 = Vec3::new(5.0, 10.0, 7.5);
const SUN_ILLUMINANCE: f32 = 8_000.0;
const AMBIENT_BRIGHTNESS: f32 = 300.0;

pub struct LightingPlugin;

impl Plugin for LightingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_lighting);
    }
}

fn setup_lighting(mut commands: Commands) {
    // looking_to takes the forward direction; the sun shines along -SUN_DIRECTION
    commands.spawn((
        DirectionalLight {
            illuminance: SUN_ILLUMINANCE,
            shadows_enabled: true,
            ..default()
        },
        Transform::default().looking_to(-SUN_DIRECTION.normalize(), Vec3::Y),
        SunLight,
    ));

    commands.insert_resource(GlobalAmbientLight {
        color: Color::WHITE,
        brightness: AMBIENT_BRIGHTNESS,
        ..default()
    });
}
