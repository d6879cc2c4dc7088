//! Render camera driven by the engine's orbit controller
//!
//! The engine owns the pose; this module only mirrors it onto the
//! `MainCamera` entity each frame.

use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::prelude::*;
use viewport::CameraPose;

use crate::EditorViewport;

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

fn to_vec3(v: glam::DVec3) -> Vec3 {
    Vec3::new(v.x as f32, v.y as f32, v.z as f32)
}

/// Bevy transform for an engine camera pose
pub fn pose_transform(pose: &CameraPose) -> Transform {
    Transform::from_translation(to_vec3(pose.position)).looking_at(to_vec3(pose.look_at), Vec3::Y)
}

/// Spawn the render camera at the engine's current pose
pub fn spawn_main_camera(mut commands: Commands, viewport: Res<EditorViewport>) {
    let camera = viewport.camera();
    let fov = camera.settings().fov_degrees.to_radians() as f32;
    // Reinhard works without the tonemapping LUTs
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection { fov, ..default() }),
        pose_transform(&camera.current_pose()),
        Tonemapping::Reinhard,
        MainCamera,
    ));
}

/// Copy the orbit pose onto the render camera when it changed
pub fn sync_camera(
    viewport: Res<EditorViewport>,
    mut cameras: Query<&mut Transform, With<MainCamera>>,
) {
    if !viewport.is_changed() {
        return;
    }
    let Ok(mut transform) = cameras.single_mut() else {
        return;
    };
    let target = pose_transform(&viewport.camera().current_pose());
    if *transform != target {
        *transform = target;
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec3;

    use super::*;

    #[test]
    fn test_pose_transform_faces_target() {
        let pose = CameraPose {
            position: DVec3::new(0.0, 0.0, 5.0),
            look_at: DVec3::ZERO,
        };
        let transform = pose_transform(&pose);
        assert_eq!(transform.translation, Vec3::new(0.0, 0.0, 5.0));
        assert!((transform.forward().as_vec3() - Vec3::NEG_Z).length() < 1e-5);
    }
}
