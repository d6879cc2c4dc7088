//! Immediate-mode drawing for helper geometry, selection outlines and markers

use std::f32::consts::FRAC_PI_2;

use bevy::gizmos::gizmos::Gizmos;
use bevy::math::Isometry3d;
use bevy::prelude::*;
use viewport::{Aabb, HelperKind, ObjectKind, OutlineStyle};

use crate::sync::SceneMarker;
use crate::EditorViewport;

const GRID_CELLS: u32 = 20;
const AXIS_LENGTH: f32 = 2.0;

fn to_vec3(v: glam::DVec3) -> Vec3 {
    Vec3::new(v.x as f32, v.y as f32, v.z as f32)
}

fn outline_color(style: &OutlineStyle) -> Color {
    let [r, g, b] = style.color;
    Color::srgba(r, g, b, style.opacity)
}

/// Transform whose unit cube covers `bounds`
fn outline_transform(bounds: &Aabb) -> Transform {
    Transform::from_translation(to_vec3(bounds.center())).with_scale(to_vec3(bounds.size()))
}

/// Draw the grid and axis gizmo if present, plus every selection outline
pub fn draw_scene_helpers(viewport: Res<EditorViewport>, mut gizmos: Gizmos) {
    let mirror = viewport.scene();
    for (_, kind) in mirror.helpers() {
        match kind {
            HelperKind::Grid => {
                // Grid gizmos lie in XY; tip it onto the ground plane
                gizmos.grid(
                    Isometry3d::from_rotation(Quat::from_rotation_x(FRAC_PI_2)),
                    UVec2::splat(GRID_CELLS),
                    Vec2::splat(1.0),
                    Color::srgba(0.5, 0.5, 0.5, 0.5),
                );
            }
            HelperKind::AxisGizmo => {
                gizmos.line(Vec3::ZERO, Vec3::X * AXIS_LENGTH, Color::srgb(0.9, 0.2, 0.2));
                gizmos.line(Vec3::ZERO, Vec3::Y * AXIS_LENGTH, Color::srgb(0.2, 0.9, 0.2));
                gizmos.line(Vec3::ZERO, Vec3::Z * AXIS_LENGTH, Color::srgb(0.2, 0.2, 0.9));
            }
        }
    }

    for (bounds, style) in mirror.outlines() {
        gizmos.cube(outline_transform(&bounds), outline_color(&style));
    }
}

/// Camera and light objects have no mesh; draw a small glyph in their place
pub fn draw_markers(markers: Query<(&GlobalTransform, &SceneMarker)>, mut gizmos: Gizmos) {
    for (transform, marker) in markers.iter() {
        let position = transform.translation();
        match marker.0 {
            ObjectKind::Camera => {
                gizmos.cube(
                    Transform::from_translation(position).with_scale(Vec3::new(0.4, 0.3, 0.3)),
                    Color::srgb(0.8, 0.8, 0.8),
                );
                gizmos.line(
                    position,
                    position + transform.forward().as_vec3() * 0.5,
                    Color::srgb(0.8, 0.8, 0.8),
                );
            }
            ObjectKind::Light => {
                gizmos.sphere(
                    Isometry3d::from_translation(position),
                    0.2,
                    Color::srgb(1.0, 0.9, 0.4),
                );
            }
            ObjectKind::Mesh(_) | ObjectKind::CustomMesh => {}
        }
    }
}
