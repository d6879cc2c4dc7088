//! Replays queued scene ops onto Bevy entities, meshes and materials

use std::collections::HashMap;
use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;
use viewport::{EmissiveOverlay, GeometryHandle, MaterialHandle, NodeId, ObjectKind, Primitive};

use crate::mirror::SceneOp;
use crate::EditorViewport;

/// Links an entity to its engine node
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneNode(pub NodeId);

/// Camera and light objects; drawn as gizmos, no mesh
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneMarker(pub ObjectKind);

/// Engine handles to their Bevy counterparts
#[derive(Resource, Default)]
pub struct SceneAssets {
    entities: HashMap<NodeId, Entity>,
    meshes: HashMap<GeometryHandle, Handle<Mesh>>,
    materials: HashMap<MaterialHandle, Handle<StandardMaterial>>,
}

impl SceneAssets {
    pub fn entity(&self, node: NodeId) -> Option<Entity> {
        self.entities.get(&node).copied()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }
}

/// Engine transform (f64, Euler XYZ) to a Bevy transform
pub fn to_bevy_transform(transform: &viewport::Transform) -> Transform {
    let p = transform.position;
    let r = transform.rotation;
    let s = transform.scale;
    Transform {
        translation: Vec3::new(p.x as f32, p.y as f32, p.z as f32),
        rotation: Quat::from_euler(EulerRot::XYZ, r.x as f32, r.y as f32, r.z as f32),
        scale: Vec3::new(s.x as f32, s.y as f32, s.z as f32),
    }
}

/// Mesh whose extents match the engine's pick bounds for the primitive
pub fn primitive_mesh(primitive: Primitive) -> Mesh {
    match primitive {
        Primitive::Cube => Cuboid::new(1.0, 1.0, 1.0).into(),
        Primitive::Sphere => Sphere::new(1.0).mesh().uv(32, 16),
        Primitive::Cylinder => Cylinder::new(1.0, 2.0).into(),
        Primitive::Plane => Plane3d::new(Vec3::Z, Vec2::ONE).into(),
        // Ring in the XY plane
        Primitive::Torus => {
            Mesh::from(Torus::new(0.6, 1.4)).rotated_by(Quat::from_rotation_x(FRAC_PI_2))
        }
        Primitive::Cone => Cone::new(1.0, 2.0).into(),
    }
}

/// Base color for a fresh material, spread around the hue wheel
fn palette_color(material: MaterialHandle) -> Color {
    let hue = (material.0 * 47 % 360) as f32;
    Color::hsl(hue, 0.6, 0.55)
}

fn emissive_tint(overlay: &EmissiveOverlay) -> LinearRgba {
    let [r, g, b] = overlay.color;
    LinearRgba::rgb(
        r * overlay.intensity,
        g * overlay.intensity,
        b * overlay.intensity,
    )
}

fn build_material(
    material: MaterialHandle,
    source: Option<&StandardMaterial>,
    emissive: Option<&EmissiveOverlay>,
) -> StandardMaterial {
    let mut built = match source {
        Some(source) => source.clone(),
        None => StandardMaterial {
            base_color: palette_color(material),
            perceptual_roughness: 0.5,
            ..default()
        },
    };
    if let Some(overlay) = emissive {
        built.emissive = emissive_tint(overlay);
    }
    built
}

/// Drain the mirror's op queue into the ECS
pub fn apply_scene_ops(
    mut commands: Commands,
    mut viewport: ResMut<EditorViewport>,
    mut assets: ResMut<SceneAssets>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let ops = viewport.scene_mut().take_ops();
    if ops.is_empty() {
        return;
    }
    debug!("Scene sync: applying {} ops", ops.len());

    for op in ops {
        match op {
            SceneOp::CreateMesh {
                geometry,
                primitive,
            } => {
                let handle = meshes.add(primitive_mesh(primitive));
                assets.meshes.insert(geometry, handle);
            }
            SceneOp::CreateMaterial {
                material,
                source,
                emissive,
            } => {
                let source_material = source
                    .and_then(|s| assets.materials.get(&s))
                    .and_then(|h| materials.get(h));
                let built = build_material(material, source_material, emissive.as_ref());
                let handle = materials.add(built);
                assets.materials.insert(material, handle);
            }
            SceneOp::ReleaseMaterial(material) => {
                // Dropping the last strong handle frees the asset
                assets.materials.remove(&material);
            }
            SceneOp::ReleaseMesh(geometry) => {
                assets.meshes.remove(&geometry);
            }
            SceneOp::Spawn {
                node,
                kind,
                geometry,
                material,
                transform,
            } => {
                let mut entity = commands.spawn((
                    SceneNode(node),
                    to_bevy_transform(&transform),
                    Visibility::default(),
                ));
                if let Some(mesh) = geometry.and_then(|g| assets.meshes.get(&g)) {
                    entity.insert(Mesh3d(mesh.clone()));
                }
                if let Some(handle) = material.and_then(|m| assets.materials.get(&m)) {
                    entity.insert(MeshMaterial3d(handle.clone()));
                }
                if !kind.is_mesh() {
                    entity.insert(SceneMarker(kind));
                }
                let id = entity.id();
                assets.entities.insert(node, id);
            }
            SceneOp::Despawn(node) => {
                if let Some(entity) = assets.entities.remove(&node) {
                    commands.entity(entity).despawn();
                }
            }
            SceneOp::SetTransform(node, transform) => {
                if let Some(entity) = assets.entities.get(&node) {
                    commands
                        .entity(*entity)
                        .insert(to_bevy_transform(&transform));
                }
            }
            SceneOp::SetMaterial(node, material) => {
                let entity = assets.entities.get(&node);
                let handle = assets.materials.get(&material);
                if let (Some(entity), Some(handle)) = (entity, handle) {
                    commands
                        .entity(*entity)
                        .insert(MeshMaterial3d(handle.clone()));
                } else {
                    warn!("Scene sync: no entity or material for {:?}", node);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec3;
    use viewport::EulerRotation;

    use super::*;

    #[test]
    fn test_transform_conversion() {
        let transform = viewport::Transform {
            position: DVec3::new(1.0, -2.0, 3.5),
            rotation: EulerRotation::new(0.0, FRAC_PI_2 as f64, 0.0),
            scale: DVec3::new(2.0, 2.0, 2.0),
        };
        let converted = to_bevy_transform(&transform);
        assert_eq!(converted.translation, Vec3::new(1.0, -2.0, 3.5));
        assert_eq!(converted.scale, Vec3::splat(2.0));
        // +X rotated a quarter turn about Y points at -Z
        let x = converted.rotation * Vec3::X;
        assert!((x - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_highlight_material_keeps_base_color() {
        let source = StandardMaterial {
            base_color: Color::srgb(0.1, 0.2, 0.3),
            ..default()
        };
        let overlay = EmissiveOverlay {
            color: [1.0, 0.5, 0.0],
            intensity: 0.5,
        };
        let built = build_material(MaterialHandle(9), Some(&source), Some(&overlay));
        assert_eq!(built.base_color, source.base_color);
        assert_eq!(built.emissive, LinearRgba::rgb(0.5, 0.25, 0.0));
    }

    #[test]
    fn test_fresh_material_has_no_emissive() {
        let built = build_material(MaterialHandle(1), None, None);
        assert_eq!(built.emissive, StandardMaterial::default().emissive);
    }
}
