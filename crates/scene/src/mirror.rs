//! Scene graph that records every change for the ECS to replay.
//!
//! [`SceneMirror`] answers all engine queries (ray hits, bounds, parents) from
//! an in-memory scene and queues a [`SceneOp`] for each mutation. The
//! `apply_scene_ops` system drains the queue once per frame and creates,
//! updates or despawns the matching Bevy entities and assets.

use std::collections::HashMap;

use viewport::{
    Aabb, EmissiveOverlay, GeometryHandle, HelperKind, MaterialHandle, MemoryScene, NodeId,
    ObjectKind, OutlineStyle, Primitive, Ray, RayHit, Renderable, SceneGraph, SceneObject,
    Transform,
};

/// One scene mutation waiting to be applied to the ECS
#[derive(Debug, Clone, PartialEq)]
pub enum SceneOp {
    CreateMesh {
        geometry: GeometryHandle,
        primitive: Primitive,
    },
    /// A new material; cloned from `source` when set, with an optional emissive tint
    CreateMaterial {
        material: MaterialHandle,
        source: Option<MaterialHandle>,
        emissive: Option<EmissiveOverlay>,
    },
    ReleaseMaterial(MaterialHandle),
    ReleaseMesh(GeometryHandle),
    Spawn {
        node: NodeId,
        kind: ObjectKind,
        geometry: Option<GeometryHandle>,
        material: Option<MaterialHandle>,
        transform: Transform,
    },
    Despawn(NodeId),
    SetTransform(NodeId, Transform),
    SetMaterial(NodeId, MaterialHandle),
}

/// In-memory scene plus the queue of pending ECS updates
#[derive(Debug, Default)]
pub struct SceneMirror {
    scene: MemoryScene,
    ops: Vec<SceneOp>,
    primitives: HashMap<GeometryHandle, Primitive>,
    kinds: HashMap<NodeId, ObjectKind>,
    outline_styles: HashMap<NodeId, OutlineStyle>,
    helpers: Vec<(NodeId, HelperKind)>,
}

impl SceneMirror {
    /// Take every queued op, oldest first
    pub fn take_ops(&mut self) -> Vec<SceneOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn pending_ops(&self) -> &[SceneOp] {
        &self.ops
    }

    pub fn memory(&self) -> &MemoryScene {
        &self.scene
    }

    /// Attached outline boxes with their style
    pub fn outlines(&self) -> impl Iterator<Item = (Aabb, OutlineStyle)> + '_ {
        self.scene.outlines().filter_map(|(node, bounds)| {
            self.outline_styles
                .get(&node)
                .map(|style| (bounds, *style))
        })
    }

    /// Helper furniture currently in the scene
    pub fn helpers(&self) -> &[(NodeId, HelperKind)] {
        &self.helpers
    }

    fn record_material(
        &mut self,
        material: Option<MaterialHandle>,
        source: Option<MaterialHandle>,
        emissive: Option<EmissiveOverlay>,
    ) {
        if let Some(material) = material {
            self.ops.push(SceneOp::CreateMaterial {
                material,
                source,
                emissive,
            });
        }
    }
}

impl SceneGraph for SceneMirror {
    fn spawn_primitive(&mut self, primitive: Primitive) -> Renderable {
        let renderable = self.scene.spawn_primitive(primitive);
        if let Some(geometry) = renderable.geometry {
            self.primitives.insert(geometry, primitive);
            self.ops.push(SceneOp::CreateMesh {
                geometry,
                primitive,
            });
        }
        self.record_material(renderable.material, None, None);
        self.kinds
            .insert(renderable.node, ObjectKind::Mesh(primitive));
        renderable
    }

    fn spawn_marker(&mut self, kind: ObjectKind) -> Renderable {
        let renderable = self.scene.spawn_marker(kind);
        self.kinds.insert(renderable.node, kind);
        renderable
    }

    fn duplicate(&mut self, source: &Renderable, material: Option<MaterialHandle>) -> Renderable {
        let renderable = self.scene.duplicate(source, material);
        let primitive = source
            .geometry
            .and_then(|g| self.primitives.get(&g).copied());
        if let (Some(geometry), Some(primitive)) = (renderable.geometry, primitive) {
            self.primitives.insert(geometry, primitive);
            self.ops.push(SceneOp::CreateMesh {
                geometry,
                primitive,
            });
        }
        let emissive = renderable
            .material
            .and_then(|m| self.scene.material(m))
            .and_then(|record| record.emissive);
        self.record_material(renderable.material, material, emissive);
        if let Some(kind) = self.kinds.get(&source.node).copied() {
            self.kinds.insert(renderable.node, kind);
        }
        renderable
    }

    fn spawn_helper(&mut self, kind: HelperKind) -> NodeId {
        let node = self.scene.spawn_helper(kind);
        self.helpers.push((node, kind));
        node
    }

    fn add_to_scene(&mut self, object: &SceneObject) {
        self.scene.add_to_scene(object);
        self.ops.push(SceneOp::Spawn {
            node: object.node(),
            kind: object.kind,
            geometry: object.renderable.geometry,
            material: object.renderable.material,
            transform: object.transform,
        });
    }

    fn remove_from_scene(&mut self, node: NodeId) {
        let released = self.scene.destroy(node);
        self.helpers.retain(|(n, _)| *n != node);
        // Outlines never get an entity
        if self.outline_styles.remove(&node).is_none() {
            self.kinds.remove(&node);
            self.ops.push(SceneOp::Despawn(node));
        }
        for material in released.materials {
            self.ops.push(SceneOp::ReleaseMaterial(material));
        }
        for geometry in released.geometry {
            self.primitives.remove(&geometry);
            self.ops.push(SceneOp::ReleaseMesh(geometry));
        }
    }

    fn set_transform(&mut self, node: NodeId, transform: &Transform) {
        self.scene.set_transform(node, transform);
        self.ops.push(SceneOp::SetTransform(node, *transform));
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.scene.parent(node)
    }

    fn intersect_ray(&self, ray: &Ray, roots: &[NodeId]) -> Vec<RayHit> {
        self.scene.intersect_ray(ray, roots)
    }

    fn bounding_box(&self, node: NodeId) -> Option<Aabb> {
        self.scene.bounding_box(node)
    }

    fn highlight_material(
        &mut self,
        original: MaterialHandle,
        overlay: &EmissiveOverlay,
    ) -> MaterialHandle {
        let material = self.scene.highlight_material(original, overlay);
        self.record_material(Some(material), Some(original), Some(*overlay));
        material
    }

    fn set_material(&mut self, node: NodeId, material: MaterialHandle) {
        self.scene.set_material(node, material);
        self.ops.push(SceneOp::SetMaterial(node, material));
    }

    fn release_material(&mut self, material: MaterialHandle) {
        self.scene.release_material(material);
        self.ops.push(SceneOp::ReleaseMaterial(material));
    }

    fn add_outline(&mut self, bounds: Aabb, style: &OutlineStyle) -> NodeId {
        let node = self.scene.add_outline(bounds, style);
        self.outline_styles.insert(node, *style);
        node
    }
}
