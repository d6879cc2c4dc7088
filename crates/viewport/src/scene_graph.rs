//! Scene graph collaborator interface and an in-memory implementation.
//!
//! The engine never renders anything itself. Node creation, material swaps,
//! outline helpers and ray queries all go through [`SceneGraph`], which the
//! host implements on top of its renderer. [`MemoryScene`] keeps the same
//! bookkeeping without a renderer; the Bevy host wraps it to get spatial
//! queries, and the engine's tests run against it directly.

use std::collections::HashMap;

use glam::{DMat4, DVec3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::raycast::{ray_aabb_intersection, ray_sphere_intersection};
use crate::types::{
    Aabb, GeometryHandle, MaterialHandle, NodeId, ObjectKind, Primitive, Ray, RayHit, Renderable,
    SceneObject, Transform,
};

/// Emissive tint added to a cloned material to mark the selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissiveOverlay {
    pub color: [f32; 3],
    pub intensity: f32,
}

/// Appearance of the selection bounding-box outline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlineStyle {
    pub color: [f32; 3],
    pub opacity: f32,
}

/// Non-selectable scene furniture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HelperKind {
    /// Ground grid
    Grid,
    /// XYZ orientation gizmo (a group of arrow meshes)
    AxisGizmo,
}

/// Operations the engine needs from the host scene graph
pub trait SceneGraph {
    /// Create a detached node holding a new primitive mesh with its own material
    fn spawn_primitive(&mut self, primitive: Primitive) -> Renderable;

    /// Create a detached node for a non-mesh object (camera, light)
    fn spawn_marker(&mut self, kind: ObjectKind) -> Renderable;

    /// Create a detached node sharing a copy of `source`'s geometry and a copy of `material`
    fn duplicate(&mut self, source: &Renderable, material: Option<MaterialHandle>) -> Renderable;

    /// Create and attach a helper node; helpers are never selectable
    fn spawn_helper(&mut self, kind: HelperKind) -> NodeId;

    /// Attach an object's node to the scene at its transform
    fn add_to_scene(&mut self, object: &SceneObject);

    /// Detach and destroy a node and its descendants along with the geometry
    /// and materials they own
    fn remove_from_scene(&mut self, node: NodeId);

    /// Push a transform to a node
    fn set_transform(&mut self, node: NodeId, transform: &Transform);

    /// Parent of a node, `None` for scene roots and unknown nodes
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Intersect a ray with `roots` and all their descendants, in any order
    fn intersect_ray(&self, ray: &Ray, roots: &[NodeId]) -> Vec<RayHit>;

    /// World-space bounds of a node and its descendants
    fn bounding_box(&self, node: NodeId) -> Option<Aabb>;

    /// Clone `original` with an emissive overlay; `original` is left untouched
    fn highlight_material(
        &mut self,
        original: MaterialHandle,
        overlay: &EmissiveOverlay,
    ) -> MaterialHandle;

    /// Point a node at a material
    fn set_material(&mut self, node: NodeId, material: MaterialHandle);

    /// Drop a material created by `highlight_material`
    fn release_material(&mut self, material: MaterialHandle);

    /// Create and attach a bounding-box outline helper
    fn add_outline(&mut self, bounds: Aabb, style: &OutlineStyle) -> NodeId;
}

/// What a memory node looks like, for intersection and bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeShape {
    /// A primitive mesh, intersected by its shape
    Primitive(Primitive),
    /// An arbitrary mesh, intersected by its local bounds
    Bounds(Aabb),
    /// A group or marker without geometry
    Empty,
    /// A world-space outline box (helper)
    Outline(Aabb),
}

/// One node of the in-memory scene
#[derive(Debug, Clone)]
pub struct MemoryNode {
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub shape: NodeShape,
    pub transform: Transform,
    pub geometry: Option<GeometryHandle>,
    pub material: Option<MaterialHandle>,
    pub in_scene: bool,
}

impl MemoryNode {
    fn detached(shape: NodeShape) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            shape,
            transform: Transform::IDENTITY,
            geometry: None,
            material: None,
            in_scene: false,
        }
    }
}

/// A material known to the in-memory scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialRecord {
    /// Material this one was cloned from
    pub source: Option<MaterialHandle>,
    pub emissive: Option<EmissiveOverlay>,
}

/// Geometry and materials freed by destroying a subtree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Released {
    pub geometry: Vec<GeometryHandle>,
    pub materials: Vec<MaterialHandle>,
}

/// Renderer-free scene graph with real parent/child bookkeeping
#[derive(Debug, Default)]
pub struct MemoryScene {
    nodes: HashMap<NodeId, MemoryNode>,
    materials: HashMap<MaterialHandle, MaterialRecord>,
    geometry_shapes: HashMap<GeometryHandle, NodeShape>,
    next_id: u64,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn insert_node(&mut self, node: MemoryNode) -> NodeId {
        let id = NodeId(self.next());
        self.nodes.insert(id, node);
        id
    }

    fn new_material(&mut self, record: MaterialRecord) -> MaterialHandle {
        let handle = MaterialHandle(self.next());
        self.materials.insert(handle, record);
        handle
    }

    fn new_geometry(&mut self, shape: NodeShape) -> GeometryHandle {
        let handle = GeometryHandle(self.next());
        self.geometry_shapes.insert(handle, shape);
        handle
    }

    pub fn node(&self, node: NodeId) -> Option<&MemoryNode> {
        self.nodes.get(&node)
    }

    /// Whether a node exists and is attached to the scene
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.get(&node).is_some_and(|n| n.in_scene)
    }

    pub fn material(&self, handle: MaterialHandle) -> Option<&MaterialRecord> {
        self.materials.get(&handle)
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn geometry_count(&self) -> usize {
        self.geometry_shapes.len()
    }

    pub fn node_material(&self, node: NodeId) -> Option<MaterialHandle> {
        self.nodes.get(&node).and_then(|n| n.material)
    }

    /// Number of outline helpers currently attached
    pub fn outline_count(&self) -> usize {
        self.nodes
            .values()
            .filter(|n| n.in_scene && matches!(n.shape, NodeShape::Outline(_)))
            .count()
    }

    /// Attached outline boxes, for hosts that draw them
    pub fn outlines(&self) -> impl Iterator<Item = (NodeId, Aabb)> + '_ {
        self.nodes.iter().filter_map(|(id, n)| match n.shape {
            NodeShape::Outline(bounds) if n.in_scene => Some((*id, bounds)),
            _ => None,
        })
    }

    /// Create a detached node with arbitrary local bounds
    pub fn spawn_bounds(&mut self, bounds: Aabb) -> NodeId {
        let shape = NodeShape::Bounds(bounds);
        let geometry = self.new_geometry(shape);
        let mut node = MemoryNode::detached(shape);
        node.geometry = Some(geometry);
        self.insert_node(node)
    }

    /// Parent `child` under `parent`, attaching it to the scene if the parent is attached
    pub fn attach(&mut self, child: NodeId, parent: NodeId) {
        if child == parent || !self.nodes.contains_key(&parent) {
            return;
        }
        self.detach_from_parent(child);
        let parent_in_scene = self.nodes.get(&parent).is_some_and(|n| n.in_scene);
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
            node.in_scene = parent_in_scene;
        } else {
            return;
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(child);
        }
    }

    fn detach_from_parent(&mut self, child: NodeId) {
        let Some(parent) = self.nodes.get(&child).and_then(|n| n.parent) else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.retain(|c| *c != child);
        }
    }

    /// Remove a node and its descendants, dropping the geometry and materials they own
    pub fn destroy(&mut self, root: NodeId) -> Released {
        self.detach_from_parent(root);
        let mut released = Released::default();
        for id in self.subtree(root) {
            let Some(node) = self.nodes.remove(&id) else {
                continue;
            };
            if let Some(geometry) = node.geometry
                && self.geometry_shapes.remove(&geometry).is_some()
            {
                released.geometry.push(geometry);
            }
            if let Some(material) = node.material
                && self.materials.remove(&material).is_some()
            {
                released.materials.push(material);
            }
        }
        released
    }

    /// World matrix of a node, following its parent chain
    pub fn world_matrix(&self, node: NodeId) -> DMat4 {
        let mut matrix = DMat4::IDENTITY;
        let mut current = Some(node);
        while let Some(id) = current {
            let Some(n) = self.nodes.get(&id) else {
                break;
            };
            matrix = n.transform.matrix() * matrix;
            current = n.parent;
        }
        matrix
    }

    fn subtree(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.get(&id) {
                out.push(id);
                stack.extend(node.children.iter().copied());
            }
        }
        out
    }

    fn local_bounds(shape: &NodeShape) -> Option<Aabb> {
        match shape {
            NodeShape::Primitive(p) => Some(p.local_bounds()),
            NodeShape::Bounds(b) => Some(*b),
            NodeShape::Outline(_) | NodeShape::Empty => None,
        }
    }

    fn intersect_node(&self, ray: &Ray, id: NodeId, node: &MemoryNode) -> Option<f64> {
        match node.shape {
            NodeShape::Primitive(Primitive::Sphere) => {
                let matrix = self.world_matrix(id);
                let (scale, _, center) = matrix.to_scale_rotation_translation();
                ray_sphere_intersection(ray, center, scale.max_element())
            }
            NodeShape::Outline(bounds) => ray_aabb_intersection(ray, &bounds),
            ref shape => {
                let local = Self::local_bounds(shape)?;
                ray_aabb_intersection(ray, &local.transformed(&self.world_matrix(id)))
            }
        }
    }
}

impl SceneGraph for MemoryScene {
    fn spawn_primitive(&mut self, primitive: Primitive) -> Renderable {
        let shape = NodeShape::Primitive(primitive);
        let geometry = self.new_geometry(shape);
        let material = self.new_material(MaterialRecord {
            source: None,
            emissive: None,
        });
        let mut node = MemoryNode::detached(shape);
        node.geometry = Some(geometry);
        node.material = Some(material);
        let node = self.insert_node(node);
        Renderable {
            node,
            geometry: Some(geometry),
            material: Some(material),
        }
    }

    fn spawn_marker(&mut self, _kind: ObjectKind) -> Renderable {
        let node = self.insert_node(MemoryNode::detached(NodeShape::Empty));
        Renderable {
            node,
            geometry: None,
            material: None,
        }
    }

    fn duplicate(&mut self, source: &Renderable, material: Option<MaterialHandle>) -> Renderable {
        let shape = source
            .geometry
            .and_then(|g| self.geometry_shapes.get(&g).copied())
            .unwrap_or(NodeShape::Empty);
        let geometry = source.geometry.map(|_| self.new_geometry(shape));
        let material = material.map(|m| {
            let emissive = self.materials.get(&m).and_then(|r| r.emissive);
            self.new_material(MaterialRecord {
                source: Some(m),
                emissive,
            })
        });
        let mut node = MemoryNode::detached(shape);
        node.geometry = geometry;
        node.material = material;
        let node = self.insert_node(node);
        Renderable {
            node,
            geometry,
            material,
        }
    }

    fn spawn_helper(&mut self, kind: HelperKind) -> NodeId {
        match kind {
            HelperKind::Grid => {
                // 20x20 grid lying in the XZ plane
                let mut node = MemoryNode::detached(NodeShape::Bounds(Aabb::new(
                    DVec3::new(-10.0, -1e-3, -10.0),
                    DVec3::new(10.0, 1e-3, 10.0),
                )));
                node.in_scene = true;
                self.insert_node(node)
            }
            HelperKind::AxisGizmo => {
                let mut group = MemoryNode::detached(NodeShape::Empty);
                group.in_scene = true;
                let group = self.insert_node(group);
                // One shaft per axis, 2 units long, offset so it starts at the origin
                for axis in [DVec3::X, DVec3::Y, DVec3::Z] {
                    let half = DVec3::splat(0.02) + axis * 0.98;
                    let shaft = self.spawn_bounds(Aabb::new(-half, half));
                    if let Some(node) = self.nodes.get_mut(&shaft) {
                        node.transform = Transform::from_position(axis);
                    }
                    self.attach(shaft, group);
                }
                group
            }
        }
    }

    fn add_to_scene(&mut self, object: &SceneObject) {
        let id = object.node();
        let children = self.subtree(id);
        for child in children {
            if let Some(node) = self.nodes.get_mut(&child) {
                node.in_scene = true;
            }
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.transform = object.transform;
        }
    }

    fn remove_from_scene(&mut self, node: NodeId) {
        let released = self.destroy(node);
        debug!(
            "MemoryScene: removed node {:?} ({} geometry, {} materials)",
            node,
            released.geometry.len(),
            released.materials.len()
        );
    }

    fn set_transform(&mut self, node: NodeId, transform: &Transform) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.transform = *transform;
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|n| n.parent)
    }

    fn intersect_ray(&self, ray: &Ray, roots: &[NodeId]) -> Vec<RayHit> {
        let mut hits = Vec::new();
        for root in roots {
            for id in self.subtree(*root) {
                let Some(node) = self.nodes.get(&id) else {
                    continue;
                };
                if !node.in_scene {
                    continue;
                }
                if let Some(distance) = self.intersect_node(ray, id, node) {
                    hits.push(RayHit {
                        node: id,
                        distance,
                        point: ray.at(distance),
                    });
                }
            }
        }
        hits
    }

    fn bounding_box(&self, node: NodeId) -> Option<Aabb> {
        let mut result: Option<Aabb> = None;
        for id in self.subtree(node) {
            let Some(n) = self.nodes.get(&id) else {
                continue;
            };
            let Some(local) = Self::local_bounds(&n.shape) else {
                continue;
            };
            let world = local.transformed(&self.world_matrix(id));
            result = Some(match result {
                Some(acc) => Aabb::new(acc.min.min(world.min), acc.max.max(world.max)),
                None => world,
            });
        }
        result
    }

    fn highlight_material(
        &mut self,
        original: MaterialHandle,
        overlay: &EmissiveOverlay,
    ) -> MaterialHandle {
        self.new_material(MaterialRecord {
            source: Some(original),
            emissive: Some(*overlay),
        })
    }

    fn set_material(&mut self, node: NodeId, material: MaterialHandle) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.material = Some(material);
        }
    }

    fn release_material(&mut self, material: MaterialHandle) {
        self.materials.remove(&material);
    }

    fn add_outline(&mut self, bounds: Aabb, _style: &OutlineStyle) -> NodeId {
        let mut node = MemoryNode::detached(NodeShape::Outline(bounds));
        node.in_scene = true;
        self.insert_node(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attached(scene: &mut MemoryScene, primitive: Primitive, transform: Transform) -> SceneObject {
        let renderable = scene.spawn_primitive(primitive);
        let object = SceneObject::new("obj", ObjectKind::Mesh(primitive), renderable)
            .with_transform(transform);
        scene.add_to_scene(&object);
        object
    }

    #[test]
    fn test_detached_nodes_are_not_hit() {
        let mut scene = MemoryScene::new();
        let renderable = scene.spawn_primitive(Primitive::Cube);
        let ray = Ray::new(DVec3::new(0.0, 0.0, 5.0), DVec3::new(0.0, 0.0, -1.0));
        assert!(scene.intersect_ray(&ray, &[renderable.node]).is_empty());
    }

    #[test]
    fn test_hit_follows_transform() {
        let mut scene = MemoryScene::new();
        let object = attached(
            &mut scene,
            Primitive::Cube,
            Transform::from_position(DVec3::new(3.0, 0.0, 0.0)),
        );
        let ray = Ray::new(DVec3::new(3.0, 0.0, 5.0), DVec3::new(0.0, 0.0, -1.0));
        let hits = scene.intersect_ray(&ray, &[object.node()]);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].distance - 4.5).abs() < 1e-9);

        let ray = Ray::new(DVec3::new(0.0, 0.0, 5.0), DVec3::new(0.0, 0.0, -1.0));
        assert!(scene.intersect_ray(&ray, &[object.node()]).is_empty());
    }

    #[test]
    fn test_sphere_uses_exact_shape() {
        let mut scene = MemoryScene::new();
        let object = attached(&mut scene, Primitive::Sphere, Transform::IDENTITY);
        // Passes through the bounding box corner region but misses the sphere
        let ray = Ray::new(DVec3::new(0.9, 0.9, 5.0), DVec3::new(0.0, 0.0, -1.0));
        assert!(scene.intersect_ray(&ray, &[object.node()]).is_empty());
    }

    #[test]
    fn test_children_are_hit_through_their_root() {
        let mut scene = MemoryScene::new();
        let gizmo = scene.spawn_helper(HelperKind::AxisGizmo);
        let ray = Ray::new(DVec3::new(1.0, 0.0, 5.0), DVec3::new(0.0, 0.0, -1.0));
        let hits = scene.intersect_ray(&ray, &[gizmo]);
        assert_eq!(hits.len(), 1);
        assert_eq!(scene.parent(hits[0].node), Some(gizmo));
    }

    #[test]
    fn test_highlight_material_is_a_clone() {
        let mut scene = MemoryScene::new();
        let renderable = scene.spawn_primitive(Primitive::Cube);
        let original = renderable.material.unwrap();
        let overlay = EmissiveOverlay {
            color: [0.4, 0.4, 0.4],
            intensity: 0.4,
        };
        let highlight = scene.highlight_material(original, &overlay);
        assert_ne!(highlight, original);
        assert_eq!(scene.material(highlight).unwrap().source, Some(original));
        assert_eq!(scene.material(original).unwrap().emissive, None);

        scene.release_material(highlight);
        assert!(scene.material(highlight).is_none());
        assert!(scene.material(original).is_some());
    }

    #[test]
    fn test_remove_drops_subtree() {
        let mut scene = MemoryScene::new();
        let gizmo = scene.spawn_helper(HelperKind::AxisGizmo);
        let child = scene.node(gizmo).unwrap().children[0];
        scene.remove_from_scene(gizmo);
        assert!(!scene.contains(gizmo));
        assert!(scene.node(child).is_none());
    }

    #[test]
    fn test_remove_releases_owned_geometry_and_material() {
        let mut scene = MemoryScene::new();
        let object = attached(&mut scene, Primitive::Cube, Transform::IDENTITY);
        let copy = scene.duplicate(&object.renderable, object.renderable.material);
        assert_eq!(scene.material_count(), 2);
        assert_eq!(scene.geometry_count(), 2);

        let released = scene.destroy(object.node());
        assert_eq!(released.geometry, vec![object.renderable.geometry.unwrap()]);
        assert_eq!(released.materials, vec![object.renderable.material.unwrap()]);
        assert_eq!(scene.material_count(), 1);
        assert_eq!(scene.geometry_count(), 1);

        scene.remove_from_scene(copy.node);
        assert_eq!(scene.material_count(), 0);
        assert_eq!(scene.geometry_count(), 0);
        assert_eq!(scene.destroy(copy.node), Released::default());
    }

    #[test]
    fn test_bounding_box_of_scaled_cube() {
        let mut scene = MemoryScene::new();
        let object = attached(
            &mut scene,
            Primitive::Cube,
            Transform {
                scale: DVec3::new(2.0, 1.0, 1.0),
                ..Transform::IDENTITY
            },
        );
        let bounds = scene.bounding_box(object.node()).unwrap();
        assert!((bounds.size() - DVec3::new(2.0, 1.0, 1.0)).length() < 1e-12);
    }
}
