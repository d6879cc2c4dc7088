//! Pointer picking against the registry's selectable set.

use glam::DVec2;
use tracing::debug;

use crate::camera::OrbitCamera;
use crate::registry::Registry;
use crate::scene_graph::SceneGraph;
use crate::types::{NodeId, ObjectId, ViewportRect};

/// Object under the pointer, or `None` on a miss.
///
/// Hits on helper geometry, or on anything parented under a helper, are
/// skipped by node identity. A hit on a descendant of an object picks that
/// object.
pub fn pick(
    x: f64,
    y: f64,
    rect: &ViewportRect,
    camera: &OrbitCamera,
    registry: &Registry,
    scene: &impl SceneGraph,
) -> Option<ObjectId> {
    let ndc = rect.to_ndc(x, y)?;
    let roots = registry.selectable_nodes();
    if roots.is_empty() {
        return None;
    }
    let ray = camera.ray_through(ndc, rect.aspect());
    let mut hits = scene.intersect_ray(&ray, &roots);
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    let picked = hits
        .iter()
        .find_map(|hit| owning_object(hit.node, registry, scene));
    debug!("Picker: {} hits, picked {:?}", hits.len(), picked);
    picked
}

/// Walk up from `node` to the registered object that owns it
fn owning_object(node: NodeId, registry: &Registry, scene: &impl SceneGraph) -> Option<ObjectId> {
    let mut current = Some(node);
    while let Some(id) = current {
        if registry.is_helper(id) {
            return None;
        }
        if let Some(owner) = registry.owner_of(id) {
            let selectable = registry.get(owner).is_some_and(|o| o.selectable);
            return selectable.then(|| owner.clone());
        }
        current = scene.parent(id);
    }
    None
}

/// Distinguishes a click from a camera drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickTracker {
    threshold: f64,
    down_at: Option<DVec2>,
}

impl ClickTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            down_at: None,
        }
    }

    pub fn press(&mut self, pointer: DVec2) {
        self.down_at = Some(pointer);
    }

    /// Whether the press that ends here moved less than the threshold on each axis
    pub fn release(&mut self, pointer: DVec2) -> bool {
        self.down_at
            .take()
            .is_some_and(|start| (pointer - start).abs().max_element() < self.threshold)
    }

    pub fn is_pressed(&self) -> bool {
        self.down_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use atelier_config::{CameraSettings, HighlightSettings};
    use glam::DVec3;

    use super::*;
    use crate::camera::CameraState;
    use crate::notify::Outbox;
    use crate::scene_graph::{HelperKind, MemoryScene};
    use crate::types::{Aabb, ObjectKind, Primitive, SceneObject, Transform};

    const RECT: ViewportRect = ViewportRect {
        left: 0.0,
        top: 0.0,
        width: 800.0,
        height: 600.0,
    };

    /// Camera on +Z looking at the origin
    fn front_camera() -> OrbitCamera {
        let mut camera = OrbitCamera::new(CameraSettings::default());
        camera.set_state(CameraState {
            target: DVec3::ZERO,
            distance: 10.0,
            theta: std::f64::consts::FRAC_PI_2,
            phi: std::f64::consts::FRAC_PI_2,
        });
        camera
    }

    struct World {
        registry: Registry,
        scene: MemoryScene,
        outbox: Outbox,
    }

    impl World {
        fn new() -> Self {
            Self {
                registry: Registry::new(&HighlightSettings::default()),
                scene: MemoryScene::new(),
                outbox: Outbox::default(),
            }
        }

        fn cube(&mut self, id: &str, position: DVec3) -> SceneObject {
            let renderable = self.scene.spawn_primitive(Primitive::Cube);
            let object = SceneObject::new(id, ObjectKind::Mesh(Primitive::Cube), renderable)
                .with_transform(Transform::from_position(position));
            self.registry
                .add(object.clone(), &mut self.scene, &mut self.outbox)
                .unwrap();
            object
        }

        fn pick_center(&self) -> Option<ObjectId> {
            pick(400.0, 300.0, &RECT, &front_camera(), &self.registry, &self.scene)
        }
    }

    #[test]
    fn test_picks_nearest() {
        let mut world = World::new();
        world.cube("far", DVec3::new(0.0, 0.0, -3.0));
        world.cube("near", DVec3::new(0.0, 0.0, 2.0));
        assert_eq!(world.pick_center(), Some(ObjectId::from("near")));
    }

    #[test]
    fn test_miss_and_empty_return_none() {
        let mut world = World::new();
        assert_eq!(world.pick_center(), None);
        world.cube("side", DVec3::new(6.0, 0.0, 0.0));
        assert_eq!(world.pick_center(), None);
    }

    #[test]
    fn test_helper_in_front_is_skipped() {
        let mut world = World::new();
        world.cube("target", DVec3::ZERO);
        let shield = world.cube("shield", DVec3::new(0.0, 0.0, 3.0));
        world.registry.register_helper(shield.node());
        assert_eq!(world.pick_center(), Some(ObjectId::from("target")));
    }

    #[test]
    fn test_descendant_of_helper_is_skipped() {
        let mut world = World::new();
        let back = world.cube("back", DVec3::new(0.0, 0.0, -3.0));
        world.cube("middle", DVec3::ZERO);
        // A helper parented under "back" but sitting in front of "middle",
        // with a cube-sized child of its own
        let unit = Aabb::new(DVec3::splat(-0.5), DVec3::splat(0.5));
        let helper = world.scene.spawn_bounds(unit);
        world.scene.attach(helper, back.node());
        world
            .scene
            .set_transform(helper, &Transform::from_position(DVec3::new(0.0, 0.0, 6.0)));
        let grandchild = world.scene.spawn_bounds(unit);
        world.scene.attach(grandchild, helper);
        world
            .scene
            .set_transform(grandchild, &Transform::from_position(DVec3::new(0.0, 0.0, 0.5)));
        world.registry.register_helper(helper);

        assert_eq!(world.pick_center(), Some(ObjectId::from("middle")));
    }

    #[test]
    fn test_helper_roots_are_never_candidates() {
        let mut world = World::new();
        let gizmo = world.scene.spawn_helper(HelperKind::AxisGizmo);
        world.registry.register_helper(gizmo);
        world.scene.spawn_helper(HelperKind::Grid);
        assert_eq!(world.pick_center(), None);
    }

    #[test]
    fn test_child_hit_picks_owner() {
        let mut world = World::new();
        let parent = world.cube("parent", DVec3::new(0.0, 3.0, 0.0));
        let child = world
            .scene
            .spawn_bounds(Aabb::new(DVec3::splat(-0.5), DVec3::splat(0.5)));
        world.scene.attach(child, parent.node());
        world
            .scene
            .set_transform(child, &Transform::from_position(DVec3::new(0.0, -3.0, 0.0)));
        assert_eq!(world.pick_center(), Some(ObjectId::from("parent")));
    }

    #[test]
    fn test_selection_outline_is_not_pickable() {
        let mut world = World::new();
        let target = world.cube("target", DVec3::ZERO);
        world
            .registry
            .select(Some(&target.id), &mut world.scene, &mut world.outbox);
        // The outline encloses the cube; picking still resolves to the cube
        assert_eq!(world.pick_center(), Some(target.id));
    }

    #[test]
    fn test_empty_rect_picks_nothing() {
        let mut world = World::new();
        world.cube("target", DVec3::ZERO);
        let rect = ViewportRect::from_size(0.0, 0.0);
        assert_eq!(
            pick(0.0, 0.0, &rect, &front_camera(), &world.registry, &world.scene),
            None
        );
    }

    #[test]
    fn test_click_threshold() {
        let mut tracker = ClickTracker::new(3.0);
        tracker.press(DVec2::new(10.0, 10.0));
        assert!(tracker.release(DVec2::new(12.0, 11.0)));

        tracker.press(DVec2::new(10.0, 10.0));
        assert!(!tracker.release(DVec2::new(14.0, 10.0)));

        // 2.5 px on both axes is still a click even though the straight-line distance is 3.5
        tracker.press(DVec2::new(10.0, 10.0));
        assert!(tracker.release(DVec2::new(12.5, 12.5)));

        tracker.press(DVec2::new(10.0, 10.0));
        assert!(!tracker.release(DVec2::new(7.0, 11.0)));

        assert!(!tracker.release(DVec2::new(10.0, 10.0)));
    }
}
