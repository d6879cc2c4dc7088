//! The viewport context: one owned object holding the registry, camera, tool
//! and scene graph, fed by the neutral input stream.

use atelier_config::ViewportSettings;
use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::camera::OrbitCamera;
use crate::error::ViewportError;
use crate::input::{key_binding, Key, Modifiers, PointerButton, ViewportEvent};
use crate::notify::{Notification, Outbox, TransformPhase};
use crate::picker::{pick, ClickTracker};
use crate::registry::Registry;
use crate::scene_graph::{HelperKind, SceneGraph};
use crate::tool::{
    AxisConstraint, IgnoreReason, ToolContext, ToolEvent, ToolMode, ToolState, TransformTool,
    Transition,
};
use crate::types::{ObjectId, ObjectKind, Primitive, SceneObject, Transform, ViewportRect};

/// Non-mesh objects that can be added to the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerKind {
    Camera,
    Light,
}

impl MarkerKind {
    fn kind(self) -> ObjectKind {
        match self {
            MarkerKind::Camera => ObjectKind::Camera,
            MarkerKind::Light => ObjectKind::Light,
        }
    }

    fn label(self) -> &'static str {
        match self {
            MarkerKind::Camera => "camera",
            MarkerKind::Light => "light",
        }
    }
}

/// Snapshot of the viewport for status displays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportStats {
    pub object_count: usize,
    pub selected: Option<ObjectId>,
    pub tool: ToolMode,
    pub axis: AxisConstraint,
}

/// Interaction engine context
pub struct Viewport<S> {
    scene: S,
    registry: Registry,
    camera: OrbitCamera,
    tool: TransformTool,
    settings: ViewportSettings,
    rect: ViewportRect,
    /// Last known pointer position
    pointer: DVec2,
    /// Pointer position at the previous camera drag step, while the primary button is held
    drag: Option<DVec2>,
    click: ClickTracker,
    outbox: Outbox,
    next_id: u64,
}

impl<S: SceneGraph> Viewport<S> {
    pub fn new(scene: S, settings: ViewportSettings) -> Self {
        Self {
            scene,
            registry: Registry::new(&settings.highlight),
            camera: OrbitCamera::new(settings.camera.clone()),
            tool: TransformTool::new(settings.tools.sensitivity),
            click: ClickTracker::new(settings.tools.click_threshold),
            settings,
            rect: ViewportRect::from_size(0.0, 0.0),
            pointer: DVec2::ZERO,
            drag: None,
            outbox: Outbox::default(),
            next_id: 0,
        }
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// Direct camera access for scripted moves (UI buttons, remote commands)
    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn tool_state(&self) -> &ToolState {
        self.tool.state()
    }

    pub fn settings(&self) -> &ViewportSettings {
        &self.settings
    }

    pub fn rect(&self) -> &ViewportRect {
        &self.rect
    }

    pub fn pointer(&self) -> DVec2 {
        self.pointer
    }

    /// Take every notification queued since the last call
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.outbox.drain()
    }

    /// Process one input event to completion.
    ///
    /// Returns the tool transition when the event reached the transform tool.
    pub fn handle(&mut self, event: ViewportEvent) -> Option<Transition> {
        match event {
            ViewportEvent::PointerDown {
                x,
                y,
                button,
                modifiers: _,
            } => {
                self.pointer = DVec2::new(x, y);
                if self.tool.state().is_active() || button != PointerButton::Primary {
                    return None;
                }
                self.drag = Some(self.pointer);
                self.click.press(self.pointer);
                None
            }
            ViewportEvent::PointerMove { x, y, modifiers } => {
                self.pointer = DVec2::new(x, y);
                if self.tool.state().is_active() {
                    return Some(self.send_tool(ToolEvent::PointerMoved(self.pointer)));
                }
                if let Some(last) = self.drag.replace(self.pointer) {
                    let delta = self.pointer - last;
                    if modifiers.shift {
                        self.camera.pan(delta.x, delta.y);
                    } else {
                        self.camera.rotate(delta.x, delta.y);
                    }
                }
                None
            }
            ViewportEvent::PointerUp { x, y, button } => {
                self.pointer = DVec2::new(x, y);
                self.drag = None;
                if self.tool.state().is_active() {
                    self.click.release(self.pointer);
                    return Some(self.send_tool(ToolEvent::Confirm));
                }
                if self.click.release(self.pointer) && button == PointerButton::Primary {
                    self.click_select();
                }
                None
            }
            ViewportEvent::Wheel { delta_y } => {
                self.camera.zoom(delta_y);
                None
            }
            ViewportEvent::KeyDown { key, modifiers } => Some(self.handle_key(&key, &modifiers)),
            ViewportEvent::Resize(rect) => {
                debug!("Viewport: resized to {}x{}", rect.width, rect.height);
                self.rect = rect;
                None
            }
        }
    }

    /// Dispatch a key press to the transform tool
    pub fn handle_key(&mut self, key: &Key, modifiers: &Modifiers) -> Transition {
        match key_binding(key, modifiers) {
            Some(event) => self.send_tool(event),
            None => Transition::Ignored(IgnoreReason::Unbound),
        }
    }

    fn send_tool(&mut self, event: ToolEvent) -> Transition {
        let ctx = ToolContext {
            selection: self.registry.current().map(|o| (&o.id, &o.transform)),
            pointer: self.pointer,
        };
        let transition = self.tool.transition(event, ctx);
        self.apply(&transition);
        transition
    }

    fn apply(&mut self, transition: &Transition) {
        match transition {
            Transition::Started { mode, .. } => {
                self.outbox.push(Notification::ToolChanged {
                    mode: *mode,
                    axis: AxisConstraint::Free,
                });
            }
            Transition::AxisChanged {
                axis,
                object,
                transform,
            } => {
                self.outbox.push(Notification::ToolChanged {
                    mode: self.tool.state().mode(),
                    axis: *axis,
                });
                self.write_transform(object, *transform, TransformPhase::Live);
            }
            Transition::Updated { object, transform } => {
                self.write_transform(object, *transform, TransformPhase::Live);
            }
            Transition::Committed { object, transform } => {
                self.write_transform(object, *transform, TransformPhase::Committed);
                self.push_tool_idle();
            }
            Transition::Cancelled { object, transform } => {
                self.write_transform(object, *transform, TransformPhase::Cancelled);
                self.push_tool_idle();
            }
            Transition::Abandoned { .. } => self.push_tool_idle(),
            Transition::DeleteRequested { object } => {
                self.outbox
                    .push(Notification::DeleteRequested { id: object.clone() });
                self.delete_selected();
            }
            Transition::DuplicateRequested { object } => {
                self.outbox
                    .push(Notification::DuplicateRequested { id: object.clone() });
                self.duplicate_selected();
            }
            Transition::AddMenuRequested => self.outbox.push(Notification::AddMenuRequested),
            Transition::Ignored(reason) => debug!("Viewport: input ignored ({:?})", reason),
        }
    }

    fn write_transform(&mut self, id: &ObjectId, transform: Transform, phase: TransformPhase) {
        if self.registry.set_transform(id, transform, &mut self.scene) {
            self.outbox.push(Notification::TransformChanged {
                id: id.clone(),
                transform,
                phase,
            });
        }
    }

    fn push_tool_idle(&mut self) {
        self.outbox.push(Notification::ToolChanged {
            mode: ToolMode::Idle,
            axis: AxisConstraint::Free,
        });
    }

    /// End a gesture whose object lost the selection
    fn settle_tool(&mut self) {
        if let Some(transition) = self.tool.abandon_if_stale(self.registry.current_id()) {
            self.apply(&transition);
        }
    }

    fn click_select(&mut self) {
        let picked = pick(
            self.pointer.x,
            self.pointer.y,
            &self.rect,
            &self.camera,
            &self.registry,
            &self.scene,
        );
        self.registry
            .select(picked.as_ref(), &mut self.scene, &mut self.outbox);
        self.settle_tool();
    }

    /// Select an object by id, or clear the selection
    pub fn select(&mut self, id: Option<&ObjectId>) -> Result<(), ViewportError> {
        if !self.registry.select(id, &mut self.scene, &mut self.outbox) {
            if let Some(id) = id {
                return Err(ViewportError::UnknownObject(id.clone()));
            }
        }
        self.settle_tool();
        Ok(())
    }

    fn allocate_id(&mut self, prefix: &str) -> ObjectId {
        loop {
            self.next_id += 1;
            let id = ObjectId::new(format!("{}_{}", prefix, self.next_id));
            if !self.registry.contains(&id) {
                return id;
            }
        }
    }

    /// Where a new object goes: next to a selected mesh, else `position`, else the origin
    fn spawn_position(&self, position: Option<DVec3>) -> DVec3 {
        match self.registry.current() {
            Some(selected) if selected.kind.is_mesh() => {
                selected.transform.position + DVec3::X * self.settings.tools.spawn_offset
            }
            _ => position.unwrap_or(DVec3::ZERO),
        }
    }

    /// Add a primitive mesh and select it
    pub fn add_primitive(
        &mut self,
        primitive: Primitive,
        name: Option<String>,
        position: Option<DVec3>,
    ) -> Result<ObjectId, ViewportError> {
        let id = match name {
            Some(name) => ObjectId::new(name),
            None => self.allocate_id(primitive.label()),
        };
        if self.registry.contains(&id) {
            return Err(ViewportError::DuplicateObject(id));
        }
        let transform = Transform::from_position(self.spawn_position(position));
        let renderable = self.scene.spawn_primitive(primitive);
        let object = SceneObject::new(id.clone(), ObjectKind::Mesh(primitive), renderable)
            .with_transform(transform);
        self.insert_and_select(object)?;
        info!("Viewport: added {:?} '{}'", primitive, id);
        Ok(id)
    }

    /// Add a camera or light marker at `position` and select it
    pub fn add_marker(
        &mut self,
        marker: MarkerKind,
        name: Option<String>,
        position: DVec3,
    ) -> Result<ObjectId, ViewportError> {
        let id = match name {
            Some(name) => ObjectId::new(name),
            None => self.allocate_id(marker.label()),
        };
        if self.registry.contains(&id) {
            return Err(ViewportError::DuplicateObject(id));
        }
        let renderable = self.scene.spawn_marker(marker.kind());
        let object = SceneObject::new(id.clone(), marker.kind(), renderable)
            .with_transform(Transform::from_position(position));
        self.insert_and_select(object)?;
        Ok(id)
    }

    fn insert_and_select(&mut self, object: SceneObject) -> Result<(), ViewportError> {
        let id = object.id.clone();
        let node = object.node();
        if let Err(err) = self.registry.add(object, &mut self.scene, &mut self.outbox) {
            self.scene.remove_from_scene(node);
            return Err(err);
        }
        self.registry
            .select(Some(&id), &mut self.scene, &mut self.outbox);
        self.settle_tool();
        Ok(())
    }

    /// Copy the selected mesh next to itself and select the copy
    pub fn duplicate_selected(&mut self) -> Option<ObjectId> {
        let source = self.registry.current()?.clone();
        if !source.kind.is_mesh() {
            debug!("Viewport: '{}' is not a mesh, not duplicating", source.id);
            return None;
        }
        let id = self.allocate_id("copy");
        // The registry keeps the pre-highlight material on the object
        let renderable = self
            .scene
            .duplicate(&source.renderable, source.renderable.material);
        let mut transform = source.transform;
        transform.position.x += self.settings.tools.duplicate_offset;
        let object = SceneObject::new(id.clone(), source.kind, renderable).with_transform(transform);
        match self.insert_and_select(object) {
            Ok(()) => {
                info!("Viewport: duplicated '{}' as '{}'", source.id, id);
                Some(id)
            }
            Err(err) => {
                warn!("Viewport: duplicate failed: {}", err);
                None
            }
        }
    }

    /// Remove the selected object
    pub fn delete_selected(&mut self) -> Option<ObjectId> {
        let id = self.registry.current_id()?.clone();
        self.delete(&id).ok()?;
        Some(id)
    }

    /// Remove an object by id
    pub fn delete(&mut self, id: &ObjectId) -> Result<(), ViewportError> {
        if !self.registry.remove(id, &mut self.scene, &mut self.outbox) {
            return Err(ViewportError::UnknownObject(id.clone()));
        }
        self.settle_tool();
        Ok(())
    }

    /// Direct transform edit from a property panel.
    ///
    /// Returns `Ok(false)` when a gesture is running on that object; the edit is dropped.
    pub fn set_transform(
        &mut self,
        id: &ObjectId,
        transform: Transform,
    ) -> Result<bool, ViewportError> {
        if !self.registry.contains(id) {
            return Err(ViewportError::UnknownObject(id.clone()));
        }
        if self
            .tool
            .state()
            .gesture()
            .is_some_and(|g| &g.object == id)
        {
            debug!("Viewport: ignoring edit of '{}' during a gesture", id);
            return Ok(false);
        }
        self.write_transform(id, transform, TransformPhase::Edited);
        Ok(true)
    }

    pub fn reset_camera(&mut self) {
        self.camera.reset();
    }

    pub fn stats(&self) -> ViewportStats {
        ViewportStats {
            object_count: self.registry.len(),
            selected: self.registry.current_id().cloned(),
            tool: self.tool.state().mode(),
            axis: self.tool.state().axis(),
        }
    }

    /// Grid, axis gizmo, a selected cube and a scene camera
    pub fn populate_default_scene(&mut self) -> Result<(), ViewportError> {
        for helper in [HelperKind::Grid, HelperKind::AxisGizmo] {
            let node = self.scene.spawn_helper(helper);
            self.registry.register_helper(node);
        }

        let renderable = self.scene.spawn_marker(ObjectKind::Camera);
        let camera = SceneObject::new("camera", ObjectKind::Camera, renderable)
            .with_transform(Transform::from_position(DVec3::new(0.0, 0.0, 5.0)));
        self.registry
            .add(camera, &mut self.scene, &mut self.outbox)?;

        let renderable = self.scene.spawn_primitive(Primitive::Cube);
        let cube = SceneObject::new("cube", ObjectKind::Mesh(Primitive::Cube), renderable);
        self.insert_and_select(cube)?;
        info!("Viewport: default scene ready");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene_graph::MemoryScene;

    fn viewport() -> Viewport<MemoryScene> {
        let mut viewport = Viewport::new(MemoryScene::new(), ViewportSettings::default());
        viewport.handle(ViewportEvent::Resize(ViewportRect::from_size(800.0, 600.0)));
        viewport.populate_default_scene().unwrap();
        viewport.drain_notifications();
        viewport
    }

    fn key(viewport: &mut Viewport<MemoryScene>, k: &str) -> Option<Transition> {
        viewport.handle(ViewportEvent::KeyDown {
            key: Key::from_web(k),
            modifiers: Modifiers::NONE,
        })
    }

    fn shift_key(viewport: &mut Viewport<MemoryScene>, k: &str) -> Option<Transition> {
        viewport.handle(ViewportEvent::KeyDown {
            key: Key::from_web(k),
            modifiers: Modifiers::SHIFT,
        })
    }

    fn move_to(viewport: &mut Viewport<MemoryScene>, x: f64, y: f64) -> Option<Transition> {
        viewport.handle(ViewportEvent::PointerMove {
            x,
            y,
            modifiers: Modifiers::NONE,
        })
    }

    fn click(viewport: &mut Viewport<MemoryScene>, x: f64, y: f64) {
        viewport.handle(ViewportEvent::PointerDown {
            x,
            y,
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
        });
        viewport.handle(ViewportEvent::PointerUp {
            x,
            y,
            button: PointerButton::Primary,
        });
    }

    fn cube_transform(viewport: &Viewport<MemoryScene>) -> Transform {
        viewport
            .registry()
            .get(&ObjectId::from("cube"))
            .unwrap()
            .transform
    }

    #[test]
    fn test_default_scene() {
        let viewport = viewport();
        let stats = viewport.stats();
        assert_eq!(stats.object_count, 2);
        assert_eq!(stats.selected, Some(ObjectId::from("cube")));
        assert_eq!(stats.tool, ToolMode::Idle);
        assert_eq!(viewport.scene().outline_count(), 1);
    }

    #[test]
    fn test_click_selects_and_empty_click_deselects() {
        let mut viewport = viewport();
        click(&mut viewport, 5.0, 5.0);
        assert_eq!(viewport.stats().selected, None);

        click(&mut viewport, 400.0, 300.0);
        assert_eq!(viewport.stats().selected, Some(ObjectId::from("cube")));
    }

    #[test]
    fn test_drag_orbits_instead_of_selecting() {
        let mut viewport = viewport();
        viewport.select(None).unwrap();
        let theta = viewport.camera().state().theta;

        viewport.handle(ViewportEvent::PointerDown {
            x: 400.0,
            y: 300.0,
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
        });
        move_to(&mut viewport, 440.0, 300.0);
        viewport.handle(ViewportEvent::PointerUp {
            x: 440.0,
            y: 300.0,
            button: PointerButton::Primary,
        });

        assert!((viewport.camera().state().theta - (theta + 0.2)).abs() < 1e-9);
        assert_eq!(viewport.stats().selected, None);
    }

    #[test]
    fn test_shift_drag_pans() {
        let mut viewport = viewport();
        viewport.handle(ViewportEvent::PointerDown {
            x: 100.0,
            y: 100.0,
            button: PointerButton::Primary,
            modifiers: Modifiers::SHIFT,
        });
        viewport.handle(ViewportEvent::PointerMove {
            x: 200.0,
            y: 100.0,
            modifiers: Modifiers::SHIFT,
        });
        assert!(viewport.camera().state().target.length() > 0.5);
    }

    #[test]
    fn test_grab_gesture_through_events() {
        let mut viewport = viewport();
        move_to(&mut viewport, 400.0, 300.0);
        key(&mut viewport, "g");
        key(&mut viewport, "x");
        move_to(&mut viewport, 450.0, 300.0);
        assert!((cube_transform(&viewport).position.x - 0.5).abs() < 1e-12);

        let theta = viewport.camera().state().theta;
        let transition = viewport.handle(ViewportEvent::PointerUp {
            x: 450.0,
            y: 300.0,
            button: PointerButton::Primary,
        });
        assert!(matches!(transition, Some(Transition::Committed { .. })));
        // Tool moves never orbit the camera
        assert_eq!(viewport.camera().state().theta, theta);
        assert_eq!(viewport.stats().tool, ToolMode::Idle);
    }

    #[test]
    fn test_escape_cancels_exactly_and_notifies() {
        let mut viewport = viewport();
        let before = cube_transform(&viewport);
        move_to(&mut viewport, 400.0, 300.0);
        key(&mut viewport, "r");
        move_to(&mut viewport, 523.0, 211.0);
        key(&mut viewport, "Escape");
        assert_eq!(cube_transform(&viewport), before);

        let notes = viewport.drain_notifications();
        assert_eq!(
            notes.first(),
            Some(&Notification::ToolChanged {
                mode: ToolMode::Rotate,
                axis: AxisConstraint::Free
            })
        );
        assert!(notes.contains(&Notification::TransformChanged {
            id: ObjectId::from("cube"),
            transform: before,
            phase: TransformPhase::Cancelled,
        }));
    }

    #[test]
    fn test_delete_key_mid_gesture_removes_and_ends_gesture() {
        let mut viewport = viewport();
        key(&mut viewport, "s");
        move_to(&mut viewport, 500.0, 300.0);
        key(&mut viewport, "Delete");

        assert!(viewport.registry().get(&ObjectId::from("cube")).is_none());
        assert!(!viewport.tool_state().is_active());
        assert_eq!(viewport.scene().outline_count(), 0);
        let notes = viewport.drain_notifications();
        assert!(notes.contains(&Notification::DeleteRequested {
            id: ObjectId::from("cube")
        }));
        assert!(notes.contains(&Notification::ObjectRemoved {
            id: ObjectId::from("cube")
        }));
    }

    #[test]
    fn test_keys_without_selection_do_nothing() {
        let mut viewport = viewport();
        viewport.select(None).unwrap();
        viewport.drain_notifications();
        assert_eq!(
            key(&mut viewport, "g"),
            Some(Transition::Ignored(IgnoreReason::NoSelection))
        );
        assert_eq!(
            key(&mut viewport, "Delete"),
            Some(Transition::Ignored(IgnoreReason::NoSelection))
        );
        assert_eq!(
            key(&mut viewport, "q"),
            Some(Transition::Ignored(IgnoreReason::Unbound))
        );
        assert!(viewport.drain_notifications().is_empty());
        assert_eq!(viewport.stats().object_count, 2);
    }

    #[test]
    fn test_shift_d_duplicates_with_original_material() {
        let mut viewport = viewport();
        let original = viewport
            .registry()
            .get(&ObjectId::from("cube"))
            .unwrap()
            .renderable
            .material
            .unwrap();
        shift_key(&mut viewport, "D");

        let copy = viewport.registry().current().unwrap().clone();
        assert!(copy.id.as_str().starts_with("copy_"));
        assert_eq!(copy.transform.position, DVec3::new(1.0, 0.0, 0.0));
        let record = viewport
            .scene()
            .material(copy.renderable.material.unwrap())
            .unwrap();
        assert_eq!(record.source, Some(original));
        assert!(record.emissive.is_none());
        assert_eq!(viewport.scene().outline_count(), 1);
    }

    #[test]
    fn test_duplicate_delete_cycles_keep_resource_counts() {
        let mut viewport = viewport();
        let cube = ObjectId::from("cube");
        let materials = viewport.scene().material_count();
        let geometry = viewport.scene().geometry_count();

        for _ in 0..100 {
            viewport.select(Some(&cube)).unwrap();
            shift_key(&mut viewport, "D");
            assert_eq!(viewport.stats().object_count, 3);
            key(&mut viewport, "Delete");
            assert_eq!(viewport.stats().object_count, 2);
        }
        viewport.select(Some(&cube)).unwrap();

        assert_eq!(viewport.scene().material_count(), materials);
        assert_eq!(viewport.scene().geometry_count(), geometry);
        assert_eq!(viewport.scene().outline_count(), 1);
    }

    #[test]
    fn test_non_mesh_is_not_duplicated() {
        let mut viewport = viewport();
        viewport.select(Some(&ObjectId::from("camera"))).unwrap();
        assert_eq!(viewport.duplicate_selected(), None);
        assert_eq!(viewport.stats().object_count, 2);
    }

    #[test]
    fn test_add_primitive_next_to_selection() {
        let mut viewport = viewport();
        let id = viewport
            .add_primitive(Primitive::Sphere, None, Some(DVec3::new(9.0, 9.0, 9.0)))
            .unwrap();
        assert!(id.as_str().starts_with("sphere_"));
        let sphere = viewport.registry().get(&id).unwrap();
        assert_eq!(sphere.transform.position, DVec3::new(2.0, 0.0, 0.0));
        assert_eq!(viewport.stats().selected, Some(id));

        viewport.select(None).unwrap();
        let id = viewport
            .add_primitive(Primitive::Cone, None, Some(DVec3::new(0.0, 3.0, 0.0)))
            .unwrap();
        let cone = viewport.registry().get(&id).unwrap();
        assert_eq!(cone.transform.position, DVec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn test_add_with_taken_name_fails() {
        let mut viewport = viewport();
        let err = viewport
            .add_primitive(Primitive::Cube, Some("cube".to_string()), None)
            .unwrap_err();
        assert_eq!(err, ViewportError::DuplicateObject(ObjectId::from("cube")));
        assert_eq!(viewport.stats().object_count, 2);
    }

    #[test]
    fn test_add_marker() {
        let mut viewport = viewport();
        let id = viewport
            .add_marker(MarkerKind::Light, None, DVec3::new(1.0, 5.0, 1.0))
            .unwrap();
        assert!(id.as_str().starts_with("light_"));
        assert_eq!(viewport.registry().get(&id).unwrap().kind, ObjectKind::Light);
        // Markers are selected but never highlighted
        assert_eq!(viewport.scene().outline_count(), 0);
    }

    #[test]
    fn test_panel_edit_ignored_during_gesture() {
        let mut viewport = viewport();
        let cube = ObjectId::from("cube");
        let target = Transform::from_position(DVec3::new(3.0, 0.0, 0.0));
        key(&mut viewport, "g");
        assert_eq!(viewport.set_transform(&cube, target), Ok(false));
        key(&mut viewport, "Escape");
        assert_eq!(viewport.set_transform(&cube, target), Ok(true));
        assert_eq!(cube_transform(&viewport), target);
        assert_eq!(
            viewport.set_transform(&ObjectId::from("ghost"), target),
            Err(ViewportError::UnknownObject(ObjectId::from("ghost")))
        );
    }

    #[test]
    fn test_reselecting_mid_gesture_abandons_it() {
        let mut viewport = viewport();
        key(&mut viewport, "g");
        move_to(&mut viewport, 100.0, 0.0);
        let moved = cube_transform(&viewport);
        viewport.select(Some(&ObjectId::from("camera"))).unwrap();
        assert!(!viewport.tool_state().is_active());
        // No restore, no further writes
        assert_eq!(cube_transform(&viewport), moved);
    }

    #[test]
    fn test_shift_a_requests_add_menu() {
        let mut viewport = viewport();
        assert_eq!(
            shift_key(&mut viewport, "A"),
            Some(Transition::AddMenuRequested)
        );
        assert_eq!(
            viewport.drain_notifications(),
            vec![Notification::AddMenuRequested]
        );
    }

    #[test]
    fn test_wheel_zooms() {
        let mut viewport = viewport();
        viewport.handle(ViewportEvent::Wheel { delta_y: 120.0 });
        assert!((viewport.camera().state().distance - 8.66 * 0.95).abs() < 1e-9);
        viewport.handle(ViewportEvent::Wheel { delta_y: -120.0 });
        assert!((viewport.camera().state().distance - 8.66).abs() < 1e-9);
    }
}
