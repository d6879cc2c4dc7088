//! Translation between the engine and the IPC protocol.
//!
//! Inbound [`UiToEditor`] messages become engine calls; engine notifications
//! become [`EditorToUi`] messages queued on [`OutboundUiMessages`].

use std::fmt::Display;

use atelier_ipc::{
    AddObjectRequest, AxisConstraint as IpcAxis, CameraCommand, EditorToUi, InputEvent,
    KeyboardEvent, MouseButton, MouseEvent, ObjectCommand, ObjectType, SceneObjectInfo,
    ToolMode as IpcToolMode, Transform3D, TransformPhase as IpcPhase, UiToEditor,
};
use bevy::prelude::*;
use glam::DVec3;
use viewport::{
    AxisConstraint, EulerRotation, Key, MarkerKind, Modifiers, Notification, ObjectId, ObjectKind,
    PointerButton, Primitive, Registry, SceneObject, ToolMode, TransformPhase, ViewportEvent,
};

use crate::{EditorViewport, OutboundUiMessages};

/// A message from the UI, queued for the next frame
#[derive(Message, Debug, Clone)]
pub struct UiCommand(pub UiToEditor);

/// Where camera and light markers appear when the request has no position
const DEFAULT_MARKER_POSITION: [f64; 3] = [0.0, 3.0, 0.0];

pub fn transform_to_ipc(transform: &viewport::Transform) -> Transform3D {
    let r = transform.rotation;
    Transform3D {
        position: transform.position.to_array(),
        rotation: [r.x, r.y, r.z],
        scale: transform.scale.to_array(),
    }
}

pub fn transform_from_ipc(transform: &Transform3D) -> viewport::Transform {
    let [rx, ry, rz] = transform.rotation;
    viewport::Transform {
        position: DVec3::from_array(transform.position),
        rotation: EulerRotation::new(rx, ry, rz),
        scale: DVec3::from_array(transform.scale),
    }
}

pub fn object_type(kind: ObjectKind) -> ObjectType {
    match kind {
        ObjectKind::Mesh(Primitive::Cube) => ObjectType::Cube,
        ObjectKind::Mesh(Primitive::Sphere) => ObjectType::Sphere,
        ObjectKind::Mesh(Primitive::Cylinder) => ObjectType::Cylinder,
        ObjectKind::Mesh(Primitive::Plane) => ObjectType::Plane,
        ObjectKind::Mesh(Primitive::Torus) => ObjectType::Torus,
        ObjectKind::Mesh(Primitive::Cone) => ObjectType::Cone,
        ObjectKind::CustomMesh => ObjectType::Mesh,
        ObjectKind::Camera => ObjectType::Camera,
        ObjectKind::Light => ObjectType::Light,
    }
}

fn tool_mode(mode: ToolMode) -> IpcToolMode {
    match mode {
        ToolMode::Idle => IpcToolMode::None,
        ToolMode::Grab => IpcToolMode::Grab,
        ToolMode::Rotate => IpcToolMode::Rotate,
        ToolMode::Scale => IpcToolMode::Scale,
    }
}

fn axis_constraint(axis: AxisConstraint) -> IpcAxis {
    match axis {
        AxisConstraint::Free => IpcAxis::Free,
        AxisConstraint::X => IpcAxis::X,
        AxisConstraint::Y => IpcAxis::Y,
        AxisConstraint::Z => IpcAxis::Z,
    }
}

fn phase(phase: TransformPhase) -> IpcPhase {
    match phase {
        TransformPhase::Live => IpcPhase::Live,
        TransformPhase::Committed => IpcPhase::Committed,
        TransformPhase::Cancelled => IpcPhase::Cancelled,
        TransformPhase::Edited => IpcPhase::Edited,
    }
}

pub fn object_info(object: &SceneObject) -> SceneObjectInfo {
    SceneObjectInfo {
        id: object.id.to_string(),
        object_type: object_type(object.kind),
        transform: transform_to_ipc(&object.transform),
    }
}

/// Full scene listing for a freshly attached UI
pub fn initialize_message(registry: &Registry) -> EditorToUi {
    EditorToUi::Initialize {
        objects: registry.iter().map(object_info).collect(),
        selected_id: registry.current_id().map(ToString::to_string),
    }
}

fn error_message(code: &str, err: impl Display) -> EditorToUi {
    EditorToUi::Error {
        code: code.to_string(),
        message: err.to_string(),
    }
}

/// Protocol message for one engine notification.
///
/// `pointer` positions the add menu. An `ObjectAdded` for an object that has
/// already been removed again yields `None`.
pub fn notification_message(
    notification: Notification,
    registry: &Registry,
    pointer: [f32; 2],
) -> Option<EditorToUi> {
    let message = match notification {
        Notification::SelectionChanged { selected } => EditorToUi::SelectionChanged {
            selected_id: selected.map(|id| id.to_string()),
        },
        Notification::TransformChanged {
            id,
            transform,
            phase: p,
        } => EditorToUi::TransformChanged {
            id: id.to_string(),
            transform: transform_to_ipc(&transform),
            phase: phase(p),
        },
        Notification::ObjectAdded { id, .. } => EditorToUi::ObjectAdded {
            object: object_info(registry.get(&id)?),
        },
        Notification::ObjectRemoved { id } => EditorToUi::ObjectRemoved { id: id.to_string() },
        Notification::ToolChanged { mode, axis } => EditorToUi::ToolChanged {
            mode: tool_mode(mode),
            axis: axis_constraint(axis),
        },
        Notification::DeleteRequested { id } => EditorToUi::DeleteRequested { id: id.to_string() },
        Notification::DuplicateRequested { id } => {
            EditorToUi::DuplicateRequested { id: id.to_string() }
        }
        Notification::AddMenuRequested => EditorToUi::ShowAddObjectMenu {
            show: true,
            position: Some(pointer),
        },
    };
    Some(message)
}

fn modifiers(m: &atelier_ipc::Modifiers) -> Modifiers {
    Modifiers {
        shift: m.shift,
        ctrl: m.ctrl,
        alt: m.alt,
        meta: m.meta,
    }
}

fn pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Right => PointerButton::Secondary,
        MouseButton::Middle => PointerButton::Middle,
    }
}

/// Engine event for forwarded UI input; key releases have none
pub fn input_event(event: &InputEvent) -> Option<ViewportEvent> {
    let event = match event {
        InputEvent::Mouse(MouseEvent::Move { x, y, modifiers: m }) => ViewportEvent::PointerMove {
            x: *x,
            y: *y,
            modifiers: modifiers(m),
        },
        InputEvent::Mouse(MouseEvent::ButtonDown {
            button,
            x,
            y,
            modifiers: m,
        }) => ViewportEvent::PointerDown {
            x: *x,
            y: *y,
            button: pointer_button(*button),
            modifiers: modifiers(m),
        },
        InputEvent::Mouse(MouseEvent::ButtonUp { button, x, y }) => ViewportEvent::PointerUp {
            x: *x,
            y: *y,
            button: pointer_button(*button),
        },
        InputEvent::Mouse(MouseEvent::Scroll { delta_y, .. }) => {
            ViewportEvent::Wheel { delta_y: *delta_y }
        }
        InputEvent::Keyboard(KeyboardEvent {
            key,
            pressed: true,
            modifiers: m,
        }) => ViewportEvent::KeyDown {
            key: Key::from_web(key),
            modifiers: modifiers(m),
        },
        InputEvent::Keyboard(_) => return None,
    };
    Some(event)
}

fn add_object(viewport: &mut EditorViewport, request: &AddObjectRequest) -> Result<ObjectId, EditorToUi> {
    let position = request.position.map(DVec3::from_array);
    let primitive = match request.object_type {
        ObjectType::Cube => Primitive::Cube,
        ObjectType::Sphere => Primitive::Sphere,
        ObjectType::Cylinder => Primitive::Cylinder,
        ObjectType::Plane => Primitive::Plane,
        ObjectType::Torus => Primitive::Torus,
        ObjectType::Cone => Primitive::Cone,
        ObjectType::Camera | ObjectType::Light => {
            let marker = if request.object_type == ObjectType::Camera {
                MarkerKind::Camera
            } else {
                MarkerKind::Light
            };
            let position = position.unwrap_or(DVec3::from_array(DEFAULT_MARKER_POSITION));
            return viewport
                .add_marker(marker, request.name.clone(), position)
                .map_err(|e| error_message("add_failed", e));
        }
        ObjectType::Mesh => {
            return Err(error_message(
                "unsupported_object",
                "Arbitrary meshes cannot be created from the add menu",
            ));
        }
    };
    viewport
        .add_primitive(primitive, request.name.clone(), position)
        .map_err(|e| error_message("add_failed", e))
}

/// Apply one UI message to the engine
pub fn apply_ui_message(
    viewport: &mut EditorViewport,
    message: &UiToEditor,
    outbound: &mut OutboundUiMessages,
) {
    match message {
        UiToEditor::Ready => {
            info!("UI ready, sending scene listing");
            outbound.send(initialize_message(viewport.registry()));
        }
        UiToEditor::CameraCommand(command) => {
            let camera = viewport.camera_mut();
            match command {
                CameraCommand::Orbit { delta_x, delta_y } => camera.rotate(*delta_x, *delta_y),
                CameraCommand::Pan { delta_x, delta_y } => camera.pan(*delta_x, *delta_y),
                CameraCommand::Zoom { delta } => camera.zoom(*delta),
                CameraCommand::Reset => camera.reset(),
            }
        }
        UiToEditor::ObjectCommand(command) => {
            let result = match command {
                ObjectCommand::Select { id } => {
                    let id = id.as_deref().map(ObjectId::from);
                    viewport.select(id.as_ref())
                }
                ObjectCommand::Delete { id } => viewport.delete(&ObjectId::from(id.as_str())),
                ObjectCommand::Duplicate => {
                    viewport.duplicate_selected();
                    Ok(())
                }
                ObjectCommand::Transform { id, transform } => viewport
                    .set_transform(&ObjectId::from(id.as_str()), transform_from_ipc(transform))
                    .map(|_| ()),
            };
            if let Err(err) = result {
                warn!("Object command failed: {}", err);
                outbound.send(error_message("unknown_object", err));
            }
        }
        UiToEditor::AddObject(request) => {
            if let Err(message) = add_object(viewport, request) {
                outbound.send(message);
            }
        }
        UiToEditor::Input(event) => {
            if let Some(event) = input_event(event) {
                viewport.handle(event);
            }
        }
    }
}

/// Apply queued UI messages
pub fn handle_ui_commands(
    mut viewport: ResMut<EditorViewport>,
    mut commands: MessageReader<UiCommand>,
    mut outbound: ResMut<OutboundUiMessages>,
) {
    for command in commands.read() {
        apply_ui_message(&mut viewport, &command.0, &mut outbound);
    }
}

/// Convert engine notifications into UI messages, closing with fresh stats
/// when the object set or selection changed
pub fn forward_notifications(
    mut viewport: ResMut<EditorViewport>,
    mut outbound: ResMut<OutboundUiMessages>,
) {
    let notifications = viewport.drain_notifications();
    if notifications.is_empty() {
        return;
    }
    let pointer = viewport.pointer();
    let pointer = [pointer.x as f32, pointer.y as f32];
    let mut scene_changed = false;
    for notification in notifications {
        scene_changed |= matches!(
            notification,
            Notification::ObjectAdded { .. }
                | Notification::ObjectRemoved { .. }
                | Notification::SelectionChanged { .. }
        );
        if let Some(message) = notification_message(notification, viewport.registry(), pointer) {
            outbound.send(message);
        }
    }
    if scene_changed {
        let stats = viewport.stats();
        outbound.send(EditorToUi::SceneStats {
            object_count: stats.object_count,
            selected_id: stats.selected.map(|id| id.to_string()),
        });
    }
}
