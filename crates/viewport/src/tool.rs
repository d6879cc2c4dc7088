//! Modal grab/rotate/scale tool.
//!
//! A gesture snapshots the selected object's transform and the pointer when it
//! starts. Every pointer move recomputes the live transform from that snapshot
//! and the total pointer delta, so the object position is always
//! `snapshot + f(pointer - start)` and never accumulates per-frame error.
//! Cancelling writes the snapshot back verbatim.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::types::{Axis, ObjectId, Transform};

/// Which transform the tool edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ToolMode {
    #[default]
    Idle,
    Grab,
    Rotate,
    Scale,
}

/// Axis constraint for the active gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AxisConstraint {
    #[default]
    Free,
    X,
    Y,
    Z,
}

impl AxisConstraint {
    pub fn axis(self) -> Option<Axis> {
        match self {
            AxisConstraint::Free => None,
            AxisConstraint::X => Some(Axis::X),
            AxisConstraint::Y => Some(Axis::Y),
            AxisConstraint::Z => Some(Axis::Z),
        }
    }
}

impl From<Axis> for AxisConstraint {
    fn from(axis: Axis) -> Self {
        match axis {
            Axis::X => AxisConstraint::X,
            Axis::Y => AxisConstraint::Y,
            Axis::Z => AxisConstraint::Z,
        }
    }
}

/// An in-progress gesture
#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    pub mode: ToolMode,
    pub axis: AxisConstraint,
    /// Object being transformed
    pub object: ObjectId,
    /// Transform at gesture start
    pub start_transform: Transform,
    /// Pointer position at gesture start, client pixels
    pub start_pointer: DVec2,
}

/// Tool state: idle, or exactly one active gesture
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ToolState {
    #[default]
    Idle,
    Active(Gesture),
}

impl ToolState {
    pub fn mode(&self) -> ToolMode {
        match self {
            ToolState::Idle => ToolMode::Idle,
            ToolState::Active(gesture) => gesture.mode,
        }
    }

    pub fn axis(&self) -> AxisConstraint {
        match self {
            ToolState::Idle => AxisConstraint::Free,
            ToolState::Active(gesture) => gesture.axis,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ToolState::Active(_))
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        match self {
            ToolState::Idle => None,
            ToolState::Active(gesture) => Some(gesture),
        }
    }
}

/// Input the tool reacts to, already decoded from keys and pointer events
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolEvent {
    /// G / R / S
    Begin(ToolMode),
    /// X / Y / Z
    Constrain(Axis),
    PointerMoved(DVec2),
    /// Escape
    Cancel,
    /// Enter or pointer-up
    Confirm,
    /// Delete / Backspace
    Delete,
    /// Shift+D
    Duplicate,
    /// Shift+A
    AddMenu,
}

/// What the tool needs to know about the world for one transition
#[derive(Debug, Clone, Copy)]
pub struct ToolContext<'a> {
    /// Current selection and its transform
    pub selection: Option<(&'a ObjectId, &'a Transform)>,
    /// Last known pointer position
    pub pointer: DVec2,
}

/// Why an event did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The event needs a selection and there is none
    NoSelection,
    /// A gesture is already running
    AlreadyActive,
    /// The event only applies during a gesture
    NotActive,
    /// The key has no binding
    Unbound,
}

/// Outcome of one transition, carrying the transform to write back
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Started {
        mode: ToolMode,
        object: ObjectId,
    },
    /// Constraint changed; `transform` is the recomputed live transform
    AxisChanged {
        axis: AxisConstraint,
        object: ObjectId,
        transform: Transform,
    },
    Updated {
        object: ObjectId,
        transform: Transform,
    },
    Committed {
        object: ObjectId,
        transform: Transform,
    },
    /// `transform` is the snapshot, to be restored verbatim
    Cancelled {
        object: ObjectId,
        transform: Transform,
    },
    /// The gesture's object is no longer selected; nothing is written
    Abandoned {
        object: ObjectId,
    },
    DeleteRequested {
        object: ObjectId,
    },
    DuplicateRequested {
        object: ObjectId,
    },
    AddMenuRequested,
    Ignored(IgnoreReason),
}

/// Transform derived from the snapshot and the total pointer delta
pub fn compute_live(
    mode: ToolMode,
    axis: AxisConstraint,
    snapshot: &Transform,
    delta: DVec2,
    sensitivity: f64,
) -> Transform {
    let mut result = *snapshot;
    let along = delta.x * sensitivity;
    match (mode, axis.axis()) {
        (ToolMode::Idle, _) => {}
        (ToolMode::Grab, None) => {
            // Fixed world X/Y plane, independent of the camera
            result.position =
                snapshot.position + DVec3::new(along, -delta.y * sensitivity, 0.0);
        }
        (ToolMode::Grab, Some(a)) => {
            result.position[a.index()] = snapshot.position[a.index()] + along;
        }
        (ToolMode::Rotate, None) => {
            result.rotation.y = snapshot.rotation.y + along;
            result.rotation.x = snapshot.rotation.x + delta.y * sensitivity;
        }
        (ToolMode::Rotate, Some(a)) => {
            result.rotation[a] = snapshot.rotation[a] + along;
        }
        (ToolMode::Scale, None) => {
            result.scale = snapshot.scale * (1.0 + along);
        }
        (ToolMode::Scale, Some(a)) => {
            result.scale[a.index()] = snapshot.scale[a.index()] * (1.0 + along);
        }
    }
    result
}

/// The modal transform tool: state plus the sensitivity it recomputes with
#[derive(Debug, Clone)]
pub struct TransformTool {
    state: ToolState,
    sensitivity: f64,
}

impl Default for TransformTool {
    fn default() -> Self {
        Self::new(0.01)
    }
}

impl TransformTool {
    pub fn new(sensitivity: f64) -> Self {
        Self {
            state: ToolState::Idle,
            sensitivity,
        }
    }

    pub fn state(&self) -> &ToolState {
        &self.state
    }

    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    /// Apply one event. The caller writes any transform carried by the result.
    pub fn transition(&mut self, event: ToolEvent, ctx: ToolContext<'_>) -> Transition {
        // A gesture whose object is gone or deselected ends before anything else
        if let Some(abandoned) = self.abandon_if_stale(ctx.selection.map(|(id, _)| id)) {
            return abandoned;
        }

        match event {
            ToolEvent::Delete => match ctx.selection {
                Some((id, _)) => Transition::DeleteRequested { object: id.clone() },
                None => Transition::Ignored(IgnoreReason::NoSelection),
            },
            ToolEvent::Duplicate => match ctx.selection {
                Some((id, _)) => Transition::DuplicateRequested { object: id.clone() },
                None => Transition::Ignored(IgnoreReason::NoSelection),
            },
            ToolEvent::AddMenu => Transition::AddMenuRequested,
            ToolEvent::Begin(mode) => self.begin(mode, ctx),
            ToolEvent::Constrain(axis) => self.constrain(axis.into(), ctx.pointer),
            ToolEvent::PointerMoved(pointer) => self.update(pointer),
            ToolEvent::Cancel => self.cancel(),
            ToolEvent::Confirm => self.confirm(ctx),
        }
    }

    fn begin(&mut self, mode: ToolMode, ctx: ToolContext<'_>) -> Transition {
        if self.state.is_active() {
            return Transition::Ignored(IgnoreReason::AlreadyActive);
        }
        if mode == ToolMode::Idle {
            return Transition::Ignored(IgnoreReason::Unbound);
        }
        let Some((id, transform)) = ctx.selection else {
            return Transition::Ignored(IgnoreReason::NoSelection);
        };
        self.state = ToolState::Active(Gesture {
            mode,
            axis: AxisConstraint::Free,
            object: id.clone(),
            start_transform: *transform,
            start_pointer: ctx.pointer,
        });
        info!("Tool: started {:?} on '{}'", mode, id);
        Transition::Started {
            mode,
            object: id.clone(),
        }
    }

    fn constrain(&mut self, axis: AxisConstraint, pointer: DVec2) -> Transition {
        let sensitivity = self.sensitivity;
        let ToolState::Active(gesture) = &mut self.state else {
            return Transition::Ignored(IgnoreReason::NotActive);
        };
        gesture.axis = axis;
        info!("Tool: axis constraint {:?}", axis);
        Transition::AxisChanged {
            axis,
            object: gesture.object.clone(),
            transform: Self::live(gesture, pointer, sensitivity),
        }
    }

    fn update(&mut self, pointer: DVec2) -> Transition {
        let ToolState::Active(gesture) = &self.state else {
            return Transition::Ignored(IgnoreReason::NotActive);
        };
        Transition::Updated {
            object: gesture.object.clone(),
            transform: Self::live(gesture, pointer, self.sensitivity),
        }
    }

    fn cancel(&mut self) -> Transition {
        match std::mem::take(&mut self.state) {
            ToolState::Idle => Transition::Ignored(IgnoreReason::NotActive),
            ToolState::Active(gesture) => {
                info!("Tool: cancelled {:?} on '{}'", gesture.mode, gesture.object);
                Transition::Cancelled {
                    object: gesture.object,
                    transform: gesture.start_transform,
                }
            }
        }
    }

    fn confirm(&mut self, ctx: ToolContext<'_>) -> Transition {
        let ToolState::Active(gesture) = std::mem::take(&mut self.state) else {
            return Transition::Ignored(IgnoreReason::NotActive);
        };
        // The live transform is already applied; commit whatever the object holds now
        let transform = ctx
            .selection
            .map(|(_, transform)| *transform)
            .unwrap_or(gesture.start_transform);
        info!("Tool: committed {:?} on '{}'", gesture.mode, gesture.object);
        Transition::Committed {
            object: gesture.object,
            transform,
        }
    }

    /// End the gesture if `selection` no longer names its object
    pub fn abandon_if_stale(&mut self, selection: Option<&ObjectId>) -> Option<Transition> {
        let ToolState::Active(gesture) = &self.state else {
            return None;
        };
        if selection == Some(&gesture.object) {
            return None;
        }
        let object = gesture.object.clone();
        self.state = ToolState::Idle;
        debug!("Tool: abandoned gesture on '{}'", object);
        Some(Transition::Abandoned { object })
    }

    fn live(gesture: &Gesture, pointer: DVec2, sensitivity: f64) -> Transform {
        compute_live(
            gesture.mode,
            gesture.axis,
            &gesture.start_transform,
            pointer - gesture.start_pointer,
            sensitivity,
        )
    }
}
