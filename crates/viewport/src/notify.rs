//! Outbound notifications for UI collaborators (property panel, object list).
//!
//! The engine queues notifications while it handles an event; the host drains
//! the queue once per frame and forwards it to whatever UI is attached.

use serde::{Deserialize, Serialize};

use crate::tool::{AxisConstraint, ToolMode};
use crate::types::{ObjectId, ObjectKind, Transform};

/// Why a transform changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformPhase {
    /// Live preview during a gesture
    Live,
    /// Gesture confirmed
    Committed,
    /// Gesture cancelled, transform restored from the snapshot
    Cancelled,
    /// Direct edit from a property panel
    Edited,
}

/// Something a UI collaborator may want to reflect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Notification {
    SelectionChanged {
        selected: Option<ObjectId>,
    },
    TransformChanged {
        id: ObjectId,
        transform: Transform,
        phase: TransformPhase,
    },
    ObjectAdded {
        id: ObjectId,
        kind: ObjectKind,
    },
    ObjectRemoved {
        id: ObjectId,
    },
    ToolChanged {
        mode: ToolMode,
        axis: AxisConstraint,
    },
    /// Delete key pressed with a selection
    DeleteRequested {
        id: ObjectId,
    },
    /// Modifier+D pressed with a selection
    DuplicateRequested {
        id: ObjectId,
    },
    /// Shift+A pressed
    AddMenuRequested,
}

/// Queue of notifications waiting to be delivered
#[derive(Debug, Default)]
pub struct Outbox {
    notifications: Vec<Notification>,
}

impl Outbox {
    pub fn push(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    /// Take all queued notifications, leaving the queue empty
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter()
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }
}
