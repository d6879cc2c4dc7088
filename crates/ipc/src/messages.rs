//! Main IPC message enums for communication between the editor and its UI.

use serde::{Deserialize, Serialize};

use crate::commands::{AxisConstraint, CameraCommand, ObjectCommand, ToolMode};
use crate::input::InputEvent;
use crate::types::{AddObjectRequest, SceneObjectInfo, Transform3D, TransformPhase};

/// Messages from the editor to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum EditorToUi {
    /// Full state sync when the UI loads
    Initialize {
        objects: Vec<SceneObjectInfo>,
        selected_id: Option<String>,
    },

    /// Object selection changed
    SelectionChanged { selected_id: Option<String> },

    /// Transform of one object changed
    TransformChanged {
        id: String,
        transform: Transform3D,
        phase: TransformPhase,
    },

    /// Object was added to the scene
    ObjectAdded { object: SceneObjectInfo },

    /// Object was removed from the scene
    ObjectRemoved { id: String },

    /// Transform tool mode or axis changed (for the mode indicator)
    ToolChanged { mode: ToolMode, axis: AxisConstraint },

    /// Delete was requested from the keyboard
    DeleteRequested { id: String },

    /// Duplicate was requested from the keyboard
    DuplicateRequested { id: String },

    /// Show/hide add object menu (triggered by Shift+A)
    ShowAddObjectMenu {
        show: bool,
        /// Screen position for menu (if show is true)
        position: Option<[f32; 2]>,
    },

    /// Scene statistics
    SceneStats {
        object_count: usize,
        selected_id: Option<String>,
    },

    /// Error notification
    Error { code: String, message: String },
}

/// Messages from the UI to the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum UiToEditor {
    /// UI has loaded and wants a full state sync
    Ready,

    /// Camera control commands
    CameraCommand(CameraCommand),

    /// Object manipulation
    ObjectCommand(ObjectCommand),

    /// Add a new object to the scene
    AddObject(AddObjectRequest),

    /// Input forwarded from a UI surface that owns the viewport
    Input(InputEvent),
}
