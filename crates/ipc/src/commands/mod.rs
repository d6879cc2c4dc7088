//! Command types for IPC messages.

use crate::types::Transform3D;
use serde::{Deserialize, Serialize};

/// Camera control commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CameraCommand {
    Orbit { delta_x: f64, delta_y: f64 },
    Pan { delta_x: f64, delta_y: f64 },
    /// Positive zooms in, negative zooms out
    Zoom { delta: f64 },
    Reset,
}

/// Object manipulation commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectCommand {
    /// Select an object, or clear the selection with `None`
    Select { id: Option<String> },
    Delete { id: String },
    /// Duplicate the current selection
    Duplicate,
    Transform { id: String, transform: Transform3D },
}

/// Transform tool mode, for the mode indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolMode {
    #[default]
    None,
    Grab,
    Rotate,
    Scale,
}

/// Axis constraint of the running tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisConstraint {
    #[default]
    Free,
    X,
    Y,
    Z,
}
