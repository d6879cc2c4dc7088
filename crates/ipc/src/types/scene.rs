//! Scene-related types for IPC messages.

use serde::{Deserialize, Serialize};

/// 3D transform with position, Euler rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    pub position: [f64; 3],
    /// Radians, applied in XYZ order
    pub rotation: [f64; 3],
    pub scale: [f64; 3],
}

impl Default for Transform3D {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

/// What kind of object an entry in the object list is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectType {
    Cube,
    Sphere,
    Cylinder,
    Plane,
    Torus,
    Cone,
    /// Mesh without a built-in primitive shape
    Mesh,
    Camera,
    Light,
}

impl ObjectType {
    /// Whether the object is a mesh (can be highlighted and duplicated)
    pub fn is_mesh(self) -> bool {
        !matches!(self, ObjectType::Camera | ObjectType::Light)
    }
}

/// A scene object as shown in the object list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObjectInfo {
    pub id: String,
    pub object_type: ObjectType,
    pub transform: Transform3D,
}

/// Request to add a new object to the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddObjectRequest {
    pub object_type: ObjectType,
    /// Optional world position (next to the selection, or origin, when absent)
    pub position: Option<[f64; 3]>,
    /// Optional custom id
    pub name: Option<String>,
}

/// Why a transform notification was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformPhase {
    /// Live preview while a tool gesture runs
    Live,
    Committed,
    Cancelled,
    /// Direct edit from the property panel
    Edited,
}
