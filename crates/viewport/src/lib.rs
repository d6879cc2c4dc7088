//! Atelier viewport interaction engine
//!
//! Host-independent core of the editor viewport:
//! - [`camera::OrbitCamera`] - spherical orbit/pan/zoom camera
//! - [`registry::Registry`] - scene objects and the single highlighted selection
//! - [`picker`] - pointer ray picking that ignores helper geometry
//! - [`tool::TransformTool`] - modal grab/rotate/scale with axis constraints
//! - [`editor::Viewport`] - the context object that routes [`input::ViewportEvent`]s
//! - [`scene_graph::SceneGraph`] - what the host renderer must provide

pub mod camera;
pub mod editor;
pub mod error;
pub mod input;
pub mod notify;
pub mod picker;
pub mod raycast;
pub mod registry;
pub mod scene_graph;
pub mod tool;
pub mod types;

pub use camera::{CameraBasis, CameraPose, CameraState, OrbitCamera};
pub use editor::{MarkerKind, Viewport, ViewportStats};
pub use error::ViewportError;
pub use input::{Key, Modifiers, PointerButton, ViewportEvent};
pub use notify::{Notification, Outbox, TransformPhase};
pub use registry::Registry;
pub use scene_graph::{
    EmissiveOverlay, HelperKind, MemoryScene, OutlineStyle, Released, SceneGraph,
};
pub use tool::{AxisConstraint, IgnoreReason, ToolMode, ToolState, Transition};
pub use types::*;
