//! Value types shared by every part of the engine and its collaborators.

use std::fmt;

use glam::{DMat4, DQuat, DVec2, DVec3, EulerRot};
use serde::{Deserialize, Serialize};

/// Stable string identifier of a scene object
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Identity of a node in the host scene graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// Opaque geometry handle owned by the scene graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeometryHandle(pub u64);

/// Opaque material handle owned by the scene graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialHandle(pub u64);

/// Built-in mesh shapes the editor can create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Primitive {
    Cube,
    Sphere,
    Cylinder,
    Plane,
    Torus,
    Cone,
}

impl Primitive {
    pub const ALL: [Primitive; 6] = [
        Primitive::Cube,
        Primitive::Sphere,
        Primitive::Cylinder,
        Primitive::Plane,
        Primitive::Torus,
        Primitive::Cone,
    ];

    /// Lowercase name used as the id prefix of created objects
    pub fn label(self) -> &'static str {
        match self {
            Primitive::Cube => "cube",
            Primitive::Sphere => "sphere",
            Primitive::Cylinder => "cylinder",
            Primitive::Plane => "plane",
            Primitive::Torus => "torus",
            Primitive::Cone => "cone",
        }
    }

    /// Local-space bounds of the unit primitive
    pub fn local_bounds(self) -> Aabb {
        match self {
            Primitive::Cube => Aabb::new(DVec3::splat(-0.5), DVec3::splat(0.5)),
            Primitive::Sphere => Aabb::new(DVec3::splat(-1.0), DVec3::splat(1.0)),
            Primitive::Cylinder | Primitive::Cone => {
                Aabb::new(DVec3::new(-1.0, -1.0, -1.0), DVec3::new(1.0, 1.0, 1.0))
            }
            // A plane is thin but never zero-width so the slab test stays well defined
            Primitive::Plane => Aabb::new(DVec3::new(-1.0, -1.0, -1e-3), DVec3::new(1.0, 1.0, 1e-3)),
            Primitive::Torus => Aabb::new(DVec3::new(-1.4, -1.4, -0.4), DVec3::new(1.4, 1.4, 0.4)),
        }
    }
}

/// What an object is, as far as selection and highlighting care
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    Mesh(Primitive),
    /// Geometry that did not come from a built-in primitive (duplicates of imports, etc.)
    CustomMesh,
    Camera,
    Light,
}

impl ObjectKind {
    /// Only meshes carry a material that can be highlighted or cloned
    pub fn is_mesh(self) -> bool {
        matches!(self, ObjectKind::Mesh(_) | ObjectKind::CustomMesh)
    }
}

/// Euler angles in radians, applied in XYZ order
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EulerRotation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl EulerRotation {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_quat(self) -> DQuat {
        DQuat::from_euler(EulerRot::XYZ, self.x, self.y, self.z)
    }
}

/// Coordinate axis selector used for component access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl std::ops::Index<Axis> for EulerRotation {
    type Output = f64;

    fn index(&self, axis: Axis) -> &f64 {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }
}

impl std::ops::IndexMut<Axis> for EulerRotation {
    fn index_mut(&mut self, axis: Axis) -> &mut f64 {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }
}

/// Position, rotation and scale of one object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: DVec3,
    pub rotation: EulerRotation,
    pub scale: DVec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: DVec3::ZERO,
        rotation: EulerRotation::ZERO,
        scale: DVec3::ONE,
    };

    pub fn from_position(position: DVec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Local-to-world matrix
    pub fn matrix(&self) -> DMat4 {
        DMat4::from_scale_rotation_translation(self.scale, self.rotation.to_quat(), self.position)
    }
}

/// Everything the scene graph needs to draw an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Renderable {
    pub node: NodeId,
    pub geometry: Option<GeometryHandle>,
    pub material: Option<MaterialHandle>,
}

/// A manipulable object, owned by the registry while it is in the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub transform: Transform,
    pub renderable: Renderable,
    pub selectable: bool,
}

impl SceneObject {
    pub fn new(id: impl Into<ObjectId>, kind: ObjectKind, renderable: Renderable) -> Self {
        Self {
            id: id.into(),
            kind,
            transform: Transform::IDENTITY,
            renderable,
            selectable: true,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn node(&self) -> NodeId {
        self.renderable.node
    }
}

impl From<String> for ObjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Bounds of this box after an affine transform (all eight corners re-enclosed)
    pub fn transformed(&self, matrix: &DMat4) -> Aabb {
        let mut min = DVec3::splat(f64::INFINITY);
        let mut max = DVec3::splat(f64::NEG_INFINITY);
        for i in 0..8 {
            let corner = DVec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            let p = matrix.transform_point3(corner);
            min = min.min(p);
            max = max.max(p);
        }
        Aabb { min, max }
    }
}

/// Half-line used for picking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    /// Unit direction
    pub direction: DVec3,
}

impl Ray {
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}

/// One ray/node intersection reported by the scene graph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub node: NodeId,
    pub distance: f64,
    pub point: DVec3,
}

/// On-screen rectangle of the rendering surface, in client pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewportRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn aspect(&self) -> f64 {
        if self.is_empty() {
            1.0
        } else {
            self.width / self.height
        }
    }

    /// Client coordinates to normalized device coordinates (y up)
    pub fn to_ndc(&self, x: f64, y: f64) -> Option<DVec2> {
        if self.is_empty() {
            return None;
        }
        Some(DVec2::new(
            2.0 * (x - self.left) / self.width - 1.0,
            1.0 - 2.0 * (y - self.top) / self.height,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ndc_corners_and_center() {
        let rect = ViewportRect::new(100.0, 50.0, 800.0, 600.0);
        assert_eq!(rect.to_ndc(100.0, 50.0), Some(DVec2::new(-1.0, 1.0)));
        assert_eq!(rect.to_ndc(900.0, 650.0), Some(DVec2::new(1.0, -1.0)));
        assert_eq!(rect.to_ndc(500.0, 350.0), Some(DVec2::new(0.0, 0.0)));
    }

    #[test]
    fn test_empty_rect_has_no_ndc() {
        assert_eq!(ViewportRect::from_size(0.0, 600.0).to_ndc(1.0, 1.0), None);
    }

    #[test]
    fn test_aabb_transformed_by_translation_and_scale() {
        let local = Primitive::Cube.local_bounds();
        let transform = Transform {
            position: DVec3::new(2.0, 0.0, 0.0),
            rotation: EulerRotation::ZERO,
            scale: DVec3::splat(2.0),
        };
        let world = local.transformed(&transform.matrix());
        assert!((world.min - DVec3::new(1.0, -1.0, -1.0)).length() < 1e-12);
        assert!((world.max - DVec3::new(3.0, 1.0, 1.0)).length() < 1e-12);
    }

    #[test]
    fn test_euler_index_by_axis() {
        let mut rotation = EulerRotation::new(0.1, 0.2, 0.3);
        rotation[Axis::Y] += 1.0;
        assert!((rotation[Axis::Y] - 1.2).abs() < 1e-12);
        assert_eq!(rotation[Axis::Z], 0.3);
    }
}
