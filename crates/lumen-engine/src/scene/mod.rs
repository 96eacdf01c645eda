//! Scene model: the world graph a content builder populates and the frame
//! driver animates.
//!
//! Responsibilities:
//! - own every object (transform, kind, animation rules) in registration order
//! - describe geometry as primitive descriptors, tessellated only on upload
//! - keep per-frame work O(objects), never O(points): point clouds vary per
//!   frame through a shader clock

mod animation;
mod camera;
mod geometry;
mod light;
mod material;
mod object;
mod transform;
mod world;

pub use animation::{Animation, Axis3, DragAxes, RainField, RotationDelta, TickInput};
pub use camera::Camera;
pub use geometry::{Geometry, GeometryId, MeshData, MeshVertex};
pub use light::Light;
pub use material::{Material, MaterialVariant};
pub use object::{ObjectId, ObjectKind, PointCloud, SceneObject};
pub use transform::Transform;
pub use world::World;
