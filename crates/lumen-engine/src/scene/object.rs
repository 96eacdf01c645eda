use std::fmt;

use glam::Vec3;

use crate::coords::Color;

use super::animation::{Animation, DragAxes, TickInput};
use super::geometry::GeometryId;
use super::light::Light;
use super::material::{Material, MaterialVariant};
use super::transform::Transform;

/// Stable identifier of an object within one world.
///
/// Ids are never reused, including across content rebuilds.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) u32);

impl ObjectId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Point cloud with per-point attributes computed once at build time.
///
/// Per-frame variation goes through `time` (a shader uniform) so the cost of a
/// tick does not grow with the point count. `revision` changes whenever the
/// positions are rewritten on the CPU (rain) so renderers know to re-upload.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
    /// Per-point phase offset for shader-side jitter, radians.
    pub phases: Vec<f32>,
    /// Jitter amplitude in world units (0 disables).
    pub jitter: f32,
    /// Point size hint in logical pixels.
    pub point_size: f32,
    pub time: f32,
    pub revision: u64,
}

impl PointCloud {
    /// Creates a cloud. Attribute vectors must have equal length; extra entries are truncated.
    pub fn new(positions: Vec<[f32; 3]>, mut colors: Vec<[f32; 3]>, mut phases: Vec<f32>) -> Self {
        let n = positions.len();
        colors.resize(n, [1.0; 3]);
        phases.resize(n, 0.0);
        Self {
            positions,
            colors,
            phases,
            jitter: 0.0,
            point_size: 1.0,
            time: 0.0,
            revision: 0,
        }
    }

    pub fn with_jitter(mut self, jitter: f32) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_point_size(mut self, size: f32) -> Self {
        self.point_size = size;
        self
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// What an object is.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    Mesh { geometry: GeometryId, material: Material },
    Points(PointCloud),
    Light(Light),
}

impl ObjectKind {
    pub fn mesh(geometry: GeometryId, material: Material) -> Self {
        ObjectKind::Mesh { geometry, material }
    }

    pub fn material(&self) -> Option<&Material> {
        match self {
            ObjectKind::Mesh { material, .. } => Some(material),
            _ => None,
        }
    }

    pub fn material_mut(&mut self) -> Option<&mut Material> {
        match self {
            ObjectKind::Mesh { material, .. } => Some(material),
            _ => None,
        }
    }
}

/// One entry of the world graph: transform + kind + per-tick animation rules.
///
/// Owned exclusively by the world; content builders get `&mut` access during a
/// build, the frame driver during a tick.
#[derive(Debug, Clone)]
pub struct SceneObject {
    id: ObjectId,
    pub name: Option<String>,
    pub transform: Transform,
    pub kind: ObjectKind,
    pub animations: Vec<Animation>,
    pub drag: DragAxes,
    pub visible: bool,
}

impl SceneObject {
    pub(crate) fn new(id: ObjectId, kind: ObjectKind) -> Self {
        Self {
            id,
            name: None,
            transform: Transform::IDENTITY,
            kind,
            animations: Vec::new(),
            drag: DragAxes::NONE,
            visible: true,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    // ── builder-style setters (chainable on `&mut`) ────────────────────────

    pub fn named(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_transform(&mut self, transform: Transform) -> &mut Self {
        self.transform = transform;
        self
    }

    pub fn at(&mut self, position: Vec3) -> &mut Self {
        self.transform.position = position;
        self
    }

    pub fn scaled(&mut self, scale: Vec3) -> &mut Self {
        self.transform.scale = scale;
        self
    }

    pub fn animate(&mut self, animation: Animation) -> &mut Self {
        self.animations.push(animation);
        self
    }

    pub fn draggable(&mut self, axes: DragAxes) -> &mut Self {
        self.drag = axes;
        self
    }

    // ── incremental mutation ───────────────────────────────────────────────

    /// Sets the material color. Returns false for objects without a material.
    pub fn set_color(&mut self, color: Color) -> bool {
        match self.kind.material_mut() {
            Some(m) => {
                m.color = color;
                true
            }
            None => false,
        }
    }

    /// Sets the material variant. Returns false for objects without a material.
    pub fn set_variant(&mut self, variant: MaterialVariant) -> bool {
        match self.kind.material_mut() {
            Some(m) => {
                m.variant = variant;
                true
            }
            None => false,
        }
    }

    pub fn set_uniform_scale(&mut self, s: f32) {
        self.transform.scale = Vec3::splat(s);
    }

    /// Updates the first `Spin` rule; returns false if the object has none.
    pub fn set_spin(&mut self, rate: Vec3, enabled: bool) -> bool {
        for a in &mut self.animations {
            if let Animation::Spin { rate: r, enabled: e } = a {
                *r = rate;
                *e = enabled;
                return true;
            }
        }
        false
    }

    /// Enables or disables the first `Spin` rule, keeping its rate.
    pub fn set_spin_enabled(&mut self, enabled: bool) -> bool {
        for a in &mut self.animations {
            if let Animation::Spin { enabled: e, .. } = a {
                *e = enabled;
                return true;
            }
        }
        false
    }

    /// Applies drag rotation, then every animation rule in order.
    ///
    /// Reads only `self` and `tick`; no object update may observe another's.
    pub fn advance(&mut self, tick: &TickInput) {
        let SceneObject { transform, kind, animations, drag, .. } = self;

        if drag.yaw {
            transform.rotation.y += tick.drag.yaw;
        }
        if drag.pitch {
            transform.rotation.x += tick.drag.pitch;
        }

        for animation in animations.iter_mut() {
            animation.apply(transform, kind, *drag, tick);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::RotationDelta;

    fn cube() -> SceneObject {
        let mut o = SceneObject::new(
            ObjectId(1),
            ObjectKind::mesh(GeometryId(0), Material::solid(Color::white())),
        );
        o.draggable(DragAxes::BOTH).animate(Animation::spin(Vec3::new(0.01, 0.01, 0.0)));
        o
    }

    #[test]
    fn drag_rotation_maps_yaw_to_y_and_pitch_to_x() {
        let mut o = cube();
        let tick = TickInput {
            dt: 0.016,
            elapsed: 0.016,
            auto_animate: true,
            dragging: true,
            drag: RotationDelta::new(0.3, -0.2),
        };
        o.advance(&tick);
        assert!((o.transform.rotation.y - 0.3).abs() < 1e-6);
        assert!((o.transform.rotation.x + 0.2).abs() < 1e-6);
    }

    #[test]
    fn drag_is_ignored_on_objects_without_axes() {
        let mut o = cube();
        o.draggable(DragAxes::NONE);
        let tick = TickInput { drag: RotationDelta::new(1.0, 1.0), ..TickInput::default() };
        o.advance(&tick);
        assert_eq!(o.transform.rotation, Vec3::ZERO);
    }

    #[test]
    fn setters_report_missing_material() {
        let mut light = SceneObject::new(ObjectId(2), ObjectKind::Light(Light::ambient(Color::white(), 1.0)));
        assert!(!light.set_color(Color::black()));
        assert!(!light.set_variant(MaterialVariant::Glass));

        let mut o = cube();
        assert!(o.set_color(Color::black()));
        assert_eq!(o.kind.material().map(|m| m.color), Some(Color::black()));
    }

    #[test]
    fn spin_can_be_retuned_in_place() {
        let mut o = cube();
        assert!(o.set_spin(Vec3::new(0.02, 0.02, 0.0), false));
        o.advance(&TickInput { auto_animate: true, ..TickInput::default() });
        assert_eq!(o.transform.rotation, Vec3::ZERO);
    }

    #[test]
    fn point_cloud_pads_attributes() {
        let cloud = PointCloud::new(vec![[0.0; 3]; 3], vec![], vec![1.0]);
        assert_eq!(cloud.colors.len(), 3);
        assert_eq!(cloud.phases, vec![1.0, 0.0, 0.0]);
    }
}
