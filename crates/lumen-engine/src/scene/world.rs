use crate::coords::Color;

use super::animation::TickInput;
use super::geometry::{Geometry, GeometryId};
use super::light::Light;
use super::object::{ObjectId, ObjectKind, SceneObject};

/// The world graph of one scene: ordered objects plus a shared geometry table.
///
/// Object order is registration order. It is the iteration order of
/// [`advance`](Self::advance) but carries no meaning: each object's update reads
/// only its own state.
#[derive(Debug, Clone)]
pub struct World {
    objects: Vec<SceneObject>,
    geometries: Vec<(GeometryId, Geometry)>,
    pub background: Color,
    next_object: u32,
    next_geometry: u32,
    generation: u32,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            geometries: Vec::new(),
            background: Color::black(),
            next_object: 0,
            next_geometry: 0,
            generation: 0,
        }
    }

    /// Bumped by [`clear`](Self::clear); renderers drop cached uploads when it changes.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Removes all content. Ids keep counting so stale handles never alias new objects.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.geometries.clear();
        self.background = Color::black();
        self.generation = self.generation.wrapping_add(1);
    }

    // ── geometry ───────────────────────────────────────────────────────────

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryId {
        let id = GeometryId(self.next_geometry);
        self.next_geometry += 1;
        self.geometries.push((id, geometry));
        id
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&Geometry> {
        self.geometries.iter().find(|(g, _)| *g == id).map(|(_, geo)| geo)
    }

    pub fn geometries(&self) -> impl Iterator<Item = (GeometryId, &Geometry)> {
        self.geometries.iter().map(|(id, g)| (*id, g))
    }

    // ── objects ────────────────────────────────────────────────────────────

    /// Registers a new object and returns it for further setup.
    pub fn spawn(&mut self, kind: ObjectKind) -> &mut SceneObject {
        let id = ObjectId(self.next_object);
        self.next_object += 1;
        self.objects.push(SceneObject::new(id, kind));
        let last = self.objects.len() - 1;
        &mut self.objects[last]
    }

    /// Shorthand for spawning a light.
    pub fn add_light(&mut self, light: Light) -> &mut SceneObject {
        self.spawn(ObjectKind::Light(light))
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> impl Iterator<Item = &mut SceneObject> {
        self.objects.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id() == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id() == id)
    }

    /// First object with the given name.
    pub fn named(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name.as_deref() == Some(name))
    }

    pub fn named_mut(&mut self, name: &str) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.name.as_deref() == Some(name))
    }

    /// All objects whose name starts with `prefix` (e.g. every `"glyph:"` part).
    pub fn prefixed_mut<'a>(&'a mut self, prefix: &'a str) -> impl Iterator<Item = &'a mut SceneObject> + 'a {
        self.objects
            .iter_mut()
            .filter(move |o| o.name.as_deref().is_some_and(|n| n.starts_with(prefix)))
    }

    /// Lights paired with their owning transforms.
    pub fn lights(&self) -> impl Iterator<Item = (&Light, &SceneObject)> {
        self.objects.iter().filter_map(|o| match &o.kind {
            ObjectKind::Light(l) if o.visible => Some((l, o)),
            _ => None,
        })
    }

    /// Total points across every point cloud.
    pub fn point_count(&self) -> usize {
        self.objects
            .iter()
            .map(|o| match &o.kind {
                ObjectKind::Points(c) => c.len(),
                _ => 0,
            })
            .sum()
    }

    /// Advances every object by one tick, in registration order.
    pub fn advance(&mut self, tick: &TickInput) {
        for object in &mut self.objects {
            object.advance(tick);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::scene::{Animation, Material};

    #[test]
    fn ids_are_not_reused_after_clear() {
        let mut w = World::new();
        let a = w.spawn(ObjectKind::Light(Light::ambient(Color::white(), 1.0))).id();
        let g = w.add_geometry(Geometry::cube(1.0));
        w.clear();
        let b = w.spawn(ObjectKind::Light(Light::ambient(Color::white(), 1.0))).id();
        let h = w.add_geometry(Geometry::cube(1.0));
        assert_ne!(a, b);
        assert_ne!(g, h);
        assert!(w.geometry(g).is_none());
        assert_eq!(w.generation(), 1);
    }

    #[test]
    fn advance_preserves_registration_order() {
        let mut w = World::new();
        let g = w.add_geometry(Geometry::cube(1.0));
        for i in 0..3 {
            w.spawn(ObjectKind::mesh(g, Material::solid(Color::white())))
                .named(format!("box{i}"))
                .animate(Animation::spin(Vec3::splat(0.1)));
        }
        let before: Vec<_> = w.objects().iter().map(|o| o.id()).collect();
        w.advance(&TickInput { auto_animate: true, ..TickInput::default() });
        let after: Vec<_> = w.objects().iter().map(|o| o.id()).collect();
        assert_eq!(before, after);
        assert!(w.objects().iter().all(|o| (o.transform.rotation.x - 0.1).abs() < 1e-6));
    }

    #[test]
    fn prefix_lookup() {
        let mut w = World::new();
        let g = w.add_geometry(Geometry::cube(1.0));
        w.spawn(ObjectKind::mesh(g, Material::solid(Color::white()))).named("glyph:0:0");
        w.spawn(ObjectKind::mesh(g, Material::solid(Color::white()))).named("glyph:1:0");
        w.spawn(ObjectKind::mesh(g, Material::solid(Color::white()))).named("ground");
        assert_eq!(w.prefixed_mut("glyph:").count(), 2);
        assert!(w.named("ground").is_some());
    }
}
