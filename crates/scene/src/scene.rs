use crate::animation::Animation;
use crate::clock::FrameTime;
use crate::light::{Background, Light};
use crate::material::Material;
use crate::object::{Mesh, ObjectKind, SceneObject};
use paperstar_common::ObjectId;
use paperstar_geometry::BufferGeometry;
use std::collections::BTreeMap;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("object {0} not found")]
    ObjectNotFound(ObjectId),
    #[error("object {0} is not a mesh")]
    NotAMesh(ObjectId),
}

/// A named object stored in the scene.
#[derive(Debug, Clone)]
pub struct SceneEntry {
    pub name: String,
    pub object: SceneObject,
}

/// Everything a renderer draws for one frame.
///
/// Objects live in a BTreeMap keyed by sequential ids, so iteration order is
/// insertion order. Animations are stored beside the objects and only ever
/// write to transforms.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: BTreeMap<ObjectId, SceneEntry>,
    animations: BTreeMap<ObjectId, Animation>,
    lights: Vec<Light>,
    background: Background,
    next_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object and return its id.
    pub fn add(&mut self, name: impl Into<String>, object: impl Into<SceneObject>) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        let entry = SceneEntry {
            name: name.into(),
            object: object.into(),
        };
        tracing::debug!(%id, name = %entry.name, vertices = entry.object.geometry().vertex_count(), "object added");
        self.objects.insert(id, entry);
        id
    }

    /// Remove an object together with its animation.
    pub fn remove(&mut self, id: ObjectId) -> Result<SceneEntry, SceneError> {
        self.animations.remove(&id);
        self.objects.remove(&id).ok_or(SceneError::ObjectNotFound(id))
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneEntry> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneEntry> {
        self.objects.get_mut(&id)
    }

    /// Id of the first object called `name`.
    pub fn find(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, entry)| entry.name == name)
            .map(|(id, _)| *id)
    }

    pub fn mesh_mut(&mut self, id: ObjectId) -> Result<&mut Mesh, SceneError> {
        self.objects
            .get_mut(&id)
            .ok_or(SceneError::ObjectNotFound(id))?
            .object
            .as_mesh_mut()
            .ok_or(SceneError::NotAMesh(id))
    }

    /// Swap the geometry and material of a mesh, keeping its transform.
    pub fn replace_mesh(
        &mut self,
        id: ObjectId,
        geometry: BufferGeometry,
        material: Material,
    ) -> Result<(), SceneError> {
        let mesh = self.mesh_mut(id)?;
        mesh.geometry = geometry;
        mesh.material = material;
        tracing::debug!(%id, vertices = mesh.geometry.vertex_count(), "mesh replaced");
        Ok(())
    }

    pub fn set_animation(&mut self, id: ObjectId, animation: Animation) -> Result<(), SceneError> {
        if !self.objects.contains_key(&id) {
            return Err(SceneError::ObjectNotFound(id));
        }
        self.animations.insert(id, animation);
        Ok(())
    }

    pub fn animation(&self, id: ObjectId) -> Option<&Animation> {
        self.animations.get(&id)
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn set_background(&mut self, background: Background) {
        self.background = background;
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    /// All objects in insertion order.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &SceneEntry)> {
        self.objects.iter().map(|(id, entry)| (*id, entry))
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn mesh_count(&self) -> usize {
        self.count_kind(ObjectKind::Mesh)
    }

    pub fn line_count(&self) -> usize {
        self.count_kind(ObjectKind::Lines)
    }

    fn count_kind(&self, kind: ObjectKind) -> usize {
        self.objects
            .values()
            .filter(|entry| entry.object.kind() == kind)
            .count()
    }

    /// Advance every animation by one frame.
    pub fn update(&mut self, time: &FrameTime) {
        for (id, animation) in &self.animations {
            if let Some(entry) = self.objects.get_mut(id) {
                animation.apply(entry.object.transform_mut(), time);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Pulse;
    use crate::object::LineSegments;
    use glam::Vec3;
    use paperstar_common::Color;

    fn triangle() -> BufferGeometry {
        BufferGeometry::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y])
    }

    fn mesh() -> Mesh {
        Mesh::new(triangle(), Material::standard(Color::WHITE))
    }

    #[test]
    fn ids_are_sequential_and_ordered() {
        let mut scene = Scene::new();
        let a = scene.add("a", mesh());
        let b = scene.add("b", LineSegments::new(triangle()));
        let c = scene.add("c", mesh());
        assert_eq!((a, b, c), (ObjectId(0), ObjectId(1), ObjectId(2)));
        let names: Vec<&str> = scene.objects().map(|(_, e)| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(scene.mesh_count(), 2);
        assert_eq!(scene.line_count(), 1);
        assert_eq!(scene.find("b"), Some(b));
    }

    #[test]
    fn removed_ids_are_not_reused() {
        let mut scene = Scene::new();
        let a = scene.add("a", mesh());
        scene.set_animation(a, Animation::spin(Vec3::X)).unwrap();
        assert!(scene.remove(a).is_ok());
        assert!(scene.animation(a).is_none());
        assert_eq!(scene.remove(a).unwrap_err(), SceneError::ObjectNotFound(a));
        let b = scene.add("b", mesh());
        assert_ne!(a, b);
    }

    #[test]
    fn missing_ids_are_errors() {
        let mut scene = Scene::new();
        let ghost = ObjectId(42);
        assert_eq!(
            scene.set_animation(ghost, Animation::default()),
            Err(SceneError::ObjectNotFound(ghost))
        );
        assert!(scene.mesh_mut(ghost).is_err());
        let lines = scene.add("grid", LineSegments::new(triangle()));
        assert_eq!(scene.mesh_mut(lines).unwrap_err(), SceneError::NotAMesh(lines));
    }

    #[test]
    fn replace_mesh_keeps_transform() {
        let mut scene = Scene::new();
        let id = scene.add("m", mesh().with_transform(paperstar_common::Transform::from_position(Vec3::Y)));
        let old_geometry = scene.get(id).unwrap().object.geometry().id();
        scene
            .replace_mesh(id, triangle(), Material::phong(Color::BLACK))
            .unwrap();
        let entry = scene.get(id).unwrap();
        assert_eq!(entry.object.transform().position, Vec3::Y);
        assert_ne!(entry.object.geometry().id(), old_geometry);
        assert_eq!(entry.object.as_mesh().unwrap().material.kind(), "phong");
    }

    #[test]
    fn update_is_frame_rate_independent() {
        let mut slow = Scene::new();
        let mut fast = Scene::new();
        let spin = Animation::spin(Vec3::new(0.0, 0.05, 0.0));
        let a = slow.add("s", mesh());
        let b = fast.add("s", mesh());
        slow.set_animation(a, spin).unwrap();
        fast.set_animation(b, spin).unwrap();

        for frame in 1..=2 {
            slow.update(&FrameTime::fixed(frame, 30.0));
        }
        for frame in 1..=4 {
            fast.update(&FrameTime::fixed(frame, 60.0));
        }
        let ry_slow = slow.get(a).unwrap().object.transform().rotation.y;
        let ry_fast = fast.get(b).unwrap().object.transform().rotation.y;
        assert!((ry_slow - ry_fast).abs() < 1e-5);
        assert!((ry_fast - 0.2).abs() < 1e-5);
    }

    #[test]
    fn update_applies_pulse_from_elapsed_time() {
        let mut scene = Scene::new();
        let id = scene.add("star", mesh());
        let pulse = Pulse {
            base: 1.0,
            amplitude: 0.04,
            frequency: 0.006,
        };
        scene
            .set_animation(id, Animation::default().with_pulse(pulse))
            .unwrap();
        let time = FrameTime::fixed(15, 60.0);
        scene.update(&time);
        let expected = pulse.scale_at(time.elapsed_ms());
        let scale = scene.get(id).unwrap().object.transform().scale;
        assert!((scale - Vec3::splat(expected)).length() < 1e-6);
    }

    #[test]
    fn lights_and_background_are_stored() {
        let mut scene = Scene::new();
        scene.add_light(Light::Ambient {
            color: Color::WHITE,
            intensity: 1.0,
        });
        scene.set_background(Background::Color(Color::WHITE));
        assert_eq!(scene.lights().len(), 1);
        assert_eq!(scene.background(), &Background::Color(Color::WHITE));
    }
}
