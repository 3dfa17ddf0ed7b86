use serde::{Deserialize, Serialize};

use crate::error::SceneError;
use crate::geometry::BBox;
use crate::object::{ObjectId, SceneObject};

/// The set of placed objects. Insertion order is kept because draw-order ties
/// fall back to it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Build a scene from already-constructed objects, validating each one.
    pub fn from_objects(objects: Vec<SceneObject>) -> Result<Self, SceneError> {
        for obj in &objects {
            obj.validate()?;
        }
        Ok(Self { objects })
    }

    // ── Object management ────────────────────────────────────────────

    pub fn add(&mut self, object: SceneObject) -> ObjectId {
        let id = object.id;
        log::debug!("adding {} {}", object.kind.label(), id);
        self.objects.push(object);
        id
    }

    /// Insert at `index`, or append when the index is past the end.
    pub fn insert(&mut self, index: usize, object: SceneObject) -> ObjectId {
        let id = object.id;
        if index <= self.objects.len() {
            self.objects.insert(index, object);
        } else {
            self.objects.push(object);
        }
        id
    }

    pub fn get(&self, id: &ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == *id)
    }

    pub fn get_mut(&mut self, id: &ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id == *id)
    }

    pub fn index_of(&self, id: &ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == *id)
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.index_of(id).is_some()
    }

    /// Remove an object, returning it with the index it occupied.
    pub fn remove(&mut self, id: &ObjectId) -> Option<(usize, SceneObject)> {
        let index = self.index_of(id)?;
        log::debug!("removing object {} at {}", id, index);
        Some((index, self.objects.remove(index)))
    }

    /// Swap in a new version of an object, returning the old one.
    pub fn replace(&mut self, object: SceneObject) -> Result<SceneObject, SceneError> {
        let slot = self
            .get_mut(&object.id)
            .ok_or(SceneError::UnknownObject(object.id))?;
        Ok(std::mem::replace(slot, object))
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SceneObject> {
        self.objects.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Union of every object's projected box.
    pub fn iso_bounds(&self) -> Option<BBox> {
        self.objects
            .iter()
            .map(|o| o.iso_bbox())
            .reduce(|acc, bb| acc.union(&bb))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::WorldPos;
    use crate::object::ObjectKind;

    fn tree(x: f64, y: f64) -> SceneObject {
        SceneObject::placed(ObjectKind::Tree, WorldPos::ground(x, y)).unwrap()
    }

    #[test]
    fn test_scene_create() {
        let scene = Scene::new();
        assert_eq!(scene.len(), 0);
        assert!(scene.iso_bounds().is_none());
    }

    #[test]
    fn test_add_and_find() {
        let mut scene = Scene::new();
        let id = scene.add(tree(10.0, 10.0));
        assert_eq!(scene.len(), 1);
        assert!(scene.get(&id).is_some());
        assert_eq!(scene.index_of(&id), Some(0));
    }

    #[test]
    fn test_remove_reports_index() {
        let mut scene = Scene::new();
        scene.add(tree(0.0, 0.0));
        let id = scene.add(tree(10.0, 0.0));
        scene.add(tree(20.0, 0.0));
        let (index, removed) = scene.remove(&id).unwrap();
        assert_eq!(index, 1);
        assert_eq!(removed.id, id);
        assert!(scene.remove(&id).is_none());
    }

    #[test]
    fn test_replace_unknown_object() {
        let mut scene = Scene::new();
        assert!(matches!(
            scene.replace(tree(0.0, 0.0)),
            Err(SceneError::UnknownObject(_))
        ));
    }
}
