use rstar::{RTree, RTreeObject, AABB};

use crate::geometry::{BBox, Point};
use crate::object::ObjectId;
use crate::scene::Scene;

/// One object's projected box, as stored in the R-tree.
#[derive(Debug, Clone)]
pub struct SpatialEntry {
    pub object_id: ObjectId,
    pub bbox: BBox,
}

impl RTreeObject for SpatialEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.bbox.min.x, self.bbox.min.y],
            [self.bbox.max.x, self.bbox.max.y],
        )
    }
}

/// Broad phase for picking: candidate objects under an iso-plane point.
///
/// Built per query from the scene, so it never goes stale after edits.
pub struct SpatialIndex {
    tree: RTree<SpatialEntry>,
}

impl SpatialIndex {
    pub fn from_scene(scene: &Scene) -> Self {
        let entries = scene
            .iter()
            .map(|obj| SpatialEntry {
                object_id: obj.id,
                bbox: obj.iso_bbox(),
            })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Entries whose box contains `point`, edges included. Unordered.
    pub fn query_point(&self, point: &Point) -> Vec<&SpatialEntry> {
        self.query_near(point, 0.0)
    }

    /// Entries whose box comes within `tolerance` of `point` on each axis.
    pub fn query_near(&self, point: &Point, tolerance: f64) -> Vec<&SpatialEntry> {
        let t = tolerance.max(0.0);
        let envelope = AABB::from_corners([point.x - t, point.y - t], [point.x + t, point.y + t]);
        self.tree.locate_in_envelope_intersecting(&envelope).collect()
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{project, WorldPos};
    use crate::object::{ObjectKind, SceneObject};

    fn ids_at(index: &SpatialIndex, p: Point) -> Vec<ObjectId> {
        let mut ids: Vec<ObjectId> = index.query_point(&p).iter().map(|e| e.object_id).collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_candidates_under_point() {
        let mut scene = Scene::new();
        let tree = scene.add(SceneObject::placed(ObjectKind::Tree, WorldPos::ground(120.0, 80.0)).unwrap());
        let rock = scene.add(SceneObject::placed(ObjectKind::Resource, WorldPos::ground(400.0, 0.0)).unwrap());
        let index = SpatialIndex::from_scene(&scene);
        assert_eq!(index.len(), 2);

        // Tree box on the iso plane: (40, 100) to (65, 140).
        assert_eq!(ids_at(&index, Point::new(50.0, 120.0)), vec![tree]);
        assert_eq!(ids_at(&index, project(WorldPos::ground(400.0, 0.0))), vec![rock]);
        assert!(ids_at(&index, Point::new(-50.0, -50.0)).is_empty());
    }

    #[test]
    fn test_box_edges_are_inside() {
        let mut scene = Scene::new();
        let id = scene.add(SceneObject::placed(ObjectKind::Building, WorldPos::ground(0.0, 0.0)).unwrap());
        let index = SpatialIndex::from_scene(&scene);
        assert_eq!(ids_at(&index, Point::new(0.0, 0.0)), vec![id]);
        assert_eq!(ids_at(&index, Point::new(60.0, 80.0)), vec![id]);
        assert!(ids_at(&index, Point::new(60.01, 80.0)).is_empty());
    }

    #[test]
    fn test_overlapping_boxes_all_returned() {
        let mut scene = Scene::new();
        let a = scene.add(SceneObject::placed(ObjectKind::Npc, WorldPos::ground(10.0, 10.0)).unwrap());
        let b = scene.add(SceneObject::placed(ObjectKind::Player, WorldPos::ground(10.0, 10.0)).unwrap());
        let index = SpatialIndex::from_scene(&scene);
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(ids_at(&index, project(WorldPos::ground(12.0, 12.0))), expected);
    }

    #[test]
    fn test_query_near_reaches_just_outside() {
        let mut scene = Scene::new();
        let id = scene.add(SceneObject::placed(ObjectKind::Tree, WorldPos::ground(0.0, 0.0)).unwrap());
        let index = SpatialIndex::from_scene(&scene);
        let outside = Point::new(-1e-7, 20.0);
        assert!(index.query_point(&outside).is_empty());
        let near: Vec<ObjectId> = index.query_near(&outside, 1e-6).iter().map(|e| e.object_id).collect();
        assert_eq!(near, vec![id]);
    }

    #[test]
    fn test_empty_scene() {
        let index = SpatialIndex::from_scene(&Scene::new());
        assert!(index.is_empty());
        assert!(ids_at(&index, Point::ORIGIN).is_empty());
    }
}
