use std::collections::HashSet;

use isoscene_core::{ObjectId, Point, Scene, Size, SpatialIndex};

use crate::camera::Camera;
use crate::order::draw_order;

/// Relative slack on box edges. Screen-to-world conversion rounds, so a point
/// placed exactly on a box corner can come back a few ulps outside it.
const PICK_EPSILON: f64 = 1e-9;

/// Edge slack for a pick at `point`, scaled to the magnitude of its coordinates.
pub fn pick_tolerance(point: Point) -> f64 {
    PICK_EPSILON * (1.0 + point.x.abs().max(point.y.abs()))
}

/// The object under a surface-pixel position, or `None` on a miss.
pub fn pick(scene: &Scene, camera: &Camera, surface: Size, screen: Point) -> Option<ObjectId> {
    if surface.is_degenerate() {
        return None;
    }
    pick_at(scene, camera.screen_to_world(screen, surface))
}

/// The front-most object whose projected box contains `point`.
///
/// The R-tree narrows the candidates; the reverse draw order decides between
/// overlapping ones, so whatever is drawn on top wins.
pub fn pick_at(scene: &Scene, point: Point) -> Option<ObjectId> {
    if !point.is_finite() {
        return None;
    }
    let tolerance = pick_tolerance(point);
    let index = SpatialIndex::from_scene(scene);
    let candidates: HashSet<ObjectId> = index
        .query_near(&point, tolerance)
        .into_iter()
        .map(|entry| entry.object_id)
        .collect();
    if candidates.is_empty() {
        return None;
    }
    draw_order(scene.objects())
        .into_iter()
        .rev()
        .find(|obj| candidates.contains(&obj.id))
        .map(|obj| obj.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use isoscene_core::{project, unproject, ObjectKind, SceneObject, WorldPos};

    use crate::camera::ZoomBounds;
    use crate::config::CameraConfig;

    const SURFACE: Size = Size::new(800.0, 600.0);

    /// Reference pick: scan the sorted list back to front.
    fn pick_linear(scene: &Scene, point: Point) -> Option<ObjectId> {
        let tolerance = pick_tolerance(point);
        draw_order(scene.objects())
            .into_iter()
            .rev()
            .find(|o| o.iso_bbox().expand(tolerance).contains_point(&point))
            .map(|o| o.id)
    }

    fn place(scene: &mut Scene, kind: ObjectKind, x: f64, y: f64) -> ObjectId {
        scene.add(SceneObject::placed(kind, WorldPos::ground(x, y)).unwrap())
    }

    fn camera(x: f64, y: f64, zoom: f64, rotation: f64) -> Camera {
        let config = CameraConfig {
            x,
            y,
            zoom,
            rotation,
            smoothing: 0.1,
        };
        Camera::new(&config, ZoomBounds::default())
    }

    #[test]
    fn test_miss_is_none() {
        let mut scene = Scene::new();
        place(&mut scene, ObjectKind::Tree, 0.0, 0.0);
        assert_eq!(pick(&scene, &Camera::default(), SURFACE, Point::new(5.0, 5.0)), None);
        assert_eq!(pick(&Scene::new(), &Camera::default(), SURFACE, Point::new(400.0, 300.0)), None);
    }

    #[test]
    fn test_front_most_wins() {
        let mut scene = Scene::new();
        // The building's bottom edge is nearer the viewer, so it draws last.
        let tree = place(&mut scene, ObjectKind::Tree, 100.0, 100.0);
        let building = place(&mut scene, ObjectKind::Building, 100.0, 100.0);
        let anchor = project(WorldPos::ground(100.0, 100.0));
        let inside_both = anchor.translate(5.0, 5.0);
        assert_eq!(pick_at(&scene, inside_both), Some(building));

        // Raise the tree: higher z always draws last.
        scene.get_mut(&tree).unwrap().position.z = 1.0;
        let raised = project(scene.get(&tree).unwrap().position).translate(5.0, 5.0);
        assert_eq!(pick_at(&scene, raised), Some(tree));
    }

    #[test]
    fn test_pick_through_rotated_zoomed_camera() {
        let mut scene = Scene::new();
        let npc = place(&mut scene, ObjectKind::Npc, 120.0, 80.0);
        let camera = camera(30.0, 70.0, 2.0, 30.0);
        let inside = scene.get(&npc).unwrap().iso_bbox().center();
        let screen = camera.world_to_screen(inside, SURFACE);
        assert_eq!(pick(&scene, &camera, SURFACE, screen), Some(npc));
    }

    #[test]
    fn test_corner_placed_under_pointer_is_picked() {
        let mut misses = Vec::new();
        for rotation in [0.0, 17.0, 33.0, 45.0, 90.0, 135.0] {
            for zoom in [0.7, 1.0, 1.7, 2.3] {
                let camera = camera(13.7, -41.3, zoom, rotation);
                for i in 0..20 {
                    let screen = Point::new(37.3 + 36.1 * i as f64, 23.9 + 27.7 * i as f64);
                    let ground = unproject(camera.screen_to_world(screen, SURFACE), 0.0);
                    let mut scene = Scene::new();
                    let id = place(&mut scene, ObjectKind::Character, ground.x, ground.y);
                    if pick(&scene, &camera, SURFACE, screen) != Some(id) {
                        misses.push((rotation, zoom, i));
                    }
                }
            }
        }
        assert!(misses.is_empty(), "missed at {:?}", misses);
    }

    #[test]
    fn test_tolerance_stays_tiny() {
        let mut scene = Scene::new();
        place(&mut scene, ObjectKind::Tree, 0.0, 0.0);
        assert_eq!(pick_at(&scene, Point::new(-0.001, 10.0)), None);
        assert_eq!(pick_at(&scene, Point::new(f64::NAN, 10.0)), None);
    }

    #[test]
    fn test_index_agrees_with_linear_scan() {
        let mut scene = Scene::new();
        for i in 0..8 {
            let kind = ObjectKind::ALL[i % ObjectKind::ALL.len()];
            place(&mut scene, kind, 20.0 * i as f64, 15.0 * (i % 3) as f64);
        }
        for x in (-60..200).step_by(7) {
            for y in (-20..160).step_by(7) {
                let p = Point::new(x as f64, y as f64);
                assert_eq!(pick_at(&scene, p), pick_linear(&scene, p), "at {:?}", p);
            }
        }
    }

    #[test]
    fn test_degenerate_surface_never_hits() {
        let mut scene = Scene::new();
        place(&mut scene, ObjectKind::Building, 0.0, 0.0);
        assert_eq!(pick(&scene, &Camera::default(), Size::new(0.0, 0.0), Point::ORIGIN), None);
    }
}
