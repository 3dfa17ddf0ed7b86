use std::cmp::Ordering;

use isoscene_core::SceneObject;

/// Draw-order comparator: elevation `z` first, then the visual bottom edge
/// `y + height`. Nearer objects compare greater and are drawn later.
pub fn compare_draw_order(a: &SceneObject, b: &SceneObject) -> Ordering {
    a.position
        .z
        .total_cmp(&b.position.z)
        .then_with(|| a.bottom_edge().total_cmp(&b.bottom_edge()))
}

/// Objects in the order they must be drawn. Stable: ties keep insertion order.
pub fn draw_order(objects: &[SceneObject]) -> Vec<&SceneObject> {
    let mut sorted: Vec<&SceneObject> = objects.iter().collect();
    sorted.sort_by(|a, b| compare_draw_order(a, b));
    sorted
}
