use serde::{Deserialize, Serialize};

use isoscene_core::{BBox, ObjectId, Point, Size};

use crate::config::CameraConfig;

/// Allowed zoom range. Every zoom mutation is clamped into it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomBounds {
    pub min: f64,
    pub max: f64,
}

impl ZoomBounds {
    pub fn clamp(&self, zoom: f64) -> f64 {
        zoom.max(self.min).min(self.max)
    }
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self { min: 0.3, max: 3.0 }
    }
}

/// A canvas-style 2D affine transform: `x' = a x + c y + e`, `y' = b x + d y + f`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl ViewTransform {
    pub const IDENTITY: ViewTransform = ViewTransform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }
}

/// Camera over the projected (isometric) plane.
///
/// The view transform is composed as: translate to the surface center, scale
/// by `zoom`, rotate by `rotation`, translate by `-position`. Zoom and
/// rotation therefore pivot on the surface center.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Focus point on the projected plane.
    position: Point,
    zoom: f64,
    /// Degrees, kept in `-180.0..180.0`.
    rotation: f64,
    /// Object the camera eases toward while following. Not owned; may dangle.
    pub follow_target: Option<ObjectId>,
    smoothing: f64,
    bounds: ZoomBounds,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&CameraConfig::default(), ZoomBounds::default())
    }
}

impl Camera {
    pub fn new(config: &CameraConfig, bounds: ZoomBounds) -> Self {
        let mut camera = Self {
            position: Point::ORIGIN,
            zoom: 1.0_f64.max(bounds.min).min(bounds.max),
            rotation: 0.0,
            follow_target: None,
            smoothing: 0.1,
            bounds,
        };
        camera.set_position(Point::new(config.x, config.y));
        camera.set_zoom(config.zoom);
        camera.set_rotation(config.rotation);
        camera.set_smoothing(config.smoothing);
        camera
    }

    /// Return to the given initial values. Follow mode is switched off.
    pub fn reset(&mut self, config: &CameraConfig) {
        *self = Self::new(config, self.bounds);
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn smoothing(&self) -> f64 {
        self.smoothing
    }

    pub fn bounds(&self) -> ZoomBounds {
        self.bounds
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Non-finite requests are ignored.
    pub fn set_position(&mut self, position: Point) {
        if position.is_finite() {
            self.position = position;
        } else {
            log::debug!("ignoring non-finite camera position");
        }
    }

    /// Clamped into the zoom bounds; non-finite requests are ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = self.bounds.clamp(zoom);
        } else {
            log::debug!("ignoring non-finite zoom {}", zoom);
        }
    }

    pub fn zoom_in(&mut self, step: f64) {
        if step.is_finite() && step > 0.0 {
            self.set_zoom(self.zoom * step);
        }
    }

    pub fn zoom_out(&mut self, step: f64) {
        if step.is_finite() && step > 0.0 {
            self.set_zoom(self.zoom / step);
        }
    }

    /// Zoom by `factor` keeping the point under `screen` fixed.
    pub fn zoom_at(&mut self, screen: Point, surface: Size, factor: f64) {
        if !(factor.is_finite() && factor > 0.0) || surface.is_degenerate() {
            return;
        }
        let before = self.screen_to_world(screen, surface);
        self.set_zoom(self.zoom * factor);
        let after = self.screen_to_world(screen, surface);
        self.set_position(self.position.translate(before.x - after.x, before.y - after.y));
    }

    /// Degrees; wrapped into `-180.0..180.0`.
    pub fn set_rotation(&mut self, degrees: f64) {
        if degrees.is_finite() {
            self.rotation = (degrees + 180.0).rem_euclid(360.0) - 180.0;
        }
    }

    pub fn set_smoothing(&mut self, smoothing: f64) {
        if smoothing.is_finite() {
            self.smoothing = smoothing.clamp(0.0, 1.0);
        }
    }

    /// Pan relative to a position captured at drag start. Pixel deltas are
    /// scaled by `1 / zoom` so panning feels the same at any zoom.
    pub fn pan_from(&mut self, start: Point, dx: f64, dy: f64) {
        self.set_position(start.translate(-dx / self.zoom, -dy / self.zoom));
    }

    /// Move the focus point by a camera-space offset.
    pub fn nudge(&mut self, dx: f64, dy: f64) {
        self.set_position(self.position.translate(dx, dy));
    }

    /// One exponential-decay step toward `target`.
    pub fn follow_step(&mut self, target: Point) {
        let next = Point::new(
            self.position.x + (target.x - self.position.x) * self.smoothing,
            self.position.y + (target.y - self.position.y) * self.smoothing,
        );
        self.set_position(next);
    }

    /// Center on a box and pick the zoom that fits it with a 10% margin.
    pub fn fit_bbox(&mut self, bbox: &BBox, surface: Size) {
        let width = bbox.width();
        let height = bbox.height();
        if width <= 0.0 || height <= 0.0 || surface.is_degenerate() {
            return;
        }
        self.set_position(bbox.center());
        let zoom_x = surface.width / width * 0.9;
        let zoom_y = surface.height / height * 0.9;
        self.set_zoom(zoom_x.min(zoom_y));
    }

    // ── Coordinate conversion ────────────────────────────────────────

    /// The composed view transform for a surface of the given size.
    pub fn transform(&self, surface: Size) -> ViewTransform {
        let center = surface.center();
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let z = self.zoom;
        let (px, py) = (-self.position.x, -self.position.y);
        ViewTransform {
            a: z * cos,
            b: z * sin,
            c: -z * sin,
            d: z * cos,
            e: center.x + z * (cos * px - sin * py),
            f: center.y + z * (sin * px + cos * py),
        }
    }

    /// Map a point on the projected plane to surface pixels.
    pub fn world_to_screen(&self, world: Point, surface: Size) -> Point {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let dx = world.x - self.position.x;
        let dy = world.y - self.position.y;
        let center = surface.center();
        Point::new(
            center.x + self.zoom * (dx * cos - dy * sin),
            center.y + self.zoom * (dx * sin + dy * cos),
        )
    }

    /// Map surface pixels back to the projected plane, undoing the center
    /// translation, the scale, the rotation and the camera offset in turn.
    pub fn screen_to_world(&self, screen: Point, surface: Size) -> Point {
        let center = surface.center();
        let sx = (screen.x - center.x) / self.zoom;
        let sy = (screen.y - center.y) / self.zoom;
        let (sin, cos) = (-self.rotation.to_radians()).sin_cos();
        let rx = sx * cos - sy * sin;
        let ry = sx * sin + sy * cos;
        Point::new(rx + self.position.x, ry + self.position.y)
    }

    /// The region of the projected plane covered by the surface.
    pub fn visible_bounds(&self, surface: Size) -> Option<BBox> {
        if surface.is_degenerate() {
            return None;
        }
        let corners = [
            Point::new(0.0, 0.0),
            Point::new(surface.width, 0.0),
            Point::new(0.0, surface.height),
            Point::new(surface.width, surface.height),
        ]
        .map(|p| self.screen_to_world(p, surface));
        BBox::from_points(&corners)
    }

    pub fn snapshot(&self) -> CameraSnapshot {
        CameraSnapshot {
            x: self.position.x,
            y: self.position.y,
            zoom: self.zoom,
            rotation: self.rotation,
            smoothing: self.smoothing,
        }
    }
}

/// Read-only camera values for side panels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraSnapshot {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
    pub rotation: f64,
    pub smoothing: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SURFACE: Size = Size::new(800.0, 600.0);

    fn assert_close(a: Point, b: Point) {
        assert!((a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_zoom_in_clamps_exactly_to_max() {
        let mut camera = Camera::default();
        for _ in 0..50 {
            camera.zoom_in(1.2);
        }
        assert_eq!(camera.zoom(), 3.0);
        for _ in 0..50 {
            camera.zoom_out(1.2);
        }
        assert_eq!(camera.zoom(), 0.3);
    }

    #[test]
    fn test_set_zoom_clamps_and_ignores_nan() {
        let mut camera = Camera::default();
        camera.set_zoom(10.0);
        assert_eq!(camera.zoom(), 3.0);
        camera.set_zoom(f64::NAN);
        assert_eq!(camera.zoom(), 3.0);
        camera.set_zoom(f64::INFINITY);
        assert_eq!(camera.zoom(), 3.0);
        camera.set_zoom(-1.0);
        assert_eq!(camera.zoom(), 0.3);
    }

    #[test]
    fn test_rotation_wraps() {
        let mut camera = Camera::default();
        camera.set_rotation(190.0);
        assert!((camera.rotation() + 170.0).abs() < 1e-10);
        camera.set_rotation(f64::NAN);
        assert!((camera.rotation() + 170.0).abs() < 1e-10);
    }

    #[test]
    fn test_pan_scales_with_zoom() {
        let mut camera = Camera::default();
        camera.set_zoom(2.0);
        camera.pan_from(Point::ORIGIN, 10.0, 20.0);
        assert_close(camera.position(), Point::new(-5.0, -10.0));

        camera.set_zoom(0.5);
        camera.pan_from(Point::ORIGIN, 10.0, 20.0);
        assert_close(camera.position(), Point::new(-20.0, -40.0));
    }

    #[test]
    fn test_screen_world_round_trip() {
        let config = CameraConfig {
            x: 35.0,
            y: -12.0,
            zoom: 1.7,
            rotation: 33.0,
            smoothing: 0.1,
        };
        let camera = Camera::new(&config, ZoomBounds::default());
        for &(x, y) in &[(0.0, 0.0), (40.0, 100.0), (-250.5, 13.25)] {
            let world = Point::new(x, y);
            let screen = camera.world_to_screen(world, SURFACE);
            assert_close(camera.screen_to_world(screen, SURFACE), world);
            assert_close(camera.transform(SURFACE).apply(world), screen);
        }
    }

    #[test]
    fn test_default_camera_maps_origin_to_center() {
        let camera = Camera::default();
        assert_close(camera.world_to_screen(Point::ORIGIN, SURFACE), Point::new(400.0, 300.0));
    }

    #[test]
    fn test_zoom_pivots_on_center() {
        let mut camera = Camera::default();
        camera.set_position(Point::new(50.0, 50.0));
        camera.set_rotation(45.0);
        camera.set_zoom(2.5);
        // Whatever sits at the camera position stays at the surface center.
        assert_close(
            camera.world_to_screen(Point::new(50.0, 50.0), SURFACE),
            SURFACE.center(),
        );
    }

    #[test]
    fn test_zoom_at_keeps_cursor_point_fixed() {
        let mut camera = Camera::default();
        let cursor = Point::new(600.0, 150.0);
        let before = camera.screen_to_world(cursor, SURFACE);
        camera.zoom_at(cursor, SURFACE, 1.5);
        assert_close(camera.screen_to_world(cursor, SURFACE), before);
    }

    #[test]
    fn test_follow_step_eases() {
        let mut camera = Camera::default();
        camera.set_smoothing(0.25);
        camera.follow_step(Point::new(100.0, -40.0));
        assert_close(camera.position(), Point::new(25.0, -10.0));
        camera.follow_step(Point::new(100.0, -40.0));
        assert_close(camera.position(), Point::new(43.75, -17.5));
    }

    #[test]
    fn test_fit_bbox_clamps_zoom() {
        let mut camera = Camera::default();
        let tiny = BBox::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        camera.fit_bbox(&tiny, SURFACE);
        assert_eq!(camera.zoom(), 3.0);
        assert_close(camera.position(), Point::new(0.5, 0.5));
    }
}
