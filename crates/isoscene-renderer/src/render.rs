//! The render pass: a pure function from viewport state to draw commands.

use serde::{Deserialize, Serialize};

use isoscene_core::{BBox, Color, ObjectId, ObjectKind, Point, Scene, SceneObject, Size};

use crate::animation::{motion_offset, MotionOffset};
use crate::camera::Camera;
use crate::config::ViewportConfig;
use crate::input::Tool;
use crate::order::draw_order;
use crate::recipe::{recipe, Motion, Part, PartFill, PartShape};
use crate::render_data::{DrawCommand, Surface, TextAlign};

const GRID_COLOR: Color = Color::rgba(0x8B, 0x5C, 0xF6, 0x1A);
const SHADOW_COLOR: Color = Color::rgba(0x00, 0x00, 0x00, 0x33);
const BAR_BACKGROUND: Color = Color::rgba(0x00, 0x00, 0x00, 0x80);
const SELECTION_COLOR: Color = Color::rgb(0x8B, 0x5C, 0xF6);
const OVERLAY_BACKGROUND: Color = Color::rgba(0x00, 0x00, 0x00, 0xB3);

/// Gap between an object's top edge and its health bar.
const HEALTH_BAR_GAP: f64 = 4.0;
const LABEL_SIZE: f64 = 10.0;
/// Minimap panel edge length and its distance from the top-right corner.
const MINIMAP_SIZE: f64 = 140.0;
const MINIMAP_MARGIN: f64 = 10.0;
const MINIMAP_PADDING: f64 = 6.0;
/// Upper bound on grid lines per axis, so a tiny grid size cannot stall a frame.
const MAX_GRID_LINES: usize = 1_000;

/// Visibility switches for optional layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderToggles {
    pub show_grid: bool,
    pub show_ui: bool,
}

impl Default for RenderToggles {
    fn default() -> Self {
        Self {
            show_grid: true,
            show_ui: true,
        }
    }
}

/// Interaction state the render pass needs to read.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewOptions {
    pub toggles: RenderToggles,
    pub selection: Option<ObjectId>,
    pub tool: Tool,
}

/// Color band of a health bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthBand {
    /// Above 60%.
    Healthy,
    /// From 30% to 60%, both inclusive.
    Wounded,
    /// Below 30%.
    Critical,
}

impl HealthBand {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio > 0.6 {
            HealthBand::Healthy
        } else if ratio >= 0.3 {
            HealthBand::Wounded
        } else {
            HealthBand::Critical
        }
    }

    pub fn color(&self) -> Color {
        match self {
            HealthBand::Healthy => Color::rgb(0x22, 0xC5, 0x5E),
            HealthBand::Wounded => Color::rgb(0xF5, 0x9E, 0x0B),
            HealthBand::Critical => Color::rgb(0xDC, 0x26, 0x26),
        }
    }
}

/// Draw one full frame.
///
/// Reads its inputs only. A zero-sized surface gets no commands at all.
pub fn render(
    surface: &mut dyn Surface,
    camera: &Camera,
    scene: &Scene,
    view: &ViewOptions,
    config: &ViewportConfig,
) {
    let size = surface.size();
    if size.is_degenerate() {
        return;
    }

    surface.draw(DrawCommand::Clear { size });
    let (inner, outer) = config.biome.gradient();
    surface.draw(DrawCommand::FillRadialGradient {
        rect: BBox::from_origin_size(Point::ORIGIN, size.width, size.height),
        center: size.center(),
        radius: size.width.max(size.height) * 0.75,
        inner,
        outer,
    });

    surface.draw(DrawCommand::SetTransform {
        transform: camera.transform(size),
    });
    if view.toggles.show_grid {
        if let Some(visible) = camera.visible_bounds(size) {
            draw_grid(surface, &visible, config.grid_size);
        }
    }
    for obj in draw_order(scene.objects()) {
        draw_object(surface, obj, view.selection == Some(obj.id), config);
    }
    surface.draw(DrawCommand::ResetTransform);

    if view.toggles.show_ui {
        draw_overlay(surface, camera, scene, view.tool);
        draw_minimap(surface, scene, size);
    }
}

fn draw_grid(surface: &mut dyn Surface, visible: &BBox, grid_size: f64) {
    if !(grid_size.is_finite() && grid_size > 0.0) {
        return;
    }
    let line = |from, to| DrawCommand::Line {
        from,
        to,
        color: GRID_COLOR,
        line_width: 1.0,
    };

    let start_x = (visible.min.x / grid_size).floor() * grid_size;
    let start_y = (visible.min.y / grid_size).floor() * grid_size;
    let columns = ((visible.max.x - start_x) / grid_size).ceil() as usize + 1;
    let rows = ((visible.max.y - start_y) / grid_size).ceil() as usize + 1;

    for i in 0..columns.min(MAX_GRID_LINES) {
        let x = start_x + i as f64 * grid_size;
        surface.draw(line(Point::new(x, visible.min.y), Point::new(x, visible.max.y)));
    }
    for i in 0..rows.min(MAX_GRID_LINES) {
        let y = start_y + i as f64 * grid_size;
        surface.draw(line(Point::new(visible.min.x, y), Point::new(visible.max.x, y)));
    }
}

fn draw_object(surface: &mut dyn Surface, obj: &SceneObject, selected: bool, config: &ViewportConfig) {
    let anchor = obj.iso_anchor();
    let (w, h) = (obj.width(), obj.height());

    surface.draw(DrawCommand::FillEllipse {
        center: Point::new(anchor.x + w / 2.0, anchor.y + h),
        radius_x: w / 2.0 + 2.0,
        radius_y: 3.0,
        color: SHADOW_COLOR,
    });

    let motion = motion_offset(obj.animation.as_ref(), config.frame_cycle);
    for part in recipe(obj.kind) {
        surface.draw(part_command(part, obj, anchor, motion));
    }

    let bar_top = anchor.y - HEALTH_BAR_GAP - config.health_bar_height;
    if let Some(health) = obj.health {
        let ratio = health.ratio();
        surface.draw(DrawCommand::FillRect {
            rect: BBox::from_origin_size(Point::new(anchor.x, bar_top), w, config.health_bar_height),
            color: BAR_BACKGROUND,
        });
        if ratio > 0.0 {
            surface.draw(DrawCommand::FillRect {
                rect: BBox::from_origin_size(
                    Point::new(anchor.x, bar_top),
                    w * ratio,
                    config.health_bar_height,
                ),
                color: HealthBand::from_ratio(ratio).color(),
            });
        }
    }

    if let Some(name) = &obj.name {
        let text = match obj.level {
            Some(level) => format!("{} (Lv. {})", name, level),
            None => name.clone(),
        };
        let above = if obj.health.is_some() { bar_top } else { anchor.y };
        surface.draw(DrawCommand::Text {
            position: Point::new(anchor.x + w / 2.0, above - 4.0),
            text,
            color: Color::WHITE,
            size: LABEL_SIZE,
            align: TextAlign::Center,
        });
    }

    if selected {
        surface.draw(DrawCommand::StrokeRect {
            rect: obj.iso_bbox().expand(config.selection_margin),
            color: SELECTION_COLOR,
            line_width: 1.5,
            dash: Some([4.0, 3.0]),
        });
    }
}

fn part_command(part: &Part, obj: &SceneObject, anchor: Point, motion: MotionOffset) -> DrawCommand {
    let (w, h) = (obj.width(), obj.height());
    let dy = match part.motion {
        Motion::Still => 0.0,
        Motion::Body => motion.bob,
        Motion::LeftLimb => motion.stride,
        Motion::RightLimb => -motion.stride,
    };
    let at = |u: f64, v: f64| Point::new(anchor.x + u * w, anchor.y + v * h + dy);
    let color = match part.fill {
        PartFill::Body => obj.color,
        PartFill::Fixed(color) => color,
    };
    match part.shape {
        PartShape::Rect { x, y, w: pw, h: ph } => DrawCommand::FillRect {
            rect: BBox::from_origin_size(at(x, y), pw * w, ph * h),
            color,
        },
        PartShape::Ellipse { cx, cy, rx, ry } => DrawCommand::FillEllipse {
            center: at(cx, cy),
            radius_x: rx * w,
            radius_y: ry * h,
            color,
        },
        PartShape::Triangle(corners) => DrawCommand::FillPolygon {
            points: corners.iter().map(|&(u, v)| at(u, v)).collect(),
            color,
        },
    }
}

fn draw_overlay(surface: &mut dyn Surface, camera: &Camera, scene: &Scene, tool: Tool) {
    surface.draw(DrawCommand::FillRect {
        rect: BBox::from_origin_size(Point::new(10.0, 10.0), 200.0, 100.0),
        color: OVERLAY_BACKGROUND,
    });
    let position = camera.position();
    let lines = [
        format!("Camera: ({:.0}, {:.0})", position.x, position.y),
        format!("Zoom: {:.0}%", camera.zoom() * 100.0),
        format!("Rotation: {:.0}°", camera.rotation()),
        format!("Tool: {}", tool.label()),
        format!("Objects: {}", scene.len()),
    ];
    for (i, text) in lines.into_iter().enumerate() {
        surface.draw(DrawCommand::Text {
            position: Point::new(20.0, 30.0 + 18.0 * i as f64),
            text,
            color: Color::WHITE,
            size: 12.0,
            align: TextAlign::Left,
        });
    }
}

/// Top-right screen panel with one dot per object, fitted to the scene's
/// projected bounds. Skipped when the surface cannot hold it.
fn draw_minimap(surface: &mut dyn Surface, scene: &Scene, size: Size) {
    if size.width < MINIMAP_SIZE + 2.0 * MINIMAP_MARGIN || size.height < MINIMAP_SIZE + 2.0 * MINIMAP_MARGIN {
        return;
    }
    let panel = minimap_panel(size);
    surface.draw(DrawCommand::FillRect {
        rect: panel,
        color: OVERLAY_BACKGROUND,
    });
    surface.draw(DrawCommand::StrokeRect {
        rect: panel,
        color: SELECTION_COLOR,
        line_width: 1.0,
        dash: None,
    });

    let Some(bounds) = scene.iso_bounds() else {
        return;
    };
    let inner = panel.expand(-MINIMAP_PADDING);
    let scale = (inner.width() / bounds.width()).min(inner.height() / bounds.height());
    if !(scale.is_finite() && scale > 0.0) {
        return;
    }
    let (from, to) = (bounds.center(), inner.center());
    for obj in draw_order(scene.objects()) {
        let c = obj.iso_bbox().center();
        let (radius, color) = minimap_marker(obj);
        surface.draw(DrawCommand::FillEllipse {
            center: Point::new(to.x + (c.x - from.x) * scale, to.y + (c.y - from.y) * scale),
            radius_x: radius,
            radius_y: radius,
            color,
        });
    }
}

fn minimap_panel(size: Size) -> BBox {
    let origin = Point::new(size.width - MINIMAP_SIZE - MINIMAP_MARGIN, MINIMAP_MARGIN);
    BBox::from_origin_size(origin, MINIMAP_SIZE, MINIMAP_SIZE)
}

fn minimap_marker(obj: &SceneObject) -> (f64, Color) {
    match obj.kind {
        ObjectKind::Player => (2.0, Color::rgb(0x00, 0xFF, 0x00)),
        ObjectKind::Npc | ObjectKind::Character => (1.5, Color::rgb(0xFF, 0x00, 0x00)),
        _ => (1.0, obj.color),
    }
}
