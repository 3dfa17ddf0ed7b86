use serde::{Deserialize, Serialize};

use isoscene_core::{BBox, Color, Point, Size};

use crate::camera::ViewTransform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
}

/// A single drawing instruction, in the coordinate space set by the most
/// recent `SetTransform` (surface pixels after `ResetTransform`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear {
        size: Size,
    },
    SetTransform {
        transform: ViewTransform,
    },
    ResetTransform,
    FillRadialGradient {
        rect: BBox,
        center: Point,
        radius: f64,
        inner: Color,
        outer: Color,
    },
    FillRect {
        rect: BBox,
        color: Color,
    },
    StrokeRect {
        rect: BBox,
        color: Color,
        line_width: f64,
        /// Dash and gap lengths; `None` for a solid stroke.
        dash: Option<[f64; 2]>,
    },
    FillEllipse {
        center: Point,
        radius_x: f64,
        radius_y: f64,
        color: Color,
    },
    FillPolygon {
        points: Vec<Point>,
        color: Color,
    },
    Line {
        from: Point,
        to: Point,
        color: Color,
        line_width: f64,
    },
    Text {
        position: Point,
        text: String,
        color: Color,
        size: f64,
        align: TextAlign,
    },
}

/// A 2D drawing target supplied by the host (a canvas, a GPU batcher, a test
/// recorder).
pub trait Surface {
    /// Pixel size of the surface.
    fn size(&self) -> Size;
    /// Receive the next command of the current frame.
    fn draw(&mut self, command: DrawCommand);
}

/// A recorded frame: the full command list of one render pass. Serializes to
/// JSON for hosts that replay it on their own canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderFrame {
    pub size: Size,
    pub commands: Vec<DrawCommand>,
}

impl RenderFrame {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drop the previous frame's commands before a redraw.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Texts drawn this frame, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn count(&self, predicate: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| predicate(c)).count()
    }
}

impl Surface for RenderFrame {
    fn size(&self) -> Size {
        self.size
    }

    fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}
