use serde::{Deserialize, Serialize};

use isoscene_core::{ObjectId, Point, WorldPos};

/// The active pointer tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Click to select; clicking empty space clears the selection.
    #[default]
    Select,
    /// Drag to pan the camera.
    Move,
    /// Click to place an object of the current placement kind.
    Place,
    /// Drag an object around the ground plane.
    Drag,
}

impl Tool {
    pub fn label(&self) -> &'static str {
        match self {
            Tool::Select => "select",
            Tool::Move => "move",
            Tool::Place => "place",
            Tool::Drag => "drag",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Delete,
    Backspace,
    Space,
    Home,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub ctrl: bool,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self { key, ctrl: false }
    }

    pub fn with_ctrl(key: Key) -> Self {
        Self { key, ctrl: true }
    }
}

/// What a key press asks the viewport to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyAction {
    /// Unit direction; scaled by the nudge step and zoom.
    Nudge { dx: f64, dy: f64 },
    DeleteSelected,
    ZoomIn,
    ZoomOut,
    ResetCamera,
    FrameAll,
    ToggleFollow,
    ToggleGrid,
    ToggleUi,
    TogglePlayback,
    Undo,
    Redo,
}

/// Map a key press to its action. Unbound keys yield `None`.
pub fn key_action(event: &KeyEvent) -> Option<KeyAction> {
    let nudge = |dx, dy| Some(KeyAction::Nudge { dx, dy });
    match event.key {
        Key::ArrowUp => nudge(0.0, -1.0),
        Key::ArrowDown => nudge(0.0, 1.0),
        Key::ArrowLeft => nudge(-1.0, 0.0),
        Key::ArrowRight => nudge(1.0, 0.0),
        Key::Delete | Key::Backspace => Some(KeyAction::DeleteSelected),
        Key::Space => Some(KeyAction::TogglePlayback),
        Key::Home => Some(KeyAction::FrameAll),
        Key::Char(c) if event.ctrl => match c.to_ascii_lowercase() {
            'z' => Some(KeyAction::Undo),
            'y' => Some(KeyAction::Redo),
            _ => None,
        },
        Key::Char(c) => match c.to_ascii_lowercase() {
            'w' => nudge(0.0, -1.0),
            's' => nudge(0.0, 1.0),
            'a' => nudge(-1.0, 0.0),
            'd' => nudge(1.0, 0.0),
            '+' | '=' => Some(KeyAction::ZoomIn),
            '-' | '_' => Some(KeyAction::ZoomOut),
            '0' => Some(KeyAction::ResetCamera),
            'f' => Some(KeyAction::ToggleFollow),
            'g' => Some(KeyAction::ToggleGrid),
            'u' => Some(KeyAction::ToggleUi),
            ' ' => Some(KeyAction::TogglePlayback),
            _ => None,
        },
    }
}

/// An in-progress pointer drag. Starts on pointer-down and is always ended
/// by pointer-up, wherever the pointer is by then.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragSession {
    Pan {
        start_pointer: Point,
        start_camera: Point,
    },
    Object {
        id: ObjectId,
        start_pointer: Point,
        start_position: WorldPos,
    },
}

impl DragSession {
    pub fn start_pointer(&self) -> Point {
        match self {
            DragSession::Pan { start_pointer, .. } | DragSession::Object { start_pointer, .. } => {
                *start_pointer
            }
        }
    }
}
