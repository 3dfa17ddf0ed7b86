//! # IsoScene Renderer
//!
//! Camera, input and draw-command generation for the isometric viewport.
//!
//! Rendering is a pure pass over the scene that emits [`DrawCommand`]s to a
//! [`Surface`]. Hosts implement `Surface` for their canvas; [`RenderFrame`]
//! records commands for tests and for serializing frames to a frontend.

pub mod animation;
pub mod camera;
pub mod config;
pub mod hit_test;
pub mod input;
pub mod order;
pub mod recipe;
pub mod render;
pub mod render_data;
pub mod state;

pub use camera::{Camera, CameraSnapshot, ViewTransform, ZoomBounds};
pub use config::{CameraConfig, SceneConfig, ViewportConfig};
pub use input::{Key, KeyAction, KeyEvent, Tool};
pub use render::{render, RenderToggles, ViewOptions};
pub use render_data::{DrawCommand, RenderFrame, Surface};
pub use state::{ViewportSnapshot, ViewportState};
