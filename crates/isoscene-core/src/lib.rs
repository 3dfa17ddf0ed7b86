//! # IsoScene Core
//!
//! Scene model for the isometric editor viewport: world/iso geometry,
//! placed scene objects, reversible edit commands (undo/redo), and an
//! R-tree index over projected object boxes.
//!
//! Nothing here draws. The renderer crate consumes these types.

pub mod commands;
pub mod error;
pub mod geometry;
pub mod object;
pub mod palette;
pub mod scene;
pub mod spatial;

pub use commands::{Command, CommandHistory};
pub use error::SceneError;
pub use geometry::{project, unproject, BBox, Point, Size, WorldPos};
pub use object::{Animation, AnimationCycle, Health, ObjectId, ObjectKind, ObjectSpec, SceneObject};
pub use palette::{Biome, Color};
pub use scene::Scene;
pub use spatial::SpatialIndex;
