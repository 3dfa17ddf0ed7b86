use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SceneError;
use crate::geometry::{project, BBox, Point, WorldPos};
use crate::palette::Color;

/// Unique scene object identifier.
pub type ObjectId = Uuid;

/// The closed set of things that can be placed in a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Character,
    Player,
    Npc,
    Building,
    Tree,
    #[serde(alias = "rock")]
    Resource,
}

/// Size, color and vitals a freshly placed object of a kind starts with.
#[derive(Debug, Clone, Copy)]
pub struct KindDefaults {
    pub width: f64,
    pub height: f64,
    pub color: Color,
    /// Living kinds start at full health, level 1, idling.
    pub living: bool,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 6] = [
        ObjectKind::Character,
        ObjectKind::Player,
        ObjectKind::Npc,
        ObjectKind::Building,
        ObjectKind::Tree,
        ObjectKind::Resource,
    ];

    pub fn defaults(&self) -> KindDefaults {
        let (width, height, color, living) = match self {
            ObjectKind::Character => (20.0, 30.0, Color::rgb(0x8B, 0x5C, 0xF6), true),
            ObjectKind::Player => (20.0, 30.0, Color::rgb(0x3B, 0x82, 0xF6), true),
            ObjectKind::Npc => (18.0, 28.0, Color::rgb(0xF5, 0x9E, 0x0B), true),
            ObjectKind::Building => (60.0, 80.0, Color::rgb(0x6B, 0x72, 0x80), false),
            ObjectKind::Tree => (25.0, 40.0, Color::rgb(0x10, 0xB9, 0x81), false),
            ObjectKind::Resource => (24.0, 18.0, Color::rgb(0x78, 0x71, 0x6C), false),
        };
        KindDefaults {
            width,
            height,
            color,
            living,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ObjectKind::Character => "character",
            ObjectKind::Player => "player",
            ObjectKind::Npc => "npc",
            ObjectKind::Building => "building",
            ObjectKind::Tree => "tree",
            ObjectKind::Resource => "resource",
        }
    }
}

pub const DEFAULT_MAX_HEALTH: f64 = 100.0;
pub const DEFAULT_ANIMATION_SPEED: f64 = 0.1;

/// Current and maximum hit points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: f64,
    pub max: f64,
}

impl Health {
    pub fn new(current: f64, max: f64) -> Result<Self, SceneError> {
        let valid = current.is_finite() && max.is_finite() && max > 0.0;
        if !valid || current < 0.0 || current > max {
            return Err(SceneError::InvalidHealth {
                health: current,
                max_health: max,
            });
        }
        Ok(Self { current, max })
    }

    pub fn full(max: f64) -> Result<Self, SceneError> {
        Self::new(max, max)
    }

    /// Fraction of health remaining, in `0.0..=1.0`.
    pub fn ratio(&self) -> f64 {
        (self.current / self.max).clamp(0.0, 1.0)
    }
}

/// Which motion an animated object is playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationCycle {
    #[default]
    Idle,
    Walk,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    /// Position within the cycle, always in `0.0..cycle_length`.
    pub frame: f64,
    /// Frames advanced per frame interval.
    pub speed: f64,
    #[serde(default)]
    pub cycle: AnimationCycle,
}

impl Animation {
    pub fn new(cycle: AnimationCycle, speed: f64) -> Self {
        Self {
            frame: 0.0,
            speed,
            cycle,
        }
    }

    pub fn idle() -> Self {
        Self::new(AnimationCycle::Idle, DEFAULT_ANIMATION_SPEED)
    }
}

/// A placed, drawable object in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: ObjectId,
    pub position: WorldPos,
    pub kind: ObjectKind,
    pub color: Color,
    width: f64,
    height: f64,
    pub name: Option<String>,
    pub health: Option<Health>,
    pub level: Option<u32>,
    pub animation: Option<Animation>,
}

impl SceneObject {
    /// Create a bare object with explicit size and color.
    pub fn new(
        kind: ObjectKind,
        position: WorldPos,
        width: f64,
        height: f64,
        color: Color,
    ) -> Result<Self, SceneError> {
        check_size(width, height)?;
        if !position.is_finite() {
            return Err(SceneError::NonFinitePosition);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            position,
            kind,
            color,
            width,
            height,
            name: None,
            health: None,
            level: None,
            animation: None,
        })
    }

    /// Create an object the way the placement tool does: kind-specific size and color,
    /// and for living kinds full health, level 1 and an idle animation.
    pub fn placed(kind: ObjectKind, position: WorldPos) -> Result<Self, SceneError> {
        let defaults = kind.defaults();
        let mut obj = Self::new(kind, position, defaults.width, defaults.height, defaults.color)?;
        if defaults.living {
            obj.health = Some(Health::full(DEFAULT_MAX_HEALTH)?);
            obj.level = Some(1);
            obj.animation = Some(Animation::idle());
        }
        Ok(obj)
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_health(mut self, current: f64, max: f64) -> Result<Self, SceneError> {
        self.health = Some(Health::new(current, max)?);
        Ok(self)
    }

    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animation = Some(animation);
        self
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn set_size(&mut self, width: f64, height: f64) -> Result<(), SceneError> {
        check_size(width, height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Set current health, keeping it within `0..=max`.
    pub fn set_health(&mut self, current: f64) {
        if let Some(health) = &mut self.health {
            if current.is_finite() {
                health.current = current.clamp(0.0, health.max);
            }
        }
    }

    /// Projected top-left anchor of the object.
    pub fn iso_anchor(&self) -> Point {
        project(self.position)
    }

    /// Projected bounding box: `isoX..isoX+width, isoY..isoY+height`.
    pub fn iso_bbox(&self) -> BBox {
        BBox::from_origin_size(self.iso_anchor(), self.width, self.height)
    }

    /// Secondary draw-order key: the visual bottom edge.
    pub fn bottom_edge(&self) -> f64 {
        self.position.y + self.height
    }

    /// Re-check invariants after deserialization or bulk edits.
    pub fn validate(&self) -> Result<(), SceneError> {
        check_size(self.width, self.height)?;
        if !self.position.is_finite() {
            return Err(SceneError::NonFinitePosition);
        }
        if let Some(h) = self.health {
            Health::new(h.current, h.max)?;
        }
        Ok(())
    }
}

fn check_size(width: f64, height: f64) -> Result<(), SceneError> {
    let ok = width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0;
    if ok {
        Ok(())
    } else {
        Err(SceneError::InvalidSize { width, height })
    }
}

/// Declarative description of an object in a scene config.
///
/// Anything left out falls back to the kind's placement defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectSpec {
    pub kind: ObjectKind,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub health: Option<f64>,
    #[serde(default)]
    pub max_health: Option<f64>,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub animation: Option<Animation>,
}

impl ObjectSpec {
    pub fn build(&self) -> Result<SceneObject, SceneError> {
        let mut obj = SceneObject::placed(self.kind, WorldPos::new(self.x, self.y, self.z))?;
        if let Some(color) = self.color {
            obj.color = color;
        }
        if self.width.is_some() || self.height.is_some() {
            let w = self.width.unwrap_or(obj.width);
            let h = self.height.unwrap_or(obj.height);
            obj.set_size(w, h)?;
        }
        if self.name.is_some() {
            obj.name = self.name.clone();
        }
        match (self.health, self.max_health) {
            (None, None) => {}
            (current, max) => {
                let max = max
                    .or(obj.health.map(|h| h.max))
                    .unwrap_or(DEFAULT_MAX_HEALTH);
                obj.health = Some(Health::new(current.unwrap_or(max), max)?);
            }
        }
        if self.level.is_some() {
            obj.level = self.level;
        }
        if let Some(mut animation) = self.animation {
            if !animation.frame.is_finite() || animation.frame < 0.0 {
                animation.frame = 0.0;
            }
            obj.animation = Some(animation);
        }
        Ok(obj)
    }
}
