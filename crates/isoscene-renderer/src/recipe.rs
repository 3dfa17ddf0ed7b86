//! Fixed silhouette recipes, one per object kind.
//!
//! Parts are laid out in fractions of the object's box (`0.0..1.0` spans the
//! width or height), so a recipe scales with the object. Values outside that
//! range overhang the box, as roofs and hats do.

use isoscene_core::{Color, ObjectKind};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PartShape {
    Rect { x: f64, y: f64, w: f64, h: f64 },
    Ellipse { cx: f64, cy: f64, rx: f64, ry: f64 },
    Triangle([(f64, f64); 3]),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PartFill {
    /// The object's own color.
    Body,
    Fixed(Color),
}

/// How a part follows the walk cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Still,
    Body,
    LeftLimb,
    RightLimb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Part {
    pub shape: PartShape,
    pub fill: PartFill,
    pub motion: Motion,
}

const fn rect(x: f64, y: f64, w: f64, h: f64, fill: PartFill, motion: Motion) -> Part {
    Part {
        shape: PartShape::Rect { x, y, w, h },
        fill,
        motion,
    }
}

const fn ellipse(cx: f64, cy: f64, rx: f64, ry: f64, fill: PartFill) -> Part {
    Part {
        shape: PartShape::Ellipse { cx, cy, rx, ry },
        fill,
        motion: Motion::Still,
    }
}

const SKIN: PartFill = PartFill::Fixed(Color::rgb(0xFB, 0xBF, 0x24));
const BOOTS: PartFill = PartFill::Fixed(Color::rgb(0x37, 0x41, 0x51));

static CHARACTER: [Part; 4] = [
    rect(0.25, 0.333, 0.5, 0.5, PartFill::Body, Motion::Body),
    rect(0.3, 0.0, 0.4, 0.267, SKIN, Motion::Body),
    rect(0.3, 0.833, 0.15, 0.167, BOOTS, Motion::LeftLimb),
    rect(0.55, 0.833, 0.15, 0.167, BOOTS, Motion::RightLimb),
];

static PLAYER: [Part; 5] = [
    rect(0.25, 0.333, 0.5, 0.5, PartFill::Body, Motion::Body),
    rect(0.3, 0.0, 0.4, 0.267, PartFill::Fixed(Color::rgb(0xFD, 0xE6, 0x8A)), Motion::Body),
    rect(0.8, 0.3, 0.1, 0.45, PartFill::Fixed(Color::rgb(0xD1, 0xD5, 0xDB)), Motion::Body),
    rect(0.3, 0.833, 0.15, 0.167, BOOTS, Motion::LeftLimb),
    rect(0.55, 0.833, 0.15, 0.167, BOOTS, Motion::RightLimb),
];

static NPC: [Part; 3] = [
    rect(0.222, 0.286, 0.556, 0.536, PartFill::Body, Motion::Body),
    rect(0.278, 0.0, 0.444, 0.286, PartFill::Fixed(Color::rgb(0xF3, 0xE8, 0xFF)), Motion::Body),
    rect(0.222, -0.071, 0.556, 0.107, PartFill::Fixed(Color::rgb(0x7C, 0x3A, 0xED)), Motion::Body),
];

const WINDOW: PartFill = PartFill::Fixed(Color::rgb(0xFE, 0xF3, 0xC7));

static BUILDING: [Part; 5] = [
    rect(0.0, 0.0, 1.0, 1.0, PartFill::Body, Motion::Still),
    Part {
        shape: PartShape::Triangle([(-0.083, 0.0), (0.5, -0.1875), (1.083, 0.0)]),
        fill: PartFill::Fixed(Color::rgb(0x7C, 0x2D, 0x12)),
        motion: Motion::Still,
    },
    rect(0.167, 0.1875, 0.133, 0.1, WINDOW, Motion::Still),
    rect(0.417, 0.1875, 0.133, 0.1, WINDOW, Motion::Still),
    rect(0.667, 0.1875, 0.133, 0.1, WINDOW, Motion::Still),
];

static TREE: [Part; 2] = [
    rect(0.32, 0.625, 0.32, 0.375, PartFill::Fixed(Color::rgb(0x92, 0x40, 0x0E)), Motion::Still),
    ellipse(0.48, 0.375, 0.6, 0.375, PartFill::Body),
];

static RESOURCE: [Part; 2] = [
    ellipse(0.5, 0.6, 0.5, 0.4, PartFill::Body),
    ellipse(0.35, 0.45, 0.15, 0.12, PartFill::Fixed(Color::rgb(0xA8, 0xA2, 0x9E))),
];

/// The silhouette recipe for a kind.
pub fn recipe(kind: ObjectKind) -> &'static [Part] {
    match kind {
        ObjectKind::Character => &CHARACTER,
        ObjectKind::Player => &PLAYER,
        ObjectKind::Npc => &NPC,
        ObjectKind::Building => &BUILDING,
        ObjectKind::Tree => &TREE,
        ObjectKind::Resource => &RESOURCE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_a_body_colored_part() {
        for kind in ObjectKind::ALL {
            let parts = recipe(kind);
            assert!(!parts.is_empty());
            assert!(parts.iter().any(|p| p.fill == PartFill::Body), "{:?}", kind);
        }
    }

    #[test]
    fn test_only_figures_have_limbs() {
        for kind in [ObjectKind::Building, ObjectKind::Tree, ObjectKind::Resource] {
            assert!(recipe(kind).iter().all(|p| p.motion == Motion::Still));
        }
        assert!(recipe(ObjectKind::Character)
            .iter()
            .any(|p| p.motion == Motion::LeftLimb));
    }
}
