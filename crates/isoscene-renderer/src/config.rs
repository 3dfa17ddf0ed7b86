use serde::{Deserialize, Serialize};

use isoscene_core::{Biome, ObjectSpec, Scene, SceneError, Size};

use crate::camera::ZoomBounds;

/// Per-screen viewport parameters. Every field has a default, so a partial
/// JSON object is a valid config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub surface_width: f64,
    pub surface_height: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Multiplier applied by one zoom-in step (and divided by zoom-out).
    pub zoom_step: f64,
    /// Grid cell size in camera-space units.
    pub grid_size: f64,
    /// Number of frames in an animation cycle.
    pub frame_cycle: f64,
    /// Wall-clock length of one animation frame.
    pub frame_interval_ms: f64,
    /// Gap between an object's box and its selection outline.
    pub selection_margin: f64,
    pub health_bar_height: f64,
    /// Camera movement per arrow/WASD press, in world units at zoom 1.
    pub nudge_step: f64,
    pub biome: Biome,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            surface_width: 800.0,
            surface_height: 600.0,
            min_zoom: 0.3,
            max_zoom: 3.0,
            zoom_step: 1.2,
            grid_size: 40.0,
            frame_cycle: 4.0,
            frame_interval_ms: 16.67,
            selection_margin: 4.0,
            health_bar_height: 4.0,
            nudge_step: 10.0,
            biome: Biome::Forest,
        }
    }
}

impl ViewportConfig {
    pub fn surface(&self) -> Size {
        Size::new(self.surface_width, self.surface_height)
    }

    pub fn zoom_bounds(&self) -> ZoomBounds {
        ZoomBounds {
            min: self.min_zoom,
            max: self.max_zoom,
        }
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(SceneError::InvalidConfig(format!("{} must be positive, got {}", name, v)))
            }
        };
        positive("min_zoom", self.min_zoom)?;
        positive("max_zoom", self.max_zoom)?;
        positive("zoom_step", self.zoom_step)?;
        positive("grid_size", self.grid_size)?;
        positive("frame_cycle", self.frame_cycle)?;
        positive("frame_interval_ms", self.frame_interval_ms)?;
        if self.min_zoom > self.max_zoom {
            return Err(SceneError::InvalidConfig(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.surface_width.is_finite() && self.surface_height.is_finite()) {
            return Err(SceneError::InvalidConfig("surface size must be finite".into()));
        }
        Ok(())
    }
}

/// Initial camera values; also what "reset camera" returns to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
    pub rotation: f64,
    pub smoothing: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
            rotation: 0.0,
            smoothing: 0.1,
        }
    }
}

/// Everything needed to mount a viewport.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub viewport: ViewportConfig,
    pub camera: CameraConfig,
    pub objects: Vec<ObjectSpec>,
}

impl SceneConfig {
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.viewport.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the initial scene, rejecting the first invalid object.
    pub fn build_scene(&self) -> Result<Scene, SceneError> {
        let objects = self
            .objects
            .iter()
            .map(ObjectSpec::build)
            .collect::<Result<Vec<_>, _>>()?;
        Scene::from_objects(objects)
    }
}
