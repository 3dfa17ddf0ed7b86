use thiserror::Error;

use crate::object::ObjectId;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Object size must be positive and finite, got {width}x{height}")]
    InvalidSize { width: f64, height: f64 },

    #[error("Health {health} is outside 0..={max_health}")]
    InvalidHealth { health: f64, max_health: f64 },

    #[error("Object position must be finite")]
    NonFinitePosition,

    #[error("Object {0} is not in the scene")]
    UnknownObject(ObjectId),

    #[error("Invalid color '{0}', expected #RRGGBB or #RRGGBBAA")]
    InvalidColor(String),

    #[error("Invalid viewport configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),
}
