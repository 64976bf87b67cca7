//! Error types
//!
//! The per-frame tick never fails. Everything here is raised while a round
//! is being set up or while preferences are read.

use thiserror::Error;

/// Errors raised while building a round or its bodies
#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    #[error("radius must be positive and finite, got {radius}")]
    InvalidRadius { radius: f32 },

    #[error("position must be finite, got ({x}, {y})")]
    NonFinitePosition { x: f32, y: f32 },

    #[error("playfield must have positive finite size, got {width}x{height}")]
    InvalidPlayfield { width: f32, height: f32 },

    #[error("a body of radius {radius} does not fit in a {width}x{height} playfield")]
    BodyTooLarge { radius: f32, width: f32, height: f32 },

    #[error("image asset not found: {name}")]
    MissingImage { name: &'static str },

    #[error("sound asset not found: {name}")]
    MissingSound { name: &'static str },
}

/// Errors raised while reading preferences
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("settings must be a JSON object")]
    NotAnObject,
}
