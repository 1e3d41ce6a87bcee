use paperstar_common::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum StarError {
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("inner radius {inner} must be smaller than outer radius {outer}")]
    InnerNotInsideOuter { inner: f32, outer: f32 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Star shape and color.
///
/// Every field has a default, so partial JSON such as `{"outer": 6}` or
/// struct update syntax overrides only what it names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarParams {
    /// Radius of the spike tips.
    pub outer: f32,
    /// Radius of the notches between spikes.
    pub inner: f32,
    /// Thickness of the straight body.
    pub depth: f32,
    /// How far the rounded edge reaches sideways.
    pub bevel_size: f32,
    /// How far the rounded edge reaches along the thickness.
    pub bevel_thickness: f32,
    /// Rounding steps; 0 gives a sharp edge.
    pub bevel_segments: u32,
    pub color: Color,
}

impl Default for StarParams {
    fn default() -> Self {
        Self {
            outer: 5.0,
            inner: 2.6,
            depth: 1.2,
            bevel_size: 0.8,
            bevel_thickness: 0.9,
            bevel_segments: 6,
            color: Color::from_hex(0xffd1dc),
        }
    }
}

impl StarParams {
    /// Check the values describe a well-formed star.
    ///
    /// [`crate::generate`] accepts anything; this is for callers that want
    /// to warn about parameters that will look broken.
    pub fn validate(&self) -> Result<(), StarError> {
        let fields = [
            ("outer", self.outer),
            ("inner", self.inner),
            ("depth", self.depth),
            ("bevel_size", self.bevel_size),
            ("bevel_thickness", self.bevel_thickness),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(StarError::NonFinite { field, value });
            }
        }
        for (field, value) in &fields[..3] {
            if *value <= 0.0 {
                return Err(StarError::NonPositive { field, value: *value });
            }
        }
        for (field, value) in &fields[3..] {
            if *value < 0.0 {
                return Err(StarError::Negative { field, value: *value });
            }
        }
        if self.inner >= self.outer {
            return Err(StarError::InnerNotInsideOuter {
                inner: self.inner,
                outer: self.outer,
            });
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, StarError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON parameter file.
    pub fn load(path: &Path) -> Result<Self, StarError> {
        let text = std::fs::read_to_string(path)?;
        let params = Self::from_json(&text)?;
        tracing::info!(path = %path.display(), "loaded star parameters");
        Ok(params)
    }

    pub fn to_json_pretty(&self) -> Result<String, StarError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
