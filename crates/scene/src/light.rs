use crate::material::TextureRef;
use glam::Vec3;
use paperstar_common::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Uniform light from every direction.
    Ambient { color: Color, intensity: f32 },
    /// Omnidirectional light at a point, no distance falloff.
    Point {
        color: Color,
        intensity: f32,
        position: Vec3,
    },
}

impl Light {
    pub fn color(&self) -> Color {
        match *self {
            Self::Ambient { color, .. } | Self::Point { color, .. } => color,
        }
    }

    pub fn intensity(&self) -> f32 {
        match *self {
            Self::Ambient { intensity, .. } | Self::Point { intensity, .. } => intensity,
        }
    }
}

/// What is drawn behind every object.
#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    Color(Color),
    /// Image stretched over the whole viewport.
    Texture(TextureRef),
}

impl Default for Background {
    fn default() -> Self {
        Self::Color(Color::BLACK)
    }
}
