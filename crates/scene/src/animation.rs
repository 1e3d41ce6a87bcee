use crate::clock::FrameTime;
use glam::Vec3;
use paperstar_common::Transform;

/// Frame rate the per-frame rates below are expressed against.
pub const REFERENCE_FPS: f32 = 60.0;

/// Uniform scale oscillation: `base + amplitude * sin(elapsed_ms * frequency)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    pub base: f32,
    pub amplitude: f32,
    /// Radians per millisecond.
    pub frequency: f32,
}

impl Pulse {
    pub fn scale_at(&self, elapsed_ms: f32) -> f32 {
        self.base + self.amplitude * (elapsed_ms * self.frequency).sin()
    }
}

/// Per-object motion applied by [`crate::Scene::update`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Animation {
    /// Euler angle increments in radians per reference frame.
    pub spin: Vec3,
    pub pulse: Option<Pulse>,
}

impl Animation {
    pub fn spin(spin: Vec3) -> Self {
        Self { spin, pulse: None }
    }

    pub fn with_pulse(mut self, pulse: Pulse) -> Self {
        self.pulse = Some(pulse);
        self
    }

    /// Advance `transform` by one frame of `time`.
    ///
    /// Rotation is scaled by the frame's length in reference frames, so the
    /// speed does not depend on the actual frame rate.
    pub fn apply(&self, transform: &mut Transform, time: &FrameTime) {
        let frames = time.delta_secs() * REFERENCE_FPS;
        transform.rotation += self.spin * frames;
        if let Some(pulse) = self.pulse {
            transform.set_uniform_scale(pulse.scale_at(time.elapsed_ms()));
        }
    }
}
