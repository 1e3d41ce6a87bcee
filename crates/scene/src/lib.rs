//! Scene model: the objects, lights and background a renderer draws, plus the
//! per-frame animation that moves them.
//!
//! # Invariants
//! - Object ids are handed out sequentially and never reused; iteration
//!   follows insertion order.
//! - `Scene::update` only touches transforms.

mod animation;
mod clock;
mod light;
mod material;
mod object;
mod scene;

pub use animation::{Animation, Pulse, REFERENCE_FPS};
pub use clock::{FrameClock, FrameTime, FrameTimer};
pub use light::{Background, Light};
pub use material::{BasicMaterial, Material, PhongMaterial, StandardMaterial, TextureRef};
pub use object::{LineSegments, Mesh, ObjectKind, SceneObject};
pub use scene::{Scene, SceneEntry, SceneError};

pub fn crate_info() -> &'static str {
    concat!("paperstar-scene v", env!("CARGO_PKG_VERSION"))
}
