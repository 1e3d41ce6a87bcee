//! wgpu render backend for paperstar scenes.
//!
//! Draws lit meshes, vertex-colored line sets and an optional background
//! image. The camera orbits a target with mouse drag and wheel zoom.
//!
//! # Invariants
//! - The renderer never mutates the scene.
//! - Camera motion is not part of the scene and is never animated by it.
//! - Geometry is re-uploaded only when its attribute versions change.

mod camera;
mod gpu;
pub mod layout;
mod shaders;
mod texture;

pub use camera::OrbitCamera;
pub use gpu::WgpuRenderer;
pub use texture::{RgbaImage, TextureCache, TextureError, TextureKind, load_rgba};

pub fn crate_info() -> &'static str {
    concat!("paperstar-render-wgpu v", env!("CARGO_PKG_VERSION"))
}
