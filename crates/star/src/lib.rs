//! Star mesh generator: a five-pointed outline, extruded with rounded
//! bevels, then puffed out along its normals.
//!
//! # Invariants
//! - `generate` is deterministic and never fails; degenerate parameters
//!   produce degenerate (possibly empty) geometry.
//! - Every call allocates its own geometry and material.

mod generator;
mod outline;
mod params;
mod puff;

pub use generator::{CURVE_SEGMENTS, PRESENTATION_SCALE, ROUGHNESS, generate, star_material};
pub use outline::{SPIKES, outline_points, star_outline};
pub use params::{StarError, StarParams};
pub use puff::{PUFF_FALLOFF, PUFF_STRENGTH, puff, puff_offset};

pub fn crate_info() -> &'static str {
    concat!("paperstar-star v", env!("CARGO_PKG_VERSION"))
}
