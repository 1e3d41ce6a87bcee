//! Geometry toolkit: 2D paths, beveled extrusion, buffer geometry, primitives.
//!
//! # Invariants
//! - Builders are pure: same inputs, same vertex buffers.
//! - No builder fails on numeric input. Degenerate input yields degenerate
//!   (possibly empty) geometry.
//! - Triangles are counter-clockwise when seen from outside the solid.

mod attribute;
mod buffer;
mod extrude;
pub mod primitives;
mod shape;
mod triangulate;

pub use attribute::Attribute;
pub use buffer::{Aabb, BufferGeometry, GeometryId, Group};
pub use extrude::{ExtrudeOptions, MAX_VERTICES, extrude};
pub use shape::{Shape, is_clockwise, signed_area};
pub use triangulate::triangulate;

pub fn crate_info() -> &'static str {
    concat!("paperstar-geometry v", env!("CARGO_PKG_VERSION"))
}
