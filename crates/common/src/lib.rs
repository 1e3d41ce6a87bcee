//! Shared types used across the paperstar crates.

mod color;
mod types;

pub use color::{Color, ColorParseError};
pub use types::{ObjectId, Transform};

pub fn crate_info() -> &'static str {
    concat!("paperstar-common v", env!("CARGO_PKG_VERSION"))
}
