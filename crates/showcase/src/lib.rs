//! The demo scene around the lucky star.
//!
//! Builds the fixed set of objects, lights and animations the desktop app
//! and the CLI both show, and regenerates the star when its parameters
//! change.

mod showcase;

pub use showcase::{STAR_PULSE, Showcase, assets};

pub fn crate_info() -> &'static str {
    concat!("paperstar-showcase v", env!("CARGO_PKG_VERSION"))
}
