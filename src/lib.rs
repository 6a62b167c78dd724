//! Physical structure of semi-detached interacting binaries.
//!
//! The solver crates are re-exported here; [`system::BinarySystem`] ties a
//! validated [`binsim_config::BinaryConfig`] to a donor star, accretion disc
//! and gas stream, and [`sampling`] evaluates their surfaces on grids in
//! parallel.

pub mod sampling;
pub mod system;

pub use binsim_config as config;
pub use binsim_core as common;
pub use binsim_disc as disc;
pub use binsim_export as export;
pub use binsim_roche as roche;
pub use binsim_stream as stream;

pub use system::{BinarySystem, DiscModel, Resolution, StreamModel, SystemError};

/// Returns the version of the library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
