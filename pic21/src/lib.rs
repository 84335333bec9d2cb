//!
//! # pic21
//!
//! Catalog of parametric photonic cells for the si220 C-band PDK.
//!
//! Each cell is a function of a [Ctx] and (for most) a parameter struct,
//! returning a shared and cached [pic21raw::Component].
//! The [catalog::Catalog] registers them all by name, for construction from
//! JSON parameters, as done by the `pic21` command-line program.
//!

// Workspace Imports
use pic21pdk::si220;
use pic21raw::{Ctx, EngineConfig, LayoutResult};

pub mod bends;
pub mod catalog;
pub mod drc;
pub mod fill;
pub mod mzi;
pub mod paths;
pub mod route;
pub mod samples;
pub mod spiral;

#[cfg(test)]
mod tests;

pub use catalog::Catalog;
pub use paths::Paths;

/// Longest cell name produced by this catalog
pub const MAX_CELLNAME_LENGTH: usize = 64;

/// Catalog version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Default [EngineConfig] for this catalog
pub fn config() -> EngineConfig {
    EngineConfig {
        max_cellname_length: MAX_CELLNAME_LENGTH,
        ..Default::default()
    }
}

/// Create a [Ctx] over the si220 PDK with the default [config]
pub fn ctx() -> LayoutResult<Ctx> {
    ctx_with(config())
}

/// Create a [Ctx] over the si220 PDK with `config`
pub fn ctx_with(config: EngineConfig) -> LayoutResult<Ctx> {
    Ctx::new(config, si220::pdk()?)
}
