//!
//! # pic21 Foundry PDKs
//!
//! Process design kits for the [pic21raw] layout engine.
//! Each PDK module provides its layer table, its [pic21raw::Pdk] of named layers
//! and cross-sections, and its library of foundry cells.
//!

pub mod si220;

#[cfg(test)]
mod tests;
