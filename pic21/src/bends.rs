//!
//! # Bends
//!
//! Catalog entries for the foundry bends.
//! Each returns the foundry cell itself.
//!

// Std-Lib
use std::sync::Arc;

// Workspace Imports
use pic21pdk::si220::cband;
use pic21raw::{Component, Ctx, LayoutResult};

/// The foundry Euler bend, on the `strip` cross-section
pub fn bend_euler(ctx: &Ctx) -> LayoutResult<Arc<Component>> {
    cband::bend_euler(ctx, "strip")
}

/// Bend for metal routing.
/// Identical to [bend_euler].
pub fn bend_metal(ctx: &Ctx) -> LayoutResult<Arc<Component>> {
    cband::bend_euler(ctx, "strip")
}
