//!
//! # Spiral Delay Lines
//!

// Std-Lib
use std::sync::Arc;

// Crates.io
use serde::{Deserialize, Serialize};

// Workspace Imports
use pic21raw::prims::{spiral, SpiralParams};
use pic21raw::{Component, Ctx, LayoutResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SpiralDelayParams {
    /// Total length in microns
    pub length: f64,
}
impl Default for SpiralDelayParams {
    fn default() -> Self {
        Self { length: 200.0 }
    }
}

/// Spiral of total length `length`, tagged `spirals`
pub fn spiral_delay(ctx: &Ctx, params: &SpiralDelayParams) -> LayoutResult<Arc<Component>> {
    ctx.cell("spiral_delay", params, |ctx, comp| {
        let inner = spiral(
            ctx,
            &SpiralParams {
                length: params.length,
                ..Default::default()
            },
        )?;
        comp.absorb(&inner)?;
        comp.tags.push("spirals".into());
        Ok(())
    })
}
