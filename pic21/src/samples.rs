//!
//! # Arrangement Samples
//!

// Std-Lib
use std::sync::Arc;

// Workspace Imports
use pic21raw::prims::{text, TextParams};
use pic21raw::{grid, Component, Ctx, GridOptions, LayoutResult};

/// Text cells "1" through "6", in a grid of two rows and three columns
pub fn sample3_grid(ctx: &Ctx) -> LayoutResult<Arc<Component>> {
    ctx.cell("sample3_grid", &(), |ctx, comp| {
        let texts = (1..=6)
            .map(|n| {
                text(
                    ctx,
                    &TextParams {
                        text: n.to_string(),
                        ..Default::default()
                    },
                )
            })
            .collect::<LayoutResult<Vec<_>>>()?;
        let opts = GridOptions {
            spacing: (10.0, 10.0),
            shape: Some((2, 3)),
        };
        grid(comp, &texts, &opts)
    })
}
