//!
//! # Fill Sample
//!

// Std-Lib
use std::sync::Arc;

// Crates.io
use log::info;

// Workspace Imports
use pic21pdk::si220::cband::{die_with_pads, DieWithPadsParams};
use pic21raw::prims::{rectangle, RectangleParams};
use pic21raw::{fill_rectangle, Component, Ctx, FillOptions, Instance, LayoutResult};

///
/// The foundry die, filled with pad-layer rectangles.
///
/// Fill covers the die floorplan shrunk by 100um, keeping 100um clear of
/// waveguides and pads. Tiles are spaced 1um apart.
/// The number of tiles placed is recorded in `info["fill_count"]`.
///
pub fn sample_fill(ctx: &Ctx) -> LayoutResult<Arc<Component>> {
    ctx.cell("sample_fill", &(), |ctx, comp| {
        let die = die_with_pads(ctx, &DieWithPadsParams::default())?;
        comp.add_inst(Instance::new("die", &die))?;
        let tile = rectangle(
            ctx,
            &RectangleParams {
                layer: "PAD".into(),
                ..Default::default()
            },
        )?;
        let opts = FillOptions {
            fill_cell: tile,
            fill_layers: vec![("FLOORPLAN".into(), -100.0)],
            exclude_layers: vec![((1, 0).into(), 100.0), ("PAD".into(), 100.0)],
            x_space: 1.0,
            y_space: 1.0,
        };
        let count = fill_rectangle(ctx, comp, &opts)?;
        info!("Filled `{}` with {} tiles", comp.name, count);
        comp.set_info("fill_count", count);
        Ok(())
    })
}
