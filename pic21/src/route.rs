//!
//! # Routing Sample
//!

// Std-Lib
use std::sync::Arc;

// Crates.io
use log::info;

// Workspace Imports
use pic21raw::prims::{nxn, NxnParams};
use pic21raw::{route_bundle, um, AlignRect, BundleOptions, Component, Ctx, Instance, LayoutResult};

///
/// Bundle-route every port of a four-sided block to a row of ports on a second block above it.
///
/// Routes run around both blocks.
/// The length of each route is logged, and recorded in order in `info["route_lengths"]`.
///
pub fn sample_route_python(ctx: &Ctx) -> LayoutResult<Arc<Component>> {
    ctx.cell("sample_route_python", &(), |ctx, comp| {
        let top = nxn(
            ctx,
            &NxnParams {
                west: 0,
                east: 0,
                north: 8,
                south: 0,
                ..Default::default()
            },
        )?;
        let bot = nxn(
            ctx,
            &NxnParams {
                west: 2,
                east: 2,
                north: 2,
                south: 2,
                xsize: 10.0,
                ysize: 10.0,
                ..Default::default()
            },
        )?;
        let mut top = Instance::new("top", &top);
        top.movey(um(100.0));
        let bot = Instance::new("bot", &bot);
        let (ports1, ports2) = (bot.ports().to_vec(), top.ports().to_vec());
        // Placed first, so the routes keep clear of both blocks
        comp.add_inst(top)?;
        comp.add_inst(bot)?;

        let opts = BundleOptions {
            cross_section: "strip".into(),
            radius: Some(5.0),
            sort_ports: true,
            ..Default::default()
        };
        let routes = route_bundle(ctx, comp, &ports1, &ports2, &opts)?;
        let lengths: Vec<f64> = routes.iter().map(|r| r.length).collect();
        for length in lengths.iter() {
            info!("Route length: {}", length);
        }
        comp.set_info("route_lengths", lengths);
        Ok(())
    })
}
