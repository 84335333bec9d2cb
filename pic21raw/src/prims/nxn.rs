//!
//! # N x N Port Blocks
//!

// Std-Lib
use std::sync::Arc;

// Crates.io
use serde::{Deserialize, Serialize};

// Local Imports
use super::positive;
use crate::component::Component;
use crate::ctx::Ctx;
use crate::error::LayoutResult;
use crate::geom::{um, Angle, Point, Rect};
use crate::layers::LayerRef;
use crate::port::{rename_clockwise, Port, PortKind};

/// # N x N Parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct NxnParams {
    /// Number of west-facing ports
    pub west: usize,
    pub east: usize,
    pub north: usize,
    pub south: usize,
    /// Size in microns
    pub xsize: f64,
    pub ysize: f64,
    /// Port width in microns
    pub wg_width: f64,
    pub layer: LayerRef,
    /// Distance from each corner to the nearest port, when a side has several
    pub wg_margin: f64,
}
impl Default for NxnParams {
    fn default() -> Self {
        Self {
            west: 1,
            east: 4,
            north: 0,
            south: 0,
            xsize: 8.0,
            ysize: 8.0,
            wg_width: 0.5,
            layer: "WG".into(),
            wg_margin: 1.0,
        }
    }
}

/// Port offsets along a side of length `size`: centered if alone, else evenly spread
fn spread(n: usize, size: f64, margin: f64) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![size / 2.0],
        n => {
            let step = (size - 2.0 * margin) / (n - 1) as f64;
            (0..n).map(|i| margin + step * i as f64).collect()
        }
    }
}

///
/// Rectangular block with a configurable number of ports on each side,
/// named clockwise from the bottom-left.
///
pub fn nxn(ctx: &Ctx, params: &NxnParams) -> LayoutResult<Arc<Component>> {
    ctx.cell("nxn", params, |ctx, comp| {
        positive("xsize", params.xsize)?;
        positive("ysize", params.ysize)?;
        positive("wg_width", params.wg_width)?;
        let layer = ctx.layer(&params.layer)?;
        let (xsize, ysize) = (params.xsize, params.ysize);
        comp.add_rect(layer, Rect::new(Point::zero(), Point::um(xsize, ysize)));

        let port = |x: f64, y: f64, orientation: Angle| Port {
            name: String::new(),
            orientation,
            width: um(params.wg_width),
            kind: PortKind::Optical,
            layer,
            center: Point::um(x, y),
        };
        let margin = params.wg_margin;
        let mut ports = Vec::new();
        for y in spread(params.west, ysize, margin) {
            ports.push(port(0.0, y, Angle::R180));
        }
        for x in spread(params.north, xsize, margin) {
            ports.push(port(x, ysize, Angle::R90));
        }
        for y in spread(params.east, ysize, margin) {
            ports.push(port(xsize, y, Angle::R0));
        }
        for x in spread(params.south, xsize, margin) {
            ports.push(port(x, 0.0, Angle::R270));
        }
        comp.add_ports(rename_clockwise(ports))
    })
}
