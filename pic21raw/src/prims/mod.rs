//!
//! # Primitive Cells
//!
//! The library of parametric building blocks: rectangles, straights, bends, couplers,
//! text, spirals, and n-by-n port blocks.
//! Each is a function of a [Ctx] and a parameter struct, built through [Ctx::cell]
//! and so memoized by its parameters.
//!

// Std-Lib
use std::sync::Arc;

// Crates.io
use serde::{Deserialize, Serialize};

// Local Imports
use crate::align::AlignRect;
use crate::component::{Component, Instance};
use crate::ctx::Ctx;
use crate::error::{LayoutError, LayoutResult};
use crate::geom::{to_um, um, Angle, Point, Rect};
use crate::layers::LayerRef;
use crate::port::Port;

pub mod bend;
pub mod mmi;
pub mod nxn;
pub mod spiral;
pub mod text;
pub use bend::{bend_euler, euler_length, BendEulerParams};
pub use mmi::{mmi2x2, Mmi2x2Params};
pub use nxn::{nxn, NxnParams};
pub use spiral::{spiral, SpiralParams};
pub use text::{text, Justify, TextParams};

/// Fail with [LayoutError::InvalidParam] unless `val` is strictly positive
pub fn positive(name: &str, val: f64) -> LayoutResult<()> {
    if val > 0.0 {
        return Ok(());
    }
    LayoutError::invalid(format!("`{}` must be positive, got {}", name, val))
}

/// # Compass Parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CompassParams {
    /// Size (width, height) in microns
    pub size: (f64, f64),
    pub layer: LayerRef,
}
impl Default for CompassParams {
    fn default() -> Self {
        Self {
            size: (4.0, 2.0),
            layer: "WG".into(),
        }
    }
}

///
/// Rectangle centered on the origin, with an electrical port at the middle of each side.
/// Ports `e1` through `e4` face west, north, east, and south.
///
pub fn compass(ctx: &Ctx, params: &CompassParams) -> LayoutResult<Arc<Component>> {
    ctx.cell("compass", params, |ctx, comp| {
        positive("size[0]", params.size.0)?;
        positive("size[1]", params.size.1)?;
        let layer = ctx.layer(&params.layer)?;
        let (w, h) = (um(params.size.0), um(params.size.1));
        let rect = Rect::centered(Point::zero(), w, h);
        comp.add_rect(layer, rect);

        let (p0, p1) = (rect.p0, rect.p1);
        let (cx, cy) = ((p0.x + p1.x) / 2, (p0.y + p1.y) / 2);
        comp.add_ports([
            Port::electrical("e1", Point::new(p0.x, cy), Angle::R180, h, layer),
            Port::electrical("e2", Point::new(cx, p1.y), Angle::R90, w, layer),
            Port::electrical("e3", Point::new(p1.x, cy), Angle::R0, h, layer),
            Port::electrical("e4", Point::new(cx, p0.y), Angle::R270, w, layer),
        ])
    })
}

/// # Rectangle Parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RectangleParams {
    /// Size (width, height) in microns
    pub size: (f64, f64),
    pub layer: LayerRef,
    /// Center on the origin. Otherwise the lower-left corner sits there.
    pub centered: bool,
}
impl Default for RectangleParams {
    fn default() -> Self {
        Self {
            size: (4.0, 2.0),
            layer: "WG".into(),
            centered: false,
        }
    }
}

/// Rectangle on a single layer, with the ports of its [compass]
pub fn rectangle(ctx: &Ctx, params: &RectangleParams) -> LayoutResult<Arc<Component>> {
    ctx.cell("rectangle", params, |ctx, comp| {
        let cell = compass(
            ctx,
            &CompassParams {
                size: params.size,
                layer: params.layer.clone(),
            },
        )?;
        let mut inst = Instance::new("compass", &cell);
        if !params.centered {
            inst.set_xmin(0).set_ymin(0);
        }
        comp.add_ports(inst.ports().to_vec())?;
        comp.add_inst(inst)
    })
}

/// # Straight Waveguide Parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StraightParams {
    /// Length in microns. Zero is permitted, and yields a cell with ports but no geometry.
    pub length: f64,
    pub cross_section: String,
    /// Width override in microns. Defaults to that of `cross_section`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}
impl Default for StraightParams {
    fn default() -> Self {
        Self {
            length: 10.0,
            cross_section: "strip".into(),
            width: None,
        }
    }
}

/// Straight waveguide, from port `o1` at the origin (facing west) to `o2` (facing east)
pub fn straight(ctx: &Ctx, params: &StraightParams) -> LayoutResult<Arc<Component>> {
    ctx.cell("straight", params, |ctx, comp| {
        if params.length < 0.0 {
            return LayoutError::invalid(format!(
                "straight length must be non-negative, got {}",
                params.length
            ));
        }
        let xs = ctx.cross_section(&params.cross_section)?;
        let width = match params.width {
            Some(w) => {
                positive("width", w)?;
                um(w)
            }
            None => xs.width,
        };
        let length = um(params.length);
        if length > 0 {
            comp.add_rect(
                xs.layer,
                Rect::new(
                    Point::new(0, -width / 2),
                    Point::new(length, width - width / 2),
                ),
            );
        }
        let mut o1 = Port::optical("o1", Point::zero(), Angle::R180, xs);
        let mut o2 = Port::optical("o2", Point::new(length, 0), Angle::R0, xs);
        o1.width = width;
        o2.width = width;
        comp.add_ports([o1, o2])?;
        comp.set_info("length", to_um(length));
        comp.set_info("width", to_um(width));
        Ok(())
    })
}
