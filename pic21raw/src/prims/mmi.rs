//!
//! # Multimode Interference Couplers
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
use crate::port::{rename_clockwise, Port};

/// # 2x2 MMI Parameters
/// All dimensions in microns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Mmi2x2Params {
    /// Input/ output waveguide width. Defaults to that of `cross_section`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    pub width_taper: f64,
    pub length_taper: f64,
    pub length_mmi: f64,
    pub width_mmi: f64,
    /// Gap between the tapers on each side
    pub gap_mmi: f64,
    pub cross_section: String,
}
impl Default for Mmi2x2Params {
    fn default() -> Self {
        Self {
            width: None,
            width_taper: 1.0,
            length_taper: 10.0,
            length_mmi: 5.5,
            width_mmi: 2.5,
            gap_mmi: 0.25,
            cross_section: "strip".into(),
        }
    }
}

///
/// 2x2 MMI coupler: a multimode body with two tapered inputs and two tapered outputs.
///
/// Ports are named clockwise from the bottom-left:
/// `o1` west-bottom, `o2` west-top, `o3` east-top, `o4` east-bottom.
///
pub fn mmi2x2(ctx: &Ctx, params: &Mmi2x2Params) -> LayoutResult<Arc<Component>> {
    ctx.cell("mmi2x2", params, |ctx, comp| {
        positive("width_taper", params.width_taper)?;
        positive("length_taper", params.length_taper)?;
        positive("length_mmi", params.length_mmi)?;
        positive("width_mmi", params.width_mmi)?;
        let xs = ctx.cross_section(&params.cross_section)?;
        let w = match params.width {
            Some(w) => {
                positive("width", w)?;
                um(w)
            }
            None => xs.width,
        };
        let (wt, lt) = (um(params.width_taper), um(params.length_taper));
        let (lm, wm) = (um(params.length_mmi), um(params.width_mmi));
        let yc = (um(params.gap_mmi) + wt) / 2;

        comp.add_rect(
            xs.layer,
            Rect::new(Point::new(0, -wm / 2), Point::new(lm, wm - wm / 2)),
        );
        let mut ports = Vec::new();
        for y in [-yc, yc] {
            comp.add_polygon(
                xs.layer,
                vec![
                    Point::new(-lt, y - w / 2),
                    Point::new(0, y - wt / 2),
                    Point::new(0, y + wt / 2),
                    Point::new(-lt, y + w / 2),
                ],
            );
            comp.add_polygon(
                xs.layer,
                vec![
                    Point::new(lm, y - wt / 2),
                    Point::new(lm + lt, y - w / 2),
                    Point::new(lm + lt, y + w / 2),
                    Point::new(lm, y + wt / 2),
                ],
            );
            let mut west = Port::optical("west", Point::new(-lt, y), Angle::R180, xs);
            let mut east = Port::optical("east", Point::new(lm + lt, y), Angle::R0, xs);
            west.width = w;
            east.width = w;
            ports.push(west);
            ports.push(east);
        }
        comp.add_ports(rename_clockwise(ports))
    })
}
