//!
//! # DRC Error Samples
//!
//! Small cells which each violate a single design rule,
//! for exercising rule decks.
//!

// Std-Lib
use std::sync::Arc;

// Crates.io
use serde::{Deserialize, Serialize};

// Workspace Imports
use pic21raw::prims::{rectangle, RectangleParams};
use pic21raw::{
    add_padding_container, pack, um, AlignRect, Component, Ctx, Instance, LayerRef, LayoutResult,
    PackOptions, PaddingOptions,
};

/// Layer carrying the single-layer violations
const LAYER: &str = "WG";

/// Rectangle of `size` microns on `layer`, with its lower-left corner at the origin
fn rect(ctx: &Ctx, size: (f64, f64), layer: LayerRef) -> LayoutResult<Arc<Component>> {
    rectangle(
        ctx,
        &RectangleParams {
            size,
            layer,
            ..Default::default()
        },
    )
}

/// Two unit squares on `layer1` and `layer2`, separated in x by `gap` microns
fn pair(
    ctx: &Ctx,
    comp: &mut Component,
    gap: f64,
    layer1: LayerRef,
    layer2: LayerRef,
) -> LayoutResult<()> {
    let mut r1 = Instance::new("r1", &rect(ctx, (1.0, 1.0), layer1)?);
    let mut r2 = Instance::new("r2", &rect(ctx, (1.0, 1.0), layer2)?);
    r1.set_xmax(0);
    r2.set_xmin(um(gap));
    comp.add_inst(r1)?;
    comp.add_inst(r2)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct WidthMinParams {
    pub size: (f64, f64),
}
impl Default for WidthMinParams {
    fn default() -> Self {
        Self { size: (0.1, 0.1) }
    }
}

/// Rectangle narrower than the minimum width
pub fn width_min(ctx: &Ctx, params: &WidthMinParams) -> LayoutResult<Arc<Component>> {
    ctx.cell("width_min", params, |ctx, comp| {
        let r = rect(ctx, params.size, LAYER.into())?;
        comp.absorb(&r)
    })
}

/// Rectangle smaller than the minimum area
pub fn area_min(ctx: &Ctx) -> LayoutResult<Arc<Component>> {
    ctx.cell("area_min", &(), |ctx, comp| {
        let r = rect(ctx, (0.2, 0.2), LAYER.into())?;
        comp.absorb(&r)
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GapMinParams {
    /// Gap in microns
    pub gap: f64,
}
impl Default for GapMinParams {
    fn default() -> Self {
        Self { gap: 0.1 }
    }
}

/// Two squares closer than the minimum spacing
pub fn gap_min(ctx: &Ctx, params: &GapMinParams) -> LayoutResult<Arc<Component>> {
    ctx.cell("gap_min", params, |ctx, comp| {
        pair(ctx, comp, params.gap, LAYER.into(), LAYER.into())
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SeparationParams {
    /// Gap in microns
    pub gap: f64,
    pub layer1: LayerRef,
    pub layer2: LayerRef,
}
impl Default for SeparationParams {
    fn default() -> Self {
        Self {
            gap: 0.1,
            layer1: (47, 0).into(),
            layer2: (41, 0).into(),
        }
    }
}

/// Squares on two layers closer than their minimum separation
pub fn separation(ctx: &Ctx, params: &SeparationParams) -> LayoutResult<Arc<Component>> {
    ctx.cell("separation", params, |ctx, comp| {
        pair(
            ctx,
            comp,
            params.gap,
            params.layer1.clone(),
            params.layer2.clone(),
        )
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EnclosingParams {
    /// Enclosure in microns
    pub enclosing: f64,
    pub layer1: LayerRef,
    pub layer2: LayerRef,
}
impl Default for EnclosingParams {
    fn default() -> Self {
        Self {
            enclosing: 0.1,
            layer1: (40, 0).into(),
            layer2: (41, 0).into(),
        }
    }
}

///
/// A square on `layer1`, and a larger square on `layer2` meant to enclose it
/// by `enclosing` on all sides, but shifted half a micron to the east.
///
pub fn enclosing(ctx: &Ctx, params: &EnclosingParams) -> LayoutResult<Arc<Component>> {
    ctx.cell("enclosing", params, |ctx, comp| {
        let w1 = 1.0;
        let w2 = w1 + params.enclosing;
        let centered = |size, layer: &LayerRef| {
            rectangle(
                ctx,
                &RectangleParams {
                    size,
                    layer: layer.clone(),
                    centered: true,
                },
            )
        };
        let r1 = Instance::new("r1", &centered((w1, w1), &params.layer1)?);
        let mut r2 = Instance::new("r2", &centered((w2, w2), &params.layer2)?);
        r2.movex(um(0.5));
        comp.add_inst(r1)?;
        comp.add_inst(r2)
    })
}

/// Gaps for the [gap_min] samples: five, evenly spaced from 0.1 to 0.2 microns
pub fn sample_gaps() -> Vec<f64> {
    let (start, stop, n) = (0.1, 0.2, 5);
    let step = (stop - start) / (n - 1) as f64;
    (0..n).map(|i| start + i as f64 * step).collect()
}

///
/// All the DRC samples, packed together and framed in a 5um floorplan.
///
pub fn sample_drc_errors(ctx: &Ctx) -> LayoutResult<Arc<Component>> {
    ctx.cell("sample_drc_errors", &(), |ctx, comp| {
        let mut comps = vec![
            width_min(ctx, &WidthMinParams::default())?,
            separation(ctx, &SeparationParams::default())?,
            enclosing(ctx, &EnclosingParams::default())?,
        ];
        for gap in sample_gaps() {
            comps.push(gap_min(ctx, &GapMinParams { gap })?);
        }
        let bins = pack(
            &comps,
            &PackOptions {
                spacing: 1.0,
                ..Default::default()
            },
        )?;
        let padded = add_padding_container(
            ctx,
            &bins[0],
            &PaddingOptions {
                layers: vec!["FLOORPLAN".into()],
                default: 5.0,
                ..Default::default()
            },
        )?;
        comp.absorb(&padded)
    })
}
