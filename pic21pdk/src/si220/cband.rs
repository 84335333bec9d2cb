//!
//! # si220 C-Band Cells
//!
//! Foundry cells, built from the [pic21raw] primitives on the si220 cross-sections.
//! Each expects a [Ctx] created over [super::pdk].
//!

// Std-Lib
use std::sync::Arc;

// Crates.io
use log::debug;
use serde::{Deserialize, Serialize};

// Workspace Imports
use pic21raw::prims::{self, positive, BendEulerParams, CompassParams, StraightParams};
use pic21raw::{
    rename_clockwise, route_bundle, um, Angle, BundleOptions, Component, Ctx, Instance, Int,
    LayerRef, LayoutError, LayoutResult, Placement, Point, Port, Rect,
};

/// Euler bend on cross-section `cross_section`, with its default radius
pub fn bend_euler(ctx: &Ctx, cross_section: &str) -> LayoutResult<Arc<Component>> {
    prims::bend_euler(
        ctx,
        &BendEulerParams {
            cross_section: cross_section.into(),
            ..Default::default()
        },
    )
}

/// # Heated Straight Parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StraightHeaterMetalParams {
    /// Length in microns
    pub length: f64,
    pub cross_section: String,
    pub cross_section_heater: String,
    /// Size of each end's via stack, in microns
    pub via_stack_size: (f64, f64),
}
impl Default for StraightHeaterMetalParams {
    fn default() -> Self {
        Self {
            length: 320.0,
            cross_section: "strip".into(),
            cross_section_heater: "heater_metal".into(),
            via_stack_size: (10.0, 10.0),
        }
    }
}

///
/// Straight waveguide with a metal heater over it, and a via stack at each end.
///
/// Optical ports `o1` and `o2` are those of the waveguide.
/// Electrical ports `l_e1` through `l_e4` and `r_e1` through `r_e4` are those of the
/// left and right via stacks.
///
pub fn straight_heater_metal(
    ctx: &Ctx,
    params: &StraightHeaterMetalParams,
) -> LayoutResult<Arc<Component>> {
    ctx.cell("straight_heater_metal", params, |ctx, comp| {
        positive("length", params.length)?;
        let heater = ctx.cross_section(&params.cross_section_heater)?;
        let wg = prims::straight(
            ctx,
            &StraightParams {
                length: params.length,
                cross_section: params.cross_section.clone(),
                width: None,
            },
        )?;
        let wg = Instance::new("wg", &wg);
        let length = um(params.length);
        comp.add_rect(
            heater.layer,
            Rect::new(
                Point::new(0, -heater.width / 2),
                Point::new(length, heater.width - heater.width / 2),
            ),
        );

        let via = prims::compass(
            ctx,
            &CompassParams {
                size: params.via_stack_size,
                layer: "PAD".into(),
            },
        )?;
        let half = um(params.via_stack_size.0) / 2;
        for (prefix, x) in [("l_", half), ("r_", length - half)] {
            let inst =
                Instance::new(format!("{}via", prefix), &via).at(Placement::at(Point::new(x, 0)));
            for port in inst.ports().iter() {
                comp.add_port(port.renamed(format!("{}{}", prefix, port.name)))?;
            }
            comp.add_inst(inst)?;
        }
        comp.add_ports([wg.port("o1")?, wg.port("o2")?])?;
        comp.add_inst(wg)?;
        comp.set_info("length", params.length);
        Ok(())
    })
}

/// # Pad Parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PadParams {
    /// Size in microns
    pub size: (f64, f64),
    pub layer: LayerRef,
}
impl Default for PadParams {
    fn default() -> Self {
        Self {
            size: (100.0, 100.0),
            layer: "PAD".into(),
        }
    }
}

/// Rectangular bond pad, centered on the origin, with ports `e1` through `e4`
pub fn pad(ctx: &Ctx, params: &PadParams) -> LayoutResult<Arc<Component>> {
    ctx.cell("pad", params, |ctx, comp| {
        let cell = prims::compass(
            ctx,
            &CompassParams {
                size: params.size,
                layer: params.layer.clone(),
            },
        )?;
        let inst = Instance::new("pad", &cell);
        comp.add_ports(inst.ports().to_vec())?;
        comp.add_inst(inst)
    })
}

/// # Rectangular Grating Coupler Parameters
/// All dimensions in microns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GratingCouplerRectangularParams {
    pub n_periods: usize,
    pub period: f64,
    /// Fraction of each period which is etched
    pub fill_factor: f64,
    pub width_grating: f64,
    pub length_taper: f64,
    pub cross_section: String,
}
impl Default for GratingCouplerRectangularParams {
    fn default() -> Self {
        Self {
            n_periods: 60,
            period: 0.63,
            fill_factor: 0.5,
            width_grating: 11.0,
            length_taper: 350.0,
            cross_section: "strip".into(),
        }
    }
}

///
/// Rectangular grating coupler.
///
/// Port `o1` sits at the origin facing west. The taper widens toward +x,
/// and is followed by `n_periods` teeth across the full grating width.
///
pub fn grating_coupler_rectangular(
    ctx: &Ctx,
    params: &GratingCouplerRectangularParams,
) -> LayoutResult<Arc<Component>> {
    ctx.cell("grating_coupler_rectangular", params, |ctx, comp| {
        positive("period", params.period)?;
        positive("width_grating", params.width_grating)?;
        positive("length_taper", params.length_taper)?;
        if !(params.fill_factor > 0.0 && params.fill_factor < 1.0) {
            return LayoutError::invalid(format!(
                "fill_factor must be in (0, 1), got {}",
                params.fill_factor
            ));
        }
        let xs = ctx.cross_section(&params.cross_section)?;
        let (wg, lt) = (um(params.width_grating), um(params.length_taper));
        comp.add_polygon(
            xs.layer,
            vec![
                Point::new(0, -xs.width / 2),
                Point::new(lt, -wg / 2),
                Point::new(lt, wg - wg / 2),
                Point::new(0, xs.width - xs.width / 2),
            ],
        );
        let period = um(params.period);
        let tooth = um(params.period * params.fill_factor);
        for i in 0..params.n_periods as Int {
            let x0 = lt + i * period + (period - tooth);
            comp.add_rect(
                xs.layer,
                Rect::new(Point::new(x0, -wg / 2), Point::new(x0 + tooth, wg - wg / 2)),
            );
        }
        comp.add_port(Port::optical("o1", Point::zero(), Angle::R180, xs))?;
        comp.set_info("length", params.length_taper + params.n_periods as f64 * params.period);
        Ok(())
    })
}

/// # Die Parameters
/// All dimensions in microns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DieWithPadsParams {
    pub size: (f64, f64),
    pub ngratings: usize,
    /// Pads on each of the top and bottom edges
    pub npads: usize,
    pub grating_pitch: f64,
    pub pad_pitch: f64,
    pub edge_to_pad_distance: f64,
    pub edge_to_grating_distance: f64,
    /// Connect the first and last gratings to one another
    pub with_loopback: bool,
    pub cross_section: String,
}
impl Default for DieWithPadsParams {
    fn default() -> Self {
        Self {
            size: (11470.0, 4900.0),
            ngratings: 14,
            npads: 31,
            grating_pitch: 250.0,
            pad_pitch: 300.0,
            edge_to_pad_distance: 150.0,
            edge_to_grating_distance: 150.0,
            with_loopback: true,
            cross_section: "strip".into(),
        }
    }
}

/// Offsets of `n` items spaced by `pitch`, centered on zero
fn centered(n: usize, pitch: Int) -> impl Iterator<Item = Int> {
    let span = (n as Int - 1).max(0) * pitch;
    (0..n as Int).map(move |i| i * pitch - span / 2)
}

///
/// Die outline, centered on the origin, with a column of grating couplers along its west edge
/// and rows of bond pads along its north and south edges.
///
/// With `with_loopback`, the outermost two gratings are routed to one another
/// and are not exposed. The remaining grating ports face east, into the die,
/// and each pad exposes its port facing into the die.
/// Ports are named clockwise.
///
pub fn die_with_pads(ctx: &Ctx, params: &DieWithPadsParams) -> LayoutResult<Arc<Component>> {
    ctx.cell("die_with_pads", params, |ctx, comp| {
        positive("size[0]", params.size.0)?;
        positive("size[1]", params.size.1)?;
        if params.with_loopback && params.ngratings < 2 {
            return LayoutError::invalid("A loopback requires at least two gratings");
        }
        let (xsize, ysize) = (um(params.size.0), um(params.size.1));
        comp.add_rect(
            ctx.layer(&"FLOORPLAN".into())?,
            Rect::centered(Point::zero(), xsize, ysize),
        );

        // Gratings, rotated to face into the die
        let gc = grating_coupler_rectangular(
            ctx,
            &GratingCouplerRectangularParams {
                cross_section: params.cross_section.clone(),
                ..Default::default()
            },
        )?;
        let gc_len = um(gc.info_f64("length").unwrap_or_default());
        let x = -xsize / 2 + um(params.edge_to_grating_distance) + gc_len;
        let mut gratings = Vec::with_capacity(params.ngratings);
        for (i, y) in centered(params.ngratings, um(params.grating_pitch)).enumerate() {
            let place = Placement {
                angle: Angle::R180,
                reflect_vert: false,
                loc: Point::new(x, y),
            };
            gratings.push(Instance::new(format!("gc{}", i), &gc).at(place));
        }
        let mut ports = Vec::new();
        for (i, inst) in gratings.iter().enumerate() {
            let looped = params.with_loopback && (i == 0 || i + 1 == params.ngratings);
            if !looped {
                ports.push(inst.port("o1")?);
            }
        }
        if params.with_loopback {
            let (first, last) = (&gratings[0], &gratings[params.ngratings - 1]);
            let opts = BundleOptions {
                cross_section: params.cross_section.clone(),
                ..Default::default()
            };
            route_bundle(ctx, comp, &[first.port("o1")?], &[last.port("o1")?], &opts)?;
        }
        for inst in gratings {
            comp.add_inst(inst)?;
        }

        // Pads, north and south
        let pad_cell = pad(ctx, &PadParams::default())?;
        let pad_h = pad_cell.bbox().height();
        let y = ysize / 2 - um(params.edge_to_pad_distance) - pad_h / 2;
        for (side, y, port) in [("n", y, "e4"), ("s", -y, "e2")] {
            for (i, x) in centered(params.npads, um(params.pad_pitch)).enumerate() {
                let loc = Placement::at(Point::new(x, y));
                let inst = Instance::new(format!("pad_{}{}", side, i), &pad_cell).at(loc);
                ports.push(inst.port(port)?);
                comp.add_inst(inst)?;
            }
        }
        debug!(
            "Die `{}`: {} gratings, {} pads",
            comp.name,
            params.ngratings,
            2 * params.npads
        );
        comp.add_ports(rename_clockwise(ports))
    })
}
