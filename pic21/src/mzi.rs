//!
//! # Mach-Zehnder Interferometers
//!

// Std-Lib
use std::sync::Arc;

// Crates.io
use log::debug;
use serde::{Deserialize, Serialize};

// Workspace Imports
use pic21pdk::si220::cband::{straight_heater_metal, StraightHeaterMetalParams};
use pic21raw::prims::{bend_euler, mmi2x2, straight, BendEulerParams, Mmi2x2Params, StraightParams};
use pic21raw::{route_bundle, Angle, BundleOptions, Component, Ctx, Instance, LayoutResult};

/// # Heated MZI Parameters
/// Lengths in microns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MziHeaterParams {
    /// Length difference between the two arms
    #[serde(rename = "dL")]
    pub dl: f64,
    pub length_heater: f64,
}
impl Default for MziHeaterParams {
    fn default() -> Self {
        Self {
            dl: 10.0,
            length_heater: 100.0,
        }
    }
}

///
/// MZI phase shifter with a heater on its long arm.
///
/// Two 2x2 MMIs: the combiner `cp` at the origin, and the splitter `sp` at the far end of the arm.
/// The arm runs from `cp.o3` up, across the heater, and back down into `sp.o2`,
/// its two vertical straights `sl` and `sr` each `dL / 2` long.
/// The short arm is routed straight from `sp.o1` to `cp.o4`.
///
/// Exposes `sp`'s east-facing ports `o3` and `o4`, and `cp`'s west-facing `o1` and `o2`.
///
pub fn mzi_heater_python(ctx: &Ctx, params: &MziHeaterParams) -> LayoutResult<Arc<Component>> {
    ctx.cell("mzi_heater_python", params, |ctx, comp| {
        let mmi = mmi2x2(ctx, &Mmi2x2Params::default())?;
        let bend = bend_euler(ctx, &BendEulerParams::default())?;
        let delay = straight(
            ctx,
            &StraightParams {
                length: params.dl / 2.0,
                ..Default::default()
            },
        )?;
        let heater = straight_heater_metal(
            ctx,
            &StraightHeaterMetalParams {
                length: params.length_heater,
                ..Default::default()
            },
        )?;

        // Each element lands on its predecessor's port
        let cp = Instance::new("cp", &mmi);
        let b1 = Instance::new("b1", &bend).connected("o1", &cp.port("o3")?)?;
        let sl = Instance::new("sl", &delay).connected("o1", &b1.port("o2")?)?;
        let b2 = Instance::new("b2", &bend).connected("o2", &sl.port("o2")?)?;
        let h = Instance::new("heater", &heater).connected("o1", &b2.port("o1")?)?;
        let b3 = Instance::new("b3", &bend).connected("o2", &h.port("o2")?)?;
        let sr = Instance::new("sr", &delay).connected("o1", &b3.port("o1")?)?;
        let b4 = Instance::new("b4", &bend).connected("o1", &sr.port("o2")?)?;
        let sp = Instance::new("sp", &mmi).connected("o2", &b4.port("o2")?)?;

        let routes = route_bundle(
            ctx,
            comp,
            &[sp.port("o1")?],
            &[cp.port("o4")?],
            &BundleOptions::default(),
        )?;
        for route in routes.iter() {
            debug!("Short arm: {} bends, length {:.3}", route.bends, route.length);
        }

        comp.add_ports(sp.ports().filter_orientation(Angle::R0))?;
        comp.add_ports(cp.ports().filter_orientation(Angle::R180))?;
        for inst in [cp, b1, sl, b2, h, b3, sr, b4, sp] {
            comp.add_inst(inst)?;
        }
        Ok(())
    })
}
