use pic21raw::{Angle, Ctx, EngineConfig, LayerSpec, LayoutResult, Point, PortKind};

use crate::si220::cband::*;
use crate::si220::{pdk, LAYER};

fn ctx() -> LayoutResult<Ctx> {
    Ctx::new(EngineConfig::default(), pdk()?)
}

#[test]
fn si220_pdk() -> LayoutResult<()> {
    let pdk = pdk()?;
    assert_eq!(pdk.layer(&"WG".into())?, LayerSpec(1, 0));
    assert_eq!(pdk.layer(&"PAD".into())?, LAYER::PAD);
    assert_eq!(pdk.layer(&"FLOORPLAN".into())?, LAYER::FLOORPLAN);
    let strip = pdk.cross_section("strip")?;
    assert_eq!(strip.width, 450);
    assert_eq!(strip.radius, 10_000);
    assert_eq!(pdk.cross_section("metal_routing")?.layer, LAYER::ROUTER);
    Ok(())
}

#[test]
fn bend_is_cached() -> LayoutResult<()> {
    let ctx = ctx()?;
    let b1 = bend_euler(&ctx, "strip")?;
    let b2 = bend_euler(&ctx, "strip")?;
    assert!(std::sync::Arc::ptr_eq(&b1, &b2));
    assert_eq!(b1.port("o2")?.center, Point::new(10_000, 10_000));
    assert!(bend_euler(&ctx, "nope").is_err());
    Ok(())
}

#[test]
fn heater_ports() -> LayoutResult<()> {
    let ctx = ctx()?;
    let h = straight_heater_metal(
        &ctx,
        &StraightHeaterMetalParams {
            length: 100.0,
            ..Default::default()
        },
    )?;
    assert_eq!(h.name, "straight_heater_metal_length100");
    assert_eq!(h.port("o1")?.center, Point::new(0, 0));
    assert_eq!(h.port("o2")?.center, Point::new(100_000, 0));
    assert_eq!(h.port("o2")?.width, 450);
    assert_eq!(h.ports.filter_kind(PortKind::Electrical).len(), 8);
    // Left via stack's north port
    assert_eq!(h.port("l_e2")?.center, Point::new(5_000, 5_000));
    assert_eq!(h.port("r_e2")?.orientation, Angle::R90);

    let bad = straight_heater_metal(
        &ctx,
        &StraightHeaterMetalParams {
            length: 0.0,
            ..Default::default()
        },
    );
    assert!(bad.is_err());
    Ok(())
}

#[test]
fn grating() -> LayoutResult<()> {
    let ctx = ctx()?;
    let gc = grating_coupler_rectangular(&ctx, &GratingCouplerRectangularParams::default())?;
    assert_eq!(gc.elems.len(), 61);
    assert_eq!(gc.port("o1")?.orientation, Angle::R180);
    approx::assert_relative_eq!(gc.info_f64("length").unwrap(), 387.8, max_relative = 1e-9);
    let bbox = gc.bbox();
    assert_eq!(bbox.p0, Point::new(0, -5_500));
    assert_eq!(bbox.p1, Point::new(387_800, 5_500));
    Ok(())
}

#[test]
fn die() -> LayoutResult<()> {
    let ctx = ctx()?;
    let die = die_with_pads(&ctx, &DieWithPadsParams::default())?;
    let bbox = die.bbox();
    assert_eq!(bbox.p0, Point::new(-5_735_000, -2_450_000));
    assert_eq!(bbox.p1, Point::new(5_735_000, 2_450_000));

    // Loopback gratings are not exposed
    let optical = die.ports.filter_kind(PortKind::Optical);
    assert_eq!(optical.len(), 12);
    assert!(optical.iter().all(|p| p.orientation == Angle::R0));
    let electrical = die.ports.filter_kind(PortKind::Electrical);
    assert_eq!(electrical.len(), 62);

    // Clockwise naming: pads facing north (the south row) come first, left to right
    let e1 = die.port("e1")?;
    assert_eq!(e1.orientation, Angle::R90);
    assert_eq!(e1.center, Point::new(-4_500_000, -2_200_000));
    // East-facing gratings are named top to bottom
    assert_eq!(die.port("o1")?.center.y, 1_375_000);
    assert_eq!(die.port("o12")?.center.y, -1_375_000);

    let no_loop = die_with_pads(
        &ctx,
        &DieWithPadsParams {
            with_loopback: false,
            ..Default::default()
        },
    )?;
    assert_eq!(no_loop.ports.filter_kind(PortKind::Optical).len(), 14);
    assert_eq!(no_loop.name, "die_with_pads_with_loopbackFalse");
    Ok(())
}
