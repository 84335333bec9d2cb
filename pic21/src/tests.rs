use std::sync::Arc;

use pic21raw::{
    Angle, BoundBoxTrait, Component, EngineConfig, LayerSpec, LayoutError, LayoutResult, Point,
    Shape,
};
use serde_json::json;

use crate::drc::{gap_min, sample_drc_errors, sample_gaps, GapMinParams};
use crate::mzi::{mzi_heater_python, MziHeaterParams};
use crate::*;

#[test]
fn bends_share_the_foundry_cell() -> LayoutResult<()> {
    let ctx = ctx()?;
    let b = bends::bend_euler(&ctx)?;
    let m = bends::bend_metal(&ctx)?;
    let foundry = pic21pdk::si220::cband::bend_euler(&ctx, "strip")?;
    assert!(Arc::ptr_eq(&b, &foundry));
    assert!(Arc::ptr_eq(&m, &foundry));
    Ok(())
}

#[test]
fn mzi_ports() -> LayoutResult<()> {
    let ctx = ctx()?;
    for (dl, length_heater) in [(10.0, 100.0), (0.0, 100.0), (40.0, 20.0)] {
        let mzi = mzi_heater_python(&ctx, &MziHeaterParams { dl, length_heater })?;
        assert_eq!(mzi.ports.names(), vec!["o3", "o4", "o1", "o2"]);
        for name in ["o3", "o4"] {
            assert_eq!(mzi.port(name)?.orientation, Angle::R0);
        }
        for name in ["o1", "o2"] {
            assert_eq!(mzi.port(name)?.orientation, Angle::R180);
        }
    }
    Ok(())
}

#[test]
fn mzi_geometry() -> LayoutResult<()> {
    let ctx = ctx()?;
    let mzi = mzi_heater_python(&ctx, &MziHeaterParams::default())?;
    assert_eq!(mzi.name, "mzi_heater_python");
    // The combiner sits at the origin
    assert_eq!(mzi.port("o1")?.center, Point::new(-10_000, -625));
    // Two bends, the heater, and two more bends: 140um between the MMIs
    let sp = mzi.inst("sp")?;
    assert_eq!(sp.place.loc, Point::new(165_500, 0));
    assert_eq!(mzi.port("o3")?.center, Point::new(181_000, 625));
    // The arm's high point is the heater, 5um of delay above the first bend
    let heater = mzi.inst("heater")?;
    assert_eq!(heater.port("o1")?.center, Point::new(35_500, 25_625));
    // The short arm is a single straight route
    let paths: Vec<_> = mzi
        .elems
        .iter()
        .filter_map(|e| match &e.inner {
            Shape::Path(p) => Some(p),
            _ => None,
        })
        .collect();
    assert_eq!(paths.len(), 1);
    assert_eq!(
        paths[0].points,
        vec![Point::new(155_500, -625), Point::new(15_500, -625)]
    );
    Ok(())
}

#[test]
fn mzi_zero_delay() -> LayoutResult<()> {
    let ctx = ctx()?;
    let mzi = mzi_heater_python(
        &ctx,
        &MziHeaterParams {
            dl: 0.0,
            ..Default::default()
        },
    )?;
    for name in ["sl", "sr"] {
        let inst = mzi.inst(name)?;
        assert_eq!(inst.cell.info_f64("length"), Some(0.0));
        assert!(inst.cell.elems.is_empty());
        assert_eq!(inst.port("o1")?.center, inst.port("o2")?.center);
    }
    Ok(())
}

#[test]
fn mzi_invalid() -> LayoutResult<()> {
    let ctx = ctx()?;
    let neg = mzi_heater_python(
        &ctx,
        &MziHeaterParams {
            dl: -2.0,
            ..Default::default()
        },
    );
    assert!(matches!(neg, Err(LayoutError::InvalidParam(_))));
    let no_heater = mzi_heater_python(
        &ctx,
        &MziHeaterParams {
            length_heater: 0.0,
            ..Default::default()
        },
    );
    assert!(matches!(no_heater, Err(LayoutError::InvalidParam(_))));
    // Failed builds are not cached, and fail again
    let cached = ctx.cache().len()?;
    let again = mzi_heater_python(
        &ctx,
        &MziHeaterParams {
            dl: -2.0,
            ..Default::default()
        },
    );
    assert!(again.is_err());
    assert_eq!(ctx.cache().len()?, cached);
    Ok(())
}

#[test]
fn idempotent() -> LayoutResult<()> {
    let ctx = ctx()?;
    let params = MziHeaterParams {
        dl: 20.0,
        length_heater: 50.0,
    };
    let a = mzi_heater_python(&ctx, &params)?;
    let b = mzi_heater_python(&ctx, &params)?;
    assert!(Arc::ptr_eq(&a, &b));

    // A fresh cache builds an equal, but distinct, component
    let fresh = crate::ctx()?;
    let c = mzi_heater_python(&fresh, &params)?;
    assert!(!Arc::ptr_eq(&a, &c));
    assert_eq!(*a, *c);
    assert_eq!(a.name, "mzi_heater_python_dL20_length_heater50");
    Ok(())
}

#[test]
fn every_cell_idempotent() -> LayoutResult<()> {
    let cat = Catalog::new()?;
    let (ctx1, ctx2) = (ctx()?, ctx()?);
    for name in cat.names() {
        let a = cat.build(&ctx1, name, serde_json::Value::Null)?;
        let again = cat.build(&ctx1, name, serde_json::Value::Null)?;
        assert!(Arc::ptr_eq(&a, &again), "`{}` was rebuilt", name);
        let b = cat.build(&ctx2, name, serde_json::Value::Null)?;
        assert_eq!(*a, *b, "`{}` differs between builds", name);
    }
    Ok(())
}

/// Bounding box of the single shape on `layer` in the flattened `cell`
fn shape_on(cell: &Component, layer: LayerSpec) -> pic21raw::BoundBox {
    let shapes: Vec<_> = cell
        .flatten()
        .into_iter()
        .filter(|e| e.layer == layer)
        .collect();
    assert_eq!(shapes.len(), 1, "expected one shape on {:?}", layer);
    shapes[0].inner.bbox()
}

#[test]
fn single_rule_samples() -> LayoutResult<()> {
    let ctx = ctx()?;
    let wg = pic21pdk::si220::LAYER::WG;

    let w = drc::width_min(&ctx, &drc::WidthMinParams::default())?;
    assert_eq!(w.name, "width_min");
    let b = shape_on(&w, wg);
    assert_eq!((b.p0, b.p1), (Point::new(0, 0), Point::new(100, 100)));

    let w = drc::width_min(&ctx, &drc::WidthMinParams { size: (0.15, 2.0) })?;
    assert_eq!(shape_on(&w, wg).size(), (150, 2_000));

    let a = drc::area_min(&ctx)?;
    let b = shape_on(&a, wg);
    assert_eq!((b.p0, b.p1), (Point::new(0, 0), Point::new(200, 200)));

    let s = drc::separation(&ctx, &drc::SeparationParams::default())?;
    let r1 = shape_on(&s, LayerSpec(47, 0));
    let r2 = shape_on(&s, LayerSpec(41, 0));
    assert_eq!((r1.p0, r1.p1), (Point::new(-1_000, 0), Point::new(0, 1_000)));
    assert_eq!((r2.p0, r2.p1), (Point::new(100, 0), Point::new(1_100, 1_000)));
    assert!(s.flatten().iter().all(|e| e.layer != wg));
    Ok(())
}

#[test]
fn drc_errors_pack() -> LayoutResult<()> {
    let ctx = ctx()?;
    let drc = sample_drc_errors(&ctx)?;
    // A floorplan frame around a single packed bin
    assert_eq!(drc.insts.len(), 1);
    let floorplan = pic21pdk::si220::LAYER::FLOORPLAN;
    assert_eq!(drc.elems.len(), 1);
    assert_eq!(drc.elems[0].layer, floorplan);

    let bin: &Component = &drc.insts[0].cell;
    assert_eq!(bin.insts.len(), 8);
    let mut names: Vec<&str> = bin.insts.iter().map(|i| i.cell.name.as_str()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), 8);

    // The frame surrounds the bin by 5um on all sides
    let frame = drc.elems[0].inner.bbox();
    let inner = bin.bbox();
    assert_eq!(frame.p0, inner.p0 - Point::new(5_000, 5_000));
    assert_eq!(frame.p1, inner.p1 + Point::new(5_000, 5_000));
    Ok(())
}

#[test]
fn gap_min_separation() -> LayoutResult<()> {
    let ctx = ctx()?;
    let gaps = sample_gaps();
    assert_eq!(gaps.len(), 5);
    for (gap, nm) in gaps.iter().zip([100, 125, 150, 175, 200]) {
        let cell = gap_min(&ctx, &GapMinParams { gap: *gap })?;
        let r1 = cell.inst("r1")?.bbox();
        let r2 = cell.inst("r2")?.bbox();
        assert_eq!(r1.p1.x, 0);
        assert_eq!(r2.p0.x - r1.p1.x, nm);
        assert_eq!(r1.width(), 1_000);
        assert_eq!(r2.height(), 1_000);
    }
    assert_eq!(gap_min(&ctx, &GapMinParams::default())?.name, "gap_min");
    assert_eq!(
        gap_min(&ctx, &GapMinParams { gap: gaps[1] })?.name,
        "gap_min_gap0p125"
    );
    Ok(())
}

#[test]
fn enclosing_shifted() -> LayoutResult<()> {
    let ctx = ctx()?;
    let cell = drc::enclosing(&ctx, &drc::EnclosingParams::default())?;
    let elems = cell.flatten();
    let on = |layer: LayerSpec| {
        elems
            .iter()
            .find(|e| e.layer == layer)
            .map(|e| e.inner.bbox())
    };
    let inner = on(LayerSpec(40, 0)).unwrap();
    let outer = on(LayerSpec(41, 0)).unwrap();
    assert_eq!(inner.p0, Point::new(-500, -500));
    assert_eq!(outer.p0, Point::new(-50, -550));
    assert_eq!(outer.p1, Point::new(1_050, 550));
    Ok(())
}

#[test]
fn spiral_delay_length() -> LayoutResult<()> {
    let ctx = ctx()?;
    for length in [200.0, 150.0, 1000.0] {
        let s = spiral::spiral_delay(&ctx, &spiral::SpiralDelayParams { length })?;
        let reported = s.info_f64("length").unwrap();
        assert!((reported - length).abs() <= 0.001);
        let drawn: f64 = s
            .elems
            .iter()
            .filter_map(|e| match &e.inner {
                Shape::Path(p) => Some(p.length()),
                _ => None,
            })
            .sum();
        approx::assert_abs_diff_eq!(drawn, length * 1000.0, epsilon = 1.0);
        assert_eq!(s.tags, vec!["spirals".to_string()]);
    }
    Ok(())
}

#[test]
fn grid_sample() -> LayoutResult<()> {
    let ctx = ctx()?;
    let g = samples::sample3_grid(&ctx)?;
    assert_eq!(g.insts.len(), 6);
    // "1" through "3" across the top row, left to right
    let centers: Vec<Point> = g.insts.iter().map(|i| i.bbox().center()).collect();
    assert_eq!(centers[0].y, centers[1].y);
    assert_eq!(centers[1].y, centers[2].y);
    assert!(centers[0].x < centers[1].x && centers[1].x < centers[2].x);
    assert!(centers[3].y < centers[0].y);
    assert_eq!(centers[3].x, centers[0].x);
    Ok(())
}

#[test]
fn route_sample() -> LayoutResult<()> {
    let ctx = ctx()?;
    let r = route::sample_route_python(&ctx)?;
    let lengths: Vec<f64> = r
        .info
        .get("route_lengths")
        .and_then(|v| v.as_array())
        .unwrap()
        .iter()
        .map(|v| v.as_f64().unwrap())
        .collect();
    assert_eq!(lengths.len(), 8);

    let blocks = [r.inst("top")?.bbox(), r.inst("bot")?.bbox()];
    let radius = 5_000;
    let per_bend = pic21raw::prims::euler_length(radius, 0.5) - 2.0 * radius as f64;
    let paths: Vec<_> = r
        .elems
        .iter()
        .filter_map(|e| match &e.inner {
            Shape::Path(p) => Some(p),
            _ => None,
        })
        .collect();
    assert_eq!(paths.len(), 8);
    for (path, length) in paths.iter().zip(lengths.iter()) {
        let pts = &path.points;
        // Every vertex but the ends is a right-angle bend: no reversals, no straight-through points
        for w in pts.windows(3) {
            let (d1, d2) = (w[1] - w[0], w[2] - w[1]);
            assert_eq!(d1.x * d2.x + d1.y * d2.y, 0, "{:?} is not a right angle", w);
        }
        // No segment enters either block
        for w in pts.windows(2) {
            let (lo, hi) = (
                Point::new(w[0].x.min(w[1].x), w[0].y.min(w[1].y)),
                Point::new(w[0].x.max(w[1].x), w[0].y.max(w[1].y)),
            );
            for b in blocks.iter() {
                let inside = lo.x < b.p1.x && hi.x > b.p0.x && lo.y < b.p1.y && hi.y > b.p0.y;
                assert!(!inside, "{:?} crosses {:?}", w, b);
            }
        }
        // The recorded length is the drawn one, with each corner swapped for an Euler bend
        let drawn: isize = pts.windows(2).map(|w| w[0].manhattan(&w[1])).sum();
        let bends = pts.len() - 2;
        let expected = (drawn as f64 + bends as f64 * per_bend) / 1000.0;
        approx::assert_abs_diff_eq!(*length, expected, epsilon = 1e-3);
        // And spans at least the gap between the blocks
        assert!(*length > 80.0);
    }
    Ok(())
}

#[test]
fn fill_sample() -> LayoutResult<()> {
    let ctx = ctx()?;
    let f = fill::sample_fill(&ctx)?;
    let count = f.info.get("fill_count").and_then(|v| v.as_u64()).unwrap();
    assert!(count > 0);
    let tiles: usize = f.arrays.iter().map(|a| a.len()).sum();
    assert_eq!(tiles as u64, count);

    // No tile within 100um of a pad
    let die = f.inst("die")?;
    let pad = pic21pdk::si220::LAYER::PAD;
    let pads: Vec<_> = die
        .cell
        .flatten()
        .into_iter()
        .filter(|e| e.layer == pad)
        .map(|e| e.inner.bbox().expanded(100_000))
        .collect();
    let tile = f.arrays[0].cell.bbox();
    for arr in f.arrays.iter().take(200) {
        for loc in arr.locs() {
            let placed = pic21raw::BoundBox::from_points(tile.p0 + loc, tile.p1 + loc);
            assert!(pads.iter().all(|p| !p.overlaps(&placed)));
        }
    }
    Ok(())
}

#[test]
fn catalog() -> LayoutResult<()> {
    let ctx = ctx()?;
    let cat = Catalog::new()?;
    assert_eq!(cat.names().len(), 13);
    assert_eq!(cat.tagged("spirals"), vec!["spiral_delay"]);
    assert_eq!(
        cat.default_params("mzi_heater_python")?,
        json!({"dL": 10.0, "length_heater": 100.0})
    );

    // Partial parameters take defaults for the rest
    let a = cat.build(&ctx, "mzi_heater_python", json!({"dL": 20.0}))?;
    let b = mzi_heater_python(
        &ctx,
        &MziHeaterParams {
            dl: 20.0,
            ..Default::default()
        },
    )?;
    assert!(Arc::ptr_eq(&a, &b));
    cat.build(&ctx, "bend_euler", serde_json::Value::Null)?;

    assert!(matches!(
        cat.build(&ctx, "nope", json!({})),
        Err(LayoutError::CellNotFound(_))
    ));
    assert!(matches!(
        cat.build(&ctx, "gap_min", json!({"gapp": 1.0})),
        Err(LayoutError::InvalidParam(_))
    ));
    assert!(matches!(
        cat.build(&ctx, "area_min", json!({"size": 1.0})),
        Err(LayoutError::InvalidParam(_))
    ));
    Ok(())
}

#[test]
fn catalog_config() -> LayoutResult<()> {
    assert_eq!(config().max_cellname_length, 64);
    assert!(!version().is_empty());
    // Names past the limit are shortened
    let ctx = ctx_with(EngineConfig {
        max_cellname_length: 20,
        ..config()
    })?;
    let mzi = mzi_heater_python(
        &ctx,
        &MziHeaterParams {
            dl: 12.5,
            length_heater: 75.25,
        },
    )?;
    assert_eq!(mzi.name.len(), 20);
    Ok(())
}
