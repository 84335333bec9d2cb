//!
//! # Fill
//!
//! Tile a fill cell over the regions of some layers, keeping clear of others.
//!
//! Regions and exclusions are the bounding boxes of each (flattened) shape on the named layers,
//! each grown by its margin, or shrunk if the margin is negative.
//! Tiles sit on a regular pitch anchored at each region's lower-left corner,
//! and are emitted as one [InstanceArray] per unbroken run within a row.
//!

// Std-Lib
use std::sync::Arc;

// Crates.io
use log::debug;

// Local Imports
use crate::bbox::{BoundBox, BoundBoxTrait};
use crate::component::{Component, InstanceArray};
use crate::ctx::Ctx;
use crate::error::{LayoutError, LayoutResult};
use crate::geom::{um, Int, Point};
use crate::layers::{LayerRef, LayerSpec};

/// # Fill Options
#[derive(Debug, Clone)]
pub struct FillOptions {
    /// Cell to tile
    pub fill_cell: Arc<Component>,
    /// Layers to fill, each with a margin in microns
    pub fill_layers: Vec<(LayerRef, f64)>,
    /// Layers to avoid, each with a margin in microns
    pub exclude_layers: Vec<(LayerRef, f64)>,
    /// Space between tiles, in microns
    pub x_space: f64,
    pub y_space: f64,
}

/// Bounding boxes of every shape on each of `layers`, expanded by their margins
fn regions(
    ctx: &Ctx,
    elems: &[crate::component::Element],
    layers: &[(LayerRef, f64)],
) -> LayoutResult<Vec<BoundBox>> {
    let layers = layers
        .iter()
        .map(|(l, margin)| Ok((ctx.layer(l)?, um(*margin))))
        .collect::<LayoutResult<Vec<(LayerSpec, Int)>>>()?;
    let mut boxes = Vec::new();
    for elem in elems {
        for (layer, margin) in layers.iter() {
            if elem.layer == *layer {
                let b = elem.inner.bbox().expanded(*margin);
                if !b.is_empty() {
                    boxes.push(b);
                }
            }
        }
    }
    Ok(boxes)
}

///
/// Fill `comp` with copies of `opts.fill_cell`. Returns the number of tiles placed.
///
pub fn fill_rectangle(ctx: &Ctx, comp: &mut Component, opts: &FillOptions) -> LayoutResult<usize> {
    let cell_box = opts.fill_cell.bbox();
    if cell_box.is_empty() {
        return LayoutError::invalid(format!("Fill cell `{}` is empty", opts.fill_cell.name));
    }
    if opts.x_space < 0.0 || opts.y_space < 0.0 {
        return LayoutError::invalid("Fill spacing must be non-negative");
    }
    let (w, h) = cell_box.size();
    let pitch = Point::new(w + um(opts.x_space), h + um(opts.y_space));

    let elems = comp.flatten();
    let fills = regions(ctx, &elems, &opts.fill_layers)?;
    let excludes = regions(ctx, &elems, &opts.exclude_layers)?;

    let mut count = 0;
    let mut arrays = Vec::new();
    for region in fills.iter() {
        let rows = div_floor(region.height() - h, pitch.y) + 1;
        for row in 0..rows {
            let y0 = region.p0.y + row * pitch.y;
            // Blocked x-intervals in this row, sorted and merged
            let mut blocked: Vec<(Int, Int)> = excludes
                .iter()
                .filter(|ex| ex.p0.y < y0 + h && y0 < ex.p1.y)
                .map(|ex| (ex.p0.x, ex.p1.x))
                .collect();
            blocked.sort_unstable();
            let mut merged: Vec<(Int, Int)> = Vec::with_capacity(blocked.len());
            for (lo, hi) in blocked {
                match merged.last_mut() {
                    Some(last) if lo <= last.1 => last.1 = last.1.max(hi),
                    _ => merged.push((lo, hi)),
                }
            }
            // Free intervals between them
            let mut free = Vec::with_capacity(merged.len() + 1);
            let mut lo = region.p0.x;
            for (blo, bhi) in merged {
                free.push((lo, blo.min(region.p1.x)));
                lo = lo.max(bhi);
            }
            free.push((lo, region.p1.x));

            for (lo, hi) in free {
                // Columns `i` with `lo <= x0 + i*pitch` and `x0 + i*pitch + w <= hi`
                let first = div_ceil(lo - region.p0.x, pitch.x).max(0);
                let last = div_floor(hi - w - region.p0.x, pitch.x);
                if last < first {
                    continue;
                }
                let cols = (last - first + 1) as usize;
                let loc = Point::new(region.p0.x + first * pitch.x, y0) - cell_box.p0;
                arrays.push((loc, cols));
                count += cols;
            }
        }
    }
    for (loc, cols) in arrays {
        let name = comp.unique_inst_name("fill");
        comp.add_array(InstanceArray {
            name,
            cell: Arc::clone(&opts.fill_cell),
            loc,
            cols,
            rows: 1,
            pitch,
        })?;
    }
    debug!("Placed {} fill tiles in `{}`", count, comp.name);
    Ok(count)
}

fn div_floor(a: Int, b: Int) -> Int {
    a.div_euclid(b)
}
fn div_ceil(a: Int, b: Int) -> Int {
    -(-a).div_euclid(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Rect;
    use crate::{EngineConfig, Pdk};

    #[test]
    fn test_fill_avoids_exclusions() -> LayoutResult<()> {
        let ctx = Ctx::new(EngineConfig::default(), Pdk::generic()?)?;
        let floorplan = ctx.layer(&"FLOORPLAN".into())?;
        let pad = ctx.layer(&"PAD".into())?;

        let mut tile = Component::new("tile");
        tile.add_rect(pad, Rect::new(Point::zero(), Point::new(4000, 2000)));
        let tile = Arc::new(tile);

        let mut die = Component::new("die");
        die.add_rect(floorplan, Rect::new(Point::zero(), Point::new(100_000, 100_000)));
        die.add_rect(pad, Rect::new(Point::new(40_000, 40_000), Point::new(60_000, 60_000)));

        let opts = FillOptions {
            fill_cell: Arc::clone(&tile),
            fill_layers: vec![("FLOORPLAN".into(), -10.0)],
            exclude_layers: vec![("PAD".into(), 5.0)],
            x_space: 1.0,
            y_space: 1.0,
        };
        let count = fill_rectangle(&ctx, &mut die, &opts)?;
        assert!(count > 0);
        let total: usize = die.arrays.iter().map(|a| a.len()).sum();
        assert_eq!(total, count);

        let keepout = BoundBox::from_points(Point::new(35_000, 35_000), Point::new(65_000, 65_000));
        let inner = BoundBox::from_points(Point::new(10_000, 10_000), Point::new(90_000, 90_000));
        for arr in die.arrays.iter() {
            for loc in arr.locs() {
                let b = BoundBox::from_points(loc, loc + Point::new(4000, 2000));
                assert!(inner.encloses(&b));
                assert!(!keepout.overlaps(&b));
            }
        }
        Ok(())
    }
    #[test]
    fn test_div() {
        assert_eq!(div_floor(-1, 5), -1);
        assert_eq!(div_ceil(-1, 5), 0);
        assert_eq!(div_ceil(6, 5), 2);
        assert_eq!(div_floor(9, 5), 1);
    }
}
