//!
//! # Packing & Grids
//!
//! Arrange many components, each as an instance, by their bounding boxes.
//!

// Std-Lib
use std::sync::Arc;

// Crates.io
use log::debug;
use serde::{Deserialize, Serialize};

// Local Imports
use crate::align::{AlignRect, Translate};
use crate::component::{Component, Instance};
use crate::error::{LayoutError, LayoutResult};
use crate::geom::{um, Int, Point};

/// # Packing Options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PackOptions {
    /// Space between neighboring components, in microns
    pub spacing: f64,
    /// Largest bin size (width, height) in microns.
    /// Unbounded dimensions default to a roughly square arrangement in a single bin.
    pub max_size: (Option<f64>, Option<f64>),
    /// Bins are named `{name_prefix}_{index}`
    pub name_prefix: String,
}
impl Default for PackOptions {
    fn default() -> Self {
        Self {
            spacing: 10.0,
            max_size: (None, None),
            name_prefix: "pack".into(),
        }
    }
}

/// Shelf under construction
struct Shelf {
    y: Int,
    height: Int,
    x: Int,
}

///
/// Pack `comps` into as few rectangular bins as `opts.max_size` allows.
///
/// A shelf packer: components are sorted tallest-first, then placed left to right in rows,
/// each row starting above the tallest member of the last.
/// Returns the bins, each holding one instance per packed component.
///
pub fn pack(comps: &[Arc<Component>], opts: &PackOptions) -> LayoutResult<Vec<Arc<Component>>> {
    if opts.spacing < 0.0 {
        return LayoutError::invalid(format!("Negative spacing {}", opts.spacing));
    }
    let spacing = um(opts.spacing);
    let mut items: Vec<(usize, Int, Int)> = comps
        .iter()
        .enumerate()
        .map(|(idx, c)| {
            let b = c.bbox();
            if b.is_empty() {
                (idx, 0, 0)
            } else {
                (idx, b.width(), b.height())
            }
        })
        .collect();
    // Tallest first, ties broken by input order
    items.sort_by_key(|(idx, _, h)| (-h, *idx));

    let max_width = match opts.max_size.0 {
        Some(w) => um(w),
        None => {
            let area: Int = items
                .iter()
                .map(|(_, w, h)| (w + spacing) * (h + spacing))
                .sum();
            let widest = items.iter().map(|(_, w, _)| *w).max().unwrap_or(0);
            widest.max((area as f64).sqrt().ceil() as Int)
        }
    };
    let max_height = opts.max_size.1.map(um).unwrap_or(Int::MAX);
    for (idx, w, h) in items.iter() {
        if *w > max_width || *h > max_height {
            return LayoutError::invalid(format!(
                "Component `{}` does not fit within the maximum bin size",
                comps[*idx].name
            ));
        }
    }

    let mut bins: Vec<Component> = Vec::new();
    let mut bin = Component::new(format!("{}_{}", opts.name_prefix, 0));
    let mut shelf = Shelf {
        y: 0,
        height: 0,
        x: 0,
    };
    for (idx, w, h) in items {
        if shelf.x > 0 && shelf.x + w > max_width {
            // Next shelf
            shelf = Shelf {
                y: shelf.y + shelf.height + spacing,
                height: 0,
                x: 0,
            };
        }
        if shelf.y > 0 && shelf.y.saturating_add(h) > max_height {
            // Next bin
            let done = std::mem::replace(
                &mut bin,
                Component::new(format!("{}_{}", opts.name_prefix, bins.len() + 1)),
            );
            bins.push(done);
            shelf = Shelf {
                y: 0,
                height: 0,
                x: 0,
            };
        }
        let comp = &comps[idx];
        let mut inst = Instance::new(bin.unique_inst_name(&comp.name), comp);
        inst.set_xmin(shelf.x).set_ymin(shelf.y);
        bin.add_inst(inst)?;
        shelf.x += w + spacing;
        shelf.height = shelf.height.max(h);
    }
    bins.push(bin);
    debug!("Packed {} components into {} bins", comps.len(), bins.len());
    Ok(bins.into_iter().map(Arc::new).collect())
}

/// # Grid Options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GridOptions {
    /// Space between neighboring slots, (x, y) in microns
    pub spacing: (f64, f64),
    /// (rows, columns). Defaults to a single row.
    pub shape: Option<(usize, usize)>,
}
impl Default for GridOptions {
    fn default() -> Self {
        Self {
            spacing: (5.0, 5.0),
            shape: None,
        }
    }
}

///
/// Arrange `comps` in a grid of equal-size slots, adding one instance each to `parent`.
///
/// Components fill the grid row by row, with the first row on top.
/// Each slot is as large as the largest component, and each component is centered in its slot.
///
pub fn grid(
    parent: &mut Component,
    comps: &[Arc<Component>],
    opts: &GridOptions,
) -> LayoutResult<()> {
    let (rows, cols) = opts.shape.unwrap_or((1, comps.len()));
    if rows * cols < comps.len() {
        return LayoutError::invalid(format!(
            "A {} by {} grid cannot hold {} components",
            rows,
            cols,
            comps.len()
        ));
    }
    let (sx, sy) = (um(opts.spacing.0), um(opts.spacing.1));
    let (slot_w, slot_h) = comps.iter().map(|c| c.bbox()).filter(|b| !b.is_empty()).fold(
        (0, 0),
        |(w, h), b| (w.max(b.width()), h.max(b.height())),
    );
    for (idx, comp) in comps.iter().enumerate() {
        let (row, col) = ((idx / cols) as Int, (idx % cols) as Int);
        let center = Point::new(
            col * (slot_w + sx) + slot_w / 2,
            -row * (slot_h + sy) - slot_h / 2,
        );
        let mut inst = Instance::new(parent.unique_inst_name(&comp.name), comp);
        if comp.bbox().is_empty() {
            inst.translate(center);
        } else {
            inst.set_center(center);
        }
        parent.add_inst(inst)?;
    }
    Ok(())
}
