//!
//! # Padding Containers
//!

// Std-Lib
use std::sync::Arc;

// Crates.io
use serde::{Deserialize, Serialize};

// Local Imports
use crate::component::{Component, Instance};
use crate::ctx::Ctx;
use crate::error::{LayoutError, LayoutResult};
use crate::geom::{um, Point, Rect};
use crate::layers::LayerRef;

/// # Padding Options
/// Each side's padding in microns, defaulting to `default`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PaddingOptions {
    pub layers: Vec<LayerRef>,
    pub default: f64,
    pub top: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
    pub right: Option<f64>,
}
impl Default for PaddingOptions {
    fn default() -> Self {
        Self {
            layers: vec!["PADDING".into()],
            default: 50.0,
            top: None,
            bottom: None,
            left: None,
            right: None,
        }
    }
}

///
/// Wrap `comp` in a new component named `{name}_padded`, holding a single instance of it,
/// plus a rectangle on each of `opts.layers` covering its bounding box grown by the padding.
/// The new component exposes all of `comp`'s ports.
///
pub fn add_padding_container(
    ctx: &Ctx,
    comp: &Arc<Component>,
    opts: &PaddingOptions,
) -> LayoutResult<Arc<Component>> {
    let bbox = comp.bbox();
    if bbox.is_empty() {
        return LayoutError::invalid(format!("Cannot pad empty component `{}`", comp.name));
    }
    let side = |s: Option<f64>| um(s.unwrap_or(opts.default));
    let p0 = bbox.p0 - Point::new(side(opts.left), side(opts.bottom));
    let p1 = bbox.p1 + Point::new(side(opts.right), side(opts.top));
    if p0.x > p1.x || p0.y > p1.y {
        return LayoutError::invalid("Padding shrinks the container below zero size");
    }

    let mut container = Component::new(format!("{}_padded", comp.name));
    for layer in opts.layers.iter() {
        container.add_rect(ctx.layer(layer)?, Rect::new(p0, p1));
    }
    let inst = Instance::new(comp.name.clone(), comp);
    container.add_ports(inst.ports().to_vec())?;
    container.add_inst(inst)?;
    container.info = comp.info.clone();
    Ok(Arc::new(container))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::LayerSpec;
    use crate::{EngineConfig, Pdk};

    #[test]
    fn test_padding() -> LayoutResult<()> {
        let ctx = Ctx::new(EngineConfig::default(), Pdk::generic()?)?;
        let mut c = Component::new("core");
        c.add_rect(LayerSpec::new(1, 0), Rect::new(Point::zero(), Point::new(10_000, 4000)));
        let c = Arc::new(c);
        let opts = PaddingOptions {
            layers: vec!["FLOORPLAN".into()],
            default: 5.0,
            top: Some(1.0),
            ..Default::default()
        };
        let padded = add_padding_container(&ctx, &c, &opts)?;
        assert_eq!(padded.name, "core_padded");
        let b = padded.bbox();
        assert_eq!(b.p0, Point::new(-5000, -5000));
        assert_eq!(b.p1, Point::new(15_000, 5000));
        assert_eq!(padded.elems[0].layer, LayerSpec::new(99, 0));
        Ok(())
    }
}
