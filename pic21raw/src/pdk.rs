//!
//! # Process Design Kits
//!
//! A [Pdk] bundles the named [Layers] and [CrossSection]s that cells resolve
//! their `layer` and `cross_section` parameters against.
//!

// Crates.io
use indexmap::IndexMap;

// Local Imports
use crate::error::{LayoutError, LayoutResult};
use crate::layers::{CrossSection, LayerRef, LayerSpec, Layers};

/// # Process Design Kit
#[derive(Debug, Clone, Default)]
pub struct Pdk {
    pub name: String,
    pub layers: Layers,
    pub cross_sections: IndexMap<String, CrossSection>,
}
impl Pdk {
    /// Create a new and empty [Pdk]
    pub fn new(name: impl Into<String>, layers: Layers) -> Self {
        Self {
            name: name.into(),
            layers,
            ..Default::default()
        }
    }
    /// Add a [CrossSection]. Fails if its name is already taken.
    pub fn add_cross_section(&mut self, xs: CrossSection) -> LayoutResult<()> {
        if self.cross_sections.contains_key(&xs.name) {
            return LayoutError::fail(format!("Duplicate cross-section `{}`", xs.name));
        }
        self.cross_sections.insert(xs.name.clone(), xs);
        Ok(())
    }
    /// Get cross-section `name`
    pub fn cross_section(&self, name: &str) -> LayoutResult<&CrossSection> {
        self.cross_sections
            .get(name)
            .ok_or_else(|| LayoutError::CrossSectionNotFound(name.into()))
    }
    /// Resolve a [LayerRef] to its [LayerSpec]
    pub fn layer(&self, layer: &LayerRef) -> LayoutResult<LayerSpec> {
        self.layers.resolve(layer)
    }
    ///
    /// A minimal generic PDK: one waveguide layer and a handful of auxiliary layers,
    /// plus a single `strip` cross-section. Used where no foundry PDK is at hand.
    ///
    pub fn generic() -> LayoutResult<Self> {
        let layers = Layers::default().with(&[
            ("WG", LayerSpec::new(1, 0)),
            ("SLAB", LayerSpec::new(3, 0)),
            ("HEATER", LayerSpec::new(39, 0)),
            ("PAD", LayerSpec::new(41, 0)),
            ("TEXT", LayerSpec::new(66, 0)),
            ("FLOORPLAN", LayerSpec::new(99, 0)),
        ])?;
        let mut pdk = Self::new("generic", layers);
        pdk.add_cross_section(CrossSection::new("strip", (1, 0), 0.5, 10.0))?;
        Ok(pdk)
    }
}
