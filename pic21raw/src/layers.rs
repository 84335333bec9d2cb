//!
//! # Layers
//!
//! Every shape sits on a (layer, datatype) pair, a [LayerSpec].
//! PDKs name these pairs in a [Layers] table, and cell parameters may refer
//! to a layer either way, through a [LayerRef].
//!

// Std-Lib
use std::collections::HashMap;
use std::fmt;

// Crates.io
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

// Local Imports
use crate::error::{LayoutError, LayoutResult};

new_key_type! {
    /// Keys for [Layer] entries
    pub struct LayerKey;
}

/// # Layer Specification
/// As in seemingly every layout system, this uses two numbers to identify each layer.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub struct LayerSpec(pub i16, pub i16);
impl LayerSpec {
    pub const fn new(layernum: i16, datatype: i16) -> Self {
        Self(layernum, datatype)
    }
    pub fn layernum(&self) -> i16 {
        self.0
    }
    pub fn datatype(&self) -> i16 {
        self.1
    }
}
impl From<(i16, i16)> for LayerSpec {
    fn from(t: (i16, i16)) -> Self {
        Self(t.0, t.1)
    }
}
impl fmt::Display for LayerSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// # Named Layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Layer {
    /// Layer Name
    pub name: String,
    /// (Layer, Datatype) Pair
    pub spec: LayerSpec,
}
impl Layer {
    /// Create a new [Layer] with the given `name` and `spec`
    pub fn new(name: impl Into<String>, spec: impl Into<LayerSpec>) -> Self {
        Self {
            name: name.into(),
            spec: spec.into(),
        }
    }
}

/// # Layer Reference
///
/// Reference to a layer by either its name or its (layer, datatype) pair.
/// Names are resolved against the active PDK's [Layers].
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum LayerRef {
    Spec(LayerSpec),
    Name(String),
}
impl From<&str> for LayerRef {
    fn from(s: &str) -> Self {
        Self::Name(s.to_string())
    }
}
impl From<String> for LayerRef {
    fn from(s: String) -> Self {
        Self::Name(s)
    }
}
impl From<LayerSpec> for LayerRef {
    fn from(s: LayerSpec) -> Self {
        Self::Spec(s)
    }
}
impl From<(i16, i16)> for LayerRef {
    fn from(t: (i16, i16)) -> Self {
        Self::Spec(t.into())
    }
}

/// # Layer Set & Manager
///
/// Keep track of named layers, and index them by name and (layer, datatype) pair.
/// Several names may alias the same pair. Names must be unique.
///
#[derive(Debug, Clone, Default)]
pub struct Layers {
    slots: SlotMap<LayerKey, Layer>,
    names: HashMap<String, LayerKey>,
    specs: HashMap<LayerSpec, LayerKey>,
}
impl Layers {
    /// Add a [Layer]. Fails if its name is already taken.
    pub fn add(&mut self, layer: Layer) -> LayoutResult<LayerKey> {
        if self.names.contains_key(&layer.name) {
            return LayoutError::fail(format!("Duplicate layer name `{}`", layer.name));
        }
        let name = layer.name.clone();
        let spec = layer.spec;
        let key = self.slots.insert(layer);
        self.names.insert(name, key);
        // The first name registered for a pair is its canonical name
        self.specs.entry(spec).or_insert(key);
        Ok(key)
    }
    /// Add layers from (name, spec) pairs. Consumes and returns `self` for chainability.
    pub fn with(mut self, pairs: &[(&str, LayerSpec)]) -> LayoutResult<Self> {
        for (name, spec) in pairs {
            self.add(Layer::new(*name, *spec))?;
        }
        Ok(self)
    }
    /// Get the [LayerKey] for layer-name `name`
    pub fn keyname(&self, name: &str) -> Option<LayerKey> {
        self.names.get(name).copied()
    }
    /// Get a reference to [Layer] name `name`
    pub fn name(&self, name: &str) -> Option<&Layer> {
        let key = self.names.get(name)?;
        self.slots.get(*key)
    }
    /// Get the canonical [Layer] for (layer, datatype) pair `spec`
    pub fn spec(&self, spec: LayerSpec) -> Option<&Layer> {
        let key = self.specs.get(&spec)?;
        self.slots.get(*key)
    }
    /// Get a reference to [Layer] from [LayerKey] `key`
    pub fn get(&self, key: LayerKey) -> Option<&Layer> {
        self.slots.get(key)
    }
    /// Resolve a [LayerRef] to its [LayerSpec].
    /// Numeric references are passed through, whether or not they are named in this table.
    pub fn resolve(&self, layer: &LayerRef) -> LayoutResult<LayerSpec> {
        match layer {
            LayerRef::Spec(spec) => Ok(*spec),
            LayerRef::Name(name) => self
                .name(name)
                .map(|l| l.spec)
                .ok_or_else(|| LayoutError::LayerNotFound(name.clone())),
        }
    }
    /// Iterate over all [Layer]s
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.slots.values()
    }
    pub fn len(&self) -> usize {
        self.slots.len()
    }
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

///
/// # Cross-Section
///
/// Named waveguide or wire profile: its layer, core width, and default bend radius.
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrossSection {
    pub name: String,
    pub layer: LayerSpec,
    /// Core width, in database units
    pub width: crate::Int,
    /// Default bend radius, in database units
    pub radius: crate::Int,
}
impl CrossSection {
    /// Create from micron-valued `width` and `radius`
    pub fn new(name: impl Into<String>, layer: impl Into<LayerSpec>, width: f64, radius: f64) -> Self {
        Self {
            name: name.into(),
            layer: layer.into(),
            width: crate::um(width),
            radius: crate::um(radius),
        }
    }
}
