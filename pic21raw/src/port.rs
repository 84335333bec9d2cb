//!
//! # Ports
//!
//! Named attachment points on a [crate::Component], each with a location,
//! a facing [Angle], and the width and layer of whatever connects there.
//!

// Crates.io
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// Local Imports
use crate::error::{LayoutError, LayoutResult};
use crate::geom::{Angle, Int, Placement, Point};
use crate::layers::{CrossSection, LayerSpec};

/// # Port Kinds
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PortKind {
    /// Waveguide port
    #[default]
    Optical,
    /// Metal / wire port
    Electrical,
}
impl PortKind {
    /// Naming prefix for auto-named ports of this kind
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Optical => "o",
            Self::Electrical => "e",
        }
    }
}

/// # Port
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Port {
    pub name: String,
    /// Direction the port faces, i.e. the direction out of its cell
    pub orientation: Angle,
    pub width: Int,
    pub kind: PortKind,
    pub layer: LayerSpec,
    pub center: Point,
}
impl Port {
    /// Create an optical port matching cross-section `xs`
    pub fn optical(
        name: impl Into<String>,
        center: Point,
        orientation: Angle,
        xs: &CrossSection,
    ) -> Self {
        Self {
            name: name.into(),
            orientation,
            width: xs.width,
            kind: PortKind::Optical,
            layer: xs.layer,
            center,
        }
    }
    /// Create an electrical port
    pub fn electrical(
        name: impl Into<String>,
        center: Point,
        orientation: Angle,
        width: Int,
        layer: LayerSpec,
    ) -> Self {
        Self {
            name: name.into(),
            orientation,
            width,
            kind: PortKind::Electrical,
            layer,
            center,
        }
    }
    /// Create a copy transformed by `place`
    pub fn transform(&self, place: &Placement) -> Self {
        Self {
            center: place.apply(&self.center),
            orientation: place.apply_angle(self.orientation),
            ..self.clone()
        }
    }
    /// Create a copy named `name`
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }
    /// Check whether `other` can be joined to us.
    /// Optical ports must agree in width and layer; electrical ports in layer.
    pub fn check_compatible(&self, other: &Port) -> LayoutResult<()> {
        let mismatch = |message: String| {
            Err(LayoutError::PortMismatch {
                port: self.name.clone(),
                other: other.name.clone(),
                message,
            })
        };
        if self.kind != other.kind {
            return mismatch(format!("kinds {:?} and {:?}", self.kind, other.kind));
        }
        if self.layer != other.layer {
            return mismatch(format!("layers {} and {}", self.layer, other.layer));
        }
        if self.kind == PortKind::Optical && self.width != other.width {
            return mismatch(format!("widths {} and {}", self.width, other.width));
        }
        Ok(())
    }
}

///
/// # Port Map
///
/// Insertion-ordered map from port name to [Port].
/// Names are unique: adding a second port of the same name is rejected.
///
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PortMap(IndexMap<String, Port>);

impl PortMap {
    pub fn new() -> Self {
        Self::default()
    }
    /// Add `port`. Returns it back as the error-value if its name is taken.
    pub fn add(&mut self, port: Port) -> Result<(), Port> {
        if self.0.contains_key(&port.name) {
            return Err(port);
        }
        self.0.insert(port.name.clone(), port);
        Ok(())
    }
    pub fn get(&self, name: &str) -> Option<&Port> {
        self.0.get(name)
    }
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &Port> {
        self.0.values()
    }
    pub fn names(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }
    /// Create a new [PortMap], each port transformed by `place`
    pub fn transform(&self, place: &Placement) -> Self {
        Self(
            self.0
                .iter()
                .map(|(k, p)| (k.clone(), p.transform(place)))
                .collect(),
        )
    }
    /// All ports facing `orientation`, in insertion order
    pub fn filter_orientation(&self, orientation: Angle) -> Vec<Port> {
        self.iter()
            .filter(|p| p.orientation == orientation)
            .cloned()
            .collect()
    }
    /// All ports of kind `kind`, in insertion order
    pub fn filter_kind(&self, kind: PortKind) -> Vec<Port> {
        self.iter().filter(|p| p.kind == kind).cloned().collect()
    }
    /// Owned vector of all ports, in insertion order
    pub fn to_vec(&self) -> Vec<Port> {
        self.iter().cloned().collect()
    }
}
impl<'a> IntoIterator for &'a PortMap {
    type Item = &'a Port;
    type IntoIter = indexmap::map::Values<'a, String, Port>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.values()
    }
}

///
/// Name `ports` clockwise, starting from the bottom-left.
///
/// West-facing ports come first, bottom to top, then north-facing left to right,
/// east-facing top to bottom, and finally south-facing right to left.
/// Each is named by its kind's prefix and a one-based index, e.g. `o1`, `o2`, ...
///
pub fn rename_clockwise(mut ports: Vec<Port>) -> Vec<Port> {
    let side = |p: &Port| match p.orientation {
        Angle::R180 => 0,
        Angle::R90 => 1,
        Angle::R0 => 2,
        Angle::R270 => 3,
    };
    let along = |p: &Port| match p.orientation {
        Angle::R180 => p.center.y,
        Angle::R90 => p.center.x,
        Angle::R0 => -p.center.y,
        Angle::R270 => -p.center.x,
    };
    ports.sort_by_key(|p| (p.kind == PortKind::Electrical, side(p), along(p)));
    let (mut nopt, mut nelec) = (0, 0);
    ports
        .into_iter()
        .map(|p| {
            let idx = match p.kind {
                PortKind::Optical => {
                    nopt += 1;
                    nopt
                }
                PortKind::Electrical => {
                    nelec += 1;
                    nelec
                }
            };
            let name = format!("{}{}", p.kind.prefix(), idx);
            p.renamed(name)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xs() -> CrossSection {
        CrossSection::new("strip", (1, 0), 0.5, 10.0)
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut ports = PortMap::new();
        let p = Port::optical("o1", Point::zero(), Angle::R180, &xs());
        assert!(ports.add(p.clone()).is_ok());
        assert_eq!(ports.add(p), Err(Port::optical("o1", Point::zero(), Angle::R180, &xs())));
        assert_eq!(ports.len(), 1);
    }
    #[test]
    fn test_rename_clockwise() {
        let xs = xs();
        let ports = vec![
            Port::optical("a", Point::new(10, -1), Angle::R0, &xs),
            Port::optical("b", Point::new(0, 1), Angle::R180, &xs),
            Port::optical("c", Point::new(10, 1), Angle::R0, &xs),
            Port::optical("d", Point::new(0, -1), Angle::R180, &xs),
        ];
        let ports = rename_clockwise(ports);
        let named: Vec<(String, Point)> = ports.iter().map(|p| (p.name.clone(), p.center)).collect();
        assert_eq!(
            named,
            vec![
                ("o1".to_string(), Point::new(0, -1)),
                ("o2".to_string(), Point::new(0, 1)),
                ("o3".to_string(), Point::new(10, 1)),
                ("o4".to_string(), Point::new(10, -1)),
            ]
        );
    }
    #[test]
    fn test_compatibility() {
        let a = Port::optical("a", Point::zero(), Angle::R0, &xs());
        let b = Port::optical("b", Point::zero(), Angle::R180, &CrossSection::new("wide", (1, 0), 1.0, 10.0));
        assert!(a.check_compatible(&a.clone()).is_ok());
        assert!(a.check_compatible(&b).is_err());
    }
}
