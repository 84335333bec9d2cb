//!
//! # Components & Instances
//!
//! A [Component] is a layout cell: geometric [Element]s, [Label]s,
//! [Instance]s and [InstanceArray]s of other components, and a set of named [Port]s.
//! Components are built mutably, then frozen in an [Arc] and shared.
//!

// Std-Lib
use std::collections::HashSet;
use std::sync::Arc;

// Crates.io
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Local Imports
use crate::align::Translate;
use crate::bbox::{BoundBox, BoundBoxTrait};
use crate::error::{ErrorHelper, LayoutError, LayoutResult, Unwrapper};
use crate::geom::{Angle, Int, Path, Placement, Point, Polygon, Rect, Shape, TransformTrait};
use crate::layers::LayerSpec;
use crate::port::{Port, PortMap};

/// # Primitive Geometric Element
///
/// Combines a geometric [Shape] with the (layer, datatype) pair it sits on.
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Element {
    /// Layer
    pub layer: LayerSpec,
    /// Shape
    pub inner: Shape,
}

/// # Text Label
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Label {
    /// String Value
    pub string: String,
    /// Layer
    pub layer: LayerSpec,
    /// Location
    pub loc: Point,
}

/// Instance of another [Component]
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    /// Instance Name
    pub name: String,
    /// Component Definition
    pub cell: Arc<Component>,
    /// Location, rotation, and reflection
    pub place: Placement,
}
impl Instance {
    /// Create a new [Instance] of `cell`, at the origin
    pub fn new(name: impl Into<String>, cell: &Arc<Component>) -> Self {
        Self {
            name: name.into(),
            cell: Arc::clone(cell),
            place: Placement::identity(),
        }
    }
    /// Set our [Placement]. Consumes and returns `self` for chainability.
    pub fn at(mut self, place: Placement) -> Self {
        self.place = place;
        self
    }
    /// Get port `name`, in our parent's coordinates
    pub fn port(&self, name: &str) -> LayoutResult<Port> {
        match self.cell.ports.get(name) {
            Some(p) => Ok(p.transform(&self.place)),
            None => Err(LayoutError::PortNotFound {
                cell: format!("{} ({})", self.name, self.cell.name),
                port: name.into(),
            }),
        }
    }
    /// All of our ports, in our parent's coordinates
    pub fn ports(&self) -> PortMap {
        self.cell.ports.transform(&self.place)
    }
    ///
    /// Compute the [Placement] which connects our port `port` to `other`.
    ///
    /// The two ports are made coincident and facing one another.
    /// Our reflection is retained, and our current placement is otherwise disregarded.
    /// Fails if `port` does not exist, or if the two ports are incompatible.
    ///
    pub fn connecting(&self, port: &str, other: &Port) -> LayoutResult<Placement> {
        let local = match self.cell.ports.get(port) {
            Some(p) => p,
            None => {
                return Err(LayoutError::PortNotFound {
                    cell: format!("{} ({})", self.name, self.cell.name),
                    port: port.into(),
                })
            }
        };
        local.check_compatible(other)?;
        Ok(Placement::landing(
            &local.center,
            local.orientation,
            self.place.reflect_vert,
            &other.center,
            other.orientation.opposite(),
        ))
    }
    /// Create a copy of this [Instance], moved so its port `port` connects to `other`
    pub fn connected(&self, port: &str, other: &Port) -> LayoutResult<Self> {
        let place = self.connecting(port, other)?;
        Ok(self.clone().at(place))
    }
    /// Rotate counter-clockwise by `angle` about our origin
    pub fn rotate(&mut self, angle: Angle) -> &mut Self {
        self.place.angle = self.place.angle + angle;
        self
    }
    /// Reflect about the x-axis through our origin
    pub fn mirror_vert(&mut self) -> &mut Self {
        self.place.reflect_vert = !self.place.reflect_vert;
        self.place.angle = self.place.angle.reflect_vert();
        self
    }
}
impl BoundBoxTrait for Instance {
    fn bbox(&self) -> BoundBox {
        let b = self.cell.bbox();
        if b.is_empty() {
            return b;
        }
        b.to_rect().transform(&self.place).bbox()
    }
}
impl Translate for Instance {
    fn translate(&mut self, v: Point) {
        self.place.loc += v;
    }
}

///
/// # Instance Array
///
/// A `cols` by `rows` rectangular array of un-rotated copies of `cell`,
/// the first at `loc` and the rest spaced by `pitch`.
///
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceArray {
    /// Array Name
    pub name: String,
    /// Component Definition
    pub cell: Arc<Component>,
    /// Location of the first copy
    pub loc: Point,
    pub cols: usize,
    pub rows: usize,
    /// Spacing between copies, in (x, y)
    pub pitch: Point,
}
impl InstanceArray {
    /// Number of copies
    pub fn len(&self) -> usize {
        self.cols * self.rows
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Iterate over the location of every copy
    pub fn locs(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.rows).flat_map(move |r| {
            (0..self.cols).map(move |c| {
                Point::new(
                    self.loc.x + c as Int * self.pitch.x,
                    self.loc.y + r as Int * self.pitch.y,
                )
            })
        })
    }
}
impl BoundBoxTrait for InstanceArray {
    fn bbox(&self) -> BoundBox {
        let b = self.cell.bbox();
        if b.is_empty() || self.is_empty() {
            return BoundBox::empty();
        }
        let last = Point::new(
            (self.cols as Int - 1) * self.pitch.x,
            (self.rows as Int - 1) * self.pitch.y,
        );
        let first = b.to_rect().transform(&Placement::at(self.loc)).bbox();
        let final_ = b.to_rect().transform(&Placement::at(self.loc + last)).bbox();
        first.union(&final_)
    }
}

///
/// # Component
///
/// The primary layout-cell. See the module docs.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Component {
    /// Component Name
    pub name: String,
    /// Instances
    pub insts: Vec<Instance>,
    /// Instance Arrays
    pub arrays: Vec<InstanceArray>,
    /// Primitive / Geometric Elements
    pub elems: Vec<Element>,
    /// Text Labels
    pub labels: Vec<Label>,
    /// Ports
    pub ports: PortMap,
    /// Parameters this component was built with
    pub settings: Map<String, Value>,
    /// Derived data, e.g. `length`
    pub info: Map<String, Value>,
    /// Classification tags
    pub tags: Vec<String>,
}
impl Component {
    /// Create a new and empty [Component] named `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
    /// Add an [Instance]. Fails if its name is already taken.
    pub fn add_inst(&mut self, inst: Instance) -> LayoutResult<()> {
        if self.has_inst_name(&inst.name) {
            return Err(LayoutError::DuplicateInstance {
                cell: self.name.clone(),
                inst: inst.name,
            });
        }
        self.insts.push(inst);
        Ok(())
    }
    /// Add an [InstanceArray]. Fails if its name is already taken.
    pub fn add_array(&mut self, arr: InstanceArray) -> LayoutResult<()> {
        if self.has_inst_name(&arr.name) {
            return Err(LayoutError::DuplicateInstance {
                cell: self.name.clone(),
                inst: arr.name,
            });
        }
        self.arrays.push(arr);
        Ok(())
    }
    fn has_inst_name(&self, name: &str) -> bool {
        self.insts.iter().any(|i| i.name == name) || self.arrays.iter().any(|a| a.name == name)
    }
    /// Create an instance-name from `base` not yet used in this [Component].
    /// Returns `base` itself if free, or `base_1`, `base_2`, etc.
    pub fn unique_inst_name(&self, base: &str) -> String {
        let taken: HashSet<&str> = self
            .insts
            .iter()
            .map(|i| i.name.as_str())
            .chain(self.arrays.iter().map(|a| a.name.as_str()))
            .collect();
        if !taken.contains(base) {
            return base.to_string();
        }
        (1..)
            .map(|n| format!("{}_{}", base, n))
            .find(|s| !taken.contains(s.as_str()))
            .unwrap_or_else(|| base.to_string())
    }
    /// Get a reference to instance `name`
    pub fn inst(&self, name: &str) -> LayoutResult<&Instance> {
        self.insts
            .iter()
            .find(|i| i.name == name)
            .unwrapper(self, format!("No instance named `{}`", name))
    }
    /// Add a geometric [Shape] on `layer`
    pub fn add_shape(&mut self, layer: LayerSpec, inner: impl Into<Shape>) {
        self.elems.push(Element {
            layer,
            inner: inner.into(),
        });
    }
    /// Add a [Rect] on `layer`
    pub fn add_rect(&mut self, layer: LayerSpec, rect: Rect) {
        self.add_shape(layer, rect);
    }
    /// Add a [Polygon] on `layer`
    pub fn add_polygon(&mut self, layer: LayerSpec, points: Vec<Point>) {
        self.add_shape(layer, Polygon { points });
    }
    /// Add a [Path] on `layer`
    pub fn add_path(&mut self, layer: LayerSpec, width: Int, points: Vec<Point>) {
        self.add_shape(layer, Path { width, points });
    }
    /// Add a text [Label]
    pub fn add_label(&mut self, layer: LayerSpec, string: impl Into<String>, loc: Point) {
        self.labels.push(Label {
            string: string.into(),
            loc,
            layer,
        });
    }
    /// Add a [Port]. Fails if its name is already taken.
    pub fn add_port(&mut self, port: Port) -> LayoutResult<()> {
        let cell = self.name.clone();
        self.ports.add(port).map_err(|p| LayoutError::DuplicatePort {
            cell,
            port: p.name,
        })
    }
    /// Add each of `ports`. Fails on the first name collision.
    pub fn add_ports(&mut self, ports: impl IntoIterator<Item = Port>) -> LayoutResult<()> {
        for port in ports {
            self.add_port(port)?;
        }
        Ok(())
    }
    /// Get a reference to port `name`
    pub fn port(&self, name: &str) -> LayoutResult<&Port> {
        self.ports.get(name).ok_or_else(|| LayoutError::PortNotFound {
            cell: self.name.clone(),
            port: name.into(),
        })
    }
    /// Set an `info` entry
    pub fn set_info(&mut self, key: impl Into<String>, val: impl Into<Value>) {
        self.info.insert(key.into(), val.into());
    }
    /// Get the numeric value of `info` entry `key`, if present
    pub fn info_f64(&self, key: &str) -> Option<f64> {
        self.info.get(key).and_then(Value::as_f64)
    }
    ///
    /// Copy the contents of `other` into this [Component]:
    /// its instances, arrays, elements, labels, ports, and `info`.
    /// Our name, `settings`, and `tags` are retained.
    /// Fails on any instance or port name collision.
    ///
    pub fn absorb(&mut self, other: &Component) -> LayoutResult<()> {
        for inst in other.insts.iter() {
            self.add_inst(inst.clone())?;
        }
        for arr in other.arrays.iter() {
            self.add_array(arr.clone())?;
        }
        self.elems.extend(other.elems.iter().cloned());
        self.labels.extend(other.labels.iter().cloned());
        self.add_ports(other.ports.iter().cloned())?;
        for (key, val) in other.info.iter() {
            self.info.insert(key.clone(), val.clone());
        }
        Ok(())
    }
    /// Create a rectangular [BoundBox] surrounding all elements and instances.
    /// Labels are not included.
    pub fn bbox(&self) -> BoundBox {
        let mut bbox = BoundBox::empty();
        for elem in &self.elems {
            bbox = elem.inner.union(&bbox);
        }
        for inst in &self.insts {
            bbox = inst.union(&bbox);
        }
        for arr in &self.arrays {
            bbox = arr.union(&bbox);
        }
        bbox
    }
    /// Flatten to a vector of [Element]s, in our coordinates
    pub fn flatten(&self) -> Vec<Element> {
        let mut elems = Vec::new();
        flatten_helper(self, &Placement::identity(), &mut elems);
        elems
    }
    /// Number of elements after flattening, without building them
    pub fn flat_len(&self) -> usize {
        self.elems.len()
            + self.insts.iter().map(|i| i.cell.flat_len()).sum::<usize>()
            + self
                .arrays
                .iter()
                .map(|a| a.len() * a.cell.flat_len())
                .sum::<usize>()
    }
}
impl ErrorHelper for Component {
    type Error = LayoutError;
    fn err(&self, msg: impl Into<String>) -> LayoutError {
        LayoutError::Str(format!("Component `{}`: {}", self.name, msg.into()))
    }
}

/// Internal helper and core logic for [Component::flatten].
fn flatten_helper(comp: &Component, place: &Placement, elems: &mut Vec<Element>) {
    for elem in comp.elems.iter() {
        elems.push(Element {
            layer: elem.layer,
            inner: elem.inner.transform(place),
        });
    }
    for inst in &comp.insts {
        let place = Placement::cascade(place, &inst.place);
        flatten_helper(&inst.cell, &place, elems);
    }
    for arr in &comp.arrays {
        for loc in arr.locs() {
            let place = Placement::cascade(place, &Placement::at(loc));
            flatten_helper(&arr.cell, &place, elems);
        }
    }
}
