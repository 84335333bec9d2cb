//!
//! # Libraries
//!
//! Flat, serializable form of a component hierarchy.
//! Each distinct component appears once, after every component it instantiates,
//! and instances refer to their definitions by name.
//!

// Std-Lib
use std::collections::HashMap;
use std::sync::Arc;

// Crates.io
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Local Imports
use crate::component::{Component, Element, Label};
use crate::error::{LayoutError, LayoutResult};
use crate::geom::{Placement, Point};
use crate::port::Port;
use crate::ser::SerdeFile;

/// # Instance Reference, by cell name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstanceRef {
    pub name: String,
    pub cell: String,
    pub place: Placement,
}

/// # Instance Array Reference, by cell name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArrayRef {
    pub name: String,
    pub cell: String,
    pub cols: usize,
    pub rows: usize,
    pub loc: Point,
    pub pitch: Point,
}

/// # Serializable Cell Definition
// Empty collections are omitted. TOML cannot write an empty array after a table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CellDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub insts: Vec<InstanceRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arrays: Vec<ArrayRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub elems: Vec<Element>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<Port>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub settings: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub info: Map<String, Value>,
}
impl From<&Component> for CellDef {
    fn from(comp: &Component) -> Self {
        Self {
            name: comp.name.clone(),
            tags: comp.tags.clone(),
            insts: comp
                .insts
                .iter()
                .map(|i| InstanceRef {
                    name: i.name.clone(),
                    cell: i.cell.name.clone(),
                    place: i.place,
                })
                .collect(),
            arrays: comp
                .arrays
                .iter()
                .map(|a| ArrayRef {
                    name: a.name.clone(),
                    cell: a.cell.name.clone(),
                    cols: a.cols,
                    rows: a.rows,
                    loc: a.loc,
                    pitch: a.pitch,
                })
                .collect(),
            elems: comp.elems.clone(),
            labels: comp.labels.clone(),
            ports: comp.ports.to_vec(),
            settings: comp.settings.clone(),
            info: comp.info.clone(),
        }
    }
}

/// # Library
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Library {
    pub name: String,
    /// Name of the top-level cell
    pub top: String,
    /// Cell definitions, in dependency order
    pub cells: Vec<CellDef>,
}
impl Library {
    ///
    /// Collect `top` and everything below it.
    ///
    /// Fails if two different components share a name,
    /// since the flat form could not tell them apart.
    ///
    pub fn from_top(name: impl Into<String>, top: &Arc<Component>) -> LayoutResult<Self> {
        let mut order = DepOrder::default();
        order.push(top)?;
        Ok(Self {
            name: name.into(),
            top: top.name.clone(),
            cells: order.stack.iter().map(|c| CellDef::from(c.as_ref())).collect(),
        })
    }
    /// Get cell-definition `name`
    pub fn cell(&self, name: &str) -> Option<&CellDef> {
        self.cells.iter().find(|c| c.name == name)
    }
}
impl SerdeFile for Library {}

/// # Dependency-Orderer
#[derive(Debug, Default)]
struct DepOrder {
    stack: Vec<Arc<Component>>,
    seen: HashMap<String, Arc<Component>>,
}
impl DepOrder {
    fn push(&mut self, comp: &Arc<Component>) -> LayoutResult<()> {
        // If the component hasn't already been visited, depth-first search it
        if let Some(prev) = self.seen.get(&comp.name) {
            if Arc::ptr_eq(prev, comp) || **prev == **comp {
                return Ok(());
            }
            return LayoutError::fail(format!(
                "Conflicting definitions of cell `{}`",
                comp.name
            ));
        }
        for inst in comp.insts.iter() {
            self.push(&inst.cell)?;
        }
        for arr in comp.arrays.iter() {
            self.push(&arr.cell)?;
        }
        self.seen.insert(comp.name.clone(), Arc::clone(comp));
        self.stack.push(Arc::clone(comp));
        Ok(())
    }
}
