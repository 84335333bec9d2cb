//!
//! # Cell Catalog
//!
//! Registry of every cell in this crate, by name.
//! Cells are built from JSON parameter maps, which are checked against
//! each cell's parameter struct. Omitted parameters take their defaults.
//!

// Std-Lib
use std::sync::Arc;

// Crates.io
use indexmap::IndexMap;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

// Workspace Imports
use pic21raw::{Component, Ctx, LayoutError, LayoutResult};

// Local Imports
use crate::{bends, drc, fill, mzi, route, samples, spiral};

/// Type-erased cell builder, from JSON parameters
type Builder = Box<dyn Fn(&Ctx, Value) -> LayoutResult<Arc<Component>>>;

/// # Catalog Entry
pub struct CellEntry {
    pub name: String,
    pub tags: Vec<String>,
    /// Default parameters
    pub defaults: Value,
    build: Builder,
}
impl std::fmt::Debug for CellEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellEntry")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .field("defaults", &self.defaults)
            .finish()
    }
}

/// # Cell Catalog
#[derive(Debug)]
pub struct Catalog {
    entries: IndexMap<String, CellEntry>,
}
impl Catalog {
    /// Create the [Catalog] of all cells
    pub fn new() -> LayoutResult<Self> {
        let mut cat = Self {
            entries: IndexMap::new(),
        };
        cat.add_fixed("bend_euler", &[], bends::bend_euler)?;
        cat.add_fixed("bend_metal", &[], bends::bend_metal)?;
        cat.add("mzi_heater_python", &[], mzi::mzi_heater_python)?;
        cat.add("width_min", &[], drc::width_min)?;
        cat.add_fixed("area_min", &[], drc::area_min)?;
        cat.add("gap_min", &[], drc::gap_min)?;
        cat.add("separation", &[], drc::separation)?;
        cat.add("enclosing", &[], drc::enclosing)?;
        cat.add_fixed("sample_drc_errors", &[], drc::sample_drc_errors)?;
        cat.add_fixed("sample_fill", &[], fill::sample_fill)?;
        cat.add_fixed("sample_route_python", &[], route::sample_route_python)?;
        cat.add_fixed("sample3_grid", &[], samples::sample3_grid)?;
        cat.add("spiral_delay", &["spirals"], spiral::spiral_delay)?;
        Ok(cat)
    }
    /// Register a cell with parameter struct `P`
    fn add<P>(
        &mut self,
        name: &str,
        tags: &[&str],
        func: fn(&Ctx, &P) -> LayoutResult<Arc<Component>>,
    ) -> LayoutResult<()>
    where
        P: Serialize + DeserializeOwned + Default + 'static,
    {
        let defaults = serde_json::to_value(P::default())?;
        let build = move |ctx: &Ctx, params: Value| {
            let params: P = serde_json::from_value(params)
                .map_err(|e| LayoutError::InvalidParam(e.to_string()))?;
            func(ctx, &params)
        };
        self.insert(name, tags, defaults, Box::new(build))
    }
    /// Register a cell without parameters
    fn add_fixed(
        &mut self,
        name: &str,
        tags: &[&str],
        func: fn(&Ctx) -> LayoutResult<Arc<Component>>,
    ) -> LayoutResult<()> {
        let cell = name.to_string();
        let build = move |ctx: &Ctx, params: Value| match params {
            Value::Object(map) if !map.is_empty() => LayoutError::invalid(format!(
                "Cell `{}` takes no parameters, got {}",
                cell,
                Value::Object(map)
            )),
            _ => func(ctx),
        };
        self.insert(name, tags, Value::Object(Map::new()), Box::new(build))
    }
    fn insert(
        &mut self,
        name: &str,
        tags: &[&str],
        defaults: Value,
        build: Builder,
    ) -> LayoutResult<()> {
        if self.entries.contains_key(name) {
            return LayoutError::fail(format!("Duplicate catalog entry `{}`", name));
        }
        let entry = CellEntry {
            name: name.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            defaults,
            build,
        };
        self.entries.insert(name.into(), entry);
        Ok(())
    }
    /// Names of all cells, in registration order
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(|k| k.as_str()).collect()
    }
    /// Get entry `name`
    pub fn get(&self, name: &str) -> LayoutResult<&CellEntry> {
        self.entries
            .get(name)
            .ok_or_else(|| LayoutError::CellNotFound(name.into()))
    }
    /// Names of all cells tagged `tag`
    pub fn tagged(&self, tag: &str) -> Vec<&str> {
        self.entries
            .values()
            .filter(|e| e.tags.iter().any(|t| t == tag))
            .map(|e| e.name.as_str())
            .collect()
    }
    /// Default parameters of cell `name`
    pub fn default_params(&self, name: &str) -> LayoutResult<Value> {
        Ok(self.get(name)?.defaults.clone())
    }
    ///
    /// Build cell `name` with JSON parameters `params`.
    /// `null` is equivalent to an empty map, i.e. all defaults.
    ///
    pub fn build(&self, ctx: &Ctx, name: &str, params: Value) -> LayoutResult<Arc<Component>> {
        let entry = self.get(name)?;
        let params = match params {
            Value::Null => Value::Object(Map::new()),
            Value::Object(map) => Value::Object(map),
            other => {
                return LayoutError::invalid(format!(
                    "Parameters for `{}` must be a map, got {}",
                    name, other
                ))
            }
        };
        debug!("Building `{}` from the catalog with {}", name, params);
        (entry.build)(ctx, params)
    }
}
