//!
//! # Cell Cache
//!
//! Content-addressed memo of built components, keyed by the building function's name
//! and the canonical JSON encoding of its parameters.
//!

// Std-Lib
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

// Local Imports
use crate::component::Component;
use crate::error::LayoutResult;

/// # Cell Cache Key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellKey {
    /// Name of the cell-building function
    pub func: String,
    /// Canonical JSON of its parameters
    pub params: String,
}

/// # Cell Cache
#[derive(Debug, Default)]
pub struct CellCache {
    cells: RwLock<HashMap<CellKey, Arc<Component>>>,
}
impl CellCache {
    pub fn new() -> Self {
        Self::default()
    }
    /// Get the cached component for `key`, if present
    pub fn get(&self, key: &CellKey) -> LayoutResult<Option<Arc<Component>>> {
        let cells = self.cells.read()?;
        Ok(cells.get(key).cloned())
    }
    /// Insert `comp` under `key`.
    /// If another thread got there first, its component wins and is returned.
    pub fn insert(&self, key: CellKey, comp: Arc<Component>) -> LayoutResult<Arc<Component>> {
        let mut cells = self.cells.write()?;
        Ok(Arc::clone(cells.entry(key).or_insert(comp)))
    }
    pub fn len(&self) -> LayoutResult<usize> {
        Ok(self.cells.read()?.len())
    }
    pub fn is_empty(&self) -> LayoutResult<bool> {
        Ok(self.len()? == 0)
    }
    /// Remove all entries
    pub fn clear(&self) -> LayoutResult<()> {
        self.cells.write()?.clear();
        Ok(())
    }
}
