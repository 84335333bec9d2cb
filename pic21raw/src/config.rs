//!
//! # Engine Configuration
//!

// Crates.io
use serde::{Deserialize, Serialize};

// Local Imports
use crate::error::{LayoutError, LayoutResult};
use crate::ser::SerdeFile;

/// Shortest permissible cell-name limit.
/// Truncated names keep a `_` and eight hex digits of hash, plus at least a few leading characters.
pub const MIN_CELLNAME_LENGTH: usize = 16;

///
/// # Engine Configuration
///
/// Passed to [crate::Ctx::new] once, and fixed for that context's lifetime.
/// Loadable from JSON, YAML, or TOML through [SerdeFile].
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Longest cell name. Longer names are truncated and hashed.
    pub max_cellname_length: usize,
    /// Whether to memoize cell-construction
    pub cache_enabled: bool,
}
impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_cellname_length: 99,
            cache_enabled: true,
        }
    }
}
impl EngineConfig {
    /// Check for valid settings
    pub fn validate(&self) -> LayoutResult<()> {
        if self.max_cellname_length < MIN_CELLNAME_LENGTH {
            return LayoutError::invalid(format!(
                "max_cellname_length {} is below the minimum of {}",
                self.max_cellname_length, MIN_CELLNAME_LENGTH
            ));
        }
        Ok(())
    }
}
impl SerdeFile for EngineConfig {}
