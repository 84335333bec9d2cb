//!
//! # Paths
//!

// Std-Lib
use std::path::PathBuf;

// Workspace Imports
use pic21raw::{LayoutError, LayoutResult};

/// # Well-Known Paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// User's home directory, if it can be determined
    pub home: Option<PathBuf>,
    /// Current working directory
    pub cwd: PathBuf,
    /// This crate's source directory
    pub module: PathBuf,
    /// Root of the repository holding this crate
    pub repo: PathBuf,
}
impl Paths {
    /// Collect the current [Paths]
    pub fn new() -> LayoutResult<Self> {
        let home = std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(PathBuf::from);
        let cwd = std::env::current_dir().map_err(|e| LayoutError::Boxed(Box::new(e)))?;
        let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let repo = match manifest.parent() {
            Some(p) => p.to_path_buf(),
            None => manifest.clone(),
        };
        Ok(Self {
            home,
            cwd,
            module: manifest.join("src"),
            repo,
        })
    }
}
