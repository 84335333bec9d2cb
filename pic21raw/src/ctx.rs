//!
//! # Build Context
//!
//! Every cell is built through a [Ctx], which carries the [EngineConfig],
//! the active [Pdk], and the [CellCache] memoizing everything built so far.
//!

// Std-Lib
use std::sync::Arc;

// Crates.io
use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

// Local Imports
use crate::cache::{CellCache, CellKey};
use crate::component::Component;
use crate::config::EngineConfig;
use crate::error::LayoutResult;
use crate::layers::{CrossSection, LayerRef, LayerSpec};
use crate::pdk::Pdk;

/// # Build Context
#[derive(Debug)]
pub struct Ctx {
    config: EngineConfig,
    pdk: Pdk,
    cache: CellCache,
}
impl Ctx {
    /// Create a new [Ctx]. Fails if `config` is invalid.
    pub fn new(config: EngineConfig, pdk: Pdk) -> LayoutResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            pdk,
            cache: CellCache::new(),
        })
    }
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
    pub fn pdk(&self) -> &Pdk {
        &self.pdk
    }
    pub fn cache(&self) -> &CellCache {
        &self.cache
    }
    /// Resolve a [LayerRef] against the active PDK
    pub fn layer(&self, layer: &LayerRef) -> LayoutResult<LayerSpec> {
        self.pdk.layer(layer)
    }
    /// Get cross-section `name` from the active PDK
    pub fn cross_section(&self, name: &str) -> LayoutResult<&CrossSection> {
        self.pdk.cross_section(name)
    }
    ///
    /// Build, or retrieve from cache, the cell produced by function `func` with `params`.
    ///
    /// On a cache miss, a new [Component] is named from `func` and whichever `params`
    /// differ from their defaults, handed to `build` to populate, then frozen and cached.
    /// The component's `settings` are set to `params`.
    ///
    pub fn cell<P, F>(&self, func: &str, params: &P, build: F) -> LayoutResult<Arc<Component>>
    where
        P: Serialize + Default,
        F: FnOnce(&Ctx, &mut Component) -> LayoutResult<()>,
    {
        let json = serde_json::to_value(params)?;
        let key = CellKey {
            func: func.to_string(),
            params: serde_json::to_string(&json)?,
        };
        if self.config.cache_enabled {
            if let Some(comp) = self.cache.get(&key)? {
                debug!("Cache hit for `{}`", comp.name);
                return Ok(comp);
            }
        }
        let defaults = serde_json::to_value(P::default())?;
        let name = cell_name(func, &json, &defaults, self.config.max_cellname_length);
        debug!("Building cell `{}`", name);

        let mut comp = Component::new(name);
        build(self, &mut comp)?;
        if let Value::Object(settings) = json {
            comp.settings = settings;
        }
        let comp = Arc::new(comp);
        if self.config.cache_enabled {
            return self.cache.insert(key, comp);
        }
        Ok(comp)
    }
}

///
/// Create a cell name from function-name `func` and its parameters.
///
/// Default-valued parameters are omitted; each other parameter appends `_{key}{value}`.
/// Floats are written with at most three decimals, and the result is restricted to
/// identifier characters: `.` becomes `p`, `-` becomes `m`, and all others `_`.
/// Names longer than `max_len` are truncated and suffixed with a hash of the full name.
///
pub fn cell_name(func: &str, params: &Value, defaults: &Value, max_len: usize) -> String {
    let mut name = func.to_string();
    if let (Value::Object(params), Value::Object(defaults)) = (params, defaults) {
        for (key, val) in params {
            if defaults.get(key) != Some(val) {
                name.push('_');
                name.push_str(key);
                name.push_str(&value_string(val));
            }
        }
    }
    truncate_name(clean_name(&name), max_len)
}

/// Short string form of a parameter value
fn value_string(val: &Value) -> String {
    match val {
        Value::Null => "None".into(),
        Value::Bool(true) => "True".into(),
        Value::Bool(false) => "False".into(),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) => float_string(f),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(value_string)
            .collect::<Vec<_>>()
            .join("_"),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{}{}", k, value_string(v)))
            .collect::<Vec<_>>()
            .join("_"),
    }
}

/// Float with at most three decimals, trailing zeros trimmed
fn float_string(f: f64) -> String {
    let s = format!("{:.3}", f);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" => "0".into(),
        s => s.into(),
    }
}

fn clean_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            c if c.is_ascii_alphanumeric() || c == '_' => c,
            '.' => 'p',
            '-' => 'm',
            _ => '_',
        })
        .collect()
}

/// Truncate `name` to `max_len`, keeping a `_` and eight hex digits of its SHA-256
fn truncate_name(name: String, max_len: usize) -> String {
    if name.len() <= max_len {
        return name;
    }
    let digest = Sha256::digest(name.as_bytes());
    let hash: String = digest.iter().take(4).map(|b| format!("{:02x}", b)).collect();
    let keep = max_len.saturating_sub(hash.len() + 1);
    let short = format!("{}_{}", &name[..keep], hash);
    warn!("Cell name `{}` exceeds {} characters, truncated to `{}`", name, max_len, short);
    short
}
