//!
//! # si220
//!
//! 220nm silicon-on-insulator process.
//! Cells for the C-band live in [cband].
//!

// Crates.io
use log::debug;

// Workspace Imports
use pic21raw::{CrossSection, LayerSpec, Layers, LayoutResult, Pdk};

pub mod cband;

/// # Layer Map
#[allow(non_snake_case)]
pub mod LAYER {
    use pic21raw::LayerSpec;

    pub const WG: LayerSpec = LayerSpec(1, 0);
    pub const SHALLOW_ETCH: LayerSpec = LayerSpec(2, 6);
    pub const SLAB: LayerSpec = LayerSpec(3, 0);
    pub const DEEP_ETCH: LayerSpec = LayerSpec(3, 6);
    pub const GRA: LayerSpec = LayerSpec(6, 0);
    pub const HEATER: LayerSpec = LayerSpec(39, 0);
    pub const PAD: LayerSpec = LayerSpec(41, 0);
    pub const ROUTER: LayerSpec = LayerSpec(45, 0);
    pub const TEXT: LayerSpec = LayerSpec(66, 0);
    pub const FLOORPLAN: LayerSpec = LayerSpec(99, 0);
    pub const LBL: LayerSpec = LayerSpec(100, 0);
    pub const WAFER: LayerSpec = LayerSpec(999, 0);
}

/// Name and spec of every layer in [LAYER]
const LAYERS: [(&str, LayerSpec); 12] = [
    ("WG", LAYER::WG),
    ("SHALLOW_ETCH", LAYER::SHALLOW_ETCH),
    ("SLAB", LAYER::SLAB),
    ("DEEP_ETCH", LAYER::DEEP_ETCH),
    ("GRA", LAYER::GRA),
    ("HEATER", LAYER::HEATER),
    ("PAD", LAYER::PAD),
    ("ROUTER", LAYER::ROUTER),
    ("TEXT", LAYER::TEXT),
    ("FLOORPLAN", LAYER::FLOORPLAN),
    ("LBL", LAYER::LBL),
    ("WAFER", LAYER::WAFER),
];

///
/// Create the si220 C-band [Pdk].
///
/// Cross-sections:
/// * `strip`: 0.45um fully-etched waveguide, 10um bends
/// * `rib`: 0.45um shallow-etched waveguide, 10um bends
/// * `heater_metal`: 4um heater wire
/// * `metal_routing`: 10um routing metal
///
pub fn pdk() -> LayoutResult<Pdk> {
    let layers = Layers::default().with(&LAYERS)?;
    let mut pdk = Pdk::new("si220_cband", layers);
    pdk.add_cross_section(CrossSection::new("strip", LAYER::WG, 0.45, 10.0))?;
    pdk.add_cross_section(CrossSection::new("rib", LAYER::WG, 0.45, 10.0))?;
    pdk.add_cross_section(CrossSection::new("heater_metal", LAYER::HEATER, 4.0, 10.0))?;
    pdk.add_cross_section(CrossSection::new("metal_routing", LAYER::ROUTER, 10.0, 10.0))?;
    debug!(
        "Loaded PDK `{}`: {} layers, {} cross-sections",
        pdk.name,
        pdk.layers.len(),
        pdk.cross_sections.len()
    );
    Ok(pdk)
}
