//!
//! # pic21 Raw Layout
//!
//! Layout engine for photonic cells: geometry on an integer nanometer grid,
//! components with named and oriented ports, and the placement, routing, packing,
//! and fill operations which photonic cell libraries are composed from.
//!
//! Cells are built through a [Ctx], which resolves layer and cross-section names
//! against its [Pdk] and memoizes each cell by its parameters.
//!

pub mod align;
pub mod bbox;
pub mod cache;
pub mod component;
pub mod config;
pub mod ctx;
pub mod error;
pub mod fill;
pub mod geom;
pub mod layers;
pub mod library;
pub mod pack;
pub mod padding;
pub mod pdk;
pub mod port;
pub mod prims;
pub mod routing;
pub mod ser;


// Re-exports
pub use align::{AlignRect, Translate};
pub use bbox::{BoundBox, BoundBoxTrait};
pub use cache::{CellCache, CellKey};
pub use component::{Component, Element, Instance, InstanceArray, Label};
pub use config::EngineConfig;
pub use ctx::Ctx;
pub use error::{ErrorHelper, LayoutError, LayoutResult, Unwrapper};
pub use fill::{fill_rectangle, FillOptions};
pub use geom::{
    to_um, um, Angle, Dir, Int, Path, Placement, Point, Polygon, Rect, Shape, ShapeTrait,
    TransformTrait, DBU_PER_UM,
};
pub use layers::{CrossSection, Layer, LayerKey, LayerRef, LayerSpec, Layers};
pub use library::Library;
pub use pack::{grid, pack, GridOptions, PackOptions};
pub use padding::{add_padding_container, PaddingOptions};
pub use pdk::Pdk;
pub use port::{rename_clockwise, Port, PortKind, PortMap};
pub use routing::{route_bundle, route_single, BundleOptions, Route};
pub use ser::{SerdeFile, SerializationFormat};
