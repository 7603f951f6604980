//! # wkt-map-viewer
//!
//! Core of an embeddable map widget that renders Well-Known Text geometries
//! on top of a tile base layer.
//!
//! The crate owns everything behind the host component: the map instance and
//! its lifecycle, the WKT codec with reprojection between EPSG:4326 and
//! EPSG:3857, the overlay feature store, style resolution, fit-to-extent view
//! animation and an interactive point/line/polygon drawing session that hands
//! the drawn shape back as WKT. Rendering and tile fetching are left to the
//! embedding surface; the core only resolves tile URLs and paint styles.

pub mod animation;
pub mod core;
pub mod data;
pub mod input;
pub mod layers;
pub mod plugins;
pub mod prelude;
pub mod service;
pub mod ui;
pub mod viewer;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    bounds::Bounds,
    config::{MapConfig, Padding, StyleConfig, ViewOptions},
    geo::{LatLng, Point, TileCoord},
    map::{Container, Map},
    projection::Projection,
    viewport::Viewport,
};

pub use data::wkt::{GeometryCodec, WktFeature};

pub use layers::{
    style::{GeometryKind, PaintStyle},
    tile::{TileLayer, TileSource},
    vector::{RenderedFeature, VectorLayer},
};

pub use input::events::{InputEvent, KeyCode};

pub use plugins::draw::{DrawTool, DrawingSession, MapDrawEvent};

pub use service::MapService;

pub use viewer::{GeometryInput, MapMode, MapViewer, ViewerInputs};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Initialization error: {0}")]
    Init(String),

    #[error("Extent is empty")]
    EmptyExtent,

    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

/// Error type alias for convenience
pub type Error = MapError;
