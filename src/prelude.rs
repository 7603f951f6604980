//! Prelude module for common wkt-map-viewer types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use wkt_map_viewer::prelude::*;`

pub use crate::core::{
    bounds::Bounds,
    config::{MapConfig, Padding, StyleConfig, ViewOptions},
    geo::{LatLng, Point, TileCoord},
    map::{Container, Map},
    projection::Projection,
    viewport::Viewport,
};

pub use crate::data::wkt::{GeometryCodec, WktFeature};

pub use crate::layers::{
    base::LayerTrait,
    style::{GeometryKind, PaintStyle},
    tile::{TileLayer, TileSource},
    vector::{RenderedFeature, VectorLayer},
};

pub use crate::plugins::draw::{
    sanitize_edit_tools, DrawEvent, DrawInteraction, DrawTool, DrawingSession, MapDrawEvent,
};

pub use crate::input::{
    events::{EventHandled, InputEvent, KeyCode, KeyModifiers},
    handler::{EventKind, EventManager, ListenerKey},
};

pub use crate::animation::ViewAnimation;

pub use crate::ui::Attribution;

pub use crate::service::MapService;

pub use crate::viewer::{GeometryInput, MapMode, MapViewer, ViewerInputs};

pub use crate::{Error as MapError, Result};

pub use instant::Instant;
pub use std::time::Duration;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
