//! Well-Known Text codec with reprojection
//!
//! Text is read in the data projection (EPSG:4326 unless overridden) and
//! produces geometries in the feature projection used for rendering
//! (EPSG:3857 unless overridden). Writing goes the other way.

use crate::{
    core::{bounds::Bounds, projection::Projection},
    MapError, Result,
};
use geo::{BoundingRect, CoordsIter};
use geo_types::Geometry;
use serde::{Deserialize, Serialize};
use wkt::{ToWkt, TryFromWkt};

/// A render request: WKT text plus the references it is read in and projected to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WktFeature {
    pub wkt: String,
    pub data_projection: Projection,
    pub feature_projection: Projection,
}

impl WktFeature {
    pub fn new(wkt: impl Into<String>) -> Self {
        Self {
            wkt: wkt.into(),
            ..Self::default()
        }
    }

    pub fn with_projections(mut self, data: Projection, feature: Projection) -> Self {
        self.data_projection = data;
        self.feature_projection = feature;
        self
    }

    /// Decodes this request into a feature-projection geometry
    pub fn read_geometry(&self) -> Result<Geometry<f64>> {
        GeometryCodec::parse(&self.wkt, self.data_projection, self.feature_projection)
    }
}

impl Default for WktFeature {
    fn default() -> Self {
        Self {
            wkt: String::new(),
            data_projection: Projection::DATA,
            feature_projection: Projection::FEATURE,
        }
    }
}

/// Reads and writes WKT, reprojecting between a data and a feature projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryCodec {
    pub data_projection: Projection,
    pub feature_projection: Projection,
}

impl GeometryCodec {
    pub fn new(data_projection: Projection, feature_projection: Projection) -> Self {
        Self {
            data_projection,
            feature_projection,
        }
    }

    /// Decodes `wkt` given in `source` and reprojects it into `target`
    pub fn parse(wkt: &str, source: Projection, target: Projection) -> Result<Geometry<f64>> {
        let text = wkt.trim();
        if text.is_empty() {
            return Err(MapError::Parse("empty WKT".to_string()));
        }

        let geometry = Geometry::<f64>::try_from_wkt_str(text)
            .map_err(|e| MapError::Parse(format!("{e} in `{}`", abbreviate(text))))?;
        // `POINT EMPTY` and friends cannot be written back as the same type
        if geometry.coords_count() == 0 {
            return Err(MapError::Parse(format!(
                "geometry without coordinates in `{}`",
                abbreviate(text)
            )));
        }

        Ok(source.transform_geometry(&geometry, target))
    }

    /// Reprojects `geometry` from `source` into `target` and encodes it as WKT
    pub fn serialize(geometry: &Geometry<f64>, source: Projection, target: Projection) -> String {
        source
            .transform_geometry(geometry, target)
            .to_wkt()
            .to_string()
    }

    /// Bounding box of `geometry`, empty when it has no coordinates
    pub fn extent_of(geometry: &Geometry<f64>) -> Bounds {
        geometry
            .bounding_rect()
            .map(Bounds::from)
            .unwrap_or_else(Bounds::empty)
    }

    /// Decodes with this codec's projections
    pub fn read(&self, wkt: &str) -> Result<Geometry<f64>> {
        Self::parse(wkt, self.data_projection, self.feature_projection)
    }

    /// Encodes with this codec's projections
    pub fn write(&self, geometry: &Geometry<f64>) -> String {
        Self::serialize(geometry, self.feature_projection, self.data_projection)
    }
}

impl Default for GeometryCodec {
    fn default() -> Self {
        Self::new(Projection::DATA, Projection::FEATURE)
    }
}

fn abbreviate(text: &str) -> String {
    const LIMIT: usize = 48;
    match text.char_indices().nth(LIMIT) {
        Some((index, _)) => format!("{}...", &text[..index]),
        None => text.to_string(),
    }
}
