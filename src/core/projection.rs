//! Coordinate bridge between the geographic reference used by hosts and WKT
//! text (EPSG:4326) and the projected reference used on screen (EPSG:3857).

use crate::{
    core::geo::{LatLng, Point},
    MapError, Result,
};
use geo::MapCoords;
use geo_types::{Coord, Geometry};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Coordinate reference systems understood by the viewer
///
/// Serialized as the canonical EPSG code; any alias [`FromStr`] accepts is
/// read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Projection {
    /// Longitude/latitude in degrees
    Geographic,
    /// Spherical Web Mercator in metres
    WebMercator,
}

impl Projection {
    /// Default reference of external text and host coordinates
    pub const DATA: Projection = Projection::Geographic;
    /// Default reference used for rendering
    pub const FEATURE: Projection = Projection::WebMercator;

    pub fn code(&self) -> &'static str {
        match self {
            Projection::Geographic => "EPSG:4326",
            Projection::WebMercator => "EPSG:3857",
        }
    }

    /// Converts a single coordinate from `self` into `target`
    pub fn transform_coord(&self, coord: Coord<f64>, target: Projection) -> Coord<f64> {
        match (self, target) {
            (Projection::Geographic, Projection::WebMercator) => {
                LatLng::from_lon_lat(coord.x, coord.y).to_mercator().into()
            }
            (Projection::WebMercator, Projection::Geographic) => {
                let lat_lng = LatLng::from_mercator(Point::from(coord));
                Coord {
                    x: lat_lng.lng,
                    y: lat_lng.lat,
                }
            }
            _ => coord,
        }
    }

    /// Reprojects every coordinate of `geometry` from `self` into `target`
    pub fn transform_geometry(&self, geometry: &Geometry<f64>, target: Projection) -> Geometry<f64> {
        if *self == target {
            return geometry.clone();
        }
        let source = *self;
        geometry.map_coords(|coord| source.transform_coord(coord, target))
    }
}

impl Default for Projection {
    fn default() -> Self {
        Projection::DATA
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Projection {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EPSG:4326" | "CRS:84" | "WGS84" | "URN:OGC:DEF:CRS:EPSG::4326" => {
                Ok(Projection::Geographic)
            }
            "EPSG:3857" | "EPSG:900913" | "EPSG:102100" | "EPSG:102113" | "EPSG:3785"
            | "URN:OGC:DEF:CRS:EPSG::3857" => Ok(Projection::WebMercator),
            _ => Err(MapError::Parse(format!("unknown projection `{}`", s.trim()))),
        }
    }
}

impl TryFrom<String> for Projection {
    type Error = MapError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Projection> for String {
    fn from(projection: Projection) -> Self {
        projection.code().to_string()
    }
}

/// Projects a host `(lon, lat)` coordinate into the rendering reference (`fromLonLat`)
pub fn from_lon_lat(lat_lng: LatLng) -> Point {
    lat_lng.to_mercator()
}

/// Inverse of [`from_lon_lat`]
pub fn to_lon_lat(point: Point) -> LatLng {
    LatLng::from_mercator(point)
}
