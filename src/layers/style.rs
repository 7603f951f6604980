use crate::core::{config::StyleConfig, constants::POINT_MARKER_STROKE_WIDTH};
use geo_types::Geometry;
use serde::{Deserialize, Serialize};

/// Paint category of a geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    Point,
    Line,
    Polygon,
}

impl GeometryKind {
    pub fn of(geometry: &Geometry<f64>) -> Self {
        match geometry {
            Geometry::Point(_) | Geometry::MultiPoint(_) => GeometryKind::Point,
            Geometry::Line(_) | Geometry::LineString(_) | Geometry::MultiLineString(_) => {
                GeometryKind::Line
            }
            Geometry::Polygon(_)
            | Geometry::MultiPolygon(_)
            | Geometry::Rect(_)
            | Geometry::Triangle(_)
            | Geometry::GeometryCollection(_) => GeometryKind::Polygon,
        }
    }
}

impl From<&Geometry<f64>> for GeometryKind {
    fn from(geometry: &Geometry<f64>) -> Self {
        Self::of(geometry)
    }
}

/// Line paint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
}

/// Circle marker drawn for point features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointStyle {
    pub radius: f64,
    pub fill_color: String,
    pub stroke: Stroke,
}

/// Outline drawn for line features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub stroke: Stroke,
}

/// Outline plus fill drawn for polygon features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonStyle {
    pub stroke: Stroke,
    pub fill_color: String,
}

/// Resolved paint for one feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PaintStyle {
    Point(PointStyle),
    Line(LineStyle),
    Polygon(PolygonStyle),
}

impl PaintStyle {
    /// Maps a geometry kind and the current style settings to a paint style
    pub fn resolve(kind: GeometryKind, config: &StyleConfig) -> Self {
        match kind {
            GeometryKind::Point => PaintStyle::Point(PointStyle {
                radius: config.effective_point_radius(),
                fill_color: config.point_color.clone(),
                stroke: Stroke {
                    color: config.point_border_color.clone(),
                    width: POINT_MARKER_STROKE_WIDTH,
                },
            }),
            GeometryKind::Line => PaintStyle::Line(LineStyle {
                stroke: Self::outline(config),
            }),
            GeometryKind::Polygon => PaintStyle::Polygon(PolygonStyle {
                stroke: Self::outline(config),
                fill_color: config.fill_color.clone(),
            }),
        }
    }

    pub fn for_geometry(geometry: &Geometry<f64>, config: &StyleConfig) -> Self {
        Self::resolve(GeometryKind::of(geometry), config)
    }

    fn outline(config: &StyleConfig) -> Stroke {
        Stroke {
            color: config.border_color.clone(),
            width: config.effective_stroke_width(),
        }
    }

    pub fn kind(&self) -> GeometryKind {
        match self {
            PaintStyle::Point(_) => GeometryKind::Point,
            PaintStyle::Line(_) => GeometryKind::Line,
            PaintStyle::Polygon(_) => GeometryKind::Polygon,
        }
    }

    pub fn stroke(&self) -> &Stroke {
        match self {
            PaintStyle::Point(style) => &style.stroke,
            PaintStyle::Line(style) => &style.stroke,
            PaintStyle::Polygon(style) => &style.stroke,
        }
    }

    pub fn fill_color(&self) -> Option<&str> {
        match self {
            PaintStyle::Point(style) => Some(&style.fill_color),
            PaintStyle::Line(_) => None,
            PaintStyle::Polygon(style) => Some(&style.fill_color),
        }
    }
}
