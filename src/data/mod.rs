//! Geometry text codecs
pub mod wkt;
