use crate::{
    core::{
        constants::{EARTH_RADIUS, OSM_ATTRIBUTION, OSM_URL_TEMPLATE, TILE_SIZE},
        geo::{Point, TileCoord},
        viewport::Viewport,
    },
    layers::base::{LayerProperties, LayerType},
};
use std::f64::consts::PI;

/// Trait representing anything that can produce tile URLs for a given coordinate.
pub trait TileSource: Send + Sync + std::fmt::Debug {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;

    /// Attribution lines the source requires
    fn attributions(&self) -> Vec<String> {
        Vec::new()
    }

    /// Template the source was built from
    fn url_template(&self) -> &str;
}

/// The default OpenStreetMap tile server
#[derive(Debug, Clone, Default)]
pub struct OpenStreetMapSource;

impl OpenStreetMapSource {
    pub fn new() -> Self {
        Self
    }
}

impl TileSource for OpenStreetMapSource {
    fn url(&self, coord: TileCoord) -> String {
        expand_template(OSM_URL_TEMPLATE, coord)
    }

    fn attributions(&self) -> Vec<String> {
        vec![OSM_ATTRIBUTION.to_string()]
    }

    fn url_template(&self) -> &str {
        OSM_URL_TEMPLATE
    }
}

/// Tiles from a custom `{z}/{x}/{y}` URL template
#[derive(Debug, Clone, PartialEq)]
pub struct XyzSource {
    url_template: String,
}

impl XyzSource {
    pub fn new(url_template: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
        }
    }
}

impl TileSource for XyzSource {
    fn url(&self, coord: TileCoord) -> String {
        expand_template(&self.url_template, coord)
    }

    fn url_template(&self) -> &str {
        &self.url_template
    }
}

/// Picks the source for an optional custom template
pub fn source_for_template(template: Option<&str>) -> Box<dyn TileSource> {
    match template {
        Some(template) if !template.trim().is_empty() => Box::new(XyzSource::new(template)),
        _ => Box::new(OpenStreetMapSource::new()),
    }
}

/// Substitutes `{z}`, `{x}`, `{y}`, `{-y}` and a `{a-c}` style character range
///
/// The range picks one character by `(x + y) mod n`.
pub fn expand_template(template: &str, coord: TileCoord) -> String {
    let url = template
        .replace("{z}", &coord.z.to_string())
        .replace("{x}", &coord.x.to_string())
        .replace("{-y}", &coord.inverted_y().to_string())
        .replace("{y}", &coord.y.to_string());

    match find_char_range(&url) {
        Some((start, end, first, last)) => {
            let count = (last as u32 - first as u32) + 1;
            let index = (coord.x.wrapping_add(coord.y)) % count;
            let chosen = char::from_u32(first as u32 + index).unwrap_or(first);
            format!("{}{}{}", &url[..start], chosen, &url[end..])
        }
        None => url,
    }
}

/// Locates a `{a-c}` block, returning its byte span and character bounds
fn find_char_range(url: &str) -> Option<(usize, usize, char, char)> {
    let bytes = url.as_bytes();
    (0..bytes.len().saturating_sub(4)).find_map(|start| {
        let block = &bytes[start..start + 5];
        let is_range = block[0] == b'{'
            && block[2] == b'-'
            && block[4] == b'}'
            && block[1].is_ascii_alphanumeric()
            && block[3].is_ascii_alphanumeric()
            && block[1] <= block[3];
        is_range.then(|| (start, start + 5, block[1] as char, block[3] as char))
    })
}

/// Base layer showing tiles from one source
///
/// The source is fixed for the layer's lifetime; a different template needs
/// a new layer (and with it a new map instance).
#[derive(Debug)]
pub struct TileLayer {
    properties: LayerProperties,
    source: Box<dyn TileSource>,
}

impl TileLayer {
    pub fn new(id: String, source: Box<dyn TileSource>) -> Self {
        Self {
            properties: LayerProperties::new(id, "Base".to_string(), LayerType::Tile),
            source,
        }
    }

    /// Base layer for an optional custom template, OpenStreetMap otherwise
    pub fn from_template(template: Option<&str>) -> Self {
        Self::new("base".to_string(), source_for_template(template))
    }

    pub fn openstreetmap(id: String) -> Self {
        Self::new(id, Box::new(OpenStreetMapSource::new()))
    }

    pub fn tile_source(&self) -> &dyn TileSource {
        self.source.as_ref()
    }

    pub fn url_template(&self) -> &str {
        self.source.url_template()
    }

    pub fn attributions(&self) -> Vec<String> {
        self.source.attributions()
    }

    pub fn tile_url(&self, coord: TileCoord) -> String {
        self.source.url(coord)
    }

    /// Tiles covering the viewport at the nearest integer zoom
    pub fn visible_tiles(&self, viewport: &Viewport) -> Vec<TileCoord> {
        let zoom = viewport.zoom.round().clamp(0.0, 30.0) as u8;
        let (min, max) = Self::tiled_pixel_bounds(viewport, zoom);
        let tile_size = TILE_SIZE as f64;

        let min_x = (min.x / tile_size).floor() as i64;
        let min_y = (min.y / tile_size).floor() as i64;
        let max_x = (max.x / tile_size).ceil() as i64 - 1;
        let max_y = (max.y / tile_size).ceil() as i64 - 1;
        let tiles_per_axis = 1_i64 << zoom;

        let mut coords = Vec::new();
        for y in min_y.max(0)..=max_y.min(tiles_per_axis - 1) {
            for x in min_x..=max_x {
                // wrap around the antimeridian
                let wrapped_x = x.rem_euclid(tiles_per_axis);
                let coord = TileCoord::new(wrapped_x as u32, y as u32, zoom);
                if !coords.contains(&coord) {
                    coords.push(coord);
                }
            }
        }
        coords
    }

    /// URLs of the tiles covering the viewport
    pub fn visible_tile_urls(&self, viewport: &Viewport) -> Vec<String> {
        self.visible_tiles(viewport)
            .into_iter()
            .map(|coord| self.tile_url(coord))
            .collect()
    }

    /// World pixel bounds of the viewport at `zoom`
    fn tiled_pixel_bounds(viewport: &Viewport, zoom: u8) -> (Point, Point) {
        let half_world = PI * EARTH_RADIUS;
        let world_pixels = TILE_SIZE as f64 * 2_f64.powi(zoom as i32);
        let pixel_center = Point::new(
            (viewport.center.x + half_world) / (2.0 * half_world) * world_pixels,
            (half_world - viewport.center.y) / (2.0 * half_world) * world_pixels,
        );

        let scale = 2_f64.powf(viewport.zoom - zoom as f64);
        let half_size = Point::new(
            viewport.size.x / (scale * 2.0),
            viewport.size.y / (scale * 2.0),
        );

        (
            pixel_center.subtract(&half_size),
            pixel_center.add(&half_size),
        )
    }
}

crate::impl_layer_trait!(TileLayer, properties);
