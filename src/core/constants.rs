//! Core constants derived from the widget defaults and common web-map conventions.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Equatorial radius used by the spherical Web Mercator projection.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Latitude limit of the Web Mercator square.
pub const MAX_LATITUDE: f64 = 85.0511287798;

/// Metres per pixel at zoom 0 for 256px tiles.
pub const RESOLUTION_AT_ZOOM_0: f64 = 156_543.033_928_040_97;

/// Hard zoom limits of the view.
pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 28.0;

/// Initial view: Tbilisi at zoom 10.
pub const DEFAULT_CENTER: (f64, f64) = (44.7872, 41.7151);
pub const DEFAULT_ZOOM: f64 = 10.0;

pub const DEFAULT_WIDTH: &str = "100%";
pub const DEFAULT_HEIGHT: &str = "400px";

/// Fit-to-extent defaults.
pub const DEFAULT_FIT_PADDING: f64 = 20.0;
pub const DEFAULT_FIT_MAX_ZOOM: f64 = 16.0;
pub const DEFAULT_FIT_DURATION_MS: u64 = 1000;

/// Style defaults.
pub const DEFAULT_POINT_RADIUS: f64 = 5.0;
pub const DEFAULT_STROKE_WIDTH: f64 = 3.0;
pub const POINT_MARKER_STROKE_WIDTH: f64 = 2.0;
pub const DEFAULT_BORDER_COLOR: &str = "rgba(0, 0, 255, 1)";
pub const DEFAULT_FILL_COLOR: &str = "rgba(255, 255, 255, 0.5)";
pub const DEFAULT_POINT_COLOR: &str = "rgba(0, 0, 255, 1)";
pub const DEFAULT_POINT_BORDER_COLOR: &str = "rgba(255, 255, 255, 1)";

/// Public tile source used when no URL template is configured.
pub const OSM_URL_TEMPLATE: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";

pub const ATTRIBUTION_CLASS_NAME: &str = "custom-attribution";

/// Pixel distance within which a click on the first vertex closes a polygon.
pub const DRAW_SNAP_TOLERANCE: f64 = 12.0;
