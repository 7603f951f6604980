use crate::{
    animation::ViewAnimation,
    core::{
        bounds::Bounds,
        config::ViewOptions,
        constants::{MAX_ZOOM, MIN_ZOOM, RESOLUTION_AT_ZOOM_0},
        geo::{LatLng, Point},
        projection,
    },
    MapError, Result,
};
use instant::Instant;
use std::time::Duration;

/// Manages the current view of the map: center, zoom, and screen dimensions
///
/// The center is held in the projected reference (EPSG:3857 metres). Screen
/// pixels grow right and down, projected y grows up.
#[derive(Debug, Clone)]
pub struct Viewport {
    /// The center of the map view in projected coordinates
    pub center: Point,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
    animation: Option<ViewAnimation>,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: Point, zoom: f64, size: Point) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            size,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            animation: None,
        }
    }

    /// Creates a viewport from a geographic center
    pub fn from_lat_lng(center: LatLng, zoom: f64, size: Point) -> Self {
        Self::new(projection::from_lon_lat(center), zoom, size)
    }

    /// Sets the center, cancelling any running animation
    pub fn set_center(&mut self, center: Point) {
        self.animation = None;
        self.center = center;
    }

    /// Sets the zoom level, clamping to valid range and cancelling any running animation
    pub fn set_zoom(&mut self, zoom: f64) {
        self.animation = None;
        self.zoom = self.clamp_zoom(zoom);
    }

    /// Applies center and zoom at once
    pub fn set_view(&mut self, center: Point, zoom: f64) {
        self.set_center(center);
        self.set_zoom(zoom);
    }

    /// Sets the zoom limits; an inverted or NaN range is ignored
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) -> bool {
        if min_zoom.is_nan() || max_zoom.is_nan() || min_zoom > max_zoom {
            log::warn!("Ignoring zoom limits {min_zoom}..{max_zoom}");
            return false;
        }
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.clamp_zoom(self.zoom);
        true
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        if zoom.is_nan() {
            return self.min_zoom;
        }
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    /// Center converted back to longitude/latitude
    pub fn center_lat_lng(&self) -> LatLng {
        projection::to_lon_lat(self.center)
    }

    /// Projected units per pixel at the current zoom
    pub fn resolution(&self) -> f64 {
        Self::resolution_for_zoom(self.zoom)
    }

    pub fn resolution_for_zoom(zoom: f64) -> f64 {
        RESOLUTION_AT_ZOOM_0 / 2_f64.powf(zoom)
    }

    pub fn zoom_for_resolution(resolution: f64) -> f64 {
        (RESOLUTION_AT_ZOOM_0 / resolution).log2()
    }

    /// Converts a container pixel to projected coordinates
    pub fn pixel_to_coordinate(&self, pixel: &Point) -> Point {
        let resolution = self.resolution();
        Point::new(
            self.center.x + (pixel.x - self.size.x / 2.0) * resolution,
            self.center.y - (pixel.y - self.size.y / 2.0) * resolution,
        )
    }

    /// Converts projected coordinates to a container pixel
    pub fn coordinate_to_pixel(&self, coordinate: &Point) -> Point {
        let resolution = self.resolution();
        Point::new(
            (coordinate.x - self.center.x) / resolution + self.size.x / 2.0,
            (self.center.y - coordinate.y) / resolution + self.size.y / 2.0,
        )
    }

    /// Gets the visible extent in projected coordinates
    pub fn bounds(&self) -> Bounds {
        let top_left = self.pixel_to_coordinate(&Point::new(0.0, 0.0));
        let bottom_right = self.pixel_to_coordinate(&self.size);
        Bounds::from_coords(top_left.x, bottom_right.y, bottom_right.x, top_left.y)
    }

    /// Computes the center and zoom that frame `extent` under `options`
    ///
    /// The resolution is the larger of the horizontal and vertical ratios of
    /// extent size to padded viewport size. Asymmetric padding shifts the
    /// center so the extent sits inside the padded area.
    pub fn fit_target(&self, extent: &Bounds, options: &ViewOptions) -> Result<(Point, f64)> {
        if extent.is_empty() {
            return Err(MapError::EmptyExtent);
        }

        let padding = &options.padding;
        let available_width = (self.size.x - padding.left - padding.right).max(1.0);
        let available_height = (self.size.y - padding.top - padding.bottom).max(1.0);

        let resolution =
            (extent.width() / available_width).max(extent.height() / available_height);

        // zero-area extents resolve to an infinite zoom and land on the cap
        let zoom = self.clamp_zoom(Self::zoom_for_resolution(resolution).min(options.max_zoom));
        let resolution = Self::resolution_for_zoom(zoom);

        let center = extent.center();
        let center = Point::new(
            center.x + (padding.right - padding.left) / 2.0 * resolution,
            center.y + (padding.top - padding.bottom) / 2.0 * resolution,
        );

        Ok((center, zoom))
    }

    /// Fits the viewport to contain `extent`, animating when a duration is set
    pub fn fit_bounds(&mut self, extent: &Bounds, options: &ViewOptions) -> Result<()> {
        let (center, zoom) = self.fit_target(extent, options)?;
        let duration = options.duration();
        if duration.is_zero() {
            self.set_view(center, zoom);
        } else {
            self.animate_to(center, zoom, duration);
        }
        Ok(())
    }

    /// Starts an animation towards `center`/`zoom`, replacing any running one
    pub fn animate_to(&mut self, center: Point, zoom: f64, duration: Duration) {
        let zoom = self.clamp_zoom(zoom);
        self.animation = Some(ViewAnimation::new(
            self.center,
            center,
            self.zoom,
            zoom,
            duration,
        ));
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn cancel_animation(&mut self) {
        self.animation = None;
    }

    /// Center the view will settle on
    pub fn target_center(&self) -> Point {
        self.animation
            .as_ref()
            .map_or(self.center, ViewAnimation::target_center)
    }

    /// Zoom the view will settle on
    pub fn target_zoom(&self) -> f64 {
        self.animation
            .as_ref()
            .map_or(self.zoom, ViewAnimation::target_zoom)
    }

    /// Advances the running animation to `now`
    ///
    /// Returns `true` while an animation is still in progress.
    pub fn update_at(&mut self, now: Instant) -> bool {
        let Some(animation) = &self.animation else {
            return false;
        };

        let state = animation.sample(now);
        self.center = state.center;
        self.zoom = state.zoom;

        if state.is_complete() {
            self.animation = None;
            false
        } else {
            true
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Point::new(0.0, 0.0), 0.0, Point::new(800.0, 600.0))
    }
}
