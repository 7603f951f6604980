//! Configuration objects supplied by the host
//!
//! `MapConfig` is fixed for the lifetime of one map instance, `StyleConfig`
//! is applied live and `ViewOptions` parameterises a single fit request. All
//! of them deserialize from the camelCase JSON the host hands over, with
//! every omitted field falling back to the widget defaults.

use crate::{
    core::{
        constants::{
            DEFAULT_BORDER_COLOR, DEFAULT_CENTER, DEFAULT_FILL_COLOR, DEFAULT_FIT_DURATION_MS,
            DEFAULT_FIT_MAX_ZOOM, DEFAULT_FIT_PADDING, DEFAULT_HEIGHT, DEFAULT_POINT_BORDER_COLOR,
            DEFAULT_POINT_COLOR, DEFAULT_POINT_RADIUS, DEFAULT_STROKE_WIDTH, DEFAULT_WIDTH,
            DEFAULT_ZOOM,
        },
        geo::{lon_lat_pair, LatLng},
    },
    Result,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Map instantiation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapConfig {
    /// Surface width, passed through untouched (e.g. `"100%"`)
    pub width: String,
    /// Surface height, passed through untouched (e.g. `"400px"`)
    pub height: String,
    pub zoom: f64,
    /// Initial center, serialized as `[longitude, latitude]`
    #[serde(with = "lon_lat_pair")]
    pub center: LatLng,
    pub attribution: bool,
    pub attribution_collapsible: bool,
    pub attribution_collapsed: bool,
    /// XYZ template with `{z}`, `{x}` and `{y}` placeholders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_layer_url_tpl: Option<String>,
}

impl MapConfig {
    pub fn new(center: LatLng, zoom: f64) -> Self {
        Self {
            center,
            zoom,
            ..Self::default()
        }
    }

    /// Parses a host JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_size(mut self, width: impl Into<String>, height: impl Into<String>) -> Self {
        self.width = width.into();
        self.height = height.into();
        self
    }

    pub fn with_attribution(mut self, visible: bool, collapsible: bool, collapsed: bool) -> Self {
        self.attribution = visible;
        self.attribution_collapsible = collapsible;
        self.attribution_collapsed = collapsed;
        self
    }

    pub fn with_base_layer_url(mut self, template: impl Into<String>) -> Self {
        self.base_layer_url_tpl = Some(template.into());
        self
    }

    /// Whether switching from `self` to `other` needs a new map instance
    pub fn requires_reinitialize(&self, other: &MapConfig) -> bool {
        self.base_layer_url_tpl != other.base_layer_url_tpl
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH.to_string(),
            height: DEFAULT_HEIGHT.to_string(),
            zoom: DEFAULT_ZOOM,
            center: LatLng::from_lon_lat(DEFAULT_CENTER.0, DEFAULT_CENTER.1),
            attribution: true,
            attribution_collapsible: true,
            attribution_collapsed: false,
            base_layer_url_tpl: None,
        }
    }
}

/// Overlay paint settings, colors are opaque CSS strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleConfig {
    pub border_color: String,
    pub fill_color: String,
    pub point_color: String,
    pub point_border_color: String,
    pub point_radius: f64,
    pub stroke_width: f64,
}

impl StyleConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_colors(
        mut self,
        border: impl Into<String>,
        fill: impl Into<String>,
        point: impl Into<String>,
        point_border: impl Into<String>,
    ) -> Self {
        self.border_color = border.into();
        self.fill_color = fill.into();
        self.point_color = point.into();
        self.point_border_color = point_border.into();
        self
    }

    /// Point radius, falling back to the default when unset or non-positive
    pub fn effective_point_radius(&self) -> f64 {
        if self.point_radius > 0.0 && self.point_radius.is_finite() {
            self.point_radius
        } else {
            DEFAULT_POINT_RADIUS
        }
    }

    /// Stroke width, falling back to the default when unset or non-positive
    pub fn effective_stroke_width(&self) -> f64 {
        if self.stroke_width > 0.0 && self.stroke_width.is_finite() {
            self.stroke_width
        } else {
            DEFAULT_STROKE_WIDTH
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            border_color: DEFAULT_BORDER_COLOR.to_string(),
            fill_color: DEFAULT_FILL_COLOR.to_string(),
            point_color: DEFAULT_POINT_COLOR.to_string(),
            point_border_color: DEFAULT_POINT_BORDER_COLOR.to_string(),
            point_radius: DEFAULT_POINT_RADIUS,
            stroke_width: DEFAULT_STROKE_WIDTH,
        }
    }
}

/// Pixel insets around a fitted extent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }
}

impl Default for Padding {
    fn default() -> Self {
        Self::uniform(DEFAULT_FIT_PADDING)
    }
}

impl From<[f64; 4]> for Padding {
    fn from([top, right, bottom, left]: [f64; 4]) -> Self {
        Self::new(top, right, bottom, left)
    }
}

impl From<Padding> for [f64; 4] {
    fn from(padding: Padding) -> Self {
        [padding.top, padding.right, padding.bottom, padding.left]
    }
}

/// Options of a fit-to-extent request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewOptions {
    pub padding: Padding,
    pub max_zoom: f64,
    /// Animation length in milliseconds, `0` applies the fit immediately
    pub duration: u64,
}

impl ViewOptions {
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_max_zoom(mut self, max_zoom: f64) -> Self {
        self.max_zoom = max_zoom;
        self
    }

    pub fn with_duration_ms(mut self, duration: u64) -> Self {
        self.duration = duration;
        self
    }

    /// Fit without animation
    pub fn immediate() -> Self {
        Self::default().with_duration_ms(0)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration)
    }
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            padding: Padding::default(),
            max_zoom: DEFAULT_FIT_MAX_ZOOM,
            duration: DEFAULT_FIT_DURATION_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_config_defaults() {
        let config = MapConfig::default();
        assert_eq!(config.width, "100%");
        assert_eq!(config.height, "400px");
        assert_eq!(config.zoom, 10.0);
        assert_eq!(config.center.lon_lat(), (44.7872, 41.7151));
        assert!(config.attribution);
        assert!(config.attribution_collapsible);
        assert!(!config.attribution_collapsed);
        assert!(config.base_layer_url_tpl.is_none());
    }

    #[test]
    fn test_map_config_from_json() {
        let config = MapConfig::from_json(
            r#"{"zoom": 4, "center": [10.5, 20.25], "baseLayerUrlTpl": "https://t/{z}/{x}/{y}.png"}"#,
        )
        .unwrap();

        assert_eq!(config.zoom, 4.0);
        assert_eq!(config.center, LatLng::new(20.25, 10.5));
        assert_eq!(
            config.base_layer_url_tpl.as_deref(),
            Some("https://t/{z}/{x}/{y}.png")
        );
        assert_eq!(config.height, "400px");
    }

    #[test]
    fn test_map_config_rejects_bad_json() {
        assert!(MapConfig::from_json("{\"zoom\": \"far\"}").is_err());
    }

    #[test]
    fn test_requires_reinitialize_only_for_tile_source() {
        let base = MapConfig::default();
        let attribution_only = base.clone().with_attribution(false, false, false);
        let new_tiles = base.clone().with_base_layer_url("https://t/{z}/{x}/{y}.png");

        assert!(!base.requires_reinitialize(&attribution_only));
        assert!(base.requires_reinitialize(&new_tiles));
    }

    #[test]
    fn test_style_fallbacks() {
        let style = StyleConfig {
            point_radius: 0.0,
            stroke_width: -1.0,
            ..StyleConfig::default()
        };
        assert_eq!(style.effective_point_radius(), 5.0);
        assert_eq!(style.effective_stroke_width(), 3.0);

        let parsed = StyleConfig::from_json(r#"{"pointColor": "red"}"#).unwrap();
        assert_eq!(parsed.point_color, "red");
        assert_eq!(parsed.border_color, "rgba(0, 0, 255, 1)");
    }

    #[test]
    fn test_view_options_defaults() {
        let options = ViewOptions::default();
        assert_eq!(options.padding, Padding::uniform(20.0));
        assert_eq!(options.max_zoom, 16.0);
        assert_eq!(options.duration(), Duration::from_millis(1000));

        let parsed: ViewOptions = serde_json::from_str(r#"{"padding": [1, 2, 3, 4]}"#).unwrap();
        assert_eq!(parsed.padding, Padding::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(parsed.max_zoom, 16.0);
    }
}
