use crate::{
    core::{bounds::Bounds, config::StyleConfig},
    data::wkt::{GeometryCodec, WktFeature},
    layers::{
        base::{LayerProperties, LayerType},
        style::{GeometryKind, PaintStyle},
    },
};
use geo_types::Geometry;

/// A feature held by the overlay
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFeature {
    pub id: String,
    /// Geometry in the feature projection
    pub geometry: Geometry<f64>,
    /// Text the feature was decoded from, with its projections
    pub source: WktFeature,
}

impl RenderedFeature {
    pub fn source_wkt(&self) -> &str {
        &self.source.wkt
    }

    pub fn kind(&self) -> GeometryKind {
        GeometryKind::of(&self.geometry)
    }

    pub fn bounds(&self) -> Bounds {
        GeometryCodec::extent_of(&self.geometry)
    }
}

/// Vector overlay holding the rendered features
///
/// Every render replaces the whole set. A render that yields no valid
/// geometry leaves the previous features in place.
#[derive(Debug, Clone)]
pub struct VectorLayer {
    /// Base layer properties
    properties: LayerProperties,
    features: Vec<RenderedFeature>,
    style: StyleConfig,
    next_id: u64,
}

impl VectorLayer {
    /// Create a new vector layer
    pub fn new(id: String, name: String) -> Self {
        Self {
            properties: LayerProperties::new(id, name, LayerType::Vector).with_z_index(1),
            features: Vec::new(),
            style: StyleConfig::default(),
            next_id: 0,
        }
    }

    pub fn with_style(mut self, style: StyleConfig) -> Self {
        self.style = style;
        self
    }

    /// Decodes every source and swaps the accepted ones in
    ///
    /// Returns the number of accepted features. Sources that fail to decode
    /// are logged and skipped.
    pub fn replace_all(&mut self, sources: &[WktFeature]) -> usize {
        let mut accepted = Vec::with_capacity(sources.len());

        for source in sources {
            match source.read_geometry() {
                Ok(geometry) => accepted.push((geometry, source.clone())),
                Err(e) => log::error!("Skipping geometry that failed to decode: {}", e),
            }
        }

        if accepted.is_empty() {
            if !sources.is_empty() {
                log::warn!("No valid geometry among {} source(s), overlay left unchanged", sources.len());
            }
            return 0;
        }

        self.clear();
        let count = accepted.len();
        for (geometry, source) in accepted {
            self.add(geometry, source);
        }
        count
    }

    /// Adds one feature and returns its id
    pub fn add(&mut self, geometry: Geometry<f64>, source: WktFeature) -> String {
        self.next_id += 1;
        let id = format!("{}-{}", self.properties.id, self.next_id);
        self.features.push(RenderedFeature {
            id: id.clone(),
            geometry,
            source,
        });
        id
    }

    /// Adds a feature-projection geometry, deriving its source WKT with `codec`
    pub fn add_geometry(&mut self, geometry: Geometry<f64>, codec: &GeometryCodec) -> String {
        let source = WktFeature::new(codec.write(&geometry))
            .with_projections(codec.data_projection, codec.feature_projection);
        self.add(geometry, source)
    }

    /// Remove a feature by ID
    pub fn remove_feature(&mut self, id: &str) -> Option<RenderedFeature> {
        let index = self.features.iter().position(|feature| feature.id == id)?;
        Some(self.features.remove(index))
    }

    /// Clear all features
    pub fn clear(&mut self) {
        self.features.clear();
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Get all features in insertion order
    pub fn features(&self) -> &[RenderedFeature] {
        &self.features
    }

    /// Render requests that rebuild the current features, in insertion order
    pub fn sources(&self) -> Vec<WktFeature> {
        self.features
            .iter()
            .map(|feature| feature.source.clone())
            .collect()
    }

    /// Source WKT of every feature, in insertion order
    pub fn source_wkts(&self) -> Vec<&str> {
        self.features.iter().map(RenderedFeature::source_wkt).collect()
    }

    /// Union of all feature extents, empty when there is nothing to frame
    pub fn current_extent(&self) -> Bounds {
        self.features
            .iter()
            .fold(Bounds::empty(), |extent, feature| {
                extent.extend_with(&feature.bounds())
            })
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Replaces the style; features pick it up on the next resolve without re-parsing
    pub fn set_style(&mut self, style: StyleConfig) {
        self.style = style;
    }

    /// Every feature paired with the paint style resolved from the current settings
    pub fn styled_features(&self) -> impl Iterator<Item = (&RenderedFeature, PaintStyle)> + '_ {
        self.features
            .iter()
            .map(move |feature| (feature, PaintStyle::resolve(feature.kind(), &self.style)))
    }
}

impl Default for VectorLayer {
    fn default() -> Self {
        Self::new("overlay".to_string(), "Overlay".to_string())
    }
}

crate::impl_layer_trait!(VectorLayer, properties);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::projection::Projection, layers::base::LayerTrait};

    fn sources(wkts: &[&str]) -> Vec<WktFeature> {
        wkts.iter().map(|wkt| WktFeature::new(*wkt)).collect()
    }

    #[test]
    fn test_replace_all_skips_invalid() {
        let mut layer = VectorLayer::default();
        let accepted = layer.replace_all(&sources(&["POINT(1 1)", "garbage", "LINESTRING(0 0, 1 1)"]));

        assert_eq!(accepted, 2);
        assert_eq!(layer.len(), 2);
        assert_eq!(layer.source_wkts(), vec!["POINT(1 1)", "LINESTRING(0 0, 1 1)"]);
    }

    #[test]
    fn test_replace_all_with_nothing_valid_keeps_store() {
        let mut layer = VectorLayer::default();
        layer.replace_all(&sources(&["POINT(1 1)"]));

        assert_eq!(layer.replace_all(&sources(&["POLYGON((0 0, 10 0"])), 0);
        assert_eq!(layer.len(), 1);
        assert_eq!(layer.replace_all(&[]), 0);
        assert_eq!(layer.len(), 1);
    }

    #[test]
    fn test_replace_all_replaces_wholesale() {
        let mut layer = VectorLayer::default();
        layer.replace_all(&sources(&["POINT(1 1)", "POINT(2 2)"]));
        layer.replace_all(&sources(&["POINT(3 3)"]));

        assert_eq!(layer.source_wkts(), vec!["POINT(3 3)"]);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut layer = VectorLayer::default();
        layer.replace_all(&sources(&["POINT(1 1)"]));
        layer.clear();
        layer.clear();

        assert!(layer.is_empty());
        assert!(layer.current_extent().is_empty());
    }

    #[test]
    fn test_current_extent_covers_all_features() {
        let mut layer = VectorLayer::default();
        layer.replace_all(&[
            WktFeature::new("POINT(0 0)").with_projections(Projection::Geographic, Projection::Geographic),
            WktFeature::new("POINT(10 5)").with_projections(Projection::Geographic, Projection::Geographic),
        ]);

        assert_eq!(layer.current_extent(), Bounds::from_coords(0.0, 0.0, 10.0, 5.0));
    }

    #[test]
    fn test_styled_features_follow_style_changes() {
        let mut layer = VectorLayer::default();
        layer.replace_all(&sources(&["POINT(1 1)", "POLYGON((0 0, 1 0, 1 1, 0 0))"]));
        layer.set_style(StyleConfig::default().with_colors("green", "yellow", "red", "black"));

        let styles: Vec<PaintStyle> = layer.styled_features().map(|(_, style)| style).collect();
        assert_eq!(styles[0].fill_color(), Some("red"));
        assert_eq!(styles[1].fill_color(), Some("yellow"));
        assert_eq!(styles[1].stroke().color, "green");
    }

    #[test]
    fn test_remove_feature_and_layer_properties() {
        let mut layer = VectorLayer::default();
        let id = layer.add_geometry(
            Geometry::Point(geo_types::Point::new(0.0, 0.0)),
            &GeometryCodec::default(),
        );

        assert_eq!(layer.layer_type(), LayerType::Vector);
        assert!(layer.remove_feature(&id).is_some());
        assert!(layer.remove_feature(&id).is_none());
    }
}
