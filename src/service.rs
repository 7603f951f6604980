//! The stateful map service behind the widget
//!
//! `MapService` owns at most one live [`Map`] together with the drawing
//! session attached to it. Every public command is total: failures are
//! logged and reported as `false`/`None`, never raised to the host.

use crate::{
    core::{
        bounds::Bounds,
        config::{MapConfig, StyleConfig, ViewOptions},
        geo::LatLng,
        map::{Container, Map},
        projection,
    },
    data::wkt::{GeometryCodec, WktFeature},
    input::events::InputEvent,
    plugins::draw::{DrawTool, DrawingSession, MapDrawEvent},
    viewer::GeometryInput,
    MapError, Result,
};
use instant::Instant;
use std::slice;

#[derive(Debug, Default)]
pub struct MapService {
    map: Option<Map>,
    container: Option<Container>,
    config: MapConfig,
    style: StyleConfig,
    session: DrawingSession,
}

impl MapService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the map inside `container`, replacing any existing one
    ///
    /// Returns `None` when the map could not be built; nothing stays mounted then.
    pub fn initialize(
        &mut self,
        container: Container,
        config: MapConfig,
        style: StyleConfig,
    ) -> Option<&Map> {
        if self.map.is_some() {
            self.destroy();
        }

        self.container = Some(container.clone());
        self.config = config.clone();
        self.style = style.clone();

        match Map::new(container, config, style) {
            Ok(map) => {
                self.map = Some(map);
                self.map.as_ref()
            }
            Err(e) => {
                log::error!("Failed to initialize map: {}", e);
                None
            }
        }
    }

    /// Tears the current map down and builds a new one in the same container
    pub fn reinitialize(&mut self, config: MapConfig, style: StyleConfig) -> Option<&Map> {
        let Some(container) = self.container.clone() else {
            log::warn!("Cannot reinitialize map: it was never initialized");
            return None;
        };
        self.destroy();
        self.initialize(container, config, style)
    }

    /// Disables drawing and releases the map; safe to call repeatedly
    pub fn destroy(&mut self) {
        self.disable_drawing();
        if let Some(mut map) = self.map.take() {
            map.detach();
        }
    }

    pub fn current_map(&self) -> Option<&Map> {
        self.map.as_ref()
    }

    pub fn current_map_mut(&mut self) -> Option<&mut Map> {
        self.map.as_mut()
    }

    pub fn is_initialized(&self) -> bool {
        self.map.is_some()
    }

    pub fn map_config(&self) -> &MapConfig {
        &self.config
    }

    pub fn style_config(&self) -> &StyleConfig {
        &self.style
    }

    fn require_map(&mut self, action: &str) -> Result<&mut Map> {
        self.map
            .as_mut()
            .ok_or_else(|| MapError::Precondition(format!("cannot {action}: map not initialized")))
    }

    /// Replaces the overlay with one decoded feature
    pub fn render_wkt(&mut self, feature: &WktFeature) -> bool {
        self.render_features(slice::from_ref(feature))
    }

    /// Replaces the overlay with the geometries of `input`
    pub fn render(&mut self, input: &GeometryInput) -> bool {
        let features: Vec<WktFeature> = input.sources().into_iter().map(WktFeature::new).collect();
        if features.is_empty() {
            log::warn!("Cannot render: no geometry given");
            return false;
        }
        self.render_features(&features)
    }

    fn render_features(&mut self, features: &[WktFeature]) -> bool {
        let map = match self.require_map("render WKT") {
            Ok(map) => map,
            Err(e) => {
                log::warn!("{}", e);
                return false;
            }
        };
        let accepted = map.overlay_mut().replace_all(features);
        if accepted < features.len() {
            log::debug!("Rendered {} of {} geometries", accepted, features.len());
        }
        accepted > 0
    }

    /// Removes every overlay feature
    pub fn clear_features(&mut self) -> bool {
        match self.map.as_mut() {
            Some(map) => {
                map.overlay_mut().clear();
                true
            }
            None => false,
        }
    }

    /// Frames the current overlay features
    pub fn fit_to_features(&mut self, options: &ViewOptions) -> bool {
        let result = self.require_map("fit to features").and_then(|map| {
            let extent = map.overlay().current_extent();
            map.viewport_mut().fit_bounds(&extent, options)
        });
        report(result, "fit to features")
    }

    /// Frames an arbitrary extent in the feature projection
    pub fn fit_to_extent(&mut self, extent: &Bounds, options: &ViewOptions) -> bool {
        let result = self
            .require_map("fit to extent")
            .and_then(|map| map.viewport_mut().fit_bounds(extent, options));
        report(result, "fit to extent")
    }

    /// Frames `wkt` without showing it; the overlay is emptied
    pub fn zoom_to_geometry(&mut self, wkt: &str, options: &ViewOptions) -> bool {
        let result = self.require_map("zoom to geometry").and_then(|map| {
            let geometry = map.codec().read(wkt)?;
            map.overlay_mut().clear();
            let extent = GeometryCodec::extent_of(&geometry);
            map.viewport_mut().fit_bounds(&extent, options)
        });
        report(result, "zoom to geometry")
    }

    /// Jumps to `center`/`zoom`, cancelling any running animation
    pub fn update_map_view(&mut self, center: LatLng, zoom: f64) -> bool {
        match self.require_map("update map view") {
            Ok(map) => {
                map.viewport_mut()
                    .set_view(projection::from_lon_lat(center), zoom);
                true
            }
            Err(e) => {
                log::warn!("{}", e);
                false
            }
        }
    }

    /// Applies a new style to every feature without re-parsing
    pub fn update_map_styling(&mut self, style: StyleConfig) -> bool {
        self.style = style.clone();
        match self.require_map("update styling") {
            Ok(map) => {
                map.overlay_mut().set_style(style);
                true
            }
            Err(e) => {
                log::warn!("{}", e);
                false
            }
        }
    }

    /// Applies the attribution fields of `config` to the live control
    pub fn update_attribution(&mut self, config: &MapConfig) -> bool {
        self.config.attribution = config.attribution;
        self.config.attribution_collapsible = config.attribution_collapsible;
        self.config.attribution_collapsed = config.attribution_collapsed;
        match self.require_map("update attribution") {
            Ok(map) => {
                map.update_attribution(config);
                true
            }
            Err(e) => {
                log::warn!("{}", e);
                false
            }
        }
    }

    /// Rebuilds the map on a new tile template and restores its features
    pub fn reconfigure_base_layer(&mut self, url_template: Option<String>) -> bool {
        if self.map.is_none() {
            log::warn!("Cannot reconfigure base layer: map not initialized");
            return false;
        }

        let sources = self
            .map
            .as_ref()
            .map(|map| map.overlay().sources())
            .unwrap_or_default();
        let config = MapConfig {
            base_layer_url_tpl: url_template,
            ..self.config.clone()
        };
        let style = self.style.clone();

        if self.reinitialize(config, style).is_none() {
            return false;
        }
        if !sources.is_empty() {
            self.render_features(&sources);
        }
        log::info!("Base layer reconfigured, {} feature(s) restored", sources.len());
        true
    }

    /// Starts drawing `tool`, replacing any session in progress
    pub fn enable_drawing<F>(&mut self, tool: DrawTool, on_complete: F) -> bool
    where
        F: FnMut(MapDrawEvent) + 'static,
    {
        let Some(map) = self.map.as_mut() else {
            log::warn!("Cannot enable drawing: map not initialized");
            return false;
        };
        let codec = *map.codec();
        self.session.enable(map, tool, codec, on_complete);
        true
    }

    /// Stops drawing; returns whether a session was active
    pub fn disable_drawing(&mut self) -> bool {
        match self.map.as_mut() {
            Some(map) => self.session.disable(map),
            None => {
                let was_active = self.session.is_active();
                self.session.reset();
                was_active
            }
        }
    }

    pub fn drawing_session(&self) -> &DrawingSession {
        &self.session
    }

    pub fn is_drawing(&self) -> bool {
        self.session.is_active()
    }

    /// Forwards pointer/keyboard input to the active interaction
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        self.map
            .as_mut()
            .map_or(false, |map| map.handle_input(event).is_handled())
    }

    /// Advances view animations to `now`; returns whether one is still running
    pub fn tick(&mut self, now: Instant) -> bool {
        self.map.as_mut().map_or(false, |map| map.update_at(now))
    }
}

fn report(result: Result<()>, action: &str) -> bool {
    match result {
        Ok(()) => true,
        Err(MapError::Parse(message)) => {
            log::error!("Cannot {}: {}", action, message);
            false
        }
        Err(e) => {
            log::warn!("Cannot {}: {}", action, e);
            false
        }
    }
}
