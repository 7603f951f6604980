use crate::{
    core::{
        config::{MapConfig, StyleConfig},
        geo::Point,
        projection,
        viewport::Viewport,
    },
    data::wkt::GeometryCodec,
    input::{
        events::{EventHandled, InputEvent},
        handler::EventManager,
    },
    layers::{base::LayerTrait, tile::TileLayer, vector::VectorLayer},
    plugins::draw::{DrawEvent, DrawInteraction},
    ui::attribution::Attribution,
    MapError, Result,
};
use instant::Instant;

/// The host surface a map is mounted into
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub id: String,
    /// Rendered size in pixels
    pub size: Point,
}

impl Container {
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            size: Point::new(width, height),
        }
    }

    /// Checks that the surface can host a map
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(MapError::Init("container has no id".to_string()));
        }
        let usable = |v: f64| v.is_finite() && v > 0.0;
        if !usable(self.size.x) || !usable(self.size.y) {
            return Err(MapError::Init(format!(
                "container `{}` has unusable size {}x{}",
                self.id, self.size.x, self.size.y
            )));
        }
        Ok(())
    }
}

/// Draw event bus; listeners get the overlay so they can edit its features
pub type DrawEventBus = EventManager<DrawEvent, VectorLayer>;

/// One live map instance: view, base layer, overlay, controls and interactions
#[derive(Debug)]
pub struct Map {
    container: Container,
    config: MapConfig,
    viewport: Viewport,
    base_layer: TileLayer,
    overlay: VectorLayer,
    attribution: Attribution,
    codec: GeometryCodec,
    interactions: Vec<DrawInteraction>,
    draw_events: DrawEventBus,
    next_interaction_id: u64,
}

impl Map {
    /// Builds a map inside `container`
    pub fn new(container: Container, config: MapConfig, style: StyleConfig) -> Result<Self> {
        container.validate()?;
        if !config.zoom.is_finite() || !config.center.lng.is_finite() || !config.center.lat.is_finite() {
            return Err(MapError::Init(format!(
                "invalid initial view: center {:?}, zoom {}",
                config.center.lon_lat(),
                config.zoom
            )));
        }

        let viewport = Viewport::new(
            projection::from_lon_lat(config.center),
            config.zoom,
            container.size,
        );
        let base_layer = TileLayer::from_template(config.base_layer_url_tpl.as_deref());
        let attribution = Attribution::from_config(&config, base_layer.attributions());
        let overlay = VectorLayer::default().with_style(style);

        log::info!(
            "Map created in `{}` with base layer {}",
            container.id,
            base_layer.url_template()
        );

        Ok(Self {
            container,
            config,
            viewport,
            base_layer,
            overlay,
            attribution,
            codec: GeometryCodec::default(),
            interactions: Vec::new(),
            draw_events: DrawEventBus::new(),
            next_interaction_id: 0,
        })
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn base_layer(&self) -> &TileLayer {
        &self.base_layer
    }

    pub fn overlay(&self) -> &VectorLayer {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut VectorLayer {
        &mut self.overlay
    }

    pub fn attribution(&self) -> &Attribution {
        &self.attribution
    }

    pub fn codec(&self) -> &GeometryCodec {
        &self.codec
    }

    /// Layers bottom to top
    pub fn layers(&self) -> Vec<&dyn LayerTrait> {
        let mut layers: Vec<&dyn LayerTrait> =
            vec![&self.base_layer as &dyn LayerTrait, &self.overlay as &dyn LayerTrait];
        layers.sort_by_key(|layer| layer.z_index());
        layers
    }

    /// Applies the attribution fields of `config` without rebuilding the map
    pub fn update_attribution(&mut self, config: &MapConfig) {
        self.config.attribution = config.attribution;
        self.config.attribution_collapsible = config.attribution_collapsible;
        self.config.attribution_collapsed = config.attribution_collapsed;
        self.attribution.apply_config(config);
    }

    /// Installs an interaction and returns its id
    pub fn add_interaction(&mut self, mut interaction: DrawInteraction) -> u64 {
        self.next_interaction_id += 1;
        interaction.set_id(self.next_interaction_id);
        self.interactions.push(interaction);
        self.next_interaction_id
    }

    pub fn remove_interaction(&mut self, id: u64) -> Option<DrawInteraction> {
        let index = self.interactions.iter().position(|i| i.id() == id)?;
        Some(self.interactions.remove(index))
    }

    pub fn interactions(&self) -> &[DrawInteraction] {
        &self.interactions
    }

    pub fn draw_events(&self) -> &DrawEventBus {
        &self.draw_events
    }

    pub fn draw_events_mut(&mut self) -> &mut DrawEventBus {
        &mut self.draw_events
    }

    /// Routes input to the installed interactions
    ///
    /// Draw listeners see each event before a finished shape is added to the
    /// overlay.
    pub fn handle_input(&mut self, input: &InputEvent) -> EventHandled {
        if self.interactions.is_empty() {
            return EventHandled::NotHandled;
        }

        let mut events = Vec::new();
        for interaction in &mut self.interactions {
            events.extend(interaction.handle_input(input, &self.viewport));
        }

        for event in &events {
            self.draw_events.dispatch(event, &mut self.overlay);
            if let DrawEvent::End { geometry, .. } = event {
                self.overlay.add_geometry(geometry.clone(), &self.codec);
            }
        }

        EventHandled::Handled
    }

    /// Advances view animations; returns whether one is still running
    pub fn update_at(&mut self, now: Instant) -> bool {
        self.viewport.update_at(now)
    }

    /// Tears down interactions and listeners ahead of dropping the map
    pub fn detach(&mut self) {
        self.viewport.cancel_animation();
        self.interactions.clear();
        self.draw_events.clear();
        log::info!("Map detached from `{}`", self.container.id);
    }
}
