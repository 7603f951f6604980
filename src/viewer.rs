//! Host adapter for the map widget
//!
//! `MapViewer` caches the last inputs it was given and turns every new input
//! set into an ordered sequence of [`MapService`] commands. It does no
//! geometry work of its own.

use crate::{
    core::{
        config::{MapConfig, StyleConfig, ViewOptions},
        constants::{
            DEFAULT_BORDER_COLOR, DEFAULT_CENTER, DEFAULT_FILL_COLOR, DEFAULT_HEIGHT,
            DEFAULT_POINT_BORDER_COLOR, DEFAULT_POINT_COLOR, DEFAULT_WIDTH, DEFAULT_ZOOM,
        },
        geo::{lon_lat_pair, LatLng},
        map::Container,
    },
    input::events::InputEvent,
    plugins::draw::{sanitize_edit_tools, DrawTool, MapDrawEvent},
    service::MapService,
};
use instant::Instant;
use serde::{Deserialize, Serialize};
use std::{cell::RefCell, fmt, rc::Rc};

/// Whether the widget shows geometry or lets the user draw it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MapMode {
    #[default]
    View,
    Edit,
}

/// Geometry to display: one WKT string or a list of them
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryInput {
    Single(String),
    List(Vec<String>),
}

impl GeometryInput {
    /// Picks what to render from the two host inputs
    ///
    /// A non-empty list always wins over the single geometry; `None` when
    /// neither holds any text.
    pub fn resolve(wkt: &str, wkt_list: &[String]) -> Option<Self> {
        let list: Vec<String> = wkt_list
            .iter()
            .filter(|wkt| !wkt.trim().is_empty())
            .cloned()
            .collect();
        if !list.is_empty() {
            Some(GeometryInput::List(list))
        } else if !wkt.trim().is_empty() {
            Some(GeometryInput::Single(wkt.to_string()))
        } else {
            None
        }
    }

    /// WKT strings to decode, blank entries skipped
    pub fn sources(&self) -> Vec<&str> {
        match self {
            GeometryInput::Single(wkt) => vec![wkt.as_str()],
            GeometryInput::List(list) => list.iter().map(String::as_str).collect(),
        }
        .into_iter()
        .filter(|wkt| !wkt.trim().is_empty())
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sources().is_empty()
    }
}

/// Inputs the host binds to the widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerInputs {
    pub wkt: String,
    pub wkt_list: Vec<String>,
    pub width: String,
    pub height: String,
    pub zoom: f64,
    #[serde(with = "lon_lat_pair")]
    pub center: LatLng,
    pub border_color: String,
    pub fill_color: String,
    pub point_color: String,
    pub point_border_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_layer_url_tpl: Option<String>,
    pub mode: MapMode,
    pub edit_options: Vec<String>,
}

impl ViewerInputs {
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_wkt(mut self, wkt: impl Into<String>) -> Self {
        self.wkt = wkt.into();
        self
    }

    pub fn with_wkt_list<S: Into<String>>(mut self, list: impl IntoIterator<Item = S>) -> Self {
        self.wkt_list = list.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_mode(mut self, mode: MapMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_edit_options<S: Into<String>>(
        mut self,
        options: impl IntoIterator<Item = S>,
    ) -> Self {
        self.edit_options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_view(mut self, center: LatLng, zoom: f64) -> Self {
        self.center = center;
        self.zoom = zoom;
        self
    }

    pub fn with_base_layer_url(mut self, template: Option<String>) -> Self {
        self.base_layer_url_tpl = template;
        self
    }

    /// Geometry this input set asks to display
    pub fn geometry(&self) -> Option<GeometryInput> {
        GeometryInput::resolve(&self.wkt, &self.wkt_list)
    }

    pub fn map_config(&self) -> MapConfig {
        MapConfig {
            width: self.width.clone(),
            height: self.height.clone(),
            zoom: self.zoom,
            center: self.center,
            base_layer_url_tpl: self.base_layer_url_tpl.clone(),
            ..MapConfig::default()
        }
    }

    pub fn style_config(&self) -> StyleConfig {
        StyleConfig::default().with_colors(
            self.border_color.clone(),
            self.fill_color.clone(),
            self.point_color.clone(),
            self.point_border_color.clone(),
        )
    }

    fn style_changed(&self, other: &ViewerInputs) -> bool {
        self.border_color != other.border_color
            || self.fill_color != other.fill_color
            || self.point_color != other.point_color
            || self.point_border_color != other.point_border_color
    }
}

impl Default for ViewerInputs {
    fn default() -> Self {
        Self {
            wkt: String::new(),
            wkt_list: Vec::new(),
            width: DEFAULT_WIDTH.to_string(),
            height: DEFAULT_HEIGHT.to_string(),
            zoom: DEFAULT_ZOOM,
            center: LatLng::from_lon_lat(DEFAULT_CENTER.0, DEFAULT_CENTER.1),
            border_color: DEFAULT_BORDER_COLOR.to_string(),
            fill_color: DEFAULT_FILL_COLOR.to_string(),
            point_color: DEFAULT_POINT_COLOR.to_string(),
            point_border_color: DEFAULT_POINT_BORDER_COLOR.to_string(),
            base_layer_url_tpl: None,
            mode: MapMode::View,
            edit_options: vec![DrawTool::Point.as_str().to_string()],
        }
    }
}

type GeometryDrawnCallback = Box<dyn FnMut(&MapDrawEvent)>;

/// The widget: cached inputs, mode handling and edit tool selection
pub struct MapViewer {
    service: MapService,
    /// Inputs as last supplied by the host
    host: ViewerInputs,
    /// Effective inputs: the host's, with any drawn shape as the single geometry
    inputs: ViewerInputs,
    map_config: MapConfig,
    style_config: StyleConfig,
    edit_tools: Vec<DrawTool>,
    active_tool: Option<DrawTool>,
    fit_options: ViewOptions,
    /// Last drawn WKT, waiting to replace the single geometry input
    drawn: Rc<RefCell<Option<String>>>,
    on_geometry_drawn: Rc<RefCell<Option<GeometryDrawnCallback>>>,
}

impl MapViewer {
    pub fn new(inputs: ViewerInputs) -> Self {
        let mut viewer = Self {
            service: MapService::new(),
            map_config: inputs.map_config(),
            style_config: inputs.style_config(),
            edit_tools: sanitize_edit_tools(&inputs.edit_options),
            host: inputs.clone(),
            inputs,
            active_tool: None,
            fit_options: ViewOptions::default(),
            drawn: Rc::new(RefCell::new(None)),
            on_geometry_drawn: Rc::new(RefCell::new(None)),
        };
        if viewer.inputs.mode == MapMode::Edit {
            viewer.ensure_active_tool();
        }
        viewer
    }

    /// Registers the host callback for finished shapes
    pub fn on_geometry_drawn<F>(&mut self, callback: F)
    where
        F: FnMut(&MapDrawEvent) + 'static,
    {
        *self.on_geometry_drawn.borrow_mut() = Some(Box::new(callback));
    }

    pub fn with_fit_options(mut self, options: ViewOptions) -> Self {
        self.fit_options = options;
        self
    }

    /// Creates the map and shows the initial state of the current mode
    pub fn mount(&mut self, container: Container) -> bool {
        let created = self
            .service
            .initialize(container, self.map_config.clone(), self.style_config.clone())
            .is_some();
        if !created {
            return false;
        }

        match self.inputs.mode {
            MapMode::View => {
                self.render_geometry();
            }
            MapMode::Edit => self.enter_edit_mode(),
        }
        true
    }

    pub fn unmount(&mut self) {
        self.service.disable_drawing();
        self.service.destroy();
    }

    pub fn is_mounted(&self) -> bool {
        self.service.is_initialized()
    }

    /// Applies a new input set, issuing only the commands its changes need
    ///
    /// A drawn shape stays the current geometry until the host sends a
    /// different `wkt` of its own.
    pub fn apply(&mut self, inputs: ViewerInputs) {
        self.take_drawn();
        let previous_host = std::mem::replace(&mut self.host, inputs.clone());
        let mut inputs = inputs;
        if previous_host.wkt == inputs.wkt {
            inputs.wkt = self.inputs.wkt.clone();
        }
        let previous = std::mem::replace(&mut self.inputs, inputs);
        let previous_config = std::mem::replace(&mut self.map_config, self.inputs.map_config());
        self.style_config = self.inputs.style_config();
        self.edit_tools = sanitize_edit_tools(&self.inputs.edit_options);
        let mounted = self.service.is_initialized();

        if previous.mode != self.inputs.mode && mounted {
            log::info!("Switching to {:?} mode", self.inputs.mode);
            match self.inputs.mode {
                MapMode::Edit => self.enter_edit_mode(),
                MapMode::View => self.exit_edit_mode(),
            }
        }

        if previous.edit_options != self.inputs.edit_options && self.inputs.mode == MapMode::Edit {
            self.ensure_active_tool();
            self.refresh_drawing();
        }

        if mounted && self.inputs.mode == MapMode::View && previous.geometry() != self.inputs.geometry()
        {
            if !self.render_geometry() && self.inputs.geometry().is_none() {
                self.service.clear_features();
            }
        }

        if mounted && (previous.center != self.inputs.center || previous.zoom != self.inputs.zoom) {
            self.service
                .update_map_view(self.inputs.center, self.inputs.zoom);
        }

        if mounted && previous.style_changed(&self.inputs) {
            self.service.update_map_styling(self.style_config.clone());
        }

        if mounted && previous_config.requires_reinitialize(&self.map_config) {
            self.service
                .reconfigure_base_layer(self.map_config.base_layer_url_tpl.clone());
            match self.inputs.mode {
                MapMode::View => {
                    self.render_geometry();
                }
                MapMode::Edit => self.refresh_drawing(),
            }
        }
    }

    /// Switches the drawing tool; does nothing when `tool` is already active
    pub fn select_edit_tool(&mut self, tool: DrawTool) {
        if self.active_tool == Some(tool) {
            return;
        }
        self.active_tool = Some(tool);
        self.refresh_drawing();
    }

    /// The tool selector is only worth showing with a choice to make
    pub fn show_edit_toolbar(&self) -> bool {
        self.inputs.mode == MapMode::Edit && self.edit_tools.len() > 1
    }

    /// Forwards input to the map, picking up any shape it finished
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        let handled = self.service.handle_input(event);
        self.take_drawn();
        handled
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        self.service.tick(now)
    }

    pub fn service(&self) -> &MapService {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut MapService {
        &mut self.service
    }

    pub fn inputs(&self) -> &ViewerInputs {
        &self.inputs
    }

    pub fn mode(&self) -> MapMode {
        self.inputs.mode
    }

    /// Current single geometry, including shapes drawn since the last input
    pub fn current_wkt(&self) -> String {
        match self.drawn.borrow().as_ref() {
            Some(wkt) => wkt.clone(),
            None => self.inputs.wkt.clone(),
        }
    }

    pub fn edit_tools(&self) -> &[DrawTool] {
        &self.edit_tools
    }

    pub fn active_tool(&self) -> Option<DrawTool> {
        self.active_tool
    }

    pub fn map_config(&self) -> &MapConfig {
        &self.map_config
    }

    pub fn style_config(&self) -> &StyleConfig {
        &self.style_config
    }

    fn take_drawn(&mut self) {
        let drawn = self.drawn.borrow_mut().take();
        if let Some(wkt) = drawn {
            self.inputs.wkt = wkt;
        }
    }

    /// Renders the current geometry and frames it; `false` when nothing was shown
    fn render_geometry(&mut self) -> bool {
        let Some(geometry) = self.inputs.geometry() else {
            return false;
        };
        let rendered = self.service.render(&geometry);
        if rendered {
            self.service.fit_to_features(&self.fit_options);
        }
        rendered
    }

    fn enter_edit_mode(&mut self) {
        self.service.clear_features();
        if self.service.is_initialized() {
            self.service
                .update_map_view(self.map_config.center, self.map_config.zoom);
        }
        self.ensure_active_tool();
        self.refresh_drawing();
    }

    fn exit_edit_mode(&mut self) {
        self.service.disable_drawing();
        self.take_drawn();
        if self.inputs.geometry().is_some() {
            self.render_geometry();
        } else {
            self.service.clear_features();
        }
    }

    fn ensure_active_tool(&mut self) {
        let usable = self
            .active_tool
            .is_some_and(|tool| self.edit_tools.contains(&tool));
        if !usable {
            self.active_tool = self.edit_tools.first().copied();
        }
    }

    fn refresh_drawing(&mut self) {
        if !self.service.is_initialized() {
            return;
        }

        let tool = match (self.inputs.mode, self.active_tool) {
            (MapMode::Edit, Some(tool)) => tool,
            _ => {
                self.service.disable_drawing();
                return;
            }
        };

        let drawn = Rc::clone(&self.drawn);
        let host = Rc::clone(&self.on_geometry_drawn);
        self.service.enable_drawing(tool, move |event| {
            *drawn.borrow_mut() = Some(event.wkt.clone());
            if let Some(callback) = host.borrow_mut().as_mut() {
                callback(&event);
            }
        });
    }
}

impl Default for MapViewer {
    fn default() -> Self {
        Self::new(ViewerInputs::default())
    }
}

impl fmt::Debug for MapViewer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapViewer")
            .field("service", &self.service)
            .field("inputs", &self.inputs)
            .field("edit_tools", &self.edit_tools)
            .field("active_tool", &self.active_tool)
            .finish()
    }
}
