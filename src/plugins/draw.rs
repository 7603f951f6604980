use crate::{
    core::{constants::DRAW_SNAP_TOLERANCE, geo::Point, map::Map, viewport::Viewport},
    data::wkt::GeometryCodec,
    input::{
        events::{InputEvent, KeyCode, MouseButton},
        handler::{EventKind, ListenerKey},
    },
    MapError, Result,
};
use geo_types::{Coord, Geometry, LineString, Polygon};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Listener name for sketch starts
pub const DRAW_START: &str = "drawstart";
/// Listener name for finished shapes
pub const DRAW_END: &str = "drawend";
/// Listener name for abandoned sketches
pub const DRAW_ABORT: &str = "drawabort";

/// Two clicks closer than this many pixels land on the same vertex
const DUPLICATE_VERTEX_TOLERANCE: f64 = 1.0;

/// Shape kinds the user can draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DrawTool {
    Point,
    Line,
    Polygon,
}

impl DrawTool {
    pub const ALL: [DrawTool; 3] = [DrawTool::Point, DrawTool::Line, DrawTool::Polygon];

    pub fn as_str(&self) -> &'static str {
        match self {
            DrawTool::Point => "POINT",
            DrawTool::Line => "LINE",
            DrawTool::Polygon => "POLYGON",
        }
    }

    /// Fewest vertices a finished shape needs
    pub fn min_vertices(&self) -> usize {
        match self {
            DrawTool::Point => 1,
            DrawTool::Line => 2,
            DrawTool::Polygon => 3,
        }
    }
}

impl Default for DrawTool {
    fn default() -> Self {
        DrawTool::Point
    }
}

impl fmt::Display for DrawTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DrawTool {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "POINT" => Ok(DrawTool::Point),
            "LINE" | "LINESTRING" => Ok(DrawTool::Line),
            "POLYGON" => Ok(DrawTool::Polygon),
            other => Err(MapError::Precondition(format!("unknown edit tool `{other}`"))),
        }
    }
}

/// Turns host-supplied tool names into a usable, non-empty tool set
///
/// Unknown names are dropped, duplicates keep their first position and an
/// empty result falls back to `[Point]`.
pub fn sanitize_edit_tools<S: AsRef<str>>(options: &[S]) -> Vec<DrawTool> {
    let mut tools = Vec::with_capacity(options.len());
    for option in options {
        match option.as_ref().parse::<DrawTool>() {
            Ok(tool) if !tools.contains(&tool) => tools.push(tool),
            Ok(_) => {}
            Err(_) => log::warn!("Ignoring unknown edit tool `{}`", option.as_ref()),
        }
    }
    if tools.is_empty() {
        tools.push(DrawTool::Point);
    }
    tools
}

/// Events produced by a [`DrawInteraction`]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawEvent {
    Start { tool: DrawTool },
    /// A finished shape in map (projected) coordinates
    End { tool: DrawTool, geometry: Geometry<f64> },
    Abort { tool: DrawTool },
}

impl DrawEvent {
    pub fn tool(&self) -> DrawTool {
        match self {
            DrawEvent::Start { tool } | DrawEvent::End { tool, .. } | DrawEvent::Abort { tool } => {
                *tool
            }
        }
    }
}

impl EventKind for DrawEvent {
    fn event_type(&self) -> &'static str {
        match self {
            DrawEvent::Start { .. } => DRAW_START,
            DrawEvent::End { .. } => DRAW_END,
            DrawEvent::Abort { .. } => DRAW_ABORT,
        }
    }
}

/// Payload handed to the host when a shape is finished
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDrawEvent {
    pub wkt: String,
    pub tool: DrawTool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawState {
    Idle,
    Drawing {
        /// Committed vertices in map coordinates
        points: Vec<Point>,
    },
}

/// Pointer-driven sketching of one kind of shape
///
/// Clicks become vertices in map coordinates. A point finishes on its click,
/// lines and polygons on double-click or Enter once they have enough
/// vertices; a polygon also finishes when the first vertex is clicked again.
/// Escape abandons the sketch.
#[derive(Debug, Clone)]
pub struct DrawInteraction {
    id: u64,
    tool: DrawTool,
    state: DrawState,
    cursor: Option<Point>,
}

impl DrawInteraction {
    pub fn new(tool: DrawTool) -> Self {
        Self {
            id: 0,
            tool,
            state: DrawState::Idle,
            cursor: None,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    pub fn tool(&self) -> DrawTool {
        self.tool
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, DrawState::Drawing { .. })
    }

    /// Vertices of the sketch in progress
    pub fn sketch_points(&self) -> &[Point] {
        match &self.state {
            DrawState::Drawing { points } => points,
            DrawState::Idle => &[],
        }
    }

    /// Last pointer position over the map, for previewing the next segment
    pub fn cursor(&self) -> Option<Point> {
        self.cursor
    }

    /// Feeds one input event, returning the draw events it produced
    pub fn handle_input(&mut self, event: &InputEvent, viewport: &Viewport) -> Vec<DrawEvent> {
        match event {
            InputEvent::Click {
                position,
                button: MouseButton::Left,
            } => self.click(*position, viewport),
            InputEvent::Click { .. } => Vec::new(),
            InputEvent::DoubleClick { position } => self.double_click(*position, viewport),
            InputEvent::MouseMove { position } => {
                self.cursor = Some(viewport.pixel_to_coordinate(position));
                Vec::new()
            }
            InputEvent::KeyPress { key, .. } => match key {
                KeyCode::Enter => self.finish().into_iter().collect(),
                KeyCode::Escape => self.abort().into_iter().collect(),
                KeyCode::Backspace => self.remove_last_point().into_iter().collect(),
                _ => Vec::new(),
            },
        }
    }

    fn click(&mut self, pixel: Point, viewport: &Viewport) -> Vec<DrawEvent> {
        let coordinate = viewport.pixel_to_coordinate(&pixel);

        if self.tool == DrawTool::Point {
            return vec![
                DrawEvent::Start { tool: self.tool },
                DrawEvent::End {
                    tool: self.tool,
                    geometry: Geometry::Point(Coord::from(coordinate).into()),
                },
            ];
        }

        let closes_ring = self.tool == DrawTool::Polygon
            && self.sketch_points().len() >= DrawTool::Polygon.min_vertices()
            && self.sketch_points().first().is_some_and(|first| {
                viewport.coordinate_to_pixel(first).distance_to(&pixel) <= DRAW_SNAP_TOLERANCE
            });
        if closes_ring {
            return self.finish().into_iter().collect();
        }

        match &mut self.state {
            DrawState::Idle => {
                self.state = DrawState::Drawing {
                    points: vec![coordinate],
                };
                vec![DrawEvent::Start { tool: self.tool }]
            }
            DrawState::Drawing { points } => {
                if !is_duplicate(points, &pixel, viewport) {
                    points.push(coordinate);
                }
                Vec::new()
            }
        }
    }

    fn double_click(&mut self, pixel: Point, viewport: &Viewport) -> Vec<DrawEvent> {
        let DrawState::Drawing { points } = &mut self.state else {
            return Vec::new();
        };
        if !is_duplicate(points, &pixel, viewport) {
            points.push(viewport.pixel_to_coordinate(&pixel));
        }
        self.finish().into_iter().collect()
    }

    /// Completes the sketch when it has enough vertices
    pub fn finish(&mut self) -> Option<DrawEvent> {
        let DrawState::Drawing { points } = &self.state else {
            return None;
        };
        if points.len() < self.tool.min_vertices() {
            log::debug!(
                "{} sketch needs {} vertices, has {}",
                self.tool,
                self.tool.min_vertices(),
                points.len()
            );
            return None;
        }

        let coords: Vec<Coord<f64>> = points.iter().copied().map(Coord::from).collect();
        let geometry = match self.tool {
            DrawTool::Point => Geometry::Point(coords[0].into()),
            DrawTool::Line => Geometry::LineString(LineString::new(coords)),
            // Polygon::new closes the exterior ring
            DrawTool::Polygon => Geometry::Polygon(Polygon::new(LineString::new(coords), vec![])),
        };

        self.state = DrawState::Idle;
        Some(DrawEvent::End {
            tool: self.tool,
            geometry,
        })
    }

    /// Abandons the sketch in progress
    pub fn abort(&mut self) -> Option<DrawEvent> {
        if !self.is_drawing() {
            return None;
        }
        self.state = DrawState::Idle;
        Some(DrawEvent::Abort { tool: self.tool })
    }

    /// Drops the newest vertex, aborting when none remain
    pub fn remove_last_point(&mut self) -> Option<DrawEvent> {
        let DrawState::Drawing { points } = &mut self.state else {
            return None;
        };
        points.pop();
        if points.is_empty() {
            self.abort()
        } else {
            None
        }
    }
}

fn is_duplicate(points: &[Point], pixel: &Point, viewport: &Viewport) -> bool {
    points.last().is_some_and(|last| {
        viewport.coordinate_to_pixel(last).distance_to(pixel) < DUPLICATE_VERTEX_TOLERANCE
    })
}

#[derive(Debug, Clone, PartialEq)]
enum SessionState {
    Idle,
    Drawing {
        tool: DrawTool,
        interaction_id: u64,
        listener_keys: Vec<ListenerKey>,
    },
}

/// Owns the one drawing interaction a map may have
///
/// Enabling always tears the previous session down first, and every exit
/// (disable, tool switch, mode change, map teardown) goes through
/// [`DrawingSession::disable`], which removes the interaction and every
/// listener it registered.
#[derive(Debug, Clone)]
pub struct DrawingSession {
    state: SessionState,
}

impl DrawingSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    /// Starts drawing `tool` on `map`, delivering each finished shape to `on_complete`
    pub fn enable<F>(&mut self, map: &mut Map, tool: DrawTool, codec: GeometryCodec, mut on_complete: F)
    where
        F: FnMut(MapDrawEvent) + 'static,
    {
        self.disable(map);
        map.overlay_mut().clear();

        let interaction_id = map.add_interaction(DrawInteraction::new(tool));
        let start_key = map.draw_events_mut().on(DRAW_START, |_, overlay| {
            // one shape at a time
            overlay.clear();
        });
        let end_key = map.draw_events_mut().on(DRAW_END, move |event, _| {
            if let DrawEvent::End { tool, geometry } = event {
                on_complete(MapDrawEvent {
                    wkt: codec.write(geometry),
                    tool: *tool,
                });
            }
        });

        log::info!("Drawing enabled with tool {}", tool);
        self.state = SessionState::Drawing {
            tool,
            interaction_id,
            listener_keys: vec![start_key, end_key],
        };
    }

    /// Removes the interaction and all of its listeners; returns whether a session was active
    pub fn disable(&mut self, map: &mut Map) -> bool {
        match std::mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::Idle => false,
            SessionState::Drawing {
                tool,
                interaction_id,
                listener_keys,
            } => {
                map.remove_interaction(interaction_id);
                let removed = map.draw_events_mut().un_by_keys(&listener_keys);
                log::info!("Drawing with tool {} disabled, {} listener(s) removed", tool, removed);
                true
            }
        }
    }

    /// Forgets the session without a map to detach from
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Drawing { .. })
    }

    pub fn active_tool(&self) -> Option<DrawTool> {
        match &self.state {
            SessionState::Drawing { tool, .. } => Some(*tool),
            SessionState::Idle => None,
        }
    }

    /// Listeners the session currently owns
    pub fn pending_listeners(&self) -> &[ListenerKey] {
        match &self.state {
            SessionState::Drawing { listener_keys, .. } => listener_keys,
            SessionState::Idle => &[],
        }
    }
}

impl Default for DrawingSession {
    fn default() -> Self {
        Self::new()
    }
}
