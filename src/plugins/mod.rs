pub mod draw;

pub use draw::{
    sanitize_edit_tools, DrawEvent, DrawInteraction, DrawState, DrawTool, DrawingSession,
    MapDrawEvent,
};
