pub mod base;
pub mod macros;
pub mod style;
pub mod tile;
pub mod vector;
