pub mod attribution;

pub use attribution::Attribution;
