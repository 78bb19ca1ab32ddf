mod component;
mod details;
mod render;
mod state;
pub mod style;

pub use component::CodeGraphCanvas;
pub use details::NodeDetails;
pub use style::ImpactLevel;
