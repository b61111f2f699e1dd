pub mod registry;
pub mod style;

pub use registry::{BaseLayer, LayerRegistry, OverlayLayer};
pub use style::StyleDescriptor;
