//! Common indimap types for `use indimap::prelude::*;`

pub use crate::core::{
    config::ViewerConfig,
    extent::Extent,
    geo::{LatLng, Pixel, Point, TileCoord},
    geometry::{Geometry, GeometryKind},
};

pub use crate::engine::{
    event::MapEvent,
    feature::{Feature, FeatureId, Properties},
    memory::MemoryEngine,
    FitOptions, InteractionHandle, LayerHandle, MapEngine, SourceState,
};

pub use crate::layers::{registry::LayerRegistry, style::StyleDescriptor};

pub use crate::tools::{
    controller::{ToolController, ToolEvent},
    inspect::{FeatureInspector, InfoPayload, QueryKind},
    measure::{MeasurementAnnotator, Measurement},
    mode::ToolMode,
    search::{SearchNavigator, SearchOutcome},
};

pub use crate::ui::{notice::Notice, popup::Popup};

#[cfg(feature = "egui")]
pub use crate::ui::panel::ControlPanel;

pub use crate::session::MapSession;

pub use crate::{Error as MapError, Result};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
