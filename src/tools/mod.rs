//! Interactive tools: the mode state machine and what each mode does
//! with the engine callbacks it receives.

pub mod controller;
pub mod inspect;
pub mod measure;
pub mod mode;
pub mod search;

pub use controller::{ToolController, ToolEvent};
pub use inspect::{FeatureInspector, InfoField, InfoPayload, QueryKind};
pub use measure::{format_area, format_length, MeasureKind, Measurement, MeasurementAnnotator};
pub use mode::ToolMode;
pub use search::{AliasRule, SearchNavigator, SearchOutcome};
