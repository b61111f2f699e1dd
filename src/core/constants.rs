//! Viewer-wide defaults taken from the India map configuration.
//! Keeping them in a single place makes it easier to tweak the magic numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Deepest zoom the public tile servers serve.
pub const MAX_TILE_ZOOM: u8 = 19;

/// Initial view center (longitude, latitude): the geographic center of India.
pub const DEFAULT_CENTER_LON_LAT: (f64, f64) = (78.9629, 23.5937);

/// Initial zoom level.
pub const DEFAULT_ZOOM: f64 = 4.0;

/// Duration of the animated zoom-to-extent after a search hit.
pub const SEARCH_FIT_DURATION_MS: u64 = 1500;

/// Padding (all four sides) around the extent of a search hit.
pub const SEARCH_FIT_PADDING_PX: f64 = 50.0;

/// Lengths from this many meters up are shown in kilometers.
pub const METERS_PER_KILOMETER: f64 = 1_000.0;

/// Areas from this many square meters up are shown in square kilometers.
pub const SQUARE_METERS_PER_SQUARE_KILOMETER: f64 = 1_000_000.0;

/// Pixel tolerance used when picking a drawn measurement for deletion.
pub const DELETE_HIT_TOLERANCE_PX: f64 = 5.0;

/// Decimal places used when reporting a clicked coordinate.
pub const COORDINATE_PRECISION: usize = 4;

/// Interaction tags the tool controller owns. Anything registered under one
/// of these is detached on every mode switch.
pub const DRAW_TOOL_TAG: &str = "draw_tool";
pub const DELETE_TOOL_TAG: &str = "delete_tool";
pub const INFO_CLICK_TAG: &str = "info_click";
pub const MANAGED_TAGS: [&str; 3] = [DRAW_TOOL_TAG, INFO_CLICK_TAG, DELETE_TOOL_TAG];

/// Overlay ids created by a default session.
pub const STATES_OVERLAY: &str = "states";
pub const DISTRICTS_OVERLAY: &str = "districts";
pub const ROADS_OVERLAY: &str = "roads";
