use crate::{
    core::geo::{Pixel, Point},
    engine::{feature::Feature, InteractionHandle},
};

/// Callback of an attached interaction, queued by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// A draw gesture completed; the feature is already in the draw layer
    DrawEnd {
        interaction: InteractionHandle,
        feature: Feature,
    },
    /// A select interaction picked a feature
    Select {
        interaction: InteractionHandle,
        feature: Feature,
    },
    /// A click interaction saw a click
    Click {
        interaction: InteractionHandle,
        pixel: Pixel,
        coordinate: Point,
    },
}

impl MapEvent {
    /// The interaction this event was raised for
    pub fn interaction(&self) -> InteractionHandle {
        match self {
            MapEvent::DrawEnd { interaction, .. }
            | MapEvent::Select { interaction, .. }
            | MapEvent::Click { interaction, .. } => *interaction,
        }
    }
}
