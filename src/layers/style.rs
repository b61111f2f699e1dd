use serde::{Deserialize, Serialize};

/// Stroke part of an overlay style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// CSS color string, e.g. `rgba(0, 123, 255, 1.0)` or `red`
    pub color: String,
    pub width: f64,
}

/// Fill part of an overlay style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub color: String,
}

/// Style information handed to the engine when an overlay is created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleDescriptor {
    pub stroke: Stroke,
    #[serde(default)]
    pub fill: Option<Fill>,
}

impl StyleDescriptor {
    pub fn new(stroke_color: &str, stroke_width: f64) -> Self {
        Self {
            stroke: Stroke {
                color: stroke_color.to_string(),
                width: stroke_width,
            },
            fill: None,
        }
    }

    pub fn with_fill(mut self, color: &str) -> Self {
        self.fill = Some(Fill {
            color: color.to_string(),
        });
        self
    }

    /// Blue state boundaries with a faint fill
    pub fn states() -> Self {
        Self::new("rgba(0, 123, 255, 1.0)", 2.0).with_fill("rgba(0, 123, 255, 0.1)")
    }

    /// Amber district boundaries
    pub fn districts() -> Self {
        Self::new("rgba(255, 193, 7, 0.8)", 1.0).with_fill("rgba(255, 193, 7, 0.05)")
    }

    /// Red road lines, no fill
    pub fn roads() -> Self {
        Self::new("red", 2.5)
    }
}

impl Default for StyleDescriptor {
    fn default() -> Self {
        Self::new("#3388ff", 3.0).with_fill("rgba(51, 136, 255, 0.2)")
    }
}
