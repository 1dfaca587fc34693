//! # Drawing Settings
//!
//! Layout constants for the section and buoyancy drawings. They are stored
//! with the project so a saved file reproduces the same drawing; every field
//! falls back to its default when missing from the JSON.
//!
//! All values are in drawing units (mm).

use serde::{Deserialize, Serialize};

/// Dimension, leader, ground/water marker and padding sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingSettings {
    pub dimensions: DimensionStyle,
    pub leader: LeaderStyle,
    pub ground: GroundStyle,
    pub water: WaterStyle,
    /// Margin around the section drawing
    pub padding: f64,
    /// Margin around the buoyancy drawing
    pub buoyancy_padding: f64,
    pub labels: LabelStyle,
}

impl Default for DrawingSettings {
    fn default() -> Self {
        DrawingSettings {
            dimensions: DimensionStyle::default(),
            leader: LeaderStyle::default(),
            ground: GroundStyle::default(),
            water: WaterStyle::default(),
            padding: 1500.0,
            buoyancy_padding: 500.0,
            labels: LabelStyle::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimensionStyle {
    /// Near-tier offset from the measured edge
    pub offset: f64,
    /// Far-tier offset, used for overall height and earth cover
    pub offset_far: f64,
    /// Gap between the measured edge and the start of an extension line
    pub extension_gap: f64,
    /// Extension gap for the far tier
    pub extension_gap_far: f64,
    /// Arrowhead length; the half-width is a third of this
    pub arrow_size: f64,
    pub text_height: f64,
    /// Label distance from the dimension line, as a multiple of `text_height`
    pub text_offset_factor: f64,
}

impl Default for DimensionStyle {
    fn default() -> Self {
        DimensionStyle {
            offset: 1000.0,
            offset_far: 1500.0,
            extension_gap: 500.0,
            extension_gap_far: 1000.0,
            arrow_size: 100.0,
            text_height: 250.0,
            text_offset_factor: 0.6,
        }
    }
}

/// Leader callout for column walls (`CTC=` / `W=`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderStyle {
    pub length: f64,
    pub tick: f64,
    pub text_height: f64,
    /// Vertical distance between the two text lines
    pub line_gap: f64,
    /// Horizontal gap between the leader end and the text
    pub text_inset: f64,
}

impl Default for LeaderStyle {
    fn default() -> Self {
        LeaderStyle {
            length: 800.0,
            tick: 60.0,
            text_height: 200.0,
            line_gap: 260.0,
            text_inset: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundStyle {
    /// Ground line overhang past the structure on each side
    pub overhang: f64,
    pub hatch_spacing: f64,
    pub hatch_size: f64,
}

impl Default for GroundStyle {
    fn default() -> Self {
        GroundStyle {
            overhang: 500.0,
            hatch_spacing: 400.0,
            hatch_size: 200.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterStyle {
    pub line_length: f64,
    pub marker_base: f64,
    pub marker_height: f64,
}

impl Default for WaterStyle {
    fn default() -> Self {
        WaterStyle {
            line_length: 700.0,
            marker_base: 300.0,
            marker_height: 260.0,
        }
    }
}

/// Shape labels in the buoyancy drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelStyle {
    /// Text height as a fraction of the smaller shape side
    pub size_factor: f64,
    pub min_height: f64,
    pub max_height: f64,
    /// Triangle labels never exceed this height
    pub triangle_max_height: f64,
    /// Name text height relative to the number text; also the glyph width
    /// used for the fit test
    pub name_scale: f64,
    /// A name is shown only when it fits in this fraction of the shape width
    pub fit_ratio: f64,
}

impl Default for LabelStyle {
    fn default() -> Self {
        LabelStyle {
            size_factor: 0.13,
            min_height: 60.0,
            max_height: 220.0,
            triangle_max_height: 130.0,
            name_scale: 0.7,
            fit_ratio: 0.95,
        }
    }
}

impl LabelStyle {
    /// Text height for a shape of the given size.
    pub fn text_height(&self, width: f64, height: f64) -> f64 {
        (width * self.size_factor)
            .min(height * self.size_factor)
            .min(self.max_height)
            .max(self.min_height)
    }

    /// Label height for a triangle with the given bounding size.
    pub fn triangle_text_height(&self, width: f64, height: f64) -> f64 {
        self.text_height(width, height).min(self.triangle_max_height)
    }

    /// Whether `name` fits inside a shape `width` wide, next to a number
    /// label of `text_height`.
    pub fn name_fits(&self, name: &str, width: f64, text_height: f64) -> bool {
        let chars = name.chars().count() as f64;
        chars * self.name_scale * text_height < width * self.fit_ratio
    }
}
