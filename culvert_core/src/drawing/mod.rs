//! # Drawing Model
//!
//! A backend-agnostic scene: an ordered list of primitives, each tagged with
//! a semantic [`Layer`], plus the bounding box used to fit the view. The SVG
//! renderer and the DXF writer both consume this model, so every coordinate
//! they emit comes from the same place.
//!
//! ## Example
//!
//! ```rust
//! use culvert_core::drawing::{build, DrawingMode, DrawingModel};
//! use culvert_core::ground::GroundModel;
//! use culvert_core::section::StructuralSection;
//! use culvert_core::settings::DrawingSettings;
//!
//! let model = build(
//!     &StructuralSection::default(),
//!     &GroundModel::default(),
//!     DrawingMode::Section,
//!     &DrawingSettings::default(),
//! );
//! let DrawingModel::Scene(drawing) = model else { panic!("default section is valid") };
//! assert_eq!(drawing.bounds.unwrap().min_x, -1_500.0);
//! ```

pub mod buoyancy_view;
pub mod dimension;
pub mod section_view;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use crate::geometry::Point;
use crate::geometry::resolve;
use crate::ground::GroundModel;
use crate::project::Project;
use crate::section::StructuralSection;
use crate::settings::DrawingSettings;

/// Message shown when the section cannot be drawn.
pub const PLACEHOLDER_MESSAGE: &str = "단면제원 데이터를 입력하세요";

// ============================================================================
// Layers
// ============================================================================

/// Semantic layer of a primitive. Backends map layers to CSS classes or DXF
/// layer names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    Outer,
    Inner,
    Girder,
    GirderBracing,
    Leader,
    Ground,
    Water,
    Dimension,
    BuoyRect,
    BuoyGirder,
    BuoyTriangle,
    BuoyDashed,
    BuoyOutline,
    BuoyAntiFloat,
    BuoyLabel,
}

impl Layer {
    /// Stable lowercase identifier, used as the SVG class.
    pub fn key(&self) -> &'static str {
        match self {
            Layer::Outer => "outer",
            Layer::Inner => "inner",
            Layer::Girder => "girder",
            Layer::GirderBracing => "girder-bracing",
            Layer::Leader => "leader",
            Layer::Ground => "ground",
            Layer::Water => "water",
            Layer::Dimension => "dimension",
            Layer::BuoyRect => "buoy-rect",
            Layer::BuoyGirder => "buoy-girder",
            Layer::BuoyTriangle => "buoy-tri",
            Layer::BuoyDashed => "buoy-dashed",
            Layer::BuoyOutline => "buoy-outline",
            Layer::BuoyAntiFloat => "buoy-af",
            Layer::BuoyLabel => "buoy-label",
        }
    }
}

// ============================================================================
// Primitives
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Line {
        from: Point,
        to: Point,
    },
    /// Open or closed outline, never filled
    Polyline {
        points: Vec<Point>,
        closed: bool,
    },
    /// Filled shape (arrowheads, water markers)
    Polygon {
        points: Vec<Point>,
    },
    Text {
        at: Point,
        height: f64,
        /// Degrees counter-clockwise
        rotation: f64,
        anchor: TextAnchor,
        content: String,
    },
}

impl Primitive {
    pub fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Primitive::Line {
            from: Point::new(x1, y1),
            to: Point::new(x2, y2),
        }
    }

    pub fn polyline(points: &[(f64, f64)], closed: bool) -> Self {
        Primitive::Polyline {
            points: points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
            closed,
        }
    }

    pub fn polygon(points: &[(f64, f64)]) -> Self {
        Primitive::Polygon {
            points: points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        }
    }

    pub fn text(x: f64, y: f64, height: f64, content: impl Into<String>) -> Self {
        Primitive::Text {
            at: Point::new(x, y),
            height,
            rotation: 0.0,
            anchor: TextAnchor::Middle,
            content: content.into(),
        }
    }

    /// Every vertex of the primitive, in order. Text contributes its anchor.
    pub fn points(&self) -> Vec<Point> {
        match self {
            Primitive::Line { from, to } => vec![*from, *to],
            Primitive::Polyline { points, .. } | Primitive::Polygon { points } => points.clone(),
            Primitive::Text { at, .. } => vec![*at],
        }
    }
}

/// One primitive on one layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawOp {
    pub layer: Layer,
    pub primitive: Primitive,
}

// ============================================================================
// Bounding box / viewport
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        BoundingBox {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Receiver of the "fit to view" rectangle, implemented by whatever pans and
/// zooms the rendered drawing.
pub trait Viewport {
    fn set_bounding_box(&mut self, min_x: f64, min_y: f64, width: f64, height: f64);
}

// ============================================================================
// Drawing
// ============================================================================

/// An ordered scene plus its fit rectangle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Drawing {
    pub ops: Vec<DrawOp>,
    pub bounds: Option<BoundingBox>,
}

impl Drawing {
    pub fn new() -> Self {
        Drawing::default()
    }

    pub fn push(&mut self, layer: Layer, primitive: Primitive) {
        self.ops.push(DrawOp { layer, primitive });
    }

    /// Ops on one layer, in draw order.
    pub fn on_layer(&self, layer: Layer) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(move |op| op.layer == layer)
    }

    /// Layers that carry at least one op, in first-use order.
    pub fn used_layers(&self) -> Vec<Layer> {
        let mut layers = Vec::new();
        for op in &self.ops {
            if !layers.contains(&op.layer) {
                layers.push(op.layer);
            }
        }
        layers
    }

    /// Hand the bounding box to a viewport as its fit baseline.
    pub fn fit(&self, viewport: &mut impl Viewport) {
        if let Some(b) = self.bounds {
            viewport.set_bounding_box(b.min_x, b.min_y, b.width(), b.height());
        }
    }
}

/// Either a drawable scene or the message to show instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawingModel {
    Placeholder { message: String },
    Scene(Drawing),
}

impl DrawingModel {
    pub fn placeholder() -> Self {
        DrawingModel::Placeholder {
            message: PLACEHOLDER_MESSAGE.to_string(),
        }
    }

    pub fn scene(&self) -> Option<&Drawing> {
        match self {
            DrawingModel::Scene(d) => Some(d),
            DrawingModel::Placeholder { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DrawingMode {
    /// Dimensioned cross-section with ground and water
    #[default]
    Section,
    /// Numbered self-weight shapes
    Buoyancy,
}

/// Build the drawing for a section. Invalid sections give a placeholder.
pub fn build(
    section: &StructuralSection,
    ground: &GroundModel,
    mode: DrawingMode,
    settings: &DrawingSettings,
) -> DrawingModel {
    let Some(geom) = resolve(section, ground) else {
        return DrawingModel::placeholder();
    };
    let drawing = match mode {
        DrawingMode::Section => section_view::build(&geom, section, settings),
        DrawingMode::Buoyancy => buoyancy_view::build(&geom, section, settings),
    };
    debug!(?mode, ops = drawing.ops.len(), "built drawing");
    DrawingModel::Scene(drawing)
}

/// Build the drawing for a project using its stored settings.
pub fn build_project(project: &Project, mode: DrawingMode) -> DrawingModel {
    build(&project.section, &project.ground, mode, &project.settings)
}

/// Dimension label text: whole millimetres without decimals.
pub fn length_label(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingViewport {
        rect: Option<(f64, f64, f64, f64)>,
    }

    impl Viewport for RecordingViewport {
        fn set_bounding_box(&mut self, min_x: f64, min_y: f64, width: f64, height: f64) {
            self.rect = Some((min_x, min_y, width, height));
        }
    }

    #[test]
    fn test_placeholder_for_invalid_section() {
        let mut section = StructuralSection::default();
        section.h = -1.0;
        let model = build(&section, &GroundModel::default(), DrawingMode::Section, &DrawingSettings::default());
        assert_eq!(model, DrawingModel::placeholder());
        assert!(model.scene().is_none());
    }

    #[test]
    fn test_fit_passes_bounds_to_viewport() {
        let model = build(
            &StructuralSection::default(),
            &GroundModel::default(),
            DrawingMode::Section,
            &DrawingSettings::default(),
        );
        let mut viewport = RecordingViewport::default();
        model.scene().unwrap().fit(&mut viewport);

        // width 14400 + 2*1500, height 5600 + 2000 + 2*1500
        assert_eq!(viewport.rect, Some((-1_500.0, -1_500.0, 17_400.0, 10_600.0)));
    }

    #[test]
    fn test_length_label() {
        assert_eq!(length_label(4200.0), "4200");
        assert_eq!(length_label(14_400.0), "14400");
        assert_eq!(length_label(412.5), "412.5");
    }

    #[test]
    fn test_used_layers_in_first_use_order() {
        let mut drawing = Drawing::new();
        drawing.push(Layer::Inner, Primitive::line(0.0, 0.0, 1.0, 0.0));
        drawing.push(Layer::Outer, Primitive::line(0.0, 0.0, 0.0, 1.0));
        drawing.push(Layer::Inner, Primitive::line(1.0, 0.0, 1.0, 1.0));
        assert_eq!(drawing.used_layers(), vec![Layer::Inner, Layer::Outer]);
        assert_eq!(drawing.on_layer(Layer::Inner).count(), 2);
    }
}
