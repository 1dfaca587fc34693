//! # Renderers
//!
//! Backends for the [`DrawingModel`](crate::drawing::DrawingModel): SVG for
//! screen display and DXF R12 for CAD exchange.

pub mod dxf;
pub mod svg;

use serde::{Deserialize, Serialize};

use crate::drawing::DrawingModel;
use crate::errors::CulvertResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Svg,
    Dxf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Dxf => "dxf",
        }
    }

    /// Render a model in this format. SVG always succeeds; DXF refuses a
    /// placeholder.
    pub fn render(&self, model: &DrawingModel) -> CulvertResult<String> {
        match self {
            ExportFormat::Svg => Ok(svg::render(model)),
            ExportFormat::Dxf => dxf::render(model),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_by_format() {
        let model = DrawingModel::placeholder();
        assert!(ExportFormat::Svg.render(&model).is_ok());
        assert!(ExportFormat::Dxf.render(&model).is_err());
        assert_eq!(ExportFormat::Dxf.extension(), "dxf");
    }
}
