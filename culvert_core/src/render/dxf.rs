//! DXF R12 (AC1009) export.
//!
//! Writes the same [`Drawing`] the SVG renderer consumes, so CAD and screen
//! coordinates agree. Semantic layers map onto a small set of CAD layers:
//!
//! | Layer | DXF layer | Colour |
//! |-------|-----------|--------|
//! | Outer | OUTER | 7 |
//! | Inner | INNER | 3 |
//! | Girder, GirderBracing | GIRDER | 7 |
//! | Leader | LEADER | 7 |
//! | Ground | GROUND | 3 |
//! | Water | WATER | 4 |
//! | Dimension | DIMENSION | 1 |
//! | BuoyRect, BuoyGirder, BuoyTriangle | BUOY_SHAPE | 7 |
//! | BuoyOutline | BUOY_OUTLINE | 8 |
//! | BuoyDashed | BUOY_DASHED | 7, DASHED |
//! | BuoyAntiFloat | AF | 7 |
//! | BuoyLabel | BUOY_LABEL | 2 |

use std::fmt::Write;

use crate::drawing::{Drawing, DrawingModel, Layer, Primitive, TextAnchor};
use crate::errors::{CulvertError, CulvertResult};
use crate::geometry::Point;

/// CAD layer definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DxfLayer {
    pub name: &'static str,
    /// AutoCAD colour index
    pub color: u8,
    pub linetype: &'static str,
}

const fn layer(name: &'static str, color: u8) -> DxfLayer {
    DxfLayer {
        name,
        color,
        linetype: "CONTINUOUS",
    }
}

/// CAD layer a semantic layer is written to.
pub fn dxf_layer(layer_kind: Layer) -> DxfLayer {
    match layer_kind {
        Layer::Outer => layer("OUTER", 7),
        Layer::Inner => layer("INNER", 3),
        Layer::Girder | Layer::GirderBracing => layer("GIRDER", 7),
        Layer::Leader => layer("LEADER", 7),
        Layer::Ground => layer("GROUND", 3),
        Layer::Water => layer("WATER", 4),
        Layer::Dimension => layer("DIMENSION", 1),
        Layer::BuoyRect | Layer::BuoyGirder | Layer::BuoyTriangle => layer("BUOY_SHAPE", 7),
        Layer::BuoyOutline => layer("BUOY_OUTLINE", 8),
        Layer::BuoyDashed => DxfLayer {
            name: "BUOY_DASHED",
            color: 7,
            linetype: "DASHED",
        },
        Layer::BuoyAntiFloat => layer("AF", 7),
        Layer::BuoyLabel => layer("BUOY_LABEL", 2),
    }
}

/// Serialize a drawing model. A placeholder has nothing to export.
pub fn render(model: &DrawingModel) -> CulvertResult<String> {
    match model {
        DrawingModel::Scene(drawing) => Ok(write_drawing(drawing)),
        DrawingModel::Placeholder { message } => Err(CulvertError::InvalidGeometry {
            issues: vec![message.clone()],
        }),
    }
}

/// Serialize a drawing to DXF text.
pub fn write_drawing(drawing: &Drawing) -> String {
    let mut w = DxfWriter::default();

    let mut layers: Vec<DxfLayer> = Vec::new();
    for kind in drawing.used_layers() {
        let l = dxf_layer(kind);
        if !layers.contains(&l) {
            layers.push(l);
        }
    }

    w.header();
    w.tables(&layers);

    w.section("ENTITIES");
    for op in &drawing.ops {
        let name = dxf_layer(op.layer).name;
        match &op.primitive {
            Primitive::Line { from, to } => w.line(name, *from, *to),
            Primitive::Polyline { points, closed } => w.polyline(name, points, *closed),
            Primitive::Polygon { points } => w.polyline(name, points, true),
            Primitive::Text {
                at,
                height,
                rotation,
                anchor,
                content,
            } => w.text(name, *at, *height, *rotation, *anchor, content),
        }
    }
    w.pair(0, "ENDSEC");
    w.pair(0, "EOF");
    w.out
}

#[derive(Default)]
struct DxfWriter {
    out: String,
}

impl DxfWriter {
    fn pair(&mut self, code: i32, value: impl std::fmt::Display) {
        let _ = writeln!(self.out, "{code}\n{value}");
    }

    fn coord(&mut self, code: i32, value: f64) {
        let _ = writeln!(self.out, "{code}\n{:.6}", value);
    }

    fn point(&mut self, base: i32, p: Point) {
        self.coord(base, p.x);
        self.coord(base + 10, p.y);
        self.coord(base + 20, 0.0);
    }

    fn section(&mut self, name: &str) {
        self.pair(0, "SECTION");
        self.pair(2, name);
    }

    fn header(&mut self) {
        self.section("HEADER");
        self.pair(9, "$ACADVER");
        self.pair(1, "AC1009");
        self.pair(0, "ENDSEC");
    }

    fn tables(&mut self, layers: &[DxfLayer]) {
        self.section("TABLES");

        self.pair(0, "TABLE");
        self.pair(2, "LTYPE");
        self.pair(70, 2);
        self.pair(0, "LTYPE");
        self.pair(2, "CONTINUOUS");
        self.pair(70, 0);
        self.pair(3, "Solid line");
        self.pair(72, 65);
        self.pair(73, 0);
        self.pair(40, "0.0");
        self.pair(0, "LTYPE");
        self.pair(2, "DASHED");
        self.pair(70, 0);
        self.pair(3, "Dashed __ __ __");
        self.pair(72, 65);
        self.pair(73, 2);
        self.pair(40, "300.0");
        self.pair(49, "200.0");
        self.pair(49, "-100.0");
        self.pair(0, "ENDTAB");

        self.pair(0, "TABLE");
        self.pair(2, "LAYER");
        self.pair(70, layers.len() + 1);
        self.layer_entry("0", 7, "CONTINUOUS");
        for l in layers {
            self.layer_entry(l.name, l.color, l.linetype);
        }
        self.pair(0, "ENDTAB");

        self.pair(0, "TABLE");
        self.pair(2, "STYLE");
        self.pair(70, 1);
        self.pair(0, "STYLE");
        self.pair(2, "STANDARD");
        self.pair(70, 0);
        self.pair(40, "0.0");
        self.pair(41, "1.0");
        self.pair(50, "0.0");
        self.pair(71, 0);
        self.pair(42, "250.0");
        self.pair(3, "txt");
        self.pair(4, "");
        self.pair(0, "ENDTAB");

        self.pair(0, "ENDSEC");
    }

    fn layer_entry(&mut self, name: &str, color: u8, linetype: &str) {
        self.pair(0, "LAYER");
        self.pair(2, name);
        self.pair(70, 0);
        self.pair(62, color);
        self.pair(6, linetype);
    }

    fn line(&mut self, layer: &str, from: Point, to: Point) {
        self.pair(0, "LINE");
        self.pair(8, layer);
        self.point(10, from);
        self.point(11, to);
    }

    fn polyline(&mut self, layer: &str, points: &[Point], closed: bool) {
        self.pair(0, "POLYLINE");
        self.pair(8, layer);
        self.pair(66, 1);
        self.pair(70, u8::from(closed));
        for p in points {
            self.pair(0, "VERTEX");
            self.pair(8, layer);
            self.point(10, *p);
        }
        self.pair(0, "SEQEND");
        self.pair(8, layer);
    }

    fn text(&mut self, layer: &str, at: Point, height: f64, rotation: f64, anchor: TextAnchor, content: &str) {
        let halign = match anchor {
            TextAnchor::Start => 0,
            TextAnchor::Middle => 1,
            TextAnchor::End => 2,
        };
        self.pair(0, "TEXT");
        self.pair(8, layer);
        self.point(10, at);
        self.coord(40, height);
        self.pair(1, content);
        if rotation != 0.0 {
            self.coord(50, rotation);
        }
        self.pair(72, halign);
        // alignment point; R12 ignores the first point once 72/73 are set
        self.point(11, at);
        self.pair(73, 2);
    }
}
