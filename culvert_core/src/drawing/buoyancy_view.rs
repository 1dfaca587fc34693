//! Numbered self-weight shapes for the buoyancy check.
//!
//! Shapes come from [`decompose_geometry`], the same list the report is
//! written from, so `No.n` here always names the same area as `No.n` there.

use super::{BoundingBox, Drawing, Layer, Primitive};
use crate::buoyancy::{decompose_geometry, Figure, ShapeRole, WeightShape};
use crate::geometry::ResolvedGeometry;
use crate::section::StructuralSection;
use crate::settings::{DrawingSettings, LabelStyle};

pub fn build(geom: &ResolvedGeometry, section: &StructuralSection, settings: &DrawingSettings) -> Drawing {
    let mut drawing = Drawing::new();
    let (w, h) = (geom.total_width, geom.total_height);

    drawing.push(
        Layer::BuoyOutline,
        Primitive::polyline(&[(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)], true),
    );
    for cell in &geom.cells {
        drawing.push(
            Layer::BuoyOutline,
            Primitive::polyline(
                &[
                    (cell.left, cell.bottom),
                    (cell.right, cell.bottom),
                    (cell.right, cell.top),
                    (cell.left, cell.top),
                ],
                true,
            ),
        );
    }

    for shape in decompose_geometry(section, geom) {
        draw_shape(&mut drawing, &shape, &settings.labels);
    }

    let pad = settings.buoyancy_padding;
    drawing.bounds = Some(BoundingBox::new(
        geom.extent_left() - pad,
        -geom.anti_float_thickness() - pad,
        geom.extent_right() + pad,
        h + pad,
    ));
    drawing
}

fn shape_layer(role: &ShapeRole) -> Layer {
    match role {
        ShapeRole::UpperGirder { .. } | ShapeRole::LowerGirder { .. } | ShapeRole::ColumnBody { .. } => {
            Layer::BuoyGirder
        }
        ShapeRole::Haunch { .. } => Layer::BuoyTriangle,
        ShapeRole::AntiFloat { .. } => Layer::BuoyAntiFloat,
        _ => Layer::BuoyRect,
    }
}

fn draw_shape(drawing: &mut Drawing, shape: &WeightShape, labels: &LabelStyle) {
    let number = format!("No.{}", shape.number);
    let layer = shape_layer(&shape.role);

    for figure in &shape.figures {
        match figure {
            Figure::Rect { min, max, dashed: false } => {
                drawing.push(
                    layer,
                    Primitive::polyline(&[(min.x, min.y), (max.x, min.y), (max.x, max.y), (min.x, max.y)], true),
                );
                let (cx, cy) = ((min.x + max.x) / 2.0, (min.y + max.y) / 2.0);
                let width = max.x - min.x;
                let th = labels.text_height(width, max.y - min.y);
                drawing.push(Layer::BuoyLabel, Primitive::text(cx, cy + th * 0.3, th, number.clone()));

                let name = shape.role.name();
                if !name.is_empty() && labels.name_fits(&name, width, th) {
                    drawing.push(
                        Layer::BuoyLabel,
                        Primitive::text(cx, cy - th * 0.6, th * labels.name_scale, name),
                    );
                }
            }
            Figure::Rect { min, max, dashed: true } => {
                let corners = [(min.x, min.y), (max.x, min.y), (max.x, max.y), (min.x, max.y)];
                for i in 0..4 {
                    let (a, b) = (corners[i], corners[(i + 1) % 4]);
                    drawing.push(Layer::BuoyDashed, Primitive::line(a.0, a.1, b.0, b.1));
                }
                let th = labels.text_height(max.x - min.x, max.y - min.y);
                drawing.push(
                    Layer::BuoyLabel,
                    Primitive::text((min.x + max.x) / 2.0, (min.y + max.y) / 2.0, th, number.clone()),
                );
            }
            Figure::Triangle { points } => {
                let [a, b, c] = *points;
                drawing.push(layer, Primitive::polyline(&[(a.x, a.y), (b.x, b.y), (c.x, c.y)], true));

                let xs = [a.x, b.x, c.x];
                let ys = [a.y, b.y, c.y];
                let span = |v: [f64; 3]| v.iter().copied().fold(f64::MIN, f64::max) - v.iter().copied().fold(f64::MAX, f64::min);
                let th = labels.triangle_text_height(span(xs), span(ys));
                drawing.push(
                    Layer::BuoyLabel,
                    Primitive::text((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0, th, number.clone()),
                );
            }
        }
    }
}
