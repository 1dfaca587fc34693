//! Linear dimension layout.
//!
//! A dimension is two extension lines, the dimension line, an arrowhead at
//! each end and a centred label. Everything lands on [`Layer::Dimension`].

use super::{length_label, Drawing, Layer, Primitive, TextAnchor};
use crate::geometry::Point;
use crate::settings::DimensionStyle;

/// A measured span and where its dimension line sits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimension {
    pub start: f64,
    pub end: f64,
    /// Measured edge: the y of a horizontal dimension, the x of a vertical one
    pub base: f64,
    /// Signed distance from `base` to the dimension line
    pub offset: f64,
    /// Distance from `base` to where the extension lines begin
    pub gap: f64,
    /// Value printed on the label
    pub value: f64,
}

impl Dimension {
    pub fn new(start: f64, end: f64, base: f64, offset: f64, style: &DimensionStyle) -> Self {
        Dimension {
            start,
            end,
            base,
            offset,
            gap: style.extension_gap,
            value: (end - start).abs(),
        }
    }

    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    fn sign(&self) -> f64 {
        if self.offset > 0.0 {
            1.0
        } else {
            -1.0
        }
    }
}

/// Dimension along x, measured at `dim.base` (a y coordinate).
pub fn horizontal(drawing: &mut Drawing, style: &DimensionStyle, dim: &Dimension) {
    let Dimension { start: x1, end: x2, base: y, .. } = *dim;
    let sign = dim.sign();
    let dim_y = y + dim.offset;
    let ext_start = y + sign * dim.gap;
    let size = style.arrow_size;

    drawing.push(Layer::Dimension, Primitive::line(x1, ext_start, x1, dim_y));
    drawing.push(Layer::Dimension, Primitive::line(x2, ext_start, x2, dim_y));
    drawing.push(Layer::Dimension, Primitive::line(x1, dim_y, x2, dim_y));

    drawing.push(
        Layer::Dimension,
        Primitive::polygon(&[(x1, dim_y), (x1 + size, dim_y - size / 3.0), (x1 + size, dim_y + size / 3.0)]),
    );
    drawing.push(
        Layer::Dimension,
        Primitive::polygon(&[(x2, dim_y), (x2 - size, dim_y - size / 3.0), (x2 - size, dim_y + size / 3.0)]),
    );

    let text_y = dim_y + sign * style.text_offset_factor * style.text_height;
    drawing.push(Layer::Dimension, label((x1 + x2) / 2.0, text_y, 0.0, dim.value, style));
}

/// Dimension along y, measured at `dim.base` (an x coordinate). The label is
/// rotated 90 degrees.
pub fn vertical(drawing: &mut Drawing, style: &DimensionStyle, dim: &Dimension) {
    let Dimension { start: y1, end: y2, base: x, .. } = *dim;
    let sign = dim.sign();
    let dim_x = x + dim.offset;
    let ext_start = x + sign * dim.gap;
    let size = style.arrow_size;

    drawing.push(Layer::Dimension, Primitive::line(ext_start, y1, dim_x, y1));
    drawing.push(Layer::Dimension, Primitive::line(ext_start, y2, dim_x, y2));
    drawing.push(Layer::Dimension, Primitive::line(dim_x, y1, dim_x, y2));

    drawing.push(
        Layer::Dimension,
        Primitive::polygon(&[(dim_x, y1), (dim_x - size / 3.0, y1 + size), (dim_x + size / 3.0, y1 + size)]),
    );
    drawing.push(
        Layer::Dimension,
        Primitive::polygon(&[(dim_x, y2), (dim_x - size / 3.0, y2 - size), (dim_x + size / 3.0, y2 - size)]),
    );

    let text_x = dim_x + sign * style.text_offset_factor * style.text_height;
    drawing.push(Layer::Dimension, label(text_x, (y1 + y2) / 2.0, 90.0, dim.value, style));
}

fn label(x: f64, y: f64, rotation: f64, value: f64, style: &DimensionStyle) -> Primitive {
    Primitive::Text {
        at: Point::new(x, y),
        height: style.text_height,
        rotation,
        anchor: TextAnchor::Middle,
        content: length_label(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(drawing: &Drawing) -> Vec<(Point, f64, String)> {
        drawing
            .ops
            .iter()
            .filter_map(|op| match &op.primitive {
                Primitive::Text { at, rotation, content, .. } => Some((*at, *rotation, content.clone())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_horizontal_below() {
        let style = DimensionStyle::default();
        let mut drawing = Drawing::new();
        horizontal(&mut drawing, &style, &Dimension::new(0.0, 14_400.0, 0.0, -1_000.0, &style));

        // 2 extension lines, dimension line, 2 arrows, label
        assert_eq!(drawing.ops.len(), 6);
        assert_eq!(drawing.ops[0].primitive, Primitive::line(0.0, -500.0, 0.0, -1_000.0));
        assert_eq!(drawing.ops[2].primitive, Primitive::line(0.0, -1_000.0, 14_400.0, -1_000.0));

        let labels = texts(&drawing);
        assert_eq!(labels, vec![(Point::new(7_200.0, -1_150.0), 0.0, "14400".to_string())]);
    }

    #[test]
    fn test_vertical_far_tier() {
        let style = DimensionStyle::default();
        let mut drawing = Drawing::new();
        let dim = Dimension::new(0.0, 5_600.0, 14_400.0, style.offset_far, &style).with_gap(style.extension_gap_far);
        vertical(&mut drawing, &style, &dim);

        assert_eq!(drawing.ops[0].primitive, Primitive::line(15_400.0, 0.0, 15_900.0, 0.0));
        assert_eq!(
            drawing.ops[3].primitive,
            Primitive::polygon(&[
                (15_900.0, 0.0),
                (15_900.0 - 100.0 / 3.0, 100.0),
                (15_900.0 + 100.0 / 3.0, 100.0)
            ])
        );
        let labels = texts(&drawing);
        assert_eq!(labels, vec![(Point::new(16_050.0, 2_800.0), 90.0, "5600".to_string())]);
    }

    #[test]
    fn test_value_override() {
        let style = DimensionStyle::default();
        let mut drawing = Drawing::new();
        let dim = Dimension::new(7_000.0, 7_600.0, 0.0, 1_000.0, &style).with_value(600.5);
        vertical(&mut drawing, &style, &dim);
        assert_eq!(texts(&drawing)[0].2, "600.5");
    }
}
