//! SVG output.
//!
//! The scene is written in world coordinates (mm, y up) inside one
//! `main-group` flipped with `scale(1,-1)`. Text is flipped back so it reads
//! upright.

use std::fmt::Write;

use crate::drawing::{BoundingBox, DrawOp, Drawing, DrawingModel, Primitive, TextAnchor};
use crate::geometry::Point;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

const STYLE: &str = "\
.outer{stroke:#000;stroke-width:20;fill:none}\
.inner{stroke:#0aa;stroke-width:12;fill:none}\
.girder{stroke:#000;stroke-width:12;fill:none}\
.girder-bracing{stroke:#888;stroke-width:8;fill:none}\
.leader{stroke:#000;stroke-width:8;fill:#000}\
.ground{stroke:#7a5230;stroke-width:12;fill:none}\
.water{stroke:#1565c0;stroke-width:12;fill:#1565c0}\
.dimension{stroke:#d32f2f;stroke-width:6;fill:#d32f2f}\
.buoy-outline{stroke:#bbb;stroke-width:8;fill:none}\
.buoy-rect,.buoy-girder,.buoy-tri,.buoy-af{stroke:#000;stroke-width:12;fill:none}\
.buoy-dashed{stroke:#000;stroke-width:10;stroke-dasharray:80 60;fill:none}\
.buoy-label{fill:#b8860b;stroke:none}\
text{stroke:none;font-family:sans-serif}";

/// Render a drawing model as a standalone SVG document.
pub fn render(model: &DrawingModel) -> String {
    match model {
        DrawingModel::Placeholder { message } => render_placeholder(message),
        DrawingModel::Scene(drawing) => render_drawing(drawing),
    }
}

fn render_placeholder(message: &str) -> String {
    format!(
        "<svg xmlns=\"{SVG_NS}\" viewBox=\"0 0 400 200\">\
<text x=\"50%\" y=\"50%\" text-anchor=\"middle\" dominant-baseline=\"middle\" fill=\"#666\" font-size=\"14\">{}</text>\
</svg>\n",
        escape(message)
    )
}

fn render_drawing(drawing: &Drawing) -> String {
    let mut out = String::new();
    let bounds = drawing.bounds.unwrap_or(BoundingBox::new(0.0, 0.0, 400.0, 200.0));

    // viewBox y is the negated top edge because the group flips y
    let _ = writeln!(
        out,
        "<svg xmlns=\"{SVG_NS}\" viewBox=\"{} {} {} {}\">",
        num(bounds.min_x),
        num(-bounds.max_y),
        num(bounds.width()),
        num(bounds.height())
    );
    let _ = writeln!(out, "<style>{STYLE}</style>");
    out.push_str("<g class=\"main-group\" transform=\"scale(1,-1)\">\n");

    for op in &drawing.ops {
        write_op(&mut out, op);
    }

    out.push_str("</g>\n</svg>\n");
    out
}

fn write_op(out: &mut String, op: &DrawOp) {
    let class = op.layer.key();
    match &op.primitive {
        Primitive::Line { from, to } => {
            let _ = writeln!(
                out,
                "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" class=\"{class}\"/>",
                num(from.x),
                num(from.y),
                num(to.x),
                num(to.y)
            );
        }
        Primitive::Polyline { points, closed } => {
            let tag = if *closed { "polygon" } else { "polyline" };
            let _ = writeln!(
                out,
                "<{tag} points=\"{}\" class=\"{class}\" fill=\"none\"/>",
                points_attr(points)
            );
        }
        Primitive::Polygon { points } => {
            let _ = writeln!(out, "<polygon points=\"{}\" class=\"{class}\"/>", points_attr(points));
        }
        Primitive::Text {
            at,
            height,
            rotation,
            anchor,
            content,
        } => {
            let mut transform = format!("scale(1,-1) translate(0,{})", num(-2.0 * at.y));
            if *rotation != 0.0 {
                let _ = write!(transform, " rotate({},{},{})", num(-rotation), num(at.x), num(at.y));
            }
            let _ = writeln!(
                out,
                "<text x=\"{}\" y=\"{}\" class=\"{class}\" font-size=\"{}\" text-anchor=\"{}\" dominant-baseline=\"middle\" transform=\"{transform}\">{}</text>",
                num(at.x),
                num(at.y),
                num(*height),
                anchor_attr(*anchor),
                escape(content)
            );
        }
    }
}

fn anchor_attr(anchor: TextAnchor) -> &'static str {
    match anchor {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "middle",
        TextAnchor::End => "end",
    }
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", num(p.x), num(p.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Shortest exact decimal; `-0` prints as `0`.
fn num(v: f64) -> String {
    if v == 0.0 {
        "0".to_string()
    } else {
        format!("{}", v)
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::{build, DrawingMode};
    use crate::ground::GroundModel;
    use crate::section::StructuralSection;
    use crate::settings::DrawingSettings;

    fn section_svg() -> String {
        let model = build(
            &StructuralSection::default(),
            &GroundModel::default(),
            DrawingMode::Section,
            &DrawingSettings::default(),
        );
        render(&model)
    }

    #[test]
    fn test_placeholder_svg() {
        let svg = render(&DrawingModel::placeholder());
        assert!(svg.contains("viewBox=\"0 0 400 200\""));
        assert!(svg.contains("단면제원 데이터를 입력하세요"));
        assert!(!svg.contains("main-group"));
    }

    #[test]
    fn test_viewbox_is_flipped_bounds() {
        let svg = section_svg();
        // x from -1500, top at 7600 + 1500
        assert!(svg.contains("viewBox=\"-1500 -9100 17400 10600\""));
        assert!(svg.contains("<g class=\"main-group\" transform=\"scale(1,-1)\">"));
    }

    #[test]
    fn test_closed_outline_is_unfilled_polygon() {
        let svg = section_svg();
        assert!(svg.contains("<polygon points=\"0,0 14400,0 14400,5600 0,5600\" class=\"outer\" fill=\"none\"/>"));
    }

    #[test]
    fn test_vertical_text_counter_flipped_and_rotated() {
        let svg = section_svg();
        // overall height label at x = 14400 + 1500 + 150
        assert!(svg.contains("transform=\"scale(1,-1) translate(0,-5600) rotate(-90,16050,2800)\">5600</text>"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }
}
