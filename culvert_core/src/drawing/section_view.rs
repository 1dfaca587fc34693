//! Dimensioned cross-section drawing.

use super::dimension::{self, Dimension};
use super::{length_label, BoundingBox, Drawing, Layer, Primitive, TextAnchor};
use crate::geometry::{Point, ResolvedGeometry, WallGeometry};
use crate::section::StructuralSection;
use crate::settings::DrawingSettings;

/// Build the section drawing from resolved geometry.
pub fn build(geom: &ResolvedGeometry, section: &StructuralSection, settings: &DrawingSettings) -> Drawing {
    let mut drawing = Drawing::new();

    outer_profile(&mut drawing, geom);
    inner_cells(&mut drawing, geom);
    haunch_diagonals(&mut drawing, geom);
    column_girders(&mut drawing, geom, section);
    column_leaders(&mut drawing, geom, settings);
    anti_float(&mut drawing, geom);
    ground_line(&mut drawing, geom, settings);
    water_line(&mut drawing, geom, settings);
    dimensions(&mut drawing, geom, settings);

    let pad = settings.padding;
    drawing.bounds = Some(BoundingBox::new(
        geom.extent_left() - pad,
        -pad,
        geom.extent_right() + pad,
        geom.top_extent() + pad,
    ));
    drawing
}

fn outer_profile(drawing: &mut Drawing, geom: &ResolvedGeometry) {
    let (w, h) = (geom.total_width, geom.total_height);
    let t = geom.anti_float_thickness();

    if geom.anti_float.is_some() && t > 0.0 {
        // walls stand on the slab top; the slab owns the floor line
        drawing.push(Layer::Outer, Primitive::polyline(&[(0.0, t), (0.0, h), (w, h), (w, t)], false));
        drawing.push(Layer::Outer, Primitive::line(0.0, 0.0, w, 0.0));
    } else {
        drawing.push(
            Layer::Outer,
            Primitive::polyline(&[(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)], true),
        );
    }
}

fn inner_cells(drawing: &mut Drawing, geom: &ResolvedGeometry) {
    for cell in &geom.cells {
        let c = &cell.corners;
        let (left, right, bottom, top) = (cell.left, cell.right, cell.bottom, cell.top);

        drawing.push(
            Layer::Inner,
            Primitive::line(left + c.lower_left.width, bottom, right - c.lower_right.width, bottom),
        );
        drawing.push(
            Layer::Inner,
            Primitive::line(right, bottom + c.lower_right.height, right, top - c.upper_right.height),
        );
        drawing.push(
            Layer::Inner,
            Primitive::line(right - c.upper_right.width, top, left + c.upper_left.width, top),
        );
        drawing.push(
            Layer::Inner,
            Primitive::line(left, top - c.upper_left.height, left, bottom + c.lower_left.height),
        );
    }
}

fn haunch_diagonals(drawing: &mut Drawing, geom: &ResolvedGeometry) {
    for cell in &geom.cells {
        let c = &cell.corners;
        let (left, right, bottom, top) = (cell.left, cell.right, cell.bottom, cell.top);

        if c.upper_left.is_present() {
            drawing.push(
                Layer::Inner,
                Primitive::line(left, top - c.upper_left.height, left + c.upper_left.width, top),
            );
        }
        if c.upper_right.is_present() {
            drawing.push(
                Layer::Inner,
                Primitive::line(right - c.upper_right.width, top, right, top - c.upper_right.height),
            );
        }
        if c.lower_left.is_present() {
            drawing.push(
                Layer::Inner,
                Primitive::line(left, bottom + c.lower_left.height, left + c.lower_left.width, bottom),
            );
        }
        if c.lower_right.is_present() {
            drawing.push(
                Layer::Inner,
                Primitive::line(right - c.lower_right.width, bottom, right, bottom + c.lower_right.height),
            );
        }
    }
}

fn column_walls(geom: &ResolvedGeometry) -> impl Iterator<Item = &WallGeometry> {
    geom.walls.iter().filter(|w| w.column.is_some())
}

fn column_girders(drawing: &mut Drawing, geom: &ResolvedGeometry, section: &StructuralSection) {
    let upper_extra = section.column_girder.upper_extra_height;
    let lower_extra = section.column_girder.lower_extra_height;
    if upper_extra <= 0.0 && lower_extra <= 0.0 {
        return;
    }

    for wall in column_walls(geom) {
        let Some(column) = wall.column else { continue };
        let (l, r) = (wall.left, wall.right);

        if upper_extra > 0.0 {
            let y_start = geom.inner_top - wall.haunch.upper.height;
            let y_end = y_start - upper_extra;
            girder_outline(drawing, l, r, y_start, y_end);
        }
        if lower_extra > 0.0 {
            let y_start = geom.inner_bottom + wall.haunch.lower.height;
            let y_end = y_start + lower_extra;
            girder_outline(drawing, l, r, y_start, y_end);
        }

        let x_top = geom.inner_top - column.upper_girder_depth;
        let x_bottom = geom.inner_bottom + column.lower_girder_depth;
        if x_top > x_bottom {
            drawing.push(Layer::GirderBracing, Primitive::line(l, x_top, r, x_bottom));
            drawing.push(Layer::GirderBracing, Primitive::line(r, x_top, l, x_bottom));
        }
    }
}

/// Girder sides and its inner edge; the outer edge is the haunch line.
fn girder_outline(drawing: &mut Drawing, left: f64, right: f64, y_start: f64, y_end: f64) {
    drawing.push(Layer::Girder, Primitive::line(left, y_start, left, y_end));
    drawing.push(Layer::Girder, Primitive::line(right, y_start, right, y_end));
    drawing.push(Layer::Girder, Primitive::line(left, y_end, right, y_end));
}

fn column_leaders(drawing: &mut Drawing, geom: &ResolvedGeometry, settings: &DrawingSettings) {
    let style = &settings.leader;
    let mid_y = (geom.inner_bottom + geom.inner_top) / 2.0;

    for wall in column_walls(geom) {
        let Some(column) = wall.column else { continue };
        let end = wall.right + style.length;

        drawing.push(Layer::Leader, Primitive::line(wall.right, mid_y, end, mid_y));
        drawing.push(Layer::Leader, Primitive::line(end, mid_y, end, mid_y + style.tick));

        let lines = [
            (mid_y + style.line_gap / 2.0, format!("CTC={}", length_label(column.spacing))),
            (mid_y - style.line_gap / 2.0, format!("W={}", length_label(column.width))),
        ];
        for (y, content) in lines {
            drawing.push(
                Layer::Leader,
                Primitive::Text {
                    at: Point::new(end + style.text_inset, y),
                    height: style.text_height,
                    rotation: 0.0,
                    anchor: TextAnchor::Start,
                    content,
                },
            );
        }
    }
}

fn anti_float(drawing: &mut Drawing, geom: &ResolvedGeometry) {
    let Some(af) = geom.anti_float else { return };
    let t = af.thickness;
    if af.left_extension <= 0.0 && af.right_extension <= 0.0 && t <= 0.0 {
        return;
    }

    let w = geom.total_width;
    if af.left_extension > 0.0 {
        drawing.push(
            Layer::Outer,
            Primitive::polyline(&[(0.0, t), (af.left, t), (af.left, 0.0), (0.0, 0.0)], false),
        );
    }
    if af.right_extension > 0.0 {
        drawing.push(
            Layer::Outer,
            Primitive::polyline(&[(w, t), (af.right, t), (af.right, 0.0), (w, 0.0)], false),
        );
    }
}

fn ground_line(drawing: &mut Drawing, geom: &ResolvedGeometry, settings: &DrawingSettings) {
    let Some(ground_y) = geom.ground_level else { return };
    let style = &settings.ground;
    let left = geom.extent_left() - style.overhang;
    let right = geom.extent_right() + style.overhang;

    drawing.push(Layer::Ground, Primitive::line(left, ground_y, right, ground_y));

    if style.hatch_spacing <= 0.0 {
        return;
    }
    let mut x = left + style.hatch_spacing / 2.0;
    while x <= right {
        drawing.push(
            Layer::Ground,
            Primitive::line(x, ground_y, x - style.hatch_size, ground_y - style.hatch_size),
        );
        x += style.hatch_spacing;
    }
}

fn water_line(drawing: &mut Drawing, geom: &ResolvedGeometry, settings: &DrawingSettings) {
    let Some(water_y) = geom.water_level else { return };
    let style = &settings.water;
    let w = geom.total_width;

    for (face, outward) in [(w, 1.0), (0.0, -1.0)] {
        let line_end = face + outward * style.line_length;
        drawing.push(Layer::Water, Primitive::line(face, water_y, line_end, water_y));

        let cx = face + outward * style.line_length / 2.0;
        let base_y = water_y + style.marker_height;
        drawing.push(
            Layer::Water,
            Primitive::polygon(&[
                (cx - style.marker_base / 2.0, base_y),
                (cx + style.marker_base / 2.0, base_y),
                (cx, water_y),
            ]),
        );
    }
}

fn dimensions(drawing: &mut Drawing, geom: &ResolvedGeometry, settings: &DrawingSettings) {
    let s = &settings.dimensions;
    let (w, th) = (geom.total_width, geom.total_height);
    let (near, far) = (s.offset, s.offset_far);
    let left_x = geom.extent_left();
    let right_x = geom.extent_right();
    let top = geom.inner_top;
    let bottom = geom.inner_bottom;

    // overall width, below
    dimension::horizontal(drawing, s, &Dimension::new(0.0, w, 0.0, -near, s));

    // overall height, right far tier
    dimension::vertical(
        drawing,
        s,
        &Dimension::new(0.0, th, right_x, far, s).with_gap(s.extension_gap_far),
    );

    // clear height, left
    dimension::vertical(drawing, s, &Dimension::new(bottom, top, left_x, -near, s));

    for cell in &geom.cells {
        dimension::horizontal(drawing, s, &Dimension::new(cell.left, cell.right, th, near, s));
    }

    // slabs, left
    dimension::vertical(drawing, s, &Dimension::new(top, th, left_x, -near, s));
    dimension::vertical(drawing, s, &Dimension::new(0.0, bottom, left_x, -near, s));

    // outer walls, top
    dimension::horizontal(drawing, s, &Dimension::new(0.0, geom.left_wall, th, near, s));
    dimension::horizontal(drawing, s, &Dimension::new(w - geom.right_wall, w, th, near, s));

    for wall in &geom.walls {
        dimension::horizontal(drawing, s, &Dimension::new(wall.left, wall.right, th, near, s));
    }

    if let Some(af) = geom.anti_float {
        if af.left_extension > 0.0 {
            dimension::horizontal(drawing, s, &Dimension::new(af.left, 0.0, 0.0, -near, s));
        }
        if af.thickness > 0.0 {
            dimension::vertical(drawing, s, &Dimension::new(0.0, af.thickness, af.left, -near, s));
        }
    }

    let Some(ground_y) = geom.ground_level else { return };
    dimension::vertical(
        drawing,
        s,
        &Dimension::new(th, ground_y, right_x, far, s)
            .with_gap(s.extension_gap_far)
            .with_value(geom.earth_cover),
    );

    if let Some(water_y) = geom.water_level {
        dimension::vertical(
            drawing,
            s,
            &Dimension::new(water_y, ground_y, right_x, near, s).with_value(geom.groundwater_depth),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::resolve;
    use crate::ground::GroundModel;
    use crate::section::MiddleWall;

    fn draw(section: &StructuralSection, ground: &GroundModel) -> Drawing {
        let geom = resolve(section, ground).unwrap();
        build(&geom, section, &DrawingSettings::default())
    }

    fn labels(drawing: &Drawing, layer: Layer) -> Vec<String> {
        drawing
            .on_layer(layer)
            .filter_map(|op| match &op.primitive {
                Primitive::Text { content, .. } => Some(content.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_default_dimension_labels() {
        let drawing = draw(&StructuralSection::default(), &GroundModel::default());
        let dims = labels(&drawing, Layer::Dimension);
        assert_eq!(
            dims,
            vec![
                "14400", "5600", "4200", "4000", "4000", "4000", "600", "800", "600", "600", "600", "600",
                "2000", "3000",
            ]
        );
    }

    #[test]
    fn test_closed_outer_profile_without_anti_float() {
        let drawing = draw(&StructuralSection::default(), &GroundModel::default());
        let outer: Vec<_> = drawing.on_layer(Layer::Outer).collect();
        assert_eq!(outer.len(), 1);
        assert!(matches!(outer[0].primitive, Primitive::Polyline { closed: true, .. }));
    }

    #[test]
    fn test_inner_lines_shortened_by_haunch() {
        let drawing = draw(&StructuralSection::default(), &GroundModel::default());
        let first = &drawing.on_layer(Layer::Inner).next().unwrap().primitive;
        assert_eq!(*first, Primitive::line(750.0, 800.0, 4_450.0, 800.0));
        // 4 edges and 4 diagonals per cell
        assert_eq!(drawing.on_layer(Layer::Inner).count(), 24);
    }

    #[test]
    fn test_anti_float_profile_and_dimensions() {
        let mut section = StructuralSection::default();
        section.anti_float.enabled = true;
        let drawing = draw(&section, &GroundModel::default());

        let outer: Vec<_> = drawing.on_layer(Layer::Outer).map(|op| &op.primitive).collect();
        // open profile, floor line, two protrusions
        assert_eq!(outer.len(), 4);
        assert_eq!(*outer[1], Primitive::line(0.0, 0.0, 14_400.0, 0.0));

        let dims = labels(&drawing, Layer::Dimension);
        assert!(dims.contains(&"500".to_string()));
        assert!(dims.contains(&"300".to_string()));

        let bounds = drawing.bounds.unwrap();
        assert_eq!(bounds.min_x, -2_000.0);
        assert_eq!(bounds.max_x, 16_400.0);
    }

    #[test]
    fn test_column_girders_and_leader() {
        let mut section = StructuralSection::default();
        section.middle_walls[0] = MiddleWall::Column { thickness: 600.0 };
        section.column_girder.upper_extra_height = 300.0;
        let drawing = draw(&section, &GroundModel::default());

        assert_eq!(drawing.on_layer(Layer::Girder).count(), 3);
        let bracing: Vec<_> = drawing.on_layer(Layer::GirderBracing).map(|op| &op.primitive).collect();
        assert_eq!(*bracing[0], Primitive::line(4_600.0, 4_550.0, 5_200.0, 950.0));

        assert_eq!(labels(&drawing, Layer::Leader), vec!["CTC=3000", "W=500"]);
    }

    #[test]
    fn test_no_cover_hides_ground_and_depth_dimension() {
        let ground = GroundModel {
            earth_cover_depth: 0.0,
            ..GroundModel::default()
        };
        let drawing = draw(&StructuralSection::default(), &ground);
        assert_eq!(drawing.on_layer(Layer::Ground).count(), 0);
        // water line still drawn
        assert_eq!(drawing.on_layer(Layer::Water).count(), 4);
        assert!(!labels(&drawing, Layer::Dimension).contains(&"3000".to_string()));
    }

    #[test]
    fn test_hatch_spacing() {
        let drawing = draw(&StructuralSection::default(), &GroundModel::default());
        // ground line from -500 to 14900; hatches from -300 step 400
        let hatches = drawing.on_layer(Layer::Ground).count() - 1;
        assert_eq!(hatches, 39);
    }
}
