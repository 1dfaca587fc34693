//! # Geometry Resolver
//!
//! Turns a [`StructuralSection`] and [`GroundModel`] into absolute
//! coordinates. The origin is the bottom-left corner of the structure, x to
//! the right and y up, in mm.
//!
//! Nothing here allocates drawing primitives; the drawing builders and the
//! buoyancy decomposition read from [`ResolvedGeometry`].
//!
//! ## Example
//!
//! ```rust
//! use culvert_core::geometry::resolve;
//! use culvert_core::ground::GroundModel;
//! use culvert_core::section::StructuralSection;
//!
//! let geom = resolve(&StructuralSection::default(), &GroundModel::default()).unwrap();
//! assert_eq!(geom.total_width, 14_400.0);
//! assert_eq!(geom.cells[1].left, 5_200.0);
//! assert_eq!(geom.ground_level, Some(7_600.0));
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ground::GroundModel;
use crate::section::{CellCorners, CornerPair, MiddleWall, StructuralSection};

/// A point in drawing coordinates (mm).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// One cell opening.
#[derive(Debug, Clone, PartialEq)]
pub struct CellGeometry {
    pub index: usize,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
    pub corners: CellCorners,
}

impl CellGeometry {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }
}

/// Column-type interior wall: girders under the top slab and over the bottom
/// slab, with the column body between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnGeometry {
    /// Upper haunch height plus the extra upper girder depth
    pub upper_girder_depth: f64,
    /// Lower haunch height plus the extra lower girder depth
    pub lower_girder_depth: f64,
    /// H minus both girder depths; may be zero or negative
    pub clear_height: f64,
    pub spacing: f64,
    pub width: f64,
}

impl ColumnGeometry {
    /// No column body fits between the girders.
    pub fn is_degenerate(&self) -> bool {
        self.clear_height <= 0.0
    }
}

/// One interior wall.
#[derive(Debug, Clone, PartialEq)]
pub struct WallGeometry {
    pub index: usize,
    pub left: f64,
    pub right: f64,
    pub kind: MiddleWall,
    pub haunch: CornerPair,
    /// Present for column walls only
    pub column: Option<ColumnGeometry>,
}

impl WallGeometry {
    pub fn thickness(&self) -> f64 {
        self.right - self.left
    }
}

/// Anti-floatation slab extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AntiFloatGeometry {
    /// Leftmost x (negative of the left extension)
    pub left: f64,
    /// Rightmost x (total width plus the right extension)
    pub right: f64,
    pub left_extension: f64,
    pub right_extension: f64,
    pub thickness: f64,
}

/// Every coordinate the drawings and the buoyancy check need.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedGeometry {
    pub total_width: f64,
    pub total_height: f64,
    /// Cell floor level (= LT)
    pub inner_bottom: f64,
    /// Cell soffit level (= LT + H)
    pub inner_top: f64,
    pub left_wall: f64,
    pub right_wall: f64,
    pub cells: Vec<CellGeometry>,
    pub walls: Vec<WallGeometry>,
    pub anti_float: Option<AntiFloatGeometry>,
    /// Ground surface, when there is earth cover
    pub ground_level: Option<f64>,
    /// Water table, when a groundwater depth is given
    pub water_level: Option<f64>,
    pub earth_cover: f64,
    pub groundwater_depth: f64,
}

impl ResolvedGeometry {
    /// Leftmost x of anything structural.
    pub fn extent_left(&self) -> f64 {
        self.anti_float.map_or(0.0, |af| af.left)
    }

    /// Rightmost x of anything structural.
    pub fn extent_right(&self) -> f64 {
        self.anti_float.map_or(self.total_width, |af| af.right)
    }

    /// Top of the drawing content: ground surface, or the top slab.
    pub fn top_extent(&self) -> f64 {
        self.total_height + self.earth_cover.max(0.0)
    }

    /// Thickness of the anti-float slab, zero when absent.
    pub fn anti_float_thickness(&self) -> f64 {
        self.anti_float.map_or(0.0, |af| af.thickness)
    }
}

/// Resolve a section into absolute geometry.
///
/// Returns `None` when the section fails validation; callers show a
/// placeholder instead.
pub fn resolve(section: &StructuralSection, ground: &GroundModel) -> Option<ResolvedGeometry> {
    let issues = section.validate();
    if !issues.is_empty() {
        debug!(issue_count = issues.len(), "section not resolvable");
        return None;
    }

    let inner_bottom = section.bottom_slab;
    let inner_top = section.bottom_slab + section.h;
    let cell_count = section.cell_widths.len();

    let mut cells = Vec::with_capacity(cell_count);
    let mut walls = Vec::with_capacity(cell_count.saturating_sub(1));
    let mut x = section.left_wall;

    for (i, width) in section.cell_widths.iter().enumerate() {
        cells.push(CellGeometry {
            index: i,
            left: x,
            right: x + width,
            bottom: inner_bottom,
            top: inner_top,
            corners: section.cell_corners(i),
        });
        x += width;

        if i + 1 < cell_count {
            let kind = section
                .middle_walls
                .get(i)
                .copied()
                .unwrap_or(MiddleWall::Continuous { thickness: 0.0 });
            let haunch = section.middle_haunch(i);
            let column = match kind {
                MiddleWall::Column { .. } => Some(column_geometry(section, &haunch)),
                MiddleWall::Continuous { .. } => None,
            };
            if let Some(col) = column.filter(ColumnGeometry::is_degenerate) {
                warn!(
                    wall = i + 1,
                    clear_height = col.clear_height,
                    "column girders fill the full clear height; no column body"
                );
            }
            walls.push(WallGeometry {
                index: i,
                left: x,
                right: x + kind.thickness(),
                kind,
                haunch,
                column,
            });
            x += kind.thickness();
        }
    }

    let total_width = x + section.right_wall;
    let total_height = section.total_height();

    let af = &section.anti_float;
    let anti_float = af.enabled.then(|| AntiFloatGeometry {
        left: -af.left_extension,
        right: total_width + af.right_extension,
        left_extension: af.left_extension,
        right_extension: af.right_extension,
        thickness: af.thickness,
    });

    let ground_level = ground.has_cover().then(|| total_height + ground.earth_cover_depth);
    let water_level = ground
        .has_groundwater()
        .then(|| total_height + ground.earth_cover_depth.max(0.0) - ground.groundwater_depth);

    debug!(
        cells = cells.len(),
        total_width, total_height, "resolved section geometry"
    );

    Some(ResolvedGeometry {
        total_width,
        total_height,
        inner_bottom,
        inner_top,
        left_wall: section.left_wall,
        right_wall: section.right_wall,
        cells,
        walls,
        anti_float,
        ground_level,
        water_level,
        earth_cover: ground.earth_cover_depth,
        groundwater_depth: ground.groundwater_depth,
    })
}

fn column_geometry(section: &StructuralSection, haunch: &CornerPair) -> ColumnGeometry {
    let girder = &section.column_girder;
    let upper_girder_depth = haunch.upper.height.max(0.0) + girder.upper_extra_height.max(0.0);
    let lower_girder_depth = haunch.lower.height.max(0.0) + girder.lower_extra_height.max(0.0);
    ColumnGeometry {
        upper_girder_depth,
        lower_girder_depth,
        clear_height: section.h - upper_girder_depth - lower_girder_depth,
        spacing: girder.column_spacing,
        width: girder.column_width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let geom = resolve(&StructuralSection::default(), &GroundModel::default()).unwrap();
        assert_eq!(geom.total_width, 14_400.0);
        assert_eq!(geom.total_height, 5_600.0);
        assert_eq!(geom.inner_bottom, 800.0);
        assert_eq!(geom.inner_top, 5_000.0);

        let lefts: Vec<f64> = geom.cells.iter().map(|c| c.left).collect();
        assert_eq!(lefts, vec![600.0, 5_200.0, 9_800.0]);
        assert_eq!(geom.walls[0].left, 4_600.0);
        assert_eq!(geom.walls[1].right, 9_800.0);

        assert_eq!(geom.ground_level, Some(7_600.0));
        assert_eq!(geom.water_level, Some(4_600.0));
        assert!(geom.anti_float.is_none());
    }

    #[test]
    fn test_invalid_section_is_none() {
        let mut section = StructuralSection::default();
        section.h = 0.0;
        assert!(resolve(&section, &GroundModel::default()).is_none());
    }

    #[test]
    fn test_column_geometry() {
        let mut section = StructuralSection::default();
        section.middle_walls[0] = MiddleWall::Column { thickness: 500.0 };
        section.column_girder.upper_extra_height = 300.0;

        let geom = resolve(&section, &GroundModel::default()).unwrap();
        let col = geom.walls[0].column.unwrap();
        assert_eq!(col.upper_girder_depth, 450.0);
        assert_eq!(col.lower_girder_depth, 150.0);
        assert_eq!(col.clear_height, 3_600.0);
        assert!(!col.is_degenerate());
        assert!(geom.walls[1].column.is_none());
    }

    #[test]
    fn test_degenerate_column_is_not_an_error() {
        let mut section = StructuralSection::default();
        section.middle_walls[1] = MiddleWall::Column { thickness: 600.0 };
        section.column_girder.upper_extra_height = 2_000.0;
        section.column_girder.lower_extra_height = 2_000.0;

        let geom = resolve(&section, &GroundModel::default()).unwrap();
        assert!(geom.walls[1].column.unwrap().is_degenerate());
    }

    #[test]
    fn test_anti_float_extents() {
        let mut section = StructuralSection::default();
        section.anti_float.enabled = true;
        section.anti_float.left_extension = 700.0;

        let geom = resolve(&section, &GroundModel::default()).unwrap();
        assert_eq!(geom.extent_left(), -700.0);
        assert_eq!(geom.extent_right(), 14_900.0);
        assert_eq!(geom.anti_float_thickness(), 300.0);
    }

    #[test]
    fn test_no_cover_no_ground_line() {
        let ground = GroundModel {
            earth_cover_depth: 0.0,
            groundwater_depth: 1_000.0,
            ..GroundModel::default()
        };
        let geom = resolve(&StructuralSection::default(), &ground).unwrap();
        assert!(geom.ground_level.is_none());
        assert_eq!(geom.water_level, Some(4_600.0));
    }
}
