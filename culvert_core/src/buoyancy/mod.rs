//! # Buoyancy Check
//!
//! Splits the structure into numbered rectangles and triangles, sums their
//! self-weight per metre run, adds the soil surcharge and compares the total
//! against hydrostatic uplift.
//!
//! The same [`WeightShape`] list feeds the buoyancy drawing and the text
//! report, so shape numbers always agree between the two.
//!
//! ## Example
//!
//! ```rust
//! use culvert_core::buoyancy::{check, Verdict};
//! use culvert_core::ground::GroundModel;
//! use culvert_core::section::StructuralSection;
//!
//! let result = check(&StructuralSection::default(), &GroundModel::default()).unwrap();
//! assert!((result.uplift.0 - 649.8144).abs() < 1e-9);
//! assert_eq!(result.verdict, Verdict::Pass);
//! ```

pub mod report;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::{resolve, Point, ResolvedGeometry};
use crate::ground::GroundModel;
use crate::section::{Corner, CornerPosition, StructuralSection, WallRef};
use crate::units::{KnPerCubicMeter, KnPerMeter, SquareMillimeters};

pub use report::{generate_report, render};

/// Unit weight of reinforced concrete
pub const GAMMA_CONCRETE: KnPerCubicMeter = KnPerCubicMeter(24.5);
/// Unit weight of water
pub const GAMMA_WATER: KnPerCubicMeter = KnPerCubicMeter(9.81);
/// Minimum factor of safety against uplift
pub const REQUIRED_SAFETY_FACTOR: f64 = 1.20;

// ============================================================================
// Shapes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Rectangle,
    Triangle,
}

/// What part of the structure a shape stands for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShapeRole {
    TopSlab,
    BottomSlab,
    LeftWall,
    /// Continuous interior wall (0-based wall index)
    MiddleWall { wall: usize },
    UpperGirder {
        wall: usize,
        haunch_height: f64,
        extra_height: f64,
    },
    LowerGirder {
        wall: usize,
        haunch_height: f64,
        extra_height: f64,
    },
    /// Column between the girders, weighed per metre using the column spacing
    ColumnBody {
        wall: usize,
        column_width: f64,
        spacing: f64,
        upper_girder_depth: f64,
        lower_girder_depth: f64,
    },
    RightWall,
    Haunch {
        wall: WallRef,
        position: CornerPosition,
    },
    AntiFloat {
        left_extension: f64,
        right_extension: f64,
    },
}

impl ShapeRole {
    /// Short name written inside the shape on the buoyancy drawing.
    pub fn name(&self) -> String {
        match self {
            ShapeRole::TopSlab => "상부슬래브".to_string(),
            ShapeRole::BottomSlab => "하부슬래브".to_string(),
            ShapeRole::LeftWall => "좌측벽".to_string(),
            ShapeRole::MiddleWall { wall } => format!("중간벽{}", wall + 1),
            ShapeRole::UpperGirder { .. } => "상부거더".to_string(),
            ShapeRole::LowerGirder { .. } => "하부거더".to_string(),
            ShapeRole::ColumnBody { wall, .. } => format!("기둥{}", wall + 1),
            ShapeRole::RightWall => "우측벽".to_string(),
            ShapeRole::Haunch { .. } => String::new(),
            ShapeRole::AntiFloat { .. } => "부상방지저판".to_string(),
        }
    }

    /// Label used in the report heading for this shape.
    pub fn label(&self) -> String {
        match self {
            ShapeRole::TopSlab => "상부슬래브".to_string(),
            ShapeRole::BottomSlab => "하부슬래브".to_string(),
            ShapeRole::LeftWall => "좌측벽체".to_string(),
            ShapeRole::MiddleWall { wall } => format!("중간벽체{} (연속벽)", wall + 1),
            ShapeRole::UpperGirder { wall, .. } => format!("중간벽체{} 상부종거더 (연속)", wall + 1),
            ShapeRole::LowerGirder { wall, .. } => format!("중간벽체{} 하부종거더 (연속)", wall + 1),
            ShapeRole::ColumnBody { wall, .. } => format!("중간벽체{} 기둥본체 (CTC 고려)", wall + 1),
            ShapeRole::RightWall => "우측벽체".to_string(),
            ShapeRole::Haunch { wall, position } => {
                let pos = match position {
                    CornerPosition::Upper => "상부헌치",
                    CornerPosition::Lower => "하부헌치",
                };
                match wall {
                    WallRef::Left => format!("좌측벽 {}", pos),
                    WallRef::Middle(i) => format!("중간벽{} {} (양쪽 2개)", i + 1, pos),
                    WallRef::Right => format!("우측벽 {}", pos),
                }
            }
            ShapeRole::AntiFloat { .. } => "부상방지저판".to_string(),
        }
    }

    /// Interior wall this shape belongs to, if any.
    pub fn wall_index(&self) -> Option<usize> {
        match self {
            ShapeRole::MiddleWall { wall }
            | ShapeRole::UpperGirder { wall, .. }
            | ShapeRole::LowerGirder { wall, .. }
            | ShapeRole::ColumnBody { wall, .. } => Some(*wall),
            ShapeRole::Haunch {
                wall: WallRef::Middle(i),
                ..
            } => Some(*i),
            _ => None,
        }
    }
}

/// Where a shape sits on the buoyancy drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Figure {
    Rect { min: Point, max: Point, dashed: bool },
    Triangle { points: [Point; 3] },
}

impl Figure {
    fn rect(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Figure::Rect {
            min: Point::new(x1.min(x2), y1.min(y2)),
            max: Point::new(x1.max(x2), y1.max(y2)),
            dashed: false,
        }
    }

    fn triangle(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Self {
        Figure::Triangle {
            points: [Point::new(a.0, a.1), Point::new(b.0, b.1), Point::new(c.0, c.1)],
        }
    }
}

/// One numbered self-weight shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightShape {
    /// 1-based, in construction order
    pub number: usize,
    pub role: ShapeRole,
    pub kind: ShapeKind,
    /// Horizontal size (mm)
    pub width: f64,
    /// Vertical size (mm)
    pub height: f64,
    /// Weighed area per metre run, after doubling or spacing reduction
    pub area: SquareMillimeters,
    pub weight: KnPerMeter,
    /// One figure, or two for an interior haunch pair
    pub figures: Vec<Figure>,
}

impl WeightShape {
    /// Plain geometric area of one figure, before doubling or spacing reduction.
    pub fn gross_area(&self) -> f64 {
        match self.kind {
            ShapeKind::Rectangle => self.width * self.height,
            ShapeKind::Triangle => 0.5 * self.width * self.height,
        }
    }
}

struct ShapeList {
    shapes: Vec<WeightShape>,
}

impl ShapeList {
    fn push(&mut self, role: ShapeRole, kind: ShapeKind, width: f64, height: f64, area: f64, figures: Vec<Figure>) {
        if width <= 0.0 || height <= 0.0 || area <= 0.0 {
            return;
        }
        let area = SquareMillimeters(area);
        self.shapes.push(WeightShape {
            number: self.shapes.len() + 1,
            role,
            kind,
            width,
            height,
            area,
            weight: GAMMA_CONCRETE.weight_of(area),
            figures,
        });
    }

    fn rect(&mut self, role: ShapeRole, x1: f64, y1: f64, x2: f64, y2: f64) {
        let (w, h) = (x2 - x1, y2 - y1);
        self.push(role, ShapeKind::Rectangle, w, h, w * h, vec![Figure::rect(x1, y1, x2, y2)]);
    }

    fn triangle(&mut self, role: ShapeRole, corner: &Corner, figures: Vec<Figure>) {
        let area = 0.5 * corner.width * corner.height * figures.len() as f64;
        self.push(role, ShapeKind::Triangle, corner.width, corner.height, area, figures);
    }
}

/// Numbered self-weight shapes of a section. Empty when the section is invalid.
pub fn decompose(section: &StructuralSection) -> Vec<WeightShape> {
    let no_ground = GroundModel {
        earth_cover_depth: 0.0,
        groundwater_depth: 0.0,
        ..GroundModel::default()
    };
    resolve(section, &no_ground)
        .map(|geom| decompose_geometry(section, &geom))
        .unwrap_or_default()
}

/// Numbered self-weight shapes of resolved geometry.
///
/// Order: top slab, bottom slab, left wall, each interior wall (continuous
/// rectangle, or upper girder, lower girder and column body), right wall,
/// left-wall haunches, interior haunch pairs, right-wall haunches and the
/// anti-float slab. Shapes with a non-positive side are skipped and do not
/// take a number.
pub fn decompose_geometry(section: &StructuralSection, geom: &ResolvedGeometry) -> Vec<WeightShape> {
    let mut list = ShapeList { shapes: Vec::new() };
    let tw = geom.total_width;
    let th = geom.total_height;
    let bottom = geom.inner_bottom;
    let top = geom.inner_top;

    list.rect(ShapeRole::TopSlab, 0.0, top, tw, th);
    list.rect(ShapeRole::BottomSlab, 0.0, 0.0, tw, bottom);
    list.rect(ShapeRole::LeftWall, 0.0, bottom, geom.left_wall, top);

    for wall in &geom.walls {
        let (x1, x2) = (wall.left, wall.right);
        match wall.column {
            None => list.rect(ShapeRole::MiddleWall { wall: wall.index }, x1, bottom, x2, top),
            Some(col) => {
                let girder = &section.column_girder;
                list.rect(
                    ShapeRole::UpperGirder {
                        wall: wall.index,
                        haunch_height: wall.haunch.upper.height.max(0.0),
                        extra_height: girder.upper_extra_height.max(0.0),
                    },
                    x1,
                    top - col.upper_girder_depth,
                    x2,
                    top,
                );
                list.rect(
                    ShapeRole::LowerGirder {
                        wall: wall.index,
                        haunch_height: wall.haunch.lower.height.max(0.0),
                        extra_height: girder.lower_extra_height.max(0.0),
                    },
                    x1,
                    bottom,
                    x2,
                    bottom + col.lower_girder_depth,
                );
                if !col.is_degenerate() && col.spacing > 0.0 {
                    let t = wall.thickness();
                    let area = t * col.clear_height * col.width / col.spacing;
                    let y1 = bottom + col.lower_girder_depth;
                    let y2 = top - col.upper_girder_depth;
                    list.push(
                        ShapeRole::ColumnBody {
                            wall: wall.index,
                            column_width: col.width,
                            spacing: col.spacing,
                            upper_girder_depth: col.upper_girder_depth,
                            lower_girder_depth: col.lower_girder_depth,
                        },
                        ShapeKind::Rectangle,
                        t,
                        col.clear_height,
                        area,
                        vec![Figure::Rect {
                            min: Point::new(x1, y1),
                            max: Point::new(x2, y2),
                            dashed: true,
                        }],
                    );
                }
            }
        }
    }

    list.rect(ShapeRole::RightWall, tw - geom.right_wall, bottom, tw, top);

    let wl = geom.left_wall;
    let haunch = &section.haunch;
    for (position, corner) in [
        (CornerPosition::Upper, haunch.left_wall.upper),
        (CornerPosition::Lower, haunch.left_wall.lower),
    ] {
        let figure = face_triangle(wl, bottom, top, position, &corner, 1.0);
        list.triangle(
            ShapeRole::Haunch {
                wall: WallRef::Left,
                position,
            },
            &corner,
            vec![figure],
        );
    }

    for wall in &geom.walls {
        for (position, corner) in [
            (CornerPosition::Upper, wall.haunch.upper),
            (CornerPosition::Lower, wall.haunch.lower),
        ] {
            let figures = vec![
                face_triangle(wall.left, bottom, top, position, &corner, -1.0),
                face_triangle(wall.right, bottom, top, position, &corner, 1.0),
            ];
            list.triangle(
                ShapeRole::Haunch {
                    wall: WallRef::Middle(wall.index),
                    position,
                },
                &corner,
                figures,
            );
        }
    }

    let rw_left = tw - geom.right_wall;
    for (position, corner) in [
        (CornerPosition::Upper, haunch.right_wall.upper),
        (CornerPosition::Lower, haunch.right_wall.lower),
    ] {
        let figure = face_triangle(rw_left, bottom, top, position, &corner, -1.0);
        list.triangle(
            ShapeRole::Haunch {
                wall: WallRef::Right,
                position,
            },
            &corner,
            vec![figure],
        );
    }

    if let Some(af) = geom.anti_float {
        list.rect(
            ShapeRole::AntiFloat {
                left_extension: af.left_extension,
                right_extension: af.right_extension,
            },
            af.left,
            -af.thickness,
            af.right,
            0.0,
        );
    }

    debug!(shapes = list.shapes.len(), "decomposed section into weight shapes");
    list.shapes
}

/// Haunch triangle against a wall face at `x`, pointing into the cell on the
/// `direction` side (+1 right, -1 left).
fn face_triangle(x: f64, bottom: f64, top: f64, position: CornerPosition, corner: &Corner, direction: f64) -> Figure {
    let (y, dy) = match position {
        CornerPosition::Upper => (top, -corner.height),
        CornerPosition::Lower => (bottom, corner.height),
    };
    Figure::triangle((x, y), (x + direction * corner.width, y), (x, y + dy))
}

// ============================================================================
// Check
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// FS ≥ 1.20
    Pass,
    /// FS < 1.20
    Fail,
    /// Water table at or below the base; nothing to resist
    NoUplift,
}

impl Verdict {
    pub fn is_ok(&self) -> bool {
        !matches!(self, Verdict::Fail)
    }
}

/// All intermediate quantities of the uplift check, per metre run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuoyancyCheck {
    pub section: StructuralSection,
    pub ground: GroundModel,
    pub total_width: f64,
    pub total_height: f64,
    /// Anti-float slab thickness, zero when disabled
    pub anti_float_thickness: f64,
    pub shapes: Vec<WeightShape>,
    /// Wc
    pub self_weight: KnPerMeter,
    pub soil_area: SquareMillimeters,
    /// Ws
    pub soil_weight: KnPerMeter,
    /// Depth of the base below ground (mm)
    pub bottom_depth: f64,
    /// Width of the base, including anti-float projections (mm)
    pub bottom_width: f64,
    /// Water head on the base (mm), zero when there is no uplift
    pub head: f64,
    /// U
    pub uplift: KnPerMeter,
    /// R = Wc + Ws
    pub resistance: KnPerMeter,
    pub safety_factor: Option<f64>,
    pub verdict: Verdict,
}

/// Run the uplift check. `None` when the section is invalid.
pub fn check(section: &StructuralSection, ground: &GroundModel) -> Option<BuoyancyCheck> {
    let geom = resolve(section, ground)?;
    let shapes = decompose_geometry(section, &geom);
    let self_weight: KnPerMeter = shapes.iter().map(|s| s.weight).sum();

    let cover = ground.earth_cover_depth;
    let soil_area = SquareMillimeters(geom.total_width * cover);
    let soil_weight = ground.soil_weight().weight_of(soil_area);

    let af_thickness = geom.anti_float_thickness();
    let bottom_depth = cover + geom.total_height + af_thickness;
    let bottom_width = geom.extent_right() - geom.extent_left();

    // no recorded water table means no uplift
    let raw_head = if ground.has_groundwater() {
        bottom_depth - ground.groundwater_depth
    } else {
        0.0
    };
    let head = raw_head.max(0.0);
    let uplift = if head > 0.0 {
        KnPerMeter(GAMMA_WATER.0 * (head / 1000.0) * (bottom_width / 1000.0))
    } else {
        KnPerMeter(0.0)
    };

    let resistance = self_weight + soil_weight;
    let (safety_factor, verdict) = if uplift.0 > 0.0 {
        let fs = resistance.0 / uplift.0;
        let verdict = if fs >= REQUIRED_SAFETY_FACTOR {
            Verdict::Pass
        } else {
            Verdict::Fail
        };
        (Some(fs), verdict)
    } else {
        (None, Verdict::NoUplift)
    };

    debug!(
        wc = self_weight.0,
        ws = soil_weight.0,
        u = uplift.0,
        ?verdict,
        "buoyancy check"
    );

    Some(BuoyancyCheck {
        section: section.clone(),
        ground: *ground,
        total_width: geom.total_width,
        total_height: geom.total_height,
        anti_float_thickness: af_thickness,
        shapes,
        self_weight,
        soil_area,
        soil_weight,
        bottom_depth,
        bottom_width,
        head,
        uplift,
        resistance,
        safety_factor,
        verdict,
    })
}
