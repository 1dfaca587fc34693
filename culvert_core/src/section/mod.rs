//! # Structural Section
//!
//! The parameter model for a multi-cell box culvert: cell widths, slab and
//! wall thicknesses, interior walls (continuous or column type), haunches,
//! column girders and the optional anti-floatation slab.
//!
//! JSON field names follow the established snapshot keys (`culvert_count`,
//! `H`, `B`, `UT`, `LT`, `WL`, `WR`, `middle_walls`, `haunch`, `columnGirder`,
//! `antiFloat`) so existing project files load unchanged.
//!
//! ## Example
//!
//! ```rust
//! use culvert_core::section::StructuralSection;
//!
//! let mut section = StructuralSection::default();
//! assert_eq!(section.cell_count, 3);
//! assert_eq!(section.total_width(), 14_400.0);
//!
//! section.set_cell_count(5);
//! assert_eq!(section.cell_widths.len(), 5);
//! assert_eq!(section.middle_walls.len(), 4);
//! ```

pub mod haunch;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::CulvertResult;

pub use haunch::{
    CellCorners, Corner, CornerDimension, CornerPair, CornerPosition, HaunchSet, WallRef,
    DEFAULT_HAUNCH_LEG,
};

/// Smallest allowed number of cells.
pub const MIN_CELLS: usize = 1;
/// Largest allowed number of cells.
pub const MAX_CELLS: usize = 10;
/// Width given to cells added by a resize (mm).
pub const DEFAULT_CELL_WIDTH: f64 = 4000.0;
/// Thickness given to interior walls added by a resize (mm).
pub const DEFAULT_WALL_THICKNESS: f64 = 600.0;

fn default_wall_thickness() -> f64 {
    DEFAULT_WALL_THICKNESS
}

// ============================================================================
// Interior walls
// ============================================================================

/// An interior wall between two cells.
///
/// Accepts both the Korean type tags used by saved projects and English tags.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MiddleWall {
    /// Full-height wall, solid along the culvert run.
    #[serde(rename = "연속벽", alias = "Continuous")]
    Continuous {
        #[serde(default = "default_wall_thickness")]
        thickness: f64,
    },
    /// Discrete columns at a spacing, tied by girders under the top slab and
    /// over the bottom slab.
    #[serde(rename = "기둥", alias = "Column")]
    Column {
        #[serde(default = "default_wall_thickness")]
        thickness: f64,
    },
}

impl MiddleWall {
    pub fn thickness(&self) -> f64 {
        match self {
            MiddleWall::Continuous { thickness } | MiddleWall::Column { thickness } => *thickness,
        }
    }

    pub fn is_column(&self) -> bool {
        matches!(self, MiddleWall::Column { .. })
    }

    /// Korean display name used in drawings and reports.
    pub fn kind_label(&self) -> &'static str {
        match self {
            MiddleWall::Continuous { .. } => "연속벽",
            MiddleWall::Column { .. } => "기둥",
        }
    }
}

impl Default for MiddleWall {
    fn default() -> Self {
        MiddleWall::Continuous {
            thickness: DEFAULT_WALL_THICKNESS,
        }
    }
}

// ============================================================================
// Column girder / anti-float parameters
// ============================================================================

/// Column spacing and the extra girder depth below/above the haunches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnGirder {
    /// Column centre-to-centre spacing along the run (mm)
    #[serde(rename = "columnCTC")]
    pub column_spacing: f64,
    /// Column dimension along the run (mm)
    #[serde(rename = "columnWidth")]
    pub column_width: f64,
    /// Upper girder depth added below the upper haunch (mm)
    #[serde(rename = "upperAdditionalHeight")]
    pub upper_extra_height: f64,
    /// Lower girder depth added above the lower haunch (mm)
    #[serde(rename = "lowerAdditionalHeight")]
    pub lower_extra_height: f64,
}

impl Default for ColumnGirder {
    fn default() -> Self {
        ColumnGirder {
            column_spacing: 3000.0,
            column_width: 500.0,
            upper_extra_height: 0.0,
            lower_extra_height: 0.0,
        }
    }
}

/// Optional base slab that projects past the outer walls to resist uplift.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AntiFloatSlab {
    #[serde(rename = "use")]
    pub enabled: bool,
    pub left_extension: f64,
    pub right_extension: f64,
    pub thickness: f64,
}

impl AntiFloatSlab {
    /// Left projection, zero when the slab is disabled.
    pub fn effective_left(&self) -> f64 {
        if self.enabled {
            self.left_extension
        } else {
            0.0
        }
    }

    pub fn effective_right(&self) -> f64 {
        if self.enabled {
            self.right_extension
        } else {
            0.0
        }
    }

    pub fn effective_thickness(&self) -> f64 {
        if self.enabled {
            self.thickness
        } else {
            0.0
        }
    }
}

impl Default for AntiFloatSlab {
    fn default() -> Self {
        AntiFloatSlab {
            enabled: false,
            left_extension: 500.0,
            right_extension: 500.0,
            thickness: 300.0,
        }
    }
}

// ============================================================================
// Validation
// ============================================================================

/// One reason a section cannot be resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub field: String,
    pub reason: String,
}

impl ValidationIssue {
    fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationIssue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

// ============================================================================
// StructuralSection
// ============================================================================

/// Complete cross-section parameter set. All lengths in mm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuralSection {
    #[serde(rename = "culvert_count")]
    pub cell_count: usize,

    /// Clear internal height shared by every cell
    #[serde(rename = "H")]
    pub h: f64,

    /// Auxiliary height kept with the project; not used by the geometry
    #[serde(rename = "H4")]
    pub h4: f64,

    #[serde(rename = "B")]
    pub cell_widths: Vec<f64>,

    #[serde(rename = "UT")]
    pub top_slab: f64,

    #[serde(rename = "LT")]
    pub bottom_slab: f64,

    #[serde(rename = "WL")]
    pub left_wall: f64,

    #[serde(rename = "WR")]
    pub right_wall: f64,

    pub middle_walls: Vec<MiddleWall>,

    pub haunch: HaunchSet,

    #[serde(rename = "columnGirder")]
    pub column_girder: ColumnGirder,

    #[serde(rename = "antiFloat")]
    pub anti_float: AntiFloatSlab,
}

impl Default for StructuralSection {
    fn default() -> Self {
        StructuralSection {
            cell_count: 3,
            h: 4200.0,
            h4: 0.0,
            cell_widths: vec![DEFAULT_CELL_WIDTH; 3],
            top_slab: 600.0,
            bottom_slab: 800.0,
            left_wall: 600.0,
            right_wall: 600.0,
            middle_walls: vec![MiddleWall::default(); 2],
            haunch: HaunchSet::with_middle_walls(2),
            column_girder: ColumnGirder::default(),
            anti_float: AntiFloatSlab::default(),
        }
    }
}

impl StructuralSection {
    /// Resize to `n` cells, clamped to [1, 10].
    ///
    /// Shrinking truncates the per-cell and per-wall arrays. Growing appends
    /// 4000 mm cells, 600 mm continuous walls and default haunches. Applying
    /// the same count twice is a no-op.
    pub fn set_cell_count(&mut self, n: usize) {
        let n = n.clamp(MIN_CELLS, MAX_CELLS);
        self.cell_count = n;
        self.cell_widths.resize(n, DEFAULT_CELL_WIDTH);
        self.middle_walls.resize(n - 1, MiddleWall::default());
        self.haunch.resize_middle(n - 1);
    }

    /// Bring array lengths in line with `cell_count` after an import.
    pub fn normalize(&mut self) {
        let n = self.cell_count;
        self.set_cell_count(n);
    }

    /// Set one haunch leg, mirroring left-wall edits onto the right wall.
    pub fn edit_haunch(
        &mut self,
        wall: WallRef,
        position: CornerPosition,
        dimension: CornerDimension,
        value: f64,
    ) -> CulvertResult<()> {
        self.haunch.set(wall, position, dimension, value)
    }

    /// Everything that prevents this section from being resolved.
    ///
    /// Array lengths must match `cell_count` (see [`normalize`](Self::normalize)).
    /// Haunch and girder values are not checked here: non-positive haunch
    /// legs simply mean "no haunch".
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if !self.h.is_finite() || self.h <= 0.0 {
            issues.push(ValidationIssue::new("H", "Clear height must be positive"));
        }
        if self.cell_widths.is_empty() {
            issues.push(ValidationIssue::new("B", "At least one cell width is required"));
        }
        for (i, b) in self.cell_widths.iter().enumerate() {
            if !b.is_finite() || *b < 0.0 {
                issues.push(ValidationIssue::new(
                    format!("B[{}]", i),
                    "Cell width must be a non-negative number",
                ));
            }
        }
        for (name, value) in [
            ("UT", self.top_slab),
            ("LT", self.bottom_slab),
            ("WL", self.left_wall),
            ("WR", self.right_wall),
        ] {
            if !value.is_finite() || value <= 0.0 {
                issues.push(ValidationIssue::new(name, "Thickness must be positive"));
            }
        }
        if self.cell_widths.len() != self.cell_count {
            issues.push(ValidationIssue::new(
                "B",
                format!(
                    "{} cell widths given for {} cells",
                    self.cell_widths.len(),
                    self.cell_count
                ),
            ));
        }
        let wall_count = self.cell_widths.len().saturating_sub(1);
        if self.middle_walls.len() != wall_count {
            issues.push(ValidationIssue::new(
                "middle_walls",
                format!("{} interior walls given, {} expected", self.middle_walls.len(), wall_count),
            ));
        }
        if self.haunch.middle_walls.len() != wall_count {
            issues.push(ValidationIssue::new(
                "haunch.middle_walls",
                format!(
                    "{} interior haunch pairs given, {} expected",
                    self.haunch.middle_walls.len(),
                    wall_count
                ),
            ));
        }
        for (i, wall) in self.middle_walls.iter().enumerate() {
            let t = wall.thickness();
            if !t.is_finite() || t < 0.0 {
                issues.push(ValidationIssue::new(
                    format!("middle_walls[{}]", i),
                    "Wall thickness must be a non-negative number",
                ));
            }
        }

        issues
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Sum of the clear cell widths.
    pub fn cells_width(&self) -> f64 {
        self.cell_widths.iter().sum()
    }

    /// Sum of the interior wall thicknesses.
    pub fn middle_walls_width(&self) -> f64 {
        self.middle_walls.iter().map(MiddleWall::thickness).sum()
    }

    /// WL + ΣB + Σt + WR
    pub fn total_width(&self) -> f64 {
        self.left_wall + self.cells_width() + self.middle_walls_width() + self.right_wall
    }

    /// LT + H + UT
    pub fn total_height(&self) -> f64 {
        self.bottom_slab + self.h + self.top_slab
    }

    /// Corners of cell `index`, taken from its bounding walls.
    pub fn cell_corners(&self, index: usize) -> CellCorners {
        self.haunch.cell_corners(index, self.cell_widths.len())
    }

    /// Haunch pair of interior wall `index`, zero-size when missing.
    pub fn middle_haunch(&self, index: usize) -> CornerPair {
        self.haunch
            .middle_walls
            .get(index)
            .copied()
            .unwrap_or(CornerPair {
                upper: Corner::ZERO,
                lower: Corner::ZERO,
            })
    }
}
