//! Haunch (corner fillet) data and editing rules.
//!
//! Every wall carries an upper and a lower [`CornerPair`]. A cell reads its
//! left corners from the wall on its left and its right corners from the wall
//! on its right, so an interior wall's haunch shows up in both neighbouring
//! cells.

use serde::{Deserialize, Serialize};

use crate::errors::{CulvertError, CulvertResult};

/// Default haunch leg length (mm) for both width and height.
pub const DEFAULT_HAUNCH_LEG: f64 = 150.0;

fn default_leg() -> f64 {
    DEFAULT_HAUNCH_LEG
}

/// One triangular fillet: horizontal leg `width`, vertical leg `height`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Corner {
    #[serde(default = "default_leg")]
    pub width: f64,
    #[serde(default = "default_leg")]
    pub height: f64,
}

impl Corner {
    pub const ZERO: Corner = Corner { width: 0.0, height: 0.0 };

    pub fn new(width: f64, height: f64) -> Self {
        Corner { width, height }
    }

    /// A haunch is drawn and weighed only when both legs are positive.
    pub fn is_present(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Triangle area in mm².
    pub fn area(&self) -> f64 {
        if self.is_present() {
            0.5 * self.width * self.height
        } else {
            0.0
        }
    }
}

impl Default for Corner {
    fn default() -> Self {
        Corner::new(DEFAULT_HAUNCH_LEG, DEFAULT_HAUNCH_LEG)
    }
}

/// Upper and lower haunch of one wall.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CornerPair {
    #[serde(default)]
    pub upper: Corner,
    #[serde(default)]
    pub lower: Corner,
}

impl CornerPair {
    pub fn uniform(width: f64, height: f64) -> Self {
        CornerPair {
            upper: Corner::new(width, height),
            lower: Corner::new(width, height),
        }
    }

    pub fn get(&self, position: CornerPosition) -> &Corner {
        match position {
            CornerPosition::Upper => &self.upper,
            CornerPosition::Lower => &self.lower,
        }
    }

    fn get_mut(&mut self, position: CornerPosition) -> &mut Corner {
        match position {
            CornerPosition::Upper => &mut self.upper,
            CornerPosition::Lower => &mut self.lower,
        }
    }
}

/// Which wall a haunch edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallRef {
    Left,
    Middle(usize),
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CornerPosition {
    Upper,
    Lower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CornerDimension {
    Width,
    Height,
}

/// The four corners of one cell, already resolved to their source walls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellCorners {
    pub upper_left: Corner,
    pub upper_right: Corner,
    pub lower_left: Corner,
    pub lower_right: Corner,
}

/// All haunches of a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HaunchSet {
    #[serde(default)]
    pub left_wall: CornerPair,
    #[serde(default)]
    pub middle_walls: Vec<CornerPair>,
    #[serde(default)]
    pub right_wall: CornerPair,
}

impl HaunchSet {
    /// Default haunches for a section with `middle_wall_count` interior walls.
    pub fn with_middle_walls(middle_wall_count: usize) -> Self {
        HaunchSet {
            left_wall: CornerPair::default(),
            middle_walls: vec![CornerPair::default(); middle_wall_count],
            right_wall: CornerPair::default(),
        }
    }

    /// Pad with default pairs or truncate so there is one pair per interior wall.
    pub fn resize_middle(&mut self, middle_wall_count: usize) {
        self.middle_walls.resize(middle_wall_count, CornerPair::default());
    }

    pub fn wall(&self, wall: WallRef) -> Option<&CornerPair> {
        match wall {
            WallRef::Left => Some(&self.left_wall),
            WallRef::Middle(i) => self.middle_walls.get(i),
            WallRef::Right => Some(&self.right_wall),
        }
    }

    /// Set one haunch leg.
    ///
    /// Edits on the left wall are copied onto the right wall. Edits on the
    /// right wall stay local.
    pub fn set(
        &mut self,
        wall: WallRef,
        position: CornerPosition,
        dimension: CornerDimension,
        value: f64,
    ) -> CulvertResult<()> {
        let pair = match wall {
            WallRef::Left => &mut self.left_wall,
            WallRef::Right => &mut self.right_wall,
            WallRef::Middle(i) => {
                let count = self.middle_walls.len();
                self.middle_walls.get_mut(i).ok_or_else(|| {
                    CulvertError::invalid_input(
                        "haunch.middleWalls",
                        i.to_string(),
                        format!("Section has {} middle wall(s)", count),
                    )
                })?
            }
        };
        set_leg(pair.get_mut(position), dimension, value);

        if wall == WallRef::Left {
            set_leg(self.right_wall.get_mut(position), dimension, value);
        }
        Ok(())
    }

    /// Corners of cell `index` in a section of `cell_count` cells.
    ///
    /// Missing interior entries read as zero-size corners.
    pub fn cell_corners(&self, index: usize, cell_count: usize) -> CellCorners {
        let zero = CornerPair {
            upper: Corner::ZERO,
            lower: Corner::ZERO,
        };
        let left = if index == 0 {
            self.left_wall
        } else {
            self.middle_walls.get(index - 1).copied().unwrap_or(zero)
        };
        let right = if index + 1 >= cell_count {
            self.right_wall
        } else {
            self.middle_walls.get(index).copied().unwrap_or(zero)
        };
        CellCorners {
            upper_left: left.upper,
            lower_left: left.lower,
            upper_right: right.upper,
            lower_right: right.lower,
        }
    }
}

impl Default for HaunchSet {
    fn default() -> Self {
        HaunchSet::with_middle_walls(2)
    }
}

fn set_leg(corner: &mut Corner, dimension: CornerDimension, value: f64) {
    match dimension {
        CornerDimension::Width => corner.width = value,
        CornerDimension::Height => corner.height = value,
    }
}
