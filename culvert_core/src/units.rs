//! # Unit Types
//!
//! Thin newtype wrappers for the quantities the buoyancy check mixes. Section
//! input stays in plain millimetres; areas, unit weights and line loads carry
//! their unit in the type so a weight is never summed with an area.
//!
//! ## Example
//!
//! ```rust
//! use culvert_core::units::{KnPerCubicMeter, SquareMillimeters};
//!
//! let slab = SquareMillimeters(14_400.0 * 600.0);
//! let w = KnPerCubicMeter(24.5).weight_of(slab);
//! assert!((w.0 - 211.68).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::Add;

// ============================================================================
// Area Units
// ============================================================================

/// Area in square millimetres (per metre run when used for self-weight)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareMillimeters(pub f64);

// ============================================================================
// Weight Units
// ============================================================================

/// Unit weight in kN/m³
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnPerCubicMeter(pub f64);

/// Line load in kN per metre of culvert run
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnPerMeter(pub f64);

impl KnPerCubicMeter {
    /// Weight of a section area per metre run: γ × A / 10⁶.
    pub fn weight_of(self, area: SquareMillimeters) -> KnPerMeter {
        KnPerMeter(self.0 * area.0 / 1e6)
    }
}

impl Add for KnPerMeter {
    type Output = KnPerMeter;
    fn add(self, rhs: KnPerMeter) -> KnPerMeter {
        KnPerMeter(self.0 + rhs.0)
    }
}

impl std::iter::Sum for KnPerMeter {
    fn sum<I: Iterator<Item = KnPerMeter>>(iter: I) -> Self {
        iter.fold(KnPerMeter(0.0), |acc, w| acc + w)
    }
}
