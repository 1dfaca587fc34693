//! Ground and groundwater conditions around the culvert.

use serde::{Deserialize, Serialize};

use crate::units::KnPerCubicMeter;

/// Soil cover and groundwater, depths measured down from the ground surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GroundModel {
    /// Soil depth above the top slab (mm)
    pub earth_cover_depth: f64,
    /// Depth of the water table below ground (mm)
    #[serde(rename = "groundwaterLevel")]
    pub groundwater_depth: f64,
    /// Internal friction angle (degrees), carried for later checks
    pub friction_angle: f64,
    /// Soil unit weight (kN/m³)
    pub soil_unit_weight: f64,
}

impl Default for GroundModel {
    fn default() -> Self {
        GroundModel {
            earth_cover_depth: 2000.0,
            groundwater_depth: 3000.0,
            friction_angle: 30.0,
            soil_unit_weight: 18.0,
        }
    }
}

impl GroundModel {
    pub fn has_cover(&self) -> bool {
        self.earth_cover_depth > 0.0
    }

    pub fn has_groundwater(&self) -> bool {
        self.groundwater_depth > 0.0
    }

    pub fn soil_weight(&self) -> KnPerCubicMeter {
        KnPerCubicMeter(self.soil_unit_weight)
    }
}
