//! # Project Data Structures
//!
//! The `Project` struct is the root container for one culvert design: job
//! information, design conditions, materials, ground conditions and the
//! structural section. Projects serialize to `.culv` files as human-readable
//! JSON using the same top-level keys as earlier saves (`projectInfo`,
//! `designConditions`, `materials`, `groundInfo`, `sectionData`,
//! `currentMenu`).
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (schema version, id, timestamps)
//! ├── settings: DrawingSettings (dimension/marker layout)
//! ├── project_info / design_conditions / materials
//! ├── ground: GroundModel
//! ├── section: StructuralSection
//! └── current_menu: Menu
//! ```
//!
//! ## Example
//!
//! ```rust
//! use culvert_core::project::Project;
//!
//! let project = Project::from_json(r#"{ "sectionData": { "culvert_count": 2 } }"#).unwrap();
//! assert_eq!(project.section.cell_widths.len(), 2);
//! assert_eq!(project.ground.earth_cover_depth, 2000.0);
//! ```

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::{CulvertError, CulvertResult};
use crate::ground::GroundModel;
use crate::section::StructuralSection;
use crate::settings::DrawingSettings;

/// Current schema version for .culv files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Default snapshot as JSON, used as the base of every shallow-merge import.
static DEFAULT_SNAPSHOT: Lazy<Value> = Lazy::new(|| {
    let base = ProjectParts::default();
    serde_json::to_value(base).unwrap_or(Value::Null)
});

/// Root project container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub meta: ProjectMetadata,

    #[serde(default)]
    pub settings: DrawingSettings,

    #[serde(rename = "projectInfo", default)]
    pub project_info: ProjectInfo,

    #[serde(rename = "designConditions", default)]
    pub design_conditions: DesignConditions,

    #[serde(default)]
    pub materials: Materials,

    #[serde(rename = "groundInfo", default)]
    pub ground: GroundModel,

    #[serde(rename = "sectionData", default)]
    pub section: StructuralSection,

    #[serde(rename = "currentMenu", default)]
    pub current_menu: Menu,
}

/// The defaultable parts of a project, without metadata.
#[derive(Debug, Clone, Default, Serialize)]
struct ProjectParts {
    settings: DrawingSettings,
    #[serde(rename = "projectInfo")]
    project_info: ProjectInfo,
    #[serde(rename = "designConditions")]
    design_conditions: DesignConditions,
    materials: Materials,
    #[serde(rename = "groundInfo")]
    ground: GroundModel,
    #[serde(rename = "sectionData")]
    section: StructuralSection,
    #[serde(rename = "currentMenu")]
    current_menu: Menu,
}

impl Project {
    /// Create a project with every part at its default.
    pub fn new() -> Self {
        Project {
            meta: ProjectMetadata::default(),
            settings: DrawingSettings::default(),
            project_info: ProjectInfo::default(),
            design_conditions: DesignConditions::default(),
            materials: Materials::default(),
            ground: GroundModel::default(),
            section: StructuralSection::default(),
            current_menu: Menu::default(),
        }
    }

    /// Parse a snapshot, shallow-merged onto the defaults.
    ///
    /// Top-level parts present in `json` replace the default part wholesale;
    /// fields missing inside a part take that part's defaults. The section is
    /// normalized before returning.
    pub fn from_json(json: &str) -> CulvertResult<Self> {
        let incoming: Value = serde_json::from_str(json)?;
        let Value::Object(incoming) = incoming else {
            return Err(CulvertError::serialization("Project snapshot must be a JSON object"));
        };

        let mut merged = match DEFAULT_SNAPSHOT.clone() {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        for (key, value) in incoming {
            merged.insert(key, value);
        }

        let mut project: Project = serde_json::from_value(Value::Object(merged))?;
        project.section.normalize();
        Ok(project)
    }

    pub fn to_json(&self) -> CulvertResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new()
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (recorded, not migrated)
    pub version: String,

    pub id: Uuid,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

impl Default for ProjectMetadata {
    fn default() -> Self {
        let now = Utc::now();
        ProjectMetadata {
            version: SCHEMA_VERSION.to_string(),
            id: Uuid::new_v4(),
            created: now,
            modified: now,
        }
    }
}

/// Job identification shown on reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectInfo {
    pub business_name: String,
    pub client: String,
    pub constructor: String,
    pub site_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DesignConditions {
    /// Governing design code
    pub standard: String,
    pub design_life: String,
    /// Exposure environment
    pub environment: String,
}

impl Default for DesignConditions {
    fn default() -> Self {
        DesignConditions {
            standard: "콘크리트구조기준".to_string(),
            design_life: "100년".to_string(),
            environment: "건조 환경".to_string(),
        }
    }
}

/// Concrete and reinforcement strengths (MPa).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Materials {
    pub fck: f64,
    pub fy: f64,
}

impl Default for Materials {
    fn default() -> Self {
        Materials { fck: 30.0, fy: 400.0 }
    }
}

/// Input page the user last had open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Menu {
    #[default]
    #[serde(rename = "프로젝트 정보")]
    ProjectInfo,
    #[serde(rename = "기본환경")]
    DesignConditions,
    #[serde(rename = "재료특성")]
    Materials,
    #[serde(rename = "지반정보")]
    Ground,
    #[serde(rename = "단면제원")]
    Section,
    #[serde(rename = "부력검토")]
    Buoyancy,
}
