//! # culvert_core - Box-Culvert Section Engine
//!
//! `culvert_core` models a multi-cell reinforced-concrete box culvert in
//! cross-section: it resolves the parameter model into coordinates, builds
//! dimensioned section drawings and numbered buoyancy drawings, exports them
//! as SVG or DXF R12, and writes the uplift (buoyancy) check report. All
//! inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Pure**: drawings and reports are functions of the project snapshot
//! - **One model, two backends**: SVG and DXF read the same drawing model
//! - **No surprises at the boundary**: an incomplete section gives a
//!   placeholder drawing and report, never an error
//!
//! ## Quick Start
//!
//! ```rust
//! use culvert_core::buoyancy::generate_report;
//! use culvert_core::drawing::{build_project, DrawingMode};
//! use culvert_core::project::Project;
//! use culvert_core::render::svg;
//!
//! let project = Project::new();
//! let report = generate_report(&project.section, &project.ground);
//! assert!(report.contains("부 력 검 토 (Buoyancy Check)"));
//!
//! let svg = svg::render(&build_project(&project, DrawingMode::Section));
//! assert!(svg.starts_with("<svg"));
//! ```
//!
//! ## Modules
//!
//! - [`project`] - Project container, metadata, and settings
//! - [`section`] - Structural parameter model and haunch editing
//! - [`ground`] - Earth cover, groundwater and soil
//! - [`geometry`] - Absolute coordinates of cells, walls and slabs
//! - [`drawing`] - Backend-agnostic drawing model (section and buoyancy views)
//! - [`render`] - SVG and DXF R12 output
//! - [`buoyancy`] - Self-weight decomposition, uplift check and report
//! - [`store`] - Observable project state, autosave and in-memory store
//! - [`file_io`] - File operations with atomic saves and locking
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod buoyancy;
pub mod drawing;
pub mod errors;
#[cfg(not(target_arch = "wasm32"))]
pub mod file_io;
pub mod geometry;
pub mod ground;
pub mod project;
pub mod render;
pub mod section;
pub mod settings;
pub mod store;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use buoyancy::{check, generate_report, BuoyancyCheck, Verdict};
pub use drawing::{build, build_project, Drawing, DrawingMode, DrawingModel};
pub use errors::{CulvertError, CulvertResult};
#[cfg(not(target_arch = "wasm32"))]
pub use file_io::{load_project, save_project, FileLock, FileProjectStore};
pub use ground::GroundModel;
pub use project::{Project, ProjectMetadata};
pub use section::StructuralSection;
pub use settings::DrawingSettings;
pub use store::{ProjectState, ProjectStore, StoreEvent};
