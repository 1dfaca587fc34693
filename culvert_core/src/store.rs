//! # Project State and Persistence
//!
//! [`ProjectState`] owns the working [`Project`] and notifies subscribers
//! synchronously when parts of it change. Persistence goes through the
//! [`ProjectStore`] trait; [`MemoryProjectStore`] keeps snapshots in memory,
//! and `file_io::FileProjectStore` writes them to disk.
//!
//! Autosave is a clock-driven debounce ([`AutoSave`]): every change pushes
//! the deadline back, and the caller polls it with the current time.
//!
//! ## Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use culvert_core::store::{ProjectState, StoreEvent};
//!
//! let mut state = ProjectState::new();
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&seen);
//! state.subscribe(move |event, _| sink.borrow_mut().push(event.clone()));
//!
//! state.set_cell_count(5);
//! assert_eq!(state.get().section.cell_widths.len(), 5);
//! assert_eq!(seen.borrow().as_slice(), &[StoreEvent::SectionDataChange]);
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::errors::{CulvertError, CulvertResult};
use crate::ground::GroundModel;
use crate::project::{DesignConditions, Materials, Menu, Project, ProjectInfo};
use crate::section::{CornerDimension, CornerPosition, StructuralSection, WallRef};

/// Delay between the last change and the autosave.
pub const AUTOSAVE_DELAY: Duration = Duration::from_secs(1);

// ============================================================================
// Events
// ============================================================================

/// Change notification sent to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// The active input page changed
    MenuChange(Menu),
    /// The structural section changed; drawings must be rebuilt
    SectionDataChange,
    /// Any other part of the project changed
    StateChange,
}

impl StoreEvent {
    /// Whether this change should schedule an autosave.
    pub fn is_persistent(&self) -> bool {
        !matches!(self, StoreEvent::MenuChange(_))
    }
}

/// Handle returned by [`ProjectState::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

type Subscriber = Box<dyn FnMut(&StoreEvent, &Project)>;

// ============================================================================
// ProjectState
// ============================================================================

/// The working project plus its subscribers.
pub struct ProjectState {
    project: Project,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_id: usize,
}

impl Default for ProjectState {
    fn default() -> Self {
        ProjectState::new()
    }
}

impl ProjectState {
    pub fn new() -> Self {
        ProjectState::with_project(Project::new())
    }

    pub fn with_project(mut project: Project) -> Self {
        project.section.normalize();
        ProjectState {
            project,
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn get(&self) -> &Project {
        &self.project
    }

    /// Replace the whole project.
    pub fn set(&mut self, mut project: Project) {
        project.section.normalize();
        self.project = project;
        self.emit(StoreEvent::StateChange);
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&StoreEvent, &Project) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Remove a subscriber. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    fn emit(&mut self, event: StoreEvent) {
        debug!(?event, subscribers = self.subscribers.len(), "store event");
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&event, &self.project);
        }
    }

    fn emit_all(&mut self) {
        self.emit(StoreEvent::StateChange);
        self.emit(StoreEvent::SectionDataChange);
        let menu = self.project.current_menu;
        self.emit(StoreEvent::MenuChange(menu));
    }

    // ------------------------------------------------------------------------
    // Part updates
    // ------------------------------------------------------------------------

    pub fn set_current_menu(&mut self, menu: Menu) {
        self.project.current_menu = menu;
        self.emit(StoreEvent::MenuChange(menu));
    }

    pub fn update_project_info(&mut self, edit: impl FnOnce(&mut ProjectInfo)) {
        edit(&mut self.project.project_info);
        self.changed();
    }

    pub fn update_design_conditions(&mut self, edit: impl FnOnce(&mut DesignConditions)) {
        edit(&mut self.project.design_conditions);
        self.changed();
    }

    pub fn update_materials(&mut self, edit: impl FnOnce(&mut Materials)) {
        edit(&mut self.project.materials);
        self.changed();
    }

    pub fn update_ground(&mut self, edit: impl FnOnce(&mut GroundModel)) {
        edit(&mut self.project.ground);
        self.changed();
    }

    /// Edit the section in place, then re-sync the per-cell arrays to
    /// `cell_count`. Use [`set_cell_count`](Self::set_cell_count) to resize.
    pub fn update_section(&mut self, edit: impl FnOnce(&mut StructuralSection)) {
        edit(&mut self.project.section);
        self.project.section.normalize();
        self.section_changed();
    }

    /// Resize the section to `count` cells (clamped to 1..=10).
    pub fn set_cell_count(&mut self, count: usize) {
        self.project.section.set_cell_count(count);
        self.section_changed();
    }

    /// Edit one haunch leg. A left-wall edit is mirrored onto the right wall.
    pub fn edit_haunch(
        &mut self,
        wall: WallRef,
        position: CornerPosition,
        dimension: CornerDimension,
        value: f64,
    ) -> CulvertResult<()> {
        self.project.section.edit_haunch(wall, position, dimension, value)?;
        self.section_changed();
        Ok(())
    }

    fn changed(&mut self) {
        self.project.touch();
        self.emit(StoreEvent::StateChange);
    }

    fn section_changed(&mut self) {
        self.project.touch();
        self.emit(StoreEvent::SectionDataChange);
    }

    /// Back to the default project; every subscriber hears every event.
    pub fn reset(&mut self) {
        self.project = Project::new();
        info!("project reset to defaults");
        self.emit_all();
    }

    // ------------------------------------------------------------------------
    // Snapshots
    // ------------------------------------------------------------------------

    pub fn to_json(&self) -> CulvertResult<String> {
        self.project.to_json()
    }

    /// Replace the project from a JSON snapshot, shallow-merged onto the
    /// defaults. On failure the current project is left untouched and no
    /// event fires.
    pub fn from_json(&mut self, json: &str) -> CulvertResult<()> {
        match Project::from_json(json) {
            Ok(project) => {
                self.project = project;
                self.emit_all();
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "rejected project snapshot; state unchanged");
                Err(e)
            }
        }
    }

    /// Restore the autosaved project, if any.
    pub fn restore(&mut self, store: &dyn ProjectStore) -> bool {
        match store.load() {
            Some(project) => {
                self.project = project;
                self.emit_all();
                true
            }
            None => false,
        }
    }

    /// Import a project file through `store`. The state is unchanged on error.
    pub fn import(&mut self, store: &dyn ProjectStore, path: &Path) -> CulvertResult<()> {
        let project = store.import_file(path)?;
        self.project = project;
        self.emit_all();
        Ok(())
    }
}

// ============================================================================
// ProjectStore
// ============================================================================

/// Where projects are autosaved, exported and imported.
pub trait ProjectStore {
    /// Write the autosave snapshot.
    fn save(&mut self, project: &Project) -> CulvertResult<()>;

    /// Read the autosave snapshot. Missing or unreadable snapshots give
    /// `None`.
    fn load(&self) -> Option<Project>;

    /// Delete the autosave snapshot.
    fn clear(&mut self) -> CulvertResult<()>;

    fn exists(&self) -> bool;

    /// Write a project file for exchange.
    fn export_file(&mut self, project: &Project, path: &Path) -> CulvertResult<()>;

    /// Read a project file, shallow-merged onto the defaults.
    fn import_file(&self, path: &Path) -> CulvertResult<Project>;
}

/// In-memory store. Exported files live in a map keyed by path.
#[derive(Debug, Default)]
pub struct MemoryProjectStore {
    snapshot: Option<String>,
    files: HashMap<PathBuf, String>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        MemoryProjectStore::default()
    }

    /// Put raw text at `path`, as if a user dropped a file there.
    pub fn insert_file(&mut self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into());
    }
}

impl ProjectStore for MemoryProjectStore {
    fn save(&mut self, project: &Project) -> CulvertResult<()> {
        self.snapshot = Some(project.to_json()?);
        Ok(())
    }

    fn load(&self) -> Option<Project> {
        let json = self.snapshot.as_deref()?;
        Project::from_json(json)
            .map_err(|e| warn!(error = %e, "discarding unreadable autosave"))
            .ok()
    }

    fn clear(&mut self) -> CulvertResult<()> {
        self.snapshot = None;
        Ok(())
    }

    fn exists(&self) -> bool {
        self.snapshot.is_some()
    }

    fn export_file(&mut self, project: &Project, path: &Path) -> CulvertResult<()> {
        self.files.insert(path.to_path_buf(), project.to_json()?);
        Ok(())
    }

    fn import_file(&self, path: &Path) -> CulvertResult<Project> {
        let name = path.display().to_string();
        let json = self
            .files
            .get(path)
            .ok_or_else(|| CulvertError::file_error("open", name.clone(), "no such file"))?;
        Project::from_json(json).map_err(|e| CulvertError::import_failed(name, e.to_string()))
    }
}

// ============================================================================
// AutoSave
// ============================================================================

/// Debounced autosave. Call [`note_change`](Self::note_change) on every
/// persistent change and [`poll`](Self::poll) from the event loop.
#[derive(Debug, Clone)]
pub struct AutoSave {
    delay: Duration,
    last_change: Option<Instant>,
}

impl Default for AutoSave {
    fn default() -> Self {
        AutoSave::new(AUTOSAVE_DELAY)
    }
}

impl AutoSave {
    pub fn new(delay: Duration) -> Self {
        AutoSave {
            delay,
            last_change: None,
        }
    }

    /// Restart the countdown.
    pub fn note_change(&mut self, now: Instant) {
        self.last_change = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.last_change.is_some()
    }

    /// A save is pending and the delay has elapsed since the last change.
    pub fn due(&self, now: Instant) -> bool {
        self.last_change
            .is_some_and(|t| now.saturating_duration_since(t) >= self.delay)
    }

    /// Save through `store` if due. Returns whether a save happened.
    pub fn poll(&mut self, now: Instant, project: &Project, store: &mut dyn ProjectStore) -> CulvertResult<bool> {
        if !self.due(now) {
            return Ok(false);
        }
        store.save(project)?;
        self.last_change = None;
        debug!("autosaved project");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorded(state: &mut ProjectState) -> Rc<RefCell<Vec<StoreEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        state.subscribe(move |event, _| sink.borrow_mut().push(event.clone()));
        events
    }

    #[test]
    fn test_reset_emits_all_events() {
        let mut state = ProjectState::new();
        state.set_cell_count(2);
        let events = recorded(&mut state);

        state.reset();
        assert_eq!(state.get().section.cell_count, 3);
        assert_eq!(
            events.borrow().as_slice(),
            &[
                StoreEvent::StateChange,
                StoreEvent::SectionDataChange,
                StoreEvent::MenuChange(Menu::ProjectInfo)
            ]
        );
    }

    #[test]
    fn test_edit_haunch_emits_section_event() {
        let mut state = ProjectState::new();
        let events = recorded(&mut state);

        state
            .edit_haunch(WallRef::Left, CornerPosition::Upper, CornerDimension::Width, 300.0)
            .unwrap();
        assert_eq!(state.get().section.haunch.right_wall.upper.width, 300.0);
        assert_eq!(events.borrow().as_slice(), &[StoreEvent::SectionDataChange]);
    }

    #[test]
    fn test_bad_haunch_edit_is_silent() {
        let mut state = ProjectState::new();
        let events = recorded(&mut state);
        let result = state.edit_haunch(WallRef::Middle(9), CornerPosition::Lower, CornerDimension::Height, 1.0);
        assert!(result.is_err());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_from_json_failure_leaves_state() {
        let mut state = ProjectState::new();
        state.set_cell_count(4);
        let before = state.get().clone();
        let events = recorded(&mut state);

        let err = state.from_json("{ not json").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
        assert_eq!(*state.get(), before);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_unsubscribe() {
        let mut state = ProjectState::new();
        let events = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&events);
        let id = state.subscribe(move |_, _| *sink.borrow_mut() += 1);

        state.set_current_menu(Menu::Buoyancy);
        assert!(state.unsubscribe(id));
        assert!(!state.unsubscribe(id));
        state.set_current_menu(Menu::Section);
        assert_eq!(*events.borrow(), 1);
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryProjectStore::new();
        assert!(!store.exists());
        assert!(store.load().is_none());

        let mut project = Project::new();
        project.section.set_cell_count(2);
        store.save(&project).unwrap();
        assert_eq!(store.load().unwrap().section.cell_widths, vec![4_000.0, 4_000.0]);

        store.clear().unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_import_failure_names_file() {
        let mut store = MemoryProjectStore::new();
        store.insert_file("bad.json", "[1, 2]");
        let mut state = ProjectState::new();

        let err = state.import(&store, Path::new("bad.json")).unwrap_err();
        assert_eq!(err.error_code(), "IMPORT_FAILED");
        assert_eq!(state.get().section.cell_count, 3);
    }

    #[test]
    fn test_autosave_debounce() {
        let mut store = MemoryProjectStore::new();
        let mut autosave = AutoSave::default();
        let project = Project::new();
        let t0 = Instant::now();

        assert!(!autosave.poll(t0, &project, &mut store).unwrap());

        autosave.note_change(t0);
        autosave.note_change(t0 + Duration::from_millis(600));
        // one second after the first change, but not after the last
        assert!(!autosave.due(t0 + Duration::from_millis(1_000)));
        assert!(autosave.poll(t0 + Duration::from_millis(1_600), &project, &mut store).unwrap());
        assert!(!autosave.is_pending());
        assert!(store.exists());
    }
}
