//! Project state against the on-disk store.

use std::cell::RefCell;
use std::fs;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tempfile::tempdir;

use culvert_core::file_io::FileProjectStore;
use culvert_core::project::Menu;
use culvert_core::store::{AutoSave, ProjectState, ProjectStore, StoreEvent};

#[test]
fn import_failure_leaves_state_and_subscribers_untouched() {
    let dir = tempdir().unwrap();
    let store = FileProjectStore::open(dir.path()).unwrap();
    let bad = dir.path().join("bad.json");
    fs::write(&bad, "{ \"sectionData\": [").unwrap();

    let mut state = ProjectState::new();
    state.set_cell_count(6);
    let before = state.get().clone();

    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    state.subscribe(move |event, _| sink.borrow_mut().push(event.clone()));

    let err = state.import(&store, &bad).unwrap_err();
    assert_eq!(err.error_code(), "IMPORT_FAILED");
    assert_eq!(*state.get(), before);
    assert!(events.borrow().is_empty());
}

#[test]
fn export_then_import_restores_project() {
    let dir = tempdir().unwrap();
    let mut store = FileProjectStore::open(dir.path()).unwrap();

    let mut state = ProjectState::new();
    state.set_cell_count(2);
    state.update_ground(|g| g.groundwater_depth = 1_200.0);
    state.set_current_menu(Menu::Buoyancy);

    let path = dir.path().join("exported.culv");
    store.export_file(state.get(), &path).unwrap();

    let mut other = ProjectState::new();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    other.subscribe(move |event, _| sink.borrow_mut().push(event.clone()));

    other.import(&store, &path).unwrap();
    assert_eq!(other.get().section, state.get().section);
    assert_eq!(other.get().ground.groundwater_depth, 1_200.0);
    assert_eq!(other.get().current_menu, Menu::Buoyancy);
    assert_eq!(
        events.borrow().as_slice(),
        &[
            StoreEvent::StateChange,
            StoreEvent::SectionDataChange,
            StoreEvent::MenuChange(Menu::Buoyancy)
        ]
    );
}

#[test]
fn autosave_restores_on_next_session() {
    let dir = tempdir().unwrap();
    let mut store = FileProjectStore::open(dir.path().join("session")).unwrap();
    let mut autosave = AutoSave::default();
    let t0 = Instant::now();

    let mut state = ProjectState::new();
    state.set_cell_count(7);
    autosave.note_change(t0);
    assert!(autosave
        .poll(t0 + Duration::from_secs(2), state.get(), &mut store)
        .unwrap());

    let mut next = ProjectState::new();
    assert!(next.restore(&store));
    assert_eq!(next.get().section.cell_count, 7);
    assert_eq!(next.get().section.middle_walls.len(), 6);
}

#[test]
fn store_directory_lock_is_exclusive() {
    let dir = tempdir().unwrap();
    let store = FileProjectStore::open(dir.path().join("locked")).unwrap();

    let lock = store.lock("first@example.com").unwrap();
    let err = store.lock("second@example.com").err().unwrap();
    assert_eq!(err.error_code(), "FILE_LOCKED");

    drop(lock);
    assert!(store.lock("second@example.com").is_ok());
}
