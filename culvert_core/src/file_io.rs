//! # File I/O Module
//!
//! Project and drawing files on disk, with the same safety features for
//! every write:
//! - **Atomic saves**: Write to .tmp, sync, rename to prevent corruption
//! - **File locking**: Prevent two sessions editing one project directory
//!
//! ## File Format
//!
//! Projects are saved as `.culv` files containing JSON. Loading merges the
//! file onto the default project, so older or partial files still open.
//! Lock files use a `.lock` suffix and record who holds the lock.
//!
//! ## Example
//!
//! ```rust,no_run
//! use culvert_core::file_io::{save_project, load_project, FileLock};
//! use culvert_core::project::Project;
//! use std::path::Path;
//!
//! let project = Project::new();
//! let path = Path::new("culvert.culv");
//!
//! let lock = FileLock::acquire(path, "designer@company.com").unwrap();
//! save_project(&project, path).unwrap();
//! drop(lock);
//!
//! let reloaded = load_project(path).unwrap();
//! assert_eq!(reloaded.section, project.section);
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::drawing::{build_project, DrawingMode};
use crate::errors::{CulvertError, CulvertResult};
use crate::project::Project;
use crate::render::ExportFormat;
use crate::store::ProjectStore;

/// Extension for project files.
pub const PROJECT_EXTENSION: &str = "culv";

/// File name of the autosave snapshot inside a store directory.
pub const AUTOSAVE_FILE: &str = "autosave.culv";

/// Lock file metadata stored in .lock files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or username)
    pub user_id: String,
    /// Machine name where lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME").ok().or_else(|| std::env::var("HOST").ok())
    }
}

/// File lock guard that releases the lock when dropped.
///
/// Holds an OS-level lock (fs2) on the lock file and writes [`LockInfo`]
/// into it so other sessions can say who has the project open.
pub struct FileLock {
    target: PathBuf,
    lock_path: PathBuf,
    _lock_file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on `path` (a project file or store
    /// directory).
    ///
    /// Returns `CulvertError::FileLocked` if a live session holds it. Locks
    /// older than 24 hours, or left by a dead process on this machine, are
    /// taken over.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> CulvertResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if let Some(existing) = FileLock::check(path) {
            return Err(CulvertError::file_locked(
                path.display().to_string(),
                format!("{} ({})", existing.user_id, existing.machine),
                existing.locked_at.to_rfc3339(),
            ));
        }

        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| CulvertError::file_error("create lock", lock_path.display().to_string(), e.to_string()))?;

        lock_file.try_lock_exclusive().map_err(|_| {
            CulvertError::file_locked(path.display().to_string(), "another process", "unknown")
        })?;

        let lock_json = serde_json::to_string_pretty(&info)?;
        lock_file
            .write_all(lock_json.as_bytes())
            .and_then(|_| lock_file.sync_all())
            .map_err(|e| CulvertError::file_error("write lock", lock_path.display().to_string(), e.to_string()))?;

        Ok(FileLock {
            target: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Current holder of the lock on `path`, if any live session has it.
    pub fn check(path: &Path) -> Option<LockInfo> {
        let lock_path = lock_path_for(path);
        if !lock_path.exists() {
            return None;
        }
        read_lock_info(&lock_path).ok().filter(|info| !is_lock_stale(info))
    }

    pub fn target(&self) -> &Path {
        &self.target
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// `project.culv` -> `project.culv.lock`; a directory gets `<dir>.lock`.
fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".lock");
    path.with_file_name(name)
}

fn read_lock_info(lock_path: &Path) -> CulvertResult<LockInfo> {
    let contents = read_text(lock_path, "read lock")?;
    Ok(serde_json::from_str(&contents)?)
}

/// The lock's process is gone (same machine) or the lock is over a day old.
fn is_lock_stale(info: &LockInfo) -> bool {
    if hostname().as_deref() == Some(info.machine.as_str()) {
        #[cfg(unix)]
        {
            if fs::metadata(format!("/proc/{}", info.pid)).is_err() {
                return true;
            }
        }
    }
    (Utc::now() - info.locked_at).num_hours() > 24
}

fn read_text(path: &Path, operation: &str) -> CulvertResult<String> {
    let mut file =
        File::open(path).map_err(|e| CulvertError::file_error(operation, path.display().to_string(), e.to_string()))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| CulvertError::file_error(operation, path.display().to_string(), e.to_string()))?;
    Ok(contents)
}

/// Write `contents` to `path` atomically: temp file, fsync, rename.
pub fn write_atomic(path: &Path, contents: &str) -> CulvertResult<()> {
    let mut tmp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| CulvertError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .write_all(contents.as_bytes())
        .and_then(|_| tmp_file.sync_all())
        .map_err(|e| CulvertError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CulvertError::file_error("rename to final", path.display().to_string(), e.to_string())
    })
}

/// Save a project with atomic write semantics.
pub fn save_project(project: &Project, path: &Path) -> CulvertResult<()> {
    write_atomic(path, &project.to_json()?)?;
    info!(path = %path.display(), "saved project");
    Ok(())
}

/// Load a project file, merged onto the defaults and normalized.
///
/// Malformed JSON gives `CulvertError::SerializationError`; I/O failures give
/// `CulvertError::FileError`.
pub fn load_project(path: &Path) -> CulvertResult<Project> {
    let contents = read_text(path, "open")?;
    let project = Project::from_json(&contents).map_err(|e| match e {
        CulvertError::SerializationError { reason } => {
            CulvertError::serialization(format!("Invalid JSON in {}: {}", path.display(), reason))
        }
        other => other,
    })?;
    info!(path = %path.display(), cells = project.section.cell_count, "loaded project");
    Ok(project)
}

/// Load a project and report whether another session has it locked.
pub fn load_project_with_lock_check(path: &Path) -> CulvertResult<(Project, Option<LockInfo>)> {
    let project = load_project(path)?;
    Ok((project, FileLock::check(path)))
}

/// Render a project drawing and write it to `path`.
pub fn export_drawing(project: &Project, mode: DrawingMode, format: ExportFormat, path: &Path) -> CulvertResult<()> {
    let model = build_project(project, mode);
    let contents = format.render(&model)?;
    write_atomic(path, &contents)?;
    info!(path = %path.display(), ?mode, ?format, "exported drawing");
    Ok(())
}

/// [`ProjectStore`] backed by a directory. The autosave snapshot lives in
/// [`AUTOSAVE_FILE`] inside it.
#[derive(Debug, Clone)]
pub struct FileProjectStore {
    root: PathBuf,
}

impl FileProjectStore {
    /// Use `root` as the store directory, creating it if needed.
    pub fn open(root: impl Into<PathBuf>) -> CulvertResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|e| CulvertError::file_error("create directory", root.display().to_string(), e.to_string()))?;
        Ok(FileProjectStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn autosave_path(&self) -> PathBuf {
        self.root.join(AUTOSAVE_FILE)
    }

    /// Lock the store directory for this session.
    pub fn lock(&self, user_id: impl Into<String>) -> CulvertResult<FileLock> {
        FileLock::acquire(&self.root, user_id)
    }
}

impl ProjectStore for FileProjectStore {
    fn save(&mut self, project: &Project) -> CulvertResult<()> {
        save_project(project, &self.autosave_path())
    }

    fn load(&self) -> Option<Project> {
        let path = self.autosave_path();
        if !path.exists() {
            return None;
        }
        load_project(&path)
            .map_err(|e| warn!(error = %e, "discarding unreadable autosave"))
            .ok()
    }

    fn clear(&mut self) -> CulvertResult<()> {
        let path = self.autosave_path();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CulvertError::file_error("remove", path.display().to_string(), e.to_string())),
        }
    }

    fn exists(&self) -> bool {
        self.autosave_path().exists()
    }

    fn export_file(&mut self, project: &Project, path: &Path) -> CulvertResult<()> {
        save_project(project, path)
    }

    fn import_file(&self, path: &Path) -> CulvertResult<Project> {
        let contents = read_text(path, "open")?;
        Project::from_json(&contents).map_err(|e| {
            warn!(path = %path.display(), error = %e, "import rejected");
            CulvertError::import_failed(path.display().to_string(), e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_lock_path_generation() {
        assert_eq!(
            lock_path_for(Path::new("/path/to/project.culv")),
            Path::new("/path/to/project.culv.lock")
        );
        assert_eq!(lock_path_for(Path::new("/path/to/store")), Path::new("/path/to/store.lock"));
    }

    #[test]
    fn test_lock_info_creation() {
        let info = LockInfo::new("test@example.com");
        assert_eq!(info.user_id, "test@example.com");
        assert!(info.pid > 0);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roundtrip.culv");

        let mut project = Project::new();
        project.section.set_cell_count(4);
        project.ground.earth_cover_depth = 1_500.0;
        save_project(&project, &path).unwrap();

        let loaded = load_project(&path).unwrap();
        assert_eq!(loaded.section, project.section);
        assert_eq!(loaded.ground.earth_cover_depth, 1_500.0);
        assert_eq!(loaded.meta.id, project.meta.id);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("atomic.culv");
        save_project(&Project::new(), &path).unwrap();

        assert!(!dir.path().join("atomic.culv.tmp").exists());
        assert!(path.exists());
    }

    #[test]
    fn test_file_lock_acquire_and_release() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locked.culv");
        File::create(&path).unwrap();

        let lock = FileLock::acquire(&path, "test@example.com").unwrap();
        assert_eq!(lock.info.user_id, "test@example.com");
        let lock_path = lock_path_for(&path);
        assert!(lock_path.exists());

        drop(lock);
        assert!(!lock_path.exists());
    }

    #[test]
    fn test_malformed_file_is_serialization_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.culv");
        fs::write(&path, "{ \"sectionData\": ").unwrap();

        let err = load_project(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_store_autosave_and_clear() {
        let dir = tempdir().unwrap();
        let mut store = FileProjectStore::open(dir.path().join("store")).unwrap();
        assert!(store.load().is_none());

        store.save(&Project::new()).unwrap();
        assert!(store.exists());
        assert_eq!(store.load().unwrap().section.cell_count, 3);

        store.clear().unwrap();
        assert!(!store.exists());
        // clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_import_partial_file() {
        let dir = tempdir().unwrap();
        let store = FileProjectStore::open(dir.path()).unwrap();
        let path = dir.path().join("partial.json");
        fs::write(&path, r#"{ "groundInfo": { "earthCoverDepth": 0 } }"#).unwrap();

        let project = store.import_file(&path).unwrap();
        assert_eq!(project.ground.earth_cover_depth, 0.0);
        // other ground fields fall back to defaults
        assert_eq!(project.ground.groundwater_depth, 3_000.0);
        assert_eq!(project.section.cell_count, 3);
    }

    #[test]
    fn test_export_drawing_files() {
        let dir = tempdir().unwrap();
        let project = Project::new();
        let svg = dir.path().join("section.svg");
        let dxf = dir.path().join("section.dxf");

        export_drawing(&project, DrawingMode::Section, ExportFormat::Svg, &svg).unwrap();
        export_drawing(&project, DrawingMode::Section, ExportFormat::Dxf, &dxf).unwrap();

        assert!(fs::read_to_string(&svg).unwrap().starts_with("<svg"));
        assert!(fs::read_to_string(&dxf).unwrap().ends_with("EOF\n"));
    }
}
