//! # File I/O Module
//!
//! Disk persistence with safety features:
//! - **Atomic saves**: Write to .tmp, sync, rename to prevent corruption
//! - **File locking**: Prevent concurrent writers on shared drives
//! - **Version validation**: Ensure schema compatibility
//!
//! ## File Format
//!
//! A [`FileStore`] is one JSON document holding every key/value pair:
//!
//! ```json
//! {
//!   "version": "0.1.0",
//!   "saved_at": "2025-01-01T12:00:00Z",
//!   "entries": {
//!     "last_used": "{...}",
//!     "scenario:roof beam": "{...}"
//!   }
//! }
//! ```
//!
//! Writers hold a `.lock` file next to the store (e.g. `scenarios.json.lock`)
//! with metadata about who holds it.
//!
//! ## Example
//!
//! ```rust,no_run
//! use beam_core::configuration::BeamConfiguration;
//! use beam_core::file_io::FileStore;
//! use beam_core::store::ScenarioStore;
//!
//! let mut store = ScenarioStore::new(FileStore::new("scenarios.json"));
//! store.save("Roof Beam", &BeamConfiguration::default())?;
//! # Ok::<(), beam_core::errors::CalcError>(())
//! ```

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::settings::AnalysisSettings;
use crate::store::KeyValueStore;

/// Current store file schema version
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Identity written into lock files when none is given
pub const DEFAULT_LOCK_OWNER: &str = "beam_core";

/// Lock file metadata stored in .lock files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or username)
    pub user_id: String,
    /// Machine name where lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    /// When the lock was acquired
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Create new lock info for the current process
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
        std::env::var("HOSTNAME")
            .ok()
            .or_else(|| std::env::var("HOST").ok())
    }
}

/// File lock guard that releases the lock when dropped.
///
/// Uses both:
/// 1. OS-level file locking (via fs2) for process safety
/// 2. .lock file with metadata for user visibility
pub struct FileLock {
    lock_path: PathBuf,
    /// Keeps the OS lock alive
    _lock_file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on `path`.
    ///
    /// Fails with [`CalcError::FileLocked`] while another live process holds
    /// it. Locks left behind by dead processes, or older than 24 hours, are
    /// taken over.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> CalcResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if let Some(existing) = FileLock::check(path) {
            return Err(CalcError::file_locked(
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
            .map_err(|e| {
                CalcError::file_error("create lock", lock_path.display().to_string(), e.to_string())
            })?;

        lock_file.try_lock_exclusive().map_err(|_| {
            CalcError::file_locked(path.display().to_string(), "another process", "unknown")
        })?;

        let lock_json = serde_json::to_string_pretty(&info)?;
        lock_file.write_all(lock_json.as_bytes()).map_err(|e| {
            CalcError::file_error("write lock", lock_path.display().to_string(), e.to_string())
        })?;
        lock_file.sync_all().map_err(|e| {
            CalcError::file_error("sync lock", lock_path.display().to_string(), e.to_string())
        })?;

        tracing::debug!(path = %path.display(), "Acquired store lock");
        Ok(FileLock {
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Current holder of the lock on `path`, if it is live
    pub fn check(path: &Path) -> Option<LockInfo> {
        let lock_path = lock_path_for(path);
        if !lock_path.exists() {
            return None;
        }
        match read_lock_info(&lock_path) {
            Ok(info) if !is_lock_stale(&info) => Some(info),
            _ => None,
        }
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

fn lock_path_for(path: &Path) -> PathBuf {
    sibling_with_suffix(path, "lock")
}

/// `scenarios.json` -> `scenarios.json.<suffix>`
fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut sibling = path.to_path_buf();
    let extension = sibling
        .extension()
        .map(|e| format!("{}.{}", e.to_string_lossy(), suffix))
        .unwrap_or_else(|| suffix.to_string());
    sibling.set_extension(extension);
    sibling
}

fn read_lock_info(lock_path: &Path) -> CalcResult<LockInfo> {
    let contents = read_to_string(lock_path, "read lock")?;
    Ok(serde_json::from_str(&contents)?)
}

/// A lock is stale when its process is gone (same machine) or it is over a
/// day old
fn is_lock_stale(info: &LockInfo) -> bool {
    if let Some(our_machine) = hostname() {
        if info.machine == our_machine {
            #[cfg(unix)]
            {
                if fs::metadata(format!("/proc/{}", info.pid)).is_err() {
                    return true;
                }
            }
            #[cfg(windows)]
            {
                use std::process::Command;
                let output = Command::new("tasklist")
                    .args(["/FI", &format!("PID eq {}", info.pid), "/NH"])
                    .output();
                if let Ok(output) = output {
                    let stdout = String::from_utf8_lossy(&output.stdout);
                    if !stdout.contains(&info.pid.to_string()) {
                        return true;
                    }
                }
            }
        }
    }

    (Utc::now() - info.locked_at).num_hours() > 24
}

fn read_to_string(path: &Path, operation: &str) -> CalcResult<String> {
    let mut file = File::open(path)
        .map_err(|e| CalcError::file_error(operation, path.display().to_string(), e.to_string()))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| CalcError::file_error(operation, path.display().to_string(), e.to_string()))?;
    Ok(contents)
}

/// Write `contents` to `path` with atomic write semantics.
///
/// 1. Write to a temporary file (`<name>.tmp`)
/// 2. Sync to disk (fsync)
/// 3. Rename over `path` (atomic on most filesystems)
pub fn atomic_write(path: &Path, contents: &str) -> CalcResult<()> {
    let tmp_path = sibling_with_suffix(path, "tmp");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;
    tmp_file.write_all(contents.as_bytes()).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;
    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })
}

/// On-disk layout of a [`FileStore`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreDocument {
    pub version: String,
    pub saved_at: DateTime<Utc>,
    pub entries: BTreeMap<String, String>,
}

impl Default for StoreDocument {
    fn default() -> Self {
        StoreDocument {
            version: SCHEMA_VERSION.to_string(),
            saved_at: Utc::now(),
            entries: BTreeMap::new(),
        }
    }
}

/// [`KeyValueStore`] backed by a single JSON file.
///
/// Reads parse the whole file; writes take the lock, re-read, modify and
/// save atomically. A missing file reads as an empty store.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    owner: String,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore {
            path: path.into(),
            owner: DEFAULT_LOCK_OWNER.to_string(),
        }
    }

    /// Name recorded in the lock file while writing
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Read the whole document
    pub fn load_document(&self) -> CalcResult<StoreDocument> {
        if !self.path.exists() {
            return Ok(StoreDocument::default());
        }
        let contents = read_to_string(&self.path, "open")?;
        let document: StoreDocument = serde_json::from_str(&contents).map_err(|e| {
            CalcError::serialization(format!("Invalid JSON in {}: {}", self.path.display(), e))
        })?;
        validate_version(&document.version)?;
        Ok(document)
    }

    fn modify<T>(&self, change: impl FnOnce(&mut BTreeMap<String, String>) -> T) -> CalcResult<T> {
        let _lock = FileLock::acquire(&self.path, self.owner.as_str())?;
        let mut document = self.load_document()?;
        let out = change(&mut document.entries);
        document.version = SCHEMA_VERSION.to_string();
        document.saved_at = Utc::now();
        atomic_write(&self.path, &serde_json::to_string_pretty(&document)?)?;
        Ok(out)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> CalcResult<Option<String>> {
        Ok(self.load_document()?.entries.remove(key))
    }

    fn set(&mut self, key: &str, value: String) -> CalcResult<()> {
        self.modify(|entries| {
            entries.insert(key.to_string(), value);
        })
    }

    fn list(&self, prefix: &str) -> CalcResult<Vec<String>> {
        Ok(self
            .load_document()?
            .entries
            .into_keys()
            .filter(|k| k.starts_with(prefix))
            .collect())
    }

    fn delete(&mut self, key: &str) -> CalcResult<bool> {
        self.modify(|entries| entries.remove(key).is_some())
    }
}

/// Load engine settings from a JSON file.
///
/// A missing file gives the defaults; a malformed one is an error.
pub fn load_settings(path: &Path) -> CalcResult<AnalysisSettings> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No settings file, using defaults");
        return Ok(AnalysisSettings::default());
    }
    let contents = read_to_string(path, "read settings")?;
    serde_json::from_str(&contents).map_err(|e| {
        CalcError::serialization(format!("Invalid settings in {}: {}", path.display(), e))
    })
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // For 0.x, a newer minor version is not readable
    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(mismatch());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::BeamConfiguration;
    use crate::store::ScenarioStore;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FileStore {
        FileStore::new(dir.path().join("scenarios.json"))
    }

    #[test]
    fn test_lock_path_generation() {
        let lock_path = lock_path_for(Path::new("/path/to/scenarios.json"));
        assert_eq!(lock_path, Path::new("/path/to/scenarios.json.lock"));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.get("anything").unwrap(), None);
        assert!(store.list("").unwrap().is_empty());
    }

    #[test]
    fn test_set_get_delete() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.set("a", "1".to_string()).unwrap();
        store.set("b", "2".to_string()).unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.list("").unwrap(), vec!["a", "b"]);
        assert!(store.delete("a").unwrap());
        assert!(!store.delete("a").unwrap());
        assert_eq!(store.get("a").unwrap(), None);
    }

    #[test]
    fn test_atomic_save_leaves_no_tmp_or_lock() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.set("a", "1".to_string()).unwrap();
        assert!(store.path().exists());
        assert!(!sibling_with_suffix(store.path(), "tmp").exists());
        assert!(!lock_path_for(store.path()).exists());
    }

    #[test]
    fn test_scenarios_persist_across_instances() {
        let dir = TempDir::new().unwrap();
        let c = BeamConfiguration {
            length: 4.2,
            ..Default::default()
        };
        {
            let mut scenarios = ScenarioStore::new(store_in(&dir));
            scenarios.save("Garage Header", &c).unwrap();
            scenarios.set_last_used(&c).unwrap();
        }
        let scenarios = ScenarioStore::new(store_in(&dir));
        assert_eq!(scenarios.load("garage header").unwrap(), c);
        assert_eq!(scenarios.last_used(&BeamConfiguration::default()), c);
    }

    #[test]
    fn test_file_lock_blocks_second_writer() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let lock = FileLock::acquire(store.path(), "someone@example.com").unwrap();
        assert!(lock_path_for(store.path()).exists());

        let err = store.set("a", "1".to_string()).unwrap_err();
        assert_eq!(err.error_code(), "FILE_LOCKED");

        drop(lock);
        assert!(!lock_path_for(store.path()).exists());
        store.set("a", "1".to_string()).unwrap();
    }

    #[test]
    fn test_stale_lock_taken_over() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let stale = LockInfo {
            user_id: "old".to_string(),
            machine: "elsewhere".to_string(),
            pid: 1,
            locked_at: Utc::now() - chrono::Duration::hours(48),
        };
        fs::write(lock_path_for(store.path()), serde_json::to_string(&stale).unwrap()).unwrap();
        store.set("a", "1".to_string()).unwrap();
    }

    #[test]
    fn test_newer_schema_rejected() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            r#"{"version":"0.9.0","saved_at":"2025-01-01T00:00:00Z","entries":{}}"#,
        )
        .unwrap();
        let err = store.get("a").unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.7").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("garbage").is_err());
    }

    #[test]
    fn test_load_settings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        assert_eq!(load_settings(&path).unwrap(), AnalysisSettings::default());

        fs::write(&path, r#"{ "diagram_points": 20, "share_param": "cfg" }"#).unwrap();
        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.diagram_points, 20);
        assert_eq!(settings.share_param, "cfg");

        fs::write(&path, "not json").unwrap();
        assert!(load_settings(&path).is_err());
    }
}
