//! Abstract snapshot store and its concrete backends.
//!
//! The editor session hands the store a full snapshot on every save and
//! reads back at most one snapshot at startup. Absent data is `Ok(None)`,
//! meaning "start empty", never an error. What the store does with the
//! bytes (file, remote service, browser storage) is its own business.

use mm_core::Snapshot;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a save or load failed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("stored snapshot is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The persistence contract: one whole snapshot in, one whole snapshot
/// out. Saves are last-write-wins; there is no delta protocol.
pub trait SnapshotStore {
    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StoreError>;
    fn load(&mut self) -> Result<Option<Snapshot>, StoreError>;
}

// ─── In-memory backend ───────────────────────────────────────────────────

/// Keeps the latest snapshot in process. For tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Option<Snapshot>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start pre-seeded, as if a previous session had saved.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
        }
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }
}

impl SnapshotStore for MemoryStore {
    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StoreError> {
        self.snapshot = Some(snapshot.clone());
        Ok(())
    }

    fn load(&mut self) -> Result<Option<Snapshot>, StoreError> {
        Ok(self.snapshot.clone())
    }
}

// ─── JSON file backend ───────────────────────────────────────────────────

/// One pretty-printed JSON document on disk holding the snapshot shape.
/// The parent directory is created on first save; a missing file loads as
/// `None`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, json)?;
        log::debug!("saved snapshot to {}", self.path.display());
        Ok(())
    }

    fn load(&mut self) -> Result<Option<Snapshot>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let snapshot = serde_json::from_str(&text)?;
        Ok(Some(snapshot))
    }
}
