//! Manual file export/import: the user-initiated backup escape hatch,
//! independent of the automatic store.

use crate::store::StoreError;
use chrono::Local;
use mm_core::Snapshot;
use std::fs;
use std::path::{Path, PathBuf};

/// Write the snapshot into `dir` as `mindmap-YYYY-MM-DD.json` and return
/// the path. The directory is created if needed.
pub fn export_snapshot(snapshot: &Snapshot, dir: &Path) -> Result<PathBuf, StoreError> {
    let filename = format!("mindmap-{}.json", Local::now().format("%Y-%m-%d"));
    let path = dir.join(filename);
    fs::create_dir_all(dir)?;
    fs::write(&path, serde_json::to_string_pretty(snapshot)?)?;
    log::info!("exported snapshot to {}", path.display());
    Ok(path)
}

/// Parse a user-chosen snapshot file. Unlike automatic load, a malformed
/// file is surfaced to the caller so the import flow can report it.
pub fn import_snapshot(path: &Path) -> Result<Snapshot, StoreError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
