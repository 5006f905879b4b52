//! Snapshot persistence
//!
//! Handles saving and loading the dataset to/from the filesystem.
//! Uses atomic writes (write to temp file, then rename) to prevent
//! corruption.
//!
//! Storage location: `~/.local/share/larder/` (configurable via `Config`)
//!
//! Files:
//! - `larder.json` - JSON snapshot of all items and lists
//! - `app_state` - the active list id, as plain text

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::{Item, ItemId, ItemList, ListId, INVENTORY_LIST_ID, SHOPPING_LIST_ID};

use super::error::{StorageError, StorageResult};

/// A full dataset snapshot: every item and every registered list.
///
/// Temporary lists (id -1) never appear in a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// When the snapshot was written
    pub saved_at: DateTime<Utc>,
    /// All items, keyed by id
    pub items: BTreeMap<ItemId, Item>,
    /// All registered lists, keyed by id
    pub lists: BTreeMap<ListId, ItemList>,
}

impl Snapshot {
    /// Build a snapshot of the given dataset, stamped with the current time.
    pub fn new(items: BTreeMap<ItemId, Item>, lists: BTreeMap<ListId, ItemList>) -> Self {
        Self {
            saved_at: Utc::now(),
            items,
            lists,
        }
    }
}

/// Persistence layer for dataset snapshots
///
/// Provides atomic file operations for saving/loading the dataset and
/// the app state sidecar.
pub struct SnapshotPersistence {
    config: Config,
}

impl SnapshotPersistence {
    /// Create a new persistence handler with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check if a snapshot exists on disk
    pub fn exists(&self) -> bool {
        self.config.snapshot_path().exists()
    }

    /// Save a snapshot to disk using atomic write
    pub fn save(&self, snapshot: &Snapshot) -> StorageResult<()> {
        let target_path = self.config.snapshot_path();
        let bytes = serde_json::to_vec_pretty(snapshot).map_err(|e| {
            StorageError::InvalidFormat {
                path: target_path.clone(),
                details: e.to_string(),
            }
        })?;

        atomic_write(&target_path, &bytes)?;
        debug!(
            items = snapshot.items.len(),
            lists = snapshot.lists.len(),
            path = %target_path.display(),
            "saved snapshot"
        );
        Ok(())
    }

    /// Load a snapshot from disk
    ///
    /// Returns `None` if the snapshot file doesn't exist.
    /// Returns an error if the file exists but can't be read or parsed.
    pub fn load(&self) -> StorageResult<Option<Snapshot>> {
        let path = self.config.snapshot_path();

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(|e| StorageError::ReadError {
            path: path.clone(),
            source: e,
        })?;

        let snapshot: Snapshot =
            serde_json::from_slice(&bytes).map_err(|e| StorageError::InvalidFormat {
                path: path.clone(),
                details: e.to_string(),
            })?;

        debug!(
            items = snapshot.items.len(),
            lists = snapshot.lists.len(),
            "loaded snapshot"
        );
        Ok(Some(snapshot))
    }

    /// Save the active list id to the sidecar file
    pub fn save_app_state(&self, active_list: ListId) -> StorageResult<()> {
        let path = self.config.app_state_path();
        atomic_write(&path, active_list.to_string().as_bytes())
    }

    /// Load the active list id from the sidecar file
    ///
    /// An absent file, an unreadable file, or anything but the two
    /// reserved list ids falls back to the inventory list.
    pub fn load_app_state(&self) -> ListId {
        let path = self.config.app_state_path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(_) => return INVENTORY_LIST_ID,
        };

        match content.trim().parse::<ListId>() {
            Ok(id) if id == INVENTORY_LIST_ID || id == SHOPPING_LIST_ID => id,
            _ => {
                warn!(path = %path.display(), "unreadable app state, using inventory list");
                INVENTORY_LIST_ID
            }
        }
    }

    /// Delete all stored data
    ///
    /// Removes the snapshot and the app state sidecar.
    pub fn delete_all(&self) -> StorageResult<()> {
        let paths = [self.config.snapshot_path(), self.config.app_state_path()];

        for path in paths {
            if path.exists() {
                fs::remove_file(&path)
                    .map_err(|e| StorageError::from_io(e, path.clone()))?;
            }
        }

        Ok(())
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// This ensures the target file is never left in a partially-written state.
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("tmp");

    let mut file = File::create(&temp_path)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.write_all(data).map_err(|e| StorageError::WriteError {
        path: temp_path.clone(),
        source: e,
    })?;

    file.sync_all().map_err(|e| StorageError::WriteError {
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| StorageError::AtomicWriteFailed {
        from: temp_path,
        to: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
