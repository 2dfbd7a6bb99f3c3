//! Persistence service — background flush of the board to a JSON store file.
//!
//! DESIGN
//! ======
//! A background task wakes on a fixed interval and, when the store is dirty,
//! writes the full element list to disk as a pretty-printed JSON array. The
//! write goes to a temp file first and is renamed into place.
//!
//! ERROR HANDLING
//! ==============
//! The dirty flag is cleared only after a successful write, and only if no
//! newer mutation landed while the file was being written. A failed flush
//! leaves the flag set so the next cycle retries.

use std::path::{Path, PathBuf};
use std::time::Duration;

use board::element::{DrawingElement, ElementMap};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::state::AppState;

const DEFAULT_STORE_PATH: &str = "whiteboard.json";
const DEFAULT_PERSIST_INTERVAL_MS: u64 = 500;

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("store file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Store file location and flush cadence, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct PersistConfig {
    /// Path of the JSON store file.
    pub path: PathBuf,
    /// Milliseconds between dirty checks.
    pub interval_ms: u64,
}

impl PersistConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let path = std::env::var("STORE_PATH").unwrap_or_else(|_| DEFAULT_STORE_PATH.to_string());
        Self {
            path: PathBuf::from(path),
            interval_ms: env_parse("PERSIST_INTERVAL_MS", DEFAULT_PERSIST_INTERVAL_MS),
        }
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

// =============================================================================
// LOAD
// =============================================================================

/// Load the element collection from the store file.
///
/// A missing file yields an empty board. Individual records that fail to
/// decode are skipped with a warning; a file that is not a JSON array at all
/// is an error so the caller can refuse to start over it.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or is not a JSON
/// array.
pub async fn load_elements(path: &Path) -> Result<ElementMap, PersistError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "store file missing, starting with an empty board");
            return Ok(ElementMap::new());
        }
        Err(e) => return Err(PersistError::Io(e)),
    };

    let records: Vec<serde_json::Value> = serde_json::from_slice(&bytes)?;
    let mut elements = ElementMap::new();
    for record in records {
        match serde_json::from_value::<DrawingElement>(record) {
            Ok(element) => elements.upsert(element),
            Err(e) => warn!(error = %e, "skipping malformed store record"),
        }
    }
    info!(count = elements.len(), path = %path.display(), "store file loaded");
    Ok(elements)
}

// =============================================================================
// FLUSH
// =============================================================================

/// Spawn the background persistence task. Returns a handle for shutdown.
pub fn spawn_persistence_task(state: AppState, config: PersistConfig) -> JoinHandle<()> {
    info!(path = %config.path.display(), interval_ms = config.interval_ms, "store persistence configured");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_millis(config.interval_ms));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if let Err(e) = flush_if_dirty(&state, &config.path).await {
                error!(error = %e, path = %config.path.display(), "store flush failed");
            }
        }
    })
}

/// Flush the store to disk if it has changed since the last flush.
/// Returns whether a write happened.
///
/// # Errors
///
/// Returns an error if serialization or the file write fails; the dirty flag
/// stays set in that case.
async fn flush_if_dirty(state: &AppState, path: &Path) -> Result<bool, PersistError> {
    // PHASE: SNAPSHOT UNDER LOCK
    // WHY: clone the elements, then perform file I/O lock-free.
    let Some((elements, version)) = snapshot_if_dirty(state).await else {
        return Ok(false);
    };

    write_store_file(path, &elements).await?;

    // PHASE: ACK FLUSH
    // WHY: clear the dirty flag only for the exact version written; writes
    // that landed mid-flush stay dirty for the next cycle.
    ack_flush(state, version).await;
    info!(count = elements.len(), version, "store flushed");
    Ok(true)
}

async fn snapshot_if_dirty(state: &AppState) -> Option<(Vec<DrawingElement>, u64)> {
    let store = state.store.read().await;
    if !store.dirty {
        return None;
    }
    Some((store.elements.to_vec(), store.version))
}

async fn write_store_file(path: &Path, elements: &[DrawingElement]) -> Result<(), PersistError> {
    let bytes = serde_json::to_vec_pretty(elements)?;
    let tmp = temp_path(path);
    tokio::fs::write(&tmp, &bytes).await?;
    // Rename is atomic on the same filesystem, so readers never observe a
    // half-written store file.
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".tmp");
    PathBuf::from(os)
}

async fn ack_flush(state: &AppState, flushed_version: u64) {
    let mut store = state.store.write().await;
    // EDGE: keep the dirty flag if a write landed after the snapshot.
    if store.version == flushed_version {
        store.dirty = false;
    }
}

#[cfg(test)]
#[path = "persistence_test.rs"]
mod tests;
