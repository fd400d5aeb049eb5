//! Persistence layer.
//!
//! Saves and loads a session snapshot to/from a JSON file.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

use crate::session::SessionSnapshot;

/// Default snapshot file path.
pub const DEFAULT_STATE_FILE: &str = "roulette_state.json";

/// Save a session snapshot to a JSON file.
pub fn save_snapshot(snapshot: &SessionSnapshot, path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_STATE_FILE);
    let json =
        serde_json::to_string_pretty(snapshot).context("Failed to serialise session snapshot")?;

    std::fs::write(path, &json).with_context(|| format!("Failed to write snapshot to {path}"))?;

    debug!(
        path,
        cuisine = snapshot.selected_cuisine.as_deref().unwrap_or("-"),
        "Snapshot saved"
    );
    Ok(())
}

/// Load a session snapshot from a JSON file.
/// Returns None if the file doesn't exist (fresh start).
pub fn load_snapshot(path: Option<&str>) -> Result<Option<SessionSnapshot>> {
    let path = path.unwrap_or(DEFAULT_STATE_FILE);

    if !Path::new(path).exists() {
        info!(path, "No saved session found, starting fresh");
        return Ok(None);
    }

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot from {path}"))?;

    let snapshot: SessionSnapshot = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse snapshot from {path}"))?;

    info!(
        path,
        saved_at = %snapshot.saved_at,
        venues = snapshot.venues.len(),
        "Snapshot loaded from disk"
    );

    Ok(Some(snapshot))
}

/// Delete the snapshot file.
pub fn delete_snapshot(path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_STATE_FILE);
    if Path::new(path).exists() {
        std::fs::remove_file(path)
            .with_context(|| format!("Failed to delete snapshot file {path}"))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
