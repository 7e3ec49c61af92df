//! Save/load of room snapshots as JSON
//!
//! Features:
//! - Pretty-printed JSON in the snapshot value format
//! - Validation before anything touches the live room
//! - Atomic file writes (tmp → save)

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::sim::RoomSnapshot;

/// Errors produced while reading or writing snapshots.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// The file could not be read or written.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The text is not a well-formed snapshot (syntax, missing or mistyped fields).
    #[error("malformed snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The snapshot parsed but describes an impossible room.
    #[error("invalid snapshot: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, PersistenceError>;

/// Serialize a snapshot to pretty JSON
pub fn encode(snapshot: &RoomSnapshot) -> Result<String> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

/// Parse and validate a snapshot
pub fn decode(json: &str) -> Result<RoomSnapshot> {
    let snapshot: RoomSnapshot = serde_json::from_str(json)?;
    validate(&snapshot)?;
    Ok(snapshot)
}

/// Reject rooms that could not have come from a live simulation
pub fn validate(snapshot: &RoomSnapshot) -> Result<()> {
    if !(snapshot.width > 0.0 && snapshot.width.is_finite())
        || !(snapshot.height > 0.0 && snapshot.height.is_finite())
    {
        return Err(PersistenceError::Invalid(format!(
            "room size must be positive, got {}x{}",
            snapshot.width, snapshot.height
        )));
    }

    for (i, b) in snapshot.blocks.iter().enumerate() {
        if [b.x, b.y, b.width, b.height].iter().any(|v| !v.is_finite()) {
            return Err(PersistenceError::Invalid(format!(
                "block {i} has a non-finite coordinate"
            )));
        }
        if b.width < 0.0 || b.height < 0.0 {
            return Err(PersistenceError::Invalid(format!(
                "block {i} has negative size {}x{}",
                b.width, b.height
            )));
        }
    }

    for (i, r) in snapshot.robots.iter().enumerate() {
        let values = [
            r.center_x,
            r.center_y,
            r.radius,
            r.speed_per_second,
            r.rotation_speed_deg_per_sec,
            r.turn_sample_deg,
            r.current_angle_deg,
            r.sensor_arc_radius,
            r.sensor_arc_extent_deg,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(PersistenceError::Invalid(format!(
                "robot {i} has a non-finite value"
            )));
        }
        if r.radius < 0.0 || r.sensor_arc_radius < 0.0 {
            return Err(PersistenceError::Invalid(format!(
                "robot {i} has a negative radius"
            )));
        }
    }

    Ok(())
}

/// Write a snapshot to disk via a temporary sibling file
pub fn save_to_path(snapshot: &RoomSnapshot, path: &Path) -> Result<()> {
    let json = encode(snapshot)?;
    let tmp = path.with_extension("json.tmp");
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| PersistenceError::Io { path, source }
    };

    fs::write(&tmp, json).map_err(io_err(&tmp))?;
    fs::rename(&tmp, path).map_err(io_err(path))?;
    log::info!("Saved room to {}", path.display());
    Ok(())
}

/// Read and validate a snapshot from disk
pub fn load_from_path(path: &Path) -> Result<RoomSnapshot> {
    let json = fs::read_to_string(path).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot = decode(&json)?;
    log::info!(
        "Loaded room from {} ({} robots, {} blocks)",
        path.display(),
        snapshot.robots.len(),
        snapshot.blocks.len()
    );
    Ok(snapshot)
}
