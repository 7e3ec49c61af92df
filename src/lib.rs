//! Robot Room - circular robots roaming a rectangular room
//!
//! Core modules:
//! - `sim`: Simulation engine (entities, per-tick update, geometry, rewind ledger)
//! - `persistence`: JSON save/load of room snapshots
//! - `settings`: Data-driven defaults for rooms, robots and the driver
//! - `scenario`: Seeded scene generation

pub mod persistence;
pub mod scenario;
pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::DVec2;

/// Simulation configuration constants
pub mod consts {
    /// Nanoseconds per simulated second
    pub const NANOS_PER_SEC: u64 = 1_000_000_000;

    /// Remaining rotation below this (degrees) counts as "not rotating"
    pub const ROTATION_TOLERANCE_DEG: f64 = 0.1;

    /// Autonomous re-runs allowed per tick after a detection-triggered turn
    pub const MAX_TURN_RETRIES: u32 = 1;

    /// Room defaults
    pub const ROOM_WIDTH: f64 = 800.0;
    pub const ROOM_HEIGHT: f64 = 600.0;

    /// Robot defaults
    pub const ROBOT_RADIUS: f64 = 20.0;
    pub const ROBOT_SPEED: f64 = 100.0;
    pub const ROBOT_ROTATION_SPEED: f64 = 90.0;
    pub const ROBOT_TURN_SAMPLE: f64 = 45.0;
    pub const SENSOR_ARC_RADIUS: f64 = 60.0;
    pub const SENSOR_ARC_EXTENT: f64 = 60.0;

    /// Block defaults
    pub const BLOCK_SIZE: f64 = 50.0;
}

/// Convert a duration in nanoseconds to fractional seconds
#[inline]
pub fn nanos_to_secs(nanos: u64) -> f64 {
    nanos as f64 / consts::NANOS_PER_SEC as f64
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Unit direction for a heading in degrees (screen space, y axis down).
///
/// Headings grow counter-clockwise on screen, so a heading of 90° points up
/// (negative y).
#[inline]
pub fn heading_vector(degrees: f64) -> DVec2 {
    let radians = (-degrees).to_radians();
    DVec2::new(radians.cos(), radians.sin())
}

/// Screen-space heading (degrees in [0, 360)) of a vector, inverse of [`heading_vector`]
#[inline]
pub fn vector_heading(v: DVec2) -> f64 {
    normalize_degrees((-v.y).atan2(v.x).to_degrees())
}
