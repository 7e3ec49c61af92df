//! Sensor arc geometry (pie slice)
//!
//! A sensor arc is a circular sector anchored at a robot's center:
//! - radius: reach of the sensor
//! - start_deg: angle of the first radial edge (screen convention, CCW)
//! - extent_deg: angular sweep from start, always stored non-negative

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::{heading_vector, normalize_degrees, vector_heading};

/// Slack for angular comparisons so edge directions count as inside
const ANGLE_EPSILON: f64 = 1e-9;

/// A pie-slice sector in screen space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorArc {
    pub center: DVec2,
    pub radius: f64,
    /// Start angle (degrees, not normalized)
    pub start_deg: f64,
    /// Angular sweep (degrees, >= 0)
    pub extent_deg: f64,
}

impl SensorArc {
    /// Build a sector; a negative extent sweeps clockwise from `start_deg`
    pub fn new(center: DVec2, radius: f64, start_deg: f64, extent_deg: f64) -> Self {
        let (start_deg, extent_deg) = if extent_deg < 0.0 {
            (start_deg + extent_deg, -extent_deg)
        } else {
            (start_deg, extent_deg)
        };
        Self {
            center,
            radius,
            start_deg,
            extent_deg,
        }
    }

    /// Sector centered on a heading: start = heading - extent / 2
    pub fn centered_on(center: DVec2, radius: f64, heading_deg: f64, extent_deg: f64) -> Self {
        Self::new(center, radius, heading_deg - extent_deg / 2.0, extent_deg)
    }

    /// Covers no area at all
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.radius <= 0.0 || self.extent_deg <= 0.0
    }

    /// Sweep covers the whole disk
    #[inline]
    pub fn is_full_disk(&self) -> bool {
        self.extent_deg >= 360.0
    }

    /// End angle of the sweep (degrees, not normalized)
    #[inline]
    pub fn end_deg(&self) -> f64 {
        self.start_deg + self.extent_deg
    }

    /// Bisector of the sweep, i.e. the heading the sensor faces
    #[inline]
    pub fn mid_deg(&self) -> f64 {
        self.start_deg + self.extent_deg / 2.0
    }

    /// Check if a direction (degrees) is within the angular extent
    pub fn contains_angle(&self, theta_deg: f64) -> bool {
        if self.is_full_disk() {
            return true;
        }
        let offset = normalize_degrees(theta_deg - self.start_deg);
        // Directions just below start wrap to ~360 after normalization
        offset <= self.extent_deg + ANGLE_EPSILON || offset >= 360.0 - ANGLE_EPSILON
    }

    /// Check if a point is inside the sector (boundary included)
    pub fn contains_point(&self, point: DVec2) -> bool {
        if self.is_empty() {
            return false;
        }
        let offset = point - self.center;
        let dist = offset.length();
        if dist > self.radius {
            return false;
        }
        if dist == 0.0 {
            return true;
        }
        self.contains_angle(vector_heading(offset))
    }

    /// Outer end of the starting radial edge
    pub fn start_point(&self) -> DVec2 {
        self.center + heading_vector(self.start_deg) * self.radius
    }

    /// Outer end of the closing radial edge
    pub fn end_point(&self) -> DVec2 {
        self.center + heading_vector(self.end_deg()) * self.radius
    }

    /// The two straight edges as (from, to) segments; empty for a full disk
    pub fn radial_edges(&self) -> Vec<(DVec2, DVec2)> {
        if self.is_full_disk() {
            return Vec::new();
        }
        vec![
            (self.center, self.start_point()),
            (self.center, self.end_point()),
        ]
    }
}
