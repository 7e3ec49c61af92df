//! Flat, serializable room snapshots
//!
//! A [`RoomSnapshot`] is pure data: it never references a live entity and
//! can rebuild an independent [`Room`] on demand. The same value backs the
//! rewind ledger and JSON files, so field names follow the file format.
//!
//! Not captured: robot mode, pause and movement flags, and pending rotation.
//! A rebuilt room starts with autonomous, unpaused robots.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::block::Block;
use super::robot::{Robot, RobotParams};
use super::room::Room;

/// Captured block rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockSnapshot {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl From<&Block> for BlockSnapshot {
    fn from(block: &Block) -> Self {
        let r = block.rect();
        Self {
            x: r.x,
            y: r.y,
            width: r.width,
            height: r.height,
        }
    }
}

/// Captured robot geometry and kinematics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotSnapshot {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
    pub speed_per_second: f64,
    pub rotation_speed_deg_per_sec: f64,
    pub turn_sample_deg: f64,
    pub current_angle_deg: f64,
    pub sensor_arc_radius: f64,
    pub sensor_arc_extent_deg: f64,
}

impl From<&Robot> for RobotSnapshot {
    fn from(robot: &Robot) -> Self {
        Self {
            center_x: robot.center_x(),
            center_y: robot.center_y(),
            radius: robot.radius(),
            speed_per_second: robot.speed(),
            rotation_speed_deg_per_sec: robot.rotation_speed(),
            turn_sample_deg: robot.turn_sample(),
            current_angle_deg: robot.current_angle(),
            sensor_arc_radius: robot.arc_radius(),
            sensor_arc_extent_deg: robot.arc_extent(),
        }
    }
}

impl RobotSnapshot {
    pub fn params(&self) -> RobotParams {
        RobotParams {
            center: DVec2::new(self.center_x, self.center_y),
            radius: self.radius,
            heading_deg: self.current_angle_deg,
            sensor_radius: self.sensor_arc_radius,
            sensor_extent_deg: self.sensor_arc_extent_deg,
            turn_sample_deg: self.turn_sample_deg,
            speed: self.speed_per_second,
            rotation_speed: self.rotation_speed_deg_per_sec,
        }
    }
}

/// Complete room state at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub width: f64,
    pub height: f64,
    pub blocks: Vec<BlockSnapshot>,
    pub robots: Vec<RobotSnapshot>,
}

impl RoomSnapshot {
    /// Copy the live room into a detached value
    pub fn capture(room: &Room) -> Self {
        Self {
            width: room.width(),
            height: room.height(),
            blocks: room.blocks().iter().map(BlockSnapshot::from).collect(),
            robots: room.robots().iter().map(RobotSnapshot::from).collect(),
        }
    }

    /// Rebuild an independent room, blocks first, in captured order
    pub fn build(&self) -> Room {
        let mut room = Room::new(self.width, self.height);
        for b in &self.blocks {
            room.add_block(b.x, b.y, b.width, b.height);
        }
        for r in &self.robots {
            room.add_robot(r.params());
        }
        room
    }
}
