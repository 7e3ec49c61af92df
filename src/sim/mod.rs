//! Simulation module
//!
//! All robot and room logic lives here. This module must stay free of I/O:
//! - Time only arrives through tick deltas
//! - Mutations report through the room's change log
//! - Stable iteration order (arena index)

pub mod arc;
pub mod block;
pub mod collision;
pub mod entity;
pub mod robot;
pub mod room;
pub mod snapshot;
pub mod tick;

pub use arc::SensorArc;
pub use block::{Block, BlockMut};
pub use collision::{Circle, Rect, Shape, point_in_rect, shapes_intersect};
pub use entity::{BlockId, Change, ChangeLog, Pausable, RobotId, Tickable};
pub use robot::{Robot, RobotMode, RobotMut, RobotParams, RobotState};
pub use room::{Collider, ColliderOwner, Room};
pub use snapshot::{BlockSnapshot, RobotSnapshot, RoomSnapshot};
pub use tick::{RewindOutcome, SimulationClock};
