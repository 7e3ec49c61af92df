//! Entity capabilities and change events
//!
//! Entities do not hold listener collections. Every mutation pushes a
//! [`Change`] onto the owning room's [`ChangeLog`]; the presentation layer
//! drains the log once per frame.

use serde::{Deserialize, Serialize};

/// Index of a robot inside its room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RobotId(pub usize);

/// Index of a block inside its room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub usize);

/// Something that can be frozen in place
pub trait Pausable {
    fn pause(&mut self);
    fn resume(&mut self);
    fn is_paused(&self) -> bool;
}

/// Something that advances with simulated time
pub trait Tickable {
    /// Advance by `delta_nanos` of simulated time
    fn update(&mut self, delta_nanos: u64);
}

/// What changed, as seen by an observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Change {
    /// Room-wide refresh: anything may have moved
    Room,
    Robot(RobotId),
    Block(BlockId),
}

/// Ordered queue of pending change events
#[derive(Debug, Clone, Default)]
pub struct ChangeLog {
    pending: Vec<Change>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a change; a repeat of the most recent event is coalesced
    pub fn push(&mut self, change: Change) {
        if self.pending.last() != Some(&change) {
            self.pending.push(change);
        }
    }

    /// Take every pending event in emission order
    pub fn drain(&mut self) -> Vec<Change> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
