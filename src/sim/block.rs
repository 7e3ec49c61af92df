//! Static rectangular obstacles

use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::entity::{BlockId, Change, Pausable, Tickable};
use super::room::Room;

/// A block entity (axis-aligned rectangle)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub(crate) id: BlockId,
    pub(crate) frame: Rect,
    pub(crate) paused: bool,
}

impl Block {
    pub(crate) fn new(id: BlockId, frame: Rect) -> Self {
        // Blocks are placed paused: they never move on their own
        Self {
            id,
            frame,
            paused: true,
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    /// Collider rectangle
    pub fn rect(&self) -> Rect {
        self.frame
    }

    pub fn left_top_x(&self) -> f64 {
        self.frame.x
    }

    pub fn left_top_y(&self) -> f64 {
        self.frame.y
    }

    pub fn width(&self) -> f64 {
        self.frame.width
    }

    pub fn height(&self) -> f64 {
        self.frame.height
    }
}

impl Pausable for Block {
    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}

impl Tickable for Block {
    fn update(&mut self, _delta_nanos: u64) {
        if self.paused {
            return;
        }
        // Blocks are static
    }
}

/// Mutable access to one block; edits report `Change::Block` only when a
/// value actually changes
pub struct BlockMut<'a> {
    pub(crate) room: &'a mut Room,
    pub(crate) id: BlockId,
}

impl BlockMut<'_> {
    pub fn block(&self) -> &Block {
        &self.room.blocks[self.id.0]
    }

    fn edit(&mut self, apply: impl FnOnce(&mut Rect) -> bool) -> bool {
        let changed = apply(&mut self.room.blocks[self.id.0].frame);
        if changed {
            self.room.changes.push(Change::Block(self.id));
        }
        changed
    }

    /// Returns whether the value changed
    pub fn set_left_top_x(&mut self, x: f64) -> bool {
        self.edit(|r| replace_if_different(&mut r.x, x))
    }

    pub fn set_left_top_y(&mut self, y: f64) -> bool {
        self.edit(|r| replace_if_different(&mut r.y, y))
    }

    pub fn set_width(&mut self, width: f64) -> bool {
        self.edit(|r| replace_if_different(&mut r.width, width))
    }

    pub fn set_height(&mut self, height: f64) -> bool {
        self.edit(|r| replace_if_different(&mut r.height, height))
    }
}

#[inline]
fn replace_if_different(slot: &mut f64, value: f64) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
