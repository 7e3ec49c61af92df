//! The room: bounds, obstacles and robots
//!
//! The room is an arena. Blocks and robots live in vectors and refer to
//! each other only through their [`BlockId`] / [`RobotId`] indices, which
//! double as the id counter since entities are never removed one by one.

use glam::DVec2;

use super::block::{Block, BlockMut};
use super::collision::{Rect, Shape, point_in_rect};
use super::entity::{BlockId, Change, ChangeLog, Pausable, RobotId, Tickable};
use super::robot::{Robot, RobotMut, RobotParams};
use crate::consts::MAX_TURN_RETRIES;

/// Which entity a collider belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColliderOwner {
    Robot(RobotId),
    Block(BlockId),
}

/// A shape that can block movement, tagged with its owner
#[derive(Debug, Clone, Copy)]
pub struct Collider {
    pub owner: ColliderOwner,
    pub shape: Shape,
}

/// A bounded rectangular room
#[derive(Debug, Clone)]
pub struct Room {
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) blocks: Vec<Block>,
    pub(crate) robots: Vec<Robot>,
    pub(crate) changes: ChangeLog,
    /// Autonomous turn-and-retry passes allowed per robot per tick
    pub(crate) max_turn_retries: u32,
    paused: bool,
}

impl Room {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            blocks: Vec::new(),
            robots: Vec::new(),
            changes: ChangeLog::new(),
            max_turn_retries: MAX_TURN_RETRIES,
            paused: false,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Room rectangle anchored at the origin
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    pub fn max_turn_retries(&self) -> u32 {
        self.max_turn_retries
    }

    pub fn set_max_turn_retries(&mut self, retries: u32) {
        self.max_turn_retries = retries;
    }

    /// Place a block; blocks start (and stay) paused
    pub fn add_block(&mut self, x: f64, y: f64, width: f64, height: f64) -> BlockId {
        let id = BlockId(self.blocks.len());
        self.blocks.push(Block::new(id, Rect::new(x, y, width, height)));
        self.changes.push(Change::Room);
        id
    }

    /// Place a robot; it follows the room's current pause state
    pub fn add_robot(&mut self, params: RobotParams) -> RobotId {
        let id = RobotId(self.robots.len());
        let mut robot = Robot::new(id, &params);
        robot.paused = self.paused;
        self.robots.push(robot);
        self.changes.push(Change::Room);
        id
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.0)
    }

    pub fn block_mut(&mut self, id: BlockId) -> Option<BlockMut<'_>> {
        (id.0 < self.blocks.len()).then_some(BlockMut { room: self, id })
    }

    pub fn robot(&self, id: RobotId) -> Option<&Robot> {
        self.robots.get(id.0)
    }

    pub fn robot_mut(&mut self, id: RobotId) -> Option<RobotMut<'_>> {
        (id.0 < self.robots.len()).then_some(RobotMut { room: self, id })
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    /// Closed-interval containment in [0, width] x [0, height]
    pub fn is_point_in_room(&self, x: f64, y: f64) -> bool {
        point_in_rect(DVec2::new(x, y), &self.bounds())
    }

    /// No robot collides or sticks out of the room (blocks are not checked)
    pub fn is_in_valid_state(&self) -> bool {
        self.robots
            .iter()
            .all(|r| !r.is_colliding(self) && !r.is_out_of_room(self))
    }

    /// Every robot body and block rectangle, built from live geometry
    pub fn colliders(&self) -> impl Iterator<Item = Collider> + '_ {
        let robots = self.robots.iter().map(|r| Collider {
            owner: ColliderOwner::Robot(r.id),
            shape: Shape::Circle(r.body()),
        });
        let blocks = self.blocks.iter().map(|b| Collider {
            owner: ColliderOwner::Block(b.id),
            shape: Shape::Rect(b.rect()),
        });
        robots.chain(blocks)
    }

    /// Queue a refresh of the room and every entity in it
    pub fn notify_all(&mut self) {
        self.changes.push(Change::Room);
        for r in &self.robots {
            self.changes.push(Change::Robot(r.id));
        }
        for b in &self.blocks {
            self.changes.push(Change::Block(b.id));
        }
    }

    /// Hand pending change events to the presentation layer
    pub fn drain_changes(&mut self) -> Vec<Change> {
        self.changes.drain()
    }

    pub fn pending_changes(&self) -> usize {
        self.changes.len()
    }
}

impl Tickable for Room {
    /// Update every robot present when the pass starts, in arena order
    fn update(&mut self, delta_nanos: u64) {
        let count = self.robots.len();
        for index in 0..count {
            RobotMut {
                room: self,
                id: RobotId(index),
            }
            .update(delta_nanos);
        }
    }
}

impl Pausable for Room {
    fn pause(&mut self) {
        for r in &mut self.robots {
            r.pause();
        }
        for b in &mut self.blocks {
            b.pause();
        }
        self.paused = true;
    }

    fn resume(&mut self) {
        for r in &mut self.robots {
            r.resume();
        }
        for b in &mut self.blocks {
            b.resume();
        }
        self.paused = false;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}
