//! Robots: circular movers with a pie-slice obstacle sensor
//!
//! Each tick a robot either rotates toward its pending turn or translates
//! along its heading. Autonomous robots that see an obstacle (or bump into
//! one) load a turn and retry within the same tick.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::arc::SensorArc;
use super::collision::{Circle, Shape, shapes_intersect};
use super::entity::{Change, Pausable, RobotId, Tickable};
use super::room::{ColliderOwner, Room};
use crate::consts::*;
use crate::{heading_vector, nanos_to_secs};

/// Who drives the robot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RobotMode {
    /// Moves forward and turns away from whatever its sensor sees
    #[default]
    Autonomous,
    /// Moves only when started, turns only on request
    UserControlled,
}

/// Motion phase derived from the pending rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RobotState {
    Rotating,
    Translating,
}

/// Initial values for a new robot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotParams {
    pub center: DVec2,
    pub radius: f64,
    /// Heading in degrees (screen convention)
    pub heading_deg: f64,
    pub sensor_radius: f64,
    pub sensor_extent_deg: f64,
    /// Angle loaded by each autonomous turn
    pub turn_sample_deg: f64,
    /// Linear speed (units per second)
    pub speed: f64,
    /// Angular speed (degrees per second)
    pub rotation_speed: f64,
}

impl Default for RobotParams {
    fn default() -> Self {
        Self {
            center: DVec2::ZERO,
            radius: ROBOT_RADIUS,
            heading_deg: 0.0,
            sensor_radius: SENSOR_ARC_RADIUS,
            sensor_extent_deg: SENSOR_ARC_EXTENT,
            turn_sample_deg: ROBOT_TURN_SAMPLE,
            speed: ROBOT_SPEED,
            rotation_speed: ROBOT_ROTATION_SPEED,
        }
    }
}

impl RobotParams {
    /// Defaults placed at the given center
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            center: DVec2::new(x, y),
            ..Default::default()
        }
    }
}

/// A robot entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Robot {
    pub(crate) id: RobotId,
    pub(crate) center: DVec2,
    pub(crate) radius: f64,
    pub(crate) heading_deg: f64,
    pub(crate) speed: f64,
    pub(crate) rotation_speed: f64,
    pub(crate) turn_sample_deg: f64,
    pub(crate) sensor_radius: f64,
    pub(crate) sensor_extent_deg: f64,
    /// Start angle of the sensor, kept at heading - extent / 2
    pub(crate) sensor_start_deg: f64,
    /// Signed degrees still to rotate (0 when idle)
    pub(crate) left_to_rotate: f64,
    pub(crate) mode: RobotMode,
    pub(crate) movement_stopped: bool,
    pub(crate) paused: bool,
}

impl Robot {
    pub(crate) fn new(id: RobotId, params: &RobotParams) -> Self {
        Self {
            id,
            center: params.center,
            radius: params.radius,
            heading_deg: params.heading_deg,
            speed: params.speed,
            rotation_speed: params.rotation_speed,
            turn_sample_deg: params.turn_sample_deg,
            sensor_radius: params.sensor_radius,
            sensor_extent_deg: params.sensor_extent_deg,
            sensor_start_deg: params.heading_deg - params.sensor_extent_deg / 2.0,
            left_to_rotate: 0.0,
            mode: RobotMode::Autonomous,
            movement_stopped: true,
            paused: false,
        }
    }

    /// Current values as construction parameters
    pub fn params(&self) -> RobotParams {
        RobotParams {
            center: self.center,
            radius: self.radius,
            heading_deg: self.heading_deg,
            sensor_radius: self.sensor_radius,
            sensor_extent_deg: self.sensor_extent_deg,
            turn_sample_deg: self.turn_sample_deg,
            speed: self.speed,
            rotation_speed: self.rotation_speed,
        }
    }

    pub fn id(&self) -> RobotId {
        self.id
    }
    pub fn center(&self) -> DVec2 {
        self.center
    }
    pub fn center_x(&self) -> f64 {
        self.center.x
    }
    pub fn center_y(&self) -> f64 {
        self.center.y
    }
    pub fn radius(&self) -> f64 {
        self.radius
    }
    pub fn current_angle(&self) -> f64 {
        self.heading_deg
    }
    pub fn speed(&self) -> f64 {
        self.speed
    }
    pub fn rotation_speed(&self) -> f64 {
        self.rotation_speed
    }
    pub fn turn_sample(&self) -> f64 {
        self.turn_sample_deg
    }
    pub fn arc_radius(&self) -> f64 {
        self.sensor_radius
    }
    pub fn arc_extent(&self) -> f64 {
        self.sensor_extent_deg
    }
    pub fn arc_start_angle(&self) -> f64 {
        self.sensor_start_deg
    }
    pub fn left_to_rotate(&self) -> f64 {
        self.left_to_rotate
    }
    pub fn mode(&self) -> RobotMode {
        self.mode
    }
    pub fn is_movement_stopped(&self) -> bool {
        self.movement_stopped
    }

    /// Body collider
    pub fn body(&self) -> Circle {
        Circle::new(self.center, self.radius)
    }

    /// Sensor region in its current orientation
    pub fn sensor(&self) -> SensorArc {
        SensorArc::new(
            self.center,
            self.sensor_radius,
            self.sensor_start_deg,
            self.sensor_extent_deg,
        )
    }

    pub fn is_rotating(&self) -> bool {
        self.left_to_rotate.abs() > ROTATION_TOLERANCE_DEG
    }

    pub fn state(&self) -> RobotState {
        if self.is_rotating() {
            RobotState::Rotating
        } else {
            RobotState::Translating
        }
    }

    /// Body overlaps any other robot or block
    pub fn is_colliding(&self, room: &Room) -> bool {
        self.touches_any(&Shape::Circle(self.body()), room)
    }

    /// Sensor sees any other robot or block
    pub fn has_detected(&self, room: &Room) -> bool {
        self.touches_any(&Shape::Sector(self.sensor()), room)
    }

    /// Either corner of the bounding square lies outside the room
    pub fn is_out_of_room(&self, room: &Room) -> bool {
        let reach = DVec2::splat(self.radius);
        let lo = self.center - reach;
        let hi = self.center + reach;
        !room.is_point_in_room(hi.x, hi.y) || !room.is_point_in_room(lo.x, lo.y)
    }

    fn touches_any(&self, shape: &Shape, room: &Room) -> bool {
        room.colliders()
            .filter(|c| c.owner != ColliderOwner::Robot(self.id))
            .any(|c| shapes_intersect(shape, &c.shape))
    }

    fn rederive_sensor_start(&mut self) {
        self.sensor_start_deg = self.heading_deg - self.sensor_extent_deg / 2.0;
    }
}

impl Pausable for Robot {
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

/// Mutable access to one robot together with the room it moves in
pub struct RobotMut<'a> {
    pub(crate) room: &'a mut Room,
    pub(crate) id: RobotId,
}

impl RobotMut<'_> {
    pub fn robot(&self) -> &Robot {
        &self.room.robots[self.id.0]
    }

    fn robot_mut(&mut self) -> &mut Robot {
        &mut self.room.robots[self.id.0]
    }

    /// Apply an edit and report a room-wide change
    fn edit(&mut self, apply: impl FnOnce(&mut Robot)) {
        apply(self.robot_mut());
        self.room.changes.push(Change::Room);
    }

    pub fn is_colliding(&self) -> bool {
        self.robot().is_colliding(self.room)
    }

    pub fn has_detected(&self) -> bool {
        self.robot().has_detected(self.room)
    }

    pub fn is_out_of_room(&self) -> bool {
        self.robot().is_out_of_room(self.room)
    }

    /// Translate along the heading; reverts and returns false if the new
    /// position leaves the room or overlaps another collider
    pub fn move_on_distance(&mut self, distance: f64) -> bool {
        let before = self.robot().center;
        let step = heading_vector(self.robot().heading_deg) * distance;
        self.robot_mut().center = before + step;

        let blocked = self.is_out_of_room() || self.is_colliding();
        if blocked {
            self.robot_mut().center = before;
        }
        self.room.changes.push(Change::Room);
        !blocked
    }

    /// Load one turn sample (negated when `reverse`); ignored mid-rotation
    pub fn turn(&mut self, reverse: bool) {
        let robot = self.robot_mut();
        if robot.is_rotating() {
            return;
        }
        robot.left_to_rotate = if reverse {
            -robot.turn_sample_deg
        } else {
            robot.turn_sample_deg
        };
    }

    fn rotate_step(&mut self, delta_secs: f64) {
        self.edit(|r| {
            let frame = (r.rotation_speed * delta_secs)
                .abs()
                .min(r.left_to_rotate.abs())
                .copysign(r.left_to_rotate);
            r.heading_deg += frame;
            r.rederive_sensor_start();
            r.left_to_rotate -= frame;
        });
    }

    pub fn set_center_x(&mut self, x: f64) {
        self.edit(|r| r.center.x = x);
    }

    pub fn set_center_y(&mut self, y: f64) {
        self.edit(|r| r.center.y = y);
    }

    pub fn set_robot_radius(&mut self, radius: f64) {
        self.edit(|r| r.radius = radius);
    }

    pub fn set_arc_radius(&mut self, radius: f64) {
        self.edit(|r| r.sensor_radius = radius);
    }

    pub fn set_arc_extent(&mut self, extent_deg: f64) {
        self.edit(|r| {
            r.sensor_extent_deg = extent_deg;
            r.rederive_sensor_start();
        });
    }

    pub fn set_current_angle(&mut self, heading_deg: f64) {
        self.edit(|r| {
            r.heading_deg = heading_deg;
            r.rederive_sensor_start();
        });
    }

    pub fn set_mode(&mut self, mode: RobotMode) {
        self.edit(|r| r.mode = mode);
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.edit(|r| r.speed = speed);
    }

    pub fn set_rotation_speed(&mut self, deg_per_sec: f64) {
        self.edit(|r| r.rotation_speed = deg_per_sec);
    }

    pub fn set_turn_sample(&mut self, deg: f64) {
        self.edit(|r| r.turn_sample_deg = deg);
    }

    pub fn stop_movement(&mut self) {
        self.robot_mut().movement_stopped = true;
    }

    pub fn start_movement(&mut self) {
        self.robot_mut().movement_stopped = false;
    }

    pub fn toggle_movement(&mut self) {
        let robot = self.robot_mut();
        robot.movement_stopped = !robot.movement_stopped;
    }

    pub fn pause(&mut self) {
        self.robot_mut().pause();
    }

    pub fn resume(&mut self) {
        self.robot_mut().resume();
    }
}

impl Tickable for RobotMut<'_> {
    fn update(&mut self, delta_nanos: u64) {
        let delta_secs = nanos_to_secs(delta_nanos);
        let max_retries = self.room.max_turn_retries;
        let mut retries = 0;

        loop {
            let robot = self.robot();
            if robot.paused {
                return;
            }
            if robot.is_rotating() {
                self.rotate_step(delta_secs);
                return;
            }

            let mode = robot.mode;
            let distance = if mode == RobotMode::UserControlled && robot.movement_stopped {
                0.0
            } else {
                robot.speed * delta_secs
            };

            let blocked = self.has_detected() || !self.move_on_distance(distance);
            if !blocked || mode != RobotMode::Autonomous {
                return;
            }

            self.turn(false);
            if retries >= max_retries {
                return;
            }
            retries += 1;
            log::debug!(
                "Robot {:?} blocked, turning to {:.1}°",
                self.id,
                self.robot().heading_deg + self.robot().left_to_rotate
            );
        }
    }
}
