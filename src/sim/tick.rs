//! Frame-driven simulation clock with a whole-second rewind ledger
//!
//! The host render loop feeds monotonically increasing nanosecond
//! timestamps into [`SimulationClock::on_tick`]. The clock steps the live
//! room by the wall-clock delta, accumulates simulated time while running,
//! and captures one [`RoomSnapshot`] each time a new whole second elapses.
//! Ledger entry `i` is captured when elapsed time first reaches `i + 1` s.

use super::entity::{Pausable, Tickable};
use super::room::Room;
use super::snapshot::RoomSnapshot;
use crate::consts::NANOS_PER_SEC;

/// What a rewind request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewindOutcome {
    /// Negative target, or already at the latest recorded second
    Ignored,
    /// Target lies beyond recorded history; elapsed time left as is
    SnappedToLatest,
    /// Live room rebuilt from the ledger entry at this second
    Restored { second: usize },
}

/// Owns the live room, simulated time and the snapshot ledger
#[derive(Debug)]
pub struct SimulationClock {
    paused: bool,
    last_tick: Option<u64>,
    elapsed_nanos: u64,
    room: Room,
    snapshots: Vec<RoomSnapshot>,
}

impl SimulationClock {
    /// Wrap a room; the clock (and so the room) starts paused
    pub fn new(mut room: Room) -> Self {
        room.pause();
        Self {
            paused: true,
            last_tick: None,
            elapsed_nanos: 0,
            room,
            snapshots: Vec::new(),
        }
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn room_mut(&mut self) -> &mut Room {
        &mut self.room
    }

    pub fn elapsed_nanos(&self) -> u64 {
        self.elapsed_nanos
    }

    pub fn elapsed_whole_seconds(&self) -> u64 {
        self.elapsed_nanos / NANOS_PER_SEC
    }

    pub fn snapshots(&self) -> &[RoomSnapshot] {
        &self.snapshots
    }

    /// Forget the previous frame timestamp, e.g. when the host loop restarts
    pub fn restart(&mut self) {
        self.last_tick = None;
    }

    /// Advance by one host frame
    pub fn on_tick(&mut self, now: u64) {
        let Some(last) = self.last_tick else {
            self.last_tick = Some(now);
            return;
        };

        let delta = now.saturating_sub(last);
        // Entity pause flags gate the actual motion
        self.room.update(delta);
        if !self.paused {
            self.elapsed_nanos += delta;
            self.save_state();
        }
        self.last_tick = Some(now);
    }

    /// Append one snapshot if the ledger lags behind the elapsed whole seconds.
    ///
    /// At most one entry is added per call, so a delta spanning several
    /// seconds is backfilled over the following ticks.
    pub fn save_state(&mut self) {
        let whole_seconds = self.elapsed_whole_seconds();
        if (self.snapshots.len() as u64) < whole_seconds {
            self.snapshots.push(RoomSnapshot::capture(&self.room));
            log::info!(
                "State saved on {:.3}s (ledger size {})",
                self.elapsed_nanos as f64 / NANOS_PER_SEC as f64,
                self.snapshots.len()
            );
        }
    }

    /// Jump back to a previously recorded whole second
    pub fn rewind_to_second(&mut self, target: i64) -> RewindOutcome {
        let last_index = self.snapshots.len() as i64 - 1;
        if target < 0 || target == last_index {
            return RewindOutcome::Ignored;
        }

        let clamped = target.min(last_index);
        if clamped < target {
            log::warn!(
                "Second {} not recorded yet, staying at {}ns",
                target,
                self.elapsed_nanos
            );
            return RewindOutcome::SnappedToLatest;
        }

        // Anything after the target is a future that no longer exists
        let second = clamped as usize;
        self.snapshots.truncate(second + 1);
        let rebuilt = self.snapshots[second].build();
        self.replace_room(rebuilt);
        self.elapsed_nanos = second as u64 * NANOS_PER_SEC;
        log::info!("Rewound to second {}", second);
        RewindOutcome::Restored { second }
    }

    /// Replace the live room with one built from a loaded snapshot and start
    /// a fresh timeline
    pub fn load(&mut self, snapshot: &RoomSnapshot) {
        self.replace_room(snapshot.build());
        self.snapshots.clear();
        self.elapsed_nanos = 0;
        log::info!(
            "Loaded room {}x{} with {} robots and {} blocks",
            snapshot.width,
            snapshot.height,
            snapshot.robots.len(),
            snapshot.blocks.len()
        );
    }

    /// Swap in a new room graph; the old one is dropped as a unit
    fn replace_room(&mut self, mut room: Room) {
        room.set_max_turn_retries(self.room.max_turn_retries());
        if self.paused {
            room.pause();
        } else {
            room.resume();
        }
        room.notify_all();
        self.room = room;
    }
}

impl Pausable for SimulationClock {
    fn pause(&mut self) {
        self.paused = true;
        self.room.pause();
        log::info!("Simulation paused at {}ns", self.elapsed_nanos);
    }

    fn resume(&mut self) {
        self.paused = false;
        self.room.resume();
        log::info!("Simulation resumed at {}ns", self.elapsed_nanos);
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Change;
    use crate::sim::robot::RobotParams;

    const SECOND: u64 = NANOS_PER_SEC;
    const FRAME: u64 = SECOND / 10;

    fn running_clock() -> SimulationClock {
        let mut room = Room::new(10_000.0, 600.0);
        room.add_robot(RobotParams {
            speed: 100.0,
            rotation_speed: 0.0,
            ..RobotParams::at(100.0, 300.0)
        });
        let mut clock = SimulationClock::new(room);
        clock.resume();
        clock
    }

    /// Tick at 10 Hz from t=0 for the given number of frames after the first
    fn run_frames(clock: &mut SimulationClock, start: u64, frames: u64) -> u64 {
        let mut now = start;
        clock.on_tick(now);
        for _ in 0..frames {
            now += FRAME;
            clock.on_tick(now);
        }
        now
    }

    #[test]
    fn test_first_tick_only_records_timestamp() {
        let mut clock = running_clock();
        clock.on_tick(5 * SECOND);
        assert_eq!(clock.elapsed_nanos(), 0);
        assert_eq!(clock.room().robots()[0].center_x(), 100.0);

        clock.on_tick(5 * SECOND + FRAME);
        assert_eq!(clock.elapsed_nanos(), FRAME);
        assert!((clock.room().robots()[0].center_x() - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_clock_starts_paused() {
        let mut room = Room::new(800.0, 600.0);
        room.add_robot(RobotParams::at(100.0, 300.0));
        let mut clock = SimulationClock::new(room);
        assert!(clock.is_paused());
        assert!(clock.room().robots()[0].is_paused());

        clock.on_tick(0);
        clock.on_tick(SECOND);
        assert_eq!(clock.elapsed_nanos(), 0);
        assert!(clock.snapshots().is_empty());
        assert_eq!(clock.room().robots()[0].center_x(), 100.0);
    }

    #[test]
    fn test_three_and_a_half_seconds_yield_three_snapshots() {
        let mut clock = running_clock();
        run_frames(&mut clock, 0, 35);

        assert_eq!(clock.elapsed_nanos(), 35 * FRAME);
        assert_eq!(clock.snapshots().len(), 3);
        // Captured at 1s, 2s and 3s: the robot had covered 100 units per second
        for (i, snapshot) in clock.snapshots().iter().enumerate() {
            let expected = 100.0 + 100.0 * (i as f64 + 1.0);
            assert!((snapshot.robots[0].center_x - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_large_delta_backfills_one_snapshot_per_tick() {
        let mut clock = running_clock();
        clock.on_tick(0);
        clock.on_tick(3 * SECOND);
        assert_eq!(clock.snapshots().len(), 1);
        clock.on_tick(3 * SECOND + 1);
        assert_eq!(clock.snapshots().len(), 2);
        clock.on_tick(3 * SECOND + 2);
        assert_eq!(clock.snapshots().len(), 3);
        clock.on_tick(3 * SECOND + 3);
        assert_eq!(clock.snapshots().len(), 3);
    }

    #[test]
    fn test_paused_ticks_do_not_advance_time() {
        let mut clock = running_clock();
        let now = run_frames(&mut clock, 0, 10);
        clock.pause();
        let x = clock.room().robots()[0].center_x();
        run_frames(&mut clock, now, 30);
        assert_eq!(clock.elapsed_nanos(), SECOND);
        assert_eq!(clock.snapshots().len(), 1);
        assert_eq!(clock.room().robots()[0].center_x(), x);
    }

    #[test]
    fn test_rewind_to_latest_is_noop() {
        let mut clock = running_clock();
        run_frames(&mut clock, 0, 35);
        let elapsed = clock.elapsed_nanos();
        let x = clock.room().robots()[0].center_x();

        assert_eq!(clock.rewind_to_second(2), RewindOutcome::Ignored);
        assert_eq!(clock.elapsed_nanos(), elapsed);
        assert_eq!(clock.room().robots()[0].center_x(), x);
        assert_eq!(clock.snapshots().len(), 3);
    }

    #[test]
    fn test_rewind_rejects_negative_and_future_targets() {
        let mut clock = running_clock();
        run_frames(&mut clock, 0, 35);
        let elapsed = clock.elapsed_nanos();

        assert_eq!(clock.rewind_to_second(-1), RewindOutcome::Ignored);
        assert_eq!(clock.rewind_to_second(7), RewindOutcome::SnappedToLatest);
        assert_eq!(clock.elapsed_nanos(), elapsed);
        assert_eq!(clock.snapshots().len(), 3);
    }

    #[test]
    fn test_rewind_with_empty_ledger() {
        let mut clock = running_clock();
        assert_eq!(clock.rewind_to_second(0), RewindOutcome::SnappedToLatest);
        assert_eq!(clock.rewind_to_second(-1), RewindOutcome::Ignored);
    }

    #[test]
    fn test_rewind_restores_and_truncates() {
        let mut clock = running_clock();
        let now = run_frames(&mut clock, 0, 35);

        assert_eq!(
            clock.rewind_to_second(0),
            RewindOutcome::Restored { second: 0 }
        );
        assert_eq!(clock.elapsed_nanos(), 0);
        assert_eq!(clock.snapshots().len(), 1);
        let robot = &clock.room().robots()[0];
        assert!((robot.center_x() - 200.0).abs() < 1e-6);
        // Clock was running, so the rebuilt room runs too
        assert!(!robot.is_paused());

        // The rebuilt room asked for a full refresh
        let changes = clock.room_mut().drain_changes();
        assert_eq!(changes.first(), Some(&Change::Room));

        // Time continues from the restored second
        run_frames(&mut clock, now, 25);
        assert_eq!(clock.elapsed_nanos(), 25 * FRAME);
        assert_eq!(clock.snapshots().len(), 2);
    }

    #[test]
    fn test_rewind_while_paused_keeps_room_paused() {
        let mut clock = running_clock();
        run_frames(&mut clock, 0, 35);
        clock.pause();
        clock.rewind_to_second(1);
        assert!(clock.room().is_paused());
        assert!(clock.room().robots()[0].is_paused());
    }

    #[test]
    fn test_load_starts_new_timeline() {
        let mut clock = running_clock();
        run_frames(&mut clock, 0, 25);
        assert_eq!(clock.snapshots().len(), 2);

        let mut other = Room::new(300.0, 200.0);
        other.add_block(0.0, 0.0, 10.0, 10.0);
        clock.load(&RoomSnapshot::capture(&other));

        assert_eq!(clock.elapsed_nanos(), 0);
        assert!(clock.snapshots().is_empty());
        assert_eq!(clock.room().width(), 300.0);
        assert_eq!(clock.room().blocks().len(), 1);
        assert!(clock.room().robots().is_empty());
    }

    #[test]
    fn test_restart_forgets_last_timestamp() {
        let mut clock = running_clock();
        run_frames(&mut clock, 0, 5);
        clock.restart();
        clock.on_tick(100 * SECOND);
        assert_eq!(clock.elapsed_nanos(), 5 * FRAME);
    }
}
