//! Seeded scene generation
//!
//! Places square blocks and robots at random, rejecting any candidate that
//! overlaps what is already there. Same seed and settings, same room.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::Settings;
use crate::sim::{Circle, Rect, RobotParams, Room, Shape, shapes_intersect};

/// Candidates tried per entity before giving up on it
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 200;

/// Build a room with up to `robots` robots and `blocks` blocks.
///
/// Entities that cannot be placed within [`MAX_PLACEMENT_ATTEMPTS`] are
/// skipped with a warning, so the result is always a valid room.
pub fn generate_room(seed: u64, settings: &Settings, robots: usize, blocks: usize) -> Room {
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut room = Room::new(settings.room_width, settings.room_height);
    room.set_max_turn_retries(settings.max_turn_retries);

    let size = settings.block_size;
    for n in 0..blocks {
        let placed = (0..MAX_PLACEMENT_ATTEMPTS).find_map(|_| {
            let rect = random_block(&mut rng, &room, size)?;
            is_free(&room, &Shape::Rect(rect)).then_some(rect)
        });
        match placed {
            Some(r) => {
                room.add_block(r.x, r.y, r.width, r.height);
            }
            None => log::warn!("Could not place block {n}, skipping"),
        }
    }

    let template = settings.robot;
    for n in 0..robots {
        let placed = (0..MAX_PLACEMENT_ATTEMPTS).find_map(|_| {
            let center = random_center(&mut rng, &room, template.radius)?;
            let body = Circle::new(center, template.radius);
            is_free(&room, &Shape::Circle(body)).then_some(center)
        });
        match placed {
            Some(center) => {
                let heading_deg = rng.random_range(0.0..360.0);
                room.add_robot(RobotParams {
                    center,
                    heading_deg,
                    ..template
                });
            }
            None => log::warn!("Could not place robot {n}, skipping"),
        }
    }

    log::info!(
        "Generated room {}x{} with {} robots and {} blocks (seed {seed})",
        room.width(),
        room.height(),
        room.robots().len(),
        room.blocks().len()
    );
    room
}

fn random_block(rng: &mut Pcg32, room: &Room, size: f64) -> Option<Rect> {
    let (max_x, max_y) = (room.width() - size, room.height() - size);
    if !(max_x > 0.0 && max_y > 0.0) {
        return None;
    }
    let x = rng.random_range(0.0..max_x);
    let y = rng.random_range(0.0..max_y);
    Some(Rect::new(x, y, size, size))
}

fn random_center(rng: &mut Pcg32, room: &Room, radius: f64) -> Option<DVec2> {
    let (lo, hi) = (radius, DVec2::new(room.width() - radius, room.height() - radius));
    if !(hi.x > lo && hi.y > lo) {
        return None;
    }
    Some(DVec2::new(
        rng.random_range(lo..hi.x),
        rng.random_range(lo..hi.y),
    ))
}

fn is_free(room: &Room, shape: &Shape) -> bool {
    !room.colliders().any(|c| shapes_intersect(shape, &c.shape))
}
