//! Timer-driven ghost creation, the entrances ghosts come through, and the
//! new-entrance milestone.

use std::time::Duration;

use bevy_ecs::{
    resource::Resource,
    system::{Res, ResMut},
};
use glam::Vec2;
use rand::{rngs::SmallRng, seq::IndexedRandom, Rng, SeedableRng};
use strum::{EnumCount, IntoEnumIterator};
use tracing::{debug, error};

use crate::constants::{
    mechanics::{GHOST_MAX_SPEED, GHOST_MIN_SPEED, SPAWN_INTERVAL},
    spawn::{GHOST_TINTS, INITIAL_POINTS, WALL_INSET},
    world,
};
use crate::systems::store::EntityStore;
use crate::systems::{DeltaTime, GameState, Tint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SpawnKind {
    Door,
    Window,
}

/// The four walls of the room.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::EnumIter, strum_macros::EnumCount,
)]
pub enum Wall {
    Top,
    Bottom,
    Left,
    Right,
}

impl Wall {
    /// Rotation of an entrance on this wall, in degrees.
    pub fn entry_angle(self) -> f32 {
        match self {
            Wall::Top | Wall::Bottom => 0.0,
            Wall::Left => 90.0,
            Wall::Right => -90.0,
        }
    }
}

/// A door or window ghosts enter through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPoint {
    pub position: Vec2,
    pub kind: SpawnKind,
    /// Degrees.
    pub entry_angle: f32,
}

/// Every entrance in the room. Starts with five and only ever grows.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SpawnPoints(Vec<SpawnPoint>);

impl Default for SpawnPoints {
    fn default() -> Self {
        Self(
            INITIAL_POINTS
                .iter()
                .map(|&(position, kind)| SpawnPoint {
                    position,
                    kind,
                    entry_angle: 0.0,
                })
                .collect(),
        )
    }
}

impl SpawnPoints {
    pub fn as_slice(&self) -> &[SpawnPoint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A uniformly random entrance. `None` only if the invariant that the list is
    /// never empty has been broken.
    pub fn choose(&self, rng: &mut impl Rng) -> Option<SpawnPoint> {
        self.0.choose(rng).copied()
    }
}

/// The random source for everything in the game, seedable for reproducible runs.
#[derive(Resource, Debug)]
pub struct GameRng(pub SmallRng);

impl GameRng {
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(SmallRng::seed_from_u64(seed)),
            None => Self(SmallRng::from_os_rng()),
        }
    }
}

/// The periodic spawn timer. `Idle` before the first game and after game over.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SpawnTimer {
    #[default]
    Idle,
    Armed {
        until_next: Duration,
    },
}

impl SpawnTimer {
    pub fn arm(&mut self) {
        *self = SpawnTimer::Armed {
            until_next: SPAWN_INTERVAL,
        };
    }

    pub fn disarm(&mut self) {
        *self = SpawnTimer::Idle;
    }

    pub fn is_armed(&self) -> bool {
        matches!(self, SpawnTimer::Armed { .. })
    }

    /// Advances the timer and returns how many spawns came due. Idle timers never fire.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        let SpawnTimer::Armed { until_next } = self else {
            return 0;
        };

        let mut remaining = dt;
        let mut fired = 0;
        while remaining >= *until_next {
            remaining -= *until_next;
            *until_next = SPAWN_INTERVAL;
            fired += 1;
        }
        *until_next -= remaining;
        fired
    }
}

/// Draws a ghost speed: a whole number in `[40, 80]`, scaled by the difficulty multiplier.
pub fn roll_ghost_speed(rng: &mut impl Rng, multiplier: f32) -> f32 {
    rng.random_range(GHOST_MIN_SPEED..=GHOST_MAX_SPEED) as f32 * multiplier
}

/// A whole-number coordinate along a wall of `length`, kept clear of the corners.
fn along_wall(rng: &mut impl Rng, length: f32) -> f32 {
    rng.random_range(WALL_INSET as u32..=(length - WALL_INSET) as u32) as f32
}

/// Opens a new entrance on a random wall and returns it.
pub fn add_spawn_point(points: &mut SpawnPoints, rng: &mut impl Rng) -> SpawnPoint {
    let wall = Wall::iter().nth(rng.random_range(0..Wall::COUNT)).unwrap_or(Wall::Top);
    let position = match wall {
        Wall::Top => Vec2::new(along_wall(rng, world::WIDTH), WALL_INSET),
        Wall::Bottom => Vec2::new(along_wall(rng, world::WIDTH), world::HEIGHT - WALL_INSET),
        Wall::Left => Vec2::new(WALL_INSET, along_wall(rng, world::HEIGHT)),
        Wall::Right => Vec2::new(world::WIDTH - WALL_INSET, along_wall(rng, world::HEIGHT)),
    };
    let kind = if rng.random_bool(0.5) {
        SpawnKind::Door
    } else {
        SpawnKind::Window
    };

    let point = SpawnPoint {
        position,
        kind,
        entry_angle: wall.entry_angle(),
    };
    points.0.push(point);

    debug!(%wall, %kind, x = position.x, y = position.y, total = points.len(), "New entrance opened");
    point
}

/// Spawns a ghost at a random entrance every time the spawn timer fires.
pub fn spawn_system(
    dt: Res<DeltaTime>,
    state: Res<GameState>,
    points: Res<SpawnPoints>,
    mut timer: ResMut<SpawnTimer>,
    mut rng: ResMut<GameRng>,
    mut store: EntityStore,
) {
    for _ in 0..timer.advance(dt.duration()) {
        let Some(point) = points.choose(&mut rng.0) else {
            debug_assert!(false, "spawn point list must never be empty");
            error!("No spawn points available, skipping ghost spawn");
            return;
        };

        let speed = roll_ghost_speed(&mut rng.0, state.difficulty_multiplier());
        let tint = Tint(GHOST_TINTS.choose(&mut rng.0).copied());
        store.spawn_ghost(&point, speed, tint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_timer_never_fires() {
        let mut timer = SpawnTimer::Idle;
        assert_eq!(timer.advance(Duration::from_secs(10)), 0);
    }

    #[test]
    fn armed_timer_fires_every_interval() {
        let mut timer = SpawnTimer::default();
        timer.arm();
        assert_eq!(timer.advance(Duration::from_millis(1999)), 0);
        assert_eq!(timer.advance(Duration::from_millis(1)), 1);
        assert_eq!(timer.advance(Duration::from_millis(4000)), 2);
        assert_eq!(
            timer,
            SpawnTimer::Armed {
                until_next: SPAWN_INTERVAL
            }
        );
    }

    #[test]
    fn every_wall_has_an_entry_angle() {
        let angles: Vec<f32> = Wall::iter().map(Wall::entry_angle).collect();
        assert_eq!(angles.len(), Wall::COUNT);
        assert_eq!(angles, vec![0.0, 0.0, 90.0, -90.0]);
    }
}
