use std::time::Duration;

use bevy_ecs::{
    component::Component,
    entity::Entity,
    system::{Commands, Query, Res},
};
use tracing::trace;

use crate::constants::mechanics::ATTACK_LIFETIME;
use crate::systems::{AttackHitbox, DeltaTime};

/// Component for entities that should be removed once a fixed duration has passed.
///
/// Used for fading ghosts and every fire-and-forget visual effect. These keep
/// running while the game is paused or over; nothing in game logic waits on them.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct TimeToLive {
    pub remaining: Duration,
    pub total: Duration,
}

impl TimeToLive {
    pub fn new(duration: Duration) -> Self {
        Self {
            remaining: duration,
            total: duration,
        }
    }

    /// Progress through the lifetime, from 0.0 (just created) to 1.0 (expired).
    pub fn progress(&self) -> f32 {
        if self.total.is_zero() {
            return 1.0;
        }
        1.0 - self.remaining.as_secs_f32() / self.total.as_secs_f32()
    }
}

/// Counts every `TimeToLive` down and despawns the entities that have expired.
pub fn time_to_live_system(mut commands: Commands, dt: Res<DeltaTime>, mut query: Query<(Entity, &mut TimeToLive)>) {
    let elapsed = dt.duration();
    for (entity, mut ttl) in query.iter_mut() {
        if ttl.remaining <= elapsed {
            trace!(?entity, "Lifetime expired");
            commands.entity(entity).try_despawn();
        } else {
            ttl.remaining -= elapsed;
        }
    }
}

/// Ends the net swing once its lifetime is over.
///
/// Runs regardless of the game phase, so a swing started just before game over
/// still finishes on time.
pub fn hitbox_lifetime_system(dt: Res<DeltaTime>, mut hitboxes: Query<&mut AttackHitbox>) {
    for mut hitbox in hitboxes.iter_mut() {
        if hitbox.advance(dt.duration(), ATTACK_LIFETIME) {
            trace!("Net swing ended");
        }
    }
}
