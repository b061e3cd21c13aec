use bevy_ecs::{
    query::With,
    system::{Query, Res},
};
use glam::Vec2;
use tracing::trace;

use crate::constants::mechanics::PLAYER_SPEED;
use crate::systems::input::PlayerIntent;
use crate::systems::store::EntityStore;
use crate::systems::{Aim, Collider, DeltaTime, Facing, Player, Position, Velocity};

/// Aim rotation for a body moving at `velocity`. A player standing still keeps
/// pointing the way they face.
pub fn aim_rotation(velocity: Vec2, facing: Facing) -> f32 {
    if velocity == Vec2::ZERO {
        facing.rest_angle()
    } else {
        velocity.y.atan2(velocity.x)
    }
}

/// Moves the player by this tick's intent, keeping them inside the room.
pub fn player_movement_system(
    dt: Res<DeltaTime>,
    intent: Res<PlayerIntent>,
    mut players: Query<(&mut Position, &mut Velocity, &mut Facing, &mut Aim, &Collider), With<Player>>,
) {
    for (mut position, mut velocity, mut facing, mut aim, collider) in players.iter_mut() {
        velocity.0 = intent.movement * PLAYER_SPEED;

        let (min, max) = collider.bounds();
        position.0 = (position.0 + velocity.0 * dt.seconds).clamp(min, max);

        // Purely vertical movement keeps the previous facing.
        if intent.movement.x < 0.0 {
            *facing = Facing::Left;
        } else if intent.movement.x > 0.0 {
            *facing = Facing::Right;
        }

        aim.rotation = aim_rotation(velocity.0, *facing);
    }
}

/// Starts a net swing when the player asked for one. Presses during a live swing are dropped.
pub fn attack_system(intent: Res<PlayerIntent>, mut store: EntityStore) {
    if !intent.attack {
        return;
    }

    if store.activate_hitbox() {
        trace!("Net swing started");
    } else {
        trace!("Net swing already in progress, ignoring attack");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standing_still_aims_along_facing() {
        assert_eq!(aim_rotation(Vec2::ZERO, Facing::Right), 0.0);
        assert_eq!(aim_rotation(Vec2::ZERO, Facing::Left), std::f32::consts::PI);
    }

    #[test]
    fn moving_aims_along_velocity() {
        let rotation = aim_rotation(Vec2::new(0.0, 200.0), Facing::Left);
        assert!((rotation - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }
}
