//! Ghost pursuit, wall bounces, and keeping the net swing attached to the player.

use bevy_ecs::{
    query::{With, Without},
    system::{Query, Res},
};
use glam::Vec2;

use crate::constants::mechanics::ATTACK_REACH;
use crate::systems::{Aim, AttackHitbox, Collider, DeltaTime, Dying, Facing, Ghost, Player, Position, Velocity};

/// Velocity that heads straight from `from` to `target` at `speed`.
///
/// A ghost sitting exactly on its target has no direction to go and stands still.
pub fn pursuit_velocity(from: Vec2, target: Vec2, speed: f32) -> Vec2 {
    (target - from).normalize_or_zero() * speed
}

/// Integrates one step and reflects off the bounds on any axis that would leave them.
pub fn integrate_with_bounce(position: Vec2, velocity: Vec2, dt: f32, min: Vec2, max: Vec2) -> (Vec2, Vec2) {
    let mut next = position + velocity * dt;
    let mut velocity = velocity;

    if next.x < min.x {
        next.x = min.x;
        velocity.x = velocity.x.abs();
    } else if next.x > max.x {
        next.x = max.x;
        velocity.x = -velocity.x.abs();
    }

    if next.y < min.y {
        next.y = min.y;
        velocity.y = velocity.y.abs();
    } else if next.y > max.y {
        next.y = max.y;
        velocity.y = -velocity.y.abs();
    }

    (next, velocity)
}

/// Centre of the net swing for a player at `origin` aiming along `rotation`.
pub fn swing_position(origin: Vec2, rotation: f32) -> Vec2 {
    origin + Vec2::from_angle(rotation) * ATTACK_REACH
}

/// Steers every live ghost toward the player. Fading ghosts stay where they were caught.
pub fn ghost_movement_system(
    dt: Res<DeltaTime>,
    players: Query<&Position, (With<Player>, Without<Ghost>)>,
    mut ghosts: Query<(&Ghost, &mut Position, &mut Velocity, &mut Facing, &Collider), Without<Dying>>,
) {
    let Ok(target) = players.single() else {
        return;
    };

    for (ghost, mut position, mut velocity, mut facing, collider) in ghosts.iter_mut() {
        let (min, max) = collider.bounds();
        let pursuit = pursuit_velocity(position.0, target.0, ghost.speed);
        let (next, bounced) = integrate_with_bounce(position.0, pursuit, dt.seconds, min, max);

        position.0 = next;
        velocity.0 = bounced;
        *facing = Facing::toward(next.x, target.0.x);
    }
}

/// Keeps a live swing in front of the player, turned with their aim.
pub fn hitbox_follow_system(
    players: Query<(&Position, &Aim), (With<Player>, Without<AttackHitbox>)>,
    mut hitboxes: Query<(&AttackHitbox, &mut Position, &mut Aim), Without<Player>>,
) {
    let Ok((origin, player_aim)) = players.single() else {
        return;
    };

    for (hitbox, mut position, mut aim) in hitboxes.iter_mut() {
        if !hitbox.is_active() {
            continue;
        }
        position.0 = swing_position(origin.0, player_aim.rotation);
        aim.rotation = player_aim.rotation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounce_reflects_only_the_offending_axis() {
        let (position, velocity) = integrate_with_bounce(
            Vec2::new(20.0, 300.0),
            Vec2::new(-100.0, 50.0),
            0.1,
            Vec2::new(16.0, 16.0),
            Vec2::new(784.0, 584.0),
        );
        assert_eq!(position, Vec2::new(16.0, 305.0));
        assert_eq!(velocity, Vec2::new(100.0, 50.0));
    }

    #[test]
    fn ghost_on_target_stands_still() {
        assert_eq!(pursuit_velocity(Vec2::ONE, Vec2::ONE, 60.0), Vec2::ZERO);
    }
}
