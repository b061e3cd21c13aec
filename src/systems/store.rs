//! Ownership of entity lifetimes: the player, the ghosts and the single net hitbox.
//!
//! Every structural change is queued through `Commands` and applied after the
//! running system finishes, so a system can destroy ghosts while iterating over
//! them without skipping or revisiting any of the others.

use bevy_ecs::{
    entity::Entity,
    query::{With, Without},
    system::{Commands, Query, SystemParam},
};
use tracing::{debug, error, trace};

use crate::constants::{collider, mechanics::GHOST_FADE, world};
use crate::systems::lifetime::TimeToLive;
use crate::systems::spawn::SpawnPoint;
use crate::systems::{
    Aim, AttackHitbox, Collider, Dying, Facing, Ghost, GhostBundle, GhostCollider, Player, Position, Tint, Velocity,
};

/// Removes a ghost. Unknown or already-removed handles are ignored.
pub fn destroy_ghost(commands: &mut Commands, handle: Entity) {
    if let Ok(mut entity) = commands.get_entity(handle) {
        trace!(ghost = ?handle, "Destroying ghost");
        entity.try_despawn();
    }
}

/// Starts a caught ghost's fade: it stops colliding immediately and is removed when the fade ends.
pub fn mark_caught(commands: &mut Commands, handle: Entity) {
    commands
        .entity(handle)
        .remove::<GhostCollider>()
        .insert((Dying, TimeToLive::new(GHOST_FADE)));
}

/// Access to the entity collections for systems that create, destroy or reset them.
#[derive(SystemParam)]
pub struct EntityStore<'w, 's> {
    commands: Commands<'w, 's>,
    ghosts: Query<'w, 's, Entity, With<Ghost>>,
    player: Query<
        'w,
        's,
        (
            &'static mut Position,
            &'static mut Velocity,
            &'static mut Aim,
            &'static mut Tint,
        ),
        (With<Player>, Without<Ghost>, Without<AttackHitbox>),
    >,
    hitbox: Query<'w, 's, &'static mut AttackHitbox>,
}

impl EntityStore<'_, '_> {
    /// Spawns a ghost at `point`, initially drifting toward the middle of the room.
    pub fn spawn_ghost(&mut self, point: &SpawnPoint, speed: f32, tint: Tint) -> Entity {
        debug_assert!(speed > 0.0, "ghost speed must be positive, got {speed}");

        let heading = (world::CENTER - point.position).normalize_or_zero();
        let entity = self
            .commands
            .spawn(GhostBundle {
                ghost: Ghost { speed },
                position: Position(point.position),
                velocity: Velocity(heading * speed),
                facing: Facing::toward(point.position.x, world::CENTER.x),
                tint,
                collider: Collider {
                    size: collider::GHOST_SIZE,
                },
                ghost_collider: GhostCollider,
            })
            .id();

        trace!(ghost = ?entity, kind = %point.kind, x = point.position.x, y = point.position.y, speed, "Spawned ghost");
        entity
    }

    pub fn destroy_ghost(&mut self, handle: Entity) {
        destroy_ghost(&mut self.commands, handle);
    }

    /// Removes every ghost, including fading ones. Only used when a new game begins.
    pub fn clear_all_ghosts(&mut self) -> usize {
        let mut cleared = 0;
        for ghost in self.ghosts.iter() {
            self.commands.entity(ghost).try_despawn();
            cleared += 1;
        }
        debug!(cleared, "Cleared all ghosts");
        cleared
    }

    /// Puts the player back in the middle of the room, untinted and standing still.
    pub fn reset_player(&mut self) {
        match self.player.single_mut() {
            Ok((mut position, mut velocity, mut aim, mut tint)) => {
                position.0 = world::CENTER;
                velocity.0 = glam::Vec2::ZERO;
                aim.rotation = 0.0;
                *tint = Tint::default();
            }
            Err(e) => error!("Cannot reset player: {e}"),
        }
    }

    pub fn tint_player(&mut self, new_tint: Tint) {
        for (_, _, _, mut tint) in self.player.iter_mut() {
            *tint = new_tint;
        }
    }

    /// Starts a net swing. Returns `false` if one is already in progress.
    pub fn activate_hitbox(&mut self) -> bool {
        match self.hitbox.single_mut() {
            Ok(mut hitbox) => hitbox.activate(),
            Err(e) => {
                error!("Cannot activate hitbox: {e}");
                false
            }
        }
    }

    pub fn deactivate_hitbox(&mut self) {
        for mut hitbox in self.hitbox.iter_mut() {
            hitbox.deactivate();
        }
    }
}
