//! Overlap tests between the net swing, the ghosts and the player.

use bevy_ecs::{
    entity::Entity,
    event::EventWriter,
    query::{Has, With, Without},
    system::{Commands, Query},
};
use glam::Vec2;
use smallvec::SmallVec;
use tracing::trace;

use crate::events::GameEvent;
use crate::systems::store::{destroy_ghost, mark_caught};
use crate::systems::{AttackHitbox, Collider, Dying, Ghost, GhostCollider, Player, Position};

/// A collidable body at a point in the room.
#[derive(Debug, Clone, Copy)]
pub struct Body<'a> {
    pub position: Vec2,
    pub collider: &'a Collider,
}

impl Body<'_> {
    pub fn overlaps(&self, other: &Body) -> bool {
        self.collider.overlaps(self.position, other.collider, other.position)
    }
}

/// The result of one round of overlap tests.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Collisions {
    pub caught: SmallVec<[Entity; 4]>,
    pub hits: SmallVec<[Entity; 4]>,
}

/// Tests every ghost against the live net swing, then against the player.
///
/// The net goes first: a ghost caught this tick can no longer reach the player,
/// so one ghost never both scores and deals damage.
pub fn resolve_collisions<'a>(
    net: Option<Body<'a>>,
    player: Option<Body<'a>>,
    ghosts: impl IntoIterator<Item = (Entity, Body<'a>)> + Clone,
) -> Collisions {
    let mut collisions = Collisions::default();

    if let Some(net) = net {
        for (ghost, body) in ghosts.clone() {
            if net.overlaps(&body) {
                collisions.caught.push(ghost);
            }
        }
    }

    if let Some(player) = player {
        for (ghost, body) in ghosts {
            if !collisions.caught.contains(&ghost) && player.overlaps(&body) {
                collisions.hits.push(ghost);
            }
        }
    }

    collisions
}

/// Resolves this tick's overlaps: caught ghosts start fading, ghosts touching the
/// player are removed. Only ghosts that still carry a `GhostCollider` take part.
pub fn collision_system(
    mut commands: Commands,
    players: Query<(&Position, &Collider), With<Player>>,
    hitboxes: Query<(&AttackHitbox, &Position, &Collider)>,
    ghosts: Query<(Entity, &Position, &Collider, Has<GhostCollider>), (With<Ghost>, Without<Dying>)>,
    mut events: EventWriter<GameEvent>,
) {
    let net = hitboxes
        .iter()
        .find(|(hitbox, _, _)| hitbox.is_active())
        .map(|(_, position, collider)| Body {
            position: position.0,
            collider,
        });
    let player = players.single().ok().map(|(position, collider)| Body {
        position: position.0,
        collider,
    });
    let live: SmallVec<[(Entity, Body); 16]> = ghosts
        .iter()
        .filter(|(_, _, _, enabled)| *enabled)
        .map(|(entity, position, collider, _)| {
            (
                entity,
                Body {
                    position: position.0,
                    collider,
                },
            )
        })
        .collect();

    let collisions = resolve_collisions(net, player, live.iter().copied());

    for &ghost in &collisions.caught {
        trace!(?ghost, "Net caught ghost");
        mark_caught(&mut commands, ghost);
        events.write(GameEvent::GhostCaught(ghost));
    }

    for &ghost in &collisions.hits {
        trace!(?ghost, "Ghost reached player");
        destroy_ghost(&mut commands, ghost);
        events.write(GameEvent::PlayerHit(ghost));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caught_ghost_does_not_also_hit() {
        let small = Collider { size: Vec2::splat(32.0) };
        let ghost = Entity::from_raw(7);
        let body = Body {
            position: Vec2::new(100.0, 100.0),
            collider: &small,
        };

        let collisions = resolve_collisions(Some(body), Some(body), [(ghost, body)]);
        assert_eq!(collisions.caught.as_slice(), &[ghost]);
        assert!(collisions.hits.is_empty());
    }
}
