use std::time::Duration;

use bevy_ecs::{bundle::Bundle, component::Component, resource::Resource};
use glam::Vec2;

use crate::constants::{collider, world};

/// Marker for the player character. Exactly one exists for the lifetime of a `Game`.
#[derive(Component, Debug, Default)]
pub struct Player;

/// A ghost. Its `Entity` is the opaque handle used everywhere else.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Ghost {
    /// Pursuit speed in units per second. Fixed at spawn, always positive.
    pub speed: f32,
}

/// Set on a ghost once the net catches it; the ghost is removed when its fade ends.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Dying;

/// Present while a ghost can still hurt the player or be caught.
///
/// Removed the moment a ghost is caught, so a fading ghost never deals damage.
#[derive(Component, Debug, Default)]
pub struct GhostCollider;

/// Centre of the entity, in room coordinates.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct Position(pub Vec2);

/// Units per second.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct Velocity(pub Vec2);

/// Horizontal sprite orientation.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// The facing that looks from `from_x` toward `to_x`.
    pub fn toward(from_x: f32, to_x: f32) -> Self {
        if to_x < from_x {
            Facing::Left
        } else {
            Facing::Right
        }
    }

    /// The aim rotation used when standing still.
    pub fn rest_angle(self) -> f32 {
        match self {
            Facing::Left => std::f32::consts::PI,
            Facing::Right => 0.0,
        }
    }
}

/// Direction of the flashlight beam and of the next net swing, in radians.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct Aim {
    pub rotation: f32,
}

/// Colour multiplier applied when drawing, as 0xRRGGBB. `None` draws the sprite untouched.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tint(pub Option<u32>);

impl Tint {
    pub const DAMAGED: Tint = Tint(Some(0xff0000));
}

/// Axis-aligned collision box centred on the entity's `Position`.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub size: Vec2,
}

impl Collider {
    pub fn half_extents(&self) -> Vec2 {
        self.size / 2.0
    }

    /// Whether two boxes overlap. Boxes that merely touch along an edge do not.
    pub fn overlaps(&self, position: Vec2, other: &Collider, other_position: Vec2) -> bool {
        let reach = self.half_extents() + other.half_extents();
        let distance = (position - other_position).abs();
        distance.x < reach.x && distance.y < reach.y
    }

    /// The range of centre positions that keeps this box inside the room.
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let half = self.half_extents();
        (half, world::SIZE - half)
    }
}

/// Lifecycle of the single net swing.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum HitboxState {
    #[default]
    Inactive,
    Active {
        elapsed: Duration,
    },
}

/// The melee hitbox swung by the player. Only one exists, and at most one swing is live.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct AttackHitbox {
    pub state: HitboxState,
}

impl AttackHitbox {
    pub fn is_active(&self) -> bool {
        matches!(self.state, HitboxState::Active { .. })
    }

    /// Starts a swing. Returns `false` if a swing is already in progress.
    pub fn activate(&mut self) -> bool {
        if self.is_active() {
            return false;
        }
        self.state = HitboxState::Active { elapsed: Duration::ZERO };
        true
    }

    pub fn deactivate(&mut self) {
        self.state = HitboxState::Inactive;
    }

    /// Advances the swing and ends it once `lifetime` has elapsed. Returns `true` if it just ended.
    pub fn advance(&mut self, dt: Duration, lifetime: Duration) -> bool {
        if let HitboxState::Active { elapsed } = &mut self.state {
            *elapsed += dt;
            if *elapsed >= lifetime {
                self.state = HitboxState::Inactive;
                return true;
            }
        }
        false
    }
}

#[derive(Bundle)]
pub struct PlayerBundle {
    pub player: Player,
    pub position: Position,
    pub velocity: Velocity,
    pub facing: Facing,
    pub aim: Aim,
    pub tint: Tint,
    pub collider: Collider,
}

impl Default for PlayerBundle {
    fn default() -> Self {
        Self {
            player: Player,
            position: Position(world::CENTER),
            velocity: Velocity::default(),
            facing: Facing::Right,
            aim: Aim::default(),
            tint: Tint::default(),
            collider: Collider {
                size: collider::PLAYER_SIZE,
            },
        }
    }
}

#[derive(Bundle)]
pub struct GhostBundle {
    pub ghost: Ghost,
    pub position: Position,
    pub velocity: Velocity,
    pub facing: Facing,
    pub tint: Tint,
    pub collider: Collider,
    pub ghost_collider: GhostCollider,
}

#[derive(Bundle)]
pub struct HitboxBundle {
    pub hitbox: AttackHitbox,
    pub position: Position,
    pub aim: Aim,
    pub collider: Collider,
}

impl Default for HitboxBundle {
    fn default() -> Self {
        Self {
            hitbox: AttackHitbox::default(),
            position: Position::default(),
            aim: Aim::default(),
            collider: Collider {
                size: collider::HITBOX_SIZE,
            },
        }
    }
}

#[derive(Resource)]
pub struct GlobalState {
    pub exit: bool,
}

/// Frame delta, set by `Game::tick` before the schedule runs.
#[derive(Resource, Debug, Clone, Copy)]
pub struct DeltaTime {
    pub seconds: f32,
}

impl DeltaTime {
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f32(self.seconds.max(0.0))
    }
}

/// Resource for tracking audio state
#[derive(Resource, Debug, Clone, Default)]
pub struct AudioState {
    /// Whether audio is currently muted
    pub muted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_boxes_do_not_overlap() {
        let a = Collider { size: Vec2::splat(10.0) };
        assert!(!a.overlaps(Vec2::ZERO, &a, Vec2::new(10.0, 0.0)));
        assert!(a.overlaps(Vec2::ZERO, &a, Vec2::new(9.9, 9.9)));
    }

    #[test]
    fn second_swing_is_refused_while_first_is_live() {
        let mut hitbox = AttackHitbox::default();
        assert!(hitbox.activate());
        assert!(!hitbox.activate());
        hitbox.advance(Duration::from_millis(250), Duration::from_millis(200));
        assert!(hitbox.activate());
    }
}
