//! This module contains all the constants used in the game.

use std::time::Duration;

pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// Dimensions of the haunted room.
pub mod world {
    use glam::Vec2;

    pub const WIDTH: f32 = 800.0;
    pub const HEIGHT: f32 = 600.0;
    pub const SIZE: Vec2 = Vec2::new(WIDTH, HEIGHT);
    /// Where the player starts, and where freshly spawned ghosts initially head.
    pub const CENTER: Vec2 = Vec2::new(WIDTH / 2.0, HEIGHT / 2.0);
}

/// Gameplay tuning.
pub mod mechanics {
    use std::time::Duration;

    /// Player speed, in units per second.
    pub const PLAYER_SPEED: f32 = 200.0;
    pub const MAX_HEARTS: u8 = 3;
    /// Catches needed to restore one heart.
    pub const HEAL_THRESHOLD: u8 = 5;
    /// Every this many catches, a new entrance opens.
    pub const MILESTONE_INTERVAL: u32 = 20;
    /// Ghost speed grows by this fraction per point of score.
    pub const DIFFICULTY_STEP: f32 = 0.05;
    pub const GHOST_MIN_SPEED: u32 = 40;
    pub const GHOST_MAX_SPEED: u32 = 80;
    pub const SPAWN_INTERVAL: Duration = Duration::from_millis(2000);
    /// Distance from the player's centre to the centre of the net swing.
    pub const ATTACK_REACH: f32 = 40.0;
    pub const ATTACK_LIFETIME: Duration = Duration::from_millis(200);
    /// How long a caught ghost takes to fade out before it is removed.
    pub const GHOST_FADE: Duration = Duration::from_millis(200);
}

pub mod input {
    /// Minimum drag distance before the virtual joystick moves the player.
    pub const JOYSTICK_DEAD_ZONE: f32 = 10.0;
    /// Radius of the joystick base ring, used only for drawing.
    pub const JOYSTICK_RADIUS: f32 = 50.0;
    /// Pointer presses at or right of this x coordinate are attacks, left of it anchor the joystick.
    pub const ATTACK_REGION_X: f32 = super::world::WIDTH / 2.0;
}

/// Collision boxes, matching the generated sprite sizes.
pub mod collider {
    use glam::Vec2;

    pub const PLAYER_SIZE: Vec2 = Vec2::new(32.0, 48.0);
    pub const GHOST_SIZE: Vec2 = Vec2::new(32.0, 32.0);
    pub const HITBOX_SIZE: Vec2 = Vec2::new(50.0, 50.0);
}

/// Durations of fire-and-forget visual effects.
pub mod effects {
    use std::time::Duration;

    pub const FLASH: Duration = Duration::from_millis(200);
    pub const SHAKE: Duration = Duration::from_millis(200);
    pub const SHAKE_INTENSITY: f32 = 0.01;
    pub const ENTRANCE_NOTICE: Duration = Duration::from_millis(2000);
    pub const ENTRANCE_REVEAL: Duration = Duration::from_millis(1000);
}

pub mod spawn {
    use glam::Vec2;

    use crate::systems::spawn::SpawnKind;

    /// Distance kept between a new entrance and the corners of the room.
    pub const WALL_INSET: f32 = 50.0;

    /// The entrances every room starts with.
    pub const INITIAL_POINTS: [(Vec2, SpawnKind); 5] = [
        (Vec2::new(100.0, 50.0), SpawnKind::Window),
        (Vec2::new(400.0, 50.0), SpawnKind::Door),
        (Vec2::new(700.0, 50.0), SpawnKind::Window),
        (Vec2::new(100.0, 550.0), SpawnKind::Door),
        (Vec2::new(700.0, 550.0), SpawnKind::Door),
    ];

    /// Pastel tints applied to ghosts at spawn, as 0xRRGGBB.
    pub const GHOST_TINTS: [u32; 5] = [0xffaaaa, 0xaaffaa, 0xaaaaff, 0xffffaa, 0xffaaff];
}
