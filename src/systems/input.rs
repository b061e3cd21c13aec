//! Turns raw device signals into a movement vector and a one-shot attack request.
//!
//! The platform layer (keyboard, mouse, touch) only decides which `RawInput`s to
//! queue; everything after that is shared, so both input paths behave the same.

use bevy_ecs::{resource::Resource, system::ResMut};
use bitflags::bitflags;
use glam::Vec2;
use tracing::trace;

use crate::constants::input::{ATTACK_REGION_X, JOYSTICK_DEAD_ZONE};

/// Logical keys the core understands. Platform key codes are mapped onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Attack,
}

bitflags! {
    /// Keys currently held down.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct HeldKeys: u8 {
        const UP = 1 << 0;
        const DOWN = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
        const ATTACK = 1 << 4;
    }
}

impl From<Key> for HeldKeys {
    fn from(key: Key) -> Self {
        match key {
            Key::Up => HeldKeys::UP,
            Key::Down => HeldKeys::DOWN,
            Key::Left => HeldKeys::LEFT,
            Key::Right => HeldKeys::RIGHT,
            Key::Attack => HeldKeys::ATTACK,
        }
    }
}

/// A single device signal, in room coordinates for pointer events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawInput {
    KeyDown(Key),
    KeyUp(Key),
    PointerDown(Vec2),
    PointerMove(Vec2),
    PointerUp,
}

/// Signals queued by the platform since the last tick.
#[derive(Resource, Debug, Default)]
pub struct RawInputQueue(pub Vec<RawInput>);

/// A virtual joystick anchored where the pointer went down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Joystick {
    pub origin: Vec2,
    pub current: Vec2,
}

impl Joystick {
    pub fn delta(&self) -> Vec2 {
        self.current - self.origin
    }

    /// Unit drag direction, or `None` while the drag is inside the dead zone.
    pub fn direction(&self) -> Option<Vec2> {
        let delta = self.delta();
        let distance = delta.length();
        (distance > JOYSTICK_DEAD_ZONE).then(|| delta / distance)
    }
}

/// Device state that persists between ticks.
#[derive(Resource, Debug, Default, Clone)]
pub struct InputState {
    pub held: HeldKeys,
    pub joystick: Option<Joystick>,
}

impl InputState {
    /// The current movement vector. Keyboard axes are independent, so diagonals are not
    /// normalised; an active joystick outside its dead zone overrides the keyboard.
    pub fn movement(&self) -> Vec2 {
        if let Some(direction) = self.joystick.as_ref().and_then(Joystick::direction) {
            return direction;
        }

        let x = if self.held.contains(HeldKeys::LEFT) {
            -1.0
        } else if self.held.contains(HeldKeys::RIGHT) {
            1.0
        } else {
            0.0
        };
        let y = if self.held.contains(HeldKeys::UP) {
            -1.0
        } else if self.held.contains(HeldKeys::DOWN) {
            1.0
        } else {
            0.0
        };
        Vec2::new(x, y)
    }
}

/// What the player wants to do this tick.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct PlayerIntent {
    pub movement: Vec2,
    /// True for exactly one tick per attack key press or attack-region tap.
    pub attack: bool,
}

/// Applies a batch of signals to the persistent device state and samples the intent.
pub fn sample_input(state: &mut InputState, events: &[RawInput]) -> PlayerIntent {
    let mut attack = false;

    for event in events {
        match *event {
            RawInput::KeyDown(key) => {
                let flag = HeldKeys::from(key);
                // Only the press edge counts; held keys never auto-repeat an attack.
                if key == Key::Attack && !state.held.contains(flag) {
                    attack = true;
                }
                state.held.insert(flag);
            }
            RawInput::KeyUp(key) => state.held.remove(HeldKeys::from(key)),
            RawInput::PointerDown(point) => {
                if point.x < ATTACK_REGION_X {
                    state.joystick = Some(Joystick {
                        origin: point,
                        current: point,
                    });
                } else {
                    attack = true;
                }
            }
            RawInput::PointerMove(point) => {
                if let Some(joystick) = &mut state.joystick {
                    joystick.current = point;
                }
            }
            RawInput::PointerUp => state.joystick = None,
        }
    }

    PlayerIntent {
        movement: state.movement(),
        attack,
    }
}

/// Drains the raw input queue into this tick's `PlayerIntent`.
pub fn input_system(mut queue: ResMut<RawInputQueue>, mut state: ResMut<InputState>, mut intent: ResMut<PlayerIntent>) {
    let events = std::mem::take(&mut queue.0);
    *intent = sample_input(&mut state, &events);

    if intent.attack {
        trace!(movement = ?intent.movement, "Attack requested");
    }
}
