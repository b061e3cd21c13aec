#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use bevy_ecs::{
    entity::Entity,
    event::{Event, EventRegistry, Events},
    system::RunSystemOnce,
    world::World,
};
use fantasmas::{
    audio::{AudioSink, NullAudio, Sound},
    config::Settings,
    constants::{collider, world},
    error::AudioError,
    events::{GameCommand, GameEvent},
    game::Game,
    systems::{
        game_state_system, AudioEvent, AudioState, Collider, DeltaTime, Facing, GameRng, GameState, Ghost, GhostBundle,
        GhostCollider, GlobalState, HitboxBundle, HudState, InputState, PlayerBundle, PlayerIntent, Position, RawInputQueue,
        SpawnPoints, SpawnTimer, Tint, UiEvent, Velocity,
    },
};
use glam::Vec2;

pub const TEST_SEED: u64 = 0x5EED;
pub const FRAME: f32 = 1.0 / 60.0;

pub fn test_settings() -> Settings {
    Settings {
        seed: Some(TEST_SEED),
        ..Settings::default()
    }
}

pub fn create_game() -> Game {
    Game::new(&test_settings(), Box::new(NullAudio))
}

/// A game that has left the title screen, with no time elapsed yet.
pub fn started_game() -> Game {
    let mut game = create_game();
    game.send_command(GameCommand::Start);
    game.tick(0.0);
    game
}

/// A world with every resource the systems need, but no schedule and no entities.
pub fn create_test_world() -> World {
    let mut world = World::default();

    EventRegistry::register_event::<GameEvent>(&mut world);
    EventRegistry::register_event::<UiEvent>(&mut world);
    EventRegistry::register_event::<AudioEvent>(&mut world);

    world.insert_resource(GlobalState { exit: false });
    world.insert_resource(DeltaTime { seconds: 0.0 });
    world.insert_resource(AudioState::default());
    world.insert_resource(GameRng::new(Some(TEST_SEED)));
    world.insert_resource(GameState::default());
    world.insert_resource(HudState::default());
    world.insert_resource(SpawnPoints::default());
    world.insert_resource(SpawnTimer::default());
    world.insert_resource(RawInputQueue::default());
    world.insert_resource(InputState::default());
    world.insert_resource(PlayerIntent::default());

    world
}

/// Puts the test world into play, as if a start command had been handled.
pub fn begin_playing(world: &mut World) {
    world.resource_mut::<GameState>().begin();
    world.resource_mut::<SpawnTimer>().arm();
}

pub fn spawn_test_player(world: &mut World, position: Vec2) -> Entity {
    world
        .spawn(PlayerBundle {
            position: Position(position),
            ..PlayerBundle::default()
        })
        .id()
}

pub fn spawn_test_hitbox(world: &mut World) -> Entity {
    world.spawn(HitboxBundle::default()).id()
}

pub fn spawn_test_ghost(world: &mut World, position: Vec2, speed: f32) -> Entity {
    world
        .spawn(GhostBundle {
            ghost: Ghost { speed },
            position: Position(position),
            velocity: Velocity::default(),
            facing: Facing::toward(position.x, world::CENTER.x),
            tint: Tint::default(),
            collider: Collider {
                size: collider::GHOST_SIZE,
            },
            ghost_collider: GhostCollider,
        })
        .id()
}

pub fn set_delta(world: &mut World, seconds: f32) {
    world.insert_resource(DeltaTime { seconds });
}

pub fn send_game_event(world: &mut World, event: GameEvent) {
    world.send_event(event);
}

/// Takes every pending event of type `E` out of the world.
pub fn drain_events<E: Event>(world: &mut World) -> Vec<E> {
    world.resource_mut::<Events<E>>().drain().collect()
}

/// Feeds `events` to the game state machine once and clears them afterwards, so a
/// later run does not see them again.
pub fn dispatch(world: &mut World, events: impl IntoIterator<Item = GameEvent>) {
    for event in events {
        world.send_event(event);
    }
    world
        .run_system_once(game_state_system)
        .expect("System should run successfully");
    world.resource_mut::<Events<GameEvent>>().clear();
}

/// Every call made to a `RecordingAudio`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCall {
    Play(Sound),
    StartMusic,
    StopMusic,
}

/// An audio sink that records what it was asked to do, optionally failing every call.
#[derive(Clone, Default)]
pub struct RecordingAudio {
    pub calls: Rc<RefCell<Vec<AudioCall>>>,
    pub failing: bool,
}

impl RecordingAudio {
    fn record(&mut self, call: AudioCall) -> Result<(), AudioError> {
        self.calls.borrow_mut().push(call);
        if self.failing {
            Err(AudioError::Device("test device unplugged".to_string()))
        } else {
            Ok(())
        }
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, sound: Sound) -> Result<(), AudioError> {
        self.record(AudioCall::Play(sound))
    }

    fn start_music(&mut self) -> Result<(), AudioError> {
        self.record(AudioCall::StartMusic)
    }

    fn stop_music(&mut self) -> Result<(), AudioError> {
        self.record(AudioCall::StopMusic)
    }
}
