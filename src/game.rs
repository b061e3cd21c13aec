//! The game core: one ECS `World` and the `Schedule` that advances it.

use bevy_ecs::event::{EventRegistry, Events};
use bevy_ecs::query::With;
use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs, Schedule, SystemSet};
use bevy_ecs::world::World;
use tracing::{debug, info};

use crate::audio::AudioSink;
use crate::config::Settings;
use crate::events::{GameCommand, GameEvent};
use crate::formatter;
use crate::systems::{
    attack_system, audio_system, collision_system, command_system, game_state_system, ghost_movement_system,
    hitbox_follow_system, hitbox_lifetime_system, hud_system, input_system, is_playing, player_movement_system,
    spawn_system, time_to_live_system, AudioEvent, AudioResource, AudioState, DeltaTime, GameRng, GameState, Ghost, GlobalState,
    HitboxBundle, HudState, InputState, PlayerBundle, PlayerIntent, RawInput, RawInputQueue, SpawnPoints, SpawnTimer,
    UiEvent,
};

/// Ordering of one tick. Each set sees everything the previous one did.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
enum GameplaySet {
    /// Device input and UI commands
    Input,
    /// Swing and fade timers, which run in every phase
    Timers,
    /// Spawning, movement and collisions; only while playing
    Update,
    /// Game state changes in response to collisions
    Respond,
    /// Hand-off to the UI and audio collaborators
    Present,
}

/// Core game state manager built on the Bevy ECS architecture.
///
/// Owns every entity and resource. The front-end feeds it raw input and commands,
/// calls `tick` once per frame, and reads `HudState` and the entities back to draw.
pub struct Game {
    pub world: World,
    pub schedule: Schedule,
}

impl Game {
    pub fn new(settings: &Settings, audio: Box<dyn AudioSink>) -> Game {
        info!(seed = ?settings.seed, muted = settings.muted, "Starting game initialization");

        let mut world = World::default();
        let mut schedule = Schedule::default();

        Self::setup_ecs(&mut world);
        Self::insert_resources(&mut world, settings, audio);
        Self::configure_schedule(&mut schedule);

        let player = world.spawn(PlayerBundle::default()).id();
        let hitbox = world.spawn(HitboxBundle::default()).id();
        debug!(?player, ?hitbox, "Spawned player and net hitbox");

        Game { world, schedule }
    }

    fn setup_ecs(world: &mut World) {
        EventRegistry::register_event::<GameEvent>(world);
        EventRegistry::register_event::<UiEvent>(world);
        EventRegistry::register_event::<AudioEvent>(world);
    }

    fn insert_resources(world: &mut World, settings: &Settings, audio: Box<dyn AudioSink>) {
        world.insert_non_send_resource(AudioResource(audio));

        world.insert_resource(GlobalState { exit: false });
        world.insert_resource(DeltaTime { seconds: 0.0 });
        world.insert_resource(AudioState { muted: settings.muted });
        world.insert_resource(GameRng::new(settings.seed));
        world.insert_resource(GameState::default());
        world.insert_resource(HudState::default());
        world.insert_resource(SpawnPoints::default());
        world.insert_resource(SpawnTimer::default());
        world.insert_resource(RawInputQueue::default());
        world.insert_resource(InputState::default());
        world.insert_resource(PlayerIntent::default());
    }

    fn configure_schedule(schedule: &mut Schedule) {
        // Everything runs on the caller's thread, in exactly the order below.
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        schedule
            .add_systems((
                (input_system, command_system).chain().in_set(GameplaySet::Input),
                (hitbox_lifetime_system, time_to_live_system)
                    .chain()
                    .in_set(GameplaySet::Timers),
                (
                    spawn_system,
                    player_movement_system,
                    attack_system,
                    hitbox_follow_system,
                    ghost_movement_system,
                    collision_system,
                )
                    .chain()
                    .in_set(GameplaySet::Update),
                game_state_system.in_set(GameplaySet::Respond),
                (hud_system, audio_system).chain().in_set(GameplaySet::Present),
            ))
            .configure_sets(
                (
                    GameplaySet::Input,
                    GameplaySet::Timers,
                    GameplaySet::Update.run_if(is_playing),
                    GameplaySet::Respond,
                    GameplaySet::Present,
                )
                    .chain(),
            );
    }

    /// Queues a device signal for the next tick.
    pub fn push_input(&mut self, input: RawInput) {
        self.world.resource_mut::<RawInputQueue>().0.push(input);
    }

    /// Queues a UI command for the next tick.
    pub fn send_command(&mut self, command: GameCommand) {
        debug!(%command, "Queued command");
        self.world.send_event(GameEvent::from(command));
    }

    /// Advances the game by `dt` seconds.
    ///
    /// Returns true if the game should exit.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.world.insert_resource(DeltaTime { seconds: dt });
        self.schedule.run(&mut self.world);

        // Every reader ran this tick, so nothing is carried into the next one.
        self.world.resource_mut::<Events<GameEvent>>().update();
        self.world.resource_mut::<Events<UiEvent>>().update();
        self.world.resource_mut::<Events<AudioEvent>>().update();

        formatter::increment_tick();
        self.world.resource::<GlobalState>().exit
    }

    pub fn state(&self) -> &GameState {
        self.world.resource::<GameState>()
    }

    pub fn hud(&self) -> &HudState {
        self.world.resource::<HudState>()
    }

    pub fn spawn_points(&self) -> &SpawnPoints {
        self.world.resource::<SpawnPoints>()
    }

    pub fn is_muted(&self) -> bool {
        self.world.resource::<AudioState>().muted
    }

    /// Live and fading ghosts.
    pub fn ghost_count(&mut self) -> usize {
        self.world
            .query_filtered::<(), With<Ghost>>()
            .iter(&self.world)
            .count()
    }
}
