//! The game state machine: hearts, score, healing, difficulty and the game phase.
//!
//! This module is the only writer of `GameState`. It reacts to commands from the
//! UI and to the events produced by the collision systems, and reports back to
//! the UI and audio collaborators through `UiEvent`s and `AudioEvent`s.

use bevy_ecs::{
    event::{EventReader, EventWriter},
    resource::Resource,
    system::{Res, ResMut},
};
use tracing::{debug, info};

use crate::audio::Sound;
use crate::constants::mechanics::{DIFFICULTY_STEP, HEAL_THRESHOLD, MAX_HEARTS, MILESTONE_INTERVAL};
use crate::events::{GameCommand, GameEvent};
use crate::systems::spawn::{add_spawn_point, GameRng, SpawnPoints, SpawnTimer};
use crate::systems::store::EntityStore;
use crate::systems::{AudioEvent, AudioState, GlobalState, Tint, UiEvent};

/// The overall phase of the game.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum GamePhase {
    /// The title screen; nothing moves until the start command arrives.
    #[default]
    WaitingToStart,
    Playing,
    GameOver,
}

/// Speed scale applied to ghosts spawned at `score`.
pub fn difficulty_multiplier(score: u32) -> f32 {
    1.0 + score as f32 * DIFFICULTY_STEP
}

/// What a single catch changed, beyond the score itself.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CatchOutcome {
    /// A heart was restored.
    pub healed: bool,
    /// The score reached a multiple of the milestone interval.
    pub milestone: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    Survived,
    GameOver,
}

#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// Always within `0..=MAX_HEARTS`; reaching zero ends the game.
    pub hearts: u8,
    /// Ghosts caught this game.
    pub score: u32,
    /// Catches since the last heal, always below `HEAL_THRESHOLD` between events.
    pub heal_counter: u8,
    pub phase: GamePhase,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            hearts: MAX_HEARTS,
            score: 0,
            heal_counter: 0,
            phase: GamePhase::WaitingToStart,
        }
    }
}

impl GameState {
    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn difficulty_multiplier(&self) -> f32 {
        difficulty_multiplier(self.score)
    }

    /// Begins a fresh game from the title screen.
    pub fn begin(&mut self) {
        debug_assert_eq!(self.phase, GamePhase::WaitingToStart, "a game can only begin from the title screen");
        self.hearts = MAX_HEARTS;
        self.score = 0;
        self.heal_counter = 0;
        self.phase = GamePhase::Playing;
    }

    /// Leaves the game-over screen so a new game can begin.
    pub fn await_restart(&mut self) {
        debug_assert_eq!(self.phase, GamePhase::GameOver, "only a finished game can be restarted");
        self.phase = GamePhase::WaitingToStart;
    }

    /// Records a caught ghost. Returns `None` outside of play, where catches change nothing.
    pub fn register_catch(&mut self) -> Option<CatchOutcome> {
        if !self.is_playing() {
            return None;
        }

        self.score += 1;
        self.heal_counter += 1;

        let milestone = self.score % MILESTONE_INTERVAL == 0;
        let mut healed = false;
        if self.heal_counter >= HEAL_THRESHOLD {
            if self.hearts < MAX_HEARTS {
                self.hearts += 1;
                healed = true;
            }
            self.heal_counter = 0;
        }

        self.check_invariants();
        Some(CatchOutcome { healed, milestone })
    }

    /// Records a ghost reaching the player. Returns `None` outside of play.
    pub fn register_hit(&mut self) -> Option<HitOutcome> {
        if !self.is_playing() {
            return None;
        }

        self.hearts = self.hearts.saturating_sub(1);
        let outcome = if self.hearts == 0 {
            self.phase = GamePhase::GameOver;
            HitOutcome::GameOver
        } else {
            HitOutcome::Survived
        };

        self.check_invariants();
        Some(outcome)
    }

    fn check_invariants(&self) {
        debug_assert!(self.hearts <= MAX_HEARTS, "hearts out of range: {}", self.hearts);
        debug_assert!(self.heal_counter < HEAL_THRESHOLD, "heal counter out of range: {}", self.heal_counter);
        debug_assert!(
            (self.hearts == 0) == (self.phase == GamePhase::GameOver),
            "hearts {} inconsistent with phase {}",
            self.hearts,
            self.phase
        );
    }
}

/// Run condition for everything that only happens during play.
pub fn is_playing(state: Res<GameState>) -> bool {
    state.is_playing()
}

/// Shared reset path for both start and restart.
fn begin_round(
    state: &mut GameState,
    timer: &mut SpawnTimer,
    store: &mut EntityStore,
    ui: &mut EventWriter<UiEvent>,
    audio: &mut EventWriter<AudioEvent>,
) {
    state.begin();
    store.clear_all_ghosts();
    store.reset_player();
    store.deactivate_hitbox();
    timer.arm();

    ui.write(UiEvent::HideOverlay);
    ui.write(UiEvent::HeartsChanged(state.hearts));
    ui.write(UiEvent::ScoreChanged(state.score));
    audio.write(AudioEvent::StartMusic);

    info!(hearts = state.hearts, "Game started");
}

/// Drains the command channel. Start and restart share the same reset path; commands
/// that do not apply to the current phase are ignored.
#[allow(clippy::too_many_arguments)]
pub fn command_system(
    mut events: EventReader<GameEvent>,
    mut state: ResMut<GameState>,
    mut global: ResMut<GlobalState>,
    mut audio_state: ResMut<AudioState>,
    mut timer: ResMut<SpawnTimer>,
    mut store: EntityStore,
    mut ui: EventWriter<UiEvent>,
    mut audio: EventWriter<AudioEvent>,
) {
    for event in events.read() {
        let GameEvent::Command(command) = *event else {
            continue;
        };

        match command {
            GameCommand::Start if state.phase == GamePhase::WaitingToStart => {
                begin_round(&mut state, &mut timer, &mut store, &mut ui, &mut audio);
            }
            GameCommand::Restart if state.phase == GamePhase::GameOver => {
                state.await_restart();
                begin_round(&mut state, &mut timer, &mut store, &mut ui, &mut audio);
            }
            GameCommand::Start | GameCommand::Restart => {
                debug!(%command, phase = %state.phase, "Ignoring command in this phase");
            }
            GameCommand::ToggleMute => {
                audio_state.muted = !audio_state.muted;
                info!(muted = audio_state.muted, "Audio mute toggled");
                if audio_state.muted {
                    audio.write(AudioEvent::StopMusic);
                } else if state.is_playing() {
                    audio.write(AudioEvent::StartMusic);
                }
            }
            GameCommand::Exit => {
                info!("Exit requested");
                global.exit = true;
            }
        }
    }
}

/// Applies catches and hits to the game state and fans out their side effects.
#[allow(clippy::too_many_arguments)]
pub fn game_state_system(
    mut events: EventReader<GameEvent>,
    mut state: ResMut<GameState>,
    mut timer: ResMut<SpawnTimer>,
    mut points: ResMut<SpawnPoints>,
    mut rng: ResMut<GameRng>,
    mut store: EntityStore,
    mut ui: EventWriter<UiEvent>,
    mut audio: EventWriter<AudioEvent>,
) {
    for event in events.read() {
        match *event {
            GameEvent::GhostCaught(ghost) => {
                let Some(outcome) = state.register_catch() else {
                    continue;
                };
                debug!(?ghost, score = state.score, heal_counter = state.heal_counter, "Ghost caught");

                audio.write(AudioEvent::Play(Sound::Catch));
                ui.write(UiEvent::ScoreChanged(state.score));

                if outcome.milestone {
                    let point = add_spawn_point(&mut points, &mut rng.0);
                    ui.write(UiEvent::NewEntrance(point));
                }

                if outcome.healed {
                    debug!(hearts = state.hearts, "Player healed");
                    ui.write(UiEvent::HeartsChanged(state.hearts));
                    ui.write(UiEvent::Flash);
                    audio.write(AudioEvent::Play(Sound::Heal));
                }
            }
            GameEvent::PlayerHit(ghost) => {
                let Some(outcome) = state.register_hit() else {
                    continue;
                };
                debug!(?ghost, hearts = state.hearts, "Player hit");

                ui.write(UiEvent::HeartsChanged(state.hearts));
                ui.write(UiEvent::Shake);
                audio.write(AudioEvent::Play(Sound::Hurt));

                if outcome == HitOutcome::GameOver {
                    timer.disarm();
                    store.tint_player(Tint::DAMAGED);

                    audio.write(AudioEvent::StopMusic);
                    audio.write(AudioEvent::Play(Sound::GameOver));
                    ui.write(UiEvent::ShowGameOver {
                        final_score: state.score,
                    });

                    info!(score = state.score, "Game over");
                }
            }
            GameEvent::Command(_) => {}
        }
    }
}
