//! The UI collaborator: hearts and score displays, the title and game-over
//! overlays, and short-lived screen effects.
//!
//! The game core only writes `UiEvent`s. `HudState` is the display model the
//! renderer reads; it is never consulted by game logic.

use std::time::Duration;

use bevy_ecs::{
    component::Component,
    event::{Event, EventReader},
    resource::Resource,
    system::{Commands, ResMut},
};
use tracing::debug;

use crate::constants::{effects, mechanics::MAX_HEARTS};
use crate::systems::lifetime::TimeToLive;
use crate::systems::spawn::SpawnPoint;

/// Display updates requested by the game state machine.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum UiEvent {
    HeartsChanged(u8),
    ScoreChanged(u32),
    ShowGameOver { final_score: u32 },
    HideOverlay,
    /// A new entrance opened at this point.
    NewEntrance(SpawnPoint),
    /// Brief green flash when a heart is restored.
    Flash,
    /// Brief camera shake when the player is hit.
    Shake,
}

/// The full-screen panel covering the room, if any.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    /// Title screen with the controls, shown before the first game.
    #[default]
    Instructions,
    GameOver {
        final_score: u32,
    },
    Hidden,
}

#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct HudState {
    pub hearts: u8,
    pub score: u32,
    pub overlay: Overlay,
    /// How many new-entrance notifications have been shown.
    pub entrances_announced: u32,
}

impl Default for HudState {
    fn default() -> Self {
        Self {
            hearts: MAX_HEARTS,
            score: 0,
            overlay: Overlay::Instructions,
            entrances_announced: 0,
        }
    }
}

impl HudState {
    pub fn update_hearts_display(&mut self, count: u8) {
        self.hearts = count;
    }

    pub fn update_score_display(&mut self, count: u32) {
        self.score = count;
    }

    pub fn show_game_over_overlay(&mut self, final_score: u32) {
        self.overlay = Overlay::GameOver { final_score };
    }

    pub fn hide_overlay(&mut self) {
        self.overlay = Overlay::Hidden;
    }

    pub fn show_new_entrance_notification(&mut self) {
        self.entrances_announced += 1;
    }

    /// The score label shown in the corner of the room.
    pub fn score_label(&self) -> String {
        format!("Fantasmas: {}", self.score)
    }

    /// Window title: the score label, plus a prompt while an overlay is up.
    pub fn title(&self) -> String {
        match self.overlay {
            Overlay::Hidden => self.score_label(),
            Overlay::Instructions => {
                "Fantasmas | WASD/arrows or drag left to move, Space or tap right to swing | Enter to start".to_string()
            }
            Overlay::GameOver { final_score } => {
                format!("Fantasmas | Game over! Ghosts caught: {final_score} | Enter to play again")
            }
        }
    }
}

/// A fire-and-forget screen effect. Spawned with a `TimeToLive` and drawn until it expires.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub enum VisualEffect {
    Flash,
    Shake,
    /// The "new entrance" banner.
    EntranceNotice,
    /// Highlight fading in over a freshly opened entrance.
    EntranceReveal(SpawnPoint),
}

impl VisualEffect {
    pub fn duration(&self) -> Duration {
        match self {
            VisualEffect::Flash => effects::FLASH,
            VisualEffect::Shake => effects::SHAKE,
            VisualEffect::EntranceNotice => effects::ENTRANCE_NOTICE,
            VisualEffect::EntranceReveal(_) => effects::ENTRANCE_REVEAL,
        }
    }
}

fn spawn_effect(commands: &mut Commands, effect: VisualEffect) {
    commands.spawn((effect, TimeToLive::new(effect.duration())));
}

/// Applies UI events to the display model and starts the matching effects.
pub fn hud_system(mut commands: Commands, mut hud: ResMut<HudState>, mut events: EventReader<UiEvent>) {
    for event in events.read() {
        match *event {
            UiEvent::HeartsChanged(count) => hud.update_hearts_display(count),
            UiEvent::ScoreChanged(count) => hud.update_score_display(count),
            UiEvent::ShowGameOver { final_score } => hud.show_game_over_overlay(final_score),
            UiEvent::HideOverlay => hud.hide_overlay(),
            UiEvent::NewEntrance(point) => {
                hud.show_new_entrance_notification();
                debug!(x = point.position.x, y = point.position.y, "Announcing new entrance");
                spawn_effect(&mut commands, VisualEffect::EntranceNotice);
                spawn_effect(&mut commands, VisualEffect::EntranceReveal(point));
            }
            UiEvent::Flash => spawn_effect(&mut commands, VisualEffect::Flash),
            UiEvent::Shake => spawn_effect(&mut commands, VisualEffect::Shake),
        }
    }
}
