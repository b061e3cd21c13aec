//! ECS side of the audio collaborator.
//!
//! Sinks usually wrap a device handle that is not `Send`, so the sink lives in a
//! `NonSend` resource and this system always runs on the main thread.

use bevy_ecs::{
    event::{Event, EventReader},
    system::{NonSendMut, Res},
};
use tracing::{trace, warn};

use crate::audio::{AudioSink, Sound};
use crate::systems::AudioState;

/// Requests for the audio collaborator.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEvent {
    Play(Sound),
    StartMusic,
    StopMusic,
}

/// Non-send wrapper for whichever sink the front-end provided.
pub struct AudioResource(pub Box<dyn AudioSink>);

/// Forwards audio events to the sink, honouring the mute flag.
pub fn audio_system(mut audio: NonSendMut<AudioResource>, state: Res<AudioState>, mut events: EventReader<AudioEvent>) {
    for event in events.read() {
        let result = match *event {
            AudioEvent::Play(_) | AudioEvent::StartMusic if state.muted => {
                trace!(?event, "Muted, skipping audio event");
                continue;
            }
            AudioEvent::Play(sound) => audio.0.play(sound),
            AudioEvent::StartMusic => audio.0.start_music(),
            // Stopping is always forwarded so a mute can never leave the loop running.
            AudioEvent::StopMusic => audio.0.stop_music(),
        };

        if let Err(e) = result {
            warn!(?event, "Audio request failed: {e}");
        }
    }
}
