//! The audio collaborator: what the game asks to hear, and the sinks that play it.
//!
//! Game logic never waits on audio and never sees its failures. Sinks report
//! errors, and the audio system logs and drops them.

use crate::error::AudioError;

/// Sound effects the game can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum Sound {
    Catch,
    Hurt,
    Heal,
    GameOver,
}

/// Something that can play sound effects and the background music loop.
pub trait AudioSink {
    fn play(&mut self, sound: Sound) -> Result<(), AudioError>;

    /// Starts the music loop. Starting music that is already playing restarts it.
    fn start_music(&mut self) -> Result<(), AudioError>;

    fn stop_music(&mut self) -> Result<(), AudioError>;
}

/// A sink that plays nothing. Used headless and when no audio device could be opened.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _sound: Sound) -> Result<(), AudioError> {
        Ok(())
    }

    fn start_music(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn stop_music(&mut self) -> Result<(), AudioError> {
        Ok(())
    }
}

#[cfg(feature = "desktop")]
mod synth;
#[cfg(feature = "desktop")]
pub use self::synth::SynthAudio;
