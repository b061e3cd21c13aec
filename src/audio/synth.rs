//! SDL2 tone synthesiser: short enveloped tones for sound effects and a looping
//! bass line for the music.

use rand::{rngs::SmallRng, Rng, SeedableRng};
use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};
use sdl2::AudioSubsystem;
use tracing::debug;

use crate::audio::{AudioSink, Sound};
use crate::error::AudioError;

const SAMPLE_RATE: i32 = 44_100;
/// Gain every tone decays toward by the end of its duration.
const DECAY_FLOOR: f32 = 0.01;

/// One step of the bass line every 600 ms.
const MUSIC_STEP_SECONDS: f32 = 0.6;
const BASS_LINE: [f32; 8] = [110.0, 110.0, 130.0, 123.0, 98.0, 98.0, 87.0, 82.0];
const HIGH_NOTE_CHANCE: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wave {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Wave {
    /// Sample at `phase`, in `[0, 1)`.
    fn sample(self, phase: f32) -> f32 {
        match self {
            Wave::Sine => (phase * std::f32::consts::TAU).sin(),
            Wave::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Wave::Sawtooth => 2.0 * phase - 1.0,
            Wave::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Tone {
    freq: f32,
    /// Exponential glide target, reached at the end of the tone.
    slide_to: Option<f32>,
    wave: Wave,
    seconds: f32,
    volume: f32,
    delay: f32,
}

const fn tone(freq: f32, wave: Wave, seconds: f32, volume: f32) -> Tone {
    Tone {
        freq,
        slide_to: None,
        wave,
        seconds,
        volume,
        delay: 0.0,
    }
}

const fn slide(freq: f32, to: f32, wave: Wave, seconds: f32, volume: f32) -> Tone {
    Tone {
        slide_to: Some(to),
        ..tone(freq, wave, seconds, volume)
    }
}

const fn delayed(delay: f32, tone: Tone) -> Tone {
    Tone { delay, ..tone }
}

const CATCH: &[Tone] = &[
    tone(800.0, Wave::Sine, 0.1, 0.1),
    delayed(0.05, tone(1200.0, Wave::Sine, 0.2, 0.1)),
    delayed(0.1, tone(1800.0, Wave::Square, 0.1, 0.05)),
];
const HURT: &[Tone] = &[
    slide(150.0, 50.0, Wave::Sawtooth, 0.3, 0.2),
    slide(100.0, 20.0, Wave::Square, 0.2, 0.2),
];
const HEAL: &[Tone] = &[
    tone(440.0, Wave::Sine, 0.4, 0.1),
    delayed(0.1, tone(554.0, Wave::Sine, 0.4, 0.1)),
    delayed(0.2, tone(659.0, Wave::Sine, 0.6, 0.1)),
];
const GAME_OVER: &[Tone] = &[
    slide(400.0, 50.0, Wave::Triangle, 1.5, 0.2),
    delayed(0.5, slide(300.0, 40.0, Wave::Triangle, 1.5, 0.2)),
];

fn tones(sound: Sound) -> &'static [Tone] {
    match sound {
        Sound::Catch => CATCH,
        Sound::Hurt => HURT,
        Sound::Heal => HEAL,
        Sound::GameOver => GAME_OVER,
    }
}

/// A tone being played.
struct Voice {
    tone: Tone,
    delay_left: u32,
    elapsed: u32,
    length: u32,
    phase: f32,
}

impl Voice {
    fn new(tone: Tone, sample_rate: f32) -> Self {
        Self {
            tone,
            delay_left: (tone.delay * sample_rate) as u32,
            elapsed: 0,
            length: ((tone.seconds * sample_rate) as u32).max(1),
            phase: 0.0,
        }
    }

    /// The next sample, or `None` once the tone has finished.
    fn next(&mut self, sample_rate: f32) -> Option<f32> {
        if self.delay_left > 0 {
            self.delay_left -= 1;
            return Some(0.0);
        }
        if self.elapsed >= self.length {
            return None;
        }

        let t = self.elapsed as f32 / self.length as f32;
        let freq = match self.tone.slide_to {
            Some(target) => self.tone.freq * (target / self.tone.freq).powf(t),
            None => self.tone.freq,
        };
        let gain = self.tone.volume * (DECAY_FLOOR / self.tone.volume).powf(t);

        let sample = self.tone.wave.sample(self.phase) * gain;
        self.phase = (self.phase + freq / sample_rate).fract();
        self.elapsed += 1;
        Some(sample)
    }
}

struct Music {
    step: usize,
    until_next: u32,
}

/// The callback state, owned by the SDL audio thread.
pub struct Synth {
    sample_rate: f32,
    voices: Vec<Voice>,
    music: Option<Music>,
    rng: SmallRng,
}

impl Synth {
    fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            voices: Vec::with_capacity(16),
            music: None,
            rng: SmallRng::from_os_rng(),
        }
    }

    fn trigger(&mut self, tone: Tone) {
        self.voices.push(Voice::new(tone, self.sample_rate));
    }

    fn advance_music(&mut self) {
        let Some(music) = &mut self.music else {
            return;
        };
        if music.until_next > 0 {
            music.until_next -= 1;
            return;
        }

        let bass = BASS_LINE[music.step % BASS_LINE.len()];
        music.step += 1;
        music.until_next = (MUSIC_STEP_SECONDS * self.sample_rate) as u32;

        self.trigger(tone(bass, Wave::Triangle, 0.4, 0.15));
        if self.rng.random_bool(HIGH_NOTE_CHANCE) {
            let high = self.rng.random_range(800..=1200) as f32;
            self.trigger(tone(high, Wave::Sine, 0.5, 0.02));
        }
    }
}

impl AudioCallback for Synth {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        let sample_rate = self.sample_rate;
        for sample in out.iter_mut() {
            self.advance_music();

            let mut mix = 0.0;
            self.voices.retain_mut(|voice| match voice.next(sample_rate) {
                Some(value) => {
                    mix += value;
                    true
                }
                None => false,
            });
            *sample = mix.clamp(-1.0, 1.0);
        }
    }
}

/// `AudioSink` backed by an SDL2 playback device running `Synth`.
pub struct SynthAudio {
    device: AudioDevice<Synth>,
}

impl SynthAudio {
    pub fn new(audio: &AudioSubsystem) -> Result<Self, AudioError> {
        let desired = AudioSpecDesired {
            freq: Some(SAMPLE_RATE),
            channels: Some(1),
            samples: Some(512),
        };

        let device = audio
            .open_playback(None, &desired, |spec| {
                debug!(freq = spec.freq, samples = spec.samples, "Opened audio device");
                Synth::new(spec.freq as f32)
            })
            .map_err(AudioError::Device)?;
        device.resume();

        Ok(Self { device })
    }
}

impl AudioSink for SynthAudio {
    fn play(&mut self, sound: Sound) -> Result<(), AudioError> {
        let mut synth = self.device.lock();
        for &tone in tones(sound) {
            synth.trigger(tone);
        }
        Ok(())
    }

    fn start_music(&mut self) -> Result<(), AudioError> {
        self.device.lock().music = Some(Music { step: 0, until_next: 0 });
        Ok(())
    }

    fn stop_music(&mut self) -> Result<(), AudioError> {
        self.device.lock().music = None;
        Ok(())
    }
}
