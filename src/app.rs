use std::time::{Duration, Instant};

use glam::Vec2;
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use sdl2::mouse::MouseButton;
use sdl2::{EventPump, Sdl};
use tracing::{debug, error, info, warn};

use crate::audio::{AudioSink, NullAudio, SynthAudio};
use crate::config::Settings;
use crate::constants::{world, LOOP_TIME};
use crate::error::{AudioError, GameError, GameResult};
use crate::events::GameCommand;
use crate::game::Game;
use crate::render::Renderer;
use crate::systems::{Key, Overlay, RawInput};

fn sleep(value: Duration) {
    spin_sleep::sleep(value);
}

/// Maps a physical key onto the game's logical keys. Arrows and WASD both move.
fn map_key(keycode: Keycode) -> Option<Key> {
    match keycode {
        Keycode::Up | Keycode::W => Some(Key::Up),
        Keycode::Down | Keycode::S => Some(Key::Down),
        Keycode::Left | Keycode::A => Some(Key::Left),
        Keycode::Right | Keycode::D => Some(Key::Right),
        Keycode::Space => Some(Key::Attack),
        _ => None,
    }
}

/// Touch coordinates arrive normalised to the window; the game works in room units.
fn touch_point(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, y) * world::SIZE
}

/// The desktop shell: owns SDL2, feeds input to the game and draws it at a fixed rate.
pub struct App {
    game: Game,
    renderer: Renderer,
    event_pump: EventPump,
    last_tick: Instant,
    _sdl: Sdl,
}

impl App {
    pub fn new(settings: &Settings) -> GameResult<Self> {
        // Touches are handled directly; synthesised mouse clicks would press twice.
        sdl2::hint::set("SDL_TOUCH_MOUSE_EVENTS", "0");

        let sdl_context = sdl2::init().map_err(GameError::Sdl)?;
        let video_subsystem = sdl_context.video().map_err(GameError::Sdl)?;

        let audio: Box<dyn AudioSink> = match sdl_context
            .audio()
            .map_err(AudioError::Unavailable)
            .and_then(|subsystem| SynthAudio::new(&subsystem))
        {
            Ok(synth) => Box::new(synth),
            Err(e) => {
                warn!("Audio disabled: {e}");
                Box::new(NullAudio)
            }
        };

        let window = video_subsystem
            .window("Fantasmas", world::WIDTH as u32, world::HEIGHT as u32)
            .resizable()
            .position_centered()
            .build()
            .map_err(|e| GameError::Sdl(e.to_string()))?;

        let mut canvas = window.into_canvas().build().map_err(|e| GameError::Sdl(e.to_string()))?;
        canvas
            .set_logical_size(world::WIDTH as u32, world::HEIGHT as u32)
            .map_err(|e| GameError::Sdl(e.to_string()))?;

        let event_pump = sdl_context.event_pump().map_err(GameError::Sdl)?;
        let game = Game::new(settings, audio);

        Ok(Self {
            game,
            renderer: Renderer::new(canvas),
            event_pump,
            last_tick: Instant::now(),
            _sdl: sdl_context,
        })
    }

    /// The overlay's button: starts the first game or restarts a finished one.
    fn confirm_overlay(&mut self) {
        match self.game.hud().overlay {
            Overlay::Instructions => self.game.send_command(GameCommand::Start),
            Overlay::GameOver { .. } => self.game.send_command(GameCommand::Restart),
            Overlay::Hidden => {}
        }
    }

    fn overlay_shown(&self) -> bool {
        self.game.hud().overlay != Overlay::Hidden
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Window { win_event, .. } => match win_event {
                WindowEvent::Hidden => debug!("Window hidden"),
                WindowEvent::Shown => debug!("Window shown"),
                _ => {}
            },
            Event::Quit { .. }
            | Event::KeyDown {
                keycode: Some(Keycode::Escape),
                ..
            } => self.game.send_command(GameCommand::Exit),
            Event::KeyDown {
                keycode: Some(Keycode::M),
                repeat: false,
                ..
            } => self.game.send_command(GameCommand::ToggleMute),
            Event::KeyDown {
                keycode: Some(Keycode::Return | Keycode::KpEnter),
                repeat: false,
                ..
            } => self.confirm_overlay(),
            Event::KeyDown {
                keycode: Some(keycode),
                repeat: false,
                ..
            } => {
                if let Some(key) = map_key(keycode) {
                    self.game.push_input(RawInput::KeyDown(key));
                }
            }
            Event::KeyUp {
                keycode: Some(keycode), ..
            } => {
                if let Some(key) = map_key(keycode) {
                    self.game.push_input(RawInput::KeyUp(key));
                }
            }
            Event::MouseButtonDown {
                mouse_btn: MouseButton::Left,
                x,
                y,
                ..
            } => {
                if self.overlay_shown() {
                    self.confirm_overlay();
                } else {
                    self.game.push_input(RawInput::PointerDown(Vec2::new(x as f32, y as f32)));
                }
            }
            Event::MouseMotion { x, y, .. } => {
                self.game.push_input(RawInput::PointerMove(Vec2::new(x as f32, y as f32)));
            }
            Event::MouseButtonUp {
                mouse_btn: MouseButton::Left,
                ..
            } => self.game.push_input(RawInput::PointerUp),
            Event::FingerDown { x, y, .. } => {
                if self.overlay_shown() {
                    self.confirm_overlay();
                } else {
                    self.game.push_input(RawInput::PointerDown(touch_point(x, y)));
                }
            }
            Event::FingerMotion { x, y, .. } => self.game.push_input(RawInput::PointerMove(touch_point(x, y))),
            Event::FingerUp { .. } => self.game.push_input(RawInput::PointerUp),
            _ => {}
        }
    }

    /// Runs one frame. Returns false once the game asked to exit.
    pub fn run(&mut self) -> bool {
        let start = Instant::now();

        let events: Vec<Event> = self.event_pump.poll_iter().collect();
        for event in events {
            self.handle_event(event);
        }

        let dt = self.last_tick.elapsed().as_secs_f32();
        self.last_tick = Instant::now();

        let exit = self.game.tick(dt);
        if exit {
            info!("Exit requested. Exiting...");
            return false;
        }

        if let Err(e) = self.renderer.draw(&mut self.game) {
            error!("Failed to draw game: {e}");
        }

        if start.elapsed() < LOOP_TIME {
            let time = LOOP_TIME.saturating_sub(start.elapsed());
            if time != Duration::ZERO {
                sleep(time);
            }
        } else {
            warn!("Game loop behind schedule by: {:?}", start.elapsed() - LOOP_TIME);
        }

        true
    }
}
