//! Desktop renderer: draws the room with SDL2 canvas primitives.
//!
//! Purely a reader of the world. Nothing here feeds back into game logic.

use std::f32::consts::FRAC_PI_4;

use bevy_ecs::world::World;
use glam::Vec2;
use sdl2::pixels::Color;
use sdl2::rect::{Point, Rect};
use sdl2::render::{BlendMode, Canvas};
use sdl2::video::Window;

use crate::constants::{collider, effects::SHAKE_INTENSITY, input::JOYSTICK_RADIUS, world as room};
use crate::error::{GameError, GameResult};
use crate::game::Game;
use crate::systems::{
    Aim, AttackHitbox, Dying, Facing, Ghost, HudState, InputState, Overlay, Player, Position, SpawnKind, SpawnPoints,
    Tint, TimeToLive, VisualEffect,
};

const FLOOR: Color = Color::RGB(0x1a, 0x0b, 0x2e);
const PLANK_LINE: Color = Color::RGBA(0, 0, 0, 50);
const DOOR: Color = Color::RGB(0x3e, 0x27, 0x23);
const DOOR_KNOB: Color = Color::RGB(0xff, 0xd7, 0x00);
const WINDOW_FRAME: Color = Color::RGB(0x22, 0x22, 0x22);
const MOON_GLOW: Color = Color::RGBA(0x44, 0x44, 0xff, 80);
const OVERALLS: Color = Color::RGB(0x00, 0x00, 0xff);
const SKIN: Color = Color::RGB(0xff, 0xee, 0xbb);
const HAT: Color = Color::RGB(0x00, 0xcc, 0x00);
const GHOST_BODY: Color = Color::RGB(0xee, 0xee, 0xee);
const GHOST_EYES: Color = Color::RGB(0xff, 0xff, 0x00);
const BEAM: Color = Color::RGBA(0xff, 0xff, 0xc8, 40);
const NET: Color = Color::RGBA(0xff, 0xff, 0xff, 128);
const HEART: Color = Color::RGB(0xff, 0x00, 0x00);

const PLANK_WIDTH: i32 = 60;
const BEAM_LENGTH: f32 = 100.0;
const BEAM_HALF_ANGLE: f32 = std::f32::consts::FRAC_PI_6;
const DOOR_SIZE: Vec2 = Vec2::new(60.0, 80.0);
const WINDOW_SIZE: Vec2 = Vec2::new(50.0, 70.0);

fn sdl(result: Result<(), String>) -> GameResult<()> {
    result.map_err(GameError::Sdl)
}

fn rect_centered(center: Vec2, size: Vec2) -> Rect {
    Rect::new(
        (center.x - size.x / 2.0).round() as i32,
        (center.y - size.y / 2.0).round() as i32,
        size.x.max(1.0) as u32,
        size.y.max(1.0) as u32,
    )
}

fn point(p: Vec2) -> Point {
    Point::new(p.x.round() as i32, p.y.round() as i32)
}

/// Multiplies `color` by a 0xRRGGBB tint, the way sprite tinting works.
fn tinted(color: Color, tint: Tint) -> Color {
    match tint.0 {
        None => color,
        Some(rgb) => {
            let channel = |c: u8, shift: u32| ((c as u32 * ((rgb >> shift) & 0xff)) / 0xff) as u8;
            Color::RGBA(channel(color.r, 16), channel(color.g, 8), channel(color.b, 0), color.a)
        }
    }
}

fn with_alpha(color: Color, alpha: f32) -> Color {
    Color::RGBA(color.r, color.g, color.b, (alpha.clamp(0.0, 1.0) * color.a as f32) as u8)
}

fn fill_circle(canvas: &mut Canvas<Window>, center: Vec2, radius: f32) -> GameResult<()> {
    let r = radius.round() as i32;
    for dy in -r..=r {
        let half = ((r * r - dy * dy) as f32).sqrt().round() as i32;
        let y = center.y.round() as i32 + dy;
        let x = center.x.round() as i32;
        sdl(canvas.draw_line(Point::new(x - half, y), Point::new(x + half, y)))?;
    }
    Ok(())
}

fn draw_ring(canvas: &mut Canvas<Window>, center: Vec2, radius: f32) -> GameResult<()> {
    const SEGMENTS: usize = 48;
    let points: Vec<Point> = (0..=SEGMENTS)
        .map(|i| point(center + Vec2::from_angle(i as f32 / SEGMENTS as f32 * std::f32::consts::TAU) * radius))
        .collect();
    sdl(canvas.draw_lines(points.as_slice()))
}

/// A filled circular sector, drawn as a fan of rays.
fn fill_sector(canvas: &mut Canvas<Window>, center: Vec2, radius: f32, rotation: f32, half_angle: f32) -> GameResult<()> {
    let rays = (radius * half_angle).ceil().max(2.0) as usize * 2;
    for i in 0..=rays {
        let angle = rotation - half_angle + 2.0 * half_angle * i as f32 / rays as f32;
        sdl(canvas.draw_line(point(center), point(center + Vec2::from_angle(angle) * radius)))?;
    }
    Ok(())
}

/// Draws frames and keeps the window title in sync with the score and overlay.
pub struct Renderer {
    canvas: Canvas<Window>,
    title: String,
}

impl Renderer {
    pub fn new(mut canvas: Canvas<Window>) -> Self {
        canvas.set_blend_mode(BlendMode::Blend);
        Self {
            canvas,
            title: String::new(),
        }
    }

    pub fn draw(&mut self, game: &mut Game) -> GameResult<()> {
        let world = &mut game.world;
        let offset = shake_offset(world);

        self.draw_room(offset)?;
        self.draw_entrances(world, offset)?;
        self.draw_ghosts(world, offset)?;
        self.draw_player(world, offset)?;
        self.draw_effects(world, offset)?;
        self.draw_hearts(world)?;
        self.draw_joystick(world)?;
        self.draw_overlay(world)?;

        self.canvas.present();
        self.update_title(world.resource::<HudState>())
    }

    fn draw_room(&mut self, offset: Vec2) -> GameResult<()> {
        self.canvas.set_draw_color(FLOOR);
        self.canvas.clear();

        self.canvas.set_draw_color(PLANK_LINE);
        let dx = offset.x.round() as i32;
        for x in (0..room::WIDTH as i32).step_by(PLANK_WIDTH as usize) {
            sdl(self.canvas.draw_line(Point::new(x + dx, 0), Point::new(x + dx, room::HEIGHT as i32)))?;
        }
        Ok(())
    }

    fn draw_entrance(&mut self, center: Vec2, kind: SpawnKind, entry_angle: f32, alpha: f32) -> GameResult<()> {
        // Entrances on the side walls are turned a quarter, so their footprint swaps axes.
        let sideways = entry_angle.abs() > 45.0;
        let size = match kind {
            SpawnKind::Door => DOOR_SIZE,
            SpawnKind::Window => WINDOW_SIZE,
        };
        let size = if sideways { Vec2::new(size.y, size.x) } else { size };

        match kind {
            SpawnKind::Door => {
                self.canvas.set_draw_color(with_alpha(DOOR, alpha));
                sdl(self.canvas.fill_rect(rect_centered(center, size)))?;
                self.canvas.set_draw_color(with_alpha(DOOR_KNOB, alpha));
                let knob = if sideways {
                    Vec2::new(0.0, size.y / 2.0 - 8.0)
                } else {
                    Vec2::new(size.x / 2.0 - 8.0, 0.0)
                };
                fill_circle(&mut self.canvas, center + knob, 4.0)
            }
            SpawnKind::Window => {
                self.canvas.set_draw_color(with_alpha(WINDOW_FRAME, alpha));
                sdl(self.canvas.fill_rect(rect_centered(center, size)))?;
                self.canvas.set_draw_color(with_alpha(MOON_GLOW, alpha));
                sdl(self.canvas.fill_rect(rect_centered(center, size - Vec2::splat(10.0))))
            }
        }
    }

    fn draw_entrances(&mut self, world: &mut World, offset: Vec2) -> GameResult<()> {
        let points = world.resource::<SpawnPoints>().clone();

        let mut reveals = world.query::<(&VisualEffect, &TimeToLive)>();
        let revealing: Vec<(Vec2, f32)> = reveals
            .iter(world)
            .filter_map(|(effect, ttl)| match effect {
                VisualEffect::EntranceReveal(point) => Some((point.position, ttl.progress())),
                _ => None,
            })
            .collect();

        for point in points.as_slice() {
            let alpha = revealing
                .iter()
                .find(|(position, _)| *position == point.position)
                .map_or(1.0, |&(_, progress)| progress);
            self.draw_entrance(point.position + offset, point.kind, point.entry_angle, alpha)?;
        }
        Ok(())
    }

    fn draw_ghosts(&mut self, world: &mut World, offset: Vec2) -> GameResult<()> {
        let mut ghosts = world.query::<(&Ghost, &Position, &Facing, &Tint, Option<&Dying>, Option<&TimeToLive>)>();
        for (_, position, facing, tint, dying, ttl) in ghosts.iter(world) {
            let alpha = match (dying, ttl) {
                (Some(_), Some(ttl)) => 1.0 - ttl.progress(),
                _ => 1.0,
            };
            let center = position.0 + offset;

            self.canvas.set_draw_color(with_alpha(tinted(GHOST_BODY, *tint), alpha));
            fill_circle(&mut self.canvas, center - Vec2::new(0.0, 6.0), collider::GHOST_SIZE.x / 2.0)?;
            sdl(self.canvas.fill_rect(rect_centered(
                center + Vec2::new(0.0, 6.0),
                Vec2::new(collider::GHOST_SIZE.x, collider::GHOST_SIZE.y / 2.0 + 4.0),
            )))?;

            let look = match facing {
                Facing::Left => -2.0,
                Facing::Right => 2.0,
            };
            self.canvas.set_draw_color(with_alpha(GHOST_EYES, alpha));
            fill_circle(&mut self.canvas, center + Vec2::new(-6.0 + look, -4.0), 3.0)?;
            fill_circle(&mut self.canvas, center + Vec2::new(6.0 + look, -4.0), 3.0)?;
        }
        Ok(())
    }

    fn draw_player(&mut self, world: &mut World, offset: Vec2) -> GameResult<()> {
        let mut players = world.query::<(&Player, &Position, &Aim, &Tint)>();
        let Ok((_, position, aim, tint)) = players.single(world) else {
            return Ok(());
        };
        let (center, rotation, tint) = (position.0 + offset, aim.rotation, *tint);

        self.canvas.set_draw_color(BEAM);
        fill_sector(&mut self.canvas, center, BEAM_LENGTH, rotation, BEAM_HALF_ANGLE)?;

        self.canvas.set_draw_color(tinted(OVERALLS, tint));
        sdl(self.canvas.fill_rect(rect_centered(center + Vec2::new(0.0, 6.0), Vec2::new(20.0, 20.0))))?;
        self.canvas.set_draw_color(tinted(SKIN, tint));
        fill_circle(&mut self.canvas, center - Vec2::new(0.0, 6.0), 8.0)?;
        self.canvas.set_draw_color(tinted(HAT, tint));
        fill_circle(&mut self.canvas, center - Vec2::new(0.0, 14.0), 9.0)?;

        let mut hitboxes = world.query::<(&AttackHitbox, &Position, &Aim)>();
        for (hitbox, position, aim) in hitboxes.iter(world) {
            if hitbox.is_active() {
                self.canvas.set_draw_color(NET);
                fill_sector(
                    &mut self.canvas,
                    position.0 + offset,
                    collider::HITBOX_SIZE.x / 2.0,
                    aim.rotation,
                    FRAC_PI_4,
                )?;
            }
        }
        Ok(())
    }

    fn draw_effects(&mut self, world: &mut World, offset: Vec2) -> GameResult<()> {
        let mut effects = world.query::<(&VisualEffect, &TimeToLive)>();
        for (effect, ttl) in effects.iter(world) {
            let fade = 1.0 - ttl.progress();
            match effect {
                VisualEffect::Flash => {
                    self.canvas.set_draw_color(with_alpha(Color::RGBA(0, 255, 0, 90), fade));
                    sdl(self.canvas.fill_rect(None))?;
                }
                VisualEffect::EntranceNotice => {
                    self.canvas.set_draw_color(with_alpha(Color::RGBA(0xff, 0x88, 0x00, 160), fade));
                    sdl(self.canvas.fill_rect(rect_centered(
                        Vec2::new(room::CENTER.x, 100.0) + offset,
                        Vec2::new(360.0, 40.0),
                    )))?;
                }
                VisualEffect::EntranceReveal(point) => {
                    self.canvas.set_draw_color(with_alpha(Color::RGBA(0xff, 0xff, 0xff, 200), fade));
                    draw_ring(&mut self.canvas, point.position + offset, 50.0)?;
                }
                VisualEffect::Shake => {}
            }
        }
        Ok(())
    }

    fn draw_hearts(&mut self, world: &World) -> GameResult<()> {
        let hearts = world.resource::<HudState>().hearts;
        self.canvas.set_draw_color(HEART);
        for i in 0..hearts {
            let origin = Vec2::new(30.0 + i as f32 * 45.0, 30.0);
            fill_circle(&mut self.canvas, origin + Vec2::new(-6.0, 0.0), 7.0)?;
            fill_circle(&mut self.canvas, origin + Vec2::new(6.0, 0.0), 7.0)?;
            for row in 0..14 {
                let half = 13 - row;
                let y = origin.y as i32 + 3 + row;
                sdl(self.canvas.draw_line(
                    Point::new(origin.x as i32 - half, y),
                    Point::new(origin.x as i32 + half, y),
                ))?;
            }
        }
        Ok(())
    }

    fn draw_joystick(&mut self, world: &World) -> GameResult<()> {
        let Some(joystick) = world.resource::<InputState>().joystick else {
            return Ok(());
        };

        self.canvas.set_draw_color(Color::RGBA(0xff, 0xff, 0xff, 80));
        draw_ring(&mut self.canvas, joystick.origin, JOYSTICK_RADIUS)?;

        let stick = joystick.origin + joystick.delta().clamp_length_max(JOYSTICK_RADIUS);
        self.canvas.set_draw_color(Color::RGBA(0xff, 0xff, 0xff, 140));
        fill_circle(&mut self.canvas, stick, 20.0)
    }

    fn draw_overlay(&mut self, world: &World) -> GameResult<()> {
        match world.resource::<HudState>().overlay {
            Overlay::Hidden => Ok(()),
            Overlay::Instructions => {
                self.canvas.set_draw_color(Color::RGBA(0, 0, 0, 180));
                sdl(self.canvas.fill_rect(None))
            }
            Overlay::GameOver { .. } => {
                self.canvas.set_draw_color(Color::RGBA(0x40, 0, 0, 180));
                sdl(self.canvas.fill_rect(None))
            }
        }
    }

    fn update_title(&mut self, hud: &HudState) -> GameResult<()> {
        let title = hud.title();
        if title != self.title {
            self.canvas
                .window_mut()
                .set_title(&title)
                .map_err(|e| GameError::Sdl(e.to_string()))?;
            self.title = title;
        }
        Ok(())
    }
}

/// Camera offset from the strongest running shake, oscillating and fading out.
fn shake_offset(world: &mut World) -> Vec2 {
    let mut effects = world.query::<(&VisualEffect, &TimeToLive)>();
    effects
        .iter(world)
        .filter(|(effect, _)| matches!(effect, VisualEffect::Shake))
        .map(|(_, ttl)| {
            let progress = ttl.progress();
            let amplitude = SHAKE_INTENSITY * room::WIDTH * (1.0 - progress);
            Vec2::new((progress * 60.0).sin(), (progress * 45.0).cos()) * amplitude
        })
        .max_by(|a, b| a.length_squared().total_cmp(&b.length_squared()))
        .unwrap_or(Vec2::ZERO)
}
