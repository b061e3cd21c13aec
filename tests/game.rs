use bevy_ecs::{entity::Entity, query::With};
use fantasmas::{
    audio::Sound,
    config::Settings,
    constants::{mechanics::MAX_HEARTS, world},
    events::{GameCommand, GameEvent},
    game::Game,
    systems::{AttackHitbox, Dying, GamePhase, GameState, Ghost, Key, Overlay, Player, Position, RawInput, SpawnTimer},
};
use glam::Vec2;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

use common::{AudioCall, RecordingAudio};

fn stand_in(game: &mut Game) -> Entity {
    game.world.spawn_empty().id()
}

fn hit(game: &mut Game) {
    let ghost = stand_in(game);
    game.world.send_event(GameEvent::PlayerHit(ghost));
    game.tick(0.0);
}

fn catch(game: &mut Game) {
    let ghost = stand_in(game);
    game.world.send_event(GameEvent::GhostCaught(ghost));
    game.tick(0.0);
}

fn player_position(game: &mut Game) -> Vec2 {
    let mut players = game.world.query_filtered::<&Position, With<Player>>();
    players.single(&game.world).map(|p| p.0).unwrap_or_default()
}

fn net_is_live(game: &mut Game) -> bool {
    let mut hitboxes = game.world.query::<&AttackHitbox>();
    hitboxes.iter(&game.world).any(AttackHitbox::is_active)
}

fn ghost_positions(game: &mut Game) -> Vec<Vec2> {
    let mut ghosts = game.world.query_filtered::<&Position, With<Ghost>>();
    ghosts.iter(&game.world).map(|p| p.0).collect()
}

#[test]
fn test_nothing_happens_before_start() {
    let mut game = common::create_game();

    game.push_input(RawInput::KeyDown(Key::Right));
    for _ in 0..180 {
        game.tick(common::FRAME);
    }

    assert_eq!(game.state().phase, GamePhase::WaitingToStart);
    assert_eq!(game.hud().overlay, Overlay::Instructions);
    assert_that(&game.ghost_count()).is_equal_to(0);
    assert_eq!(player_position(&mut game), world::CENTER);
}

#[test]
fn test_start_hides_overlay() {
    let game = common::started_game();

    assert_eq!(game.state().phase, GamePhase::Playing);
    assert_eq!(game.hud().overlay, Overlay::Hidden);
    assert_eq!(game.hud().title(), "Fantasmas: 0");
}

#[test]
fn test_three_hits_end_the_game() {
    let mut game = common::started_game();

    for expected in (0..MAX_HEARTS).rev() {
        hit(&mut game);
        assert_that(&game.state().hearts).is_equal_to(expected);
        assert_that(&game.hud().hearts).is_equal_to(expected);
    }

    assert_eq!(game.state().phase, GamePhase::GameOver);
    assert_eq!(*game.world.resource::<SpawnTimer>(), SpawnTimer::Idle);
    assert_eq!(game.hud().overlay, Overlay::GameOver { final_score: 0 });
}

#[test]
fn test_five_catches_heal_a_hurt_player() {
    let mut game = common::started_game();
    hit(&mut game);
    assert_that(&game.state().hearts).is_equal_to(MAX_HEARTS - 1);

    for _ in 0..5 {
        catch(&mut game);
    }

    assert_that(&game.state().hearts).is_equal_to(MAX_HEARTS);
    assert_that(&game.state().heal_counter).is_equal_to(0);
    assert_that(&game.hud().hearts).is_equal_to(MAX_HEARTS);
}

#[test]
fn test_nineteenth_to_twentieth_catch_adds_one_entrance() {
    let mut game = common::started_game();
    game.world.resource_mut::<GameState>().score = 19;

    catch(&mut game);
    assert_that(&game.spawn_points().len()).is_equal_to(6);
    assert_that(&game.hud().entrances_announced).is_equal_to(1);

    catch(&mut game);
    assert_that(&game.spawn_points().len()).is_equal_to(6);
}

#[test]
fn test_net_swing_lasts_two_hundred_milliseconds() {
    let mut game = common::started_game();

    game.push_input(RawInput::KeyDown(Key::Attack));
    game.tick(0.0);
    assert_that(&net_is_live(&mut game)).is_true();

    game.tick(0.199);
    assert_that(&net_is_live(&mut game)).is_true();

    game.tick(0.002);
    assert_that(&net_is_live(&mut game)).is_false();
}

#[test]
fn test_holding_attack_swings_once() {
    let mut game = common::started_game();

    game.push_input(RawInput::KeyDown(Key::Attack));
    game.tick(0.0);
    game.tick(0.25);
    assert_that(&net_is_live(&mut game)).is_false();

    // Still held: no new swing.
    game.tick(common::FRAME);
    assert_that(&net_is_live(&mut game)).is_false();

    game.push_input(RawInput::KeyUp(Key::Attack));
    game.push_input(RawInput::KeyDown(Key::Attack));
    game.tick(common::FRAME);
    assert_that(&net_is_live(&mut game)).is_true();
}

#[test]
fn test_swinging_at_a_ghost_catches_it() {
    let mut game = common::started_game();
    let ghost = common::spawn_test_ghost(&mut game.world, world::CENTER + Vec2::new(40.0, 0.0), 60.0);

    game.push_input(RawInput::KeyDown(Key::Attack));
    game.tick(0.0);

    assert_that(&game.state().score).is_equal_to(1);
    assert_that(&game.state().hearts).is_equal_to(MAX_HEARTS);
    assert_that(&game.world.entity(ghost).contains::<Dying>()).is_true();
    assert_eq!(game.hud().score_label(), "Fantasmas: 1");

    // Fading ghosts disappear on their own.
    game.tick(0.25);
    assert_that(&game.world.get_entity(ghost).is_err()).is_true();
}

#[test]
fn test_ghost_reaching_player_costs_a_heart() {
    let mut game = common::started_game();
    let ghost = common::spawn_test_ghost(&mut game.world, world::CENTER + Vec2::new(20.0, 0.0), 60.0);

    game.tick(0.0);

    assert_that(&game.state().hearts).is_equal_to(MAX_HEARTS - 1);
    assert_that(&game.world.get_entity(ghost).is_err()).is_true();
}

#[test]
fn test_world_freezes_after_game_over() {
    let mut game = common::started_game();
    for _ in 0..MAX_HEARTS {
        hit(&mut game);
    }
    let ghost = common::spawn_test_ghost(&mut game.world, world::CENTER + Vec2::new(200.0, 0.0), 80.0);
    game.push_input(RawInput::KeyDown(Key::Left));

    for _ in 0..120 {
        game.tick(common::FRAME);
    }

    assert_eq!(game.state().phase, GamePhase::GameOver);
    assert_that(&game.ghost_count()).is_equal_to(1);
    assert_eq!(
        game.world.entity(ghost).get::<Position>().map(|p| p.0),
        Some(world::CENTER + Vec2::new(200.0, 0.0))
    );
    assert_eq!(player_position(&mut game), world::CENTER);
}

#[test]
fn test_ghosts_spawn_and_close_in() {
    let mut game = common::started_game();

    game.tick(2.0);
    let spawned = ghost_positions(&mut game);
    assert_that(&spawned).has_length(1);

    game.tick(0.5);
    let moved = ghost_positions(&mut game);
    let start = spawned[0].distance(world::CENTER);
    let now = moved[0].distance(world::CENTER);
    assert_that(&now).is_less_than(start);
}

#[test]
fn test_restart_after_game_over() {
    let mut game = common::started_game();
    catch(&mut game);
    game.tick(2.0);
    for _ in 0..MAX_HEARTS {
        hit(&mut game);
    }

    game.send_command(GameCommand::Restart);
    game.tick(0.0);

    assert_eq!(game.state().phase, GamePhase::Playing);
    assert_that(&game.state().score).is_equal_to(0);
    assert_that(&game.state().hearts).is_equal_to(MAX_HEARTS);
    assert_that(&game.ghost_count()).is_equal_to(0);
    assert_eq!(game.hud().overlay, Overlay::Hidden);
}

#[test]
fn test_same_seed_plays_the_same_game() {
    let mut first = common::started_game();
    let mut second = common::started_game();

    for _ in 0..300 {
        first.tick(common::FRAME);
        second.tick(common::FRAME);
    }

    assert_that(&first.ghost_count()).is_greater_than(0);
    assert_eq!(ghost_positions(&mut first), ghost_positions(&mut second));
}

#[test]
fn test_exit_command_stops_the_loop() {
    let mut game = common::create_game();
    assert_that(&game.tick(common::FRAME)).is_false();

    game.send_command(GameCommand::Exit);

    assert_that(&game.tick(common::FRAME)).is_true();
}

#[test]
fn test_audio_follows_the_game() {
    let sink = RecordingAudio::default();
    let mut game = Game::new(&common::test_settings(), Box::new(sink.clone()));

    game.send_command(GameCommand::Start);
    game.tick(0.0);
    catch(&mut game);
    game.send_command(GameCommand::ToggleMute);
    game.tick(0.0);
    catch(&mut game);

    assert_that(&game.is_muted()).is_true();
    assert_eq!(
        *sink.calls.borrow(),
        vec![AudioCall::StartMusic, AudioCall::Play(Sound::Catch), AudioCall::StopMusic]
    );
}

#[test]
fn test_muted_setting_is_honoured() {
    let sink = RecordingAudio::default();
    let settings = Settings {
        muted: true,
        ..common::test_settings()
    };
    let mut game = Game::new(&settings, Box::new(sink.clone()));

    game.send_command(GameCommand::Start);
    game.tick(0.0);

    assert_that(&game.is_muted()).is_true();
    assert_that(&sink.calls.borrow().is_empty()).is_true();
}
