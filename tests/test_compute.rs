use retro_space::compute::*;
use retro_space::entities::*;
use retro_space::error::EntityError;
use retro_space::input::{InputState, Key};
use retro_space::render::palette;
use retro_space::GameConfig;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// A playing state on an 800×600 field with no stars and spawning disabled,
/// so every test controls exactly which entities exist.
fn make_state() -> GameState {
    let config = GameConfig {
        star_count: 0,
        ..GameConfig::default()
    };
    let mut s = init_state(&config, &mut seeded_rng()).unwrap();
    s.status = GameStatus::Playing;
    s.spawn_rate = 0.0;
    s
}

fn idle() -> InputState {
    InputState::new()
}

fn run_ticks(mut s: GameState, n: usize, input: &InputState, rng: &mut StdRng) -> GameState {
    for _ in 0..n {
        s = tick(&s, input, rng);
    }
    s
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_session_counters() {
    let s = init_state(&GameConfig::default(), &mut seeded_rng()).unwrap();
    assert_eq!(s.status, GameStatus::Menu);
    assert_eq!(s.score, 0);
    assert_eq!(s.lives, 5);
    assert_eq!(s.level, 1);
    assert!(approx(s.spawn_rate, 0.005));
    assert_eq!(s.stars.len(), 100);
    assert!(s.bullets.is_empty() && s.enemies.is_empty() && s.particles.is_empty());
}

#[test]
fn init_state_player_starts_centred_near_bottom() {
    let s = make_state();
    assert!(approx(s.player.body.center_x(), 400.0));
    assert!(approx(s.player.body.y, 550.0));
    assert_eq!(s.player.control, ControlMode::Keyboard);
    assert_eq!(s.player.shoot_cooldown, 0);
}

#[test]
fn init_state_rejects_tiny_playfield() {
    let config = GameConfig {
        width: 10.0,
        ..GameConfig::default()
    };
    let err = init_state(&config, &mut seeded_rng()).unwrap_err();
    assert!(matches!(err, EntityError::PlayfieldTooSmall { .. }));
}

// ── State machine ─────────────────────────────────────────────────────────────

#[test]
fn start_moves_menu_to_playing() {
    let s = init_state(&GameConfig::default(), &mut seeded_rng()).unwrap();
    let s2 = start_game(&s);
    assert_eq!(s2.status, GameStatus::Playing);
    assert_eq!(
        s2.events,
        vec![GameEvent::StatusChanged {
            from: GameStatus::Menu,
            to: GameStatus::Playing
        }]
    );
}

#[test]
fn start_is_ignored_outside_menu() {
    let s = make_state();
    let s2 = start_game(&s);
    assert_eq!(s2.status, GameStatus::Playing);
    assert!(s2.events.is_empty());

    let paused = toggle_pause(&s);
    assert_eq!(start_game(&paused).status, GameStatus::Paused);
}

#[test]
fn pause_toggles_and_resumes() {
    let s = make_state();
    let paused = toggle_pause(&s);
    assert_eq!(paused.status, GameStatus::Paused);
    let resumed = toggle_pause(&paused);
    assert_eq!(resumed.status, GameStatus::Playing);
}

#[test]
fn pause_is_ignored_in_menu() {
    let s = init_state(&GameConfig::default(), &mut seeded_rng()).unwrap();
    assert_eq!(toggle_pause(&s).status, GameStatus::Menu);
}

#[test]
fn no_ticks_run_while_paused() {
    let mut s = make_state();
    s.bullets.push(Bullet::new(100.0, 300.0, BULLET_SPEED).unwrap());
    let paused = toggle_pause(&s);
    let after = run_ticks(paused, 10, &idle(), &mut seeded_rng());
    assert_eq!(after.frame, 0);
    assert!(approx(after.bullets[0].body.y, 300.0));
}

#[test]
fn no_ticks_run_in_menu() {
    let s = init_state(&GameConfig::default(), &mut seeded_rng()).unwrap();
    let after = tick(&s, &idle(), &mut seeded_rng());
    assert_eq!(after.frame, 0);
    assert_eq!(after.status, GameStatus::Menu);
}

#[test]
fn restart_returns_fresh_menu_state() {
    let mut s = make_state();
    s.stars.push(Star { x: 1.0, y: 2.0, speed: 1.0, size: 1.0 });
    s.score = 4200;
    s.lives = 0;
    s.level = 3;
    s.status = GameStatus::GameOver;
    s.enemies.push(Enemy::new(10.0, 10.0, 1.0).unwrap());

    let s2 = restart_game(&s);
    assert_eq!(s2.status, GameStatus::Menu);
    assert_eq!(s2.score, 0);
    assert_eq!(s2.lives, 5);
    assert_eq!(s2.level, 1);
    assert_eq!(s2.milestones_reached, 0);
    assert!(approx(s2.spawn_rate, 0.005));
    assert!(s2.enemies.is_empty());
    assert_eq!(s2.stars, s.stars);
}

#[test]
fn transitions_do_not_mutate_original() {
    let s = make_state();
    let _ = toggle_pause(&s);
    let _ = player_shoot(&s);
    let _ = tick(&s, &idle(), &mut seeded_rng());
    assert_eq!(s.status, GameStatus::Playing);
    assert!(s.bullets.is_empty());
    assert_eq!(s.frame, 0);
}

// ── player_shoot ──────────────────────────────────────────────────────────────

#[test]
fn shoot_emits_bullet_at_ship_centre() {
    let s = player_shoot(&make_state());
    assert_eq!(s.bullets.len(), 1);
    let b = &s.bullets[0].body;
    assert!(approx(b.center_x(), s.player.body.center_x()));
    assert!(approx(b.y, s.player.body.y));
    assert!(approx(b.speed_y, -8.0));
    assert!(approx(b.speed_x, 0.0));
}

#[test]
fn shoot_is_rate_limited() {
    let s = player_shoot(&make_state());
    let s = player_shoot(&s);
    assert_eq!(s.bullets.len(), 1);
}

#[test]
fn shoot_succeeds_after_cooldown_decays() {
    let mut rng = seeded_rng();
    let s = player_shoot(&make_state());

    let early = run_ticks(s.clone(), 5, &idle(), &mut rng);
    assert_eq!(player_shoot(&early).bullets.len(), 1);

    let ready = run_ticks(s, 6, &idle(), &mut rng);
    assert_eq!(ready.player.shoot_cooldown, 0);
    assert_eq!(player_shoot(&ready).bullets.len(), 2);
}

#[test]
fn shoot_ignored_when_not_playing() {
    let s = toggle_pause(&make_state());
    assert!(player_shoot(&s).bullets.is_empty());
}

// ── tick: bullets ─────────────────────────────────────────────────────────────

#[test]
fn tick_increments_frame() {
    let s = tick(&make_state(), &idle(), &mut seeded_rng());
    assert_eq!(s.frame, 1);
}

#[test]
fn bullet_leaves_through_top() {
    let mut rng = seeded_rng();
    let mut s = make_state();
    s.bullets.push(Bullet::new(100.0, 50.0, -8.0).unwrap());

    let s6 = run_ticks(s.clone(), 6, &idle(), &mut rng);
    assert_eq!(s6.bullets.len(), 1);
    assert!(approx(s6.bullets[0].body.y, 2.0));

    let s13 = run_ticks(s, 13, &idle(), &mut rng);
    assert!(s13.bullets.is_empty());
}

// ── tick: enemies ─────────────────────────────────────────────────────────────

#[test]
fn enemy_escape_costs_one_life() {
    let mut s = make_state();
    s.enemies.push(Enemy::new(0.0, 599.0, 2.0).unwrap());
    s.enemies.push(Enemy::new(100.0, 500.0, 2.0).unwrap());
    let s2 = tick(&s, &idle(), &mut seeded_rng());
    assert_eq!(s2.lives, 4);
    assert_eq!(s2.enemies.len(), 1);
    assert!(approx(s2.enemies[0].body.x, 100.0));
    assert!(s2.events.contains(&GameEvent::EnemyEscaped { lives: 4 }));
    assert_eq!(s2.status, GameStatus::Playing);
}

#[test]
fn enemy_exactly_on_bottom_edge_stays() {
    let mut s = make_state();
    s.enemies.push(Enemy::new(0.0, 598.0, 2.0).unwrap());
    let s2 = tick(&s, &idle(), &mut seeded_rng());
    assert_eq!(s2.lives, 5);
    assert_eq!(s2.enemies.len(), 1);
}

#[test]
fn five_escapes_end_the_game() {
    let mut rng = seeded_rng();
    let mut s = make_state();
    for _ in 0..5 {
        s.enemies.push(Enemy::new(0.0, 599.0, 2.0).unwrap());
        s = tick(&s, &idle(), &mut rng);
    }
    assert_eq!(s.lives, 0);
    assert_eq!(s.status, GameStatus::GameOver);
    assert_eq!(s.score, 0);
    assert!(s.events.contains(&GameEvent::GameOver { score: 0 }));

    let frame = s.frame;
    s.enemies.push(Enemy::new(0.0, 100.0, 2.0).unwrap());
    let after = run_ticks(s, 3, &idle(), &mut rng);
    assert_eq!(after.frame, frame);
    assert!(approx(after.enemies[0].body.y, 100.0));
}

#[test]
fn simultaneous_escapes_saturate_lives() {
    let mut s = make_state();
    s.lives = 2;
    for i in 0..4 {
        s.enemies.push(Enemy::new(i as f32 * 40.0, 599.0, 2.0).unwrap());
    }
    let s2 = tick(&s, &idle(), &mut seeded_rng());
    assert_eq!(s2.lives, 0);
    assert!(s2.enemies.is_empty());
    assert_eq!(s2.status, GameStatus::GameOver);
    let overs = s2
        .events
        .iter()
        .filter(|e| matches!(e, GameEvent::GameOver { .. }))
        .count();
    assert_eq!(overs, 1);
}

#[test]
fn spawn_places_enemy_above_top_edge() {
    let mut s = make_state();
    s.spawn_rate = 1.0;
    let s2 = tick(&s, &idle(), &mut seeded_rng());
    assert_eq!(s2.enemies.len(), 1);
    let b = &s2.enemies[0].body;
    assert!(approx(b.y, -30.0));
    assert!(b.x >= 0.0 && b.x < 800.0 - ENEMY_WIDTH);
    assert!(b.speed_y >= 1.0 && b.speed_y < 2.5);
}

#[test]
fn zero_spawn_rate_never_spawns() {
    let s = run_ticks(make_state(), 200, &idle(), &mut seeded_rng());
    assert!(s.enemies.is_empty());
}

// ── tick: collisions ──────────────────────────────────────────────────────────

#[test]
fn bullet_hit_removes_pair_and_scores() {
    let mut s = make_state();
    s.enemies.push(Enemy::new(100.0, 100.0, 1.0).unwrap());
    s.bullets.push(Bullet::new(115.0, 130.0, -8.0).unwrap());
    let s2 = tick(&s, &idle(), &mut seeded_rng());

    assert!(s2.bullets.is_empty());
    assert!(s2.enemies.is_empty());
    assert_eq!(s2.score, 100);
    assert_eq!(s2.particles.len(), 8);
    for p in &s2.particles {
        assert!(approx(p.body.x, 100.0));
        assert!(approx(p.body.y, 101.0));
        assert_eq!(p.color, palette::EXPLOSION_ENEMY);
        assert_eq!(p.life, 30);
    }
    assert!(s2
        .events
        .contains(&GameEvent::EnemyDestroyed { x: 100.0, y: 101.0 }));
}

#[test]
fn two_bullets_on_one_enemy_score_once() {
    let mut s = make_state();
    s.enemies.push(Enemy::new(100.0, 100.0, 1.0).unwrap());
    s.bullets.push(Bullet::new(110.0, 130.0, -8.0).unwrap());
    s.bullets.push(Bullet::new(120.0, 130.0, -8.0).unwrap());
    let s2 = tick(&s, &idle(), &mut seeded_rng());

    assert_eq!(s2.score, 100);
    assert_eq!(s2.particles.len(), 8);
    assert!(s2.enemies.is_empty());
    assert_eq!(s2.bullets.len(), 1);
    assert!(approx(s2.bullets[0].body.center_x(), 120.0));
}

#[test]
fn one_bullet_on_two_enemies_kills_first() {
    let mut s = make_state();
    s.enemies.push(Enemy::new(100.0, 100.0, 1.0).unwrap());
    s.enemies.push(Enemy::new(105.0, 100.0, 1.0).unwrap());
    s.bullets.push(Bullet::new(115.0, 130.0, -8.0).unwrap());
    let s2 = tick(&s, &idle(), &mut seeded_rng());

    assert_eq!(s2.score, 100);
    assert_eq!(s2.enemies.len(), 1);
    assert!(approx(s2.enemies[0].body.x, 105.0));
}

#[test]
fn bullet_miss_leaves_both() {
    let mut s = make_state();
    s.enemies.push(Enemy::new(100.0, 100.0, 1.0).unwrap());
    s.bullets.push(Bullet::new(300.0, 130.0, -8.0).unwrap());
    let s2 = tick(&s, &idle(), &mut seeded_rng());
    assert_eq!(s2.enemies.len(), 1);
    assert_eq!(s2.bullets.len(), 1);
    assert_eq!(s2.score, 0);
}

#[test]
fn ramming_the_player_costs_a_life() {
    let mut s = make_state();
    s.enemies.push(Enemy::new(385.0, 540.0, 1.0).unwrap());
    let s2 = tick(&s, &idle(), &mut seeded_rng());
    assert_eq!(s2.lives, 4);
    assert!(s2.enemies.is_empty());
    assert_eq!(s2.particles.len(), 8);
    assert_eq!(s2.score, 0);
    assert!(s2.events.contains(&GameEvent::PlayerHit { lives: 4 }));
}

#[test]
fn ramming_on_last_life_ends_the_game() {
    let mut s = make_state();
    s.lives = 1;
    s.enemies.push(Enemy::new(385.0, 540.0, 1.0).unwrap());
    let s2 = tick(&s, &idle(), &mut seeded_rng());
    assert_eq!(s2.lives, 0);
    assert_eq!(s2.status, GameStatus::GameOver);
    // The final explosion is still there for the game-over screen.
    assert_eq!(s2.particles.len(), 8);
}

// ── tick: particles & stars ───────────────────────────────────────────────────

#[test]
fn particles_expire_after_thirty_ticks() {
    let mut rng = seeded_rng();
    let mut s = make_state();
    s.particles
        .push(Particle::new(10.0, 10.0, 0.0, 0.0, palette::EXPLOSION_ENEMY).unwrap());
    let s29 = run_ticks(s, 29, &idle(), &mut rng);
    assert_eq!(s29.particles.len(), 1);
    assert_eq!(s29.particles[0].life, 1);
    let s30 = tick(&s29, &idle(), &mut rng);
    assert!(s30.particles.is_empty());
}

#[test]
fn stars_wrap_to_top() {
    let mut s = make_state();
    s.stars.push(Star { x: 5.0, y: 599.5, speed: 1.0, size: 1.0 });
    s.stars.push(Star { x: 5.0, y: 10.0, speed: 1.0, size: 1.0 });
    let s2 = tick(&s, &idle(), &mut seeded_rng());
    assert!(approx(s2.stars[0].y, 0.0));
    assert!(s2.stars[0].x >= 0.0 && s2.stars[0].x < 800.0);
    assert!(approx(s2.stars[1].y, 11.0));
}

// ── tick: level progression ───────────────────────────────────────────────────

fn two_kills(score: u32) -> GameState {
    let mut s = make_state();
    s.score = score;
    s.enemies.push(Enemy::new(100.0, 100.0, 1.0).unwrap());
    s.enemies.push(Enemy::new(300.0, 100.0, 1.0).unwrap());
    s.bullets.push(Bullet::new(115.0, 130.0, -8.0).unwrap());
    s.bullets.push(Bullet::new(315.0, 130.0, -8.0).unwrap());
    s
}

#[test]
fn crossing_a_milestone_levels_up_once() {
    let mut rng = seeded_rng();
    let s = tick(&two_kills(1900), &idle(), &mut rng);
    assert_eq!(s.score, 2100);
    assert_eq!(s.level, 2);
    assert!(approx(s.spawn_rate, 0.003));
    let ups = s
        .events
        .iter()
        .filter(|e| matches!(e, GameEvent::LevelUp { .. }))
        .count();
    assert_eq!(ups, 1);

    let later = run_ticks(s, 5, &idle(), &mut rng);
    assert_eq!(later.level, 2);
}

#[test]
fn landing_on_a_milestone_levels_up_once() {
    let mut rng = seeded_rng();
    let mut s = make_state();
    s.score = 1900;
    s.enemies.push(Enemy::new(100.0, 100.0, 1.0).unwrap());
    s.bullets.push(Bullet::new(115.0, 130.0, -8.0).unwrap());
    let s = tick(&s, &idle(), &mut rng);
    assert_eq!(s.score, 2000);
    assert_eq!(s.level, 2);

    let later = run_ticks(s, 3, &idle(), &mut rng);
    assert_eq!(later.score, 2000);
    assert_eq!(later.level, 2);
}

#[test]
fn score_below_milestone_keeps_level() {
    let s = tick(&two_kills(0), &idle(), &mut seeded_rng());
    assert_eq!(s.score, 200);
    assert_eq!(s.level, 1);
}

// ── Player control ────────────────────────────────────────────────────────────

#[test]
fn keyboard_moves_each_axis_independently() {
    let mut input = idle();
    input.press(Key::Left);
    input.press(Key::Up);
    let s = tick(&make_state(), &input, &mut seeded_rng());
    assert!(approx(s.player.body.x, 374.0));
    assert!(approx(s.player.body.y, 544.0));
    assert_eq!(s.player.control, ControlMode::Keyboard);
}

#[test]
fn keyboard_stops_at_edge() {
    let mut s = make_state();
    s.player.body.x = 0.0;
    let mut input = idle();
    input.press(Key::Left);
    let s2 = tick(&s, &input, &mut seeded_rng());
    assert!(approx(s2.player.body.x, 0.0));
}

#[test]
fn fire_key_shoots_with_cooldown() {
    let mut rng = seeded_rng();
    let mut input = idle();
    input.press(Key::Fire);
    let s = run_ticks(make_state(), 6, &input, &mut rng);
    assert_eq!(s.bullets.len(), 1);
    let s = tick(&s, &input, &mut rng);
    assert_eq!(s.bullets.len(), 2);
}

#[test]
fn pointer_pursues_at_constant_speed() {
    let mut input = idle();
    input.pointer_moved(400.0, 300.0);
    let s = tick(&make_state(), &input, &mut seeded_rng());
    assert_eq!(s.player.control, ControlMode::Pointer);
    assert!(approx(s.player.body.x, 380.0));
    assert!(approx(s.player.body.y, 544.0));
}

#[test]
fn pointer_dead_zone_holds_still() {
    let mut input = idle();
    input.pointer_moved(402.0, 566.0);
    let s = tick(&make_state(), &input, &mut seeded_rng());
    assert!(approx(s.player.body.x, 380.0));
    assert!(approx(s.player.body.y, 550.0));
}

#[test]
fn pointer_position_is_clamped_to_playfield() {
    let mut s = make_state();
    s.player.body.x = 2.0;
    let mut input = idle();
    input.pointer_moved(-500.0, 565.0);
    let s2 = tick(&s, &input, &mut seeded_rng());
    assert!(approx(s2.player.body.x, 0.0));
}

#[test]
fn pointer_mode_is_sticky_and_ignores_keys() {
    let mut rng = seeded_rng();
    let mut input = idle();
    input.pointer_moved(400.0, 565.0);
    let s = tick(&make_state(), &input, &mut rng);

    input.press(Key::Left);
    input.pointer_released();
    let s2 = tick(&s, &input, &mut rng);
    assert_eq!(s2.player.control, ControlMode::Pointer);
    assert!(approx(s2.player.body.x, 380.0));
}

#[test]
fn pointer_button_fires_continuously() {
    let mut rng = seeded_rng();
    let mut input = idle();
    input.pointer_pressed(400.0, 565.0);
    let s = tick(&make_state(), &input, &mut rng);
    assert_eq!(s.bullets.len(), 1);
    assert!(approx(s.bullets[0].body.y, 542.0));

    let s = run_ticks(s, 6, &input, &mut rng);
    assert_eq!(s.bullets.len(), 2);
}
