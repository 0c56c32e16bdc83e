/// Game-logic functions: the state machine and the per-tick update.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, the input snapshot and an RNG handle) and
/// returns a brand-new `GameState`.  Side effects are limited to the injected
/// RNG.  `events` on the returned state lists what the transition did.

use rand::Rng;

use crate::collision::{bullet_hits, player_hits};
use crate::config::GameConfig;
use crate::entities::{
    GameEvent, GameState, GameStatus, Kinematic, Particle, Player, Playfield,
};
use crate::error::EntityError;
use crate::input::InputState;
use crate::render::palette;
use crate::spawner::{explosion, maybe_spawn_enemy, starfield};

/// Score awarded per enemy destroyed.
pub const SCORE_PER_KILL: u32 = 100;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the menu-state game for the given settings.
pub fn init_state(config: &GameConfig, rng: &mut impl Rng) -> Result<GameState, EntityError> {
    let field = Playfield::new(config.width, config.height)?;
    let stars = starfield(&field, config.star_count, rng);
    Ok(GameState {
        player: Player::spawn(&field),
        bullets: Vec::new(),
        enemies: Vec::new(),
        particles: Vec::new(),
        stars,
        score: 0,
        lives: config.starting_lives,
        level: 1,
        spawn_rate: config.base_spawn_rate,
        milestones_reached: 0,
        status: GameStatus::Menu,
        frame: 0,
        field,
        events: Vec::new(),
        config: config.clone(),
    })
}

/// Copy of `state` with last transition's events dropped.
fn next_of(state: &GameState) -> GameState {
    let mut next = state.clone();
    next.events.clear();
    next
}

fn set_status(state: &mut GameState, to: GameStatus) {
    if state.status != to {
        state.events.push(GameEvent::StatusChanged {
            from: state.status,
            to,
        });
        state.status = to;
    }
}

// ── Control signals ──────────────────────────────────────────────────────────

/// `menu → playing`.  Ignored in any other state.
pub fn start_game(state: &GameState) -> GameState {
    let mut next = next_of(state);
    if next.status == GameStatus::Menu {
        set_status(&mut next, GameStatus::Playing);
    }
    next
}

/// `playing ⇄ paused`.  Ignored in menu and game over.
pub fn toggle_pause(state: &GameState) -> GameState {
    let mut next = next_of(state);
    match next.status {
        GameStatus::Playing => set_status(&mut next, GameStatus::Paused),
        GameStatus::Paused => set_status(&mut next, GameStatus::Playing),
        GameStatus::Menu | GameStatus::GameOver => {}
    }
    next
}

/// Back to a fresh session in the menu, from any state.  The starfield and
/// playfield carry over.
pub fn restart_game(state: &GameState) -> GameState {
    let config = &state.config;
    let mut next = GameState {
        player: Player::spawn(&state.field),
        bullets: Vec::new(),
        enemies: Vec::new(),
        particles: Vec::new(),
        stars: state.stars.clone(),
        score: 0,
        lives: config.starting_lives,
        level: 1,
        spawn_rate: config.base_spawn_rate,
        milestones_reached: 0,
        status: state.status,
        frame: 0,
        field: state.field,
        events: Vec::new(),
        config: config.clone(),
    };
    set_status(&mut next, GameStatus::Menu);
    next
}

// ── Input-driven transitions ─────────────────────────────────────────────────

/// Fire a bullet from the player, subject to the shot cooldown.
pub fn player_shoot(state: &GameState) -> GameState {
    let mut next = next_of(state);
    if next.status != GameStatus::Playing {
        return next;
    }
    if let Some(bullet) = next.player.shoot() {
        next.bullets.push(bullet);
    }
    next
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Take one life; the first time lives hit zero the game is over.
fn lose_life(state: &mut GameState) {
    state.lives = state.lives.saturating_sub(1);
    if state.lives == 0 && state.status == GameStatus::Playing {
        set_status(state, GameStatus::GameOver);
        state.events.push(GameEvent::GameOver { score: state.score });
    }
}

/// Advance the simulation by one tick.  Only runs while playing; in any
/// other state the game is returned unchanged.
pub fn tick(state: &GameState, input: &InputState, rng: &mut impl Rng) -> GameState {
    let mut next = next_of(state);
    if next.status != GameStatus::Playing {
        return next;
    }
    next.frame += 1;
    let field = next.field;

    // ── 1. Player ────────────────────────────────────────────────────────────
    if let Some(bullet) = next.player.update(input, &field) {
        next.bullets.push(bullet);
    }

    // ── 2. Bullets: move, drop those above the top edge ─────────────────────
    for bullet in &mut next.bullets {
        bullet.update();
    }
    next.bullets.retain(|b| b.body.y >= 0.0);

    // ── 3. Enemies: move, each escape past the bottom costs a life ──────────
    for enemy in &mut next.enemies {
        enemy.update();
    }
    let (enemies, escaped): (Vec<_>, Vec<_>) = std::mem::take(&mut next.enemies)
        .into_iter()
        .partition(|e| e.body.y <= field.height);
    next.enemies = enemies;
    for _ in &escaped {
        lose_life(&mut next);
        next.events.push(GameEvent::EnemyEscaped { lives: next.lives });
    }

    // ── 4. Particles ─────────────────────────────────────────────────────────
    for particle in &mut next.particles {
        particle.update();
    }
    next.particles.retain(Particle::is_alive);

    // ── 5. Starfield ─────────────────────────────────────────────────────────
    for star in &mut next.stars {
        star.fall(&field, rng);
    }

    // ── 6. Spawn ─────────────────────────────────────────────────────────────
    if let Some(enemy) = maybe_spawn_enemy(&field, next.spawn_rate, rng) {
        next.enemies.push(enemy);
    }

    // ── 7. Collisions ────────────────────────────────────────────────────────
    resolve_collisions(&mut next, rng);

    // ── 8. Level progression ─────────────────────────────────────────────────
    if next.status == GameStatus::Playing {
        let milestone = next.score / next.config.level_score_step;
        if milestone > next.milestones_reached {
            next.milestones_reached += 1;
            next.level += 1;
            next.spawn_rate += next.config.spawn_rate_step;
            next.events.push(GameEvent::LevelUp {
                level: next.level,
                spawn_rate: next.spawn_rate,
            });
        }
    }

    next
}

/// Bullet ↔ enemy hits first, then player ↔ enemy contact.  Survivors are
/// collected after each scan; nothing is removed mid-scan.
fn resolve_collisions(state: &mut GameState, rng: &mut impl Rng) {
    let hits = bullet_hits(&state.bullets, &state.enemies);
    for &(_, ei) in &hits.pairs {
        let body = state.enemies[ei].body;
        state
            .particles
            .extend(explosion(body.x, body.y, palette::EXPLOSION_ENEMY, rng));
        state.score += SCORE_PER_KILL;
        state.events.push(GameEvent::EnemyDestroyed { x: body.x, y: body.y });
    }
    if !hits.pairs.is_empty() {
        state.bullets = std::mem::take(&mut state.bullets)
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !hits.bullet_used(*i))
            .map(|(_, b)| b)
            .collect();
        state.enemies = std::mem::take(&mut state.enemies)
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !hits.enemy_killed(*i))
            .map(|(_, e)| e)
            .collect();
    }

    let rammed = player_hits(&state.player, &state.enemies);
    for &ei in &rammed {
        let body = state.enemies[ei].body;
        state
            .particles
            .extend(explosion(body.x, body.y, palette::EXPLOSION_ENEMY, rng));
        lose_life(state);
        state.events.push(GameEvent::PlayerHit { lives: state.lives });
    }
    if !rammed.is_empty() {
        state.enemies = std::mem::take(&mut state.enemies)
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !rammed.contains(i))
            .map(|(_, e)| e)
            .collect();
    }
}
