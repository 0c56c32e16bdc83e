/// All game entity types.  Mostly data; the only behaviour here is each
/// entity's own per-tick step, which needs nothing beyond the entity itself
/// and the capability handed in (playfield bounds, input snapshot).

use rand::Rng;

use crate::config::GameConfig;
use crate::error::EntityError;
use crate::input::{InputState, Key};
use crate::render::Rgb;

// ── Tuning ────────────────────────────────────────────────────────────────────

pub const PLAYER_WIDTH: f32 = 40.0;
pub const PLAYER_HEIGHT: f32 = 30.0;
pub const PLAYER_SPEED: f32 = 6.0;
/// Distance from the bottom edge the player starts at.
pub const PLAYER_START_OFFSET: f32 = 50.0;
/// Ticks between two shots.
pub const SHOOT_COOLDOWN: u32 = 6;
/// Pointer pursuit stops inside this radius.
pub const POINTER_DEAD_ZONE: f32 = 5.0;

pub const ENEMY_WIDTH: f32 = 30.0;
pub const ENEMY_HEIGHT: f32 = 25.0;
pub const ENEMY_SPAWN_Y: f32 = -30.0;
pub const ENEMY_MIN_SPEED: f32 = 1.0;
pub const ENEMY_MAX_SPEED: f32 = 2.5;

pub const BULLET_WIDTH: f32 = 3.0;
pub const BULLET_HEIGHT: f32 = 10.0;
pub const BULLET_SPEED: f32 = -8.0;

pub const PARTICLE_LIFE: u32 = 30;
pub const PARTICLE_DAMPING: f32 = 0.98;

// ── Playfield ─────────────────────────────────────────────────────────────────

/// The visible rectangle entities move within, origin at the top-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    /// Must be finite and large enough to hold the player at its start row.
    pub fn new(width: f32, height: f32) -> Result<Self, EntityError> {
        let width = size("width", width)?;
        let height = size("height", height)?;
        if width < PLAYER_WIDTH || height < PLAYER_START_OFFSET.max(PLAYER_HEIGHT) {
            return Err(EntityError::PlayfieldTooSmall { width, height });
        }
        Ok(Playfield { width, height })
    }
}

// ── Kinematic leaf ────────────────────────────────────────────────────────────

/// Position, size and per-tick velocity shared by every gameplay entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed_x: f32,
    pub speed_y: f32,
}

fn finite(field: &'static str, value: f32) -> Result<f32, EntityError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EntityError::NonFinite { field, value })
    }
}

fn size(field: &'static str, value: f32) -> Result<f32, EntityError> {
    let value = finite(field, value)?;
    if value < 0.0 {
        Err(EntityError::NegativeSize { field, value })
    } else {
        Ok(value)
    }
}

impl Body {
    pub fn new(
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        speed_x: f32,
        speed_y: f32,
    ) -> Result<Self, EntityError> {
        Ok(Body {
            x: finite("x", x)?,
            y: finite("y", y)?,
            width: size("width", width)?,
            height: size("height", height)?,
            speed_x: finite("speed_x", speed_x)?,
            speed_y: finite("speed_y", speed_y)?,
        })
    }

    /// Move by one tick of velocity.
    pub fn advance(&mut self) {
        self.x += self.speed_x;
        self.y += self.speed_y;
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// Per-kind update shared by the entities that simply fly along their velocity.
pub trait Kinematic {
    fn body_mut(&mut self) -> &mut Body;

    /// One tick of motion.
    fn update(&mut self) {
        self.body_mut().advance();
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

/// How the ship is steered.  Switches to `Pointer` the first time pointer
/// coordinates arrive and never switches back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlMode {
    Keyboard,
    Pointer,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub body: Body,
    pub speed: f32,
    /// Ticks left before the next shot is allowed.
    pub shoot_cooldown: u32,
    pub control: ControlMode,
}

impl Player {
    /// A fresh ship, horizontally centred near the bottom of `field`.
    pub fn spawn(field: &Playfield) -> Self {
        Player {
            body: Body {
                x: field.width / 2.0 - PLAYER_WIDTH / 2.0,
                y: field.height - PLAYER_START_OFFSET,
                width: PLAYER_WIDTH,
                height: PLAYER_HEIGHT,
                speed_x: 0.0,
                speed_y: 0.0,
            },
            speed: PLAYER_SPEED,
            shoot_cooldown: 0,
            control: ControlMode::Keyboard,
        }
    }

    /// Fire one bullet from the nose if the cooldown has run out.
    pub fn shoot(&mut self) -> Option<Bullet> {
        if self.shoot_cooldown > 0 {
            return None;
        }
        self.shoot_cooldown = SHOOT_COOLDOWN;
        Bullet::new(self.body.center_x(), self.body.y, BULLET_SPEED).ok()
    }

    /// Steer from the input snapshot, fire if asked, then tick the cooldown.
    /// Returns the bullet fired this tick, if any.
    pub fn update(&mut self, input: &InputState, field: &Playfield) -> Option<Bullet> {
        if input.pointer.is_some() {
            self.control = ControlMode::Pointer;
        }

        let mut wants_fire = input.is_down(Key::Fire);
        match (self.control, input.pointer) {
            (ControlMode::Pointer, Some((px, py))) => {
                self.pursue(px, py, field);
                wants_fire |= input.pointer_down;
            }
            (ControlMode::Pointer, None) => {}
            (ControlMode::Keyboard, _) => self.steer_keys(input, field),
        }

        let bullet = if wants_fire { self.shoot() } else { None };
        self.shoot_cooldown = self.shoot_cooldown.saturating_sub(1);
        bullet
    }

    /// Constant-speed pursuit of the pointer, ship centred on it.
    fn pursue(&mut self, px: f32, py: f32, field: &Playfield) {
        let b = &mut self.body;
        let dx = px - b.width / 2.0 - b.x;
        let dy = py - b.height / 2.0 - b.y;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance > POINTER_DEAD_ZONE {
            b.x += dx / distance * self.speed;
            b.y += dy / distance * self.speed;
        }
        b.x = b.x.clamp(0.0, field.width - b.width);
        b.y = b.y.clamp(0.0, field.height - b.height);
    }

    /// Independent axis checks; diagonals are not normalised.
    fn steer_keys(&mut self, input: &InputState, field: &Playfield) {
        let b = &mut self.body;
        if input.is_down(Key::Left) && b.x > 0.0 {
            b.x -= self.speed;
        }
        if input.is_down(Key::Right) && b.x < field.width - b.width {
            b.x += self.speed;
        }
        if input.is_down(Key::Up) && b.y > 0.0 {
            b.y -= self.speed;
        }
        if input.is_down(Key::Down) && b.y < field.height - b.height {
            b.y += self.speed;
        }
    }
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

/// Falls straight down at a constant speed.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub body: Body,
}

impl Enemy {
    pub fn new(x: f32, y: f32, speed: f32) -> Result<Self, EntityError> {
        Ok(Enemy {
            body: Body::new(x, y, ENEMY_WIDTH, ENEMY_HEIGHT, 0.0, speed)?,
        })
    }
}

impl Kinematic for Enemy {
    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

// ── Bullet ────────────────────────────────────────────────────────────────────

/// Player shot.  Vertical velocity only.
#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub body: Body,
}

impl Bullet {
    /// `center_x` is the horizontal centre of the shot; the box is built around it.
    pub fn new(center_x: f32, y: f32, speed_y: f32) -> Result<Self, EntityError> {
        Ok(Bullet {
            body: Body::new(
                center_x - BULLET_WIDTH / 2.0,
                y,
                BULLET_WIDTH,
                BULLET_HEIGHT,
                0.0,
                speed_y,
            )?,
        })
    }
}

impl Kinematic for Bullet {
    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

// ── Particle ──────────────────────────────────────────────────────────────────

/// A fading spark.  Zero-size for collision purposes.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub body: Body,
    pub life: u32,
    pub max_life: u32,
    pub color: Rgb,
}

impl Particle {
    pub fn new(x: f32, y: f32, speed_x: f32, speed_y: f32, color: Rgb) -> Result<Self, EntityError> {
        Ok(Particle {
            body: Body::new(x, y, 0.0, 0.0, speed_x, speed_y)?,
            life: PARTICLE_LIFE,
            max_life: PARTICLE_LIFE,
            color,
        })
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// Opacity in [0, 1] for drawing.
    pub fn alpha(&self) -> f32 {
        self.life as f32 / self.max_life as f32
    }
}

impl Kinematic for Particle {
    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self) {
        self.body.advance();
        self.life = self.life.saturating_sub(1);
        self.body.speed_x *= PARTICLE_DAMPING;
        self.body.speed_y *= PARTICLE_DAMPING;
    }
}

// ── Star ──────────────────────────────────────────────────────────────────────

/// Background decoration, no gameplay effect.
#[derive(Clone, Debug, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    /// Radius in pixels.
    pub size: f32,
}

impl Star {
    /// Drift down; past the bottom edge, reappear at the top in a new column.
    pub fn fall(&mut self, field: &Playfield, rng: &mut impl Rng) {
        self.y += self.speed;
        if self.y > field.height {
            self.y = 0.0;
            self.x = rng.gen::<f32>() * field.width;
        }
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Menu,
    Playing,
    Paused,
    GameOver,
}

/// Something that happened during the last state transition.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    StatusChanged { from: GameStatus, to: GameStatus },
    EnemyDestroyed { x: f32, y: f32 },
    PlayerHit { lives: u32 },
    EnemyEscaped { lives: u32 },
    LevelUp { level: u32, spawn_rate: f32 },
    GameOver { score: u32 },
}

/// The entire game state.  Cloneable so the update functions in
/// [`crate::compute`] can return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub particles: Vec<Particle>,
    pub stars: Vec<Star>,
    pub score: u32,
    pub lives: u32,
    pub level: u32,
    /// Per-tick probability of spawning an enemy.
    pub spawn_rate: f32,
    /// Score milestones already turned into levels.
    pub milestones_reached: u32,
    pub status: GameStatus,
    /// Ticks processed while playing.
    pub frame: u64,
    pub field: Playfield,
    /// Events produced by the most recent transition.
    pub events: Vec<GameEvent>,
    pub config: GameConfig,
}
