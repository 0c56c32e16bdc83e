/// Renderer contract: turn a [`GameState`] into an ordered list of drawing
/// primitives.  No terminal or window code lives here, so any surface that can
/// clear, fill circles and fill rectangles can display the game.

use crate::entities::{Bullet, Enemy, GameState, Particle, Player, Star};

/// 24-bit colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

// ── Colour palette ────────────────────────────────────────────────────────────

pub mod palette {
    use super::Rgb;

    pub const BACKGROUND: Rgb = Rgb(0x00, 0x08, 0x14);
    pub const STAR: Rgb = Rgb(0xFF, 0xFF, 0xFF);
    pub const GREEN: Rgb = Rgb(0x00, 0xFF, 0x41);
    pub const YELLOW: Rgb = Rgb(0xFF, 0xD6, 0x0A);
    pub const ORANGE: Rgb = Rgb(0xFF, 0x6B, 0x35);
    pub const RED: Rgb = Rgb(0xFF, 0x00, 0x00);
    /// Tint of every explosion burst.
    pub const EXPLOSION_ENEMY: Rgb = ORANGE;
}

/// Size of a particle square on screen.
pub const PARTICLE_DRAW_SIZE: f32 = 3.0;

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole surface.
    Clear { width: f32, height: f32, color: Rgb },
    /// Filled circle centred on `(x, y)`.
    Circle { x: f32, y: f32, radius: f32, color: Rgb },
    /// Filled rectangle, top-left origin.  `glow` asks for a halo; `alpha` is
    /// the opacity in [0, 1].
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
        glow: bool,
        alpha: f32,
    },
}

fn rect(x: f32, y: f32, width: f32, height: f32, color: Rgb) -> DrawCommand {
    DrawCommand::Rect { x, y, width, height, color, glow: false, alpha: 1.0 }
}

fn glowing(x: f32, y: f32, width: f32, height: f32, color: Rgb) -> DrawCommand {
    DrawCommand::Rect { x, y, width, height, color, glow: true, alpha: 1.0 }
}

/// Per-kind drawing.
pub trait Sprite {
    fn draw(&self, out: &mut Vec<DrawCommand>);
}

impl Sprite for Star {
    fn draw(&self, out: &mut Vec<DrawCommand>) {
        out.push(DrawCommand::Circle {
            x: self.x,
            y: self.y,
            radius: self.size,
            color: palette::STAR,
        });
    }
}

impl Sprite for Player {
    fn draw(&self, out: &mut Vec<DrawCommand>) {
        let b = &self.body;
        let cx = b.center_x();
        // Fuselage
        out.push(rect(cx - 2.0, b.y, 4.0, b.height, palette::GREEN));
        // Wings
        out.push(rect(b.x, b.y + b.height / 2.0, b.width, 8.0, palette::YELLOW));
        // Cockpit
        out.push(rect(cx - 6.0, b.y + 5.0, 12.0, 15.0, palette::ORANGE));
        // Engines
        out.push(glowing(b.x + 5.0, b.y + b.height, 8.0, 6.0, palette::GREEN));
        out.push(glowing(b.x + b.width - 13.0, b.y + b.height, 8.0, 6.0, palette::GREEN));
    }
}

impl Sprite for Bullet {
    fn draw(&self, out: &mut Vec<DrawCommand>) {
        let b = &self.body;
        out.push(glowing(b.x, b.y, b.width, b.height, palette::GREEN));
    }
}

impl Sprite for Enemy {
    fn draw(&self, out: &mut Vec<DrawCommand>) {
        let b = &self.body;
        out.push(rect(b.x, b.y, b.width, b.height, palette::ORANGE));
        out.push(rect(b.x + 5.0, b.y + 5.0, b.width - 10.0, 5.0, palette::YELLOW));
        out.push(rect(b.x + 2.0, b.y + b.height - 5.0, 4.0, 8.0, palette::RED));
        out.push(rect(b.x + b.width - 6.0, b.y + b.height - 5.0, 4.0, 8.0, palette::RED));
    }
}

impl Sprite for Particle {
    fn draw(&self, out: &mut Vec<DrawCommand>) {
        out.push(DrawCommand::Rect {
            x: self.body.x,
            y: self.body.y,
            width: PARTICLE_DRAW_SIZE,
            height: PARTICLE_DRAW_SIZE,
            color: self.color,
            glow: false,
            alpha: self.alpha(),
        });
    }
}

/// Build one frame: clear → stars → player → bullets → enemies → particles.
pub fn draw_list(state: &GameState) -> Vec<DrawCommand> {
    let mut out = Vec::with_capacity(
        1 + state.stars.len()
            + 5
            + state.bullets.len()
            + state.enemies.len() * 4
            + state.particles.len(),
    );

    out.push(DrawCommand::Clear {
        width: state.field.width,
        height: state.field.height,
        color: palette::BACKGROUND,
    });
    for star in &state.stars {
        star.draw(&mut out);
    }
    state.player.draw(&mut out);
    for bullet in &state.bullets {
        bullet.draw(&mut out);
    }
    for enemy in &state.enemies {
        enemy.draw(&mut out);
    }
    for particle in &state.particles {
        particle.draw(&mut out);
    }
    out
}
