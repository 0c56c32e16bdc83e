/// Rendering layer — all terminal I/O lives here.
///
/// The library hands us an ordered list of pixel-space drawing commands;
/// this module scales them onto the terminal grid, then adds the HUD and the
/// menu / pause / game-over overlays.  No game logic is performed.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Attribute, Color, Print},
    terminal, QueueableCommand,
};
use retro_space::entities::{GameState, GameStatus, Playfield};
use retro_space::render::{draw_list, palette, DrawCommand, Rgb};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_LEVEL: Color = Color::Green;
const C_HINT: Color = Color::DarkGrey;

fn rgb(c: Rgb) -> Color {
    Color::Rgb { r: c.0, g: c.1, b: c.2 }
}

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Maps playfield pixels onto terminal cells.  Row 0 is the HUD and the last
/// row is the controls hint; everything between is the playfield.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16) -> Self {
        Viewport { cols: cols.max(1), rows: rows.max(3) }
    }

    fn play_rows(&self) -> u16 {
        self.rows - 2
    }

    fn scale(&self, field: &Playfield) -> (f32, f32) {
        (
            self.cols as f32 / field.width,
            self.play_rows() as f32 / field.height,
        )
    }

    /// Centre of a terminal cell in playfield pixels (for mouse input).
    pub fn to_playfield(&self, column: u16, row: u16, field: &Playfield) -> (f32, f32) {
        let (sx, sy) = self.scale(field);
        let play_row = row.saturating_sub(1).min(self.play_rows() - 1);
        (
            (column as f32 + 0.5) / sx,
            (play_row as f32 + 0.5) / sy,
        )
    }
}

// ── Cell raster ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    fg: Color,
    bold: bool,
}

struct Raster {
    cols: usize,
    rows: usize,
    bg: Color,
    cells: Vec<Cell>,
}

impl Raster {
    fn new(view: &Viewport) -> Self {
        let cols = view.cols as usize;
        let rows = view.play_rows() as usize;
        let blank = Cell { ch: ' ', fg: Color::White, bold: false };
        Raster { cols, rows, bg: Color::Black, cells: vec![blank; cols * rows] }
    }

    /// Cell span covering `[start, start + len)` scaled by `s`; at least one
    /// cell so thin shapes stay visible.
    fn span(start: f32, len: f32, s: f32) -> (i64, i64) {
        let a = (start * s).floor() as i64;
        let b = ((start + len) * s).ceil() as i64;
        (a, b.max(a + 1))
    }

    fn fill(&mut self, cols: (i64, i64), rows: (i64, i64), cell: Cell) {
        let c0 = cols.0.max(0) as usize;
        let c1 = cols.1.min(self.cols as i64).max(0) as usize;
        let r0 = rows.0.max(0) as usize;
        let r1 = rows.1.min(self.rows as i64).max(0) as usize;
        for r in r0..r1 {
            for c in c0..c1 {
                self.cells[r * self.cols + c] = cell;
            }
        }
    }

    fn draw(&mut self, cmd: &DrawCommand, sx: f32, sy: f32) {
        match *cmd {
            DrawCommand::Clear { color, .. } => {
                self.bg = rgb(color);
                let blank = Cell { ch: ' ', fg: Color::White, bold: false };
                self.cells.iter_mut().for_each(|c| *c = blank);
            }
            DrawCommand::Circle { x, y, radius, color } => {
                let ch = match radius {
                    r if r < 1.5 => '.',
                    r if r < 2.5 => '+',
                    _ => '*',
                };
                let col = (x * sx).floor() as i64;
                let row = (y * sy).floor() as i64;
                self.fill((col, col + 1), (row, row + 1), Cell { ch, fg: rgb(color), bold: false });
            }
            DrawCommand::Rect { x, y, width, height, color, glow, alpha } => {
                let ch = match alpha {
                    a if a >= 0.99 => '█',
                    a if a > 0.66 => '▓',
                    a if a > 0.33 => '▒',
                    _ => '░',
                };
                let cell = Cell { ch, fg: rgb(color), bold: glow };
                self.fill(Self::span(x, width, sx), Self::span(y, height, sy), cell);
            }
        }
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_playfield(out, state, view)?;
    draw_hud(out, state, view)?;
    draw_controls_hint(out, view)?;

    match state.status {
        GameStatus::Menu => draw_menu(out, view)?,
        GameStatus::Paused => draw_paused(out, view)?,
        GameStatus::GameOver => draw_game_over(out, state, view)?,
        GameStatus::Playing => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Playfield ─────────────────────────────────────────────────────────────────

fn draw_playfield<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    let (sx, sy) = view.scale(&state.field);
    let mut raster = Raster::new(view);
    for cmd in draw_list(state) {
        raster.draw(&cmd, sx, sy);
    }

    out.queue(style::SetBackgroundColor(raster.bg))?;
    for r in 0..raster.rows {
        out.queue(cursor::MoveTo(0, r as u16 + 1))?;
        let mut current: Option<(Color, bool)> = None;
        for c in 0..raster.cols {
            let cell = raster.cells[r * raster.cols + c];
            if current != Some((cell.fg, cell.bold)) {
                out.queue(style::SetAttribute(if cell.bold {
                    Attribute::Bold
                } else {
                    Attribute::NormalIntensity
                }))?;
                out.queue(style::SetForegroundColor(cell.fg))?;
                current = Some((cell.fg, cell.bold));
            }
            out.queue(Print(cell.ch))?;
        }
    }
    out.queue(style::SetAttribute(Attribute::Reset))?;
    out.queue(style::ResetColor)?;
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    // Score — left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {:>8}", state.score)))?;

    // Level — centre
    let level_str = format!("[ LEVEL {} ]", state.level);
    let lx = (view.cols / 2).saturating_sub(level_str.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(&level_str))?;

    // Lives — right
    let lives_text = format!("Lives: {}", state.lives);
    let rx = view.cols.saturating_sub(lives_text.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_text))?;

    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "←↑→↓ / WASD / Mouse : Move   SPACE / Click : Shoot   P : Pause   R : Restart   Q : Quit",
    ))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_panel<W: Write>(out: &mut W, view: &Viewport, lines: &[(&str, Color)]) -> std::io::Result<()> {
    let cx = view.cols / 2;
    let start_row = (view.rows / 2).saturating_sub(lines.len() as u16 / 2);

    out.queue(style::SetBackgroundColor(rgb(palette::BACKGROUND)))?;
    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}

fn draw_menu<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    draw_panel(
        out,
        view,
        &[
            ("★  RETRO  SPACE  ★", Color::Cyan),
            ("", Color::White),
            ("ENTER - Start   Q - Quit", Color::White),
        ],
    )
}

fn draw_paused<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    draw_panel(
        out,
        view,
        &[
            ("╔══════════════════╗", Color::Yellow),
            ("║      PAUSED      ║", Color::Yellow),
            ("╚══════════════════╝", Color::Yellow),
            ("P - Resume  R - Restart", Color::White),
        ],
    )
}

fn draw_game_over<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    let score_line = format!("Final Score: {}", state.score);
    draw_panel(
        out,
        view,
        &[
            ("╔══════════════════╗", Color::Red),
            ("║    GAME  OVER    ║", Color::Red),
            ("╚══════════════════╝", Color::Red),
            (&score_line, Color::Yellow),
            ("R - Play Again  Q - Quit", Color::White),
        ],
    )
}
