mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use retro_space::compute::{init_state, player_shoot, restart_game, start_game, tick, toggle_pause};
use retro_space::entities::{GameEvent, GameState, GameStatus};
use retro_space::input::{InputState, Key};
use retro_space::GameConfig;

use display::Viewport;

/// A key is considered "held" if its last press/repeat event arrived within
/// this window.  Covers terminals that don't emit key-release events: the OS
/// key-repeat rate is ≥ 15 Hz, so ≈133 ms is always refreshed before expiry.
const HOLD_WINDOW: Duration = Duration::from_millis(133);

/// Returns true if `key` was seen within the last `hold_frames` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64, hold_frames: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= hold_frames)
        .unwrap_or(false)
}

/// Game keys currently held, from the terminal keys that map to them.
fn held_keys(key_frame: &HashMap<KeyCode, u64>, frame: u64, hold_frames: u64) -> Vec<Key> {
    let bindings: &[(Key, &[KeyCode])] = &[
        (Key::Left, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')]),
        (Key::Right, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')]),
        (Key::Up, &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')]),
        (Key::Down, &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')]),
        (Key::Fire, &[KeyCode::Char(' ')]),
    ];
    bindings
        .iter()
        .filter(|(_, codes)| codes.iter().any(|c| is_held(key_frame, c, frame, hold_frames)))
        .map(|(key, _)| *key)
        .collect()
}

fn log_events(state: &GameState) {
    for event in &state.events {
        match event {
            GameEvent::StatusChanged { from, to } => log::info!("status {:?} -> {:?}", from, to),
            GameEvent::LevelUp { level, spawn_rate } => {
                log::info!("level {} (spawn rate {:.3})", level, spawn_rate)
            }
            GameEvent::GameOver { score } => log::info!("game over, final score {}", score),
            other => log::debug!("{:?}", other),
        }
    }
}

/// Pass the next state through, logging what the transition did.
fn logged(next: GameState) -> GameState {
    log_events(&next);
    next
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Input model: a `key_frame` map records the frame number of the last
/// press/repeat event for every key.  Each frame the keys still "fresh" are
/// copied into the `InputState` the tick reads, so Space + arrows can be held
/// together.  Mouse events update the pointer position and button directly.
fn game_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut state = init_state(config, &mut rng)?;

    let frame_time = Duration::from_millis(config.frame_ms);
    let hold_frames = (HOLD_WINDOW.as_millis() / frame_time.as_millis()).max(1) as u64;

    let (cols, rows) = terminal::size()?;
    let mut view = Viewport::new(cols, rows);

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut input = InputState::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        key_frame.insert(code, frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(())
                            }
                            KeyCode::Enter => state = logged(start_game(&state)),
                            KeyCode::Char('p') | KeyCode::Char('P') => {
                                state = logged(toggle_pause(&state))
                            }
                            KeyCode::Char('r') | KeyCode::Char('R') => {
                                state = logged(restart_game(&state))
                            }
                            _ => {}
                        }
                    }
                    KeyEventKind::Repeat => {
                        key_frame.insert(code, frame);
                    }
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Event::Mouse(MouseEvent { kind, column, row, .. }) => {
                    let (x, y) = view.to_playfield(column, row, &state.field);
                    match kind {
                        MouseEventKind::Moved | MouseEventKind::Drag(MouseButton::Left) => {
                            input.pointer_moved(x, y)
                        }
                        MouseEventKind::Down(MouseButton::Left) => {
                            input.pointer_pressed(x, y);
                            state = logged(player_shoot(&state));
                        }
                        MouseEventKind::Up(MouseButton::Left) => input.pointer_released(),
                        _ => {}
                    }
                }
                Event::Resize(cols, rows) => view = Viewport::new(cols, rows),
                _ => {}
            }
        }

        input.set_held(held_keys(&key_frame, frame, hold_frames));

        if state.status == GameStatus::Playing {
            state = logged(tick(&state, &input, &mut rng));
        }

        display::render(out, &state, &view)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn load_config() -> Result<GameConfig, retro_space::ConfigError> {
    match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => GameConfig::load(&path),
        None => Ok(GameConfig::default()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = load_config()?;

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = game_loop(&mut out, &rx, &config);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(err) = &result {
        log::error!("{}", err);
    }
    result
}
