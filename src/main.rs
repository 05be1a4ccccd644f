//! Retro Invaders entry point
//!
//! The frame driver: owns the terminal, the input thread, and the game loop.
//! Each frame it drains input events, builds a [`TickInput`], advances the
//! simulation by the clamped elapsed time, and renders.

use std::collections::HashMap;
use std::io::{BufWriter, Write, stdout};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    ExecutableCommand, cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal,
};

use retro_invaders::Settings;
use retro_invaders::consts::MAX_FRAME_DT;
use retro_invaders::render::{self, RenderOptions};
use retro_invaders::sim::{GameState, TickInput, tick};

// ── Input model ───────────────────────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals that don't emit key-release events:
/// the OS key-repeat rate refreshes the entry before it expires.
const HOLD_WINDOW: u64 = 4;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

// ── Game loop ─────────────────────────────────────────────────────────────────

enum LoopOutcome {
    /// Swap in a fresh session
    Restart,
    Quit,
}

/// Run one session until restart or quit.
///
/// Movement and fire are level-triggered through the held-key map; purchase
/// and restart keys act only on press events whose key was not already fresh
/// in the map, which makes them edge-triggered even on terminals where OS
/// key-repeat arrives as repeated Press events.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
    settings: &Settings,
) -> std::io::Result<LoopOutcome> {
    let frame_budget = Duration::from_secs_f32(1.0 / settings.target_fps.max(1) as f32);
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut input = TickInput::default();
    let mut frame: u64 = 0;
    let mut last_frame = Instant::now();
    let mut fps_smoothed = settings.target_fps as f32;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // Drain all pending input events (non-blocking)
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    let repeat = is_held(&key_frame, &code, frame);
                    key_frame.insert(code.clone(), frame);
                    if repeat {
                        continue;
                    }
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(LoopOutcome::Quit);
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(LoopOutcome::Quit);
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') => {
                            return Ok(LoopOutcome::Restart);
                        }
                        KeyCode::Char('1') => input.buy_shield = true,
                        KeyCode::Char('2') => input.buy_slow = true,
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code.clone(), frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        input.move_left = any_held(
            &key_frame,
            &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
            frame,
        );
        input.move_right = any_held(
            &key_frame,
            &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
            frame,
        );
        input.fire = any_held(
            &key_frame,
            &[
                KeyCode::Char(' '),
                KeyCode::Up,
                KeyCode::Char('w'),
                KeyCode::Char('W'),
            ],
            frame,
        );

        let dt = last_frame.elapsed().as_secs_f32().min(MAX_FRAME_DT);
        last_frame = Instant::now();
        tick(state, &input, dt);

        // Clear one-shot inputs after processing
        input.buy_shield = false;
        input.buy_slow = false;

        if dt > 0.0 {
            fps_smoothed = fps_smoothed * 0.9 + 0.1 / dt;
        }
        let opts = RenderOptions {
            color: settings.color,
            fps: settings.show_fps.then_some(fps_smoothed.round() as u32),
        };
        render::render(out, state, &opts)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            thread::sleep(frame_budget - elapsed);
        }
    }
}

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>, settings: &Settings) -> std::io::Result<()> {
    loop {
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::info!("starting session with seed {seed}");
        let mut state = GameState::new(seed);

        match game_loop(out, &mut state, rx, settings)? {
            LoopOutcome::Restart => continue,
            LoopOutcome::Quit => break,
        }
    }
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    env_logger::init();
    let settings = Settings::load();

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

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
        loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break; // receiver dropped, program exiting
                    }
                }
                Err(_) => break,
            }
        }
    });

    let result = run(&mut out, &rx, &settings);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
