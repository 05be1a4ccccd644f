//! Terminal render surface
//!
//! Translates a read-only game-state snapshot into terminal commands. The
//! 800x600 arena is projected onto the terminal cell grid each frame; no
//! game logic lives here and the simulation is never mutated.

use std::io::Write;

use crossterm::{
    QueueableCommand, cursor,
    style::{self, Color, Print},
    terminal,
};
use glam::Vec2;

use crate::consts::*;
use crate::sim::{BulletOwner, GameState, GameStatus, UpgradeTimer};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_INFO: Color = Color::Grey;
const C_PLAYER: Color = Color::Cyan;
const C_SHIELD: Color = Color::Cyan;
const C_INVADER_FULL: Color = Color::Yellow;
const C_INVADER_WORN: Color = Color::DarkYellow;
const C_INVADER_LOW: Color = Color::Red;
const C_BULLET_PLAYER: Color = Color::White;
const C_BULLET_INVADER: Color = Color::Magenta;
const C_FLASH: Color = Color::Yellow;
const C_NOTICE: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;

/// Presentation switches resolved by the driver from [`crate::Settings`]
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub color: bool,
    pub fps: Option<u32>,
}

/// Arena-to-cell projection for the current terminal size.
///
/// Row 0 is the HUD, row 1 and `rows-2` are the border, the last row holds
/// the upgrade bar; everything else is play area.
struct Viewport {
    cols: u16,
    rows: u16,
}

impl Viewport {
    fn play_top(&self) -> u16 {
        2
    }

    fn play_bottom(&self) -> u16 {
        self.rows.saturating_sub(3).max(self.play_top())
    }

    fn cell(&self, pos: Vec2) -> (u16, u16) {
        let inner_w = self.cols.saturating_sub(2).max(1) as f32;
        let inner_h = (self.play_bottom() - self.play_top()).max(1) as f32;
        let x = 1.0 + (pos.x / ARENA_WIDTH) * inner_w;
        let y = self.play_top() as f32 + (pos.y / ARENA_HEIGHT) * inner_h;
        (
            (x as u16).clamp(1, self.cols.saturating_sub(2).max(1)),
            (y as u16).clamp(self.play_top(), self.play_bottom()),
        )
    }
}

fn fg<W: Write>(out: &mut W, color: Color, opts: &RenderOptions) -> std::io::Result<()> {
    if opts.color {
        out.queue(style::SetForegroundColor(color))?;
    }
    Ok(())
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame from the state snapshot.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    opts: &RenderOptions,
) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let vp = Viewport { cols, rows };

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, &vp, opts)?;
    draw_hud(out, &vp, state, opts)?;

    for inv in state.invaders.iter().filter(|i| i.alive) {
        draw_invader(out, &vp, inv, opts)?;
    }
    for bullet in &state.bullets {
        draw_bullet(out, &vp, bullet, opts)?;
    }
    for flash in &state.hit_flashes {
        let (x, y) = vp.cell(flash.pos);
        out.queue(cursor::MoveTo(x, y))?;
        fg(out, C_FLASH, opts)?;
        out.queue(Print("*"))?;
    }

    draw_player(out, &vp, state, opts)?;
    draw_upgrade_bar(out, &vp, state, opts)?;

    if let Some(notice) = &state.notice {
        let col = (vp.cols / 2).saturating_sub(notice.text.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, vp.play_bottom()))?;
        fg(out, C_NOTICE, opts)?;
        out.queue(Print(&notice.text))?;
    }

    match state.status {
        GameStatus::Playing => {}
        GameStatus::Won => draw_overlay(out, &vp, state, "YOU  WIN!", opts)?,
        GameStatus::Over => draw_overlay(out, &vp, state, "GAME  OVER", opts)?,
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, vp.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, vp: &Viewport, opts: &RenderOptions) -> std::io::Result<()> {
    let w = vp.cols as usize;

    fg(out, C_BORDER, opts)?;
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;
    out.queue(cursor::MoveTo(0, vp.rows.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in vp.play_top()..=vp.play_bottom() {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(vp.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    vp: &Viewport,
    state: &GameState,
    opts: &RenderOptions,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    fg(out, C_HUD_SCORE, opts)?;
    out.queue(Print(format!("Score: {:>7}", state.display_score())))?;

    out.queue(Print("  "))?;
    fg(out, C_HUD_LIVES, opts)?;
    out.queue(Print(format!("Lives: {}", "♥".repeat(state.lives as usize))))?;

    fg(out, C_HUD_INFO, opts)?;
    out.queue(Print(format!(
        "  Level: {}/{}  Enemy HP: {}  Kill: {}",
        state.level, MAX_LEVEL, state.params.invader_hp, state.params.kill_score
    )))?;

    if let Some(fps) = opts.fps {
        let text = format!("{fps:>3} fps");
        let col = vp.cols.saturating_sub(text.chars().count() as u16 + 1);
        out.queue(cursor::MoveTo(col, 0))?;
        fg(out, C_HINT, opts)?;
        out.queue(Print(text))?;
    }
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_invader<W: Write>(
    out: &mut W,
    vp: &Viewport,
    inv: &crate::sim::Invader,
    opts: &RenderOptions,
) -> std::io::Result<()> {
    let (x, y) = vp.cell(inv.pos + inv.size / 2.0);
    let color = match inv.hp_ratio() {
        r if r > 0.66 => C_INVADER_FULL,
        r if r > 0.33 => C_INVADER_WORN,
        _ => C_INVADER_LOW,
    };
    fg(out, color, opts)?;
    out.queue(cursor::MoveTo(x.saturating_sub(1).max(1), y))?;
    out.queue(Print("/o\\"))?;
    Ok(())
}

fn draw_bullet<W: Write>(
    out: &mut W,
    vp: &Viewport,
    bullet: &crate::sim::Bullet,
    opts: &RenderOptions,
) -> std::io::Result<()> {
    let (x, y) = vp.cell(bullet.pos);
    out.queue(cursor::MoveTo(x, y))?;
    match bullet.owner {
        BulletOwner::Player => {
            fg(out, C_BULLET_PLAYER, opts)?;
            out.queue(Print("║"))?;
        }
        BulletOwner::Invader => {
            fg(out, C_BULLET_INVADER, opts)?;
            out.queue(Print("↓"))?;
        }
    }
    Ok(())
}

fn draw_player<W: Write>(
    out: &mut W,
    vp: &Viewport,
    state: &GameState,
    opts: &RenderOptions,
) -> std::io::Result<()> {
    let p = &state.player;
    let (x, y) = vp.cell(p.pos + p.size / 2.0);

    fg(out, C_PLAYER, opts)?;
    out.queue(cursor::MoveTo(x, y))?;
    out.queue(Print("▲"))?;
    if y + 1 <= vp.play_bottom() {
        out.queue(cursor::MoveTo(x.saturating_sub(1).max(1), y + 1))?;
        out.queue(Print("/█\\"))?;
    }

    if state.shield.is_active(state.clock_ms) {
        fg(out, C_SHIELD, opts)?;
        out.queue(cursor::MoveTo(x.saturating_sub(3).max(1), y))?;
        out.queue(Print("("))?;
        out.queue(cursor::MoveTo(
            (x + 3).min(vp.cols.saturating_sub(2)),
            y,
        ))?;
        out.queue(Print(")"))?;
    }
    Ok(())
}

// ── Upgrade bar (last row) ────────────────────────────────────────────────────

fn upgrade_status(name: &str, timer: &UpgradeTimer, now_ms: f64) -> String {
    if timer.is_active(now_ms) {
        format!(
            "{name} ACTIVE {}s",
            (timer.remaining_ms(now_ms) / 1000.0).ceil() as u64
        )
    } else {
        format!("{name} ({UPGRADE_PRICE})")
    }
}

fn draw_upgrade_bar<W: Write>(
    out: &mut W,
    vp: &Viewport,
    state: &GameState,
    opts: &RenderOptions,
) -> std::io::Result<()> {
    let now = state.clock_ms;
    let bar = format!(
        "[1] {}  [2] {}",
        upgrade_status("Shield", &state.shield, now),
        upgrade_status("Slow", &state.slow, now),
    );
    out.queue(cursor::MoveTo(1, vp.rows.saturating_sub(1)))?;
    fg(out, C_HUD_INFO, opts)?;
    out.queue(Print(&bar))?;

    let hint = "A/D move  SPACE shoot  R restart  Q quit";
    let col = vp.cols.saturating_sub(hint.chars().count() as u16 + 1);
    if col > bar.chars().count() as u16 + 2 {
        out.queue(cursor::MoveTo(col, vp.rows.saturating_sub(1)))?;
        fg(out, C_HINT, opts)?;
        out.queue(Print(hint))?;
    }
    Ok(())
}

// ── Terminal-state overlay ────────────────────────────────────────────────────

fn draw_overlay<W: Write>(
    out: &mut W,
    vp: &Viewport,
    state: &GameState,
    title: &str,
    opts: &RenderOptions,
) -> std::io::Result<()> {
    let title_line = format!("║ {title:^16} ║");
    let score_line = format!("Final Score: {}   Level: {}", state.display_score(), state.level);
    let lines: &[(&str, Color)] = &[
        ("╔══════════════════╗", C_BORDER),
        (&title_line, C_HUD_SCORE),
        ("╚══════════════════╝", C_BORDER),
        (&score_line, C_HUD_SCORE),
        ("R - Play Again  Q - Quit", C_NOTICE),
    ];

    let cx = vp.cols / 2;
    let start_row = (vp.rows / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        fg(out, *color, opts)?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}
