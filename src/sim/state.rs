//! Game state and core simulation types
//!
//! A session is a single `GameState` value; reset is construct-and-swap,
//! never in-place clearing.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::*;
use super::scaling::{LevelParams, params_for_level};

/// Session outcome state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Active gameplay
    Playing,
    /// Level 100 cleared
    Won,
    /// Out of lives, or the formation reached the player
    Over,
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal speed (px/s)
    pub speed: f32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            speed: PLAYER_SPEED,
        }
    }
}

/// A single invader in the formation
#[derive(Debug, Clone)]
pub struct Invader {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub row: u32,
    pub col: u32,
    pub alive: bool,
    pub hp: u32,
    pub max_hp: u32,
}

impl Invader {
    pub fn new(pos: Vec2, row: u32, col: u32, hp: u32) -> Self {
        Self {
            pos,
            size: Vec2::new(INVADER_WIDTH, INVADER_HEIGHT),
            row,
            col,
            alive: true,
            hp,
            max_hp: hp,
        }
    }

    /// Remaining HP as a fraction of max, for HP-tinted rendering
    pub fn hp_ratio(&self) -> f32 {
        self.hp as f32 / self.max_hp.max(1) as f32
    }
}

/// Who fired a bullet; matched exhaustively in collision and render logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletOwner {
    Player,
    Invader,
}

/// A bullet in flight. Bullets only move vertically; negative `vy` is upward.
#[derive(Debug, Clone)]
pub struct Bullet {
    /// Circle center
    pub pos: Vec2,
    pub radius: f32,
    pub vy: f32,
    pub owner: BulletOwner,
}

/// Boolean-with-expiry pair backing the shield and slow upgrades.
///
/// All reads go through [`UpgradeTimer::is_active`], so an upgrade is never
/// observed as active past its expiry even between the per-tick expiry passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpgradeTimer {
    active: bool,
    expires_at_ms: f64,
}

impl UpgradeTimer {
    pub fn is_active(&self, now_ms: f64) -> bool {
        self.active && now_ms < self.expires_at_ms
    }

    pub fn activate(&mut self, now_ms: f64, duration_ms: f64) {
        self.active = true;
        self.expires_at_ms = now_ms + duration_ms;
    }

    /// Clear the flag once the clock has passed the expiry (per-tick pass)
    pub fn expire_if_due(&mut self, now_ms: f64) {
        if self.active && now_ms >= self.expires_at_ms {
            self.active = false;
        }
    }

    pub fn remaining_ms(&self, now_ms: f64) -> f64 {
        if self.is_active(now_ms) {
            self.expires_at_ms - now_ms
        } else {
            0.0
        }
    }
}

/// The two purchasable upgrades
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeKind {
    Shield,
    Slow,
}

impl UpgradeKind {
    pub fn name(&self) -> &'static str {
        match self {
            UpgradeKind::Shield => "Shield",
            UpgradeKind::Slow => "Slow",
        }
    }
}

/// Transient advisory message, cleared declaratively when the clock passes
/// its expiry (same per-tick pass as the upgrade timers)
#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub expires_at_ms: f64,
}

/// Short-lived impact marker where a player bullet struck an invader
#[derive(Debug, Clone)]
pub struct HitFlash {
    pub pos: Vec2,
    pub ttl_ms: f32,
}

/// Complete game state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed, kept for logging and restart
    pub seed: u64,
    /// Seeded RNG for shoot rolls and shooter selection
    pub rng: Pcg32,
    pub status: GameStatus,
    /// Never clamped; the HUD clamps via [`GameState::display_score`]
    pub score: i64,
    pub lives: u8,
    pub level: u32,
    pub player: Player,
    pub invaders: Vec<Invader>,
    /// All bullets, both owners; insertion order is fire order
    pub bullets: Vec<Bullet>,
    /// Formation travel direction: +1.0 right, -1.0 left
    pub formation_dir: f32,
    /// Pristine scaling output for the current level
    pub params: LevelParams,
    /// Ratcheting copy of the step interval; the row-descent speed-up rule
    /// reduces it within a level, level changes reset it from `params`
    pub step_interval_ms: f64,
    /// Clock timestamp of the last formation step
    pub last_step_ms: f64,
    /// Clock timestamp of the player's last shot
    pub last_shot_ms: f64,
    pub shield: UpgradeTimer,
    pub slow: UpgradeTimer,
    pub notice: Option<Notice>,
    pub hit_flashes: Vec<HitFlash>,
    /// Simulation clock (ms), advanced by the clamped frame delta each tick
    pub clock_ms: f64,
}

impl GameState {
    /// Create a fresh session at level 1 with a full formation
    pub fn new(seed: u64) -> Self {
        let params = params_for_level(1);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            status: GameStatus::Playing,
            score: 0,
            lives: STARTING_LIVES,
            level: 1,
            player: Player::new(Vec2::new(
                ARENA_WIDTH / 2.0,
                ARENA_HEIGHT - PLAYER_BOTTOM_OFFSET,
            )),
            invaders: Vec::new(),
            bullets: Vec::new(),
            formation_dir: 1.0,
            step_interval_ms: params.step_interval_ms,
            params,
            // Far in the past: the first step and first shot are
            // immediately available
            last_step_ms: f64::NEG_INFINITY,
            last_shot_ms: f64::NEG_INFINITY,
            shield: UpgradeTimer::default(),
            slow: UpgradeTimer::default(),
            notice: None,
            hit_flashes: Vec::new(),
            clock_ms: 0.0,
        };
        state.spawn_formation();
        state
    }

    /// Replace the formation with a fresh full-HP 4x8 grid, centered
    /// horizontally, using the current level's HP
    pub fn spawn_formation(&mut self) {
        let hp = self.params.invader_hp.max(1);
        let start_x = (ARENA_WIDTH - (INVADER_COLS - 1) as f32 * INVADER_SPACING_X) / 2.0;

        self.invaders.clear();
        for row in 0..INVADER_ROWS {
            for col in 0..INVADER_COLS {
                let pos = Vec2::new(
                    start_x + col as f32 * INVADER_SPACING_X,
                    FORMATION_TOP_MARGIN + row as f32 * INVADER_SPACING_Y,
                );
                self.invaders.push(Invader::new(pos, row, col, hp));
            }
        }
    }

    /// Attempt a score-funded upgrade purchase. Debits exactly
    /// `UPGRADE_PRICE` and arms the timer on success; posts an advisory
    /// notice (no debit) on insufficient score. No effect outside `Playing`.
    pub fn try_purchase(&mut self, kind: UpgradeKind) {
        if self.status != GameStatus::Playing {
            return;
        }
        if self.score < UPGRADE_PRICE {
            self.post_notice(format!("Not enough score for {}", kind.name()), NOTICE_TTL_MS);
            return;
        }
        self.score -= UPGRADE_PRICE;
        let now = self.clock_ms;
        match kind {
            UpgradeKind::Shield => self.shield.activate(now, SHIELD_DURATION_MS),
            UpgradeKind::Slow => self.slow.activate(now, SLOW_DURATION_MS),
        }
    }

    pub fn post_notice(&mut self, text: impl Into<String>, ttl_ms: f64) {
        self.notice = Some(Notice {
            text: text.into(),
            expires_at_ms: self.clock_ms + ttl_ms,
        });
    }

    /// Score as shown on the HUD (floored at zero; the field itself is not
    /// clamped)
    pub fn display_score(&self) -> i64 {
        self.score.max(0)
    }

    pub fn alive_invaders(&self) -> usize {
        self.invaders.iter().filter(|i| i.alive).count()
    }

    pub fn invader_bullets_in_flight(&self) -> usize {
        self.bullets
            .iter()
            .filter(|b| b.owner == BulletOwner::Invader)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_shape() {
        let state = GameState::new(7);
        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(state.level, 1);
        assert_eq!(state.invaders.len(), (INVADER_ROWS * INVADER_COLS) as usize);
        assert!(state.invaders.iter().all(|i| i.alive && i.hp == 1));
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_formation_is_centered() {
        let state = GameState::new(7);
        let span = (INVADER_COLS - 1) as f32 * INVADER_SPACING_X;
        let left = state.invaders[0].pos.x;
        let last = state.invaders.last().unwrap();
        assert_eq!(last.col, INVADER_COLS - 1);
        assert!((left - (ARENA_WIDTH - span) / 2.0).abs() < 1e-3);
        assert!((last.pos.x - (ARENA_WIDTH + span) / 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_upgrade_timer_never_active_past_expiry() {
        let mut timer = UpgradeTimer::default();
        timer.activate(1_000.0, 500.0);
        assert!(timer.is_active(1_499.9));
        // No expire_if_due call yet: the read itself must already report false
        assert!(!timer.is_active(1_500.0));
        timer.expire_if_due(1_500.0);
        assert!(!timer.is_active(1_400.0));
        assert_eq!(timer.remaining_ms(1_200.0), 0.0);
    }

    #[test]
    fn test_purchase_debits_and_arms() {
        let mut state = GameState::new(7);
        state.score = 150;
        state.clock_ms = 2_000.0;
        state.try_purchase(UpgradeKind::Shield);
        assert_eq!(state.score, 50);
        assert!(state.shield.is_active(2_000.0));
        assert!(state.shield.is_active(2_000.0 + SHIELD_DURATION_MS - 1.0));
        assert!(!state.shield.is_active(2_000.0 + SHIELD_DURATION_MS));
    }

    #[test]
    fn test_purchase_rejected_posts_notice() {
        let mut state = GameState::new(7);
        state.score = 99;
        state.try_purchase(UpgradeKind::Slow);
        assert_eq!(state.score, 99);
        assert!(!state.slow.is_active(state.clock_ms));
        let notice = state.notice.as_ref().expect("notice posted");
        assert!(notice.text.contains("Slow"));
    }

    #[test]
    fn test_purchase_frozen_outside_playing() {
        let mut state = GameState::new(7);
        state.score = 500;
        state.status = GameStatus::Over;
        state.try_purchase(UpgradeKind::Shield);
        assert_eq!(state.score, 500);
        assert!(!state.shield.is_active(state.clock_ms));
        assert!(state.notice.is_none());
    }

    #[test]
    fn test_display_score_clamps_only_display() {
        let mut state = GameState::new(7);
        state.score = -25;
        assert_eq!(state.display_score(), 0);
        assert_eq!(state.score, -25);
    }
}
