//! Retro Invaders - a 100-level space-invaders arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, level scaling, collisions, update tick)
//! - `render`: Terminal rendering (crossterm)
//! - `settings`: Runtime configuration

pub mod render;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Arena dimensions (simulation pixels; the renderer projects to cells)
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;
    /// Side margin the player and the formation may not cross
    pub const SIDE_MARGIN: f32 = 8.0;
    /// Bullets are culled this far beyond the arena edge
    pub const OFFSCREEN_MARGIN: f32 = 20.0;
    /// Upper bound on the per-frame delta fed to the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.05;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 60.0;
    pub const PLAYER_HEIGHT: f32 = 18.0;
    pub const PLAYER_SPEED: f32 = 320.0;
    /// Player spawns this far above the arena bottom
    pub const PLAYER_BOTTOM_OFFSET: f32 = 60.0;
    /// Player bullets spawn this far above the ship's top edge
    pub const PLAYER_MUZZLE_OFFSET: f32 = 12.0;
    pub const PLAYER_BULLET_SPEED: f32 = 520.0;
    pub const SHOOT_COOLDOWN_MS: f64 = 300.0;
    pub const STARTING_LIVES: u8 = 3;

    /// Invader formation
    pub const INVADER_WIDTH: f32 = 36.0;
    pub const INVADER_HEIGHT: f32 = 20.0;
    pub const INVADER_ROWS: u32 = 4;
    pub const INVADER_COLS: u32 = 8;
    pub const INVADER_SPACING_X: f32 = 70.0;
    pub const INVADER_SPACING_Y: f32 = 50.0;
    pub const FORMATION_TOP_MARGIN: f32 = 60.0;
    /// Vertical distance the formation descends when it reaches a side margin
    pub const FORMATION_DROP: f32 = 20.0;
    /// Invader bullets spawn this far below the shooter's bottom edge
    pub const INVADER_MUZZLE_OFFSET: f32 = 8.0;
    /// No invader fires while this many invader bullets are in flight
    pub const MAX_INVADER_BULLETS: usize = 5;

    pub const BULLET_RADIUS: f32 = 4.0;

    /// Level scaling
    pub const MAX_LEVEL: u32 = 100;
    pub const BASE_STEP_INTERVAL_MS: f64 = 600.0;
    pub const STEP_INTERVAL_FLOOR_MS: f64 = 120.0;
    pub const STEP_INTERVAL_DECAY: f64 = 0.96;
    pub const BASE_INVADER_BULLET_SPEED: f32 = 180.0;
    pub const BULLET_SPEED_GROWTH: f32 = 0.03;
    /// Extra per-level multiplier applied when an invader actually fires
    pub const LEVEL_BULLET_FACTOR: f32 = 0.003;
    pub const BASE_MOVE_STEP: f32 = 18.0;
    pub const MOVE_STEP_GROWTH: f32 = 0.02;
    pub const BASE_SHOOT_PROBABILITY: f64 = 0.35;
    pub const SHOOT_PROBABILITY_GROWTH: f64 = 0.01;
    pub const SHOOT_PROBABILITY_CAP: f64 = 0.9;
    /// +1 invader HP every this many levels
    pub const HP_GROWTH_DIVISOR: u32 = 3;
    pub const BASE_KILL_SCORE: i64 = 10;
    pub const KILL_SCORE_INCREMENT: i64 = 5;
    /// Row-descent speed-up: the stored step interval ratchets down by this
    /// factor on every drop, floored separately from the per-level floor
    pub const DESCENT_SPEEDUP: f64 = 0.97;
    pub const DESCENT_FLOOR_MS: f64 = 80.0;
    /// Pause before a freshly spawned formation may take its first step
    pub const LEVEL_GRACE_MS: f64 = 250.0;

    /// Upgrades
    pub const UPGRADE_PRICE: i64 = 100;
    pub const SHIELD_DURATION_MS: f64 = 15_000.0;
    pub const SLOW_DURATION_MS: f64 = 15_000.0;
    /// Step interval is multiplied by this while slow is active (slower)
    pub const SLOW_STEP_MULTIPLIER: f64 = 1.8;
    /// Shoot probability is multiplied by this while slow is active
    pub const SLOW_SHOOT_FACTOR: f64 = 0.5;
    /// Advisory notice lifetime (rejected purchases)
    pub const NOTICE_TTL_MS: f64 = 900.0;

    /// Impact marker lifetime
    pub const HIT_FLASH_TTL_MS: f32 = 180.0;
}
