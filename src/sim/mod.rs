//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - All timers read the internal simulation clock, never the wall clock
//! - No rendering or platform dependencies

pub mod collision;
pub mod scaling;
pub mod state;
pub mod tick;

pub use collision::{circle_rect_overlap, rects_overlap};
pub use scaling::{LevelParams, params_for_level};
pub use state::{
    Bullet, BulletOwner, GameState, GameStatus, HitFlash, Invader, Notice, Player, UpgradeKind,
    UpgradeTimer,
};
pub use tick::{TickInput, tick};
