//! Per-level difficulty scaling
//!
//! A pure function of the level number. The tick never recomputes these
//! mid-level; `GameState` caches the output on level change, and only the
//! row-descent speed-up rule touches its ratcheting step-interval copy.

use crate::consts::*;

/// The six difficulty parameters derived from a level number
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelParams {
    /// Time between formation steps (ms), before the descent ratchet
    pub step_interval_ms: f64,
    /// Invader bullet speed (px/s)
    pub bullet_speed: f32,
    /// Horizontal distance per formation step (px)
    pub move_step: f32,
    /// Chance an invader fires on a qualifying step
    pub shoot_probability: f64,
    /// Starting HP of every invader in the formation
    pub invader_hp: u32,
    /// Score awarded per invader killed
    pub kill_score: i64,
}

/// Compute the scaling parameters for `level` (clamped to >= 1).
///
/// Deterministic and side-effect free; calling twice with the same level
/// yields identical output in every field.
pub fn params_for_level(level: u32) -> LevelParams {
    let lvl = level.max(1);
    let n = (lvl - 1) as f64;
    let nf = (lvl - 1) as f32;

    LevelParams {
        step_interval_ms: (BASE_STEP_INTERVAL_MS * STEP_INTERVAL_DECAY.powf(n))
            .max(STEP_INTERVAL_FLOOR_MS),
        bullet_speed: BASE_INVADER_BULLET_SPEED * (1.0 + nf * BULLET_SPEED_GROWTH),
        move_step: BASE_MOVE_STEP * (1.0 + nf * MOVE_STEP_GROWTH),
        shoot_probability: (BASE_SHOOT_PROBABILITY + n * SHOOT_PROBABILITY_GROWTH)
            .min(SHOOT_PROBABILITY_CAP),
        invader_hp: 1 + (lvl - 1) / HP_GROWTH_DIVISOR,
        kill_score: BASE_KILL_SCORE + i64::from(lvl - 1) * KILL_SCORE_INCREMENT,
    }
}
