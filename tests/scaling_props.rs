//! Property tests for the level-scaling function.

use proptest::prelude::*;

use retro_invaders::consts::*;
use retro_invaders::sim::params_for_level;

proptest! {
    #[test]
    fn hp_and_kill_score_formulas(level in 1u32..=MAX_LEVEL) {
        let p = params_for_level(level);
        prop_assert_eq!(p.invader_hp, 1 + (level - 1) / 3);
        prop_assert_eq!(p.kill_score, 10 + i64::from(level - 1) * 5);
    }

    #[test]
    fn step_interval_formula_and_floor(level in 1u32..=MAX_LEVEL) {
        let p = params_for_level(level);
        let expected = (600.0 * 0.96_f64.powf((level - 1) as f64)).max(120.0);
        prop_assert_eq!(p.step_interval_ms, expected);
        prop_assert!(p.step_interval_ms >= STEP_INTERVAL_FLOOR_MS);
    }

    #[test]
    fn step_interval_monotone_non_increasing(level in 1u32..MAX_LEVEL) {
        prop_assert!(
            params_for_level(level + 1).step_interval_ms
                <= params_for_level(level).step_interval_ms
        );
    }

    #[test]
    fn shoot_probability_grows_and_caps(level in 1u32..MAX_LEVEL) {
        let here = params_for_level(level).shoot_probability;
        let next = params_for_level(level + 1).shoot_probability;
        prop_assert!(next >= here);
        prop_assert!(next <= SHOOT_PROBABILITY_CAP);
    }

    #[test]
    fn bullet_speed_and_move_step_grow(level in 1u32..MAX_LEVEL) {
        let here = params_for_level(level);
        let next = params_for_level(level + 1);
        prop_assert!(next.bullet_speed > here.bullet_speed);
        prop_assert!(next.move_step > here.move_step);
    }

    #[test]
    fn idempotent(level in 1u32..=MAX_LEVEL) {
        // Byte-identical output on repeated calls with the same input
        prop_assert_eq!(params_for_level(level), params_for_level(level));
    }
}
