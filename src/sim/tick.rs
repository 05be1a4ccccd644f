//! Per-frame update step
//!
//! Advances the simulation by one variable-length tick: timer expiry,
//! purchases, movement, shooting, formation stepping, collision resolution,
//! and level/life transitions. Collision order is fixed: player bullets vs
//! invaders, then invader bullets vs player, then the formation-breach
//! check — a terminal transition in the bullet pass short-circuits the rest.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::Rng;

use crate::consts::*;
use super::collision::circle_rect_overlap;
use super::scaling::params_for_level;
use super::state::{Bullet, BulletOwner, GameState, GameStatus, HitFlash, UpgradeKind};

/// Input flags for a single tick.
///
/// Movement and fire are level-triggered (true while held); the buy flags are
/// one-shot, set by the driver for exactly one tick per discrete key press.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub fire: bool,
    pub buy_shield: bool,
    pub buy_slow: bool,
}

/// Advance the game state by `dt` seconds (already clamped by the driver).
/// Terminal states freeze all gameplay mutation until the driver swaps in a
/// fresh state.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.status != GameStatus::Playing {
        return;
    }

    state.clock_ms += f64::from(dt) * 1000.0;
    let now = state.clock_ms;

    // Expiry pass: upgrades and the advisory notice, cleared declaratively
    state.shield.expire_if_due(now);
    state.slow.expire_if_due(now);
    if state.notice.as_ref().is_some_and(|n| now >= n.expires_at_ms) {
        state.notice = None;
    }

    // Edge-triggered purchases
    if input.buy_shield {
        state.try_purchase(UpgradeKind::Shield);
    }
    if input.buy_slow {
        state.try_purchase(UpgradeKind::Slow);
    }

    // Player movement, clamped to the side margins
    let mut dir = 0.0_f32;
    if input.move_left {
        dir -= 1.0;
    }
    if input.move_right {
        dir += 1.0;
    }
    let player = &mut state.player;
    player.pos.x += dir * player.speed * dt;
    player.pos.x = player
        .pos
        .x
        .clamp(SIDE_MARGIN, ARENA_WIDTH - player.size.x - SIDE_MARGIN);

    if input.fire {
        player_shoot(state);
    }

    // Advance bullets; cull the ones past the relevant arena edge
    for bullet in &mut state.bullets {
        bullet.pos.y += bullet.vy * dt;
    }
    state.bullets.retain(|b| match b.owner {
        BulletOwner::Player => b.pos.y > -OFFSCREEN_MARGIN,
        BulletOwner::Invader => b.pos.y < ARENA_HEIGHT + OFFSCREEN_MARGIN,
    });

    // Formation stepping; a level transition or win ends the tick early
    if step_formation(state, now) {
        return;
    }

    resolve_player_bullets(state);
    decay_hit_flashes(state, dt);
    resolve_invader_bullets(state, now);
    if state.status != GameStatus::Playing {
        return;
    }
    check_formation_breach(state);
}

/// Rate-limited player shot: rejected under the cooldown, accepted exactly
/// at/after it. Always fires straight up at a fixed speed.
fn player_shoot(state: &mut GameState) {
    let now = state.clock_ms;
    if now - state.last_shot_ms < SHOOT_COOLDOWN_MS {
        return;
    }
    state.last_shot_ms = now;
    let p = &state.player;
    state.bullets.push(Bullet {
        pos: Vec2::new(p.pos.x + p.size.x / 2.0, p.pos.y - PLAYER_MUZZLE_OFFSET),
        radius: BULLET_RADIUS,
        vy: -PLAYER_BULLET_SPEED,
        owner: BulletOwner::Player,
    });
}

/// Formation movement state machine. Returns true when the tick is finished
/// (level advanced or session won).
fn step_formation(state: &mut GameState, now: f64) -> bool {
    let slow_active = state.slow.is_active(now);
    let effective_interval = state.step_interval_ms
        * if slow_active { SLOW_STEP_MULTIPLIER } else { 1.0 };
    if now - state.last_step_ms <= effective_interval {
        return false;
    }

    // Level clear is detected when a step comes due with nothing left alive
    if state.invaders.iter().all(|i| !i.alive) {
        if state.level >= MAX_LEVEL {
            state.status = GameStatus::Won;
            log::info!("all {MAX_LEVEL} levels cleared, score {}", state.score);
        } else {
            state.level += 1;
            state.params = params_for_level(state.level);
            state.step_interval_ms = state.params.step_interval_ms;
            state.spawn_formation();
            state.bullets.clear();
            // Grace delay before the fresh formation may step
            state.last_step_ms = now + LEVEL_GRACE_MS;
            log::info!("advancing to level {}", state.level);
        }
        return true;
    }

    let mut min_x = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    for inv in state.invaders.iter().filter(|i| i.alive) {
        min_x = min_x.min(inv.pos.x);
        max_x = max_x.max(inv.pos.x + inv.size.x);
    }

    let move_x = state.params.move_step * state.formation_dir;
    if min_x + move_x < SIDE_MARGIN || max_x + move_x > ARENA_WIDTH - SIDE_MARGIN {
        // Drop and reverse instead of crossing the margin; the stored
        // interval ratchets down for the remainder of the level
        for inv in state.invaders.iter_mut().filter(|i| i.alive) {
            inv.pos.y += FORMATION_DROP;
        }
        state.formation_dir = -state.formation_dir;
        state.step_interval_ms = (state.step_interval_ms * DESCENT_SPEEDUP).max(DESCENT_FLOOR_MS);
    } else {
        for inv in state.invaders.iter_mut().filter(|i| i.alive) {
            inv.pos.x += move_x;
        }
    }
    state.last_step_ms = now;

    let shot_chance = state.params.shoot_probability
        * if slow_active { SLOW_SHOOT_FACTOR } else { 1.0 };
    if state.rng.random::<f64>() < shot_chance {
        invader_shoot(state);
    }
    false
}

/// Fire one invader bullet: the lowest alive invader per column is eligible,
/// one is chosen uniformly at random. Skipped entirely at the in-flight cap.
fn invader_shoot(state: &mut GameState) {
    if state.invader_bullets_in_flight() >= MAX_INVADER_BULLETS {
        return;
    }

    // Lowest (largest y) alive invader per column, in ascending column order
    // so the seeded RNG picks deterministically
    let mut lowest: BTreeMap<u32, usize> = BTreeMap::new();
    for (idx, inv) in state.invaders.iter().enumerate() {
        if !inv.alive {
            continue;
        }
        let slot = lowest.entry(inv.col).or_insert(idx);
        if inv.pos.y > state.invaders[*slot].pos.y {
            *slot = idx;
        }
    }
    let shooters: Vec<usize> = lowest.into_values().collect();
    if shooters.is_empty() {
        return;
    }

    let pick = shooters[state.rng.random_range(0..shooters.len())];
    let shooter = &state.invaders[pick];
    let vy = state.params.bullet_speed
        * (1.0 + (state.level - 1) as f32 * LEVEL_BULLET_FACTOR);
    state.bullets.push(Bullet {
        pos: Vec2::new(
            shooter.pos.x + shooter.size.x / 2.0,
            shooter.pos.y + shooter.size.y + INVADER_MUZZLE_OFFSET,
        ),
        radius: BULLET_RADIUS,
        vy,
        owner: BulletOwner::Invader,
    });
}

/// Player bullets vs invaders, oldest-fired first, formation order inside.
/// Each bullet damages at most one invader and is consumed on the first hit.
fn resolve_player_bullets(state: &mut GameState) {
    let mut i = 0;
    while i < state.bullets.len() {
        if state.bullets[i].owner != BulletOwner::Player {
            i += 1;
            continue;
        }
        let (pos, radius) = (state.bullets[i].pos, state.bullets[i].radius);

        let mut consumed = false;
        for inv in &mut state.invaders {
            if !inv.alive {
                continue;
            }
            if circle_rect_overlap(pos, radius, inv.pos, inv.size) {
                state.hit_flashes.push(HitFlash {
                    pos,
                    ttl_ms: HIT_FLASH_TTL_MS,
                });
                inv.hp = inv.hp.saturating_sub(1);
                if inv.hp == 0 {
                    inv.alive = false;
                    state.score += state.params.kill_score;
                }
                consumed = true;
                break;
            }
        }

        if consumed {
            state.bullets.remove(i);
        } else {
            i += 1;
        }
    }
}

fn decay_hit_flashes(state: &mut GameState, dt: f32) {
    for flash in &mut state.hit_flashes {
        flash.ttl_ms -= dt * 1000.0;
    }
    state.hit_flashes.retain(|f| f.ttl_ms > 0.0);
}

/// Invader bullets vs player. An active shield consumes the bullet with no
/// further effect; otherwise a hit costs one life, and at zero lives the
/// session ends.
fn resolve_invader_bullets(state: &mut GameState, now: f64) {
    let shielded = state.shield.is_active(now);
    let (player_pos, player_size) = (state.player.pos, state.player.size);

    let mut i = 0;
    while i < state.bullets.len() {
        let bullet = &state.bullets[i];
        if bullet.owner != BulletOwner::Invader
            || !circle_rect_overlap(bullet.pos, bullet.radius, player_pos, player_size)
        {
            i += 1;
            continue;
        }
        state.bullets.remove(i);
        if !shielded {
            state.lives = state.lives.saturating_sub(1);
            if state.lives == 0 {
                state.status = GameStatus::Over;
                log::info!("out of lives at level {}, score {}", state.level, state.score);
            }
        }
    }
}

/// The session ends the moment any alive invader's bottom edge reaches the
/// player's top edge.
fn check_formation_breach(state: &mut GameState) {
    let player_top = state.player.pos.y;
    if state
        .invaders
        .iter()
        .any(|i| i.alive && i.pos.y + i.size.y >= player_top)
    {
        state.status = GameStatus::Over;
        log::info!("formation reached the player at level {}", state.level);
    }
}
