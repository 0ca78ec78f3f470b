//! Villain spawning and difficulty scaling
//!
//! Pure construction: everything random comes from the injected RNG so a
//! seeded generator reproduces the exact same villains.

use rand::Rng;

use super::rect::Rect;
use super::state::{GameState, Villain};
use crate::consts::{CANVAS_WIDTH, VILLAIN_BASE_SIZE};
use crate::tuning::Tuning;

/// Number of villains that should be on screen at `level`.
///
/// With default tuning this is `min(3 + level / 5, 15)`.
pub fn target_villain_count(level: u32, tuning: &Tuning) -> usize {
    let extra = match tuning.villain_count_step {
        0 => 0,
        step => (level / step) as usize,
    };
    (tuning.villain_count_base + extra).min(tuning.villain_count_cap)
}

/// Uniform sample in `[0, upper)`, or zero when the range is empty or unbounded
fn sample_below<R: Rng + ?Sized>(rng: &mut R, upper: f32) -> f32 {
    if upper > 0.0 && upper.is_finite() {
        rng.random_range(0.0..upper)
    } else {
        0.0
    }
}

/// Uniform sample in `[lo, hi]`. Degenerate or unbounded ranges collapse to `lo`
/// (or zero when `lo` itself is not finite).
fn sample_between<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if lo.is_finite() && hi.is_finite() && lo < hi && (hi - lo).is_finite() {
        rng.random_range(lo..=hi)
    } else if lo.is_finite() {
        lo
    } else {
        0.0
    }
}

/// Build a new villain above the visible area
pub fn spawn_villain<R: Rng + ?Sized>(
    rng: &mut R,
    id: u32,
    level: u32,
    sprite_count: usize,
    tuning: &Tuning,
) -> Villain {
    let level_f = level as f32;

    let jitter = tuning.villain_size_jitter.abs();
    let size = tuning.villain_base_size + sample_between(rng, -jitter, jitter);
    let size = if size.is_finite() && size > 0.0 {
        size
    } else {
        VILLAIN_BASE_SIZE
    };

    let base_speed = tuning.villain_base_speed + level_f * tuning.villain_speed_per_level;
    let speed =
        base_speed + sample_below(rng, level_f * tuning.villain_speed_variance_per_level);

    let max_x = (CANVAS_WIDTH - size).max(0.0);
    let x = sample_between(rng, 0.0, max_x);
    let y = -size - sample_below(rng, tuning.villain_spawn_stagger);

    let sprite = rng.random_range(0..sprite_count.max(1));

    log::debug!(
        "Spawned villain {} at ({:.1}, {:.1}) size={:.1} speed={:.2} sprite={}",
        id,
        x,
        y,
        size,
        speed,
        sprite
    );

    Villain {
        id,
        rect: Rect::new(x, y, size, size),
        speed,
        sprite,
    }
}

/// Spawn one villain for the current session level
pub fn spawn_into(state: &mut GameState) -> Villain {
    let id = state.next_villain_id();
    spawn_villain(
        &mut state.rng,
        id,
        state.session.level,
        state.sprite_count,
        &state.tuning,
    )
}

/// Top the active set up to the target count for the current level.
///
/// Only ever grows the set.
pub fn fill_population(state: &mut GameState) {
    let target = target_villain_count(state.session.level, &state.tuning);
    while state.villains.len() < target {
        let villain = spawn_into(state);
        state.villains.push(villain);
    }
}
