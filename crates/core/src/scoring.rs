//! Scoring module - classic line scores, levels and gravity
//!
//! Levels start at 1 and go up every `LINES_PER_LEVEL` cleared lines.

use std::time::Duration;

use crate::types::{BASE_TICK_MS, LINES_PER_LEVEL, LINE_SCORES, MIN_TICK_MS, TICK_STEP_MS};

/// Points for clearing `lines` rows in one lock at `level`
///
/// 1/2/3/4 lines award 40/100/300/1200 times the level; any other count
/// awards nothing.
pub fn line_clear_points(lines: u32, level: u32) -> u32 {
    let base = LINE_SCORES.get(lines as usize).copied().unwrap_or(0);
    base.saturating_mul(level)
}

/// Level reached after `total_lines` cleared lines
pub fn level_for_lines(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Gravity interval for a level, clamped at `MIN_TICK_MS`
pub fn tick_interval_for_level(level: u32) -> Duration {
    let steps = u64::from(level.saturating_sub(1));
    let ms = BASE_TICK_MS
        .saturating_sub(steps.saturating_mul(TICK_STEP_MS))
        .max(MIN_TICK_MS);
    Duration::from_millis(ms)
}
