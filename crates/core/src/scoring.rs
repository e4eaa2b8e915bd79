//! Scoring module - classic line-clear scoring and level progression
//!
//! - Line clears: `LINE_SCORES[lines] * (level + 1)`
//! - Level: starts at 1, +1 every 10 lines
//! - Gravity: 1000ms at level 1, 50ms faster per level, 50ms floor

use crate::types::{
    BASE_DROP_MS, DROP_STEP_MS, LINES_PER_LEVEL, LINE_SCORES, MIN_DROP_MS, SOFT_DROP_POINTS,
    START_LEVEL,
};

/// Calculate line clear score
///
/// `lines` is the number of rows cleared by a single lock, `level` is the
/// session level at lock time.
///
/// # Panics
///
/// A single piece spans at most 4 rows, so `lines > 4` is a broken invariant
/// and panics.
pub fn line_clear_score(lines: u32, level: u32) -> u32 {
    assert!(
        (lines as usize) < LINE_SCORES.len(),
        "cleared {} lines in one lock",
        lines
    );
    LINE_SCORES[lines as usize].saturating_mul(level.saturating_add(1))
}

/// Level reached after clearing `total_lines`
pub fn level_for_lines(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + START_LEVEL
}

/// Gravity interval for a level (in milliseconds)
pub fn drop_interval_ms(level: u32) -> u32 {
    let steps = level.saturating_sub(START_LEVEL);
    BASE_DROP_MS
        .saturating_sub(steps.saturating_mul(DROP_STEP_MS))
        .max(MIN_DROP_MS)
}

/// Points for `cells` successful soft drop steps
pub fn soft_drop_score(cells: u32) -> u32 {
    cells * SOFT_DROP_POINTS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_lines_scores_nothing() {
        for level in 0..30 {
            assert_eq!(line_clear_score(0, level), 0);
        }
    }

    #[test]
    fn test_line_score_table() {
        assert_eq!(line_clear_score(1, 0), 40);
        assert_eq!(line_clear_score(2, 0), 100);
        assert_eq!(line_clear_score(3, 0), 300);
        assert_eq!(line_clear_score(4, 0), 1200);
        assert_eq!(line_clear_score(1, 1), 80);
        assert_eq!(line_clear_score(4, 2), 3600);
    }

    #[test]
    #[should_panic]
    fn test_five_lines_is_invariant_violation() {
        line_clear_score(5, 1);
    }

    #[test]
    fn test_level_progression() {
        assert_eq!(level_for_lines(0), 1);
        assert_eq!(level_for_lines(9), 1);
        assert_eq!(level_for_lines(10), 2);
        assert_eq!(level_for_lines(25), 3);
    }

    #[test]
    fn test_drop_interval() {
        assert_eq!(drop_interval_ms(1), 1000);
        assert_eq!(drop_interval_ms(2), 950);
        assert_eq!(drop_interval_ms(10), 550);
        assert_eq!(drop_interval_ms(19), 100);
        assert_eq!(drop_interval_ms(20), 50);
        assert_eq!(drop_interval_ms(40), 50);
        assert_eq!(drop_interval_ms(0), 1000);
    }
}
