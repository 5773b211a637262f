//! Scoring module - line-clear points, level derivation and the gravity curve
//!
//! - Points: `LINE_SCORES[lines] * level * multiplier`, floored.
//! - Level: `cumulative_lines / lines_per_level + 1`.
//! - Gravity: `max(floor, base - (level - 1) * decrease)`.

use crate::types::{DifficultyConfig, DROP_INTERVAL_FLOOR_MS, LINE_SCORES};

/// Points awarded for one placement.
///
/// `lines` outside 0..=4 scores nothing; a single placement spans at most
/// four rows.
pub fn line_clear_score(lines: u32, level: u32, config: &DifficultyConfig) -> u32 {
    let Some(&base) = LINE_SCORES.get(lines as usize) else {
        return 0;
    };
    let raw = base as u64 * level as u64 * config.multiplier_numerator as u64;
    let den = config.multiplier_denominator.max(1) as u64;
    // Integer division floors, matching the classic rules for fractional multipliers.
    (raw / den).min(u32::MAX as u64) as u32
}

/// Level for a cumulative line count (levels start at 1).
pub fn level_for_lines(total_lines: u32, config: &DifficultyConfig) -> u32 {
    total_lines / config.lines_per_level.max(1) + 1
}

/// Gravity interval for a level, clamped at [`DROP_INTERVAL_FLOOR_MS`].
pub fn drop_interval_ms(level: u32, config: &DifficultyConfig) -> u32 {
    let speedup = level
        .saturating_sub(1)
        .saturating_mul(config.interval_decrease_per_level_ms);
    config
        .base_interval_ms
        .saturating_sub(speedup)
        .max(DROP_INTERVAL_FLOOR_MS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Difficulty;

    #[test]
    fn test_classic_line_scores_on_easy() {
        let easy = Difficulty::Easy.config();
        assert_eq!(line_clear_score(0, 1, &easy), 0);
        assert_eq!(line_clear_score(1, 1, &easy), 40);
        assert_eq!(line_clear_score(2, 1, &easy), 100);
        assert_eq!(line_clear_score(3, 1, &easy), 300);
        assert_eq!(line_clear_score(4, 1, &easy), 1200);

        assert_eq!(line_clear_score(4, 5, &easy), 1200 * 5);
        assert_eq!(line_clear_score(5, 1, &easy), 0);
    }

    #[test]
    fn test_fractional_multiplier_floors() {
        let medium = Difficulty::Medium.config();
        // 40 * 1 * 1.5 = 60
        assert_eq!(line_clear_score(1, 1, &medium), 60);
        // 40 * 3 * 1.5 = 180
        assert_eq!(line_clear_score(1, 3, &medium), 180);
        // 100 * 1 * 1.5 = 150; 300 * 1 * 1.5 = 450
        assert_eq!(line_clear_score(2, 1, &medium), 150);
        assert_eq!(line_clear_score(3, 1, &medium), 450);

        let odd = DifficultyConfig {
            multiplier_numerator: 4,
            multiplier_denominator: 3,
            ..medium
        };
        // 40 * 4 / 3 = 53.33 -> 53
        assert_eq!(line_clear_score(1, 1, &odd), 53);
    }

    #[test]
    fn test_hard_doubles() {
        let hard = Difficulty::Hard.config();
        assert_eq!(line_clear_score(4, 2, &hard), 1200 * 2 * 2);
    }

    #[test]
    fn test_level_calculation() {
        let easy = Difficulty::Easy.config();
        assert_eq!(level_for_lines(0, &easy), 1);
        assert_eq!(level_for_lines(9, &easy), 1);
        assert_eq!(level_for_lines(10, &easy), 2);
        assert_eq!(level_for_lines(29, &easy), 3);

        let hard = Difficulty::Hard.config();
        assert_eq!(level_for_lines(6, &hard), 2);
        assert_eq!(level_for_lines(12, &hard), 3);
    }

    #[test]
    fn test_drop_intervals() {
        let easy = Difficulty::Easy.config();
        assert_eq!(drop_interval_ms(1, &easy), 800);
        assert_eq!(drop_interval_ms(2, &easy), 750);
        assert_eq!(drop_interval_ms(15, &easy), 100);
        assert_eq!(drop_interval_ms(16, &easy), 50);
        assert_eq!(drop_interval_ms(100, &easy), 50);

        let hard = Difficulty::Hard.config();
        assert_eq!(drop_interval_ms(1, &hard), 300);
        assert_eq!(drop_interval_ms(6, &hard), 50);
        assert_eq!(drop_interval_ms(u32::MAX, &hard), 50);
    }
}
