//! # Budget Calculator
//!
//! Converts (player count, average level, difficulty flag) into an XP
//! budget. The per-character values follow the 5e DMG "medium encounter"
//! thresholds; the difficulty multiplier comes from the selection policy.
//! These numbers are heuristic and tunable, not a strict conformance to any
//! published table.

use super::policy::SelectionPolicy;

/// Medium-encounter XP per character, indexed by level − 1 (levels 1–20).
pub const MEDIUM_XP_PER_CHARACTER: [u32; 20] = [
    50, 100, 150, 250, 500, 600, 750, 900, 1100, 1200, 1600, 2000, 2200, 2500, 2800, 3200, 3900,
    4200, 4900, 5700,
];

/// Per-character medium XP for a level, `None` outside the table.
pub fn medium_xp_per_character(level: u32) -> Option<u32> {
    if (1..=20).contains(&level) {
        Some(MEDIUM_XP_PER_CHARACTER[(level - 1) as usize])
    } else {
        None
    }
}

/// Computes the XP budget for an encounter.
///
/// An out-of-table level falls back to the policy's default per-player value
/// rather than failing. The result is truncated, not rounded.
///
/// # Examples
///
/// ```
/// use barrow::{compute_budget, SelectionPolicy};
///
/// let policy = SelectionPolicy::current();
/// let normal = compute_budget(4, 3, false, &policy);
/// let hard = compute_budget(4, 3, true, &policy);
/// assert_eq!(normal, 600);
/// assert!(hard >= normal);
/// ```
pub fn compute_budget(players: u32, level: u32, hard_mode: bool, policy: &SelectionPolicy) -> u32 {
    let per_player = medium_xp_per_character(level).unwrap_or(policy.default_per_player_xp);
    let base = per_player.saturating_mul(players);
    let multiplier = if hard_mode {
        policy.hard_multiplier
    } else {
        policy.normal_multiplier
    };
    (base as f64 * multiplier) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_table_lookup() {
        assert_eq!(medium_xp_per_character(1), Some(50));
        assert_eq!(medium_xp_per_character(20), Some(5700));
        assert_eq!(medium_xp_per_character(0), None);
        assert_eq!(medium_xp_per_character(21), None);
    }

    #[test]
    fn test_budget_scales_with_players() {
        let policy = SelectionPolicy::current();
        let solo = compute_budget(1, 5, false, &policy);
        let party = compute_budget(4, 5, false, &policy);
        assert_eq!(party, solo * 4);
    }

    #[test]
    fn test_out_of_table_level_uses_default() {
        let policy = SelectionPolicy::current();
        let budget = compute_budget(4, 99, false, &policy);
        assert_eq!(budget, policy.default_per_player_xp * 4);
    }

    #[test]
    fn test_hard_mode_raises_budget() {
        let policy = SelectionPolicy::current();
        assert_eq!(compute_budget(4, 3, true, &policy), 900);
    }

    #[test]
    fn test_truncation_not_rounding() {
        let mut policy = SelectionPolicy::current();
        policy.normal_multiplier = 1.33;
        // 50 * 1.33 = 66.5, truncates to 66.
        assert_eq!(compute_budget(1, 1, false, &policy), 66);
    }

    proptest! {
        #[test]
        fn prop_hard_budget_dominates_normal(players in 1u32..=10, level in 1u32..=25) {
            let policy = SelectionPolicy::current();
            let normal = compute_budget(players, level, false, &policy);
            let hard = compute_budget(players, level, true, &policy);
            prop_assert!(hard >= normal);
        }

        #[test]
        fn prop_budget_monotone_in_players(players in 1u32..=10, level in 1u32..=20) {
            let policy = SelectionPolicy::current();
            let smaller = compute_budget(players, level, false, &policy);
            let larger = compute_budget(players + 1, level, false, &policy);
            prop_assert!(larger >= smaller);
        }
    }
}
