//! # Selection Policy
//!
//! Every tuning constant of the budget/selection pipeline lives here, in one
//! versioned struct instead of scattered magic numbers. The constructors
//! record the two generations of constants this generator has used; fields
//! are plain and public so callers can tune either.

use serde::{Deserialize, Serialize};

/// Tuning constants for budget computation and monster selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionPolicy {
    /// Lower edge of the XP target window, as a fraction of the budget
    pub window_min: f64,
    /// Upper edge of the XP target window; a hard ceiling for incremental
    /// picks
    pub window_max: f64,
    /// Budget multiplier for a normal encounter
    pub normal_multiplier: f64,
    /// Budget multiplier when hard mode ("skull") is flagged
    pub hard_multiplier: f64,
    /// Weights for drawing the target number of unique creature names,
    /// indexed by target − 1 (targets 1 through 5)
    pub unique_count_weights: [u32; 5],
    /// Minimum XP for a creature to count as "big" in the low-unique branch
    /// and the last-resort guard
    pub big_creature_min_xp: u32,
    /// Maximum XP for a creature to qualify as swarm filler
    pub filler_max_xp: u32,
    /// Smallest filler group in the high-unique branch
    pub filler_group_min: u32,
    /// Largest filler group in the high-unique branch
    pub filler_group_max: u32,
    /// Hard ceiling on total creature instances per encounter
    pub instance_ceiling: usize,
    /// Iteration cap for the general top-up loop
    pub max_attempts: u32,
    /// Per-player XP when the level is outside the budget table
    pub default_per_player_xp: u32,
    /// Candidate pool admits creatures with CR up to level + this margin
    pub cr_margin: u32,
}

impl SelectionPolicy {
    /// The current policy generation: wide 0.8–1.2 window, 1.0/1.5
    /// difficulty multipliers.
    pub fn current() -> Self {
        Self {
            window_min: 0.8,
            window_max: 1.2,
            normal_multiplier: 1.0,
            hard_multiplier: 1.5,
            unique_count_weights: [45, 30, 13, 8, 4],
            big_creature_min_xp: 200,
            filler_max_xp: 100,
            filler_group_min: 3,
            filler_group_max: 6,
            instance_ceiling: 15,
            max_attempts: 50,
            default_per_player_xp: 150,
            cr_margin: 2,
        }
    }

    /// The previous policy generation: tight 0.9–1.0 window, 1.5/2.0
    /// difficulty multipliers. Kept for comparison runs.
    pub fn legacy() -> Self {
        Self {
            window_min: 0.9,
            window_max: 1.0,
            normal_multiplier: 1.5,
            hard_multiplier: 2.0,
            ..Self::current()
        }
    }
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self::current()
    }
}
