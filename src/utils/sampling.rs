//! # Weighted Sampling
//!
//! Weighted random choice over a slice, parameterized by a scoring function.
//!
//! Every randomized pick in the selection algorithm goes through
//! [`weighted_choice`]. Weights are clamped to a minimum of 1 so a scoring
//! function that returns zero or a negative value can never poison the draw.

use rand::rngs::StdRng;
use rand::Rng;

/// Picks one item from `items` with probability proportional to
/// `weight_fn(item)`, clamped to at least 1.
///
/// Returns `None` only when `items` is empty.
///
/// # Examples
///
/// ```
/// use barrow::utils::weighted_choice;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let items = [10i64, 20, 30];
/// let picked = weighted_choice(&items, |&x| x, &mut rng);
/// assert!(picked.is_some());
/// assert!(items.contains(picked.unwrap()));
/// ```
pub fn weighted_choice<'a, T, F>(items: &'a [T], weight_fn: F, rng: &mut StdRng) -> Option<&'a T>
where
    F: Fn(&T) -> i64,
{
    if items.is_empty() {
        return None;
    }

    let weights: Vec<u64> = items.iter().map(|item| weight_fn(item).max(1) as u64).collect();
    let total: u64 = weights.iter().sum();

    let mut roll = rng.gen_range(0..total);
    for (item, weight) in items.iter().zip(&weights) {
        if roll < *weight {
            return Some(item);
        }
        roll -= weight;
    }

    // Unreachable: the roll is strictly below the sum of weights.
    items.last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[test]
    fn test_empty_slice_yields_none() {
        let mut rng = StdRng::seed_from_u64(1);
        let items: Vec<u32> = Vec::new();
        assert!(weighted_choice(&items, |_| 1, &mut rng).is_none());
    }

    #[test]
    fn test_single_item_always_chosen() {
        let mut rng = StdRng::seed_from_u64(2);
        let items = vec!["only"];
        for _ in 0..10 {
            assert_eq!(weighted_choice(&items, |_| 5, &mut rng), Some(&"only"));
        }
    }

    #[test]
    fn test_nonpositive_weights_are_clamped() {
        let mut rng = StdRng::seed_from_u64(3);
        let items = vec![0i64, -100, -1];
        // All weights clamp to 1; the draw must still succeed.
        for _ in 0..20 {
            assert!(weighted_choice(&items, |&x| x, &mut rng).is_some());
        }
    }

    #[test]
    fn test_heavier_items_dominate() {
        let mut rng = StdRng::seed_from_u64(4);
        let items = vec![("light", 1i64), ("heavy", 1000)];
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for _ in 0..500 {
            let picked = weighted_choice(&items, |&(_, w)| w, &mut rng).unwrap();
            *counts.entry(picked.0).or_insert(0) += 1;
        }
        assert!(counts.get("heavy").copied().unwrap_or(0) > 400);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let items = vec![1u32, 2, 3, 4, 5];
        let picks_a: Vec<u32> = {
            let mut rng = StdRng::seed_from_u64(99);
            (0..10)
                .map(|_| *weighted_choice(&items, |&x| x as i64, &mut rng).unwrap())
                .collect()
        };
        let picks_b: Vec<u32> = {
            let mut rng = StdRng::seed_from_u64(99);
            (0..10)
                .map(|_| *weighted_choice(&items, |&x| x as i64, &mut rng).unwrap())
                .collect()
        };
        assert_eq!(picks_a, picks_b);
    }
}
