//! # Catalog Module
//!
//! Per-setting creature reference data: names, challenge ratings, and XP
//! values, loaded once at startup and shared read-only across all selection
//! calls.
//!
//! Data files are JSON arrays of creature records. A missing or malformed
//! file degrades to a built-in default set rather than failing; the degraded
//! path is logged, not surfaced as an error.

pub mod themes;

pub use themes::*;

use crate::{BarrowError, BarrowResult};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// A creature's challenge rating, expressed as a rational number.
///
/// Encoded in data files as `"N"` or `"N/D"` (e.g. `"3"`, `"1/4"`). Used only
/// for candidate-pool filtering; all budget arithmetic runs on XP values.
///
/// # Examples
///
/// ```
/// use barrow::ChallengeRating;
///
/// let quarter: ChallengeRating = "1/4".parse().unwrap();
/// let three: ChallengeRating = "3".parse().unwrap();
/// assert!(quarter < three);
/// assert_eq!(quarter.to_string(), "1/4");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChallengeRating {
    numerator: u32,
    denominator: u32,
}

impl ChallengeRating {
    /// Creates a challenge rating from a numerator and denominator.
    ///
    /// Returns an error for a zero denominator.
    pub fn new(numerator: u32, denominator: u32) -> BarrowResult<Self> {
        if denominator == 0 {
            return Err(BarrowError::InvalidData(
                "challenge rating denominator must be non-zero".to_string(),
            ));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Creates a whole-number challenge rating.
    pub fn whole(value: u32) -> Self {
        Self {
            numerator: value,
            denominator: 1,
        }
    }

    /// Returns true if this rating is at most `level` (as a whole number).
    ///
    /// Rational comparison; `1/4 ≤ 1` holds, `3 ≤ 2` does not.
    pub fn at_most(self, level: u32) -> bool {
        u64::from(self.numerator) <= u64::from(level) * u64::from(self.denominator)
    }
}

impl PartialOrd for ChallengeRating {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ChallengeRating {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        let lhs = u64::from(self.numerator) * u64::from(other.denominator);
        let rhs = u64::from(other.numerator) * u64::from(self.denominator);
        lhs.cmp(&rhs)
    }
}

impl FromStr for ChallengeRating {
    type Err = BarrowError;

    fn from_str(s: &str) -> BarrowResult<Self> {
        let s = s.trim();
        let parse_part = |part: &str| {
            part.trim().parse::<u32>().map_err(|_| {
                BarrowError::InvalidData(format!("invalid challenge rating: {:?}", s))
            })
        };

        match s.split_once('/') {
            Some((num, den)) => Self::new(parse_part(num)?, parse_part(den)?),
            None => Ok(Self::whole(parse_part(s)?)),
        }
    }
}

impl TryFrom<String> for ChallengeRating {
    type Error = BarrowError;

    fn try_from(s: String) -> BarrowResult<Self> {
        s.parse()
    }
}

impl From<ChallengeRating> for String {
    fn from(cr: ChallengeRating) -> String {
        cr.to_string()
    }
}

impl fmt::Display for ChallengeRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denominator == 1 {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

/// A single creature record from the catalog.
///
/// Immutable reference data; selections clone instances out of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creature {
    /// Display name, unique within a setting
    pub name: String,
    /// Challenge rating, used only for pool filtering
    pub cr: ChallengeRating,
    /// Experience point value, the authoritative unit for budget math
    pub xp: u32,
}

impl Creature {
    /// Creates a new creature record.
    pub fn new(name: impl Into<String>, cr: ChallengeRating, xp: u32) -> Self {
        Self {
            name: name.into(),
            cr,
            xp,
        }
    }
}

/// The per-setting creature catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    creatures: Vec<Creature>,
}

impl Catalog {
    /// Creates a catalog from an explicit creature list.
    pub fn from_creatures(creatures: Vec<Creature>) -> Self {
        Self { creatures }
    }

    /// Loads a catalog from a JSON file, degrading to the built-in default
    /// set when the file is missing or malformed.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(
                    "Could not load creature catalog from {}: {}. Using built-in defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> BarrowResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let creatures: Vec<Creature> = serde_json::from_str(&raw)?;
        Ok(Self { creatures })
    }

    /// All creatures in the catalog.
    pub fn creatures(&self) -> &[Creature] {
        &self.creatures
    }

    /// Number of creatures in the catalog.
    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    /// Returns true if the catalog holds no creatures.
    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }

    /// The candidate pool for a party of the given average level.
    ///
    /// Filters out creatures whose CR exceeds `level + cr_margin`; CR plays
    /// no further role once the pool is built.
    pub fn pool_for_level(&self, level: u32, cr_margin: u32) -> Vec<Creature> {
        let ceiling = level.saturating_add(cr_margin);
        self.creatures
            .iter()
            .filter(|c| c.cr.at_most(ceiling))
            .cloned()
            .collect()
    }
}

impl Default for Catalog {
    /// The built-in default catalog: a small gothic-dungeon bestiary.
    fn default() -> Self {
        let cr = |s: &str| s.parse::<ChallengeRating>().unwrap();
        Self::from_creatures(vec![
            Creature::new("Crawling Claw", cr("0"), 10),
            Creature::new("Giant Rat", cr("1/8"), 25),
            Creature::new("Skeleton", cr("1/4"), 50),
            Creature::new("Zombie", cr("1/4"), 50),
            Creature::new("Swarm of Bats", cr("1/4"), 50),
            Creature::new("Shadow", cr("1/2"), 100),
            Creature::new("Ghoul", cr("1"), 200),
            Creature::new("Specter", cr("1"), 200),
            Creature::new("Giant Spider", cr("1"), 200),
            Creature::new("Animated Armor", cr("1"), 200),
            Creature::new("Ghast", cr("2"), 450),
            Creature::new("Gargoyle", cr("2"), 450),
            Creature::new("Cult Fanatic", cr("2"), 450),
            Creature::new("Will-o'-Wisp", cr("2"), 450),
            Creature::new("Wight", cr("3"), 700),
            Creature::new("Mummy", cr("3"), 700),
            Creature::new("Ghost", cr("4"), 1100),
            Creature::new("Banshee", cr("4"), 1100),
            Creature::new("Flameskull", cr("4"), 1100),
            Creature::new("Wraith", cr("5"), 1800),
            Creature::new("Vampire Spawn", cr("5"), 1800),
        ])
    }
}
