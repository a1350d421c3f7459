//! # Encounter Module
//!
//! Encounter assembly: budget computation, monster selection, and result
//! formatting.
//!
//! The flow for one request is tile lookup → event roll → budget →
//! selection → aggregation → optional narrative description. Each stage is
//! its own submodule so the core selection algorithm stays testable in
//! isolation.

pub mod assembler;
pub mod budget;
pub mod policy;
pub mod selector;

pub use assembler::*;
pub use budget::*;
pub use policy::*;
pub use selector::*;

use crate::catalog::{ChallengeRating, Creature};
use crate::tiles::{Tile, TileKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// One encounter request, constructed per invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterRequest {
    /// Tile name as entered (resolution happens in the registry)
    pub tile_name: String,
    /// Number of player characters, at least 1
    pub players: u32,
    /// Average party level, at least 1
    pub level: u32,
    /// Raises the budget multiplier for a tougher encounter
    pub hard_mode: bool,
}

impl EncounterRequest {
    /// Creates a request for the given tile.
    pub fn new(tile_name: impl Into<String>, players: u32, level: u32, hard_mode: bool) -> Self {
        Self {
            tile_name: tile_name.into(),
            players,
            level,
            hard_mode,
        }
    }
}

/// One aggregated display line: `count × name (CR cr, xp XP)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterLine {
    /// Number of instances of this creature
    pub count: usize,
    /// Creature name
    pub name: String,
    /// Challenge rating, display only
    pub cr: ChallengeRating,
    /// XP per instance
    pub xp: u32,
}

impl fmt::Display for EncounterLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x {} (CR {}, {} XP)",
            self.count, self.name, self.cr, self.xp
        )
    }
}

/// Groups duplicate creatures into display lines.
///
/// Lines are keyed by (name, CR, XP) and sorted by descending count, then
/// ascending name. The input order carries no meaning after aggregation; the
/// instance total is preserved.
pub fn aggregate_creatures(creatures: &[Creature]) -> Vec<EncounterLine> {
    let mut counts: HashMap<(&str, ChallengeRating, u32), usize> = HashMap::new();
    for creature in creatures {
        *counts
            .entry((creature.name.as_str(), creature.cr, creature.xp))
            .or_insert(0) += 1;
    }

    let mut lines: Vec<EncounterLine> = counts
        .into_iter()
        .map(|((name, cr, xp), count)| EncounterLine {
            count,
            name: name.to_string(),
            cr,
            xp,
        })
        .collect();

    lines.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    lines
}

/// A fully assembled encounter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Encounter {
    /// The resolved (or synthesized) tile
    pub tile: Tile,
    /// Party size the budget was computed for
    pub players: u32,
    /// Average party level the budget was computed for
    pub level: u32,
    /// Whether hard mode raised the budget
    pub hard_mode: bool,
    /// The XP budget the selector aimed for
    pub budget: u32,
    /// Selected creatures in insertion order, duplicates included
    pub creatures: Vec<Creature>,
    /// Aggregated display lines
    pub lines: Vec<EncounterLine>,
    /// Sum of XP over all selected instances
    pub total_xp: u32,
    /// Narrative paragraph, when a description source produced one
    pub description: Option<String>,
}

impl fmt::Display for Encounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.tile.kind {
            TileKind::Named => "named",
            TileKind::Generic => "generic",
        };
        let difficulty = if self.hard_mode { ", hard" } else { "" };
        writeln!(
            f,
            "Encounter in {} ({}{}): {} level-{} PCs.",
            self.tile.name, kind, difficulty, self.players, self.level
        )?;
        for line in &self.lines {
            writeln!(f, "  {}", line)?;
        }
        writeln!(f, "Total XP: {} (budget {})", self.total_xp, self.budget)?;
        if let Some(description) = &self.description {
            writeln!(f)?;
            writeln!(f, "{}", description)?;
        }
        Ok(())
    }
}

/// The outcome of one assembly call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EncounterOutcome {
    /// The event roll came up empty; nothing lurks here
    Quiet {
        /// The tile that stayed quiet
        tile: Tile,
    },
    /// A populated encounter
    Encounter(Encounter),
}
