//! # Tile Registry
//!
//! Room/tile lookup for the dungeon being explored. Tiles carry thematic
//! tags that steer monster selection and an event chance that lets generic
//! tiles stay quiet.
//!
//! Lookup never fails: an unknown tile name synthesizes a default generic
//! tile, which keeps every downstream component robust to arbitrary input by
//! construction.

use crate::BarrowResult;
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Whether a tile is a specific named location or a generic connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileKind {
    /// A specific location; encounters always trigger here
    Named,
    /// A connector (corridor, stairwell); encounters roll against
    /// `event_chance`
    Generic,
}

/// A room or location unit in the dungeon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TileRecord")]
pub struct Tile {
    /// Display name, unique within a setting
    pub name: String,
    /// Named location vs. generic connector
    #[serde(rename = "type")]
    pub kind: TileKind,
    /// Theme tags steering monster selection
    pub themes: Vec<String>,
    /// Probability in [0, 1] that this tile hosts an encounter
    pub event_chance: f64,
}

/// Raw data-file shape for a tile. Absent fields take kind-dependent
/// defaults: named tiles always host an encounter, generic ones roll at 0.5.
#[derive(Deserialize)]
struct TileRecord {
    name: String,
    #[serde(rename = "type")]
    kind: TileKind,
    #[serde(default)]
    themes: Option<Vec<String>>,
    #[serde(default)]
    event_chance: Option<f64>,
}

impl From<TileRecord> for Tile {
    fn from(record: TileRecord) -> Self {
        let event_chance = record.event_chance.unwrap_or(match record.kind {
            TileKind::Named => 1.0,
            TileKind::Generic => 0.5,
        });
        Self {
            name: record.name,
            kind: record.kind,
            themes: record.themes.unwrap_or_else(default_themes),
            event_chance: event_chance.clamp(0.0, 1.0),
        }
    }
}

fn default_themes() -> Vec<String> {
    vec!["dark".to_string()]
}

impl Tile {
    /// Creates a named tile (always hosts an encounter).
    pub fn named(name: impl Into<String>, themes: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind: TileKind::Named,
            themes,
            event_chance: 1.0,
        }
    }

    /// Creates a generic tile with the given event chance.
    pub fn generic(name: impl Into<String>, themes: Vec<String>, event_chance: f64) -> Self {
        Self {
            name: name.into(),
            kind: TileKind::Generic,
            themes,
            event_chance,
        }
    }

    /// The synthesized default for an unknown tile name.
    pub fn synthesized(name: impl Into<String>) -> Self {
        Self::generic(name, default_themes(), 0.5)
    }
}

/// Registry of known tiles for one setting.
#[derive(Debug, Clone)]
pub struct TileRegistry {
    tiles: Vec<Tile>,
}

impl TileRegistry {
    /// Creates a registry from an explicit tile list.
    pub fn from_tiles(tiles: Vec<Tile>) -> Self {
        Self { tiles }
    }

    /// Loads a registry from a JSON file, degrading to the built-in trio
    /// when the file is missing or malformed.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(registry) => registry,
            Err(e) => {
                warn!(
                    "Could not load tiles from {}: {}. Using built-in defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> BarrowResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let tiles: Vec<Tile> = serde_json::from_str(&raw)?;
        Ok(Self { tiles })
    }

    /// Looks up a tile by exact name, case-insensitively.
    ///
    /// Never fails: a miss synthesizes a default generic tile carrying the
    /// requested name.
    ///
    /// # Examples
    ///
    /// ```
    /// use barrow::{TileKind, TileRegistry};
    ///
    /// let registry = TileRegistry::default();
    /// assert_eq!(registry.get_tile("crypt").name, "Crypt");
    /// assert_eq!(registry.get_tile("Oubliette").kind, TileKind::Generic);
    /// ```
    pub fn get_tile(&self, name: &str) -> Tile {
        self.tiles
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
            .cloned()
            .unwrap_or_else(|| Tile::synthesized(name))
    }

    /// Resolves a partial tile name to the unique tile containing it.
    ///
    /// Case-insensitive substring match. Zero or multiple matches yield
    /// `None`; ambiguity is never silently broken. An exact full-name match
    /// wins immediately even when it is a prefix of another tile's name.
    pub fn resolve_tile_name(&self, partial: &str) -> Option<String> {
        if let Some(exact) = self
            .tiles
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(partial))
        {
            return Some(exact.name.clone());
        }

        let matches = self.matching_tiles(partial);
        match matches.as_slice() {
            [single] => Some(single.to_string()),
            _ => None,
        }
    }

    /// All tile names containing the given substring, case-insensitively.
    ///
    /// Lets callers tell "unknown" (empty) apart from "ambiguous" (several).
    pub fn matching_tiles(&self, partial: &str) -> Vec<&str> {
        let needle = partial.to_lowercase();
        self.tiles
            .iter()
            .filter(|t| t.name.to_lowercase().contains(&needle))
            .map(|t| t.name.as_str())
            .collect()
    }

    /// All tile names in registry order.
    pub fn tile_names(&self) -> Vec<&str> {
        self.tiles.iter().map(|t| t.name.as_str()).collect()
    }

    /// Number of registered tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Returns true if the registry holds no tiles.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

impl Default for TileRegistry {
    /// The built-in tile trio.
    fn default() -> Self {
        let themes = |names: &[&str]| names.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self::from_tiles(vec![
            Tile::named("Chapel", themes(&["undead", "holy"])),
            Tile::named("Crypt", themes(&["undead", "dark"])),
            Tile::generic("Corridor", themes(&["dark"]), 0.5),
        ])
    }
}
