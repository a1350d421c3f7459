//! # Theme Map
//!
//! Maps theme names to the creatures that fit them. A creature may appear
//! under any number of themes; theme membership is by catalog name.

use crate::BarrowResult;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Mapping from theme name to the creature names that fit the theme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeMap {
    themes: HashMap<String, Vec<String>>,
}

impl ThemeMap {
    /// Creates a theme map from explicit entries.
    pub fn from_map(themes: HashMap<String, Vec<String>>) -> Self {
        Self { themes }
    }

    /// Loads a theme map from a JSON file, degrading to the built-in
    /// defaults when the file is missing or malformed.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(map) => map,
            Err(e) => {
                warn!(
                    "Could not load theme map from {}: {}. Using built-in defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> BarrowResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let themes: HashMap<String, Vec<String>> = serde_json::from_str(&raw)?;
        Ok(Self { themes })
    }

    /// Creature names fitting any of the given themes, as a set.
    ///
    /// Unknown themes contribute nothing. An empty result means "no thematic
    /// preference"; callers fall back to the full pool.
    pub fn creatures_for(&self, themes: &[String]) -> HashSet<&str> {
        themes
            .iter()
            .filter_map(|theme| self.themes.get(theme))
            .flatten()
            .map(String::as_str)
            .collect()
    }

    /// The member list for a single theme, if known.
    pub fn members(&self, theme: &str) -> Option<&[String]> {
        self.themes.get(theme).map(Vec::as_slice)
    }

    /// Number of themes in the map.
    pub fn len(&self) -> usize {
        self.themes.len()
    }

    /// Returns true if no themes are defined.
    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

impl Default for ThemeMap {
    /// Built-in themes matching the default catalog.
    fn default() -> Self {
        let entry = |names: &[&str]| names.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let mut themes = HashMap::new();
        themes.insert(
            "undead".to_string(),
            entry(&[
                "Crawling Claw",
                "Skeleton",
                "Zombie",
                "Shadow",
                "Ghoul",
                "Specter",
                "Ghast",
                "Will-o'-Wisp",
                "Wight",
                "Mummy",
                "Ghost",
                "Banshee",
                "Flameskull",
                "Wraith",
                "Vampire Spawn",
            ]),
        );
        themes.insert(
            "dark".to_string(),
            entry(&[
                "Giant Rat",
                "Swarm of Bats",
                "Giant Spider",
                "Shadow",
                "Specter",
                "Wraith",
            ]),
        );
        themes.insert(
            "holy".to_string(),
            entry(&[
                "Animated Armor",
                "Gargoyle",
                "Cult Fanatic",
                "Specter",
                "Ghost",
            ]),
        );
        themes.insert(
            "vermin".to_string(),
            entry(&["Giant Rat", "Swarm of Bats", "Giant Spider"]),
        );
        Self { themes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_creatures_for_unions_themes() {
        let map = ThemeMap::default();
        let names = map.creatures_for(&["undead".to_string(), "holy".to_string()]);
        assert!(names.contains("Skeleton"));
        assert!(names.contains("Gargoyle"));
        // Overlapping members appear once.
        assert!(names.contains("Specter"));
    }

    #[test]
    fn test_unknown_theme_is_empty() {
        let map = ThemeMap::default();
        assert!(map.creatures_for(&["volcanic".to_string()]).is_empty());
        assert!(map.creatures_for(&[]).is_empty());
    }

    #[test]
    fn test_load_missing_file_degrades_to_default() {
        let map = ThemeMap::load(Path::new("/nonexistent/themes.json"));
        assert_eq!(map.len(), ThemeMap::default().len());
    }

    #[test]
    fn test_load_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"spooky": ["Ghost", "Specter"]}}"#).unwrap();
        let map = ThemeMap::load(file.path());
        assert_eq!(map.len(), 1);
        assert_eq!(
            map.members("spooky"),
            Some(&["Ghost".to_string(), "Specter".to_string()][..])
        );
    }
}
