//! # Barrow Encounter Generator
//!
//! A randomized tabletop-game encounter generator with optional LLM-flavored
//! room descriptions.
//!
//! ## Architecture Overview
//!
//! Barrow is built from a handful of small, testable pieces:
//!
//! - **Catalog**: per-setting creature reference data (name, CR, XP)
//! - **Tile Registry**: room/tile lookup with themes and event chances
//! - **Budget Calculator**: (players, level, difficulty) → XP budget
//! - **Monster Selector**: fills the XP budget with a thematically
//!   appropriate creature set under count and window constraints
//! - **Encounter Assembler**: orchestrates the above and formats the result
//! - **Narrative**: pluggable description sources (Ollama or a template)
//!
//! ## Degradation Model
//!
//! Nothing in this crate is fatal at runtime: missing data files fall back to
//! built-in defaults, an unreachable Ollama server falls back to a template
//! description, and an unsatisfiable budget yields a partial encounter.

pub mod catalog;
pub mod encounter;
pub mod input;
pub mod narrative;
pub mod tiles;
pub mod utils;

// Core module re-exports
pub use catalog::*;
pub use encounter::*;
pub use input::*;
pub use narrative::*;
pub use tiles::*;
pub use utils::*;

// Explicit re-exports for commonly used types
pub use catalog::{Catalog, ChallengeRating, Creature, ThemeMap};
pub use encounter::{
    compute_budget, Encounter, EncounterAssembler, EncounterLine, EncounterOutcome,
    EncounterRequest, MonsterSelector, SelectionPolicy,
};
pub use narrative::{DescriptionSource, OllamaClient, OllamaConfig, TemplateDescriber};
pub use tiles::{Tile, TileKind, TileRegistry};

/// Core error type for the Barrow encounter generator.
#[derive(thiserror::Error, Debug)]
pub enum BarrowError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Input could not be interpreted
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Reference data is malformed
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Narrative/description service error
    #[error("Narrative error: {0}")]
    Narrative(String),
}

/// Result type used throughout the Barrow codebase.
pub type BarrowResult<T> = Result<T, BarrowError>;

/// Version information for the generator.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate-wide configuration constants.
pub mod config {
    /// Default number of players when none is given
    pub const DEFAULT_PLAYERS: u32 = 4;

    /// Default average party level when none is given
    pub const DEFAULT_LEVEL: u32 = 3;

    /// Default setting name (directory under the data dir)
    pub const DEFAULT_SETTING: &str = "ravenloft";

    /// Default directory holding per-setting data files
    pub const DEFAULT_DATA_DIR: &str = "data";

    /// Default Ollama endpoint
    pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

    /// Default Ollama model for descriptions
    pub const DEFAULT_MODEL: &str = "gemma2";
}
