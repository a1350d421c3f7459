//! # Narrative Module
//!
//! Flavor-text generation for assembled encounters. The primary source is a
//! local Ollama server; a deterministic template stands in whenever the
//! server is unreachable, the model is missing, or a request fails.

pub mod ollama;
pub mod traits;

pub use ollama::*;
pub use traits::*;

use crate::BarrowResult;

/// Template-based description source. Deterministic and infallible; the
/// degradation target for every narrative failure path.
#[derive(Debug, Clone, Default)]
pub struct TemplateDescriber;

impl TemplateDescriber {
    /// Creates a new template describer.
    pub fn new() -> Self {
        Self
    }

    fn join_names(names: &[String]) -> String {
        match names {
            [] => "nothing at all".to_string(),
            [only] => only.clone(),
            [head @ .., last] => format!("{} and {}", head.join(", "), last),
        }
    }
}

impl DescriptionSource for TemplateDescriber {
    fn describe(
        &self,
        tile_name: &str,
        themes: &[String],
        creatures: &[String],
    ) -> BarrowResult<String> {
        let mood = if themes.is_empty() {
            "stale".to_string()
        } else {
            themes.join(", ")
        };
        Ok(format!(
            "The {} lies heavy with a {} air. Ahead, {} stir in the gloom, \
             turning toward the intruders.",
            tile_name,
            mood,
            Self::join_names(creatures)
        ))
    }

    fn source_name(&self) -> &'static str {
        "template"
    }
}
