//! # Narrative Traits
//!
//! The seam between encounter assembly and whatever produces flavor text.

use crate::BarrowResult;

/// A source of short narrative room descriptions.
///
/// Implementations may be slow or fail (a remote model) or be trivial and
/// infallible (a template). The assembler treats any error as "use the
/// fallback", never as a reason to abort the encounter.
pub trait DescriptionSource {
    /// Produces one short paragraph describing the tile, its themes, and the
    /// creatures found there.
    fn describe(
        &self,
        tile_name: &str,
        themes: &[String],
        creatures: &[String],
    ) -> BarrowResult<String>;

    /// Human-readable name for logging.
    fn source_name(&self) -> &'static str;
}
