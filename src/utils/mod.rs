//! # Utilities Module
//!
//! Small reusable helpers shared across the generator.

pub mod sampling;

pub use sampling::*;
