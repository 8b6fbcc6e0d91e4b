//! Pattern compilation for search atoms
//!
//! A search atom is a field, a list of modifiers and a list of raw patterns.
//! This module validates the modifier vocabulary and turns the raw patterns
//! into a single [`CompiledMatcher`] over one string value.

/// Per-atom memoization of compiled matchers
pub mod cache;
/// Validation errors
pub mod error;
/// Wildcard translation
pub mod escape;
/// Validation and compilation entry points
pub mod factory;
/// Modifier vocabulary
pub mod modifier;
/// Compiled matcher variants
pub mod string_matcher;
/// Matcher traits
pub mod traits;
/// base64 and windash value transformations
pub mod transform;

pub use cache::MatcherCache;
pub use error::ValidationError;
pub use factory::{compile, expand_placeholders, placeholder_name, validate};
pub use modifier::{Modifier, ModifierSet, PatternMode};
pub use string_matcher::CompiledMatcher;
pub use traits::StringMatcher;
