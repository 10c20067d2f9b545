//! Utility functions for rule implementations.

pub mod attributes;
pub mod conventions;

// Re-export commonly used utilities for rule implementations
#[doc(inline)]
pub use attributes::{find_data_annotation, has_attribute, DATA_ANNOTATIONS};
#[doc(inline)]
pub use conventions::{
    has_word_prefix, matches_any, matches_pattern, split_constraint, Convention,
    CONSTRAINT_TYPES, OBJECT_OVERRIDES,
};
