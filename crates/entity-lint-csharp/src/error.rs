//! Front-end errors.

use std::path::PathBuf;

/// Errors raised while turning C# sources into program models.
#[derive(Debug, thiserror::Error)]
pub enum FrontendError {
    /// The grammar could not be loaded into the parser.
    #[error("Failed to load C# grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// The parser gave up without producing a tree.
    #[error("Parser produced no syntax tree for {path}")]
    ParseAborted {
        /// Source file.
        path: PathBuf,
    },

    /// IO error reading a source file.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Directory walk error.
    #[error("Failed to walk source tree: {0}")]
    Walk(#[from] ignore::Error),

    /// Invalid exclude pattern.
    #[error("Invalid exclude pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}
