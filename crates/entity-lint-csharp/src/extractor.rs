//! Language extraction trait.
//!
//! `LanguageExtractor` is the extension point for adding front ends. An
//! extractor turns one source file into type declaration fragments; the
//! project loader groups fragments into compilations and merges partials.

use std::path::Path;

use entity_lint_core::TypeDecl;

use crate::error::FrontendError;

/// Trait for language-specific Tree-sitter extraction.
pub trait LanguageExtractor: Send + Sync {
    /// Language identifier (e.g., `"csharp"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this extractor handles (e.g., `&[".cs"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Extracts the top-level type declarations of one source file.
    ///
    /// `file` is recorded in declaration locations and log output only.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar cannot be loaded or parsing aborts.
    fn extract(&self, source: &str, file: &Path) -> Result<Vec<TypeDecl>, FrontendError>;

    /// `true` when `path` has one of [`LanguageExtractor::extensions`].
    fn handles(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.extensions()
                    .iter()
                    .any(|known| known.trim_start_matches('.') == ext)
            })
    }
}
