//! # entity-lint-csharp
//!
//! Tree-sitter based C# front end for entity-lint.
//!
//! Turns C# sources into the `entity-lint-core` program model:
//!
//! - [`LanguageExtractor`] trait for pluggable language support
//! - [`CSharpExtractor`] for type, member and body extraction
//! - [`ProjectLoader`] for `.csproj` discovery and partial-class merging
//! - [`compile_sources`] for in-memory snippets

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod body;
pub mod csharp;
pub mod error;
pub mod extractor;
pub mod project;

pub use csharp::CSharpExtractor;
pub use error::FrontendError;
pub use extractor::LanguageExtractor;
pub use project::{compile_sources, ProjectLoader, ProjectSources};
