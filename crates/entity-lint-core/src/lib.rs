//! # entity-lint-core
//!
//! Core framework for domain-entity architecture rules.
//!
//! This crate provides the language-neutral pieces every rule shares:
//!
//! - [`ProgramModel`] and friends: the already-parsed view of one compilation
//! - [`TypeIndex`] for semantic facts across a compilation set
//! - [`ScopeResolver`] for deciding which types a rule evaluates
//! - [`Rule`] trait with the uniform `analyze` contract
//! - [`Violation`], [`TypeAnalysisResult`] and [`CompilationResult`]
//! - [`Analyzer`] for running a rule set with configuration
//!
//! ## Example
//!
//! ```ignore
//! use entity_lint_core::{Analyzer, Config};
//!
//! let analyzer = Analyzer::builder()
//!     .config(Config::default())
//!     .rule(MyRule)
//!     .build()?;
//!
//! let report = analyzer.run(&compilations, Path::new("."));
//! report.print_report();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod index;
mod model;
mod rule;
mod scope;
mod types;

/// Utility modules for rule implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use index::{BaseLink, TypeIndex};
pub use model::{
    Accessibility, Accessor, AccessorKind, Assignment, Attribute, BinaryOperation, Body,
    CodeRegion, Compilations, Constructor, ConstructorInitializer, Field, InitializerKind,
    Invocation, Lock, MemberAccess, Method, Modifiers, ObjectCreation, Parameter, ProgramModel,
    Property, RegionKind, Throw, TypeConstraint, TypeDecl, TypeKind, TypeRef,
};
pub use rule::{analyze_with, Finding, Rule, RuleBox, RuleMeta, TypeContext};
pub use scope::{Scope, ScopeResolver, ScopeSettings};
pub use types::{
    AnalysisReport, CompilationResult, Location, RuleReport, Severity, Status,
    TypeAnalysisResult, Violation, ViolationDiagnostic,
};
