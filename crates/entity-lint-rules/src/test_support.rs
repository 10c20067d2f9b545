//! Helpers for rule tests: compile C# snippets and run one rule over them.

use std::path::Path;

use entity_lint_core::{CompilationResult, Compilations, Rule, Status, Violation};
use entity_lint_csharp::compile_sources;

/// Self-constrained marker base every test entity derives from.
pub(crate) const ENTITY_BASE: &str =
    "public abstract class EntityBase<T> where T : EntityBase<T> { }";

/// Compiles `source` (plus [`ENTITY_BASE`]) as project `Domain` and runs `rule`.
pub(crate) fn analyze(rule: &dyn Rule, source: &str) -> CompilationResult {
    let model = compile_sources("Domain", &[("EntityBase.cs", ENTITY_BASE), ("Test.cs", source)])
        .expect("snippet should parse");
    let mut compilations = Compilations::new();
    compilations.insert("Domain".to_string(), model);

    let mut results = rule.analyze(&compilations, Path::new("."));
    assert_eq!(results.len(), 1);
    results.remove(0)
}

/// Status of `type_name`, which must be declared in `source`.
pub(crate) fn status_of(rule: &dyn Rule, source: &str, type_name: &str) -> Status {
    analyze(rule, source)
        .status_of(type_name)
        .unwrap_or_else(|| panic!("type {type_name} not reported"))
}

/// Violation reported for `type_name`; panics when it passed.
pub(crate) fn violation_of(rule: &dyn Rule, source: &str, type_name: &str) -> Violation {
    let result = analyze(rule, source);
    let verdict = result
        .get(type_name)
        .unwrap_or_else(|| panic!("type {type_name} not reported"));
    let violation = verdict
        .violation()
        .unwrap_or_else(|| panic!("type {type_name} unexpectedly passed"))
        .clone();
    assert_eq!(violation.rule, rule.name());
    violation
}
