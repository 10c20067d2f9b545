//! Core types for violations and analysis results.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::model::TypeDecl;
use crate::rule::{Finding, RuleMeta};

/// Severity level for violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail a build.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to the analysis root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl Location {
    /// Creates a new location.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

/// A rule failure attached to one type.
///
/// The serialized shape (`rule`, `message`, `severity`, `adr`, `project`,
/// `llmHint`) is consumed by external tooling and must stay stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// Rule name, e.g. `DE001_SealedClass`.
    pub rule: String,
    /// Human-readable message naming the offending identifier.
    pub message: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Relative path of the architecture decision record.
    pub adr: String,
    /// Compilation the violating type belongs to.
    pub project: String,
    /// Remediation hint for automated fixers.
    pub llm_hint: String,
}

impl Violation {
    /// Creates a new violation without a hint.
    #[must_use]
    pub fn new(
        rule: impl Into<String>,
        severity: Severity,
        adr: impl Into<String>,
        project: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule: rule.into(),
            message: message.into(),
            severity,
            adr: adr.into(),
            project: project.into(),
            llm_hint: String::new(),
        }
    }

    /// Builds the violation a rule reports for `finding`.
    #[must_use]
    pub fn from_finding(meta: &RuleMeta, project: &str, finding: Finding) -> Self {
        Self::new(meta.name, meta.severity, meta.adr, project, finding.message)
            .with_llm_hint(finding.llm_hint)
    }

    /// Sets the remediation hint.
    #[must_use]
    pub fn with_llm_hint(mut self, hint: impl Into<String>) -> Self {
        self.llm_hint = hint.into();
        self
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!("{} in {}\n", self.rule, self.project);
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        if !self.llm_hint.is_empty() {
            let _ = writeln!(output, "  = hint: {}", self.llm_hint);
        }
        let _ = writeln!(output, "  = see: {}", self.adr);
        output
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} [{}] {} (see: {})",
            self.project, self.severity, self.rule, self.message, self.adr
        )
    }
}

/// A violation rendered as a miette diagnostic: the rule name is the code,
/// the hint is the help text and the ADR is the url.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ViolationDiagnostic {
    code: String,
    message: String,
    help: Option<String>,
    url: String,
    severity: Severity,
}

impl Diagnostic for ViolationDiagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.code))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.severity {
            Severity::Error => miette::Severity::Error,
            Severity::Warning => miette::Severity::Warning,
            Severity::Info => miette::Severity::Advice,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }

    fn url<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.url))
    }
}

impl From<&Violation> for ViolationDiagnostic {
    fn from(v: &Violation) -> Self {
        Self {
            code: v.rule.clone(),
            message: format!("{} ({})", v.message, v.project),
            help: (!v.llm_hint.is_empty()).then(|| v.llm_hint.clone()),
            url: v.adr.clone(),
            severity: v.severity,
        }
    }
}

/// Verdict for one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The type satisfies the rule or is outside its scope.
    Passed,
    /// The type violates the rule.
    Failed,
}

/// Result of evaluating one rule against one type.
///
/// `Failed` always carries a violation and `Passed` never does; the
/// constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeAnalysisResult {
    type_name: String,
    full_name: String,
    status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    violation: Option<Violation>,
    location: Location,
}

impl TypeAnalysisResult {
    /// A passing verdict.
    #[must_use]
    pub fn passed(decl: &TypeDecl) -> Self {
        Self {
            type_name: decl.display_name(),
            full_name: decl.full_name(),
            status: Status::Passed,
            violation: None,
            location: decl.location.clone(),
        }
    }

    /// A failing verdict carrying its violation.
    #[must_use]
    pub fn failed(decl: &TypeDecl, violation: Violation) -> Self {
        Self {
            type_name: decl.display_name(),
            full_name: decl.full_name(),
            status: Status::Failed,
            violation: Some(violation),
            location: decl.location.clone(),
        }
    }

    /// Switches the reported name to the namespace-qualified one.
    pub(crate) fn qualified(mut self) -> Self {
        self.type_name.clone_from(&self.full_name);
        self
    }

    /// Type name, unique within its compilation (`Outer.Inner` for nested
    /// types, the namespace-qualified name when two namespaces declare it).
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Namespace-qualified type name.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// The verdict.
    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    /// The violation for failed verdicts.
    #[must_use]
    pub fn violation(&self) -> Option<&Violation> {
        self.violation.as_ref()
    }

    /// Where the type is declared.
    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// `true` for failed verdicts.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.status == Status::Failed
    }
}

/// Per-compilation verdicts from one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationResult {
    /// Compilation (project/assembly) name.
    pub project: String,
    /// One verdict per declared type, in declaration order.
    pub results: Vec<TypeAnalysisResult>,
}

impl CompilationResult {
    /// Creates a result set for a compilation.
    #[must_use]
    pub fn new(project: impl Into<String>, results: Vec<TypeAnalysisResult>) -> Self {
        Self {
            project: project.into(),
            results,
        }
    }

    /// Verdict for the named type.
    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<&TypeAnalysisResult> {
        self.results
            .iter()
            .find(|r| r.type_name == type_name)
            .or_else(|| self.results.iter().find(|r| r.full_name == type_name))
    }

    /// Status of the named type.
    #[must_use]
    pub fn status_of(&self, type_name: &str) -> Option<Status> {
        self.get(type_name).map(TypeAnalysisResult::status)
    }

    /// Failed verdicts.
    pub fn failures(&self) -> impl Iterator<Item = &TypeAnalysisResult> {
        self.results.iter().filter(|r| r.is_failed())
    }

    /// Violations of failed verdicts.
    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.results.iter().filter_map(TypeAnalysisResult::violation)
    }
}

/// Everything one rule produced over a compilation set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleReport {
    /// Rule name.
    pub rule: String,
    /// Rule code.
    pub code: String,
    /// Per-compilation verdicts.
    pub results: Vec<CompilationResult>,
}

impl RuleReport {
    /// Creates a report for `meta`.
    #[must_use]
    pub fn new(meta: &RuleMeta, results: Vec<CompilationResult>) -> Self {
        Self {
            rule: meta.name.to_string(),
            code: meta.code.to_string(),
            results,
        }
    }
}

/// Result of running a rule set.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// One report per executed rule, in registration order.
    pub rules: Vec<RuleReport>,
    /// Number of compilations analysed.
    pub compilations: usize,
    /// Number of declared types seen.
    pub types_checked: usize,
}

impl AnalysisReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All violations in rule, then compilation, then declaration order.
    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.rules
            .iter()
            .flat_map(|r| &r.results)
            .flat_map(CompilationResult::violations)
    }

    /// Failed verdicts with their location.
    pub fn failures(&self) -> impl Iterator<Item = &TypeAnalysisResult> {
        self.rules
            .iter()
            .flat_map(|r| &r.results)
            .flat_map(CompilationResult::failures)
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.violations().any(|v| v.severity == Severity::Error)
    }

    /// Checks if any violations meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations().any(|v| v.severity >= severity)
    }

    /// Counts violations by severity as `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        self.violations()
            .fold((0, 0, 0), |(e, w, i), v| match v.severity {
                Severity::Error => (e + 1, w, i),
                Severity::Warning => (e, w + 1, i),
                Severity::Info => (e, w, i + 1),
            })
    }

    /// Prints a summary report to stdout.
    pub fn print_report(&self) {
        for violation in self.violations() {
            println!("{}", violation.format());
        }
        println!("\n{}", self.summary());
    }

    /// One-line summary, e.g. `Found 2 error(s), 0 warning(s), 0 info(s) in 3 type(s)`.
    #[must_use]
    pub fn summary(&self) -> String {
        let (errors, warnings, infos) = self.count_by_severity();
        format!(
            "Found {errors} error(s), {warnings} warning(s), {infos} info(s) in {} type(s) across {} compilation(s)",
            self.types_checked, self.compilations
        )
    }

    /// Formats violations at or above `fail_on` as a multi-line report.
    #[must_use]
    pub fn format_test_report(&self, fail_on: Severity) -> String {
        use std::fmt::Write;

        let failing: Vec<&Violation> = self
            .violations()
            .filter(|v| v.severity >= fail_on)
            .collect();

        let mut report = String::new();
        let _ = writeln!(
            report,
            "\n=== entity-lint: {} violation(s) ===\n",
            failing.len()
        );
        for v in &failing {
            let _ = writeln!(report, "{}", v.format());
        }
        let _ = writeln!(report, "{}", self.summary());
        report
    }
}
