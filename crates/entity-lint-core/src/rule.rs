//! Rule trait and the uniform analyze contract.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::index::TypeIndex;
use crate::model::{Compilations, ProgramModel, TypeDecl};
use crate::scope::{Scope, ScopeResolver, ScopeSettings};
use crate::types::{CompilationResult, Severity, TypeAnalysisResult, Violation};

/// Static description of a rule: identity, documentation and severity.
///
/// Every rule keeps one of these in a `static`, so the catalog can be listed
/// without running an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMeta {
    /// Short code, e.g. `DE001`.
    pub code: &'static str,
    /// Stable identifier, e.g. `DE001_SealedClass`. Matches [`Violation::rule`].
    pub name: &'static str,
    /// Human summary mentioning the core concept.
    pub description: &'static str,
    /// Relative path of the architecture decision record.
    pub adr: &'static str,
    /// Severity of every violation the rule reports.
    pub severity: Severity,
}

impl RuleMeta {
    /// Metadata with [`Severity::Error`].
    #[must_use]
    pub const fn new(
        code: &'static str,
        name: &'static str,
        description: &'static str,
        adr: &'static str,
    ) -> Self {
        Self {
            code,
            name,
            description,
            adr,
            severity: Severity::Error,
        }
    }

    /// Overrides the severity.
    #[must_use]
    pub const fn with_severity(self, severity: Severity) -> Self {
        Self { severity, ..self }
    }
}

/// What a rule found wrong with one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Message naming the offending identifier and the violated convention.
    pub message: String,
    /// Remediation hint for automated fixers.
    pub llm_hint: String,
}

impl Finding {
    /// Creates a finding.
    #[must_use]
    pub fn new(message: impl Into<String>, llm_hint: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            llm_hint: llm_hint.into(),
        }
    }
}

/// Everything a rule may consult while checking one in-scope type.
#[derive(Debug, Clone, Copy)]
pub struct TypeContext<'a> {
    /// The type under inspection.
    pub decl: &'a TypeDecl,
    /// The compilation declaring it.
    pub model: &'a ProgramModel,
    /// Semantic facts across the whole compilation set.
    pub index: &'a TypeIndex<'a>,
    /// Marker names in use.
    pub settings: &'a ScopeSettings,
    /// Analysis root, for diagnostic paths only.
    pub base_path: &'a Path,
}

impl<'a> TypeContext<'a> {
    /// Compilation name.
    #[must_use]
    pub fn project(&self) -> &'a str {
        &self.model.name
    }

    /// Scope resolver over the same index and settings.
    #[must_use]
    pub fn resolver(&self) -> ScopeResolver<'a> {
        ScopeResolver::new(self.index, self.settings)
    }
}

/// A domain-entity rule.
///
/// Implementors supply [`Rule::meta`] and a per-type predicate
/// [`Rule::check_type`]; scope filtering and result aggregation come from
/// the default [`Rule::analyze`].
///
/// # Example
///
/// ```ignore
/// use entity_lint_core::{Finding, Rule, RuleMeta, TypeContext};
///
/// static META: RuleMeta = RuleMeta::new(
///     "DE001",
///     "DE001_SealedClass",
///     "Classes without subclasses must be sealed",
///     "docs/adrs/domain-entities/DE-001-sealed-class.md",
/// );
///
/// pub struct SealedClass;
///
/// impl Rule for SealedClass {
///     fn meta(&self) -> &'static RuleMeta { &META }
///
///     fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
///         (!ctx.decl.is_sealed()).then(|| Finding::new("...", "..."))
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Static metadata.
    fn meta(&self) -> &'static RuleMeta;

    /// Stable identifier, e.g. `DE001_SealedClass`.
    fn name(&self) -> &'static str {
        self.meta().name
    }

    /// Short code, e.g. `DE001`.
    fn code(&self) -> &'static str {
        self.meta().code
    }

    /// Human summary.
    fn description(&self) -> &'static str {
        self.meta().description
    }

    /// Severity of reported violations.
    fn default_severity(&self) -> Severity {
        self.meta().severity
    }

    /// ADR document path.
    fn adr_path(&self) -> &'static str {
        self.meta().adr
    }

    /// Which types the rule evaluates.
    fn scope(&self) -> Scope {
        Scope::Entity
    }

    /// Checks one in-scope type; `None` means it passes.
    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding>;

    /// Evaluates every compilation with default scope settings.
    ///
    /// Returns one [`CompilationResult`] per compilation in name order, each
    /// holding one verdict per declared type. Types outside [`Rule::scope`]
    /// pass.
    fn analyze(&self, compilations: &Compilations, base_path: &Path) -> Vec<CompilationResult> {
        let index = TypeIndex::new(compilations);
        analyze_with(
            self,
            compilations,
            &index,
            &ScopeSettings::default(),
            base_path,
        )
    }
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

/// Runs `rule` against a prepared index and settings.
pub fn analyze_with<R: Rule + ?Sized>(
    rule: &R,
    compilations: &Compilations,
    index: &TypeIndex<'_>,
    settings: &ScopeSettings,
    base_path: &Path,
) -> Vec<CompilationResult> {
    let resolver = ScopeResolver::new(index, settings);
    let scope = rule.scope();

    compilations
        .iter()
        .map(|(project, model)| {
            let types = model.all_types();
            let mut name_counts: HashMap<String, usize> = HashMap::new();
            for decl in &types {
                *name_counts.entry(decl.display_name()).or_default() += 1;
            }
            let results = types
                .into_iter()
                .map(|decl| {
                    let result = if resolver.in_scope(decl, scope) {
                        check(rule, project, decl, model, index, settings, base_path)
                    } else {
                        TypeAnalysisResult::passed(decl)
                    };
                    if name_counts[&decl.display_name()] > 1 {
                        result.qualified()
                    } else {
                        result
                    }
                })
                .collect();
            CompilationResult::new(project.clone(), results)
        })
        .collect()
}

fn check<R: Rule + ?Sized>(
    rule: &R,
    project: &str,
    decl: &TypeDecl,
    model: &ProgramModel,
    index: &TypeIndex<'_>,
    settings: &ScopeSettings,
    base_path: &Path,
) -> TypeAnalysisResult {
    let ctx = TypeContext {
        decl,
        model,
        index,
        settings,
        base_path,
    };
    match rule.check_type(&ctx) {
        Some(finding) => {
            debug!(rule = rule.name(), type_name = %decl.full_name(), "failed");
            let violation = Violation::from_finding(rule.meta(), project, finding);
            TypeAnalysisResult::failed(decl, violation)
        }
        None => TypeAnalysisResult::passed(decl),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Modifiers, TypeKind, TypeRef};
    use crate::types::Status;

    static META: RuleMeta = RuleMeta::new(
        "TEST001",
        "TEST001_Sealed",
        "Entities must be sealed",
        "docs/adrs/test.md",
    );

    struct MustBeSealed;

    impl Rule for MustBeSealed {
        fn meta(&self) -> &'static RuleMeta {
            &META
        }

        fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
            (!ctx.decl.is_sealed()).then(|| {
                Finding::new(
                    format!("Class '{}' should be sealed", ctx.decl.name),
                    "add sealed",
                )
            })
        }
    }

    fn sample() -> Compilations {
        let entity = |name: &str, modifiers: &[&str]| TypeDecl {
            modifiers: Modifiers::new(modifiers.iter().copied()),
            bases: vec![TypeRef::new(&format!("EntityBase<{name}>"))],
            ..TypeDecl::new(name, TypeKind::Class)
        };
        let mut set = Compilations::new();
        set.insert(
            "Crm".into(),
            ProgramModel::from_declarations(
                "Crm",
                vec![
                    entity("Customer", &["public"]),
                    entity("Lead", &["public", "sealed"]),
                    TypeDecl::new("ICustomer", TypeKind::Interface),
                ],
            ),
        );
        set
    }

    #[test]
    fn metadata_defaults() {
        let rule = MustBeSealed;
        assert_eq!(rule.name(), "TEST001_Sealed");
        assert_eq!(rule.code(), "TEST001");
        assert_eq!(rule.default_severity(), Severity::Error);
        assert_eq!(rule.scope(), Scope::Entity);
        assert_eq!(
            META.with_severity(Severity::Warning).severity,
            Severity::Warning
        );
    }

    #[test]
    fn analyze_reports_every_type_once() {
        let results = MustBeSealed.analyze(&sample(), Path::new("."));
        assert_eq!(results.len(), 1);
        let crm = &results[0];
        assert_eq!(crm.project, "Crm");
        assert_eq!(crm.results.len(), 3);
        assert_eq!(crm.status_of("Customer"), Some(Status::Failed));
        assert_eq!(crm.status_of("Lead"), Some(Status::Passed));
        assert_eq!(crm.status_of("ICustomer"), Some(Status::Passed));

        let violation = crm
            .get("Customer")
            .and_then(TypeAnalysisResult::violation)
            .expect("violation");
        assert_eq!(violation.rule, MustBeSealed.name());
        assert_eq!(violation.project, "Crm");
        assert_eq!(violation.adr, "docs/adrs/test.md");
    }

    #[test]
    fn colliding_names_are_reported_qualified() {
        let order = |namespace: &str, modifiers: &[&str]| TypeDecl {
            namespace: Some(namespace.into()),
            modifiers: Modifiers::new(modifiers.iter().copied()),
            bases: vec![TypeRef::new("EntityBase<Order>")],
            ..TypeDecl::new("Order", TypeKind::Class)
        };
        let mut set = Compilations::new();
        set.insert(
            "Shop".into(),
            ProgramModel::from_declarations(
                "Shop",
                vec![order("Sales", &["public"]), order("Billing", &["public", "sealed"])],
            ),
        );
        let results = MustBeSealed.analyze(&set, Path::new("."));
        let shop = &results[0];
        assert_eq!(shop.results[0].type_name(), "Sales.Order");
        assert_eq!(shop.status_of("Sales.Order"), Some(Status::Failed));
        assert_eq!(shop.status_of("Billing.Order"), Some(Status::Passed));
        assert_eq!(shop.status_of("Order"), None);
    }

    #[test]
    fn analyze_is_deterministic() {
        let set = sample();
        let first = MustBeSealed.analyze(&set, Path::new("."));
        let second = MustBeSealed.analyze(&set, Path::new("."));
        assert_eq!(first, second);
    }
}
