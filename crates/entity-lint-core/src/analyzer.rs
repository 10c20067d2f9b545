//! Core analyzer for running a rule set over a compilation set.

use crate::config::{Config, RuleConfig};
use crate::index::TypeIndex;
use crate::model::Compilations;
use crate::rule::{analyze_with, Rule, RuleBox};
use crate::types::{AnalysisReport, RuleReport};

use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while building an analyzer.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Configuration names a rule that is not registered.
    #[error("Unknown rule in configuration: {name}")]
    UnknownRule {
        /// The unmatched name or code.
        name: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    rules: Vec<RuleBox>,
    config: Option<Config>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds several boxed rules.
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = RuleBox>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::UnknownRule`] if a `[rules.*]` entry matches
    /// neither the name nor the code of a registered rule.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();

        if let Some(unknown) = config.rules.keys().find(|key| {
            !self
                .rules
                .iter()
                .any(|r| r.name() == key.as_str() || r.code() == key.as_str())
        }) {
            return Err(AnalyzerError::UnknownRule {
                name: unknown.clone(),
            });
        }

        Ok(Analyzer {
            rules: self.rules,
            config,
        })
    }
}

/// The main analyzer that orchestrates rule execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    rules: Vec<RuleBox>,
    config: Config,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Registered rules in execution order.
    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|r| &**r)
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs every enabled rule over `compilations`.
    pub fn run(&self, compilations: &Compilations, base_path: &Path) -> AnalysisReport {
        let index = TypeIndex::new(compilations);
        info!(
            "Analyzing {} compilation(s), {} type(s) with {} rule(s)",
            compilations.len(),
            index.len(),
            self.rules.len()
        );

        let mut report = AnalysisReport {
            compilations: compilations.len(),
            types_checked: index.len(),
            ..AnalysisReport::new()
        };

        for rule in &self.rules {
            if !self.config.is_rule_enabled(rule.name(), rule.code()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }
            debug!("Running rule: {}", rule.name());
            let results = analyze_with(
                &**rule,
                compilations,
                &index,
                &self.config.scope,
                base_path,
            );
            report.rules.push(RuleReport::new(rule.meta(), results));
        }

        let (errors, warnings, infos) = report.count_by_severity();
        info!(
            "Analysis complete: {} error(s), {} warning(s), {} info(s)",
            errors, warnings, infos
        );
        report
    }

    /// Gets the configuration entry for a rule, looked up by name then code.
    #[must_use]
    pub fn rule_config(&self, rule: &dyn Rule) -> Option<&RuleConfig> {
        self.config
            .rules
            .get(rule.name())
            .or_else(|| self.config.rules.get(rule.code()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Modifiers, ProgramModel, TypeDecl, TypeKind, TypeRef};
    use crate::rule::{Finding, RuleMeta, TypeContext};
    use crate::types::Severity;

    static SEALED: RuleMeta =
        RuleMeta::new("T001", "T001_Sealed", "Entities must be sealed", "docs/t001.md");
    static NAMED: RuleMeta = RuleMeta::new(
        "T002",
        "T002_Named",
        "Entity names must not end in Impl",
        "docs/t002.md",
    )
    .with_severity(Severity::Warning);

    struct Sealed;
    impl Rule for Sealed {
        fn meta(&self) -> &'static RuleMeta {
            &SEALED
        }
        fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
            (!ctx.decl.is_sealed()).then(|| Finding::new("not sealed", "seal"))
        }
    }

    struct Named;
    impl Rule for Named {
        fn meta(&self) -> &'static RuleMeta {
            &NAMED
        }
        fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
            ctx.decl
                .name
                .ends_with("Impl")
                .then(|| Finding::new("bad name", "rename"))
        }
    }

    fn sample() -> Compilations {
        let decl = TypeDecl {
            modifiers: Modifiers::new(["public"]),
            bases: vec![TypeRef::new("EntityBase<OrderImpl>")],
            ..TypeDecl::new("OrderImpl", TypeKind::Class)
        };
        let mut set = Compilations::new();
        set.insert(
            "Sales".into(),
            ProgramModel {
                name: "Sales".into(),
                types: vec![decl],
            },
        );
        set
    }

    #[test]
    fn runs_all_rules() {
        let analyzer = Analyzer::builder()
            .rule(Sealed)
            .rule(Named)
            .build()
            .expect("build");
        let report = analyzer.run(&sample(), Path::new("."));
        assert_eq!(report.rules.len(), 2);
        assert_eq!(report.count_by_severity(), (1, 1, 0));
        assert_eq!(report.types_checked, 1);
    }

    #[test]
    fn disabled_rules_are_skipped_by_code() {
        let config = Config::parse("[rules.T001]\nenabled = false\n").expect("parse");
        let analyzer = Analyzer::builder()
            .rule(Sealed)
            .rule(Named)
            .config(config)
            .build()
            .expect("build");
        let report = analyzer.run(&sample(), Path::new("."));
        assert_eq!(report.rules.len(), 1);
        assert_eq!(report.rules[0].rule, "T002_Named");
        assert!(!report.has_errors());
        assert!(analyzer.rule_config(&Sealed).is_some());
    }

    #[test]
    fn unknown_rule_fails_build() {
        let config = Config::parse("[rules.DE999_Missing]\nenabled = true\n").expect("parse");
        let result = Analyzer::builder().rule(Sealed).config(config).build();
        assert!(matches!(
            result,
            Err(AnalyzerError::UnknownRule { ref name }) if name == "DE999_Missing"
        ));
    }
}
