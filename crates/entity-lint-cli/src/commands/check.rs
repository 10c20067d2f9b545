//! Check command implementation.

use anyhow::{bail, Context, Result};
use entity_lint_core::{Analyzer, Config, RuleBox};
use entity_lint_csharp::ProjectLoader;
use entity_lint_rules::{all_rules, find_rule, select_rules};
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the check command.
pub fn run(
    path: &Path,
    format: OutputFormat,
    rules_filter: Option<String>,
    exclude: Vec<String>,
    source: &ConfigSource,
) -> Result<()> {
    let mut config = load_config(source)?;

    let rules = match rules_filter {
        Some(filter) => {
            let ids: Vec<&str> = filter
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .collect();
            select_rules(&ids)
        }
        None => all_rules(),
    };
    if rules.is_empty() {
        bail!("No rules selected. Run `entity-lint list-rules` to see the catalog.");
    }
    restrict_rule_config(&mut config, &rules)?;

    // `[analyzer] root` applies only when no path was given
    let root = if path == Path::new(".") {
        config.analyzer.root.clone()
    } else {
        path.to_path_buf()
    };

    let mut patterns = config.analyzer.exclude.clone();
    patterns.extend(exclude);
    let loader = ProjectLoader::new(&root)
        .exclude(&patterns)
        .context("Invalid exclude pattern")?
        .respect_gitignore(config.analyzer.respect_gitignore);
    let compilations = loader
        .load()
        .with_context(|| format!("Failed to load C# sources under {}", root.display()))?;
    if compilations.is_empty() {
        tracing::warn!("No C# sources found under {}", root.display());
    }

    let analyzer = Analyzer::builder()
        .rules(rules)
        .config(config)
        .build()
        .context("Failed to build analyzer")?;

    tracing::info!("Analyzing {:?} with {} rules", root, analyzer.rule_count());

    let report = analyzer.run(&compilations, &root);

    super::output::print(&report, format)?;

    if report.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

fn load_config(source: &ConfigSource) -> Result<Config> {
    let Some(p) = source.path() else {
        return Ok(Config::default());
    };
    if source.is_global() {
        tracing::info!("Using global config: {}", p.display());
    }
    Config::from_file(p).with_context(|| format!("Failed to load config: {}", p.display()))
}

/// Rejects `[rules.*]` entries outside the catalog and drops entries for
/// rules the `--rules` filter left out.
fn restrict_rule_config(config: &mut Config, selected: &[RuleBox]) -> Result<()> {
    if let Some(unknown) = config.rules.keys().find(|key| find_rule(key).is_none()) {
        bail!("Unknown rule in configuration: {unknown}");
    }
    config.rules.retain(|key, _| {
        selected
            .iter()
            .any(|r| r.name() == key.as_str() || r.code() == key.as_str())
    });
    Ok(())
}
