//! List rules command implementation.

use anyhow::Result;
use entity_lint_core::{RuleBox, Severity};
use entity_lint_rules::{all_rules, Family};
use serde::Serialize;
use std::fmt::Write as _;

use crate::OutputFormat;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RuleEntry {
    code: &'static str,
    name: &'static str,
    family: &'static str,
    severity: Severity,
    adr: &'static str,
    description: &'static str,
}

impl From<&RuleBox> for RuleEntry {
    fn from(rule: &RuleBox) -> Self {
        Self {
            code: rule.code(),
            name: rule.name(),
            family: Family::of(rule.code()).map_or("", Family::name),
            severity: rule.default_severity(),
            adr: rule.adr_path(),
            description: rule.description(),
        }
    }
}

/// Runs the list-rules command.
pub fn run(format: OutputFormat) -> Result<()> {
    let rules = all_rules();
    match format {
        OutputFormat::Json => {
            let entries: Vec<RuleEntry> = rules.iter().map(RuleEntry::from).collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Text | OutputFormat::Compact => print!("{}", render_text(&rules)),
    }
    Ok(())
}

fn render_text(rules: &[RuleBox]) -> String {
    let mut out = String::from("Available rules:\n");
    for family in Family::ALL {
        let _ = writeln!(out, "\n[{}]", family.name());
        for rule in rules.iter().filter(|r| Family::of(r.code()) == Some(family)) {
            let _ = writeln!(
                out,
                "{:<6} {:<45} {:<8} {}",
                rule.code(),
                rule.name(),
                rule.default_severity().to_string(),
                rule.description()
            );
            let _ = writeln!(out, "{:<6} {}", "", rule.adr_path());
        }
    }
    out.push_str("\nUse --rules to run a subset, e.g.:\n");
    out.push_str("  entity-lint check --rules DE001,DE008_NoVoidMutations\n");
    out.push_str("Disable a rule in entity-lint.toml with [rules.DE028_NoAsyncMembers] enabled = false\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_groups_every_rule_under_its_family() {
        let rules = all_rules();
        let out = render_text(&rules);
        for rule in &rules {
            assert!(out.contains(rule.name()), "{}", rule.name());
        }
        let returns = out.find("[returns]").unwrap();
        let void = out.find("DE008_NoVoidMutations").unwrap();
        let validation = out.find("[validation]").unwrap();
        assert!(returns < void && void < validation);
        assert!(out.contains("warning"));
    }

    #[test]
    fn json_entry_shape() {
        let rules = all_rules();
        let entry = RuleEntry::from(&rules[0]);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["code"], "DE001");
        assert_eq!(json["name"], "DE001_SealedClass");
        assert_eq!(json["family"], "class shape");
        assert_eq!(json["severity"], "error");
        assert_eq!(json["adr"], "docs/adrs/domain-entities/DE-001-sealed-class.md");
    }
}
