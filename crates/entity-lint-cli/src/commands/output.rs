//! Shared output formatting for analysis reports.

use anyhow::Result;
use entity_lint_core::{AnalysisReport, Location, Violation, ViolationDiagnostic};
use miette::GraphicalReportHandler;
use serde::Serialize;
use std::fmt::Write as _;

use crate::OutputFormat;

/// Print an analysis report in the specified format.
pub fn print(report: &AnalysisReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            let handler = GraphicalReportHandler::new().with_links(false);
            print!("{}", render_text(report, &handler)?);
        }
        OutputFormat::Json => println!("{}", render_json(report)?),
        OutputFormat::Compact => print!("{}", render_compact(report)),
    }
    Ok(())
}

fn render_text(report: &AnalysisReport, handler: &GraphicalReportHandler) -> Result<String> {
    let mut out = String::new();
    for failure in report.failures() {
        let Some(violation) = failure.violation() else {
            continue;
        };
        let location = failure.location();
        writeln!(
            out,
            "{}:{}:{} {}",
            location.file.display(),
            location.line,
            location.column,
            failure.full_name()
        )?;
        handler.render_report(&mut out, &ViolationDiagnostic::from(violation))?;
        out.push('\n');
    }
    writeln!(out, "{}", report.summary())?;
    Ok(out)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonViolation<'a> {
    #[serde(flatten)]
    violation: &'a Violation,
    type_name: &'a str,
    location: &'a Location,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    violations: Vec<JsonViolation<'a>>,
    errors: usize,
    warnings: usize,
    infos: usize,
    types_checked: usize,
    compilations: usize,
}

fn render_json(report: &AnalysisReport) -> Result<String> {
    let violations = report
        .failures()
        .filter_map(|f| {
            Some(JsonViolation {
                violation: f.violation()?,
                type_name: f.type_name(),
                location: f.location(),
            })
        })
        .collect();
    let (errors, warnings, infos) = report.count_by_severity();
    let json = JsonReport {
        violations,
        errors,
        warnings,
        infos,
        types_checked: report.types_checked,
        compilations: report.compilations,
    };
    Ok(serde_json::to_string_pretty(&json)?)
}

fn render_compact(report: &AnalysisReport) -> String {
    report
        .failures()
        .filter_map(|f| {
            let v = f.violation()?;
            let location = f.location();
            Some(format!(
                "{}:{}:{}: {} [{}] {}\n",
                location.file.display(),
                location.line,
                location.column,
                v.severity,
                v.rule,
                v.message,
            ))
        })
        .collect()
}
