use linkwise_core::config::LoadOptions;
use linkwise_core::{AuditVerdict, ItemId};
use serde::Serialize;

use crate::commands::{join_ids, to_pretty_json, CommandResult};
use crate::workspace::Workspace;

#[derive(Debug, Serialize)]
struct ValidationOutcome {
    command: &'static str,
    status: &'static str,
    verdict: AuditVerdict,
    orphans: Vec<ItemId>,
    underlinked: Vec<ItemId>,
    severely_overlinked: Vec<ItemId>,
    warnings: Vec<String>,
    message: String,
}

/// Exit 0 when no item is an orphan, 1 otherwise.
pub fn run(options: LoadOptions, json_output: bool) -> CommandResult {
    let workspace = match Workspace::bootstrap(options) {
        Ok(workspace) => workspace,
        Err(error) => return CommandResult::bootstrap_failure("validate", &error),
    };

    let report = workspace.auditor().run();
    let passed = report.passed();
    let exit_code = if passed { 0 } else { 1 };
    let message = if passed {
        format!("no orphan items among {} catalog items", report.stats.item_count)
    } else {
        format!(
            "{} orphan item(s) below {} inbound links",
            report.orphans().len(),
            report.thresholds.orphan
        )
    };

    if json_output {
        let outcome = ValidationOutcome {
            command: "validate",
            status: if passed { "ok" } else { "failed" },
            verdict: report.verdict,
            orphans: report.buckets.orphan.clone(),
            underlinked: report.buckets.underlinked.clone(),
            severely_overlinked: report.buckets.severely_overlinked.clone(),
            warnings: report.warnings.iter().map(ToString::to_string).collect(),
            message,
        };
        return CommandResult::rendered(exit_code, to_pretty_json("validate", &outcome));
    }

    let mut lines = vec![format!("validate: {message}")];
    lines.push(format!("- orphans: {}", join_ids(report.orphans())));
    lines.push(format!("- underlinked: {}", join_ids(&report.buckets.underlinked)));
    lines.extend(report.warnings.iter().map(|warning| format!("- warning: {warning}")));
    lines.push(format!("verdict: {}", if passed { "pass" } else { "fail" }));
    CommandResult::rendered(exit_code, lines.join("\n"))
}
