use linkwise_core::config::LoadOptions;
use linkwise_core::LinkAuditReport;

use crate::commands::{join_ids, to_pretty_json, CommandResult};
use crate::workspace::Workspace;

/// Distribution report; exits 0 whenever the inputs load, orphans included.
pub fn run(options: LoadOptions, json_output: bool) -> CommandResult {
    let workspace = match Workspace::bootstrap(options) {
        Ok(workspace) => workspace,
        Err(error) => return CommandResult::bootstrap_failure("audit", &error),
    };

    let report = workspace.auditor().run();

    if json_output {
        return CommandResult::rendered(0, to_pretty_json("audit", &report));
    }
    CommandResult::rendered(0, render_human(&report))
}

fn render_human(report: &LinkAuditReport) -> String {
    let mut lines = vec![format!(
        "link audit {} ({} items, generated {})",
        report.run_id,
        report.stats.item_count,
        report.generated_at.to_rfc3339()
    )];

    lines.push(format!(
        "- inbound links: total {}, mean {:.2}, std dev {:.2}, min {}, max {}",
        report.stats.total_links,
        report.stats.mean,
        report.stats.std_dev,
        report.stats.min,
        report.stats.max
    ));
    for source in &report.sources {
        lines.push(format!(
            "- source {}: {} edges ({} ignored)",
            source.name, source.edges, source.ignored
        ));
    }

    let buckets = &report.buckets;
    lines.push(format!("- orphan ({}): {}", buckets.orphan.len(), join_ids(&buckets.orphan)));
    lines.push(format!(
        "- underlinked ({}): {}",
        buckets.underlinked.len(),
        join_ids(&buckets.underlinked)
    ));
    lines.push(format!(
        "- well_linked ({}): {}",
        buckets.well_linked.len(),
        join_ids(&buckets.well_linked)
    ));
    lines.push(format!(
        "- overlinked ({}): {}",
        buckets.overlinked.len(),
        join_ids(&buckets.overlinked)
    ));
    if !buckets.severely_overlinked.is_empty() {
        lines.push(format!(
            "- severely over-linked: {}",
            join_ids(&buckets.severely_overlinked)
        ));
    }

    if !report.warnings.is_empty() {
        lines.push("warnings:".to_string());
        lines.extend(report.warnings.iter().map(|warning| format!("- {warning}")));
    }

    if !report.remediation.is_empty() {
        lines.push("remediation:".to_string());
        for entry in &report.remediation {
            lines.push(format!(
                "- {} ({} inbound, {}): link from {}",
                entry.item,
                entry.count,
                entry.bucket.as_str(),
                join_ids(&entry.suggested_sources)
            ));
        }
    }

    let verdict = if report.passed() { "pass" } else { "fail" };
    lines.push(format!("verdict: {verdict}"));
    lines.join("\n")
}
