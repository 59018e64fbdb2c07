use linkwise_core::config::LoadOptions;
use linkwise_core::{ItemId, ScoreFactor, ScoredCandidate};
use serde::Serialize;
use tracing::info;

use crate::commands::{to_pretty_json, CommandResult};
use crate::workspace::Workspace;

#[derive(Debug, Clone, Default)]
pub struct RelatedArgs {
    pub id: String,
    pub count: Option<usize>,
    pub exclude: Vec<String>,
    pub explain: bool,
    /// Replace seeded link counts with audited ones before selecting.
    pub recompute: bool,
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct RelatedOutcome<'a> {
    command: &'static str,
    status: &'static str,
    source: &'a ItemId,
    count: usize,
    related: Vec<&'a ItemId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    explanations: Option<&'a [ScoredCandidate]>,
}

pub fn run(options: LoadOptions, args: RelatedArgs) -> CommandResult {
    let (source, exclude) = match parse_ids(&args) {
        Ok(parsed) => parsed,
        Err(error) => {
            return CommandResult::failure("related", "invalid_argument", error.to_string(), 2)
        }
    };

    let workspace = match Workspace::bootstrap(options) {
        Ok(workspace) => workspace,
        Err(error) => return CommandResult::bootstrap_failure("related", &error),
    };

    if args.recompute {
        let report = workspace.auditor().run();
        report.apply_to(&workspace.tracker);
        info!(
            event_name = "linking.tracker.recomputed",
            run_id = %report.run_id,
            items = workspace.tracker.len(),
            "link counts replaced with audited inbound counts"
        );
    }

    let count = args.count.unwrap_or_else(|| workspace.selector.default_count());
    let candidates = workspace.selector.explain(&source, Some(count), &exclude);

    if args.json {
        let outcome = RelatedOutcome {
            command: "related",
            status: "ok",
            source: &source,
            count,
            related: candidates.iter().map(|candidate| &candidate.id).collect(),
            explanations: args.explain.then_some(candidates.as_slice()),
        };
        return CommandResult::rendered(0, to_pretty_json("related", &outcome));
    }

    CommandResult::rendered(0, render_human(&source, &candidates, args.explain))
}

fn parse_ids(args: &RelatedArgs) -> Result<(ItemId, Vec<ItemId>), linkwise_core::DomainError> {
    let source = ItemId::parse(&args.id)?;
    let exclude =
        args.exclude.iter().map(|raw| ItemId::parse(raw)).collect::<Result<Vec<_>, _>>()?;
    Ok((source, exclude))
}

fn render_human(source: &ItemId, candidates: &[ScoredCandidate], explain: bool) -> String {
    if candidates.is_empty() {
        return format!("no related tools for {source}");
    }

    let mut lines = vec![format!("related tools for {source}:")];
    for (rank, candidate) in candidates.iter().enumerate() {
        if explain {
            lines.push(format!(
                "{}. {} (score {:.1}: {})",
                rank + 1,
                candidate.id,
                candidate.score,
                describe(&candidate.reasons)
            ));
        } else {
            lines.push(format!("{}. {}", rank + 1, candidate.id));
        }
    }
    lines.join("\n")
}

fn describe(reasons: &[ScoreFactor]) -> String {
    reasons.iter().map(ScoreFactor::description).collect::<Vec<_>>().join(", ")
}
