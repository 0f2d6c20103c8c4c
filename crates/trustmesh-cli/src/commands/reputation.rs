//! `trustmesh reputation` — Compute a subject's reputation from an
//! attestation export (JSON array of attestation records).

use anyhow::Context;
use clap::Args;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use trustmesh_core::{AgentId, Attestation};
use trustmesh_reputation::{
    ReputationAggregator, ReputationClient, ReputationQuery, StaticAttestationSource,
    WeightedReputation,
};

use crate::config::TrustmeshConfig;

#[derive(Args, Debug)]
pub struct ReputationArgs {
    /// JSON file containing an array of attestations.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Numeric id of the agent to report on.
    #[arg(short, long)]
    pub subject: u64,

    /// Only average attestations in this namespace.
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Only average attestations with this tag.
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: &ReputationArgs, config: &TrustmeshConfig) -> anyhow::Result<()> {
    let (subject, report) = build_report(args, config).await?;
    let rendered = render(args, subject, &report)?;
    if args.json {
        println!("{}", rendered);
    } else {
        print!("{}", rendered);
    }
    Ok(())
}

/// Load the export named by `args` and aggregate it for the requested subject.
pub async fn build_report(
    args: &ReputationArgs,
    config: &TrustmeshConfig,
) -> anyhow::Result<(AgentId, WeightedReputation)> {
    let attestations = load_attestations(&args.input)?;
    tracing::info!(
        path = %args.input.display(),
        records = attestations.len(),
        "loaded attestation export"
    );

    let aggregator = ReputationAggregator::new(config.reputation.clone())?;
    let client = ReputationClient::new(
        Arc::new(StaticAttestationSource::new(attestations)),
        aggregator,
    );

    let subject = AgentId(args.subject);
    let query = ReputationQuery {
        namespace: args.namespace.clone(),
        tag: args.tag.clone(),
    };
    let report = client.get_weighted_reputation(subject, &query).await?;
    Ok((subject, report))
}

/// Format a report as pretty JSON or text, per `--json`.
pub fn render(
    args: &ReputationArgs,
    subject: AgentId,
    report: &WeightedReputation,
) -> anyhow::Result<String> {
    if args.json {
        Ok(serde_json::to_string_pretty(report)?)
    } else {
        Ok(render_text(subject, report))
    }
}

/// Read a JSON array of attestations.
pub fn load_attestations(path: &Path) -> anyhow::Result<Vec<Attestation>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let attestations: Vec<Attestation> = serde_json::from_str(&contents)
        .with_context(|| format!("invalid attestation export {}", path.display()))?;
    Ok(attestations)
}

/// Human-readable report.
pub fn render_text(subject: AgentId, report: &WeightedReputation) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Reputation for {}:", subject);
    let _ = writeln!(out, "  Overall:       {:.2}", report.overall);
    let _ = writeln!(out, "  Risk level:    {}", report.risk_level);
    let _ = writeln!(out, "  Attestations:  {}", report.total_attestations);
    let _ = writeln!(out, "  Decay factor:  {:.2}", report.decay_factor);
    let _ = writeln!(out, "  Suspicion:     {:.2}", report.suspicion_score);
    if report.by_category.is_empty() {
        let _ = writeln!(out, "  Categories:    (none)");
    } else {
        let _ = writeln!(out, "  Categories:");
        for (category, score) in &report.by_category {
            let _ = writeln!(out, "    {:<24} {:.2}", category.to_string(), score);
        }
    }
    out
}
