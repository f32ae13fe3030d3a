use super::context::build_orchestrator;
use super::output::{render_json, render_text};
use anyhow::{Context, Result};
use duet_core::ComparisonResult;
use duet_core::config::DuetConfig;
use tokio_util::sync::CancellationToken;

/// Runs one comparison per query, in order.
///
/// Text output is printed as each comparison finishes; JSON output is printed
/// once all of them have succeeded. The first failure aborts the run.
pub async fn run(
    config: &DuetConfig,
    queries: &[String],
    json: bool,
    sequential: bool,
    cancel: &CancellationToken,
) -> Result<()> {
    let orchestrator = build_orchestrator(config, sequential);
    let mut results: Vec<ComparisonResult> = Vec::with_capacity(queries.len());

    for (index, query) in queries.iter().enumerate() {
        let result = orchestrator
            .compare_with_cancel(query, cancel)
            .await
            .with_context(|| format!("Comparison {} failed", index + 1))?;

        if !json {
            println!("{}", render_text(index, &result));
        }
        results.push(result);
    }

    if json {
        println!("{}", render_json(&results)?);
    }

    Ok(())
}
