use anyhow::Result;
use duet_core::config::DuetConfig;
use tokio_util::sync::CancellationToken;

pub async fn run(config: &DuetConfig, json: bool, cancel: &CancellationToken) -> Result<()> {
    if config.demo_queries.is_empty() {
        anyhow::bail!(
            "No demo queries configured. Set `demo_queries` in config.toml or DEMO_QUERIES (a JSON array of strings)."
        );
    }

    tracing::info!(queries = config.demo_queries.len(), "running demo");
    super::compare::run(config, &config.demo_queries, json, false, cancel).await
}
