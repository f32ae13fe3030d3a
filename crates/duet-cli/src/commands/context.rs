use anyhow::{Context, Result};
use duet_application::{AgentIdentity, ComparisonOrchestrator};
use duet_core::config::{DuetConfig, ExecutionMode};
use duet_infrastructure::{ConfigService, agent_id_source_from_config};
use duet_interaction::{OpenRouterApiAgent, ParlantConnector, TRADITIONAL_SYSTEM_PROMPT};
use std::path::PathBuf;
use std::sync::Arc;

/// Loads configuration from the given file (or the default location) and
/// the environment.
pub fn load_config(path: Option<PathBuf>) -> Result<DuetConfig> {
    let service = ConfigService::new(path)?;
    let config = service
        .load()
        .with_context(|| format!("Failed to load configuration ({})", service.path().display()))?;
    tracing::debug!(path = %service.path().display(), "configuration loaded");
    Ok(config)
}

/// The agent identity wired to the Parlant backend.
pub fn build_identity(config: &DuetConfig) -> Arc<AgentIdentity> {
    let connector = Arc::new(ParlantConnector::new(
        &config.agent.base_url,
        config.agent.request_timeout,
    ));
    let id_source = agent_id_source_from_config(&config.agent.agent_id);
    Arc::new(AgentIdentity::new(connector, id_source))
}

/// An orchestrator wired to Parlant and OpenRouter.
///
/// `sequential` forces sequential execution regardless of the configured mode.
pub fn build_orchestrator(config: &DuetConfig, sequential: bool) -> ComparisonOrchestrator {
    let completion = Arc::new(OpenRouterApiAgent::from_config(&config.completion));
    let system_prompt = config
        .completion
        .system_prompt
        .clone()
        .unwrap_or_else(|| TRADITIONAL_SYSTEM_PROMPT.to_string());
    let execution = if sequential {
        ExecutionMode::Sequential
    } else {
        config.execution
    };

    ComparisonOrchestrator::new(build_identity(config), completion, system_prompt)
        .with_poll_settings(config.polling)
        .with_reasoning_source(config.reasoning_source)
        .with_execution_mode(execution)
}
