use super::context::build_identity;
use anyhow::Result;
use colored::Colorize;
use duet_core::config::DuetConfig;

/// Probes the agent backend and resolves the agent id.
///
/// Prints the status and fails the process when the backend is not ready.
pub async fn run(config: &DuetConfig) -> Result<()> {
    let identity = build_identity(config);

    match identity.get().await {
        Ok(agent) => {
            println!("{} {}", "ready".green().bold(), config.agent.base_url);
            println!("  agent_id: {}", agent.agent_id);
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "unhealthy".red().bold(), config.agent.base_url);
            println!("  {}", e);
            Err(e.into())
        }
    }
}
