//! Agent identity loaders.
//!
//! The agent backend writes its agent id to a file when it boots. Reading
//! that file is the bootstrap precondition for every comparison.

use async_trait::async_trait;
use duet_core::DuetError;
use duet_core::config::AgentIdConfig;
use duet_core::error::Result;
use duet_core::session::{AgentId, AgentIdSource};
use std::path::PathBuf;
use std::sync::Arc;

/// Reads the agent id from the file written by the agent backend.
#[derive(Debug, Clone)]
pub struct FileAgentIdSource {
    path: PathBuf,
}

impl FileAgentIdSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl AgentIdSource for FileAgentIdSource {
    async fn resolve_agent_id(&self) -> Result<AgentId> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DuetError::not_initialized(format!(
                    "agent_id.txt not found at {}. Please start the Parlant agent server first.",
                    self.path.display()
                )));
            }
            Err(e) => return Err(e.into()),
        };

        let id = content.trim();
        if id.is_empty() {
            return Err(DuetError::not_initialized(format!(
                "{} is empty. Please restart the Parlant agent server so it can write its agent id.",
                self.path.display()
            )));
        }

        tracing::debug!(path = %self.path.display(), agent_id = id, "resolved agent id from file");
        Ok(AgentId::new(id))
    }
}

/// An agent id supplied directly in configuration.
#[derive(Debug, Clone)]
pub struct StaticAgentIdSource {
    agent_id: AgentId,
}

impl StaticAgentIdSource {
    pub fn new(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: AgentId::new(agent_id),
        }
    }
}

#[async_trait]
impl AgentIdSource for StaticAgentIdSource {
    async fn resolve_agent_id(&self) -> Result<AgentId> {
        Ok(self.agent_id.clone())
    }
}

/// Builds the source described by the configuration.
pub fn agent_id_source_from_config(config: &AgentIdConfig) -> Arc<dyn AgentIdSource> {
    match config {
        AgentIdConfig::Static(id) => Arc::new(StaticAgentIdSource::new(id.clone())),
        AgentIdConfig::File(path) => Arc::new(FileAgentIdSource::new(path.clone())),
    }
}
