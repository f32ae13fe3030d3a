//! Lazily-initialized agent identity shared by all comparisons.

use duet_core::error::{DuetError, Result};
use duet_core::session::{AgentConnector, AgentId, AgentIdSource, AgentSessionPort};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// A connected session client together with the agent it talks to.
#[derive(Clone)]
pub struct ResolvedAgent {
    pub agent_id: AgentId,
    pub client: Arc<dyn AgentSessionPort>,
}

/// Resolves the agent id and connects the session client on first use,
/// then serves the cached pair for the lifetime of the value.
///
/// Concurrent first callers wait on the same initialization. A failed
/// initialization leaves the cell empty, so the next call re-attempts it.
pub struct AgentIdentity {
    connector: Arc<dyn AgentConnector>,
    id_source: Arc<dyn AgentIdSource>,
    resolved: OnceCell<ResolvedAgent>,
}

impl AgentIdentity {
    pub fn new(connector: Arc<dyn AgentConnector>, id_source: Arc<dyn AgentIdSource>) -> Self {
        Self {
            connector,
            id_source,
            resolved: OnceCell::new(),
        }
    }

    /// Returns the cached identity, initializing it if needed.
    ///
    /// # Errors
    ///
    /// - `DuetError::NotInitialized` when the agent id cannot be resolved
    /// - `DuetError::Connection` / `DuetError::RemoteCall` when the agent
    ///   service cannot be reached
    pub async fn get(&self) -> Result<&ResolvedAgent> {
        self.resolved
            .get_or_try_init(|| async {
                let agent_id = self.id_source.resolve_agent_id().await?;
                let client = self.connector.connect().await?;
                tracing::info!(agent_id = %agent_id, "agent identity initialized");
                Ok::<_, DuetError>(ResolvedAgent { agent_id, client })
            })
            .await
    }

    pub fn is_initialized(&self) -> bool {
        self.resolved.initialized()
    }
}
