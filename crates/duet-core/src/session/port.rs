//! Ports to the conversational agent service.
//!
//! Defines the interfaces the application layer drives; the HTTP client in
//! `duet-interaction` and the agent-id loaders in `duet-infrastructure`
//! provide the implementations.

use super::event::Event;
use super::{AgentId, DispatchOffset, SessionId};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Session lifecycle and event-log access on a connected agent service.
///
/// # Contract
///
/// - `read_events` returns events with `offset >= min_offset`, oldest first,
///   scoped to the given session only. An empty vector means "nothing yet".
/// - `send_user_message` returns the offset the message was recorded at; an
///   error means the message is not confirmed delivered.
/// - Reads have no side effects on the service.
#[async_trait]
pub trait AgentSessionPort: Send + Sync {
    /// Opens a new session scoped to `agent_id`.
    async fn create_session(&self, agent_id: &AgentId) -> Result<SessionId>;

    /// Appends a customer message to the session.
    async fn send_user_message(&self, session: &SessionId, text: &str) -> Result<DispatchOffset>;

    /// Lists events at or after `min_offset`.
    async fn read_events(&self, session: &SessionId, min_offset: u64) -> Result<Vec<Event>>;
}

/// Establishes a connection to the agent service.
#[async_trait]
pub trait AgentConnector: Send + Sync {
    /// Returns a connected session client.
    ///
    /// Fails with a connection error when the service is unreachable.
    async fn connect(&self) -> Result<Arc<dyn AgentSessionPort>>;
}

/// Resolves the agent identity produced by the agent backend's bootstrap.
#[async_trait]
pub trait AgentIdSource: Send + Sync {
    /// Fails with `DuetError::NotInitialized` when no identity is available.
    async fn resolve_agent_id(&self) -> Result<AgentId>;
}
