//! Session domain: identifiers, events and the agent-service port.

pub mod event;
pub mod log;
pub mod port;

pub use event::{Event, EventKind};
pub use log::EventLog;
pub use port::{AgentConnector, AgentIdSource, AgentSessionPort};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a session, issued by the agent service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the agent that sessions are scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Offset at which a user message was recorded in its session's log.
///
/// The reply to that message is causally after it, so the search for the
/// reply starts at [`DispatchOffset::reply_min_offset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DispatchOffset(u64);

impl DispatchOffset {
    pub fn new(offset: u64) -> Self {
        Self(offset)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    /// Exclusive lower bound for the reply: `dispatch_offset + 1`.
    pub fn reply_min_offset(self) -> u64 {
        self.0 + 1
    }
}

impl fmt::Display for DispatchOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
