use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification of an event in a session's log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A message authored by the customer (the operator's query).
    UserMessage,
    /// A message authored by the agent.
    AgentMessage,
    /// Tool calls and other inference traces the agent produced.
    Reasoning,
    /// Status updates and anything else the service records.
    Other,
}

/// An immutable record in a session's append-only log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event id issued by the service.
    pub id: String,
    /// Position in the session log. Strictly increasing, never reused.
    pub offset: u64,
    pub kind: EventKind,
    /// Message text, or the rendered reasoning content.
    pub payload: String,
    pub timestamp: DateTime<Utc>,
}

impl Event {
    pub fn new(
        id: impl Into<String>,
        offset: u64,
        kind: EventKind,
        payload: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            offset,
            kind,
            payload: payload.into(),
            timestamp,
        }
    }

    pub fn is_agent_message(&self) -> bool {
        self.kind == EventKind::AgentMessage
    }

    pub fn is_reasoning(&self) -> bool {
        self.kind == EventKind::Reasoning
    }
}
