//! The paired result produced for one query.

use serde::{Deserialize, Serialize};

/// Text substituted for the agent reply when none arrives within the wait budget.
pub const NO_REPLY_SENTINEL: &str = "Error: No AI reply received from Parlant session.";

/// Side-by-side answers for a single query.
///
/// Field names are the stable caller-facing contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub query: String,
    pub traditional_response: String,
    pub parlant_response: String,
    pub reasoning: String,
}

impl ComparisonResult {
    /// Whether the agent side ended without a reply.
    pub fn agent_timed_out(&self) -> bool {
        self.parlant_response == NO_REPLY_SENTINEL
    }
}
