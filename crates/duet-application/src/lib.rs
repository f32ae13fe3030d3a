//! Application layer for duet.
//!
//! This crate provides the comparison use case. It coordinates the domain
//! ports from `duet-core` (agent sessions, completions) without knowing which
//! backend implements them.

pub mod agent_identity;
pub mod comparison_orchestrator;
pub mod reasoning_extractor;
pub mod reply_awaiter;

#[cfg(test)]
mod test_support;

pub use agent_identity::{AgentIdentity, ResolvedAgent};
pub use comparison_orchestrator::ComparisonOrchestrator;
pub use reasoning_extractor::ReasoningExtractor;
pub use reply_awaiter::{ReplyAwaiter, ReplyOutcome};
