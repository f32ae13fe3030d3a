//! Port to the single-shot completion backend.

use crate::error::Result;
use async_trait::async_trait;

/// A stateless text-completion capability.
///
/// Implementations report transport failures as `DuetError::Connection` and
/// API-level failures as `DuetError::RemoteCall`, both attributed to
/// `Backend::Llm`.
#[async_trait]
pub trait CompletionPort: Send + Sync {
    async fn generate_completion(&self, system_prompt: &str, query: &str) -> Result<String>;
}
