//! Comparison use case.
//!
//! This module provides the `ComparisonOrchestrator`, which answers one query
//! twice (once through a single-shot LLM call and once through a session with
//! the conversational agent) and pairs the results.

use crate::agent_identity::{AgentIdentity, ResolvedAgent};
use crate::reasoning_extractor::ReasoningExtractor;
use crate::reply_awaiter::ReplyAwaiter;
use duet_core::comparison::{ComparisonResult, NO_REPLY_SENTINEL};
use duet_core::completion::CompletionPort;
use duet_core::config::{ExecutionMode, PollSettings, ReasoningSource};
use duet_core::error::{DuetError, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

/// Use case for comparing a traditional LLM answer with an agent answer.
///
/// # Responsibilities
///
/// - Rejecting empty queries before any backend is contacted
/// - Initializing the shared agent identity on first use
/// - Running the LLM call and the agent exchange, concurrently by default
/// - Mapping a reply timeout to [`NO_REPLY_SENTINEL`]
///
/// # Thread Safety
///
/// The orchestrator is `Send + Sync` and can serve concurrent comparisons.
/// Every comparison creates its own session, so exchanges never observe
/// each other's events. The only shared state is the [`AgentIdentity`].
pub struct ComparisonOrchestrator {
    /// Lazily-resolved agent id and connected session client
    identity: Arc<AgentIdentity>,
    /// Single-shot completion backend
    completion: Arc<dyn CompletionPort>,
    /// System prompt sent with every traditional completion
    system_prompt: String,
    awaiter: ReplyAwaiter,
    extractor: ReasoningExtractor,
    reasoning_source: ReasoningSource,
    execution: ExecutionMode,
}

impl ComparisonOrchestrator {
    /// Creates an orchestrator with default polling, re-queried reasoning and
    /// concurrent execution.
    pub fn new(
        identity: Arc<AgentIdentity>,
        completion: Arc<dyn CompletionPort>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            identity,
            completion,
            system_prompt: system_prompt.into(),
            awaiter: ReplyAwaiter::default(),
            extractor: ReasoningExtractor::new(),
            reasoning_source: ReasoningSource::default(),
            execution: ExecutionMode::default(),
        }
    }

    pub fn with_poll_settings(mut self, settings: PollSettings) -> Self {
        self.awaiter = ReplyAwaiter::new(settings);
        self
    }

    pub fn with_reasoning_source(mut self, source: ReasoningSource) -> Self {
        self.reasoning_source = source;
        self
    }

    pub fn with_execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.execution = mode;
        self
    }

    pub fn execution_mode(&self) -> ExecutionMode {
        self.execution
    }

    /// Runs one comparison for `query`.
    ///
    /// # Errors
    ///
    /// - `DuetError::InvalidInput` for an empty or whitespace-only query
    /// - `DuetError::NotInitialized` when the agent id cannot be resolved
    /// - `DuetError::Connection` / `DuetError::RemoteCall` when either
    ///   backend fails; [`DuetError::backend`] tells which one
    pub async fn compare(&self, query: &str) -> Result<ComparisonResult> {
        self.compare_with_cancel(query, &CancellationToken::new())
            .await
    }

    /// Like [`compare`](Self::compare), but gives up with
    /// `DuetError::Cancelled` once `cancel` fires.
    pub async fn compare_with_cancel(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<ComparisonResult> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DuetError::invalid_input("query must not be empty"));
        }

        let comparison_id = Uuid::new_v4();
        let span = tracing::info_span!("comparison", %comparison_id);

        async move {
            tracing::info!(execution = ?self.execution, "comparison started");

            let work = self.run(query, cancel);
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(DuetError::Cancelled),
                result = work => result,
            };

            match &result {
                Ok(result) => tracing::info!(
                    agent_timed_out = result.agent_timed_out(),
                    reasoning_lines = result.reasoning.lines().count(),
                    "comparison finished"
                ),
                Err(e) => tracing::error!(
                    backend = ?e.backend(),
                    error = %e,
                    "comparison failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run(&self, query: &str, cancel: &CancellationToken) -> Result<ComparisonResult> {
        let agent = self.identity.get().await?;

        let (traditional_response, (parlant_response, reasoning)) = match self.execution {
            ExecutionMode::Concurrent => tokio::try_join!(
                self.traditional(query),
                self.agent_exchange(agent, query, cancel)
            )?,
            ExecutionMode::Sequential => {
                let traditional = self.traditional(query).await?;
                let exchange = self.agent_exchange(agent, query, cancel).await?;
                (traditional, exchange)
            }
        };

        Ok(ComparisonResult {
            query: query.to_string(),
            traditional_response,
            parlant_response,
            reasoning,
        })
    }

    async fn traditional(&self, query: &str) -> Result<String> {
        let response = self
            .completion
            .generate_completion(&self.system_prompt, query)
            .await?;
        tracing::debug!(chars = response.len(), "traditional response received");
        Ok(response)
    }

    /// Returns `(reply or sentinel, reasoning trace)`.
    async fn agent_exchange(
        &self,
        agent: &ResolvedAgent,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<(String, String)> {
        let port = agent.client.as_ref();

        let session = port.create_session(&agent.agent_id).await?;
        let dispatch = port.send_user_message(&session, query).await?;
        let min_offset = dispatch.reply_min_offset();
        tracing::debug!(
            session_id = %session,
            dispatch_offset = dispatch.value(),
            "customer message dispatched"
        );

        let outcome = self
            .awaiter
            .await_reply(port, &session, min_offset, cancel)
            .await?;

        let reasoning = match self.reasoning_source {
            ReasoningSource::Requery => {
                self.extractor
                    .extract(port, &session, outcome.observed())
                    .await?
            }
            ReasoningSource::ReuseObserved => self.extractor.trace_from(outcome.observed()),
        };

        Ok((outcome.reply_or(NO_REPLY_SENTINEL), reasoning))
    }
}
