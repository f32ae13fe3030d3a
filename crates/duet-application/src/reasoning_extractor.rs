use duet_core::error::{Backend, DuetError, Result};
use duet_core::session::{AgentSessionPort, EventLog, SessionId};

/// Assembles the agent's reasoning trace for one exchange.
///
/// The trace is the payloads of the `Reasoning` events at or after
/// `min_offset`, oldest first, one per line. An exchange without reasoning
/// events yields an empty string.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReasoningExtractor;

impl ReasoningExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Builds the trace from an already-read log.
    pub fn trace_from(&self, log: &EventLog) -> String {
        log.reasoning_events()
            .map(|e| e.payload.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Re-reads the session from `observed.min_offset()` and builds the trace.
    ///
    /// The session log only grows at the tail, so the re-read must start with
    /// every event of `observed`. A re-read that does not is reported as a
    /// remote-call error on the agent backend.
    pub async fn extract(
        &self,
        port: &dyn AgentSessionPort,
        session: &SessionId,
        observed: &EventLog,
    ) -> Result<String> {
        let min_offset = observed.min_offset();
        let events = port.read_events(session, min_offset).await?;
        let log = EventLog::from_read(min_offset, events)?;

        if !log.extends(observed) {
            return Err(DuetError::remote_call(
                Backend::Agent,
                None,
                format!(
                    "session {session} event log changed between reads (had {} events from offset {min_offset}, re-read {})",
                    observed.len(),
                    log.len()
                ),
            ));
        }

        let trace = self.trace_from(&log);
        tracing::debug!(
            session_id = %session,
            min_offset,
            steps = log.reasoning_events().count(),
            "extracted reasoning trace"
        );
        Ok(trace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{InMemoryAgentService, ReplyScript};
    use chrono::Utc;
    use duet_core::session::{AgentId, Event, EventKind};

    #[tokio::test]
    async fn test_trace_joins_reasoning_in_offset_order() {
        let service = InMemoryAgentService::new(|_| {
            ReplyScript::reply("answer")
                .with_reasoning("check_health_condition({\"condition\":\"diabetes\"}) -> rated")
                .with_reasoning("quote_premium({}) -> 42")
        });
        let session = service.create_session(&AgentId::new("a")).await.unwrap();
        let dispatch = service.send_user_message(&session, "q").await.unwrap();

        let trace = ReasoningExtractor::new()
            .extract(&service, &session, &EventLog::empty(dispatch.reply_min_offset()))
            .await
            .unwrap();

        assert_eq!(
            trace,
            "check_health_condition({\"condition\":\"diabetes\"}) -> rated\nquote_premium({}) -> 42"
        );
    }

    #[tokio::test]
    async fn test_no_reasoning_yields_empty_trace() {
        let service = InMemoryAgentService::new(|_| ReplyScript::reply("plain"));
        let session = service.create_session(&AgentId::new("a")).await.unwrap();
        let dispatch = service.send_user_message(&session, "q").await.unwrap();

        let trace = ReasoningExtractor::new()
            .extract(&service, &session, &EventLog::empty(dispatch.reply_min_offset()))
            .await
            .unwrap();

        assert!(trace.is_empty());
    }

    #[tokio::test]
    async fn test_reasoning_before_min_offset_is_excluded() {
        let service = InMemoryAgentService::new(|_| ReplyScript::silent());
        let session = service.create_session(&AgentId::new("a")).await.unwrap();
        service.append(&session, EventKind::Reasoning, "earlier turn");
        let dispatch = service.send_user_message(&session, "q").await.unwrap();
        service.append(&session, EventKind::Reasoning, "this turn");

        let trace = ReasoningExtractor::new()
            .extract(&service, &session, &EventLog::empty(dispatch.reply_min_offset()))
            .await
            .unwrap();

        assert_eq!(trace, "this turn");
    }

    #[tokio::test]
    async fn test_extraction_is_idempotent() {
        let service =
            InMemoryAgentService::new(|_| ReplyScript::reply("r").with_reasoning("step"));
        let session = service.create_session(&AgentId::new("a")).await.unwrap();
        let min_offset = service
            .send_user_message(&session, "q")
            .await
            .unwrap()
            .reply_min_offset();
        let extractor = ReasoningExtractor::new();

        let observed = EventLog::empty(min_offset);

        let first = extractor.extract(&service, &session, &observed).await.unwrap();
        let second = extractor.extract(&service, &session, &observed).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first, "step");
    }

    #[tokio::test]
    async fn test_reread_includes_events_after_observed_log() {
        let service = InMemoryAgentService::new(|_| ReplyScript::reply("r").with_reasoning("early"));
        let session = service.create_session(&AgentId::new("a")).await.unwrap();
        let min_offset = service
            .send_user_message(&session, "q")
            .await
            .unwrap()
            .reply_min_offset();
        let events = service.read_events(&session, min_offset).await.unwrap();
        let observed = EventLog::from_read(min_offset, events).unwrap();
        service.append(&session, EventKind::Reasoning, "late");

        let trace = ReasoningExtractor::new()
            .extract(&service, &session, &observed)
            .await
            .unwrap();

        assert_eq!(trace, "early\nlate");
    }

    #[tokio::test]
    async fn test_rewritten_log_is_remote_call_error() {
        let service = InMemoryAgentService::new(|_| ReplyScript::silent());
        let session = service.create_session(&AgentId::new("a")).await.unwrap();
        let min_offset = service
            .send_user_message(&session, "q")
            .await
            .unwrap()
            .reply_min_offset();
        let observed = EventLog::from_read(
            min_offset,
            vec![Event::new(
                "gone",
                min_offset,
                EventKind::AgentMessage,
                "a reply the service no longer returns",
                Utc::now(),
            )],
        )
        .unwrap();

        let err = ReasoningExtractor::new()
            .extract(&service, &session, &observed)
            .await
            .unwrap_err();

        assert!(err.is_remote_call());
        assert_eq!(err.backend(), Some(Backend::Agent));
        assert!(err.to_string().contains("changed between reads"));
    }

    #[test]
    fn test_trace_from_empty_log() {
        assert_eq!(ReasoningExtractor::new().trace_from(&EventLog::empty(3)), "");
    }
}
