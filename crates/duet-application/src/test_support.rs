//! In-memory fakes for the agent service and the completion backend.

use async_trait::async_trait;
use chrono::Utc;
use duet_core::completion::CompletionPort;
use duet_core::error::{DuetError, Result};
use duet_core::session::{
    AgentConnector, AgentId, AgentIdSource, AgentSessionPort, DispatchOffset, Event, EventKind,
    SessionId,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the fake agent does after a customer message lands.
#[derive(Debug, Clone, Default)]
pub struct ReplyScript {
    pub delay: Duration,
    pub reasoning: Vec<String>,
    pub reply: Option<String>,
}

impl ReplyScript {
    pub fn reply(text: impl Into<String>) -> Self {
        Self {
            reply: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn silent() -> Self {
        Self::default()
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_reasoning(mut self, step: impl Into<String>) -> Self {
        self.reasoning.push(step.into());
        self
    }
}

type Script = Arc<dyn Fn(&str) -> ReplyScript + Send + Sync>;
type Logs = Arc<Mutex<HashMap<String, Vec<Event>>>>;

/// Agent service with per-session append-only logs; offsets start at 0 in
/// every session, so offsets of different sessions overlap.
pub struct InMemoryAgentService {
    logs: Logs,
    script: Script,
    next_session: AtomicUsize,
    pub calls: AtomicUsize,
    pub reads: AtomicUsize,
    read_failure: Mutex<Option<DuetError>>,
    ignore_min_offset: bool,
}

impl InMemoryAgentService {
    pub fn new(script: impl Fn(&str) -> ReplyScript + Send + Sync + 'static) -> Self {
        Self {
            logs: Arc::new(Mutex::new(HashMap::new())),
            script: Arc::new(script),
            next_session: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
            reads: AtomicUsize::new(0),
            read_failure: Mutex::new(None),
            ignore_min_offset: false,
        }
    }

    /// Returns every event of the session regardless of `min_offset`.
    pub fn with_sloppy_reads(mut self) -> Self {
        self.ignore_min_offset = true;
        self
    }

    pub fn fail_reads_with(&self, err: DuetError) {
        *self.read_failure.lock().unwrap() = Some(err);
    }

    pub fn append(&self, session: &SessionId, kind: EventKind, payload: &str) -> u64 {
        append(&self.logs, session.as_str(), kind, payload)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn append(logs: &Logs, session: &str, kind: EventKind, payload: &str) -> u64 {
    let mut logs = logs.lock().unwrap();
    let log = logs.entry(session.to_string()).or_default();
    let offset = log.len() as u64;
    log.push(Event::new(
        format!("{session}-{offset}"),
        offset,
        kind,
        payload,
        Utc::now(),
    ));
    offset
}

fn play(logs: &Logs, session: &str, script: &ReplyScript) {
    for step in &script.reasoning {
        append(logs, session, EventKind::Other, "processing");
        append(logs, session, EventKind::Reasoning, step);
    }
    if let Some(reply) = &script.reply {
        append(logs, session, EventKind::AgentMessage, reply);
    }
}

#[async_trait]
impl AgentSessionPort for InMemoryAgentService {
    async fn create_session(&self, agent_id: &AgentId) -> Result<SessionId> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let n = self.next_session.fetch_add(1, Ordering::SeqCst);
        let id = format!("{}-session-{n}", agent_id.as_str());
        self.logs.lock().unwrap().insert(id.clone(), Vec::new());
        Ok(SessionId::new(id))
    }

    async fn send_user_message(&self, session: &SessionId, text: &str) -> Result<DispatchOffset> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let offset = append(&self.logs, session.as_str(), EventKind::UserMessage, text);

        let script = (self.script)(text);
        if script.delay.is_zero() {
            play(&self.logs, session.as_str(), &script);
        } else {
            let logs = self.logs.clone();
            let session = session.as_str().to_string();
            tokio::spawn(async move {
                tokio::time::sleep(script.delay).await;
                play(&logs, &session, &script);
            });
        }

        Ok(DispatchOffset::new(offset))
    }

    async fn read_events(&self, session: &SessionId, min_offset: u64) -> Result<Vec<Event>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reads.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.read_failure.lock().unwrap().clone() {
            return Err(err);
        }

        let logs = self.logs.lock().unwrap();
        let events = logs.get(session.as_str()).cloned().unwrap_or_default();
        if self.ignore_min_offset {
            return Ok(events);
        }
        Ok(events.into_iter().filter(|e| e.offset >= min_offset).collect())
    }
}

/// Connector that hands out a fixed client, or fails.
pub struct FixedConnector {
    result: std::result::Result<Arc<dyn AgentSessionPort>, DuetError>,
    pub connects: AtomicUsize,
}

impl FixedConnector {
    pub fn new(client: Arc<dyn AgentSessionPort>) -> Self {
        Self {
            result: Ok(client),
            connects: AtomicUsize::new(0),
        }
    }

    pub fn failing(err: DuetError) -> Self {
        Self {
            result: Err(err),
            connects: AtomicUsize::new(0),
        }
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AgentConnector for FixedConnector {
    async fn connect(&self) -> Result<Arc<dyn AgentSessionPort>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        // Yield so racing initializers actually overlap.
        tokio::task::yield_now().await;
        self.result.clone()
    }
}

pub struct FixedAgentId(pub Option<&'static str>);

#[async_trait]
impl AgentIdSource for FixedAgentId {
    async fn resolve_agent_id(&self) -> Result<AgentId> {
        self.0.map(AgentId::new).ok_or_else(|| {
            DuetError::not_initialized("agent_id.txt not found. Please start the Parlant agent server first.")
        })
    }
}

/// Completion backend that answers from a closure and counts calls.
pub struct ScriptedCompletion {
    answer: Box<dyn Fn(&str, &str) -> Result<String> + Send + Sync>,
    pub calls: AtomicUsize,
}

impl ScriptedCompletion {
    pub fn new(answer: impl Fn(&str, &str) -> Result<String> + Send + Sync + 'static) -> Self {
        Self {
            answer: Box::new(answer),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn echo() -> Self {
        Self::new(|_, query| Ok(format!("traditional answer to: {query}")))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionPort for ScriptedCompletion {
    async fn generate_completion(&self, system_prompt: &str, query: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.answer)(system_prompt, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_after_send_starts_with_sent_message() {
        let service = InMemoryAgentService::new(|_| ReplyScript::reply("hello back"));
        let session = service.create_session(&AgentId::new("a")).await.unwrap();
        service.append(&session, EventKind::Other, "greeting status");

        let dispatch = service.send_user_message(&session, "hello").await.unwrap();
        let events = service.read_events(&session, dispatch.value()).await.unwrap();

        assert_eq!(events[0].offset, dispatch.value());
        assert_eq!(events[0].kind, EventKind::UserMessage);
        assert_eq!(events[0].payload, "hello");
        assert!(events.windows(2).all(|w| w[0].offset < w[1].offset));
    }
}
