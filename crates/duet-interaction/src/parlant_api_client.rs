//! ParlantApiClient - REST implementation of the agent session port for Parlant.
//!
//! Parlant owns sessions and their append-only event logs. This client only
//! creates sessions, appends customer messages and lists events by offset;
//! waiting for a reply is the application layer's job.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use duet_core::error::{Backend, DuetError, Result};
use duet_core::session::{
    AgentConnector, AgentId, AgentSessionPort, DispatchOffset, Event, EventKind, SessionId,
};
use reqwest::{Client, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

const SESSION_TITLE: &str = "duet comparison";

/// Connects to a Parlant server and hands out [`ParlantApiClient`]s.
#[derive(Debug, Clone)]
pub struct ParlantConnector {
    base_url: String,
    request_timeout: Duration,
}

impl ParlantConnector {
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            request_timeout,
        }
    }
}

#[async_trait]
impl AgentConnector for ParlantConnector {
    /// Builds an HTTP client and probes `GET /agents` to confirm the server is up.
    async fn connect(&self) -> Result<Arc<dyn AgentSessionPort>> {
        let base_url = Url::parse(&self.base_url).map_err(|e| {
            DuetError::config(format!("Invalid Parlant base URL '{}': {e}", self.base_url))
        })?;

        let client = Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| {
                DuetError::connection(Backend::Agent, format!("Failed to build HTTP client: {e}"))
            })?;

        let response = client
            .get(endpoint(&base_url, &["agents"])?)
            .send()
            .await
            .map_err(|e| transport_error("Parlant probe request failed", e))?;
        ensure_success(response).await?;

        tracing::info!(base_url = %self.base_url, "connected to Parlant server");
        Ok(Arc::new(ParlantApiClient { client, base_url }))
    }
}

/// Session client bound to one Parlant server.
#[derive(Clone)]
pub struct ParlantApiClient {
    client: Client,
    base_url: Url,
}

impl ParlantApiClient {
    fn events_url(&self, session: &SessionId) -> Result<Url> {
        endpoint(&self.base_url, &["sessions", session.as_str(), "events"])
    }
}

/// Appends path segments to `base`, percent-encoding each one.
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| DuetError::config(format!("Parlant base URL cannot have a path: {base}")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[async_trait]
impl AgentSessionPort for ParlantApiClient {
    async fn create_session(&self, agent_id: &AgentId) -> Result<SessionId> {
        let body = CreateSessionRequest {
            agent_id: agent_id.as_str(),
            title: Some(SESSION_TITLE),
        };

        let response = self
            .client
            .post(endpoint(&self.base_url, &["sessions"])?)
            .query(&[("allow_greeting", "false")])
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error("Parlant create-session request failed", e))?;
        let response = ensure_success(response).await?;

        let session: SessionResponse = response
            .json()
            .await
            .map_err(|e| decode_error("session", e))?;

        tracing::debug!(session_id = %session.id, agent_id = %agent_id, "created Parlant session");
        Ok(SessionId::new(session.id))
    }

    async fn send_user_message(&self, session: &SessionId, text: &str) -> Result<DispatchOffset> {
        let body = CreateEventRequest {
            kind: "message",
            source: "customer",
            message: text,
        };

        let response = self
            .client
            .post(self.events_url(session)?)
            .query(&[("moderation", "none")])
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error("Parlant send-message request failed", e))?;
        let response = ensure_success(response).await?;

        let event: EventResponse = response
            .json()
            .await
            .map_err(|e| decode_error("event", e))?;

        tracing::debug!(session_id = %session, offset = event.offset, "customer message recorded");
        Ok(DispatchOffset::new(event.offset))
    }

    async fn read_events(&self, session: &SessionId, min_offset: u64) -> Result<Vec<Event>> {
        let response = self
            .client
            .get(self.events_url(session)?)
            .query(&[
                ("min_offset", min_offset.to_string()),
                ("wait_for_data", "0".to_string()),
            ])
            .send()
            .await
            .map_err(|e| transport_error("Parlant list-events request failed", e))?;

        // Parlant's long-poll answers 504 when no event arrived in time.
        if response.status() == StatusCode::GATEWAY_TIMEOUT {
            return Ok(Vec::new());
        }
        let response = ensure_success(response).await?;

        let events: Vec<EventResponse> = response
            .json()
            .await
            .map_err(|e| decode_error("event list", e))?;

        Ok(events.into_iter().map(EventResponse::into_event).collect())
    }
}

#[derive(Serialize)]
struct CreateSessionRequest<'a> {
    agent_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
}

#[derive(Deserialize)]
struct SessionResponse {
    id: String,
}

#[derive(Serialize)]
struct CreateEventRequest<'a> {
    kind: &'static str,
    source: &'static str,
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct EventResponse {
    id: String,
    source: String,
    kind: String,
    offset: u64,
    creation_utc: DateTime<Utc>,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    deleted: bool,
}

impl EventResponse {
    fn into_event(self) -> Event {
        let kind = if self.deleted {
            EventKind::Other
        } else {
            classify(&self.kind, &self.source)
        };
        let text = self
            .data
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty());

        // A message without text cannot serve as a reply.
        let (kind, payload) = match (kind, text) {
            (EventKind::UserMessage | EventKind::AgentMessage, Some(text)) => (kind, text.to_string()),
            (EventKind::UserMessage | EventKind::AgentMessage, None) => {
                (EventKind::Other, render_value(&self.data))
            }
            (EventKind::Reasoning, _) => (kind, render_tool_calls(&self.data)),
            (EventKind::Other, _) => (kind, render_value(&self.data)),
        };

        Event::new(self.id, self.offset, kind, payload, self.creation_utc)
    }
}

fn classify(kind: &str, source: &str) -> EventKind {
    match (kind, source) {
        ("message", "customer") => EventKind::UserMessage,
        ("message", "ai_agent" | "human_agent_on_behalf_of_ai_agent") => EventKind::AgentMessage,
        ("tool", _) => EventKind::Reasoning,
        _ => EventKind::Other,
    }
}

/// One line per tool call: `tool_id(arguments) -> result`.
fn render_tool_calls(data: &Value) -> String {
    let Some(calls) = data.get("tool_calls").and_then(Value::as_array) else {
        return render_value(data);
    };

    calls
        .iter()
        .map(|call| {
            let tool_id = call
                .get("tool_id")
                .and_then(Value::as_str)
                .unwrap_or("unknown_tool");
            let arguments = call.get("arguments").map(render_value).unwrap_or_default();
            let result = call
                .get("result")
                .map(|r| r.get("data").unwrap_or(r))
                .map(render_value)
                .unwrap_or_default();
            format!("{tool_id}({arguments}) -> {result}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn transport_error(context: &str, err: reqwest::Error) -> DuetError {
    DuetError::connection(Backend::Agent, format!("{context}: {err}"))
}

fn decode_error(what: &str, err: reqwest::Error) -> DuetError {
    DuetError::remote_call(
        Backend::Agent,
        None,
        format!("Failed to parse Parlant {what} response: {err}"),
    )
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read Parlant error body".to_string());
    Err(map_http_error(status, body))
}

fn map_http_error(status: StatusCode, body: String) -> DuetError {
    #[derive(Deserialize)]
    struct ErrorDetail {
        detail: Value,
    }

    let message = serde_json::from_str::<ErrorDetail>(&body)
        .map(|e| render_value(&e.detail))
        .unwrap_or(body);

    DuetError::remote_call(
        Backend::Agent,
        Some(status.as_u16()),
        format!("Parlant API error ({status}): {message}"),
    )
}
