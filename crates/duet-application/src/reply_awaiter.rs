//! Reply Awaiter
//!
//! Turns the agent service's poll-only event log into a single "await the
//! reply" operation with a bounded wait.
//!
//! ```text
//! Polling --agent message at/after min_offset--> Found
//!    |
//!    +-----elapsed >= max_wait----------------> TimedOut
//! ```
//!
//! A timeout is an outcome, not an error: the agent may still finish the
//! turn after the caller gives up.

use duet_core::config::PollSettings;
use duet_core::error::{DuetError, Result};
use duet_core::session::{AgentSessionPort, Event, EventLog, SessionId};
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;

/// Terminal state of one await.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// The first agent message at or after `min_offset`.
    Found { reply: Event, observed: EventLog },
    /// No agent message appeared within `max_wait`.
    TimedOut { observed: EventLog },
}

impl ReplyOutcome {
    pub fn reply_text(&self) -> Option<&str> {
        match self {
            ReplyOutcome::Found { reply, .. } => Some(&reply.payload),
            ReplyOutcome::TimedOut { .. } => None,
        }
    }

    /// The log as of the final read.
    pub fn observed(&self) -> &EventLog {
        match self {
            ReplyOutcome::Found { observed, .. } | ReplyOutcome::TimedOut { observed } => observed,
        }
    }

    pub fn is_timed_out(&self) -> bool {
        matches!(self, ReplyOutcome::TimedOut { .. })
    }

    /// The reply text, or `sentinel` on timeout.
    pub fn reply_or(&self, sentinel: &str) -> String {
        self.reply_text().unwrap_or(sentinel).to_string()
    }
}

/// Polls a session until the agent replies or the wait budget runs out.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplyAwaiter {
    settings: PollSettings,
}

impl ReplyAwaiter {
    pub fn new(settings: PollSettings) -> Self {
        Self { settings }
    }

    /// Waits for the first agent message with `offset >= min_offset`.
    ///
    /// Read failures are returned immediately without retry. Cancelling
    /// `cancel` (or dropping the future) abandons the loop; reads have no
    /// side effects, so nothing needs undoing.
    pub async fn await_reply(
        &self,
        port: &dyn AgentSessionPort,
        session: &SessionId,
        min_offset: u64,
        cancel: &CancellationToken,
    ) -> Result<ReplyOutcome> {
        let started = Instant::now();
        let mut polls: u32 = 0;

        loop {
            polls += 1;
            let events = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(DuetError::Cancelled),
                read = port.read_events(session, min_offset) => read?,
            };
            let observed = EventLog::from_read(min_offset, events)?;

            tracing::debug!(
                session_id = %session,
                min_offset,
                polls,
                events = observed.len(),
                "polled agent session"
            );

            if let Some(reply) = observed.first_agent_message() {
                let reply = reply.clone();
                tracing::info!(
                    session_id = %session,
                    reply_offset = reply.offset,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    polls,
                    "agent reply received"
                );
                return Ok(ReplyOutcome::Found { reply, observed });
            }

            let elapsed = started.elapsed();
            if elapsed >= self.settings.max_wait {
                tracing::warn!(
                    session_id = %session,
                    min_offset,
                    elapsed_ms = elapsed.as_millis() as u64,
                    polls,
                    "no agent reply within wait budget"
                );
                return Ok(ReplyOutcome::TimedOut { observed });
            }

            let pause = self
                .settings
                .poll_interval
                .min(self.settings.max_wait - elapsed);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(DuetError::Cancelled),
                _ = sleep(pause) => {}
            }
        }
    }
}
