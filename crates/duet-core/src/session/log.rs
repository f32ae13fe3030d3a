use super::event::Event;
use crate::error::{Backend, DuetError, Result};

/// Typed view over one read of a session's event log.
///
/// Invariants upheld by construction:
/// - offsets are strictly increasing
/// - no event has `offset < min_offset`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    min_offset: u64,
    events: Vec<Event>,
}

impl EventLog {
    /// An empty view starting at `min_offset`.
    pub fn empty(min_offset: u64) -> Self {
        Self {
            min_offset,
            events: Vec::new(),
        }
    }

    /// Builds a view from a batch returned by the agent service.
    ///
    /// Events below `min_offset` are dropped. A batch whose offsets are not
    /// strictly increasing is rejected as a remote-call error.
    pub fn from_read(min_offset: u64, events: Vec<Event>) -> Result<Self> {
        let mut previous: Option<u64> = None;
        let mut kept = Vec::with_capacity(events.len());

        for event in events {
            if let Some(prev) = previous {
                if event.offset <= prev {
                    return Err(DuetError::remote_call(
                        Backend::Agent,
                        None,
                        format!(
                            "event log out of order: offset {} returned after {}",
                            event.offset, prev
                        ),
                    ));
                }
            }
            previous = Some(event.offset);

            if event.offset >= min_offset {
                kept.push(event);
            }
        }

        Ok(Self {
            min_offset,
            events: kept,
        })
    }

    pub fn min_offset(&self) -> u64 {
        self.min_offset
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The first agent-authored message by offset.
    pub fn first_agent_message(&self) -> Option<&Event> {
        self.events.iter().find(|e| e.is_agent_message())
    }

    /// Reasoning events in ascending offset order.
    pub fn reasoning_events(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(|e| e.is_reasoning())
    }

    /// Whether this read contains every event of `earlier` unchanged.
    ///
    /// Holds for any two reads of the same session with the same bound,
    /// because the log only ever grows at the tail.
    pub fn extends(&self, earlier: &EventLog) -> bool {
        self.min_offset == earlier.min_offset
            && self.events.len() >= earlier.events.len()
            && self.events[..earlier.events.len()] == earlier.events[..]
    }
}
