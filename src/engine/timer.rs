use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::task::AbortHandle;

use crate::types::AgentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerKind {
    Tick,    // Recurring; decides which step is showing as active
    Advance, // One-shot; completes the in-flight step
}

/// Identity of one scheduled timer.
///
/// `seq` is unique per dashboard, so a ticket from a cancelled or replaced
/// timer never matches what its slot currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticket {
    pub agent: AgentId,
    pub kind: TimerKind,
    pub seq: u64,
}

/// Owned handle to a scheduled timer. Dropping it cancels the timer.
#[derive(Debug)]
pub struct TimerHandle {
    ticket: Ticket,
    abort: Option<AbortHandle>,
}

impl TimerHandle {
    pub fn new(ticket: Ticket, abort: AbortHandle) -> Self {
        Self {
            ticket,
            abort: Some(abort),
        }
    }

    /// A handle with no backing task, for drivers that deliver tickets by hand.
    pub fn detached(ticket: Ticket) -> Self {
        Self {
            ticket,
            abort: None,
        }
    }

    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn cancel(self) {}
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        if let Some(abort) = self.abort.take() {
            abort.abort();
        }
    }
}

/// Turns tickets into real timers.
pub trait TimerDriver: Send + Sync {
    /// Delivers `ticket` once after `after`, or every `after` when `repeat` is set.
    fn schedule(&self, ticket: Ticket, after: Duration, repeat: bool) -> TimerHandle;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTimer {
    pub ticket: Ticket,
    pub after: Duration,
    pub repeat: bool,
}

/// Driver that only records what was scheduled. Tickets are delivered by
/// calling `Dashboard::fire` directly, which makes every interleaving
/// reproducible.
#[derive(Debug, Default)]
pub struct RecordingDriver {
    scheduled: Mutex<Vec<ScheduledTimer>>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scheduled(&self) -> Vec<ScheduledTimer> {
        self.scheduled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self, kind: TimerKind) -> usize {
        self.scheduled()
            .iter()
            .filter(|t| t.ticket.kind == kind)
            .count()
    }

    pub fn last(&self, agent: AgentId, kind: TimerKind) -> Option<ScheduledTimer> {
        self.scheduled()
            .into_iter()
            .rev()
            .find(|t| t.ticket.agent == agent && t.ticket.kind == kind)
    }
}

impl TimerDriver for RecordingDriver {
    fn schedule(&self, ticket: Ticket, after: Duration, repeat: bool) -> TimerHandle {
        self.scheduled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ScheduledTimer {
                ticket,
                after,
                repeat,
            });
        TimerHandle::detached(ticket)
    }
}
