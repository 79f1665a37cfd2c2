use std::collections::HashMap;
use std::sync::Arc;

use super::durations::DurationProvider;
use super::timer::{Ticket, TimerDriver, TimerHandle, TimerKind};
use crate::types::{AgentId, SlotState};

#[derive(Debug)]
struct PendingAdvance {
    handle: TimerHandle,
    step: usize,
}

/// Timers owned by one agent: at most one tick, at most one advance.
#[derive(Debug, Default)]
pub struct TimerSlot {
    tick: Option<TimerHandle>,
    advance: Option<PendingAdvance>,
}

impl TimerSlot {
    pub fn state(&self) -> SlotState {
        if self.tick.is_some() {
            SlotState::Running
        } else {
            SlotState::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.tick.is_some()
    }

    pub fn has_pending_advance(&self) -> bool {
        self.advance.is_some()
    }

    pub fn pending_advance_step(&self) -> Option<usize> {
        self.advance.as_ref().map(|a| a.step)
    }

    pub fn tick_ticket(&self) -> Option<Ticket> {
        self.tick.as_ref().map(TimerHandle::ticket)
    }

    pub fn advance_ticket(&self) -> Option<Ticket> {
        self.advance.as_ref().map(|a| a.handle.ticket())
    }

    /// Whether `ticket` is the timer this slot currently holds.
    pub fn accepts(&self, ticket: &Ticket) -> bool {
        let current = match ticket.kind {
            TimerKind::Tick => self.tick_ticket(),
            TimerKind::Advance => self.advance_ticket(),
        };
        current.as_ref() == Some(ticket)
    }

    fn cancel_tick(&mut self) {
        if let Some(handle) = self.tick.take() {
            handle.cancel();
        }
    }

    fn cancel_advance(&mut self) {
        if let Some(pending) = self.advance.take() {
            pending.handle.cancel();
        }
    }

    fn cancel_all(&mut self) {
        self.cancel_tick();
        self.cancel_advance();
    }
}

/// Per-agent timer slots keyed by stable agent identity.
pub struct Scheduler {
    driver: Arc<dyn TimerDriver>,
    durations: Arc<dyn DurationProvider>,
    slots: HashMap<AgentId, TimerSlot>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new(driver: Arc<dyn TimerDriver>, durations: Arc<dyn DurationProvider>) -> Self {
        Self {
            driver,
            durations,
            slots: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Creates an idle slot for a new agent.
    pub fn allocate(&mut self, agent: AgentId) {
        self.slots.entry(agent).or_default();
    }

    /// Drops the agent's slot, cancelling whatever it held.
    pub fn release(&mut self, agent: &AgentId) {
        if let Some(mut slot) = self.slots.remove(agent) {
            slot.cancel_all();
        }
    }

    pub fn slot(&self, agent: &AgentId) -> Option<&TimerSlot> {
        self.slots.get(agent)
    }

    pub fn accepts(&self, ticket: &Ticket) -> bool {
        self.slots
            .get(&ticket.agent)
            .map(|slot| slot.accepts(ticket))
            .unwrap_or(false)
    }

    /// Arms a fresh tick timer, replacing any previous one.
    pub fn start_tick(&mut self, agent: AgentId) -> Ticket {
        let ticket = self.issue(agent, TimerKind::Tick);
        let period = self.durations.next_duration(TimerKind::Tick);
        let handle = self.driver.schedule(ticket, period, true);

        let slot = self.slots.entry(agent).or_default();
        slot.cancel_tick();
        slot.tick = Some(handle);
        ticket
    }

    /// Arms the advance timer for `step`, replacing any pending one.
    pub fn schedule_advance(&mut self, agent: AgentId, step: usize) -> Ticket {
        let ticket = self.issue(agent, TimerKind::Advance);
        let delay = self.durations.next_duration(TimerKind::Advance);
        let handle = self.driver.schedule(ticket, delay, false);

        let slot = self.slots.entry(agent).or_default();
        slot.cancel_advance();
        slot.advance = Some(PendingAdvance { handle, step });
        ticket
    }

    /// Consumes a fired advance ticket and returns the step it was armed for.
    pub fn complete_advance(&mut self, ticket: &Ticket) -> Option<usize> {
        let slot = self.slots.get_mut(&ticket.agent)?;
        if ticket.kind != TimerKind::Advance || !slot.accepts(ticket) {
            return None;
        }
        slot.advance.take().map(|pending| pending.step)
    }

    pub fn stop_tick(&mut self, agent: &AgentId) {
        if let Some(slot) = self.slots.get_mut(agent) {
            slot.cancel_tick();
        }
    }

    pub fn stop(&mut self, agent: &AgentId) {
        if let Some(slot) = self.slots.get_mut(agent) {
            slot.cancel_all();
        }
    }

    pub fn stop_all(&mut self) {
        for slot in self.slots.values_mut() {
            slot.cancel_all();
        }
    }

    fn issue(&mut self, agent: AgentId, kind: TimerKind) -> Ticket {
        self.next_seq += 1;
        Ticket {
            agent,
            kind,
            seq: self.next_seq,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::durations::FixedDurations;
    use crate::engine::timer::RecordingDriver;
    use std::time::Duration;

    fn create_scheduler() -> (Scheduler, Arc<RecordingDriver>) {
        let driver = Arc::new(RecordingDriver::new());
        let durations = Arc::new(FixedDurations::new(
            Duration::from_millis(2000),
            Duration::from_millis(1200),
        ));
        (Scheduler::new(driver.clone(), durations), driver)
    }

    #[test]
    fn test_allocate_is_idle() {
        let (mut scheduler, _) = create_scheduler();
        let agent = AgentId::new_v4();
        scheduler.allocate(agent);

        let slot = scheduler.slot(&agent).unwrap();
        assert_eq!(slot.state(), SlotState::Idle);
        assert!(!slot.has_pending_advance());
    }

    #[test]
    fn test_restart_replaces_tick() {
        let (mut scheduler, driver) = create_scheduler();
        let agent = AgentId::new_v4();
        scheduler.allocate(agent);

        let first = scheduler.start_tick(agent);
        let second = scheduler.start_tick(agent);

        assert_ne!(first, second);
        assert!(!scheduler.accepts(&first));
        assert!(scheduler.accepts(&second));
        assert_eq!(driver.count(TimerKind::Tick), 2);
        assert_eq!(scheduler.slot(&agent).unwrap().tick_ticket(), Some(second));
    }

    #[test]
    fn test_advance_replaces_pending_advance() {
        let (mut scheduler, _) = create_scheduler();
        let agent = AgentId::new_v4();
        scheduler.allocate(agent);

        let first = scheduler.schedule_advance(agent, 0);
        let second = scheduler.schedule_advance(agent, 1);

        assert_eq!(scheduler.complete_advance(&first), None);
        assert_eq!(scheduler.complete_advance(&second), Some(1));
        assert!(!scheduler.slot(&agent).unwrap().has_pending_advance());
    }

    #[test]
    fn test_stop_invalidates_both() {
        let (mut scheduler, _) = create_scheduler();
        let agent = AgentId::new_v4();
        scheduler.allocate(agent);

        let tick = scheduler.start_tick(agent);
        let advance = scheduler.schedule_advance(agent, 2);
        scheduler.stop(&agent);

        assert!(!scheduler.accepts(&tick));
        assert!(!scheduler.accepts(&advance));
        assert_eq!(scheduler.slot(&agent).unwrap().state(), SlotState::Idle);
    }

    #[test]
    fn test_release_forgets_slot() {
        let (mut scheduler, _) = create_scheduler();
        let agent = AgentId::new_v4();
        scheduler.allocate(agent);
        let tick = scheduler.start_tick(agent);

        scheduler.release(&agent);
        assert!(scheduler.slot(&agent).is_none());
        assert!(!scheduler.accepts(&tick));
    }

    #[test]
    fn test_scheduled_durations_come_from_provider() {
        let (mut scheduler, driver) = create_scheduler();
        let agent = AgentId::new_v4();
        scheduler.start_tick(agent);
        scheduler.schedule_advance(agent, 0);

        let tick = driver.last(agent, TimerKind::Tick).unwrap();
        let advance = driver.last(agent, TimerKind::Advance).unwrap();
        assert_eq!(tick.after, Duration::from_millis(2000));
        assert!(tick.repeat);
        assert_eq!(advance.after, Duration::from_millis(1200));
        assert!(!advance.repeat);
    }
}
