use std::sync::Arc;

use super::durations::DurationProvider;
use super::progression::{self, TickOutcome};
use super::scheduler::{Scheduler, TimerSlot};
use super::timer::{Ticket, TimerDriver, TimerKind};
use crate::config::Config;
use crate::error::{DashboardError, Result};
use crate::events::{ActivityFeed, LogBook};
use crate::registry::{builtin, AgentRegistry};
use crate::types::{ActivityEvent, Agent, AgentId, AgentSummary, NewAgent, SlotState};

/// What happened when a ticket was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// The timer was cancelled or replaced, or its agent is gone or disabled.
    Stale,
    /// A tick made this step active; its advance timer is armed.
    Started { step: usize },
    /// A tick found nothing left to start and stopped the tick timer.
    Finished,
    /// An advance completed this step.
    Advanced { step: usize },
}

/// Agents, their timers and the logs they produce.
///
/// All state changes go through `&mut self`, so whoever owns the dashboard
/// decides how callbacks are serialized. Timers never touch it directly: they
/// deliver a [`Ticket`] to [`Dashboard::fire`].
pub struct Dashboard {
    registry: AgentRegistry,
    scheduler: Scheduler,
    logs: LogBook,
    feed: ActivityFeed,
}

impl Dashboard {
    pub fn new(
        config: &Config,
        driver: Arc<dyn TimerDriver>,
        durations: Arc<dyn DurationProvider>,
    ) -> Self {
        Self {
            registry: AgentRegistry::new(),
            scheduler: Scheduler::new(driver, durations),
            logs: LogBook::new(config.log_capacity),
            feed: ActivityFeed::new(config.feed_capacity),
        }
    }

    /// Dashboard preloaded with the demo agents, logs and feed.
    pub fn demo(
        config: &Config,
        driver: Arc<dyn TimerDriver>,
        durations: Arc<dyn DurationProvider>,
    ) -> Self {
        Self::new(config, driver, durations)
            .with_agents(builtin::demo_agents())
            .with_seed_logs(builtin::demo_logs())
            .with_feed(builtin::demo_feed())
    }

    /// Registers agents as-is, each with an idle slot. Nothing is logged.
    pub fn with_agents(mut self, agents: Vec<Agent>) -> Self {
        for agent in agents {
            self.scheduler.allocate(agent.id);
            self.registry.push(agent);
        }
        self
    }

    /// Seeds the log with lines given newest first.
    pub fn with_seed_logs<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        I::IntoIter: DoubleEndedIterator,
        S: Into<String>,
    {
        for line in lines.into_iter().rev() {
            self.logs.push(line);
        }
        self
    }

    /// Seeds the feed with events given newest first.
    pub fn with_feed(mut self, events: Vec<ActivityEvent>) -> Self {
        for event in events.into_iter().rev() {
            self.feed.push(event);
        }
        self
    }

    /// Marks every agent enabled ahead of [`Dashboard::initialize`].
    pub fn with_all_enabled(mut self) -> Self {
        for agent in self.registry.iter_mut() {
            agent.enabled = true;
        }
        self
    }

    /// Starts every agent that is enabled. Called once when the engine comes up.
    pub fn initialize(&mut self) {
        let enabled: Vec<_> = self
            .registry
            .iter()
            .filter(|a| a.enabled)
            .map(|a| a.id)
            .collect();
        for id in enabled {
            self.start(id);
        }
        log::info!(
            "Dashboard initialized with {} agents ({} running)",
            self.registry.len(),
            self.running_count()
        );
    }

    fn start(&mut self, id: AgentId) {
        let Some((index, agent)) = self.registry.find_mut(&id) else {
            return;
        };
        let resume_at = progression::resume(&mut agent.steps);
        self.scheduler.start_tick(id);
        log::debug!("Agent {} running from step {}", index + 1, resume_at);
    }

    pub fn add_agent(&mut self, draft: NewAgent) -> Result<usize> {
        let agent = draft.into_agent()?;
        let message = format!("{} ({})", agent.name, agent.kind);

        self.scheduler.allocate(agent.id);
        let index = self.registry.push(agent);
        self.logs
            .push(format!("Agent {} added: {}", index + 1, message));
        Ok(index)
    }

    /// Flips `enabled`, starting or stopping the agent's timers. Returns the
    /// new value.
    pub fn toggle_enabled(&mut self, index: usize) -> Result<bool> {
        let agent = self.registry.get_mut(index)?;
        agent.enabled = !agent.enabled;
        let (id, enabled) = (agent.id, agent.enabled);

        if enabled {
            self.start(id);
            self.logs.push(format!("Agent {} started", index + 1));
        } else {
            self.scheduler.stop(&id);
            self.logs.push(format!("Agent {} stopped", index + 1));
        }
        Ok(enabled)
    }

    pub fn reset_agent(&mut self, index: usize) -> Result<()> {
        let agent = self.registry.get_mut(index)?;
        agent.reset();
        let id = agent.id;

        self.scheduler.stop(&id);
        self.logs.push(format!("Agent {} reset", index + 1));
        Ok(())
    }

    pub fn reset_all(&mut self) {
        for agent in self.registry.iter_mut() {
            agent.reset();
        }
        self.scheduler.stop_all();
        self.logs.push("All agents reset");
    }

    pub fn remove_agent(&mut self, index: usize) -> Result<Agent> {
        let agent = self.registry.remove(index)?;
        self.scheduler.release(&agent.id);
        self.logs
            .push(format!("Agent {} removed: {}", index + 1, agent.name));
        Ok(agent)
    }

    /// Empties both the log and the activity feed.
    pub fn clear_logs(&mut self) {
        self.logs.clear();
        self.feed.clear();
    }

    pub fn send_message(&mut self, text: &str) -> Result<ActivityEvent> {
        self.feed.send_message(text)
    }

    /// Delivers a fired timer.
    pub fn fire(&mut self, ticket: Ticket) -> FireOutcome {
        if !self.scheduler.accepts(&ticket) {
            log::trace!("Dropping stale {:?} ticket {}", ticket.kind, ticket.seq);
            return FireOutcome::Stale;
        }
        match ticket.kind {
            TimerKind::Tick => self.on_tick(ticket),
            TimerKind::Advance => self.on_advance(ticket),
        }
    }

    fn on_tick(&mut self, ticket: Ticket) -> FireOutcome {
        let Some((index, agent)) = self.registry.find_mut(&ticket.agent) else {
            return FireOutcome::Stale;
        };
        if !agent.enabled {
            return FireOutcome::Stale;
        }

        match progression::tick(&mut agent.steps) {
            TickOutcome::Started(step) => {
                let label = agent
                    .steps
                    .get(step)
                    .map(|s| s.label.clone())
                    .unwrap_or_default();
                self.logs
                    .push(format!("Agent {}: {} started", index + 1, label));
                // An advance already in flight for this step still completes it.
                let in_flight = self
                    .scheduler
                    .slot(&ticket.agent)
                    .and_then(TimerSlot::pending_advance_step);
                if in_flight != Some(step) {
                    self.scheduler.schedule_advance(ticket.agent, step);
                }
                FireOutcome::Started { step }
            }
            TickOutcome::AllDone => {
                self.logs
                    .push(format!("Agent {}: All steps done", index + 1));
                self.scheduler.stop_tick(&ticket.agent);
                log::info!("Agent {} finished all steps", index + 1);
                FireOutcome::Finished
            }
        }
    }

    fn on_advance(&mut self, ticket: Ticket) -> FireOutcome {
        let Some((index, agent)) = self.registry.find_mut(&ticket.agent) else {
            return FireOutcome::Stale;
        };
        if !agent.enabled {
            return FireOutcome::Stale;
        }
        let Some(step) = self.scheduler.complete_advance(&ticket) else {
            return FireOutcome::Stale;
        };
        if !progression::advance(&mut agent.steps, step) {
            log::warn!("Advance for agent {} points past step {}", index + 1, step);
            return FireOutcome::Stale;
        }

        let label = agent
            .steps
            .get(step)
            .map(|s| s.label.clone())
            .unwrap_or_default();
        self.logs
            .push(format!("Agent {}: {} done", index + 1, label));
        FireOutcome::Advanced { step }
    }

    /// Cancels every timer. Agents keep their `enabled` flags.
    pub fn shutdown(&mut self) {
        self.scheduler.stop_all();
        log::info!("Dashboard timers stopped");
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn agents(&self) -> &[Agent] {
        self.registry.as_slice()
    }

    pub fn agent(&self, index: usize) -> Result<&Agent> {
        self.registry.get(index)
    }

    pub fn slot(&self, index: usize) -> Result<&TimerSlot> {
        let agent = self.registry.get(index)?;
        self.scheduler
            .slot(&agent.id)
            .ok_or(DashboardError::AgentNotFound(index))
    }

    pub fn summary(&self, index: usize) -> Result<AgentSummary> {
        let agent = self.registry.get(index)?;
        Ok(AgentSummary::from_agent(index, agent, self.slot_state(agent)))
    }

    pub fn summaries(&self) -> Vec<AgentSummary> {
        self.registry
            .iter()
            .enumerate()
            .map(|(i, a)| AgentSummary::from_agent(i, a, self.slot_state(a)))
            .collect()
    }

    pub fn running_count(&self) -> usize {
        self.registry
            .iter()
            .filter(|a| self.slot_state(a) == SlotState::Running)
            .count()
    }

    pub fn logs(&self) -> &LogBook {
        &self.logs
    }

    pub fn feed(&self) -> &ActivityFeed {
        &self.feed
    }

    fn slot_state(&self, agent: &Agent) -> SlotState {
        self.scheduler
            .slot(&agent.id)
            .map(TimerSlot::state)
            .unwrap_or(SlotState::Idle)
    }
}
