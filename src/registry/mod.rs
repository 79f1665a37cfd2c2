pub mod builtin;

use crate::error::{DashboardError, Result};
use crate::types::{Agent, AgentId};

/// Agents in display order.
///
/// Position is the addressing key for callers; the 1-based ordinal shown in
/// log text is derived from it at call time, so it shifts if an earlier agent
/// is removed. Timer bookkeeping is keyed by [`AgentId`] instead.
#[derive(Debug, Clone, Default)]
pub struct AgentRegistry {
    agents: Vec<Agent>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Appends an agent and returns its index.
    pub fn push(&mut self, agent: Agent) -> usize {
        self.agents.push(agent);
        self.agents.len() - 1
    }

    pub fn get(&self, index: usize) -> Result<&Agent> {
        self.agents
            .get(index)
            .ok_or(DashboardError::AgentNotFound(index))
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut Agent> {
        self.agents
            .get_mut(index)
            .ok_or(DashboardError::AgentNotFound(index))
    }

    pub fn find_mut(&mut self, id: &AgentId) -> Option<(usize, &mut Agent)> {
        self.agents
            .iter_mut()
            .enumerate()
            .find(|(_, a)| &a.id == id)
    }

    pub fn remove(&mut self, index: usize) -> Result<Agent> {
        if index >= self.agents.len() {
            return Err(DashboardError::AgentNotFound(index));
        }
        Ok(self.agents.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Agent> {
        self.agents.iter_mut()
    }

    pub fn as_slice(&self) -> &[Agent] {
        &self.agents
    }
}
