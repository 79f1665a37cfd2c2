pub mod agent;
pub mod event;
pub mod step;

pub use agent::{Agent, NewAgent};
pub use event::{ActivityEvent, EventKind, LogEntry};
pub use step::{Step, StepList};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type AgentId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotState {
    Idle,    // No tick timer
    Running, // Tick timer scheduled
}

impl SlotState {
    pub fn as_str(&self) -> &str {
        match self {
            SlotState::Idle => "Idle",
            SlotState::Running => "Running",
        }
    }
}

/// Read-only view of one agent as shown on a dashboard card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSummary {
    pub index: usize,
    pub ordinal: usize,
    pub id: AgentId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub enabled: bool,
    pub state: SlotState,
    pub current_step: Option<String>,
    pub progress: u8,
}

impl AgentSummary {
    pub fn from_agent(index: usize, agent: &Agent, state: SlotState) -> Self {
        Self {
            index,
            ordinal: index + 1,
            id: agent.id,
            name: agent.name.clone(),
            kind: agent.kind.clone(),
            enabled: agent.enabled,
            state,
            current_step: agent.steps.current_label().map(String::from),
            progress: agent.steps.percent_complete(),
        }
    }
}
