use serde::{Deserialize, Serialize};

use super::{AgentId, StepList};
use crate::error::{DashboardError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub enabled: bool,
    pub notifications: bool,
    pub steps: StepList,
}

impl Agent {
    pub fn new(name: String, kind: String, steps: StepList, enabled: bool) -> Self {
        Self {
            id: AgentId::new_v4(),
            name,
            kind,
            enabled,
            notifications: false,
            steps,
        }
    }

    /// Disables the agent and leaves it one step from completion.
    pub fn reset(&mut self) {
        self.enabled = false;
        self.steps.reset_to_last();
    }
}

/// Input for creating an agent at runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewAgent {
    pub name: String,
    #[serde(rename = "type", alias = "kind")]
    pub kind: String,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub notifications: bool,
}

impl NewAgent {
    /// Splits free-form step text on newlines and commas, dropping blanks.
    pub fn parse_steps(text: &str) -> Vec<String> {
        text.split(|c| c == '\n' || c == ',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(DashboardError::InvalidAgent("name is required".to_string()));
        }
        if self.kind.trim().is_empty() {
            return Err(DashboardError::InvalidAgent("type is required".to_string()));
        }
        if self.labels().is_empty() {
            return Err(DashboardError::InvalidAgent(
                "at least one step is required".to_string(),
            ));
        }
        Ok(())
    }

    fn labels(&self) -> Vec<String> {
        self.steps
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn into_agent(self) -> Result<Agent> {
        self.validate()?;
        let steps = StepList::pending(self.labels());
        let mut agent = Agent::new(
            self.name.trim().to_string(),
            self.kind.trim().to_string(),
            steps,
            self.enabled,
        );
        agent.notifications = self.notifications;
        Ok(agent)
    }
}
