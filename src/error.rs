use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DashboardError {
    #[error("Agent not found at index {0}")]
    AgentNotFound(usize),

    #[error("Invalid agent: {0}")]
    InvalidAgent(String),

    #[error("Message is empty")]
    EmptyMessage,

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
