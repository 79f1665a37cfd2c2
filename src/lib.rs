pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod registry;
pub mod types;

pub use config::Config;
pub use engine::{Dashboard, FireOutcome, Simulation};
pub use error::{DashboardError, Result};
pub use types::*;
