pub mod dashboard;
pub mod durations;
pub mod progression;
pub mod runtime;
pub mod scheduler;
pub mod timer;

pub use dashboard::{Dashboard, FireOutcome};
pub use durations::{DurationProvider, DurationRange, FixedDurations, RandomDurations};
pub use progression::TickOutcome;
pub use runtime::{SharedDashboard, Simulation, TokioDriver};
pub use scheduler::{Scheduler, TimerSlot};
pub use timer::{RecordingDriver, ScheduledTimer, Ticket, TimerDriver, TimerHandle, TimerKind};
