use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant};

use super::dashboard::Dashboard;
use super::timer::{Ticket, TimerDriver, TimerHandle};
use crate::config::Config;

pub type SharedDashboard = Arc<Mutex<Dashboard>>;

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Timer driver backed by tokio tasks.
///
/// Each timer is a task that only sends its ticket over a channel; it never
/// touches dashboard state.
#[derive(Debug, Clone)]
pub struct TokioDriver {
    tx: mpsc::UnboundedSender<Ticket>,
}

impl TokioDriver {
    pub fn new(tx: mpsc::UnboundedSender<Ticket>) -> Self {
        Self { tx }
    }
}

impl TimerDriver for TokioDriver {
    fn schedule(&self, ticket: Ticket, after: Duration, repeat: bool) -> TimerHandle {
        let tx = self.tx.clone();
        let after = after.max(MIN_PERIOD);

        let task = tokio::spawn(async move {
            if repeat {
                let mut interval = interval_at(Instant::now() + after, after);
                loop {
                    interval.tick().await;
                    if tx.send(ticket).is_err() {
                        break;
                    }
                }
            } else {
                sleep(after).await;
                let _ = tx.send(ticket);
            }
        });

        TimerHandle::new(ticket, task.abort_handle())
    }
}

/// A running dashboard: state behind one lock plus the task that delivers
/// fired tickets to it, one at a time.
pub struct Simulation {
    dashboard: SharedDashboard,
    dispatcher: JoinHandle<()>,
}

impl Simulation {
    /// Builds the dashboard around a tokio driver, runs the startup scan and
    /// begins dispatching. Must be called from within a tokio runtime.
    pub fn spawn<F>(build: F) -> Self
    where
        F: FnOnce(Arc<dyn TimerDriver>) -> Dashboard,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let driver: Arc<dyn TimerDriver> = Arc::new(TokioDriver::new(tx));

        let mut dashboard = build(driver);
        dashboard.initialize();

        let dashboard = Arc::new(Mutex::new(dashboard));
        let dispatcher = tokio::spawn(dispatch(dashboard.clone(), rx));

        Self {
            dashboard,
            dispatcher,
        }
    }

    /// The demo agents with randomized durations from `config`.
    pub fn demo(config: &Config) -> Self {
        let durations = Arc::new(config.durations());
        Self::spawn(|driver| Dashboard::demo(config, driver, durations))
    }

    pub fn dashboard(&self) -> SharedDashboard {
        self.dashboard.clone()
    }

    /// Cancels every timer and stops dispatching.
    pub async fn shutdown(self) {
        self.dashboard.lock().await.shutdown();
        self.dispatcher.abort();
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        self.dispatcher.abort();
    }
}

async fn dispatch(dashboard: SharedDashboard, mut rx: mpsc::UnboundedReceiver<Ticket>) {
    while let Some(ticket) = rx.recv().await {
        let outcome = dashboard.lock().await.fire(ticket);
        log::debug!(
            "{:?} ticket {} for agent {}: {:?}",
            ticket.kind,
            ticket.seq,
            ticket.agent,
            outcome
        );
    }
}
