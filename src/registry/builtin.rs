use crate::types::{ActivityEvent, Agent, EventKind, Step, StepList};

fn completed(labels: &[&str]) -> StepList {
    StepList::from_steps(
        labels
            .iter()
            .map(|label| Step {
                label: label.to_string(),
                done: true,
                active: false,
            })
            .collect(),
    )
}

/// The four agents the demo dashboard starts with. Only the last one is
/// enabled, sitting on its final step.
pub fn demo_agents() -> Vec<Agent> {
    vec![
        Agent::new(
            "Data Extraction".to_string(),
            "Extraction".to_string(),
            completed(&["Extraction", "Processing", "Uploading", "Mapped"]),
            false,
        ),
        Agent::new(
            "Risk Strategist".to_string(),
            "Risk".to_string(),
            completed(&[
                "Risk Score Calculation",
                "Risk Score Completed",
                "Strategy Generation",
                "Strategy Generated",
                "Strategy Allocated",
            ]),
            false,
        ),
        Agent::new(
            "IPS Writer".to_string(),
            "IPS".to_string(),
            completed(&[
                "IPS Generation Started",
                "IPS Generation in Progress",
                "IPS Generated",
            ]),
            false,
        ),
        Agent::new(
            "Portfolio Builder".to_string(),
            "Portfolio".to_string(),
            StepList::in_progress([
                "Portfolio Generation Started",
                "Portfolio Generation in Progress",
                "Portfolio Generated",
                "Portfolio Allocated",
            ]),
            true,
        ),
    ]
}

/// Seed log lines, newest first.
pub fn demo_logs() -> Vec<&'static str> {
    vec![
        "Agent 4: Portfolio Generated done",
        "Agent 4: Portfolio Generated started",
        "Agent 4: Portfolio Generation in Progress done",
        "Agent 4: Portfolio Generation in Progress started",
        "Agent 4: Portfolio Generation Started done",
        "Agent 4: Portfolio Generation Started started",
        "Agent 4 started",
    ]
}

/// Seed activity feed, newest first.
pub fn demo_feed() -> Vec<ActivityEvent> {
    vec![
        ActivityEvent::new("Agent 4", "Portfolio generated", EventKind::Status)
            .with_time("10:04 AM")
            .with_icon("✅"),
        ActivityEvent::new("Agent 3", "Stopped by user", EventKind::Error).with_time("10:03 AM"),
        ActivityEvent::new("Agent 2", "Risk score calculated", EventKind::Message)
            .with_time("10:02 AM"),
        ActivityEvent::new("Agent 1", "Started extraction", EventKind::Status).with_time("10:01 AM"),
    ]
}
