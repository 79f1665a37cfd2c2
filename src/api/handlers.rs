use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::engine::{Dashboard, SharedDashboard};
use crate::types::{ActivityEvent, AgentSummary, NewAgent, StepList};

#[derive(Deserialize)]
pub struct CreateAgentRequest {
    pub name: String,
    #[serde(rename = "type", alias = "kind")]
    pub kind: String,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub steps_text: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub notifications: bool,
}

impl From<CreateAgentRequest> for NewAgent {
    fn from(request: CreateAgentRequest) -> Self {
        let mut steps = request.steps;
        if let Some(text) = request.steps_text.as_deref() {
            steps.extend(NewAgent::parse_steps(text));
        }
        Self {
            name: request.name,
            kind: request.kind,
            steps,
            enabled: request.enabled,
            notifications: request.notifications,
        }
    }
}

#[derive(Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct AgentResponse {
    #[serde(flatten)]
    pub summary: AgentSummary,
    pub steps: StepList,
}

impl AgentResponse {
    fn load(dashboard: &Dashboard, index: usize) -> Result<Self, ApiError> {
        Ok(Self {
            summary: dashboard.summary(index)?,
            steps: dashboard.agent(index)?.steps.clone(),
        })
    }
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn list_agents(
    State(dashboard): State<SharedDashboard>,
) -> Result<Json<Vec<AgentResponse>>, ApiError> {
    let dashboard = dashboard.lock().await;
    let agents = (0..dashboard.len())
        .map(|i| AgentResponse::load(&dashboard, i))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(agents))
}

pub async fn create_agent(
    State(dashboard): State<SharedDashboard>,
    Json(request): Json<CreateAgentRequest>,
) -> Result<(StatusCode, Json<AgentResponse>), ApiError> {
    let mut dashboard = dashboard.lock().await;
    let index = dashboard.add_agent(request.into())?;
    Ok((StatusCode::CREATED, Json(AgentResponse::load(&dashboard, index)?)))
}

pub async fn get_agent(
    State(dashboard): State<SharedDashboard>,
    Path(index): Path<usize>,
) -> Result<Json<AgentResponse>, ApiError> {
    let dashboard = dashboard.lock().await;
    Ok(Json(AgentResponse::load(&dashboard, index)?))
}

pub async fn toggle_agent(
    State(dashboard): State<SharedDashboard>,
    Path(index): Path<usize>,
) -> Result<Json<AgentResponse>, ApiError> {
    let mut dashboard = dashboard.lock().await;
    dashboard.toggle_enabled(index)?;
    Ok(Json(AgentResponse::load(&dashboard, index)?))
}

pub async fn reset_agent(
    State(dashboard): State<SharedDashboard>,
    Path(index): Path<usize>,
) -> Result<Json<AgentResponse>, ApiError> {
    let mut dashboard = dashboard.lock().await;
    dashboard.reset_agent(index)?;
    Ok(Json(AgentResponse::load(&dashboard, index)?))
}

pub async fn remove_agent(
    State(dashboard): State<SharedDashboard>,
    Path(index): Path<usize>,
) -> Result<StatusCode, ApiError> {
    dashboard.lock().await.remove_agent(index)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reset_all(State(dashboard): State<SharedDashboard>) -> StatusCode {
    dashboard.lock().await.reset_all();
    StatusCode::NO_CONTENT
}

pub async fn get_logs(State(dashboard): State<SharedDashboard>) -> Json<Vec<String>> {
    let dashboard = dashboard.lock().await;
    Json(dashboard.logs().iter().map(|e| e.line()).collect())
}

pub async fn clear_logs(State(dashboard): State<SharedDashboard>) -> StatusCode {
    dashboard.lock().await.clear_logs();
    StatusCode::NO_CONTENT
}

pub async fn get_feed(State(dashboard): State<SharedDashboard>) -> Json<Vec<ActivityEvent>> {
    let dashboard = dashboard.lock().await;
    Json(dashboard.feed().iter().cloned().collect())
}

pub async fn send_message(
    State(dashboard): State<SharedDashboard>,
    Json(request): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<ActivityEvent>), ApiError> {
    let event = dashboard.lock().await.send_message(&request.text)?;
    Ok((StatusCode::CREATED, Json(event)))
}
