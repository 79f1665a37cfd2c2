use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::api::handlers;
use crate::engine::SharedDashboard;

#[derive(Clone)]
pub struct AppState {
    pub dashboard: SharedDashboard,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/agents",
            get(handlers::list_agents).post(handlers::create_agent),
        )
        .route(
            "/agents/:index",
            get(handlers::get_agent).delete(handlers::remove_agent),
        )
        .route("/agents/:index/toggle", post(handlers::toggle_agent))
        .route("/agents/:index/reset", post(handlers::reset_agent))
        .route("/reset", post(handlers::reset_all))
        .route("/logs", get(handlers::get_logs).delete(handlers::clear_logs))
        .route("/feed", get(handlers::get_feed).post(handlers::send_message))
        .layer(CorsLayer::permissive())
        .with_state(state.dashboard)
}

pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    log::info!("agentdeck API listening on port {}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::engine::{Dashboard, FixedDurations, RecordingDriver};

    fn create_test_app() -> (Router, SharedDashboard) {
        let dashboard = Dashboard::demo(
            &Config::default(),
            Arc::new(RecordingDriver::new()),
            Arc::new(FixedDurations::fastest()),
        );
        let dashboard = Arc::new(Mutex::new(dashboard));
        let state = AppState {
            dashboard: dashboard.clone(),
        };
        (create_router(state), dashboard)
    }

    async fn send(
        app: Router,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_health_check() {
        let (app, _) = create_test_app();
        let (status, json) = send(app, "GET", "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn test_list_agents() {
        let (app, _) = create_test_app();
        let (status, json) = send(app, "GET", "/agents", None).await;

        assert_eq!(status, StatusCode::OK);
        let agents = json.as_array().unwrap();
        assert_eq!(agents.len(), 4);
        assert_eq!(agents[0]["ordinal"], 1);
        assert_eq!(agents[0]["progress"], 100);
        assert_eq!(agents[3]["current_step"], "Portfolio Allocated");
        assert_eq!(agents[3]["steps"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_create_agent() {
        let (app, dashboard) = create_test_app();
        let (status, json) = send(
            app,
            "POST",
            "/agents",
            Some(serde_json::json!({
                "name": "Crawler",
                "type": "Search",
                "steps_text": "Fetch, Parse\nStore",
                "enabled": true
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["index"], 4);
        assert_eq!(json["type"], "Search");
        assert_eq!(json["state"], "Idle");
        assert_eq!(json["steps"].as_array().unwrap().len(), 3);
        assert_eq!(dashboard.lock().await.len(), 5);
    }

    #[tokio::test]
    async fn test_create_invalid_agent() {
        let (app, dashboard) = create_test_app();
        let (status, json) = send(
            app,
            "POST",
            "/agents",
            Some(serde_json::json!({ "name": "", "type": "Search", "steps": ["A"] })),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(json["error"].as_str().unwrap().contains("name"));
        assert_eq!(dashboard.lock().await.len(), 4);
    }

    #[tokio::test]
    async fn test_toggle_agent() {
        let (app, dashboard) = create_test_app();
        let (status, json) = send(app, "POST", "/agents/0/toggle", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["enabled"], true);
        assert_eq!(json["state"], "Running");
        assert_eq!(
            dashboard.lock().await.logs().latest().unwrap().message,
            "Agent 1 started"
        );
    }

    #[tokio::test]
    async fn test_unknown_agent() {
        let (app, _) = create_test_app();
        let (status, json) = send(app, "POST", "/agents/9/toggle", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].as_str().unwrap().contains("9"));
    }

    #[tokio::test]
    async fn test_remove_agent() {
        let (app, dashboard) = create_test_app();
        let (status, _) = send(app, "DELETE", "/agents/1", None).await;

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(dashboard.lock().await.len(), 3);
    }

    #[tokio::test]
    async fn test_reset_all() {
        let (app, dashboard) = create_test_app();
        let (status, _) = send(app, "POST", "/reset", None).await;

        assert_eq!(status, StatusCode::NO_CONTENT);
        let dashboard = dashboard.lock().await;
        assert!(dashboard.agents().iter().all(|a| !a.enabled));
        assert_eq!(dashboard.logs().latest().unwrap().message, "All agents reset");
    }

    #[tokio::test]
    async fn test_logs_and_clear() {
        let (app, _) = create_test_app();
        let (status, json) = send(app.clone(), "GET", "/logs", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json[0].as_str().unwrap().ends_with("Agent 4: Portfolio Generated done"));

        let (status, _) = send(app.clone(), "DELETE", "/logs", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, logs) = send(app.clone(), "GET", "/logs", None).await;
        let (_, feed) = send(app, "GET", "/feed", None).await;
        assert!(logs.as_array().unwrap().is_empty());
        assert!(feed.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_message() {
        let (app, _) = create_test_app();
        let (status, json) = send(
            app.clone(),
            "POST",
            "/feed",
            Some(serde_json::json!({ "text": "status update?" })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["source"], "You");
        assert_eq!(json["type"], "message");

        let (_, feed) = send(app.clone(), "GET", "/feed", None).await;
        assert_eq!(feed.as_array().unwrap().len(), 5);
        assert_eq!(feed[0]["text"], "status update?");

        let (status, _) = send(
            app,
            "POST",
            "/feed",
            Some(serde_json::json!({ "text": "   " })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
