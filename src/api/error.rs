use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::error::DashboardError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Dashboard(#[from] DashboardError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Dashboard(DashboardError::AgentNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Dashboard(DashboardError::InvalidAgent(_))
            | ApiError::Dashboard(DashboardError::EmptyMessage) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Dashboard(DashboardError::InvalidConfig(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
