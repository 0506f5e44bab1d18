//! Custom-action webhook in the dialogue runtime's wire format.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parley_agent::ActionRuntime;
use parley_core::domain::protocol::{ActionRequest, ActionResponse};
use parley_core::errors::InterfaceError;
use parley_db::DbPool;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::health::health_route;

#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<ActionRuntime>,
    pub profile_pool: DbPool,
    pub llm_configured: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionInfo {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub action_name: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(webhook))
        .route("/actions", get(list_actions))
        .route("/health", get(health_route))
        .with_state(state)
}

async fn webhook(
    State(state): State<AppState>,
    Json(request): Json<ActionRequest>,
) -> Result<Json<ActionResponse>, WebhookError> {
    let correlation_id = Uuid::new_v4().to_string();
    state
        .runtime
        .handle(request, &correlation_id)
        .await
        .map(Json)
        .map_err(|error| WebhookError(error.into_interface(correlation_id)))
}

async fn list_actions(State(state): State<AppState>) -> Json<Vec<ActionInfo>> {
    Json(
        state
            .runtime
            .action_names()
            .into_iter()
            .map(|name| ActionInfo { name: name.to_owned() })
            .collect(),
    )
}

pub struct WebhookError(InterfaceError);

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let error = self.0;
        let status = match &error {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
        };

        warn!(
            event_name = "webhook.request.failed",
            correlation_id = error.correlation_id(),
            action_name = error.action_name().unwrap_or("unknown"),
            status = status.as_u16(),
            error = %error,
            "webhook call failed"
        );

        let body = ErrorBody {
            error: error.message().to_owned(),
            action_name: error.action_name().map(str::to_owned),
        };
        (status, Json(body)).into_response()
    }
}
