use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use parley_db::DbPool;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub profile_store: HealthCheck,
    pub llm: HealthCheck,
    pub checked_at: String,
}

/// Readiness follows the profile store only; a missing model endpoint is
/// reported but does not degrade the server.
pub async fn health(
    profile_pool: &DbPool,
    llm_configured: bool,
) -> (StatusCode, Json<HealthResponse>) {
    let profile_store = database_check(profile_pool).await;
    let ready = profile_store.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "parley action server initialized".to_string(),
        },
        profile_store,
        llm: if llm_configured {
            HealthCheck { status: "ready", detail: "llm endpoint configured".to_string() }
        } else {
            HealthCheck {
                status: "unconfigured",
                detail: "llm.endpoint or llm.api_key is not set".to_string(),
            }
        },
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

pub(crate) async fn health_route(
    State(state): State<crate::webhook::AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    health(&state.profile_pool, state.llm_configured).await
}

async fn database_check(pool: &DbPool) -> HealthCheck {
    match sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(pool).await {
        Ok(_) => HealthCheck { status: "ready", detail: "profile store query succeeded".to_string() },
        Err(error) => HealthCheck {
            status: "degraded",
            detail: format!("profile store query failed: {error}"),
        },
    }
}
