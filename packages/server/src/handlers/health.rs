use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: &'static str,
}

/// Liveness probe. Pings the database, so a 200 means the whole request
/// path is serviceable.
#[utoipa::path(
    get,
    path = "/healthz",
    tag = "Health",
    operation_id = "healthz",
    summary = "Liveness probe",
    responses(
        (status = 200, description = "Server and database are reachable", body = HealthResponse),
        (status = 500, description = "Database unreachable (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
pub async fn healthz(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    state.db.ping().await?;
    Ok(Json(HealthResponse { status: "ok" }))
}
