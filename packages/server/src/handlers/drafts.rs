use axum::Json;
use axum::extract::State;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tracing::instrument;

use crate::entity::draft;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::draft::*;
use crate::state::AppState;

use super::find_user;

/// Fetch the caller's working draft.
#[utoipa::path(
    get,
    path = "/",
    tag = "Draft",
    operation_id = "getDraft",
    summary = "Fetch the working draft",
    description = "Returns the caller's saved editor state, or `draft: null` when nothing is saved.",
    responses(
        (status = 200, description = "Draft lookup result", body = DraftResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Unknown account (USER_NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn get_draft(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<DraftResponse>, AppError> {
    let user = find_user(&state.db, &auth_user.subject).await?;

    let draft = draft::Entity::find()
        .filter(draft::Column::UserId.eq(user.id))
        .one(&state.db)
        .await?;

    Ok(Json(DraftResponse {
        draft: draft.map(Into::into),
    }))
}

/// Save the working draft.
#[utoipa::path(
    put,
    path = "/",
    tag = "Draft",
    operation_id = "saveDraft",
    summary = "Save the working draft",
    description = "Replaces the caller's draft wholesale. Each user keeps at most one draft, so a second save overwrites the first.",
    request_body = SaveDraftRequest,
    responses(
        (status = 200, description = "Saved draft", body = DraftDto),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Unknown account (USER_NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn save_draft(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<SaveDraftRequest>,
) -> Result<Json<DraftDto>, AppError> {
    validate_save_draft(&payload)?;

    let user = find_user(&state.db, &auth_user.subject).await?;

    let active = draft::ActiveModel {
        title: Set(payload.title),
        content: Set(payload.content),
        mood: Set(payload.mood),
        user_id: Set(user.id),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };

    // One draft per user. A second save replaces the first.
    let model = draft::Entity::insert(active)
        .on_conflict(
            OnConflict::column(draft::Column::UserId)
                .update_columns([
                    draft::Column::Title,
                    draft::Column::Content,
                    draft::Column::Mood,
                    draft::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_with_returning(&state.db)
        .await?;

    Ok(Json(model.into()))
}
