use std::cmp;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use chrono::Utc;
use common::Mood;
use sea_orm::*;
use tracing::{debug, info, instrument, warn};

use crate::entity::{draft, entry};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::entry::*;
use crate::models::shared::Pagination;
use crate::services::page_cache::dashboard_path;
use crate::state::AppState;

use super::{enforce_protection, find_collection, find_user};

/// Find an entry owned by the given user, or return 404.
///
/// Another user's entry id gets the same 404 as a missing one, so ids
/// cannot be probed across accounts.
async fn find_entry<C: ConnectionTrait>(
    db: &C,
    id: i32,
    user_id: i32,
) -> Result<entry::Model, AppError> {
    entry::Entity::find_by_id(id)
        .filter(entry::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Entry not found".into()))
}

/// Look up the decorative header image for a mood query.
///
/// The lookup is best effort: any failure is logged and the entry is
/// stored without an image.
#[instrument(skip(state))]
async fn lookup_mood_image(state: &AppState, query: &str) -> Option<String> {
    match state.images.search(query).await {
        Ok(url) => url,
        Err(e) => {
            warn!(error = %e, "Image lookup failed, continuing without an image");
            None
        }
    }
}

/// Publish a journal entry.
#[utoipa::path(
    post,
    path = "/",
    tag = "Entries",
    operation_id = "createEntry",
    summary = "Publish a journal entry",
    description = "Publishes a new mood-tagged entry and clears the working draft. The abuse-protection screen runs before anything touches the database.",
    request_body = CreateEntryRequest,
    responses(
        (status = 201, description = "Entry published", body = EntryResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR, INVALID_MOOD)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Blocked automated client (REQUEST_BLOCKED)", body = ErrorBody),
        (status = 404, description = "Unknown account or collection (USER_NOT_FOUND, NOT_FOUND)", body = ErrorBody),
        (status = 429, description = "Rate limit exceeded (RATE_LIMITED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, headers, payload), fields(subject = %auth_user.subject))]
pub async fn create_entry(
    auth_user: AuthUser,
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(payload): AppJson<CreateEntryRequest>,
) -> Result<(StatusCode, Json<EntryResponse>), AppError> {
    validate_create_entry(&payload)?;
    enforce_protection(&state, &auth_user.subject, &headers, 1).await?;

    let user = find_user(&state.db, &auth_user.subject).await?;

    let mood =
        Mood::from_key(&payload.mood).ok_or_else(|| AppError::InvalidMood(payload.mood.clone()))?;

    let image_query = payload.mood_query.as_deref().unwrap_or(mood.as_str());
    let mood_image_url = lookup_mood_image(&state, image_query).await;

    let txn = state.db.begin().await?;

    if let Some(collection_id) = payload.collection_id {
        find_collection(&txn, collection_id, user.id).await?;
    }

    let now = Utc::now();
    let new_entry = entry::ActiveModel {
        title: Set(payload.title.trim().to_string()),
        content: Set(payload.content),
        mood: Set(mood),
        mood_score: Set(mood.score()),
        mood_image_url: Set(mood_image_url),
        user_id: Set(user.id),
        collection_id: Set(payload.collection_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let model = new_entry.insert(&txn).await?;

    // Publishing consumes the working draft. Deleting zero rows is fine.
    let cleared = draft::Entity::delete_many()
        .filter(draft::Column::UserId.eq(user.id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    if cleared.rows_affected > 0 {
        debug!(user_id = user.id, "Cleared working draft");
    }

    state.pages.invalidate(&dashboard_path(user.id));

    info!(user_id = user.id, entry_id = model.id, "Journal entry published");

    Ok((StatusCode::CREATED, Json(model.into())))
}

/// List the caller's entries.
#[utoipa::path(
    get,
    path = "/",
    tag = "Entries",
    operation_id = "listEntries",
    summary = "List journal entries",
    description = "Returns the caller's entries, newest first, optionally filtered to one collection or to unfiled entries.",
    params(EntryListQuery),
    responses(
        (status = 200, description = "List of entries", body = EntryListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Unknown account (USER_NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_entries(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<EntryListQuery>,
) -> Result<Json<EntryListResponse>, AppError> {
    let user = find_user(&state.db, &auth_user.subject).await?;

    let page = cmp::max(query.page.unwrap_or(1), 1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let mut base_select = entry::Entity::find().filter(entry::Column::UserId.eq(user.id));

    if let Some(collection_id) = query.collection_id {
        base_select = base_select.filter(entry::Column::CollectionId.eq(collection_id));
    } else if query.unfiled.unwrap_or(false) {
        base_select = base_select.filter(entry::Column::CollectionId.is_null());
    }

    let total = base_select.clone().count(&state.db).await?;

    let entries = base_select
        .order_by_desc(entry::Column::CreatedAt)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .all(&state.db)
        .await?;

    let data = entries.into_iter().map(EntryResponse::from).collect();
    let total_pages = total.div_ceil(per_page);

    Ok(Json(EntryListResponse {
        data,
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

/// Get a single entry.
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Entries",
    operation_id = "getEntry",
    summary = "Get entry details",
    params(
        ("id" = i32, Path, description = "Entry ID")
    ),
    responses(
        (status = 200, description = "Entry details", body = EntryResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Entry not found (NOT_FOUND, USER_NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(entry_id = %id))]
pub async fn get_entry(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<EntryResponse>, AppError> {
    let user = find_user(&state.db, &auth_user.subject).await?;
    let entry = find_entry(&state.db, id, user.id).await?;
    Ok(Json(entry.into()))
}

/// Edit an entry.
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Entries",
    operation_id = "updateEntry",
    summary = "Edit a journal entry",
    description = "Applies a partial update. Changing the mood also refreshes the header image when `mood_query` is provided. Setting `collection_id` to null unfiles the entry.",
    params(
        ("id" = i32, Path, description = "Entry ID")
    ),
    request_body = UpdateEntryRequest,
    responses(
        (status = 200, description = "Updated entry", body = EntryResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR, INVALID_MOOD)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Entry or collection not found (NOT_FOUND, USER_NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(entry_id = %id))]
pub async fn update_entry(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateEntryRequest>,
) -> Result<Json<EntryResponse>, AppError> {
    validate_update_entry(&payload)?;

    let user = find_user(&state.db, &auth_user.subject).await?;
    let existing = find_entry(&state.db, id, user.id).await?;

    let new_mood = match &payload.mood {
        Some(key) => {
            Some(Mood::from_key(key).ok_or_else(|| AppError::InvalidMood(key.clone()))?)
        }
        None => None,
    };

    // Refresh the image only when the mood actually changes and the client
    // sent search terms for it. Otherwise the stored image stays.
    let refreshed_image = match (new_mood, payload.mood_query.as_deref()) {
        (Some(mood), Some(query)) if mood != existing.mood => {
            Some(lookup_mood_image(&state, query).await)
        }
        _ => None,
    };

    if let Some(Some(collection_id)) = payload.collection_id {
        find_collection(&state.db, collection_id, user.id).await?;
    }

    let mut active: entry::ActiveModel = existing.into();
    if let Some(title) = payload.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(content) = payload.content {
        active.content = Set(content);
    }
    if let Some(mood) = new_mood {
        active.mood = Set(mood);
        active.mood_score = Set(mood.score());
    }
    if let Some(image) = refreshed_image {
        active.mood_image_url = Set(image);
    }
    if let Some(target) = payload.collection_id {
        active.collection_id = Set(target);
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(&state.db).await?;

    state.pages.invalidate(&dashboard_path(user.id));

    Ok(Json(updated.into()))
}

/// Delete an entry.
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Entries",
    operation_id = "deleteEntry",
    summary = "Delete a journal entry",
    params(
        ("id" = i32, Path, description = "Entry ID")
    ),
    responses(
        (status = 204, description = "Entry deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Entry not found (NOT_FOUND, USER_NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(entry_id = %id))]
pub async fn delete_entry(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let user = find_user(&state.db, &auth_user.subject).await?;

    let result = entry::Entity::delete_many()
        .filter(entry::Column::Id.eq(id))
        .filter(entry::Column::UserId.eq(user.id))
        .exec(&state.db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Entry not found".into()));
    }

    state.pages.invalidate(&dashboard_path(user.id));

    info!(user_id = user.id, entry_id = id, "Journal entry deleted");

    Ok(StatusCode::NO_CONTENT)
}
