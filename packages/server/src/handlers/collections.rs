use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use chrono::Utc;
use sea_orm::sea_query::LockType;
use sea_orm::*;
use tracing::{info, instrument};

use crate::entity::{collection, entry};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::collection::*;
use crate::services::page_cache::dashboard_path;
use crate::state::AppState;

use super::{enforce_protection, find_user};

/// Create a collection.
#[utoipa::path(
    post,
    path = "/",
    tag = "Collections",
    operation_id = "createCollection",
    summary = "Create a collection",
    description = "Creates a named collection for filing entries. Names are unique per user. The abuse-protection screen runs first, as for publishing.",
    request_body = CreateCollectionRequest,
    responses(
        (status = 201, description = "Collection created", body = CollectionResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Blocked automated client (REQUEST_BLOCKED)", body = ErrorBody),
        (status = 404, description = "Unknown account (USER_NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Duplicate name (CONFLICT)", body = ErrorBody),
        (status = 429, description = "Rate limit exceeded (RATE_LIMITED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, headers, payload), fields(subject = %auth_user.subject))]
pub async fn create_collection(
    auth_user: AuthUser,
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(payload): AppJson<CreateCollectionRequest>,
) -> Result<(StatusCode, Json<CollectionResponse>), AppError> {
    validate_create_collection(&payload)?;
    enforce_protection(&state, &auth_user.subject, &headers, 1).await?;

    let user = find_user(&state.db, &auth_user.subject).await?;

    let new_collection = collection::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description),
        user_id: Set(user.id),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let model = match new_collection.insert(&state.db).await {
        Ok(model) => model,
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            return Err(AppError::Conflict(
                "A collection with this name already exists".into(),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id = user.id, collection_id = model.id, "Collection created");

    Ok((
        StatusCode::CREATED,
        Json(CollectionResponse::from_model(model, 0)),
    ))
}

/// List the caller's collections.
#[utoipa::path(
    get,
    path = "/",
    tag = "Collections",
    operation_id = "listCollections",
    summary = "List collections",
    description = "Returns the caller's collections sorted by name, each with the number of entries filed under it.",
    responses(
        (status = 200, description = "List of collections", body = CollectionListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Unknown account (USER_NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_collections(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<CollectionListResponse>, AppError> {
    let user = find_user(&state.db, &auth_user.subject).await?;

    let collections = collection::Entity::find()
        .filter(collection::Column::UserId.eq(user.id))
        .order_by_asc(collection::Column::Name)
        .all(&state.db)
        .await?;

    let counts: Vec<(Option<i32>, i64)> = entry::Entity::find()
        .select_only()
        .column(entry::Column::CollectionId)
        .column_as(entry::Column::Id.count(), "count")
        .filter(entry::Column::UserId.eq(user.id))
        .filter(entry::Column::CollectionId.is_not_null())
        .group_by(entry::Column::CollectionId)
        .into_tuple()
        .all(&state.db)
        .await?;
    let by_collection: HashMap<i32, i64> = counts
        .into_iter()
        .filter_map(|(id, count)| id.map(|id| (id, count)))
        .collect();

    let data = collections
        .into_iter()
        .map(|model| {
            let entry_count = by_collection.get(&model.id).copied().unwrap_or(0) as u64;
            CollectionResponse::from_model(model, entry_count)
        })
        .collect();

    Ok(Json(CollectionListResponse { data }))
}

/// Delete a collection.
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Collections",
    operation_id = "deleteCollection",
    summary = "Delete a collection",
    description = "Deletes the collection. Entries filed under it survive and become unfiled; both steps happen in one transaction.",
    params(
        ("id" = i32, Path, description = "Collection ID")
    ),
    responses(
        (status = 204, description = "Collection deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Collection not found (NOT_FOUND, USER_NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(collection_id = %id))]
pub async fn delete_collection(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let user = find_user(&state.db, &auth_user.subject).await?;

    let txn = state.db.begin().await?;

    // Hold the row so two concurrent deletes cannot both unfile.
    let target = collection::Entity::find_by_id(id)
        .filter(collection::Column::UserId.eq(user.id))
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let Some(target) = target else {
        txn.rollback().await?;
        return Err(AppError::NotFound("Collection not found".into()));
    };

    // Member entries survive as unfiled.
    entry::Entity::update_many()
        .col_expr(
            entry::Column::CollectionId,
            sea_orm::sea_query::Expr::value(Option::<i32>::None),
        )
        .filter(entry::Column::UserId.eq(user.id))
        .filter(entry::Column::CollectionId.eq(target.id))
        .exec(&txn)
        .await?;

    collection::Entity::delete_by_id(target.id).exec(&txn).await?;

    txn.commit().await?;

    state.pages.invalidate(&dashboard_path(user.id));

    info!(user_id = user.id, collection_id = id, "Collection deleted");

    Ok(StatusCode::NO_CONTENT)
}
