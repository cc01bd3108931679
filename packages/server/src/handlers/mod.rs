use axum::http::{HeaderMap, header};
use sea_orm::*;

use crate::entity::{collection, user};
use crate::error::AppError;
use crate::services::protection::{Decision, ProtectionRequest};
use crate::state::AppState;

pub mod analytics;
pub mod collections;
pub mod drafts;
pub mod entries;
pub mod health;

/// Run the abuse-protection screen for a write request.
///
/// Must be called before the handler touches the database, so denied
/// requests cost nothing beyond the in-memory check.
pub(crate) async fn enforce_protection(
    state: &AppState,
    subject: &str,
    headers: &HeaderMap,
    cost: u32,
) -> Result<(), AppError> {
    let request = ProtectionRequest {
        subject: subject.to_owned(),
        cost,
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
    };

    match state.protection.evaluate(&request).await {
        Decision::Allowed => Ok(()),
        Decision::Denied(reason) => Err(reason.into()),
    }
}

/// Resolve the local account for an authenticated subject.
///
/// Accounts are provisioned out of band by the identity-provider sync; a
/// valid token whose subject has no row here is a 404.
pub(crate) async fn find_user<C: ConnectionTrait>(
    db: &C,
    subject: &str,
) -> Result<user::Model, AppError> {
    user::Entity::find()
        .filter(user::Column::ExternalId.eq(subject))
        .one(db)
        .await?
        .ok_or(AppError::UserNotFound)
}

/// Find a collection owned by the given user, or return 404.
pub(crate) async fn find_collection<C: ConnectionTrait>(
    db: &C,
    id: i32,
    user_id: i32,
) -> Result<collection::Model, AppError> {
    collection::Entity::find_by_id(id)
        .filter(collection::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Collection not found".into()))
}
