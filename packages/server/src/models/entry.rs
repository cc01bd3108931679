use chrono::{DateTime, Utc};
use common::Mood;
use serde::{Deserialize, Serialize};

use crate::entity;
use crate::error::AppError;

use super::shared::{Pagination, double_option, validate_content, validate_title};

/// Request body for publishing an entry.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateEntryRequest {
    #[schema(example = "A quiet morning")]
    pub title: String,
    /// Entry body in Markdown.
    pub content: String,
    /// Mood key, matched case-insensitively against the catalog.
    #[schema(example = "happy")]
    pub mood: String,
    /// Search terms for the decorative header image. Defaults to the mood id.
    #[schema(example = "sunrise coffee")]
    pub mood_query: Option<String>,
    /// Collection to file the entry under, null or absent for unfiled.
    #[schema(example = 1)]
    pub collection_id: Option<i32>,
}

/// Request body for editing an entry. All fields optional; at least one
/// must be present.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateEntryRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    /// New mood key. The header image is refreshed when the mood changes
    /// and `mood_query` is provided.
    pub mood: Option<String>,
    pub mood_query: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub collection_id: Option<Option<i32>>,
}

/// Query parameters for entry listing.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct EntryListQuery {
    #[param(example = 1)]
    pub page: Option<u64>,
    #[param(example = 20)]
    pub per_page: Option<u64>,
    /// Only entries filed under this collection.
    #[param(example = 1)]
    pub collection_id: Option<i32>,
    /// When true, only unfiled entries. Ignored if `collection_id` is set.
    pub unfiled: Option<bool>,
}

/// Full entry details.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct EntryResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "A quiet morning")]
    pub title: String,
    pub content: String,
    pub mood: Mood,
    /// Sentiment score the mood carried when the entry was published.
    #[schema(example = 8)]
    pub mood_score: i32,
    /// Decorative header image, null when the lookup found nothing.
    pub mood_image_url: Option<String>,
    #[schema(example = 1)]
    pub user_id: i32,
    /// Collection the entry is filed under, null for unfiled.
    pub collection_id: Option<i32>,
    #[schema(example = "2025-10-01T14:30:00Z")]
    pub created_at: DateTime<Utc>,
    #[schema(example = "2025-10-01T14:30:00Z")]
    pub updated_at: DateTime<Utc>,
}

impl From<entity::entry::Model> for EntryResponse {
    fn from(entry: entity::entry::Model) -> Self {
        Self {
            id: entry.id,
            title: entry.title,
            content: entry.content,
            mood: entry.mood,
            mood_score: entry.mood_score,
            mood_image_url: entry.mood_image_url,
            user_id: entry.user_id,
            collection_id: entry.collection_id,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

/// Paginated entry list.
#[derive(Serialize, utoipa::ToSchema)]
pub struct EntryListResponse {
    pub data: Vec<EntryResponse>,
    pub pagination: Pagination,
}

/// Validate field shapes of a publish request. The mood key itself is
/// checked against the catalog later, after abuse protection has run.
pub fn validate_create_entry(req: &CreateEntryRequest) -> Result<(), AppError> {
    validate_title(&req.title)?;
    validate_content(&req.content)?;
    Ok(())
}

pub fn validate_update_entry(req: &UpdateEntryRequest) -> Result<(), AppError> {
    if req.title.is_none()
        && req.content.is_none()
        && req.mood.is_none()
        && req.collection_id.is_none()
    {
        return Err(AppError::Validation("No fields to update".into()));
    }
    if let Some(title) = &req.title {
        validate_title(title)?;
    }
    if let Some(content) = &req.content {
        validate_content(content)?;
    }
    Ok(())
}
