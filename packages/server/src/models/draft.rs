use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity;
use crate::error::AppError;

/// Request body for saving the working draft. The whole draft is replaced;
/// omitted fields clear their previous value.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SaveDraftRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    /// Mood key as picked in the editor. Not validated until publish.
    #[schema(example = "happy")]
    pub mood: Option<String>,
}

/// The working draft.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DraftDto {
    pub title: Option<String>,
    pub content: Option<String>,
    pub mood: Option<String>,
    #[schema(example = "2025-10-01T14:30:00Z")]
    pub updated_at: DateTime<Utc>,
}

impl From<entity::draft::Model> for DraftDto {
    fn from(draft: entity::draft::Model) -> Self {
        Self {
            title: draft.title,
            content: draft.content,
            mood: draft.mood,
            updated_at: draft.updated_at,
        }
    }
}

/// Draft lookup result. `draft` is null when the user has nothing saved.
#[derive(Serialize, utoipa::ToSchema)]
pub struct DraftResponse {
    pub draft: Option<DraftDto>,
}

/// Drafts are scratch state, so only sizes are enforced.
pub fn validate_save_draft(req: &SaveDraftRequest) -> Result<(), AppError> {
    if let Some(title) = &req.title
        && title.chars().count() > 256
    {
        return Err(AppError::Validation(
            "Title must be at most 256 characters".into(),
        ));
    }
    if let Some(content) = &req.content
        && content.chars().count() > 100_000
    {
        return Err(AppError::Validation(
            "Content must be at most 100000 characters".into(),
        ));
    }
    if let Some(mood) = &req.mood
        && mood.chars().count() > 64
    {
        return Err(AppError::Validation(
            "Mood must be at most 64 characters".into(),
        ));
    }
    Ok(())
}
