use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity;
use crate::error::AppError;

use super::shared::validate_collection_name;

/// Request body for creating a collection.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateCollectionRequest {
    #[schema(example = "Travel")]
    pub name: String,
    #[schema(example = "Notes from the road")]
    pub description: Option<String>,
}

/// Collection details with its entry count.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CollectionResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Travel")]
    pub name: String,
    pub description: Option<String>,
    /// Number of entries filed under this collection.
    #[schema(example = 12)]
    pub entry_count: u64,
    #[schema(example = "2025-10-01T14:30:00Z")]
    pub created_at: DateTime<Utc>,
}

impl CollectionResponse {
    pub fn from_model(collection: entity::collection::Model, entry_count: u64) -> Self {
        Self {
            id: collection.id,
            name: collection.name,
            description: collection.description,
            entry_count,
            created_at: collection.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CollectionListResponse {
    pub data: Vec<CollectionResponse>,
}

pub fn validate_create_collection(req: &CreateCollectionRequest) -> Result<(), AppError> {
    validate_collection_name(&req.name)?;
    if let Some(description) = &req.description
        && description.chars().count() > 1000
    {
        return Err(AppError::Validation(
            "Description must be at most 1000 characters".into(),
        ));
    }
    Ok(())
}
