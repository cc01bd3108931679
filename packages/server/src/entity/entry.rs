use common::Mood;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "entry")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String, // in Markdown

    pub mood: Mood,
    /// Sentiment score copied from the mood catalog at publish time.
    pub mood_score: i32,
    /// NULL when the image lookup found nothing (or failed).
    pub mood_image_url: Option<String>,

    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    /// NULL for unfiled entries.
    pub collection_id: Option<i32>,
    #[sea_orm(belongs_to, from = "collection_id", to = "id")]
    pub collection: BelongsTo<Option<super::collection::Entity>>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
