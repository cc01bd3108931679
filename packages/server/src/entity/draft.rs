use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Working draft of the entry editor. At most one row per user.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "draft")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,
    /// Mood key as last picked in the editor. Not validated until publish.
    pub mood: Option<String>,

    #[sea_orm(unique)]
    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
