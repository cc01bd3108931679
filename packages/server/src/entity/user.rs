use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Subject id assigned by the identity provider.
    #[sea_orm(unique)]
    pub external_id: String,
    #[sea_orm(unique)]
    pub email: String,
    pub name: Option<String>,

    #[sea_orm(has_many)]
    pub entries: HasMany<super::entry::Entity>,

    #[sea_orm(has_many)]
    pub collections: HasMany<super::collection::Entity>,

    #[sea_orm(has_one)]
    pub draft: HasOne<super::draft::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
