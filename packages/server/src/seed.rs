use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use sea_orm::*;
use tracing::{info, warn};

use crate::entity::{collection, entry};

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite indexes, so we create
/// them manually on startup. Failures are logged rather than fatal; a
/// missing index degrades the queries it backs but the schema is intact.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Composite index for entry listing and the analytics window:
    // SELECT ... FROM entry WHERE user_id = ? AND created_at > ?
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_entry_user_created")
        .table(entry::Entity)
        .col(entry::Column::UserId)
        .col(entry::Column::CreatedAt)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => {
            info!("Ensured index idx_entry_user_created exists");
        }
        Err(e) => {
            warn!("Failed to create index idx_entry_user_created: {}", e);
        }
    }

    // Collection names are unique per user. This index backs the 409 on
    // duplicate names.
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_collection_user_name")
        .table(collection::Entity)
        .col(collection::Column::UserId)
        .col(collection::Column::Name)
        .unique()
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => {
            info!("Ensured index idx_collection_user_name exists");
        }
        Err(e) => {
            warn!("Failed to create index idx_collection_user_name: {}", e);
        }
    }

    Ok(())
}
