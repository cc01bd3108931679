use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::health::healthz))
        .nest("/entries", entry_routes())
        .nest("/draft", draft_routes())
        .nest("/collections", collection_routes())
        .nest("/analytics", analytics_routes())
}

fn entry_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::entries::create_entry,
            handlers::entries::list_entries
        ))
        .routes(routes!(
            handlers::entries::get_entry,
            handlers::entries::update_entry,
            handlers::entries::delete_entry
        ))
}

fn draft_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(
        handlers::drafts::get_draft,
        handlers::drafts::save_draft
    ))
}

fn collection_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::collections::create_collection,
            handlers::collections::list_collections
        ))
        .routes(routes!(handlers::collections::delete_collection))
}

fn analytics_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::analytics::get_analytics))
}
