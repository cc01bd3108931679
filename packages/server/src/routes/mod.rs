mod v1;

use utoipa_axum::router::OpenApiRouter;

use crate::state::AppState;

/// All API routes, versioned under `/v1`.
///
/// The journal surface fits in one version module: entries, the working
/// draft, collections, analytics and the health probe.
pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().nest("/v1", v1::routes())
}
