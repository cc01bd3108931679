use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::services::image_search::ImageSearch;
use crate::services::page_cache::PageCache;
use crate::services::protection::ProtectionService;

/// Shared application state. Collaborators are held behind trait objects so
/// tests can swap in stubs.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub protection: Arc<dyn ProtectionService>,
    pub images: Arc<dyn ImageSearch>,
    pub pages: Arc<dyn PageCache>,
}
