pub mod image_search;
pub mod page_cache;
pub mod protection;
