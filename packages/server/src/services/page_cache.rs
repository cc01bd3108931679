use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use lru::LruCache;
use serde_json::Value;

/// Store for rendered page bodies, keyed by request path.
///
/// The dashboard aggregates are expensive to recompute on every view, so
/// read handlers serve them from here and write handlers invalidate the
/// affected prefix after their transaction commits.
pub trait PageCache: Send + Sync {
    fn get(&self, path: &str) -> Option<Value>;
    fn put(&self, path: &str, body: Value);
    /// Drop every cached page whose path starts with `prefix`.
    fn invalidate(&self, prefix: &str);
}

/// Cache path prefix under which a user's dashboard pages live.
///
/// Ends with a slash so invalidating user 1 cannot reach user 10's pages.
pub fn dashboard_path(user_id: i32) -> String {
    format!("/dashboard/{user_id}/")
}

/// In-process LRU implementation of [`PageCache`].
pub struct LruPageCache {
    inner: Mutex<LruCache<String, Value>>,
}

impl LruPageCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, Value>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PageCache for LruPageCache {
    fn get(&self, path: &str) -> Option<Value> {
        self.lock().get(path).cloned()
    }

    fn put(&self, path: &str, body: Value) {
        self.lock().put(path.to_owned(), body);
    }

    fn invalidate(&self, prefix: &str) {
        let mut cache = self.lock();
        let stale: Vec<String> = cache
            .iter()
            .filter(|(path, _)| path.starts_with(prefix))
            .map(|(path, _)| path.clone())
            .collect();
        for path in stale {
            cache.pop(&path);
        }
    }
}
