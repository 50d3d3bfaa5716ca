/*!
# Properties Cache

Parsed definitions shared between loads. Each key owns a `OnceCell`: the
first successful load of a key is published, loads of the same key running
at the same time wait for it, a failed load publishes nothing and the next
caller tries again. Different keys never wait on each other.

`get_or_try_publish` trades the wait for re-entrancy: the load runs outside
the cell and only the first finished value is published.
*/

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::core::FormResult;

/// Статистика кэша
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

pub struct PropertiesCache<T> {
    cells: Mutex<HashMap<String, Arc<OnceCell<Arc<T>>>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<T> Default for PropertiesCache<T> {
    fn default() -> Self {
        Self {
            cells: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }
}

impl<T> PropertiesCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the published value of `key`, running `load` if there is none.
    pub fn get_or_try_load<F>(&self, key: &str, load: F) -> FormResult<Arc<T>>
    where
        F: FnOnce() -> FormResult<T>,
    {
        let cell = Arc::clone(self.lock().entry(key.to_string()).or_default());
        // замок карты отпущен: разбор идёт без блокировки других ключей
        if let Some(value) = cell.get() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(value));
        }

        let mut loaded = false;
        let value = cell.get_or_try_init(|| {
            loaded = true;
            load().map(Arc::new)
        })?;
        let counter = if loaded { &self.misses } else { &self.hits };
        counter.fetch_add(1, Ordering::Relaxed);
        Ok(Arc::clone(value))
    }

    /// Like [`get_or_try_load`](Self::get_or_try_load), but `load` runs
    /// outside the key's cell. Loads of one key may overlap; the first to
    /// finish is published and every caller gets that value. For definitions
    /// whose loads nest into loads of the same cache.
    pub fn get_or_try_publish<F>(&self, key: &str, load: F) -> FormResult<Arc<T>>
    where
        F: FnOnce() -> FormResult<T>,
    {
        let cell = Arc::clone(self.lock().entry(key.to_string()).or_default());
        if let Some(value) = cell.get() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(value));
        }

        let loaded = Arc::new(load()?);
        self.misses.fetch_add(1, Ordering::Relaxed);
        Ok(Arc::clone(cell.get_or_init(|| loaded)))
    }

    pub fn get(&self, key: &str) -> Option<Arc<T>> {
        self.lock().get(key).and_then(|cell| cell.get().cloned())
    }

    /// Number of published values.
    pub fn len(&self) -> usize {
        self.lock().values().filter(|cell| cell.get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn invalidate(&self, key: &str) -> bool {
        self.lock().remove(key).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<OnceCell<Arc<T>>>>> {
        // отравленный замок не портит карту: ячейки публикуются атомарно
        self.cells.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
