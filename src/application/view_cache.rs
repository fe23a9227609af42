// Memoization of derived views keyed on (data version, view key)
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::Mutex;

struct CacheState<K, V> {
    version: u64,
    entries: HashMap<K, Arc<V>>,
}

/// Holds views computed from one snapshot version. A new version drops every
/// entry; exceeding `capacity` drops them too.
pub struct ViewCache<K, V> {
    capacity: usize,
    state: Mutex<CacheState<K, V>>,
}

impl<K, V> ViewCache<K, V>
where
    K: Eq + Hash,
{
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            state: Mutex::new(CacheState {
                version: 0,
                entries: HashMap::new(),
            }),
        }
    }

    pub async fn get_or_compute<F>(&self, version: u64, key: K, compute: F) -> Arc<V>
    where
        F: FnOnce() -> V,
    {
        let mut state = self.state.lock().await;

        if state.version != version {
            state.version = version;
            state.entries.clear();
        }

        if let Some(hit) = state.entries.get(&key) {
            return hit.clone();
        }

        if state.entries.len() >= self.capacity {
            tracing::debug!("View cache full ({} entries), clearing", state.entries.len());
            state.entries.clear();
        }

        let value = Arc::new(compute());
        state.entries.insert(key, value.clone());
        value
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }
}
