//! Explicit list cache
//!
//! Callers own a [`ListCache`] and hand it to
//! [`ResourceClient::list_cached`](crate::client::ResourceClient::list_cached).
//! Entries are keyed by the scope a list was taken at; there is no expiry.

use crate::request::ResourceIdentity;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Scope a cached list belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub subscription_id: String,
    pub resource_group: Option<String>,
}

impl CacheKey {
    pub fn subscription(subscription_id: impl Into<String>) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group: None,
        }
    }

    pub fn resource_group(subscription_id: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group: Some(group.into()),
        }
    }
}

impl From<&ResourceIdentity> for CacheKey {
    fn from(id: &ResourceIdentity) -> Self {
        Self {
            subscription_id: id.subscription_id.clone(),
            resource_group: id.resource_group.clone(),
        }
    }
}

/// Materialised lists keyed by scope
pub struct ListCache<T> {
    entries: RwLock<HashMap<CacheKey, Arc<Vec<T>>>>,
}

impl<T> Default for ListCache<T> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<T> ListCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &CacheKey) -> Option<Arc<Vec<T>>> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn insert(&self, key: CacheKey, items: Vec<T>) -> Arc<Vec<T>> {
        let items = Arc::new(items);
        debug!(?key, items = items.len(), "Caching list");
        self.entries.write().await.insert(key, Arc::clone(&items));
        items
    }

    /// Drop the entry for one scope
    ///
    /// Invalidating a subscription also drops every resource group below it.
    pub async fn invalidate(&self, key: &CacheKey) {
        let mut entries = self.entries.write().await;
        if key.resource_group.is_some() {
            entries.remove(key);
        } else {
            entries.retain(|k, _| k.subscription_id != key.subscription_id);
        }
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
