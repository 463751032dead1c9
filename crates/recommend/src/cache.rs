use std::{sync::Arc, time::Duration};

use dashmap::DashMap;
use tokio::{
    sync::{Mutex, OwnedMutexGuard},
    time::Instant,
};

pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub recipe_ids: Vec<String>,
    pub expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

type Slot = Arc<Mutex<Option<CacheEntry>>>;

/// Per-group recommendation lists with a fixed time to live.
///
/// Each group has its own lock; holding one group's slot never blocks
/// another group. Expiry is checked on read.
#[derive(Debug, Clone)]
pub struct RecommendationCache {
    ttl: Duration,
    groups: Arc<DashMap<String, Slot>>,
}

impl Default for RecommendationCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl RecommendationCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            groups: Arc::default(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn slot(&self, group_id: &str) -> Slot {
        self.groups
            .entry(group_id.to_owned())
            .or_default()
            .value()
            .clone()
    }

    /// Locks the slot of `group_id` until the guard is dropped.
    pub async fn lock(&self, group_id: &str) -> GroupSlot {
        GroupSlot {
            ttl: self.ttl,
            guard: self.slot(group_id).lock_owned().await,
        }
    }

    /// Unexpired list of `group_id`, if any.
    pub async fn get(&self, group_id: &str) -> Option<Vec<String>> {
        self.lock(group_id).await.get()
    }

    /// Drops the list of `group_id`. Waits for an in-flight computation of
    /// that group to finish so its result is dropped too.
    ///
    /// The group's slot is removed unless another caller is waiting on it.
    pub async fn invalidate(&self, group_id: &str) {
        let slot = self.groups.get(group_id).map(|slot| slot.value().clone());

        if let Some(slot) = slot {
            let mut guard = slot.lock().await;
            guard.take();

            // One reference in the map, one held here.
            self.groups
                .remove_if(group_id, |_, held| Arc::strong_count(held) <= 2);
            drop(guard);

            tracing::debug!(group_id, "recommendation cache invalidated");
        }
    }

    /// Number of groups holding a slot.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn clear(&self) {
        self.groups.clear();
    }
}

/// Exclusive access to one group's cache entry.
pub struct GroupSlot {
    ttl: Duration,
    guard: OwnedMutexGuard<Option<CacheEntry>>,
}

impl GroupSlot {
    pub fn get(&self) -> Option<Vec<String>> {
        self.guard
            .as_ref()
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.recipe_ids.to_vec())
    }

    pub fn set(&mut self, recipe_ids: Vec<String>) {
        *self.guard = Some(CacheEntry {
            recipe_ids,
            expires_at: Instant::now() + self.ttl,
        });
    }
}
