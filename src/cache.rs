//! In-memory caching using moka
//!
//! Holds the pricing view of stored cars so repeated quotes for the same
//! car (one per option toggle in the booking screen) skip the database.
//! Entries are dropped when the back office edits a car.

use moka::future::Cache;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::pricing::models::RentableItem;

/// Application cache holding loaded rentable items
#[derive(Clone)]
pub struct AppCache {
    /// Cars (id -> RentableItem)
    pub items: Cache<Uuid, Arc<RentableItem>>,
}

impl AppCache {
    /// Create a new cache instance with the configured size and TTL
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        Self {
            items: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            items_size: self.items.entry_count(),
        }
    }

    /// Invalidate all cached items
    pub fn invalidate_all(&self) {
        self.items.invalidate_all();
        info!("All caches invalidated");
    }

    /// Invalidate a single car
    pub async fn invalidate_item(&self, car_id: Uuid) {
        self.items.invalidate(&car_id).await;
        info!("Cache invalidated for car: {}", car_id);
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new(1000, Duration::from_secs(5 * 60))
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub items_size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_invalidate_item() {
        let cache = AppCache::default();
        let car_id = Uuid::new_v4();
        cache
            .items
            .insert(car_id, Arc::new(RentableItem::with_daily_price(dec!(40))))
            .await;
        assert!(cache.items.get(&car_id).await.is_some());

        cache.invalidate_item(car_id).await;
        assert!(cache.items.get(&car_id).await.is_none());
    }
}
