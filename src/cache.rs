use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex, MutexGuard};
use log::{info, warn};
use crate::aggregator::Aggregator;
use crate::dedupe::dedupe;
use crate::listing::Listing;
use crate::sample_data::sample_listings;

pub const DEFAULT_TTL_SECS: i64 = 1800;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Empty,
    Fresh,
    Stale,
}

#[derive(Default)]
struct CacheEntry {
    listings: Option<Arc<Vec<Listing>>>,
    last_refreshed: Option<DateTime<Utc>>,
}

/// Last aggregated listing set plus the time it was built.
///
/// Reads within the TTL are served from memory. An expired or empty cache
/// runs the aggregate/dedupe pipeline on the calling thread. The lock is only
/// held to inspect or swap the entry, never while aggregating, so concurrent
/// misses may aggregate twice.
pub struct ListingCache {
    aggregator: Aggregator,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entry: Mutex<CacheEntry>,
}

impl ListingCache {
    pub fn new(aggregator: Aggregator, ttl: Duration) -> Self {
        Self::with_clock(aggregator, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(aggregator: Aggregator, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        ListingCache {
            aggregator,
            ttl,
            clock,
            entry: Mutex::new(CacheEntry::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheEntry> {
        self.entry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn state(&self) -> CacheState {
        let entry = self.lock();
        match (&entry.listings, entry.last_refreshed) {
            (Some(_), Some(ts)) if !self.is_expired(ts) => CacheState::Fresh,
            (Some(_), _) => CacheState::Stale,
            (None, _) => CacheState::Empty,
        }
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.lock().last_refreshed
    }

    /// True when the last successful refresh happened less than `window`
    /// ago by the cache's clock.
    pub fn refreshed_within(&self, window: Duration) -> bool {
        self.last_refreshed()
            .is_some_and(|ts| self.clock.now() - ts < window)
    }

    fn is_expired(&self, refreshed: DateTime<Utc>) -> bool {
        self.clock.now() - refreshed > self.ttl
    }

    /// Current listing set. Never fails: when nothing could be aggregated
    /// this is stale data if any exists, otherwise the sample set.
    pub fn get_listings(&self) -> Vec<Listing> {
        let stale = {
            let entry = self.lock();
            match (&entry.listings, entry.last_refreshed) {
                (Some(listings), Some(ts)) if !self.is_expired(ts) => {
                    return listings.as_ref().clone();
                }
                (listings, _) => listings.clone(),
            }
        };

        info!("Refreshing listing cache...");
        let fresh = dedupe(self.aggregator.aggregate());

        if !fresh.is_empty() {
            let now = self.clock.now();
            let listings = Arc::new(fresh);
            *self.lock() = CacheEntry {
                listings: Some(Arc::clone(&listings)),
                last_refreshed: Some(now),
            };
            info!("Cache refreshed with {} listings", listings.len());
            return listings.as_ref().clone();
        }

        match stale {
            Some(previous) => {
                warn!("Refresh produced no listings, serving {} stale listings", previous.len());
                previous.as_ref().clone()
            }
            None => {
                warn!("No listings from any source, serving sample data");
                sample_listings(self.clock.now())
            }
        }
    }

    /// Drops the cached set so the next read re-aggregates.
    pub fn invalidate(&self) {
        *self.lock() = CacheEntry::default();
        info!("Listing cache invalidated");
    }

    pub fn force_refresh(&self) -> Vec<Listing> {
        self.invalidate();
        self.get_listings()
    }
}
