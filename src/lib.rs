pub mod listing;
pub mod delay_manager;
pub mod fetcher;
pub mod extractor;
pub mod sources;
pub mod aggregator;
pub mod dedupe;
pub mod sample_data;
pub mod cache;
pub mod query;
pub mod export;
pub mod trending;
pub mod subscription;
pub mod config;
pub mod logger;

// Exporting types for convenience
pub use aggregator::{Aggregator, AdapterReport};
pub use cache::{CacheState, ListingCache};
pub use config::AppConfig;
pub use fetcher::{FetchConfig, FetchError, Fetcher};
pub use listing::{Listing, SourceTag, NOT_SPECIFIED};
pub use query::{ListingPage, ListingQuery};
pub use sources::{AdapterError, SourceAdapter};

/// Builds the production cache: every default adapter behind the configured TTL.
pub fn build_cache(config: &AppConfig) -> ListingCache {
    let aggregator = Aggregator::new(sources::default_adapters(config));
    ListingCache::new(aggregator, config.cache_ttl_chrono())
}
