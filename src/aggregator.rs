use std::panic::{self, AssertUnwindSafe};
use log::{info, warn};
use crate::listing::{Listing, SourceTag};
use crate::sources::{AdapterError, SourceAdapter};

/// What one adapter contributed to an aggregation round.
#[derive(Debug)]
pub struct AdapterReport {
    pub source: SourceTag,
    pub outcome: Result<usize, AdapterError>,
}

#[derive(Debug, Default)]
pub struct Aggregation {
    pub listings: Vec<Listing>,
    pub reports: Vec<AdapterReport>,
}

/// Runs every registered adapter in order and concatenates their output.
pub struct Aggregator {
    adapters: Vec<Box<dyn SourceAdapter>>,
}

impl Aggregator {
    pub fn new(adapters: Vec<Box<dyn SourceAdapter>>) -> Self {
        Aggregator { adapters }
    }

    pub fn adapter_count(&self) -> usize {
        self.adapters.len()
    }

    pub fn aggregate(&self) -> Vec<Listing> {
        self.aggregate_with_report().listings
    }

    /// A failing or panicking adapter contributes nothing; the rest still run.
    pub fn aggregate_with_report(&self) -> Aggregation {
        let mut aggregation = Aggregation::default();

        for adapter in &self.adapters {
            let source = adapter.source();
            let outcome = match run_isolated(adapter.as_ref()) {
                Ok(listings) => {
                    info!("Found {} listings from {}", listings.len(), source);
                    let count = listings.len();
                    aggregation.listings.extend(listings);
                    Ok(count)
                }
                Err(e) => {
                    warn!("Source {} failed: {}", source, e);
                    Err(e)
                }
            };
            aggregation.reports.push(AdapterReport { source, outcome });
        }

        info!(
            "Aggregated {} listings from {} sources",
            aggregation.listings.len(),
            self.adapters.len()
        );
        aggregation
    }
}

fn run_isolated(adapter: &dyn SourceAdapter) -> Result<Vec<Listing>, AdapterError> {
    match panic::catch_unwind(AssertUnwindSafe(|| adapter.produce_listings())) {
        Ok(result) => result,
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(AdapterError::Panicked(reason))
        }
    }
}
