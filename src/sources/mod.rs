pub mod internshala;
pub mod github_jobs;
pub mod indeed;
pub mod linkedin;

use crate::config::AppConfig;
use crate::fetcher::FetchError;
use crate::listing::{Listing, SourceTag};

pub use github_jobs::GithubJobsAdapter;
pub use indeed::IndeedAdapter;
pub use internshala::InternshalaAdapter;
pub use linkedin::LinkedInAdapter;

#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid source url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("none of the {attempted} category pages could be fetched")]
    NoPagesFetched { attempted: usize },
    #[error("adapter panicked: {0}")]
    Panicked(String),
}

/// A single external source of internship listings.
///
/// Implementations drop invalid records before returning. An `Err` means the
/// whole source is unavailable for this round; the aggregator logs it and
/// moves on.
pub trait SourceAdapter: Send + Sync {
    fn source(&self) -> SourceTag;

    fn produce_listings(&self) -> Result<Vec<Listing>, AdapterError>;
}

/// The production adapters, in aggregation order.
pub fn default_adapters(config: &AppConfig) -> Vec<Box<dyn SourceAdapter>> {
    vec![
        Box::new(InternshalaAdapter::new(config.fetch.clone())),
        Box::new(GithubJobsAdapter::new(config.github_jobs_url.clone())),
        Box::new(IndeedAdapter),
        Box::new(LinkedInAdapter),
    ]
}
