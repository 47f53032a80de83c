use chrono::Utc;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use log::info;
use crate::listing::{retain_valid, Listing, SourceTag, DEFAULT_LOCATION, NOT_SPECIFIED};
use super::{AdapterError, SourceAdapter};

pub const DEFAULT_ENDPOINT: &str = "https://jobs.github.com/positions.json";

const MAX_POSTINGS: usize = 10;

/// One entry of the positions JSON feed. Unknown fields are ignored; missing
/// or null fields become empty and the record is dropped later.
#[derive(Debug, Deserialize)]
pub struct GithubPosting {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

fn trimmed(field: Option<String>) -> String {
    field.map(|f| f.trim().to_string()).unwrap_or_default()
}

/// Pulls remote python internships from a GitHub-Jobs style REST endpoint.
pub struct GithubJobsAdapter {
    endpoint: String,
}

impl GithubJobsAdapter {
    pub fn new(endpoint: String) -> Self {
        GithubJobsAdapter { endpoint }
    }

    fn request_url(&self) -> String {
        format!(
            "{}?description={}&location={}&full_time=false",
            self.endpoint,
            urlencoding::encode("python intern"),
            urlencoding::encode("remote"),
        )
    }
}

pub fn map_postings(postings: Vec<GithubPosting>) -> Vec<Listing> {
    let now = Utc::now();
    let listings = postings
        .into_iter()
        .take(MAX_POSTINGS)
        .map(|p| Listing {
            title: trimmed(p.title),
            company: trimmed(p.company),
            location: p
                .location
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            link: trimmed(p.url),
            duration: NOT_SPECIFIED.to_string(),
            stipend_range: NOT_SPECIFIED.to_string(),
            source: SourceTag::GithubJobs,
            scraped_at: now,
        })
        .collect();
    retain_valid(listings)
}

impl SourceAdapter for GithubJobsAdapter {
    fn source(&self) -> SourceTag {
        SourceTag::GithubJobs
    }

    fn produce_listings(&self) -> Result<Vec<Listing>, AdapterError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        let url = self.request_url();
        info!("Querying jobs API: {}", url);
        let postings: Vec<GithubPosting> = client.get(&url)
            .send()?
            .error_for_status()?
            .json()?;

        Ok(map_postings(postings))
    }
}
