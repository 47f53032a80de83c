use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stand-in for a duration or stipend the source did not publish.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Location used when a source omits one.
pub const DEFAULT_LOCATION: &str = "Remote";

/// Which adapter produced a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SourceTag {
    #[serde(rename = "Internshala")]
    Internshala,
    #[serde(rename = "GitHub Jobs")]
    GithubJobs,
    #[serde(rename = "Indeed")]
    Indeed,
    #[serde(rename = "LinkedIn")]
    LinkedIn,
    /// Placeholder data served when every source came back empty.
    #[serde(rename = "Sample Data")]
    SampleData,
}

impl SourceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::Internshala => "Internshala",
            SourceTag::GithubJobs => "GitHub Jobs",
            SourceTag::Indeed => "Indeed",
            SourceTag::LinkedIn => "LinkedIn",
            SourceTag::SampleData => "Sample Data",
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One canonical internship record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub title: String,
    pub company: String,
    /// May hold several comma-separated places, e.g. `"Remote, Mumbai"`.
    pub location: String,
    pub link: String,
    pub duration: String,
    pub stipend_range: String,
    pub source: SourceTag,
    pub scraped_at: DateTime<Utc>,
}

impl Listing {
    /// A listing is only usable when title, company and link are all present.
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.company.trim().is_empty()
            && !self.link.trim().is_empty()
    }

    /// The `(title, company)` pair duplicates are detected on.
    pub fn identity_key(&self) -> (&str, &str) {
        (self.title.as_str(), self.company.as_str())
    }

    pub fn is_sample(&self) -> bool {
        self.source == SourceTag::SampleData
    }
}

/// Drops every listing failing [`Listing::is_valid`], keeping order.
pub fn retain_valid(listings: Vec<Listing>) -> Vec<Listing> {
    listings.into_iter().filter(Listing::is_valid).collect()
}

/// True when the set being served is the placeholder fallback.
pub fn is_sample_set(listings: &[Listing]) -> bool {
    !listings.is_empty() && listings.iter().all(Listing::is_sample)
}

#[cfg(test)]
pub(crate) fn test_listing(title: &str, company: &str, source: SourceTag) -> Listing {
    Listing {
        title: title.to_string(),
        company: company.to_string(),
        location: DEFAULT_LOCATION.to_string(),
        link: format!("https://example.com/{}", title.replace(' ', "-").to_lowercase()),
        duration: NOT_SPECIFIED.to_string(),
        stipend_range: NOT_SPECIFIED.to_string(),
        source,
        scraped_at: Utc::now(),
    }
}
