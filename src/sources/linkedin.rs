use chrono::Utc;
use crate::listing::{retain_valid, Listing, SourceTag};
use super::{AdapterError, SourceAdapter};

/// Fixed feed standing in for the LinkedIn jobs API.
pub struct LinkedInAdapter;

impl SourceAdapter for LinkedInAdapter {
    fn source(&self) -> SourceTag {
        SourceTag::LinkedIn
    }

    fn produce_listings(&self) -> Result<Vec<Listing>, AdapterError> {
        let now = Utc::now();
        let posting = |title: &str, company: &str, location: &str, id: u32, duration: &str, stipend: &str| Listing {
            title: title.to_string(),
            company: company.to_string(),
            location: location.to_string(),
            link: format!("https://linkedin.com/jobs/view/{}", id),
            duration: duration.to_string(),
            stipend_range: stipend.to_string(),
            source: SourceTag::LinkedIn,
            scraped_at: now,
        };

        Ok(retain_valid(vec![
            posting("Python Backend Developer Intern", "LinkedIn Tech", "Remote, San Francisco", 123, "3 months", "$4000-$6000/month"),
            posting("Django Web Developer Intern", "StartupHub", "Remote, New York", 456, "4 months", "$2500-$4000/month"),
            posting("Python Automation Intern", "TechCorp Global", "Remote", 789, "5 months", "$2000-$3500/month"),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_returns_tagged_fixture() {
        let listings = LinkedInAdapter.produce_listings().unwrap();
        assert_eq!(listings.len(), 3);
        assert_eq!(listings[0].link, "https://linkedin.com/jobs/view/123");
        assert!(listings.iter().all(|l| l.source == SourceTag::LinkedIn));
    }
}
