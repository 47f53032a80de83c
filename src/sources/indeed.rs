use chrono::Utc;
use crate::listing::{retain_valid, Listing, SourceTag};
use super::{AdapterError, SourceAdapter};

/// Fixed feed standing in for an Indeed integration.
pub struct IndeedAdapter;

const POSTINGS: [(&str, &str, &str, &str, &str, &str); 4] = [
    ("Python Developer Intern", "TechStartup Inc", "Remote", "https://example.com/job1", "3-6 months", "$2000-$4000/month"),
    ("Backend Python Intern", "DataCorp Solutions", "Remote", "https://example.com/job2", "4 months", "$1500-$3000/month"),
    ("Full Stack Python Intern", "WebTech Innovations", "Remote, US", "https://example.com/job3", "6 months", "$2500-$5000/month"),
    ("Python Data Science Intern", "AI Analytics Corp", "Remote", "https://example.com/job4", "4-6 months", "$3000-$6000/month"),
];

impl SourceAdapter for IndeedAdapter {
    fn source(&self) -> SourceTag {
        SourceTag::Indeed
    }

    fn produce_listings(&self) -> Result<Vec<Listing>, AdapterError> {
        let now = Utc::now();
        let listings = POSTINGS
            .iter()
            .map(|&(title, company, location, link, duration, stipend)| Listing {
                title: title.to_string(),
                company: company.to_string(),
                location: location.to_string(),
                link: link.to_string(),
                duration: duration.to_string(),
                stipend_range: stipend.to_string(),
                source: SourceTag::Indeed,
                scraped_at: now,
            })
            .collect();
        Ok(retain_valid(listings))
    }
}
