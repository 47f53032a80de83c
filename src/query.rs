use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use crate::listing::Listing;

pub const PAGE_SIZE: usize = 10;
pub const TRENDING_TAG_COUNT: usize = 5;

/// Filters from a read request. Empty strings impose no constraint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub stipend: String,
}

impl ListingQuery {
    pub fn matches(&self, listing: &Listing) -> bool {
        let search = self.search.to_lowercase();
        (search.is_empty() || listing.title.to_lowercase().contains(&search))
            && (self.location.is_empty() || listing.location.contains(&self.location))
            && (self.duration.is_empty() || listing.duration == self.duration)
            && (self.stipend.is_empty() || listing.stipend_range == self.stipend)
    }
}

/// Distinct values for the filter controls, taken from the unfiltered set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Facets {
    pub locations: Vec<String>,
    pub durations: Vec<String>,
    pub stipends: Vec<String>,
    pub trending_tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingPage {
    pub items: Vec<Listing>,
    pub page: usize,
    pub total_pages: usize,
    pub total_matches: usize,
    pub facets: Facets,
}

/// Filters, paginates (1-based) and derives facets.
///
/// Out-of-range pages, including page 0, produce an empty `items` list.
pub fn query(listings: &[Listing], filters: &ListingQuery, page: usize) -> ListingPage {
    let filtered: Vec<&Listing> = listings.iter().filter(|l| filters.matches(l)).collect();
    let total_pages = filtered.len().div_ceil(PAGE_SIZE);

    let items = match page.checked_sub(1) {
        Some(index) => filtered
            .iter()
            .skip(index.saturating_mul(PAGE_SIZE))
            .take(PAGE_SIZE)
            .map(|l| (*l).clone())
            .collect(),
        None => Vec::new(),
    };

    ListingPage {
        items,
        page,
        total_pages,
        total_matches: filtered.len(),
        facets: facets(listings),
    }
}

pub fn facets(listings: &[Listing]) -> Facets {
    let locations: BTreeSet<String> = listings
        .iter()
        .flat_map(|l| l.location.split(','))
        .map(|loc| loc.trim().to_string())
        .collect();
    let durations: BTreeSet<String> = listings.iter().map(|l| l.duration.clone()).collect();
    let stipends: BTreeSet<String> = listings.iter().map(|l| l.stipend_range.clone()).collect();

    Facets {
        locations: locations.into_iter().collect(),
        durations: durations.into_iter().collect(),
        stipends: stipends.into_iter().collect(),
        trending_tags: trending_tags(listings, TRENDING_TAG_COUNT),
    }
}

/// Most frequent whitespace-separated title words, case-sensitive.
/// Ties keep first-seen order.
pub fn trending_tags(listings: &[Listing], n: usize) -> Vec<String> {
    most_common(listings.iter().flat_map(|l| l.title.split_whitespace()), n)
        .into_iter()
        .map(|(word, _)| word)
        .collect()
}

pub(crate) fn most_common<'a, I>(words: I, n: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, word) in words.into_iter().enumerate() {
        counts.entry(word).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked
        .into_iter()
        .take(n)
        .map(|(word, count, _)| (word.to_string(), count))
        .collect()
}

/// Overview of the current listing set.
#[derive(Debug, Clone, Serialize)]
pub struct ListingSummary {
    pub total_listings: usize,
    pub sources: Vec<String>,
    pub locations: Vec<String>,
    pub companies: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

pub fn summarize(listings: &[Listing], last_updated: DateTime<Utc>) -> ListingSummary {
    let sources: BTreeSet<String> = listings.iter().map(|l| l.source.to_string()).collect();
    let locations: BTreeSet<String> = listings.iter().map(|l| l.location.clone()).collect();
    let companies: BTreeSet<String> = listings.iter().map(|l| l.company.clone()).collect();

    ListingSummary {
        total_listings: listings.len(),
        sources: sources.into_iter().collect(),
        locations: locations.into_iter().collect(),
        companies: companies.into_iter().collect(),
        last_updated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{test_listing, SourceTag};

    fn python_intern() -> Listing {
        let mut l = test_listing("Python Intern", "Acme", SourceTag::Internshala);
        l.location = "Remote, Mumbai".to_string();
        l.duration = "3 months".to_string();
        l.stipend_range = "₹5,000".to_string();
        l
    }

    fn numbered(n: usize) -> Vec<Listing> {
        (0..n)
            .map(|i| test_listing(&format!("Intern {}", i), "Co", SourceTag::Indeed))
            .collect()
    }

    #[test]
    fn test_pagination_bounds() {
        let listings = numbered(23);
        let all = ListingQuery::default();

        let first = query(&listings, &all, 1);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.items[0].title, "Intern 0");

        let third = query(&listings, &all, 3);
        assert_eq!(third.items.len(), 3);
        assert_eq!(third.items[2].title, "Intern 22");

        assert!(query(&listings, &all, 4).items.is_empty());
        assert!(query(&listings, &all, 0).items.is_empty());
        assert!(query(&listings, &all, usize::MAX).items.is_empty());
    }

    #[test]
    fn test_empty_set_has_zero_pages() {
        let page = query(&[], &ListingQuery::default(), 1);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let listing = python_intern();
        let q = |search: &str| ListingQuery { search: search.to_string(), ..Default::default() };
        assert!(q("python").matches(&listing));
        assert!(q("PYTHON in").matches(&listing));
        assert!(!q("java").matches(&listing));
    }

    #[test]
    fn test_location_is_substring_match() {
        let listing = python_intern();
        let q = |location: &str| ListingQuery { location: location.to_string(), ..Default::default() };
        assert!(q("Mumbai").matches(&listing));
        assert!(!q("Delhi").matches(&listing));
        assert!(!q("mumbai").matches(&listing));
    }

    #[test]
    fn test_duration_and_stipend_are_exact() {
        let listing = python_intern();
        let exact = ListingQuery {
            duration: "3 months".to_string(),
            stipend: "₹5,000".to_string(),
            ..Default::default()
        };
        assert!(exact.matches(&listing));

        let partial = ListingQuery { duration: "3".to_string(), ..Default::default() };
        assert!(!partial.matches(&listing));
    }

    #[test]
    fn test_facets_use_unfiltered_set() {
        let mut other = test_listing("Java Developer", "Beans", SourceTag::LinkedIn);
        other.location = "Delhi,Remote".to_string();
        other.duration = "6 months".to_string();
        let listings = vec![python_intern(), other];

        let filters = ListingQuery { search: "python".to_string(), ..Default::default() };
        let page = query(&listings, &filters, 1);

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.facets.locations, vec!["Delhi", "Mumbai", "Remote"]);
        assert_eq!(page.facets.durations, vec!["3 months", "6 months"]);
        assert_eq!(page.facets.stipends, vec!["Not specified", "₹5,000"]);
    }

    #[test]
    fn test_trending_tags_are_case_sensitive_top_five() {
        let titles = [
            "Python Intern",
            "Python Developer Intern",
            "python Data Intern",
            "Django Developer",
            "Rust Intern",
        ];
        let listings: Vec<Listing> = titles
            .iter()
            .map(|t| test_listing(t, "Co", SourceTag::Indeed))
            .collect();

        assert_eq!(
            trending_tags(&listings, 5),
            vec!["Intern", "Python", "Developer", "python", "Data"]
        );
    }

    #[test]
    fn test_summary_collects_distinct_values() {
        let listings = vec![
            python_intern(),
            test_listing("Rust Intern", "Acme", SourceTag::LinkedIn),
        ];
        let now = Utc::now();
        let summary = summarize(&listings, now);
        assert_eq!(summary.total_listings, 2);
        assert_eq!(summary.sources, vec!["Internshala", "LinkedIn"]);
        assert_eq!(summary.companies, vec!["Acme"]);
        assert_eq!(summary.locations, vec!["Remote", "Remote, Mumbai"]);
        assert_eq!(summary.last_updated, now);
    }
}
