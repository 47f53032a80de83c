use chrono::Utc;
use scraper::{ElementRef, Html};
use log::{debug, info, warn};
use url::Url;
use crate::extractor::{element_text, SelectorChain};
use crate::fetcher::{FetchConfig, Fetcher};
use crate::listing::{retain_valid, Listing, SourceTag, DEFAULT_LOCATION, NOT_SPECIFIED};
use super::{AdapterError, SourceAdapter};

pub const BASE_URL: &str = "https://internshala.com";

const CATEGORY_PATHS: [&str; 4] = [
    "/internships/work-from-home-python-development-jobs",
    "/internships/python-development-jobs",
    "/internships/django-development-jobs",
    "/internships/flask-development-jobs",
];

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum CardError {
    #[error("card has no {0}")]
    MissingField(&'static str),
}

/// Selector chains for one listing card, most specific first.
pub struct CardParser {
    base: Url,
    cards: SelectorChain,
    title: SelectorChain,
    company: SelectorChain,
    location: SelectorChain,
    link: SelectorChain,
    details: SelectorChain,
}

impl CardParser {
    pub fn new(base: Url) -> Self {
        CardParser {
            base,
            cards: SelectorChain::new(&[
                "div.individual_internship",
                "div.internship_meta",
                "div.internship_card",
                r#"div[class*="internship"]"#,
            ]),
            title: SelectorChain::new(&[
                "div.heading_4_5.profile",
                "h3.internship_title",
                r#"h3[class*="title"]"#,
                r#"div[class*="title"]"#,
            ]),
            company: SelectorChain::new(&[
                "a.link_display_like_text",
                "div.company_name",
                r#"span[class*="company"]"#,
                r#"div[class*="company"]"#,
            ]),
            location: SelectorChain::new(&[
                r##"a[href="#internship_location"]"##,
                "div.location",
                r#"span[class*="location"]"#,
                r#"div[class*="location"]"#,
            ]),
            link: SelectorChain::new(&["a.view_detail_button", "a[href]"]),
            details: SelectorChain::new(&["div.item_body", "div.internship_details"]),
        }
    }

    /// Parses every card in a category page. Malformed cards are skipped.
    pub fn parse_document(&self, html: &str) -> Vec<Listing> {
        let document = Html::parse_document(html);
        let mut listings = Vec::new();

        for card in self.cards.select_first_nonempty(&document) {
            match self.parse_card(&card) {
                Ok(listing) => listings.push(listing),
                Err(e) => debug!("Skipping card: {}", e),
            }
        }
        retain_valid(listings)
    }

    pub fn parse_card(&self, card: &ElementRef) -> Result<Listing, CardError> {
        let title = self.title.extract_text(card).ok_or(CardError::MissingField("title"))?;
        let company = self.company.extract_text(card).ok_or(CardError::MissingField("company"))?;
        let href = self.link.extract_attr(card, "href").ok_or(CardError::MissingField("link"))?;
        let link = self
            .base
            .join(&href)
            .map(String::from)
            .map_err(|_| CardError::MissingField("link"))?;

        let location = self
            .location
            .extract_text(card)
            .unwrap_or_else(|| DEFAULT_LOCATION.to_string());

        // Detail blocks are ordered start date, duration, stipend.
        let details: Vec<String> = self
            .details
            .select_within(card)
            .iter()
            .map(element_text)
            .collect();
        let detail_at = |i: usize| {
            details
                .get(i)
                .filter(|t| !t.is_empty())
                .cloned()
                .unwrap_or_else(|| NOT_SPECIFIED.to_string())
        };

        Ok(Listing {
            title,
            company,
            location,
            link,
            duration: detail_at(1),
            stipend_range: detail_at(2),
            source: SourceTag::Internshala,
            scraped_at: Utc::now(),
        })
    }
}

/// Scrapes the python-related category pages of the job board.
pub struct InternshalaAdapter {
    fetch_config: FetchConfig,
    category_urls: Vec<String>,
}

impl InternshalaAdapter {
    pub fn new(fetch_config: FetchConfig) -> Self {
        let category_urls = CATEGORY_PATHS
            .iter()
            .map(|p| format!("{}{}", BASE_URL, p))
            .collect();
        InternshalaAdapter { fetch_config, category_urls }
    }

    pub fn with_urls(fetch_config: FetchConfig, category_urls: Vec<String>) -> Self {
        InternshalaAdapter { fetch_config, category_urls }
    }
}

impl SourceAdapter for InternshalaAdapter {
    fn source(&self) -> SourceTag {
        SourceTag::Internshala
    }

    fn produce_listings(&self) -> Result<Vec<Listing>, AdapterError> {
        let fetcher = Fetcher::new(self.fetch_config.clone())?;
        let parser = CardParser::new(Url::parse(BASE_URL)?);

        let mut listings = Vec::new();
        let mut fetched_pages = 0;

        for url in &self.category_urls {
            match fetcher.fetch(url) {
                Ok(html) => {
                    fetched_pages += 1;
                    let found = parser.parse_document(&html);
                    info!("Parsed {} listings from {}", found.len(), url);
                    listings.extend(found);
                }
                Err(e) => warn!("Failed to fetch {}: {}", url, e),
            }
        }

        if fetched_pages == 0 && !self.category_urls.is_empty() {
            return Err(AdapterError::NoPagesFetched { attempted: self.category_urls.len() });
        }
        Ok(listings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn parser() -> CardParser {
        CardParser::new(Url::parse(BASE_URL).unwrap())
    }

    const PAGE: &str = r##"
    <html><body>
      <div class="individual_internship">
        <div class="heading_4_5 profile">Python Development</div>
        <a class="link_display_like_text">Acme Labs</a>
        <a href="#internship_location">Work From Home</a>
        <div class="item_body">Immediately</div>
        <div class="item_body">3 Months</div>
        <div class="item_body">₹ 10,000 /month</div>
        <a class="view_detail_button" href="/internship/detail/python-development-at-acme">View</a>
      </div>
      <div class="individual_internship">
        <h3 class="internship_title">Django Intern</h3>
        <div class="company_name">Widgets Co</div>
        <a href="https://internshala.com/internship/detail/django">View</a>
      </div>
      <div class="individual_internship">
        <div class="heading_4_5 profile">No Company Here</div>
        <a class="view_detail_button" href="/internship/detail/x">View</a>
      </div>
    </body></html>"##;

    #[test]
    fn test_parses_cards_with_primary_selectors() {
        let listings = parser().parse_document(PAGE);
        assert_eq!(listings.len(), 2);

        let first = &listings[0];
        assert_eq!(first.title, "Python Development");
        assert_eq!(first.company, "Acme Labs");
        assert_eq!(first.location, "Work From Home");
        assert_eq!(first.link, "https://internshala.com/internship/detail/python-development-at-acme");
        assert_eq!(first.duration, "3 Months");
        assert_eq!(first.stipend_range, "₹ 10,000 /month");
        assert_eq!(first.source, SourceTag::Internshala);
    }

    #[test]
    fn test_fallback_selectors_and_defaults() {
        let listings = parser().parse_document(PAGE);
        let second = &listings[1];
        assert_eq!(second.title, "Django Intern");
        assert_eq!(second.company, "Widgets Co");
        assert_eq!(second.location, DEFAULT_LOCATION);
        assert_eq!(second.link, "https://internshala.com/internship/detail/django");
        assert_eq!(second.duration, NOT_SPECIFIED);
        assert_eq!(second.stipend_range, NOT_SPECIFIED);
    }

    #[test]
    fn test_falls_back_to_later_card_selector() {
        let html = r#"
            <div class="internship_card">
              <h3 class="card_title">Flask Intern</h3>
              <span class="company-name">Bottle Inc</span>
              <a href="/internship/detail/flask">View</a>
            </div>"#;
        let listings = parser().parse_document(html);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].title, "Flask Intern");
        assert_eq!(listings[0].company, "Bottle Inc");
    }

    #[test]
    fn test_card_missing_company_is_rejected() {
        let html = r#"<div id="c"><h3 class="internship_title">Solo</h3><a href="/x">x</a></div>"#;
        let document = Html::parse_document(html);
        let sel = scraper::Selector::parse("#c").unwrap();
        let card = document.select(&sel).next().unwrap();
        assert_eq!(parser().parse_card(&card), Err(CardError::MissingField("company")));
    }

    #[test]
    fn test_empty_document_yields_nothing() {
        assert!(parser().parse_document("<html><body><p>maintenance</p></body></html>").is_empty());
    }

    #[test]
    fn test_all_pages_unreachable_is_an_error() {
        let config = FetchConfig {
            retries: 1,
            backoff_unit: Duration::ZERO,
            pacing_min: Duration::ZERO,
            pacing_max: Duration::ZERO,
            timeout: Duration::from_secs(2),
            ..FetchConfig::default()
        };
        let adapter = InternshalaAdapter::with_urls(
            config,
            vec!["http://127.0.0.1:1/a".to_string(), "http://127.0.0.1:1/b".to_string()],
        );
        let err = adapter.produce_listings().unwrap_err();
        assert!(matches!(err, AdapterError::NoPagesFetched { attempted: 2 }));
    }
}
