use std::collections::HashSet;
use crate::listing::Listing;

/// Keeps the first listing for every `(title, company)` pair, in input order.
pub fn dedupe(listings: Vec<Listing>) -> Vec<Listing> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    listings
        .into_iter()
        .filter(|l| seen.insert((l.title.clone(), l.company.clone())))
        .collect()
}
