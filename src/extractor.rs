use scraper::{ElementRef, Html, Selector};
use log::warn;

/// Ordered list of CSS selectors; the first one producing a non-empty
/// result wins.
pub struct SelectorChain {
    selectors: Vec<Selector>,
}

impl SelectorChain {
    /// Invalid selectors are logged and left out of the chain.
    pub fn new(patterns: &[&str]) -> Self {
        let selectors = patterns
            .iter()
            .filter_map(|p| match Selector::parse(p) {
                Ok(sel) => Some(sel),
                Err(e) => {
                    warn!("Skipping invalid selector '{}': {}", p, e);
                    None
                }
            })
            .collect();
        SelectorChain { selectors }
    }

    /// Text of the first matching element, whitespace collapsed.
    pub fn extract_text(&self, scope: &ElementRef) -> Option<String> {
        self.selectors.iter().find_map(|sel| {
            scope
                .select(sel)
                .next()
                .map(|el| element_text(&el))
                .filter(|t| !t.is_empty())
        })
    }

    /// `attr` of the first matching element that carries a non-empty value.
    pub fn extract_attr(&self, scope: &ElementRef, attr: &str) -> Option<String> {
        self.selectors.iter().find_map(|sel| {
            scope
                .select(sel)
                .filter_map(|el| el.value().attr(attr))
                .map(str::trim)
                .find(|v| !v.is_empty())
                .map(str::to_string)
        })
    }

    /// All elements matched by the first selector that matches anything.
    pub fn select_first_nonempty<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        for sel in &self.selectors {
            let found: Vec<ElementRef<'a>> = document.select(sel).collect();
            if !found.is_empty() {
                return found;
            }
        }
        Vec::new()
    }

    /// Like [`select_first_nonempty`](Self::select_first_nonempty) but scoped to an element.
    pub fn select_within<'a>(&self, scope: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
        for sel in &self.selectors {
            let found: Vec<ElementRef<'a>> = scope.select(sel).collect();
            if !found.is_empty() {
                return found;
            }
        }
        Vec::new()
    }
}

pub fn element_text(el: &ElementRef) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
