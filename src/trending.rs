use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use log::info;
use crate::listing::Listing;
use crate::query::most_common;

pub const CHART_FILE_NAME: &str = "trending_fields.svg";
pub const CHART_KEYWORD_COUNT: usize = 5;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[a-zA-Z]+\b").expect("static word pattern"));

static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "the", "a", "an", "and", "or", "to", "for", "with", "in", "on", "of", "by", "at", "from",
        "is", "are", "as", "be", "this", "that", "you", "we", "they", "it", "its", "have", "has",
        "had", "will", "would", "could", "should", "may", "might", "can", "must", "shall", "do",
        "does", "did", "not", "no", "yes", "but", "if", "then", "else", "when", "where", "why",
        "how", "what", "which", "who", "whom", "whose", "there", "here", "up", "down", "out", "off",
        "over", "under", "again", "further", "once", "more", "most", "other", "some", "such",
        "only", "own", "same", "so", "than", "too", "very", "just", "now", "well", "also", "back",
        "even", "still", "way", "take", "every", "any", "both", "each", "few", "nor", "s", "t",
        "don",
    ]
    .into_iter()
    .collect()
});

/// Lowercased alphabetic words longer than two letters, stopwords removed.
pub fn title_keywords(title: &str) -> Vec<String> {
    let lower = title.to_lowercase();
    WORD.find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|w| w.len() > 2 && !STOPWORDS.contains(w))
        .map(str::to_string)
        .collect()
}

pub fn top_keywords(listings: &[Listing], n: usize) -> Vec<(String, usize)> {
    let tokens: Vec<String> = listings.iter().flat_map(|l| title_keywords(&l.title)).collect();
    most_common(tokens.iter().map(String::as_str), n)
}

/// Draws the keyword frequency chart somewhere the read endpoint can serve it.
pub trait ChartRenderer: Send + Sync {
    fn render(&self, keywords: &[(String, usize)]) -> io::Result<()>;
}

/// Renders an SVG bar chart to a fixed path.
pub struct SvgChartRenderer {
    path: PathBuf,
}

impl SvgChartRenderer {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        SvgChartRenderer { path: dir.as_ref().join(CHART_FILE_NAME) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

const WIDTH: usize = 640;
const HEIGHT: usize = 320;
const MARGIN: usize = 40;

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

pub fn render_svg(keywords: &[(String, usize)]) -> String {
    let max = keywords.iter().map(|(_, c)| *c).max().unwrap_or(0).max(1);
    let plot_height = HEIGHT - 2 * MARGIN;
    let slot = (WIDTH - 2 * MARGIN) / keywords.len().max(1);
    let bar_width = slot * 3 / 5;

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = WIDTH,
        h = HEIGHT
    );
    svg.push_str(&format!(
        r#"<text x="{}" y="24" text-anchor="middle" font-size="16">Top 5 Trending Job Keywords</text>"#,
        WIDTH / 2
    ));

    for (i, (word, count)) in keywords.iter().enumerate() {
        let bar_height = plot_height * count / max;
        let x = MARGIN + i * slot + (slot - bar_width) / 2;
        let y = HEIGHT - MARGIN - bar_height;
        svg.push_str(&format!(
            r#"<rect x="{x}" y="{y}" width="{bar_width}" height="{bar_height}" fill="skyblue"/>"#
        ));
        svg.push_str(&format!(
            r#"<text x="{}" y="{}" text-anchor="middle" font-size="12">{}</text>"#,
            x + bar_width / 2,
            y.saturating_sub(4),
            count
        ));
        svg.push_str(&format!(
            r#"<text x="{}" y="{}" text-anchor="middle" font-size="12">{}</text>"#,
            x + bar_width / 2,
            HEIGHT - MARGIN + 16,
            escape(word)
        ));
    }
    svg.push_str("</svg>");
    svg
}

impl ChartRenderer for SvgChartRenderer {
    fn render(&self, keywords: &[(String, usize)]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, render_svg(keywords))?;
        info!("Trending chart written to {:?}", self.path);
        Ok(())
    }
}

/// Renders the chart for `listings`; does nothing when no keyword survives.
pub fn generate_trending_chart(renderer: &dyn ChartRenderer, listings: &[Listing]) -> io::Result<bool> {
    let keywords = top_keywords(listings, CHART_KEYWORD_COUNT);
    if keywords.is_empty() {
        return Ok(false);
    }
    renderer.render(&keywords)?;
    Ok(true)
}
