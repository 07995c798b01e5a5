use crate::domain::model::PlaceholderMatch;
use regex::Regex;
use std::sync::OnceLock;

/// Reserved image target marking an image that still has to be generated.
pub const SENTINEL_PATH: &str = "__too_be_replaced_image_path__";

fn placeholder_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let pattern = format!(r"!\[([^\]]*)\]\(/?{}\)", regex::escape(SENTINEL_PATH));
        Regex::new(&pattern).expect("placeholder pattern is a valid regex")
    })
}

/// Ordered placeholder enumerator.
///
/// Both image-key assignment and substitution walk the markdown through
/// [`PlaceholderScanner::matches`], so the `n`-th tag always gets `image_n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderScanner;

impl PlaceholderScanner {
    pub fn new() -> Self {
        Self
    }

    /// Lazily yields every placeholder tag, left to right.
    pub fn matches<'a>(&self, markdown: &'a str) -> impl Iterator<Item = PlaceholderMatch> + 'a {
        placeholder_regex()
            .captures_iter(markdown)
            .enumerate()
            .filter_map(|(index, caps)| {
                let whole = caps.get(0)?;
                let prompt = caps.get(1).map_or("", |m| m.as_str());
                Some(PlaceholderMatch {
                    index,
                    prompt: prompt.to_string(),
                    span: whole.range(),
                })
            })
    }

    pub fn scan(&self, markdown: &str) -> Vec<PlaceholderMatch> {
        let found: Vec<PlaceholderMatch> = self.matches(markdown).collect();
        tracing::debug!("Found {} image placeholder(s)", found.len());
        found
    }
}
