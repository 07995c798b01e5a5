use crate::core::scanner::PlaceholderScanner;
use crate::domain::model::UrlMap;

/// Result of one rewrite pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub markdown: String,
    pub replaced: usize,
    pub unresolved: usize,
}

/// Rewrites every placeholder that has a resolved URL into a regular image
/// tag. Placeholders without a URL are copied through byte for byte, and text
/// outside placeholder tags is never touched.
pub fn substitute(markdown: &str, scanner: &PlaceholderScanner, urls: &UrlMap) -> Substitution {
    let mut output = String::with_capacity(markdown.len());
    let mut cursor = 0;
    let mut replaced = 0;
    let mut unresolved = 0;

    for placeholder in scanner.matches(markdown) {
        output.push_str(&markdown[cursor..placeholder.span.start]);

        match urls.get(&placeholder.key()) {
            Some(url) => {
                output.push_str("![");
                output.push_str(&placeholder.prompt);
                output.push_str("](");
                output.push_str(url);
                output.push(')');
                replaced += 1;
            }
            None => {
                output.push_str(&markdown[placeholder.span.clone()]);
                unresolved += 1;
            }
        }

        cursor = placeholder.span.end;
    }
    output.push_str(&markdown[cursor..]);

    tracing::debug!(
        "Substituted {} placeholder(s), {} left unresolved",
        replaced,
        unresolved
    );

    Substitution {
        markdown: output,
        replaced,
        unresolved,
    }
}
