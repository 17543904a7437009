use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

// Anything up to whitespace, a comma/semicolon (ASCII or full-width) or a quote.
static LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s,;"'，；]+"#).expect("link regex"));

/// Pull candidate article URLs out of free-form pasted text.
///
/// Duplicates are dropped by exact string comparison; the first occurrence
/// keeps its position. No normalization is applied, so `.../a` and `.../a/`
/// are two different links.
pub fn extract_links(input: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    LINK_REGEX
        .find_iter(input)
        .map(|m| m.as_str())
        .filter(|link| seen.insert(*link))
        .map(str::to_string)
        .collect()
}
