use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// `watch?v=ID` style links
static QUERY_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"v=([a-zA-Z0-9_-]{11})").expect("query id regex"));

/// `youtu.be/ID` short links
static SHORT_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"youtu\.be/([a-zA-Z0-9_-]{11})").expect("short link regex"));

/// Extract unique video IDs from pasted links, in order of first appearance.
///
/// Tokens that match neither link shape are dropped without complaint.
pub fn extract_ids(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();

    text.split_whitespace()
        .filter_map(extract_token)
        .filter(|id| seen.insert(id.to_string()))
        .map(String::from)
        .collect()
}

fn extract_token(token: &str) -> Option<&str> {
    [&*QUERY_ID_RE, &*SHORT_LINK_RE]
        .into_iter()
        .find_map(|re| re.captures(token))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deduplicates_across_link_shapes() {
        let ids = extract_ids(
            "https://youtu.be/dQw4w9WgXcQ extra https://x.com/watch?v=dQw4w9WgXcQ",
        );
        assert_eq!(ids, vec!["dQw4w9WgXcQ"]);
    }

    #[test]
    fn keeps_first_appearance_order() {
        let text = "https://www.youtube.com/watch?v=bbbbbbbbbbb&list=WL&index=2\n\
                    https://youtu.be/aaaaaaaaaaa?t=30\n\
                    https://www.youtube.com/watch?v=bbbbbbbbbbb";
        assert_eq!(extract_ids(text), vec!["bbbbbbbbbbb", "aaaaaaaaaaa"]);
    }

    #[test]
    fn query_pattern_wins_over_short_link() {
        let ids = extract_ids("https://youtu.be/aaaaaaaaaaa?v=bbbbbbbbbbb");
        assert_eq!(ids, vec!["bbbbbbbbbbb"]);
    }

    #[test]
    fn drops_unparseable_tokens() {
        let ids = extract_ids("hello https://youtu.be/short watch?v=abc dQw4w9WgXcQ");
        assert!(ids.is_empty());
    }

    #[test]
    fn accepts_dash_and_underscore() {
        assert_eq!(extract_ids("youtu.be/a-b_c-d_e-f"), vec!["a-b_c-d_e-f"]);
    }
}
