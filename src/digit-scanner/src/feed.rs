//! Text feeds: parsing digits from stdin lines and replay files.

/// Values and rejected tokens parsed from a chunk of text.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ParsedFeed {
    pub values: Vec<i64>,
    pub rejected: Vec<String>,
}

/// Split on whitespace and commas, keeping every integer token.
///
/// Range checking is left to the window; only non-numeric tokens are
/// rejected here.
pub fn parse_feed(text: &str) -> ParsedFeed {
    let mut feed = ParsedFeed::default();
    for token in text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        match token.parse::<i64>() {
            Ok(value) => feed.values.push(value),
            Err(_) => feed.rejected.push(token.to_string()),
        }
    }
    feed
}
