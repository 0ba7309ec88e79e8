//! Cookies presented on an inbound request.

use cookie::Cookie;

/// Name/value pairs parsed from one or more `Cookie` headers.
///
/// Unparseable pairs are skipped. When a name repeats, the first occurrence wins.
#[derive(Debug, Clone, Default)]
pub struct RequestCookies {
    pairs: Vec<(String, String)>,
}

impl RequestCookies {
    /// An empty cookie set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse raw `Cookie` header values.
    pub fn parse<'a>(headers: impl IntoIterator<Item = &'a str>) -> Self {
        let pairs = headers
            .into_iter()
            .flat_map(|header| Cookie::split_parse(header))
            .filter_map(|cookie| cookie.ok())
            .map(|cookie| (cookie.name().to_string(), cookie.value().to_string()))
            .collect();
        Self { pairs }
    }

    /// Add a cookie.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((name.into(), value.into()));
        self
    }

    /// Value of the first cookie called `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_header() {
        let cookies = RequestCookies::parse(["theme=dark; FMKSession=abc-_123"]);
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies.get("FMKSession"), Some("abc-_123"));
        assert_eq!(cookies.get("theme"), Some("dark"));
        assert_eq!(cookies.get("missing"), None);
    }

    #[test]
    fn test_parse_multiple_headers() {
        let cookies = RequestCookies::parse(["a=1", "b=2; c=3"]);
        assert_eq!(cookies.get("a"), Some("1"));
        assert_eq!(cookies.get("c"), Some("3"));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let cookies = RequestCookies::parse(["sid=first; sid=second"]);
        assert_eq!(cookies.get("sid"), Some("first"));
    }

    #[test]
    fn test_malformed_pairs_are_skipped() {
        let cookies = RequestCookies::parse(["novalue; ok=1"]);
        assert_eq!(cookies.get("ok"), Some("1"));
        assert_eq!(cookies.get("novalue"), None);
    }

    #[test]
    fn test_builder() {
        let cookies = RequestCookies::new().with("sid", "x");
        assert_eq!(cookies.get("sid"), Some("x"));
        assert!(RequestCookies::new().is_empty());
    }
}
