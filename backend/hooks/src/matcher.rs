//! Event-name matching for filtering hooks.
//!
//! Patterns are globs over dotted event names: `*` matches any run of
//! characters (dots included), `?` matches one character. Matching is
//! case-sensitive, since event names are identifiers.

use regex::Regex;
use tracing::debug;

/// A compiled set of event-name patterns.
#[derive(Debug, Clone)]
pub struct EventMatcher {
    patterns: Vec<String>,
    compiled: Vec<Regex>,
}

impl EventMatcher {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        let compiled = patterns
            .iter()
            .filter_map(|p| match Regex::new(&glob_to_regex(p)) {
                Ok(re) => Some(re),
                Err(e) => {
                    debug!("[Matcher] Dropping unusable pattern {:?}: {}", p, e);
                    None
                }
            })
            .collect();
        Self { patterns, compiled }
    }

    pub fn is_match(&self, event: &str) -> bool {
        self.compiled.iter().any(|re| re.is_match(event))
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

fn glob_to_regex(pattern: &str) -> String {
    let mut regex = String::from("^");
    for ch in pattern.chars() {
        match ch {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            _ => regex.push_str(&regex::escape(ch.encode_utf8(&mut [0; 4]))),
        }
    }
    regex.push('$');
    regex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_names() {
        let m = EventMatcher::new(["open", "socket.connect"]);
        assert!(m.is_match("open"));
        assert!(m.is_match("socket.connect"));
        assert!(!m.is_match("opening"));
        assert!(!m.is_match("socket_connect"));
    }

    #[test]
    fn wildcards() {
        let m = EventMatcher::new(["socket.*", "os.?mod"]);
        assert!(m.is_match("socket.bind"));
        assert!(m.is_match("os.chmod"));
        assert!(!m.is_match("os.chown"));
        assert!(!m.is_match("sockets"));
    }

    #[test]
    fn case_sensitive() {
        assert!(!EventMatcher::new(["Open"]).is_match("open"));
    }

    #[test]
    fn empty_matcher_matches_nothing() {
        let m = EventMatcher::new(Vec::<String>::new());
        assert!(!m.is_match("anything"));
        assert!(m.patterns().is_empty());
    }
}
