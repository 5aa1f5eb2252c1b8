//! Path pattern matching.

use regex::Regex;

use crate::error::{Result, RouterError};
use crate::request::PathParams;

/// How much of the request path a pattern has to consume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// The pattern must match at the start of the path; trailing input is
    /// ignored, so `/users` also matches `/users/42`.
    #[default]
    Prefix,
    /// The pattern must match the whole path.
    Full,
}

/// A compiled route pattern.
///
/// Patterns are regular expressions. Named groups written as
/// `(?P<name>...)` become path parameters.
#[derive(Debug, Clone)]
pub struct PathPattern {
    /// The original pattern string.
    pattern: String,
    /// Compiled regex, anchored according to the match mode.
    regex: Regex,
}

impl PathPattern {
    /// Compiles a pattern.
    ///
    /// # Example
    ///
    /// ```
    /// use tomoyo::{MatchMode, PathPattern};
    ///
    /// let pattern = PathPattern::new(r"/posts/(?P<id>\d+)", MatchMode::Prefix).unwrap();
    /// let params = pattern.match_path("/posts/123/comments").unwrap();
    /// assert_eq!(params.get("id"), Some("123"));
    /// ```
    pub fn new(pattern: &str, mode: MatchMode) -> Result<Self> {
        let anchored = match mode {
            MatchMode::Prefix => format!("^(?:{pattern})"),
            MatchMode::Full => format!("^(?:{pattern})$"),
        };
        let regex = Regex::new(&anchored).map_err(|source| RouterError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Attempts to match a path against this pattern.
    ///
    /// Returns the named captures if the path matches. Groups that did not
    /// participate in the match are left out.
    pub fn match_path(&self, path: &str) -> Option<PathParams> {
        let caps = self.regex.captures(path)?;

        let mut params = PathParams::new();
        for name in self.regex.capture_names().flatten() {
            if let Some(value) = caps.name(name) {
                params.insert(name, value.as_str());
            }
        }

        Some(params)
    }

    /// Returns the original pattern string.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the names of the pattern's named groups.
    pub fn param_names(&self) -> Vec<&str> {
        self.regex.capture_names().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_path() {
        let pattern = PathPattern::new("/users", MatchMode::Prefix).unwrap();
        assert!(pattern.match_path("/users").is_some());
        assert!(pattern.match_path("/posts").is_none());
        assert!(pattern.match_path("/api/users").is_none());
    }

    #[test]
    fn test_prefix_mode_ignores_trailing_input() {
        let pattern = PathPattern::new("/users", MatchMode::Prefix).unwrap();
        assert!(pattern.match_path("/users/42/edit").is_some());
    }

    #[test]
    fn test_full_mode_requires_whole_path() {
        let pattern = PathPattern::new("/users", MatchMode::Full).unwrap();
        assert!(pattern.match_path("/users").is_some());
        assert!(pattern.match_path("/users/42").is_none());
    }

    #[test]
    fn test_alternation_stays_anchored() {
        let pattern = PathPattern::new("/a|/b", MatchMode::Full).unwrap();
        assert!(pattern.match_path("/b").is_some());
        assert!(pattern.match_path("/a/b").is_none());
    }

    #[test]
    fn test_named_groups() {
        let pattern = PathPattern::new(
            r"/posts/(?P<post_id>\d+)/comments/(?P<comment_id>\d+)",
            MatchMode::Prefix,
        )
        .unwrap();
        let params = pattern.match_path("/posts/42/comments/7").unwrap();
        assert_eq!(params.get("post_id"), Some("42"));
        assert_eq!(params.get("comment_id"), Some("7"));
        assert_eq!(pattern.param_names(), vec!["post_id", "comment_id"]);
    }

    #[test]
    fn test_optional_group_left_out() {
        let pattern =
            PathPattern::new(r"/files(?:/(?P<name>\w+))?", MatchMode::Full).unwrap();
        let params = pattern.match_path("/files").unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn test_invalid_pattern() {
        let err = PathPattern::new("/users/(?P<id", MatchMode::Prefix).unwrap_err();
        assert!(matches!(err, RouterError::InvalidPattern { pattern, .. } if pattern == "/users/(?P<id"));
    }
}
