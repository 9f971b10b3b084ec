//! Route path patterns.
//!
//! `/posts/:id/edit` has three segments: two literals and one `:id` placeholder that captures
//! whatever non-empty segment stands in its place. Literals compare case-insensitively and one
//! trailing slash on the path is ignored. Captured values are percent-decoded, so `/john%20doe`
//! binds `john doe`.

use percent_encoding::percent_decode_str;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        let segments = split(pattern)
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(segment.to_string()),
            })
            .collect();
        Self {
            raw: pattern.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Captured params when `path` matches, `None` otherwise.
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let parts: Vec<&str> = split(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal.eq_ignore_ascii_case(part) => {}
                Segment::Literal(_) => return None,
                Segment::Param(_) if part.is_empty() => return None,
                Segment::Param(name) => {
                    let value = percent_decode_str(part).decode_utf8_lossy();
                    params.insert(name.clone(), value.into_owned());
                }
            }
        }
        Some(params)
    }
}

/// Whether `path` is `prefix` or lies below it on a segment boundary.
pub fn prefix_matches(prefix: &str, path: &str) -> bool {
    let prefix: Vec<&str> = split(prefix).collect();
    let parts: Vec<&str> = split(path).collect();
    parts.len() >= prefix.len()
        && prefix
            .iter()
            .zip(&parts)
            .all(|(want, got)| want.eq_ignore_ascii_case(got))
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    trimmed.split('/').filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_placeholders() {
        let pattern = PathPattern::parse("/posts/:id/edit");
        let params = pattern.matches("/posts/abc-123/edit").unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("abc-123"));

        assert!(pattern.matches("/posts/abc-123").is_none());
        assert!(pattern.matches("/posts//edit").is_none());
    }

    #[test]
    fn captured_values_are_percent_decoded() {
        let pattern = PathPattern::parse("/:username/:id");
        let params = pattern.matches("/john%20doe/1").unwrap();
        assert_eq!(params.get("username").map(String::as_str), Some("john doe"));
        assert_eq!(params.get("id").map(String::as_str), Some("1"));

        let params = pattern.matches("/a+b/caf%C3%A9").unwrap();
        assert_eq!(params.get("username").map(String::as_str), Some("a+b"));
        assert_eq!(params.get("id").map(String::as_str), Some("café"));
    }

    #[test]
    fn literals_are_case_insensitive_and_trailing_slash_is_ignored() {
        let pattern = PathPattern::parse("/posts");
        assert!(pattern.matches("/Posts/").is_some());
        assert!(pattern.matches("/posts/new").is_none());
    }

    #[test]
    fn root_matches_only_root() {
        let pattern = PathPattern::parse("/");
        assert!(pattern.matches("/").is_some());
        assert!(pattern.matches("/random").is_none());
    }

    #[test]
    fn prefixes_respect_segment_boundaries() {
        assert!(prefix_matches("/random", "/random"));
        assert!(prefix_matches("/random", "/random/deeper"));
        assert!(!prefix_matches("/random", "/randomness"));
        assert!(prefix_matches("/", "/anything"));
    }
}
