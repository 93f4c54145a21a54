//! Path pattern parsing and matching.
//!
//! # Responsibilities
//! - Parse route patterns (`/node/:id`) into literal and capture segments
//! - Match a request path against a pattern, extracting captures
//! - Render a pattern back into a path for named navigation
//!
//! # Design Decisions
//! - A capture matches exactly one non-empty segment
//! - Literal comparison is ASCII case-insensitive unless `sensitive` is set
//! - Literals and captures are compared and stored percent-decoded, and
//!   encoded again when a pattern is rendered
//! - No regex: matching is a segment-by-segment walk

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Errors raised while parsing or rendering a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern `{0}` must start with `/`")]
    MissingLeadingSlash(String),

    #[error("pattern `{0}` contains an empty segment")]
    EmptySegment(String),

    #[error("pattern `{0}` has a capture without a name")]
    EmptyParamName(String),

    #[error("pattern `{pattern}` captures `{name}` more than once")]
    DuplicateParam { pattern: String, name: String },

    #[error("pattern `{pattern}` needs parameter `{name}`")]
    MissingParam { pattern: String, name: String },

    #[error("pattern `{pattern}` contains `{ch}`, which never reaches the path")]
    ReservedCharacter { pattern: String, ch: char },
}

/// One segment of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Capture(String),
}

/// Parameters captured from a path, keyed by capture name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A compiled route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse a pattern. A single trailing slash is accepted and ignored.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        let rest = raw
            .strip_prefix('/')
            .ok_or_else(|| PatternError::MissingLeadingSlash(raw.to_string()))?;

        if let Some(ch) = raw.chars().find(|c| matches!(c, '?' | '#')) {
            return Err(PatternError::ReservedCharacter {
                pattern: raw.to_string(),
                ch,
            });
        }

        let mut segments: Vec<Segment> = Vec::new();
        if !rest.is_empty() {
            let rest = rest.strip_suffix('/').unwrap_or(rest);
            for part in rest.split('/') {
                if part.is_empty() {
                    return Err(PatternError::EmptySegment(raw.to_string()));
                }
                match part.strip_prefix(':') {
                    Some("") => return Err(PatternError::EmptyParamName(raw.to_string())),
                    Some(name) => {
                        let seen = segments
                            .iter()
                            .any(|s| matches!(s, Segment::Capture(n) if n == name));
                        if seen {
                            return Err(PatternError::DuplicateParam {
                                pattern: raw.to_string(),
                                name: name.to_string(),
                            });
                        }
                        segments.push(Segment::Capture(name.to_string()));
                    }
                    None => segments.push(Segment::Literal(decode_segment(part).into_owned())),
                }
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True when the pattern has no captures.
    pub fn is_static(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, Segment::Literal(_)))
    }

    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Capture(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Identity key used for duplicate detection.
    ///
    /// Capture names are erased, so `/node/:id` and `/node/:key` collide.
    /// Literals are lowercased when matching is case-insensitive.
    pub fn key(&self, sensitive: bool) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }
        let mut key = String::new();
        for segment in &self.segments {
            key.push('/');
            match segment {
                Segment::Literal(lit) if sensitive => key.push_str(lit),
                Segment::Literal(lit) => key.push_str(&lit.to_ascii_lowercase()),
                Segment::Capture(_) => key.push(':'),
            }
        }
        key
    }

    /// Match already-split path segments against this pattern.
    pub fn matches(&self, parts: &[&str], sensitive: bool) -> Option<Params> {
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = Params::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(lit) => {
                    let part = decode_segment(part);
                    let equal = if sensitive {
                        *lit == part
                    } else {
                        lit.eq_ignore_ascii_case(&part)
                    };
                    if !equal {
                        return None;
                    }
                }
                Segment::Capture(name) => {
                    if part.is_empty() {
                        return None;
                    }
                    params.insert(name.clone(), decode_segment(part).into_owned());
                }
            }
        }
        Some(params)
    }

    /// Render the pattern into a concrete path.
    pub fn render(&self, params: &Params) -> Result<String, PatternError> {
        if self.segments.is_empty() {
            return Ok("/".to_string());
        }
        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Literal(lit) => path.push_str(&urlencoding::encode(lit)),
                Segment::Capture(name) => {
                    let value = params.get(name).filter(|v| !v.is_empty()).ok_or_else(|| {
                        PatternError::MissingParam {
                            pattern: self.raw.clone(),
                            name: name.clone(),
                        }
                    })?;
                    path.push_str(&urlencoding::encode(value));
                }
            }
        }
        Ok(path)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.raw)
    }
}

/// Percent-decode one path segment, keeping it as-is when it is not UTF-8.
pub fn decode_segment(segment: &str) -> Cow<'_, str> {
    urlencoding::decode(segment).unwrap_or(Cow::Borrowed(segment))
}

/// Split a request path into segments.
///
/// Unless `strict`, one trailing slash is dropped so `/map/` reads as `/map`.
pub fn split_path(path: &str, strict: bool) -> Vec<&str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let trimmed = if strict {
        trimmed
    } else {
        trimmed.strip_suffix('/').unwrap_or(trimmed)
    };
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split('/').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_static_and_capture() {
        let pattern = PathPattern::parse("/node/:id").unwrap();
        assert_eq!(
            pattern.segments(),
            &[
                Segment::Literal("node".into()),
                Segment::Capture("id".into())
            ]
        );
        assert!(!pattern.is_static());
        assert_eq!(pattern.param_names().collect::<Vec<_>>(), vec!["id"]);

        let root = PathPattern::parse("/").unwrap();
        assert!(root.segments().is_empty());
        assert!(root.is_static());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(
            PathPattern::parse("map"),
            Err(PatternError::MissingLeadingSlash("map".into()))
        );
        assert_eq!(
            PathPattern::parse("/a//b"),
            Err(PatternError::EmptySegment("/a//b".into()))
        );
        assert_eq!(
            PathPattern::parse("/node/:"),
            Err(PatternError::EmptyParamName("/node/:".into()))
        );
        assert!(matches!(
            PathPattern::parse("/:id/x/:id"),
            Err(PatternError::DuplicateParam { .. })
        ));
    }

    #[test]
    fn test_key_erases_capture_names() {
        let a = PathPattern::parse("/node/:id").unwrap();
        let b = PathPattern::parse("/Node/:key").unwrap();
        assert_eq!(a.key(false), b.key(false));
        assert_ne!(a.key(true), b.key(true));
    }

    #[test]
    fn test_match_capture_decodes() {
        let pattern = PathPattern::parse("/node/:id").unwrap();
        let params = pattern
            .matches(&split_path("/node/a%20b", false), false)
            .unwrap();
        assert_eq!(params.get("id"), Some("a b"));

        assert!(pattern.matches(&split_path("/node/", true), false).is_none());
        assert!(pattern.matches(&split_path("/node/1/2", false), false).is_none());
    }

    #[test]
    fn test_match_case_sensitivity() {
        let pattern = PathPattern::parse("/home").unwrap();
        assert!(pattern.matches(&["Home"], false).is_some());
        assert!(pattern.matches(&["Home"], true).is_none());
    }

    #[test]
    fn test_literals_compare_decoded() {
        let pattern = PathPattern::parse("/über").unwrap();
        assert!(pattern.matches(&split_path("/%C3%BCber", false), true).is_some());

        let spaced = PathPattern::parse("/a%20b").unwrap();
        assert_eq!(spaced.segments(), &[Segment::Literal("a b".into())]);
        assert!(spaced.matches(&["a b"], false).is_some());
        assert_eq!(spaced.render(&Params::new()).unwrap(), "/a%20b");

        let map = PathPattern::parse("/map").unwrap();
        assert!(map.matches(&split_path("/ma%70", false), false).is_some());
    }

    #[test]
    fn test_parse_rejects_query_and_fragment() {
        assert_eq!(
            PathPattern::parse("/map?x=1"),
            Err(PatternError::ReservedCharacter {
                pattern: "/map?x=1".into(),
                ch: '?'
            })
        );
        assert!(matches!(
            PathPattern::parse("/node/:id#top"),
            Err(PatternError::ReservedCharacter { ch: '#', .. })
        ));
    }

    #[test]
    fn test_split_path_trailing_slash() {
        assert_eq!(split_path("/map/", false), vec!["map"]);
        assert_eq!(split_path("/map/", true), vec!["map", ""]);
        assert!(split_path("/", false).is_empty());
    }

    #[test]
    fn test_render() {
        let pattern = PathPattern::parse("/node/:id").unwrap();
        let params: Params = [("id", "a/b")].into_iter().collect();
        assert_eq!(pattern.render(&params).unwrap(), "/node/a%2Fb");

        let err = pattern.render(&Params::new()).unwrap_err();
        assert!(matches!(err, PatternError::MissingParam { name, .. } if name == "id"));
    }
}
