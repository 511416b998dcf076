//! Hierarchical event paths and wildcard masks.
//!
//! Every event carries a dotted [`EventPath`] such as `"obs.ccd.frame"`.
//! Consumers select events with an [`EventMask`] over the same syntax,
//! extended with two wildcards:
//!
//! | Segment | Matches |
//! |---------|---------|
//! | `*` | exactly one path segment |
//! | `**` | zero or more path segments |
//! | anything else | that literal segment |
//!
//! # Example
//!
//! ```
//! use evmux_types::{EventMask, EventPath};
//!
//! let id: EventPath = "obs.ccd.frame".parse().unwrap();
//!
//! assert!("obs.*.frame".parse::<EventMask>().unwrap().matches(&id));
//! assert!("obs.**".parse::<EventMask>().unwrap().matches(&id));
//! assert!(!"obs.*".parse::<EventMask>().unwrap().matches(&id));
//! assert!(EventMask::any().matches(&id));
//! ```

use crate::ErrorCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const SEPARATOR: char = '.';
const ONE: &str = "*";
const MANY: &str = "**";

/// Path or mask parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The input string was empty.
    #[error("path is empty")]
    Empty,

    /// Two separators in a row, or a leading/trailing separator.
    #[error("empty segment in '{0}'")]
    EmptySegment(String),

    /// A segment contains whitespace or a misplaced wildcard.
    #[error("invalid segment '{segment}' in '{input}'")]
    InvalidSegment {
        /// The whole input.
        input: String,
        /// The offending segment.
        segment: String,
    },
}

impl ErrorCode for PathError {
    fn code(&self) -> &'static str {
        match self {
            Self::Empty => "PATH_EMPTY",
            Self::EmptySegment(_) => "PATH_EMPTY_SEGMENT",
            Self::InvalidSegment { .. } => "PATH_INVALID_SEGMENT",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

fn check_segments<'a>(
    input: &'a str,
    mut valid: impl FnMut(&str) -> bool,
) -> Result<impl Iterator<Item = &'a str>, PathError> {
    if input.is_empty() {
        return Err(PathError::Empty);
    }
    for segment in input.split(SEPARATOR) {
        if segment.is_empty() {
            return Err(PathError::EmptySegment(input.to_string()));
        }
        if segment.chars().any(char::is_whitespace) || !valid(segment) {
            return Err(PathError::InvalidSegment {
                input: input.to_string(),
                segment: segment.to_string(),
            });
        }
    }
    Ok(input.split(SEPARATOR))
}

/// A concrete, wildcard-free hierarchical id.
///
/// Used both as an event's name and as an optional source or
/// destination address. Stored in its dotted form; segments are
/// validated once at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventPath(String);

impl EventPath {
    /// Parses a dotted path.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] if the path is empty, has an empty
    /// segment, or a segment contains whitespace or `*`.
    pub fn parse(input: &str) -> Result<Self, PathError> {
        check_segments(input, |s| !s.contains('*'))?;
        Ok(Self(input.to_string()))
    }

    /// Returns the dotted form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates over the segments in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR)
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Returns `true` if `prefix` is a whole-segment prefix of `self`.
    ///
    /// ```
    /// use evmux_types::EventPath;
    ///
    /// let id = EventPath::parse("hub.a.1").unwrap();
    /// assert!(id.starts_with(&EventPath::parse("hub").unwrap()));
    /// assert!(!id.starts_with(&EventPath::parse("hu").unwrap()));
    /// ```
    #[must_use]
    pub fn starts_with(&self, prefix: &EventPath) -> bool {
        let mut ours = self.segments();
        prefix.segments().all(|p| ours.next() == Some(p))
    }

    /// Removes a whole-segment prefix.
    ///
    /// Returns `None` if `prefix` is not a prefix of `self` or nothing
    /// would remain.
    #[must_use]
    pub fn strip_prefix(&self, prefix: &EventPath) -> Option<EventPath> {
        if !self.starts_with(prefix) {
            return None;
        }
        let rest = self.0.get(prefix.0.len() + 1..)?;
        Some(Self(rest.to_string()))
    }

    /// Returns `prefix.self`.
    #[must_use]
    pub fn prefixed(&self, prefix: &EventPath) -> EventPath {
        Self(format!("{}{SEPARATOR}{}", prefix.0, self.0))
    }
}

impl fmt::Display for EventPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EventPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for EventPath {
    type Error = PathError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for EventPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        check_segments(&value, |s| !s.contains('*'))?;
        Ok(Self(value))
    }
}

impl From<EventPath> for String {
    fn from(path: EventPath) -> Self {
        path.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum MaskSegment {
    Literal(String),
    One,
    Many,
}

/// A selection pattern over [`EventPath`]s.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventMask {
    text: String,
    segments: Vec<MaskSegment>,
}

impl EventMask {
    /// Parses a dotted mask.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] on empty input, empty segments, whitespace,
    /// or a `*` mixed with other characters inside one segment.
    pub fn parse(input: &str) -> Result<Self, PathError> {
        let segments = check_segments(input, |s| !s.contains('*') || s == ONE || s == MANY)?
            .map(|s| match s {
                ONE => MaskSegment::One,
                MANY => MaskSegment::Many,
                literal => MaskSegment::Literal(literal.to_string()),
            })
            .collect();
        Ok(Self {
            text: input.to_string(),
            segments,
        })
    }

    /// The mask that matches every path (`**`).
    #[must_use]
    pub fn any() -> Self {
        Self {
            text: MANY.to_string(),
            segments: vec![MaskSegment::Many],
        }
    }

    /// A mask that matches exactly one path.
    #[must_use]
    pub fn exact(path: &EventPath) -> Self {
        Self {
            text: path.0.clone(),
            segments: path
                .segments()
                .map(|s| MaskSegment::Literal(s.to_string()))
                .collect(),
        }
    }

    /// Returns the dotted form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns `true` if the mask contains no wildcard.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, MaskSegment::Literal(_)))
    }

    /// Tests `path` against this mask.
    #[must_use]
    pub fn matches(&self, path: &EventPath) -> bool {
        let parts: Vec<&str> = path.segments().collect();
        match_segments(&self.segments, &parts)
    }
}

/// Greedy glob match; a mismatch resumes after the last `**`, which
/// then swallows one more segment. Linear in `mask.len() * path.len()`.
fn match_segments(mask: &[MaskSegment], path: &[&str]) -> bool {
    let (mut m, mut p) = (0, 0);
    // (mask index after the last `**`, path index it resumed at)
    let mut resume: Option<(usize, usize)> = None;

    while p < path.len() {
        match mask.get(m) {
            Some(MaskSegment::Many) => {
                m += 1;
                resume = Some((m, p));
                continue;
            }
            Some(MaskSegment::One) => {
                m += 1;
                p += 1;
                continue;
            }
            Some(MaskSegment::Literal(lit)) if lit == path[p] => {
                m += 1;
                p += 1;
                continue;
            }
            _ => {}
        }
        let Some((after_many, from)) = resume else {
            return false;
        };
        m = after_many;
        p = from + 1;
        resume = Some((after_many, p));
    }

    mask[m..].iter().all(|s| *s == MaskSegment::Many)
}

impl fmt::Display for EventMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for EventMask {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for EventMask {
    type Error = PathError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for EventMask {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EventMask> for String {
    fn from(mask: EventMask) -> Self {
        mask.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_error_codes;

    fn path(s: &str) -> EventPath {
        EventPath::parse(s).unwrap()
    }

    fn mask(s: &str) -> EventMask {
        EventMask::parse(s).unwrap()
    }

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(
            &[
                PathError::Empty,
                PathError::EmptySegment("a..b".into()),
                PathError::InvalidSegment {
                    input: "a b".into(),
                    segment: "a b".into(),
                },
            ],
            "PATH_",
        );
    }

    #[test]
    fn parse_valid_paths() {
        let id = path("obs.ccd.frame");
        assert_eq!(id.as_str(), "obs.ccd.frame");
        assert_eq!(id.depth(), 3);
        assert_eq!(id.segments().collect::<Vec<_>>(), vec!["obs", "ccd", "frame"]);
        assert_eq!(path("single").depth(), 1);
    }

    #[test]
    fn parse_rejects_bad_paths() {
        assert_eq!(EventPath::parse(""), Err(PathError::Empty));
        assert!(matches!(
            EventPath::parse("a..b"),
            Err(PathError::EmptySegment(_))
        ));
        assert!(matches!(
            EventPath::parse(".a"),
            Err(PathError::EmptySegment(_))
        ));
        assert!(matches!(
            EventPath::parse("a.*"),
            Err(PathError::InvalidSegment { .. })
        ));
        assert!(matches!(
            EventPath::parse("a.b c"),
            Err(PathError::InvalidSegment { .. })
        ));
    }

    #[test]
    fn mask_rejects_partial_wildcards() {
        assert!(matches!(
            EventMask::parse("a.b*"),
            Err(PathError::InvalidSegment { .. })
        ));
        assert!(matches!(
            EventMask::parse("a.***"),
            Err(PathError::InvalidSegment { .. })
        ));
    }

    #[test]
    fn single_wildcard_matches_one_segment() {
        let m = mask("a.*");
        assert!(m.matches(&path("a.1")));
        assert!(m.matches(&path("a.b")));
        assert!(!m.matches(&path("a")));
        assert!(!m.matches(&path("a.1.2")));
        assert!(!m.matches(&path("b.1")));
    }

    #[test]
    fn double_wildcard_matches_any_depth() {
        let m = mask("a.**");
        assert!(m.matches(&path("a")));
        assert!(m.matches(&path("a.1")));
        assert!(m.matches(&path("a.1.2.3")));
        assert!(!m.matches(&path("b.1")));

        let mid = mask("a.**.z");
        assert!(mid.matches(&path("a.z")));
        assert!(mid.matches(&path("a.b.c.z")));
        assert!(!mid.matches(&path("a.b.c")));

        let runs = mask("**.**.z");
        assert!(runs.matches(&path("z")));
        assert!(runs.matches(&path("x.y.z")));
    }

    #[test]
    fn separated_double_wildcards() {
        let m = mask("**.x.**.y.**");
        assert!(m.matches(&path("x.y")));
        assert!(m.matches(&path("a.x.b.y.c")));
        assert!(m.matches(&path("x.x.y.y")));
        assert!(!m.matches(&path("y.x")));
        assert!(mask("**.*.z").matches(&path("q.z")));
        assert!(!mask("**.*.z").matches(&path("z")));
    }

    #[test]
    fn many_double_wildcards_stay_fast() {
        let m = mask("**.x.**.x.**.x.**.x.**.x.**.x.**.y");
        let deep = vec!["x"; 64].join(".");
        let started = std::time::Instant::now();
        assert!(!m.matches(&path(&deep)));
        assert!(m.matches(&path(&format!("{deep}.y"))));
        assert!(started.elapsed() < std::time::Duration::from_secs(1));
    }

    #[test]
    fn literal_and_exact_masks() {
        let m = mask("a.b");
        assert!(m.is_exact());
        assert!(m.matches(&path("a.b")));
        assert!(!m.matches(&path("a.b.c")));

        let exact = EventMask::exact(&path("x.y"));
        assert_eq!(exact, mask("x.y"));
        assert!(!mask("x.*").is_exact());
    }

    #[test]
    fn any_matches_everything() {
        let any = EventMask::any();
        assert_eq!(any.as_str(), "**");
        assert!(any.matches(&path("a")));
        assert!(any.matches(&path("a.b.c.d")));
    }

    #[test]
    fn prefix_operations() {
        let id = path("hub.a.1");
        let hub = path("hub");
        assert!(id.starts_with(&hub));
        assert!(!id.starts_with(&path("hu")));
        assert_eq!(id.strip_prefix(&hub), Some(path("a.1")));
        assert_eq!(hub.strip_prefix(&hub), None);
        assert_eq!(path("other.a").strip_prefix(&hub), None);
        assert_eq!(path("a.1").prefixed(&hub), id);
    }

    #[test]
    fn serde_uses_dotted_strings() {
        let id = path("obs.frame");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""obs.frame""#);
        let back: EventPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_str::<EventPath>(r#""a..b""#).is_err());

        let m: EventMask = serde_json::from_str(r#""obs.*""#).unwrap();
        assert!(m.matches(&path("obs.frame")));
    }
}
