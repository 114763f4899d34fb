//! Path pattern matching.
//!
//! # Responsibilities
//! - Parse route patterns (`/exact/path` or the `*` wildcard)
//! - Match a navigation path against a pattern
//!
//! # Design Decisions
//! - Exact patterns compare the whole string, case-sensitive
//! - No segment parameters, no prefix matching, no normalization
//! - `*` matches every string, including the empty one

use std::fmt;

use serde::{Serialize, Serializer};

/// Trait for matching navigation paths against a condition.
pub trait Matcher: Send + Sync + fmt::Debug {
    /// Returns true if the path matches this condition.
    fn matches(&self, path: &str) -> bool;
}

/// A compiled route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// Matches exactly one path.
    Exact(String),
    /// Matches any path.
    Wildcard,
}

impl PathPattern {
    pub const WILDCARD: &'static str = "*";

    /// Parse a pattern string. `*` is the wildcard, everything else is exact.
    pub fn parse(pattern: &str) -> Self {
        if pattern == Self::WILDCARD {
            PathPattern::Wildcard
        } else {
            PathPattern::Exact(pattern.to_string())
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, PathPattern::Wildcard)
    }

    pub fn as_str(&self) -> &str {
        match self {
            PathPattern::Exact(path) => path,
            PathPattern::Wildcard => Self::WILDCARD,
        }
    }
}

impl Matcher for PathPattern {
    fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Exact(expected) => expected == path,
            PathPattern::Wildcard => true,
        }
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PathPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
