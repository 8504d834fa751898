//! Path prefixes that middleware entries are scoped to.
//!
//! Matching is a literal string prefix test against the request url, not a
//! segment aware comparison: the prefix `/user` matches `/user`, `/users` and
//! `/user/1` alike.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A non-empty path prefix beginning with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathPrefix(String);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidPathPrefix {
    #[error("path prefix must not be empty")]
    Empty,
    #[error("path prefix '{0}' must start with '/'")]
    MissingLeadingSlash(String),
}

impl PathPrefix {
    /// Creates a prefix, rejecting empty strings and strings without a leading `/`.
    pub fn new(path: impl Into<String>) -> Result<Self, InvalidPathPrefix> {
        let path = path.into();
        if path.is_empty() {
            return Err(InvalidPathPrefix::Empty);
        }
        if !path.starts_with('/') {
            return Err(InvalidPathPrefix::MissingLeadingSlash(path));
        }
        Ok(Self(path))
    }

    /// The prefix used when a registration names no path, matching every url.
    pub fn root() -> Self {
        Self(String::from("/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if `url` starts with this prefix.
    #[inline]
    pub fn matches(&self, url: &str) -> bool {
        url.starts_with(self.0.as_str())
    }
}

impl Default for PathPrefix {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for PathPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PathPrefix {
    type Err = InvalidPathPrefix;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for PathPrefix {
    type Error = InvalidPathPrefix;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for PathPrefix {
    type Error = InvalidPathPrefix;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl AsRef<str> for PathPrefix {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::{InvalidPathPrefix, PathPrefix};

    #[test]
    fn test_rejects_invalid_prefix() {
        assert_eq!(PathPrefix::new(""), Err(InvalidPathPrefix::Empty));
        assert_eq!(PathPrefix::new("user"), Err(InvalidPathPrefix::MissingLeadingSlash("user".into())));
    }

    #[test]
    fn test_prefix_is_literal() {
        let api = PathPrefix::new("/api").unwrap();

        assert!(api.matches("/api"));
        assert!(api.matches("/api/"));
        assert!(api.matches("/api/v1"));
        assert!(api.matches("/apiextra"));
        assert!(api.matches("/api?x=1"));
        assert!(!api.matches("/ap"));
        assert!(!api.matches("/v1/api"));
    }

    #[test]
    fn test_root_matches_everything() {
        let root = PathPrefix::default();

        assert_eq!(root.as_str(), "/");
        assert!(root.matches("/"));
        assert!(root.matches("/anything/at/all"));
    }

    #[test]
    fn test_parse() {
        let prefix: PathPrefix = "/user".parse().unwrap();
        assert_eq!(prefix.to_string(), "/user");
        assert!("user".parse::<PathPrefix>().is_err());
    }
}
