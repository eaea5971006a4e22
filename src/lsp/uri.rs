//! Document URIs
//!
//! A small RFC 3986 splitter: scheme, optional authority, path, query and
//! fragment. Parsing is purely syntactic; no percent-decoding is performed, so
//! `Display` reproduces the parsed text exactly.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static URI_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*):(?://([^/?#]*))?([^?#]*)(?:\?([^#]*))?(?:#(.*))?$")
        .expect("Failed to compile URI pattern")
});

/// Reasons a string is not a usable URI
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UriError {
    #[error("empty URI")]
    Empty,

    #[error("URI contains whitespace: '{0}'")]
    Whitespace(String),

    #[error("malformed URI (missing scheme?): '{0}'")]
    Malformed(String),
}

/// A parsed `scheme:[//authority]path[?query][#fragment]` URI
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentUri {
    scheme: String,
    authority: Option<String>,
    path: String,
    query: Option<String>,
    fragment: Option<String>,
}

impl DocumentUri {
    /// Parse a URI string
    pub fn parse(text: &str) -> Result<Self, UriError> {
        if text.is_empty() {
            return Err(UriError::Empty);
        }
        if text.chars().any(char::is_whitespace) {
            return Err(UriError::Whitespace(text.to_string()));
        }

        let caps = URI_PATTERN
            .captures(text)
            .ok_or_else(|| UriError::Malformed(text.to_string()))?;

        let group = |i: usize| caps.get(i).map(|m| m.as_str().to_string());

        Ok(Self {
            scheme: group(1).unwrap_or_default(),
            authority: group(2),
            path: group(3).unwrap_or_default(),
            query: group(4),
            fragment: group(5),
        })
    }

    /// Build a `file://` URI from an absolute path
    pub fn from_file_path(path: &str) -> Result<Self, UriError> {
        if path.starts_with('/') {
            Self::parse(&format!("file://{path}"))
        } else {
            Self::parse(&format!("file:///{path}"))
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Authority component; `Some("")` for `file:///x`, `None` for `untitled:x`
    pub fn authority(&self) -> Option<&str> {
        self.authority.as_deref()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    pub fn is_file(&self) -> bool {
        self.scheme.eq_ignore_ascii_case("file")
    }
}

impl fmt::Display for DocumentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.scheme)?;
        if let Some(authority) = &self.authority {
            write!(f, "//{authority}")?;
        }
        f.write_str(&self.path)?;
        if let Some(query) = &self.query {
            write!(f, "?{query}")?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

impl FromStr for DocumentUri {
    type Err = UriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for DocumentUri {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DocumentUri {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
