//! # Route derivation
//!
//! Computes a structured [`Route`] from the ambient location: path segments
//! followed by hash segments, plus a query mapping taken from the search
//! string or, failing that, from a query embedded after the hash fragment.
//! Supports path-based and hash-based routing simultaneously.
//!
//! Derivation never fails. Segment extraction always produces a (possibly
//! empty) sequence and any query parse failure degrades to an absent
//! mapping; logging is the only side effect.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::location::LocationSource;

/// Query mapping. Insertion-ordered so that a route serialized into the
/// state compares deterministically. A key that appeared without `=` maps to
/// `None`.
pub type QueryMap = IndexMap<String, Option<String>>;

/// Structured representation of the current navigation location.
///
/// `query_string` is `None` when no query was present or parseable, which
/// callers must treat as distinct from an empty mapping. Serialization
/// mirrors that distinction by omitting the field entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Path segments followed by hash segments, in order.
    pub segments: Vec<String>,

    /// The query mapping, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_string: Option<QueryMap>,
}

impl Route {
    /// Look up a query value. The outer `Option` distinguishes a missing key
    /// from a key that was present without a value.
    #[must_use]
    pub fn query(&self, key: &str) -> Option<Option<&str>> {
        self.query_string
            .as_ref()?
            .get(key)
            .map(|value| value.as_deref())
    }
}

/// Derive the current route from the ambient location.
///
/// Reads only `path()`, `hash()` and `search()`; the route is recomputed in
/// full on every call, never partially updated.
#[must_use]
pub fn derive_route(location: &dyn LocationSource) -> Route {
    let path = location.path();
    let hash = location.hash();

    let mut segments: Vec<String> = path.split('/').map(str::to_string).collect();
    // A trailing slash contributes exactly one empty segment; drop it. For
    // an empty path this leaves no segments at all.
    if segments.last().is_some_and(String::is_empty) {
        segments.pop();
    }

    let (hash_route, hash_query) = split_hash(&hash);
    segments.extend(hash_segments(hash_route));

    let query_string = parse_query(&location.search()).or_else(|| parse_query(hash_query));

    trace!(
        segments = segments.len(),
        has_query = query_string.is_some(),
        "derived route"
    );

    Route {
        segments,
        query_string,
    }
}

/// Split a raw hash into its routing text and an embedded query candidate
/// (still carrying its leading `?`).
fn split_hash(hash: &str) -> (&str, &str) {
    match hash.find('?') {
        Some(i) => (&hash[..i], &hash[i..]),
        None => (hash, ""),
    }
}

/// Segments contributed by the hash fragment. A `#/` or `#` marker is
/// stripped first; an empty remainder contributes zero segments rather than
/// a single empty one.
fn hash_segments(hash_route: &str) -> Vec<String> {
    let trimmed = hash_route
        .strip_prefix("#/")
        .or_else(|| hash_route.strip_prefix('#'))
        .unwrap_or(hash_route);

    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split('/').map(str::to_string).collect()
}

/// Parse a raw query text of the form `?a=1&b=2`.
///
/// Tokens are the non-empty substrings between `?`/`&` delimiters; text
/// before the first delimiter is ignored. Each token splits at its first
/// `=`; a token without one keeps an absent value. Duplicate keys fold
/// last-wins. Text with no delimiter at all, or yielding no tokens, produces
/// `None`.
fn parse_query(raw: &str) -> Option<QueryMap> {
    let start = raw.find(['?', '&'])?;

    let mut map = QueryMap::new();
    for token in raw[start + 1..].split(['?', '&']) {
        if token.is_empty() {
            continue;
        }
        match token.split_once('=') {
            Some((key, value)) => map.insert(key.to_string(), Some(value.to_string())),
            None => map.insert(token.to_string(), None),
        };
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}
