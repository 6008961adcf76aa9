//! HTTP cache control module
//!
//! Provides content-addressed `ETag` generation, entity-tag comparison and
//! HTTP-date handling for conditional requests.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sha1::{Digest, Sha1};

/// Generate a strong `ETag` for the given content
///
/// SHA-1 digest of the bytes, base64 encoded and wrapped in double quotes.
///
/// # Examples
/// ```
/// use asset_responder::http::cache::etag_for;
/// assert_eq!(etag_for(b""), "\"2jmj7l5rSw0yVb/vlWAYkK/YBwk=\"");
/// ```
pub fn etag_for(content: &[u8]) -> String {
    let digest = Sha1::digest(content);
    format!("\"{}\"", STANDARD.encode(digest))
}

/// Split a comma separated list of entity tags
fn entity_tags(header: &str) -> impl Iterator<Item = &str> {
    header.split(',').map(str::trim).filter(|t| !t.is_empty())
}

fn is_weak(tag: &str) -> bool {
    tag.starts_with("W/")
}

/// Strong comparison (RFC 7232 2.3.2): both tags strong and byte-equal
pub fn strong_match(a: &str, b: &str) -> bool {
    !is_weak(a) && !is_weak(b) && a == b
}

/// Weak comparison: opaque tags equal, ignoring the `W/` prefix
pub fn weak_match(a: &str, b: &str) -> bool {
    a.trim_start_matches("W/") == b.trim_start_matches("W/")
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Supports:
/// - Single `ETag`: `"abc123"`
/// - Multiple `ETags`: `"abc123", "def456"`
/// - Weak validators: `W/"abc123"`
/// - Wildcard: `*`
///
/// Returns true if matched (GET/HEAD should answer 304).
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|header| {
        header.trim() == "*" || entity_tags(header).any(|tag| weak_match(tag, etag))
    })
}

/// Check an `If-Match` header against the server's `ETag`
///
/// Uses strong comparison. Returns false when the header lists no matching
/// tag, which means the request must fail with 412.
pub fn check_if_match(if_match: &str, etag: Option<&str>) -> bool {
    if if_match.trim() == "*" {
        return true;
    }
    etag.is_some_and(|etag| entity_tags(if_match).any(|tag| strong_match(tag, etag)))
}

/// Format a timestamp as an IMF-fixdate (`Sun, 06 Nov 1994 08:49:37 GMT`)
pub fn format_http_date(time: &DateTime<Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parse an HTTP-date header value
///
/// Returns None for anything that is not a valid RFC 2822 style date.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Cache-Control directive kind, as written in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheVisibility {
    Public,
    Private,
    NoCache,
    NoStore,
}

/// Cache control policy applied to served assets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Public cache with specified max-age (seconds)
    Public(u32),
    /// Private cache (browser cache only)
    Private(u32),
    /// Revalidate on every use
    NoCache,
    /// No store
    NoStore,
}

impl CachePolicy {
    pub const fn new(visibility: CacheVisibility, max_age: u32) -> Self {
        match visibility {
            CacheVisibility::Public => Self::Public(max_age),
            CacheVisibility::Private => Self::Private(max_age),
            CacheVisibility::NoCache => Self::NoCache,
            CacheVisibility::NoStore => Self::NoStore,
        }
    }

    /// Convert to Cache-Control header value
    pub fn to_header_value(self) -> String {
        match self {
            Self::Public(max_age) => format!("public, max-age={max_age}"),
            Self::Private(max_age) => format!("private, max-age={max_age}"),
            Self::NoCache => "no-cache".to_string(),
            Self::NoStore => "no-store".to_string(),
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::Public(3600) // 1 hour
    }
}
