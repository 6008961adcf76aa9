//! Conditional content serving
//!
//! `serve_content` answers a GET/HEAD for an in-memory body once the caller
//! has chosen its headers. It evaluates the precondition headers against the
//! `ETag` the caller set and the optional modification time, then produces a
//! 200, 206 (single part or `multipart/byteranges`), 304, 412 or 416 response.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{self, HeaderMap, HeaderValue};
use hyper::{Method, Request, Response};
use sha1::{Digest, Sha1};

use super::cache::{self, check_etag_match, check_if_match, parse_http_date};
use super::range::{parse_range_header, ByteRange, RangeParseResult};
use super::response;

/// Outcome of evaluating the request preconditions
#[derive(Debug, PartialEq, Eq)]
enum Precondition {
    Proceed,
    NotModified,
    Failed,
}

fn header_str<'a>(headers: &'a HeaderMap, name: &header::HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn is_get_or_head(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD
}

/// Serve `content` for `req`, honoring conditional and range headers
///
/// `headers` are the response headers already chosen by the caller (content
/// type, cache control, `ETag`). When `modified` is `None` only the `ETag`
/// takes part in validation and no `Last-Modified` is sent.
pub fn serve_content<B>(
    req: &Request<B>,
    mut headers: HeaderMap,
    modified: Option<DateTime<Utc>>,
    content: &Bytes,
) -> Response<Full<Bytes>> {
    let etag = header_str(&headers, &header::ETAG).map(str::to_owned);

    if let Some(modified) = modified {
        if let Ok(value) = HeaderValue::from_str(&cache::format_http_date(&modified)) {
            headers.insert(header::LAST_MODIFIED, value);
        }
    }

    match check_preconditions(req, etag.as_deref(), modified) {
        Precondition::Failed => return response::build_412_response(),
        Precondition::NotModified => return response::build_304_response(headers),
        Precondition::Proceed => {}
    }

    let is_head = req.method() == Method::HEAD;
    let total_size = content.len();

    let range_header = if if_range_allows(req.headers(), etag.as_deref(), modified) {
        header_str(req.headers(), &header::RANGE)
    } else {
        None
    };

    match parse_range_header(range_header, total_size) {
        // Overlapping ranges that ask for more than the whole body are not
        // worth splitting up
        RangeParseResult::Valid(ranges)
            if ranges.iter().map(ByteRange::len).sum::<usize>() <= total_size =>
        {
            if let [range] = ranges.as_slice() {
                response::build_partial_response(
                    headers,
                    content.slice(range.start..=range.end),
                    range.content_range(total_size),
                    is_head,
                )
            } else {
                let boundary = multipart_boundary(content);
                response::build_multipart_response(headers, content, &ranges, &boundary, is_head)
            }
        }
        RangeParseResult::NotSatisfiable => response::build_416_response(total_size),
        RangeParseResult::Valid(_) | RangeParseResult::None => {
            response::build_full_response(headers, content.clone(), is_head)
        }
    }
}

/// Multipart boundary derived from the content digest
fn multipart_boundary(content: &[u8]) -> String {
    Sha1::digest(content)
        .iter()
        .fold(String::with_capacity(40), |mut boundary, byte| {
            let _ = write!(boundary, "{byte:02x}");
            boundary
        })
}

/// Evaluate `If-Match`, `If-Unmodified-Since`, `If-None-Match` and
/// `If-Modified-Since` in RFC 7232 section 6 order
fn check_preconditions<B>(
    req: &Request<B>,
    etag: Option<&str>,
    modified: Option<DateTime<Utc>>,
) -> Precondition {
    let headers = req.headers();

    if let Some(if_match) = header_str(headers, &header::IF_MATCH) {
        if !check_if_match(if_match, etag) {
            return Precondition::Failed;
        }
    } else if let (Some(since), Some(modified)) = (
        header_str(headers, &header::IF_UNMODIFIED_SINCE).and_then(parse_http_date),
        modified,
    ) {
        if modified.timestamp() > since.timestamp() {
            return Precondition::Failed;
        }
    }

    if let Some(if_none_match) = header_str(headers, &header::IF_NONE_MATCH) {
        let matched = if if_none_match.trim() == "*" {
            true
        } else {
            etag.is_some_and(|etag| check_etag_match(Some(if_none_match), etag))
        };
        if matched {
            return if is_get_or_head(req.method()) {
                Precondition::NotModified
            } else {
                Precondition::Failed
            };
        }
    } else if is_get_or_head(req.method()) {
        if let (Some(since), Some(modified)) = (
            header_str(headers, &header::IF_MODIFIED_SINCE).and_then(parse_http_date),
            modified,
        ) {
            if modified.timestamp() <= since.timestamp() {
                return Precondition::NotModified;
            }
        }
    }

    Precondition::Proceed
}

/// Whether the `Range` header may be honored given `If-Range`
///
/// An entity-tag `If-Range` needs a strong match; a date needs an exact match
/// with the modification time. Without `If-Range` the range always applies.
fn if_range_allows(headers: &HeaderMap, etag: Option<&str>, modified: Option<DateTime<Utc>>) -> bool {
    let Some(if_range) = header_str(headers, &header::IF_RANGE).map(str::trim) else {
        return true;
    };

    if if_range.starts_with('"') || if_range.starts_with("W/") {
        return etag.is_some_and(|etag| cache::strong_match(if_range, etag));
    }

    match (parse_http_date(if_range), modified) {
        (Some(date), Some(modified)) => date.timestamp() == modified.timestamp(),
        _ => false,
    }
}
