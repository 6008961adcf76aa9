//! HTTP response building module
//!
//! Provides builders for the status code responses the asset server emits,
//! decoupled from the handlers that choose them.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{self, HeaderMap};
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};

use super::range::ByteRange;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Start a response builder carrying the given pre-set headers
fn builder_with(status: StatusCode, headers: HeaderMap) -> Builder {
    let mut builder = Response::builder().status(status);
    if let Some(map) = builder.headers_mut() {
        map.extend(headers);
    }
    builder
}

/// Build a plain-text error response (`text/plain`, `nosniff`)
fn build_text_error(status: StatusCode, message: &'static str) -> Builder {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, TEXT_PLAIN)
        .header(header::X_CONTENT_TYPE_OPTIONS, "nosniff")
        .header(header::CONTENT_LENGTH, message.len())
}

fn finish(builder: Builder, body: Bytes, label: &str) -> Response<Full<Bytes>> {
    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error(label, &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build 304 Not Modified response
///
/// Keeps validator and caching headers, drops the entity headers.
pub fn build_304_response(mut headers: HeaderMap) -> Response<Full<Bytes>> {
    headers.remove(header::CONTENT_TYPE);
    headers.remove(header::CONTENT_LENGTH);
    if headers.contains_key(header::ETAG) {
        headers.remove(header::LAST_MODIFIED);
    }
    finish(
        builder_with(StatusCode::NOT_MODIFIED, headers),
        Bytes::new(),
        "304",
    )
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    const BODY: &str = "404 Not Found\n";
    finish(
        build_text_error(StatusCode::NOT_FOUND, BODY),
        Bytes::from_static(BODY.as_bytes()),
        "404",
    )
}

/// Build 405 Method Not Allowed response, advertising the read-only methods
pub fn build_405_response() -> Response<Full<Bytes>> {
    const BODY: &str = "GET required\n";
    finish(
        build_text_error(StatusCode::METHOD_NOT_ALLOWED, BODY).header(header::ALLOW, "HEAD, GET"),
        Bytes::from_static(BODY.as_bytes()),
        "405",
    )
}

/// Build 412 Precondition Failed response
pub fn build_412_response() -> Response<Full<Bytes>> {
    const BODY: &str = "412 Precondition Failed\n";
    finish(
        build_text_error(StatusCode::PRECONDITION_FAILED, BODY),
        Bytes::from_static(BODY.as_bytes()),
        "412",
    )
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(total_size: usize) -> Response<Full<Bytes>> {
    const BODY: &str = "Range Not Satisfiable\n";
    finish(
        build_text_error(StatusCode::RANGE_NOT_SATISFIABLE, BODY)
            .header(header::CONTENT_RANGE, format!("bytes */{total_size}")),
        Bytes::from_static(BODY.as_bytes()),
        "416",
    )
}

/// Build 200 response carrying the whole content
pub fn build_full_response(
    headers: HeaderMap,
    data: Bytes,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    finish(
        builder_with(StatusCode::OK, headers)
            .header(header::ACCEPT_RANGES, "bytes")
            .header(header::CONTENT_LENGTH, content_length),
        body,
        "200",
    )
}

/// Build 206 Partial Content response
///
/// `data` is the already sliced range; `content_range` its header value.
pub fn build_partial_response(
    headers: HeaderMap,
    data: Bytes,
    content_range: String,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    finish(
        builder_with(StatusCode::PARTIAL_CONTENT, headers)
            .header(header::ACCEPT_RANGES, "bytes")
            .header(header::CONTENT_LENGTH, content_length)
            .header(header::CONTENT_RANGE, content_range),
        body,
        "206",
    )
}

/// Build 206 Partial Content response with a `multipart/byteranges` body
///
/// One part per range, each with its own `Content-Range` and the original
/// `Content-Type`.
pub fn build_multipart_response(
    mut headers: HeaderMap,
    content: &Bytes,
    ranges: &[ByteRange],
    boundary: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let part_type = headers.remove(header::CONTENT_TYPE);
    let total_size = content.len();

    let payload: usize = ranges.iter().map(ByteRange::len).sum();
    let mut body = Vec::with_capacity(payload + (ranges.len() + 1) * 128);
    for (i, range) in ranges.iter().enumerate() {
        if i > 0 {
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(b"Content-Range: ");
        body.extend_from_slice(range.content_range(total_size).as_bytes());
        body.extend_from_slice(b"\r\n");
        if let Some(part_type) = &part_type {
            body.extend_from_slice(b"Content-Type: ");
            body.extend_from_slice(part_type.as_bytes());
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(&content[range.start..=range.end]);
    }
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let content_length = body.len();
    let body = if is_head { Bytes::new() } else { Bytes::from(body) };

    finish(
        builder_with(StatusCode::PARTIAL_CONTENT, headers)
            .header(header::ACCEPT_RANGES, "bytes")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/byteranges; boundary={boundary}"),
            )
            .header(header::CONTENT_LENGTH, content_length),
        body,
        "206",
    )
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::header::HeaderValue;

    #[test]
    fn test_405_advertises_allowed_methods() {
        let resp = build_405_response();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()[header::ALLOW], "HEAD, GET");
        assert_eq!(resp.headers()[header::CONTENT_TYPE], TEXT_PLAIN);
    }

    #[test]
    fn test_304_strips_entity_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/css"));
        headers.insert(header::ETAG, HeaderValue::from_static("\"abc\""));
        headers.insert(
            header::LAST_MODIFIED,
            HeaderValue::from_static("Sun, 06 Nov 1994 08:49:37 GMT"),
        );
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=60"),
        );

        let resp = build_304_response(headers);
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
        assert!(resp.headers().get(header::CONTENT_TYPE).is_none());
        assert!(resp.headers().get(header::LAST_MODIFIED).is_none());
        assert_eq!(resp.headers()[header::ETAG], "\"abc\"");
        assert_eq!(resp.headers()[header::CACHE_CONTROL], "public, max-age=60");
    }

    #[test]
    fn test_full_response_head_has_length_but_no_body() {
        let resp = build_full_response(HeaderMap::new(), Bytes::from_static(b"abcdef"), true);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_LENGTH], "6");
        assert_eq!(resp.headers()[header::ACCEPT_RANGES], "bytes");
    }

    #[test]
    fn test_416_reports_total_size() {
        let resp = build_416_response(42);
        assert_eq!(resp.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        assert_eq!(resp.headers()[header::CONTENT_RANGE], "bytes */42");
    }

    #[tokio::test]
    async fn test_multipart_layout() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        let content = Bytes::from_static(b"0123456789");
        let ranges = [ByteRange { start: 0, end: 1 }, ByteRange { start: 7, end: 9 }];

        let resp = build_multipart_response(headers, &content, &ranges, "XYZ", false);
        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE],
            "multipart/byteranges; boundary=XYZ"
        );

        let expected = "--XYZ\r\nContent-Range: bytes 0-1/10\r\nContent-Type: text/plain\r\n\r\n01\r\n\
                        --XYZ\r\nContent-Range: bytes 7-9/10\r\nContent-Type: text/plain\r\n\r\n789\r\n\
                        --XYZ--\r\n";
        assert_eq!(
            resp.headers()[header::CONTENT_LENGTH],
            expected.len().to_string().as_str()
        );
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, expected);
    }
}
