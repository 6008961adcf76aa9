//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: exact path lookup, dispatch to the
//! asset responder and access logging.

use crate::assets::AssetRegistry;
use crate::config::AppState;
use crate::error::AssetError;
use crate::handler::static_asset::StaticResponder;
use crate::http::{self, CachePolicy};
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::{header, Request, Response};
use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Path table mapping each registered asset path to its responder
#[derive(Debug, Default)]
pub struct Router {
    routes: HashMap<String, StaticResponder>,
}

impl Router {
    /// Register one responder per asset
    pub fn new(registry: &AssetRegistry, policy: CachePolicy) -> Result<Self, AssetError> {
        let routes = registry
            .iter()
            .map(|asset| -> Result<(String, StaticResponder), AssetError> {
                let responder = StaticResponder::new(asset.clone(), policy)?;
                Ok((asset.path().to_string(), responder))
            })
            .collect::<Result<HashMap<_, _>, AssetError>>()?;

        Ok(Self { routes })
    }

    pub fn responder(&self, path: &str) -> Option<&StaticResponder> {
        self.routes.get(path)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Dispatch by exact path; unknown paths get 404
    pub fn route<B>(&self, req: &Request<B>) -> Response<Full<Bytes>> {
        self.responder(req.uri().path()).map_or_else(
            http::build_404_response,
            |responder| responder.handle(req),
        )
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let response = state.router.route(&req);

    if state.config.logging.access_log {
        let entry = access_entry(&req, &response, peer_addr, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Collect the access log fields for a finished request
fn access_entry<B>(
    req: &Request<B>,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let header_value = |name: header::HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let uri = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.uri().path().to_string(), ToString::to_string);

    let mut entry = AccessLogEntry::new(peer_addr.ip().to_string(), req.method().to_string(), uri);
    entry.http_version = version_label(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.referer = header_value(header::REFERER);
    entry.user_agent = header_value(header::USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

fn version_label(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::http::etag_for;
    use http_body_util::BodyExt;
    use hyper::{Method, StatusCode};

    const FAVICON_ETAG: &str = "\"g+LhtGFxzptZ+vNUx6CFjFN8veU=\"";

    fn router() -> Router {
        let registry = AssetRegistry::builtin().unwrap();
        Router::new(&registry, CachePolicy::Public(3600)).unwrap()
    }

    fn request(method: Method, path: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(path)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    async fn body_of(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[test]
    fn test_every_asset_is_routed() {
        let registry = AssetRegistry::builtin().unwrap();
        let router = Router::new(&registry, CachePolicy::default()).unwrap();
        assert_eq!(router.len(), registry.len());
        for asset in &registry {
            assert!(router.responder(asset.path()).is_some());
        }
    }

    #[tokio::test]
    async fn test_get_empty_stylesheet() {
        let resp = router().route(&request(Method::GET, "/css/style.css"));
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/css; charset=utf-8");
        assert_eq!(resp.headers()[header::CACHE_CONTROL], "public, max-age=3600");
        assert_eq!(resp.headers()[header::ETAG], etag_for(b"").as_str());
        assert_eq!(resp.headers()[header::CONTENT_LENGTH], "0");
        assert!(body_of(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_get_favicon() {
        let resp = router().route(&request(Method::GET, "/favicon.ico"));
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "image/x-icon");
        assert_eq!(resp.headers()[header::ETAG], FAVICON_ETAG);
        assert_eq!(body_of(resp).await.len(), 13094);
    }

    #[tokio::test]
    async fn test_head_favicon() {
        let router = router();
        let get = router.route(&request(Method::GET, "/favicon.ico"));
        let head = router.route(&request(Method::HEAD, "/favicon.ico"));

        assert_eq!(head.status(), StatusCode::OK);
        assert_eq!(head.headers(), get.headers());
        assert_eq!(head.headers()[header::CONTENT_LENGTH], "13094");
        assert!(body_of(head).await.is_empty());
    }

    #[tokio::test]
    async fn test_post_script_not_allowed() {
        let resp = router().route(&request(Method::POST, "/js/main.js"));
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()[header::ALLOW], "HEAD, GET");
        assert!(resp.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
    }

    #[tokio::test]
    async fn test_favicon_revalidation() {
        let req = Request::builder()
            .uri("/favicon.ico")
            .header(header::IF_NONE_MATCH, FAVICON_ETAG)
            .body(Full::new(Bytes::new()))
            .unwrap();
        let resp = router().route(&req);

        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(resp.headers()[header::ETAG], FAVICON_ETAG);
        assert!(body_of(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_favicon_head_revalidation() {
        let req = Request::builder()
            .method(Method::HEAD)
            .uri("/favicon.ico")
            .header(header::IF_NONE_MATCH, FAVICON_ETAG)
            .body(Full::new(Bytes::new()))
            .unwrap();
        let resp = router().route(&req);

        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(resp.headers()[header::ETAG], FAVICON_ETAG);
        assert!(resp.headers().get(header::CONTENT_TYPE).is_none());
        assert!(body_of(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_favicon_multiple_ranges() {
        let req = Request::builder()
            .uri("/favicon.ico")
            .header(header::RANGE, "bytes=0-1,4-5")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let resp = router().route(&req);

        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(resp.headers()[header::ETAG], FAVICON_ETAG);
        let content_type = resp.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
        let boundary = content_type
            .strip_prefix("multipart/byteranges; boundary=")
            .unwrap()
            .to_string();
        let content_length: usize = resp.headers()[header::CONTENT_LENGTH]
            .to_str()
            .unwrap()
            .parse()
            .unwrap();

        let body = body_of(resp).await;
        assert_eq!(body.len(), content_length);

        let mut expected = Vec::new();
        expected.extend_from_slice(
            format!("--{boundary}\r\nContent-Range: bytes 0-1/13094\r\nContent-Type: image/x-icon\r\n\r\n")
                .as_bytes(),
        );
        expected.extend_from_slice(&[0, 0]);
        expected.extend_from_slice(
            format!("\r\n--{boundary}\r\nContent-Range: bytes 4-5/13094\r\nContent-Type: image/x-icon\r\n\r\n")
                .as_bytes(),
        );
        expected.extend_from_slice(&[4, 0]);
        expected.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
        assert_eq!(&body[..], &expected[..]);
    }

    #[tokio::test]
    async fn test_stale_validator_gets_full_body() {
        let req = Request::builder()
            .uri("/js/autoclose.js")
            .header(header::IF_NONE_MATCH, etag_for(b"old build"))
            .body(Full::new(Bytes::new()))
            .unwrap();
        let resp = router().route(&req);

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body_of(resp).await,
            "window.addEventListener('load', window.close);\n"
        );
    }

    #[tokio::test]
    async fn test_favicon_byte_range() {
        let req = Request::builder()
            .uri("/favicon.ico")
            .header(header::RANGE, "bytes=0-5")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let resp = router().route(&req);

        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(resp.headers()[header::CONTENT_RANGE], "bytes 0-5/13094");
        assert_eq!(&body_of(resp).await[..], &[0, 0, 1, 0, 4, 0]);
    }

    #[tokio::test]
    async fn test_range_past_end() {
        let req = Request::builder()
            .uri("/favicon.ico")
            .header(header::RANGE, "bytes=20000-")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let resp = router().route(&req);
        assert_eq!(resp.status(), StatusCode::RANGE_NOT_SATISFIABLE);
    }

    #[tokio::test]
    async fn test_if_match_mismatch() {
        let req = Request::builder()
            .uri("/favicon.ico")
            .header(header::IF_MATCH, "\"something-else\"")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let resp = router().route(&req);
        assert_eq!(resp.status(), StatusCode::PRECONDITION_FAILED);
    }

    #[tokio::test]
    async fn test_unknown_path() {
        let resp = router().route(&request(Method::GET, "/css/missing.css"));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_handle_request_uses_state() {
        let mut config = Config::load_from("does-not-exist/asset-responder").unwrap();
        config.logging.access_log = false;
        config.http.cache_max_age = 120;
        let registry = AssetRegistry::builtin().unwrap();
        let state = Arc::new(AppState::new(config, &registry).unwrap());

        let resp = handle_request(
            request(Method::GET, "/js/main.js"),
            state,
            "127.0.0.1:4000".parse().unwrap(),
        )
        .await
        .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CACHE_CONTROL], "public, max-age=120");
    }

    #[test]
    fn test_access_entry_fields() {
        let req = Request::builder()
            .method(Method::HEAD)
            .uri("/favicon.ico?v=3")
            .header(header::USER_AGENT, "curl/8.0")
            .body(())
            .unwrap();
        let resp = router().route(&req);
        let entry = access_entry(&req, &resp, "10.0.0.7:5555".parse().unwrap(), Instant::now());

        assert_eq!(entry.remote_addr, "10.0.0.7");
        assert_eq!(entry.method, "HEAD");
        assert_eq!(entry.uri, "/favicon.ico?v=3");
        assert_eq!(entry.status, 200);
        assert_eq!(entry.body_bytes, 0);
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.0"));
        assert!(entry.referer.is_none());
    }
}
