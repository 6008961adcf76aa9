//! Static asset responder
//!
//! Serves exactly one registry entry: method check, cache headers, then the
//! conditional content primitive.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{self, HeaderMap, HeaderValue, InvalidHeaderValue};
use hyper::{Method, Request, Response};

use crate::assets::Asset;
use crate::error::AssetError;
use crate::http::{self, CachePolicy};

/// Request handler bound to one asset
#[derive(Debug, Clone)]
pub struct StaticResponder {
    asset: Asset,
    /// `Content-Type`, `Cache-Control` and `ETag`, computed once
    headers: HeaderMap,
}

impl StaticResponder {
    pub fn new(asset: Asset, policy: CachePolicy) -> Result<Self, AssetError> {
        let invalid = |source: InvalidHeaderValue| AssetError::InvalidHeader {
            path: asset.path().to_string(),
            source,
        };

        let mut headers = HeaderMap::with_capacity(3);
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_str(asset.mime_type()).map_err(invalid)?,
        );
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_str(&policy.to_header_value()).map_err(invalid)?,
        );
        headers.insert(
            header::ETAG,
            HeaderValue::from_str(asset.validator()).map_err(invalid)?,
        );

        Ok(Self { asset, headers })
    }

    /// Answer a request routed to this asset
    ///
    /// Only GET and HEAD are accepted. The asset has no modification time, so
    /// the `ETag` alone drives revalidation.
    pub fn handle<B>(&self, req: &Request<B>) -> Response<Full<Bytes>> {
        match req.method() {
            &Method::GET | &Method::HEAD => {
                http::serve_content(req, self.headers.clone(), None, self.asset.content())
            }
            _ => http::build_405_response(),
        }
    }
}
