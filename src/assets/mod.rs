//! Asset registry
//!
//! The fixed set of resources served by the responder, built once at startup
//! from files compiled into the binary. The registry is immutable after
//! construction and is handed to the router explicitly.

mod embedded;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hyper::body::Bytes;
use std::collections::HashSet;

use crate::error::AssetError;
use crate::http::{etag_for, mime};

pub use embedded::{EmbeddedAsset, Source};

/// One static resource
///
/// The validator is derived from the content on construction and cannot be
/// set independently.
#[derive(Debug, Clone)]
pub struct Asset {
    path: String,
    mime_type: &'static str,
    validator: String,
    content: Bytes,
}

impl Asset {
    /// Create an asset whose MIME type follows the path extension
    pub fn new(path: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let path = path.into();
        let mime_type = mime::content_type_for_path(&path);
        Self::with_mime_type(path, mime_type, content)
    }

    /// Create an asset with an explicitly declared MIME type
    pub fn with_mime_type(
        path: impl Into<String>,
        mime_type: &'static str,
        content: impl Into<Bytes>,
    ) -> Self {
        let content = content.into();
        Self {
            path: path.into(),
            mime_type,
            validator: etag_for(&content),
            content,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub const fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    /// Quoted strong `ETag` for the content
    pub fn validator(&self) -> &str {
        &self.validator
    }

    /// Shared handle to the bytes; cloning does not copy them
    pub const fn content(&self) -> &Bytes {
        &self.content
    }
}

/// Ordered, read-only collection of assets with unique paths
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    assets: Vec<Asset>,
}

impl AssetRegistry {
    /// Build the registry of assets compiled into the binary
    pub fn builtin() -> Result<Self, AssetError> {
        Self::from_embedded(embedded::BUILTIN)
    }

    /// Build a registry from embedded sources, decoding base64 payloads
    pub fn from_embedded(sources: &[EmbeddedAsset]) -> Result<Self, AssetError> {
        let assets = sources
            .iter()
            .map(|embedded| -> Result<Asset, AssetError> {
                let content = match embedded.source {
                    Source::Text(text) => Bytes::from_static(text.as_bytes()),
                    Source::Base64(encoded) => decode_wrapped_base64(encoded)
                        .map(Bytes::from)
                        .map_err(|source| AssetError::Decode {
                            path: embedded.path.to_string(),
                            source,
                        })?,
                };
                Ok(Asset::with_mime_type(embedded.path, embedded.mime_type, content))
            })
            .collect::<Result<Vec<_>, AssetError>>()?;

        Self::from_assets(assets)
    }

    /// Build a registry from ready assets, rejecting duplicate paths
    pub fn from_assets(assets: Vec<Asset>) -> Result<Self, AssetError> {
        let mut seen = HashSet::with_capacity(assets.len());
        for asset in &assets {
            if !seen.insert(asset.path()) {
                return Err(AssetError::DuplicatePath(asset.path().to_string()));
            }
        }
        Ok(Self { assets })
    }

    pub fn get(&self, path: &str) -> Option<&Asset> {
        self.assets.iter().find(|asset| asset.path() == path)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Asset> {
        self.assets.iter()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Total number of content bytes held by the registry
    pub fn total_bytes(&self) -> usize {
        self.assets.iter().map(|asset| asset.content().len()).sum()
    }
}

impl<'a> IntoIterator for &'a AssetRegistry {
    type Item = &'a Asset;
    type IntoIter = std::slice::Iter<'a, Asset>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Decode base64 text that may be wrapped across lines or indented
///
/// Spaces, tabs, carriage returns and newlines are dropped before decoding
/// with the standard alphabet.
pub fn decode_wrapped_base64(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: String = text
        .chars()
        .filter(|c| !matches!(c, ' ' | '\t' | '\r' | '\n'))
        .collect();
    STANDARD.decode(compact)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAVICON_SIZE: usize = 13094;
    const FAVICON_ETAG: &str = "\"g+LhtGFxzptZ+vNUx6CFjFN8veU=\"";

    #[test]
    fn test_builtin_registry_order_and_types() {
        let registry = AssetRegistry::builtin().unwrap();
        let paths: Vec<&str> = registry.iter().map(Asset::path).collect();
        assert_eq!(
            paths,
            ["/css/style.css", "/js/main.js", "/js/autoclose.js", "/favicon.ico"]
        );

        assert_eq!(
            registry.get("/css/style.css").unwrap().mime_type(),
            "text/css; charset=utf-8"
        );
        assert_eq!(
            registry.get("/js/autoclose.js").unwrap().mime_type(),
            "application/javascript; charset=utf-8"
        );
        assert_eq!(
            registry.get("/favicon.ico").unwrap().mime_type(),
            "image/x-icon"
        );
        assert!(registry.get("/missing.css").is_none());
    }

    #[test]
    fn test_validators_follow_content() {
        let registry = AssetRegistry::builtin().unwrap();
        for asset in &registry {
            assert_eq!(asset.validator(), etag_for(asset.content()));
        }

        // Both empty files share a validator
        let css = registry.get("/css/style.css").unwrap();
        let js = registry.get("/js/main.js").unwrap();
        assert!(css.content().is_empty());
        assert_eq!(css.validator(), js.validator());
        assert_eq!(css.validator(), etag_for(b""));
    }

    #[test]
    fn test_autoclose_script_content() {
        let registry = AssetRegistry::builtin().unwrap();
        let asset = registry.get("/js/autoclose.js").unwrap();
        assert_eq!(
            &asset.content()[..],
            b"window.addEventListener('load', window.close);\n"
        );
    }

    #[test]
    fn test_favicon_decodes_to_known_payload() {
        let registry = AssetRegistry::builtin().unwrap();
        let favicon = registry.get("/favicon.ico").unwrap();
        assert_eq!(favicon.content().len(), FAVICON_SIZE);
        // ICO header: reserved 0, type 1, four images
        assert_eq!(&favicon.content()[..6], &[0, 0, 1, 0, 4, 0]);
        assert_eq!(favicon.validator(), FAVICON_ETAG);
    }

    #[test]
    fn test_decode_wrapped_base64() {
        assert_eq!(
            decode_wrapped_base64("  aGVs\n\tbG8g\r\nd29y bGQ=\n").unwrap(),
            b"hello world"
        );
        assert_eq!(decode_wrapped_base64("").unwrap(), b"");
    }

    #[test]
    fn test_malformed_payload_fails_startup() {
        let sources = [EmbeddedAsset {
            path: "/broken.ico",
            mime_type: "image/x-icon",
            source: Source::Base64("not*base64"),
        }];
        match AssetRegistry::from_embedded(&sources) {
            Err(AssetError::Decode { path, .. }) => assert_eq!(path, "/broken.ico"),
            other => panic!("Expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_embedded_mime_type_is_declared() {
        let sources = [EmbeddedAsset {
            path: "/feed",
            mime_type: "application/atom+xml",
            source: Source::Text("<feed/>"),
        }];
        let registry = AssetRegistry::from_embedded(&sources).unwrap();
        let feed = registry.get("/feed").unwrap();
        assert_eq!(feed.mime_type(), "application/atom+xml");
        assert_eq!(&feed.content()[..], b"<feed/>");
    }

    #[test]
    fn test_duplicate_paths_rejected() {
        let assets = vec![Asset::new("/a.css", "x"), Asset::new("/a.css", "y")];
        assert!(matches!(
            AssetRegistry::from_assets(assets),
            Err(AssetError::DuplicatePath(path)) if path == "/a.css"
        ));
    }

    #[test]
    fn test_total_bytes() {
        let registry = AssetRegistry::builtin().unwrap();
        assert_eq!(registry.total_bytes(), FAVICON_SIZE + 47);
    }
}
