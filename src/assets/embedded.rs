//! Compiled-in asset sources

/// How an embedded file is stored in the binary
#[derive(Debug, Clone, Copy)]
pub enum Source {
    /// Served verbatim
    Text(&'static str),
    /// Line-wrapped base64, decoded once at startup
    Base64(&'static str),
}

const MEDIA_TYPE_CSS: &str = "text/css; charset=utf-8";
const MEDIA_TYPE_JS: &str = "application/javascript; charset=utf-8";
const MEDIA_TYPE_ICO: &str = "image/x-icon";

/// An embedded file, the URL path it is served under and its declared type
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedAsset {
    pub path: &'static str,
    pub mime_type: &'static str,
    pub source: Source,
}

pub const BUILTIN: &[EmbeddedAsset] = &[
    EmbeddedAsset {
        path: "/css/style.css",
        mime_type: MEDIA_TYPE_CSS,
        source: Source::Text(include_str!("../../assets/style.css")),
    },
    EmbeddedAsset {
        path: "/js/main.js",
        mime_type: MEDIA_TYPE_JS,
        source: Source::Text(include_str!("../../assets/main.js")),
    },
    EmbeddedAsset {
        path: "/js/autoclose.js",
        mime_type: MEDIA_TYPE_JS,
        source: Source::Text(include_str!("../../assets/autoclose.js")),
    },
    EmbeddedAsset {
        path: "/favicon.ico",
        mime_type: MEDIA_TYPE_ICO,
        source: Source::Base64(include_str!("../../assets/favicon.ico.b64")),
    },
];
