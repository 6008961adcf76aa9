//! Asset responder
//!
//! Serves a fixed set of compiled-in static assets (stylesheet, scripts, icon)
//! over HTTP/1.1 with content-addressed `ETag`s, conditional requests and
//! byte ranges.

pub mod assets;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
