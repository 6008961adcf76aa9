//! Logger module
//!
//! Provides logging utilities for the asset server:
//! - Startup logging (listener, asset set)
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based sinks

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::assets::AssetRegistry;
use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the log sinks from configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

fn write_info(message: &str) {
    match writer::get() {
        Some(writer) => writer.write_access(message),
        None => println!("{message}"),
    }
}

fn write_error(message: &str) {
    match writer::get() {
        Some(writer) => writer.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Asset server started");
    write_info(&format!("Listening on: http://{addr}"));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    write_info(&format!(
        "Cache-Control: {}",
        config.http.cache_policy().to_header_value()
    ));
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================\n");
}

/// Log the asset set once it has been built
pub fn log_registry_loaded(registry: &AssetRegistry) {
    write_info(&format!(
        "[Assets] {} assets, {} bytes",
        registry.len(),
        registry.total_bytes()
    ));
    for asset in registry {
        write_info(&format!(
            "  {} ({}, {} bytes, etag {})",
            asset.path(),
            asset.mime_type(),
            asset.content().len(),
            asset.validator()
        ));
    }
}

pub fn log_shutdown() {
    write_info("[Shutdown] Signal received, no longer accepting connections");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}
