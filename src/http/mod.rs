//! HTTP protocol layer module
//!
//! Validators, range parsing, MIME detection, response builders and the
//! conditional content primitive. Nothing here knows about the asset set.

pub mod cache;
pub mod content;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used items
pub use cache::{etag_for, CachePolicy};
pub use content::serve_content;
pub use response::{build_404_response, build_405_response};
