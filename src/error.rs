//! Error types for the asset responder.

use hyper::header::InvalidHeaderValue;
use thiserror::Error;

/// Failures while building the asset set at startup
///
/// All of these point at a packaging defect, so the binary refuses to start.
#[derive(Error, Debug)]
pub enum AssetError {
    /// An embedded base64 payload could not be decoded
    #[error("embedded asset {path} is not valid base64: {source}")]
    Decode {
        path: String,
        #[source]
        source: base64::DecodeError,
    },

    /// Two assets claim the same URL path
    #[error("asset path registered twice: {0}")]
    DuplicatePath(String),

    /// A MIME type or validator cannot be sent as a header value
    #[error("asset {path} has an invalid header value: {source}")]
    InvalidHeader {
        path: String,
        #[source]
        source: InvalidHeaderValue,
    },
}
