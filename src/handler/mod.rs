//! Request handler module
//!
//! Path routing and the per-asset responders it dispatches to.

pub mod router;
pub mod static_asset;

// Re-export main entry points
pub use router::{handle_request, Router};
pub use static_asset::StaticResponder;
