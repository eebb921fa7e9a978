//! Request handler module
//!
//! Routing, customer resolution and the account endpoints of the ledger API.

pub mod accounts;
pub mod middleware;
pub mod router;
mod types;

// Re-export main entry point
pub use router::handle_request;
