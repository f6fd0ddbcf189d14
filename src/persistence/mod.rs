//! Keyed persistence over the platform backends
//!
//! Features:
//! - Versioned JSON envelope
//! - Expiry checked on every read
//! - Outdated/expired records purged on read

pub mod envelope;
pub mod store;

pub use envelope::{Freshness, StoredRecord, parse_valid_until};
pub use store::Store;
