//! sc-storage - namespaced, versioned key/value storage for the browser
//!
//! Core modules:
//! - `persistence`: Keyed store with a versioned, expiring JSON envelope
//! - `globals`: In-memory namespaced registry
//! - `platform`: Storage area / cookie backends (browser and in-memory)
//! - `config`: Store configuration and the merge-by-known-keys setter
//! - `error`: Error type

pub mod config;
pub mod error;
pub mod globals;
pub mod persistence;
pub mod platform;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use config::Config;
pub use error::{Result, StoreError};
pub use globals::GlobalRegistry;
pub use persistence::{Store, StoredRecord, parse_valid_until};
pub use platform::{
    Backends, Clock, CookieJar, MemoryArea, MemoryCookieJar, StorageArea, SystemClock,
};
