//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage areas (LocalStorage / SessionStorage on web, in-memory natively)
//! - Cookies (`document.cookie` on web, in-memory natively)
//! - Wall-clock time

pub mod cookie;
pub mod memory;
#[cfg(target_arch = "wasm32")]
pub mod web;

use chrono::{DateTime, Utc};

use crate::error::Result;

pub use memory::{MemoryArea, MemoryCookieJar};

/// A string key/value table with the shape of the Web Storage API
pub trait StorageArea {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// Cookie read/write/delete, used when the storage areas are unusable
pub trait CookieJar {
    fn read(&self, name: &str) -> Option<String>;
    /// `expires` of `None` writes a session cookie
    fn write(&self, name: &str, value: &str, expires: Option<DateTime<Utc>>) -> Result<()>;
    fn delete(&self, name: &str) -> Result<()>;
}

/// Source of the current time for expiry checks
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// `chrono::Utc::now()`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// The backends a store was given at construction
#[derive(Default)]
pub struct Backends {
    pub durable: Option<Box<dyn StorageArea>>,
    pub volatile: Option<Box<dyn StorageArea>>,
    pub cookies: Option<Box<dyn CookieJar>>,
}

impl Backends {
    /// No backends at all; every keyed operation fails
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_areas(
        durable: impl StorageArea + 'static,
        volatile: impl StorageArea + 'static,
    ) -> Self {
        Self {
            durable: Some(Box::new(durable)),
            volatile: Some(Box::new(volatile)),
            cookies: None,
        }
    }

    pub fn with_cookies(mut self, cookies: impl CookieJar + 'static) -> Self {
        self.cookies = Some(Box::new(cookies));
        self
    }

    /// Both areas are present and usable
    pub(crate) fn areas(&self) -> Option<(&dyn StorageArea, &dyn StorageArea)> {
        match (&self.durable, &self.volatile) {
            (Some(d), Some(v)) => Some((d.as_ref(), v.as_ref())),
            _ => None,
        }
    }
}

/// Which backend a keyed operation goes to
pub(crate) enum ActiveBackend<'a> {
    Areas {
        durable: &'a dyn StorageArea,
        volatile: &'a dyn StorageArea,
    },
    Cookie(&'a dyn CookieJar),
    Unavailable,
}
