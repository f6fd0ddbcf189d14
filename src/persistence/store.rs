//! The keyed store
//!
//! Keys are qualified with the configured prefix. With both storage areas
//! usable, values are wrapped in a [`StoredRecord`] and written to the
//! durable area (persistent) or the volatile area. Reads check the durable
//! area first, then the volatile one. Without usable areas, values go to
//! cookies with no envelope.

use std::cell::OnceCell;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::envelope::{self, Freshness, StoredRecord};
use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::globals::{GlobalRegistry, Namespaces};
use crate::platform::cookie::cookie_expiry;
use crate::platform::{ActiveBackend, Backends, Clock, StorageArea, SystemClock};

/// Key written and removed by the availability probe
const PROBE_KEY: &str = "lsAvailable";

/// Keyed store plus the global registry, with their shared configuration
pub struct Store {
    config: Config,
    backends: Backends,
    clock: Box<dyn Clock>,
    available: OnceCell<bool>,
    globals: GlobalRegistry,
}

impl Store {
    pub fn new(backends: Backends) -> Self {
        Self::with_config(backends, Config::default())
    }

    pub fn with_config(backends: Backends, config: Config) -> Self {
        Self {
            config,
            backends,
            clock: Box::new(SystemClock),
            available: OnceCell::new(),
            globals: GlobalRegistry::new(),
        }
    }

    /// Replace the clock used for expiry checks
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// A store over the current window's storage areas and cookies
    #[cfg(target_arch = "wasm32")]
    pub fn browser() -> Self {
        Self::new(Backends::browser())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Merge recognized keys from a JSON object into the configuration
    pub fn set_config(&mut self, partial: &Value) {
        self.config.merge(partial);
    }

    /// Probe the durable area once and remember the answer
    pub fn is_storage_available(&self) -> bool {
        *self.available.get_or_init(|| {
            let available = match self.backends.areas() {
                Some((durable, _)) => durable
                    .set_item(PROBE_KEY, "yes")
                    .and_then(|_| durable.remove_item(PROBE_KEY))
                    .is_ok(),
                None => false,
            };
            log::debug!("Storage areas available: {}", available);
            available
        })
    }

    fn active_backend(&self) -> ActiveBackend<'_> {
        if self.is_storage_available() && !self.config.force_cookie {
            if let Some((durable, volatile)) = self.backends.areas() {
                return ActiveBackend::Areas { durable, volatile };
            }
        }
        match &self.backends.cookies {
            Some(jar) => ActiveBackend::Cookie(jar.as_ref()),
            None => ActiveBackend::Unavailable,
        }
    }

    fn qualify(&self, key: &str) -> String {
        format!("{}{}", self.config.prefix, key)
    }

    /// Store `data` under `key`.
    ///
    /// `persistent` defaults to the configured default. `valid_until` only
    /// applies to persistent writes to the storage areas.
    pub fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        data: &T,
        persistent: Option<bool>,
        valid_until: Option<DateTime<Utc>>,
    ) -> Result<&Self> {
        let persistent = persistent.unwrap_or(self.config.default_persistent);
        let valid_until = valid_until.filter(|_| persistent);
        let key = self.qualify(key);

        match self.active_backend() {
            ActiveBackend::Areas { durable, volatile } => {
                let mut record = StoredRecord::new(serde_json::to_value(data)?);
                if let Some(version) = self.config.version {
                    if !version.is_finite() {
                        return Err(StoreError::invalid("version must be numeric"));
                    }
                    record = record.with_version(version);
                }
                if let Some(until) = valid_until {
                    record = record.with_valid_until(until);
                }

                let area = if persistent { durable } else { volatile };
                area.set_item(&key, &record.to_json()?)?;
            }
            ActiveBackend::Cookie(jar) => {
                let expires = cookie_expiry(self.clock.now(), persistent);
                jar.write(&key, &serde_json::to_string(data)?, expires)?;
            }
            ActiveBackend::Unavailable => return Err(StoreError::StorageUnavailable),
        }
        Ok(self)
    }

    /// Read the payload stored under `key`.
    ///
    /// Outdated and expired records are purged and read as `None`, as is
    /// anything that is not a valid envelope.
    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        let key = self.qualify(key);

        match self.active_backend() {
            ActiveBackend::Areas { durable, volatile } => {
                let Some(raw) = read_area(durable, &key).or_else(|| read_area(volatile, &key))
                else {
                    return Ok(None);
                };
                let Some(record) = envelope::parse(&raw) else {
                    return Ok(None);
                };

                match record.freshness(self.config.version, self.clock.now()) {
                    Freshness::Fresh => Ok(Some(record.payload)),
                    stale => {
                        log::debug!("Purging {:?} record '{}'", stale, key);
                        self.remove(&key, true)?;
                        Ok(None)
                    }
                }
            }
            ActiveBackend::Cookie(jar) => Ok(jar
                .read(&key)
                .map(|raw| serde_json::from_str(&raw).unwrap_or(Value::String(raw)))),
            ActiveBackend::Unavailable => Err(StoreError::StorageUnavailable),
        }
    }

    /// [`get`](Self::get), decoded into `T`. A payload of another shape is a miss.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        Ok(self
            .get(key)?
            .and_then(|payload| serde_json::from_value(payload).ok()))
    }

    /// Delete `key` from both areas and from cookies. `raw` skips the prefix.
    pub fn remove(&self, key: &str, raw: bool) -> Result<&Self> {
        if key.is_empty() {
            return Err(StoreError::invalid("key is required"));
        }
        let key = if raw {
            key.to_string()
        } else {
            self.qualify(key)
        };

        // Every backend gets its delete attempt; the first failure is reported
        let results = [
            self.backends.durable.as_ref().map(|a| a.remove_item(&key)),
            self.backends.volatile.as_ref().map(|a| a.remove_item(&key)),
            self.backends.cookies.as_ref().map(|jar| jar.delete(&key)),
        ];
        results.into_iter().flatten().collect::<Result<Vec<()>>>()?;
        Ok(self)
    }

    fn namespace<'a>(&'a self, namespace: Option<&'a str>) -> &'a str {
        self.config.namespace_or(namespace)
    }

    /// Register a value; `namespace` defaults to the configured one
    pub fn set_global(&mut self, key: &str, value: impl Into<Value>, namespace: Option<&str>) {
        let namespace = self.namespace(namespace).to_string();
        self.globals.set(&namespace, key, value.into());
    }

    pub fn get_global(&self, key: &str, namespace: Option<&str>) -> Option<&Value> {
        self.globals.get(self.namespace(namespace), key)
    }

    pub fn get_all_globals(&self) -> &Namespaces {
        self.globals.namespaces()
    }

    pub fn remove_global(&mut self, key: &str, namespace: Option<&str>) -> bool {
        let namespace = self.namespace(namespace).to_string();
        self.globals.remove(&namespace, key)
    }

    pub fn globals(&self) -> &GlobalRegistry {
        &self.globals
    }
}

/// A failed or empty read counts as absent
fn read_area(area: &dyn StorageArea, key: &str) -> Option<String> {
    match area.get_item(key) {
        Ok(value) => value.filter(|v| !v.is_empty()),
        Err(e) => {
            log::warn!("Failed to read '{}': {}", key, e);
            None
        }
    }
}
