//! In-memory backends
//!
//! Clones share the same underlying table, so a caller can keep a handle
//! and inspect what a store wrote.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use chrono::{DateTime, Utc};

use super::{CookieJar, StorageArea};
use crate::error::{Result, StoreError};

/// A storage area backed by a `HashMap`
#[derive(Debug, Clone, Default)]
pub struct MemoryArea {
    items: Rc<RefCell<HashMap<String, String>>>,
    reject_writes: Rc<Cell<bool>>,
}

impl MemoryArea {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes and deletes fail, like a browser with storage
    /// disabled or over quota
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.set(reject);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// The raw stored string
    pub fn raw(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }
}

impl StorageArea for MemoryArea {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        if self.reject_writes.get() {
            return Err(StoreError::Backend(format!("write of '{}' rejected", key)));
        }
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        if self.reject_writes.get() {
            return Err(StoreError::Backend(format!("delete of '{}' rejected", key)));
        }
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// A stored cookie value and its expiry
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryCookie {
    pub value: String,
    pub expires: Option<DateTime<Utc>>,
}

/// A cookie jar backed by a `HashMap`. Expiry is recorded, not enforced.
#[derive(Debug, Clone, Default)]
pub struct MemoryCookieJar {
    cookies: Rc<RefCell<HashMap<String, MemoryCookie>>>,
}

impl MemoryCookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cookie(&self, name: &str) -> Option<MemoryCookie> {
        self.cookies.borrow().get(name).cloned()
    }
}

impl CookieJar for MemoryCookieJar {
    fn read(&self, name: &str) -> Option<String> {
        self.cookies.borrow().get(name).map(|c| c.value.clone())
    }

    fn write(&self, name: &str, value: &str, expires: Option<DateTime<Utc>>) -> Result<()> {
        self.cookies.borrow_mut().insert(
            name.to_string(),
            MemoryCookie {
                value: value.to_string(),
                expires,
            },
        );
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<()> {
        self.cookies.borrow_mut().remove(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_clones_share_items() {
        let area = MemoryArea::new();
        let handle = area.clone();
        area.set_item("k", "v").unwrap();
        assert_eq!(handle.get_item("k").unwrap(), Some("v".to_string()));
        handle.remove_item("k").unwrap();
        assert!(area.is_empty());
    }

    #[test]
    fn test_area_reject_writes() {
        let area = MemoryArea::new();
        area.set_reject_writes(true);
        assert!(matches!(area.set_item("k", "v"), Err(StoreError::Backend(_))));
        assert!(!area.contains("k"));

        area.set_reject_writes(false);
        area.set_item("k", "v").unwrap();
        area.set_reject_writes(true);
        assert!(matches!(area.remove_item("k"), Err(StoreError::Backend(_))));
        assert!(area.contains("k"));
    }

    #[test]
    fn test_cookie_jar_records_expiry() {
        let jar = MemoryCookieJar::new();
        let expires = DateTime::parse_from_rfc3339("2030-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        jar.write("a", "1", Some(expires)).unwrap();
        jar.write("b", "2", None).unwrap();
        assert_eq!(jar.read("a"), Some("1".to_string()));
        assert_eq!(jar.cookie("a").unwrap().expires, Some(expires));
        assert_eq!(jar.cookie("b").unwrap().expires, None);
        jar.delete("a").unwrap();
        assert_eq!(jar.read("a"), None);
    }
}
