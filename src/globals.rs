//! In-memory global registry
//!
//! Values registered from one part of the page and read from another,
//! partitioned by namespace. Never persisted. Values are held as given, so
//! the registry is generic over the value type: JSON values natively, raw
//! `JsValue`s (functions, dates, shared objects) in the browser binding.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Namespace -> key -> value
pub type Namespaces<V = Value> = BTreeMap<String, BTreeMap<String, V>>;

/// Namespaced registry of transient values
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GlobalRegistry<V = Value> {
    namespaces: Namespaces<V>,
}

impl<V> Default for GlobalRegistry<V> {
    fn default() -> Self {
        Self {
            namespaces: BTreeMap::new(),
        }
    }
}

impl<V> GlobalRegistry<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite, creating the namespace if needed
    pub fn set(&mut self, namespace: &str, key: &str, value: V) {
        self.namespaces
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }

    pub fn get(&self, namespace: &str, key: &str) -> Option<&V> {
        self.namespaces.get(namespace)?.get(key)
    }

    /// Returns whether the key was present. The namespace is kept even
    /// when it becomes empty.
    pub fn remove(&mut self, namespace: &str, key: &str) -> bool {
        self.namespaces
            .get_mut(namespace)
            .is_some_and(|ns| ns.remove(key).is_some())
    }

    pub fn namespaces(&self) -> &Namespaces<V> {
        &self.namespaces
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::rc::Rc;

    #[test]
    fn test_overwrite() {
        let mut globals = GlobalRegistry::new();
        globals.set("ns", "a", json!(1));
        globals.set("ns", "a", json!(2));
        assert_eq!(globals.get("ns", "a"), Some(&json!(2)));
    }

    #[test]
    fn test_falsy_values_are_returned() {
        let mut globals = GlobalRegistry::new();
        globals.set("ns", "zero", json!(0));
        globals.set("ns", "no", json!(false));
        globals.set("ns", "empty", json!(""));
        assert_eq!(globals.get("ns", "zero"), Some(&json!(0)));
        assert_eq!(globals.get("ns", "no"), Some(&json!(false)));
        assert_eq!(globals.get("ns", "empty"), Some(&json!("")));
    }

    #[test]
    fn test_remove_keeps_namespace() {
        let mut globals = GlobalRegistry::new();
        globals.set("ns", "a", json!(1));
        assert!(globals.remove("ns", "a"));
        assert!(!globals.remove("ns", "a"));
        assert!(!globals.remove("other", "a"));
        assert!(globals.namespaces()["ns"].is_empty());
    }

    #[test]
    fn test_holds_non_json_values_by_identity() {
        let callback: Rc<dyn Fn() -> i32> = Rc::new(|| 1);
        let mut globals: GlobalRegistry<Rc<dyn Fn() -> i32>> = GlobalRegistry::new();
        globals.set("ui", "cb", Rc::clone(&callback));

        let stored = globals.get("ui", "cb").unwrap();
        assert!(Rc::ptr_eq(stored, &callback));
        assert_eq!((**stored)(), 1);

        let all = globals.namespaces();
        assert!(Rc::ptr_eq(&all["ui"]["cb"], &callback));
        assert!(globals.remove("ui", "cb"));
        assert_eq!(Rc::strong_count(&callback), 1);
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut globals = GlobalRegistry::new();
        globals.set("custom", "bar", json!(7));
        assert_eq!(
            serde_json::to_value(&globals).unwrap(),
            json!({"custom": {"bar": 7}})
        );
    }
}
