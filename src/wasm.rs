//! JavaScript bindings
//!
//! Keyed store values cross the boundary as JSON text (`JSON.stringify` /
//! `JSON.parse`). Globals never leave JS: they are held as `JsValue`s, so
//! functions, dates and shared objects come back as the same values.
//! Errors are thrown as strings.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::error::StoreError;
use crate::globals::GlobalRegistry;
use crate::persistence::{Store, parse_valid_until};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // A host page may already have installed a logger
    let _ = console_log::init_with_level(log::Level::Info);
}

fn throw(err: StoreError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn from_js(value: &JsValue) -> Result<Value, JsValue> {
    if value.is_undefined() {
        return Ok(Value::Null);
    }
    // Functions and symbols stringify to `undefined` and are stored as null
    let Some(text) = js_sys::JSON::stringify(value)?.as_string() else {
        return Ok(Value::Null);
    };
    serde_json::from_str(&text).map_err(|e| throw(e.into()))
}

fn to_js(value: &impl serde::Serialize) -> Result<JsValue, JsValue> {
    let text = serde_json::to_string(value).map_err(|e| throw(e.into()))?;
    js_sys::JSON::parse(&text)
}

/// Accepts a `Date` or date text; `undefined`/`null` mean no expiry
fn valid_until(value: &JsValue) -> Result<Option<DateTime<Utc>>, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    if let Some(date) = value.dyn_ref::<js_sys::Date>() {
        if date.get_time().is_nan() {
            return Err(throw(StoreError::invalid("validUntil must be a date")));
        }
        let iso = String::from(date.to_iso_string());
        return parse_valid_until(&iso).map(Some).map_err(throw);
    }
    match value.as_string() {
        Some(text) => parse_valid_until(&text).map(Some).map_err(throw),
        None => Err(throw(StoreError::invalid("validUntil must be a date"))),
    }
}

struct State {
    store: Store,
    globals: GlobalRegistry<JsValue>,
}

/// The store, exposed to JavaScript.
///
/// Clones share one state, so `set` and `remove` can hand back a handle for
/// chaining (`s.set("a", 1).set("b", 2)`).
#[wasm_bindgen]
#[derive(Clone)]
pub struct ScStorage {
    state: Rc<RefCell<State>>,
}

#[wasm_bindgen]
impl ScStorage {
    #[wasm_bindgen(constructor)]
    pub fn new() -> ScStorage {
        ScStorage {
            state: Rc::new(RefCell::new(State {
                store: Store::browser(),
                globals: GlobalRegistry::new(),
            })),
        }
    }

    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&self, config: JsValue) -> Result<(), JsValue> {
        let partial = from_js(&config)?;
        self.state.borrow_mut().store.set_config(&partial);
        Ok(())
    }

    #[wasm_bindgen(js_name = getConfig)]
    pub fn get_config(&self) -> Result<JsValue, JsValue> {
        to_js(self.state.borrow().store.config())
    }

    #[wasm_bindgen(js_name = isStorageAvailable)]
    pub fn is_storage_available(&self) -> bool {
        self.state.borrow().store.is_storage_available()
    }

    pub fn set(
        &self,
        key: &str,
        data: JsValue,
        persistent: Option<bool>,
        valid_until_date: JsValue,
    ) -> Result<ScStorage, JsValue> {
        let data = from_js(&data)?;
        let state = self.state.borrow();
        // Only persistent writes carry an expiry, so a bad date elsewhere is ignored
        let persistent = persistent.unwrap_or(state.store.config().default_persistent);
        let until = if persistent {
            valid_until(&valid_until_date)?
        } else {
            None
        };
        state
            .store
            .set(key, &data, Some(persistent), until)
            .map_err(throw)?;
        Ok(self.clone())
    }

    pub fn get(&self, key: &str) -> Result<JsValue, JsValue> {
        match self.state.borrow().store.get(key).map_err(throw)? {
            Some(payload) => to_js(&payload),
            None => Ok(JsValue::NULL),
        }
    }

    pub fn remove(&self, key: &str, raw: Option<bool>) -> Result<ScStorage, JsValue> {
        self.state
            .borrow()
            .store
            .remove(key, raw.unwrap_or(false))
            .map_err(throw)?;
        Ok(self.clone())
    }

    #[wasm_bindgen(js_name = setGlobal)]
    pub fn set_global(
        &self,
        key: JsValue,
        value: JsValue,
        namespace: Option<String>,
    ) -> Result<(), JsValue> {
        let key = key
            .as_string()
            .ok_or_else(|| throw(StoreError::invalid("key must be a string")))?;
        let mut state = self.state.borrow_mut();
        let namespace = state
            .store
            .config()
            .namespace_or(namespace.as_deref())
            .to_string();
        state.globals.set(&namespace, &key, value);
        Ok(())
    }

    #[wasm_bindgen(js_name = getGlobal)]
    pub fn get_global(&self, key: &str, namespace: Option<String>) -> JsValue {
        let state = self.state.borrow();
        let namespace = state.store.config().namespace_or(namespace.as_deref());
        state
            .globals
            .get(namespace, key)
            .cloned()
            .unwrap_or(JsValue::NULL)
    }

    /// Namespace -> key -> value as plain objects. The values are the
    /// registered JS values themselves, not copies.
    #[wasm_bindgen(js_name = getAllGlobals)]
    pub fn get_all_globals(&self) -> Result<JsValue, JsValue> {
        let all = js_sys::Object::new();
        for (namespace, entries) in self.state.borrow().globals.namespaces() {
            let ns = js_sys::Object::new();
            for (key, value) in entries {
                js_sys::Reflect::set(&ns, &JsValue::from_str(key), value)?;
            }
            js_sys::Reflect::set(&all, &JsValue::from_str(namespace), &ns)?;
        }
        Ok(all.into())
    }

    #[wasm_bindgen(js_name = removeGlobal)]
    pub fn remove_global(&self, key: &str, namespace: Option<String>) -> bool {
        let mut state = self.state.borrow_mut();
        let namespace = state
            .store
            .config()
            .namespace_or(namespace.as_deref())
            .to_string();
        state.globals.remove(&namespace, key)
    }
}

impl Default for ScStorage {
    fn default() -> Self {
        Self::new()
    }
}
