//! Browser backends over `web-sys`

use chrono::{DateTime, Utc};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlDocument, Storage};

use super::cookie::{find_cookie, format_cookie, format_cookie_deletion};
use super::{Backends, CookieJar, StorageArea};
use crate::error::{Result, StoreError};

fn js_error(err: JsValue) -> StoreError {
    StoreError::Backend(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

/// `window.localStorage` or `window.sessionStorage`
pub struct WebStorage(Storage);

impl StorageArea for WebStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.0.get_item(key).map_err(js_error)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.0.set_item(key, value).map_err(js_error)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.0.remove_item(key).map_err(js_error)
    }
}

/// `document.cookie`, with names and values URI-encoded
pub struct DocumentCookies(HtmlDocument);

impl CookieJar for DocumentCookies {
    fn read(&self, name: &str) -> Option<String> {
        let header = self.0.cookie().ok()?;
        let encoded_name = String::from(js_sys::encode_uri_component(name));
        let raw = find_cookie(&header, &encoded_name)?;
        js_sys::decode_uri_component(raw).ok().map(String::from)
    }

    fn write(&self, name: &str, value: &str, expires: Option<DateTime<Utc>>) -> Result<()> {
        let name = String::from(js_sys::encode_uri_component(name));
        let value = String::from(js_sys::encode_uri_component(value));
        self.0
            .set_cookie(&format_cookie(&name, &value, expires))
            .map_err(js_error)
    }

    fn delete(&self, name: &str) -> Result<()> {
        let name = String::from(js_sys::encode_uri_component(name));
        self.0
            .set_cookie(&format_cookie_deletion(&name))
            .map_err(js_error)
    }
}

impl Backends {
    /// Whatever the current window offers. Accessing an area can throw
    /// (e.g. storage disabled); such an area is left out.
    pub fn browser() -> Self {
        let Some(window) = web_sys::window() else {
            log::warn!("No window, running without storage backends");
            return Self::none();
        };

        let durable = window.local_storage().ok().flatten();
        let volatile = window.session_storage().ok().flatten();
        let cookies = window
            .document()
            .and_then(|d| d.dyn_into::<HtmlDocument>().ok());

        log::debug!(
            "Browser backends: localStorage={} sessionStorage={} cookies={}",
            durable.is_some(),
            volatile.is_some(),
            cookies.is_some()
        );

        Self {
            durable: durable.map(|s| Box::new(WebStorage(s)) as Box<dyn StorageArea>),
            volatile: volatile.map(|s| Box::new(WebStorage(s)) as Box<dyn StorageArea>),
            cookies: cookies.map(|d| Box::new(DocumentCookies(d)) as Box<dyn CookieJar>),
        }
    }
}
