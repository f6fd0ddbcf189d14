//! `document.cookie` string helpers
//!
//! Names and values are expected to be encoded already; the browser jar
//! runs them through `encodeURIComponent` first.

use chrono::{DateTime, Duration, Utc};

/// Lifetime of a cookie written for persistent data
pub const PERSISTENT_COOKIE_DAYS: i64 = 365;

/// Expiry for a cookie written at `now`
pub fn cookie_expiry(now: DateTime<Utc>, persistent: bool) -> Option<DateTime<Utc>> {
    persistent.then(|| now + Duration::days(PERSISTENT_COOKIE_DAYS))
}

/// Find `name` in a `k1=v1; k2=v2` cookie header
pub fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (k, v) = pair.trim().split_once('=')?;
        (k == name).then_some(v)
    })
}

/// Assignment string for `document.cookie`
pub fn format_cookie(name: &str, value: &str, expires: Option<DateTime<Utc>>) -> String {
    match expires {
        Some(at) => format!(
            "{}={}; expires={}; path=/",
            name,
            value,
            at.format("%a, %d %b %Y %H:%M:%S GMT")
        ),
        None => format!("{}={}; path=/", name, value),
    }
}

/// Assignment string that makes the browser drop `name`
pub fn format_cookie_deletion(name: &str) -> String {
    format!("{}=; expires=Thu, 01 Jan 1970 00:00:00 GMT; path=/", name)
}
