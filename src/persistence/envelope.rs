//! Versioned JSON envelope around stored values
//!
//! Wire format:
//! `{"payload": <any>, "version": <number>?, "validUntil": <ISO-8601>?}`

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, StoreError};

/// The unit persisted under one key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    #[serde(default)]
    pub payload: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<String>,
}

/// Outcome of the read-time checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    /// Unversioned, or stamped with a version below the required one
    Outdated,
    /// `validUntil` lies in the past
    Expired,
}

impl StoredRecord {
    pub fn new(payload: Value) -> Self {
        Self {
            payload,
            version: None,
            valid_until: None,
        }
    }

    pub fn with_version(mut self, version: f64) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_valid_until(mut self, until: DateTime<Utc>) -> Self {
        self.valid_until = Some(format_timestamp(until));
        self
    }

    /// The expiry timestamp, if present and readable
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.valid_until.as_deref().and_then(parse_timestamp)
    }

    /// Version check first, then expiry. A record is outdated when it has
    /// no version or one strictly below `required_version`, so a NaN
    /// requirement only catches unversioned records. An unreadable
    /// `validUntil` never expires.
    pub fn freshness(&self, required_version: Option<f64>, now: DateTime<Utc>) -> Freshness {
        if let Some(required) = required_version {
            match self.version {
                None => return Freshness::Outdated,
                Some(v) if v < required => return Freshness::Outdated,
                Some(_) => {}
            }
        }

        match self.expires_at() {
            Some(until) if until < now => Freshness::Expired,
            _ => Freshness::Fresh,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Decode a stored string. Anything that is not an envelope object is a miss.
pub fn parse(raw: &str) -> Option<StoredRecord> {
    serde_json::from_str(raw).ok()
}

/// `Date.prototype.toISOString` format: `2026-10-16T08:00:00.000Z`
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// RFC 3339 timestamps, or a bare `YYYY-MM-DD` read as UTC midnight
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Some(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Convert caller-supplied date text into an expiry timestamp
pub fn parse_valid_until(text: &str) -> Result<DateTime<Utc>> {
    parse_timestamp(text).ok_or_else(|| StoreError::invalid("validUntil must be a date"))
}
