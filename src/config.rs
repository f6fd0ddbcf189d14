//! Store configuration
//!
//! Held per [`Store`](crate::Store) and changed through [`Config::merge`],
//! which only touches keys it recognizes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default key prefix
pub const DEFAULT_PREFIX: &str = "scs_";
/// Default namespace for the global registry
pub const DEFAULT_NAMESPACE: &str = "scdefault";

/// Keyed store and global registry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Prepended to every key before it reaches a backend
    pub prefix: String,
    /// Records stamped with an older version (or none) are purged on read
    pub version: Option<f64>,
    /// Write to the durable area when `set` gets no explicit `persistent`
    pub default_persistent: bool,
    /// Namespace used by the global registry when none is given
    pub default_namespace: String,
    /// Skip the storage areas and go straight to cookies
    pub force_cookie: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            version: None,
            default_persistent: true,
            default_namespace: DEFAULT_NAMESPACE.to_string(),
            force_cookie: false,
        }
    }
}

impl Config {
    /// Parse a complete configuration; missing fields take their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// `namespace`, or the default namespace when none is given
    pub fn namespace_or<'a>(&'a self, namespace: Option<&'a str>) -> &'a str {
        namespace.unwrap_or(self.default_namespace.as_str())
    }

    /// Overwrite the fields named in `partial`.
    ///
    /// Unknown keys are ignored, as are recognized keys carrying a value of
    /// the wrong type. `version` is coerced to a number; text that does not
    /// parse becomes NaN: `set` rejects it, and on read no stamped record
    /// counts as older than it.
    pub fn merge(&mut self, partial: &Value) {
        let Some(fields) = partial.as_object() else {
            log::trace!("Ignoring non-object configuration");
            return;
        };

        for (name, value) in fields {
            match name.as_str() {
                "prefix" => match value.as_str() {
                    Some(s) => self.prefix = s.to_string(),
                    None => skip(name, value),
                },
                "version" => self.version = coerce_version(value),
                "defaultPersistent" | "defaultUsePersistent" => match value.as_bool() {
                    Some(b) => self.default_persistent = b,
                    None => skip(name, value),
                },
                "defaultUseSession" => match value.as_bool() {
                    Some(b) => self.default_persistent = !b,
                    None => skip(name, value),
                },
                "defaultNamespace" | "defaultGlobalNameSpace" => match value.as_str() {
                    Some(s) => self.default_namespace = s.to_string(),
                    None => skip(name, value),
                },
                "forceCookie" => match value.as_bool() {
                    Some(b) => self.force_cookie = b,
                    None => skip(name, value),
                },
                _ => log::trace!("Ignoring unknown configuration key '{}'", name),
            }
        }
    }
}

fn skip(name: &str, value: &Value) {
    log::warn!("Ignoring configuration key '{}' with unexpected value {}", name, value);
}

/// Number coercion in the spirit of `parseFloat`
fn coerce_version(value: &Value) -> Option<f64> {
    match value {
        Value::Null => None,
        Value::Number(n) => Some(n.as_f64().unwrap_or(f64::NAN)),
        Value::String(s) => Some(s.trim().parse::<f64>().unwrap_or(f64::NAN)),
        _ => Some(f64::NAN),
    }
}
