//! Key-value camera parameters.
//!
//! Only the immediate zoom key is read here. Whatever integer comes out goes
//! through the same validation as any programmatic `set_zoom` call.

use std::collections::HashMap;

use crate::error::{ZoomError, ZoomResult};

/// Key carrying the requested immediate zoom index.
pub const KEY_ZOOM: &str = "zoom";

/// Generic key-value parameter set.
#[derive(Debug, Clone, Default)]
pub struct ZoomParameters {
    values: HashMap<String, String>,
}

impl ZoomParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Requested immediate zoom index, if present.
    pub fn zoom(&self) -> ZoomResult<Option<i32>> {
        match self.get(KEY_ZOOM) {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| ZoomError::invalid_parameter(KEY_ZOOM, raw)),
        }
    }
}

impl From<HashMap<String, String>> for ZoomParameters {
    fn from(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ZoomParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
