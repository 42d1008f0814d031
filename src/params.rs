//! Navigation parameters attached to a [`NavigationContext`](crate::NavigationContext).
//!
//! [`NavigationParams`] is a string-keyed map of **optional** values. The
//! navigation core never interprets them; they are defined by the units and
//! guards that consume them (a tool id, a preselected wheel size, a flag).
//!
//! A key may be present with no value, which is how bare query flags such as
//! `?metric` arrive from deep links.
//!
//! # Example
//!
//! ```
//! use bikecalc_navigator::NavigationParams;
//!
//! let params = NavigationParams::from_query_string("chainring=50&cog=17&metric");
//! assert_eq!(params.get_as::<u32>("chainring"), Some(50));
//! assert!(params.contains("metric"));
//! assert_eq!(params.get("metric"), None);
//! ```

use std::collections::HashMap;

/// Parameters carried by a navigation call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationParams {
    params: HashMap<String, Option<String>>,
}

impl NavigationParams {
    /// Create empty parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from an existing `HashMap`.
    pub fn from_map(params: HashMap<String, Option<String>>) -> Self {
        Self { params }
    }

    /// Parse `key=value&flag` pairs. Keys without `=` are stored without a value.
    pub fn from_query_string(query: &str) -> Self {
        let mut params = HashMap::new();

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            match pair.split_once('=') {
                Some((key, value)) => {
                    params.insert(decode_uri_component(key), Some(decode_uri_component(value)));
                }
                None => {
                    params.insert(decode_uri_component(pair), None);
                }
            }
        }

        Self { params }
    }

    /// Builder-style insert of a key with a value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), Some(value.into()));
        self
    }

    /// Builder-style insert of a key without a value.
    #[must_use]
    pub fn with_flag(mut self, key: impl Into<String>) -> Self {
        self.params.insert(key.into(), None);
        self
    }

    /// Get a parameter value by key.
    ///
    /// Returns `None` both for a missing key and for a key stored without a
    /// value; use [`contains`](Self::contains) to tell them apart.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key)?.as_deref()
    }

    /// Get a parameter and parse it as a specific type
    ///
    /// Returns `None` if the parameter doesn't exist, has no value, or cannot be parsed.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.get(key)?.parse().ok()
    }

    /// Insert or overwrite a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) {
        self.params.insert(key.into(), value);
    }

    /// Remove a parameter, returning its slot if it was present.
    pub fn remove(&mut self, key: &str) -> Option<Option<String>> {
        self.params.remove(key)
    }

    /// Return `true` if the given key is present, with or without a value.
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Iterate over all `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Option<String>)> {
        self.params.iter()
    }

    /// Return `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Return the number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Merge two parameter sets. Entries from `overrides` win on collision.
    pub fn merge(base: &NavigationParams, overrides: &NavigationParams) -> NavigationParams {
        let mut merged = base.clone();
        for (key, value) in overrides.iter() {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for NavigationParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(k, v)| (k.into(), Some(v.into())))
                .collect(),
        }
    }
}

/// Simple URI component decoding
fn decode_uri_component(s: &str) -> String {
    let mut bytes = Vec::with_capacity(s.len());
    let mut iter = s.bytes();

    while let Some(b) = iter.next() {
        match b {
            b'%' => {
                let hex: Vec<u8> = iter.by_ref().take(2).collect();
                let decoded = std::str::from_utf8(&hex)
                    .ok()
                    .filter(|h| h.len() == 2 && h.bytes().all(|b| b.is_ascii_hexdigit()))
                    .and_then(|h| u8::from_str_radix(h, 16).ok());
                match decoded {
                    Some(byte) => bytes.push(byte),
                    None => {
                        bytes.push(b'%');
                        bytes.extend_from_slice(&hex);
                    }
                }
            }
            b'+' => bytes.push(b' '),
            _ => bytes.push(b),
        }
    }

    String::from_utf8_lossy(&bytes).into_owned()
}

// ============================================================================
// Tests
// ============================================================================
