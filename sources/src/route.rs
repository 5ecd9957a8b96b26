//! Module to manage the routes used by the different sources
//!

use std::collections::btree_map::{Iter, Keys};
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Named paths appended to a site `base_url`, e.g. `search = "/search"`.
///
#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
#[serde(transparent)]
pub struct Routes(BTreeMap<String, String>);

impl Routes {
    /// Wrap `get`
    ///
    #[inline]
    pub fn get(&self, name: &str) -> Option<&String> {
        self.0.get(name)
    }

    /// Wrap `is_empty()`
    ///
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Wrap `len()`
    ///
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Wrap `keys()`
    ///
    #[inline]
    pub fn keys(&self) -> Keys<'_, String, String> {
        self.0.keys()
    }

    /// Wrap `contains_key()`
    ///
    #[inline]
    pub fn contains_key(&self, s: &str) -> bool {
        self.0.contains_key(s)
    }

    #[inline]
    pub fn iter(&self) -> Iter<'_, String, String> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Routes {
    type Item = (&'a String, &'a String);
    type IntoIter = Iter<'a, String, String>;

    fn into_iter(self) -> Iter<'a, String, String> {
        self.0.iter()
    }
}

impl From<BTreeMap<String, String>> for Routes {
    fn from(value: BTreeMap<String, String>) -> Self {
        Self(value)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Routes {
    fn from(value: [(&str, &str); N]) -> Self {
        Self(
            value
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}
