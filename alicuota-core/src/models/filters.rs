use std::collections::BTreeMap;

use serde::Deserialize;

use super::Field;
use crate::resolvers::common::clean_text;

/// A single filter value as callers send it.
///
/// Years in particular arrive as integers, floats (`2024.0`) or strings.
/// Any other JSON scalar is taken by its text form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Integer(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl FilterValue {
    /// Text form of the value. Integral floats render without a fraction.
    pub fn to_text(&self) -> String {
        match self {
            Self::Integer(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
            Self::Bool(value) => value.to_string(),
            Self::Text(value) => value.clone(),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Filters chosen so far, keyed by field name.
///
/// Keys naming a [`Field`] (canonically or by alias) are stored under the
/// canonical name, so `provincia` and `province` are one choice and the last
/// one inserted wins. Other keys are kept lowercased so that an unknown
/// column can be reported by the resolver that receives it. Values are
/// cleaned; empty, null and `"."` values are dropped on insertion, so every
/// stored value is a real choice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "BTreeMap<String, Option<FilterValue>>")]
pub struct FilterSelection {
    values: BTreeMap<String, String>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FilterSelection::insert`].
    pub fn with(
        mut self,
        name: &str,
        value: impl Into<FilterValue>,
    ) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(
        &mut self,
        name: &str,
        value: impl Into<FilterValue>,
    ) {
        let key = match Field::parse(name) {
            Some(field) => field.as_str().to_string(),
            None => name.trim().to_lowercase(),
        };
        match clean_text(&value.into().to_text()) {
            Some(cleaned) => {
                self.values.insert(key, cleaned);
            }
            None => {
                self.values.remove(&key);
            }
        }
    }

    /// The chosen value for `field`, however its key was spelled.
    pub fn get(
        &self,
        field: Field,
    ) -> Option<&str> {
        self.values.get(field.as_str()).map(String::as_str)
    }

    pub fn contains(
        &self,
        field: Field,
    ) -> bool {
        self.get(field).is_some()
    }

    /// Raw `(name, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<BTreeMap<String, Option<FilterValue>>> for FilterSelection {
    fn from(raw: BTreeMap<String, Option<FilterValue>>) -> Self {
        let mut selection = Self::new();
        for (name, value) in raw {
            if let Some(value) = value {
                selection.insert(&name, value);
            }
        }
        selection
    }
}

impl<K: AsRef<str>, V: Into<FilterValue>> FromIterator<(K, V)> for FilterSelection {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut selection = Self::new();
        for (name, value) in iter {
            selection.insert(name.as_ref(), value);
        }
        selection
    }
}
