//! Ordered multi-value header map.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Name of the content type header.
pub const CONTENT_TYPE: &str = "Content-Type";

/// Header mapping that keeps names in insertion order and every value per name.
///
/// Names are stored as given. Lookups through [`Headers::get_all`] and
/// [`Headers::contains`] compare names case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(IndexMap<String, Vec<String>>);

impl Headers {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Append a value under `name`, keeping any values already present.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.entry(name.into()).or_default().push(value.into());
    }

    /// Append several values under `name` in order.
    pub fn extend_values<I, V>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.0
            .entry(name.into())
            .or_default()
            .extend(values.into_iter().map(Into::into));
    }

    /// All values for `name` (case-insensitive), across differently cased entries.
    pub fn get_all<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a str> + 'n
    where
        'a: 'n,
    {
        self.0
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(name))
            .flat_map(|(_, values)| values.iter().map(String::as_str))
    }

    /// First value for `name` (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).next()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.keys().any(|k| k.eq_ignore_ascii_case(name))
    }

    /// Names and their values, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// JSON view with lowercased names, used by expression matching.
    ///
    /// Single values become strings, repeated values become arrays.
    pub fn to_value(&self) -> Value {
        let mut map = serde_json::Map::new();
        for (name, values) in self.iter() {
            let key = name.to_ascii_lowercase();
            let entry = map.entry(key).or_insert(Value::Array(Vec::new()));
            if let Value::Array(items) = entry {
                items.extend(values.iter().cloned().map(Value::String));
            }
        }
        for value in map.values_mut() {
            if let Value::Array(items) = value {
                if items.len() == 1 {
                    *value = items.remove(0);
                }
            }
        }
        Value::Object(map)
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.append(name, value);
        }
        headers
    }
}

impl Serialize for Headers {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Headers {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Value::Object(map) = Value::deserialize(deserializer)? else {
            return Err(serde::de::Error::custom("Headers must be an object"));
        };

        let mut headers = Headers::new();
        for (name, value) in map {
            match value {
                Value::String(s) => headers.append(name, s),
                Value::Number(n) => headers.append(name, n.to_string()),
                Value::Bool(b) => headers.append(name, b.to_string()),
                Value::Array(items) => {
                    let mut values = Vec::with_capacity(items.len());
                    for item in items {
                        match item {
                            Value::String(s) => values.push(s),
                            Value::Number(n) => values.push(n.to_string()),
                            Value::Bool(b) => values.push(b.to_string()),
                            _ => {
                                return Err(serde::de::Error::custom(format!(
                                    "Header '{name}' values must be scalars"
                                )))
                            }
                        }
                    }
                    headers.extend_values(name, values);
                }
                _ => {
                    return Err(serde::de::Error::custom(format!(
                        "Header '{name}' must be a string or a list of strings"
                    )))
                }
            }
        }
        Ok(headers)
    }
}
