//! KVP query string handling: parsing, normalization and key classification.

use std::collections::HashMap;

use url::form_urlencoded;
use wmts_common::{WmtsError, WmtsResult};

/// Multi-valued query as received, in first-occurrence order.
///
/// Keys that differ only by case name the same parameter; their values are
/// merged under the spelling seen first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KvpQuery {
    params: Vec<(String, Vec<String>)>,
}

impl KvpQuery {
    /// Parse a raw (percent-encoded) query string.
    pub fn parse(raw: &str) -> Self {
        form_urlencoded::parse(raw.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self
            .params
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&key))
        {
            Some((_, values)) => values.push(value),
            None => self.params.push((key, vec![value])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// All values of a key, matched case-insensitively.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.params
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(key))
            .map(|(_, values)| values.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.params
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    /// Serialize as `key=value&...`, or `None` when there is nothing to send.
    ///
    /// Values are re-encoded from their decoded form, so the bytes may differ
    /// from what the client sent (`a:b` becomes `a%3Ab`, `%20` becomes `+`)
    /// and a bare key `flag` becomes `flag=`.
    pub fn to_query_string(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, values) in &self.params {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        Some(serializer.finish())
    }

    /// Lowercase every key and require exactly one value per key.
    pub fn normalize(&self) -> WmtsResult<NormalizedQuery> {
        let mut params = Vec::with_capacity(self.len());
        for (key, values) in &self.params {
            match values.as_slice() {
                [value] => params.push(NormalizedParam {
                    key: key.to_ascii_lowercase(),
                    original: key.clone(),
                    value: value.clone(),
                }),
                _ => {
                    return Err(WmtsError::MultipleValues {
                        param: key.clone(),
                        values: values.clone(),
                    })
                }
            }
        }
        Ok(NormalizedQuery { params })
    }
}

impl<K, V> FromIterator<(K, V)> for KvpQuery
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = KvpQuery::default();
        for (key, value) in iter {
            query.push(key, value);
        }
        query
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct NormalizedParam {
    key: String,
    original: String,
    value: String,
}

/// Single-valued query with lowercased keys.
///
/// The original spelling of each key is retained so that pass-through keys
/// can be forwarded exactly as the client sent them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    params: Vec<NormalizedParam>,
}

impl NormalizedQuery {
    /// Look up a value by its lowercase key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|param| param.key == key)
            .map(|param| param.value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.params.iter().any(|param| param.key == key)
    }

    /// Lowercased keys in received order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|param| param.key.as_str())
    }

    /// Split into recognized WMTS keys and everything else.
    ///
    /// No key is ever dropped: a key not in `recognized` always ends up in
    /// the pass-through half with its original casing.
    pub fn classify(&self, recognized: &[&str]) -> (WmtsQuery, KvpQuery) {
        let mut wmts = HashMap::new();
        let mut passthrough = KvpQuery::default();
        for param in &self.params {
            if recognized.contains(&param.key.as_str()) {
                wmts.insert(param.key.clone(), param.value.clone());
            } else {
                passthrough.push(param.original.clone(), param.value.clone());
            }
        }
        (WmtsQuery(wmts), passthrough)
    }
}

/// The recognized WMTS half of a classified query, keyed by lowercase name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WmtsQuery(HashMap<String, String>);

impl WmtsQuery {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Value of a key the validators have already required.
    pub fn require(&self, key: &str) -> WmtsResult<&str> {
        self.get(key).ok_or_else(|| WmtsError::missing(key))
    }
}
