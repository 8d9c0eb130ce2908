//! Materialized wire parameters and their serializations.

use crate::error::RequestResult;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Ordered mapping of wire parameter name to value.
///
/// Produced by [`QueryRequest::form_values`](crate::QueryRequest::form_values);
/// key order is the order the service documentation lists the parameters in,
/// with named parameters in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormValues(IndexMap<String, Value>);

impl FormValues {
    pub(crate) fn new() -> Self {
        Self(IndexMap::new())
    }

    pub(crate) fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> Iter<'_> {
        self.into_iter()
    }

    pub fn into_inner(self) -> IndexMap<String, Value> {
        self.0
    }

    /// JSON object payload for the request body.
    pub fn to_json(&self) -> RequestResult<String> {
        Ok(serde_json::to_string(&self.0)?)
    }

    /// The same payload as a `serde_json::Value::Object`, keys in order.
    pub fn to_json_value(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// Legacy `key=value&key=value` encoding.
    ///
    /// Keys and values are percent-encoded leaving only RFC 3986 unreserved
    /// characters. String values contribute their raw text; every other value
    /// contributes its compact JSON text.
    #[deprecated(note = "send the JSON payload from `to_json` instead")]
    pub fn to_form_urlencoded(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.0 {
            let text = match value {
                Value::String(s) => urlencoding::encode(s).into_owned(),
                other => urlencoding::encode(&other.to_string()).into_owned(),
            };
            out.push_str(&urlencoding::encode(key));
            out.push('=');
            out.push_str(&text);
            out.push('&');
        }
        out.pop();
        out
    }
}

impl<'a> IntoIterator for &'a FormValues {
    type Item = (&'a str, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        Iter(self.0.iter())
    }
}

/// Borrowing iterator over [`FormValues`], in wire order.
#[derive(Debug, Clone)]
pub struct Iter<'a>(indexmap::map::Iter<'a, String, Value>);

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, v)| (k.as_str(), v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}
