//!
//! Query string parsing and serialization helpers used when composing
//! SDK and embed URLs.
//!
//! Parsing is lenient: components that fail to decode are kept verbatim,
//! a key without `=` maps to an empty value and repeated keys (with or
//! without the `[]` suffix) are merged into a list. Key order follows the
//! order of first appearance, so a parsed query serializes back to the
//! same string.
//!

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

/// Value of a query parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Single(String),
    Multiple(Vec<String>),
}

impl QueryValue {
    /// First (or only) value
    pub fn first(&self) -> Option<&str> {
        match self {
            QueryValue::Single(value) => Some(value.as_str()),
            QueryValue::Multiple(values) => values.first().map(|v| v.as_str()),
        }
    }

    pub fn values(&self) -> Vec<&str> {
        match self {
            QueryValue::Single(value) => vec![value.as_str()],
            QueryValue::Multiple(values) => values.iter().map(|v| v.as_str()).collect(),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Single(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Single(value)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        QueryValue::Multiple(values)
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(values: Vec<&str>) -> Self {
        QueryValue::Multiple(values.into_iter().map(String::from).collect())
    }
}

/// Ordered collection of query parameters
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, QueryValue)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&QueryValue> {
        self.entries
            .iter()
            .find_map(|(key, value)| (key == name).then_some(value))
    }

    /// Set `name` to `value`, replacing any existing value in place
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<QueryValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Add `value` under `name`, turning an existing single value into a list
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => match existing {
                QueryValue::Multiple(values) => values.push(value),
                QueryValue::Single(first) => {
                    let first = std::mem::take(first);
                    *existing = QueryValue::Multiple(vec![first, value]);
                }
            },
            None => self.entries.push((name, QueryValue::Single(value))),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<QueryValue> {
        let index = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serialize_query_string(self))
    }
}

/// Anything that can be appended to a URL as a query string
pub trait ToQueryString {
    fn to_query_string(&self) -> String;
}

impl ToQueryString for str {
    fn to_query_string(&self) -> String {
        self.to_string()
    }
}

impl ToQueryString for String {
    fn to_query_string(&self) -> String {
        self.clone()
    }
}

impl ToQueryString for QueryParams {
    fn to_query_string(&self) -> String {
        serialize_query_string(self)
    }
}

/// Decode a URI component, returning `fallback` if the
/// decoded bytes are not valid UTF-8.
pub fn try_decode_uri_component(component: &str, fallback: &str) -> String {
    urlencoding::decode(component)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| fallback.to_string())
}

/// Percent-encode a URI component, leaving the same set of
/// characters unescaped as JavaScript's `encodeURIComponent()`.
pub fn encode_uri_component(component: &str) -> String {
    urlencoding::encode(component)
        .replace("%21", "!")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
        .replace("%2A", "*")
}

/// Parse a query string (with or without a leading `?` or `#`).
pub fn parse_query_string(qs: &str) -> QueryParams {
    lazy_static! {
        static ref REGEX: Regex = Regex::new(r"(?:^[#?]?|&)([^=&]+)(?:=([^&]*))?").unwrap();
    }

    let mut params = QueryParams::new();
    for captures in REGEX.captures_iter(qs) {
        let raw = &captures[1];
        let name = try_decode_uri_component(raw, raw).replacen("[]", "", 1);
        let value = match captures.get(2) {
            Some(value) => {
                let raw = value.as_str();
                try_decode_uri_component(&raw.replace('+', " "), raw)
            }
            None => String::new(),
        };
        params.append(name, value);
    }
    params
}

/// Parse an optional query string
pub fn decode_query_string(qs: Option<&str>) -> Option<QueryParams> {
    qs.map(parse_query_string)
}

/// Serialize `params` into a query string. List values produce
/// one `name=value` pair per element.
pub fn serialize_query_string(params: &QueryParams) -> String {
    let mut qs = Vec::new();
    for (name, value) in params.iter() {
        let name = encode_uri_component(name);
        for value in value.values() {
            qs.push(format!("{name}={}", encode_uri_component(value)));
        }
    }
    qs.join("&")
}

/// Append `qs` to `url`, joining with `&` if `url` already carries a query.
pub fn append_query_string_to_url(url: &str, qs: &str) -> String {
    if qs.is_empty() {
        return url.to_string();
    }

    match url.split_once('?') {
        Some((main, query)) => format!("{main}?{query}&{qs}"),
        None => format!("{url}?{qs}"),
    }
}

/// Append `params` (a raw query string or [`QueryParams`]) to `url`.
pub fn append_params_to_url<P>(url: &str, params: &P) -> String
where
    P: ToQueryString + ?Sized,
{
    append_query_string_to_url(url, &params.to_query_string())
}
