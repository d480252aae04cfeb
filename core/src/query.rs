//! List filters and their query-string encoding.
//!
//! # Design
//! A `Filter` is an ordered bag of optional scalars. Encoding drops unset
//! values (`Null`, empty string) and, depending on the `QueryPolicy`, numeric
//! zero. Zero is ambiguous across resources: for most list screens an unset
//! numeric filter is sent as `0`, while `parentId=0` is a real value meaning
//! "root". The policy therefore has a default plus per-field overrides instead
//! of one global rule.

use std::fmt;

use crate::error::ApiError;

/// A single filter value.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Null,
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

impl QueryValue {
    fn is_blank(&self) -> bool {
        match self {
            QueryValue::Null => true,
            QueryValue::Str(s) => s.is_empty(),
            _ => false,
        }
    }

    fn is_zero(&self) -> bool {
        match self {
            QueryValue::Int(n) => *n == 0,
            QueryValue::UInt(n) => *n == 0,
            QueryValue::Float(f) => *f == 0.0,
            _ => false,
        }
    }

    fn as_u64(&self) -> Option<u64> {
        match self {
            QueryValue::UInt(n) => Some(*n),
            QueryValue::Int(n) => u64::try_from(*n).ok(),
            QueryValue::Str(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Null => Ok(()),
            QueryValue::Str(s) => f.write_str(s),
            QueryValue::Int(n) => write!(f, "{n}"),
            QueryValue::UInt(n) => write!(f, "{n}"),
            QueryValue::Float(n) => write!(f, "{n}"),
            QueryValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::Str(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::Str(s)
    }
}

impl From<&String> for QueryValue {
    fn from(s: &String) -> Self {
        QueryValue::Str(s.clone())
    }
}

impl From<i32> for QueryValue {
    fn from(n: i32) -> Self {
        QueryValue::Int(n.into())
    }
}

impl From<i64> for QueryValue {
    fn from(n: i64) -> Self {
        QueryValue::Int(n)
    }
}

impl From<u32> for QueryValue {
    fn from(n: u32) -> Self {
        QueryValue::UInt(n.into())
    }
}

impl From<u64> for QueryValue {
    fn from(n: u64) -> Self {
        QueryValue::UInt(n)
    }
}

impl From<f64> for QueryValue {
    fn from(n: f64) -> Self {
        QueryValue::Float(n)
    }
}

impl From<bool> for QueryValue {
    fn from(b: bool) -> Self {
        QueryValue::Bool(b)
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(QueryValue::Null, Into::into)
    }
}

/// Ordered list-query constraints plus pagination.
///
/// Keys keep insertion order; setting an existing key replaces the value in
/// place so the encoded order stays stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    entries: Vec<(String, QueryValue)>,
}

impl Filter {
    pub const PAGE: &'static str = "page";
    pub const PAGE_SIZE: &'static str = "pageSize";

    pub fn new() -> Self {
        Self::default()
    }

    /// A filter that starts with `page` and `pageSize`.
    pub fn paged(page: u32, page_size: u32) -> Self {
        Self::new().page(page).page_size(page_size)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn page(self, page: u32) -> Self {
        self.with(Self::PAGE, page)
    }

    pub fn page_size(self, page_size: u32) -> Self {
        self.with(Self::PAGE_SIZE, page_size)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `(page, pageSize)`, both required to be at least 1.
    pub fn pagination(&self) -> Result<(u64, u64), ApiError> {
        let page = self.positive(Self::PAGE)?;
        let page_size = self.positive(Self::PAGE_SIZE)?;
        Ok((page, page_size))
    }

    fn positive(&self, key: &str) -> Result<u64, ApiError> {
        let value = self
            .get(key)
            .filter(|v| !v.is_blank())
            .ok_or_else(|| ApiError::InvalidPagination(format!("`{key}` is required")))?;
        match value.as_u64() {
            Some(n) if n >= 1 => Ok(n),
            _ => Err(ApiError::InvalidPagination(format!(
                "`{key}` must be an integer >= 1, got `{value}`"
            ))),
        }
    }
}

/// Whether numeric zero counts as "unset".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ZeroPolicy {
    #[default]
    Preserve,
    Exclude,
}

/// Encoding rules for one list call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPolicy {
    zero: ZeroPolicy,
    overrides: Vec<(String, ZeroPolicy)>,
}

impl QueryPolicy {
    pub fn exclude_zero(exclude: bool) -> Self {
        Self {
            zero: if exclude {
                ZeroPolicy::Exclude
            } else {
                ZeroPolicy::Preserve
            },
            overrides: Vec::new(),
        }
    }

    /// Overrides the zero policy for a single field.
    pub fn with_field(mut self, field: impl Into<String>, policy: ZeroPolicy) -> Self {
        let field = field.into();
        self.overrides.retain(|(f, _)| *f != field);
        self.overrides.push((field, policy));
        self
    }

    pub fn zero_policy_for(&self, field: &str) -> ZeroPolicy {
        self.overrides
            .iter()
            .find(|(f, _)| f == field)
            .map_or(self.zero, |(_, p)| *p)
    }

    fn keeps(&self, key: &str, value: &QueryValue) -> bool {
        if value.is_blank() {
            return false;
        }
        !(value.is_zero() && self.zero_policy_for(key) == ZeroPolicy::Exclude)
    }
}

/// Encode the kept entries of `filter` as `k=v&k=v`, percent-encoding keys and
/// values independently.
pub fn encode_query(filter: &Filter, policy: &QueryPolicy) -> String {
    filter
        .iter()
        .filter(|(k, v)| policy.keeps(k, v))
        .map(|(k, v)| encode_pair(k, &v.to_string()))
        .collect::<Vec<_>>()
        .join("&")
}

pub(crate) fn encode_pair(key: &str, value: &str) -> String {
    format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
}

/// Split a query string back into decoded pairs, keeping order.
///
/// Segments that fail to percent-decode as UTF-8 are kept verbatim.
pub fn decode_query(query: &str) -> Vec<(String, String)> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let (k, v) = segment.split_once('=').unwrap_or((segment, ""));
            (decode_component(k), decode_component(v))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    urlencoding::decode(raw).map_or_else(|_| raw.to_string(), |s| s.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_dropped() {
        let filter = Filter::new()
            .with("username", "alice")
            .with("mobile", "")
            .with("email", None::<String>)
            .page(1)
            .page_size(10);
        let query = encode_query(&filter, &QueryPolicy::exclude_zero(true));
        assert_eq!(query, "username=alice&page=1&pageSize=10");
    }

    #[test]
    fn zero_follows_policy() {
        let filter = Filter::paged(1, 10).with("status", 0);
        assert_eq!(
            encode_query(&filter, &QueryPolicy::exclude_zero(true)),
            "page=1&pageSize=10"
        );
        assert_eq!(
            encode_query(&filter, &QueryPolicy::exclude_zero(false)),
            "page=1&pageSize=10&status=0"
        );
    }

    #[test]
    fn field_override_beats_default() {
        let policy = QueryPolicy::exclude_zero(true).with_field("parentId", ZeroPolicy::Preserve);
        let filter = Filter::paged(1, 10).with("parentId", 0u64).with("oeType", 0);
        assert_eq!(encode_query(&filter, &policy), "page=1&pageSize=10&parentId=0");
    }

    #[test]
    fn string_zero_is_not_numeric_zero() {
        let filter = Filter::new().with("code", "0");
        assert_eq!(encode_query(&filter, &QueryPolicy::exclude_zero(true)), "code=0");
    }

    #[test]
    fn keys_and_values_are_percent_encoded() {
        let filter = Filter::new().with("group name", "a&b=c/d");
        assert_eq!(
            encode_query(&filter, &QueryPolicy::default()),
            "group%20name=a%26b%3Dc%2Fd"
        );
    }

    #[test]
    fn set_replaces_in_place() {
        let filter = Filter::paged(1, 10).with("role", "admin").page(3);
        let keys: Vec<&str> = filter.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["page", "pageSize", "role"]);
        assert_eq!(filter.get("page"), Some(&QueryValue::UInt(3)));
    }

    #[test]
    fn decode_reverses_encode() {
        let filter = Filter::new()
            .with("path", "/api/v1/sysRole")
            .with("description", "列表 & more")
            .with("method", "GET");
        let query = encode_query(&filter, &QueryPolicy::default());
        let pairs = decode_query(&query);
        let expected: Vec<(String, String)> = filter
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(pairs, expected);
    }

    #[test]
    fn decode_tolerates_missing_value_and_leading_mark() {
        assert_eq!(
            decode_query("?a=1&&b"),
            vec![("a".to_string(), "1".to_string()), ("b".to_string(), String::new())]
        );
    }

    #[test]
    fn pagination_requires_both_fields() {
        assert!(matches!(
            Filter::new().page(1).pagination(),
            Err(ApiError::InvalidPagination(_))
        ));
        assert!(matches!(
            Filter::paged(0, 10).pagination(),
            Err(ApiError::InvalidPagination(_))
        ));
        assert!(matches!(
            Filter::paged(1, 0).pagination(),
            Err(ApiError::InvalidPagination(_))
        ));
        assert_eq!(Filter::paged(2, 20).pagination().unwrap(), (2, 20));
    }

    #[test]
    fn pagination_accepts_numeric_strings() {
        let filter = Filter::new().with("page", "2").with("pageSize", "5");
        assert_eq!(filter.pagination().unwrap(), (2, 5));
    }
}
