//! The response wrapper shared by every Grain endpoint.
//!
//! The server omits zero-valued fields and serializes empty lists as `null`,
//! so every field defaults and `data: null` decodes as `T::default()`.

use serde::{Deserialize, Deserializer, Serialize};

/// Application status code the server uses for success.
pub const SUCCESS_CODE: i64 = 2000;

/// `{ success, code, message, time, total, page, pageSize, data }`.
///
/// `success: false` is an ordinary value: the request reached the server and
/// the server refused it. Only transport problems surface as `ApiError`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    /// Server time in epoch milliseconds.
    #[serde(default)]
    pub time: i64,
    /// Size of the full matching set, independent of `page_size`.
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u64,
    #[serde(default, alias = "page_size")]
    pub page_size: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: T,
}

/// Reply of write operations; `data` is normally `null`.
pub type Ack = Envelope<Option<serde_json::Value>>;

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            success: self.success,
            code: self.code,
            message: self.message,
            time: self.time,
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            data: f(self.data),
        }
    }
}

impl<T: Default> Envelope<T> {
    /// A success envelope around `data`, used when an endpoint answers with a
    /// bare payload instead of an envelope.
    pub fn wrap(data: T) -> Self {
        Envelope {
            success: true,
            code: SUCCESS_CODE,
            message: String::new(),
            time: 0,
            total: 0,
            page: 0,
            page_size: 0,
            data,
        }
    }
}

/// Payload of by-id lookups: some endpoints answer with the record, others
/// with a single-element array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_first(self) -> Option<T> {
        match self {
            OneOrMany::Many(items) => items.into_iter().next(),
            OneOrMany::One(item) => Some(item),
        }
    }
}

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_envelope_decodes_all_fields() {
        let body = r#"{"success":true,"code":2000,"message":"成功","time":1700000000000,
            "total":42,"page":2,"pageSize":10,"data":["a","b"]}"#;
        let env: Envelope<Vec<String>> = serde_json::from_str(body).unwrap();
        assert!(env.is_success());
        assert_eq!(env.code, SUCCESS_CODE);
        assert_eq!(env.total, 42);
        assert_eq!(env.page, 2);
        assert_eq!(env.page_size, 10);
        assert_eq!(env.data, vec!["a", "b"]);
    }

    #[test]
    fn snake_case_page_size_is_accepted() {
        let env: Envelope<Vec<u8>> =
            serde_json::from_str(r#"{"success":true,"code":2000,"page_size":5}"#).unwrap();
        assert_eq!(env.page_size, 5);
        assert!(env.data.is_empty());
    }

    #[test]
    fn null_data_becomes_default() {
        let env: Envelope<Vec<u8>> =
            serde_json::from_str(r#"{"success":true,"code":2000,"data":null}"#).unwrap();
        assert!(env.data.is_empty());
    }

    #[test]
    fn failure_envelope_is_plain_data() {
        let env: Ack =
            serde_json::from_str(r#"{"success":false,"code":4001,"message":"删除角色失败"}"#).unwrap();
        assert!(!env.is_success());
        assert_eq!(env.code, 4001);
        assert_eq!(env.data, None);
    }

    #[test]
    fn one_or_many_takes_first_element() {
        let many: OneOrMany<u32> = serde_json::from_str("[7, 8]").unwrap();
        assert_eq!(many.into_first(), Some(7));
        let one: OneOrMany<u32> = serde_json::from_str("7").unwrap();
        assert_eq!(one.into_first(), Some(7));
        let none: OneOrMany<u32> = serde_json::from_str("[]").unwrap();
        assert_eq!(none.into_first(), None);
    }

    #[test]
    fn map_keeps_metadata() {
        let env: Envelope<Vec<u32>> =
            serde_json::from_str(r#"{"success":true,"code":2000,"total":3,"data":[1,2,3]}"#)
                .unwrap();
        let mapped = env.map(|d| d.len());
        assert_eq!(mapped.total, 3);
        assert_eq!(mapped.data, 3);
    }
}
