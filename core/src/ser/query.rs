use crate::value::data::Value;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything but unreserved characters gets escaped.
pub const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub fn url_encode(text: &str) -> String {
    utf8_percent_encode(text, QUERY_COMPONENT).to_string()
}

impl Value {
    /// Flattens data into `key=value&key2=value2` form, with nested paths
    /// written PHP style: `outer[inner]=value` and `outer[]=value`.
    ///
    /// ```
    /// use serializable_data::data;
    ///
    /// let value = data!({"name": "Phil Myman", "tags": ["a", "b"]});
    /// assert_eq!(
    ///     value.to_url_query_string(),
    ///     "name=Phil%20Myman&tags[]=a&tags[]=b",
    /// );
    /// ```
    pub fn to_url_query_string(&self) -> String {
        let mut parts = vec![];
        collect(self, None, &mut parts);
        parts.join("&")
    }
}

fn collect(value: &Value, key: Option<String>, parts: &mut Vec<String>) {
    match value {
        Value::Absent => {
            if let Some(key) = key {
                parts.push(format!("{}=", key));
            }
        }
        Value::Scalar(v) => {
            let v = url_encode(&v.to_string());
            parts.push(match key {
                Some(key) => format!("{}={}", key, v),
                None => v,
            });
        }
        Value::Sequence(list) => {
            let key = key.map(|key| format!("{}[]", key));
            for item in list {
                collect(item, key.clone(), parts);
            }
        }
        Value::Mapping(map) => {
            for (k, v) in map {
                let k = url_encode(k);
                let k = match &key {
                    Some(prefix) => format!("{}[{}]", prefix, k),
                    None => k,
                };
                collect(v, Some(k), parts);
            }
        }
    }
}
