/// Builds [`Value`](crate::Value) data from literal syntax.
///
/// ```
/// use serializable_data::{data, Value};
///
/// let value = data!({
///     "name": "Phil Myman",
///     "age": 42,
///     "notes": null,
///     "tags": ["a", null, 3.5]
/// });
/// assert_eq!(value["name"].as_string().as_deref(), Some("Phil Myman"));
/// assert!(value["notes"].is_absent());
/// assert_eq!(value["tags"].len(), 3);
/// assert_eq!(data!(null), Value::Absent);
/// ```
///
/// Entries must be single token trees, so negative numbers and other
/// expressions go in parentheses: `data!([(-1), (a + b)])`. Anything that is
/// not a literal goes through [`Storable`](crate::Storable).
#[macro_export]
macro_rules! data {
    (null) => {
        $crate::Value::Absent
    };
    ([ $( $item:tt ),* $(,)? ]) => {
        $crate::Value::Sequence(::std::vec![ $( $crate::data!($item) ),* ])
    };
    ({ $( $key:literal : $value:tt ),* $(,)? }) => {{
        #[allow(unused_mut)]
        let mut mapping = $crate::Mapping::new();
        $(
            mapping.insert(::std::string::String::from($key), $crate::data!($value));
        )*
        $crate::Value::Mapping(mapping)
    }};
    ($other:expr) => {
        $crate::Value::from_native(&$other)
    };
}
