#![cfg(test)]

use crate::{
    data, from_data, from_data_as, to_data, Binary, DeserializeMode, Error, JsonConfig, JsonStyle,
    Retrievable, Storable, Value,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Number};
use std::collections::{BTreeMap, HashMap};
use time::{
    macros::{datetime, offset},
    Duration,
};
use url::Url;
use uuid::Uuid;

use crate as serializable_data;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
enum Kind {
    Admin,
    Guest(u32),
    Member { since: i32 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Person {
    name: String,
    age: u8,
    tags: Vec<String>,
    nickname: Option<String>,
    kind: Kind,
}

#[derive(Debug, Clone, PartialEq, Storable, Retrievable)]
struct Note {
    id: u32,
    #[storable(rename = "body")]
    text: String,
    pinned: Option<bool>,
    #[storable(skip)]
    cached: usize,
}

#[test]
fn test_simple() {
    let value = data!({
        "name": "Phil Myman",
        "age": 42,
        "score": 3.5,
        "active": true,
        "tags": ["a", "b"],
        "nested": {"x": (-1), "y": null}
    });
    let bytes = value.to_json_bytes().unwrap();
    let restored = Value::from_json_bytes(&bytes).unwrap();
    assert_eq!(restored, value);
    assert_eq!(restored["nested"]["x"].as_int(), Some(-1));
    assert!(restored["nested"]["y"].is_absent());
    assert_eq!(restored["nested"].len(), 2);

    let compact = value.to_json_bytes_with(&JsonConfig::compact()).unwrap();
    assert_eq!(Value::from_json_bytes(&compact).unwrap(), value);
}

#[test]
fn test_timestamp() {
    let date = datetime!(2010-03-18 19:05:15.75 UTC);
    let value = Value::from_timestamp(date);
    assert_eq!(value.as_string().as_deref(), Some("2010-03-18 19:05:15"));

    let bytes = Value::sequence().item(value).to_json_bytes().unwrap();
    let restored = Value::from_json_bytes(&bytes).unwrap();
    assert_eq!(restored[0].as_string().as_deref(), Some("2010-03-18 19:05:15"));
    assert_eq!(restored[0].as_date(), Some(datetime!(2010-03-18 19:05:15 UTC)));

    let shifted = datetime!(2010-03-18 19:05:15 UTC).to_offset(offset!(+2));
    assert_eq!(
        Value::from(shifted).as_string().as_deref(),
        Some("2010-03-18 19:05:15")
    );
    assert_eq!(Value::from("2010-03-18").as_date(), None);
}

#[test]
fn test_coercion() {
    let value = Value::from("5");
    assert_eq!(value.as_bool(), Some(true));
    assert_eq!(value.as_int(), Some(5));
    assert_eq!(value.as_uint(), Some(5));
    assert_eq!(value.as_float(), Some(5.0));
    assert_eq!(value.as_double(), Some(5.0));
    assert_eq!(value.as_number(), Some(Number::from(5i64)));
    assert_eq!(value.as_string().as_deref(), Some("5"));
    assert_eq!(value.as_date(), None);
    assert_eq!(value.as_url(), None);
    assert_eq!(value.coerce::<i32>(), Some(5));
    assert_eq!(value.coerce::<u8>(), Some(5));

    for (text, expected) in [
        ("0", false),
        ("00", false),
        ("no", false),
        ("", false),
        ("yes", true),
        ("True", true),
        ("  t", true),
        ("-01", true),
        ("+7", true),
    ] {
        assert_eq!(Value::from(text).as_bool(), Some(expected), "{:?}", text);
    }
    assert_eq!(Value::from(1).as_bool(), Some(true));
    assert_eq!(Value::from(0).as_bool(), Some(false));

    assert_eq!(Value::from(3.7).as_int(), Some(3));
    assert_eq!(Value::from("3.7").as_int(), Some(3));
    assert_eq!(Value::from(" 12 ").as_int(), Some(12));
    assert_eq!(Value::from("abc").as_int(), None);
    assert_eq!(Value::from("inf").as_double(), None);
    assert_eq!(Value::from(-4).as_uint(), None);
    assert_eq!(Value::from(300).coerce::<u8>(), None);

    assert_eq!(Value::from(9_223_372_036_854_775_808u64).as_int(), None);
    assert_eq!(i64::from_data(&Value::from(9_223_372_036_854_775_808u64)), None);
    assert_eq!(Value::from("9223372036854775807").as_int(), Some(i64::MAX));
    assert_eq!(Value::from("-9223372036854775808").as_int(), Some(i64::MIN));
    assert_eq!(Value::from("9.2e18").as_int(), Some(9_200_000_000_000_000_000));
    assert_eq!(Value::from(-9.3e18).as_int(), None);
    assert_eq!(Value::from("1.8446744073709552e19").as_uint(), None);
    assert_eq!(Value::from("18446744073709551615").as_uint(), Some(u64::MAX));
    assert_eq!(Value::from("1.8e19").as_uint(), Some(18_000_000_000_000_000_000));
    assert!(from_data::<i64>(&Value::from("9.3e18")).is_err());
    assert_eq!(Value::from(true).as_string().as_deref(), Some("true"));
    assert_eq!(Value::from(5.0).as_string().as_deref(), Some("5.0"));

    assert_eq!(Value::from("null").as_string(), None);
    assert_eq!(Value::from("null").as_int(), None);
    assert_eq!(Value::Absent.as_string(), None);
    assert_eq!(Value::Absent.as_bool(), None);
    assert_eq!(Value::Absent.coerce::<Value>(), None);
    assert_eq!(Value::Absent.coerce::<Option<i32>>(), None);

    let list = data!([1, 2]);
    assert_eq!(list.as_int(), None);
    assert_eq!(list.as_string(), None);
    assert_eq!(list.coerce::<Vec<i32>>(), Some(vec![1, 2]));
    assert_eq!(list.coerce::<HashMap<String, i32>>(), None);
    let map = data!({"a": 1});
    assert_eq!(map.coerce::<Vec<i32>>(), None);
    assert_eq!(
        map.coerce::<BTreeMap<String, String>>(),
        Some(BTreeMap::from([("a".to_owned(), "1".to_owned())]))
    );

    let url = Url::parse("https://example.com/a?b=c").unwrap();
    assert_eq!(Value::from(url.clone()).as_url(), Some(url.clone()));
    assert_eq!(Value::from(url.as_str()).as_url(), Some(url));

    let id = Uuid::new_v4();
    assert_eq!(Value::from(id).as_identifier(), Some(id));
    assert_eq!(Value::from(id.to_string()).as_identifier(), Some(id));
    assert_eq!(Value::from("not an id").as_identifier(), None);
}

#[test]
fn test_binary() {
    let value = Value::from_binary(vec![1, 2, 3]);
    assert_eq!(value.to_json_string(), "AQID");
    assert_eq!(value.as_binary(), Some(vec![1, 2, 3]));

    let data = Value::mapping().with("blob", Binary(vec![1, 2, 3]));
    let bytes = data.to_json_bytes_with(&JsonConfig::compact()).unwrap();
    assert_eq!(bytes, br#"{"blob":"AQID"}"#);
    let restored = Value::from_json_bytes(&bytes).unwrap();
    assert_eq!(restored["blob"].as_binary(), Some(vec![1, 2, 3]));
    assert_eq!(restored["blob"].coerce::<Binary>(), Some(Binary(vec![1, 2, 3])));
    assert_eq!(Value::from("***").as_binary(), None);
}

#[test]
fn test_promotion() {
    let mut value = Value::Absent;
    value.set("name", "Phil Myman").unwrap();
    assert!(value.is_mapping());
    assert_eq!(value.len(), 1);
    assert_eq!(value["name"].as_string().as_deref(), Some("Phil Myman"));

    let mut value = Value::Absent;
    value.set_index(0, 7).unwrap();
    assert!(value.is_sequence());
    assert_eq!(value, data!([7]));

    let mut value = Value::Absent;
    assert_eq!(
        value.set_index(2, 7),
        Err(Error::IndexOutOfRange { index: 2, len: 0 })
    );
    assert!(value.is_absent());

    let mut value = Value::from(5);
    assert_eq!(
        value.set("a", 1),
        Err(Error::TypeMismatch {
            expected: "mapping",
            found: "integer"
        })
    );
    assert_eq!(
        value.set_index(0, 1),
        Err(Error::TypeMismatch {
            expected: "sequence",
            found: "integer"
        })
    );
    assert_eq!(value, Value::from(5));

    let mut value = data!([1, 2, 3]);
    value.set_index(1, "x").unwrap();
    assert_eq!(value, data!([1, "x", 3]));
    value.set_index(3, 4).unwrap();
    assert_eq!(value, data!([1, "x", 3, 4]));
    assert_eq!(
        value.set_index(9, 0),
        Err(Error::IndexOutOfRange { index: 9, len: 4 })
    );
    assert!(matches!(
        data!({"a": 1}).set_index(0, 1),
        Err(Error::TypeMismatch { .. })
    ));
}

#[test]
fn test_append() {
    let mut value = data!({"a": 1});
    assert_eq!(
        value.append(2),
        Err(Error::TypeMismatch {
            expected: "sequence",
            found: "mapping"
        })
    );
    let mut value = Value::from("text");
    assert!(matches!(value.append(2), Err(Error::TypeMismatch { .. })));
    let mut value = Value::Absent;
    assert!(matches!(value.append(2), Err(Error::TypeMismatch { .. })));
    assert!(value.is_absent());

    let mut value = data!([1, 2]);
    value.append(3).unwrap();
    assert_eq!(value.len(), 3);
    assert_eq!(value[2].as_int(), Some(3));
    assert_eq!(value, data!([1, 2, 3]));
}

#[test]
fn test_null_handling() {
    assert_eq!(Value::Absent.to_json_bytes(), None);
    assert_eq!(Value::Absent.to_native_tree(), None);
    assert_eq!(Value::Absent.to_json_string(), "");

    let value = Value::Sequence(vec![Value::Absent]);
    assert_eq!(
        value.to_json_bytes_with(&JsonConfig::compact()).unwrap(),
        b"[null]"
    );
    assert_eq!(value.to_native_tree(), Some(json!([null])));
    assert_eq!(data!([null]), value);

    assert!(Value::from_native(&None::<i32>).is_absent());
    assert_eq!(
        Value::from_native(&vec![Some(1), None]).to_native_tree(),
        Some(json!([1, null]))
    );
    assert_eq!(
        data!({"a": null}).to_native_tree(),
        Some(json!({"a": null}))
    );
    assert!(Value::from_json_str("null").unwrap().is_absent());

    let broken = data!([(f64::NAN), (f64::INFINITY)]);
    assert_eq!(broken.to_json_bytes(), None);
    assert_eq!(broken.to_native_tree(), None);
    assert_eq!(broken.to_json_string(), "");
    let nested = data!({"ok": 1, "inner": {"bad": (f32::NEG_INFINITY)}});
    assert_eq!(nested.to_json_bytes_with(&JsonConfig::compact()), None);
    assert!(data!([1.5, (f64::MAX)]).to_json_bytes().is_some());
}

#[test]
fn test_end_to_end() {
    let json = r#"{"name":"Phil Myman","createdDate":"2010-03-18 19:05:15"}"#;
    let now = datetime!(2019-06-01 12:00:00 UTC);
    let lower = now - Duration::days(365 * 10);
    let upper = now - Duration::days(365 * 5);
    let check = |value: &Value| {
        assert_eq!(value["name"].as_string().as_deref(), Some("Phil Myman"));
        let created = value["createdDate"].as_date().unwrap();
        assert!(created > lower);
        assert!(created < upper);
    };

    let value = Value::from_json_str(json).unwrap();
    check(&value);
    let bytes = value.to_json_bytes().unwrap();
    let restored = Value::from_json_bytes(&bytes).unwrap();
    check(&restored);
    assert_eq!(restored, value);
}

#[test]
fn test_json() {
    let value = Value::from_json_str(r#"{"b":1,"a":[true,2.5,"x"]}"#).unwrap();
    assert_eq!(
        value.to_json_bytes_with(&JsonConfig::compact()).unwrap(),
        br#"{"b":1,"a":[true,2.5,"x"]}"#
    );
    assert_eq!(
        data!({"a": [1]}).to_json_string(),
        "{\n  \"a\": [\n    1\n  ]\n}"
    );
    let config = JsonConfig::default().with_style(JsonStyle::Pretty { indent: 4 });
    assert!(config.style.is_pretty());
    assert_eq!(
        data!({"a": 1}).to_json_bytes_with(&config).unwrap(),
        b"{\n    \"a\": 1\n}"
    );

    assert_eq!(Value::from("text").to_json_string(), "text");
    assert_eq!(Value::from(5.0).to_json_string(), "5.0");
    assert_eq!(Value::from_json_str("5").unwrap().as_int(), Some(5));
    assert_eq!(
        Value::from_json_str("\"text\"").unwrap().as_string().as_deref(),
        Some("text")
    );

    assert!(matches!(Value::from_json_str("{"), Err(Error::Parsing(_))));
    assert!(matches!(
        Value::from_json_bytes(b"[1,"),
        Err(Error::Parsing(_))
    ));
    assert!(Value::safe_from_json_str("{").is_absent());
    assert!(Value::safe_from_json_bytes(b"").is_absent());

    let tree = json!({"list": [1, {"x": null}]});
    let value = Value::from_native_tree(tree.clone()).unwrap();
    assert!(value["list"][1]["x"].is_absent());
    assert_eq!(value.to_native_tree(), Some(tree));
    assert_eq!(
        Value::safe_from_native_tree(json!("plain")).as_string().as_deref(),
        Some("plain")
    );
}

#[test]
fn test_equality() {
    assert_eq!(Value::from(5), Value::from("5"));
    assert_eq!(Value::from(5u8), Value::from(5i64));
    assert_ne!(Value::from(5), Value::from(5.0));
    assert_eq!(Value::Absent, Value::Absent);
    assert_ne!(Value::Absent, Value::from("null"));
    assert_ne!(Value::Absent, Value::sequence());
    assert_ne!(Value::mapping(), Value::sequence());
    assert_eq!(data!({"a": 1, "b": 2}), data!({"b": 2, "a": 1}));
    assert_ne!(data!([1, 2]), data!([2, 1]));
    assert_ne!(data!({"a": 1}), data!({"a": 1, "b": null}));
}

#[test]
fn test_display() {
    let value = data!({"a": 1, "b": [true, null], "c": {}});
    assert_eq!(value.to_string(), "[a=1,b=[true,null],c=[]]");
    assert_eq!(value.describe(), value.to_string());
    assert_eq!(Value::from(5.0).describe(), "5.0");
    assert_eq!(Value::from(3.05f32).to_string(), "3.05");
    assert_eq!(Value::from(-0.5).to_string(), "-0.5");
    assert_eq!(Value::Absent.to_string(), "null");
}

#[test]
fn test_path() {
    let mut value = data!({
        "name": "Phil Myman",
        "list": [10, 20],
        "a/b": {"~": [1, 2]}
    });
    assert!(value["missing"].is_absent());
    assert!(value[5].is_absent());
    assert!(value["name"][0].is_absent());
    assert!(value["list"]["x"].is_absent());
    assert_eq!(value["list"][1].as_int(), Some(20));
    assert_eq!(value["list"].get_index(0).and_then(Value::as_int), Some(10));
    assert_eq!(value["list"].get_index(2), None);
    assert_eq!(
        value["list"].at(3),
        Err(Error::IndexOutOfRange { index: 3, len: 2 })
    );
    assert!(matches!(value["name"].at(0), Err(Error::TypeMismatch { .. })));
    assert_eq!(value.pointer("/a~1b/~0/1"), Some(&data!(2)));
    assert_eq!(value.pointer("/list/7"), None);
    assert_eq!(value.pointer(""), Some(&value));
    assert_eq!(value.pointer("list"), None);

    value.get_mut("list").unwrap().append(30).unwrap();
    assert_eq!(value["list"].len(), 3);
    assert_eq!(value.remove("name"), Some(Value::from("Phil Myman")));
    assert_eq!(value.remove("name"), None);
    assert_eq!(value.get("name"), None);

    let built = Value::mapping()
        .with("x", 1)
        .with("y", Value::sequence().item("a").item(Value::Absent));
    assert_eq!(built, data!({"x": 1, "y": ["a", null]}));
    assert_eq!(Value::from(1).with("ignored", 2), Value::from(1));
    assert_eq!(data!([1]).with("ignored", 2), data!([1]));
    assert_eq!(data!({"a": 1}).item(2), data!({"a": 1}));
    assert_eq!(Value::Absent.item(2), data!([2]));
    assert_eq!(Value::Absent.with("a", 2), data!({"a": 2}));
}

#[test]
fn test_query() {
    let value = data!({
        "user": {"name": "a b", "ids": [1, 2]},
        "empty": [],
        "none": null
    });
    assert_eq!(
        value.to_url_query_string(),
        "user[name]=a%20b&user[ids][]=1&user[ids][]=2&none="
    );
    assert_eq!(Value::from("a&b").to_url_query_string(), "a%26b");
    assert_eq!(data!(["x", "y z"]).to_url_query_string(), "x&y%20z");
    assert_eq!(Value::Absent.to_url_query_string(), "");

    let parsed =
        Value::from_url_query_string("user[name]=a+b&user[ids][]=1&user[ids][]=2").unwrap();
    assert_eq!(parsed, data!({"user": {"name": "a b", "ids": ["1", "2"]}}));
    assert_eq!(
        parsed.to_url_query_string(),
        "user[name]=a%20b&user[ids][]=1&user[ids][]=2"
    );
    assert_eq!(
        Value::from_url_query_string("list[][x]=1&list[][x]=2").unwrap(),
        data!({"list": [{"x": "1"}, {"x": "2"}]})
    );
    assert_eq!(
        Value::from_url_query_string("key=&flag[a]").unwrap(),
        data!({"key": "", "flag": {"a": null}})
    );

    assert_eq!(
        Value::from_url_query_string("one").unwrap(),
        Value::from("one")
    );
    assert_eq!(
        Value::from_url_query_string("a&b%20c").unwrap(),
        data!(["a", "b c"])
    );
    assert!(Value::from_url_query_string("").unwrap().is_absent());

    assert!(matches!(
        Value::from_url_query_string("a=1&flag"),
        Err(Error::Parsing(_))
    ));
    assert!(matches!(
        Value::from_url_query_string("a=1&a[b]=2"),
        Err(Error::TypeMismatch { .. })
    ));
    assert!(matches!(
        Value::from_url_query_string("%ff=1"),
        Err(Error::Parsing(_))
    ));
    assert!(Value::safe_from_url_query_string("%ff=1").is_absent());
}

#[test]
fn test_serde() {
    let person = Person {
        name: "Phil Myman".to_owned(),
        age: 42,
        tags: vec!["a".to_owned()],
        nickname: None,
        kind: Kind::Admin,
    };
    let value = to_data(&person).unwrap();
    assert_eq!(value["name"].as_string().as_deref(), Some("Phil Myman"));
    assert_eq!(value["kind"], Value::from("Admin"));
    assert!(value["nickname"].is_absent());
    assert_eq!(from_data::<Person>(&value).unwrap(), person);

    let guest = Person {
        kind: Kind::Guest(3),
        nickname: Some("phil".to_owned()),
        ..person.clone()
    };
    let value = Value::from_serialize(&guest).unwrap();
    assert_eq!(value["kind"], data!({"Guest": 3}));
    assert_eq!(from_data::<Person>(&value).unwrap(), guest);

    let member = Person {
        kind: Kind::Member { since: 2010 },
        ..person.clone()
    };
    let value = to_data(&member).unwrap();
    assert_eq!(value["kind"], data!({"Member": {"since": 2010}}));
    let json = value.to_json_bytes().unwrap();
    let restored = Value::from_json_bytes(&json).unwrap();
    assert_eq!(from_data::<Person>(&restored).unwrap(), member);

    let loose = data!({
        "name": 7,
        "age": "42",
        "tags": [],
        "kind": "Admin"
    });
    let read = from_data::<Person>(&loose).unwrap();
    assert_eq!(read.name, "7");
    assert_eq!(read.age, 42);
    assert_eq!(read.nickname, None);
    assert!(from_data_as::<Person>(&loose, DeserializeMode::Exact).is_err());

    let mut keyed = BTreeMap::new();
    keyed.insert(1, "one");
    assert_eq!(to_data(&keyed).unwrap(), data!({"1": "one"}));
    let mut bad = HashMap::new();
    bad.insert(vec![1], 1);
    assert!(matches!(to_data(&bad), Err(Error::Parsing(_))));
    assert!(Value::safe_from_serialize(&bad).is_absent());
    assert!(matches!(to_data(&u128::MAX), Err(Error::Parsing(_))));
}

#[test]
fn test_storable() {
    let value = Value::from_native(&vec![1, 2, 3]);
    assert_eq!(value, data!([1, 2, 3]));
    assert_eq!(Value::from_native(&value), value);
    assert_eq!(Value::from_native("text"), Value::from("text"));

    let mut map = HashMap::new();
    map.insert("k".to_owned(), vec![true]);
    assert_eq!(Value::from_native(&map), data!({"k": [true]}));
    assert_eq!(HashMap::<String, Vec<bool>>::from_data(&data!({"k": [true]})), Some(map));

    assert_eq!(vec![1, 2].serialized_string(), "[\n  1,\n  2\n]");
    assert_eq!(5i32.serialized_string(), "5");
    assert_eq!(Vec::<i32>::from_serialized_string("[1, \"2\"]"), Some(vec![1, 2]));
    assert_eq!(Vec::<i32>::from_serialized_data(b"{"), None);
    assert_eq!(
        i32::try_from_data(&data!([1])),
        Err(Error::FailedToInitializeObject("i32".to_owned()))
    );
    assert_eq!(char::from_data(&Value::from("x")), Some('x'));
    assert_eq!(char::from_data(&Value::from("xy")), None);
    assert_eq!(Option::<i32>::from_data(&Value::Absent), Some(None));
    assert_eq!(Box::<i32>::from_data(&Value::from(4)), Some(Box::new(4)));

    let note = Note {
        id: 7,
        text: "buy milk".to_owned(),
        pinned: None,
        cached: 99,
    };
    let data = note.get_data();
    assert_eq!(data, data!({"id": 7, "body": "buy milk", "pinned": null}));
    let restored = Note::from_data(&data).unwrap();
    assert_eq!(restored.text, "buy milk");
    assert_eq!(restored.cached, 0);
    assert_eq!(
        Note::try_from_data(&data!({"body": "x"})),
        Err(Error::MissingRequiredField("id".to_owned()))
    );
    assert_eq!(
        Note::from_serialized_string(r#"{"id":"8","body":"x"}"#).map(|v| v.id),
        Some(8)
    );
    assert_eq!(data!(note.clone()), data);
}
