//! Context capabilities consumed by the default evaluator and by actions.
//!
//! A context may expose key lookup (map-like), named-field lookup (struct-like),
//! both or neither. The default evaluator probes key lookup first, then fields.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use serde_json::{Map, Value};

/// Map-style access: `context[key]`.
pub trait KeyLookup {
    fn get_key(&self, key: &str) -> Option<Value>;
}

/// Attribute-style access: `context.name`.
pub trait FieldLookup {
    fn get_field(&self, name: &str) -> Option<Value>;
}

/// Value handed to a traversal.
pub trait Context {
    fn as_keyed(&self) -> Option<&dyn KeyLookup> {
        None
    }

    fn as_fields(&self) -> Option<&dyn FieldLookup> {
        None
    }

    /// String form used as the traversal cache key.
    ///
    /// Distinct contexts with the same string form share a cache slot.
    fn cache_key(&self) -> String;
}

/// Truthiness of a JSON value: null, false, zero, and empty strings or
/// collections are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

impl KeyLookup for Value {
    fn get_key(&self, key: &str) -> Option<Value> {
        self.as_object().and_then(|o| o.get(key)).cloned()
    }
}

impl Context for Value {
    fn as_keyed(&self) -> Option<&dyn KeyLookup> {
        if self.is_object() {
            Some(self)
        } else {
            None
        }
    }

    fn cache_key(&self) -> String {
        self.to_string()
    }
}

// serde_json::Map is sorted by key, so equal maps stringify identically.
fn map_cache_key<'a, K, V, I>(entries: I) -> String
where
    K: Borrow<str> + 'a,
    V: Clone + Into<Value> + 'a,
    I: Iterator<Item = (&'a K, &'a V)>,
{
    let map: Map<String, Value> = entries
        .map(|(k, v)| (k.borrow().to_string(), v.clone().into()))
        .collect();
    Value::Object(map).to_string()
}

impl<K, V> KeyLookup for HashMap<K, V>
where
    K: Borrow<str> + Eq + Hash,
    V: Clone + Into<Value>,
{
    fn get_key(&self, key: &str) -> Option<Value> {
        self.get(key).cloned().map(Into::into)
    }
}

impl<K, V> Context for HashMap<K, V>
where
    K: Borrow<str> + Eq + Hash,
    V: Clone + Into<Value>,
{
    fn as_keyed(&self) -> Option<&dyn KeyLookup> {
        Some(self)
    }

    fn cache_key(&self) -> String {
        map_cache_key(self.iter())
    }
}

impl<K, V> KeyLookup for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: Clone + Into<Value>,
{
    fn get_key(&self, key: &str) -> Option<Value> {
        self.get(key).cloned().map(Into::into)
    }
}

impl<K, V> Context for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: Clone + Into<Value>,
{
    fn as_keyed(&self) -> Option<&dyn KeyLookup> {
        Some(self)
    }

    fn cache_key(&self) -> String {
        map_cache_key(self.iter())
    }
}

impl Context for () {
    fn cache_key(&self) -> String {
        "()".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(null), false)]
    #[case(json!(false), false)]
    #[case(json!(true), true)]
    #[case(json!(0), false)]
    #[case(json!(0.0), false)]
    #[case(json!(7), true)]
    #[case(json!(""), false)]
    #[case(json!("x"), true)]
    #[case(json!([]), false)]
    #[case(json!([1]), true)]
    #[case(json!({}), false)]
    #[case(json!({"a": 1}), true)]
    fn test_is_truthy(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(is_truthy(&value), expected);
    }

    #[test]
    fn given_json_object_when_probing_then_exposes_key_lookup() {
        let ctx = json!({"ok": true});
        let keyed = ctx.as_keyed().expect("object is keyed");
        assert_eq!(keyed.get_key("ok"), Some(json!(true)));
        assert_eq!(keyed.get_key("missing"), None);
        assert!(ctx.as_fields().is_none());
    }

    #[test]
    fn given_json_scalar_when_probing_then_has_no_lookup() {
        let ctx = json!(42);
        assert!(ctx.as_keyed().is_none());
        assert!(ctx.as_fields().is_none());
    }

    #[test]
    fn given_hashmaps_with_same_entries_when_keying_then_keys_match() {
        let mut a: HashMap<&str, bool> = HashMap::new();
        a.insert("b", true);
        a.insert("a", false);
        let mut b: HashMap<&str, bool> = HashMap::new();
        b.insert("a", false);
        b.insert("b", true);

        assert_eq!(a.cache_key(), b.cache_key());
        assert_eq!(a.cache_key(), r#"{"a":false,"b":true}"#);
    }

    #[test]
    fn given_btreemap_and_json_with_same_entries_when_keying_then_keys_match() {
        let mut map: BTreeMap<String, i64> = BTreeMap::new();
        map.insert("count".to_string(), 3);
        assert_eq!(map.cache_key(), json!({"count": 3}).cache_key());
    }
}
