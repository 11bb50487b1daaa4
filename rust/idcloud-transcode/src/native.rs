use indexmap::IndexMap;
use serde_json::{Number, Value};

/// Members of a [`Native::Object`], in insertion order.
pub type NativeMap = IndexMap<String, Native>;

/// A value in native form: the shape of a JSON tree, plus byte buffers.
///
/// This is what the platform credential primitive consumes and produces.
/// Objects preserve member order so that a transcoded request reads like the
/// wire request it came from.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Native {
    /// An unset value.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A JSON number.
    Number(Number),
    /// Text.
    String(String),
    /// A byte buffer (`ArrayBuffer` / `BufferSource` on the web).
    Bytes(Vec<u8>),
    /// An ordered list.
    Array(Vec<Native>),
    /// A string-keyed dictionary.
    Object(NativeMap),
}

impl Native {
    /// An empty object.
    pub fn object() -> Self {
        Native::Object(NativeMap::new())
    }

    /// Returns `true` for [`Native::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Native::Null)
    }

    /// Look up an object member; `None` for non-objects and missing keys.
    pub fn get(&self, key: &str) -> Option<&Native> {
        match self {
            Native::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Mutable variant of [`Native::get`].
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Native> {
        match self {
            Native::Object(map) => map.get_mut(key),
            _ => None,
        }
    }

    /// Follow a chain of object keys.
    pub fn pointer<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> Option<&Native> {
        keys.into_iter().try_fold(self, |node, key| node.get(key))
    }

    /// Insert an object member, returning the value it replaced.
    ///
    /// Does nothing (and returns `None`) when `self` is not an object.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Native>) -> Option<Native> {
        match self {
            Native::Object(map) => map.insert(key.into(), value.into()),
            _ => None,
        }
    }

    /// Remove an object member, keeping the order of the others.
    pub fn remove(&mut self, key: &str) -> Option<Native> {
        match self {
            Native::Object(map) => map.shift_remove(key),
            _ => None,
        }
    }

    /// Return the object member at `key`, creating an empty object there if
    /// it is missing or not an object.
    ///
    /// Returns `None` when `self` is not an object.
    pub fn entry_object(&mut self, key: &str) -> Option<&mut Native> {
        let Native::Object(map) = self else {
            return None;
        };
        let member = map.entry(key.to_owned()).or_insert_with(Native::object);
        if !matches!(member, Native::Object(_)) {
            *member = Native::object();
        }
        Some(member)
    }

    /// The text of a [`Native::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Native::String(text) => Some(text),
            _ => None,
        }
    }

    /// The contents of a [`Native::Bytes`].
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Native::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// The value of a [`Native::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Native::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// The members of a [`Native::Object`].
    pub fn as_object(&self) -> Option<&NativeMap> {
        match self {
            Native::Object(map) => Some(map),
            _ => None,
        }
    }

    /// The elements of a [`Native::Array`].
    pub fn as_array(&self) -> Option<&[Native]> {
        match self {
            Native::Array(items) => Some(items),
            _ => None,
        }
    }
}

/// Lifts a JSON tree into native form without touching any field.
///
/// Strings stay strings; use [`crate::decode`] to turn binary fields into
/// buffers.
impl From<Value> for Native {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Native::Null,
            Value::Bool(flag) => Native::Bool(flag),
            Value::Number(number) => Native::Number(number),
            Value::String(text) => Native::String(text),
            Value::Array(items) => Native::Array(items.into_iter().map(Native::from).collect()),
            Value::Object(map) => Native::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Native::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Native {
    fn from(flag: bool) -> Self {
        Native::Bool(flag)
    }
}

impl From<i64> for Native {
    fn from(number: i64) -> Self {
        Native::Number(number.into())
    }
}

impl From<&str> for Native {
    fn from(text: &str) -> Self {
        Native::String(text.to_owned())
    }
}

impl From<String> for Native {
    fn from(text: String) -> Self {
        Native::String(text)
    }
}

impl From<Vec<u8>> for Native {
    fn from(bytes: Vec<u8>) -> Self {
        Native::Bytes(bytes)
    }
}

impl From<&[u8]> for Native {
    fn from(bytes: &[u8]) -> Self {
        Native::Bytes(bytes.to_vec())
    }
}

impl From<Vec<Native>> for Native {
    fn from(items: Vec<Native>) -> Self {
        Native::Array(items)
    }
}

impl From<NativeMap> for Native {
    fn from(map: NativeMap) -> Self {
        Native::Object(map)
    }
}

impl<const N: usize> From<[(&str, Native); N]> for Native {
    fn from(members: [(&str, Native); N]) -> Self {
        Native::Object(
            members
                .into_iter()
                .map(|(key, value)| (key.to_owned(), value))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[idcloud_macros::test]
    fn it_lifts_json_without_decoding_strings() {
        let native = Native::from(json!({ "a": [1, "AQ", null], "b": { "c": true } }));

        assert_eq!(
            native.pointer(["a"]).and_then(Native::as_array).map(<[_]>::len),
            Some(3)
        );
        assert_eq!(native.pointer(["b", "c"]), Some(&Native::Bool(true)));
        assert_eq!(
            native.get("a").and_then(|a| a.as_array()).map(|a| a[1].clone()),
            Some(Native::String("AQ".into()))
        );
    }

    #[idcloud_macros::test]
    fn it_creates_nested_objects_on_demand() {
        let mut native = Native::from([("extensions", Native::Bool(false))]);

        if let Some(extensions) = native.entry_object("extensions") {
            extensions.insert("credProps", true);
        }

        assert_eq!(
            native.pointer(["extensions", "credProps"]),
            Some(&Native::Bool(true))
        );
    }

    #[idcloud_macros::test]
    fn it_ignores_member_access_on_scalars() {
        let mut native = Native::from("text");

        assert!(native.get("key").is_none());
        assert!(native.insert("key", true).is_none());
        assert!(native.entry_object("key").is_none());
    }
}
