use std::collections::BTreeMap;

use idcloud_transcode::Native;
use serde_json::{Map, Value};

use crate::Accessor;

/// The wire-form outcome of a ceremony, ready to be posted to the server.
///
/// Values the platform exposed only through getters stay readable through
/// [`CeremonyResult::accessor`], whichever protocol version shaped the JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct CeremonyResult {
    json: Value,
    accessors: BTreeMap<Accessor, Native>,
}

impl CeremonyResult {
    pub(crate) fn new(json: Value, accessors: BTreeMap<Accessor, Native>) -> Self {
        Self { json, accessors }
    }

    /// The result as wire JSON.
    pub fn json(&self) -> &Value {
        &self.json
    }

    /// Take the wire JSON.
    pub fn into_json(self) -> Value {
        self.json
    }

    /// The value a credential getter produced, if the platform had that
    /// getter and it succeeded.
    pub fn accessor(&self, accessor: Accessor) -> Option<&Native> {
        self.accessors.get(&accessor)
    }

    /// Mutable access to `clientExtensionResults`, created if missing.
    pub(crate) fn extension_results(&mut self) -> Option<&mut Map<String, Value>> {
        object_member(&mut self.json, "clientExtensionResults")
    }

    /// Remove `clientExtensionResults` when it holds nothing.
    pub(crate) fn drop_empty_extension_results(&mut self) {
        if let Value::Object(members) = &mut self.json {
            let empty = members
                .get("clientExtensionResults")
                .and_then(Value::as_object)
                .is_some_and(Map::is_empty);
            if empty {
                members.shift_remove("clientExtensionResults");
            }
        }
    }
}

impl From<CeremonyResult> for Value {
    fn from(result: CeremonyResult) -> Self {
        result.json
    }
}

/// The object stored under `key` in `value`, replacing anything that is not
/// an object. `None` when `value` itself is not an object.
pub(crate) fn object_member<'a>(
    value: &'a mut Value,
    key: &str,
) -> Option<&'a mut Map<String, Value>> {
    let Value::Object(members) = value else {
        return None;
    };
    let member = members
        .entry(key)
        .or_insert_with(|| Value::Object(Map::new()));
    if !member.is_object() {
        *member = Value::Object(Map::new());
    }
    member.as_object_mut()
}
