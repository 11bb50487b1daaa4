//! The two transcoding passes.
//!
//! Both passes walk the tree depth-first, keeping a [`ScopedPath`] of where
//! they are and asking the [`PathPolicy`] what to do with each node. Object
//! members that end up unset (skipped, or `null`) are left out of the output
//! rather than written as `null`.

use serde_json::{Map, Value};

use crate::{
    Native, NativeMap, PathPolicy, ScopedPath, Segment, TranscodeError, Treatment, base64url,
};

/// Transcode a wire tree into native form.
///
/// Binary fields are base64url-decoded into [`Native::Bytes`], text fields
/// become the bytes of their UTF-8 encoding, skipped fields disappear and
/// everything else is copied. The input is not modified.
///
/// # Errors
///
/// Fails when a binary or text field is not a string, or a binary field is
/// not valid base64url. The error names the field's path.
pub fn decode(value: &Value, policy: &PathPolicy) -> Result<Native, TranscodeError> {
    let mut path = ScopedPath::root();
    Ok(decode_node(value, policy, &mut path)?.unwrap_or_default())
}

/// Transcode a native tree into wire form.
///
/// Every [`Native::Bytes`] leaf is base64url-encoded, whatever its path: the
/// platform may add buffers no policy anticipated. Fields under a
/// [`Treatment::Text`] rule are written as UTF-8 text instead, with invalid
/// sequences replaced the way a browser `TextDecoder` would.
pub fn encode(native: &Native, policy: &PathPolicy) -> Value {
    let mut path = ScopedPath::root();
    encode_node(native, policy, &mut path).unwrap_or_default()
}

fn decode_node(
    value: &Value,
    policy: &PathPolicy,
    path: &mut ScopedPath,
) -> Result<Option<Native>, TranscodeError> {
    let native = match policy.treatment(path) {
        Treatment::Skip => return Ok(None),
        Treatment::Binary => match value {
            Value::Null => Native::Null,
            Value::String(encoded) => {
                let bytes = base64url::decode(encoded).map_err(|source| {
                    TranscodeError::MalformedEncoding {
                        path: path.to_string(),
                        source,
                    }
                })?;
                Native::Bytes(bytes)
            }
            _ => return Err(unexpected(path, "a base64url string")),
        },
        Treatment::Text => match value {
            Value::Null => Native::Null,
            Value::String(text) => Native::Bytes(text.as_bytes().to_vec()),
            _ => return Err(unexpected(path, "a string")),
        },
        Treatment::Descend => match value {
            Value::Null => Native::Null,
            Value::Bool(flag) => Native::Bool(*flag),
            Value::Number(number) => Native::Number(number.clone()),
            Value::String(text) => Native::String(text.clone()),
            Value::Array(items) => {
                let mut decoded = Vec::with_capacity(items.len());
                for item in items {
                    if let Some(item) =
                        path.within(Segment::Index, |path| decode_node(item, policy, path))?
                    {
                        decoded.push(item);
                    }
                }
                Native::Array(decoded)
            }
            Value::Object(members) => {
                let wildcard = policy.is_wildcard_parent(path);
                let mut decoded = NativeMap::with_capacity(members.len());
                for (key, member) in members {
                    let segment = child_segment(wildcard, key);
                    match path.within(segment, |path| decode_node(member, policy, path))? {
                        None | Some(Native::Null) => {}
                        Some(member) => {
                            decoded.insert(key.clone(), member);
                        }
                    }
                }
                Native::Object(decoded)
            }
        },
    };

    Ok(Some(native))
}

fn encode_node(native: &Native, policy: &PathPolicy, path: &mut ScopedPath) -> Option<Value> {
    let value = match (policy.treatment(path), native) {
        (Treatment::Skip, _) => return None,
        (Treatment::Text, Native::Bytes(bytes)) => {
            Value::String(String::from_utf8_lossy(bytes).into_owned())
        }
        (_, Native::Null) => Value::Null,
        (_, Native::Bool(flag)) => Value::Bool(*flag),
        (_, Native::Number(number)) => Value::Number(number.clone()),
        (_, Native::String(text)) => Value::String(text.clone()),
        (_, Native::Bytes(bytes)) => Value::String(base64url::encode(bytes)),
        (_, Native::Array(items)) => Value::Array(
            items
                .iter()
                .filter_map(|item| {
                    path.within(Segment::Index, |path| encode_node(item, policy, path))
                })
                .collect(),
        ),
        (_, Native::Object(members)) => {
            let wildcard = policy.is_wildcard_parent(path);
            let mut encoded = Map::new();
            for (key, member) in members {
                let segment = child_segment(wildcard, key);
                match path.within(segment, |path| encode_node(member, policy, path)) {
                    None | Some(Value::Null) => {}
                    Some(member) => {
                        encoded.insert(key.clone(), member);
                    }
                }
            }
            Value::Object(encoded)
        }
    };

    Some(value)
}

fn child_segment(wildcard: bool, key: &str) -> Segment {
    if wildcard {
        Segment::Any
    } else {
        Segment::Key(key.to_owned())
    }
}

fn unexpected(path: &ScopedPath, expected: &'static str) -> TranscodeError {
    TranscodeError::UnexpectedType {
        path: path.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use testresult::TestResult;

    fn request_policy() -> PathPolicy {
        PathPolicy::new()
            .skip(["status", "errorMessage"])
            .binary(["challenge", "excludeCredentials.[].id"])
            .text(["user.id"])
    }

    #[idcloud_macros::test]
    fn it_decodes_binary_and_text_fields() -> TestResult {
        let wire = json!({
            "challenge": "AAA",
            "user": { "id": "bob", "name": "u" },
            "excludeCredentials": [{ "type": "public-key", "id": "AQ" }],
        });

        let native = decode(&wire, &request_policy())?;

        assert_eq!(native.get("challenge"), Some(&Native::Bytes(vec![0, 0])));
        assert_eq!(
            native.pointer(["user", "id"]),
            Some(&Native::Bytes(b"bob".to_vec()))
        );
        assert_eq!(
            native.pointer(["user", "name"]),
            Some(&Native::String("u".into()))
        );
        let excluded = native
            .get("excludeCredentials")
            .and_then(Native::as_array)
            .ok_or("missing excludeCredentials")?;
        assert_eq!(excluded[0].get("id"), Some(&Native::Bytes(vec![1])));
        Ok(())
    }

    #[idcloud_macros::test]
    fn it_drops_skipped_fields() -> TestResult {
        let wire = json!({ "status": "OK", "errorMessage": "", "challenge": "AAA" });

        let native = decode(&wire, &request_policy())?;

        assert!(native.get("status").is_none());
        assert!(native.get("errorMessage").is_none());
        assert_eq!(native.as_object().map(NativeMap::len), Some(1));
        Ok(())
    }

    #[idcloud_macros::test]
    fn it_omits_null_members_but_keeps_null_elements() -> TestResult {
        let wire = json!({ "timeout": null, "hints": ["hybrid", null], "challenge": null });

        let native = decode(&wire, &request_policy())?;

        assert!(native.get("timeout").is_none());
        assert!(native.get("challenge").is_none());
        assert_eq!(
            native.get("hints"),
            Some(&Native::Array(vec![Native::from("hybrid"), Native::Null]))
        );
        Ok(())
    }

    #[idcloud_macros::test]
    fn it_reports_the_path_of_malformed_fields() {
        let wire = json!({ "excludeCredentials": [{ "id": "not base64!" }] });

        let error = decode(&wire, &request_policy()).unwrap_err();

        assert!(matches!(
            error,
            TranscodeError::MalformedEncoding { ref path, .. } if path == "excludeCredentials.[].id"
        ));
    }

    #[idcloud_macros::test]
    fn it_rejects_non_string_binary_fields() {
        let wire = json!({ "challenge": [1, 2, 3] });

        assert_eq!(
            decode(&wire, &request_policy()),
            Err(TranscodeError::UnexpectedType {
                path: "challenge".into(),
                expected: "a base64url string",
            })
        );
    }

    #[idcloud_macros::test]
    fn it_encodes_buffers_wherever_they_are() {
        let native = Native::from([
            ("rawId", Native::Bytes(vec![1, 2, 3])),
            (
                "response",
                Native::from([
                    ("clientDataJSON", Native::Bytes(b"{}".to_vec())),
                    ("unlisted", Native::Bytes(vec![0xff])),
                    ("missing", Native::Null),
                ]),
            ),
        ]);

        let wire = encode(&native, &PathPolicy::new());

        assert_eq!(
            wire,
            json!({
                "rawId": "AQID",
                "response": { "clientDataJSON": "e30", "unlisted": "_w" }
            })
        );
    }

    #[idcloud_macros::test]
    fn it_encodes_text_fields_as_utf8() {
        let policy = PathPolicy::new().text(["response.userHandle"]);
        let native = Native::from([(
            "response",
            Native::from([("userHandle", Native::Bytes("jöe".as_bytes().to_vec()))]),
        )]);

        assert_eq!(
            encode(&native, &policy),
            json!({ "response": { "userHandle": "jöe" } })
        );
    }

    #[idcloud_macros::test]
    fn it_leaves_the_input_untouched() -> TestResult {
        let wire = json!({ "challenge": "AAA", "status": "OK" });
        let before = wire.clone();

        decode(&wire, &request_policy())?;

        assert_eq!(wire, before);
        Ok(())
    }
}
