//! Client configuration.
//!
//! A [`Config`] is resolved once when an [`IdCloud`](crate::IdCloud) is built
//! and never changes afterwards. It deserializes from the same options object
//! the JavaScript client has always taken:
//!
//! ```
//! use idcloud_ceremony::{Config, ProtocolVersion, UserIdEncoding};
//!
//! let config: Config = serde_json::from_str(r#"{
//!     "protocol": "v1",
//!     "userId": "text",
//!     "fido": { "usePlatformFIDO": true, "useRoamingFIDO": false },
//!     "hints": "client-device"
//! }"#)?;
//!
//! assert_eq!(config.protocol, ProtocolVersion::V1);
//! assert_eq!(config.user_id, UserIdEncoding::Text);
//! assert!(!config.fido.use_roaming);
//! # Ok::<(), serde_json::Error>(())
//! ```

use serde::Deserialize;
use serde_json::Value;

use crate::CeremonyError;

/// Which server protocol revision the wire JSON follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolVersion {
    /// Responses carry only the fields every browser has always exposed.
    V1,
    /// Responses additionally carry `authenticatorAttachment` and plain
    /// `response.transports` / `response.publicKeyAlgorithm` fields.
    #[default]
    V2,
}

/// How the server encodes user identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserIdEncoding {
    /// `user.id` and `userHandle` are base64url.
    #[default]
    Binary,
    /// `user.id` and `userHandle` are plain text; the authenticator stores
    /// their UTF-8 bytes.
    Text,
}

/// Authenticator modalities the deployment accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Modalities {
    /// Authenticators built into the device (Touch ID, Windows Hello, ...).
    #[serde(rename = "usePlatformFIDO")]
    pub use_platform: bool,
    /// Security keys and phones reached over USB, NFC, BLE or hybrid.
    #[serde(rename = "useRoamingFIDO")]
    pub use_roaming: bool,
}

impl Default for Modalities {
    fn default() -> Self {
        Self {
            use_platform: true,
            use_roaming: true,
        }
    }
}

/// Configuration of an [`IdCloud`](crate::IdCloud) client.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Wire protocol revision.
    pub protocol: ProtocolVersion,
    /// Encoding of user identifiers.
    pub user_id: UserIdEncoding,
    /// Accepted authenticator modalities.
    pub fido: Modalities,
    /// WebAuthn `hints` to add to requests that carry none. Either a single
    /// string or a list of strings; anything else is ignored with a warning.
    pub hints: Option<Value>,
}

impl Config {
    /// Use protocol revision `protocol`.
    pub fn with_protocol(mut self, protocol: ProtocolVersion) -> Self {
        self.protocol = protocol;
        self
    }

    /// Encode user identifiers as `user_id`.
    pub fn with_user_id(mut self, user_id: UserIdEncoding) -> Self {
        self.user_id = user_id;
        self
    }

    /// Accept the given modalities.
    pub fn with_modalities(mut self, use_platform: bool, use_roaming: bool) -> Self {
        self.fido = Modalities {
            use_platform,
            use_roaming,
        };
        self
    }

    /// Add `hints` to requests that carry none.
    pub fn with_hints(mut self, hints: impl Into<Value>) -> Self {
        self.hints = Some(hints.into());
        self
    }

    /// The configured hints as a list.
    ///
    /// # Errors
    ///
    /// Returns [`CeremonyError::InvalidHint`] when the configured value is
    /// neither a string nor a list of strings.
    pub fn hint_list(&self) -> Result<Option<Vec<String>>, CeremonyError> {
        match &self.hints {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(hint)) => Ok(Some(vec![hint.clone()])),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_owned)
                        .ok_or_else(|| CeremonyError::InvalidHint(item.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(other) => Err(CeremonyError::InvalidHint(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[idcloud_macros::test]
    fn it_defaults_to_v2_binary_and_every_modality() {
        let config: Config = serde_json::from_value(json!({})).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.protocol, ProtocolVersion::V2);
        assert_eq!(config.user_id, UserIdEncoding::Binary);
        assert!(config.fido.use_platform && config.fido.use_roaming);
        assert!(config.hints.is_none());
    }

    #[idcloud_macros::test]
    fn it_keeps_modality_defaults_for_partial_objects() {
        let config: Config =
            serde_json::from_value(json!({ "fido": { "useRoamingFIDO": false } })).unwrap();

        assert!(config.fido.use_platform);
        assert!(!config.fido.use_roaming);
    }

    #[idcloud_macros::test]
    fn it_accepts_a_single_hint_or_a_list() {
        let single = Config::default().with_hints("security-key");
        let list = Config::default().with_hints(json!(["hybrid", "client-device"]));

        assert_eq!(
            single.hint_list().unwrap(),
            Some(vec!["security-key".to_owned()])
        );
        assert_eq!(
            list.hint_list().unwrap(),
            Some(vec!["hybrid".to_owned(), "client-device".to_owned()])
        );
    }

    #[idcloud_macros::test]
    fn it_rejects_hints_of_other_shapes() {
        for hints in [json!(42), json!({ "hint": "hybrid" }), json!(["hybrid", 1])] {
            let config = Config::default().with_hints(hints);
            assert!(matches!(
                config.hint_list(),
                Err(CeremonyError::InvalidHint(_))
            ));
        }
    }
}
