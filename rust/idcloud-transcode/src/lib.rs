#![warn(missing_docs)]

//! Path-scoped transcoding between the WebAuthn wire form and the native form.
//!
//! Servers describe WebAuthn ceremonies as JSON in which every binary field is
//! a base64url string. The platform credential primitive wants the same tree
//! with those fields as raw byte buffers, and hands back a tree of buffers that
//! has to travel the other way. This crate walks such trees generically,
//! guided by a [`PathPolicy`] that names, by structural path, which fields are
//! dropped, which are binary and which parents hold dynamically keyed maps.
//!
//! ```
//! use idcloud_transcode::{Native, PathPolicy, decode, encode};
//! use serde_json::json;
//!
//! let policy = PathPolicy::new()
//!     .skip(["status"])
//!     .binary(["challenge", "allowCredentials.[].id"]);
//!
//! let wire = json!({
//!     "status": "ok",
//!     "challenge": "AAEC",
//!     "allowCredentials": [{ "type": "public-key", "id": "AQ" }]
//! });
//!
//! let native = decode(&wire, &policy)?;
//! assert_eq!(native.get("challenge"), Some(&Native::Bytes(vec![0, 1, 2])));
//! assert!(native.get("status").is_none());
//!
//! let back = encode(&native, &policy);
//! assert_eq!(back["allowCredentials"][0]["id"], "AQ");
//! # Ok::<(), idcloud_transcode::TranscodeError>(())
//! ```

pub mod base64url;

mod error;
pub use error::*;

mod native;
pub use native::*;

mod path;
pub use path::*;

mod policy;
pub use policy::*;

mod transcode;
pub use transcode::*;
