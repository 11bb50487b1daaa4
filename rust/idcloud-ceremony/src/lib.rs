#![warn(missing_docs)]

//! WebAuthn enrollment and authentication ceremonies driven by
//! server-issued JSON.
//!
//! The server describes a ceremony in JSON with binary fields in base64url.
//! [`IdCloud`] turns that description into the native form the platform
//! authenticator expects, runs the ceremony through a [`Platform`], and turns
//! the resulting credential back into JSON the server can verify, adding the
//! vendor extensions the server relies on.
//!
//! ```no_run
//! use idcloud_ceremony::{CeremonyError, Config, EnrollOptions, IdCloud, Platform};
//!
//! # async fn run<P: Platform>(platform: P) -> Result<(), CeremonyError> {
//! let client = IdCloud::new(Config::default(), platform);
//! let request = serde_json::json!({
//!     "challenge": "AAAA",
//!     "rp": { "id": "example.com", "name": "Example" },
//!     "user": { "id": "AQID", "name": "alice", "displayName": "Alice" },
//!     "excludeCredentials": []
//! });
//!
//! let result = client.enroll(&request, EnrollOptions::default()).await?;
//! println!("{}", result.json());
//! # Ok(())
//! # }
//! ```
//!
//! In a browser, the `web` module provides the platform over
//! `navigator.credentials` and `bindings` exposes the client to JavaScript.
//! Both exist only on `wasm32-unknown-unknown`.

mod client;
mod config;
mod error;
mod extensions;
mod platform;
mod result;
pub mod tables;

pub use client::*;
pub use config::*;
pub use error::*;
pub use extensions::*;
pub use platform::*;
pub use result::*;

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub mod web;

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub mod bindings;
