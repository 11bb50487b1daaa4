//! Error types for ceremonies.

use idcloud_transcode::TranscodeError;
use thiserror::Error;

/// A rejection reported by the platform, typically a `DOMException`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{name}: {message}")]
pub struct PlatformError {
    /// Exception name, e.g. `NotAllowedError` or `AbortError`.
    pub name: String,
    /// Human-readable reason.
    pub message: String,
}

impl PlatformError {
    /// Build a platform error from its name and message.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Errors from enrollment and authentication ceremonies.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CeremonyError {
    /// A binary field of the request was not valid base64url.
    #[error(transparent)]
    MalformedEncoding(#[from] TranscodeError),

    /// The configured hints are neither a string nor a list of strings.
    ///
    /// Ceremonies never fail with this: they log it and proceed without
    /// hints.
    #[error("invalid hint configuration: {0}")]
    InvalidHint(String),

    /// The platform exposes no credential primitive.
    #[error("WebAuthn API not available: {0}")]
    NotAvailable(String),

    /// The platform rejected the ceremony or the user cancelled it.
    ///
    /// Not retried: without new user interaction a second attempt can not
    /// succeed.
    #[error("ceremony aborted: {0}")]
    CeremonyAborted(#[source] PlatformError),

    /// The request is payment-bound but the platform has no payment
    /// primitive.
    #[error("payment ceremony unsupported")]
    PaymentCeremonyUnsupported,

    /// The payment flow failed, was cancelled or returned no assertion.
    #[error("payment ceremony failed: {0}")]
    PaymentCeremonyFailed(String),
}
