//! The contract between ceremonies and the host platform.
//!
//! The platform owns everything that needs a user: showing the authenticator
//! prompt, talking to the authenticator, running the payment sheet. A
//! ceremony hands it a request in native form and waits, possibly for a long
//! time, for a credential or a rejection.
//!
//! In a browser the platform is `web::WebPlatform`
//! (only on `wasm32-unknown-unknown`). Tests use in-memory stubs.

use std::{collections::BTreeMap, future::Future};

use idcloud_transcode::Native;
use serde::Deserialize;

use crate::PlatformError;

/// How a credential request is mediated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mediation {
    /// No user interaction.
    Silent,
    /// Interaction only if needed.
    Optional,
    /// Offered inline in a form field (autofill).
    Conditional,
    /// Always ask.
    Required,
}

impl Mediation {
    /// The WebIDL string for this mediation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mediation::Silent => "silent",
            Mediation::Optional => "optional",
            Mediation::Conditional => "conditional",
            Mediation::Required => "required",
        }
    }
}

/// Values a credential exposes through getter methods rather than as fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Accessor {
    /// `response.getAuthenticatorData()`. Kept on the result only; it is never
    /// written into the response JSON.
    AuthenticatorData,
    /// `response.getTransports()`.
    Transports,
    /// `response.getPublicKeyAlgorithm()`.
    PublicKeyAlgorithm,
}

impl Accessor {
    /// Field name of the value, as written in a protocol v2 response.
    pub fn field(&self) -> &'static str {
        match self {
            Accessor::AuthenticatorData => "authenticatorData",
            Accessor::Transports => "transports",
            Accessor::PublicKeyAlgorithm => "publicKeyAlgorithm",
        }
    }

    /// Whether protocol v2 writes the value into `response`.
    pub fn in_v2_response(&self) -> bool {
        !matches!(self, Accessor::AuthenticatorData)
    }
}

/// A credential returned by the platform.
///
/// `body` mirrors the `PublicKeyCredential` shape with byte buffers:
///
/// ```text
/// { id, rawId, type, authenticatorAttachment?,
///   response: { clientDataJSON, attestationObject | authenticatorData, signature, userHandle? },
///   clientExtensionResults: { ... } }
/// ```
///
/// Getter-only values are read eagerly by the platform and recorded in
/// `accessors`. A getter the platform does not have is simply absent; a
/// getter that threw is recorded as `Err`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlatformCredential {
    /// The structural part of the credential.
    pub body: Native,
    /// Values read from getters.
    pub accessors: BTreeMap<Accessor, Result<Native, PlatformError>>,
}

impl PlatformCredential {
    /// A credential without getter values.
    pub fn new(body: Native) -> Self {
        Self {
            body,
            accessors: BTreeMap::new(),
        }
    }

    /// Record what reading `accessor` produced.
    pub fn with_accessor(
        mut self,
        accessor: Accessor,
        outcome: Result<Native, PlatformError>,
    ) -> Self {
        self.accessors.insert(accessor, outcome);
        self
    }
}

/// How a payment transaction ended, as reported back to the payment sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentCompletion {
    /// The assertion was obtained.
    Success,
    /// The sheet produced no usable assertion.
    Fail,
}

impl PaymentCompletion {
    /// The `PaymentComplete` WebIDL string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentCompletion::Success => "success",
            PaymentCompletion::Fail => "fail",
        }
    }
}

/// An open payment transaction.
pub trait PaymentTransaction {
    /// The response details. Platforms disagree on where they put the
    /// assertion: some use `credential`, others `assertion`.
    fn details(&self) -> &Native;

    /// Close the payment sheet.
    fn complete(
        self,
        completion: PaymentCompletion,
    ) -> impl Future<Output = Result<(), PlatformError>>;
}

/// The transaction type of platforms without a payment primitive.
#[derive(Debug)]
pub enum NoPayment {}

impl PaymentTransaction for NoPayment {
    fn details(&self) -> &Native {
        match *self {}
    }

    async fn complete(self, _completion: PaymentCompletion) -> Result<(), PlatformError> {
        match self {}
    }
}

/// The host platform's credential, capability and payment primitives.
///
/// Futures are not required to be `Send`: browser promises are bound to the
/// thread that created them.
pub trait Platform {
    /// Transaction returned by [`Platform::show_payment`].
    type Payment: PaymentTransaction;

    /// Whether the credential primitive exists at all.
    fn has_credentials(&self) -> bool;

    /// The client's user-agent string.
    fn user_agent(&self) -> String;

    /// Create a credential (`navigator.credentials.create`).
    fn create(
        &self,
        options: Native,
    ) -> impl Future<Output = Result<PlatformCredential, PlatformError>>;

    /// Get an assertion (`navigator.credentials.get`).
    fn get(
        &self,
        options: Native,
        mediation: Option<Mediation>,
    ) -> impl Future<Output = Result<PlatformCredential, PlatformError>>;

    /// Whether a user-verifying platform authenticator is present.
    fn is_platform_authenticator_available(&self) -> impl Future<Output = bool>;

    /// Whether the platform has a conditional-mediation check at all.
    fn advertises_conditional_mediation(&self) -> bool {
        false
    }

    /// Run the conditional-mediation check.
    fn is_conditional_mediation_available(
        &self,
    ) -> impl Future<Output = Result<bool, PlatformError>> {
        async { Ok::<_, PlatformError>(false) }
    }

    /// Whether the payment primitive exists.
    fn supports_payment(&self) -> bool {
        false
    }

    /// Show a payment sheet that authenticates with `options`, a credential
    /// request carrying the original `payment` block.
    fn show_payment(
        &self,
        options: Native,
    ) -> impl Future<Output = Result<Self::Payment, PlatformError>> {
        let _ = options;
        async {
            Err::<Self::Payment, _>(PlatformError::new(
                "NotSupportedError",
                "payment requests are not supported",
            ))
        }
    }
}
