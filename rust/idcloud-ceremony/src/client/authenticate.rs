use serde_json::Value;
use tracing::debug;

use super::payment::is_payment;
use crate::{
    CeremonyError, CeremonyResult, IdCloud, Mediation, Platform, pass_challenge_token, tables,
};

/// Per-call options of [`IdCloud::authenticate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthenticateOptions {
    /// Mediation requested from the platform. `None` leaves it to the
    /// platform's default.
    pub mediation: Option<Mediation>,
}

impl AuthenticateOptions {
    /// Offer the credential through form autofill.
    pub fn conditional() -> Self {
        Self::default().with_mediation(Mediation::Conditional)
    }

    /// Request `mediation`.
    pub fn with_mediation(mut self, mediation: Mediation) -> Self {
        self.mediation = Some(mediation);
        self
    }
}

impl<P: Platform> IdCloud<P> {
    /// Get an assertion for the server's request options.
    ///
    /// Requests whose `extensions.payment.isPayment` is `true` are shown as a
    /// payment sheet instead; `options` does not apply to them.
    /// `clientExtensionResults` is left out of the result when empty.
    ///
    /// # Errors
    ///
    /// - [`CeremonyError::MalformedEncoding`] when a binary field of
    ///   `request` is not base64url.
    /// - [`CeremonyError::NotAvailable`] when the platform has no credential
    ///   primitive.
    /// - [`CeremonyError::CeremonyAborted`] when the platform rejects the
    ///   ceremony or the user cancels it.
    /// - [`CeremonyError::PaymentCeremonyUnsupported`] and
    ///   [`CeremonyError::PaymentCeremonyFailed`] for payment requests.
    pub async fn authenticate(
        &self,
        request: &Value,
        options: AuthenticateOptions,
    ) -> Result<CeremonyResult, CeremonyError> {
        let public_key = self.prepare(request, &tables::authentication_request(&self.config))?;

        let credential = if is_payment(request) {
            self.pay(request, public_key).await?
        } else {
            self.ensure_available()?;
            self.log(|| debug!(mediation = ?options.mediation, "Getting assertion"));
            self.platform
                .get(public_key, options.mediation)
                .await
                .map_err(CeremonyError::CeremonyAborted)?
        };

        let mut result =
            self.normalize(credential, &tables::authentication_response(&self.config));
        if let Some(results) = result.extension_results() {
            pass_challenge_token(request, results);
        }
        result.drop_empty_extension_results();

        self.log(|| debug!("Assertion obtained"));
        Ok(result)
    }
}
