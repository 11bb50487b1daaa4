use idcloud_transcode::Native;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    CeremonyError, IdCloud, PaymentCompletion, PaymentTransaction, Platform, PlatformCredential,
};

/// Whether `request` asks for a payment-bound assertion.
pub(super) fn is_payment(request: &Value) -> bool {
    request
        .pointer("/extensions/payment/isPayment")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

impl<P: Platform> IdCloud<P> {
    /// Run an authentication through the platform's payment sheet.
    ///
    /// `public_key` is the decoded request, which never carries the payment
    /// block; it is restored under `extensions.payment` as sent by the
    /// server.
    pub(super) async fn pay(
        &self,
        request: &Value,
        mut public_key: Native,
    ) -> Result<PlatformCredential, CeremonyError> {
        if !self.platform.supports_payment() {
            return Err(CeremonyError::PaymentCeremonyUnsupported);
        }

        if let (Some(payment), Some(extensions)) = (
            request.pointer("/extensions/payment"),
            public_key.entry_object("extensions"),
        ) {
            extensions.insert("payment", Native::from(payment.clone()));
        }

        self.log(|| debug!("Showing payment sheet"));
        let transaction = self
            .platform
            .show_payment(public_key)
            .await
            .map_err(|error| CeremonyError::PaymentCeremonyFailed(error.to_string()))?;

        let details = transaction.details();
        let assertion = details
            .get("credential")
            .filter(|credential| !credential.is_null())
            .or_else(|| details.get("assertion"))
            .filter(|assertion| !assertion.is_null())
            .cloned();

        let Some(body) = assertion else {
            if let Err(error) = transaction.complete(PaymentCompletion::Fail).await {
                self.log(|| warn!(%error, "Failed to close payment sheet"));
            }
            return Err(CeremonyError::PaymentCeremonyFailed(
                "payment response carries no assertion".into(),
            ));
        };

        transaction
            .complete(PaymentCompletion::Success)
            .await
            .map_err(|error| CeremonyError::PaymentCeremonyFailed(error.to_string()))?;

        Ok(PlatformCredential::new(body))
    }
}
