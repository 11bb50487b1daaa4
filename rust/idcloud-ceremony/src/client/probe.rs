use tracing::warn;

use crate::{IdCloud, Modalities, Platform};

impl<P: Platform> IdCloud<P> {
    /// Whether ceremonies can run with the configured modalities.
    ///
    /// Roaming authenticators need nothing but the credential primitive.
    /// A deployment restricted to platform authenticators also needs one to
    /// be present.
    pub async fn is_ceremony_available(&self) -> bool {
        if !self.platform.has_credentials() {
            return false;
        }

        let Modalities {
            use_platform,
            use_roaming,
        } = self.config.fido;

        if use_roaming {
            true
        } else if use_platform {
            self.platform.is_platform_authenticator_available().await
        } else {
            false
        }
    }

    /// Whether credentials can be offered through form autofill.
    pub async fn is_autofill_ceremony_supported(&self) -> bool {
        if !self.platform.advertises_conditional_mediation() {
            return false;
        }

        match self.platform.is_conditional_mediation_available().await {
            Ok(available) => available,
            Err(error) => {
                self.log(|| warn!(%error, "Conditional mediation check failed"));
                false
            }
        }
    }
}
