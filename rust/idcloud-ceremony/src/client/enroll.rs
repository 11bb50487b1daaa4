use serde_json::Value;
use tracing::debug;

use crate::{
    CeremonyError, CeremonyResult, IdCloud, Platform, describe_authenticator, friendly_name,
    pass_challenge_token, tables,
};

/// Per-call options of [`IdCloud::enroll`].
#[derive(Clone, Copy, Default)]
pub struct EnrollOptions<'a> {
    name_with: Option<&'a dyn Fn(&str) -> Option<String>>,
}

impl<'a> EnrollOptions<'a> {
    /// Let `name_with` choose the credential's friendly name. It receives
    /// the default name; returning `None` or a blank string keeps it.
    pub fn name_with(mut self, name_with: &'a dyn Fn(&str) -> Option<String>) -> Self {
        self.name_with = Some(name_with);
        self
    }
}

impl std::fmt::Debug for EnrollOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrollOptions")
            .field("name_with", &self.name_with.map(|_| "Fn"))
            .finish()
    }
}

impl<P: Platform> IdCloud<P> {
    /// Register a new credential from the server's creation options.
    ///
    /// The result always carries `clientExtensionResults` with the
    /// authenticator's friendly name and the client type, plus the
    /// challenge token when `request` had one.
    ///
    /// # Errors
    ///
    /// - [`CeremonyError::MalformedEncoding`] when a binary field of
    ///   `request` is not base64url.
    /// - [`CeremonyError::NotAvailable`] when the platform has no credential
    ///   primitive.
    /// - [`CeremonyError::CeremonyAborted`] when the platform rejects the
    ///   ceremony or the user cancels it.
    pub async fn enroll(
        &self,
        request: &Value,
        options: EnrollOptions<'_>,
    ) -> Result<CeremonyResult, CeremonyError> {
        let mut public_key = self.prepare(request, &tables::enrollment_request(&self.config))?;
        if let Some(extensions) = public_key.entry_object("extensions") {
            extensions.insert("credProps", true);
        }
        self.ensure_available()?;

        self.log(|| debug!("Creating credential"));
        let credential = self
            .platform
            .create(public_key)
            .await
            .map_err(CeremonyError::CeremonyAborted)?;

        let mut result = self.normalize(credential, &tables::enrollment_response(&self.config));

        let reported = result
            .json()
            .pointer("/clientExtensionResults/credProps/authenticatorDisplayName")
            .and_then(Value::as_str)
            .map(str::to_owned);
        let name = friendly_name(
            reported.as_deref(),
            &self.platform.user_agent(),
            options.name_with,
        );

        if let Some(results) = result.extension_results() {
            describe_authenticator(results, &name);
            pass_challenge_token(request, results);
        }

        self.log(|| debug!(friendly_name = %name, "Credential created"));
        Ok(result)
    }
}
