use std::collections::BTreeMap;

use idcloud_transcode::{Native, PathPolicy, decode, encode};
use serde_json::Value;
use tracing::{Dispatch, warn};

use crate::{
    CeremonyError, CeremonyResult, Config, Platform, PlatformCredential, ProtocolVersion,
    result::object_member,
};

mod authenticate;
mod enroll;
mod payment;
mod probe;

pub use authenticate::*;
pub use enroll::*;

/// A WebAuthn client bound to one configuration and one platform.
///
/// The client holds no mutable state, so any number of ceremonies may be
/// prepared from it. Whether the platform tolerates overlapping prompts is
/// up to the caller.
#[derive(Debug, Clone)]
pub struct IdCloud<P> {
    config: Config,
    platform: P,
    dispatch: Option<Dispatch>,
}

impl<P: Platform> IdCloud<P> {
    /// Create a client that logs to the ambient `tracing` dispatcher.
    pub fn new(config: Config, platform: P) -> Self {
        Self {
            config,
            platform,
            dispatch: None,
        }
    }

    /// Route every event this client emits to `dispatch`.
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// The configuration the client was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The platform ceremonies run on.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Emit the events produced by `event` through the configured
    /// dispatcher.
    ///
    /// Never call this across an `.await`: the dispatcher is scoped to the
    /// closure.
    fn log(&self, event: impl FnOnce()) {
        match &self.dispatch {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, event),
            None => event(),
        }
    }

    fn ensure_available(&self) -> Result<(), CeremonyError> {
        if self.platform.has_credentials() {
            Ok(())
        } else {
            Err(CeremonyError::NotAvailable(
                "navigator.credentials is undefined".into(),
            ))
        }
    }

    /// Decode a wire request and add the configured hints unless the
    /// request brings its own.
    ///
    /// An `extensions` object left empty by skipped members is removed.
    fn prepare(&self, request: &Value, policy: &PathPolicy) -> Result<Native, CeremonyError> {
        let mut options = decode(request, policy)?;
        if options
            .get("extensions")
            .and_then(Native::as_object)
            .is_some_and(|extensions| extensions.is_empty())
        {
            options.remove("extensions");
        }

        if options.get("hints").is_none() {
            match self.config.hint_list() {
                Ok(Some(hints)) => {
                    let hints: Vec<Native> = hints.into_iter().map(Native::from).collect();
                    options.insert("hints", hints);
                }
                Ok(None) => {}
                Err(error) => self.log(|| warn!(%error, "Ignoring configured hints")),
            }
        }

        Ok(options)
    }

    /// Encode a platform credential into a ceremony result.
    ///
    /// Getter values that failed are dropped with a warning. Protocol v2
    /// writes the remaining ones into `response`, except authenticator data.
    fn normalize(&self, credential: PlatformCredential, policy: &PathPolicy) -> CeremonyResult {
        let PlatformCredential { body, accessors } = credential;
        let mut json = encode(&body, policy);

        let mut values = BTreeMap::new();
        for (accessor, outcome) in accessors {
            match outcome {
                Ok(value) => {
                    values.insert(accessor, value);
                }
                Err(error) => self.log(|| {
                    warn!(accessor = accessor.field(), %error, "Credential getter failed")
                }),
            }
        }

        let written: Vec<_> = values
            .iter()
            .filter(|(accessor, _)| accessor.in_v2_response())
            .collect();
        if self.config.protocol == ProtocolVersion::V2 && !written.is_empty() {
            let plain = PathPolicy::new();
            if let Some(response) = object_member(&mut json, "response") {
                for (accessor, value) in written {
                    response.insert(accessor.field().to_owned(), encode(value, &plain));
                }
            }
        }

        CeremonyResult::new(json, values)
    }
}
