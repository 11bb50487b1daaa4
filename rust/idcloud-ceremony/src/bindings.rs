//! JavaScript bindings for [`IdCloud`] over the browser platform.
//!
//! Example usage in JavaScript:
//!
//! ```ignore
//! // This is JavaScript code that uses the WASM bindings, not a Rust doctest
//! import { IdCloud } from "idcloud-ceremony";
//!
//! const idcloud = new IdCloud({ protocol: "v2", fido: { useRoamingFIDO: false } });
//!
//! if (await idcloud.isCeremonyAvailable()) {
//!   const options = await (await fetch("/attestation/options")).json();
//!   const credential = await idcloud.enroll(options, (name) => prompt("Name this key", name));
//!   await fetch("/attestation/result", { method: "POST", body: JSON.stringify(credential) });
//! }
//! ```

use js_sys::{Function, JSON};
use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::{AuthenticateOptions, Config, EnrollOptions, IdCloud, Mediation, web::WebPlatform};

/// A WebAuthn client for server-issued ceremonies.
#[wasm_bindgen(js_name = "IdCloud")]
pub struct IdCloudBinding {
    client: IdCloud<WebPlatform>,
}

#[wasm_bindgen(js_class = "IdCloud")]
impl IdCloudBinding {
    /// Create a client from an options object such as
    /// `{ protocol: "v1", userId: "text", hints: ["client-device"] }`.
    /// Every member is optional.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<IdCloudBinding, JsError> {
        let config: Config = if options.is_undefined() || options.is_null() {
            Config::default()
        } else {
            serde_json::from_value(to_json(&options)?)?
        };

        Ok(IdCloudBinding {
            client: IdCloud::new(config, WebPlatform::new()),
        })
    }

    /// Register a credential from the server's creation options and resolve
    /// to the JSON to send back. `nameWith`, if given, is called with the
    /// default authenticator name and may return another one.
    #[wasm_bindgen]
    pub async fn enroll(
        &self,
        request: JsValue,
        name_with: Option<Function>,
    ) -> Result<JsValue, JsError> {
        let request = to_json(&request)?;
        let rename = |default: &str| {
            name_with
                .as_ref()?
                .call1(&JsValue::NULL, &JsValue::from_str(default))
                .ok()?
                .as_string()
        };

        let options = if name_with.is_some() {
            EnrollOptions::default().name_with(&rename)
        } else {
            EnrollOptions::default()
        };

        let result = self.client.enroll(&request, options).await?;
        from_json(result.json())
    }

    /// Get an assertion for the server's request options and resolve to the
    /// JSON to send back. `mediation` is a `CredentialMediationRequirement`
    /// such as `"conditional"`.
    #[wasm_bindgen]
    pub async fn authenticate(
        &self,
        request: JsValue,
        mediation: Option<String>,
    ) -> Result<JsValue, JsError> {
        let request = to_json(&request)?;
        let options = match mediation {
            Some(mediation) => AuthenticateOptions::default()
                .with_mediation(serde_json::from_value::<Mediation>(Value::String(mediation))?),
            None => AuthenticateOptions::default(),
        };

        let result = self.client.authenticate(&request, options).await?;
        from_json(result.json())
    }

    /// Whether ceremonies can run with the configured authenticators.
    #[wasm_bindgen(js_name = "isCeremonyAvailable")]
    pub async fn is_ceremony_available(&self) -> bool {
        self.client.is_ceremony_available().await
    }

    /// Whether credentials can be offered through form autofill.
    #[wasm_bindgen(js_name = "isAutofillCeremonySupported")]
    pub async fn is_autofill_ceremony_supported(&self) -> bool {
        self.client.is_autofill_ceremony_supported().await
    }
}

fn js_value_to_error(value: JsValue) -> JsError {
    JsError::new(&format!("{:?}", value))
}

fn to_json(value: &JsValue) -> Result<Value, JsError> {
    let text: String = JSON::stringify(value).map_err(js_value_to_error)?.into();
    Ok(serde_json::from_str(&text)?)
}

fn from_json(value: &Value) -> Result<JsValue, JsError> {
    JSON::parse(&value.to_string()).map_err(js_value_to_error)
}
