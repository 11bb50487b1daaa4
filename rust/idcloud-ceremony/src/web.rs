//! The browser [`Platform`], backed by `navigator.credentials`,
//! `PublicKeyCredential` and `PaymentRequest`.
//!
//! Requests are handed to the browser as plain objects built from [`Native`]
//! trees, with byte buffers as `Uint8Array`s. Credentials come back as
//! `PublicKeyCredential` instances whose fields live on the prototype, so
//! they are read field by field rather than by enumerating keys.

use idcloud_transcode::{Native, NativeMap};
use js_sys::{Array, ArrayBuffer, Function, Object, Promise, Reflect, Uint8Array};
use serde_json::Number;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::{
    Accessor, Mediation, PaymentCompletion, PaymentTransaction, Platform, PlatformCredential,
    PlatformError,
};

/// Payment method identifier of Secure Payment Confirmation.
const SECURE_PAYMENT_CONFIRMATION: &str = "secure-payment-confirmation";

/// The platform of the current browsing context (window or worker).
#[derive(Debug, Clone)]
pub struct WebPlatform {
    global: JsValue,
}

impl WebPlatform {
    /// Bind to `globalThis`.
    pub fn new() -> Self {
        Self {
            global: js_sys::global().into(),
        }
    }

    fn navigator(&self) -> Option<JsValue> {
        defined(Reflect::get(&self.global, &"navigator".into()).ok())
    }

    /// `navigator.credentials`, if the browser has it.
    fn credentials(&self) -> Option<JsValue> {
        defined(Reflect::get(&self.navigator()?, &"credentials".into()).ok())
    }

    /// The `PublicKeyCredential` interface object.
    fn public_key_credential(&self) -> Option<Function> {
        Reflect::get(&self.global, &"PublicKeyCredential".into())
            .ok()?
            .dyn_into()
            .ok()
    }

    /// A static method of `PublicKeyCredential`.
    fn credential_static(&self, name: &str) -> Option<(Function, Function)> {
        let interface = self.public_key_credential()?;
        let method = Reflect::get(&interface, &name.into()).ok()?.dyn_into().ok()?;
        Some((interface, method))
    }

    fn payment_request(&self) -> Option<Function> {
        Reflect::get(&self.global, &"PaymentRequest".into())
            .ok()?
            .dyn_into()
            .ok()
    }

    /// Call `navigator.credentials[method](options)` and read the credential.
    async fn request_credential(
        &self,
        method: &str,
        options: Object,
    ) -> Result<PlatformCredential, PlatformError> {
        let credentials = self.credentials().ok_or_else(|| {
            PlatformError::new("NotSupportedError", "navigator.credentials is undefined")
        })?;
        let call: Function = js_get(&credentials, method)?.dyn_into().map_err(|_| {
            PlatformError::new("NotSupportedError", format!("{method} is not a function"))
        })?;
        let promise: Promise = call
            .call1(&credentials, &options)
            .map_err(platform_error)?
            .unchecked_into();
        let credential = JsFuture::from(promise).await.map_err(platform_error)?;
        if credential.is_null() || credential.is_undefined() {
            return Err(PlatformError::new(
                "NotAllowedError",
                "the platform returned no credential",
            ));
        }
        read_credential(&credential)
    }
}

impl Default for WebPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for WebPlatform {
    type Payment = WebPayment;

    fn has_credentials(&self) -> bool {
        self.public_key_credential().is_some() && self.credentials().is_some()
    }

    fn user_agent(&self) -> String {
        self.navigator()
            .and_then(|navigator| Reflect::get(&navigator, &"userAgent".into()).ok())
            .and_then(|agent| agent.as_string())
            .unwrap_or_default()
    }

    async fn create(&self, options: Native) -> Result<PlatformCredential, PlatformError> {
        let request = Object::new();
        js_set(&request, "publicKey", &to_js(&options)?)?;
        self.request_credential("create", request).await
    }

    async fn get(
        &self,
        options: Native,
        mediation: Option<Mediation>,
    ) -> Result<PlatformCredential, PlatformError> {
        let request = Object::new();
        js_set(&request, "publicKey", &to_js(&options)?)?;
        if let Some(mediation) = mediation {
            js_set(&request, "mediation", &mediation.as_str().into())?;
        }
        self.request_credential("get", request).await
    }

    async fn is_platform_authenticator_available(&self) -> bool {
        let Some((interface, method)) =
            self.credential_static("isUserVerifyingPlatformAuthenticatorAvailable")
        else {
            return false;
        };
        match call_promise(&method, &interface).await {
            Ok(available) => available.as_bool().unwrap_or(false),
            Err(_) => false,
        }
    }

    fn advertises_conditional_mediation(&self) -> bool {
        self.credential_static("isConditionalMediationAvailable").is_some()
    }

    async fn is_conditional_mediation_available(&self) -> Result<bool, PlatformError> {
        let (interface, method) = self
            .credential_static("isConditionalMediationAvailable")
            .ok_or_else(|| {
                PlatformError::new(
                    "NotSupportedError",
                    "isConditionalMediationAvailable is undefined",
                )
            })?;
        let available = call_promise(&method, &interface).await?;
        Ok(available.as_bool().unwrap_or(false))
    }

    fn supports_payment(&self) -> bool {
        self.payment_request().is_some()
    }

    async fn show_payment(&self, options: Native) -> Result<WebPayment, PlatformError> {
        let constructor = self.payment_request().ok_or_else(|| {
            PlatformError::new("NotSupportedError", "PaymentRequest is undefined")
        })?;
        let payment = options
            .pointer(["extensions", "payment"])
            .cloned()
            .unwrap_or_default();

        let method = Object::new();
        js_set(&method, "supportedMethods", &SECURE_PAYMENT_CONFIRMATION.into())?;
        js_set(&method, "data", &to_js(&confirmation_data(&options, &payment))?)?;

        let details = Object::new();
        if let Some(total) = payment.get("total") {
            js_set(&details, "total", &to_js(total)?)?;
        }

        let arguments = Array::of2(&Array::of1(&method), &details);
        let request = Reflect::construct(&constructor, &arguments).map_err(platform_error)?;
        let show: Function = js_get(&request, "show")?
            .dyn_into()
            .map_err(|_| PlatformError::new("NotSupportedError", "show is not a function"))?;
        let response = call_promise(&show, &request).await?;
        let details = read_payment_details(&js_get(&response, "details")?)?;

        Ok(WebPayment { response, details })
    }
}

/// An open Secure Payment Confirmation sheet.
#[derive(Debug)]
pub struct WebPayment {
    response: JsValue,
    details: Native,
}

impl PaymentTransaction for WebPayment {
    fn details(&self) -> &Native {
        &self.details
    }

    async fn complete(self, completion: PaymentCompletion) -> Result<(), PlatformError> {
        let complete: Function = js_get(&self.response, "complete")?
            .dyn_into()
            .map_err(|_| PlatformError::new("NotSupportedError", "complete is not a function"))?;
        let promise: Promise = complete
            .call1(&self.response, &completion.as_str().into())
            .map_err(platform_error)?
            .unchecked_into();
        JsFuture::from(promise).await.map_err(platform_error)?;
        Ok(())
    }
}

/// The `data` member of a Secure Payment Confirmation method, taken from an
/// assertion request and its payment extension.
fn confirmation_data(options: &Native, payment: &Native) -> Native {
    let mut data = Native::object();

    let credential_ids: Vec<Native> = options
        .get("allowCredentials")
        .and_then(Native::as_array)
        .unwrap_or_default()
        .iter()
        .filter_map(|descriptor| descriptor.get("id").cloned())
        .collect();
    data.insert("credentialIds", credential_ids);

    for key in ["challenge", "timeout", "extensions"] {
        if let Some(value) = options.get(key) {
            data.insert(key, value.clone());
        }
    }
    if let Some(rp_id) = options.get("rpId").or_else(|| payment.get("rpId")) {
        data.insert("rpId", rp_id.clone());
    }
    for key in ["instrument", "payeeName", "payeeOrigin"] {
        if let Some(value) = payment.get(key) {
            data.insert(key, value.clone());
        }
    }

    data
}

/// Read `PaymentResponse.details`.
///
/// Browsers hand back the assertion either as the details object itself or
/// nested under `credential` or `assertion`. Nested credentials are read
/// field by field; a bare credential is exposed as `credential`.
fn read_payment_details(details: &JsValue) -> Result<Native, PlatformError> {
    let mut native = Native::object();

    if is_credential(details) {
        native.insert("credential", read_credential(details)?.body);
        return Ok(native);
    }

    for key in ["credential", "assertion"] {
        let value = js_get(details, key)?;
        if is_credential(&value) {
            native.insert(key, read_credential(&value)?.body);
        } else if let Some(value) = defined(Some(value)) {
            native.insert(key, from_js(&value));
        }
    }

    Ok(native)
}

fn is_credential(value: &JsValue) -> bool {
    value.is_object()
        && Reflect::get(value, &"rawId".into())
            .map(|raw_id| !raw_id.is_undefined())
            .unwrap_or(false)
}

/// Read a `PublicKeyCredential` into a [`PlatformCredential`].
fn read_credential(credential: &JsValue) -> Result<PlatformCredential, PlatformError> {
    let mut body = Native::object();

    for key in ["id", "type", "authenticatorAttachment"] {
        if let Some(text) = js_get(credential, key)?.as_string() {
            body.insert(key, text);
        }
    }
    body.insert("rawId", array_buffer_to_vec(&js_get(credential, "rawId")?));

    let response = js_get(credential, "response")?;
    let mut fields = NativeMap::new();
    for key in [
        "clientDataJSON",
        "attestationObject",
        "authenticatorData",
        "signature",
        "userHandle",
    ] {
        let value = js_get(&response, key)?;
        if is_buffer(&value) {
            fields.insert(key.to_owned(), Native::Bytes(array_buffer_to_vec(&value)));
        }
    }
    body.insert("response", fields);

    if let Ok(results) = js_get(credential, "getClientExtensionResults")?.dyn_into::<Function>() {
        let results = results.call0(credential).map_err(platform_error)?;
        body.insert("clientExtensionResults", from_js(&results));
    }

    let mut read = PlatformCredential::new(body);
    for (accessor, getter) in [
        (Accessor::AuthenticatorData, "getAuthenticatorData"),
        (Accessor::Transports, "getTransports"),
        (Accessor::PublicKeyAlgorithm, "getPublicKeyAlgorithm"),
    ] {
        if let Ok(getter) = js_get(&response, getter)?.dyn_into::<Function>() {
            let outcome = getter
                .call0(&response)
                .map(|value| from_js(&value))
                .map_err(platform_error);
            read = read.with_accessor(accessor, outcome);
        }
    }

    Ok(read)
}

/// Build a plain JavaScript value from a native tree.
pub fn to_js(native: &Native) -> Result<JsValue, PlatformError> {
    Ok(match native {
        Native::Null => JsValue::NULL,
        Native::Bool(flag) => JsValue::from_bool(*flag),
        Native::Number(number) => number.as_f64().map_or(JsValue::NULL, JsValue::from_f64),
        Native::String(text) => JsValue::from_str(text),
        Native::Bytes(bytes) => Uint8Array::from(bytes.as_slice()).into(),
        Native::Array(items) => {
            let array = Array::new();
            for item in items {
                array.push(&to_js(item)?);
            }
            array.into()
        }
        Native::Object(members) => {
            let object = Object::new();
            for (key, value) in members {
                js_set(&object, key, &to_js(value)?)?;
            }
            object.into()
        }
    })
}

/// Read a plain JavaScript value into a native tree.
///
/// Buffers and typed arrays become [`Native::Bytes`]; functions,
/// `undefined` members and symbols are dropped.
pub fn from_js(value: &JsValue) -> Native {
    if value.is_null() || value.is_undefined() {
        Native::Null
    } else if let Some(flag) = value.as_bool() {
        Native::Bool(flag)
    } else if let Some(number) = value.as_f64() {
        from_f64(number)
    } else if let Some(text) = value.as_string() {
        Native::String(text)
    } else if is_buffer(value) {
        Native::Bytes(array_buffer_to_vec(value))
    } else if Array::is_array(value) {
        Array::from(value).iter().map(|item| from_js(&item)).collect::<Vec<_>>().into()
    } else if value.is_function() || value.is_symbol() {
        Native::Null
    } else if let Some(object) = value.dyn_ref::<Object>() {
        let mut members = NativeMap::new();
        for entry in Object::entries(object).iter() {
            let entry = Array::from(&entry);
            let (Some(key), member) = (entry.get(0).as_string(), entry.get(1)) else {
                continue;
            };
            if member.is_undefined() || member.is_function() {
                continue;
            }
            members.insert(key, from_js(&member));
        }
        Native::Object(members)
    } else {
        Native::Null
    }
}

fn from_f64(number: f64) -> Native {
    if number.fract() == 0.0 && number.abs() < i64::MAX as f64 {
        Native::from(number as i64)
    } else {
        Number::from_f64(number).map_or(Native::Null, Native::Number)
    }
}

fn is_buffer(value: &JsValue) -> bool {
    value.is_instance_of::<ArrayBuffer>() || ArrayBuffer::is_view(value)
}

fn defined(value: Option<JsValue>) -> Option<JsValue> {
    value.filter(|value| !value.is_undefined() && !value.is_null())
}

/// Call a promise-returning method and await it.
async fn call_promise(method: &Function, this: &JsValue) -> Result<JsValue, PlatformError> {
    let promise: Promise = method.call0(this).map_err(platform_error)?.unchecked_into();
    JsFuture::from(promise).await.map_err(platform_error)
}

/// Turn a rejection (usually a `DOMException`) into a [`PlatformError`].
fn platform_error(error: JsValue) -> PlatformError {
    let field = |key: &str| {
        Reflect::get(&error, &key.into())
            .ok()
            .and_then(|value| value.as_string())
    };
    match (field("name"), field("message")) {
        (Some(name), Some(message)) => PlatformError::new(name, message),
        _ => PlatformError::new(
            "Error",
            error.as_string().unwrap_or_else(|| format!("{error:?}")),
        ),
    }
}

/// Shorthand for `Reflect::get` with a string key.
fn js_get(object: &JsValue, key: &str) -> Result<JsValue, PlatformError> {
    Reflect::get(object, &JsValue::from_str(key)).map_err(|error| {
        PlatformError::new("TypeError", format!("failed to get '{key}': {error:?}"))
    })
}

/// Shorthand for `Reflect::set` with a string key.
fn js_set(object: &Object, key: &str, value: &JsValue) -> Result<(), PlatformError> {
    Reflect::set(object, &JsValue::from_str(key), value).map_err(|error| {
        PlatformError::new("TypeError", format!("failed to set '{key}': {error:?}"))
    })?;
    Ok(())
}

/// Copy an `ArrayBuffer` or a view on one into a `Vec<u8>`.
fn array_buffer_to_vec(value: &JsValue) -> Vec<u8> {
    let array = if ArrayBuffer::is_view(value) {
        let view: &Object = value.unchecked_ref();
        let buffer = Reflect::get(view, &"buffer".into()).unwrap_or_default();
        let offset = Reflect::get(view, &"byteOffset".into())
            .ok()
            .and_then(|offset| offset.as_f64())
            .unwrap_or_default();
        let length = Reflect::get(view, &"byteLength".into())
            .ok()
            .and_then(|length| length.as_f64())
            .unwrap_or_default();
        Uint8Array::new_with_byte_offset_and_length(&buffer, offset as u32, length as u32)
    } else {
        Uint8Array::new(value)
    };
    array.to_vec()
}
