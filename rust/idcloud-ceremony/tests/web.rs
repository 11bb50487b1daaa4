//! Browser platform tests (feature: `web-integration-tests`).
//!
//! These run against the real `navigator.credentials` of a browser. Only
//! the non-interactive surface is exercised: a ceremony needs a user
//! gesture that a headless browser can not provide.
//!
//! ```sh
//! wasm-pack test --headless --chrome -- --features web-integration-tests
//! ```

#![cfg(all(
    feature = "web-integration-tests",
    target_arch = "wasm32",
    target_os = "unknown"
))]

use idcloud_ceremony::{Config, IdCloud, Platform, web::WebPlatform};
use wasm_bindgen_test::wasm_bindgen_test;

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn it_finds_the_credential_primitive() {
    let platform = WebPlatform::new();

    assert!(platform.has_credentials());
    assert!(!platform.user_agent().is_empty());
}

#[wasm_bindgen_test]
async fn it_probes_without_prompting() {
    let client = IdCloud::new(Config::default(), WebPlatform::new());

    assert!(client.is_ceremony_available().await);
    // Autofill support differs between browsers; the probe must settle
    // either way.
    let _ = client.is_autofill_ceremony_supported().await;
}
