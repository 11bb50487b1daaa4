#![warn(missing_docs)]

//! Procedural macros for the idcloud crates.
//!
//! Procedural macros must be defined in their own crate, which is why these live
//! here rather than in the crates that use them.

use proc_macro::TokenStream;
mod test;

// The usage below needs tokio and wasm-bindgen-test, which this crate does not depend on.
#[cfg(not(doctest))]
/// A cross-target test attribute.
///
/// Ceremony code runs in the browser, so every unit test should be able to
/// run both natively and under `wasm32-unknown-unknown`:
///
/// 1. `cargo test` - tests run natively (`#[test]` or `#[tokio::test]`)
/// 2. `wasm-pack test --headless --chrome` - tests run in wasm
///    (`#[wasm_bindgen_test]`)
///
/// # Usage
///
/// ```rs
/// // Sync test
/// #[idcloud_macros::test]
/// fn it_works() {
///     assert_eq!(2 + 2, 4);
/// }
///
/// // Async test
/// #[idcloud_macros::test]
/// async fn it_works_async() -> testresult::TestResult {
///     assert_eq!(2 + 2, 4);
///     Ok(())
/// }
/// ```
///
/// The using crate needs `tokio` (with `macros` and `rt`) and
/// `wasm-bindgen-test` as dev-dependencies.
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    test::generate(attr, item)
}
