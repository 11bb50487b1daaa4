//! Test macro implementation.
//!
//! # Generated Code
//!
//! - Uses `test` (sync) or `tokio::test` (async) on native targets
//! - Uses `wasm_bindgen_test` on wasm targets
//!
//! Test functions take no parameters; anything else is rejected with a
//! compile error pointing at the offending argument.

use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemFn, parse_macro_input, spanned::Spanned};

/// Implementation used by `idcloud_macros::test` macro.
pub fn generate(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);

    if !attr.is_empty() {
        let attr = proc_macro2::TokenStream::from(attr);
        return syn::Error::new(attr.span(), "idcloud_macros::test takes no arguments")
            .to_compile_error()
            .into();
    }

    if let Some(argument) = input.sig.inputs.first() {
        return syn::Error::new(argument.span(), "test functions cannot take parameters")
            .to_compile_error()
            .into();
    }

    generate_unit_test(&input)
}

/// Given a `source` function it generates a unit test
/// by adding attributes for both wasm and native runtimes.
///
/// ```rs
/// #[idcloud_macros::test]
/// async fn it_works_async() {
///     assert_eq!(2 + 2, 4);
/// }
/// ```
///
/// Generates:
/// ```rs
/// // Compile as test on native
/// #[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
/// // Compile as bindgen test on wasm
/// #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
/// async fn it_works_async() {
///     assert_eq!(2 + 2, 4);
/// }
/// ```
fn generate_unit_test(source: &ItemFn) -> TokenStream {
    let vis = &source.vis;
    let name = &source.sig.ident;
    let asyncness = &source.sig.asyncness;
    let unsafety = &source.sig.unsafety;
    let generics = &source.sig.generics;
    let where_clause = &generics.where_clause;
    let output = &source.sig.output;
    let body = &source.block;
    let user_attrs = &source.attrs;

    // Choose the right test attribute for native based on async vs sync
    let native_test_attr = if source.sig.asyncness.is_some() {
        quote! { tokio::test }
    } else {
        quote! { test }
    };

    let expanded = quote! {
        // Compile as test on native
        #[cfg_attr(not(target_arch = "wasm32"), #native_test_attr)]
        // Compile as bindgen test on wasm
        #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
        #(#user_attrs)*
        #vis #unsafety #asyncness fn #name #generics() #output #where_clause
            #body
    };

    TokenStream::from(expanded)
}
