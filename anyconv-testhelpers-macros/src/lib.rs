#![doc = include_str!("../README.md")]

use proc_macro2::TokenStream;
use quote::quote;
use syn::ItemFn;

/// Test attribute macro that sets up tracing before running the test.
///
/// # Usage
///
/// Basic usage (uses `#[test]`):
/// ```ignore
/// #[anyconv_testhelpers::test]
/// fn my_test() {
///     // tracing is set up automatically
/// }
/// ```
///
/// With a custom test attribute:
/// ```ignore
/// #[anyconv_testhelpers::test(tokio::test)]
/// async fn my_async_test() {}
/// ```
#[proc_macro_attribute]
pub fn test(
    attr: proc_macro::TokenStream,
    item: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    let attr = TokenStream::from(attr);
    let func = match syn::parse::<ItemFn>(item) {
        Ok(func) => func,
        Err(err) => return err.to_compile_error().into(),
    };

    let test_attr = if attr.is_empty() {
        quote! { #[::core::prelude::rust_2024::test] }
    } else {
        quote! { #[#attr] }
    };

    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = func;
    let stmts = &block.stmts;

    quote! {
        #test_attr
        #(#attrs)*
        #vis #sig {
            ::anyconv_testhelpers::setup();

            #(#stmts)*
        }
    }
    .into()
}
