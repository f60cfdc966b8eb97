//! Expansion of `#[interceptor(...)]`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, LitStr};

use crate::parse::InterceptorAttrs;

/// Expands the `#[interceptor]` attribute macro.
///
/// The annotated item is emitted unchanged, followed by the
/// `DeclaredPatterns` implementation.
pub fn expand_interceptor(attr: TokenStream, item: TokenStream) -> syn::Result<TokenStream> {
    let attrs: InterceptorAttrs = syn::parse2(attr)?;
    let input: DeriveInput = syn::parse2(item)?;

    Ok(generate(&attrs, &input))
}

fn generate(attrs: &InterceptorAttrs, input: &DeriveInput) -> TokenStream {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let include: Vec<LitStr> = if attrs.include.is_empty() {
        vec![LitStr::new("/**", proc_macro2::Span::call_site())]
    } else {
        attrs.include.clone()
    };
    let exclude = &attrs.exclude;

    quote! {
        #input

        impl #impl_generics ::lintel_core::DeclaredPatterns for #ident #ty_generics #where_clause {
            fn patterns() -> ::lintel_core::PatternSpec {
                let include: &[&str] = &[#(#include),*];
                let exclude: &[&str] = &[#(#exclude),*];
                ::lintel_core::PatternSpec::new(include.iter().copied(), exclude.iter().copied())
            }
        }
    }
}
