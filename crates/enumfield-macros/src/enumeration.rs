//! `#[derive(Enumeration)]` implementation.
//!
//! This module generates an implementation of the
//! `enumfield_db::enums::Enumeration` trait for a fieldless enum, including
//! the lazily built registry, the variant table, and value conversions.

use std::collections::HashMap;

use darling::{FromDeriveInput, FromVariant};
use proc_macro2::TokenStream;
use quote::{quote, ToTokens};
use syn::{DeriveInput, Expr, ExprLit, ExprUnary, Lit, UnOp};

use crate::utils::to_snake_case;

/// Enum-level attributes parsed from `#[enumeration(...)]`.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(enumeration), supports(enum_unit))]
pub struct EnumerationOpts {
    pub ident: syn::Ident,
    pub generics: syn::Generics,
    pub data: darling::ast::Data<VariantOpts, ()>,

    /// The registry name; defaults to the enum's identifier.
    #[darling(default)]
    pub name: Option<String>,

    /// Path to the `enumfield_db` crate in generated code.
    #[darling(default, rename = "crate")]
    pub krate: Option<syn::Path>,
}

/// Per-variant attributes parsed from `#[item(...)]`.
#[derive(Debug, FromVariant)]
#[darling(attributes(item))]
pub struct VariantOpts {
    pub ident: syn::Ident,
    pub discriminant: Option<Expr>,

    /// The stored integer; falls back to the discriminant.
    #[darling(default)]
    pub value: Option<i64>,

    /// The programmatic name; defaults to the snake_case variant name.
    #[darling(default)]
    pub slug: Option<String>,

    /// The human-readable label; defaults to the capitalized slug.
    #[darling(default)]
    pub display: Option<String>,
}

/// One variant after attribute resolution.
struct ResolvedVariant {
    ident: syn::Ident,
    value: i64,
    slug: String,
    display: Option<String>,
}

/// Generates the `Enumeration` trait implementation for the given derive input.
pub fn derive_enumeration_impl(input: &DeriveInput) -> TokenStream {
    let opts = match EnumerationOpts::from_derive_input(input) {
        Ok(o) => o,
        Err(e) => return e.write_errors(),
    };

    match expand(&opts) {
        Ok(tokens) => tokens,
        Err(e) => e.write_errors(),
    }
}

fn expand(opts: &EnumerationOpts) -> darling::Result<TokenStream> {
    if !opts.generics.params.is_empty() {
        return Err(
            darling::Error::custom("Enumeration cannot be derived for generic enums")
                .with_span(&opts.generics),
        );
    }

    let enum_ident = &opts.ident;
    let name = opts
        .name
        .clone()
        .unwrap_or_else(|| enum_ident.to_string());
    let krate = opts
        .krate
        .as_ref()
        .map_or_else(|| quote!(::enumfield_db), ToTokens::to_token_stream);

    let variants = resolve_variants(opts)?;

    let idents: Vec<&syn::Ident> = variants.iter().map(|v| &v.ident).collect();
    let values: Vec<i64> = variants.iter().map(|v| v.value).collect();
    let item_tokens: Vec<TokenStream> = variants
        .iter()
        .map(|v| {
            let value = v.value;
            let slug = &v.slug;
            let display = v
                .display
                .as_ref()
                .map_or_else(|| quote!(None), |d| quote!(Some(#d)));
            quote! { .item(#value, #slug, #display) }
        })
        .collect();

    Ok(quote! {
        impl #krate::enums::Enumeration for #enum_ident {
            fn enumeration() -> &'static #krate::enums::Enum {
                static REGISTRY: ::std::sync::LazyLock<#krate::enums::Enum> =
                    ::std::sync::LazyLock::new(|| {
                        #krate::enums::Enum::builder(#name)
                            #(#item_tokens)*
                            .build()
                            .unwrap_or_else(|err| panic!("invalid enumeration {}: {}", #name, err))
                    });
                &REGISTRY
            }

            fn variants() -> &'static [Self] {
                &[#(Self::#idents),*]
            }

            fn value(&self) -> i64 {
                match self {
                    #(Self::#idents => #values,)*
                }
            }
        }

        impl ::core::convert::From<#enum_ident> for #krate::enums::Item {
            fn from(variant: #enum_ident) -> Self {
                #krate::enums::Enumeration::item(&variant).clone()
            }
        }

        impl ::core::convert::From<#enum_ident> for #krate::value::Value {
            fn from(variant: #enum_ident) -> Self {
                Self::Int(#krate::enums::Enumeration::value(&variant))
            }
        }
    })
}

/// Resolves values, slugs and labels, rejecting what the registry would.
fn resolve_variants(opts: &EnumerationOpts) -> darling::Result<Vec<ResolvedVariant>> {
    let variants = opts
        .data
        .as_ref()
        .take_enum()
        .ok_or_else(|| darling::Error::unsupported_shape("struct"))?;

    if variants.is_empty() {
        return Err(darling::Error::custom("an enumeration needs at least one variant")
            .with_span(&opts.ident));
    }

    let mut errors = darling::Error::accumulator();
    let mut seen_values: HashMap<i64, &syn::Ident> = HashMap::new();
    let mut seen_slugs: HashMap<String, &syn::Ident> = HashMap::new();
    let mut resolved = Vec::with_capacity(variants.len());

    for variant in variants {
        let value = match (variant.value, &variant.discriminant) {
            (Some(value), _) => Some(value),
            (None, Some(expr)) => errors.handle(discriminant_value(expr)),
            (None, None) => {
                errors.push(
                    darling::Error::custom(
                        "missing item value: add #[item(value = ...)] or a discriminant",
                    )
                    .with_span(&variant.ident),
                );
                None
            }
        };
        let slug = variant
            .slug
            .clone()
            .unwrap_or_else(|| to_snake_case(&variant.ident.to_string()));

        if let Err(msg) = check_slug(&slug) {
            errors.push(darling::Error::custom(msg).with_span(&variant.ident));
        }
        if let Some(other) = seen_slugs.insert(slug.clone(), &variant.ident) {
            errors.push(
                darling::Error::custom(format!("slug \"{slug}\" is already used by {other}"))
                    .with_span(&variant.ident),
            );
        }

        let Some(value) = value else { continue };
        if let Some(other) = seen_values.insert(value, &variant.ident) {
            errors.push(
                darling::Error::custom(format!("value {value} is already used by {other}"))
                    .with_span(&variant.ident),
            );
        }

        resolved.push(ResolvedVariant {
            ident: variant.ident.clone(),
            value,
            slug,
            display: variant.display.clone(),
        });
    }

    errors.finish_with(resolved)
}

fn check_slug(slug: &str) -> Result<(), String> {
    if slug.is_empty() {
        return Err("item slug must not be empty".into());
    }
    if slug.chars().any(char::is_whitespace) {
        return Err(format!("item slug should not contain whitespace, got {slug:?}"));
    }
    if slug.parse::<i64>().is_ok() {
        return Err(format!("item slug should not be an integer, got {slug:?}"));
    }
    Ok(())
}

/// Reads an integer literal discriminant such as `3` or `-1`.
fn discriminant_value(expr: &Expr) -> darling::Result<i64> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Int(int), ..
        }) => int.base10_parse::<i64>().map_err(darling::Error::from),
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr,
            ..
        }) => discriminant_value(expr).map(|v| -v),
        Expr::Group(group) => discriminant_value(&group.expr),
        Expr::Paren(paren) => discriminant_value(&paren.expr),
        other => Err(darling::Error::custom(
            "discriminant must be an integer literal; use #[item(value = ...)] instead",
        )
        .with_span(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand_str(src: &str) -> String {
        let input: DeriveInput = syn::parse_str(src).unwrap();
        derive_enumeration_impl(&input).to_string()
    }

    #[test]
    fn test_discriminant_value() {
        assert_eq!(discriminant_value(&syn::parse_str("7").unwrap()).unwrap(), 7);
        assert_eq!(discriminant_value(&syn::parse_str("-2").unwrap()).unwrap(), -2);
        assert_eq!(discriminant_value(&syn::parse_str("(4)").unwrap()).unwrap(), 4);
        assert!(discriminant_value(&syn::parse_str("A + 1").unwrap()).is_err());
    }

    #[test]
    fn test_check_slug() {
        assert!(check_slug("draft").is_ok());
        assert!(check_slug("").is_err());
        assert!(check_slug("on hold").is_err());
        assert!(check_slug("12").is_err());
    }

    #[test]
    fn test_expands_registry() {
        let out = expand_str(
            "#[enumeration(name = \"Status\")] enum S { #[item(value = 1)] Draft, OnHold = 2 }",
        );
        assert!(!out.contains("compile_error"));
        assert!(out.contains("\"Status\""));
        assert!(out.contains("\"draft\""));
        assert!(out.contains("\"on_hold\""));
        assert!(out.contains("2i64"));
        assert!(out.contains("enumfield_db"));
    }

    #[test]
    fn test_custom_crate_path() {
        let out = expand_str("#[enumeration(crate = \"my_db\")] enum S { A = 1 }");
        assert!(out.contains("my_db"));
        assert!(!out.contains("enumfield_db"));
    }

    #[test]
    fn test_missing_value_is_error() {
        let out = expand_str("enum S { A }");
        assert!(out.contains("compile_error"));
        assert!(out.contains("missing item value"));
    }

    #[test]
    fn test_duplicates_are_errors() {
        let out = expand_str("enum S { A = 1, B = 1 }");
        assert!(out.contains("value 1 is already used by A"));

        let out = expand_str("enum S { #[item(value = 1, slug = \"x\")] A, #[item(value = 2, slug = \"x\")] B }");
        assert!(out.contains("is already used by A"));
    }

    #[test]
    fn test_struct_is_rejected() {
        let out = expand_str("struct S { a: i32 }");
        assert!(out.contains("compile_error"));
    }

    #[test]
    fn test_generic_enum_is_rejected() {
        let out = expand_str("enum S<T> { A = 1 }");
        assert!(out.contains("generic"));
    }
}
