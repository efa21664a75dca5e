//! Derive macros for the Composable Flux state container
//!
//! This crate provides procedural macros to reduce boilerplate when defining
//! action enums.
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Implements `composable_flux_core::Action` for an enum
//!
//! # Example
//!
//! ```ignore
//! use composable_flux_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum TodoAction {
//!     AddTodo { id: i64, text: String },
//!
//!     #[action_type = "TOGGLE"]
//!     ToggleTodo { id: i64 },
//! }
//!
//! // Generated:
//! assert_eq!(TodoAction::AddTodo { id: 0, text: "x".into() }.action_type(), "ADD_TODO");
//! assert_eq!(TodoAction::ToggleTodo { id: 0 }.action_type(), "TOGGLE");
//! assert_eq!(TodoAction::ACTION_TYPES, &["ADD_TODO", "TOGGLE"]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Expr, Fields, Lit, Meta, parse_macro_input};

/// Derive macro for action enums
///
/// Generates:
/// - `impl composable_flux_core::Action` whose `action_type()` returns the
///   variant name in `SCREAMING_SNAKE_CASE` (`AddTodo` → `"ADD_TODO"`)
/// - `ACTION_TYPES`: every tag of the enum, in declaration order
///
/// # Attributes
///
/// - `#[action_type = "TAG"]` - Override the tag of a single variant
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to a non-enum type
/// - `#[action_type]` is not a string name-value attribute
/// - Two variants end up with the same tag
#[proc_macro_derive(Action, attributes(action_type))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    let mut tags = Vec::with_capacity(data_enum.variants.len());
    let mut arms = Vec::with_capacity(data_enum.variants.len());

    for variant in &data_enum.variants {
        let variant_name = &variant.ident;

        let tag = match tag_override(&variant.attrs) {
            Ok(Some(tag)) => tag,
            Ok(None) => screaming_snake_case(&variant_name.to_string()),
            Err(error) => return error.to_compile_error().into(),
        };

        if tags.contains(&tag) {
            return syn::Error::new_spanned(variant, format!("Duplicate action type `{tag}`"))
                .to_compile_error()
                .into();
        }

        let arm = match &variant.fields {
            Fields::Named(_) => quote! { Self::#variant_name { .. } => #tag, },
            Fields::Unnamed(_) => quote! { Self::#variant_name(..) => #tag, },
            Fields::Unit => quote! { Self::#variant_name => #tag, },
        };

        tags.push(tag);
        arms.push(arm);
    }

    let expanded = quote! {
        impl #impl_generics ::composable_flux_core::Action for #name #ty_generics #where_clause {
            fn action_type(&self) -> &'static str {
                match self {
                    #(#arms)*
                }
            }
        }

        impl #impl_generics #name #ty_generics #where_clause {
            /// Every action type tag of this enum, in declaration order
            pub const ACTION_TYPES: &'static [&'static str] = &[#(#tags),*];
        }
    };

    TokenStream::from(expanded)
}

/// Reads `#[action_type = "TAG"]` from a variant's attributes
fn tag_override(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let Some(attr) = attrs.iter().find(|attr| attr.path().is_ident("action_type")) else {
        return Ok(None);
    };

    if let Meta::NameValue(name_value) = &attr.meta {
        if let Expr::Lit(expr) = &name_value.value {
            if let Lit::Str(tag) = &expr.lit {
                return Ok(Some(tag.value()));
            }
        }
    }

    Err(syn::Error::new_spanned(attr, "expected #[action_type = \"TAG\"]"))
}

/// `AddTodo` → `ADD_TODO`, `FetchHTTPResponse` → `FETCH_HTTP_RESPONSE`
fn screaming_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                out.push('_');
            }
        }
        out.extend(c.to_uppercase());
    }

    out
}
