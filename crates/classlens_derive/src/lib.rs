//! Derive macros for the classlens runtime type model.
//!
//! - `Reflect`: implements `classlens_core::Reflect`, describing a struct's name and declared fields
//!   (with visibility, declared type and `#[marker(...)]` tags) as a `TypeBuilder`.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Attribute, Data, DeriveInput, Fields, LitStr, Path, Token, Visibility, parse_macro_input};

/// Generates the `Reflect` trait implementation.
///
/// # Example
/// ```ignore
/// #[derive(Reflect)]
/// struct Person {
///     #[marker(Important)]
///     pub name: String,
///     age: i64,
/// }
///
/// // Generates:
/// impl ::classlens_core::Reflect for Person {
///     fn describe() -> ::classlens_core::TypeBuilder {
///         ::classlens_core::TypeBuilder::new("Person")
///             .field(FieldDescriptor::new("name", "String").with_visibility(Visibility::Public)
///                 .with_marker(Marker::from_static("Important")))
///             .field(FieldDescriptor::new("age", "i64").with_visibility(Visibility::Private))
///     }
/// }
/// ```
#[proc_macro_derive(Reflect, attributes(marker))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_reflect(&input).unwrap_or_else(syn::Error::into_compile_error).into()
}

fn expand_reflect(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let name_str = name.to_string();

    let fields = match &input.data {
        Data::Struct(data) => describe_fields(&data.fields)?,
        Data::Enum(data) => {
            return Err(syn::Error::new(
                data.enum_token.span,
                "`Reflect` can only be derived for structs",
            ));
        }
        Data::Union(data) => {
            return Err(syn::Error::new(
                data.union_token.span,
                "`Reflect` can only be derived for structs",
            ));
        }
    };

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::classlens_core::Reflect for #name #ty_generics #where_clause {
            fn describe() -> ::classlens_core::TypeBuilder {
                ::classlens_core::TypeBuilder::new(#name_str)
                    #(.field(#fields))*
            }
        }
    })
}

fn describe_fields(fields: &Fields) -> syn::Result<Vec<TokenStream2>> {
    fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            // Named fields (e.g. `struct User { name: String }`) use their ident, tuple fields their index
            let field_name = field.ident.as_ref().map_or_else(|| i.to_string(), ToString::to_string);
            let field_type = type_name(&field.ty);
            let visibility = match &field.vis {
                Visibility::Public(_) => quote!(::classlens_core::Visibility::Public),
                Visibility::Restricted(_) => quote!(::classlens_core::Visibility::Crate),
                Visibility::Inherited => quote!(::classlens_core::Visibility::Private),
            };
            let markers = field_markers(&field.attrs)?;
            Ok(quote! {
                ::classlens_core::FieldDescriptor::new(#field_name, #field_type)
                    .with_visibility(#visibility)
                    #(.with_marker(::classlens_core::Marker::from_static(#markers)))*
            })
        })
        .collect()
}

/// Render a type as it would be written in source.
///
/// `quote` separates every token with a space (`& 'static str`, `Vec < String >`); keep only the spaces between
/// words and after separators.
fn type_name(ty: &syn::Type) -> String {
    let rendered = quote!(#ty).to_string();
    let mut out = String::with_capacity(rendered.len());
    let mut prev: Option<&str> = None;
    for token in rendered.split_whitespace() {
        if prev.is_some_and(|prev| needs_space(prev, token)) {
            out.push(' ');
        }
        out.push_str(token);
        prev = Some(token);
    }
    out
}

fn needs_space(prev: &str, next: &str) -> bool {
    let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '\'');
    prev.ends_with([',', ';', '+', '='])
        || prev.ends_with("->")
        || next.starts_with(['+', '='])
        || next.starts_with("->")
        || (is_word(prev.chars().last()) && is_word(next.chars().next()))
}

/// One `#[marker(...)]` argument: a path (last segment is the name) or a string literal.
enum MarkerArg {
    Path(Path),
    Lit(LitStr),
}

impl Parse for MarkerArg {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.peek(LitStr) {
            input.parse().map(MarkerArg::Lit)
        } else {
            input.parse().map(MarkerArg::Path)
        }
    }
}

impl MarkerArg {
    fn name(&self) -> syn::Result<String> {
        match self {
            MarkerArg::Lit(lit) => Ok(lit.value()),
            MarkerArg::Path(path) => path
                .segments
                .last()
                .map(|segment| segment.ident.to_string())
                .ok_or_else(|| syn::Error::new_spanned(path, "expected a marker name")),
        }
    }
}

fn field_markers(attrs: &[Attribute]) -> syn::Result<Vec<String>> {
    let mut markers = Vec::new();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("marker")) {
        let args = attr.parse_args_with(Punctuated::<MarkerArg, Token![,]>::parse_terminated)?;
        if args.is_empty() {
            return Err(syn::Error::new_spanned(attr, "`#[marker(...)]` needs at least one marker name"));
        }
        for arg in &args {
            markers.push(arg.name()?);
        }
    }
    Ok(markers)
}
