//! Derive macro for the structview `Explore` trait.
//!
//! - Structs with named fields list their fields in declaration order.
//! - Tuple structs list their fields as `0`, `1`, ...
//! - Unit structs and unit enum variants are scalars rendering their name.
//! - Enum variants with fields behave like structs of the active variant.
//!
//! Field attributes:
//!
//! - `#[explore(skip)]`: leave the field out.
//! - `#[explore(opaque)]`: show only the field's type (no `Explore` needed).
//! - `#[explore(debug)]`: show the field's `Debug` output as a scalar.
//! - `#[explore(rename = "name")]`: list the field under another key.
//!
//! ```rust,ignore
//! use structview::Explore;
//!
//! #[derive(Explore)]
//! struct Worker {
//!     name: String,
//!     #[explore(opaque)]
//!     inbox: std::sync::mpsc::Receiver<Job>,
//!     #[explore(rename = "state")]
//!     status: Status,
//! }
//!
//! #[derive(Explore)]
//! enum Status { Idle, Busy { job: u64 } }
//! ```
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    Data, DeriveInput, Fields, GenericParam, Index, LitStr, parse_macro_input, parse_quote,
    spanned::Spanned,
};

#[proc_macro_derive(Explore, attributes(explore))]
pub fn derive_explore(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// How a field is handed to the visitor.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Show {
    Explore,
    Opaque,
    Debug,
}

struct Member {
    key: String,
    show: Show,
    /// Expression reaching the field, `self.x` or a pattern binding.
    access: TokenStream2,
}

impl Member {
    fn visit(&self) -> TokenStream2 {
        let key = &self.key;
        let access = &self.access;
        let value = match self.show {
            Show::Explore => quote! { #access },
            Show::Opaque => quote! { &::structview::Opaque(#access) },
            Show::Debug => quote! { &::structview::Debugged(#access) },
        };
        quote! { #key => visit(#value), }
    }
}

struct FieldOptions {
    skip: bool,
    show: Show,
    rename: Option<String>,
}

fn field_options(field: &syn::Field) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions {
        skip: false,
        show: Show::Explore,
        rename: None,
    };
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("explore")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                options.skip = true;
            } else if meta.path.is_ident("opaque") {
                options.show = Show::Opaque;
            } else if meta.path.is_ident("debug") {
                options.show = Show::Debug;
            } else if meta.path.is_ident("rename") {
                let name: LitStr = meta.value()?.parse()?;
                options.rename = Some(name.value());
            } else {
                return Err(meta.error("expected `skip`, `opaque`, `debug` or `rename`"));
            }
            Ok(())
        })?;
    }
    Ok(options)
}

/// Members of a set of fields, plus the pattern binding them (for enums).
///
/// With `bind` the fields are reached through `__field{n}` bindings, otherwise
/// through `self`.
fn members(fields: &Fields, bind: bool) -> syn::Result<(Vec<Member>, TokenStream2)> {
    let mut members = Vec::new();
    let mut bindings = Vec::new();
    for (n, field) in fields.iter().enumerate() {
        let options = field_options(field)?;
        let binding = format_ident!("__field{}", n);
        let name = match &field.ident {
            Some(ident) => ident.to_string(),
            None => n.to_string(),
        };

        if options.skip {
            if field.ident.is_none() {
                bindings.push(quote! { _ });
            }
            continue;
        }

        let access = match (&field.ident, bind) {
            (_, true) => quote! { #binding },
            (Some(ident), false) => quote! { &self.#ident },
            (None, false) => {
                let index = Index::from(n);
                quote! { &self.#index }
            }
        };
        bindings.push(match &field.ident {
            Some(ident) => quote! { #ident: #binding },
            None => quote! { #binding },
        });
        members.push(Member {
            key: options.rename.unwrap_or(name),
            show: options.show,
            access,
        });
    }

    let pattern = match fields {
        Fields::Named(_) => quote! { { #(#bindings,)* .. } },
        Fields::Unnamed(_) => quote! { ( #(#bindings),* ) },
        Fields::Unit => quote! {},
    };
    Ok((members, pattern))
}

fn expand(mut input: DeriveInput) -> syn::Result<TokenStream2> {
    for param in input.generics.params.iter_mut() {
        if let GenericParam::Type(param) = param {
            param.bounds.push(parse_quote!(::structview::Explore));
        }
    }
    let ident = &input.ident;
    let name = ident.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let body = match &input.data {
        Data::Struct(data) => struct_body(&name, &data.fields)?,
        Data::Enum(data) => {
            if data.variants.is_empty() {
                return Err(syn::Error::new(
                    ident.span(),
                    "Explore can't be derived for an enum without variants",
                ));
            }
            enum_body(data)?
        }
        Data::Union(data) => {
            return Err(syn::Error::new(
                data.union_token.span(),
                "Explore can't be derived for unions",
            ));
        }
    };

    Ok(quote! {
        impl #impl_generics ::structview::Explore for #ident #ty_generics #where_clause {
            fn type_name(&self) -> &'static str {
                ::std::any::type_name::<Self>()
            }

            #body
        }
    })
}

fn struct_body(name: &str, fields: &Fields) -> syn::Result<TokenStream2> {
    if let Fields::Unit = fields {
        return Ok(quote! {
            fn kind(&self) -> ::structview::Kind {
                ::structview::Kind::Scalar
            }

            fn render(&self) -> ::std::string::String {
                ::std::string::String::from(#name)
            }
        });
    }

    let (members, _) = members(fields, false)?;
    let keys = members.iter().map(|m| &m.key);
    let arms = members.iter().map(Member::visit);
    Ok(quote! {
        fn kind(&self) -> ::structview::Kind {
            ::structview::Kind::Struct
        }

        fn members(&self) -> ::std::vec::Vec<::std::string::String> {
            ::std::vec![#(::std::string::String::from(#keys)),*]
        }

        #[allow(unreachable_code)]
        fn member(&self, key: &str, visit: &mut ::structview::Visit<'_>) -> bool {
            match key {
                #(#arms)*
                _ => return false,
            }
            true
        }

        fn render(&self) -> ::std::string::String {
            ::std::string::String::from("{..}")
        }
    })
}

fn enum_body(data: &syn::DataEnum) -> syn::Result<TokenStream2> {
    let mut kind_arms = Vec::new();
    let mut members_arms = Vec::new();
    let mut member_arms = Vec::new();
    let mut render_arms = Vec::new();

    for variant in &data.variants {
        let variant_ident = &variant.ident;
        let variant_name = variant_ident.to_string();

        let (rest, rendered) = match &variant.fields {
            Fields::Unit => (quote! {}, variant_name.clone()),
            Fields::Unnamed(_) => (quote! { (..) }, format!("{variant_name}(..)")),
            Fields::Named(_) => (quote! { { .. } }, format!("{variant_name} {{..}}")),
        };
        render_arms.push(quote! {
            Self::#variant_ident #rest => ::std::string::String::from(#rendered),
        });

        if let Fields::Unit = variant.fields {
            kind_arms.push(quote! { Self::#variant_ident => ::structview::Kind::Scalar, });
            continue;
        }
        kind_arms.push(quote! { Self::#variant_ident #rest => ::structview::Kind::Struct, });

        let (members, pattern) = members(&variant.fields, true)?;
        let keys = members.iter().map(|m| &m.key);
        members_arms.push(quote! {
            Self::#variant_ident #rest => ::std::vec![#(::std::string::String::from(#keys)),*],
        });
        let arms = members.iter().map(Member::visit);
        member_arms.push(quote! {
            Self::#variant_ident #pattern => match key {
                #(#arms)*
                _ => return false,
            },
        });
    }

    Ok(quote! {
        fn kind(&self) -> ::structview::Kind {
            match self {
                #(#kind_arms)*
            }
        }

        #[allow(unreachable_patterns)]
        fn members(&self) -> ::std::vec::Vec<::std::string::String> {
            match self {
                #(#members_arms)*
                _ => ::std::vec::Vec::new(),
            }
        }

        #[allow(unreachable_code, unreachable_patterns, unused_variables)]
        fn member(&self, key: &str, visit: &mut ::structview::Visit<'_>) -> bool {
            match self {
                #(#member_arms)*
                _ => return false,
            }
            true
        }

        fn render(&self) -> ::std::string::String {
            match self {
                #(#render_arms)*
            }
        }
    })
}
