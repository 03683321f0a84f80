use proc_macro2::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{parse_macro_input, Data, DeriveInput, Error, Fields, Result};

/// Derives barycentric interpolation for per-vertex shader data.
///
/// Every field type must itself implement `Interpolate`.
#[proc_macro_derive(Interpolate)]
pub fn derive_interpolate(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let derive = parse_macro_input!(input as DeriveInput);

    match expand(derive) {
        Ok(tokens) => tokens,
        Err(e) => e.to_compile_error(),
    }
    .into()
}

fn expand(derive: DeriveInput) -> Result<TokenStream> {
    let fields = match &derive.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            other => {
                return Err(Error::new(
                    other.span(),
                    "Interpolate requires named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                derive.ident.span(),
                "Interpolate can only be derived for structs",
            ))
        }
    };

    let assignments = fields.iter().map(|field| {
        let name = field.ident.as_ref().expect("named field");
        let ty = &field.ty;
        quote! {
            #name: <#ty as Interpolate>::interpolate(&v0.#name, &v1.#name, &v2.#name, r0, r1, r2)
        }
    });

    let name = &derive.ident;
    let (impl_generics, ty_generics, where_clause) = derive.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics Interpolate for #name #ty_generics #where_clause {
            fn interpolate(v0: &Self, v1: &Self, v2: &Self, r0: f32, r1: f32, r2: f32) -> Self {
                Self {
                    #(#assignments),*
                }
            }
        }
    })
}
