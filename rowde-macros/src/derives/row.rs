use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::punctuated::Punctuated;
use syn::token::Comma;
use syn::{
    Data, DataStruct, DeriveInput, Field, Fields, FieldsNamed, GenericArgument, PathArguments,
    Type, TypePath,
};

use super::attributes::{parse_field_attributes, FieldShape};

pub fn expand_derive_from_row(input: &DeriveInput) -> syn::Result<TokenStream> {
    match &input.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(FieldsNamed { named, .. }),
            ..
        }) => expand_derive_from_row_struct(input, named),

        Data::Struct(DataStruct {
            fields: Fields::Unnamed(_),
            ..
        }) => Err(syn::Error::new_spanned(
            input,
            "tuple structs are not supported: rows are decoded by field name",
        )),

        Data::Struct(DataStruct {
            fields: Fields::Unit,
            ..
        }) => Err(syn::Error::new_spanned(
            input,
            "unit structs are not supported",
        )),

        Data::Enum(_) => Err(syn::Error::new_spanned(input, "enums are not supported")),

        Data::Union(_) => Err(syn::Error::new_spanned(input, "unions are not supported")),
    }
}

fn expand_derive_from_row_struct(
    input: &DeriveInput,
    fields: &Punctuated<Field, Comma>,
) -> syn::Result<TokenStream> {
    let ident = &input.ident;

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let reads = fields
        .iter()
        .map(expand_field_read)
        .collect::<syn::Result<Vec<_>>>()?;

    Ok(quote!(
        #[automatically_derived]
        impl #impl_generics ::rowde::FromRow for #ident #ty_generics #where_clause {
            fn from_row(row: &::rowde::Row) -> ::rowde::Result<Self> {
                #[allow(unused_variables)]
                let view = ::rowde::KeyedView::new(row);

                ::std::result::Result::Ok(#ident {
                    #(#reads),*
                })
            }
        }
    ))
}

fn expand_field_read(field: &Field) -> syn::Result<TokenStream> {
    let id = field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;

    let attributes = parse_field_attributes(&field.attrs)?;

    if attributes.skip {
        return Ok(quote!(#id: ::std::default::Default::default()));
    }

    let name = attributes
        .rename
        .unwrap_or_else(|| id.unraw().to_string());

    let ty = &field.ty;

    let expr = match (attributes.shape, option_inner(ty), attributes.default) {
        (FieldShape::Column, Some(inner), _) => quote!(view.get_optional::<#inner>(#name)?),
        (FieldShape::Column, None, false) => quote!(view.get::<#ty>(#name)?),
        (FieldShape::Column, None, true) => {
            quote!(view.get_optional::<#ty>(#name)?.unwrap_or_default())
        }

        (FieldShape::Scope, Some(inner), _) => {
            quote!(view.get_optional_scope::<#inner>(#name)?)
        }
        (FieldShape::Scope, None, false) => quote!(view.get_scope::<#ty>(#name)?),
        (FieldShape::Scope, None, true) => {
            quote!(view.get_optional_scope::<#ty>(#name)?.unwrap_or_default())
        }

        (FieldShape::Serde, Some(inner), _) => {
            quote!(view.get_optional_decodable::<#inner>(#name)?)
        }
        (FieldShape::Serde, None, false) => quote!(view.get_decodable::<#ty>(#name)?),
        (FieldShape::Serde, None, true) => {
            quote!(view.get_optional_decodable::<#ty>(#name)?.unwrap_or_default())
        }
    };

    Ok(quote!(#id: #expr))
}

// `Option<T>`, `std::option::Option<T>` and `core::option::Option<T>` all resolve to T.
fn option_inner(ty: &Type) -> Option<&Type> {
    let path = match ty {
        Type::Path(TypePath { qself: None, path }) => path,
        _ => return None,
    };

    let segment = path.segments.last()?;

    if segment.ident != "Option" {
        return None;
    }

    match &segment.arguments {
        PathArguments::AngleBracketed(args) if args.args.len() == 1 => match args.args.first()? {
            GenericArgument::Type(ty) => Some(ty),
            _ => None,
        },

        _ => None,
    }
}
