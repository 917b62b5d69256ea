#![forbid(unsafe_code)]

extern crate proc_macro;

use proc_macro::TokenStream;

mod derives;

/// Derives `FromRow` for a struct with named fields.
///
/// Every field reads the column named after it, converted through `Decode`. Field
/// attributes under `#[row(...)]` change that:
///
/// * `scope`: build the field with its own `FromRow` impl, from the scope of that name,
/// * `serde`: decode the field through its `Deserialize` impl,
/// * `rename = "name"`: read the column or scope `name` instead,
/// * `default`: use `Default::default()` when the column or scope is missing or null,
/// * `skip`: never read the field, use `Default::default()`.
///
/// `Option<T>` fields are `None` when their column is missing or null, or for `scope`
/// fields, when their scope is missing or holds only nulls.
#[proc_macro_derive(FromRow, attributes(row))]
pub fn derive_from_row(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);

    match derives::expand_derive_from_row(&input) {
        Ok(ts) => ts.into(),
        Err(e) => e.to_compile_error().into(),
    }
}
