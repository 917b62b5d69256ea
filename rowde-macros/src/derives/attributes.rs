use syn::{Attribute, Lit, Meta, MetaNameValue, NestedMeta};

macro_rules! fail {
    ($t:expr, $m:expr) => {
        return Err(syn::Error::new_spanned($t, $m))
    };
}

macro_rules! try_set {
    ($i:ident, $v:expr, $t:expr) => {
        match $i {
            None => $i = Some($v),
            Some(_) => fail!($t, "duplicate attribute"),
        }
    };
}

/// Where a field is read from.
#[derive(Clone, Copy)]
pub enum FieldShape {
    /// A column, through `Decode`.
    Column,
    /// A scope, through `FromRow`.
    Scope,
    /// A column or a scope, through `Deserialize`.
    Serde,
}

pub struct RowFieldAttributes {
    pub rename: Option<String>,
    pub shape: FieldShape,
    pub default: bool,
    pub skip: bool,
}

pub fn parse_field_attributes(input: &[Attribute]) -> syn::Result<RowFieldAttributes> {
    let mut rename = None;
    let mut shape = None;
    let mut default = false;
    let mut skip = false;

    for attr in input.iter().filter(|a| a.path.is_ident("row")) {
        let meta = attr
            .parse_meta()
            .map_err(|e| syn::Error::new_spanned(attr, e))?;

        match meta {
            Meta::List(list) => {
                for value in list.nested.iter() {
                    match value {
                        NestedMeta::Meta(meta) => match meta {
                            Meta::NameValue(MetaNameValue {
                                path,
                                lit: Lit::Str(val),
                                ..
                            }) if path.is_ident("rename") => try_set!(rename, val.value(), value),

                            Meta::Path(path) if path.is_ident("scope") => {
                                try_set!(shape, FieldShape::Scope, value)
                            }

                            Meta::Path(path) if path.is_ident("serde") => {
                                try_set!(shape, FieldShape::Serde, value)
                            }

                            Meta::Path(path) if path.is_ident("default") => default = true,

                            Meta::Path(path) if path.is_ident("skip") => skip = true,

                            u => fail!(u, "unexpected attribute"),
                        },

                        u => fail!(u, "unexpected attribute"),
                    }
                }
            }

            u => fail!(u, "unexpected attribute"),
        }
    }

    if skip && (rename.is_some() || shape.is_some()) {
        fail!(
            &input[0],
            "`skip` cannot be combined with `rename`, `scope` or `serde`"
        );
    }

    Ok(RowFieldAttributes {
        rename,
        shape: shape.unwrap_or(FieldShape::Column),
        default,
        skip,
    })
}
