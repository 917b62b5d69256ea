mod attributes;
mod row;

pub(crate) use row::expand_derive_from_row;
