//! An in-memory row with named columns and named nested scopes.

use crate::decode::Decode;
use crate::de::KeyedView;
use crate::error::Error;
use crate::from_row::FromRow;
use crate::path::FieldPath;
use crate::value::RawValue;

/// A single result row.
///
/// Columns are kept in the order they were added and looked up by name without regard
/// to ASCII case; when a name repeats (as it does in the result of a join), the leftmost
/// column wins. Scopes are named sub-rows holding the columns of an embedded or related
/// record, looked up by exact name.
///
/// Columns and scopes are separate namespaces: a name can be both a column and a scope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, RawValue)>,
    scopes: Vec<(String, Row)>,
}

impl Row {
    pub fn new() -> Self {
        Row::default()
    }

    /// Appends a column and returns the row.
    pub fn with_column(mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.push_column(name, value);
        self
    }

    /// Appends a scope and returns the row.
    pub fn with_scope(mut self, name: impl Into<String>, scope: Row) -> Self {
        self.push_scope(name, scope);
        self
    }

    pub fn push_column(&mut self, name: impl Into<String>, value: impl Into<RawValue>) {
        self.columns.push((name.into(), value.into()));
    }

    /// Adds a scope, replacing any scope of the same name.
    pub fn push_scope(&mut self, name: impl Into<String>, scope: Row) {
        let name = name.into();

        if let Some(slot) = self.scopes.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = scope;
        } else {
            self.scopes.push((name, scope));
        }
    }

    /// Number of columns, not counting the columns of scopes.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.scopes.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn has_scope(&self, name: &str) -> bool {
        self.scope(name).is_some()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn scope_names(&self) -> impl Iterator<Item = &str> {
        self.scopes.iter().map(|(name, _)| name.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// The raw value of the leftmost column called `name`, ignoring ASCII case.
    pub fn raw_value(&self, name: &str) -> Option<&RawValue> {
        self.column_index(name).map(|index| &self.columns[index].1)
    }

    /// The raw value of the column at `index`.
    pub fn raw_value_at(&self, index: usize) -> Option<&RawValue> {
        self.columns.get(index).map(|(_, value)| value)
    }

    pub fn scope(&self, name: &str) -> Option<&Row> {
        self.scopes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, scope)| scope)
    }

    /// Returns true if any column of this row, or of its scopes, is not null.
    ///
    /// A scope filled by an unmatched outer join holds nothing but nulls.
    pub fn contains_non_null_value(&self) -> bool {
        self.columns.iter().any(|(_, value)| !value.is_null())
            || self
                .scopes
                .iter()
                .any(|(_, scope)| scope.contains_non_null_value())
    }

    /// Decodes the column called `name`.
    ///
    /// Fails with [`Error::KeyNotFound`] if there is no such column and with
    /// [`Error::ValueMissing`] if it is null and `T` is not an `Option`.
    pub fn try_get<T>(&self, name: &str) -> crate::Result<T>
    where
        T: Decode,
    {
        let value = self
            .raw_value(name)
            .ok_or_else(|| Error::key_not_found(FieldPath::from(name)))?;

        T::decode(value).map_err(|error| Error::from_decode(FieldPath::from(name), error))
    }

    /// Decodes a record from this row.
    pub fn decode<T>(&self) -> crate::Result<T>
    where
        T: FromRow,
    {
        T::from_row(self)
    }

    /// Views this row as a bag of named fields.
    pub fn keyed(&self) -> KeyedView<'_> {
        KeyedView::new(self)
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::Row;
    use crate::error::Error;
    use crate::value::RawValue;

    fn book() -> Row {
        Row::new()
            .with_column("id", 1)
            .with_column("title", "Dune")
            .with_column("ID", 2)
            .with_scope(
                "author",
                Row::new().with_column("id", 10).with_column("name", "Herbert"),
            )
    }

    #[test]
    fn it_looks_up_columns_case_insensitively_leftmost_first() {
        let row = book();

        assert_eq!(row.raw_value("Id"), Some(&RawValue::Int(1)));
        assert_eq!(row.raw_value_at(2), Some(&RawValue::Int(2)));
        assert!(row.has_column("TITLE"));
        assert!(!row.has_column("author"));
        assert_eq!(row.len(), 3);
    }

    #[test]
    fn it_keeps_scopes_separate_from_columns() {
        let row = book();

        assert!(row.has_scope("author"));
        assert!(!row.has_scope("Author"));
        assert_eq!(row.scope_names().collect::<Vec<_>>(), ["author"]);
        assert_eq!(
            row.scope("author").and_then(|scope| scope.raw_value("name")),
            Some(&RawValue::Text("Herbert".into()))
        );
    }

    #[test]
    fn it_replaces_scopes_with_the_same_name() {
        let mut row = Row::new().with_scope("a", Row::new().with_column("x", 1));
        row.push_scope("a", Row::new().with_column("x", 2));

        assert_eq!(row.scope_names().count(), 1);
        assert_eq!(row.scope("a").and_then(|s| s.raw_value("x")), Some(&RawValue::Int(2)));
    }

    #[test]
    fn it_detects_all_null_scopes() {
        let unmatched = Row::new()
            .with_column("id", None::<i64>)
            .with_scope("inner", Row::new().with_column("x", RawValue::Null));

        assert!(!unmatched.contains_non_null_value());
        assert!(!Row::new().contains_non_null_value());
        assert!(book().contains_non_null_value());
    }

    #[test]
    fn it_gets_typed_columns() -> crate::Result<()> {
        let row = book().with_column("subtitle", RawValue::Null);

        assert_eq!(row.try_get::<i64>("id")?, 1);
        assert_eq!(row.try_get::<String>("title")?, "Dune");
        assert_eq!(row.try_get::<Option<String>>("subtitle")?, None);

        assert!(matches!(
            row.try_get::<String>("subtitle"),
            Err(Error::ValueMissing { .. })
        ));
        assert!(matches!(
            row.try_get::<i64>("missing"),
            Err(Error::KeyNotFound { .. })
        ));

        Ok(())
    }
}
