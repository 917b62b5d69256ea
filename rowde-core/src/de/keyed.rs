use std::borrow::Cow;
use std::convert::Infallible;

use serde::de::value::CowStrDeserializer;
use serde::de::{self, Deserialize, DeserializeSeed, MapAccess};

use crate::de::RowDeserializer;
use crate::decode::Decode;
use crate::error::Error;
use crate::from_row::FromRow;
use crate::options::{DecodeOptions, KeyDecodingStrategy, DEFAULT_OPTIONS};
use crate::path::FieldPath;
use crate::row::Row;
use crate::value::RawValue;

/// A row, or a scope of a row, seen as a bag of optional named fields.
///
/// Every accessor declares the shape of the field it reads:
///
/// * [`get`](Self::get) and [`get_optional`](Self::get_optional) convert a column through
///   [`Decode`] and never look at scopes,
/// * [`get_scope`](Self::get_scope) and [`get_optional_scope`](Self::get_optional_scope)
///   build a [`FromRow`] record from a scope and never look at columns,
/// * [`get_decodable`](Self::get_decodable) and
///   [`get_optional_decodable`](Self::get_optional_decodable) go through serde, reading
///   the column when there is one and the scope otherwise.
///
/// Errors carry the path of the field relative to this view.
#[derive(Debug, Clone)]
pub struct KeyedView<'r> {
    row: &'r Row,
    path: FieldPath,
    options: &'r DecodeOptions,
}

impl<'r> KeyedView<'r> {
    pub fn new(row: &'r Row) -> Self {
        KeyedView::with_options(row, &DEFAULT_OPTIONS)
    }

    pub fn with_options(row: &'r Row, options: &'r DecodeOptions) -> Self {
        KeyedView::nested(row, FieldPath::root(), options)
    }

    pub(crate) fn nested(row: &'r Row, path: FieldPath, options: &'r DecodeOptions) -> Self {
        KeyedView { row, path, options }
    }

    pub fn row(&self) -> &'r Row {
        self.row
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// The union of the scope names and column names of the row, as field keys.
    ///
    /// A name that is both a scope and a column is listed once. Column names that differ
    /// only by ASCII case resolve to the same column, so only the leftmost spelling is
    /// listed. The order is unspecified.
    pub fn all_field_names(&self) -> Vec<Cow<'r, str>> {
        let strategy = self.options.key_strategy;
        let mut keys: Vec<Cow<'r, str>> = Vec::with_capacity(self.row.len());

        for name in self.row.scope_names() {
            let key = strategy.key(name);

            if !keys.contains(&key) {
                keys.push(key);
            }
        }

        let scopes = keys.len();

        for name in self.row.column_names() {
            let key = strategy.key(name);

            if keys[..scopes].iter().any(|k| k.eq_ignore_ascii_case(&key)) {
                log::debug!(
                    "`{}` is both a column and a scope at {}; scalar reads use the column",
                    key,
                    self.path
                );
            }

            if !keys.iter().any(|k| k.eq_ignore_ascii_case(&key)) {
                keys.push(key);
            }
        }

        keys
    }

    /// Returns true if the row has a column or a scope for `key`.
    pub fn has(&self, key: &str) -> bool {
        self.raw_value(key).is_some() || self.scope(key).is_some()
    }

    /// Reads a required column.
    ///
    /// Fails with [`Error::KeyNotFound`] if there is no column for `key`, and with
    /// [`Error::ValueMissing`] if the column is null and `T` is not an `Option`.
    pub fn get<T>(&self, key: &str) -> crate::Result<T>
    where
        T: Decode,
    {
        let value = self
            .raw_value(key)
            .ok_or_else(|| Error::key_not_found(FieldPath::from(key)))?;

        T::decode(value).map_err(|error| Error::from_decode(FieldPath::from(key), error))
    }

    /// Reads an optional column: a missing column and a null column are both `None`.
    pub fn get_optional<T>(&self, key: &str) -> crate::Result<Option<T>>
    where
        T: Decode,
    {
        match self.raw_value(key) {
            Some(value) if !value.is_null() => T::decode(value)
                .map(Some)
                .map_err(|error| Error::from_decode(FieldPath::from(key), error)),

            _ => Ok(None),
        }
    }

    /// Builds a required nested record from the scope for `key`.
    pub fn get_scope<T>(&self, key: &str) -> crate::Result<T>
    where
        T: FromRow,
    {
        let scope = self
            .scope(key)
            .ok_or_else(|| Error::key_not_found(FieldPath::from(key)))?;

        T::from_row(scope).map_err(|error| error.prefixed(key))
    }

    /// Builds an optional nested record from the scope for `key`.
    ///
    /// A missing scope, and a scope that holds only nulls, are both `None`.
    pub fn get_optional_scope<T>(&self, key: &str) -> crate::Result<Option<T>>
    where
        T: FromRow,
    {
        match self.scope(key) {
            Some(scope) if scope.contains_non_null_value() => T::from_row(scope)
                .map(Some)
                .map_err(|error| error.prefixed(key)),

            _ => Ok(None),
        }
    }

    /// Decodes a required field through its `Deserialize` impl.
    pub fn get_decodable<T>(&self, key: &str) -> crate::Result<T>
    where
        T: Deserialize<'r>,
    {
        if !self.has(key) {
            return Err(Error::key_not_found(FieldPath::from(key)));
        }

        T::deserialize(self.field(key)).map_err(|error| error.prefixed(key))
    }

    /// Decodes an optional field through its `Deserialize` impl.
    ///
    /// A null column is `None`, even when a scope of the same name exists. Without a
    /// column, a missing scope or a scope of nulls is `None`. Otherwise `T` is decoded
    /// from the column if it asks for a scalar, or from the scope if it asks for a struct
    /// or a map.
    pub fn get_optional_decodable<T>(&self, key: &str) -> crate::Result<Option<T>>
    where
        T: Deserialize<'r>,
    {
        Option::<T>::deserialize(self.field(key)).map_err(|error| error.prefixed(key))
    }

    /// Keyed containers are only reachable through a field name: always fails.
    pub fn nested_keyed(&self, key: &str) -> crate::Result<KeyedView<'r>> {
        Err(Error::unsupported(
            FieldPath::from(key),
            "a nested keyed container",
        ))
    }

    /// Positional containers never decode from a row: always fails.
    pub fn nested_unkeyed(&self, key: &str) -> crate::Result<Infallible> {
        Err(Error::unsupported(
            FieldPath::from(key),
            "a nested unkeyed container",
        ))
    }

    /// Records decoded from rows have no super record: always fails.
    pub fn super_decoder(&self) -> crate::Result<Infallible> {
        Err(Error::unsupported(FieldPath::root(), "a super record"))
    }

    /// A deserializer for the field `key`, seeing both its column and its scope.
    pub fn field(&self, key: &str) -> RowDeserializer<'r> {
        RowDeserializer::field(
            self.row,
            self.path.join(key),
            self.raw_value(key),
            self.scope(key),
            self.options,
        )
    }

    /// Walks the view as a serde map.
    ///
    /// For a map, every distinct column name is a key of its own and reads that exact
    /// column. For a struct, a column whose name matches one of `fields` regardless of
    /// ASCII case is offered under the field's name, the leftmost such column winning,
    /// as with [`get`](Self::get).
    pub(crate) fn into_map_access(
        self,
        fields: Option<&'static [&'static str]>,
    ) -> KeyedAccess<'r> {
        let strategy = self.options.key_strategy;
        let mut entries: Vec<Entry<'r>> = Vec::with_capacity(self.row.len());

        for name in self.row.scope_names() {
            let key = strategy.key(name);

            if !entries.iter().any(|entry| entry.key == key) {
                entries.push(Entry {
                    key,
                    column: None,
                    scope: self.row.scope(name),
                });
            }
        }

        for (name, value) in self.row.columns() {
            let key = match fields {
                Some(fields) => field_key(fields, strategy.key(name)),
                None => strategy.key(name),
            };

            match entries.iter_mut().find(|entry| entry.key == key) {
                Some(entry) if entry.column.is_none() => entry.column = Some(value),
                Some(_) => {}
                None => entries.push(Entry {
                    key,
                    column: Some(value),
                    scope: None,
                }),
            }
        }

        KeyedAccess {
            view: self,
            entries: entries.into_iter(),
            pending: None,
        }
    }

    fn raw_value(&self, key: &str) -> Option<&'r RawValue> {
        match self.options.key_strategy {
            KeyDecodingStrategy::UseDefaultKeys => self.row.raw_value(key),

            strategy => self
                .row
                .columns()
                .find(|(name, _)| strategy.key(name).eq_ignore_ascii_case(key))
                .map(|(_, value)| value),
        }
    }

    fn scope(&self, key: &str) -> Option<&'r Row> {
        match self.options.key_strategy {
            KeyDecodingStrategy::UseDefaultKeys => self.row.scope(key),

            strategy => self
                .row
                .scope_names()
                .find(|name| strategy.key(name) == key)
                .and_then(|name| self.row.scope(name)),
        }
    }
}

fn field_key<'r>(fields: &'static [&'static str], key: Cow<'r, str>) -> Cow<'r, str> {
    match fields.iter().find(|field| field.eq_ignore_ascii_case(&key)) {
        Some(field) => Cow::Borrowed(*field),
        None => key,
    }
}

struct Entry<'r> {
    key: Cow<'r, str>,
    column: Option<&'r RawValue>,
    scope: Option<&'r Row>,
}

/// Walks a [`KeyedView`] as a serde map of its field keys.
pub(crate) struct KeyedAccess<'r> {
    view: KeyedView<'r>,
    entries: std::vec::IntoIter<Entry<'r>>,
    pending: Option<Entry<'r>>,
}

impl<'r> MapAccess<'r> for KeyedAccess<'r> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Error>
    where
        K: DeserializeSeed<'r>,
    {
        let entry = match self.entries.next() {
            Some(entry) => entry,
            None => return Ok(None),
        };

        let key = seed.deserialize(CowStrDeserializer::<Error>::new(entry.key.clone()))?;
        self.pending = Some(entry);

        Ok(Some(key))
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Error>
    where
        V: DeserializeSeed<'r>,
    {
        let entry = self
            .pending
            .take()
            .ok_or_else(|| <Error as de::Error>::custom("value requested before its key"))?;

        let field = RowDeserializer::field(
            self.view.row,
            self.view.path.join(&entry.key),
            entry.column,
            entry.scope,
            self.view.options,
        );

        seed.deserialize(field)
            .map_err(|error| error.prefixed(&entry.key))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde::Deserialize;

    use super::KeyedView;
    use crate::error::Error;
    use crate::from_row::FromRow;
    use crate::options::{DecodeOptions, KeyDecodingStrategy};
    use crate::row::Row;
    use crate::value::RawValue;

    #[derive(Debug, PartialEq)]
    struct Author {
        id: i64,
        name: String,
    }

    impl FromRow for Author {
        fn from_row(row: &Row) -> crate::Result<Self> {
            let view = row.keyed();

            Ok(Author {
                id: view.get("id")?,
                name: view.get("name")?,
            })
        }
    }

    fn row() -> Row {
        Row::new()
            .with_column("id", 1)
            .with_column("title", "Dune")
            .with_column("rating", RawValue::Null)
            .with_column("author", 7)
            .with_scope(
                "author",
                Row::new().with_column("id", 7).with_column("name", "Herbert"),
            )
            .with_scope("publisher", Row::new().with_column("name", RawValue::Null))
    }

    #[test]
    fn it_lists_the_union_of_columns_and_scopes() {
        let row = row();
        let view = KeyedView::new(&row);

        let names: HashSet<_> = view
            .all_field_names()
            .into_iter()
            .map(|name| name.into_owned())
            .collect();

        let expected: HashSet<String> = ["id", "title", "rating", "author", "publisher"]
            .iter()
            .map(|name| name.to_string())
            .collect();

        assert_eq!(names, expected);
        assert_eq!(view.all_field_names().len(), 5);
    }

    #[test]
    fn it_has_columns_and_scopes() {
        let row = row();
        let view = row.keyed();

        for name in &["id", "title", "rating", "author", "publisher"] {
            assert!(view.has(name), "{}", name);
        }

        assert!(!view.has("missing"));
    }

    #[test]
    fn it_gets_scalars_from_columns_only() -> crate::Result<()> {
        let row = row();
        let view = row.keyed();

        assert_eq!(view.get::<i64>("id")?, 1);
        assert_eq!(view.get::<i64>("author")?, 7);
        assert_eq!(view.get_optional::<String>("title")?, Some("Dune".into()));
        assert_eq!(view.get_optional::<f64>("rating")?, None);
        assert_eq!(view.get_optional::<f64>("missing")?, None);
        assert_eq!(view.get_optional::<String>("publisher")?, None);

        assert!(matches!(
            view.get::<f64>("rating"),
            Err(Error::ValueMissing { .. })
        ));
        assert!(matches!(
            view.get::<String>("publisher"),
            Err(Error::KeyNotFound { .. })
        ));
        assert!(matches!(
            view.get_optional::<i64>("title"),
            Err(Error::TypeMismatch { .. })
        ));

        Ok(())
    }

    #[test]
    fn it_gets_records_from_scopes_only() -> crate::Result<()> {
        let row = row();
        let view = row.keyed();

        assert_eq!(
            view.get_scope::<Author>("author")?,
            Author {
                id: 7,
                name: "Herbert".into()
            }
        );
        assert_eq!(view.get_optional_scope::<Author>("publisher")?, None);
        assert_eq!(view.get_optional_scope::<Author>("title")?, None);

        let error = view.get_scope::<Author>("publisher").unwrap_err();
        assert_eq!(error.path().to_string(), "publisher.id");

        assert!(matches!(
            view.get_scope::<Author>("title"),
            Err(Error::KeyNotFound { .. })
        ));

        Ok(())
    }

    #[test]
    fn it_gets_decodables_by_requested_shape() -> crate::Result<()> {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Publisher {
            name: Option<String>,
        }

        #[derive(Debug, Deserialize, PartialEq)]
        struct Name {
            name: String,
        }

        let row = row();
        let view = row.keyed();

        assert_eq!(view.get_decodable::<i64>("author")?, 7);
        assert_eq!(
            view.get_decodable::<Name>("author")?,
            Name {
                name: "Herbert".into()
            }
        );
        assert_eq!(view.get_optional_decodable::<f64>("rating")?, None);
        assert_eq!(view.get_optional_decodable::<Publisher>("publisher")?, None);
        assert_eq!(view.get_optional_decodable::<Name>("missing")?, None);
        assert_eq!(view.get_optional_decodable::<i64>("missing")?, None);

        assert!(matches!(
            view.get_decodable::<i64>("missing"),
            Err(Error::KeyNotFound { .. })
        ));

        let error = view.get_decodable::<Name>("title").unwrap_err();
        assert!(matches!(error, Error::KeyNotFound { .. }));
        assert_eq!(error.path().to_string(), "title");

        Ok(())
    }

    #[test]
    fn it_gets_the_same_value_for_converter_types_on_every_path() -> crate::Result<()> {
        let row = row();
        let view = row.keyed();

        let keyed = view.get::<i64>("id")?;
        let optional = view.get_optional::<i64>("id")?;
        let single = view.field("id").single_value().decode::<i64>()?;
        let decodable = view.get_decodable::<i64>("id")?;

        assert_eq!(Some(keyed), optional);
        assert_eq!(keyed, single);
        assert_eq!(keyed, decodable);

        Ok(())
    }

    #[test]
    fn it_refuses_positional_and_super_containers() {
        let row = row();
        let view = row.keyed();

        assert!(matches!(
            view.nested_keyed("author"),
            Err(Error::Unsupported { .. })
        ));
        assert!(matches!(
            view.nested_unkeyed("author"),
            Err(Error::Unsupported { .. })
        ));
        assert!(matches!(
            view.super_decoder(),
            Err(Error::Unsupported { .. })
        ));
    }

    #[test]
    fn it_resolves_keys_through_the_strategy() -> crate::Result<()> {
        let row = Row::new()
            .with_column("playerId", 4)
            .with_scope("homeTeam", Row::new().with_column("name", "Reds"));

        let options = DecodeOptions::new().key_strategy(KeyDecodingStrategy::ConvertToSnakeCase);
        let view = KeyedView::with_options(&row, &options);

        assert!(view.has("player_id"));
        assert!(view.has("home_team"));
        assert!(!view.has("playerId"));
        assert_eq!(view.get::<i64>("player_id")?, 4);
        assert_eq!(
            view.field("home_team")
                .keyed()?
                .get::<String>("name")?,
            "Reds"
        );

        Ok(())
    }

    #[test]
    fn it_lists_columns_differing_only_by_case_once() -> crate::Result<()> {
        let row = Row::new()
            .with_column("ID", 2)
            .with_column("id", 1)
            .with_column("Name", "Ada");
        let view = row.keyed();

        let names: Vec<String> = view
            .all_field_names()
            .into_iter()
            .map(|name| name.into_owned())
            .collect();

        assert_eq!(names, ["ID", "Name"]);
        assert_eq!(view.get::<i64>("id")?, 2);
        assert_eq!(view.get::<String>("name")?, "Ada");

        Ok(())
    }

    #[test]
    fn it_prefers_a_null_column_over_a_scope_for_optional_decodables() -> crate::Result<()> {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Inner {
            y: i64,
        }

        #[derive(Debug, Deserialize)]
        struct Outer {
            x: Option<Inner>,
        }

        let row = Row::new()
            .with_column("x", RawValue::Null)
            .with_scope("x", Row::new().with_column("y", 1));
        let view = row.keyed();

        assert_eq!(view.get_optional_decodable::<Inner>("x")?, None);
        assert_eq!(view.get_optional::<i64>("x")?, None);

        let outer = Outer::deserialize(crate::de::RowDeserializer::new(&row))?;
        assert_eq!(outer.x, None);

        let row = Row::new().with_scope("x", Row::new().with_column("y", 1));

        assert_eq!(
            row.keyed().get_optional_decodable::<Inner>("x")?,
            Some(Inner { y: 1 })
        );

        Ok(())
    }
}
