use std::fmt::{self, Display, Formatter};

/// The chain of field names traversed so far while decoding a nested record.
///
/// The last segment names the field currently being decoded. An empty path is the top
/// level of a row, before any field has been selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// The empty path of a top-level row.
    pub const fn root() -> Self {
        FieldPath {
            segments: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Name of the field currently being decoded, if any.
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Returns a new path with `name` appended.
    pub fn join(&self, name: &str) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(name.to_owned());

        FieldPath { segments }
    }

    /// Returns a new path with `name` put in front of every other segment.
    pub(crate) fn prepend(mut self, name: &str) -> Self {
        self.segments.insert(0, name.to_owned());
        self
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl From<&str> for FieldPath {
    fn from(name: &str) -> Self {
        FieldPath::root().join(name)
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<row>");
        }

        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }

            f.write_str(segment)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::FieldPath;

    #[test]
    fn it_joins_without_touching_the_parent() {
        let root = FieldPath::root();
        let author = root.join("author");
        let name = author.join("name");

        assert!(root.is_root());
        assert_eq!(author.last(), Some("author"));
        assert_eq!(name.last(), Some("name"));
        assert_eq!(name.len(), 2);
        assert_eq!(name.to_string(), "author.name");
        assert_eq!(root.to_string(), "<row>");
    }

    #[test]
    fn it_prepends_scope_names() {
        let path = FieldPath::from("name").prepend("author").prepend("book");

        assert_eq!(path.to_string(), "book.author.name");
        assert_eq!(path.segments().collect::<Vec<_>>(), ["book", "author", "name"]);
    }
}
