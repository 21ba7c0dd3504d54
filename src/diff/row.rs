// ABOUTME: Metadata row representation shared by every schema-object kind
// ABOUTME: String-valued attribute map where the literal "null" stands for SQL NULL

use std::collections::BTreeMap;
use std::fmt;

/// Marker the catalog queries use for SQL NULL values
pub const NULL_MARKER: &str = "null";

/// One schema object's attributes as delivered by a metadata query
///
/// Values are kept as strings exactly as the catalog produced them. A NULL in the
/// source query is stored as [`NULL_MARKER`]; an attribute that is absent from the
/// map altogether means the row was not shaped for the kind reading it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaRow {
    attrs: BTreeMap<String, String>,
}

impl SchemaRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for constructing rows in tests
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(name.into(), value.into());
    }

    /// Raw lookup, `None` when the attribute is missing
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Lenient lookup used by the comparators and change emitters
    ///
    /// A missing attribute is reported as a diagnostic and read as the empty string,
    /// so a malformed row degrades the output instead of aborting the run.
    pub fn attr(&self, name: &str) -> &str {
        match self.attrs.get(name) {
            Some(value) => value.as_str(),
            None => {
                tracing::warn!("Row is missing attribute '{}': {}", name, self);
                ""
            }
        }
    }

    /// True when the attribute holds the NULL marker
    pub fn is_null(&self, name: &str) -> bool {
        self.get(name) == Some(NULL_MARKER)
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for SchemaRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            attrs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl fmt::Display for SchemaRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        write!(f, "}}")
    }
}
