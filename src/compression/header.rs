//! Ordered, multi-valued header mapping.

use std::fmt;

/// A header block: names mapped to one or more values, in insertion order.
///
/// Names are stored lowercase since SPDY/3 forbids uppercase header names on
/// the wire. Multiple values for one name are kept in the order they were
/// added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    entries: Vec<(String, Vec<String>)>,
}

impl Header {
    /// Create an empty header block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to the values stored under `name`.
    pub fn add(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        let name = name.as_ref().to_ascii_lowercase();
        let value = value.into();
        match self.position(&name) {
            Some(idx) => self.entries[idx].1.push(value),
            None => self.entries.push((name, vec![value])),
        }
    }

    /// Replace all values stored under `name` with `value`.
    ///
    /// An existing name keeps its original position.
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        let name = name.as_ref().to_ascii_lowercase();
        let value = value.into();
        match self.position(&name) {
            Some(idx) => self.entries[idx].1 = vec![value],
            None => self.entries.push((name, vec![value])),
        }
    }

    /// First value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).first().map(String::as_str)
    }

    /// All values stored under `name`, empty if absent.
    pub fn get_all(&self, name: &str) -> &[String] {
        let name = name.to_ascii_lowercase();
        match self.position(&name) {
            Some(idx) => &self.entries[idx].1,
            None => &[],
        }
    }

    /// Remove `name`, returning its values.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        let name = name.to_ascii_lowercase();
        self.position(&name).map(|idx| self.entries.remove(idx).1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(&name.to_ascii_lowercase()).is_some()
    }

    /// Iterate over `(name, values)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a name that is known not to be present yet.
    pub(crate) fn push_unique(&mut self, name: String, values: Vec<String>) {
        debug_assert!(self.position(&name).is_none());
        self.entries.push((name, values));
    }

    fn position(&self, lowercase_name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == lowercase_name)
    }
}

impl<N: AsRef<str>, V: Into<String>> FromIterator<(N, V)> for Header {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut header = Header::new();
        for (name, value) in iter {
            header.add(name, value);
        }
        header
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, values)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name:?}: {values:?}")?;
        }
        write!(f, "}}")
    }
}
