use std::collections::BTreeMap;

use super::structure::Structure;
use crate::io::error::Error;

/// Data items attached to one SDF record, keyed by item name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    items: BTreeMap<String, String>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an item, replacing any earlier value stored under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.items.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.items.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Annotations {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut annotations = Annotations::new();
        for (k, v) in iter {
            annotations.insert(k, v);
        }
        annotations
    }
}

/// One successfully decoded SDF record.
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    /// First header line of the molfile.
    pub title: String,
    /// The molfile block up to and including `M  END`, newline-terminated.
    pub molblock: String,
    pub structure: Structure,
    pub annotations: Annotations,
}

impl Molecule {
    /// Returns the value of a data item, if the record carries it.
    pub fn annotation(&self, name: &str) -> Option<&str> {
        self.annotations.get(name)
    }
}

/// One entry of an SDF document, in document order.
///
/// Entries whose connection table cannot be decoded are kept as
/// [`ParsedMolecule::Invalid`] so that callers can count and log them; they
/// never abort iteration over the remaining records.
#[derive(Debug)]
pub enum ParsedMolecule {
    Valid(Molecule),
    Invalid {
        /// Zero-based position of the record within the document.
        index: usize,
        /// One-based line number where the record starts.
        line: usize,
        reason: Error,
    },
}

impl ParsedMolecule {
    #[inline]
    pub fn is_valid(&self) -> bool {
        matches!(self, ParsedMolecule::Valid(_))
    }

    pub fn molecule(&self) -> Option<&Molecule> {
        match self {
            ParsedMolecule::Valid(m) => Some(m),
            ParsedMolecule::Invalid { .. } => None,
        }
    }

    pub fn into_molecule(self) -> Option<Molecule> {
        match self {
            ParsedMolecule::Valid(m) => Some(m),
            ParsedMolecule::Invalid { .. } => None,
        }
    }
}
