//! Reading SDF documents and writing record tables.
//!
//! - [`sdf`] – Lazy SDF reader yielding one [`ParsedMolecule`](crate::ParsedMolecule)
//!   per record, tolerant of malformed connection tables.
//! - [`table`] – Spreadsheet (XLSX) and delimited (CSV/TSV) writers for a
//!   [`Dataset`](crate::Dataset).

use std::fmt;
use std::path::Path;

pub mod error;
pub mod sdf;
pub mod table;

pub use error::Error;
pub use sdf::{SdfReader, parse};
pub use table::TableWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Sdf,
    Xlsx,
    Csv,
    Tsv,
}

impl Format {
    /// Infers a format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "sdf" | "sd" | "mol" => Some(Format::Sdf),
            "xlsx" => Some(Format::Xlsx),
            "csv" => Some(Format::Csv),
            "tsv" | "tab" => Some(Format::Tsv),
            _ => None,
        }
    }

    /// Returns `true` for formats a [`TableWriter`] can produce.
    #[inline]
    pub fn is_tabular(&self) -> bool {
        !matches!(self, Format::Sdf)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Sdf => write!(f, "SDF"),
            Format::Xlsx => write!(f, "XLSX"),
            Format::Csv => write!(f, "CSV"),
            Format::Tsv => write!(f, "TSV"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_path_is_case_insensitive() {
        assert_eq!(Format::from_path(Path::new("out.XLSX")), Some(Format::Xlsx));
        assert_eq!(Format::from_path(Path::new("a/b.csv")), Some(Format::Csv));
        assert_eq!(Format::from_path(Path::new("b.tab")), Some(Format::Tsv));
        assert_eq!(Format::from_path(Path::new("2244.sdf")), Some(Format::Sdf));
        assert_eq!(Format::from_path(Path::new("noext")), None);
        assert_eq!(Format::from_path(Path::new("data.json")), None);
    }

    #[test]
    fn only_table_formats_are_tabular() {
        assert!(Format::Xlsx.is_tabular());
        assert!(Format::Tsv.is_tabular());
        assert!(!Format::Sdf.is_tabular());
    }
}
