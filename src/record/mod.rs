//! The record schema and the extraction of one record per molecule.
//!
//! [`CATALOGUE`] is the single source of truth for both extraction and export
//! column order: every [`Record`] carries the requesting identifier plus one
//! value per catalogue column, in catalogue order.

pub mod catalogue;
mod extract;

pub use catalogue::{CATALOGUE, CID_COLUMN, Column, Derived, FIELD_COUNT, Source};
pub use extract::extract;

/// Placeholder stored for any column whose value is unavailable.
pub const SENTINEL: &str = "N/A";

/// One schema-stable row: the requesting CID and one value per catalogue column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    cid: u64,
    values: [String; FIELD_COUNT],
}

impl Record {
    pub fn new(cid: u64, values: [String; FIELD_COUNT]) -> Self {
        Self { cid, values }
    }

    #[inline]
    pub fn cid(&self) -> u64 {
        self.cid
    }

    /// Values in catalogue order.
    #[inline]
    pub fn values(&self) -> &[String; FIELD_COUNT] {
        &self.values
    }

    /// Looks up a value by column name.
    pub fn get(&self, name: &str) -> Option<&str> {
        catalogue::position(name).map(|i| self.values[i].as_str())
    }

    /// Column names paired with their values, in catalogue order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        CATALOGUE
            .iter()
            .zip(self.values.iter())
            .map(|(c, v)| (c.name, v.as_str()))
    }
}
