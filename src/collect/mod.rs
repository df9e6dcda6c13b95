//! Aggregation of records across identifiers and documents.
//!
//! A [`Collector`] drives fetch, parse and extract for each requested CID in
//! order and appends the results to an explicit [`Dataset`]. Per-identifier
//! failures never abort a batch; the caller only sees one aggregate outcome.

mod collector;
mod dataset;
mod identifiers;

pub use collector::{BatchReport, Collector, Outcome};
pub use dataset::Dataset;
pub use identifiers::parse_identifiers;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("no data found ({attempted} identifier(s) attempted)")]
    NoData { attempted: usize },
}
