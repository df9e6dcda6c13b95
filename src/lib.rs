//! A pure Rust library for turning PubChem compound identifiers into a
//! uniform, schema-stable table of chemical properties.
//!
//! It fetches each compound's SDF document, decodes every molecule block in
//! it, maps a fixed catalogue of PubChem data items onto one record per
//! molecule, and exports the collected records as a spreadsheet or delimited
//! text table.
//!
//! # Features
//!
//! - **Tolerant SDF parsing** — V2000 and V3000 connection tables; malformed
//!   blocks are marked invalid and skipped while their siblings are kept
//! - **Schema-stable records** — every record carries the requesting CID plus
//!   one value per catalogue column, with `"N/A"` for absent data items
//! - **Derived InChI** — computed through a pluggable [`Toolkit`] (Open Babel
//!   by default), falling back to the sentinel when unavailable
//! - **Batch collection** — sequential fetching with a single aggregate
//!   outcome per batch
//! - **Export** — XLSX, CSV and TSV
//!
//! # Quick Start
//!
//! A [`Collector`] combines a [`Fetcher`] and a [`Toolkit`]; records are
//! appended to an explicit [`Dataset`] which is then exported:
//!
//! ```
//! use cid_forge::{Collector, Dataset, DisabledToolkit, FetchError, Fetcher, Format};
//!
//! // Serves the same one-molecule document for any CID
//! struct Local(&'static str);
//!
//! impl Fetcher for Local {
//!     fn fetch(&self, _cid: u64) -> Result<Vec<u8>, FetchError> {
//!         Ok(self.0.as_bytes().to_vec())
//!     }
//! }
//!
//! let sdf = concat!(
//!     "5793\n",
//!     "  -OEChem-\n",
//!     "\n",
//!     "  1  0  0     0  0  0  0  0  0999 V2000\n",
//!     "    0.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0\n",
//!     "M  END\n",
//!     "> <PUBCHEM_MOLECULAR_FORMULA>\n",
//!     "C6H12O6\n",
//!     "\n",
//!     "$$$$\n",
//! );
//!
//! let collector = Collector::new(Local(sdf), DisabledToolkit);
//! let mut dataset = Dataset::new();
//!
//! // "abc" is not an identifier and is ignored
//! let report = collector.submit(&mut dataset, "5793, abc")?;
//! assert_eq!(report.attempted(), 1);
//! assert_eq!(report.added(), 1);
//!
//! let record = &dataset.records()[0];
//! assert_eq!(record.cid(), 5793);
//! assert_eq!(record.get("Molecular Formula"), Some("C6H12O6"));
//! assert_eq!(record.get("XLogP3"), Some("N/A"));
//!
//! let mut csv = Vec::new();
//! cid_forge::export(&dataset, Format::Csv, &mut csv)?;
//! assert!(csv.starts_with(b"CID,OpenEye Name,InChI,"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Module Organization
//!
//! - [`io`] — SDF reading and table writing
//! - [`record`] — The column catalogue, [`Record`] and [`extract`]
//! - [`collect`] — [`Dataset`], [`Collector`] and identifier parsing
//! - [`fetch`] — The [`Fetcher`] seam and the PubChem HTTP client
//! - [`toolkit`] — The [`Toolkit`] seam and its implementations
//! - [`export`](mod@export) — Writing a dataset to a sink or a file

mod model;

pub mod collect;
pub mod export;
pub mod fetch;
pub mod io;
pub mod record;
pub mod toolkit;

pub use model::atom::Atom;
pub use model::molecule::{Annotations, Molecule, ParsedMolecule};
pub use model::structure::{Bond, Structure};
pub use model::types::{AtomSymbol, BondOrder, ParseAtomSymbolError, ParseBondOrderError};

pub use collect::{BatchReport, Collector, Dataset, Outcome, parse_identifiers};
pub use export::{export, export_to_path};
pub use fetch::{Fetcher, PubChemClient, PubChemConfig};
pub use io::{Format, SdfReader};
pub use record::{CATALOGUE, FIELD_COUNT, Record, SENTINEL, extract};
pub use toolkit::{DisabledToolkit, ExternalToolkit, ExternalToolkitConfig, Toolkit};

pub use collect::Error as CollectError;
pub use export::Error as ExportError;
pub use fetch::Error as FetchError;
pub use io::Error as IoError;
pub use toolkit::Error as ToolkitError;
