//! Core data structures for SDF records.
//!
//! - [`types`] – Atom symbols and CTfile bond types.
//! - [`atom`] – One connection-table atom with its coordinates.
//! - [`structure`] – The decoded connection table (atoms and bonds).
//! - [`molecule`] – A decoded record with its data items, and the per-entry
//!   validity wrapper yielded by the SDF reader.

pub mod atom;
pub mod molecule;
pub mod structure;
pub mod types;
