//! The structural-parsing capability used for derived columns.
//!
//! The SDF reader already decodes and checks connectivity; a [`Toolkit`]
//! only has to turn a decoded molecule into its canonical identifier (InChI).
//! Any failure is reported as an [`Error`] and the extractor falls back to the
//! sentinel value.

mod external;

pub use external::{ExternalToolkit, ExternalToolkitConfig};

use std::time::Duration;

use thiserror::Error;

use crate::model::molecule::Molecule;

#[derive(Debug, Error)]
pub enum Error {
    #[error("InChI generation is disabled")]
    Disabled,

    #[error("toolkit program '{0}' was not found")]
    NotFound(String),

    #[error("failed to run toolkit program '{program}': {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("toolkit program '{program}' did not finish within {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    #[error("toolkit program '{program}' exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("toolkit program '{0}' produced no InChI")]
    NoInchi(String),
}

/// Computes canonical identifiers for decoded molecules.
pub trait Toolkit {
    fn inchi(&self, molecule: &Molecule) -> Result<String, Error>;
}

impl<T: Toolkit + ?Sized> Toolkit for &T {
    fn inchi(&self, molecule: &Molecule) -> Result<String, Error> {
        (**self).inchi(molecule)
    }
}

impl<T: Toolkit + ?Sized> Toolkit for Box<T> {
    fn inchi(&self, molecule: &Molecule) -> Result<String, Error> {
        (**self).inchi(molecule)
    }
}

/// A toolkit that never produces an identifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledToolkit;

impl Toolkit for DisabledToolkit {
    fn inchi(&self, _molecule: &Molecule) -> Result<String, Error> {
        Err(Error::Disabled)
    }
}
