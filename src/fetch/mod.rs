//! Retrieval of raw SDF documents by compound identifier.

mod pubchem;

pub use pubchem::{PubChemClient, PubChemConfig};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("CID {0} was not found")]
    NotFound(u64),

    #[error("request for CID {cid} failed with HTTP status {status}")]
    Status { cid: u64, status: u16 },

    #[error("request for CID {cid} failed: {source}")]
    Transport {
        cid: u64,
        #[source]
        source: reqwest::Error,
    },
}

impl Error {
    /// Server errors and transport failures may succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Status { status, .. } => (500..600).contains(status),
            Error::Transport { .. } => true,
            Error::Client(_) | Error::NotFound(_) => false,
        }
    }
}

/// Produces the raw SDF document of one compound.
pub trait Fetcher {
    fn fetch(&self, cid: u64) -> Result<Vec<u8>, Error>;
}

impl<T: Fetcher + ?Sized> Fetcher for &T {
    fn fetch(&self, cid: u64) -> Result<Vec<u8>, Error> {
        (**self).fetch(cid)
    }
}

impl<T: Fetcher + ?Sized> Fetcher for Box<T> {
    fn fetch(&self, cid: u64) -> Result<Vec<u8>, Error> {
        (**self).fetch(cid)
    }
}
