use std::thread;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{Error, Fetcher};

pub const DEFAULT_BASE_URL: &str = "https://pubchem.ncbi.nlm.nih.gov/rest/pug";

const INITIAL_BACKOFF: Duration = Duration::from_millis(500);

/// Connection settings for the PubChem PUG REST service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PubChemConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Extra attempts after the first one, for 5xx and transport failures.
    pub max_retries: u32,
    pub user_agent: String,
}

impl Default for PubChemConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            max_retries: 2,
            user_agent: concat!("cid-forge/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Blocking PubChem client fetching one SDF record set per CID.
#[derive(Debug, Clone)]
pub struct PubChemClient {
    client: Client,
    config: PubChemConfig,
}

impl PubChemClient {
    pub fn new(config: PubChemConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(Error::Client)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &PubChemConfig {
        &self.config
    }

    /// URL of the SDF document for `cid`.
    pub fn url(&self, cid: u64) -> String {
        format!(
            "{}/compound/cid/{cid}/SDF",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn attempt(&self, url: &str, cid: u64) -> Result<Vec<u8>, Error> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| Error::Transport { cid, source })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(cid));
        }
        if !status.is_success() {
            return Err(Error::Status {
                cid,
                status: status.as_u16(),
            });
        }

        response
            .bytes()
            .map(|body| body.to_vec())
            .map_err(|source| Error::Transport { cid, source })
    }
}

impl Fetcher for PubChemClient {
    fn fetch(&self, cid: u64) -> Result<Vec<u8>, Error> {
        let url = self.url(cid);
        let mut delay = INITIAL_BACKOFF;
        let mut retries = 0;

        loop {
            debug!(cid, %url, "requesting SDF");
            match self.attempt(&url, cid) {
                Ok(body) => {
                    debug!(cid, bytes = body.len(), "received SDF");
                    return Ok(body);
                }
                Err(e) if e.is_retryable() && retries < self.config.max_retries => {
                    retries += 1;
                    warn!(cid, attempt = retries, error = %e, "retrying after {delay:?}");
                    thread::sleep(delay);
                    delay *= 2;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
