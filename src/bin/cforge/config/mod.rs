//! TOML settings and their command-line overrides.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use cid_forge::{
    DisabledToolkit, ExternalToolkit, ExternalToolkitConfig, PubChemClient, PubChemConfig,
    Toolkit,
};

use crate::cli::{PubChemOptions, ToolkitOptions};

pub const DEFAULT_EXPORT_PATH: &str = "compound_data.xlsx";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub pubchem: PubChemConfig,
    pub toolkit: ToolkitSettings,
    pub export: ExportSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ToolkitSettings {
    pub enabled: bool,
    #[serde(flatten)]
    pub external: ExternalToolkitConfig,
}

impl Default for ToolkitSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            external: ExternalToolkitConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Target of `save` in the shell when no file is given.
    pub default_path: PathBuf,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            default_path: PathBuf::from(DEFAULT_EXPORT_PATH),
        }
    }
}

/// `~/.cforge/<name>`, when a home directory is known.
pub fn user_file(name: &str) -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".cforge").join(name))
}

/// Loads settings from `path`, or from `~/.cforge/config.toml` when it
/// exists, or falls back to defaults.
pub fn load(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(p) => parse_file(p),
        None => match user_file("config.toml") {
            Some(p) if p.is_file() => parse_file(&p),
            _ => Ok(Settings::default()),
        },
    }
}

fn parse_file(path: &Path) -> Result<Settings> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse(&text).with_context(|| format!("Invalid config file: {}", path.display()))
}

pub fn parse(text: &str) -> Result<Settings, toml::de::Error> {
    toml::from_str(text)
}

pub fn pubchem_config(settings: &Settings, opts: &PubChemOptions) -> PubChemConfig {
    let mut config = settings.pubchem.clone();
    if let Some(timeout) = opts.timeout {
        config.timeout_secs = timeout;
    }
    if let Some(retries) = opts.retries {
        config.max_retries = retries;
    }
    if let Some(base_url) = &opts.base_url {
        config.base_url = base_url.clone();
    }
    config
}

pub fn build_fetcher(settings: &Settings, opts: &PubChemOptions) -> Result<PubChemClient> {
    PubChemClient::new(pubchem_config(settings, opts)).context("Failed to set up PubChem client")
}

pub fn build_toolkit(settings: &Settings, opts: &ToolkitOptions) -> Box<dyn Toolkit> {
    if opts.no_inchi || !settings.toolkit.enabled {
        Box::new(DisabledToolkit)
    } else {
        Box::new(ExternalToolkit::new(settings.toolkit.external.clone()))
    }
}

/// Short description of the InChI source for progress output.
pub fn toolkit_label(settings: &Settings, opts: &ToolkitOptions) -> String {
    if opts.no_inchi || !settings.toolkit.enabled {
        "InChI disabled".to_string()
    } else {
        format!("InChI via {}", settings.toolkit.external.program)
    }
}
