mod fetch;
mod read;
mod shell;

use std::path::Path;

use anyhow::{Context, Result};

use cid_forge::Dataset;

use crate::cli::Command;
use crate::config::Settings;
use crate::display::Context as DisplayContext;
use crate::io::{OutputSpec, write_stdout_table};

pub fn dispatch(command: Command, settings: &Settings, ctx: DisplayContext) -> Result<()> {
    match command {
        Command::Fetch(args) => fetch::run_fetch(args, settings, ctx),
        Command::Read(args) => read::run_read(args, settings, ctx),
        Command::Shell(args) => shell::run_shell(args, settings, ctx),
    }
}

/// Writes `dataset` to the resolved target; `None` means display only.
fn write_output(dataset: &Dataset, spec: &OutputSpec) -> Result<()> {
    match spec {
        OutputSpec::None => Ok(()),
        OutputSpec::File { path, format } => save(dataset, path, *format),
        OutputSpec::Stdout(format) => write_stdout_table(dataset, *format),
    }
}

fn save(dataset: &Dataset, path: &Path, format: cid_forge::Format) -> Result<()> {
    cid_forge::export_to_path(dataset, path, format)
        .with_context(|| format!("Failed to save records to {}", path.display()))
}
