use std::io::BufRead;
use std::path::Path;

use anyhow::{Result, bail};
use tracing::{debug, warn};

use cid_forge::{Dataset, IoError, Molecule, ParsedMolecule, SdfReader, Toolkit, extract};

use crate::cli::ReadArgs;
use crate::config::{Settings, build_toolkit, toolkit_label};
use crate::display::{Context as DisplayContext, Progress, print_records};
use crate::io::{OutputSpec, open_input, resolve_output, stdout_is_tty};
use crate::util::text::count;

const CID_ITEM: &str = "PUBCHEM_COMPOUND_CID";

#[derive(Debug, Default, PartialEq, Eq)]
struct FileStats {
    added: usize,
    invalid: usize,
    without_cid: usize,
}

impl FileStats {
    fn describe(&self, name: &str) -> String {
        let mut line = format!("{name}: {}", count(self.added, "record"));
        if self.invalid > 0 {
            line.push_str(&format!(", {} skipped", count(self.invalid, "invalid molecule")));
        }
        if self.without_cid > 0 {
            line.push_str(&format!(", {} without CID", self.without_cid));
        }
        line
    }
}

pub fn run_read(args: ReadArgs, settings: &Settings, ctx: DisplayContext) -> Result<()> {
    let output = resolve_output(&args.export, stdout_is_tty())?;
    let toolkit = build_toolkit(settings, &args.toolkit);

    let total_steps = if output == OutputSpec::None { 1 } else { 2 };
    let mut progress = Progress::new(ctx.interactive, total_steps);

    progress.step("Reading SDF files");
    let mut dataset = Dataset::new();
    let mut substeps = Vec::with_capacity(args.files.len() + 1);

    for path in &args.files {
        let name = display_name(path);
        progress.update(&name);

        let input = match open_input(path) {
            Ok(input) => input,
            Err(e) => {
                progress.abandon();
                return Err(e);
            }
        };
        let stats = read_molecules(input, args.cid, toolkit.as_ref(), &mut dataset);
        substeps.push(stats.describe(&name));
    }
    substeps.push(toolkit_label(settings, &args.toolkit));

    if dataset.is_empty() {
        progress.abandon();
        bail!(
            "No records could be extracted from {}. Molecules need a valid connection table and a CID (use --cid if the files lack {CID_ITEM}).",
            count(args.files.len(), "file")
        );
    }
    progress.complete_step("Reading SDF files", &substeps);

    if ctx.show_tables() {
        print_records(dataset.iter());
    }

    if output != OutputSpec::None {
        progress.step("Writing output");
        super::write_output(&dataset, &output)?;
        progress.complete_step("Writing output", &[output.describe()]);
    }

    progress.finish(&format!("Extracted {}", count(dataset.len(), "record")));
    Ok(())
}

fn display_name(path: &Path) -> String {
    if path == Path::new("-") {
        "stdin".to_string()
    } else {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    }
}

/// Appends one record per valid molecule in `input`.
///
/// The CID is `fixed_cid` when given, else the molecule's own CID data item;
/// molecules with neither are skipped.
fn read_molecules(
    input: impl BufRead,
    fixed_cid: Option<u64>,
    toolkit: &dyn Toolkit,
    dataset: &mut Dataset,
) -> FileStats {
    let mut stats = FileStats::default();

    for entry in SdfReader::new(input) {
        match entry {
            ParsedMolecule::Valid(molecule) => {
                let Some(cid) = fixed_cid.or_else(|| embedded_cid(&molecule)) else {
                    warn!(title = %molecule.title, "skipping molecule without a {CID_ITEM} item");
                    stats.without_cid += 1;
                    continue;
                };
                dataset.push(extract(cid, &molecule, toolkit));
                stats.added += 1;
            }
            ParsedMolecule::Invalid {
                index,
                line,
                reason,
            } => {
                if matches!(reason, IoError::Io { .. }) {
                    warn!(index, line, %reason, "input ended with a read error");
                } else {
                    debug!(index, line, %reason, "skipping invalid molecule");
                }
                stats.invalid += 1;
            }
        }
    }

    stats
}

fn embedded_cid(molecule: &Molecule) -> Option<u64> {
    molecule.annotation(CID_ITEM)?.trim().parse().ok()
}
