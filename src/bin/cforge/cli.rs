use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use cid_forge::Format;

#[derive(Parser)]
#[command(
    name = "cforge",
    about = "Fetch PubChem compounds and export their properties as tables",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch compounds from PubChem by CID
    #[command(visible_alias = "f")]
    Fetch(FetchArgs),

    /// Extract records from local SDF files
    #[command(visible_alias = "r")]
    Read(ReadArgs),

    /// Interactive session: enter CIDs, inspect, save
    #[command(visible_alias = "s")]
    Shell(ShellArgs),
}

/// Options accepted by every command.
#[derive(Args)]
pub struct GlobalOptions {
    /// Configuration file (TOML)
    #[arg(long, value_name = "FILE", env = "CFORGE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress output and tables (for scripting)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Where and how the collected table is written.
#[derive(Args)]
#[command(next_help_heading = "Output")]
pub struct ExportOptions {
    /// Output file; the format is inferred from its extension
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Table format (overrides the extension; writes to stdout without -o)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<TableFormat>,
}

/// InChI generation options.
#[derive(Args)]
#[command(next_help_heading = "InChI")]
pub struct ToolkitOptions {
    /// Do not run the external toolkit; InChI cells hold "N/A"
    #[arg(long)]
    pub no_inchi: bool,
}

/// PubChem connection options (override the configuration file).
#[derive(Args)]
#[command(next_help_heading = "PubChem")]
pub struct PubChemOptions {
    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Retries for server and network errors
    #[arg(long, value_name = "N")]
    pub retries: Option<u32>,

    /// PUG REST base URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,
}

#[derive(Args)]
pub struct FetchArgs {
    /// CIDs, as separate arguments and/or comma-separated lists
    #[arg(value_name = "CIDS", required = true)]
    pub cids: Vec<String>,

    #[command(flatten)]
    pub export: ExportOptions,

    #[command(flatten)]
    pub pubchem: PubChemOptions,

    #[command(flatten)]
    pub toolkit: ToolkitOptions,
}

#[derive(Args)]
pub struct ReadArgs {
    /// SDF files to read ("-" for stdin)
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    /// CID recorded for every molecule (default: the PUBCHEM_COMPOUND_CID item)
    #[arg(long, value_name = "N")]
    pub cid: Option<u64>,

    #[command(flatten)]
    pub export: ExportOptions,

    #[command(flatten)]
    pub toolkit: ToolkitOptions,
}

#[derive(Args)]
pub struct ShellArgs {
    #[command(flatten)]
    pub pubchem: PubChemOptions,

    #[command(flatten)]
    pub toolkit: ToolkitOptions,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TableFormat {
    Xlsx,
    Csv,
    /// Tab-separated values
    #[value(alias = "tab")]
    Tsv,
}

impl From<TableFormat> for Format {
    fn from(format: TableFormat) -> Self {
        match format {
            TableFormat::Xlsx => Format::Xlsx,
            TableFormat::Csv => Format::Csv,
            TableFormat::Tsv => Format::Tsv,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn fetch_accepts_several_cid_arguments() {
        let cli = Cli::try_parse_from(["cforge", "fetch", "2244,702", "5793", "-o", "out.csv"])
            .expect("valid command line");
        match cli.command {
            Command::Fetch(args) => {
                assert_eq!(args.cids, vec!["2244,702", "5793"]);
                assert_eq!(args.export.output, Some(PathBuf::from("out.csv")));
                assert!(!args.toolkit.no_inchi);
            }
            _ => panic!("expected fetch"),
        }
    }

    #[test]
    fn global_flags_work_after_the_subcommand() {
        let cli = Cli::try_parse_from(["cforge", "read", "a.sdf", "-vv", "--cid", "7"])
            .expect("valid command line");
        assert_eq!(cli.global.verbose, 2);
        match cli.command {
            Command::Read(args) => assert_eq!(args.cid, Some(7)),
            _ => panic!("expected read"),
        }
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["cforge", "-q", "-v", "shell"]).is_err());
    }

    #[test]
    fn table_format_maps_to_library_format() {
        assert_eq!(Format::from(TableFormat::Tsv), Format::Tsv);
        assert_eq!(Format::from(TableFormat::Xlsx), Format::Xlsx);
    }
}
