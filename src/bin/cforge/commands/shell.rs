use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use cid_forge::{Collector, Dataset, Fetcher, Format, Toolkit};

use crate::cli::ShellArgs;
use crate::config::{self, Settings, build_fetcher, build_toolkit};
use crate::display::{Context as DisplayContext, print_batch_summary, print_error, print_records};
use crate::util::text::count;

const PROMPT: &str = "cforge> ";
const HISTORY_FILE: &str = "history.txt";

#[derive(Debug, PartialEq, Eq)]
enum ShellCommand<'a> {
    Exit,
    Help,
    Show,
    Clear,
    Save(Option<&'a str>),
    Fetch(&'a str),
}

/// Anything that is not a keyword is taken as a CID list.
fn parse_line(line: &str) -> ShellCommand<'_> {
    let (head, rest) = line
        .split_once(char::is_whitespace)
        .map(|(head, rest)| (head, rest.trim()))
        .unwrap_or((line, ""));

    match head {
        "exit" | "quit" | "q" => ShellCommand::Exit,
        "help" | "?" => ShellCommand::Help,
        "show" => ShellCommand::Show,
        "clear" => ShellCommand::Clear,
        "save" => ShellCommand::Save((!rest.is_empty()).then_some(rest)),
        _ => ShellCommand::Fetch(line),
    }
}

pub fn run_shell(args: ShellArgs, settings: &Settings, ctx: DisplayContext) -> Result<()> {
    let collector = Collector::new(
        build_fetcher(settings, &args.pubchem)?,
        build_toolkit(settings, &args.toolkit),
    );

    let mut editor = DefaultEditor::new().context("Failed to initialise the line editor")?;
    let history = history_path();
    if let Some(path) = &history {
        let _ = editor.load_history(path);
    }

    eprintln!("Enter CIDs separated by commas. Type 'help' for commands, 'exit' to quit.");
    eprintln!();

    let mut session = Session {
        collector,
        settings,
        ctx,
        dataset: Dataset::new(),
    };

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);

                if !session.execute(parse_line(line)) {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                eprintln!("Use 'exit' to quit");
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e).context("Failed to read input"),
        }
    }

    if let Some(path) = &history {
        if let Err(e) = editor.save_history(path) {
            debug!(path = %path.display(), error = %e, "could not save shell history");
        }
    }
    Ok(())
}

fn history_path() -> Option<PathBuf> {
    let path = config::user_file(HISTORY_FILE)?;
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    Some(path)
}

struct Session<'a, F, T> {
    collector: Collector<F, T>,
    settings: &'a Settings,
    ctx: DisplayContext,
    dataset: Dataset,
}

impl<F: Fetcher, T: Toolkit> Session<'_, F, T> {
    /// Runs one command; returns `false` when the session should end.
    fn execute(&mut self, command: ShellCommand<'_>) -> bool {
        match command {
            ShellCommand::Exit => return false,
            ShellCommand::Help => print_help(),
            ShellCommand::Show => self.show(),
            ShellCommand::Clear => {
                self.dataset.clear();
                eprintln!("Records cleared.");
            }
            ShellCommand::Save(target) => {
                if let Err(e) = self.save(target) {
                    print_error(&e);
                }
            }
            ShellCommand::Fetch(input) => self.fetch(input),
        }
        true
    }

    fn fetch(&mut self, input: &str) {
        // Every request starts over; `save` exports only the latest batch.
        self.dataset.clear();

        match self.collector.submit(&mut self.dataset, input) {
            Ok(report) => {
                if self.ctx.show_tables() {
                    print_records(self.dataset.iter());
                    if report.failed().next().is_some() {
                        print_batch_summary(&report);
                    }
                }
                eprintln!(
                    "Collected {} from {}.",
                    count(report.added(), "record"),
                    count(report.attempted(), "CID")
                );
            }
            Err(e) => print_error(&anyhow::Error::from(e).context("Fetching compounds failed")),
        }
    }

    fn show(&self) {
        if self.dataset.is_empty() {
            eprintln!("No records yet. Enter one or more CIDs to fetch them.");
        } else {
            print_records(self.dataset.iter());
        }
    }

    fn save(&self, target: Option<&str>) -> Result<()> {
        let path = target
            .map(PathBuf::from)
            .unwrap_or_else(|| self.settings.export.default_path.clone());
        let format = table_format(&path)?;

        super::save(&self.dataset, &path, format)?;
        eprintln!(
            "Saved {} to {}.",
            count(self.dataset.len(), "record"),
            path.display()
        );
        Ok(())
    }
}

fn table_format(path: &Path) -> Result<Format> {
    Format::from_path(path)
        .ok_or_else(|| anyhow!("Cannot infer a table format from '{}'", path.display()))
}

#[rustfmt::skip]
fn print_help() {
    eprintln!();
    eprintln!("  <CID>[,<CID>...]   Fetch compounds, replacing the current records");
    eprintln!("  show               Print the current records");
    eprintln!("  save [FILE]        Export to FILE (.xlsx, .csv or .tsv)");
    eprintln!("  clear              Drop the current records");
    eprintln!("  help               Show this help");
    eprintln!("  exit               Leave the shell");
    eprintln!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_recognised() {
        assert_eq!(parse_line("exit"), ShellCommand::Exit);
        assert_eq!(parse_line("quit"), ShellCommand::Exit);
        assert_eq!(parse_line("?"), ShellCommand::Help);
        assert_eq!(parse_line("show"), ShellCommand::Show);
        assert_eq!(parse_line("clear"), ShellCommand::Clear);
    }

    #[test]
    fn save_takes_an_optional_path() {
        assert_eq!(parse_line("save"), ShellCommand::Save(None));
        assert_eq!(parse_line("save  out.csv "), ShellCommand::Save(Some("out.csv")));
    }

    #[test]
    fn other_input_is_a_cid_list() {
        assert_eq!(parse_line("2244, 702"), ShellCommand::Fetch("2244, 702"));
        assert_eq!(parse_line("aspirin"), ShellCommand::Fetch("aspirin"));
    }

    #[test]
    fn save_target_needs_a_table_extension() {
        assert_eq!(table_format(Path::new("a.TSV")).unwrap(), Format::Tsv);
        let err = table_format(Path::new("records")).unwrap_err();
        assert!(err.to_string().contains("Cannot infer"));
    }
}
