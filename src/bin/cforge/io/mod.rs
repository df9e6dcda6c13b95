use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, IsTerminal, Read, Stdin, StdoutLock, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};

use cid_forge::Format;

use crate::cli::ExportOptions;

/// Returns `true` if stderr is a terminal (interactive).
pub fn stderr_is_tty() -> bool {
    io::stderr().is_terminal()
}

/// Returns `true` if stdin is a terminal (interactive).
pub fn stdin_is_tty() -> bool {
    io::stdin().is_terminal()
}

/// Returns `true` if stdout is a terminal (interactive).
pub fn stdout_is_tty() -> bool {
    io::stdout().is_terminal()
}

pub enum InputSource {
    File(BufReader<File>),
    Stdin(BufReader<Stdin>),
}

impl Read for InputSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            InputSource::File(r) => r.read(buf),
            InputSource::Stdin(r) => r.read(buf),
        }
    }
}

impl BufRead for InputSource {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            InputSource::File(r) => r.fill_buf(),
            InputSource::Stdin(r) => r.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            InputSource::File(r) => r.consume(amt),
            InputSource::Stdin(r) => r.consume(amt),
        }
    }
}

/// Opens an SDF input; `-` is stdin.
pub fn open_input(path: &Path) -> Result<InputSource> {
    if path == Path::new("-") {
        if stdin_is_tty() {
            bail!("Reading SDF from stdin, but stdin is a terminal. Pipe a file or pass its path.");
        }
        return Ok(InputSource::Stdin(BufReader::new(io::stdin())));
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    Ok(InputSource::File(BufReader::new(file)))
}

pub fn stdout_target() -> BufWriter<StdoutLock<'static>> {
    BufWriter::new(io::stdout().lock())
}

/// Where a command's table goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSpec {
    /// Nothing requested; records are only displayed.
    None,
    File { path: std::path::PathBuf, format: Format },
    Stdout(Format),
}

impl OutputSpec {
    pub fn describe(&self) -> String {
        match self {
            OutputSpec::None => "nothing".to_string(),
            OutputSpec::File { path, format } => format!("Write {format} → {}", path.display()),
            OutputSpec::Stdout(format) => format!("Write {format} → stdout"),
        }
    }
}

/// Resolves `-o` / `--format` into an output target.
///
/// The extension decides the format unless `--format` is given; `--format`
/// alone writes to stdout, which must not be a terminal for XLSX.
pub fn resolve_output(opts: &ExportOptions, stdout_is_terminal: bool) -> Result<OutputSpec> {
    match (&opts.output, opts.format) {
        (None, None) => Ok(OutputSpec::None),
        (None, Some(format)) => {
            let format = Format::from(format);
            if format == Format::Xlsx && stdout_is_terminal {
                bail!("Refusing to write an XLSX workbook to a terminal on stdout. Use -o FILE.");
            }
            Ok(OutputSpec::Stdout(format))
        }
        (Some(path), Some(format)) => Ok(OutputSpec::File {
            path: path.clone(),
            format: format.into(),
        }),
        (Some(path), None) => match Format::from_path(path) {
            Some(format) if format.is_tabular() => Ok(OutputSpec::File {
                path: path.clone(),
                format,
            }),
            _ => bail!(
                "Cannot infer table format from '{}'. Use --format to specify.",
                path.display()
            ),
        },
    }
}

pub fn write_stdout_table(dataset: &cid_forge::Dataset, format: Format) -> Result<()> {
    let mut out = stdout_target();
    cid_forge::export(dataset, format, &mut out).context("Failed to write table to stdout")?;
    out.flush().context("Failed to flush stdout")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::cli::TableFormat;

    fn opts(output: Option<&str>, format: Option<TableFormat>) -> ExportOptions {
        ExportOptions {
            output: output.map(PathBuf::from),
            format,
        }
    }

    #[test]
    fn no_flags_means_display_only() {
        assert_eq!(resolve_output(&opts(None, None), true).unwrap(), OutputSpec::None);
    }

    #[test]
    fn extension_selects_format() {
        assert_eq!(
            resolve_output(&opts(Some("out.TSV"), None), true).unwrap(),
            OutputSpec::File {
                path: PathBuf::from("out.TSV"),
                format: Format::Tsv
            }
        );
    }

    #[test]
    fn explicit_format_beats_extension() {
        assert_eq!(
            resolve_output(&opts(Some("out.txt"), Some(TableFormat::Csv)), true).unwrap(),
            OutputSpec::File {
                path: PathBuf::from("out.txt"),
                format: Format::Csv
            }
        );
    }

    #[test]
    fn unknown_or_sdf_extension_is_rejected() {
        assert!(resolve_output(&opts(Some("out.txt"), None), true).is_err());
        assert!(resolve_output(&opts(Some("out.sdf"), None), true).is_err());
    }

    #[test]
    fn xlsx_on_terminal_stdout_is_rejected() {
        assert!(resolve_output(&opts(None, Some(TableFormat::Xlsx)), true).is_err());
        assert_eq!(
            resolve_output(&opts(None, Some(TableFormat::Xlsx)), false).unwrap(),
            OutputSpec::Stdout(Format::Xlsx)
        );
        assert_eq!(
            resolve_output(&opts(None, Some(TableFormat::Csv)), true).unwrap(),
            OutputSpec::Stdout(Format::Csv)
        );
    }

    #[test]
    fn missing_input_file_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(open_input(&dir.path().join("absent.sdf")).is_err());
    }
}
