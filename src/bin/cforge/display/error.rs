use std::io::{self, Write};

use anyhow::Error;

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    for line in wrap(&err.to_string(), 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    for cause in err.chain().skip(1) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 57) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
    }

    if let Some(hints) = HintCollector::collect(err) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

struct HintCollector {
    hints: Vec<String>,
    has_typed_hints: bool,
}

impl HintCollector {
    fn new() -> Self {
        Self {
            hints: Vec::new(),
            has_typed_hints: false,
        }
    }

    fn collect(err: &Error) -> Option<Vec<String>> {
        let mut collector = Self::new();

        for cause in err.chain() {
            collector.collect_collect_hints(cause);
            collector.collect_export_hints(cause);
            collector.collect_fetch_hints(cause);
            collector.collect_toolkit_hints(cause);
            collector.collect_config_hints(cause);
        }

        if !collector.has_typed_hints {
            collector.collect_fallback_hints(err);
        }

        (!collector.hints.is_empty()).then_some(collector.hints)
    }

    fn add(&mut self, hint: impl Into<String>) {
        let hint = hint.into();
        if !self.hints.contains(&hint) {
            self.hints.push(hint);
        }
    }

    fn mark_typed(&mut self) {
        self.has_typed_hints = true;
    }

    fn collect_collect_hints(&mut self, cause: &(dyn std::error::Error + 'static)) {
        use cid_forge::CollectError;

        let Some(CollectError::NoData { attempted }) = cause.downcast_ref::<CollectError>() else {
            return;
        };

        self.mark_typed();

        if *attempted == 0 {
            self.add("No numeric CID was given; identifiers must be plain digits");
            self.add("Separate several CIDs with commas, e.g. 2244,702");
        } else {
            self.add("None of the requested compounds produced a record");
            self.add("Check that the CIDs exist on PubChem");
            self.add("Run with -v to see the result for each CID");
        }
    }

    fn collect_export_hints(&mut self, cause: &(dyn std::error::Error + 'static)) {
        use cid_forge::{ExportError, IoError};

        let Some(export_err) = cause.downcast_ref::<ExportError>() else {
            return;
        };

        self.mark_typed();

        match export_err {
            ExportError::EmptyDataset => {
                self.add("Fetch or read some compounds before saving");
            }

            ExportError::Create { source, .. } => {
                self.collect_std_io_hints(source);
            }

            ExportError::Write { source, .. } => match source {
                IoError::Io { source } => self.collect_std_io_hints(source),
                IoError::UnsupportedWriteFormat(_) => {
                    self.add("Tables can be written as xlsx, csv or tsv");
                    self.add("Choose the format with --format or the file extension");
                }
                IoError::Xlsx(_) => {
                    self.add("The workbook could not be built");
                    self.add("Excel sheets hold at most 1,048,576 rows; try --format csv");
                }
                IoError::Csv(_) => {
                    self.add("The delimited table could not be written");
                    self.add("Check available disk space and output permissions");
                }
                IoError::Parse { .. } => {}
            },
        }
    }

    fn collect_fetch_hints(&mut self, cause: &(dyn std::error::Error + 'static)) {
        use cid_forge::FetchError;

        let Some(fetch_err) = cause.downcast_ref::<FetchError>() else {
            return;
        };

        self.mark_typed();

        match fetch_err {
            FetchError::Client(_) => {
                self.add("The HTTP client could not be initialised");
                self.add("Check the TLS setup of this system");
            }
            FetchError::NotFound(cid) => {
                self.add(format!("PubChem has no compound with CID {cid}"));
            }
            FetchError::Status { status, .. } if *status == 503 || *status == 429 => {
                self.add("PubChem is throttling requests or temporarily unavailable");
                self.add("Wait a moment, or raise --retries");
            }
            FetchError::Status { .. } => {
                self.add("PubChem rejected the request");
                self.add("Check --base-url and the [pubchem] config section");
            }
            FetchError::Transport { .. } => {
                self.add("Could not reach PubChem");
                self.add("Check the network connection or raise --timeout");
            }
        }
    }

    fn collect_toolkit_hints(&mut self, cause: &(dyn std::error::Error + 'static)) {
        use cid_forge::ToolkitError;

        let Some(toolkit_err) = cause.downcast_ref::<ToolkitError>() else {
            return;
        };

        self.mark_typed();

        match toolkit_err {
            ToolkitError::NotFound(program) => {
                self.add(format!("'{program}' is not installed or not on PATH"));
                self.add("Install Open Babel, set [toolkit] program, or pass --no-inchi");
            }
            ToolkitError::Timeout { .. } => {
                self.add("Raise [toolkit] timeout_secs in the config file");
            }
            _ => {
                self.add("InChI generation failed; pass --no-inchi to skip it");
            }
        }
    }

    fn collect_config_hints(&mut self, cause: &(dyn std::error::Error + 'static)) {
        if cause.downcast_ref::<toml::de::Error>().is_none() {
            return;
        }

        self.mark_typed();
        self.add("The config file is not valid TOML for cforge");
        self.add("Known sections: [pubchem], [toolkit], [export]");
    }

    fn collect_std_io_hints(&mut self, source: &std::io::Error) {
        use std::io::ErrorKind;

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check the path spelling and that the parent directory exists");
            }

            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Check file permissions with `ls -la`");
            }

            ErrorKind::WriteZero | ErrorKind::StorageFull => {
                self.add("Failed to write data (disk full?)");
                self.add("Check available disk space");
            }

            ErrorKind::BrokenPipe => {
                self.add("Broken pipe: the output consumer terminated");
                self.add("This may occur when piping to commands like `head`");
            }

            _ => {
                self.add("I/O operation failed");
                self.add("Check file path, permissions, and disk space");
            }
        }
    }

    fn collect_fallback_hints(&mut self, err: &Error) {
        let msg = error_chain_text(err);

        if msg.contains("terminal") || msg.contains("stdout") {
            self.add("Binary tables cannot be written to a terminal");
            self.add("Use -o FILE, or redirect stdout to a file");
            return;
        }

        if msg.contains("no such file") || msg.contains("not found") {
            self.add("Check that the file path is correct");
            self.add("Verify the file exists and is readable");
            return;
        }

        if msg.contains("permission denied") {
            self.add("Check file permissions with `ls -la`");
            return;
        }

        if msg.contains("cannot infer") {
            self.add("Use an .xlsx, .csv or .tsv extension, or pass --format");
        }
    }
}

fn error_chain_text(err: &Error) -> String {
    err.chain()
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase()
}
