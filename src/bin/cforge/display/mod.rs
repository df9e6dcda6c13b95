mod banner;
mod error;
mod progress;
mod tables;

pub use banner::{banner_for_help, print_banner};
pub use error::print_error;
pub use progress::Progress;
pub use tables::{print_batch_summary, print_records};

#[derive(Debug, Clone, Copy)]
pub struct Context {
    /// Progress and tables go to stderr only when it is a terminal.
    pub interactive: bool,
    pub quiet: bool,
}

impl Context {
    pub fn detect() -> Self {
        Self {
            interactive: crate::io::stderr_is_tty(),
            quiet: false,
        }
    }

    pub fn with_quiet(self, quiet: bool) -> Self {
        if quiet {
            Self {
                interactive: false,
                quiet: true,
            }
        } else {
            self
        }
    }

    /// Record tables are shown unless `--quiet` was given.
    pub fn show_tables(&self) -> bool {
        !self.quiet
    }
}
