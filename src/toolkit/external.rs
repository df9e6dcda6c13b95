use std::cell::Cell;
use std::io::{ErrorKind, Write};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use serde::Deserialize;
use tracing::{debug, warn};

use super::{Error, Toolkit};
use crate::model::molecule::Molecule;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Settings for [`ExternalToolkit`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExternalToolkitConfig {
    /// Program to run; it reads one molfile on stdin and prints the InChI.
    pub program: String,
    pub args: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for ExternalToolkitConfig {
    fn default() -> Self {
        Self {
            program: "obabel".to_string(),
            args: vec!["-imol".to_string(), "-oinchi".to_string()],
            timeout_secs: 30,
        }
    }
}

/// Computes InChI strings by piping each molfile through an external program
/// (Open Babel by default).
#[derive(Debug)]
pub struct ExternalToolkit {
    config: ExternalToolkitConfig,
    missing: Cell<bool>,
}

impl ExternalToolkit {
    pub fn new(config: ExternalToolkitConfig) -> Self {
        Self {
            config,
            missing: Cell::new(false),
        }
    }

    pub fn config(&self) -> &ExternalToolkitConfig {
        &self.config
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }

    fn io_error(&self, source: std::io::Error) -> Error {
        Error::Io {
            program: self.config.program.clone(),
            source,
        }
    }

    fn spawn(&self) -> Result<Child, Error> {
        Command::new(&self.config.program)
            .args(&self.config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    Error::NotFound(self.config.program.clone())
                } else {
                    self.io_error(e)
                }
            })
    }

    fn wait_with_deadline(&self, child: &mut Child) -> Result<(), Error> {
        let deadline = Instant::now() + self.timeout();
        loop {
            if child.try_wait().map_err(|e| self.io_error(e))?.is_some() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::Timeout {
                    program: self.config.program.clone(),
                    timeout: self.timeout(),
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Default for ExternalToolkit {
    fn default() -> Self {
        Self::new(ExternalToolkitConfig::default())
    }
}

impl Toolkit for ExternalToolkit {
    fn inchi(&self, molecule: &Molecule) -> Result<String, Error> {
        if self.missing.get() {
            return Err(Error::NotFound(self.config.program.clone()));
        }

        let mut child = match self.spawn() {
            Ok(child) => child,
            Err(e @ Error::NotFound(_)) => {
                warn!(
                    program = %self.config.program,
                    "toolkit program not found; InChI columns will hold the sentinel"
                );
                self.missing.set(true);
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(molecule.molblock.as_bytes())
                .map_err(|e| self.io_error(e))?;
        }

        self.wait_with_deadline(&mut child)?;
        let output = child.wait_with_output().map_err(|e| self.io_error(e))?;

        if !output.status.success() {
            return Err(Error::Failed {
                program: self.config.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let inchi = first_inchi(&stdout)
            .ok_or_else(|| Error::NoInchi(self.config.program.clone()))?;
        debug!(title = %molecule.title, %inchi, "computed InChI");
        Ok(inchi.to_string())
    }
}

fn first_inchi(stdout: &str) -> Option<&str> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with("InChI="))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::sdf::{fixtures, parse};

    fn ethanol() -> Molecule {
        parse(fixtures::ETHANOL.as_bytes())
            .molecules()
            .next()
            .expect("ethanol fixture")
    }

    #[test]
    fn default_config_runs_open_babel() {
        let config = ExternalToolkitConfig::default();
        assert_eq!(config.program, "obabel");
        assert_eq!(config.args, vec!["-imol", "-oinchi"]);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn first_inchi_skips_noise() {
        let stdout = "==============\n  InChI=1S/C2H6O/c1-2-3/h3H,2H2,1H3 \n1 molecule converted\n";
        assert_eq!(first_inchi(stdout), Some("InChI=1S/C2H6O/c1-2-3/h3H,2H2,1H3"));
        assert_eq!(first_inchi("0 molecules converted\n"), None);
    }

    #[test]
    fn missing_program_is_reported_and_remembered() {
        let toolkit = ExternalToolkit::new(ExternalToolkitConfig {
            program: "cid-forge-test-no-such-program".to_string(),
            args: Vec::new(),
            timeout_secs: 1,
        });
        let molecule = ethanol();

        assert!(matches!(toolkit.inchi(&molecule), Err(Error::NotFound(_))));
        assert!(toolkit.missing.get());
        assert!(matches!(toolkit.inchi(&molecule), Err(Error::NotFound(_))));
    }

    #[cfg(unix)]
    #[test]
    fn reads_inchi_from_program_output() {
        let toolkit = ExternalToolkit::new(ExternalToolkitConfig {
            program: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                "cat >/dev/null; echo 'InChI=1S/C2H6O/c1-2-3/h3H,2H2,1H3'".to_string(),
            ],
            timeout_secs: 10,
        });
        assert_eq!(
            toolkit.inchi(&ethanol()).expect("inchi from sh"),
            "InChI=1S/C2H6O/c1-2-3/h3H,2H2,1H3"
        );
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_a_failure() {
        let toolkit = ExternalToolkit::new(ExternalToolkitConfig {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), "cat >/dev/null; echo bad >&2; exit 3".to_string()],
            timeout_secs: 10,
        });
        match toolkit.inchi(&ethanol()) {
            Err(Error::Failed { stderr, .. }) => assert_eq!(stderr, "bad"),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn slow_program_times_out() {
        let toolkit = ExternalToolkit::new(ExternalToolkitConfig {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), "cat >/dev/null; sleep 5".to_string()],
            timeout_secs: 0,
        });
        assert!(matches!(
            toolkit.inchi(&ethanol()),
            Err(Error::Timeout { .. })
        ));
    }
}
