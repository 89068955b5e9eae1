//! Driver configuration and error type.

use std::fmt;
use std::path::PathBuf;

use staleref_analyze::DEFAULT_REVISIT_CAP;

/// Resolved configuration for one run, separate from raw `argv` parsing —
/// every teacher binary draws this line (`oric::test::TestRunnerConfig` vs.
/// the CLI parsing in `main.rs`).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub root: PathBuf,
    pub skip_globs: Vec<String>,
    pub revisit_cap: usize,
}

impl RunConfig {
    pub fn new(root: PathBuf) -> Self {
        RunConfig {
            root,
            skip_globs: default_skip_globs(),
            revisit_cap: DEFAULT_REVISIT_CAP,
        }
    }
}

/// The two built-in skip patterns from the reference implementation's
/// module-level `skip_name` list.
fn default_skip_globs() -> Vec<String> {
    vec![
        "*rustc.header-stdio-printf-inner_printf*".to_string(),
        "*rustc.header-stdio-scanf-inner_scanf*".to_string(),
    ]
}

/// Failures that abort the run entirely, as opposed to per-file analysis
/// anomalies (which are logged and never escalate to this type).
#[derive(Debug)]
pub enum DriverError {
    MissingDirectory(PathBuf),
    Io(std::io::Error),
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::MissingDirectory(path) => {
                write!(f, "not a directory: {}", path.display())
            }
            DriverError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for DriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DriverError::MissingDirectory(_) => None,
            DriverError::Io(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for DriverError {
    fn from(e: std::io::Error) -> Self {
        DriverError::Io(e)
    }
}
