//! staleref driver: discovers MIR dumps under a directory, analyzes each
//! for use-after-free, and prints findings.

mod config;
mod discovery;

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use config::{DriverError, RunConfig};

fn main() {
    staleref_diagnostic::init();

    let config = match parse_args(std::env::args().skip(1).collect()) {
        Ok(config) => config,
        Err(usage) => {
            eprintln!("{usage}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&config) {
        tracing::error!(error = %e, "run failed");
        eprintln!("stalerefc: {e}");
        std::process::exit(1);
    }
}

/// Hand-rolled `argv` dispatch, matching `oric`'s `main.rs` style — the
/// teacher workspace has no `clap` dependency anywhere.
fn parse_args(args: Vec<String>) -> Result<RunConfig, String> {
    let mut root = None;
    let mut skip_globs = Vec::new();
    let mut iter = args.into_iter();

    while let Some(arg) = iter.next() {
        if arg == "--skip" {
            let Some(glob) = iter.next() else {
                return Err("--skip requires a pattern argument".to_string());
            };
            skip_globs.push(glob);
        } else if arg == "--help" || arg == "-h" {
            return Err(usage());
        } else if root.is_none() {
            root = Some(PathBuf::from(arg));
        } else {
            return Err(format!("unexpected extra argument: {arg}\n\n{}", usage()));
        }
    }

    let Some(root) = root else {
        return Err(usage());
    };

    let mut config = RunConfig::new(root);
    config.skip_globs.extend(skip_globs);
    Ok(config)
}

fn usage() -> String {
    "Usage: stalerefc <mir-directory> [--skip <glob>]...".to_string()
}

fn run(config: &RunConfig) -> Result<(), DriverError> {
    if !config.root.is_dir() {
        return Err(DriverError::MissingDirectory(config.root.clone()));
    }

    let files = discovery::discover_mir_files(&config.root, &config.skip_globs)?;
    tracing::info!(count = files.len(), "discovered MIR files");

    let files_analyzed = AtomicUsize::new(0);
    let findings_total = AtomicUsize::new(0);

    files.par_iter().for_each(|path| {
        let count = analyze_file(path, config.revisit_cap);
        files_analyzed.fetch_add(1, Ordering::Relaxed);
        findings_total.fetch_add(count, Ordering::Relaxed);
    });

    tracing::info!(
        files = files_analyzed.load(Ordering::Relaxed),
        findings = findings_total.load(Ordering::Relaxed),
        "run complete"
    );
    Ok(())
}

/// Parse and analyze one MIR file, printing every finding to stdout.
/// Returns the number of findings. A file this process can't read is logged
/// and skipped — it never aborts the whole run (Parse-tolerance, not a
/// driver failure: the directory itself was readable).
fn analyze_file(path: &PathBuf, revisit_cap: usize) -> usize {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            tracing::warn!(file = %path.display(), error = %e, "could not read file, skipping");
            return 0;
        }
    };

    tracing::info!(file = %path.display(), "analyzing");

    let mut functions = staleref_parse::parse_functions(path, &source);
    let mut count = 0;
    for function in &mut functions {
        let findings = staleref_analyze::analyze_function(function, revisit_cap);
        for finding in &findings {
            println!("{finding}");
        }
        count += findings.len();
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_root_and_skip_flags() {
        let config = parse_args(vec![
            "mirdir".to_string(),
            "--skip".to_string(),
            "*foo*".to_string(),
        ])
        .unwrap_or_else(|e| panic!("expected a valid config, got error: {e}"));

        assert_eq!(config.root, PathBuf::from("mirdir"));
        assert!(config.skip_globs.iter().any(|g| g == "*foo*"));
        // The two built-in patterns are always present alongside any
        // supplied via --skip.
        assert_eq!(config.skip_globs.len(), 3);
    }

    #[test]
    fn missing_positional_argument_is_an_error() {
        assert!(parse_args(vec!["--skip".to_string(), "*foo*".to_string()]).is_err());
    }

    #[test]
    fn dangling_skip_flag_is_an_error() {
        assert!(parse_args(vec!["mirdir".to_string(), "--skip".to_string()]).is_err());
    }
}
