//! MIR file discovery: a recursive directory walk collecting
//! `*PreCodegen.after.mir` files, excluding anything a skip-list glob
//! matches. Hand-rolled the way `oric`'s own test-file discovery module
//! walks directories by hand rather than reaching for `walkdir`.

use std::fs;
use std::path::{Path, PathBuf};

const MIR_SUFFIX: &str = "PreCodegen.after.mir";

/// Walk `root` recursively, returning every path whose file name ends with
/// [`MIR_SUFFIX`] and isn't excluded by `skip_globs`, sorted for
/// deterministic output across runs.
pub fn discover_mir_files(root: &Path, skip_globs: &[String]) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk(root, skip_globs, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(dir: &Path, skip_globs: &[String], out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            walk(&path, skip_globs, out)?;
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if !name.ends_with(MIR_SUFFIX) {
            continue;
        }

        if should_skip(name, skip_globs) {
            tracing::debug!(file = %path.display(), "skipped by skip-list");
            continue;
        }

        out.push(path);
    }
    Ok(())
}

fn should_skip(name: &str, skip_globs: &[String]) -> bool {
    skip_globs.iter().any(|pattern| glob_match(name, pattern))
}

/// A small `*literal*`-only glob matcher: the original's skip list, and the
/// `--skip` flag supplementing it, only ever use a single leading/trailing/
/// surrounding wildcard, so a `regex`/`glob` dependency buys nothing here.
fn glob_match(name: &str, pattern: &str) -> bool {
    let leading = pattern.starts_with('*');
    let trailing = pattern.ends_with('*');
    let inner = pattern.trim_start_matches('*').trim_end_matches('*');

    match (leading, trailing) {
        (true, true) => name.contains(inner),
        (true, false) => name.ends_with(inner),
        (false, true) => name.starts_with(inner),
        (false, false) => name == pattern,
    }
}
