use std::fmt;
use std::path::{Path, PathBuf};

/// Where in the analysis a finding was raised (spec.md §4.4/§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingSite {
    /// A dangling pointer was read as the source of an assignment
    /// (spec.md §4.4, "Inline detection").
    InlineRead,
    /// A dangling pointer was still reachable from a global or a parameter
    /// subtree after a path completed (spec.md §4.5).
    PathTerminal,
}

/// A use-after-free finding: `var` is a dangling pointer whose referent
/// `referent` was terminated, observed in `file`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub site: FindingSite,
    pub var: String,
    pub referent: String,
    pub file: PathBuf,
}

impl Finding {
    pub fn inline_read(var: impl Into<String>, referent: impl Into<String>, file: &Path) -> Self {
        Finding {
            site: FindingSite::InlineRead,
            var: var.into(),
            referent: referent.into(),
            file: file.to_path_buf(),
        }
    }

    pub fn path_terminal(var: impl Into<String>, referent: impl Into<String>, file: &Path) -> Self {
        Finding {
            site: FindingSite::PathTerminal,
            var: var.into(),
            referent: referent.into(),
            file: file.to_path_buf(),
        }
    }
}

/// Matches spec.md §6's output surface:
/// `Use-after-free detected: ... : <var> ... points to: <referent> [in file: <path>]`
impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.site {
            FindingSite::InlineRead => write!(
                f,
                "Use-after-free detected: using dangling pointer: {} as source variable, it points to: {} [in file: {}]",
                self.var,
                self.referent,
                self.file.display()
            ),
            FindingSite::PathTerminal => write!(
                f,
                "Use-after-free detected: source variable: {} is a dangling pointer and globally reachable, it points to: {} [in file: {}]",
                self.var,
                self.referent,
                self.file.display()
            ),
        }
    }
}
