/// One basic block: a label and its ordered, already-trimmed statements
/// (trailing `// ...` comments removed). Terminator information is encoded
/// as the final statement(s) and decoded on demand by [`BasicBlock::successors`]
/// rather than stored separately (spec.md §3).
#[derive(Debug, Clone)]
pub struct BasicBlock {
    pub label: String,
    pub statements: Vec<String>,
}

impl BasicBlock {
    pub fn new(label: impl Into<String>) -> Self {
        BasicBlock {
            label: label.into(),
            statements: Vec::new(),
        }
    }

    pub fn push_statement(&mut self, statement: impl Into<String>) {
        self.statements.push(statement.into());
    }

    /// Recover this block's terminator successors textually (spec.md §4.3).
    ///
    /// Any statement containing `->` exposes its right-hand side, in one of
    /// two shapes: a single `bb<N>` label (`goto`-style), or a bracketed,
    /// comma-separated `tag: bb<N>` list (`switch`-style), every entry of
    /// which contributes its label.
    pub fn successors(&self) -> Vec<String> {
        let mut out = Vec::new();
        for statement in &self.statements {
            let Some((_, rhs)) = statement.split_once("->") else {
                continue;
            };
            let rhs = rhs.trim().trim_end_matches(';').trim();

            if let Some(inner) = rhs.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
                for entry in inner.split(',') {
                    let entry = entry.trim();
                    if let Some((_, label)) = entry.split_once(':') {
                        out.push(label.trim().to_string());
                    }
                }
            } else if rhs.starts_with("bb") {
                out.push(rhs.to_string());
            }
        }
        out
    }
}
