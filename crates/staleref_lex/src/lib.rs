//! Lexical recognizer: classifies one MIR text line at a time.
//!
//! Operates on whole trimmed *lines*, not a token stream — unlike a
//! source-language lexer, there is no regex-driven token grammar here, just
//! a peek-and-classify dispatch over the line's leading and trailing tokens
//! (spec.md §4.1).

/// Strip a trailing `// ...` line comment, if present.
pub fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// The classification of one MIR line, given whether the recognizer is
/// currently inside a basic block. Malformed or unrecognized shapes
/// classify as [`LineKind::Blank`] — the recognizer yields no event rather
/// than failing (spec.md §4.1 "Failure").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    /// `fn name(...) -> Ret {` or `pub fn name(...) -> Ret {`.
    FunctionHeader { raw: String },
    /// `let _N: Type;`, recognized only outside a basic block.
    LocalDecl { raw: String },
    /// `bbN: {`.
    BasicBlockHeader { label: String },
    /// `}` while inside a basic block.
    BlockEnd,
    /// Any other non-blank line while inside a basic block.
    Statement(String),
}

/// Classify one raw source line. `in_block` disambiguates `let` lines
/// (local declarations outside a block) from ordinary statements (anything
/// non-blank inside one) — see spec.md §4.1, the `local-declaration`
/// predicate is explicitly scoped to "outside of a basic block".
pub fn classify(raw_line: &str, in_block: bool) -> LineKind {
    let stripped = strip_comment(raw_line);
    let trimmed = stripped.trim();

    if trimmed.is_empty() {
        return LineKind::Blank;
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let Some(&first) = tokens.first() else {
        return LineKind::Blank;
    };
    let last = tokens[tokens.len() - 1];

    let is_function_header = last == "{"
        && (first == "fn" || (first == "pub" && tokens.get(1) == Some(&"fn")));
    if is_function_header {
        return LineKind::FunctionHeader {
            raw: trimmed.to_string(),
        };
    }

    if first.starts_with("bb") && last == "{" {
        return LineKind::BasicBlockHeader {
            label: first.trim_end_matches(':').to_string(),
        };
    }

    if first == "}" {
        return LineKind::BlockEnd;
    }

    if !in_block && first == "let" {
        return LineKind::LocalDecl {
            raw: trimmed.to_string(),
        };
    }

    if in_block {
        return LineKind::Statement(trimmed.to_string());
    }

    LineKind::Blank
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_comment() {
        assert_eq!(strip_comment("_2 = &_1; // take ref").trim(), "_2 = &_1;");
        assert_eq!(strip_comment("no comment here"), "no comment here");
    }

    #[test]
    fn pure_comment_line_is_blank() {
        assert_eq!(classify("// a comment", false), LineKind::Blank);
    }

    #[test]
    fn blank_line_is_blank() {
        assert_eq!(classify("   ", false), LineKind::Blank);
        assert_eq!(classify("", true), LineKind::Blank);
    }

    #[test]
    fn function_header_plain() {
        match classify("fn foo(_1: i32) -> () {", false) {
            LineKind::FunctionHeader { raw } => assert!(raw.starts_with("fn foo")),
            other => panic!("expected FunctionHeader, got {other:?}"),
        }
    }

    #[test]
    fn function_header_pub() {
        assert!(matches!(
            classify("pub fn foo() -> () {", false),
            LineKind::FunctionHeader { .. }
        ));
    }

    #[test]
    fn basic_block_header() {
        assert_eq!(
            classify("bb0: {", false),
            LineKind::BasicBlockHeader {
                label: "bb0".to_string()
            }
        );
    }

    #[test]
    fn block_end() {
        assert_eq!(classify("}", true), LineKind::BlockEnd);
    }

    #[test]
    fn local_decl_outside_block() {
        assert!(matches!(
            classify("let _1: i32;", false),
            LineKind::LocalDecl { .. }
        ));
    }

    #[test]
    fn let_like_line_inside_block_is_a_statement_not_a_decl() {
        assert!(matches!(
            classify("let _1: i32;", true),
            LineKind::Statement(_)
        ));
    }

    #[test]
    fn arbitrary_statement_inside_block() {
        assert_eq!(
            classify("_2 = &_1;", true),
            LineKind::Statement("_2 = &_1;".to_string())
        );
    }

    #[test]
    fn malformed_header_yields_no_event() {
        // Missing trailing '{' — not a function header, not in a block, so
        // this is simply ignored rather than propagating a parse error.
        assert_eq!(classify("fn foo(_1: i32) -> ()", false), LineKind::Blank);
    }
}
