//! Local-declaration parsing: `let _5: Type;`.

/// Split a local declaration into `(name, type)`. `None` if the text after
/// `let` doesn't carry a `:`-separated type, e.g. a bare `let _5;`.
///
/// The text before the `:` can carry a `mut` keyword (every real MIR return
/// place is `let mut _0: T;`, and most mutable locals are `let mut _N: T;`),
/// so the name is the *last* whitespace token before the colon, not the
/// whole thing — matching `line_parser.py::set_variable`'s
/// `line.split(': ')[0].split()[-1]`.
pub fn parse_local_decl(raw: &str) -> Option<(String, String)> {
    let rest = raw.strip_prefix("let ")?;
    let rest = rest.trim_end_matches(';').trim();
    let (name, ty) = rest.split_once(':')?;
    let name = name.split_whitespace().last()?.to_string();
    let ty = ty.trim().to_string();
    if name.is_empty() || ty.is_empty() {
        return None;
    }
    Some((name, ty))
}
