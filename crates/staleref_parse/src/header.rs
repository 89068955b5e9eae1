//! Function-header parsing: `fn name(params) -> Ret {` / `pub fn name(...) {`.

pub struct HeaderInfo {
    pub name: String,
    pub params_src: String,
}

/// Extract the function name and the raw parameter-list text from a line
/// already classified as a function header. Returns `None` if the header
/// text doesn't actually carry a parenthesized parameter list — this can
/// happen on exotic headers the lexical recognizer still accepted as a
/// function header shape (trailing `{` present) but that this builder
/// can't make sense of; the caller skips the function in that case.
pub fn parse_header(raw: &str) -> Option<HeaderInfo> {
    let raw = raw.strip_prefix("pub ").unwrap_or(raw);
    let raw = raw.strip_prefix("fn ")?;
    let open = raw.find('(')?;
    let name = raw[..open].trim().to_string();
    if name.is_empty() {
        return None;
    }

    // Find the matching close paren by depth-tracking rather than the last
    // ')' in the line: a unit or tuple return type (`-> ()`, `-> (i32, i32)`)
    // has parens of its own after the parameter list.
    let mut depth = 0i32;
    let mut close = None;
    for (offset, ch) in raw[open..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(open + offset);
                    break;
                }
            }
            _ => {}
        }
    }
    let close = close?;

    Some(HeaderInfo {
        name,
        params_src: raw[open + 1..close].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_header() {
        let info = parse_header("fn foo(_1: i32) -> () {").unwrap();
        assert_eq!(info.name, "foo");
        assert_eq!(info.params_src, "_1: i32");
    }

    #[test]
    fn pub_header() {
        let info = parse_header("pub fn bar() -> bool {").unwrap();
        assert_eq!(info.name, "bar");
        assert_eq!(info.params_src, "");
    }

    #[test]
    fn no_parens_is_none() {
        assert!(parse_header("fn weird {").is_none());
    }

    #[test]
    fn tuple_return_type_parens_are_not_mistaken_for_the_param_list_close() {
        let info = parse_header("fn baz(_1: i32, _2: &str) -> (i32, i32) {").unwrap();
        assert_eq!(info.name, "baz");
        assert_eq!(info.params_src, "_1: i32, _2: &str");
    }
}
