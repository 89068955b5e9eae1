//! Place resolution (spec.md §4.4): parses a textual place expression into
//! a `(Variable, mode, moved)` triple, creating global and child variables
//! lazily as they're first observed — the single function the DESIGN NOTES
//! ask this textual, regex-heavy parsing to be isolated behind.

use staleref_ir::{Function, VarId};

/// How the destination (or an operand) of an assignment relates to the
/// place text that named it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignMode {
    Regular,
    Reference,
    Dereference,
}

pub struct ResolvedPlace {
    pub var: VarId,
    pub mode: AssignMode,
    pub moved: bool,
}

/// Resolve one place expression against `function`, creating any global or
/// child variable mentioned for the first time.
pub fn resolve_place(function: &mut Function, raw: &str) -> ResolvedPlace {
    let mut text = raw.trim();
    let moved = if let Some(rest) = text.strip_prefix("move ") {
        text = rest;
        true
    } else {
        false
    };

    let mut mode = AssignMode::Regular;
    if let Some(rest) = text.strip_prefix("&mut ") {
        mode = AssignMode::Reference;
        text = rest;
    } else if let Some(rest) = text.strip_prefix('&') {
        mode = AssignMode::Reference;
        text = rest;
    }

    let var = if let Some((parent, child_name, child_type)) = split_projection(text) {
        let parent_root = strip_deref(parent, &mut mode);
        let parent_id = resolve_root(function, parent_root);
        resolve_child(function, parent_id, child_name, Some(child_type))
    } else {
        let root_text = strip_deref(text, &mut mode);
        resolve_root(function, root_text)
    };

    ResolvedPlace { var, mode, moved }
}

/// Strip parens and, if the remaining text begins with a dereference `*`,
/// fold that into `mode` (upgrading `Regular` to `Dereference`; a `Reference`
/// mode already set — i.e. `&(*a)` — is left alone with a warning, per the
/// original's own acknowledged tricky case).
fn strip_deref<'a>(text: &'a str, mode: &mut AssignMode) -> &'a str {
    let trimmed = text.trim_start_matches('(').trim_end_matches(')');
    if let Some(rest) = trimmed.strip_prefix('*') {
        if *mode == AssignMode::Regular {
            *mode = AssignMode::Dereference;
        } else {
            tracing::warn!(place = %text, "dereference combined with an existing reference mode, leaving mode as-is");
        }
        rest.trim_start_matches('(').trim_end_matches(')')
    } else {
        trimmed
    }
}

/// Find the rightmost `.<digits>: ` projection marker, splitting `text`
/// into `(parent, child_name, child_type)`. Rightmost (not leftmost) to
/// mirror a greedy regex match against the whole remaining string.
fn split_projection(text: &str) -> Option<(&str, &str, &str)> {
    let bytes = text.as_bytes();
    let mut found = None;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'.' {
            let mut j = i + 1;
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            if j > i + 1 && text[j..].starts_with(": ") {
                found = Some((i, j));
            }
        }
        i += 1;
    }
    let (dot, digits_end) = found?;
    Some((&text[..dot], &text[dot + 1..digits_end], &text[digits_end + 2..]))
}

/// Resolve a root token: a local (matched by a `_<digits>` run anywhere in
/// the text) or a global (`name: type` text, split at the rightmost `: `).
fn resolve_root(function: &mut Function, text: &str) -> VarId {
    let text = text.trim_start_matches('(').trim_end_matches(')');
    if let Some(local_name) = extract_local_name(text) {
        if let Some(id) = function.local(&local_name) {
            return id;
        }
        tracing::warn!(name = %local_name, "reference to an undeclared local, creating it on the fly");
        return function.add_local(local_name, "");
    }

    let (name, ty) = split_name_type(text);
    function.global_or_insert(&name, &ty)
}

fn resolve_child(function: &mut Function, parent: VarId, child_name: &str, child_type: Option<&str>) -> VarId {
    if let Some(existing) = function.arena.child(parent, child_name) {
        if let Some(ty) = child_type {
            let current_ty = function.arena.get(existing).type_name.clone();
            if current_ty != ty {
                tracing::warn!(
                    child = %child_name,
                    old_type = %current_ty,
                    new_type = %ty,
                    "child variable's inferred type changed across paths, rewriting it"
                );
                function.arena.get_mut(existing).retype(ty);
            }
        }
        return existing;
    }

    let ty = child_type.unwrap_or_default();
    let id = function.arena.alloc(child_name, ty);
    function.arena.add_child(parent, child_name, id);
    id
}

/// Extract the first `_<digits>` run in `text`, if any — the shape every
/// local name takes.
fn extract_local_name(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'_' {
            let mut j = i + 1;
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            if j > i + 1 {
                return Some(text[i..j].to_string());
            }
        }
        i += 1;
    }
    None
}

/// Split `"name: type"` at the rightmost `: `, mirroring a greedy regex.
fn split_name_type(text: &str) -> (String, String) {
    match text.rfind(": ") {
        Some(idx) => (text[..idx].to_string(), text[idx + 2..].to_string()),
        None => (text.to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn new_fn() -> Function {
        let mut f = Function::new("foo", PathBuf::from("foo.mir"));
        f.add_local("_1", "i32");
        f.add_local("_2", "*const i32");
        f
    }

    #[test]
    fn resolves_plain_local() {
        let mut f = new_fn();
        let r = resolve_place(&mut f, "_1");
        assert_eq!(r.mode, AssignMode::Regular);
        assert!(!r.moved);
        assert_eq!(f.arena.get(r.var).name, "_1");
    }

    #[test]
    fn resolves_moved_local() {
        let mut f = new_fn();
        let r = resolve_place(&mut f, "move _1");
        assert!(r.moved);
    }

    #[test]
    fn resolves_reference_of_local() {
        let mut f = new_fn();
        let r = resolve_place(&mut f, "&_1");
        assert_eq!(r.mode, AssignMode::Reference);
        assert_eq!(f.arena.get(r.var).name, "_1");
    }

    #[test]
    fn resolves_dereference_of_local() {
        let mut f = new_fn();
        let r = resolve_place(&mut f, "(*_2)");
        assert_eq!(r.mode, AssignMode::Dereference);
        assert_eq!(f.arena.get(r.var).name, "_2");
    }

    #[test]
    fn resolves_global_lazily() {
        let mut f = new_fn();
        let r = resolve_place(&mut f, "GLOBAL: *const i32");
        assert_eq!(f.arena.get(r.var).name, "GLOBAL");
        assert_eq!(f.globals.len(), 1);
        let r2 = resolve_place(&mut f, "GLOBAL: *const i32");
        assert_eq!(r.var, r2.var);
    }

    #[test]
    fn resolves_child_projection() {
        let mut f = new_fn();
        let r = resolve_place(&mut f, "(_1).0: i32");
        assert_eq!(f.arena.get(r.var).name, "0");
        assert!(f.arena.child(f.local("_1").unwrap(), "0").is_some());
    }
}
