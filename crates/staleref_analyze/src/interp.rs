//! Abstract interpreter (spec.md §4.4): walks one enumerated path's
//! statements in order, maintaining the function's variable graph and
//! emitting inline use-after-free findings as it resolves source places.

use std::path::Path;

use staleref_diagnostic::Finding;
use staleref_ir::{Function, Kind, VarId};

use crate::place::{self, AssignMode, ResolvedPlace};

/// Built-in operators and intrinsics whose operands carry no lifetime
/// information worth tracking (spec.md §4.4 "skippable").
const SKIP_PREFIXES: &[&str] = &[
    "discriminant",
    "Not",
    "Eq",
    "Box",
    "Gt",
    "CheckedSub",
    "Lt",
    "Len",
    "Div",
    "Ne",
    "Ge",
    "Le",
    "BitOr",
    "CheckedAdd",
    "BitAnd",
    "Rem",
    "CheckedMul",
    "CheckedShr",
    "CheckedShl",
    "[]",
    "Mul",
    "Sub",
    "Add",
];

/// Interpret one enumerated path: reset the variable graph, then apply
/// every statement on every block of the path in order.
pub fn interpret_path(function: &mut Function, path: &[usize], findings: &mut Vec<Finding>) {
    function.reset_for_path();
    let file = function.file.clone();

    for &block_idx in path {
        let statements = function.basic_blocks[block_idx].statements.clone();
        for statement in statements {
            interpret_statement(function, &statement, &file, findings);
        }
    }
}

fn interpret_statement(function: &mut Function, statement: &str, file: &Path, findings: &mut Vec<Finding>) {
    if let Some(operand_list) = statement.strip_prefix("StorageDead(") {
        let Some(local_name) = operand_list.split(')').next() else {
            return;
        };
        terminate_local(function, local_name.trim());
        return;
    }

    if let Some((lhs, rhs)) = statement.split_once(" = ") {
        let rhs = rhs.trim_end_matches(';').trim();
        apply_assignment(function, lhs.trim(), rhs, file, findings);
    }
}

fn terminate_local(function: &mut Function, name: &str) {
    let Some(id) = function.local(name) else {
        tracing::warn!(%name, "StorageDead names an unknown local, ignoring");
        return;
    };
    function.arena.terminate(id);
}

fn apply_assignment(function: &mut Function, lhs: &str, rhs: &str, file: &Path, findings: &mut Vec<Finding>) {
    if lhs == "_" {
        // The wildcard destination: MIR's "discard the result" placeholder.
        // Not a global place — apply any side effects on the source (e.g. a
        // `mem::forget` call) without resolving or creating a destination
        // variable for it.
        apply_discarded_assignment(function, rhs, file, findings);
        return;
    }

    let dest = place::resolve_place(function, lhs);
    // Assignment brings the destination back to life before the source is
    // evaluated, so a prior dangling-pointer read against it is moot from
    // here on (spec.md §8 property 4).
    function.arena.revive(dest.var);

    if should_skip(lhs) || should_skip(rhs) {
        return;
    }

    if is_function_call(rhs) {
        apply_function_call(function, &dest, rhs);
        return;
    }

    let sources = resolve_source_variables(function, rhs, file, findings);

    if sources.len() > 1 {
        for (idx, src) in sources.iter().enumerate() {
            let child = aggregate_child(function, dest.var, idx, src);
            apply_single_variable_update(function, child, dest.mode, Some(src));
        }
    } else if let Some(src) = sources.first() {
        apply_single_variable_update(function, dest.var, dest.mode, Some(src));
    } else {
        apply_single_variable_update(function, dest.var, dest.mode, None);
    }
}

fn apply_discarded_assignment(function: &mut Function, rhs: &str, file: &Path, findings: &mut Vec<Finding>) {
    if should_skip(rhs) {
        return;
    }
    if is_function_call(rhs) {
        apply_call_forget(function, rhs);
        return;
    }
    resolve_source_variables(function, rhs, file, findings);
}

fn resolve_source_variables(
    function: &mut Function,
    rhs: &str,
    file: &Path,
    findings: &mut Vec<Finding>,
) -> Vec<ResolvedPlace> {
    let mut sources = Vec::new();

    if is_const(rhs) {
        return sources;
    }

    if let Some(inner) = as_aggregate(rhs) {
        for element in inner.split(", ") {
            let element = element.trim();
            if element.is_empty() || should_skip(element) {
                continue;
            }
            sources.push(place::resolve_place(function, element));
        }
    } else {
        sources.push(place::resolve_place(function, rhs));
    }

    for src in &sources {
        check_inline_dangling(function, src, file, findings);
    }

    sources
}

fn apply_function_call(function: &mut Function, dest: &ResolvedPlace, rhs: &str) {
    let operands = apply_call_forget(function, rhs);

    let dest_kind = function.arena.get(dest.var).kind;
    if matches!(dest_kind, Kind::Pointer | Kind::Reference) && operands.len() == 1 {
        let src_id = operands[0];
        if matches!(function.arena.get(src_id).kind, Kind::Pointer | Kind::Reference) {
            let target = function.arena.get(src_id).reference_to;
            function.arena.set_reference(dest.var, target);
        }
    }
}

/// Resolve a call's `move`-operand list and apply the `mem::forget` special
/// case if the callee matches, returning the resolved operands so the
/// caller can still use them (e.g. for single-operand pointer-copy
/// propagation).
fn apply_call_forget(function: &mut Function, rhs: &str) -> Vec<VarId> {
    let call_src = rhs.split(" -> ").next().unwrap_or(rhs).trim();
    let operands = extract_call_operands(function, call_src);

    if call_src.contains("mem::forget") {
        match operands.first() {
            Some(&operand) => function.arena.forget_recursive(operand),
            None => tracing::warn!(statement = %rhs, "mem::forget call with no resolvable operand"),
        }
    }

    operands
}

/// Every `move <place>` token in a call's argument list names one operand.
fn extract_call_operands(function: &mut Function, call_src: &str) -> Vec<VarId> {
    let mut operands = Vec::new();
    let mut rest = call_src;
    while let Some(idx) = rest.find("move ") {
        rest = &rest[idx + "move ".len()..];
        let end = match rest.find(", ") {
            Some(comma) => comma,
            None => rest.find(')').unwrap_or(rest.len()),
        };
        let token = rest[..end].trim_end_matches(')').trim();
        if !token.is_empty() {
            operands.push(place::resolve_place(function, token).var);
        }
        rest = &rest[end..];
    }
    operands
}

/// Port of the original's `do_single_variable_assignment` update table
/// (spec.md §4.4).
fn apply_single_variable_update(function: &mut Function, dest: VarId, dest_mode: AssignMode, src: Option<&ResolvedPlace>) {
    let dest_kind = function.arena.get(dest).kind;

    if dest_kind == Kind::Scalar {
        return;
    }

    if dest_kind == Kind::Object {
        if let Some(src) = src {
            let src_kind = function.arena.get(src.var).kind;
            if src_kind == Kind::Object && src.moved {
                handle_moving_recursive(function, src.var, dest);
            }
        }
    }

    if matches!(dest_kind, Kind::Reference | Kind::Pointer) {
        let Some(src) = src else {
            return;
        };
        match function.arena.get(src.var).kind {
            Kind::Scalar => {
                if dest_mode != AssignMode::Dereference && src.mode == AssignMode::Reference {
                    function.arena.set_reference(dest, Some(src.var));
                }
            }
            Kind::Object => {
                if dest_mode == AssignMode::Dereference {
                    let current_referent = function.arena.get(dest).reference_to;
                    match current_referent {
                        Some(referent) => {
                            function.arena.terminate(referent);
                            function.arena.set_reference(dest, Some(src.var));
                        }
                        None => {
                            tracing::error!(
                                dest = %function.arena.get(dest).name,
                                "dereference-write through an uninitialized pointer"
                            );
                        }
                    }
                } else {
                    function.arena.set_reference(dest, Some(src.var));
                }
            }
            Kind::Reference | Kind::Pointer => {
                let target = function.arena.get(src.var).reference_to;
                function.arena.set_reference(dest, target);
            }
            Kind::Unset => {}
        }
    }
}

/// A moved Object's entire subtree forgets its old identity: every
/// variable pointing at it (or at any of its children) is rebound to the
/// destination (spec.md §9 Open Question: the whole subtree moves, not
/// just the root).
fn handle_moving_recursive(function: &mut Function, src: VarId, dest: VarId) {
    let children: Vec<VarId> = function.arena.get(src).children.iter().map(|(_, c)| *c).collect();
    for child in children {
        handle_moving_recursive(function, child, dest);
    }
    let referencers: Vec<VarId> = function.arena.get(src).referenced_by.clone();
    for referencer in referencers {
        function.arena.set_reference(referencer, Some(dest));
    }
}

fn aggregate_child(function: &mut Function, dest: VarId, idx: usize, src: &ResolvedPlace) -> VarId {
    let key = idx.to_string();
    if let Some(existing) = function.arena.child(dest, &key) {
        return existing;
    }
    let ty = function.arena.get(src.var).type_name.clone();
    let id = function.arena.alloc(key.clone(), ty);
    function.arena.add_child(dest, key, id);
    id
}

fn check_inline_dangling(function: &Function, src: &ResolvedPlace, file: &Path, findings: &mut Vec<Finding>) {
    if !function.arena.is_dangling(src.var) {
        return;
    }
    let slot = function.arena.get(src.var);
    let referent_name = slot
        .reference_to
        .map(|r| function.arena.get(r).name.clone())
        .unwrap_or_default();
    let finding = Finding::inline_read(slot.name.clone(), referent_name, file);
    tracing::error!(%finding, "use-after-free");
    findings.push(finding);
}

fn should_skip(text: &str) -> bool {
    SKIP_PREFIXES.iter().any(|prefix| text.starts_with(prefix))
}

fn is_function_call(rhs: &str) -> bool {
    rhs.starts_with("const ") && rhs.contains(" -> ")
}

fn is_const(rhs: &str) -> bool {
    let first = rhs.split_whitespace().next().unwrap_or("");
    first.contains("const") && !rhs.contains(" -> ")
}

fn as_aggregate(rhs: &str) -> Option<&str> {
    if rhs.contains("const") {
        return None;
    }
    rhs.strip_prefix('[').and_then(|s| s.strip_suffix(']'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use staleref_ir::LifetimeState;

    fn new_fn() -> Function {
        Function::new("foo", PathBuf::from("foo.mir"))
    }

    #[test]
    fn storage_dead_terminates_local() {
        let mut f = new_fn();
        f.add_local("_1", "i32");
        let mut findings = Vec::new();
        interpret_statement(&mut f, "StorageDead(_1);", Path::new("foo.mir"), &mut findings);
        assert_eq!(f.arena.get(f.local("_1").unwrap()).lifetime_state, LifetimeState::Terminated);
    }

    #[test]
    fn take_reference_sets_edge() {
        let mut f = new_fn();
        f.add_local("_1", "i32");
        f.add_local("_2", "*const i32");
        let mut findings = Vec::new();
        interpret_statement(&mut f, "_2 = &_1;", Path::new("foo.mir"), &mut findings);
        let p2 = f.local("_2").unwrap();
        let p1 = f.local("_1").unwrap();
        assert_eq!(f.arena.get(p2).reference_to, Some(p1));
    }

    #[test]
    fn reading_dangling_pointer_emits_finding() {
        let mut f = new_fn();
        f.add_local("_1", "i32");
        f.add_local("_2", "*const i32");
        f.add_local("_3", "i32");
        let mut findings = Vec::new();
        interpret_statement(&mut f, "_2 = &_1;", Path::new("foo.mir"), &mut findings);
        interpret_statement(&mut f, "StorageDead(_1);", Path::new("foo.mir"), &mut findings);
        interpret_statement(&mut f, "_3 = (*_2);", Path::new("foo.mir"), &mut findings);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].var, "_2");
        assert_eq!(findings[0].referent, "_1");
    }

    #[test]
    fn pointer_copy_propagates_dangling() {
        let mut f = new_fn();
        f.add_local("_1", "i32");
        f.add_local("_2", "*const i32");
        f.add_local("_3", "*const i32");
        let mut findings = Vec::new();
        interpret_statement(&mut f, "_2 = &_1;", Path::new("foo.mir"), &mut findings);
        interpret_statement(&mut f, "_3 = _2;", Path::new("foo.mir"), &mut findings);
        interpret_statement(&mut f, "StorageDead(_1);", Path::new("foo.mir"), &mut findings);
        assert!(f.arena.is_dangling(f.local("_3").unwrap()));
    }

    #[test]
    fn mem_forget_suppresses_termination() {
        let mut f = new_fn();
        f.add_local("_1", "i32");
        f.add_local("_2", "*const i32");
        let mut findings = Vec::new();
        interpret_statement(&mut f, "_2 = &_1;", Path::new("foo.mir"), &mut findings);
        interpret_statement(
            &mut f,
            "_ = const core::mem::forget(move _1) -> [return: bb1, unwind: bb2];",
            Path::new("foo.mir"),
            &mut findings,
        );
        interpret_statement(&mut f, "StorageDead(_1);", Path::new("foo.mir"), &mut findings);
        assert_eq!(f.arena.get(f.local("_1").unwrap()).lifetime_state, LifetimeState::Forgot);
        interpret_statement(&mut f, "_3 = (*_2);", Path::new("foo.mir"), &mut findings);
        assert!(findings.is_empty());
    }

    #[test]
    fn reassignment_revives_destination() {
        let mut f = new_fn();
        f.add_local("_1", "i32");
        f.add_local("_2", "*const i32");
        let mut findings = Vec::new();
        interpret_statement(&mut f, "_2 = &_1;", Path::new("foo.mir"), &mut findings);
        interpret_statement(&mut f, "StorageDead(_1);", Path::new("foo.mir"), &mut findings);
        interpret_statement(&mut f, "_1 = const 7_i32;", Path::new("foo.mir"), &mut findings);
        assert!(!f.arena.is_dangling(f.local("_2").unwrap()));
    }
}
