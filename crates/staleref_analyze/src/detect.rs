//! Path-terminal detection (spec.md §4.5): after a path finishes, walk
//! from every global and from every parameter's child subtree, reporting
//! any pointer/reference still dangling at that point.

use staleref_diagnostic::Finding;
use staleref_ir::{Function, Kind, LifetimeState, VarId};

/// Walk the function's globals and parameter subtrees, appending a
/// [`Finding`] for every dangling pointer/reference still reachable.
pub fn detect_path_terminal(function: &Function, findings: &mut Vec<Finding>) {
    let roots: Vec<VarId> = function.globals.values().copied().collect();
    for root in roots {
        walk(function, root, findings);
    }

    // The parameter itself is passed by value and can't be observed
    // dangling at the call site — only its child projections matter.
    for &(_, param) in &function.params {
        for &(_, child) in &function.arena.get(param).children {
            walk(function, child, findings);
        }
    }
}

fn walk(function: &Function, id: VarId, findings: &mut Vec<Finding>) {
    let slot = function.arena.get(id);
    if slot.kind == Kind::Pointer {
        if let Some(referent) = slot.reference_to {
            if function.arena.get(referent).lifetime_state == LifetimeState::Terminated {
                findings.push(Finding::path_terminal(
                    slot.name.clone(),
                    function.arena.get(referent).name.clone(),
                    &function.file,
                ));
            }
        }
    }

    for &(_, child) in &slot.children {
        walk(function, child, findings);
    }
}
