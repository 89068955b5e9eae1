//! Path enumerator (spec.md §4.3): enumerates simple (acyclic) basic-block
//! paths from entry, derived from terminator successor lists.
//!
//! Implemented as a stack-based depth-first walk rather than the
//! restart-the-worklist algorithm spec.md describes — functionally
//! equivalent, and the form the DESIGN NOTES prefer for clarity and its
//! `O(|paths|·|CFG|)` bound.
//!
//! `revisit_cap` bounds how many times one block may appear on a single
//! path. The default, 1, enforces the strict acyclic-path invariant
//! (spec.md §8 property 1: no basic block appears twice). A caller
//! analyzing a large, switch-heavy function may raise this to the ≤3 the
//! DESIGN NOTES permit, trading strict simple-path-ness for termination;
//! every branch pruned by the cap is logged, never dropped silently.

use staleref_ir::Function;

/// Strict: a block may appear at most once per path (the simple-path
/// invariant spec.md §8 property 1 requires).
pub const DEFAULT_REVISIT_CAP: usize = 1;

/// Enumerate every path from block 0 to a terminal block (no successors),
/// writing the result into `function.paths`.
pub fn enumerate_paths(function: &mut Function, revisit_cap: usize) {
    if function.basic_blocks.is_empty() {
        function.paths = Vec::new();
        return;
    }

    let mut out = Vec::new();
    let mut visit_counts = vec![0usize; function.basic_blocks.len()];
    visit_counts[0] = 1;
    let mut stack_path = vec![0usize];

    walk(function, 0, &mut stack_path, &mut visit_counts, revisit_cap, &mut out);

    function.paths = out;
}

fn walk(
    function: &Function,
    block_idx: usize,
    path: &mut Vec<usize>,
    visit_counts: &mut [usize],
    revisit_cap: usize,
    out: &mut Vec<Vec<usize>>,
) {
    let successors = function.basic_blocks[block_idx].successors();
    if successors.is_empty() {
        out.push(path.clone());
        return;
    }

    let mut took_a_branch = false;
    for label in successors {
        let Some(next_idx) = function.basic_block_index(&label) else {
            tracing::warn!(function = %function.name, %label, "successor label does not resolve to a known block, dropping this branch");
            continue;
        };

        if visit_counts[next_idx] >= revisit_cap {
            tracing::warn!(
                function = %function.name,
                block = %function.basic_blocks[next_idx].label,
                cap = revisit_cap,
                "block-revisit cap reached, pruning this branch"
            );
            continue;
        }

        took_a_branch = true;
        visit_counts[next_idx] += 1;
        path.push(next_idx);
        walk(function, next_idx, path, visit_counts, revisit_cap, out);
        path.pop();
        visit_counts[next_idx] -= 1;
    }

    if !took_a_branch {
        // Every successor was pruned or unresolvable: this path still ends
        // here, so it must be recorded rather than silently dropped.
        out.push(path.clone());
    }
}
