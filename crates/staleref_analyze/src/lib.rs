//! Path enumeration, abstract interpretation, and use-after-free detection
//! over a parsed [`staleref_ir::Function`].

mod detect;
mod interp;
mod paths;
mod place;

pub use detect::detect_path_terminal;
pub use interp::interpret_path;
pub use paths::{enumerate_paths, DEFAULT_REVISIT_CAP};
pub use place::{resolve_place, AssignMode, ResolvedPlace};

use staleref_diagnostic::Finding;
use staleref_ir::Function;

/// Run the full pipeline stage for one already-built function: enumerate
/// its paths, interpret each one, and check path-terminal reachability at
/// the end of every path. Returns every finding observed, across all
/// paths.
pub fn analyze_function(function: &mut Function, revisit_cap: usize) -> Vec<Finding> {
    enumerate_paths(function, revisit_cap);
    let paths = function.paths.clone();

    let mut findings = Vec::new();
    for path in &paths {
        interpret_path(function, path, &mut findings);
        detect_path_terminal(function, &mut findings);
    }
    findings
}

#[cfg(test)]
mod seed_scenarios {
    use super::*;
    use staleref_parse::parse_functions;
    use std::path::PathBuf;

    fn analyze_source(source: &str) -> Vec<Finding> {
        let file = PathBuf::from("scenario.mir");
        let mut functions = parse_functions(&file, source);
        assert_eq!(functions.len(), 1, "expected exactly one function in the fixture");
        analyze_function(&mut functions[0], DEFAULT_REVISIT_CAP)
    }

    #[test]
    fn scenario_a_local_pointer_outlives_its_referent() {
        let src = r#"
fn scenario_a(_1: i32) -> () {
    let _2: *const i32;
    let _3: i32;
    bb0: {
        _2 = &_1;
        StorageDead(_1);
        _3 = (*_2);
        return;
    }
}
"#;
        let findings = analyze_source(src);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].var, "_2");
        assert_eq!(findings[0].referent, "_1");
    }

    #[test]
    fn scenario_b_pointer_copy_propagates_dangling() {
        let src = r#"
fn scenario_b(_1: i32) -> () {
    let _2: *const i32;
    let _3: *const i32;
    let _4: i32;
    bb0: {
        _2 = &_1;
        _3 = _2;
        StorageDead(_1);
        _4 = (*_3);
        return;
    }
}
"#;
        let findings = analyze_source(src);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].var, "_3");
        assert_eq!(findings[0].referent, "_1");
    }

    #[test]
    fn scenario_c_forget_suppresses_termination() {
        let src = r#"
fn scenario_c(_1: i32) -> () {
    let _2: *const i32;
    let _3: i32;
    bb0: {
        _2 = &_1;
        _ = const core::mem::forget(move _1) -> [return: bb1, unwind: bb2];
    }
    bb1: {
        StorageDead(_1);
        _3 = (*_2);
        return;
    }
    bb2: {
        return;
    }
}
"#;
        let findings = analyze_source(src);
        assert!(findings.is_empty());
    }

    #[test]
    fn scenario_d_reassignment_revives() {
        let src = r#"
fn scenario_d(_1: i32) -> () {
    let _2: *const i32;
    let _3: i32;
    bb0: {
        _2 = &_1;
        StorageDead(_1);
        _1 = const 7_i32;
        _3 = (*_2);
        return;
    }
}
"#;
        let findings = analyze_source(src);
        assert!(findings.is_empty());
    }

    #[test]
    fn scenario_e_global_leakage() {
        let src = r#"
fn scenario_e(_1: i32) -> () {
    bb0: {
        (GLOBAL: *const i32) = &_1;
        StorageDead(_1);
        return;
    }
}
"#;
        let findings = analyze_source(src);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].var, "GLOBAL");
        assert_eq!(findings[0].referent, "_1");
    }

    #[test]
    fn scenario_f_path_sensitivity() {
        let src = r#"
fn scenario_f(_1: i32) -> () {
    let _2: *const i32;
    let _3: i32;
    bb0: {
        switchInt(move _3) -> [0: bb1, otherwise: bb2];
    }
    bb1: {
        StorageDead(_1);
        goto -> bb3;
    }
    bb2: {
        goto -> bb3;
    }
    bb3: {
        _2 = &_1;
        _3 = (*_2);
        return;
    }
}
"#;
        let findings = analyze_source(src);
        // Only the branch through bb1 (which terminates _1 before bb3 takes
        // the reference) should produce a finding; the bb2 branch is clean.
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].var, "_2");
        assert_eq!(findings[0].referent, "_1");
    }
}
