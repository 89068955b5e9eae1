use std::path::PathBuf;

use rustc_hash::FxHashMap;

use crate::{BasicBlock, VarArena, VarId};

/// One compiled function, as recovered from one MIR dump file.
///
/// Owns every [`crate::VarSlot`] it mentions (parameters, locals, globals
/// discovered lazily, and their projections) in a single [`VarArena`], plus
/// its ordered basic blocks. `paths` starts empty and is filled in by the
/// path enumerator once the function is fully built.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub file: PathBuf,
    pub basic_blocks: Vec<BasicBlock>,
    pub params: Vec<(String, VarId)>,
    pub locals: FxHashMap<String, VarId>,
    pub globals: FxHashMap<String, VarId>,
    pub arena: VarArena,
    /// Enumerated acyclic paths from entry (block 0), each a sequence of
    /// indices into `basic_blocks`. Populated by the path enumerator.
    pub paths: Vec<Vec<usize>>,
}

impl Function {
    pub fn new(name: impl Into<String>, file: PathBuf) -> Self {
        Function {
            name: name.into(),
            file,
            basic_blocks: Vec::new(),
            params: Vec::new(),
            locals: FxHashMap::default(),
            globals: FxHashMap::default(),
            arena: VarArena::new(),
            paths: Vec::new(),
        }
    }

    /// Parameters are tracked both in `params` (so the detector can walk
    /// just their child subtrees) and in `locals` (so place resolution can
    /// find them by name the same way it finds any other local).
    pub fn add_param(&mut self, name: impl Into<String>, type_name: impl Into<String>) -> VarId {
        let name = name.into();
        let id = self.arena.alloc(name.clone(), type_name);
        self.locals.insert(name.clone(), id);
        self.params.push((name, id));
        id
    }

    pub fn add_local(&mut self, name: impl Into<String>, type_name: impl Into<String>) -> VarId {
        let name = name.into();
        let id = self.arena.alloc(name.clone(), type_name);
        self.locals.insert(name, id);
        id
    }

    pub fn local(&self, name: &str) -> Option<VarId> {
        self.locals.get(name).copied()
    }

    /// Look up a global by name, creating it (classified from `type_name`)
    /// on first sight. Mirrors `Function.add_global_variable` /
    /// `find_global_variable_by_name` in the reference implementation.
    pub fn global_or_insert(&mut self, name: &str, type_name: &str) -> VarId {
        if let Some(id) = self.globals.get(name) {
            return *id;
        }
        let id = self.arena.alloc(name.to_string(), type_name.to_string());
        self.globals.insert(name.to_string(), id);
        id
    }

    pub fn push_basic_block(&mut self, block: BasicBlock) {
        self.basic_blocks.push(block);
    }

    pub fn basic_block_index(&self, label: &str) -> Option<usize> {
        self.basic_blocks.iter().position(|bb| bb.label == label)
    }

    /// Restore every variable's lifetime state and edges to their initial
    /// values before interpreting the next path (spec.md §8 property 2).
    pub fn reset_for_path(&mut self) {
        self.arena.reset_all();
    }
}
