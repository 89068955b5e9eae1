//! Function builder (spec.md §4.2): consumes the lexical recognizer's
//! per-line classification and assembles [`staleref_ir::Function`] records,
//! one per `fn ... { ... }` block in a MIR dump file.
//!
//! A two-flag state machine (`in_function`, `in_block`) tracks nesting: a
//! file is a flat sequence of function bodies, each of which is a flat
//! sequence of basic blocks. Both levels close on the same textual `}`, so
//! the builder disambiguates purely from which flag is currently set.

mod args;
mod header;
mod local_decl;

use std::path::Path;

use staleref_ir::{BasicBlock, Function};
use staleref_lex::{classify, LineKind};

/// Parse every function in one MIR dump file's text into
/// [`staleref_ir::Function`] records, in file order.
pub fn parse_functions(file: &Path, source: &str) -> Vec<Function> {
    let mut builder = Builder::new(file);
    for raw_line in source.lines() {
        builder.feed(raw_line);
    }
    builder.finish()
}

struct Builder<'a> {
    file: &'a Path,
    in_block: bool,
    current: Option<Function>,
    current_block: Option<BasicBlock>,
    done: Vec<Function>,
}

impl<'a> Builder<'a> {
    fn new(file: &'a Path) -> Self {
        Builder {
            file,
            in_block: false,
            current: None,
            current_block: None,
            done: Vec::new(),
        }
    }

    fn feed(&mut self, raw_line: &str) {
        match classify(raw_line, self.in_block) {
            LineKind::Blank => {}
            LineKind::FunctionHeader { raw } => self.start_function(&raw),
            LineKind::LocalDecl { raw } => self.add_local(&raw),
            LineKind::BasicBlockHeader { label } => self.start_block(label),
            LineKind::BlockEnd => self.end_block_or_function(),
            LineKind::Statement(stmt) => self.add_statement(stmt),
        }
    }

    fn start_function(&mut self, raw: &str) {
        if self.current.is_some() {
            tracing::warn!(file = %self.file.display(), "nested function header, dropping in-progress function");
            self.current = None;
            self.current_block = None;
            self.in_block = false;
        }
        let Some(info) = header::parse_header(raw) else {
            tracing::warn!(file = %self.file.display(), line = %raw, "unparseable function header, skipping");
            return;
        };
        let mut function = Function::new(info.name, self.file.to_path_buf());
        for (name, ty) in args::split_params(&info.params_src) {
            function.add_param(name, ty);
        }
        self.current = Some(function);
    }

    fn add_local(&mut self, raw: &str) {
        let Some(function) = self.current.as_mut() else {
            tracing::warn!(file = %self.file.display(), line = %raw, "local declaration outside any function, ignoring");
            return;
        };
        let Some((name, ty)) = local_decl::parse_local_decl(raw) else {
            tracing::warn!(file = %self.file.display(), line = %raw, "unparseable local declaration, skipping");
            return;
        };
        function.add_local(name, ty);
    }

    fn start_block(&mut self, label: String) {
        if self.current.is_none() {
            tracing::warn!(file = %self.file.display(), %label, "basic block outside any function, ignoring");
            return;
        }
        self.current_block = Some(BasicBlock::new(label));
        self.in_block = true;
    }

    fn add_statement(&mut self, stmt: String) {
        let Some(block) = self.current_block.as_mut() else {
            tracing::warn!(file = %self.file.display(), line = %stmt, "statement outside any basic block, ignoring");
            return;
        };
        block.push_statement(stmt);
    }

    fn end_block_or_function(&mut self) {
        if self.in_block {
            if let (Some(function), Some(block)) = (self.current.as_mut(), self.current_block.take()) {
                function.push_basic_block(block);
            }
            self.in_block = false;
        } else if let Some(function) = self.current.take() {
            self.done.push(function);
        }
    }

    fn finish(mut self) -> Vec<Function> {
        if let Some(function) = self.current.take() {
            tracing::warn!(file = %self.file.display(), name = %function.name, "function body never closed, keeping it as-is");
            self.done.push(function);
        }
        self.done
    }
}
