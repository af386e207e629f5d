// Crate-level imports and re-exports
use crate::interner::Interner;
use crate::source_map::SourceMap;
pub use bumpalo::Bump; // Memory arena used for efficient allocation
use interner::Symbol;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// Submodules
pub mod diagnostics; // Severity/span/message error channel shared by every pass
pub mod interner; // Deduplicates strings and creates Symbols
pub mod source_map; // Maps AST positions to source code positions

pub use diagnostics::{Diagnostic, Diagnostics, Severity};

/// Global compiler context.
///
/// Owns the things every stage of the pipeline needs to agree on: the
/// string interner, the per-file source maps used to render diagnostics,
/// and the module cache keyed by canonicalized path. It does *not* know how
/// to lex, parse, or run semantic passes — those live in their own crates
/// and are driven by `compiler_driver`, which composes them against this
/// context (see `CompilerContext::record_module` / `lookup_module`).
pub struct CompilerContext<'a> {
    pub interner: Interner<'a>,
    pub source_maps: HashMap<PathBuf, SourceMap<'a>>,
    pub diagnostics: Diagnostics,
    /// Directories searched, in order, when resolving an `import` path.
    pub search_path: Vec<PathBuf>,
    /// Canonical path -> cached module handle. The handle is opaque here;
    /// the parser/semantic crates define what a `ModuleId` actually points
    /// at. Kept as a plain symbol table so a second `load()` of the same
    /// path is a cache hit rather than a re-parse.
    modules: HashMap<PathBuf, Symbol>,
    /// Paths currently being loaded, to detect import cycles (§8 scenario 6).
    loading: Vec<PathBuf>,
}

impl<'a> CompilerContext<'a> {
    pub fn new(arena: &'a Bump) -> Self {
        Self {
            interner: Interner::new(arena),
            source_maps: HashMap::new(),
            diagnostics: Diagnostics::new(),
            search_path: Vec::new(),
            modules: HashMap::new(),
            loading: Vec::new(),
        }
    }

    pub fn with_search_path(mut self, dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        self.search_path.extend(dirs);
        self
    }

    /// Registers a source file's text under its canonical path, returning
    /// the `SourceMap` that diagnostics for that file should be formatted
    /// against.
    pub fn register_source(
        &mut self,
        path: PathBuf,
        file_name: &'a str,
        source_code: &'a str,
    ) -> &SourceMap<'a> {
        self.source_maps
            .entry(path)
            .or_insert_with(|| SourceMap::new(file_name, source_code))
    }

    /// Begins loading `path`. Returns an error if `path` is already on the
    /// in-progress stack (an import cycle) or already cached (a hit, the
    /// caller should use the cached module instead of reparsing).
    pub fn begin_load(&mut self, path: &Path) -> Result<(), LoadError> {
        if self.modules.contains_key(path) {
            return Err(LoadError::AlreadyCached);
        }
        if self.loading.iter().any(|p| p == path) {
            return Err(LoadError::ImportCycle(self.loading.clone()));
        }
        self.loading.push(path.to_path_buf());
        Ok(())
    }

    pub fn finish_load(&mut self, path: &Path, handle: Symbol) {
        self.loading.retain(|p| p != path);
        self.modules.insert(path.to_path_buf(), handle);
    }

    pub fn abort_load(&mut self, path: &Path) {
        self.loading.retain(|p| p != path);
    }

    pub fn lookup_module(&self, path: &Path) -> Option<Symbol> {
        self.modules.get(path).copied()
    }

    pub fn resolve_import(&self, name: &str) -> Option<PathBuf> {
        let file_name = if name.ends_with(".pac2") {
            name.to_string()
        } else {
            format!("{name}.pac2")
        };
        for dir in &self.search_path {
            let candidate = dir.join(&file_name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        None
    }
}

#[derive(Debug)]
pub enum LoadError {
    AlreadyCached,
    ImportCycle(Vec<PathBuf>),
    NotFound(String),
}

/// Represents a region in the source code.
/// Used for error reporting and mapping AST nodes to positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize, // Starting byte offset in source
    pub end: usize,   // Ending byte offset in source
    pub line: usize,  // Line number in source
}

impl Default for Span {
    fn default() -> Self {
        Self {
            start: 0,
            end: 0,
            line: 0,
        }
    }
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize) -> Self {
        Self { start, end, line }
    }

    /// returns a tuple (start, line)
    /// used in keeping track of the position during parsing
    pub fn get_start_and_line(&self) -> (usize, usize) {
        (self.start, self.line)
    }

    /// Spans the combined region from `self` through `other`, keeping the
    /// earlier line number. Used when merging child spans into a parent
    /// AST node's span during parsing.
    pub fn to(&self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end), self.line)
    }
}

/// Represents a unique identifier in the program.
/// Interned via `Interner` for fast comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identifier {
    symbol: Symbol, // Interned string representing the identifier name
    id: usize,      // Unique numeric ID for disambiguation (e.g. shadowing)
}

impl Identifier {
    pub fn new(symbol: Symbol, id: usize) -> Self {
        Self { symbol, id }
    }

    pub fn get_symbol(&self) -> Symbol {
        self.symbol
    }

    pub fn get_id(&self) -> usize {
        self.id
    }

    pub fn into_parts(self) -> (Symbol, usize) {
        (self.symbol, self.id)
    }
}

impl Default for Identifier {
    fn default() -> Self {
        Self {
            symbol: Symbol::default(),
            id: 0,
        }
    }
}

/// A combination of an identifier and its location in the source.
/// Useful for precise error reporting and symbol tracking.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct SpannedIdentifier {
    identifier: Identifier,
    span: Span,
}

impl SpannedIdentifier {
    pub fn new(identifier: Identifier, span: Span) -> Self {
        Self { identifier, span }
    }

    pub fn get_identifier(&self) -> Identifier {
        self.identifier
    }

    pub fn get_span(&self) -> Span {
        self.span
    }

    pub fn into_parts(self) -> (Identifier, Span) {
        (self.identifier, self.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn reloading_an_import_cycle_is_reported_before_any_module_is_cached() {
        let arena = Bump::new();
        let mut ctx = CompilerContext::new(&arena);

        let a = PathBuf::from("/pkg/a.pac2");
        let b = PathBuf::from("/pkg/b.pac2");

        ctx.begin_load(&a).unwrap();
        ctx.begin_load(&b).unwrap();

        let cycle = ctx.begin_load(&a);
        assert!(matches!(cycle, Err(LoadError::ImportCycle(_))));

        assert!(ctx.lookup_module(&a).is_none());
        assert!(ctx.lookup_module(&b).is_none());
    }

    #[test]
    fn a_finished_load_is_served_from_cache_on_a_second_request() {
        let arena = Bump::new();
        let mut ctx = CompilerContext::new(&arena);
        let path = PathBuf::from("/pkg/a.pac2");

        ctx.begin_load(&path).unwrap();
        let handle = ctx.interner.intern("a");
        ctx.finish_load(&path, handle);

        assert_eq!(ctx.lookup_module(&path), Some(handle));
        assert!(matches!(ctx.begin_load(&path), Err(LoadError::AlreadyCached)));
    }
}
