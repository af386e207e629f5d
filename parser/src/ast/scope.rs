use crate::ast::ExprId;
use shared_context::interner::Symbol;
use std::collections::HashMap;

/// Index into `Module::scopes`. Scopes are owned by the block/unit they
/// belong to (spec §3 Lifecycle) and addressed by index like every other
/// arena node (Design Notes §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

/// A mapping `ID -> Expression` (spec §3 "Scope"). Scopes form a tree: a
/// parent pointer for ordinary lexical nesting, plus named child scopes for
/// things that are looked up by a leading path component — an imported
/// module's root scope, or a unit/enum/bitset's type-local scope.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub parent: Option<ScopeId>,
    bindings: HashMap<Symbol, ExprId>,
    children: HashMap<Symbol, ScopeId>,
}

impl Scope {
    pub fn new(parent: Option<ScopeId>) -> Self {
        Self {
            parent,
            bindings: HashMap::new(),
            children: HashMap::new(),
        }
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
        self.children.clear();
    }

    /// Inserts `id -> expr`. Returns `false` without modifying the scope if
    /// `id` is already bound *directly* in this scope (spec §4.2 step 2:
    /// "the enclosing block's scope does not already contain the name").
    pub fn insert(&mut self, id: Symbol, expr: ExprId) -> bool {
        if self.bindings.contains_key(&id) {
            return false;
        }
        self.bindings.insert(id, expr);
        true
    }

    /// Returns whether `id` is bound directly in this scope, ignoring
    /// ancestors (used for the duplicate-declaration check).
    pub fn has_local(&self, id: Symbol) -> bool {
        self.bindings.contains_key(&id)
    }

    pub fn get_local(&self, id: Symbol) -> Option<ExprId> {
        self.bindings.get(&id).copied()
    }

    pub fn add_child(&mut self, id: Symbol, scope: ScopeId) {
        self.children.insert(id, scope);
    }

    pub fn get_child(&self, id: Symbol) -> Option<ScopeId> {
        self.children.get(&id).copied()
    }

    /// Whether this scope's bindings and children are identical to
    /// `other`'s, ignoring `parent`. Used by passes that clear and
    /// re-derive a scope from scratch every sweep to tell whether the
    /// rebuild actually changed anything, rather than reporting `Changed`
    /// merely because inserting into a freshly emptied scope "succeeded".
    pub fn matches(&self, other: &Scope) -> bool {
        self.bindings == other.bindings && self.children == other.children
    }
}

/// Owns every `Scope` in a module and performs the hierarchical lookup
/// described in spec §4.4: walk up the parent chain from the starting
/// scope; at each level, check local bindings first, and named children
/// only for the lookup's head component.
pub struct ScopeArena {
    scopes: Vec<Scope>,
}

impl ScopeArena {
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    pub fn alloc(&mut self, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(parent));
        id
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0 as usize]
    }

    /// Unscoped lookup: walk from `start` up through parents until `id` is
    /// found or the chain is exhausted.
    pub fn lookup(&self, start: ScopeId, id: Symbol) -> Option<ExprId> {
        let mut current = Some(start);
        while let Some(scope_id) = current {
            let scope = self.get(scope_id);
            if let Some(expr) = scope.get_local(id) {
                return Some(expr);
            }
            current = scope.parent;
        }
        None
    }

    /// Scoped lookup for a dotted path `components = [a, b, c]`: resolve
    /// `a` as a named child scope (walking up through parents to find one
    /// that has it), then resolve `b.c` inside it, recursively. The final
    /// component is an ordinary binding lookup in the resolved scope.
    pub fn lookup_path(&self, start: ScopeId, components: &[Symbol]) -> Option<ExprId> {
        match components {
            [] => None,
            [only] => self.lookup(start, *only),
            [head, rest @ ..] => {
                let child = self.find_child(start, *head)?;
                self.lookup_path_within(child, rest)
            }
        }
    }

    fn lookup_path_within(&self, scope: ScopeId, components: &[Symbol]) -> Option<ExprId> {
        match components {
            [] => None,
            [only] => self.get(scope).get_local(*only),
            [head, rest @ ..] => {
                let child = self.get(scope).get_child(*head)?;
                self.lookup_path_within(child, rest)
            }
        }
    }

    fn find_child(&self, start: ScopeId, id: Symbol) -> Option<ScopeId> {
        let mut current = Some(start);
        while let Some(scope_id) = current {
            let scope = self.get(scope_id);
            if let Some(child) = scope.get_child(id) {
                return Some(child);
            }
            current = scope.parent;
        }
        None
    }
}
