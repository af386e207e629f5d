use crate::ast::decl::{Declaration, FunctionDef, FunctionId, Hook, HookId, Param, ParamId};
use crate::ast::expr::{Expr, ExprId};
use crate::ast::scope::{ScopeArena, ScopeId};
use crate::ast::stmt::{Stmt, StmtId};
use crate::ast::ty::{TypeExpr, TypeId};
use crate::ast::unit::{ItemId, UnitDef, UnitId, UnitItem};
use crate::ast::DeclId;
use shared_context::interner::Symbol;
use shared_context::Span;
use std::path::PathBuf;

/// Pairs a node with its source location. Every arena slot in `Module`
/// stores one of these, matching spec §3's "every node carries a source
/// location" — the mutable parent/child topology lives in the node's own
/// fields as arena-index edges (Design Notes §9), so no separate
/// parent/child bookkeeping is needed on top of this.
#[derive(Debug, Clone)]
pub struct Spanned<T> {
    pub span: Span,
    pub node: T,
}

impl<T> Spanned<T> {
    pub fn new(span: Span, node: T) -> Self {
        Self { span, node }
    }
}

/// One parsed, not-yet-finalized compilation unit (spec §3 Lifecycle: "The
/// Compiler Context owns a mapping `absolute-path -> Module`"). Every AST
/// node category lives in its own arena here, addressed by the matching
/// `*Id` newtype (Design Notes §9: "an arena of nodes addressed by index").
pub struct Module {
    pub name: Symbol,
    pub path: PathBuf,
    pub imports: Vec<Symbol>,
    pub exports: Vec<Symbol>,
    pub decls: Vec<DeclId>,
    pub root_scope: ScopeId,

    pub scopes: ScopeArena,
    declarations: Vec<Declaration>,
    types: Vec<Spanned<TypeExpr>>,
    exprs: Vec<Spanned<Expr>>,
    stmts: Vec<Spanned<Stmt>>,
    units: Vec<UnitDef>,
    items: Vec<UnitItem>,
    functions: Vec<FunctionDef>,
    params: Vec<Param>,
    hooks: Vec<Hook>,
}

impl Module {
    pub fn new(name: Symbol, path: PathBuf) -> Self {
        let mut scopes = ScopeArena::new();
        let root_scope = scopes.alloc(None);
        Self {
            name,
            path,
            imports: Vec::new(),
            exports: Vec::new(),
            decls: Vec::new(),
            root_scope,
            scopes,
            declarations: Vec::new(),
            types: Vec::new(),
            exprs: Vec::new(),
            stmts: Vec::new(),
            units: Vec::new(),
            items: Vec::new(),
            functions: Vec::new(),
            params: Vec::new(),
            hooks: Vec::new(),
        }
    }

    /// Clears the root scope's bindings, leaving everything else intact
    /// (spec §4.2 step 1 — the scope builder re-derives scopes on each run,
    /// required for the pass-idempotence property in §8).
    pub fn clear_root_scope(&mut self) {
        self.scopes.get_mut(self.root_scope).clear();
    }
}

macro_rules! arena_accessors {
    ($alloc:ident, $get:ident, $get_mut:ident, $id:ty, $field:ident, $node:ty) => {
        impl Module {
            pub fn $alloc(&mut self, value: $node) -> $id {
                self.$field.push(value);
                <$id>::from_index(self.$field.len() - 1)
            }

            pub fn $get(&self, id: $id) -> &$node {
                &self.$field[id.index()]
            }

            pub fn $get_mut(&mut self, id: $id) -> &mut $node {
                &mut self.$field[id.index()]
            }
        }
    };
}

/// Index conversions shared by every `*Id(u32)` newtype.
pub trait ArenaIndex: Copy {
    fn from_index(i: usize) -> Self;
    fn index(self) -> usize;
}

macro_rules! impl_arena_index {
    ($id:ty) => {
        impl ArenaIndex for $id {
            fn from_index(i: usize) -> Self {
                Self(i as u32)
            }
            fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

impl_arena_index!(DeclId);
impl_arena_index!(TypeId);
impl_arena_index!(ExprId);
impl_arena_index!(StmtId);
impl_arena_index!(UnitId);
impl_arena_index!(ItemId);
impl_arena_index!(FunctionId);
impl_arena_index!(ParamId);
impl_arena_index!(HookId);

arena_accessors!(alloc_decl, decl, decl_mut, DeclId, declarations, Declaration);
arena_accessors!(alloc_type, ty, ty_mut, TypeId, types, Spanned<TypeExpr>);
arena_accessors!(alloc_expr, expr, expr_mut, ExprId, exprs, Spanned<Expr>);
arena_accessors!(alloc_stmt, stmt, stmt_mut, StmtId, stmts, Spanned<Stmt>);
arena_accessors!(alloc_unit, unit, unit_mut, UnitId, units, UnitDef);
arena_accessors!(alloc_item, item, item_mut, ItemId, items, UnitItem);
arena_accessors!(alloc_function, function, function_mut, FunctionId, functions, FunctionDef);
arena_accessors!(alloc_param, param, param_mut, ParamId, params, Param);
arena_accessors!(alloc_hook, hook, hook_mut, HookId, hooks, Hook);

impl Module {
    pub fn decl_ids(&self) -> impl Iterator<Item = DeclId> {
        (0..self.declarations.len()).map(DeclId::from_index)
    }

    pub fn unit_ids(&self) -> impl Iterator<Item = UnitId> {
        (0..self.units.len()).map(UnitId::from_index)
    }

    pub fn expr_ids(&self) -> impl Iterator<Item = ExprId> + use<> {
        (0..self.exprs.len()).map(ExprId::from_index)
    }
}
