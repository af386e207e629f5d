//! Read-only view over a finalized module handed to a backend (spec §4.9).
//!
//! `codegen` defines no backend of its own — BinPAC++ targets differ too
//! much (a bytecode VM, native code, a C shim) to share one here. What it
//! gives every backend is the same answers `semantic_analysis` and
//! `grammar` already computed, through one stable surface, so a backend
//! never re-derives a type or re-walks a scope and never mutates the AST
//! it's reading.

use operators::{OperatorKind, Type};
use parser::ast::{DeclId, DeclKind, Expr, ExprId, IdRef, ItemId, Module, ParamId, UnitId};
use shared_context::interner::Interner;

pub use grammar::{Grammar, ProdId, Production};

/// What an `Expr::Id` ultimately names, once resolution has run. A backend
/// asks for this instead of matching on `IdRef` itself, since `IdRef`
/// resolution is an implementation detail of `semantic_analysis`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundName {
    Declaration(DeclId),
    Parameter(ParamId),
    /// The reference never resolved; `semantic_analysis::validator` already
    /// reported this as an error, so a backend need not report it again.
    Unresolved,
}

/// A finalized module paired with its per-unit grammars (spec §4.9).
/// Building one borrows both for as long as the backend needs them; it
/// never hands out `&mut Module`.
pub struct Model<'a> {
    module: &'a Module,
    interner: &'a Interner<'a>,
    grammar: &'a Grammar,
}

impl<'a> Model<'a> {
    pub fn new(module: &'a Module, interner: &'a Interner<'a>, grammar: &'a Grammar) -> Self {
        Self { module, interner, grammar }
    }

    /// Every top-level declaration, in source order.
    pub fn declarations(&self) -> impl Iterator<Item = DeclId> + '_ {
        self.module.decl_ids()
    }

    pub fn declaration_name(&self, decl_id: DeclId) -> &'a str {
        self.interner.lookup(self.module.decl(decl_id).id.get_symbol())
    }

    /// A unit's fields and other items, in declaration order — the order a
    /// backend must parse or emit them in.
    pub fn unit_items(&self, unit_id: UnitId) -> &'a [ItemId] {
        &self.module.unit(unit_id).items
    }

    /// The production a backend should start matching input against for
    /// this unit, or `None` if the unit's grammar failed to build.
    pub fn unit_start(&self, unit_id: UnitId) -> Option<ProdId> {
        self.grammar.start_of(unit_id)
    }

    pub fn grammar(&self) -> &'a Grammar {
        self.grammar
    }

    /// The static type of an already-resolved expression (spec §4.9
    /// "per-expression resolved type").
    pub fn expr_type(&self, expr_id: ExprId) -> Type {
        semantic_analysis::expr_type(self.module, expr_id)
    }

    /// The operator and result type an `UnresolvedOperator` node settled on
    /// (spec §4.9 "chosen operator"), or `None` for any other expression
    /// kind, including one the operator resolver never reached.
    pub fn resolved_operator(&self, expr_id: ExprId) -> Option<(OperatorKind, Type)> {
        match &self.module.expr(expr_id).node {
            Expr::ResolvedOperator { kind, result, .. } => Some((*kind, result.clone())),
            _ => None,
        }
    }

    /// What an `Expr::Id` node is bound to, chasing through `IdRef` and one
    /// level of `Expr::Variable`/`Expr::Function`/`Expr::Parameter` wrapping
    /// (spec §4.9 "per-ID bound declaration").
    pub fn bound_name(&self, expr_id: ExprId) -> BoundName {
        let target = match &self.module.expr(expr_id).node {
            Expr::Id(IdRef::Resolved(target)) => *target,
            Expr::Id(IdRef::Unresolved(_)) => return BoundName::Unresolved,
            _ => expr_id,
        };
        match &self.module.expr(target).node {
            Expr::Variable(decl_id) | Expr::Function(decl_id) => BoundName::Declaration(*decl_id),
            Expr::Parameter(param_id) => BoundName::Parameter(*param_id),
            _ => BoundName::Unresolved,
        }
    }

    /// Whether a declaration is exported from its module (spec §3
    /// "Declaration"), relevant to a backend deciding what gets external
    /// linkage.
    pub fn is_exported(&self, decl_id: DeclId) -> bool {
        self.module.decl(decl_id).exported
    }

    pub fn decl_kind(&self, decl_id: DeclId) -> &'a DeclKind {
        &self.module.decl(decl_id).kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_context::source_map::SourceMap;
    use shared_context::Diagnostics;
    use std::path::PathBuf;

    fn build(src: &'static str) -> (Module, Interner<'static>) {
        let arena: &'static shared_context::Bump = Box::leak(Box::new(shared_context::Bump::new()));
        let mut interner = Interner::new(arena);
        let source_map = SourceMap::new("test.pac2", src);
        let lexer = lexer::Lexer::new(src);
        let mut module = parser::parse(lexer, &mut interner, &source_map, PathBuf::from("test.pac2")).unwrap();
        let mut diagnostics = Diagnostics::new();
        semantic_analysis::finalize(&mut module, &mut interner, &mut diagnostics, "test.pac2").unwrap();
        (module, interner)
    }

    #[test]
    fn a_resolved_parameter_reference_reports_its_parameter_as_the_bound_name() {
        let (module, interner) = build("module M; function f(x: int32): int32 { return x; }");
        let (grammar, errors) = Grammar::build(&module, &interner);
        assert!(errors.is_empty());
        let model = Model::new(&module, &interner, &grammar);

        let decl_id = model.declarations().next().unwrap();
        let DeclKind::Function { function } = model.decl_kind(decl_id) else {
            panic!("expected a function declaration")
        };
        let body = module.function(*function).body.unwrap();
        let parser::ast::Stmt::Block { stmts, .. } = module.stmt(body).node.clone() else {
            panic!("expected a block body")
        };
        let parser::ast::Stmt::Return(Some(value)) = module.stmt(stmts[0]).node.clone() else {
            panic!("expected a return statement")
        };
        assert!(matches!(model.bound_name(value), BoundName::Parameter(_)));
    }

    #[test]
    fn a_three_field_unit_exposes_its_items_and_grammar_start_together() {
        let (module, interner) = build("module M; type T = unit { a: uint8; b: uint16; };");
        let (grammar, errors) = Grammar::build(&module, &interner);
        assert!(errors.is_empty());
        let model = Model::new(&module, &interner, &grammar);

        let unit_id = module.unit_ids().next().unwrap();
        assert_eq!(model.unit_items(unit_id).len(), 2);
        assert!(model.unit_start(unit_id).is_some());
    }
}
