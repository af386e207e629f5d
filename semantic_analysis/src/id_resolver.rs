use crate::pass::PassOutcome;
use parser::ast::{CtorKind, DeclKind, Expr, ExprId, IdRef, Module, ScopeId, Spanned, Stmt, StmtId, TypeExpr, TypeId};
use shared_context::Diagnostics;

/// Resolves every `Expression::Id(Unresolved)` node and every
/// `Type::TypeByName`/`UnknownElementType` node reachable from a
/// declaration, by walking each declaration's body carrying the scope that
/// was current at that point of the original parse (spec §4.4). A lookup
/// that fails is left unresolved for this sweep; `validator` reports
/// whatever is still unresolved once the fixed point is reached.
pub fn run(module: &mut Module, _diagnostics: &mut Diagnostics, _file_name: &str) -> PassOutcome {
    let root = module.root_scope;
    let mut changed = false;

    let decl_ids: Vec<_> = module.decls.clone();
    for decl_id in decl_ids {
        let decl = module.decl(decl_id).clone();
        match decl.kind {
            DeclKind::Variable { ty, init } => {
                changed |= resolve_type(module, root, ty);
                if let Some(init) = init {
                    changed |= resolve_expr(module, root, init);
                }
            }
            DeclKind::Constant { ty, value } => {
                changed |= resolve_type(module, root, ty);
                changed |= resolve_expr(module, root, value);
            }
            DeclKind::Type { ty } => {
                changed |= resolve_type(module, root, ty);
                if let TypeExpr::Unit(unit_id) = module.ty(ty).node {
                    changed |= resolve_unit(module, unit_id);
                }
            }
            DeclKind::Function { function } => {
                let func = module.function(function).clone();
                changed |= resolve_type(module, root, func.result);
                for param_id in &func.params {
                    let param_ty = module.param(*param_id).ty;
                    changed |= resolve_type(module, root, param_ty);
                }
                if let (Some(scope), Some(body)) = (func.scope, func.body) {
                    changed |= resolve_stmt(module, scope, body);
                }
            }
            DeclKind::Hook { hook } => {
                let hook = module.hook(hook).clone();
                changed |= resolve_stmt(module, hook.scope, hook.body);
            }
        }
    }

    PassOutcome::changed(changed)
}

fn resolve_unit(module: &mut Module, unit_id: parser::ast::UnitId) -> bool {
    let item_ids = module.unit(unit_id).items.clone();
    let mut changed = false;
    for item_id in item_ids {
        changed |= resolve_item(module, item_id);
    }
    changed
}

fn resolve_item(module: &mut Module, item_id: parser::ast::ItemId) -> bool {
    use parser::ast::UnitItemKind;

    let item = module.item(item_id).clone();
    let mut changed = false;

    match item.kind {
        UnitItemKind::AtomicType(ty) | UnitItemKind::EmbeddedUnit(ty) | UnitItemKind::Variable(ty) => {
            changed |= resolve_type(module, item.scope, ty);
        }
        UnitItemKind::Constant(expr) | UnitItemKind::Ctor(expr) => {
            changed |= resolve_expr(module, item.scope, expr);
        }
        UnitItemKind::Switch { expr, cases, default } => {
            changed |= resolve_expr(module, item.scope, expr);
            for case in cases {
                for value in case.values {
                    changed |= resolve_expr(module, item.scope, value);
                }
                changed |= resolve_item(module, case.item);
            }
            if let Some(default) = default {
                changed |= resolve_item(module, default);
            }
        }
        UnitItemKind::Container { element, .. } => {
            changed |= resolve_item(module, element);
        }
        UnitItemKind::GlobalHook(hook_id) => {
            let hook = module.hook(hook_id).clone();
            changed |= resolve_stmt(module, hook.scope, hook.body);
        }
        UnitItemKind::Property { value, .. } => {
            if let Some(value) = value {
                changed |= resolve_expr(module, item.scope, value);
            }
        }
    }

    for attr in &item.attributes {
        if let Some(value) = attr.value {
            changed |= resolve_expr(module, item.scope, value);
        }
    }
    for hook_id in item.hooks {
        let hook = module.hook(hook_id).clone();
        changed |= resolve_stmt(module, hook.scope, hook.body);
    }

    changed
}

fn resolve_stmt(module: &mut Module, scope: ScopeId, stmt_id: StmtId) -> bool {
    let node = module.stmt(stmt_id).node.clone();
    match node {
        Stmt::Block { scope: block_scope, stmts } => {
            let mut changed = false;
            for s in stmts {
                changed |= resolve_stmt(module, block_scope, s);
            }
            changed
        }
        Stmt::Expression(expr) => resolve_expr(module, scope, expr),
        Stmt::IfElse { cond, then_branch, else_branch } => {
            let mut changed = resolve_expr(module, scope, cond);
            changed |= resolve_stmt(module, scope, then_branch);
            if let Some(else_branch) = else_branch {
                changed |= resolve_stmt(module, scope, else_branch);
            }
            changed
        }
        Stmt::ForEach { loop_var, collection, scope: body_scope, body } => {
            let mut changed = resolve_expr(module, scope, collection);
            let symbol = loop_var.get_symbol();
            if module.scopes.get(body_scope).get_local(symbol).is_none() {
                let span = module.stmt(stmt_id).span;
                let marker = module.alloc_expr(Spanned::new(span, Expr::LoopVariable));
                module.scopes.get_mut(body_scope).insert(symbol, marker);
                changed = true;
            }
            changed |= resolve_stmt(module, body_scope, body);
            changed
        }
        Stmt::Return(value) => match value {
            Some(value) => resolve_expr(module, scope, value),
            None => false,
        },
        Stmt::Print(args) => {
            let mut changed = false;
            for arg in args {
                changed |= resolve_expr(module, scope, arg);
            }
            changed
        }
        Stmt::TryCatch { body, catches } => {
            let mut changed = resolve_stmt(module, scope, body);
            for catch in catches {
                if let Some(exception_type) = catch.exception_type {
                    changed |= resolve_type(module, scope, exception_type);
                }
                changed |= resolve_stmt(module, scope, catch.body);
            }
            changed
        }
        Stmt::NoOp => false,
    }
}

fn resolve_expr(module: &mut Module, scope: ScopeId, expr_id: ExprId) -> bool {
    let node = module.expr(expr_id).node.clone();
    match node {
        Expr::Id(IdRef::Unresolved(path)) => {
            if let Some(target) = module.scopes.lookup_path(scope, &path) {
                module.expr_mut(expr_id).node = Expr::Id(IdRef::Resolved(target));
                true
            } else {
                false
            }
        }
        Expr::List(items) => {
            let mut changed = false;
            for item in items {
                changed |= resolve_expr(module, scope, item);
            }
            changed
        }
        Expr::Ctor(kind) => resolve_ctor(module, scope, kind),
        Expr::Coerced { inner, .. } => resolve_expr(module, scope, inner),
        Expr::UnresolvedOperator { operands, .. } | Expr::ResolvedOperator { operands, .. } => {
            let mut changed = false;
            for operand in operands {
                changed |= resolve_expr(module, scope, operand);
            }
            changed
        }
        Expr::Constant(_)
        | Expr::Id(IdRef::Resolved(_))
        | Expr::Function(_)
        | Expr::Module(_)
        | Expr::Parameter(_)
        | Expr::Variable(_)
        | Expr::Type(_)
        | Expr::ParserState(_)
        | Expr::LoopVariable => false,
    }
}

fn resolve_ctor(module: &mut Module, scope: ScopeId, kind: CtorKind) -> bool {
    let mut changed = false;
    match kind {
        CtorKind::List(items) | CtorKind::Vector(items) | CtorKind::Set(items) => {
            for item in items {
                changed |= resolve_expr(module, scope, item);
            }
        }
        CtorKind::Map(pairs) => {
            for (key, value) in pairs {
                changed |= resolve_expr(module, scope, key);
                changed |= resolve_expr(module, scope, value);
            }
        }
        CtorKind::RegExp(_) | CtorKind::Bytes(_) => {}
    }
    changed
}

fn resolve_type(module: &mut Module, scope: ScopeId, ty_id: TypeId) -> bool {
    let node = module.ty(ty_id).node.clone();
    match node {
        TypeExpr::TypeByName(path) => {
            if let Some(target) = module.scopes.lookup_path(scope, &path) {
                if let Expr::Type(resolved_ty) = &module.expr(target).node {
                    let resolved_ty = *resolved_ty;
                    let resolved = module.ty(resolved_ty).node.clone();
                    module.ty_mut(ty_id).node = resolved;
                    return true;
                }
            }
            false
        }
        TypeExpr::List(inner) | TypeExpr::Vector(inner) | TypeExpr::Set(inner) | TypeExpr::Iterator(inner) | TypeExpr::OptionalArgument(inner) => {
            resolve_type(module, scope, inner)
        }
        TypeExpr::Map(key, value) => {
            let mut changed = resolve_type(module, scope, key);
            changed |= resolve_type(module, scope, value);
            changed
        }
        TypeExpr::Function { params, result } => {
            let mut changed = false;
            for param in params {
                changed |= resolve_type(module, scope, param);
            }
            changed |= resolve_type(module, scope, result);
            changed
        }
        TypeExpr::Scalar(_) | TypeExpr::Unit(_) | TypeExpr::UnknownElementType => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_context::interner::Interner;
    use shared_context::source_map::SourceMap;
    use std::path::PathBuf;

    fn parse(src: &str) -> Module {
        let arena = shared_context::Bump::new();
        let mut interner = Interner::new(&arena);
        let source_map = SourceMap::new("test.pac2", src);
        let lexer = lexer::Lexer::new(src);
        parser::parse(lexer, &mut interner, &source_map, PathBuf::from("test.pac2")).unwrap()
    }

    #[test]
    fn a_parameter_reference_in_a_function_body_resolves_to_its_parameter() {
        let mut module = parse("module M; function f(x: int32): int32 { return x; }");
        let mut diagnostics = Diagnostics::new();
        crate::scope_builder::run(&mut module, &mut diagnostics, "test.pac2");
        run(&mut module, &mut diagnostics, "test.pac2");

        let decl_id = module.decl_ids().next().unwrap();
        let function = match &module.decl(decl_id).kind {
            DeclKind::Function { function } => *function,
            other => panic!("expected a function declaration, found {other:?}"),
        };
        let body = module.function(function).body.unwrap();
        let Stmt::Block { stmts, .. } = module.stmt(body).node.clone() else { panic!("expected a block body") };
        let Stmt::Return(Some(value)) = module.stmt(stmts[0]).node.clone() else { panic!("expected a return statement") };
        assert!(matches!(module.expr(value).node, Expr::Id(IdRef::Resolved(_))));
    }

    #[test]
    fn an_unresolvable_reference_is_left_unresolved_for_the_validator_to_report() {
        let mut module = parse("module M; function f(): int32 { return nonexistent; }");
        let mut diagnostics = Diagnostics::new();
        crate::scope_builder::run(&mut module, &mut diagnostics, "test.pac2");
        assert_eq!(run(&mut module, &mut diagnostics, "test.pac2"), PassOutcome::Unchanged);
    }
}
