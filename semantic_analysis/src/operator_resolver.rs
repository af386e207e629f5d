use crate::pass::PassOutcome;
use operators::{OperatorRegistry, Resolution, Type};
use parser::ast::{DeclKind, Expr, ExprId, IdRef, Literal, Module, ParserStateKind, TypeExpr, TypeId, UnitItemKind};
use shared_context::{Diagnostic, Diagnostics, Severity, Span};

const MAX_INNER_SWEEPS: u32 = 16;

/// Resolves every `Expression::UnresolvedOperator` node against the global
/// registry, wrapping mismatched operands in `Coerced` (spec §4.5). Runs
/// its own inner fixed point: resolving an outer operator needs its
/// operands' types, which for a nested unresolved operator only become
/// known once that inner node resolves, so one call here sweeps the whole
/// module repeatedly until nothing changes or the cap is hit.
///
/// A node stuck at `NoCandidate` or `Ambiguous` reports neither kind of
/// change nor any diagnostic here — this pass only mutates, it never
/// reports (spec §4.7's validator owns diagnostics, and runs exactly once,
/// so it can tell the two outcomes apart without re-reporting them on
/// every one of this pass's inner sweeps or every outer fixed-point pass).
pub fn run(module: &mut Module, diagnostics: &mut Diagnostics, file_name: &str) -> PassOutcome {
    let mut any_changed = false;
    for sweep in 0..MAX_INNER_SWEEPS {
        let mut changed = false;
        for expr_id in module.expr_ids() {
            changed |= resolve_one(module, expr_id);
        }
        any_changed |= changed;
        if !changed {
            return PassOutcome::changed(any_changed);
        }
        let _ = sweep;
    }

    diagnostics.push(Diagnostic::new(
        Severity::Internal,
        file_name,
        Span::new(0, 0, 0),
        format!("operator resolution did not converge within {MAX_INNER_SWEEPS} sweeps"),
    ));
    PassOutcome::Failed
}

fn resolve_one(module: &mut Module, expr_id: ExprId) -> bool {
    let (kind, operands) = match &module.expr(expr_id).node {
        Expr::UnresolvedOperator { kind, operands } => (*kind, operands.clone()),
        _ => return false,
    };

    let operand_types: Vec<Type> = operands.iter().map(|&id| expr_type(module, id)).collect();
    if operand_types.iter().any(Type::is_unknown) {
        return false;
    }

    match OperatorRegistry::global().resolve(kind, &operand_types) {
        Resolution::Resolved { signature, coerced } => {
            let span = module.expr(expr_id).span;
            let mut final_operands = Vec::with_capacity(operands.len());
            for ((operand, needs_coercion), target) in operands.iter().zip(coerced).zip(&signature.operands) {
                if needs_coercion {
                    let coerced_id = module.alloc_expr(parser::ast::Spanned::new(
                        span,
                        Expr::Coerced { inner: *operand, target: target.clone() },
                    ));
                    final_operands.push(coerced_id);
                } else {
                    final_operands.push(*operand);
                }
            }
            module.expr_mut(expr_id).node = Expr::ResolvedOperator {
                kind,
                operands: final_operands,
                result: signature.result,
            };
            true
        }
        Resolution::NoCandidate | Resolution::Ambiguous(_) => false,
    }
}

/// Computes the static type of an already-built expression node, recursing
/// through resolved references. Returns `Type::Unknown` for anything this
/// pass can't yet type — a nested unresolved operator, most notably —
/// which `resolve_one` treats as "not ready this sweep".
pub fn expr_type(module: &Module, expr_id: ExprId) -> Type {
    match &module.expr(expr_id).node {
        Expr::Constant(literal) => literal_type(literal),
        Expr::Ctor(kind) => ctor_type(module, kind),
        Expr::List(items) => {
            let element = items.first().map(|&id| expr_type(module, id)).unwrap_or(Type::Any);
            Type::List(Box::new(element))
        }
        Expr::Id(IdRef::Resolved(target)) => expr_type(module, *target),
        Expr::Id(IdRef::Unresolved(_)) => Type::Unknown,
        Expr::Coerced { target, .. } => target.clone(),
        Expr::Function(decl_id) => {
            let DeclKind::Function { function } = module.decl(*decl_id).kind else { return Type::Unknown };
            let func = module.function(function);
            Type::Function {
                params: func.params.iter().map(|&p| type_expr_to_type(module, module.param(p).ty)).collect(),
                result: Box::new(type_expr_to_type(module, func.result)),
            }
        }
        Expr::Module(_) => Type::Any,
        Expr::Parameter(param_id) => type_expr_to_type(module, module.param(*param_id).ty),
        Expr::Variable(decl_id) => match &module.decl(*decl_id).kind {
            DeclKind::Variable { ty, .. } | DeclKind::Constant { ty, .. } => type_expr_to_type(module, *ty),
            _ => Type::Unknown,
        },
        Expr::Type(_) => Type::Any,
        Expr::ParserState(ParserStateKind::Parameter(param_id)) => type_expr_to_type(module, module.param(*param_id).ty),
        Expr::ParserState(_) => Type::Any,
        Expr::LoopVariable => Type::Any,
        Expr::UnresolvedOperator { .. } => Type::Unknown,
        Expr::ResolvedOperator { result, .. } => result.clone(),
    }
}

fn literal_type(literal: &Literal) -> Type {
    match literal {
        Literal::Bool(_) => Type::Bool,
        Literal::Integer(_, ty) => ty.clone(),
        Literal::Double(_) => Type::Double,
        Literal::Str(_) => Type::String,
        Literal::Bytes(_) => Type::Bytes,
    }
}

fn ctor_type(module: &Module, kind: &parser::ast::CtorKind) -> Type {
    use parser::ast::CtorKind;
    match kind {
        CtorKind::List(items) => Type::List(Box::new(first_type(module, items))),
        CtorKind::Vector(items) => Type::Vector(Box::new(first_type(module, items))),
        CtorKind::Set(items) => Type::Set(Box::new(first_type(module, items))),
        CtorKind::Map(pairs) => {
            let key = pairs.first().map(|(k, _)| expr_type(module, *k)).unwrap_or(Type::Any);
            let value = pairs.first().map(|(_, v)| expr_type(module, *v)).unwrap_or(Type::Any);
            Type::Map(Box::new(key), Box::new(value))
        }
        CtorKind::RegExp(_) => Type::RegExp,
        CtorKind::Bytes(_) => Type::Bytes,
    }
}

fn first_type(module: &Module, items: &[ExprId]) -> Type {
    items.first().map(|&id| expr_type(module, id)).unwrap_or(Type::Any)
}

/// Lowers an AST-level `TypeExpr` into the flat `operators::Type` shape
/// operator resolution works over (spec §3: the AST keeps a unit's full
/// declaration, the operator lattice only needs its structural shape).
pub fn type_expr_to_type(module: &Module, ty_id: TypeId) -> Type {
    match &module.ty(ty_id).node {
        TypeExpr::Scalar(ty) => ty.clone(),
        TypeExpr::Unit(unit_id) => {
            let unit = module.unit(*unit_id);
            let params = unit.params.iter().map(|&p| type_expr_to_type(module, module.param(p).ty)).collect();
            let items = unit.items.iter().map(|&item| unit_item_type(module, item)).collect();
            Type::Unit { params, items }
        }
        TypeExpr::List(inner) => Type::List(Box::new(type_expr_to_type(module, *inner))),
        TypeExpr::Vector(inner) => Type::Vector(Box::new(type_expr_to_type(module, *inner))),
        TypeExpr::Set(inner) => Type::Set(Box::new(type_expr_to_type(module, *inner))),
        TypeExpr::Iterator(inner) => Type::Iterator(Box::new(type_expr_to_type(module, *inner))),
        TypeExpr::OptionalArgument(inner) => Type::OptionalArgument(Box::new(type_expr_to_type(module, *inner))),
        TypeExpr::Map(key, value) => Type::Map(
            Box::new(type_expr_to_type(module, *key)),
            Box::new(type_expr_to_type(module, *value)),
        ),
        TypeExpr::Function { params, result } => Type::Function {
            params: params.iter().map(|&p| type_expr_to_type(module, p)).collect(),
            result: Box::new(type_expr_to_type(module, *result)),
        },
        TypeExpr::TypeByName(_) | TypeExpr::UnknownElementType => Type::Unknown,
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
    fn adding_two_integer_literals_resolves_to_the_integer_addition_operator() {
        let mut module = parse("module M; const c = 1 + 2;");
        let mut diagnostics = Diagnostics::new();
        let decl_id = module.decl_ids().next().unwrap();
        let value = match &module.decl(decl_id).kind {
            DeclKind::Constant { value, .. } => *value,
            other => panic!("expected a constant declaration, found {other:?}"),
        };

        assert_eq!(run(&mut module, &mut diagnostics, "test.pac2"), PassOutcome::Changed);
        match &module.expr(value).node {
            Expr::ResolvedOperator { result, .. } => assert_eq!(*result, Type::Integer { width: 64, signed: true }),
            other => panic!("expected a resolved operator, found {other:?}"),
        }
        assert_eq!(diagnostics.error_count(), 0);
    }

    #[test]
    fn an_expression_with_no_operator_nodes_leaves_the_pass_unchanged() {
        let mut module = parse("module M; const c = 1;");
        let mut diagnostics = Diagnostics::new();
        assert_eq!(run(&mut module, &mut diagnostics, "test.pac2"), PassOutcome::Unchanged);
    }
}

pub fn unit_item_type(module: &Module, item_id: parser::ast::ItemId) -> Type {
    match &module.item(item_id).kind {
        UnitItemKind::AtomicType(ty) | UnitItemKind::EmbeddedUnit(ty) | UnitItemKind::Variable(ty) => {
            type_expr_to_type(module, *ty)
        }
        UnitItemKind::Constant(expr) | UnitItemKind::Ctor(expr) => expr_type(module, *expr),
        UnitItemKind::Switch { .. } => Type::Any,
        UnitItemKind::Container { element, .. } => unit_item_type(module, *element),
        UnitItemKind::GlobalHook(_) | UnitItemKind::Property { .. } => Type::Void,
    }
}
