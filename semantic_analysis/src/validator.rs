use crate::operator_resolver::{expr_type, type_expr_to_type, unit_item_type};
use crate::pass::PassOutcome;
use operators::{OperatorRegistry, Resolution, Type};
use parser::ast::{DeclKind, Expr, IdRef, ItemId, Module, Stmt, StmtId, UnitId, UnitItemKind};
use shared_context::interner::Interner;
use shared_context::Diagnostics;

/// A single sweep of checks over the resolved AST (spec §4.7). Unlike the
/// other passes this one never mutates anything — it only reports — so it
/// always returns `Unchanged`; the finalizer places it after the passes
/// whose fixed point it depends on having settled.
pub fn run(module: &Module, interner: &Interner, diagnostics: &mut Diagnostics, file_name: &str) -> PassOutcome {
    check_unresolved_ids(module, diagnostics, file_name);
    check_unresolved_operators(module, diagnostics, file_name);

    for unit_id in module.unit_ids() {
        check_duplicate_field_names(module, interner, unit_id, diagnostics, file_name);
        for item_id in module.unit(unit_id).items.clone() {
            check_item(module, interner, item_id, diagnostics, file_name);
        }
    }

    let decl_ids: Vec<_> = module.decls.clone();
    for decl_id in decl_ids {
        let decl = module.decl(decl_id);
        match decl.kind {
            DeclKind::Function { function } => {
                let func = module.function(function);
                for &param_id in &func.params {
                    check_parameter_type(module, module.param(param_id).ty, diagnostics, file_name, module.param(param_id).span);
                }
                check_return_type(module, func.result, diagnostics, file_name, decl.span);
                if let Some(body) = func.body {
                    check_returns(module, body, &type_expr_to_type(module, func.result), diagnostics, file_name);
                }
            }
            DeclKind::Variable { ty, .. } => {
                if matches!(type_expr_to_type(module, ty), Type::Void) {
                    diagnostics.error(file_name, decl.span, "a variable cannot have type void");
                }
            }
            _ => {}
        }
    }

    PassOutcome::Unchanged
}

fn check_unresolved_ids(module: &Module, diagnostics: &mut Diagnostics, file_name: &str) {
    for expr_id in module.expr_ids() {
        let spanned = module.expr(expr_id);
        if let Expr::Id(IdRef::Unresolved(path)) = &spanned.node {
            let rendered = format!("{} component name(s)", path.len());
            diagnostics.error(file_name, spanned.span, format!("unresolved identifier ({rendered})"));
        }
    }
}

/// A node left as `UnresolvedOperator` once `operator_resolver` has settled
/// failed to resolve for one of two distinct reasons (spec §4.5 step 5):
/// no candidate matched at all, or more than one did. `operator_resolver`
/// itself never reports either — it only mutates, and runs once per outer
/// fixed-point sweep, so reporting there would duplicate the diagnostic
/// once per sweep. This pass runs exactly once, so it re-resolves each
/// leftover node's operands against the registry itself to tell the two
/// apart before reporting.
fn check_unresolved_operators(module: &Module, diagnostics: &mut Diagnostics, file_name: &str) {
    for expr_id in module.expr_ids() {
        let spanned = module.expr(expr_id);
        let Expr::UnresolvedOperator { kind, operands } = &spanned.node else { continue };

        let operand_types: Vec<Type> = operands.iter().map(|&id| expr_type(module, id)).collect();
        if operand_types.iter().any(Type::is_unknown) {
            diagnostics.error(
                file_name,
                spanned.span,
                format!("no matching operator for {kind:?} with {} operand(s)", operands.len()),
            );
            continue;
        }

        match OperatorRegistry::global().resolve(*kind, &operand_types) {
            Resolution::Resolved { .. } => {}
            Resolution::NoCandidate => {
                diagnostics.error(
                    file_name,
                    spanned.span,
                    format!("no matching operator for {kind:?} with {} operand(s)", operands.len()),
                );
            }
            Resolution::Ambiguous(candidates) => {
                let rendered: Vec<String> = candidates.iter().map(|sig| format!("{sig:?}")).collect();
                diagnostics.error(
                    file_name,
                    spanned.span,
                    format!("ambiguous operator {kind:?}: {} candidates match ({})", rendered.len(), rendered.join(", ")),
                );
            }
        }
    }
}

fn check_duplicate_field_names(module: &Module, interner: &Interner, unit_id: UnitId, diagnostics: &mut Diagnostics, file_name: &str) {
    let mut seen = std::collections::HashSet::new();
    for &item_id in &module.unit(unit_id).items {
        let item = module.item(item_id);
        let Some(id) = item.id else { continue };
        let name = interner.lookup(id.get_symbol());
        if !seen.insert(name) {
            diagnostics.error(file_name, item.span, format!("duplicate field name '{name}'"));
        }
    }
}

fn check_item(module: &Module, interner: &Interner, item_id: ItemId, diagnostics: &mut Diagnostics, file_name: &str) {
    let item = module.item(item_id);
    let span = item.span;

    match &item.kind {
        UnitItemKind::Switch { cases, default, .. } => {
            if default.is_none() && cases.is_empty() {
                diagnostics.error(file_name, span, "switch has no cases and no default");
            }
            for case in cases.clone() {
                check_item(module, interner, case.item, diagnostics, file_name);
            }
            if let Some(default) = default {
                check_item(module, interner, *default, diagnostics, file_name);
            }
        }
        UnitItemKind::Container { element, .. } => {
            check_item(module, interner, *element, diagnostics, file_name);
        }
        UnitItemKind::AtomicType(ty) => {
            let resolved = type_expr_to_type(module, *ty);
            check_label_uniqueness(&resolved, diagnostics, file_name, span);
        }
        UnitItemKind::Ctor(expr_id) => {
            if let Expr::Ctor(parser::ast::CtorKind::RegExp(symbol)) = &module.expr(*expr_id).node {
                let pattern = interner.lookup(*symbol);
                if let Err(reason) = check_regexp_syntax(pattern) {
                    diagnostics.error(file_name, span, format!("invalid regular expression '{pattern}': {reason}"));
                }
            }
        }
        _ => {}
    }

    for hook_id in &item.hooks {
        let hook = module.hook(*hook_id);
        let expected = unit_item_type(module, item_id);
        if hook.foreach {
            let Some(element) = expected.element_type() else {
                diagnostics.error(file_name, hook.span, "a 'foreach' hook can only attach to a container field");
                continue;
            };
            let _ = element;
        }
    }
}

fn check_label_uniqueness(ty: &Type, diagnostics: &mut Diagnostics, file_name: &str, span: shared_context::Span) {
    let labels = match ty {
        Type::Enum(labels) | Type::Bitset(labels) => labels,
        _ => return,
    };
    let mut seen = std::collections::HashSet::new();
    for label in labels {
        if !seen.insert(label) {
            diagnostics.error(file_name, span, "duplicate enum/bitset label");
        }
    }
}

/// Balanced-delimiter check in place of compiling the pattern: this crate
/// carries no regex engine, so this is the syntactic floor a real compile
/// would also reject on.
fn check_regexp_syntax(pattern: &str) -> Result<(), &'static str> {
    let mut depth = 0i32;
    for ch in pattern.chars() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err("unbalanced ')'");
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err("unbalanced '('");
    }
    Ok(())
}

fn check_parameter_type(module: &Module, ty_id: parser::ast::TypeId, diagnostics: &mut Diagnostics, file_name: &str, span: shared_context::Span) {
    if matches!(type_expr_to_type(module, ty_id), Type::Void) {
        diagnostics.error(file_name, span, "a function parameter cannot have type void");
    }
}

fn check_return_type(module: &Module, ty_id: parser::ast::TypeId, diagnostics: &mut Diagnostics, file_name: &str, span: shared_context::Span) {
    if matches!(type_expr_to_type(module, ty_id), Type::Unknown) {
        diagnostics.error(file_name, span, "function return type did not resolve");
    }
}

fn check_returns(module: &Module, stmt_id: StmtId, expected: &Type, diagnostics: &mut Diagnostics, file_name: &str) {
    let spanned = module.stmt(stmt_id);
    match &spanned.node {
        Stmt::Block { stmts, .. } => {
            for s in stmts.clone() {
                check_returns(module, s, expected, diagnostics, file_name);
            }
        }
        Stmt::IfElse { then_branch, else_branch, .. } => {
            check_returns(module, *then_branch, expected, diagnostics, file_name);
            if let Some(else_branch) = else_branch {
                check_returns(module, *else_branch, expected, diagnostics, file_name);
            }
        }
        Stmt::ForEach { body, .. } => check_returns(module, *body, expected, diagnostics, file_name),
        Stmt::TryCatch { body, catches } => {
            check_returns(module, *body, expected, diagnostics, file_name);
            for catch in catches {
                check_returns(module, catch.body, expected, diagnostics, file_name);
            }
        }
        Stmt::Return(Some(value)) => {
            let actual = crate::operator_resolver::expr_type(module, *value);
            if !actual.is_unknown() && !expected.is_unknown() && !OperatorRegistryCompat::compatible(&actual, expected) {
                diagnostics.error(
                    file_name,
                    spanned.span,
                    format!("return type mismatch: found {actual:?}, expected {expected:?}"),
                );
            }
        }
        Stmt::Return(None) => {
            if !matches!(expected, Type::Void) {
                diagnostics.error(file_name, spanned.span, format!("missing return value, expected {expected:?}"));
            }
        }
        _ => {}
    }
}

/// Thin wrapper so the validator can ask "does `have` satisfy `want`"
/// without duplicating the operator registry's coercion table.
struct OperatorRegistryCompat;

impl OperatorRegistryCompat {
    fn compatible(have: &Type, want: &Type) -> bool {
        operators::OperatorRegistry::global().can_coerce(have, want)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_context::interner::Interner;
    use shared_context::source_map::SourceMap;
    use std::path::PathBuf;

    fn parse(src: &'static str) -> (Module, Interner<'static>) {
        let arena: &'static shared_context::Bump = Box::leak(Box::new(shared_context::Bump::new()));
        let mut interner = Interner::new(arena);
        let source_map = SourceMap::new("test.pac2", src);
        let lexer = lexer::Lexer::new(src);
        let module = parser::parse(lexer, &mut interner, &source_map, PathBuf::from("test.pac2")).unwrap();
        (module, interner)
    }

    #[test]
    fn a_duplicate_field_name_within_a_unit_is_reported_once() {
        let (module, interner) = parse("module M; type T = unit { x: uint32; x: uint16; };");
        let mut diagnostics = Diagnostics::new();
        run(&module, &interner, &mut diagnostics, "test.pac2");
        assert_eq!(diagnostics.iter().filter(|d| d.message.contains("duplicate field")).count(), 1);
    }

    #[test]
    fn distinct_field_names_produce_no_duplicate_diagnostic() {
        let (module, interner) = parse("module M; type T = unit { x: uint32; y: uint16; };");
        let mut diagnostics = Diagnostics::new();
        run(&module, &interner, &mut diagnostics, "test.pac2");
        assert!(diagnostics.iter().all(|d| !d.message.contains("duplicate field")));
    }

    #[test]
    fn an_operator_with_no_matching_candidate_is_reported_as_no_matching_operator() {
        let (mut module, interner) = parse(r#"module M; const c = "a" + 1;"#);
        let mut diagnostics = Diagnostics::new();
        crate::operator_resolver::run(&mut module, &mut diagnostics, "test.pac2");
        diagnostics.clear();
        run(&module, &interner, &mut diagnostics, "test.pac2");
        assert_eq!(diagnostics.iter().filter(|d| d.message.contains("no matching operator")).count(), 1);
        assert!(diagnostics.iter().all(|d| !d.message.contains("ambiguous operator")));
    }
}
