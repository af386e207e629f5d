use crate::pass::PassOutcome;
use parser::ast::{DeclKind, Expr, Module, Spanned, TypeExpr};
use shared_context::Diagnostics;

/// Populates lexical scopes from top-level declarations and links each
/// `type` declaration whose payload is a unit into the scope tree under its
/// own name, so `T.field` style lookups work (spec §4.2).
///
/// Re-derives scopes from scratch every sweep (idempotence, spec §8): the
/// module's root scope is cleared first, so running this pass twice in a
/// row on an unchanged AST produces byte-identical bindings. `changed` is
/// reported by comparing the rebuilt scope against a snapshot taken before
/// the clear, not by whether an insert into the (always-empty-at-that-
/// point) scope "succeeded" — every insert into a freshly cleared scope
/// succeeds, so that would report `Changed` on every sweep forever.
pub fn run(module: &mut Module, diagnostics: &mut Diagnostics, file_name: &str) -> PassOutcome {
    let root = module.root_scope;
    let before = module.scopes.get(root).clone();
    module.clear_root_scope();

    let decl_ids: Vec<_> = module.decls.clone();
    for decl_id in decl_ids {
        let decl = module.decl(decl_id).clone();

        if decl.scoped_path.is_some() {
            // Global hooks declare under a dotted path, not a bare ID
            // (spec §4.2 step 2's one exception); they are resolved
            // separately and never inserted into a scope by name.
            continue;
        }

        let symbol = decl.id.get_symbol();
        let bound_expr = match decl.kind {
            DeclKind::Variable { .. } | DeclKind::Constant { .. } => {
                module.alloc_expr(Spanned::new(decl.span, Expr::Variable(decl_id)))
            }
            DeclKind::Type { ty } => module.alloc_expr(Spanned::new(decl.span, Expr::Type(ty))),
            DeclKind::Function { .. } => module.alloc_expr(Spanned::new(decl.span, Expr::Function(decl_id))),
            DeclKind::Hook { .. } => continue,
        };

        if !module.scopes.get_mut(root).insert(symbol, bound_expr) {
            diagnostics.error(file_name, decl.span, "duplicate top-level declaration".to_string());
            continue;
        }

        if let DeclKind::Type { ty } = decl.kind {
            if let TypeExpr::Unit(unit_id) = module.ty(ty).node {
                if let Some(unit_scope) = module.unit(unit_id).scope {
                    module.scopes.get_mut(root).add_child(symbol, unit_scope);
                }
            }
        }
    }

    let root_changed = !module.scopes.get(root).matches(&before);
    let changed = root_changed || insert_function_parameters(module);
    PassOutcome::changed(changed)
}

/// Binds each function's formal parameters as `Expression::Parameter` into
/// its body's block scope (spec §4.2 step 4).
fn insert_function_parameters(module: &mut Module) -> bool {
    let function_ids: Vec<_> = module
        .decl_ids()
        .filter_map(|id| match module.decl(id).kind {
            DeclKind::Function { function } => Some(function),
            _ => None,
        })
        .collect();

    let mut changed = false;
    for function_id in function_ids {
        let (scope, params) = {
            let func = module.function(function_id);
            (func.scope, func.params.clone())
        };
        let Some(scope) = scope else { continue };
        for param_id in params {
            let param = module.param(param_id).clone();
            let symbol = param.id.get_symbol();
            let expr = module.alloc_expr(Spanned::new(param.span, Expr::Parameter(param_id)));
            changed |= module.scopes.get_mut(scope).insert(symbol, expr);
        }
    }
    changed
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
    fn a_second_top_level_declaration_reusing_a_name_is_rejected() {
        let mut module = parse("module M; global x: int32; global x: int32;");
        let mut diagnostics = Diagnostics::new();
        run(&mut module, &mut diagnostics, "test.pac2");
        assert_eq!(diagnostics.error_count(), 1);
    }

    #[test]
    fn a_type_declaration_for_a_unit_links_the_units_scope_under_its_name() {
        let mut module = parse("module M; type T = unit { x: uint32; };");
        let mut diagnostics = Diagnostics::new();
        run(&mut module, &mut diagnostics, "test.pac2");
        assert_eq!(diagnostics.error_count(), 0);

        let unit_id = module
            .unit_ids()
            .next()
            .expect("one unit declared");
        let unit_scope = module.unit(unit_id).scope.expect("unit has a scope");
        let t_symbol = module.decl(module.decl_ids().next().unwrap()).id.get_symbol();
        assert_eq!(module.scopes.get(module.root_scope).get_child(t_symbol), Some(unit_scope));
    }

    #[test]
    fn rebuilding_from_scratch_is_unchanged_on_the_second_sweep() {
        let mut module = parse("module M; global x: int32;");
        let mut diagnostics = Diagnostics::new();
        assert_eq!(run(&mut module, &mut diagnostics, "test.pac2"), PassOutcome::Changed);
        assert_eq!(run(&mut module, &mut diagnostics, "test.pac2"), PassOutcome::Unchanged);
    }
}
