use crate::pass::PassOutcome;
use operators::OperatorKind;
use parser::ast::{DeclKind, Expr, IdRef, Module};
use shared_context::Diagnostics;

/// Checks call arity against the callee's declared parameter list (spec's
/// "overload resolution" row). This AST never carries more than one
/// declaration per name — `scope_builder` rejects a second top-level
/// declaration that reuses an existing name outright — so there is never a
/// candidate set to choose among; what would otherwise be "pick the
/// matching overload" degrades to "confirm the one candidate fits". No AST
/// node is rewritten here, only diagnosed.
pub fn run(module: &Module, diagnostics: &mut Diagnostics, file_name: &str) -> PassOutcome {
    for expr_id in module.expr_ids() {
        let Expr::UnresolvedOperator { kind: OperatorKind::Call, operands } = &module.expr(expr_id).node else {
            continue;
        };
        let Some(&callee) = operands.first() else { continue };
        let Expr::Id(IdRef::Resolved(target)) = &module.expr(callee).node else {
            continue;
        };
        let Expr::Function(decl_id) = &module.expr(*target).node else {
            continue;
        };
        let DeclKind::Function { function } = &module.decl(*decl_id).kind else {
            continue;
        };

        let expected = module.function(*function).params.len();
        let given = operands.len() - 1;
        if expected != given {
            let span = module.expr(expr_id).span;
            diagnostics.error(
                file_name,
                span,
                format!("function expects {expected} argument(s), found {given}"),
            );
        }
    }

    PassOutcome::Unchanged
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
    fn a_call_with_the_wrong_argument_count_is_reported() {
        let mut module = parse("module M; function f(x: int32): int32 { return x; } global c: int32 = f(1, 2);");
        let mut diagnostics = Diagnostics::new();
        crate::scope_builder::run(&mut module, &mut diagnostics, "test.pac2");
        crate::id_resolver::run(&mut module, &mut diagnostics, "test.pac2");
        diagnostics.clear();

        run(&module, &mut diagnostics, "test.pac2");
        assert_eq!(diagnostics.error_count(), 1);
        assert!(diagnostics.iter().next().unwrap().message.contains("argument"));
    }

    #[test]
    fn a_call_with_the_right_argument_count_is_accepted() {
        let mut module = parse("module M; function f(x: int32): int32 { return x; } global c: int32 = f(1);");
        let mut diagnostics = Diagnostics::new();
        crate::scope_builder::run(&mut module, &mut diagnostics, "test.pac2");
        crate::id_resolver::run(&mut module, &mut diagnostics, "test.pac2");
        diagnostics.clear();

        run(&module, &mut diagnostics, "test.pac2");
        assert_eq!(diagnostics.error_count(), 0);
    }
}
