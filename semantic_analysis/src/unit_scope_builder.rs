use crate::pass::PassOutcome;
use parser::ast::Module;
use shared_context::Diagnostics;

/// Wires each unit's item scopes into the unit's own scope and stamps
/// `owning_unit` on every per-field hook (spec §4.3). `self`, `$$`, and
/// named parameters never go through a scope lookup at all — the parser
/// already emits them as dedicated `Expression::ParserState` nodes at the
/// point of use, so there is nothing to bind here for those three cases.
pub fn run(module: &mut Module, _diagnostics: &mut Diagnostics, _file_name: &str) -> PassOutcome {
    let unit_ids: Vec<_> = module.unit_ids().collect();
    let mut changed = false;

    for unit_id in unit_ids {
        let Some(unit_scope) = module.unit(unit_id).scope else { continue };
        let item_ids = module.unit(unit_id).items.clone();

        for item_id in item_ids {
            let item = module.item(item_id).clone();

            if let Some(id) = item.id {
                let symbol = id.get_symbol();
                if module.scopes.get(unit_scope).get_child(symbol).is_none() {
                    module.scopes.get_mut(unit_scope).add_child(symbol, item.scope);
                    changed = true;
                }
            }

            for hook_id in item.hooks {
                if module.hook(hook_id).owning_unit.is_none() {
                    module.hook_mut(hook_id).owning_unit = Some(unit_id);
                    changed = true;
                }
            }
        }
    }

    PassOutcome::changed(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope_builder;
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
    fn a_named_fields_item_scope_becomes_a_child_of_the_unit_scope() {
        let mut module = parse("module M; type T = unit { x: uint32; };");
        let mut diagnostics = Diagnostics::new();
        scope_builder::run(&mut module, &mut diagnostics, "test.pac2");
        run(&mut module, &mut diagnostics, "test.pac2");

        let unit_id = module.unit_ids().next().unwrap();
        let unit_scope = module.unit(unit_id).scope.unwrap();
        let item_id = module.unit(unit_id).items[0];
        let item = module.item(item_id);
        let symbol = item.id.unwrap().get_symbol();
        assert_eq!(module.scopes.get(unit_scope).get_child(symbol), Some(item.scope));
    }

    #[test]
    fn a_per_field_hook_is_stamped_with_its_owning_unit() {
        let mut module = parse("module M; type T = unit { x: uint32 { print x; }; };");
        let mut diagnostics = Diagnostics::new();
        scope_builder::run(&mut module, &mut diagnostics, "test.pac2");
        run(&mut module, &mut diagnostics, "test.pac2");

        let unit_id = module.unit_ids().next().unwrap();
        let item_id = module.unit(unit_id).items[0];
        let hook_id = module.item(item_id).hooks[0];
        assert_eq!(module.hook(hook_id).owning_unit, Some(unit_id));
    }
}
