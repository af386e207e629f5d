use crate::operator_resolver::{type_expr_to_type, unit_item_type};
use crate::pass::PassOutcome;
use operators::Type;
use parser::ast::{Attribute, ContainerKind, ItemId, Literal, Module, Spanned, UnitItemKind};
use shared_context::interner::Interner;
use shared_context::Diagnostics;

/// One attribute a parseable type recognizes: its key, the default value to
/// fill in when the attribute is present without one, and whether it must
/// always end up on the field even when the source never wrote it (spec
/// §4.6, grounded on the original `parseAttributes()` table).
struct SchemaEntry {
    key: &'static str,
    default: Option<Literal>,
    implicit: bool,
}

fn parseable_attributes(ty: &Type) -> Vec<SchemaEntry> {
    match ty {
        Type::Bytes => vec![
            SchemaEntry { key: "length", default: None, implicit: false },
            SchemaEntry { key: "chunked", default: Some(Literal::Bool(false)), implicit: true },
        ],
        Type::Integer { .. } => vec![SchemaEntry {
            key: "little_endian",
            default: Some(Literal::Bool(false)),
            implicit: true,
        }],
        Type::List(_) | Type::Vector(_) | Type::Set(_) => {
            vec![SchemaEntry { key: "length", default: None, implicit: false }]
        }
        _ => Vec::new(),
    }
}

/// Fills in attribute defaults and synthesizes missing implicit attributes
/// for every parseable field (spec §4.6). Container shorthand
/// canonicalization, the pass's other named responsibility, has nothing
/// left to do here: the parser already expands `list<T>` into an explicit
/// inner item at parse time (`parser::parse_unit::parse_unit_item_body`),
/// so there is never a bare inner type reference left standing by the time
/// this pass runs.
pub fn run(module: &mut Module, interner: &mut Interner, _diagnostics: &mut Diagnostics, _file_name: &str) -> PassOutcome {
    let unit_ids: Vec<_> = module.unit_ids().collect();
    let mut changed = false;

    for unit_id in unit_ids {
        let item_ids = module.unit(unit_id).items.clone();
        for item_id in item_ids {
            changed |= normalize_item(module, interner, item_id);
        }
    }

    PassOutcome::changed(changed)
}

fn normalize_item(module: &mut Module, interner: &mut Interner, item_id: ItemId) -> bool {
    let item = module.item(item_id).clone();
    let mut changed = false;

    match &item.kind {
        UnitItemKind::Container { element, .. } => changed |= normalize_item(module, interner, *element),
        UnitItemKind::Switch { cases, default, .. } => {
            for case in cases {
                changed |= normalize_item(module, interner, case.item);
            }
            if let Some(default) = default {
                changed |= normalize_item(module, interner, *default);
            }
        }
        _ => {}
    }

    if item.is_parseable_field() {
        if let Some(ty) = schema_type(module, &item) {
            changed |= apply_schema(module, interner, item_id, &ty);
        }
    }

    changed
}

fn schema_type(module: &Module, item: &parser::ast::UnitItem) -> Option<Type> {
    match &item.kind {
        UnitItemKind::AtomicType(ty) | UnitItemKind::EmbeddedUnit(ty) => Some(type_expr_to_type(module, *ty)),
        UnitItemKind::Container { kind, element } => {
            let inner = unit_item_type(module, *element);
            Some(match kind {
                ContainerKind::List => Type::List(Box::new(inner)),
                ContainerKind::Vector => Type::Vector(Box::new(inner)),
                ContainerKind::Set => Type::Set(Box::new(inner)),
            })
        }
        _ => None,
    }
}

fn apply_schema(module: &mut Module, interner: &mut Interner, item_id: ItemId, ty: &Type) -> bool {
    let schema = parseable_attributes(ty);
    if schema.is_empty() {
        return false;
    }

    let span = module.item(item_id).span;
    let mut changed = false;
    let mut seen_keys = std::collections::HashSet::new();

    for i in 0..module.item(item_id).attributes.len() {
        let key_symbol = module.item(item_id).attributes[i].key;
        let key_str = interner.lookup(key_symbol).to_string();
        seen_keys.insert(key_str.clone());

        let has_value = module.item(item_id).attributes[i].value.is_some();
        if has_value {
            continue;
        }
        let Some(entry) = schema.iter().find(|e| e.key == key_str) else { continue };
        let Some(default) = &entry.default else { continue };
        let value = module.alloc_expr(Spanned::new(span, parser::ast::Expr::Constant(default.clone())));
        module.item_mut(item_id).attributes[i].value = Some(value);
        changed = true;
    }

    for entry in &schema {
        if !entry.implicit || seen_keys.contains(entry.key) {
            continue;
        }
        let key = interner.intern(entry.key);
        let value = entry
            .default
            .as_ref()
            .map(|default| module.alloc_expr(Spanned::new(span, parser::ast::Expr::Constant(default.clone()))));
        module.item_mut(item_id).attributes.push(Attribute::implicit(key, value, span));
        changed = true;
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn a_bytes_field_gets_the_implicit_chunked_attribute() {
        let (mut module, mut interner) = parse("module M; type T = unit { x: bytes; };");
        let mut diagnostics = Diagnostics::new();
        assert_eq!(run(&mut module, &mut interner, &mut diagnostics, "test.pac2"), PassOutcome::Changed);

        let unit_id = module.unit_ids().next().unwrap();
        let item_id = module.unit(unit_id).items[0];
        let item = module.item(item_id);
        let chunked = item
            .attributes
            .iter()
            .find(|a| interner.lookup(a.key) == "chunked")
            .expect("the chunked attribute was synthesized");
        assert!(chunked.implicit);
    }

    #[test]
    fn a_unit_with_no_parseable_fields_is_left_unchanged() {
        let (mut module, mut interner) = parse("module M; type T = unit { x: any; };");
        let mut diagnostics = Diagnostics::new();
        assert_eq!(run(&mut module, &mut interner, &mut diagnostics, "test.pac2"), PassOutcome::Unchanged);
    }
}
