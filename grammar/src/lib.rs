//! LL(1) grammar derivation from a resolved module (spec §4.8).
//!
//! A [`Grammar`] holds every declared unit's productions in one shared
//! arena, keyed by [`ProdId`], with a `starts` table mapping each
//! [`UnitId`] to its own entry point. `ChildGrammar` productions refer
//! directly to another unit's start in this same arena, so FIRST/FOLLOW
//! and left-recursion detection are one fixed point over one graph —
//! no cross-unit terminal translation is needed.

mod builder;
mod error;
mod print;
mod production;
mod sets;

pub use error::GrammarError;
pub use production::{Production, ProdId, Terminal};

use builder::Builder;
use parser::ast::{Module, UnitId};
use shared_context::interner::Interner;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

pub struct Grammar {
    productions: Vec<Production>,
    starts: BTreeMap<UnitId, ProdId>,
    nullable: BTreeSet<ProdId>,
    first: BTreeMap<ProdId, BTreeSet<Terminal>>,
    follow: BTreeMap<ProdId, BTreeSet<Terminal>>,
}

impl Grammar {
    /// Derives every unit declared in `module` and computes its LL(1)
    /// tables. Errors are returned per offending unit rather than failing
    /// the whole build (spec §4.8 "Failure semantics" / §7): a unit with
    /// an ambiguity or a left recursion simply has no usable grammar, but
    /// every other unit's tables are still valid.
    pub fn build(module: &Module, interner: &Interner) -> (Grammar, Vec<(UnitId, GrammarError)>) {
        let mut builder = Builder::new(module, interner);
        let mut errors = Vec::new();

        for unit_id in module.unit_ids() {
            if builder.starts.contains_key(&unit_id) {
                continue;
            }
            if let Err(e) = builder.ensure_unit(unit_id) {
                errors.push((unit_id, e));
            }
        }

        let nullable = sets::nullable_set(&builder.productions, &builder.starts);
        let first = sets::first_sets(&builder.productions, &builder.starts, &nullable);
        let follow = sets::follow_sets(&builder.productions, &builder.starts, &nullable, &first);
        let lookahead = sets::lookahead_sets(&builder.productions, &nullable, &first, &follow);

        for (&unit_id, &start) in &builder.starts {
            let scope = sets::reachable(start, &builder.productions);
            let mut messages = sets::check_ambiguity_within(&builder.productions, &lookahead, &scope);
            messages.extend(sets::detect_left_recursion(start, &builder.productions, &builder.starts, &nullable));

            if let Some(first_message) = messages.first().cloned() {
                let mut err = GrammarError::new(first_message);
                for m in messages.into_iter().skip(1) {
                    err.push(m);
                }
                errors.push((unit_id, err));
            }
        }

        let grammar = Grammar { productions: builder.productions, starts: builder.starts, nullable, first, follow };
        (grammar, errors)
    }

    /// Builds a `Grammar` directly from a hand-assembled production list,
    /// bypassing unit derivation — for exercising the LL(1) engine itself
    /// against grammars with no natural BinPAC++ source form (spec §8's
    /// abstract ambiguous/left-recursive scenarios).
    pub fn from_productions(productions: Vec<Production>, start: ProdId) -> (Grammar, Vec<GrammarError>) {
        let mut starts = BTreeMap::new();
        starts.insert(UnitId(0), start);

        let nullable = sets::nullable_set(&productions, &starts);
        let first = sets::first_sets(&productions, &starts, &nullable);
        let follow = sets::follow_sets(&productions, &starts, &nullable, &first);
        let lookahead = sets::lookahead_sets(&productions, &nullable, &first, &follow);

        let scope = sets::reachable(start, &productions);
        let mut messages = sets::check_ambiguity_within(&productions, &lookahead, &scope);
        messages.extend(sets::detect_left_recursion(start, &productions, &starts, &nullable));
        let errors = messages.into_iter().map(GrammarError::new).collect();

        (Grammar { productions, starts, nullable, first, follow }, errors)
    }

    pub fn start_of(&self, unit_id: UnitId) -> Option<ProdId> {
        self.starts.get(&unit_id).copied()
    }

    pub fn units(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.starts.keys().copied()
    }

    pub fn production(&self, id: ProdId) -> &Production {
        &self.productions[id.index()]
    }

    pub fn is_nullable(&self, id: ProdId) -> bool {
        self.nullable.contains(&id)
    }

    pub fn first(&self, id: ProdId) -> BTreeSet<Terminal> {
        self.first.get(&id).cloned().unwrap_or_default()
    }

    pub fn follow(&self, id: ProdId) -> BTreeSet<Terminal> {
        self.follow.get(&id).cloned().unwrap_or_default()
    }

    /// Stable text dump of every table (spec §6 "Grammar table dump") —
    /// one line per production, then FIRST/FOLLOW per production, then the
    /// errors collected for that unit.
    pub fn print_tables(
        &self,
        errors: &[(UnitId, GrammarError)],
        out: &mut impl std::fmt::Write,
        verbose: bool,
    ) -> std::fmt::Result {
        print::print_tables(self, errors, out, verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parser::ast::DeclKind;
    use shared_context::source_map::SourceMap;
    use std::path::PathBuf;

    fn parse(src: &'static str) -> (Module, Interner<'static>) {
        let arena: &'static shared_context::Bump = Box::leak(Box::new(shared_context::Bump::new()));
        let mut interner = Interner::new(arena);
        let source_map = SourceMap::new("test.pac2", src);
        let lexer = lexer::Lexer::new(src);
        let mut module = parser::parse(lexer, &mut interner, &source_map, PathBuf::from("test.pac2")).unwrap();
        let mut diagnostics = shared_context::Diagnostics::new();
        semantic_analysis::finalize(&mut module, &mut interner, &mut diagnostics, "test.pac2").unwrap();
        (module, interner)
    }

    fn only_unit(module: &Module) -> UnitId {
        for decl_id in module.decl_ids() {
            let ty = match &module.decl(decl_id).kind {
                DeclKind::Type { ty } => *ty,
                _ => continue,
            };
            if let parser::ast::TypeExpr::Unit(unit_id) = &module.ty(ty).node {
                return *unit_id;
            }
        }
        panic!("no unit declaration found");
    }

    #[test]
    fn a_three_field_unit_derives_a_sequence_of_three_variables() {
        let (module, interner) = parse("module M; type T = unit { a: uint8; b: uint16; c: uint32; };");
        let unit_id = only_unit(&module);
        let (grammar, errors) = Grammar::build(&module, &interner);
        assert!(errors.is_empty());

        let start = grammar.start_of(unit_id).unwrap();
        let Production::Sequence { children, .. } = grammar.production(start) else {
            panic!("expected the unit's start production to be a sequence")
        };
        assert_eq!(children.len(), 3);
        for &child in children {
            assert!(matches!(grammar.production(child), Production::Variable { .. }));
        }
    }

    #[test]
    fn an_embedded_unit_field_becomes_a_child_grammar_node() {
        let (module, interner) =
            parse("module M; type Inner = unit { x: uint8; }; type Outer = unit { i: Inner; };");
        let outer = module
            .unit_ids()
            .find(|&id| {
                module
                    .unit(id)
                    .items
                    .iter()
                    .any(|&item| matches!(module.item(item).kind, parser::ast::UnitItemKind::EmbeddedUnit(_)))
            })
            .expect("expected to find the outer unit");
        let (grammar, errors) = Grammar::build(&module, &interner);
        assert!(errors.is_empty());

        let start = grammar.start_of(outer).unwrap();
        let Production::Sequence { children, .. } = grammar.production(start) else {
            panic!("expected a sequence")
        };
        assert!(matches!(grammar.production(children[0]), Production::ChildGrammar { .. }));
    }

    #[test]
    fn a_unit_that_embeds_itself_directly_is_reported_as_a_grammar_error() {
        let (module, interner) = parse("module M; type T = unit { r: T; };");
        let (_, errors) = Grammar::build(&module, &interner);
        assert_eq!(errors.len(), 1);
    }
}
