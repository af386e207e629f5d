use crate::error::GrammarError;
use crate::production::{Production, ProdId};
use parser::ast::{ItemId, Module, TypeExpr, UnitId, UnitItem, UnitItemKind};
use shared_context::interner::Interner;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// Derives every declared unit's productions into one shared arena (spec
/// §4.8 "Derivation rules"). `building` guards against a unit embedding
/// itself directly, which would otherwise recurse forever before the
/// left-recursion check ever runs.
pub(crate) struct Builder<'m, 'i> {
    module: &'m Module,
    interner: &'m Interner<'i>,
    pub(crate) productions: Vec<Production>,
    pub(crate) starts: BTreeMap<UnitId, ProdId>,
    building: BTreeSet<UnitId>,
}

impl<'m, 'i> Builder<'m, 'i> {
    pub(crate) fn new(module: &'m Module, interner: &'m Interner<'i>) -> Self {
        Self { module, interner, productions: Vec::new(), starts: BTreeMap::new(), building: BTreeSet::new() }
    }

    fn alloc(&mut self, p: Production) -> ProdId {
        self.productions.push(p);
        ProdId::from_index(self.productions.len() - 1)
    }

    pub(crate) fn ensure_unit(&mut self, unit_id: UnitId) -> Result<ProdId, GrammarError> {
        if let Some(&start) = self.starts.get(&unit_id) {
            return Ok(start);
        }
        if !self.building.insert(unit_id) {
            return Err(GrammarError::new(format!(
                "unit '{}' embeds itself directly",
                self.unit_label(unit_id)
            )));
        }

        let mut children = Vec::new();
        for &item_id in &self.module.unit(unit_id).items.clone() {
            children.push(self.derive_item(item_id)?);
        }

        let label = self.unit_label(unit_id);
        let seq = self.alloc(Production::Sequence { label, children });
        self.building.remove(&unit_id);
        self.starts.insert(unit_id, seq);
        Ok(seq)
    }

    fn derive_item(&mut self, item_id: ItemId) -> Result<ProdId, GrammarError> {
        let item = self.module.item(item_id).clone();
        let label = self.item_label(&item);

        match item.kind {
            UnitItemKind::AtomicType(ty) => {
                let ty = semantic_analysis::type_expr_to_type(self.module, ty);
                Ok(self.alloc(Production::Variable { label, ty }))
            }
            UnitItemKind::EmbeddedUnit(ty) => {
                let child_unit = match &self.module.ty(ty).node {
                    TypeExpr::Unit(unit_id) => *unit_id,
                    _ => return Err(GrammarError::new(format!("field '{label}' does not resolve to a unit type"))),
                };
                self.ensure_unit(child_unit)?;
                Ok(self.alloc(Production::ChildGrammar { label, unit: child_unit }))
            }
            UnitItemKind::Constant(expr) | UnitItemKind::Ctor(expr) => {
                Ok(self.alloc(Production::Literal { label, value: Some(expr) }))
            }
            UnitItemKind::Switch { expr, cases, default } => {
                let mut case_prods = Vec::with_capacity(cases.len());
                for case in cases {
                    let prod = self.derive_item(case.item)?;
                    case_prods.push((case.values, prod));
                }
                let default_prod = match default {
                    Some(d) => Some(self.derive_item(d)?),
                    None => None,
                };
                Ok(self.alloc(Production::Switch { label, expr: Some(expr), cases: case_prods, default: default_prod }))
            }
            UnitItemKind::Container { element, .. } => {
                // `more := element self | ε` (spec §4.8 "Container derivation"):
                // allocate the LookAhead node first so `more`'s Sequence can
                // refer back to it, then patch the placeholder in place.
                let la_id = self.alloc(Production::Epsilon);
                let element_prod = self.derive_item(element)?;
                let more = self.alloc(Production::Sequence {
                    label: format!("{label}.more"),
                    children: vec![element_prod, la_id],
                });
                let eps = self.alloc(Production::Epsilon);
                self.productions[la_id.index()] = Production::LookAhead { label, a: more, b: eps };
                Ok(la_id)
            }
            // Neither kind consumes wire bytes (spec §4.8 only derives the
            // `Field` variants); a zero-width production keeps them in the
            // item order without affecting any FIRST/FOLLOW set.
            UnitItemKind::GlobalHook(_) | UnitItemKind::Property { .. } | UnitItemKind::Variable(_) => {
                Ok(self.alloc(Production::Epsilon))
            }
        }
    }

    fn unit_label(&self, unit_id: UnitId) -> String {
        match self.module.unit(unit_id).id {
            Some(id) => self.interner.lookup(id.get_symbol()).to_string(),
            None => format!("unit#{}", unit_id.0),
        }
    }

    fn item_label(&self, item: &UnitItem) -> String {
        match item.id {
            Some(id) => self.interner.lookup(id.get_symbol()).to_string(),
            None => "_".to_string(),
        }
    }
}
