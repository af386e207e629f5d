use parser::ast::{ExprId, UnitId};

/// Index into a [`crate::Grammar`]'s shared production arena (spec §4.8
/// "each production has a unique symbol"; Design Notes §9 arena-of-indices).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProdId(pub u32);

impl ProdId {
    pub(crate) fn from_index(i: usize) -> Self {
        ProdId(i as u32)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// One FIRST/FOLLOW set element. `Node` names the production that produces
/// this terminal, per spec §4.8's "treating each variable/literal occurrence
/// as its own terminal category" — there is no separate terminal alphabet to
/// maintain, the arena index already uniquely identifies the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Terminal {
    EndOfInput,
    Node(ProdId),
}

/// One production variant (spec §4.8 "Production variants"). `label` is a
/// debug-only name used by [`crate::Grammar::print_tables`]; it plays no
/// role in FIRST/FOLLOW identity, which is by `ProdId` alone.
#[derive(Debug, Clone)]
pub enum Production {
    Epsilon,
    /// Matches a fixed constant. `value` points back at the `Field::Constant`
    /// / `Field::Ctor` expression that supplied it, when derived from a real
    /// unit; synthetic grammars built directly through
    /// [`crate::Grammar::from_productions`] for testing the LL(1) engine
    /// leave it `None`.
    Literal { label: String, value: Option<ExprId> },
    /// Matches a value of the given atomic parseable type.
    Variable { label: String, ty: operators::Type },
    /// Concatenation.
    Sequence { label: String, children: Vec<ProdId> },
    /// Alternation resolved by one-token lookahead.
    LookAhead { label: String, a: ProdId, b: ProdId },
    /// Alternation resolved by evaluating a unit expression.
    Switch {
        label: String,
        expr: Option<ExprId>,
        cases: Vec<(Vec<ExprId>, ProdId)>,
        default: Option<ProdId>,
    },
    /// Embedded sub-unit, expanded transparently into the owner's lookahead
    /// computation (spec §4.8) because `unit`'s own start production lives
    /// in this same shared arena — no cross-arena terminal translation
    /// is needed.
    ChildGrammar { label: String, unit: UnitId },
}

impl Production {
    pub fn label(&self) -> &str {
        match self {
            Production::Epsilon => "ε",
            Production::Literal { label, .. }
            | Production::Variable { label, .. }
            | Production::Sequence { label, .. }
            | Production::LookAhead { label, .. }
            | Production::Switch { label, .. }
            | Production::ChildGrammar { label, .. } => label,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Production::Epsilon => "Epsilon",
            Production::Literal { .. } => "Literal",
            Production::Variable { .. } => "Variable",
            Production::Sequence { .. } => "Sequence",
            Production::LookAhead { .. } => "LookAhead",
            Production::Switch { .. } => "Switch",
            Production::ChildGrammar { .. } => "ChildGrammar",
        }
    }

    /// Direct children this production's derivation depends on, in
    /// derivation order (used by FIRST/FOLLOW propagation and by the
    /// left-recursion walk).
    pub fn children(&self) -> Vec<ProdId> {
        match self {
            Production::Epsilon | Production::Literal { .. } | Production::Variable { .. } => Vec::new(),
            Production::Sequence { children, .. } => children.clone(),
            Production::LookAhead { a, b, .. } => vec![*a, *b],
            Production::Switch { cases, default, .. } => {
                let mut out: Vec<ProdId> = cases.iter().map(|(_, p)| *p).collect();
                out.extend(default.iter().copied());
                out
            }
            Production::ChildGrammar { .. } => Vec::new(),
        }
    }
}
