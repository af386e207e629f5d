use crate::ast::attribute::Attribute;
use crate::ast::{ExprId, HookId, ParamId, ScopeId, TypeId};
use shared_context::interner::Symbol;
use shared_context::{Identifier, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    List,
    Vector,
    Set,
}

#[derive(Debug, Clone)]
pub struct SwitchCase {
    pub values: Vec<ExprId>,
    pub item: ItemId,
}

/// One unit item kind (spec §3 "Unit item" / §4.8 "Production variants"
/// derivation source). `Field` in the spec refines into the first six
/// variants below; `GlobalHook`, `Property`, and `Variable` are the other
/// top-level item kinds a unit body can contain.
#[derive(Debug, Clone)]
pub enum UnitItemKind {
    AtomicType(TypeId),
    EmbeddedUnit(TypeId),
    Constant(ExprId),
    Ctor(ExprId),
    Switch {
        expr: ExprId,
        cases: Vec<SwitchCase>,
        default: Option<ItemId>,
    },
    Container {
        kind: ContainerKind,
        element: ItemId,
    },
    GlobalHook(HookId),
    Property {
        key: Symbol,
        value: Option<ExprId>,
    },
    Variable(TypeId),
}

/// A single named element of a unit (spec Glossary "Field" / "Unit item").
#[derive(Debug, Clone)]
pub struct UnitItem {
    pub id: Option<Identifier>,
    pub kind: UnitItemKind,
    pub attributes: Vec<Attribute>,
    pub hooks: Vec<HookId>,
    pub scope: ScopeId,
    pub span: Span,
}

impl UnitItem {
    /// Whether this item's type publishes a parse-attribute schema and is
    /// therefore subject to normalizer attribute defaulting (spec §4.6).
    pub fn is_parseable_field(&self) -> bool {
        matches!(
            self.kind,
            UnitItemKind::AtomicType(_) | UnitItemKind::Container { .. }
        )
    }
}

/// A record-like type that also specifies how to parse its fields from a
/// byte stream (spec Glossary "Unit").
#[derive(Debug, Clone)]
pub struct UnitDef {
    pub id: Option<Identifier>,
    pub params: Vec<ParamId>,
    pub items: Vec<ItemId>,
    pub scope: Option<ScopeId>,
    pub span: Span,
}
