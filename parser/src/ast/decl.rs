use crate::ast::{ExprId, ScopeId, StmtId, TypeId, UnitId};
use shared_context::interner::Symbol;
use shared_context::{Identifier, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeclId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(pub u32);

/// `(ID, kind, payload)` (spec §3 "Declaration"). `kind` is encoded as the
/// `DeclKind` discriminant rather than a separate field, since each kind
/// carries a different payload shape.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub id: Identifier,
    /// Set only for `on a.b.c { ... }` global hook declarations — the one
    /// case spec §4.2 step 2 allows a scoped declaring ID.
    pub scoped_path: Option<Vec<Symbol>>,
    pub kind: DeclKind,
    pub exported: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum DeclKind {
    Variable { ty: TypeId, init: Option<ExprId> },
    Constant { ty: TypeId, value: ExprId },
    Type { ty: TypeId },
    Function { function: FunctionId },
    Hook { hook: HookId },
}

#[derive(Debug, Clone)]
pub struct Param {
    pub id: Identifier,
    pub ty: TypeId,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub id: Identifier,
    pub params: Vec<ParamId>,
    pub result: TypeId,
    pub body: Option<StmtId>,
    pub scope: Option<ScopeId>,
    pub span: Span,
}

/// An action run when a field is parsed, a unit completes, or a
/// user-defined event fires (spec Glossary "Hook"). `owning_unit` is set by
/// the unit scope builder (spec §4.3.4.d); `foreach` marks a
/// `foreach`-flavored hook attached to a container field, whose body scope
/// rebinds `$$` to the container's element type.
#[derive(Debug, Clone)]
pub struct Hook {
    pub path: Option<Vec<Symbol>>,
    pub owning_unit: Option<UnitId>,
    pub foreach: bool,
    pub params: Vec<ParamId>,
    pub body: StmtId,
    pub scope: ScopeId,
    pub span: Span,
}
