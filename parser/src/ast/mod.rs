//! The BinPAC++ AST (spec §3 "Data Model"). Every node category lives in
//! its own arena on `Module`, addressed by a `*Id(u32)` newtype — ownership
//! edges (a field's type, a block's statements) are struct fields holding
//! child ids; cross-references (an `ID` expression's resolved target, an
//! operator's chosen registry entry) are the same kind of id, but looked up
//! rather than freed, matching the "cross-references are lookup-only,
//! never ownership" rule in spec §3 Lifecycle.

pub mod attribute;
pub mod decl;
pub mod expr;
pub mod module;
pub mod scope;
pub mod stmt;
pub mod ty;
pub mod unit;

pub use attribute::Attribute;
pub use decl::{Declaration, DeclId, DeclKind, FunctionDef, FunctionId, Hook, HookId, Param, ParamId};
pub use expr::{CtorKind, Expr, ExprId, IdRef, Literal, ParserStateKind};
pub use module::{ArenaIndex, Module, Spanned};
pub use scope::{Scope, ScopeArena, ScopeId};
pub use stmt::{CatchClause, Stmt, StmtId};
pub use ty::{TypeExpr, TypeId};
pub use unit::{ContainerKind, ItemId, SwitchCase, UnitDef, UnitId, UnitItem, UnitItemKind};
