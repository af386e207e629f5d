use crate::ast::{ExprId, ScopeId, TypeId};
use shared_context::Identifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StmtId(pub u32);

/// A statement node (spec §3 "Statement").
#[derive(Debug, Clone)]
pub enum Stmt {
    Block { scope: ScopeId, stmts: Vec<StmtId> },
    Expression(ExprId),
    IfElse { cond: ExprId, then_branch: StmtId, else_branch: Option<StmtId> },
    ForEach { loop_var: Identifier, collection: ExprId, scope: ScopeId, body: StmtId },
    Return(Option<ExprId>),
    Print(Vec<ExprId>),
    TryCatch { body: StmtId, catches: Vec<CatchClause> },
    NoOp,
}

#[derive(Debug, Clone)]
pub struct CatchClause {
    pub exception_type: Option<TypeId>,
    pub id: Option<Identifier>,
    pub body: StmtId,
}
