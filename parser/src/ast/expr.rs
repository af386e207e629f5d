use crate::ast::DeclId;
use crate::ast::ParamId;
use crate::ast::TypeId;
use operators::OperatorKind;
use shared_context::interner::Symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprId(pub u32);

/// One literal value (spec §3 `expression::Constant`'s payload).
#[derive(Debug, Clone)]
pub enum Literal {
    Bool(bool),
    Integer(i64, operators::Type),
    Double(f64),
    Str(Symbol),
    Bytes(Vec<u8>),
}

/// An inline constructor expression — a container literal or a regexp/bytes
/// pattern used as a `Field::Ctor` match (spec §3 `expression::Ctor`, §4.8
/// "Literal(sym, const)").
#[derive(Debug, Clone)]
pub enum CtorKind {
    List(Vec<ExprId>),
    Vector(Vec<ExprId>),
    Set(Vec<ExprId>),
    Map(Vec<(ExprId, ExprId)>),
    RegExp(Symbol),
    Bytes(Vec<u8>),
}

/// An `ID` expression node before/after resolution (spec §3: "`ID` ...
/// Resolution replaces the node by a reference to the bound
/// expression/type; on failure the node is kept").
#[derive(Debug, Clone)]
pub enum IdRef {
    Unresolved(Vec<Symbol>),
    Resolved(ExprId),
}

/// `self`, `$$`, or a named parameter referenced from within a unit/hook
/// body (spec §3 `expression::ParserState`).
#[derive(Debug, Clone, Copy)]
pub enum ParserStateKind {
    SelfUnit,
    DollarDollar,
    Parameter(ParamId),
}

/// An expression node (spec §3 "Expression"). `UnresolvedOperator` is the
/// placeholder the parser emits for every operator occurrence; the operator
/// resolver (spec §4.5) replaces it with `ResolvedOperator`.
#[derive(Debug, Clone)]
pub enum Expr {
    Constant(Literal),
    Ctor(CtorKind),
    Id(IdRef),
    List(Vec<ExprId>),
    Coerced { inner: ExprId, target: operators::Type },
    Function(DeclId),
    Module(Symbol),
    Parameter(ParamId),
    Variable(DeclId),
    Type(TypeId),
    ParserState(ParserStateKind),
    /// The loop variable of a `foreach` statement (spec §3 `Stmt::ForEach`).
    /// Has no declaration of its own; the binding site is the enclosing
    /// `ForEach` node, found by walking the statement tree if its type is
    /// ever needed.
    LoopVariable,
    UnresolvedOperator { kind: OperatorKind, operands: Vec<ExprId> },
    ResolvedOperator { kind: OperatorKind, operands: Vec<ExprId>, result: operators::Type },
}

impl Expr {
    pub fn is_unresolved_operator(&self) -> bool {
        matches!(self, Expr::UnresolvedOperator { .. })
    }
}
