/// Operator kinds recognized by the registry (spec §6: "arithmetic,
/// relational, logical, indexing, attribute access, call, coerce,
/// construct"). Each `expression::UnresolvedOperator` names one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    // Arithmetic
    Plus,
    Minus,
    Mult,
    Div,
    Mod,
    Negate,
    // Relational
    Equal,
    NotEqual,
    Lower,
    LowerEqual,
    Greater,
    GreaterEqual,
    // Logical
    LogicalAnd,
    LogicalOr,
    LogicalNot,
    // Indexing / member access
    Index,
    Attribute,
    HasAttribute,
    // Call
    Call,
    MethodCall,
    // Coerce / construct
    Coerce,
    Cast,
    New,
    Size,
}

impl OperatorKind {
    /// Fixed operand arity for kinds whose arity never varies. `Call` and
    /// `MethodCall` are variadic and return `None`.
    pub fn fixed_arity(&self) -> Option<usize> {
        use OperatorKind::*;
        match self {
            Negate | LogicalNot | Size | New => Some(1),
            Plus | Minus | Mult | Div | Mod | Equal | NotEqual | Lower | LowerEqual | Greater
            | GreaterEqual | LogicalAnd | LogicalOr | Index | Attribute | HasAttribute | Coerce
            | Cast => Some(2),
            Call | MethodCall => None,
        }
    }
}
