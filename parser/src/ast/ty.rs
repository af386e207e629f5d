use crate::ast::UnitId;
use shared_context::interner::Symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub u32);

/// An AST-level type reference (spec §3 "Type"). Scalar, already-concrete
/// shapes are carried directly as an `operators::Type`; unit types keep a
/// reference to their full declaration since a unit carries fields, hooks,
/// and a scope that `operators::Type::Unit` (a purely structural shape used
/// for operator matching) doesn't need.
#[derive(Debug, Clone)]
pub enum TypeExpr {
    Scalar(operators::Type),
    Unit(UnitId),
    List(TypeId),
    Vector(TypeId),
    Set(TypeId),
    Map(TypeId, TypeId),
    Iterator(TypeId),
    OptionalArgument(TypeId),
    Function {
        params: Vec<TypeId>,
        result: TypeId,
    },
    /// An unresolved dotted name (spec: `TypeByName(ref)`). Replaced by the
    /// ID resolver once the name binds to a declared type (invariant 3).
    TypeByName(Vec<Symbol>),
    /// A container's element type was written as a bare reference the
    /// parser couldn't yet classify; the normalizer canonicalizes it into
    /// an explicit inner item (spec §4.6, `UnknownElementType` in §4.4).
    UnknownElementType,
}

impl TypeExpr {
    pub fn is_unknown(&self) -> bool {
        matches!(self, TypeExpr::TypeByName(_) | TypeExpr::UnknownElementType)
    }
}
