use crate::kind::OperatorKind;
use crate::types::Type;
use std::collections::HashSet;
use std::sync::OnceLock;

/// One operand/result shape an operator kind can take, e.g.
/// `Plus(Integer, Integer) -> Integer` (spec §6: "kind × operand-types[] ->
/// result-type").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorSignature {
    pub operands: Vec<Type>,
    pub result: Type,
}

impl OperatorSignature {
    pub fn new(operands: Vec<Type>, result: Type) -> Self {
        Self { operands, result }
    }
}

/// Outcome of resolving one `UnresolvedOperator` node against the registry
/// (spec §4.5 steps 1-5).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Exactly one candidate matched. `coerced` marks, per operand, whether
    /// that operand needs wrapping in `expression::Coerced`.
    Resolved {
        signature: OperatorSignature,
        coerced: Vec<bool>,
    },
    /// No candidate survived arity/type/coercion filtering.
    NoCandidate,
    /// More than one candidate survived: an ambiguity diagnostic is due.
    Ambiguous(Vec<OperatorSignature>),
}

/// Catalog of built-in operators keyed by kind, plus the coercion table the
/// resolver consults when an operand's type doesn't exactly match a
/// candidate (spec: "Operator Registry ... Catalog of built-in operators
/// keyed by kind and operand types"). Built once at process start into an
/// immutable structure (Design Notes §9) and shared by reference from then
/// on — there is exactly one global registry, matching the grounding
/// source's `OperatorRegistry::globalRegistry()`.
pub struct OperatorRegistry {
    signatures: Vec<(OperatorKind, OperatorSignature)>,
    coercions: HashSet<(Type, Type)>,
}

impl OperatorRegistry {
    fn empty() -> Self {
        Self {
            signatures: Vec::new(),
            coercions: HashSet::new(),
        }
    }

    fn register(&mut self, kind: OperatorKind, signature: OperatorSignature) {
        self.signatures.push((kind, signature));
    }

    fn register_coercion(&mut self, from: Type, to: Type) {
        self.coercions.insert((from, to));
    }

    pub fn can_coerce(&self, from: &Type, to: &Type) -> bool {
        from == to || self.coercions.contains(&(from.clone(), to.clone()))
    }

    pub fn candidates(&self, kind: OperatorKind) -> impl Iterator<Item = &OperatorSignature> {
        self.signatures
            .iter()
            .filter(move |(k, _)| *k == kind)
            .map(|(_, sig)| sig)
    }

    /// Implements spec §4.5 resolution steps 1-5 for one operator node.
    pub fn resolve(&self, kind: OperatorKind, operand_types: &[Type]) -> Resolution {
        let survivors: Vec<&OperatorSignature> = self
            .candidates(kind)
            .filter(|sig| sig.operands.len() == operand_types.len())
            .filter(|sig| {
                sig.operands
                    .iter()
                    .zip(operand_types)
                    .all(|(expected, actual)| self.can_coerce(actual, expected))
            })
            .collect();

        match survivors.len() {
            0 => Resolution::NoCandidate,
            1 => {
                let signature = survivors[0].clone();
                let coerced = signature
                    .operands
                    .iter()
                    .zip(operand_types)
                    .map(|(expected, actual)| actual != expected)
                    .collect();
                Resolution::Resolved { signature, coerced }
            }
            _ => Resolution::Ambiguous(survivors.into_iter().cloned().collect()),
        }
    }

    /// The process-wide immutable registry, built lazily on first access
    /// (spec §5: "process-wide immutable after `init()`").
    pub fn global() -> &'static OperatorRegistry {
        static REGISTRY: OnceLock<OperatorRegistry> = OnceLock::new();
        REGISTRY.get_or_init(init)
    }
}

/// Builds the built-in operator catalog. Mirrors the handful of scalar
/// coercions BinPAC++ units rely on constantly (integer widening, bytes
/// from string literals) plus the arithmetic/relational/logical/indexing
/// operators named in spec §6.
fn init() -> OperatorRegistry {
    let mut reg = OperatorRegistry::empty();

    let int64 = Type::Integer { width: 64, signed: true };
    let uint64 = Type::Integer { width: 64, signed: false };
    let bool_ty = Type::Bool;

    for kind in [
        OperatorKind::Plus,
        OperatorKind::Minus,
        OperatorKind::Mult,
        OperatorKind::Div,
        OperatorKind::Mod,
    ] {
        reg.register(kind, OperatorSignature::new(vec![int64.clone(), int64.clone()], int64.clone()));
        reg.register(kind, OperatorSignature::new(vec![Type::Double, Type::Double], Type::Double));
    }
    reg.register(OperatorKind::Plus, OperatorSignature::new(vec![Type::String, Type::String], Type::String));
    reg.register(OperatorKind::Plus, OperatorSignature::new(vec![Type::Bytes, Type::Bytes], Type::Bytes));

    reg.register(OperatorKind::Negate, OperatorSignature::new(vec![int64.clone()], int64.clone()));
    reg.register(OperatorKind::Negate, OperatorSignature::new(vec![Type::Double], Type::Double));

    for kind in [OperatorKind::Equal, OperatorKind::NotEqual] {
        reg.register(kind, OperatorSignature::new(vec![int64.clone(), int64.clone()], bool_ty.clone()));
        reg.register(kind, OperatorSignature::new(vec![Type::String, Type::String], bool_ty.clone()));
        reg.register(kind, OperatorSignature::new(vec![Type::Bytes, Type::Bytes], bool_ty.clone()));
        reg.register(kind, OperatorSignature::new(vec![bool_ty.clone(), bool_ty.clone()], bool_ty.clone()));
    }

    for kind in [
        OperatorKind::Lower,
        OperatorKind::LowerEqual,
        OperatorKind::Greater,
        OperatorKind::GreaterEqual,
    ] {
        reg.register(kind, OperatorSignature::new(vec![int64.clone(), int64.clone()], bool_ty.clone()));
        reg.register(kind, OperatorSignature::new(vec![Type::Double, Type::Double], bool_ty.clone()));
    }

    for kind in [OperatorKind::LogicalAnd, OperatorKind::LogicalOr] {
        reg.register(kind, OperatorSignature::new(vec![bool_ty.clone(), bool_ty.clone()], bool_ty.clone()));
    }
    reg.register(OperatorKind::LogicalNot, OperatorSignature::new(vec![bool_ty.clone()], bool_ty.clone()));

    reg.register(OperatorKind::Size, OperatorSignature::new(vec![Type::Bytes], uint64.clone()));
    reg.register(OperatorKind::Size, OperatorSignature::new(vec![Type::List(Box::new(Type::Any))], uint64.clone()));
    reg.register(OperatorKind::Size, OperatorSignature::new(vec![Type::Vector(Box::new(Type::Any))], uint64.clone()));

    reg.register(
        OperatorKind::Index,
        OperatorSignature::new(vec![Type::Vector(Box::new(Type::Any)), uint64.clone()], Type::Any),
    );
    reg.register(
        OperatorKind::Index,
        OperatorSignature::new(vec![Type::List(Box::new(Type::Any)), uint64.clone()], Type::Any),
    );
    reg.register(
        OperatorKind::Index,
        OperatorSignature::new(vec![Type::Map(Box::new(Type::Any), Box::new(Type::Any)), Type::Any], Type::Any),
    );

    // Coercions: narrower integer widths widen freely; unsigned -> signed
    // of the same or greater width is allowed; bytes/string literals
    // coerce into each other's constant form for `Field::Constant` matches.
    for width in [8u8, 16, 32] {
        reg.register_coercion(
            Type::Integer { width, signed: true },
            Type::Integer { width: 64, signed: true },
        );
        reg.register_coercion(
            Type::Integer { width, signed: false },
            Type::Integer { width: 64, signed: false },
        );
    }
    reg.register_coercion(uint64.clone(), int64.clone());
    reg.register_coercion(Type::String, Type::Bytes);

    reg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_on_two_integers_resolves_uniquely() {
        let reg = OperatorRegistry::global();
        let int64 = Type::Integer { width: 64, signed: true };
        let resolution = reg.resolve(OperatorKind::Plus, &[int64.clone(), int64.clone()]);
        assert!(matches!(resolution, Resolution::Resolved { .. }));
    }

    #[test]
    fn plus_on_a_unit_and_a_bool_has_no_candidate() {
        let reg = OperatorRegistry::global();
        let resolution = reg.resolve(
            OperatorKind::Plus,
            &[Type::Unit { params: vec![], items: vec![] }, Type::Bool],
        );
        assert_eq!(resolution, Resolution::NoCandidate);
    }

    #[test]
    fn two_coercion_compatible_candidates_report_ambiguous() {
        let mut reg = OperatorRegistry::empty();
        let int64 = Type::Integer { width: 64, signed: true };
        let uint64 = Type::Integer { width: 64, signed: false };
        reg.register(OperatorKind::Plus, OperatorSignature::new(vec![int64.clone(), int64.clone()], int64.clone()));
        reg.register(OperatorKind::Plus, OperatorSignature::new(vec![uint64.clone(), uint64.clone()], uint64.clone()));
        reg.register_coercion(uint64.clone(), int64.clone());

        let resolution = reg.resolve(OperatorKind::Plus, &[uint64.clone(), uint64.clone()]);
        match resolution {
            Resolution::Ambiguous(candidates) => assert_eq!(candidates.len(), 2),
            other => panic!("expected an ambiguous resolution, got {other:?}"),
        }
    }

    #[test]
    fn a_narrower_unsigned_integer_coerces_into_a_wider_plus() {
        let reg = OperatorRegistry::global();
        let uint8 = Type::Integer { width: 8, signed: false };
        let uint64 = Type::Integer { width: 64, signed: false };
        let resolution = reg.resolve(OperatorKind::Plus, &[uint8, uint64]);
        match resolution {
            Resolution::Resolved { coerced, .. } => assert_eq!(coerced, vec![true, false]),
            other => panic!("expected a unique resolution, got {other:?}"),
        }
    }
}
