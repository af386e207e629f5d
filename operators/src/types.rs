use shared_context::interner::Symbol;

/// The BinPAC++ type lattice (spec §3 "Type"). `Unknown` and `TypeByName`
/// are resolved away by the ID resolver (invariant 3); everything that
/// survives to the grammar builder is concrete.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Void,
    Any,
    /// Placeholder for a type not yet determined; must not survive ID
    /// resolution (spec §3 invariant 3).
    Unknown,
    Bool,
    Integer { width: u8, signed: bool },
    Double,
    String,
    Bytes,
    Address,
    Network,
    Port,
    Interval,
    Time,
    Enum(Vec<Symbol>),
    Bitset(Vec<Symbol>),
    Tuple(Vec<Type>),
    List(Box<Type>),
    Vector(Box<Type>),
    Set(Box<Type>),
    Map(Box<Type>, Box<Type>),
    RegExp,
    Function {
        params: Vec<Type>,
        result: Box<Type>,
    },
    Unit {
        params: Vec<Type>,
        /// Field/item types, in declaration order. Kept flat here; the
        /// full item list (with attributes and hooks) lives on the AST
        /// node in `parser`, this is only the type-level shape used for
        /// operator/coercion matching.
        items: Vec<Type>,
    },
    /// An unresolved `TypeByName` reference; the symbol names the type
    /// declaration this should eventually bind to.
    TypeByName(Symbol),
    Iterator(Box<Type>),
    OptionalArgument(Box<Type>),
    Sink,
    File,
    CAddr,
    EmbeddedObject,
}

impl Type {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Type::Unknown | Type::TypeByName(_))
    }

    /// Structural equality used by the operator resolver when checking
    /// whether an operand's type exactly matches a registered operator's
    /// expected type (spec §4.5 step 3).
    pub fn matches(&self, other: &Type) -> bool {
        self == other
    }

    pub fn element_type(&self) -> Option<&Type> {
        match self {
            Type::List(t) | Type::Vector(t) | Type::Set(t) | Type::Iterator(t) => Some(t),
            _ => None,
        }
    }
}
