use crate::ast::ExprId;
use shared_context::{interner::Symbol, Span};

/// `(key, value?, implicit?)` (spec §3 "Attribute"). `implicit` is set by
/// the normalizer when it synthesizes an attribute the field's type
/// publishes as mandatory but the source left out (spec §4.6).
#[derive(Debug, Clone)]
pub struct Attribute {
    pub key: Symbol,
    pub value: Option<ExprId>,
    pub implicit: bool,
    pub span: Span,
}

impl Attribute {
    pub fn new(key: Symbol, value: Option<ExprId>, span: Span) -> Self {
        Self {
            key,
            value,
            implicit: false,
            span,
        }
    }

    pub fn implicit(key: Symbol, value: Option<ExprId>, span: Span) -> Self {
        Self {
            key,
            value,
            implicit: true,
            span,
        }
    }
}
