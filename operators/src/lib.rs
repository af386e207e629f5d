pub mod kind;
pub mod registry;
pub mod types;

pub use kind::OperatorKind;
pub use registry::{OperatorRegistry, OperatorSignature, Resolution};
pub use types::Type;
