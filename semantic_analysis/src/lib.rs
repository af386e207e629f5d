//! Multi-pass semantic resolution over the parser's AST (spec §4).
//!
//! Every pass takes the same `Module` and mutates it in place, reporting a
//! [`pass::PassOutcome`] back to [`finalize`]. The six mutating passes run
//! in a single fixed-point loop rather than the grounding source's
//! open-coded repetition of id-resolver/overload-resolver/operator-resolver
//! (`binpac/context.cc`'s `CompilerContext::finalize`): `PassOutcome`
//! already tells the loop when re-running a pass would be pointless, so one
//! ordered pass list iterated to a fixed point covers the same ground.
//! `validator` never mutates the AST and runs once the loop settles.

mod id_resolver;
mod normalizer;
mod operator_resolver;
mod overload_resolver;
pub mod pass;
mod scope_builder;
mod unit_scope_builder;
mod validator;

use pass::PassOutcome;
use parser::ast::Module;
use shared_context::interner::Interner;
use shared_context::Diagnostics;

/// The same AST-to-lattice lowering `normalizer`/`validator` use internally,
/// exposed so downstream crates (`grammar`) don't re-derive it.
pub use operator_resolver::{expr_type, type_expr_to_type, unit_item_type};

const MAX_SWEEPS: u32 = 16;

#[derive(Debug)]
pub enum FinalizeError {
    /// A pass reported `Failed` (an internal-error diagnostic was already
    /// pushed by that pass).
    PassFailed,
    /// The fixed point was not reached within `MAX_SWEEPS` sweeps.
    DidNotConverge,
}

/// Runs every semantic pass to a fixed point, then validates (spec §4.1).
/// `interner` is needed only by `normalizer`, which mints new symbols for
/// attributes a field's type requires but the source never wrote.
pub fn finalize(
    module: &mut Module,
    interner: &mut Interner,
    diagnostics: &mut Diagnostics,
    file_name: &str,
) -> Result<(), FinalizeError> {
    for _ in 0..MAX_SWEEPS {
        let mut sweep = PassOutcome::Unchanged;

        sweep = sweep.combine(scope_builder::run(module, diagnostics, file_name));
        sweep = sweep.combine(unit_scope_builder::run(module, diagnostics, file_name));
        sweep = sweep.combine(id_resolver::run(module, diagnostics, file_name));
        sweep = sweep.combine(overload_resolver::run(module, diagnostics, file_name));
        sweep = sweep.combine(operator_resolver::run(module, diagnostics, file_name));
        sweep = sweep.combine(normalizer::run(module, interner, diagnostics, file_name));

        if sweep.is_failed() {
            return Err(FinalizeError::PassFailed);
        }
        if sweep == PassOutcome::Unchanged {
            validator::run(module, interner, diagnostics, file_name);
            return Ok(());
        }
    }

    Err(FinalizeError::DidNotConverge)
}
