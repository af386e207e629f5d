/// Outcome a single semantic pass reports back to the finalizer (Design
/// Notes §9 "Pass fixed point"): the outer loop re-runs every pass until a
/// full sweep reports nothing but `Unchanged`, or any pass reports `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    Changed,
    Unchanged,
    Failed,
}

impl PassOutcome {
    pub fn changed(did_change: bool) -> Self {
        if did_change { PassOutcome::Changed } else { PassOutcome::Unchanged }
    }

    pub fn is_failed(self) -> bool {
        matches!(self, PassOutcome::Failed)
    }

    /// Combines two outcomes from the same sweep: a failure anywhere fails
    /// the sweep; otherwise any change anywhere marks the sweep changed.
    pub fn combine(self, other: PassOutcome) -> PassOutcome {
        use PassOutcome::*;
        match (self, other) {
            (Failed, _) | (_, Failed) => Failed,
            (Changed, _) | (_, Changed) => Changed,
            (Unchanged, Unchanged) => Unchanged,
        }
    }
}
