use super::SolverEvent;

/// A handler consulted by the solver at its polling points.
///
/// Returning `false` from [`should_resume`](ComputationHandler::should_resume)
/// cancels the search: the solver backjumps to the root level and reports
/// an unknown result.
pub trait ComputationHandler {
    /// Returns whether the computation should go on after `event`.
    fn should_resume(&mut self, event: SolverEvent) -> bool;
}

/// A handler that never cancels.
pub struct NopHandler;

impl ComputationHandler for NopHandler {
    fn should_resume(&mut self, _event: SolverEvent) -> bool {
        true
    }
}
