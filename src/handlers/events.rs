/// Events emitted by the solver while searching.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub enum SolverEvent {
    /// A solve call has started.
    SolveStarted,
    /// The search has completed another batch of 2000 decisions.
    ///
    /// This is the polling point for cancellation: the search only
    /// consults its handler here, so cancellation latency is bounded by
    /// the time those decisions take.
    DecisionBatch,
    /// A solve call has finished.
    SolveFinished,
}
