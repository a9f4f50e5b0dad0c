use std::time::{Duration, Instant};

use super::{ComputationHandler, SolverEvent};

/// The different timeout flavors.
#[derive(Debug, Clone, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub enum Timer {
    /// Cancel after the given duration, measured from handler creation.
    SingleTimeout(Duration),
    /// Cancel after the given duration, measured from the start of each
    /// computation.
    RestartingTimeout(Duration),
    /// Cancel at a fixed point in time.
    FixedEnd(Instant),
}

/// A handler canceling the computation after a time budget is exhausted.
#[derive(Debug, Clone, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct TimeoutHandler {
    timer: Timer,
    checkpoint: Instant,
}

impl TimeoutHandler {
    pub fn new(timer: Timer) -> Self {
        Self { timer, checkpoint: Instant::now() }
    }

    /// Convenience constructor for a single timeout of fractional seconds.
    pub fn from_secs(seconds: f64) -> Self {
        Self::new(Timer::SingleTimeout(Duration::from_secs_f64(seconds)))
    }
}

impl ComputationHandler for TimeoutHandler {
    fn should_resume(&mut self, event: SolverEvent) -> bool {
        match self.timer {
            Timer::SingleTimeout(timeout) => self.checkpoint.elapsed() < timeout,
            Timer::RestartingTimeout(timeout) => {
                if event == SolverEvent::SolveStarted {
                    self.checkpoint = Instant::now();
                }
                self.checkpoint.elapsed() < timeout
            }
            Timer::FixedEnd(end) => Instant::now() < end,
        }
    }
}
