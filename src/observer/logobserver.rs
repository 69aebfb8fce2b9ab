use core::fmt::LowerExp;
use crate::state::State;
use crate::simplex::Phase;
use super::Observer;

//

/// Observer using the `log` crate
///
/// Iterations and pivots are output at trace level, state transitions at debug level.
pub struct LogObserver;

impl<F: LowerExp> Observer<F> for LogObserver
{
    fn pre_iteration(&mut self, iteration: usize, state: State)
    {
        log::trace!("{}: {}", iteration, state);
    }

    fn post_pivot(&mut self, phase: Phase, row: usize, col: usize, basis: &[isize], objective: F)
    {
        log::trace!("{:?}: pivot ({}, {}) objective {:.3e}", phase, row, col, objective);
        log::trace!("{:?}: basis {:?}", phase, basis);
    }

    fn state_changed(&mut self, from: State, to: State)
    {
        log::debug!("{} -> {}", from, to);
    }
}
