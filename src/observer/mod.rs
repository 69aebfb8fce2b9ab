//! Observers of solver progress

use crate::state::State;
use crate::simplex::Phase;

/// Observer trait invoked at defined points of the solvers.
///
/// All methods do nothing by default.
pub trait Observer<F>
{
    /// Before each iteration of the active-set loop or the simplex loop.
    ///
    /// * `iteration` is a count of iterations performed so far.
    /// * `state` is the current state.
    fn pre_iteration(&mut self, _iteration: usize, _state: State)
    {
    }

    /// After each simplex pivot.
    ///
    /// * `phase` is the phase in which the pivot took place.
    /// * `row` and `col` locate the pivot element.
    /// * `basis` is the basis after the pivot, negative entries denoting artificial variables.
    /// * `objective` is the objective value of the current phase after the pivot.
    fn post_pivot(&mut self, _phase: Phase, _row: usize, _col: usize, _basis: &[isize], _objective: F)
    {
    }

    /// On each transition of a state.
    fn state_changed(&mut self, _from: State, _to: State)
    {
    }
}

mod nullobserver;
mod logobserver;

pub use nullobserver::*;
pub use logobserver::*;
