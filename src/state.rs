//! Solver states and results

use core::fmt::Display;

//

/// Solver state.
///
/// Ordered from the least to the most certain;
/// [`State::Infeasible`], [`State::Unbounded`] and [`State::Failed`] are terminal failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State
{
    /// Not yet looked at.
    Unexplored,
    /// Problem validated.
    Valid,
    /// The current point satisfies all constraints.
    Feasible,
    /// The current point is feasible and on its way to an optimum.
    Approximate,
    /// Converged to an optimum.
    Optimal,
    /// No point satisfies the constraints.
    Infeasible,
    /// The objective decreases without bound.
    Unbounded,
    /// Gave up, e.g. by exhausting retries of unsolvable subproblems.
    Failed,
}

impl State
{
    /// Checks if the current point is feasible, possibly optimal.
    pub fn is_feasible(&self) -> bool
    {
        matches!(self, State::Feasible | State::Approximate | State::Optimal)
    }

    /// Checks if the current point is approximate, possibly optimal.
    pub fn is_approximate(&self) -> bool
    {
        matches!(self, State::Approximate | State::Optimal)
    }

    pub fn is_optimal(&self) -> bool
    {
        *self == State::Optimal
    }

    /// Checks if terminated without a usable point.
    pub fn is_failure(&self) -> bool
    {
        matches!(self, State::Infeasible | State::Unbounded | State::Failed)
    }
}

impl Display for State {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", match &self {
            State::Unexplored  => "UNEXPLORED",
            State::Valid       => "VALID",
            State::Feasible    => "FEASIBLE",
            State::Approximate => "APPROXIMATE",
            State::Optimal     => "OPTIMAL",
            State::Infeasible  => "INFEASIBLE",
            State::Unbounded   => "UNBOUNDED",
            State::Failed      => "FAILED",
        })
    }
}

//

/// Result of a solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution<F>
{
    /// Terminal state.
    pub state: State,
    /// Primal solution \\(x\\).
    pub x: Vec<F>,
    /// Multipliers (or dual variables) of the constraints, if available.
    pub multipliers: Option<Vec<F>>,
    /// Objective value at `x`.
    pub value: F,
    /// Number of iterations performed.
    pub iterations: usize,
}
