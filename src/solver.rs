//! Active-set QP solver and simplex LP solver

use num_traits::Float;
use core::marker::PhantomData;
use core::fmt::{Debug, LowerExp};
use crate::linalg::LinAlgEx;
use crate::param::SolverParam;
use crate::state::Solution;
use crate::problem::{ProbQP, ProbLP};
use crate::activeset::ActiveSetCore;
use crate::simplex::{SimplexTableau, nonneg_rhs};
use crate::solver_error::SolverError;
use crate::observer::{Observer, LogObserver};

//

/// Convex QP and LP solver.
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// [`ProbQP`] is solved by the primal active-set method,
/// which starts from a feasible point found by the two-phase simplex method
/// and keeps every iterate feasible.
/// The returned multipliers \\(l = (l_E, l_I)\\) satisfy
/// \\[
/// Q x - c + A_E^T l_E + A_I^T l_I = 0, \quad l_I \ge 0
/// \\]
/// at an optimum.
///
/// [`ProbLP`] is solved by the two-phase simplex method alone.
pub struct Solver<L: LinAlgEx>
{
    /// solver parameters.
    pub par: SolverParam<L::F>,

    ph_l: PhantomData<L>,
}

impl<L: LinAlgEx> Solver<L>
{
    /// Creates an instance.
    ///
    /// Returns [`Solver`] instance.
    pub fn new() -> Self
    {
        Solver {
            par: SolverParam::default(),
            ph_l: PhantomData,
        }
    }

    /// Changes solver parameters.
    ///
    /// Returns [`Solver`] with its parameters changed.
    /// * `f` is a function to change parameters given by its argument.
    pub fn par<P>(mut self, f: P) -> Self
    where P: FnOnce(&mut SolverParam<L::F>)
    {
        f(&mut self.par);
        self
    }
}

impl<L: LinAlgEx> Default for Solver<L>
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl<L: LinAlgEx> Solver<L>
where L::F: Float + Debug + LowerExp
{
    /// Solves a QP.
    ///
    /// Returns `Ok` with a [`Solution`], whose `multipliers` are \\(l_E\\) followed by \\(l_I\\),
    /// or `Err` with [`SolverError`] type if the problem data is rejected.
    /// * `prob` is the QP.
    /// * `kick` is an optional solution of a previous solve to start from,
    ///   used only if its state is approximate and its point is still feasible.
    ///
    /// [`State::Optimal`](crate::state::State::Optimal) assumes the QP is bounded below.
    /// Unboundedness is not detected:
    /// with a singular \\(Q\\) and a descent direction along its null space,
    /// the method can stop at a feasible point and report it optimal.
    pub fn solve_qp(&self, prob: &ProbQP<L>, kick: Option<&Solution<L::F>>)
    -> Result<Solution<L::F>, SolverError>
    {
        self.solve_qp_with(prob, kick, &mut LogObserver)
    }

    /// Solves a QP with an [`Observer`].
    ///
    /// Same as [`Solver::solve_qp`] except that
    /// * `observer` is notified of iterations, pivots and state transitions.
    pub fn solve_qp_with<O: Observer<L::F>>(&self, prob: &ProbQP<L>, kick: Option<&Solution<L::F>>, observer: &mut O)
    -> Result<Solution<L::F>, SolverError>
    {
        log::debug!("{:?}", self.par);

        let core = ActiveSetCore::new(prob, self.par.clone());

        core.solve(kick, observer)
    }

    /// Solves a LP.
    ///
    /// Returns `Ok` with a [`Solution`], whose `multipliers` are the dual variables
    /// of \\(A_E\\) rows followed by \\(A_I\\) rows,
    /// or `Err` with [`SolverError`] type if the problem data is rejected.
    /// * `prob` is the LP.
    ///
    /// Reaching `max_iter` before a feasible basis is found is reported as
    /// [`State::Failed`](crate::state::State::Failed).
    pub fn solve_lp(&self, prob: &ProbLP<L>) -> Result<Solution<L::F>, SolverError>
    {
        self.solve_lp_with(prob, &mut LogObserver)
    }

    /// Solves a LP with an [`Observer`].
    ///
    /// Same as [`Solver::solve_lp`] except that
    /// * `observer` is notified of iterations, pivots and state transitions.
    pub fn solve_lp_with<O: Observer<L::F>>(&self, prob: &ProbLP<L>, observer: &mut O)
    -> Result<Solution<L::F>, SolverError>
    {
        let (mut mat_a, mut vec_b, vec_c) = prob.standard_form()?;

        log::debug!("{:?}", self.par);
        log::info!("----- Initializing");

        let flipped = nonneg_rhs(&mut mat_a, &mut vec_b);

        let mut tableau = SimplexTableau::new(&mat_a, &vec_b, &vec_c, self.par.clone());

        log::info!("----- Started");
        let mut rslt = tableau.solve(observer);

        if rslt.state.is_optimal() {
            log::info!("----- Converged");
        }
        else if rslt.state.is_failure() {
            log::warn!("----- {}", rslt.state);
        }

        rslt.x.truncate(prob.n());

        if let Some(duals) = rslt.multipliers.as_mut() {
            for (d, f) in duals.iter_mut().zip(flipped) {
                if f {
                    *d = -*d;
                }
            }
        }

        Ok(rslt)
    }
}
