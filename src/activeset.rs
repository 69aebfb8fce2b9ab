//! Primal active-set method

use num_traits::{Float, Zero, One};
use core::fmt::{Debug, LowerExp};
use crate::linalg::LinAlgEx;
use crate::matbuild::{MatBuild, MatType};
use crate::factor::{Cholesky, LU};
use crate::activator::Activator;
use crate::kkt::kkt_system;
use crate::simplex::{SimplexTableau, nonneg_rhs};
use crate::param::SolverParam;
use crate::state::{State, Solution};
use crate::problem::ProbQP;
use crate::solver_error::SolverError;
use crate::observer::Observer;

//

/// Rows of constraints restricted to an active set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationConstraints
{
    /// Equality rows followed by the active inequality rows.
    General,
    /// Active inequality rows only, for problems without equality constraints.
    Pure,
}

impl IterationConstraints
{
    /// Selects a variant for a problem with `me` equality constraints.
    pub fn new(me: usize) -> Self
    {
        if me > 0 {
            IterationConstraints::General
        }
        else {
            IterationConstraints::Pure
        }
    }

    /// Number of the restricted rows.
    pub fn count<L: LinAlgEx>(&self, prob: &ProbQP<L>, included: &[usize]) -> usize
    {
        match self {
            IterationConstraints::General => prob.me() + included.len(),
            IterationConstraints::Pure => included.len(),
        }
    }

    /// Restricted constraint matrix.
    pub fn mat_a<L: LinAlgEx>(&self, prob: &ProbQP<L>, included: &[usize]) -> MatBuild<L>
    {
        let ai = prob.mat_ai().rows(included);

        match self {
            IterationConstraints::General => prob.mat_ae().vstack(&ai),
            IterationConstraints::Pure => ai,
        }
    }

    /// Restricted right-hand side.
    pub fn vec_b<L: LinAlgEx>(&self, prob: &ProbQP<L>, included: &[usize]) -> MatBuild<L>
    {
        let bi = prob.vec_bi().rows(included);

        match self {
            IterationConstraints::General => prob.vec_be().vstack(&bi),
            IterationConstraints::Pure => bi,
        }
    }
}

//

/// State of the active-set method.
///
/// Every step of [`ActiveSetCore`] reads and updates this one value.
pub struct QpState<L: LinAlgEx>
{
    /// Current state.
    pub state: State,
    /// Current point \\(x\\).
    pub x: Vec<L::F>,
    /// Multipliers, equality ones followed by inequality ones.
    /// Zero for excluded inequalities.
    pub l: Vec<L::F>,
    /// Partition of the inequality constraints.
    pub activator: Activator,
    /// Factorization of \\(Q\\).
    pub cholesky: Cholesky<L>,
    /// Factorization of a Schur complement or a KKT system.
    pub lu: LU<L>,
    /// Cached \\(Q^{-1} c\\).
    pub inv_qc: Option<Vec<L::F>>,
    /// Excluded inequality that limited the last step.
    pub constraint_to_include: Option<usize>,
    /// Number of iterations performed.
    pub iterations: usize,
}

impl<L: LinAlgEx> QpState<L>
{
    /// Creates an unexplored state.
    pub fn new(n: usize, me: usize, mi: usize, eps_zero: L::F) -> Self
    {
        QpState {
            state: State::Unexplored,
            x: vec![L::F::zero(); n],
            l: vec![L::F::zero(); me + mi],
            activator: Activator::new(mi),
            cholesky: Cholesky::new(eps_zero),
            lu: LU::new(eps_zero),
            inv_qc: None,
            constraint_to_include: None,
            iterations: 0,
        }
    }

    fn set_state<O: Observer<L::F>>(&mut self, to: State, observer: &mut O)
    {
        if self.state != to {
            observer.state_changed(self.state, to);
            self.state = to;
        }
    }
}

//

/// Active-set QP solver core.
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Solves a [`ProbQP`] by moving along a feasible path:
/// an initial feasible point is found by [`SimplexTableau`],
/// then each iteration solves the equality constrained QP
/// restricted to the active inequalities and steps towards its solution.
pub struct ActiveSetCore<'a, L: LinAlgEx>
{
    par: SolverParam<L::F>,
    prob: &'a ProbQP<L>,
    constraints: IterationConstraints,
}

impl<'a, L: LinAlgEx> ActiveSetCore<'a, L>
where L::F: Float + Debug + LowerExp
{
    /// Creates an instance.
    pub fn new(prob: &'a ProbQP<L>, par: SolverParam<L::F>) -> Self
    {
        ActiveSetCore {
            par,
            prob,
            constraints: IterationConstraints::new(prob.me()),
        }
    }

    /// Creates an unexplored [`QpState`] sized for the problem.
    pub fn new_state(&self) -> QpState<L>
    {
        QpState::new(self.prob.n(), self.prob.me(), self.prob.mi(), self.par.eps_zero)
    }

    /// Runs the whole method.
    ///
    /// Returns the [`Solution`] whose state is terminal, or not optimal on reaching `max_iter`,
    /// or [`SolverError`] if the problem is rejected.
    /// * `kick` is an optional starting point, used if approximate and feasible.
    /// * `observer` is invoked before each iteration and on state transitions.
    pub fn solve<O: Observer<L::F>>(&self, kick: Option<&Solution<L::F>>, observer: &mut O)
    -> Result<Solution<L::F>, SolverError>
    {
        let mut st = self.new_state();

        self.validate(&mut st, observer)?;

        log::info!("----- Initializing");
        self.initialise(&mut st, kick, observer);

        if st.state.is_feasible() {
            log::info!("----- Started");

            loop {
                if st.iterations >= self.par.max_iter {
                    log::warn!("----- ExcessIter");
                    break;
                }

                observer.pre_iteration(st.iterations, st.state);

                self.perform_iteration(&mut st, observer);
                st.iterations += 1;

                if st.state.is_failure() || !self.needs_another_iteration(&mut st, observer) {
                    break;
                }
            }
        }

        match st.state {
            State::Optimal => log::info!("----- Converged"),
            State::Infeasible => log::warn!("----- Infeasible"),
            State::Unbounded => log::warn!("----- Unbounded"),
            State::Failed => log::warn!("----- Failed"),
            _ => {},
        }
        log::debug!("x {:?}", st.x);
        log::debug!("l {:?}", st.l);

        Ok(Solution {
            state: st.state,
            value: self.prob.objective(&st.x),
            x: st.x,
            multipliers: Some(st.l),
            iterations: st.iterations,
        })
    }

    /// Checks the problem and marks it valid.
    pub fn validate<O: Observer<L::F>>(&self, st: &mut QpState<L>, observer: &mut O) -> Result<(), SolverError>
    {
        self.prob.check(self.par.eps_zero)?;

        st.set_state(State::Valid, observer);
        Ok(())
    }

    fn is_feasible(&self, x: &[L::F]) -> bool
    {
        let tol = &self.par.tol_slack;

        self.prob.is_feasible(x, |a, b| !tol.is_different(a, b))
    }

    /// Finds a feasible point and its active set.
    ///
    /// Leaves the state [`State::Feasible`], [`State::Infeasible`],
    /// or [`State::Failed`] if the feasibility LP stops at `max_iter` before finding a feasible basis.
    pub fn initialise<O: Observer<L::F>>(&self, st: &mut QpState<L>, kick: Option<&Solution<L::F>>, observer: &mut O)
    {
        let prob = self.prob;
        let (n, me, mi) = (prob.n(), prob.me(), prob.mi());

        st.cholesky.compute(prob.mat_q());
        st.activator.exclude_all();

        let kick = kick.filter(|k| k.state.is_approximate() && k.x.len() == n);

        let mut found = State::Infeasible;

        if let Some(k) = kick {
            L::copy(&k.x, &mut st.x);
            if self.is_feasible(&st.x) {
                found = State::Feasible;
            }
        }

        if found != State::Feasible {
            if prob.is_constrained() {
                found = self.feasibility_lp(st, kick.is_some(), observer);
            }
            else {
                st.x = prob.zeros();
                found = State::Feasible;
            }
        }

        if found != State::Feasible {
            st.x = prob.zeros();
            st.set_state(found, observer);
            return;
        }

        st.set_state(State::Feasible, observer);

        if mi > 0 {
            let excluded = st.activator.excluded();
            let body = prob.mat_ai().rows(&excluded).mul_vec(&st.x);

            for (i, v) in excluded.iter().zip(body) {
                if !self.par.tol_slack.is_different(prob.vec_bi()[(*i, 0)], v) {
                    st.activator.include(*i);
                }
            }
        }

        while me + st.activator.count_included() > n && st.activator.count_included() > 0 {
            self.shrink(st);
        }

        for i in st.activator.excluded() {
            st.l[me + i] = L::F::zero();
        }

        st.inv_qc = if st.cholesky.is_solvable() {
            Some(st.cholesky.solve_vec(prob.vec_c().as_ref()))
        }
        else {
            None
        };

        log::debug!("initial x {:?}", st.x);
        log::debug!("initial {}", st.activator);
    }

    // minimize g^T (x+ - x-) s.t. AE (x+ - x-) = BE, AI (x+ - x-) + s = BI, x+, x-, s >= 0
    // returns Feasible, Infeasible or Failed
    fn feasibility_lp<O: Observer<L::F>>(&self, st: &mut QpState<L>, use_kick: bool, observer: &mut O) -> State
    {
        let prob = self.prob;
        let (n, me, mi) = (prob.n(), prob.me(), prob.mi());

        let f0 = L::F::zero();
        let f1 = L::F::one();

        let g = if use_kick {
            prob.gradient(&st.x)
        }
        else {
            let mut g = prob.vec_c().as_ref().to_vec();
            L::scale(-f1, &mut g);
            g
        };

        let vec_c = MatBuild::new(MatType::General(n + n + mi, 1)).by_fn(|r, _| {
            if r < n {
                g[r]
            }
            else if r < n + n {
                -g[r - n]
            }
            else {
                f0
            }
        });

        let mut mat_a = MatBuild::new(MatType::General(me + mi, n + n + mi)).by_fn(|r, c| {
            let (a, i) = if r < me {
                (prob.mat_ae(), r)
            }
            else {
                (prob.mat_ai(), r - me)
            };

            if c < n {
                a[(i, c)]
            }
            else if c < n + n {
                -a[(i, c - n)]
            }
            else if r >= me && c - n - n == i {
                f1
            }
            else {
                f0
            }
        });

        let mut vec_b = prob.vec_be().vstack(prob.vec_bi());

        nonneg_rhs(&mut mat_a, &mut vec_b);

        let mut tableau = SimplexTableau::<L>::new(&mat_a, &vec_b, &vec_c, self.par.clone());
        let rslt = tableau.solve(observer);

        // an unbounded LP has passed Phase 1 with a feasible basis
        if !(rslt.state.is_feasible() || rslt.state == State::Unbounded) {
            log::debug!("feasibility LP: {}", rslt.state);

            return if rslt.state == State::Failed {
                State::Failed
            }
            else {
                State::Infeasible
            };
        }

        for i in 0.. n {
            st.x[i] = rslt.x[i] - rslt.x[n + i];
        }

        let residual = tableau.residual_costs();
        for i in 0.. mi {
            st.l[me + i] = residual[n + n + i];
        }

        State::Feasible
    }

    /// Excludes the included inequality of the largest magnitude multiplier.
    pub fn shrink(&self, st: &mut QpState<L>)
    {
        let me = self.prob.me();
        let included = st.activator.included();

        if let Some(&first) = included.first() {
            let mut to_exclude = first;
            let mut max_abs = L::F::zero();

            for i in included {
                let v = st.l[me + i].abs();
                if v >= max_abs {
                    max_abs = v;
                    to_exclude = i;
                }
            }

            st.activator.exclude(to_exclude);
            st.l[me + to_exclude] = L::F::zero();
        }
    }

    fn suggest_to_include(&self, st: &QpState<L>) -> Option<usize>
    {
        if let Some(i) = st.constraint_to_include {
            if !st.activator.is_included(i) {
                return Some(i);
            }
        }

        let excluded = st.activator.excluded();
        let slack = self.prob.slack_i(&excluded, &st.x);
        let bi = self.prob.vec_bi();

        let mut min_slack = L::F::zero();
        let mut ret = None;

        for (i, s) in excluded.iter().zip(slack) {
            if s < min_slack && self.par.tol_slack.is_different(bi[(*i, 0)], bi[(*i, 0)] - s) {
                min_slack = s;
                ret = Some(*i);
            }
        }

        ret
    }

    fn suggest_to_exclude(&self, st: &QpState<L>) -> Option<usize>
    {
        let me = self.prob.me();

        let mut min_l = L::F::zero();
        let mut ret = None;

        for i in st.activator.included() {
            let v = st.l[me + i];
            if v < min_l && !self.par.tol_solution.is_zero(v) {
                min_l = v;
                ret = Some(i);
            }
        }

        ret
    }

    /// Decides whether to go on, updating the active set.
    ///
    /// Returns `false` with [`State::Optimal`] if no constraint is suggested to include or exclude.
    pub fn needs_another_iteration<O: Observer<L::F>>(&self, st: &mut QpState<L>, observer: &mut O) -> bool
    {
        if self.prob.mi() == 0 {
            st.set_state(State::Optimal, observer);
            return false;
        }

        let to_include = self.suggest_to_include(st);
        let to_exclude = if to_include.is_none() {
            self.suggest_to_exclude(st)
        }
        else {
            None
        };

        log::trace!("{}: include {:?} exclude {:?}", st.iterations, to_include, to_exclude);

        if let Some(e) = to_exclude {
            st.activator.exclude(e);
            st.l[self.prob.me() + e] = L::F::zero();
        }
        if let Some(i) = to_include {
            st.activator.include(i);
        }

        if to_include.is_none() && to_exclude.is_none() {
            st.set_state(State::Optimal, observer);
            false
        }
        else {
            st.set_state(State::Approximate, observer);
            true
        }
    }

    // solves the QP restricted to the active set, returning the new point and multipliers
    fn solve_subproblem(&self, st: &mut QpState<L>, included: &[usize]) -> Option<(Vec<L::F>, Vec<L::F>)>
    {
        let prob = self.prob;
        let n = prob.n();
        let f1 = L::F::one();

        let rows = self.constraints.count(prob, included);
        let mat_a = self.constraints.mat_a(prob, included);
        let vec_b = self.constraints.vec_b(prob, included);
        let vec_c = prob.vec_c();

        if rows < n && st.cholesky.is_solvable() {
            if rows == 0 {
                return Some((st.cholesky.solve_vec(vec_c.as_ref()), Vec::new()));
            }

            // negated Schur complement
            let inv_q_at = st.cholesky.solve(&mat_a.transpose());
            let schur = mat_a.mul(&inv_q_at);

            if st.lu.compute(&schur) {
                let inv_qc = match &st.inv_qc {
                    Some(v) => v.clone(),
                    None => st.cholesky.solve_vec(vec_c.as_ref()),
                };

                let mut rhs = vec_b.as_ref().to_vec();
                mat_a.op(f1, &inv_qc, -f1, &mut rhs);
                let l = st.lu.solve_vec(&rhs);

                let mut c_atl = vec_c.as_ref().to_vec();
                mat_a.trans_op(-f1, &l, f1, &mut c_atl);
                let x = st.cholesky.solve_vec(&c_atl);

                return Some((x, l));
            }
        }

        let (kkt, rhs) = kkt_system(prob.mat_q(), &mat_a, vec_c, &vec_b);

        if st.lu.compute(&kkt) {
            let mut xl = st.lu.solve_vec(rhs.as_ref());
            let l = xl.split_off(n);

            Some((xl, l))
        }
        else {
            log::debug!("{}: KKT system unsolvable", st.iterations);
            None
        }
    }

    /// Solves the QP restricted to the active set and steps towards its solution.
    ///
    /// An unsolvable subproblem is retried after [`ActiveSetCore::shrink`], at most `max_retry` times.
    pub fn perform_iteration<O: Observer<L::F>>(&self, st: &mut QpState<L>, observer: &mut O)
    {
        st.constraint_to_include = None;

        let mut retry = 0;

        loop {
            let included = st.activator.included();

            if let Some((x_new, l_new)) = self.solve_subproblem(st, &included) {
                self.take_step(st, &included, x_new, &l_new, observer);
                return;
            }

            if included.is_empty() {
                let to = if self.is_feasible(&st.x) {
                    State::Feasible
                }
                else {
                    State::Infeasible
                };
                st.set_state(to, observer);
                return;
            }

            if retry >= self.par.max_retry {
                log::warn!("Retry limit {} reached with {}", self.par.max_retry, st.activator);
                st.set_state(State::Failed, observer);
                return;
            }

            retry += 1;
            self.shrink(st);
        }
    }

    fn take_step<O: Observer<L::F>>(&self, st: &mut QpState<L>, included: &[usize], x_new: Vec<L::F>, l_new: &[L::F], observer: &mut O)
    {
        let prob = self.prob;
        let me = prob.me();
        let f0 = L::F::zero();
        let f1 = L::F::one();

        let mut dx = x_new;
        L::add(-f1, &st.x, &mut dx);

        let norm_x = L::norm(&st.x);
        let norm_dx = L::norm(&dx);

        if !self.par.tol_solution.is_small(norm_x, norm_dx) {
            let mut step = f1;

            let excluded = st.activator.excluded();
            if !excluded.is_empty() {
                let numer = prob.slack_i(&excluded, &st.x);
                let denom = prob.mat_ai().rows(&excluded).mul_vec(&dx);

                for (k, i) in excluded.iter().enumerate() {
                    let (nu, de) = (numer[k], denom[k]);

                    let val = if self.par.tol_slack.is_small(de, nu) {
                        f0
                    }
                    else {
                        nu / de
                    };

                    if de > f0 && val >= f0 && val < step && !self.par.tol_solution.is_small(norm_dx, de) {
                        step = val;
                        st.constraint_to_include = Some(*i);
                    }
                }
            }

            if step > f0 {
                L::add(step, &dx, &mut st.x);
            }

            log::trace!("{}: step {:.3e} to include {:?}", st.iterations, step, st.constraint_to_include);
            st.set_state(State::Approximate, observer);
        }
        else {
            st.set_state(State::Feasible, observer);
        }

        // no equality rows in IterationConstraints::Pure, where me is zero
        L::copy(&l_new[..me], &mut st.l[..me]);
        for v in st.l[me..].iter_mut() {
            *v = f0;
        }
        for (k, i) in included.iter().enumerate() {
            st.l[me + i] = l_new[me + k];
        }
    }
}

//

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::linalg::FloatGeneric;
    use crate::observer::NullObserver;
    use float_eq::assert_float_eq;

    type La = FloatGeneric<f64>;
    type AMatBuild = MatBuild<La>;

    fn q2() -> AMatBuild
    {
        AMatBuild::new(MatType::SymPack(2)).iter_rowmaj(&[
            2., 0.,
            0., 2.,
        ])
    }

    #[test]
    fn test_activeset_shrink_invariant()
    {
        let _ = env_logger::builder().is_test(true).try_init();

        // three inequalities tight at (1, 1)
        let ai = AMatBuild::new(MatType::General(3, 2)).iter_rowmaj(&[
            1., 0.,
            0., 1.,
            1., 1.,
        ]);
        let bi = AMatBuild::new_vec(vec![1., 1., 2.]);
        let qp = ProbQP::new(q2(), AMatBuild::new_vec(vec![2., 2.]), None, None, Some(ai), Some(bi));

        let core = ActiveSetCore::new(&qp, SolverParam::default());
        let mut st = core.new_state();
        core.validate(&mut st, &mut NullObserver).unwrap();
        core.initialise(&mut st, None, &mut NullObserver);

        assert_eq!(st.state, State::Feasible);
        assert_float_eq!(st.x.as_slice(), [1., 1.].as_ref(), abs_all <= 1e-9);
        assert!(qp.me() + st.activator.count_included() <= qp.n());
        assert_eq!(st.activator.count_included(), 2);

        core.shrink(&mut st);
        assert_eq!(st.activator.count_included(), 1);
        assert!(qp.me() + st.activator.count_included() <= qp.n());

        let rslt = core.solve(None, &mut NullObserver).unwrap();
        assert_eq!(rslt.state, State::Optimal);
        assert_float_eq!(rslt.x.as_slice(), [1., 1.].as_ref(), abs_all <= 1e-9);
    }

    #[test]
    fn test_activeset_multipliers_zero_on_excluded()
    {
        let _ = env_logger::builder().is_test(true).try_init();

        // x1 <= 2, x2 <= 2 both tight initially, both dropped at the optimum (1, 1)
        let ai = AMatBuild::new(MatType::General(2, 2)).iter_rowmaj(&[
            1., 0.,
            0., 1.,
        ]);
        let bi = AMatBuild::new_vec(vec![2., 2.]);
        let qp = ProbQP::new(q2(), AMatBuild::new_vec(vec![2., 2.]), None, None, Some(ai), Some(bi));

        let core = ActiveSetCore::new(&qp, SolverParam::default());
        let mut st = core.new_state();
        core.validate(&mut st, &mut NullObserver).unwrap();
        core.initialise(&mut st, None, &mut NullObserver);
        assert_eq!(st.activator.count_included(), 2);

        core.perform_iteration(&mut st, &mut NullObserver);
        assert_eq!(st.state, State::Feasible);
        assert_float_eq!(st.l.as_slice(), [-2., -2.].as_ref(), abs_all <= 1e-9);

        assert!(core.needs_another_iteration(&mut st, &mut NullObserver));
        assert_eq!(st.activator.included(), vec![1]);

        core.perform_iteration(&mut st, &mut NullObserver);
        assert_float_eq!(st.l[0], 0., abs <= 1e-12);
        assert_float_eq!(st.x.as_slice(), [1., 2.].as_ref(), abs_all <= 1e-9);
    }

    // Q = 0 and x1 <= 0, 2 x1 <= 0 both tight: every KKT system with an active row is singular
    fn singular_qp() -> ProbQP<La>
    {
        let ai = AMatBuild::new(MatType::General(2, 2)).iter_rowmaj(&[
            1., 0.,
            2., 0.,
        ]);
        let bi = AMatBuild::new_vec(vec![0., 0.]);

        ProbQP::new(AMatBuild::new(MatType::General(2, 2)), AMatBuild::new_vec(vec![1., 0.]), None, None, Some(ai), Some(bi))
    }

    #[test]
    fn test_activeset_retry_limit()
    {
        let _ = env_logger::builder().is_test(true).try_init();

        let qp = singular_qp();

        let mut par = SolverParam::default();
        par.max_retry = 0;

        let core = ActiveSetCore::new(&qp, par);
        let mut st = core.new_state();
        core.validate(&mut st, &mut NullObserver).unwrap();
        core.initialise(&mut st, None, &mut NullObserver);
        assert_eq!(st.state, State::Feasible);
        assert_eq!(st.activator.count_included(), 2);

        core.perform_iteration(&mut st, &mut NullObserver);
        assert_eq!(st.state, State::Failed);
        assert_eq!(st.activator.count_included(), 2);
    }

    #[test]
    fn test_activeset_shrink_to_empty()
    {
        let _ = env_logger::builder().is_test(true).try_init();

        let qp = singular_qp();

        let core = ActiveSetCore::new(&qp, SolverParam::default());
        let mut st = core.new_state();
        core.validate(&mut st, &mut NullObserver).unwrap();
        core.initialise(&mut st, None, &mut NullObserver);

        // unsolvable even with no active row, so only the feasibility of x is judged
        core.perform_iteration(&mut st, &mut NullObserver);
        assert_eq!(st.state, State::Feasible);
        assert_eq!(st.activator.count_included(), 0);
        assert_float_eq!(st.l.as_slice(), [0., 0.].as_ref(), abs_all <= 1e-12);

        assert!(!core.needs_another_iteration(&mut st, &mut NullObserver));
        assert_eq!(st.state, State::Optimal);
        assert_float_eq!(st.x.as_slice(), [0., 0.].as_ref(), abs_all <= 1e-9);
    }
}
