//! Two-phase primal simplex method

use num_traits::{Float, Zero, One};
use core::fmt::{Debug, LowerExp};
use crate::linalg::LinAlgEx;
use crate::matbuild::{MatBuild, MatType};
use crate::activator::Activator;
use crate::param::SolverParam;
use crate::state::{State, Solution};
use crate::observer::Observer;

//

/// Phase of the simplex method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase
{
    /// Drives artificial variables out of the basis.
    One,
    /// Minimizes the true cost.
    Two,
}

//

/// Negates the rows whose right-hand side is negative.
///
/// Returns flags of the negated rows.
/// * `mat_a` is a constraint matrix \\(A\\).
/// * `vec_b` is a right-hand side \\(b\\), non-negative on exit.
pub fn nonneg_rhs<L: LinAlgEx>(mat_a: &mut MatBuild<L>, vec_b: &mut MatBuild<L>) -> Vec<bool>
{
    let (m, _) = mat_a.size();
    assert_eq!(vec_b.size(), (m, 1));

    let f0 = L::F::zero();
    let f1 = L::F::one();

    (0.. m).map(|r| {
        if vec_b[(r, 0)] < f0 {
            mat_a.set_scale_row(r, -f1);
            vec_b[(r, 0)] = -vec_b[(r, 0)];
            true
        }
        else {
            false
        }
    }).collect()
}

//

/// Dense simplex tableau.
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Solves a linear program in standard form:
/// \\[
/// \begin{array}{ll}
/// {\rm minimize} & c^T x \\\\
/// {\rm subject \ to} & A x = b \\\\
/// & x \ge 0,
/// \end{array}
/// \\]
/// where \\(b \ge 0\\).
/// One artificial variable per row makes the initial basis;
/// Phase 1 drives them out, then Phase 2 minimizes the cost.
///
/// The tableau has `m + 2` rows and `n + m + 1` columns:
/// constraint rows, the Phase-2 objective row, the Phase-1 objective row,
/// and structural columns, artificial columns and the right-hand side column.
pub struct SimplexTableau<L: LinAlgEx>
{
    par: SolverParam<L::F>,

    n: usize,
    m: usize,
    tableau: MatBuild<L>,
    basis: Vec<isize>,
    activator: Activator,

    phase: Phase,
    state: State,
    iterations: usize,
}

impl<L: LinAlgEx> SimplexTableau<L>
{
    /// Creates an instance.
    ///
    /// * `mat_a` is \\(A\\), `m` by `n`.
    /// * `vec_b` is \\(b\\), shall be non-negative (see [`nonneg_rhs`]).
    /// * `vec_c` is \\(c\\).
    /// * `par` is solver parameters.
    pub fn new(mat_a: &MatBuild<L>, vec_b: &MatBuild<L>, vec_c: &MatBuild<L>, par: SolverParam<L::F>) -> Self
    {
        let (m, n) = mat_a.size();
        assert_eq!(vec_b.size(), (m, 1));
        assert_eq!(vec_c.size(), (n, 1));

        let f0 = L::F::zero();
        let f1 = L::F::one();
        let rhs = n + m;
        let row_p2 = m;
        let row_p1 = m + 1;

        let mut tableau = MatBuild::new(MatType::General(m + 2, n + m + 1));

        for r in 0.. m {
            debug_assert!(vec_b[(r, 0)] >= f0);

            for c in 0.. n {
                let a = mat_a[(r, c)];
                tableau[(r, c)] = a;
                tableau[(row_p1, c)] = tableau[(row_p1, c)] - a;
            }
            tableau[(r, n + r)] = f1;

            let b = vec_b[(r, 0)];
            tableau[(r, rhs)] = b;
            tableau[(row_p1, rhs)] = tableau[(row_p1, rhs)] - b;
        }

        for c in 0.. n {
            tableau[(row_p2, c)] = vec_c[(c, 0)];
        }

        SimplexTableau {
            par,
            n, m,
            tableau,
            basis: (0.. m).map(|r| r as isize - m as isize).collect(),
            activator: Activator::new(n),
            phase: Phase::One,
            state: State::Valid,
            iterations: 0,
        }
    }

    fn col_rhs(&self) -> usize
    {
        self.n + self.m
    }

    fn row_objective(&self) -> usize
    {
        match self.phase {
            Phase::One => self.m + 1,
            Phase::Two => self.m,
        }
    }

    fn set_state<O: Observer<L::F>>(&mut self, to: State, observer: &mut O)
    {
        if self.state != to {
            observer.state_changed(self.state, to);
            self.state = to;
        }
    }

    fn is_basic_artificials(&self) -> bool
    {
        self.basis.iter().any(|b| *b < 0)
    }

    /// Current phase.
    pub fn phase(&self) -> Phase
    {
        self.phase
    }

    /// Current state.
    pub fn state(&self) -> State
    {
        self.state
    }

    /// Row to column mapping of basic variables.
    ///
    /// Negative entries denote artificial variables.
    pub fn basis(&self) -> &[isize]
    {
        &self.basis
    }

    /// Objective value of the current phase at the current basic solution.
    pub fn objective(&self) -> L::F
    {
        -self.tableau[(self.row_objective(), self.col_rhs())]
    }

    /// Objective value of Phase 1, the sum of the artificial variables.
    pub fn phase1_objective(&self) -> L::F
    {
        -self.tableau[(self.m + 1, self.col_rhs())]
    }

    /// Values of the structural variables at the current basic solution.
    pub fn extract_solution(&self) -> Vec<L::F>
    {
        let mut x = vec![L::F::zero(); self.n];

        for (r, b) in self.basis.iter().enumerate() {
            if *b >= 0 {
                x[*b as usize] = self.tableau[(r, self.col_rhs())];
            }
        }

        x
    }

    /// Dual variables of the constraint rows.
    pub fn dual_variables(&self) -> Vec<L::F>
    {
        (0.. self.m).map(|j| -self.tableau[(self.m, self.n + j)]).collect()
    }

    /// Reduced costs of the structural variables in the Phase-2 objective.
    pub fn residual_costs(&self) -> Vec<L::F>
    {
        (0.. self.n).map(|j| self.tableau[(self.m, j)]).collect()
    }

    /// Finds an entering column.
    ///
    /// Returns the excluded column of the most negative reduced cost
    /// below zero in Phase 1, or below `-eps_pivot` in Phase 2.
    pub fn find_next_pivot_col(&self) -> Option<usize>
    {
        let row = self.row_objective();

        let mut min_val = match self.phase {
            Phase::One => L::F::zero(),
            Phase::Two => -self.par.eps_pivot,
        };
        let mut ret = None;

        for c in self.activator.excluded() {
            let val = self.tableau[(row, c)];
            if val < min_val {
                min_val = val;
                ret = Some(c);
            }
        }

        ret
    }

    /// Finds a leaving row by the minimum ratio test.
    ///
    /// In Phase 2, a row whose basic variable is still artificial is picked with a tiny ratio
    /// if its right-hand side is negligible compared to its entry, whatever the sign of the entry,
    /// so that the artificial leaves the basis.
    pub fn find_next_pivot_row(&self, col: usize) -> Option<usize>
    {
        let f0 = L::F::zero();
        let tol = &self.par.tol_problem;
        let rhs = self.col_rhs();

        let mut min_ratio = L::F::max_value();
        let mut ret = None;

        for r in 0.. self.m {
            let special = self.phase == Phase::Two && self.basis[r] < 0;

            let denom = self.tableau[(r, col)];
            // non-negative in theory, but tiny values may get negative
            let numer = self.tableau[(r, rhs)].abs();

            let ratio = if tol.is_small(numer, denom) {
                L::F::max_value()
            }
            else if special {
                if tol.is_small(denom, numer) {
                    L::F::epsilon()
                }
                else {
                    L::F::max_value()
                }
            }
            else {
                numer / denom
            };

            if (special || denom > f0) && ratio >= f0 && ratio < min_ratio {
                min_ratio = ratio;
                ret = Some(r);
            }
        }

        ret
    }

    /// Decides the next pivot, switching the phase if Phase 1 is done.
    ///
    /// Returns `None` with a terminal state set if no more pivots are possible.
    fn needs_another_iteration<O: Observer<L::F>>(&mut self, observer: &mut O) -> Option<(usize, usize)>
    {
        if self.phase == Phase::One {
            let val = self.phase1_objective();

            if !self.is_basic_artificials() || self.par.tol_objective.is_zero(val) {
                log::debug!("Phase 2 with {} artificial(s) in the basis", self.basis.iter().filter(|b| **b < 0).count());

                self.phase = Phase::Two;
                self.set_state(State::Feasible, observer);
            }
        }

        match self.find_next_pivot_col() {
            Some(col) => {
                match self.find_next_pivot_row(col) {
                    Some(row) => Some((row, col)),
                    None => {
                        match self.phase {
                            Phase::One => self.set_state(State::Infeasible, observer),
                            Phase::Two => self.set_state(State::Unbounded, observer),
                        }
                        None
                    },
                }
            },
            None => {
                match self.phase {
                    Phase::One => self.set_state(State::Infeasible, observer),
                    Phase::Two => self.set_state(State::Optimal, observer),
                }
                None
            },
        }
    }

    /// Pivots on `(row, col)` by Gauss-Jordan elimination.
    ///
    /// All rows including both objective rows and the right-hand side column are eliminated.
    /// The leaving column is excluded and the entering one included.
    pub fn perform_iteration(&mut self, row: usize, col: usize)
    {
        let (nr, nc) = self.tableau.size();
        let t = &mut self.tableau;

        let pivot = t[(row, col)];
        t.set_scale_row(row, pivot.recip());
        t[(row, col)] = L::F::one();

        for r in 0.. nr {
            if r != row {
                let f = t[(r, col)];
                if !f.is_zero() {
                    for c in 0.. nc {
                        t[(r, c)] = t[(r, c)] - f * t[(row, c)];
                    }
                    t[(r, col)] = L::F::zero();
                }
            }
        }

        let old = self.basis[row];
        if old >= 0 {
            self.activator.exclude(old as usize);
        }
        self.activator.include(col);
        self.basis[row] = col as isize;
    }

    fn solution(&self) -> Solution<L::F>
    {
        let value = -self.tableau[(self.m, self.col_rhs())];

        Solution {
            state: self.state,
            x: self.extract_solution(),
            multipliers: Some(self.dual_variables()),
            value,
            iterations: self.iterations,
        }
    }
}

impl<L: LinAlgEx> SimplexTableau<L>
where L::F: Float + Debug + LowerExp
{
    /// Pivots until optimal, infeasible, unbounded or `max_iter`.
    ///
    /// Reaching `max_iter` in Phase 1 leaves the state [`State::Failed`].
    ///
    /// Returns the [`Solution`] of the structural variables,
    /// the dual variables of the constraint rows as multipliers,
    /// and the Phase-2 objective value.
    /// * `observer` is invoked before each iteration, after each pivot and on state transitions.
    pub fn solve<O: Observer<L::F>>(&mut self, observer: &mut O) -> Solution<L::F>
    {
        log::debug!("simplex: {} constraints, {} variables", self.m, self.n);
        log::trace!("tableau: {:?}", self.tableau);

        loop {
            observer.pre_iteration(self.iterations, self.state);

            // phase switch and termination are detected even at the iteration limit
            let (row, col) = match self.needs_another_iteration(observer) {
                Some(p) => p,
                None => break,
            };

            if self.iterations >= self.par.max_iter {
                log::warn!("----- ExcessIter");

                // no feasible basis is known yet
                if self.phase == Phase::One {
                    self.set_state(State::Failed, observer);
                }
                break;
            }

            let phase = self.phase;
            self.perform_iteration(row, col);
            self.iterations += 1;

            if phase == Phase::Two {
                self.set_state(State::Approximate, observer);
            }

            observer.post_pivot(phase, row, col, &self.basis, self.objective());
        }

        log::debug!("simplex: {} after {} pivots, objective {:.3e}", self.state, self.iterations, self.objective());

        self.solution()
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

    struct Recorder
    {
        pivots: Vec<(Phase, Vec<isize>, f64)>,
    }

    impl Observer<f64> for Recorder
    {
        fn post_pivot(&mut self, phase: Phase, _row: usize, _col: usize, basis: &[isize], objective: f64)
        {
            self.pivots.push((phase, basis.to_vec(), objective));
        }
    }

    // minimize -x1 - x2 s.t. x1 + x2 + s1 = 4, x1 + s2 = 3, x2 + s3 = 3
    fn box_lp() -> SimplexTableau<La>
    {
        let a = AMatBuild::new(MatType::General(3, 5)).iter_rowmaj(&[
            1., 1., 1., 0., 0.,
            1., 0., 0., 1., 0.,
            0., 1., 0., 0., 1.,
        ]);
        let b = AMatBuild::new_vec(vec![4., 3., 3.]);
        let c = AMatBuild::new_vec(vec![-1., -1., 0., 0., 0.]);

        SimplexTableau::new(&a, &b, &c, SolverParam::default())
    }

    #[test]
    fn test_simplex1()
    {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut t = box_lp();
        let rslt = t.solve(&mut NullObserver);

        assert_eq!(rslt.state, State::Optimal);
        assert_float_eq!(rslt.value, -4., abs <= 1e-9);
        assert_float_eq!(rslt.x[0] + rslt.x[1], 4., abs <= 1e-9);
        assert!(rslt.x[0] <= 3. + 1e-9 && rslt.x[1] <= 3. + 1e-9);
        assert_float_eq!(t.residual_costs()[0], 0., abs <= 1e-9);
        assert_float_eq!(t.residual_costs()[1], 0., abs <= 1e-9);
    }

    #[test]
    fn test_simplex_basis_injective()
    {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut t = box_lp();
        let mut rec = Recorder {pivots: Vec::new()};
        t.solve(&mut rec);

        assert!(!rec.pivots.is_empty());
        for (_, basis, _) in rec.pivots.iter() {
            for i in 0.. basis.len() {
                for j in i + 1.. basis.len() {
                    assert_ne!(basis[i], basis[j]);
                }
            }
        }
    }

    #[test]
    fn test_simplex_phase1_zero()
    {
        let _ = env_logger::builder().is_test(true).try_init();

        // minimize x1 + 2 x2 s.t. x1 + x2 = 2, x1 - x2 + s = 1
        let a = AMatBuild::new(MatType::General(2, 3)).iter_rowmaj(&[
            1., 1., 0.,
            1., -1., 1.,
        ]);
        let b = AMatBuild::new_vec(vec![2., 1.]);
        let c = AMatBuild::new_vec(vec![1., 2., 0.]);

        let mut t = SimplexTableau::new(&a, &b, &c, SolverParam::default());
        assert_float_eq!(t.phase1_objective(), 3., abs <= 1e-12);

        let mut rec = Recorder {pivots: Vec::new()};
        let rslt = t.solve(&mut rec);
        assert_eq!(rslt.state, State::Optimal);

        // every Phase-2 pivot follows a zero Phase-1 objective
        let mut last_p1 = 3.;
        for (phase, _, obj) in rec.pivots.iter() {
            match phase {
                Phase::One => last_p1 = *obj,
                Phase::Two => assert_float_eq!(last_p1, 0., abs <= 1e-9),
            }
        }
        assert_float_eq!(t.phase1_objective(), 0., abs <= 1e-9);

        // x1 = 2, x2 = 0 with s = -1 is infeasible; optimum at x1 = 1.5, x2 = 0.5
        assert_float_eq!(rslt.x[0..2], [1.5, 0.5].as_ref(), abs_all <= 1e-9);
        assert_float_eq!(rslt.value, 2.5, abs <= 1e-9);
    }

    #[test]
    fn test_simplex_infeasible()
    {
        let _ = env_logger::builder().is_test(true).try_init();

        // x1 = 5 and x1 = 6
        let a = AMatBuild::new(MatType::General(2, 1)).iter_rowmaj(&[
            1.,
            1.,
        ]);
        let b = AMatBuild::new_vec(vec![5., 6.]);
        let c = AMatBuild::new_vec(vec![1.]);

        let mut t = SimplexTableau::new(&a, &b, &c, SolverParam::default());
        let rslt = t.solve(&mut NullObserver);

        assert_eq!(rslt.state, State::Infeasible);
        assert_eq!(t.phase(), Phase::One);
        assert!(t.phase1_objective() > 0.5);
    }

    #[test]
    fn test_simplex_excess_iter_phase1()
    {
        let _ = env_logger::builder().is_test(true).try_init();

        // three artificials in the basis cannot all leave in one pivot
        let a = AMatBuild::new(MatType::General(3, 5)).iter_rowmaj(&[
            1., 1., 1., 0., 0.,
            1., 0., 0., 1., 0.,
            0., 1., 0., 0., 1.,
        ]);
        let b = AMatBuild::new_vec(vec![4., 3., 3.]);
        let c = AMatBuild::new_vec(vec![-1., -1., 0., 0., 0.]);

        let mut par = SolverParam::default();
        par.max_iter = 1;

        let mut t = SimplexTableau::<La>::new(&a, &b, &c, par);
        let rslt = t.solve(&mut NullObserver);

        assert_eq!(rslt.state, State::Failed);
        assert!(rslt.state.is_failure());
        assert_eq!(rslt.iterations, 1);
        assert_eq!(t.phase(), Phase::One);
    }

    #[test]
    fn test_nonneg_rhs()
    {
        let mut a = AMatBuild::new(MatType::General(2, 2)).iter_rowmaj(&[
            1., 2.,
            3., 4.,
        ]);
        let mut b = AMatBuild::new_vec(vec![1., -2.]);

        let flips = nonneg_rhs(&mut a, &mut b);

        assert_eq!(flips, vec![false, true]);
        assert_float_eq!(b.as_ref(), [1., 2.].as_ref(), abs_all <= 1e-12);
        assert_float_eq!(a.as_ref(), [1., -3., 2., -4.].as_ref(), abs_all <= 1e-12);
    }
}
