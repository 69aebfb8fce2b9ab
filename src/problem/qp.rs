use num_traits::{Zero, One};
use crate::linalg::LinAlgEx;
use crate::matbuild::{MatBuild, MatType};
use crate::factor;
use crate::solver_error::SolverError;
use super::check_pair;

//

/// Quadratic program
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// The problem is
/// \\[
/// \begin{array}{ll}
/// {\rm minimize} & {1 \over 2} x^T Q x - c^T x \\\\
/// {\rm subject \ to} & A_E x = b_E \\\\
/// & A_I x \le b_I,
/// \end{array}
/// \\]
/// where
/// - variables \\( x \in \mathbb{R}^n \\)
/// - \\( Q \in \mathcal{S}_{+}^n \\), symmetric positive semidefinite
/// - \\( c \in \mathbb{R}^n \\)
/// - \\( A_E \in \mathbb{R}^{m_E \times n},\ b_E \in \mathbb{R}^{m_E} \\), optional
/// - \\( A_I \in \mathbb{R}^{m_I \times n},\ b_I \in \mathbb{R}^{m_I} \\), optional.
///
/// \\(A_E\\) shall be of full row rank.
/// The objective shall be bounded below on the feasible set;
/// if \\(Q\\) is singular this is not checked.
pub struct ProbQP<L: LinAlgEx>
{
    mat_q: MatBuild<L>,
    vec_c: MatBuild<L>,
    mat_ae: MatBuild<L>,
    vec_be: MatBuild<L>,
    mat_ai: MatBuild<L>,
    vec_bi: MatBuild<L>,

    data_err: Option<SolverError>,
}

impl<L: LinAlgEx> ProbQP<L>
{
    /// Creates a QP with given data.
    ///
    /// Returns a [`ProbQP`] instance.
    /// * `mat_q` is \\(Q\\), either [`MatType::General`] or [`MatType::SymPack`].
    /// * `vec_c` is \\(c\\).
    /// * `mat_ae` is \\(A_E\\).
    /// * `vec_be` is \\(b_E\\).
    /// * `mat_ai` is \\(A_I\\).
    /// * `vec_bi` is \\(b_I\\).
    pub fn new(
        mat_q: MatBuild<L>, vec_c: MatBuild<L>,
        mat_ae: Option<MatBuild<L>>, vec_be: Option<MatBuild<L>>,
        mat_ai: Option<MatBuild<L>>, vec_bi: Option<MatBuild<L>>) -> Self
    {
        let n = vec_c.size().0;

        let data_err = check_pair("e", n, mat_ae.as_ref(), vec_be.as_ref())
            .and(check_pair("i", n, mat_ai.as_ref(), vec_bi.as_ref()))
            .err();

        let empty_mat = || MatBuild::new(MatType::General(0, n));
        let empty_vec = || MatBuild::new(MatType::General(0, 1));

        ProbQP {
            mat_q,
            vec_c,
            mat_ae: mat_ae.unwrap_or_else(empty_mat),
            vec_be: vec_be.unwrap_or_else(empty_vec),
            mat_ai: mat_ai.unwrap_or_else(empty_mat),
            vec_bi: vec_bi.unwrap_or_else(empty_vec),
            data_err,
        }
    }

    /// Number of variables \\(n\\).
    pub fn n(&self) -> usize
    {
        self.vec_c.size().0
    }

    /// Number of equality constraints \\(m_E\\).
    pub fn me(&self) -> usize
    {
        self.mat_ae.size().0
    }

    /// Number of inequality constraints \\(m_I\\).
    pub fn mi(&self) -> usize
    {
        self.mat_ai.size().0
    }

    pub fn mat_q(&self) -> &MatBuild<L>
    {
        &self.mat_q
    }

    pub fn vec_c(&self) -> &MatBuild<L>
    {
        &self.vec_c
    }

    /// \\(A_E\\), no rows if absent.
    pub fn mat_ae(&self) -> &MatBuild<L>
    {
        &self.mat_ae
    }

    /// \\(b_E\\), no rows if absent.
    pub fn vec_be(&self) -> &MatBuild<L>
    {
        &self.vec_be
    }

    /// \\(A_I\\), no rows if absent.
    pub fn mat_ai(&self) -> &MatBuild<L>
    {
        &self.mat_ai
    }

    /// \\(b_I\\), no rows if absent.
    pub fn vec_bi(&self) -> &MatBuild<L>
    {
        &self.vec_bi
    }

    /// Checks consistency of the problem data.
    ///
    /// Returns [`SolverError`] if
    /// a constraint matrix and its right-hand side are not given together,
    /// sizes are inconsistent,
    /// or \\(A_E\\) is not of full row rank.
    /// * `eps_zero` is a threshold of the rank computation.
    pub fn check(&self, eps_zero: L::F) -> Result<(), SolverError>
    {
        if let Some(e) = self.data_err {
            return Err(e);
        }

        let n = self.n();

        if self.mat_q.size() != (n, n) || self.vec_c.size() != (n, 1) {
            log::error!("Size mismatch: mat_q{:?}, vec_c{:?}", self.mat_q.size(), self.vec_c.size());
            return Err(SolverError::InvalidOp);
        }

        let me = self.me();
        if me > 0 {
            let rank = factor::rank(&self.mat_ae, eps_zero);
            if rank != me {
                log::error!("Rank of mat_ae {} must be {}", rank, me);
                return Err(SolverError::RankDeficient);
            }
        }

        Ok(())
    }

    /// Objective value \\({1 \over 2} x^T Q x - c^T x\\).
    pub fn objective(&self, x: &[L::F]) -> L::F
    {
        let f1 = L::F::one();
        let half = f1 / (f1 + f1);

        let qx = self.mat_q.mul_vec(x);

        half * L::dot(x, &qx) - L::dot(self.vec_c.as_ref(), x)
    }

    /// Slacks \\(b_I - A_I x\\) of selected inequality constraints.
    pub fn slack_i(&self, rows: &[usize], x: &[L::F]) -> Vec<L::F>
    {
        let ax = self.mat_ai.rows(rows).mul_vec(x);

        rows.iter().zip(ax).map(|(r, v)| self.vec_bi[(*r, 0)] - v).collect()
    }

    /// Checks if `x` satisfies all constraints.
    ///
    /// * `is_same` decides if a constraint body equals its bound.
    pub fn is_feasible<P>(&self, x: &[L::F], is_same: P) -> bool
    where P: Fn(L::F, L::F) -> bool
    {
        let aex = self.mat_ae.mul_vec(x);
        let eq_ok = aex.iter().enumerate().all(|(r, v)| is_same(self.vec_be[(r, 0)], *v));

        let aix = self.mat_ai.mul_vec(x);
        let ineq_ok = aix.iter().enumerate().all(|(r, v)| {
            let b = self.vec_bi[(r, 0)];
            *v <= b || is_same(b, *v)
        });

        eq_ok && ineq_ok
    }

    /// Checks if there is any constraint.
    pub fn is_constrained(&self) -> bool
    {
        self.me() + self.mi() > 0
    }

    /// Gradient \\(Q x - c\\).
    pub fn gradient(&self, x: &[L::F]) -> Vec<L::F>
    {
        let mut g = self.mat_q.mul_vec(x);
        L::add(-L::F::one(), self.vec_c.as_ref(), &mut g);
        g
    }

    /// Zero vector of length \\(n\\).
    pub fn zeros(&self) -> Vec<L::F>
    {
        vec![L::F::zero(); self.n()]
    }
}

//

#[test]
fn test_probqp1()
{
    use float_eq::assert_float_eq;
    use crate::linalg::FloatGeneric;

    type L = FloatGeneric<f64>;

    let q = MatBuild::<L>::new(MatType::SymPack(2)).iter_rowmaj(&[
        2., 0.,
        0., 2.,
    ]);
    let c = MatBuild::<L>::new_vec(vec![2., 2.]);
    let ai = MatBuild::<L>::new(MatType::General(1, 2)).iter_rowmaj(&[1., 1.]);
    let bi = MatBuild::<L>::new_vec(vec![1.]);

    let qp = ProbQP::new(q, c, None, None, Some(ai), Some(bi));
    assert_eq!(qp.check(1e-12), Ok(()));
    assert_eq!((qp.n(), qp.me(), qp.mi()), (2, 0, 1));

    assert_float_eq!(qp.objective(&[1., 1.]), -2., abs <= 1e-12);
    assert_float_eq!(qp.gradient(&[1., 0.]).as_slice(), [0., -2.].as_ref(), abs_all <= 1e-12);
    assert_float_eq!(qp.slack_i(&[0], &[0.25, 0.25]).as_slice(), [0.5].as_ref(), abs_all <= 1e-12);

    assert!(qp.is_feasible(&[0.5, 0.5], |a, b| (a - b).abs() < 1e-9));
    assert!(!qp.is_feasible(&[1., 1.], |a, b| (a - b).abs() < 1e-9));
}
