use num_traits::{Zero, One};
use crate::linalg::LinAlgEx;
use crate::matbuild::{MatBuild, MatType};
use crate::solver_error::SolverError;
use super::check_pair;

//

/// Linear program
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// The problem is
/// \\[
/// \begin{array}{ll}
/// {\rm minimize} & c^T x \\\\
/// {\rm subject \ to} & A_E x = b_E \\\\
/// & A_I x \le b_I \\\\
/// & x \ge 0,
/// \end{array}
/// \\]
/// where
/// - variables \\( x \in \mathbb{R}^n \\)
/// - \\( c \in \mathbb{R}^n \\)
/// - \\( A_E \in \mathbb{R}^{m_E \times n},\ b_E \in \mathbb{R}^{m_E} \\), optional
/// - \\( A_I \in \mathbb{R}^{m_I \times n},\ b_I \in \mathbb{R}^{m_I} \\), optional.
///
/// The standard form fed to [`crate::simplex::SimplexTableau`] adds a slack \\(s \ge 0\\) per inequality:
/// \\[
/// \left[ \begin{array}{cc}
/// A_E & 0 \\\\
/// A_I & I
/// \end{array} \right]
/// \left[ \begin{array}{c}
/// x \\\\
/// s
/// \end{array} \right] =
/// \left[ \begin{array}{c}
/// b_E \\\\
/// b_I
/// \end{array} \right].
/// \\]
pub struct ProbLP<L: LinAlgEx>
{
    vec_c: MatBuild<L>,
    mat_ae: Option<MatBuild<L>>,
    vec_be: Option<MatBuild<L>>,
    mat_ai: Option<MatBuild<L>>,
    vec_bi: Option<MatBuild<L>>,
}

impl<L: LinAlgEx> ProbLP<L>
{
    /// Creates a LP with given data.
    ///
    /// Returns a [`ProbLP`] instance.
    /// * `vec_c` is \\(c\\).
    /// * `mat_ae` is \\(A_E\\).
    /// * `vec_be` is \\(b_E\\).
    /// * `mat_ai` is \\(A_I\\).
    /// * `vec_bi` is \\(b_I\\).
    pub fn new(
        vec_c: MatBuild<L>,
        mat_ae: Option<MatBuild<L>>, vec_be: Option<MatBuild<L>>,
        mat_ai: Option<MatBuild<L>>, vec_bi: Option<MatBuild<L>>) -> Self
    {
        ProbLP {
            vec_c,
            mat_ae, vec_be,
            mat_ai, vec_bi,
        }
    }

    /// Number of variables \\(n\\).
    pub fn n(&self) -> usize
    {
        self.vec_c.size().0
    }

    /// Checks consistency of the problem data.
    ///
    /// Returns a tuple of \\(m_E\\) and \\(m_I\\), or [`SolverError`].
    pub fn check(&self) -> Result<(usize, usize), SolverError>
    {
        let n = self.n();

        if self.vec_c.size() != (n, 1) {
            log::error!("Size mismatch: vec_c{:?}", self.vec_c.size());
            return Err(SolverError::InvalidOp);
        }

        let me = check_pair("e", n, self.mat_ae.as_ref(), self.vec_be.as_ref())?;
        let mi = check_pair("i", n, self.mat_ai.as_ref(), self.vec_bi.as_ref())?;

        Ok((me, mi))
    }

    /// Standard form of the problem.
    ///
    /// Returns a tuple of the constraint matrix, the right-hand side and the cost
    /// over `n + mi` variables.
    pub fn standard_form(&self) -> Result<(MatBuild<L>, MatBuild<L>, MatBuild<L>), SolverError>
    {
        let (me, mi) = self.check()?;
        let n = self.n();

        let f0 = L::F::zero();
        let f1 = L::F::one();

        let mat_a = MatBuild::new(MatType::General(me + mi, n + mi)).by_fn(|r, c| {
            if r < me {
                match &self.mat_ae {
                    Some(ae) if c < n => ae[(r, c)],
                    _ => f0,
                }
            }
            else if c < n {
                match &self.mat_ai {
                    Some(ai) => ai[(r - me, c)],
                    None => f0,
                }
            }
            else if c - n == r - me {
                f1
            }
            else {
                f0
            }
        });

        let vec_b = MatBuild::new(MatType::General(me + mi, 1)).by_fn(|r, _| {
            if r < me {
                self.vec_be.as_ref().map_or(f0, |be| be[(r, 0)])
            }
            else {
                self.vec_bi.as_ref().map_or(f0, |bi| bi[(r - me, 0)])
            }
        });

        let vec_c = MatBuild::new(MatType::General(n + mi, 1)).by_fn(|r, _| {
            if r < n {
                self.vec_c[(r, 0)]
            }
            else {
                f0
            }
        });

        Ok((mat_a, vec_b, vec_c))
    }
}

//

#[test]
fn test_problp1()
{
    use float_eq::assert_float_eq;
    use crate::linalg::FloatGeneric;

    type L = FloatGeneric<f64>;

    let c = MatBuild::<L>::new_vec(vec![1., 2.]);
    let ae = MatBuild::<L>::new(MatType::General(1, 2)).iter_rowmaj(&[3., 4.]);
    let be = MatBuild::<L>::new_vec(vec![5.]);
    let ai = MatBuild::<L>::new(MatType::General(1, 2)).iter_rowmaj(&[6., 7.]);
    let bi = MatBuild::<L>::new_vec(vec![8.]);

    let lp = ProbLP::new(c, Some(ae), Some(be), Some(ai), Some(bi));
    assert_eq!(lp.check(), Ok((1, 1)));

    let (a, b, c) = lp.standard_form().unwrap();
    let ref_a = MatBuild::<L>::new(MatType::General(2, 3)).iter_rowmaj(&[
        3., 4., 0.,
        6., 7., 1.,
    ]);
    assert_float_eq!(a.as_ref(), ref_a.as_ref(), abs_all <= 1e-12);
    assert_float_eq!(b.as_ref(), [5., 8.].as_ref(), abs_all <= 1e-12);
    assert_float_eq!(c.as_ref(), [1., 2., 0.].as_ref(), abs_all <= 1e-12);

    let lp = ProbLP::<L>::new(MatBuild::new_vec(vec![1.]), None, Some(MatBuild::new_vec(vec![1.])), None, None);
    assert_eq!(lp.check(), Err(SolverError::MissingPair));
}
