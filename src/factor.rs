//! Matrix factorizations

use num_traits::Zero;
use crate::linalg::LinAlgEx;
use crate::matbuild::MatBuild;
#[cfg(test)]
use crate::matbuild::MatType;

//

/// Cholesky factorization \\(Q = L L^T\\) of a symmetric positive definite matrix.
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
#[derive(Debug, Clone)]
pub struct Cholesky<L: LinAlgEx>
{
    n: usize,
    factor: Vec<L::F>,
    solvable: bool,
    eps_zero: L::F,
}

impl<L: LinAlgEx> Cholesky<L>
{
    /// Creates an instance, not yet computed.
    ///
    /// * `eps_zero` is a threshold below which a pivot is regarded as non-positive.
    pub fn new(eps_zero: L::F) -> Self
    {
        Cholesky {
            n: 0,
            factor: Vec::new(),
            solvable: false,
            eps_zero,
        }
    }

    /// Decomposes a square matrix.
    ///
    /// Returns `true` if decomposed, `false` if not positive definite.
    pub fn compute(&mut self, mat: &MatBuild<L>) -> bool
    {
        let (nr, nc) = mat.size();
        assert_eq!(nr, nc);

        let g = mat.to_general();

        self.n = nr;
        self.factor.clear();
        self.factor.extend_from_slice(g.as_ref());
        self.solvable = L::chol_decomp(self.n, &mut self.factor, self.eps_zero);

        self.solvable
    }

    /// Checks if the last [`Cholesky::compute`] succeeded.
    pub fn is_solvable(&self) -> bool
    {
        self.solvable
    }

    /// Solves \\(Q X = B\\).
    ///
    /// Returns \\(X\\) as a [`MatType::General`](crate::matbuild::MatType::General) matrix.
    /// Shall be called only if [`Cholesky::is_solvable`].
    pub fn solve(&self, rhs: &MatBuild<L>) -> MatBuild<L>
    {
        assert!(self.solvable);

        let mut x = rhs.to_general();
        let (nr, nc) = x.size();
        assert_eq!(nr, self.n);

        L::chol_solve(self.n, &self.factor, nc, x.as_mut());
        x
    }

    /// Solves \\(Q x = b\\) for a vector.
    pub fn solve_vec(&self, b: &[L::F]) -> Vec<L::F>
    {
        assert!(self.solvable);
        assert_eq!(b.len(), self.n);

        let mut x = b.to_vec();
        L::chol_solve(self.n, &self.factor, 1, &mut x);
        x
    }
}

//

/// LU factorization \\(P G = L U\\) with partial pivoting of a square matrix.
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
#[derive(Debug, Clone)]
pub struct LU<L: LinAlgEx>
{
    n: usize,
    factor: Vec<L::F>,
    piv: Vec<usize>,
    solvable: bool,
    eps_zero: L::F,
}

impl<L: LinAlgEx> LU<L>
{
    /// Creates an instance, not yet computed.
    ///
    /// * `eps_zero` is a threshold of pivots relative to the largest magnitude of a matrix.
    pub fn new(eps_zero: L::F) -> Self
    {
        LU {
            n: 0,
            factor: Vec::new(),
            piv: Vec::new(),
            solvable: false,
            eps_zero,
        }
    }

    /// Decomposes a square matrix.
    ///
    /// Returns `true` if decomposed, `false` if singular.
    pub fn compute(&mut self, mat: &MatBuild<L>) -> bool
    {
        let (nr, nc) = mat.size();
        assert_eq!(nr, nc);

        let g = mat.to_general();

        self.n = nr;
        self.factor.clear();
        self.factor.extend_from_slice(g.as_ref());
        self.piv.clear();
        self.piv.resize(nr, 0);
        self.solvable = L::lu_decomp(self.n, &mut self.factor, &mut self.piv, self.eps_zero);

        self.solvable
    }

    /// Checks if the last [`LU::compute`] succeeded.
    pub fn is_solvable(&self) -> bool
    {
        self.solvable
    }

    /// Solves \\(G X = B\\).
    ///
    /// Returns \\(X\\) as a [`MatType::General`](crate::matbuild::MatType::General) matrix.
    /// Shall be called only if [`LU::is_solvable`].
    pub fn solve(&self, rhs: &MatBuild<L>) -> MatBuild<L>
    {
        assert!(self.solvable);

        let mut x = rhs.to_general();
        let (nr, nc) = x.size();
        assert_eq!(nr, self.n);

        L::lu_solve(self.n, &self.factor, &self.piv, nc, x.as_mut());
        x
    }

    /// Solves \\(G x = b\\) for a vector.
    pub fn solve_vec(&self, b: &[L::F]) -> Vec<L::F>
    {
        assert!(self.solvable);
        assert_eq!(b.len(), self.n);

        let mut x = b.to_vec();
        L::lu_solve(self.n, &self.factor, &self.piv, 1, &mut x);
        x
    }
}

//

/// Numerical rank of a matrix.
///
/// * `eps_zero` is a threshold relative to the largest magnitude of `mat`.
pub fn rank<L: LinAlgEx>(mat: &MatBuild<L>, eps_zero: L::F) -> usize
{
    let (nr, nc) = mat.size();
    if nr == 0 || nc == 0 {
        return 0;
    }

    let mut g = mat.to_general();

    if g.as_ref().iter().all(|v| v.is_zero()) {
        return 0;
    }

    L::rank(nr, nc, g.as_mut(), eps_zero)
}

//

#[test]
fn test_factor1()
{
    use float_eq::assert_float_eq;
    use crate::linalg::FloatGeneric;

    type L = FloatGeneric<f64>;

    let q = MatBuild::<L>::new(MatType::SymPack(2)).iter_rowmaj(&[
        2., 1.,
        1., 2.,
    ]);

    let mut chol = Cholesky::<L>::new(1e-12);
    assert!(chol.compute(&q));

    let b = MatBuild::<L>::new(MatType::General(2, 2)).iter_rowmaj(&[
        3., 1.,
        3., -1.,
    ]);
    let x = chol.solve(&b);
    // columns (1, 1) and (1, -1)
    assert_float_eq!(x.as_ref(), [1., 1., 1., -1.].as_ref(), abs_all <= 1e-9);

    let mut lu = LU::<L>::new(1e-12);
    assert!(lu.compute(&q));
    assert_float_eq!(lu.solve_vec(&[3., 3.]).as_slice(), [1., 1.].as_ref(), abs_all <= 1e-9);
}

#[test]
fn test_factor2()
{
    use crate::linalg::FloatGeneric;

    type L = FloatGeneric<f64>;

    // indefinite
    let q = MatBuild::<L>::new(MatType::General(2, 2)).iter_rowmaj(&[
        1., 2.,
        2., 1.,
    ]);
    let mut chol = Cholesky::<L>::new(1e-12);
    assert!(!chol.compute(&q));
    assert!(!chol.is_solvable());

    // singular
    let s = MatBuild::<L>::new(MatType::General(2, 2)).iter_rowmaj(&[
        1., 2.,
        2., 4.,
    ]);
    let mut lu = LU::<L>::new(1e-12);
    assert!(!lu.compute(&s));

    assert_eq!(rank(&s, 1e-12), 1);
    assert_eq!(rank(&q, 1e-12), 2);
}
