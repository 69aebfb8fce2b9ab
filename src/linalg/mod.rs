//! Linear algebra

use num_traits::Float;

/// Linear algebra trait.
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
pub trait LinAlg
{
    /// Floating point data type used as scalars.
    type F: Float;

    /// Calculate 2-norm (or euclidean norm) \\(\\|x\\|_2=\sqrt{\sum_i x_i^2}\\).
    ///
    /// Returns the calculated norm.
    /// * `x` is a vector \\(x\\).
    fn norm(x: &[Self::F]) -> Self::F;

    /// Calculate inner product \\(x^T y\\).
    ///
    /// Returns the calculated product.
    /// * `x` and `y` shall have the same length.
    fn dot(x: &[Self::F], y: &[Self::F]) -> Self::F;

    /// Copy from a vector to another vector.
    ///
    /// * `x` is a slice to copy.
    /// * `y` is a slice being copied to.
    ///   `x` and `y` shall have the same length.
    fn copy(x: &[Self::F], y: &mut[Self::F]);

    /// Calculate \\(\alpha x\\).
    ///
    /// * `alpha` is a scalar \\(\alpha\\).
    /// * `x` is a vector \\(x\\) before entry, \\(\alpha x\\) on exit.
    fn scale(alpha: Self::F, x: &mut[Self::F]);

    /// Calculate \\(\alpha x + y\\).
    ///
    /// * `alpha` is a scalar \\(\alpha\\).
    /// * `x` is a vector \\(x\\).
    /// * `y` is a vector \\(y\\) before entry, \\(\alpha x + y\\) on exit.
    ///   `x` and `y` shall have the same length.
    fn add(alpha: Self::F, x: &[Self::F], y: &mut[Self::F]);
}

/// Linear algebra extended subtrait
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Dense matrices are stored in column-major.
pub trait LinAlgEx: LinAlg + Clone
{
    /// Calculates \\(\alpha G x + \beta y\\).
    ///
    /// * If `transpose` is `true`, Calculate \\(\alpha G^T x + \beta y\\) instead.
    /// * `alpha` is a scalar \\(\alpha\\).
    /// * `n_row` is a number of rows of \\(G\\).
    /// * `n_col` is a number of columns of \\(G\\).
    /// * `mat` is a matrix \\(G\\), stored in column-major.
    ///   The length of `mat` shall be `n_row * n_col`.
    /// * `x` is a vector \\(x\\).
    ///   The length of `x` shall be `n_col` (or `n_row` if `transpose` is `true`).
    /// * `beta` is a scalar \\(\beta\\).
    /// * `y` is a vector \\(y\\) before entry,
    ///   \\(\alpha G x + \beta y\\) (or \\(\alpha G^T x + \beta y\\) if `transpose` is `true`) on exit.
    ///   The length of `y` shall be `n_row` (or `n_col` if `transpose` is `true`).
    fn transform_ge(transpose: bool, n_row: usize, n_col: usize, alpha: Self::F, mat: &[Self::F], x: &[Self::F], beta: Self::F, y: &mut[Self::F]);

    /// Calculates \\(\alpha S x + \beta y\\),
    /// where \\(S\\) is a symmetric matrix, supplied in packed form.
    ///
    /// * `n` is a number of rows and columns of \\(S\\).
    /// * `alpha` is a scalar \\(\alpha\\).
    /// * `mat` is a matrix \\(S\\), stored in packed form (the upper-triangular part in column-wise).
    ///   The length of `mat` shall be `n * (n + 1) / 2`.
    /// * `x` is a vector \\(x\\).
    ///   The length of `x` shall be `n`.
    /// * `beta` is a scalar \\(\beta\\).
    /// * `y` is a vector \\(y\\) before entry, \\(\alpha S x + \beta y\\) on exit.
    ///   The length of `y` shall be `n`.
    fn transform_sp(n: usize, alpha: Self::F, mat: &[Self::F], x: &[Self::F], beta: Self::F, y: &mut[Self::F]);

    /// Cholesky decomposition \\(S = L L^T\\) of a symmetric positive definite matrix.
    ///
    /// Returns `true` if decomposed, `false` if \\(S\\) is not (numerically) positive definite.
    /// * `n` is a number of rows and columns of \\(S\\).
    /// * `mat` is a full `n * n` matrix \\(S\\) before entry, the factor \\(L\\) in its lower-triangular part on exit.
    /// * `eps_zero` is a threshold below which a pivot is regarded as non-positive.
    fn chol_decomp(n: usize, mat: &mut[Self::F], eps_zero: Self::F) -> bool;

    /// Solves \\(L L^T X = B\\) with a factor from [`LinAlgEx::chol_decomp`].
    ///
    /// * `n` is a number of rows and columns of \\(L\\).
    /// * `mat` is the factor \\(L\\).
    /// * `n_rhs` is a number of columns of \\(B\\).
    /// * `b` is \\(B\\) (`n * n_rhs`) before entry, \\(X\\) on exit.
    fn chol_solve(n: usize, mat: &[Self::F], n_rhs: usize, b: &mut[Self::F]);

    /// LU decomposition \\(P G = L U\\) with partial pivoting of a square matrix.
    ///
    /// Returns `true` if decomposed, `false` if \\(G\\) is (numerically) singular.
    /// * `n` is a number of rows and columns of \\(G\\).
    /// * `mat` is \\(G\\) before entry, the factors \\(L\\) (unit diagonal not stored) and \\(U\\) on exit.
    /// * `piv` is a pivot index slice of length `n`, written on exit.
    /// * `eps_zero` is a threshold of pivots relative to the largest magnitude of \\(G\\).
    fn lu_decomp(n: usize, mat: &mut[Self::F], piv: &mut[usize], eps_zero: Self::F) -> bool;

    /// Solves \\(G X = B\\) with factors from [`LinAlgEx::lu_decomp`].
    ///
    /// * `n` is a number of rows and columns of \\(G\\).
    /// * `mat` and `piv` are the outputs of [`LinAlgEx::lu_decomp`].
    /// * `n_rhs` is a number of columns of \\(B\\).
    /// * `b` is \\(B\\) (`n * n_rhs`) before entry, \\(X\\) on exit.
    fn lu_solve(n: usize, mat: &[Self::F], piv: &[usize], n_rhs: usize, b: &mut[Self::F]);

    /// Numerical rank of a general matrix.
    ///
    /// Returns the rank.
    /// * `n_row` is a number of rows of \\(G\\).
    /// * `n_col` is a number of columns of \\(G\\).
    /// * `mat` is \\(G\\) before entry, and destroyed on exit.
    /// * `eps_zero` is a threshold relative to the largest magnitude of \\(G\\).
    fn rank(n_row: usize, n_col: usize, mat: &mut[Self::F], eps_zero: Self::F) -> usize;
}

//

mod floatgeneric; // pure Rust, Float

#[cfg(feature = "f64lapack")]
mod f64lapack;    // f64(cblas/lapacke)

pub use floatgeneric::*;

#[cfg(feature = "f64lapack")]
pub use f64lapack::*;
