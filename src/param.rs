//! Solver parameters and tolerances

use num_traits::Float;

//

/// Tolerance policy of numerical comparisons.
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// A value \\(v\\) is zero if \\(|v| \le \epsilon_0\\).
/// A value is small compared to another if their ratio does not exceed \\(\epsilon\\).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance<F: Float>
{
    /// Relative tolerance \\(\epsilon\\).
    pub eps: F,
    /// Absolute tolerance \\(\epsilon_0\\) of zero.
    pub eps_zero: F,
}

impl<F: Float> Tolerance<F>
{
    /// Creates an instance.
    ///
    /// * `eps` is a relative tolerance.
    /// * `eps_zero` is an absolute tolerance of zero.
    pub fn new(eps: F, eps_zero: F) -> Self
    {
        Tolerance {
            eps, eps_zero,
        }
    }

    /// Checks \\(|v| \le \epsilon_0\\).
    pub fn is_zero(&self, v: F) -> bool
    {
        v.abs() <= self.eps_zero
    }

    /// Checks if `v` is negligible compared to `cmp`.
    ///
    /// Returns `true` if \\(|v| \le \epsilon |{\rm cmp}|\\),
    /// or if both are zero in case `cmp` itself is zero.
    pub fn is_small(&self, cmp: F, v: F) -> bool
    {
        if self.is_zero(cmp) {
            self.is_zero(v)
        }
        else {
            v.abs() <= self.eps * cmp.abs()
        }
    }

    /// Checks if `a` and `b` differ both absolutely and relatively.
    pub fn is_different(&self, a: F, b: F) -> bool
    {
        let d = (a - b).abs();

        d > self.eps_zero && d > self.eps * a.abs().max(b.abs())
    }
}

//

/// Solver parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverParam<F: Float>
{
    /// Max iteration number of the simplex and the active-set loops.
    pub max_iter: usize,
    /// Max number of retries, each of which removes an active constraint, when a subproblem is unsolvable.
    pub max_retry: usize,
    /// Threshold of a reduced cost to enter the basis in Phase 2 of the simplex method.
    pub eps_pivot: F,
    /// Threshold of pivots in factorizations.
    pub eps_zero: F,
    /// Tolerance of the problem data, used in the ratio test of the simplex method.
    pub tol_problem: Tolerance<F>,
    /// Tolerance of objective values, used in the phase transition of the simplex method.
    pub tol_objective: Tolerance<F>,
    /// Tolerance of constraint slacks.
    pub tol_slack: Tolerance<F>,
    /// Tolerance of solution steps and multipliers.
    pub tol_solution: Tolerance<F>,
}

impl<F: Float> Default for SolverParam<F>
{
    fn default() -> Self
    {
        let ten = F::from(10).unwrap();

        SolverParam {
            max_iter: 10_000,
            max_retry: 64,
            eps_pivot: ten.powi(-10),
            eps_zero: ten.powi(-12),
            tol_problem: Tolerance::new(ten.powi(-10), ten.powi(-14)),
            tol_objective: Tolerance::new(ten.powi(-8), ten.powi(-10)),
            tol_slack: Tolerance::new(ten.powi(-8), ten.powi(-10)),
            tol_solution: Tolerance::new(ten.powi(-10), ten.powi(-14)),
        }
    }
}

//

#[test]
fn test_tolerance1()
{
    let tol = Tolerance::new(1e-8, 1e-10);

    assert!(tol.is_zero(1e-11));
    assert!(!tol.is_zero(1e-9));

    assert!(tol.is_small(1e3, 1e-6));
    assert!(!tol.is_small(1e3, 1e-4));
    assert!(tol.is_small(0., 1e-11));
    assert!(!tol.is_small(0., 1e-9));

    assert!(!tol.is_different(1., 1. + 1e-9));
    assert!(tol.is_different(1., 1. + 1e-7));
    assert!(!tol.is_different(0., 1e-11));
}
