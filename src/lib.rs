/*!
Totsu ([凸](http://www.decodeunicode.org/en/u+51F8) in Japanese) means convex.

<script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
<script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>

This crate for Rust provides a **primal active-set QP solver** for small dense convex problems,
together with the **two-phase primal simplex LP solver** it is built on.

# General usage

1. An optimization problem you want to solve is assumed to be expressed
   in the standard form of QP or LP.
   Refer to [`problem::ProbQP`] and [`problem::ProbLP`] about their mathematical formulations.
1. Choose a [`linalg::LinAlgEx`] implementation to use:
   * [`linalg::FloatGeneric`] -
     `num::Float`-generic, pure Rust but slow, fewer environment-dependent problems.
   * `linalg::F64LAPACK` with `f64lapack` feature -
     `f64`-specific, using BLAS/LAPACK which requires an installed environment.
1. Construct your problem with matrices using [`matbuild::MatBuild`].
1. Create a [`solver::Solver`] instance and optionally set its parameters.
1. Feed the problem to the solver and invoke [`solver::Solver::solve_qp`] or [`solver::Solver::solve_lp`]
   to get a resulted [`state::Solution`].

# Examples

A simple QP problem:
\\[
\begin{array}{ll}
{\rm minimize} & (x_0 - 1)^2 + (x_1 - 1)^2 \\\\
{\rm subject \ to} & x_0 + x_1 \le 1
\end{array}
\\]

You will notice that a perpendicular drawn from \\((1, 1)\\)
to the line \\(x_0 + x_1 = 1\\) intersects
at point \\((0.5, 0.5)\\) which is the optimal solution of the problem.

```
use float_eq::assert_float_eq;
use totsu_activeset::prelude::*;

//env_logger::init(); // Use any logger crate as `totsu_activeset` uses `log` crate.

type La = FloatGeneric<f64>;
type AMatBuild = MatBuild<La>;
type AProbQP = ProbQP<La>;
type ASolver = Solver<La>;

let n = 2; // x0, x1
let m = 1;

// (1/2) x^T Q x - c^T x + const
let mut sym_q = AMatBuild::new(MatType::SymPack(n));
sym_q[(0, 0)] = 2.;
sym_q[(1, 1)] = 2.;

let mut vec_c = AMatBuild::new(MatType::General(n, 1));
vec_c[(0, 0)] = 2.;
vec_c[(1, 0)] = 2.;

// x0 + x1 <= 1
let mut mat_ai = AMatBuild::new(MatType::General(m, n));
mat_ai[(0, 0)] = 1.;
mat_ai[(0, 1)] = 1.;

let mut vec_bi = AMatBuild::new(MatType::General(m, 1));
vec_bi[(0, 0)] = 1.;

let s = ASolver::new().par(|p| {
   p.max_iter = 100;
});
let qp = AProbQP::new(sym_q, vec_c, None, None, Some(mat_ai), Some(vec_bi));
let rslt = s.solve_qp(&qp, None).unwrap();

assert_eq!(rslt.state, State::Optimal);
assert_float_eq!(rslt.x[0..2], [0.5, 0.5].as_ref(), abs_all <= 1e-6);
```

## Other examples

You can find other [tests](https://github.com/convexbrain/Totsu/tree/master/tests) of the problems.
*/

pub mod linalg;
pub mod matbuild;
pub mod factor;
pub mod param;
pub mod state;
pub mod solver_error;
pub mod observer;
pub mod activator;
pub mod kkt;
pub mod simplex;
pub mod problem;
pub mod activeset;
pub mod solver;

/// Prelude
pub mod prelude
{
   pub use crate::linalg::{LinAlg, LinAlgEx, FloatGeneric};
   pub use crate::matbuild::{MatBuild, MatType};
   pub use crate::param::{SolverParam, Tolerance};
   pub use crate::state::{State, Solution};
   pub use crate::solver_error::SolverError;
   pub use crate::observer::{Observer, NullObserver, LogObserver};
   pub use crate::problem::{ProbQP, ProbLP};
   pub use crate::solver::Solver;
}
