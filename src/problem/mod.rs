//! Problem definitions

mod lp; // simplex
mod qp; // active-set

pub use lp::*;
pub use qp::*;

use crate::linalg::LinAlgEx;
use crate::matbuild::MatBuild;
use crate::solver_error::SolverError;

/// Checks a constraint pair \\(A x \ \square\ b\\).
///
/// Returns a number of rows, zero if both are absent.
fn check_pair<L: LinAlgEx>(name: &str, n: usize, mat: Option<&MatBuild<L>>, vec: Option<&MatBuild<L>>)
-> Result<usize, SolverError>
{
    match (mat, vec) {
        (None, None) => Ok(0),
        (Some(mat), Some(vec)) => {
            let (m, n_) = mat.size();

            if n_ != n || vec.size() != (m, 1) {
                log::error!("Size mismatch: mat_a{}{:?}, vec_b{}{:?}, n {}", name, mat.size(), name, vec.size(), n);
                Err(SolverError::InvalidOp)
            }
            else {
                Ok(m)
            }
        },
        _ => {
            log::error!("Either mat_a{} or vec_b{} is missing", name, name);
            Err(SolverError::MissingPair)
        },
    }
}
