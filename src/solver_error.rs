use core::fmt::Display;

//

/// Solver errors.
///
/// Rejections of a problem before any iteration.
/// Infeasibility, unboundedness and iteration limits are not errors but reported as [`crate::state::State`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolverError
{
    /// Inconsistent sizes of problem matrices.
    InvalidOp,
    /// A constraint matrix without its right-hand side, or vice versa.
    MissingPair,
    /// Equality constraints not of full row rank.
    RankDeficient,
}

impl Display for SolverError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", match &self {
            SolverError::InvalidOp     => "InvalidOp: inconsistent sizes of problem matrices",
            SolverError::MissingPair   => "MissingPair: constraint matrix and right-hand side not given together",
            SolverError::RankDeficient => "RankDeficient: equality constraints not of full row rank",
        })
    }
}

impl std::error::Error for SolverError {}
