use super::{LinAlg, LinAlgEx};

//

/// `f64`-specific [`LinAlgEx`] implementation using `cblas` and `lapacke`
///
/// You need a [BLAS/LAPACK source](https://github.com/blas-lapack-rs/blas-lapack-rs.github.io/wiki#sources) to link.
#[derive(Debug, Clone)]
pub struct F64LAPACK;

impl LinAlg for F64LAPACK
{
    type F = f64;

    fn norm(x: &[f64]) -> f64
    {
        unsafe { cblas::dnrm2(x.len() as i32, x, 1) }
    }

    fn dot(x: &[f64], y: &[f64]) -> f64
    {
        assert_eq!(x.len(), y.len());

        unsafe { cblas::ddot(x.len() as i32, x, 1, y, 1) }
    }

    fn copy(x: &[f64], y: &mut[f64])
    {
        assert_eq!(x.len(), y.len());

        unsafe { cblas::dcopy(x.len() as i32, x, 1, y, 1) }
    }

    fn scale(alpha: f64, x: &mut[f64])
    {
        unsafe { cblas::dscal(x.len() as i32, alpha, x, 1) }
    }

    fn add(alpha: f64, x: &[f64], y: &mut[f64])
    {
        assert_eq!(x.len(), y.len());

        unsafe { cblas::daxpy(x.len() as i32, alpha, x, 1, y, 1) }
    }
}

//

fn max_abs(mat: &[f64]) -> f64
{
    mat.iter().fold(0., |m, a| m.max(a.abs()))
}

//

impl LinAlgEx for F64LAPACK
{
    // y = a*mat*x + b*y
    fn transform_ge(transpose: bool, n_row: usize, n_col: usize, alpha: f64, mat: &[f64], x: &[f64], beta: f64, y: &mut[f64])
    {
        assert_eq!(mat.len(), n_row * n_col);

        let trans = if transpose {
            assert_eq!(x.len(), n_row);
            assert_eq!(y.len(), n_col);

            cblas::Transpose::Ordinary
        } else {
            assert_eq!(x.len(), n_col);
            assert_eq!(y.len(), n_row);

            cblas::Transpose::None
        };

        if n_row == 0 || n_col == 0 {
            Self::scale(beta, y);
            return;
        }

        unsafe { cblas::dgemv(
            cblas::Layout::ColumnMajor, trans,
            n_row as i32, n_col as i32,
            alpha, mat, n_row as i32,
            x, 1,
            beta, y, 1
        ) }
    }

    // y = a*mat*x + b*y
    fn transform_sp(n: usize, alpha: f64, mat: &[f64], x: &[f64], beta: f64, y: &mut[f64])
    {
        assert_eq!(mat.len(), n * (n + 1) / 2);

        assert_eq!(x.len(), n);
        assert_eq!(y.len(), n);

        if n == 0 {
            return;
        }

        unsafe { cblas::dspmv(
            cblas::Layout::ColumnMajor, cblas::Part::Upper,
            n as i32,
            alpha, mat,
            x, 1,
            beta, y, 1
        ) }
    }

    fn chol_decomp(n: usize, mat: &mut[f64], eps_zero: f64) -> bool
    {
        assert_eq!(mat.len(), n * n);

        if n == 0 {
            return true;
        }

        let mut diag_max = 1_f64;
        for i in 0.. n {
            diag_max = diag_max.max(mat[i * n + i].abs());
        }

        let info = unsafe {
            lapacke::dpotrf(lapacke::Layout::ColumnMajor, b'L', n as i32, mat, n as i32)
        };
        if info != 0 {
            return false;
        }

        // dpotrf accepts tiny pivots of semidefinite matrices
        let tol = (eps_zero * diag_max).sqrt();
        (0.. n).all(|i| mat[i * n + i] > tol)
    }

    fn chol_solve(n: usize, mat: &[f64], n_rhs: usize, b: &mut[f64])
    {
        assert_eq!(mat.len(), n * n);
        assert_eq!(b.len(), n * n_rhs);

        if n == 0 || n_rhs == 0 {
            return;
        }

        let info = unsafe {
            lapacke::dpotrs(
                lapacke::Layout::ColumnMajor, b'L',
                n as i32, n_rhs as i32,
                mat, n as i32,
                b, n as i32)
        };
        assert_eq!(info, 0);
    }

    fn lu_decomp(n: usize, mat: &mut[f64], piv: &mut[usize], eps_zero: f64) -> bool
    {
        assert_eq!(mat.len(), n * n);
        assert_eq!(piv.len(), n);

        if n == 0 {
            return true;
        }

        let tol = eps_zero * max_abs(mat);
        let mut ipiv = vec![0_i32; n];

        let info = unsafe {
            lapacke::dgetrf(lapacke::Layout::ColumnMajor, n as i32, n as i32, mat, n as i32, &mut ipiv)
        };
        if info != 0 {
            return false;
        }

        for (p, ip) in piv.iter_mut().zip(&ipiv) {
            *p = (*ip - 1) as usize;
        }

        (0.. n).all(|i| mat[i * n + i].abs() > tol)
    }

    fn lu_solve(n: usize, mat: &[f64], piv: &[usize], n_rhs: usize, b: &mut[f64])
    {
        assert_eq!(mat.len(), n * n);
        assert_eq!(piv.len(), n);
        assert_eq!(b.len(), n * n_rhs);

        if n == 0 || n_rhs == 0 {
            return;
        }

        let ipiv: Vec<i32> = piv.iter().map(|p| (p + 1) as i32).collect();

        let info = unsafe {
            lapacke::dgetrs(
                lapacke::Layout::ColumnMajor, b'N',
                n as i32, n_rhs as i32,
                mat, n as i32, &ipiv,
                b, n as i32)
        };
        assert_eq!(info, 0);
    }

    fn rank(n_row: usize, n_col: usize, mat: &mut[f64], eps_zero: f64) -> usize
    {
        assert_eq!(mat.len(), n_row * n_col);

        let k = n_row.min(n_col);
        if k == 0 {
            return 0;
        }

        let mut s = vec![0.; k];
        let mut superb = vec![0.; k];

        let info = unsafe {
            lapacke::dgesvd(
                lapacke::Layout::ColumnMajor, b'N', b'N',
                n_row as i32, n_col as i32,
                mat, n_row as i32,
                &mut s,
                &mut [], 1,
                &mut [], 1,
                &mut superb)
        };
        assert_eq!(info, 0);

        let tol = eps_zero * s[0];
        s.iter().filter(|sv| **sv > tol).count()
    }
}
