use num_traits::Float;
use core::marker::PhantomData;
use core::ops::{Index, IndexMut};
use super::{LinAlg, LinAlgEx};

/// `num::Float`-generic [`LinAlgEx`] implementation
///
/// All numeric operations are written in pure Rust, but slow.
#[derive(Debug, Clone)]
pub struct FloatGeneric<F>
{
    ph_f: PhantomData<F>,
}

impl<F: Float> LinAlg for FloatGeneric<F>
{
    type F = F;

    fn norm(x: &[F]) -> F
    {
        let mut sum = F::zero();
        for u in x {
            sum = sum + *u * *u;
        }
        sum.sqrt()
    }

    fn dot(x: &[F], y: &[F]) -> F
    {
        assert_eq!(x.len(), y.len());

        let mut sum = F::zero();
        for (u, v) in x.iter().zip(y) {
            sum = sum + *u * *v;
        }
        sum
    }

    fn copy(x: &[F], y: &mut[F])
    {
        assert_eq!(x.len(), y.len());

        for (u, v) in x.iter().zip(y) {
            *v = *u;
        }
    }

    fn scale(alpha: F, x: &mut[F])
    {
        for u in x {
            *u = alpha * *u;
        }
    }

    fn add(alpha: F, x: &[F], y: &mut[F])
    {
        assert_eq!(x.len(), y.len());

        for (u, v) in x.iter().zip(y) {
            *v = *v + alpha * *u;
        }
    }
}

//

struct MatIdx<'a, F: Float>
{
    n_row: usize,
    n_col: usize,
    mat: &'a[F],
    transpose: bool,
}

impl<'a, F: Float> MatIdx<'a, F>
{
    fn idx(&self, (r, c): (usize, usize)) -> usize
    {
        let (r, c) = if !self.transpose {(r, c)} else {(c, r)};

        assert!(r < self.n_row);
        assert!(c < self.n_col);

        c * self.n_row + r
    }
}

impl<'a, F: Float> Index<(usize, usize)> for MatIdx<'a, F>
{
    type Output = F;

    fn index(&self, index: (usize, usize)) -> &Self::Output
    {
        &self.mat[self.idx(index)]
    }
}

//

struct MatIdxMut<'a, F: Float>
{
    n_row: usize,
    n_col: usize,
    mat: &'a mut[F],
}

impl<'a, F: Float> MatIdxMut<'a, F>
{
    fn idx(&self, (r, c): (usize, usize)) -> usize
    {
        assert!(r < self.n_row);
        assert!(c < self.n_col);

        c * self.n_row + r
    }

    fn swap_rows(&mut self, r1: usize, r2: usize)
    {
        if r1 != r2 {
            for c in 0.. self.n_col {
                let i1 = self.idx((r1, c));
                let i2 = self.idx((r2, c));
                self.mat.swap(i1, i2);
            }
        }
    }

    fn max_abs(&self) -> F
    {
        self.mat.iter().fold(F::zero(), |m, a| m.max(a.abs()))
    }
}

impl<'a, F: Float> Index<(usize, usize)> for MatIdxMut<'a, F>
{
    type Output = F;

    fn index(&self, index: (usize, usize)) -> &Self::Output
    {
        &self.mat[self.idx(index)]
    }
}

impl<'a, F: Float> IndexMut<(usize, usize)> for MatIdxMut<'a, F>
{
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output
    {
        let i = self.idx(index);

        &mut self.mat[i]
    }
}

//

struct SpMatIdx<'a, F: Float>
{
    n: usize,
    mat: &'a[F],
}

impl<'a, F: Float> SpMatIdx<'a, F>
{
    fn idx(&self, (r, c): (usize, usize)) -> usize
    {
        assert!(r < self.n);
        assert!(c < self.n);

        let (r, c) = if r < c {(r, c)} else {(c, r)};

        c * (c + 1) / 2 + r
    }
}

impl<'a, F: Float> Index<(usize, usize)> for SpMatIdx<'a, F>
{
    type Output = F;

    fn index(&self, index: (usize, usize)) -> &Self::Output
    {
        &self.mat[self.idx(index)]
    }
}

//

impl<F: Float> LinAlgEx for FloatGeneric<F>
{
    // y = a*mat*x + b*y
    fn transform_ge(transpose: bool, n_row: usize, n_col: usize, alpha: F, mat: &[F], x: &[F], beta: F, y: &mut[F])
    {
        assert_eq!(mat.len(), n_row * n_col);
        if transpose {
            assert_eq!(x.len(), n_row);
            assert_eq!(y.len(), n_col);
        } else {
            assert_eq!(x.len(), n_col);
            assert_eq!(y.len(), n_row);
        };

        let mat = MatIdx {
            n_row, n_col, mat, transpose,
        };

        for r in 0.. y.len() {
            let mut mat_x = F::zero();
            for c in 0.. x.len() {
                mat_x = mat_x + mat[(r, c)] * x[c];
            }
            y[r] = alpha * mat_x + beta * y[r];
        }
    }

    // y = a*mat*x + b*y
    fn transform_sp(n: usize, alpha: F, mat: &[F], x: &[F], beta: F, y: &mut[F])
    {
        assert_eq!(mat.len(), n * (n + 1) / 2);

        assert_eq!(x.len(), n);
        assert_eq!(y.len(), n);

        let mat = SpMatIdx {
            n, mat,
        };

        for r in 0.. y.len() {
            let mut mat_x = F::zero();
            for c in 0.. x.len() {
                mat_x = mat_x + mat[(r, c)] * x[c];
            }
            y[r] = alpha * mat_x + beta * y[r];
        }
    }

    fn chol_decomp(n: usize, mat: &mut[F], eps_zero: F) -> bool
    {
        assert_eq!(mat.len(), n * n);

        let mut a = MatIdxMut {
            n_row: n, n_col: n, mat,
        };

        let mut diag_max = F::one();
        for i in 0.. n {
            diag_max = diag_max.max(a[(i, i)].abs());
        }
        let tol = eps_zero * diag_max;

        for j in 0.. n {
            let mut d = a[(j, j)];
            for k in 0.. j {
                d = d - a[(j, k)] * a[(j, k)];
            }
            // also rejects NaN
            if !(d > tol) {
                return false;
            }
            let l_jj = d.sqrt();
            a[(j, j)] = l_jj;

            for i in j + 1.. n {
                let mut s = a[(i, j)];
                for k in 0.. j {
                    s = s - a[(i, k)] * a[(j, k)];
                }
                a[(i, j)] = s / l_jj;
            }
        }

        true
    }

    fn chol_solve(n: usize, mat: &[F], n_rhs: usize, b: &mut[F])
    {
        assert_eq!(mat.len(), n * n);
        assert_eq!(b.len(), n * n_rhs);

        let l = MatIdx {
            n_row: n, n_col: n, mat, transpose: false,
        };

        for x in b.chunks_mut(n.max(1)).take(n_rhs) {
            // L y = b
            for i in 0.. n {
                let mut s = x[i];
                for k in 0.. i {
                    s = s - l[(i, k)] * x[k];
                }
                x[i] = s / l[(i, i)];
            }
            // L^T x = y
            for i in (0.. n).rev() {
                let mut s = x[i];
                for k in i + 1.. n {
                    s = s - l[(k, i)] * x[k];
                }
                x[i] = s / l[(i, i)];
            }
        }
    }

    fn lu_decomp(n: usize, mat: &mut[F], piv: &mut[usize], eps_zero: F) -> bool
    {
        assert_eq!(mat.len(), n * n);
        assert_eq!(piv.len(), n);

        let mut a = MatIdxMut {
            n_row: n, n_col: n, mat,
        };

        let tol = eps_zero * a.max_abs();

        for k in 0.. n {
            let mut p = k;
            let mut p_abs = a[(k, k)].abs();
            for i in k + 1.. n {
                let v = a[(i, k)].abs();
                if v > p_abs {
                    p = i;
                    p_abs = v;
                }
            }
            if !(p_abs > tol) {
                return false;
            }

            piv[k] = p;
            a.swap_rows(k, p);

            let pivot = a[(k, k)];
            for i in k + 1.. n {
                let l_ik = a[(i, k)] / pivot;
                a[(i, k)] = l_ik;
                for j in k + 1.. n {
                    a[(i, j)] = a[(i, j)] - l_ik * a[(k, j)];
                }
            }
        }

        true
    }

    fn lu_solve(n: usize, mat: &[F], piv: &[usize], n_rhs: usize, b: &mut[F])
    {
        assert_eq!(mat.len(), n * n);
        assert_eq!(piv.len(), n);
        assert_eq!(b.len(), n * n_rhs);

        let lu = MatIdx {
            n_row: n, n_col: n, mat, transpose: false,
        };

        for x in b.chunks_mut(n.max(1)).take(n_rhs) {
            for k in 0.. n {
                x.swap(k, piv[k]);
            }
            // unit lower
            for i in 0.. n {
                let mut s = x[i];
                for k in 0.. i {
                    s = s - lu[(i, k)] * x[k];
                }
                x[i] = s;
            }
            // upper
            for i in (0.. n).rev() {
                let mut s = x[i];
                for k in i + 1.. n {
                    s = s - lu[(i, k)] * x[k];
                }
                x[i] = s / lu[(i, i)];
            }
        }
    }

    fn rank(n_row: usize, n_col: usize, mat: &mut[F], eps_zero: F) -> usize
    {
        assert_eq!(mat.len(), n_row * n_col);

        let mut a = MatIdxMut {
            n_row, n_col, mat,
        };

        let tol = eps_zero * a.max_abs();
        let mut rank = 0;

        for c in 0.. n_col {
            if rank == n_row {
                break;
            }

            let mut p = rank;
            let mut p_abs = a[(rank, c)].abs();
            for r in rank + 1.. n_row {
                let v = a[(r, c)].abs();
                if v > p_abs {
                    p = r;
                    p_abs = v;
                }
            }
            if !(p_abs > tol) {
                continue;
            }

            a.swap_rows(rank, p);

            let pivot = a[(rank, c)];
            for r in rank + 1.. n_row {
                let f = a[(r, c)] / pivot;
                for cc in c.. n_col {
                    a[(r, cc)] = a[(r, cc)] - f * a[(rank, cc)];
                }
            }
            rank += 1;
        }

        rank
    }
}

//

#[test]
fn test_floatgeneric_chol1()
{
    use float_eq::assert_float_eq;

    type L = FloatGeneric<f64>;

    let mut mat = [ // column-major
        4., 2.,
        2., 3.,
    ];
    let mut b = [2., 1.];

    assert!(L::chol_decomp(2, &mut mat, 1e-12));
    L::chol_solve(2, &mat, 1, &mut b);

    // 4x0 + 2x1 = 2, 2x0 + 3x1 = 1
    assert_float_eq!(b, [0.5, 0.], abs_all <= 1e-12);
}

#[test]
fn test_floatgeneric_chol2()
{
    type L = FloatGeneric<f64>;

    // positive semidefinite but singular
    let mut mat = [
        1., 1.,
        1., 1.,
    ];

    assert!(!L::chol_decomp(2, &mut mat, 1e-12));
}

#[test]
fn test_floatgeneric_lu1()
{
    use float_eq::assert_float_eq;

    type L = FloatGeneric<f64>;

    // [[0, 1], [2, 1]] requires a row swap
    let mut mat = [ // column-major
        0., 2.,
        1., 1.,
    ];
    let mut piv = [0; 2];
    let mut b = [
        1., 3., // rhs 0
        2., 2., // rhs 1
    ];

    assert!(L::lu_decomp(2, &mut mat, &mut piv, 1e-12));
    L::lu_solve(2, &mat, &piv, 2, &mut b);

    assert_float_eq!(b, [1., 1., 0., 2.], abs_all <= 1e-12);
}

#[test]
fn test_floatgeneric_rank1()
{
    type L = FloatGeneric<f64>;

    let mut mat = [ // column-major 3x2, third row = first + second
        1., 0., 1.,
        0., 1., 1.,
    ];
    assert_eq!(L::rank(3, 2, &mut mat, 1e-12), 2);

    let mut mat = [ // column-major 2x2, identical rows
        1., 1.,
        0., 0.,
    ];
    assert_eq!(L::rank(2, 2, &mut mat, 1e-12), 1);
}
