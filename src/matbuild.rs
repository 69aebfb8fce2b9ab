use std::ops::{Index, IndexMut, Deref};
use num_traits::{Float, Zero, One};
use crate::linalg::LinAlgEx;

//

/// Matrix type and size
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatType
{
    /// General matrix with a number of rows and a number of columns.
    General(usize, usize),
    /// Symmetric matrix, supplied in packed form, with a number of rows and columns.
    SymPack(usize),
}

impl MatType
{
    /// Length of array to store a [`MatType`] matrix.
    ///
    /// Returns the length.
    pub fn len(&self) -> usize
    {
        match self {
            MatType::General(n_row, n_col) => n_row * n_col,
            MatType::SymPack(n) => n * (n + 1) / 2,
        }
    }

    /// Size of a [`MatType`] matrix.
    ///
    /// Returns a tuple of a number of rows and a number of columns.
    pub fn size(&self) -> (usize, usize)
    {
        match self {
            MatType::General(n_row, n_col) => (*n_row, *n_col),
            MatType::SymPack(n) => (*n, *n),
        }
    }
}

//

/// Matrix builder
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-svg.js"></script>
///
/// Matrix struct which owns a `Vec` of data array.
/// [`MatType::General`] data is stored in column-major,
/// [`MatType::SymPack`] data in packed form (the upper-triangular part in column-wise).
/// This struct relies on dynamic heap allocation.
#[derive(Clone)]
pub struct MatBuild<L: LinAlgEx>
{
    typ: MatType,
    array: Vec<L::F>,
}

impl<L: LinAlgEx> MatBuild<L>
{
    /// Creates an instance.
    ///
    /// Returns the [`MatBuild`] instance with zero data.
    /// * `typ` is Matrix type and size.
    pub fn new(typ: MatType) -> Self
    {
        MatBuild {
            typ,
            array: vec![L::F::zero(); typ.len()],
        }
    }

    /// Creates a one-column matrix.
    ///
    /// Returns the [`MatBuild`] instance of [`MatType::General`] `(v.len(), 1)`.
    /// * `v` is data of the column.
    pub fn new_vec(v: Vec<L::F>) -> Self
    {
        MatBuild {
            typ: MatType::General(v.len(), 1),
            array: v,
        }
    }

    /// Creates an identity matrix.
    ///
    /// Returns the [`MatBuild`] instance of [`MatType::General`] `(n, n)`.
    pub fn new_identity(n: usize) -> Self
    {
        MatBuild::new(MatType::General(n, n))
            .by_fn(|r, c| if r == c {L::F::one()} else {L::F::zero()})
    }

    /// Size of the matrix.
    ///
    /// Returns a tuple of a number of rows and columns.
    pub fn size(&self) -> (usize, usize)
    {
        self.typ.size()
    }

    /// Checks if symmetric packed.
    ///
    /// Returns `true` if [`MatType::SymPack`], `false` otherwise.
    pub fn is_sympack(&self) -> bool
    {
        matches!(self.typ, MatType::SymPack(_))
    }

    /// Data by a function.
    ///
    /// * `func` takes a row and a column of the matrix and returns data of each element.
    pub fn set_by_fn<M>(&mut self, mut func: M)
    where M: FnMut(usize, usize) -> L::F
    {
        match self.typ {
            MatType::General(nr, nc) => {
                for c in 0.. nc {
                    for r in 0.. nr {
                        self[(r, c)] = func(r, c);
                    }
                }
            },
            MatType::SymPack(n) => {
                for c in 0.. n {
                    for r in 0..= c {
                        self[(r, c)] = func(r, c);
                    }
                }
            },
        };
    }
    /// Builder pattern of [`MatBuild::set_by_fn`].
    pub fn by_fn<M>(mut self, func: M) -> Self
    where M: FnMut(usize, usize) -> L::F
    {
        self.set_by_fn(func);
        self
    }

    /// Data by an iterator in column-major.
    ///
    /// * `iter` iterates matrix data in column-major.
    ///   [`MatType::SymPack`] takes the whole symmetric matrix, of which later elements overwrite earlier ones.
    pub fn set_iter_colmaj<T, I>(&mut self, iter: T)
    where T: IntoIterator<Item=I>, I: Deref<Target=L::F>
    {
        let mut i = iter.into_iter();
        let (nr, nc) = self.typ.size();

        for c in 0.. nc {
            for r in 0.. nr {
                if let Some(v) = i.next() {
                    self[(r, c)] = *v;
                }
                else {
                    break;
                }
            }
        }
    }
    /// Builder pattern of [`MatBuild::set_iter_colmaj`].
    pub fn iter_colmaj<T, I>(mut self, iter: T) -> Self
    where T: IntoIterator<Item=I>, I: Deref<Target=L::F>
    {
        self.set_iter_colmaj(iter);
        self
    }

    /// Data by an iterator in row-major.
    ///
    /// * `iter` iterates matrix data in row-major.
    ///   [`MatType::SymPack`] takes the whole symmetric matrix, of which later elements overwrite earlier ones.
    pub fn set_iter_rowmaj<T, I>(&mut self, iter: T)
    where T: IntoIterator<Item=I>, I: Deref<Target=L::F>
    {
        let mut i = iter.into_iter();
        let (nr, nc) = self.typ.size();

        for r in 0.. nr {
            for c in 0.. nc {
                if let Some(v) = i.next() {
                    self[(r, c)] = *v;
                }
                else {
                    break;
                }
            }
        }
    }
    /// Builder pattern of [`MatBuild::set_iter_rowmaj`].
    pub fn iter_rowmaj<T, I>(mut self, iter: T) -> Self
    where T: IntoIterator<Item=I>, I: Deref<Target=L::F>
    {
        self.set_iter_rowmaj(iter);
        self
    }

    /// Scales a row by \\(\alpha\\).
    ///
    /// The matrix shall belong to [`MatType::General`].
    /// * `r` is the row to scale.
    /// * `alpha` is a scalar \\(\alpha\\).
    pub fn set_scale_row(&mut self, r: usize, alpha: L::F)
    {
        assert!(!self.is_sympack());

        let (_, nc) = self.size();
        for c in 0.. nc {
            self[(r, c)] = alpha * self[(r, c)];
        }
    }

    /// Converted into a [`MatType::General`] matrix.
    ///
    /// Returns the same matrix if already general,
    /// or the fully expanded matrix if symmetric packed.
    pub fn to_general(&self) -> Self
    {
        match self.typ {
            MatType::General(_, _) => self.clone(),
            MatType::SymPack(n) => {
                MatBuild::new(MatType::General(n, n)).by_fn(|r, c| self[(r, c)])
            },
        }
    }

    /// Transposed matrix.
    ///
    /// Returns a [`MatType::General`] matrix \\(A^T\\).
    pub fn transpose(&self) -> Self
    {
        let (nr, nc) = self.size();

        MatBuild::new(MatType::General(nc, nr)).by_fn(|r, c| self[(c, r)])
    }

    /// Selected rows.
    ///
    /// Returns a [`MatType::General`] matrix stacking the rows in the order of `rows`.
    pub fn rows(&self, rows: &[usize]) -> Self
    {
        let (_, nc) = self.size();

        MatBuild::new(MatType::General(rows.len(), nc)).by_fn(|r, c| self[(rows[r], c)])
    }

    /// Block concatenation \\(\left[\matrix{A \\\\ B}\right]\\).
    ///
    /// Returns a [`MatType::General`] matrix.
    /// Both shall have the same number of columns.
    pub fn vstack(&self, below: &Self) -> Self
    {
        let (nr_a, nc) = self.size();
        let (nr_b, nc_b) = below.size();
        assert_eq!(nc, nc_b);

        MatBuild::new(MatType::General(nr_a + nr_b, nc)).by_fn(|r, c| {
            if r < nr_a {
                self[(r, c)]
            }
            else {
                below[(r - nr_a, c)]
            }
        })
    }

    /// Block concatenation \\(\left[\matrix{A & B}\right]\\).
    ///
    /// Returns a [`MatType::General`] matrix.
    /// Both shall have the same number of rows.
    pub fn hstack(&self, right: &Self) -> Self
    {
        let (nr, nc_a) = self.size();
        let (nr_b, nc_b) = right.size();
        assert_eq!(nr, nr_b);

        MatBuild::new(MatType::General(nr, nc_a + nc_b)).by_fn(|r, c| {
            if c < nc_a {
                self[(r, c)]
            }
            else {
                right[(r, c - nc_a)]
            }
        })
    }

    /// Calculates \\(\alpha A x + \beta y\\).
    ///
    /// * `alpha` is a scalar \\(\alpha\\).
    /// * `x` is a vector \\(x\\), its length shall be the number of columns.
    /// * `beta` is a scalar \\(\beta\\).
    /// * `y` is a vector \\(y\\) before entry, \\(\alpha A x + \beta y\\) on exit.
    pub fn op(&self, alpha: L::F, x: &[L::F], beta: L::F, y: &mut[L::F])
    {
        match self.typ {
            MatType::General(nr, nc) => {
                L::transform_ge(false, nr, nc, alpha, &self.array, x, beta, y);
            },
            MatType::SymPack(n) => {
                L::transform_sp(n, alpha, &self.array, x, beta, y);
            },
        }
    }

    /// Calculates \\(\alpha A^T x + \beta y\\).
    ///
    /// * `alpha` is a scalar \\(\alpha\\).
    /// * `x` is a vector \\(x\\), its length shall be the number of rows.
    /// * `beta` is a scalar \\(\beta\\).
    /// * `y` is a vector \\(y\\) before entry, \\(\alpha A^T x + \beta y\\) on exit.
    pub fn trans_op(&self, alpha: L::F, x: &[L::F], beta: L::F, y: &mut[L::F])
    {
        match self.typ {
            MatType::General(nr, nc) => {
                L::transform_ge(true, nr, nc, alpha, &self.array, x, beta, y);
            },
            MatType::SymPack(n) => {
                L::transform_sp(n, alpha, &self.array, x, beta, y);
            },
        }
    }

    /// Matrix product \\(A B\\).
    ///
    /// Returns a [`MatType::General`] matrix.
    pub fn mul(&self, rhs: &Self) -> Self
    {
        let (nr, nk) = self.size();
        let (nk_b, nc) = rhs.size();
        assert_eq!(nk, nk_b);

        let rhs = rhs.to_general();
        let mut prod = MatBuild::new(MatType::General(nr, nc));

        if nr > 0 {
            let f0 = L::F::zero();
            let f1 = L::F::one();

            for c in 0.. nc {
                let (_, spl) = prod.array.split_at_mut(c * nr);
                let (y, _) = spl.split_at_mut(nr);
                self.op(f1, rhs.col(c), f0, y);
            }
        }

        prod
    }

    /// Matrix-vector product \\(A x\\).
    ///
    /// Returns the product as a `Vec`.
    pub fn mul_vec(&self, x: &[L::F]) -> Vec<L::F>
    {
        let (nr, _) = self.size();
        let mut y = vec![L::F::zero(); nr];
        self.op(L::F::one(), x, L::F::zero(), &mut y);
        y
    }

    /// A column of the matrix.
    ///
    /// The matrix shall belong to [`MatType::General`].
    pub fn col(&self, c: usize) -> &[L::F]
    {
        assert!(!self.is_sympack());

        let (nr, nc) = self.size();
        assert!(c < nc);

        let (_, spl) = self.array.split_at(c * nr);
        let (v, _) = spl.split_at(nr);
        v
    }

    fn index(&self, (r, c): (usize, usize)) -> usize
    {
        let i = match self.typ {
            MatType::General(nr, nc) => {
                assert!(r < nr);
                assert!(c < nc);
                c * nr + r
            },
            MatType::SymPack(n) => {
                assert!(r < n);
                assert!(c < n);
                let (r, c) = if r <= c {
                    (r, c)
                }
                else {
                    (c, r)
                };
                c * (c + 1) / 2 + r
            },
        };

        assert!(i < self.array.len());
        i
    }
}

//

impl<L: LinAlgEx> Index<(usize, usize)> for MatBuild<L>
{
    type Output = L::F;
    fn index(&self, index: (usize, usize)) -> &Self::Output
    {
        let i = self.index(index);

        &self.array[i]
    }
}

impl<L: LinAlgEx> IndexMut<(usize, usize)> for MatBuild<L>
{
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output
    {
        let i = self.index(index);

        &mut self.array[i]
    }
}

//

impl<L: LinAlgEx> AsRef<[L::F]> for MatBuild<L>
{
    fn as_ref(&self) -> &[L::F]
    {
        &self.array
    }
}

impl<L: LinAlgEx> AsMut<[L::F]> for MatBuild<L>
{
    fn as_mut(&mut self) -> &mut[L::F]
    {
        &mut self.array
    }
}

//

impl<L: LinAlgEx> core::fmt::Debug for MatBuild<L>
where L::F: Float + core::fmt::LowerExp
{
    fn fmt(&self, f: &mut core::fmt::Formatter) -> Result<(), core::fmt::Error>
    {
        let (nr, nc) = self.size();

        match self.typ {
            MatType::General(_, _) => writeln!(f, "General {} x {}", nr, nc)?,
            MatType::SymPack(_) => writeln!(f, "SymPack {} x {}", nr, nc)?,
        }

        for r in 0.. nr {
            write!(f, "  ")?;
            for c in 0.. nc {
                write!(f, "{:10.3e}", self[(r, c)])?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

//

#[test]
fn test_matbuild1()
{
    use float_eq::assert_float_eq;
    use crate::linalg::FloatGeneric;

    type L = FloatGeneric<f64>;

    let ref_array = &[ // column-major
        1., 2., 3.,
        2., 4., 5.,
        3., 5., 6.,
    ];

    let m = MatBuild::<L>::new(MatType::SymPack(3))
            .iter_rowmaj(&[
                1., 2., 3.,
                2., 4., 5.,
                3., 5., 6.,
            ]);
    assert!(m.is_sympack());

    let g = m.to_general();
    assert_float_eq!(g.as_ref(), ref_array.as_ref(), abs_all <= 1e-12);
}

#[test]
fn test_matbuild2()
{
    use float_eq::assert_float_eq;
    use crate::linalg::FloatGeneric;

    type L = FloatGeneric<f64>;

    let a = MatBuild::<L>::new(MatType::General(2, 3)).iter_rowmaj(&[
        1., 2., 3.,
        4., 5., 6.,
    ]);
    let i = MatBuild::<L>::new_identity(2);

    // [A; A] rows 1 and 2
    let s = a.vstack(&a).rows(&[1, 2]);
    assert_eq!(s.size(), (2, 3));
    assert_float_eq!(s.as_ref(), [4., 1., 5., 2., 6., 3.].as_ref(), abs_all <= 1e-12);

    // [A I]
    let h = a.hstack(&i);
    assert_eq!(h.size(), (2, 5));
    assert_float_eq!(h[(1, 4)], 1., abs <= 1e-12);
    assert_float_eq!(h[(0, 4)], 0., abs <= 1e-12);

    // A A^T
    let p = a.mul(&a.transpose());
    assert_float_eq!(p.as_ref(), [14., 32., 32., 77.].as_ref(), abs_all <= 1e-12);

    assert_float_eq!(a.mul_vec(&[1., 1., 1.]).as_slice(), [6., 15.].as_ref(), abs_all <= 1e-12);
}
