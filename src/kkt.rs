//! KKT system assembly

use crate::linalg::LinAlgEx;
use crate::matbuild::{MatBuild, MatType};

/// Assembles a bordered KKT system.
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Returns a tuple of the matrix and the right-hand side
/// \\[
/// \left[\matrix{Q & A^T \\\\ A & 0}\right],\quad
/// \left[\matrix{c \\\\ b}\right].
/// \\]
/// If `a` has no rows, returns \\(Q\\) and \\(c\\) as they are.
/// * `q` is \\(Q\\), either [`MatType::General`] or [`MatType::SymPack`].
/// * `a` is \\(A\\).
/// * `c` is \\(c\\), a column.
/// * `b` is \\(b\\), a column.
pub fn kkt_system<L: LinAlgEx>(q: &MatBuild<L>, a: &MatBuild<L>, c: &MatBuild<L>, b: &MatBuild<L>)
-> (MatBuild<L>, MatBuild<L>)
{
    let (m, n) = a.size();
    assert_eq!(q.size(), (n, n));
    assert_eq!(c.size(), (n, 1));
    assert_eq!(b.size(), (m, 1));

    let q = q.to_general();

    if m == 0 {
        return (q, c.to_general());
    }

    let upper = q.hstack(&a.transpose());
    let lower = a.hstack(&MatBuild::new(MatType::General(m, m)));

    (upper.vstack(&lower), c.vstack(b))
}

//

#[test]
fn test_kkt1()
{
    use float_eq::assert_float_eq;
    use crate::linalg::FloatGeneric;

    type L = FloatGeneric<f64>;

    let q = MatBuild::<L>::new(MatType::SymPack(2)).iter_rowmaj(&[
        2., 0.,
        0., 2.,
    ]);
    let a = MatBuild::<L>::new(MatType::General(1, 2)).iter_rowmaj(&[
        1., 3.,
    ]);
    let c = MatBuild::<L>::new_vec(vec![2., 2.]);
    let b = MatBuild::<L>::new_vec(vec![1.]);

    let (k, r) = kkt_system(&q, &a, &c, &b);
    let ref_k = MatBuild::<L>::new(MatType::General(3, 3)).iter_rowmaj(&[
        2., 0., 1.,
        0., 2., 3.,
        1., 3., 0.,
    ]);

    assert_eq!(k.size(), (3, 3));
    assert_float_eq!(k.as_ref(), ref_k.as_ref(), abs_all <= 1e-12);
    assert_float_eq!(r.as_ref(), [2., 2., 1.].as_ref(), abs_all <= 1e-12);

    let a0 = MatBuild::<L>::new(MatType::General(0, 2));
    let b0 = MatBuild::<L>::new(MatType::General(0, 1));
    let (k, r) = kkt_system(&q, &a0, &c, &b0);
    assert_eq!(k.size(), (2, 2));
    assert_eq!(r.size(), (2, 1));
}
