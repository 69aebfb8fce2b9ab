use float_eq::assert_float_eq;
use totsu_activeset::prelude::*;

type La = FloatGeneric<f64>;

type AMatBuild = MatBuild<La>;
type AProbLP = ProbLP<La>;
type ASolver = Solver<La>;

//

#[test]
fn test_lp1()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let n = 2; // x, y
    let m = 2;

    // minimize -x - 2y
    let vec_c = AMatBuild::new(MatType::General(n, 1)).iter_colmaj(&[-1., -2.]);

    // x + y <= 4, y <= 3
    let mat_ai = AMatBuild::new(MatType::General(m, n)).iter_rowmaj(&[
        1., 1.,
        0., 1.,
    ]);
    let vec_bi = AMatBuild::new(MatType::General(m, 1)).iter_colmaj(&[4., 3.]);

    let s = ASolver::new();
    let lp = AProbLP::new(vec_c, None, None, Some(mat_ai), Some(vec_bi));
    let rslt = s.solve_lp(&lp).unwrap();
    println!("{:?}", rslt);

    assert_eq!(rslt.state, State::Optimal);
    assert_float_eq!(rslt.x.as_slice(), [1., 3.].as_ref(), abs_all <= 1e-9);
    assert_float_eq!(rslt.value, -7., abs <= 1e-9);
    assert_float_eq!(rslt.multipliers.unwrap().as_slice(), [-1., -1.].as_ref(), abs_all <= 1e-9);
}

#[test]
fn test_lp_box()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let vec_c = AMatBuild::new_vec(vec![-1., -1.]);
    let mat_ai = AMatBuild::new_identity(2);
    let vec_bi = AMatBuild::new_vec(vec![2., 2.]);

    let s = ASolver::new();
    let lp = AProbLP::new(vec_c, None, None, Some(mat_ai), Some(vec_bi));
    let rslt = s.solve_lp(&lp).unwrap();

    assert_eq!(rslt.state, State::Optimal);
    assert_float_eq!(rslt.x.as_slice(), [2., 2.].as_ref(), abs_all <= 1e-9);
    assert_float_eq!(rslt.value, -4., abs <= 1e-9);
}

#[test]
fn test_lp_negative_rhs()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // minimize x + y subject to x + y >= 2
    let vec_c = AMatBuild::new_vec(vec![1., 1.]);
    let mat_ai = AMatBuild::new(MatType::General(1, 2)).iter_rowmaj(&[
        -1., -1.,
    ]);
    let vec_bi = AMatBuild::new_vec(vec![-2.]);

    let s = ASolver::new();
    let lp = AProbLP::new(vec_c, None, None, Some(mat_ai), Some(vec_bi));
    let rslt = s.solve_lp(&lp).unwrap();

    assert_eq!(rslt.state, State::Optimal);
    assert_float_eq!(rslt.value, 2., abs <= 1e-9);
    assert_float_eq!(rslt.x[0] + rslt.x[1], 2., abs <= 1e-9);
    // dual of the row as given, not of the negated one
    assert_float_eq!(rslt.multipliers.unwrap().as_slice(), [-1.].as_ref(), abs_all <= 1e-9);
}

#[test]
fn test_lp_equality()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // x + y = 2, x - y <= 1
    let vec_c = AMatBuild::new_vec(vec![1., 2.]);
    let mat_ae = AMatBuild::new(MatType::General(1, 2)).iter_rowmaj(&[
        1., 1.,
    ]);
    let vec_be = AMatBuild::new_vec(vec![2.]);
    let mat_ai = AMatBuild::new(MatType::General(1, 2)).iter_rowmaj(&[
        1., -1.,
    ]);
    let vec_bi = AMatBuild::new_vec(vec![1.]);

    let s = ASolver::new();
    let lp = AProbLP::new(vec_c, Some(mat_ae), Some(vec_be), Some(mat_ai), Some(vec_bi));
    let rslt = s.solve_lp(&lp).unwrap();

    assert_eq!(rslt.state, State::Optimal);
    assert_float_eq!(rslt.x.as_slice(), [1.5, 0.5].as_ref(), abs_all <= 1e-9);
    assert_float_eq!(rslt.value, 2.5, abs <= 1e-9);
    assert_float_eq!(rslt.multipliers.unwrap().as_slice(), [1.5, -0.5].as_ref(), abs_all <= 1e-9);
}

#[test]
fn test_lp_infeasible()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // x = 5 and x = 6
    let vec_c = AMatBuild::new_vec(vec![1.]);
    let mat_ae = AMatBuild::new(MatType::General(2, 1)).iter_colmaj(&[1., 1.]);
    let vec_be = AMatBuild::new_vec(vec![5., 6.]);

    let s = ASolver::new();
    let lp = AProbLP::new(vec_c, Some(mat_ae), Some(vec_be), None, None);
    let rslt = s.solve_lp(&lp).unwrap();

    assert_eq!(rslt.state, State::Infeasible);
}

#[test]
fn test_lp_unbounded()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // minimize -x subject to y <= 1
    let vec_c = AMatBuild::new_vec(vec![-1., 0.]);
    let mat_ai = AMatBuild::new(MatType::General(1, 2)).iter_rowmaj(&[
        0., 1.,
    ]);
    let vec_bi = AMatBuild::new_vec(vec![1.]);

    let s = ASolver::new();
    let lp = AProbLP::new(vec_c, None, None, Some(mat_ai), Some(vec_bi));
    let rslt = s.solve_lp(&lp).unwrap();

    assert_eq!(rslt.state, State::Unbounded);
}

#[test]
fn test_lp_excess_iter()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let vec_c = AMatBuild::new_vec(vec![-1., -1.]);
    let mat_ai = AMatBuild::new_identity(2);
    let vec_bi = AMatBuild::new_vec(vec![2., 2.]);

    let s = ASolver::new().par(|p| {
        p.max_iter = 1;
    });
    let lp = AProbLP::new(vec_c, None, None, Some(mat_ai), Some(vec_bi));
    let rslt = s.solve_lp(&lp).unwrap();

    // stopped in Phase 1 without a feasible basis
    assert_eq!(rslt.state, State::Failed);
    assert!(rslt.state.is_failure());
    assert_eq!(rslt.iterations, 1);
}

#[test]
fn test_lp_errors()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let s = ASolver::new();

    let lp = AProbLP::new(AMatBuild::new_vec(vec![1., 1.]), Some(AMatBuild::new_identity(2)), None, None, None);
    assert_eq!(s.solve_lp(&lp), Err(SolverError::MissingPair));

    let lp = AProbLP::new(AMatBuild::new_vec(vec![1., 1.]), None, None, Some(AMatBuild::new_identity(3)), Some(AMatBuild::new_vec(vec![1., 1., 1.])));
    assert_eq!(s.solve_lp(&lp), Err(SolverError::InvalidOp));
}
