use float_eq::assert_float_eq;
use totsu_activeset::prelude::*;

type La = FloatGeneric<f64>;

type AMatBuild = MatBuild<La>;
type AProbQP = ProbQP<La>;
type ASolver = Solver<La>;

//

fn sym_2i() -> AMatBuild
{
    // (x - 1)^2 + (y - 1)^2 + const with c = (2, 2)
    AMatBuild::new(MatType::SymPack(2)).iter_rowmaj(&[
        2., 0.,
        0., 2.,
    ])
}

#[test]
fn test_qp1()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let n = 2;
    let m = 1;

    let vec_c = AMatBuild::new(MatType::General(n, 1)).iter_colmaj(&[2., 2.]);

    // x + y <= 1
    let mat_ai = AMatBuild::new(MatType::General(m, n)).iter_rowmaj(&[
        1., 1.,
    ]);
    let vec_bi = AMatBuild::new(MatType::General(m, 1)).iter_colmaj(&[1.]);

    let s = ASolver::new();
    let qp = AProbQP::new(sym_2i(), vec_c, None, None, Some(mat_ai), Some(vec_bi));
    let rslt = s.solve_qp(&qp, None).unwrap();
    println!("{:?}", rslt);

    assert_eq!(rslt.state, State::Optimal);
    assert_float_eq!(rslt.x.as_slice(), [0.5, 0.5].as_ref(), abs_all <= 1e-9);
    assert_float_eq!(rslt.multipliers.unwrap().as_slice(), [1.].as_ref(), abs_all <= 1e-9);
    assert_float_eq!(rslt.value, -1.5, abs <= 1e-9);
}

#[test]
fn test_qp_unconstrained()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let sym_q = AMatBuild::new_identity(2);
    let vec_c = AMatBuild::new_vec(vec![3., -1.]);

    let s = ASolver::new();
    let qp = AProbQP::new(sym_q, vec_c, None, None, None, None);
    let rslt = s.solve_qp(&qp, None).unwrap();

    assert_eq!(rslt.state, State::Optimal);
    assert_float_eq!(rslt.x.as_slice(), [3., -1.].as_ref(), abs_all <= 1e-9);
    assert_float_eq!(rslt.value, -5., abs <= 1e-9);
}

#[test]
fn test_qp_box()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // unconstrained optimum (-2, 4) clipped by -1 <= x, y <= 1
    let vec_c = AMatBuild::new_vec(vec![-4., 8.]);
    let mat_ai = AMatBuild::new(MatType::General(4, 2)).iter_rowmaj(&[
         1.,  0.,
        -1.,  0.,
         0.,  1.,
         0., -1.,
    ]);
    let vec_bi = AMatBuild::new_vec(vec![1., 1., 1., 1.]);

    let s = ASolver::new();
    let qp = AProbQP::new(sym_2i(), vec_c, None, None, Some(mat_ai), Some(vec_bi));
    let rslt = s.solve_qp(&qp, None).unwrap();

    assert_eq!(rslt.state, State::Optimal);
    assert_float_eq!(rslt.x.as_slice(), [-1., 1.].as_ref(), abs_all <= 1e-9);

    let l = rslt.multipliers.unwrap();
    assert_float_eq!(l.as_slice(), [0., 2., 6., 0.].as_ref(), abs_all <= 1e-9);
    assert!(l.iter().all(|v| *v >= 0.));
}

#[test]
fn test_qp_equality()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let vec_c = AMatBuild::new_vec(vec![2., 2.]);

    // x - y = 0.5
    let mat_ae = AMatBuild::new(MatType::General(1, 2)).iter_rowmaj(&[
        1., -1.,
    ]);
    let vec_be = AMatBuild::new_vec(vec![0.5]);

    // x + y <= 1
    let mat_ai = AMatBuild::new(MatType::General(1, 2)).iter_rowmaj(&[
        1., 1.,
    ]);
    let vec_bi = AMatBuild::new_vec(vec![1.]);

    let s = ASolver::new();
    let qp = AProbQP::new(sym_2i(), vec_c, Some(mat_ae), Some(vec_be), Some(mat_ai), Some(vec_bi));
    let rslt = s.solve_qp(&qp, None).unwrap();

    assert_eq!(rslt.state, State::Optimal);
    assert_float_eq!(rslt.x.as_slice(), [0.75, 0.25].as_ref(), abs_all <= 1e-9);
    assert_float_eq!(rslt.multipliers.unwrap().as_slice(), [-0.5, 1.].as_ref(), abs_all <= 1e-9);
}

#[test]
fn test_qp_exclude()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // both x <= 2 and y <= 2 are tight at the initial point, inactive at (1, 1)
    let vec_c = AMatBuild::new_vec(vec![2., 2.]);
    let mat_ai = AMatBuild::new_identity(2);
    let vec_bi = AMatBuild::new_vec(vec![2., 2.]);

    let s = ASolver::new();
    let qp = AProbQP::new(sym_2i(), vec_c, None, None, Some(mat_ai), Some(vec_bi));
    let rslt = s.solve_qp(&qp, None).unwrap();

    assert_eq!(rslt.state, State::Optimal);
    assert_eq!(rslt.iterations, 3);
    assert_float_eq!(rslt.x.as_slice(), [1., 1.].as_ref(), abs_all <= 1e-9);
    assert_float_eq!(rslt.multipliers.unwrap().as_slice(), [0., 0.].as_ref(), abs_all <= 1e-9);
}

#[test]
fn test_qp_excess_iter()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let vec_c = AMatBuild::new_vec(vec![2., 2.]);
    let mat_ai = AMatBuild::new_identity(2);
    let vec_bi = AMatBuild::new_vec(vec![2., 2.]);

    let s = ASolver::new().par(|p| {
        p.max_iter = 2;
    });
    let qp = AProbQP::new(sym_2i(), vec_c, None, None, Some(mat_ai), Some(vec_bi));
    let rslt = s.solve_qp(&qp, None).unwrap();

    assert_eq!(rslt.state, State::Approximate);
    assert!(!rslt.state.is_optimal());
    assert_eq!(rslt.iterations, 2);
    assert_float_eq!(rslt.x.as_slice(), [1., 2.].as_ref(), abs_all <= 1e-9);
}

#[test]
fn test_qp_excess_iter_feasibility()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // the feasibility LP needs two pivots to find x <= 2, y <= 2 feasible
    let vec_c = AMatBuild::new_vec(vec![2., 2.]);
    let mat_ai = AMatBuild::new_identity(2);
    let vec_bi = AMatBuild::new_vec(vec![2., 2.]);

    let s = ASolver::new().par(|p| {
        p.max_iter = 1;
    });
    let qp = AProbQP::new(sym_2i(), vec_c, None, None, Some(mat_ai), Some(vec_bi));
    let rslt = s.solve_qp(&qp, None).unwrap();

    assert_eq!(rslt.state, State::Failed);
    assert_ne!(rslt.state, State::Infeasible);
    assert_eq!(rslt.iterations, 0);
}

#[test]
fn test_qp_singular_active_set()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // minimize -x subject to x <= 0 and 2x <= 0, with Q = 0
    let sym_q = AMatBuild::new(MatType::General(2, 2));
    let vec_c = AMatBuild::new_vec(vec![1., 0.]);
    let mat_ai = AMatBuild::new(MatType::General(2, 2)).iter_rowmaj(&[
        1., 0.,
        2., 0.,
    ]);
    let vec_bi = AMatBuild::new_vec(vec![0., 0.]);

    // no retry allowed for the singular subproblem
    let s = ASolver::new().par(|p| {
        p.max_retry = 0;
    });
    let qp = AProbQP::new(sym_q.clone(), vec_c.clone(), None, None, Some(mat_ai.clone()), Some(vec_bi.clone()));
    let rslt = s.solve_qp(&qp, None).unwrap();

    assert_eq!(rslt.state, State::Failed);
    assert_eq!(rslt.iterations, 1);

    // shrinking to the empty active set recovers
    let s = ASolver::new();
    let qp = AProbQP::new(sym_q, vec_c, None, None, Some(mat_ai), Some(vec_bi));
    let rslt = s.solve_qp(&qp, None).unwrap();

    assert_eq!(rslt.state, State::Optimal);
    assert_float_eq!(rslt.x[0], 0., abs <= 1e-9);
    assert!(rslt.x[0] <= 1e-9);
}

#[test]
fn test_qp_unbounded_unreported()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // minimize -x subject to -x <= 0 is unbounded below, but not detected
    let sym_q = AMatBuild::new(MatType::General(1, 1));
    let vec_c = AMatBuild::new_vec(vec![1.]);
    let mat_ai = AMatBuild::new(MatType::General(1, 1)).iter_colmaj(&[-1.]);
    let vec_bi = AMatBuild::new_vec(vec![0.]);

    let s = ASolver::new();
    let qp = AProbQP::new(sym_q, vec_c, None, None, Some(mat_ai), Some(vec_bi));
    let rslt = s.solve_qp(&qp, None).unwrap();

    assert_eq!(rslt.state, State::Optimal);
    assert_float_eq!(rslt.x.as_slice(), [0.].as_ref(), abs_all <= 1e-9);
    assert_float_eq!(rslt.value, 0., abs <= 1e-9);
}

#[test]
fn test_qp_semidefinite()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // x^2 - 2x - y subject to y <= 3
    let sym_q = AMatBuild::new(MatType::SymPack(2)).iter_rowmaj(&[
        2., 0.,
        0., 0.,
    ]);
    let vec_c = AMatBuild::new_vec(vec![2., 1.]);
    let mat_ai = AMatBuild::new(MatType::General(1, 2)).iter_rowmaj(&[
        0., 1.,
    ]);
    let vec_bi = AMatBuild::new_vec(vec![3.]);

    let s = ASolver::new();
    let qp = AProbQP::new(sym_q, vec_c, None, None, Some(mat_ai), Some(vec_bi));
    let rslt = s.solve_qp(&qp, None).unwrap();

    assert_eq!(rslt.state, State::Optimal);
    assert_float_eq!(rslt.x.as_slice(), [1., 3.].as_ref(), abs_all <= 1e-9);
    assert_float_eq!(rslt.multipliers.unwrap().as_slice(), [1.].as_ref(), abs_all <= 1e-9);
}

#[test]
fn test_qp_kick()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let vec_c = AMatBuild::new_vec(vec![2., 2.]);
    let mat_ai = AMatBuild::new(MatType::General(1, 2)).iter_rowmaj(&[
        1., 1.,
    ]);
    let vec_bi = AMatBuild::new_vec(vec![1.]);

    let s = ASolver::new();
    let qp = AProbQP::new(sym_2i(), vec_c, None, None, Some(mat_ai), Some(vec_bi));

    let first = s.solve_qp(&qp, None).unwrap();
    assert_eq!(first.state, State::Optimal);

    let rslt = s.solve_qp(&qp, Some(&first)).unwrap();
    assert_eq!(rslt.state, State::Optimal);
    assert_eq!(rslt.iterations, 1);
    assert_float_eq!(rslt.x.as_slice(), [0.5, 0.5].as_ref(), abs_all <= 1e-9);

    // infeasible kick falls back to the feasibility LP
    let kick = Solution {
        state: State::Approximate,
        x: vec![1., 1.],
        multipliers: None,
        value: 0.,
        iterations: 0,
    };
    let rslt = s.solve_qp(&qp, Some(&kick)).unwrap();
    assert_eq!(rslt.state, State::Optimal);
    assert_float_eq!(rslt.x.as_slice(), [0.5, 0.5].as_ref(), abs_all <= 1e-9);
}

#[test]
fn test_qp_infeasible()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // x <= -1 and -x <= -1
    let sym_q = AMatBuild::new_identity(1);
    let vec_c = AMatBuild::new_vec(vec![0.]);
    let mat_ai = AMatBuild::new(MatType::General(2, 1)).iter_colmaj(&[1., -1.]);
    let vec_bi = AMatBuild::new_vec(vec![-1., -1.]);

    let s = ASolver::new();
    let qp = AProbQP::new(sym_q, vec_c, None, None, Some(mat_ai), Some(vec_bi));
    let rslt = s.solve_qp(&qp, None).unwrap();

    assert_eq!(rslt.state, State::Infeasible);
    assert!(rslt.state.is_failure());
    assert_float_eq!(rslt.x.as_slice(), [0.].as_ref(), abs_all <= 1e-12);
}

#[test]
fn test_qp_observer()
{
    let _ = env_logger::builder().is_test(true).try_init();

    struct Transitions
    {
        states: Vec<State>,
    }

    impl Observer<f64> for Transitions
    {
        fn state_changed(&mut self, _from: State, to: State)
        {
            self.states.push(to);
        }
    }

    let vec_c = AMatBuild::new_vec(vec![2., 2.]);
    let mat_ai = AMatBuild::new(MatType::General(1, 2)).iter_rowmaj(&[
        1., 1.,
    ]);
    let vec_bi = AMatBuild::new_vec(vec![1.]);

    let s = ASolver::new();
    let qp = AProbQP::new(sym_2i(), vec_c, None, None, Some(mat_ai), Some(vec_bi));

    let mut o = Transitions { states: Vec::new() };
    let rslt = s.solve_qp_with(&qp, None, &mut o).unwrap();

    assert_eq!(rslt.state, State::Optimal);
    assert_eq!(o.states.first(), Some(&State::Valid));
    assert_eq!(o.states.last(), Some(&State::Optimal));
}

#[test]
fn test_qp_errors()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let s = ASolver::new();

    // b_I without A_I
    let qp = AProbQP::new(sym_2i(), AMatBuild::new_vec(vec![1., 1.]), None, None, None, Some(AMatBuild::new_vec(vec![1.])));
    assert_eq!(s.solve_qp(&qp, None), Err(SolverError::MissingPair));

    // c of a wrong length
    let qp = AProbQP::new(sym_2i(), AMatBuild::new_vec(vec![1., 1., 1.]), None, None, None, None);
    assert_eq!(s.solve_qp(&qp, None), Err(SolverError::InvalidOp));

    // linearly dependent equality rows
    let mat_ae = AMatBuild::new(MatType::General(2, 2)).iter_rowmaj(&[
        1., 0.,
        2., 0.,
    ]);
    let vec_be = AMatBuild::new_vec(vec![1., 2.]);
    let qp = AProbQP::new(sym_2i(), AMatBuild::new_vec(vec![2., 2.]), Some(mat_ae), Some(vec_be), None, None);
    assert_eq!(s.solve_qp(&qp, None), Err(SolverError::RankDeficient));
}
