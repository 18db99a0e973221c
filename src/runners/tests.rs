//! Scenario tests driving the full engine: graph construction, execution
//! list, dispatch, and the runners, checked against exact expected factors
//! and the `L * U == A` reconstruction law at 1e-14.

use crate::dtype::Complex128;
use crate::error::Error;
use crate::graph::exec::run_tree;
use crate::graph::{Graph, OpKind};
use crate::terminal::Terminal;

const TOL: f64 = 1e-14;

// Well-conditioned 5x4 (also read as 2x10), column-major
const COND_OK_5X4: [f64; 20] = [
    5.0, 9.0, 10.0, 8.0, 1.0, 9.0, 17.0, 19.0, 15.0, 2.0, 10.0, 19.0, 29.0, 21.0, 3.0, 8.0,
    15.0, 21.0, 28.0, 4.0,
];

// 5x3 whose pivot order is fully reversed during elimination
const REVERSE_PIVOT_5X3: [f64; 15] = [
    1.0, 4.0, 7.0, -10.0, -13.0, 2.0, -5.0, 8.0, 11.0, -14.0, 3.0, 6.0, -9.0, -12.0, -15.0,
];

// Rank-1 3x3: rows (1,2,3), (10,20,30), (1,2,3)
const SINGULAR_3X3: [f64; 9] = [1.0, 10.0, 1.0, 2.0, 20.0, 2.0, 3.0, 30.0, 3.0];

const ONE_TO_TEN: [f64; 10] = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];

/// Widen real data into the complex plane along the ray `1 - 2i`
fn complexify(data: &[f64]) -> Vec<Complex128> {
    data.iter().map(|&x| Complex128::new(x, -2.0 * x)).collect()
}

/// Decompose `input`, compare factors against expectations, then reconstruct
/// through the MTIMES runner and compare against the input
fn check_lu(input: Terminal<'static>, expected_l: Terminal<'static>, expected_u: Terminal<'static>) {
    let mut g = Graph::new();
    let a = g.terminal(input.clone());
    let lu = g.expr(OpKind::Lu, &[a]).unwrap();
    run_tree(&mut g, lu).unwrap();

    let regs = g.registers(lu).unwrap();
    assert_eq!(regs.len(), 2);
    let l = regs[0].clone();
    let u = regs[1].clone();

    assert!(l.maths_equals(&expected_l, TOL, TOL), "L mismatch: {l:?}");
    assert!(u.maths_equals(&expected_u, TOL, TOL), "U mismatch: {u:?}");

    let ln = g.terminal(l);
    let un = g.terminal(u);
    let product = g.expr(OpKind::Mtimes, &[ln, un]).unwrap();
    run_tree(&mut g, product).unwrap();

    let back = &g.registers(product).unwrap()[0];
    assert!(input.maths_equals(back, TOL, TOL), "L*U != A: {back:?}");
}

fn real_matrix(data: Vec<f64>, rows: usize, cols: usize) -> Terminal<'static> {
    Terminal::owned_real_matrix(data, rows, cols).unwrap()
}

fn complex_matrix(data: Vec<Complex128>, rows: usize, cols: usize) -> Terminal<'static> {
    Terminal::owned_complex_matrix(data, rows, cols).unwrap()
}

#[test]
fn test_lu_real_scalar() {
    check_lu(
        Terminal::real_scalar(13.0),
        Terminal::real_scalar(1.0),
        Terminal::real_scalar(13.0),
    );
}

#[test]
fn test_lu_complex_scalar() {
    check_lu(
        Terminal::complex_scalar(Complex128::new(13.0, 37.0)),
        Terminal::real_scalar(1.0),
        Terminal::complex_scalar(Complex128::new(13.0, 37.0)),
    );
}

#[test]
fn test_lu_real_5x4() {
    let expected_l = real_matrix(
        vec![
            0.5, 0.9, 1.0, 0.8, 0.1, //
            1.0, 0.2, 0.0, 0.4, -0.2, //
            0.0, 1.0, 0.0, 0.0645161290322571, 0.1290322580645162, //
            0.0, 0.0, 0.0, 1.0, 0.1480519480519481,
        ],
        5,
        4,
    );
    let expected_u = real_matrix(
        vec![
            10.0, 0.0, 0.0, 0.0, //
            19.0, -0.5, 0.0, 0.0, //
            29.0, -4.5, -6.2, 0.0, //
            21.0, -2.5, -3.4, 12.4193548387096779,
        ],
        4,
        4,
    );
    check_lu(
        Terminal::viewed_real_matrix(&COND_OK_5X4, 5, 4).unwrap(),
        expected_l,
        expected_u,
    );
}

#[test]
fn test_lu_real_2x10_trapezoidal() {
    let expected_l = real_matrix(vec![0.5555555555555555, 1.0, 1.0, 0.0], 2, 2);
    let expected_u = real_matrix(
        vec![
            9.0, 0.0, //
            8.0, 5.5555555555555554, //
            9.0, -4.0, //
            19.0, 6.4444444444444446, //
            2.0, 13.8888888888888893, //
            19.0, -0.5555555555555554, //
            21.0, 17.3333333333333321, //
            8.0, -1.4444444444444446, //
            21.0, 3.3333333333333321, //
            4.0, 25.7777777777777786,
        ],
        2,
        10,
    );
    check_lu(
        Terminal::viewed_real_matrix(&COND_OK_5X4, 2, 10).unwrap(),
        expected_l,
        expected_u,
    );
}

#[test]
fn test_lu_real_reverse_pivot_5x3() {
    let expected_l = real_matrix(
        vec![
            -0.0769230769230769, -0.3076923076923077, -0.5384615384615385, 0.7692307692307693,
            1.0, //
            0.0424028268551237, -0.4275618374558304, 0.0212014134275618, 1.0, 0.0, //
            -0.1093167701863354, -0.0695652173913043, 1.0, 0.0, 0.0,
        ],
        5,
        3,
    );
    let expected_u = real_matrix(
        vec![
            -13.0, 0.0, 0.0, //
            -14.0, 21.7692307692307701, 0.0, //
            -15.0, -0.4615384615384617, -17.0671378091872832,
        ],
        3,
        3,
    );
    check_lu(
        Terminal::viewed_real_matrix(&REVERSE_PIVOT_5X3, 5, 3).unwrap(),
        expected_l,
        expected_u,
    );
}

#[test]
fn test_lu_real_row_vector() {
    // 1xN: L is the scalar 1, U is the input unchanged
    check_lu(
        Terminal::viewed_real_matrix(&ONE_TO_TEN, 1, 10).unwrap(),
        Terminal::real_scalar(1.0),
        real_matrix(ONE_TO_TEN.to_vec(), 1, 10),
    );
}

#[test]
fn test_lu_real_column_vector() {
    // Nx1: U is the pivot element, L is the input scaled by it
    check_lu(
        Terminal::viewed_real_matrix(&ONE_TO_TEN, 10, 1).unwrap(),
        real_matrix(vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0], 10, 1),
        Terminal::real_scalar(10.0),
    );
}

#[test]
fn test_lu_complex_5x4() {
    // Complex input on the ray 1-2i: same pivoting and real L as the real
    // case, U scaled onto the ray
    let expected_l = real_matrix(
        vec![
            0.5, 0.9, 1.0, 0.8, 0.1, //
            1.0, 0.2, 0.0, 0.4, -0.2, //
            0.0, 1.0, 0.0, 0.0645161290322571, 0.1290322580645162, //
            0.0, 0.0, 0.0, 1.0, 0.1480519480519481,
        ],
        5,
        4,
    );
    let expected_u = complex_matrix(
        complexify(&[
            10.0, 0.0, 0.0, 0.0, //
            19.0, -0.5, 0.0, 0.0, //
            29.0, -4.5, -6.2, 0.0, //
            21.0, -2.5, -3.4, 12.4193548387096779,
        ]),
        4,
        4,
    );
    check_lu(
        complex_matrix(complexify(&COND_OK_5X4), 5, 4),
        expected_l,
        expected_u,
    );
}

#[test]
fn test_lu_complex_2x10_trapezoidal() {
    let expected_l = real_matrix(vec![0.5555555555555555, 1.0, 1.0, 0.0], 2, 2);
    let expected_u = complex_matrix(
        complexify(&[
            9.0, 0.0, 8.0, 5.5555555555555554, 9.0, -4.0, 19.0, 6.4444444444444446, 2.0,
            13.8888888888888893, 19.0, -0.5555555555555554, 21.0, 17.3333333333333321, 8.0,
            -1.4444444444444446, 21.0, 3.3333333333333321, 4.0, 25.7777777777777786,
        ]),
        2,
        10,
    );
    check_lu(
        complex_matrix(complexify(&COND_OK_5X4), 2, 10),
        expected_l,
        expected_u,
    );
}

#[test]
fn test_lu_complex_vectors() {
    let c_one_to_ten = complexify(&ONE_TO_TEN);

    check_lu(
        complex_matrix(c_one_to_ten.clone(), 1, 10),
        Terminal::real_scalar(1.0),
        complex_matrix(c_one_to_ten.clone(), 1, 10),
    );

    check_lu(
        complex_matrix(c_one_to_ten, 10, 1),
        real_matrix(vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0], 10, 1),
        Terminal::complex_scalar(Complex128::new(10.0, -20.0)),
    );
}

/// Singular inputs must evaluate to completion: the singular-system condition
/// is a warning, never an error, and best-effort factors still land in the
/// registers.
fn check_lu_singular(input: Terminal<'static>) {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut g = Graph::new();
    let a = g.terminal(input.clone());
    let lu = g.expr(OpKind::Lu, &[a]).unwrap();
    run_tree(&mut g, lu).unwrap();

    let regs = g.registers(lu).unwrap();
    assert_eq!(regs.len(), 2);

    // The rank-deficient factorization is still exact for these inputs
    let l = regs[0].clone();
    let u = regs[1].clone();
    let ln = g.terminal(l);
    let un = g.terminal(u);
    let product = g.expr(OpKind::Mtimes, &[ln, un]).unwrap();
    run_tree(&mut g, product).unwrap();
    let back = &g.registers(product).unwrap()[0];
    assert!(input.maths_equals(back, TOL, TOL));
}

#[test]
fn test_lu_singular_real_scalar() {
    check_lu_singular(Terminal::real_scalar(0.0));
}

#[test]
fn test_lu_singular_complex_scalar() {
    check_lu_singular(Terminal::complex_scalar(Complex128::ZERO));
}

#[test]
fn test_lu_singular_real_3x3() {
    check_lu_singular(Terminal::viewed_real_matrix(&SINGULAR_3X3, 3, 3).unwrap());
}

#[test]
fn test_lu_singular_complex_3x3() {
    check_lu_singular(complex_matrix(complexify(&SINGULAR_3X3), 3, 3));
}

/// Evaluate a binary operation over two terminals and return register 0
fn eval_binary(op: OpKind, a: Terminal<'static>, b: Terminal<'static>) -> Terminal<'static> {
    let mut g = Graph::new();
    let an = g.terminal(a);
    let bn = g.terminal(b);
    let node = g.expr(op, &[an, bn]).unwrap();
    run_tree(&mut g, node).unwrap();
    g.registers(node).unwrap()[0].clone()
}

#[test]
fn test_mtimes_scalar_scalar() {
    let r = eval_binary(
        OpKind::Mtimes,
        Terminal::real_scalar(2.0),
        Terminal::real_scalar(3.0),
    );
    assert!(r.maths_equals(&Terminal::real_scalar(6.0), TOL, TOL));
}

#[test]
fn test_mtimes_unit_matrix_scales() {
    let expected = real_matrix(vec![20.0, 40.0], 2, 1);

    let r = eval_binary(
        OpKind::Mtimes,
        real_matrix(vec![2.0], 1, 1),
        real_matrix(vec![10.0, 20.0], 2, 1),
    );
    assert!(r.maths_equals(&expected, TOL, TOL));

    let r = eval_binary(
        OpKind::Mtimes,
        real_matrix(vec![10.0, 20.0], 2, 1),
        real_matrix(vec![2.0], 1, 1),
    );
    assert!(r.maths_equals(&expected, TOL, TOL));
}

#[test]
fn test_mtimes_matrix_vector() {
    let r = eval_binary(
        OpKind::Mtimes,
        real_matrix(vec![1.0, 3.0, 5.0, 2.0, 4.0, 6.0], 3, 2),
        real_matrix(vec![10.0, 20.0], 2, 1),
    );
    assert!(r.maths_equals(&real_matrix(vec![50.0, 110.0, 170.0], 3, 1), TOL, TOL));
}

#[test]
fn test_mtimes_matrix_matrix() {
    let r = eval_binary(
        OpKind::Mtimes,
        real_matrix(vec![1.0, 3.0, 5.0, 2.0, 4.0, 6.0], 3, 2),
        real_matrix(vec![10.0, 30.0, 20.0, 40.0], 2, 2),
    );
    assert!(r.maths_equals(
        &real_matrix(vec![70.0, 150.0, 230.0, 100.0, 220.0, 340.0], 3, 2),
        TOL,
        TOL
    ));
}

#[test]
fn test_mtimes_complex_scalars() {
    // (2+4i)(3+5i) = -14+22i
    let r = eval_binary(
        OpKind::Mtimes,
        Terminal::complex_scalar(Complex128::new(2.0, 4.0)),
        Terminal::complex_scalar(Complex128::new(3.0, 5.0)),
    );
    assert!(r.maths_equals(
        &Terminal::complex_scalar(Complex128::new(-14.0, 22.0)),
        TOL,
        TOL
    ));

    // Real/complex promotion, both operand orders
    let expected = Terminal::complex_scalar(Complex128::new(20.0, 40.0));
    let r = eval_binary(
        OpKind::Mtimes,
        Terminal::complex_scalar(Complex128::new(2.0, 4.0)),
        Terminal::real_scalar(10.0),
    );
    assert!(r.maths_equals(&expected, TOL, TOL));
    let r = eval_binary(
        OpKind::Mtimes,
        Terminal::real_scalar(10.0),
        Terminal::complex_scalar(Complex128::new(2.0, 4.0)),
    );
    assert!(r.maths_equals(&expected, TOL, TOL));
}

#[test]
fn test_mtimes_complex_matrix_vector() {
    let a = complex_matrix(
        vec![
            Complex128::new(1.0, 10.0),
            Complex128::new(3.0, 30.0),
            Complex128::new(5.0, 50.0),
            Complex128::new(2.0, 20.0),
            Complex128::new(4.0, 40.0),
            Complex128::new(6.0, 60.0),
        ],
        3,
        2,
    );
    let x = complex_matrix(
        vec![Complex128::new(1.0, 10.0), Complex128::new(2.0, 20.0)],
        2,
        1,
    );
    let r = eval_binary(OpKind::Mtimes, a, x);
    assert!(r.maths_equals(
        &complex_matrix(
            vec![
                Complex128::new(-495.0, 100.0),
                Complex128::new(-1089.0, 220.0),
                Complex128::new(-1683.0, 340.0),
            ],
            3,
            1
        ),
        TOL,
        TOL
    ));
}

#[test]
fn test_mtimes_bad_commute_is_fatal() {
    let mut g = Graph::new();
    let a = g.terminal(real_matrix(vec![1.0, 3.0, 5.0, 2.0, 4.0, 6.0], 3, 2));
    let b = g.terminal(real_matrix(vec![10.0, 30.0, 20.0, 40.0, 50.0, 60.0, 70.0], 1, 7));
    let node = g.expr(OpKind::Mtimes, &[a, b]).unwrap();

    let err = run_tree(&mut g, node);
    assert!(matches!(
        err,
        Err(Error::DimensionMismatch { op: "MTIMES", .. })
    ));
    assert!(g.registers(node).is_err());
}

#[test]
fn test_plus_promotes_mixed_operands() {
    let r = eval_binary(
        OpKind::Plus,
        Terminal::real_scalar(1.0),
        complex_matrix(
            vec![Complex128::new(1.0, 2.0), Complex128::new(3.0, 4.0)],
            2,
            1,
        ),
    );
    assert!(r.maths_equals(
        &complex_matrix(
            vec![Complex128::new(2.0, 2.0), Complex128::new(4.0, 4.0)],
            2,
            1
        ),
        TOL,
        TOL
    ));
}

#[test]
fn test_shared_subexpression_evaluates_once_with_correct_values() {
    // top = (A + B) + (-(A + B)); the shared sum is evaluated once and read
    // by both parents through its register
    let mut g = Graph::new();
    let a = g.terminal(real_matrix(vec![1.0, 2.0, 3.0, 4.0], 2, 2));
    let b = g.terminal(real_matrix(vec![4.0, 3.0, 2.0, 1.0], 2, 2));
    let shared = g.expr(OpKind::Plus, &[a, b]).unwrap();
    let neg = g.expr(OpKind::Negate, &[shared]).unwrap();
    let top = g.expr(OpKind::Plus, &[shared, neg]).unwrap();

    run_tree(&mut g, top).unwrap();

    let sum = &g.registers(shared).unwrap()[0];
    assert!(sum.maths_equals(&real_matrix(vec![5.0, 5.0, 5.0, 5.0], 2, 2), TOL, TOL));

    let zero = &g.registers(top).unwrap()[0];
    assert!(zero.maths_equals(&real_matrix(vec![0.0, 0.0, 0.0, 0.0], 2, 2), TOL, TOL));
}

#[test]
fn test_transpose_through_engine() {
    let mut g = Graph::new();
    let a = g.terminal(real_matrix(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3));
    let t = g.expr(OpKind::Transpose, &[a]).unwrap();
    run_tree(&mut g, t).unwrap();

    let r = &g.registers(t).unwrap()[0];
    assert!(r.maths_equals(
        &real_matrix(vec![1.0, 3.0, 5.0, 2.0, 4.0, 6.0], 3, 2),
        TOL,
        TOL
    ));
}

#[test]
fn test_lu_feeding_downstream_product() {
    // LU's register 0 (the L factor) flows into a dependent node through the
    // normal operand path
    let mut g = Graph::new();
    let a = g.terminal(real_matrix(vec![4.0, 6.0, 3.0, 3.0], 2, 2));
    let lu = g.expr(OpKind::Lu, &[a]).unwrap();
    let doubled = g.expr(OpKind::Plus, &[lu, lu]).unwrap();
    run_tree(&mut g, doubled).unwrap();

    let l = g.registers(lu).unwrap()[0].clone();
    let mut expected_data: Vec<f64> = Vec::new();
    for j in 0..l.cols() {
        for i in 0..l.rows() {
            expected_data.push(2.0 * l.value_at(i, j).re);
        }
    }
    let expected = real_matrix(expected_data, l.rows(), l.cols());
    assert!(g.registers(doubled).unwrap()[0].maths_equals(&expected, TOL, TOL));
}
