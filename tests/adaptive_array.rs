//! Tests for the adaptation policy and representation-aware arithmetic.
//!
//! These tests exercise the density-driven layout conversions, the lazy
//! nonzero accounting, and the analytic bound estimates, checking numeric
//! results against dense references for every layout pairing.

use adamat::adaptive::{AdaptiveArray, NzBounds};
use adamat::config::AdaptOptions;
use adamat::core::traits::{MatVec, NonzeroCount};
use adamat::error::AdaptError;
use adamat::matrix::dense::DenseMatrix;
use adamat::matrix::sparse::CsrMatrix;
use approx::assert_abs_diff_eq;
use faer::Mat;
use rand::Rng;

fn mat_from_rows(nrows: usize, ncols: usize, data: Vec<f64>) -> Mat<f64> {
    DenseMatrix::from_raw(nrows, ncols, data)
}

/// Random n×m grid with the given nonzero density.
fn random_grid(n: usize, m: usize, density: f64) -> Mat<f64> {
    let mut rng = rand::thread_rng();
    let vals: Vec<f64> = (0..n * m)
        .map(|_| {
            if rng.r#gen::<f64>() < density {
                rng.r#gen::<f64>() + 0.1
            } else {
                0.0
            }
        })
        .collect();
    DenseMatrix::from_raw(n, m, vals)
}

fn assert_mats_eq(a: &Mat<f64>, b: &Mat<f64>) {
    assert_eq!((a.nrows(), a.ncols()), (b.nrows(), b.ncols()));
    for i in 0..a.nrows() {
        for j in 0..a.ncols() {
            assert_abs_diff_eq!(a[(i, j)], b[(i, j)], epsilon = 1e-12);
        }
    }
}

/// Threshold-driven conversion round trip is idempotent: converting an
/// already-converted array again changes nothing, and values survive.
#[test]
fn conversion_round_trip_is_idempotent() {
    let d = random_grid(6, 6, 0.2);
    let mut a = AdaptiveArray::from_dense(d.clone());
    a.sparsify();
    let first = a.to_dense();
    a.densify();
    a.sparsify();
    assert!(a.is_sparse());
    assert_mats_eq(&a.to_dense(), &first);
    assert_mats_eq(&first, &d);
}

/// After `count_nonzeros`, both bounds equal the true nonzero count.
#[test]
fn count_nonzeros_pins_bounds() {
    let d = mat_from_rows(2, 3, vec![1.0, 0.0, 2.0, 0.0, 0.0, 3.0]);
    let true_count = d.nnz();
    let mut a = AdaptiveArray::from_dense(d);
    assert_eq!(a.bounds(), NzBounds::unknown());
    a.count_nonzeros();
    assert_eq!(a.bounds(), NzBounds::exact(true_count));

    let mut s = AdaptiveArray::from_sparse(CsrMatrix::from_csr(
        3,
        3,
        vec![0, 1, 1, 2],
        vec![0, 2],
        vec![4.0, 5.0],
    ));
    s.count_nonzeros();
    assert_eq!(s.bounds(), NzBounds::exact(2));
}

/// A dense 4×4 grid with a single nonzero adapts to sparse (1/16 < 0.4),
/// and a round trip reproduces the grid exactly.
#[test]
fn lone_nonzero_sparsifies() {
    let mut data = vec![0.0; 16];
    data[0] = 1.0;
    let d = mat_from_rows(4, 4, data);
    let mut a = AdaptiveArray::from_dense(d.clone());
    a.adapt();
    assert!(a.is_sparse());
    assert_eq!(a.bounds(), NzBounds::exact(1));
    a.densify();
    assert_mats_eq(&a.to_dense(), &d);
}

/// Both sides of the density boundary on a size-10 grid, where the count
/// threshold is exactly 4.0: a count equal to the threshold converts in
/// neither direction, one below sparsifies dense storage, one above
/// densifies sparse storage.
#[test]
fn threshold_boundary_is_strict() {
    // 2×5, 4 nonzeros: fraction 0.4 exactly, so dense stays dense
    let at = mat_from_rows(2, 5, vec![1.0, 2.0, 3.0, 4.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    let mut a = AdaptiveArray::from_dense(at.clone());
    a.adapt();
    assert!(a.is_dense());
    assert_eq!(a.bounds(), NzBounds::exact(4));

    // 3 nonzeros: one below the boundary sparsifies
    let below = mat_from_rows(2, 5, vec![1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    let mut b = AdaptiveArray::from_dense(below);
    b.adapt();
    assert!(b.is_sparse());

    // sparse with 4 stored entries: fraction 0.4 exactly, so sparse stays sparse
    let mut c = AdaptiveArray::from_sparse(at.to_csr());
    c.adapt();
    assert!(c.is_sparse());

    // 5 stored entries: one above the boundary densifies
    let above = mat_from_rows(2, 5, vec![1.0, 2.0, 3.0, 4.0, 5.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    let mut e = AdaptiveArray::from_sparse(above.to_csr());
    e.adapt();
    assert!(e.is_dense());
}

/// A conclusive cached bound skips the rescan: adapting twice in a row is
/// stable, and the second pass reuses the exact bounds set by the first.
#[test]
fn adapt_is_stable() {
    let d = random_grid(8, 8, 0.1);
    let mut a = AdaptiveArray::from_dense(d.clone());
    a.adapt();
    let bounds = a.bounds();
    let sparse = a.is_sparse();
    a.adapt();
    assert_eq!(a.bounds(), bounds);
    assert_eq!(a.is_sparse(), sparse);
    assert_mats_eq(&a.to_dense(), &d);
}

/// Two sparse 3×3 arrays with disjoint single nonzeros: the sum keeps sparse
/// layout, the estimated upper bound is 2, and a subsequent exact count
/// narrows both bounds to 2.
#[test]
fn disjoint_sparse_sum_bounds() {
    let a_csr = CsrMatrix::from_csr(3, 3, vec![0, 1, 1, 1], vec![0], vec![1.0]);
    let b_csr = CsrMatrix::from_csr(3, 3, vec![0, 0, 1, 1], vec![2], vec![2.0]);
    let mut a = AdaptiveArray::from_sparse(a_csr);
    let mut b = AdaptiveArray::from_sparse(b_csr);
    let mut sum = a.add_array(&mut b).unwrap();
    assert!(sum.is_sparse());
    assert_eq!(sum.bounds().upper, Some(2));
    assert_eq!(sum.bounds().lower, Some(0));
    sum.count_nonzeros();
    assert_eq!(sum.bounds(), NzBounds::exact(2));
    let d = sum.to_dense();
    assert_eq!(d[(0, 0)], 1.0);
    assert_eq!(d[(1, 2)], 2.0);
}

/// The sum's value is the elementwise sum for every layout pairing, and the
/// estimated upper bound never exceeds the sum of the operands' bounds.
#[test]
fn add_array_all_layout_pairs() {
    let dense_grid = random_grid(6, 6, 0.9);
    let sparse_grid = random_grid(6, 6, 0.1);
    let mut expected = Mat::<f64>::zeros(6, 6);
    let cases: [(Mat<f64>, Mat<f64>); 4] = [
        (dense_grid.clone(), dense_grid.clone()),
        (sparse_grid.clone(), sparse_grid.clone()),
        (dense_grid.clone(), sparse_grid.clone()),
        (sparse_grid.clone(), dense_grid.clone()),
    ];
    for (left, right) in cases {
        for i in 0..6 {
            for j in 0..6 {
                expected[(i, j)] = left[(i, j)] + right[(i, j)];
            }
        }
        let mut a = AdaptiveArray::from_dense(left);
        let mut b = AdaptiveArray::from_dense(right);
        let sum = a.add_array(&mut b).unwrap();
        assert_mats_eq(&sum.to_dense(), &expected);
        let (ua, ub, us) = (
            a.bounds().upper.unwrap(),
            b.bounds().upper.unwrap(),
            sum.bounds().upper.unwrap(),
        );
        assert!(us <= ua + ub);
        assert!(us <= 36);
    }
}

/// Subtraction mirrors addition: correct values for every pairing, same
/// bound estimates.
#[test]
fn sub_array_matches_dense_reference() {
    let left = random_grid(5, 5, 0.8);
    let right = random_grid(5, 5, 0.15);
    let mut a = AdaptiveArray::from_dense(left.clone());
    let mut b = AdaptiveArray::from_dense(right.clone());
    let diff = a.sub_array(&mut b).unwrap();
    let dd = diff.to_dense();
    for i in 0..5 {
        for j in 0..5 {
            assert_abs_diff_eq!(dd[(i, j)], left[(i, j)] - right[(i, j)], epsilon = 1e-12);
        }
    }
    let est = a.bounds().add_estimate(&b.bounds(), 25);
    assert_eq!(diff.bounds(), est);
}

/// The loose lower bound is the absolute difference of the operands' lower
/// bounds.
#[test]
fn add_array_lower_bound_is_abs_diff() {
    let mut a = AdaptiveArray::from_dense(random_grid(4, 4, 0.9));
    let mut b = AdaptiveArray::from_dense(random_grid(4, 4, 0.05));
    a.count_nonzeros();
    b.count_nonzeros();
    let la = a.bounds().lower.unwrap();
    let lb = b.bounds().lower.unwrap();
    let sum = a.add_array(&mut b).unwrap();
    assert_eq!(sum.bounds().lower, Some(la.abs_diff(lb)));
}

/// Adding a scalar to a nearly-empty sparse matrix densifies: every entry of
/// the result is the scalar or the scalar plus the original entry.
#[test]
fn scalar_add_densifies_sparse() {
    let csr = CsrMatrix::from_csr(3, 3, vec![0, 0, 1, 1], vec![1], vec![2.0]);
    let mut a = AdaptiveArray::from_sparse(csr);
    let shifted = a.add_scalar(5.0);
    assert!(shifted.is_dense());
    assert_eq!(shifted.bounds(), NzBounds::unknown());
    let d = shifted.to_dense();
    for i in 0..3 {
        for j in 0..3 {
            let expected = if (i, j) == (1, 1) { 7.0 } else { 5.0 };
            assert_eq!(d[(i, j)], expected);
        }
    }
}

/// Scaling carries bounds over for nonzero factors and pins them to zero
/// when a dense grid is scaled by zero.
#[test]
fn mul_scalar_bound_propagation() {
    let mut a = AdaptiveArray::from_dense(random_grid(4, 4, 0.9));
    a.count_nonzeros();
    let bounds = a.bounds();
    let scaled = a.mul_scalar(2.0);
    assert_eq!(scaled.bounds(), bounds);
    let orig = a.to_dense();
    let sd = scaled.to_dense();
    for i in 0..4 {
        for j in 0..4 {
            assert_abs_diff_eq!(sd[(i, j)], orig[(i, j)] * 2.0, epsilon = 1e-12);
        }
    }

    let zeroed = a.mul_scalar(0.0);
    assert_eq!(zeroed.bounds(), NzBounds::exact(0));
    assert_eq!(zeroed.to_dense().nnz(), 0);
}

/// Matrix product is correct for every layout pairing; result bounds are
/// unknown.
#[test]
fn matmul_all_layout_pairs() {
    let dense_grid = random_grid(4, 5, 0.9);
    let sparse_grid = random_grid(5, 3, 0.1);
    let mut a = AdaptiveArray::from_dense(dense_grid.clone());
    let mut b = AdaptiveArray::from_dense(sparse_grid.clone());
    let prod = a.matmul(&mut b).unwrap();
    assert_eq!(prod.shape(), (4, 3));
    assert_eq!(prod.bounds(), NzBounds::unknown());
    let d = prod.to_dense();
    for i in 0..4 {
        for j in 0..3 {
            let expected = (0..5).map(|k| dense_grid[(i, k)] * sparse_grid[(k, j)]).sum::<f64>();
            assert_abs_diff_eq!(d[(i, j)], expected, epsilon = 1e-12);
        }
    }

    // sparse × sparse stays sparse when both operands sit below the crossover
    let left = random_grid(6, 6, 0.05);
    let right = random_grid(6, 6, 0.05);
    let mut sa = AdaptiveArray::from_sparse(left.to_csr());
    let mut sb = AdaptiveArray::from_sparse(right.to_csr());
    let sp = sa.matmul(&mut sb).unwrap();
    assert!(sp.is_sparse());
    let sd = sp.to_dense();
    for i in 0..6 {
        for j in 0..6 {
            let expected = (0..6).map(|k| left[(i, k)] * right[(k, j)]).sum::<f64>();
            assert_abs_diff_eq!(sd[(i, j)], expected, epsilon = 1e-12);
        }
    }
}

/// Mismatched shapes are rejected before any kernel runs.
#[test]
fn shape_mismatch_is_reported() {
    let mut a = AdaptiveArray::from_dense(random_grid(2, 2, 0.5));
    let mut b = AdaptiveArray::from_dense(random_grid(2, 3, 0.5));
    assert!(matches!(
        a.add_array(&mut b),
        Err(AdaptError::ShapeMismatch { .. })
    ));
    assert!(matches!(
        a.sub_array(&mut b),
        Err(AdaptError::ShapeMismatch { .. })
    ));
    let mut c = AdaptiveArray::from_dense(random_grid(3, 2, 0.5));
    assert!(matches!(
        a.matmul(&mut c),
        Err(AdaptError::ShapeMismatch { .. })
    ));
}

/// Ragged nested rows cannot form a rectangular grid.
#[test]
fn ragged_rows_are_rejected() {
    let err = AdaptiveArray::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
    assert!(matches!(err, AdaptError::Conversion(_)));

    let ok = AdaptiveArray::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    assert_eq!(ok.shape(), (2, 2));
    assert!(ok.is_dense());
    assert_eq!(ok.bounds(), NzBounds::unknown());
    assert_eq!(ok.to_dense()[(1, 0)], 3.0);
}

/// Accessors report shape, size, and the host element type.
#[test]
fn accessors() {
    let a = AdaptiveArray::from_dense(random_grid(3, 4, 0.5));
    assert_eq!(a.shape(), (3, 4));
    assert_eq!(a.size(), 12);
    assert!(a.element_type().contains("f64"));
}

/// The container dispatches matvec on whichever layout it currently holds.
#[test]
fn matvec_dispatches_on_layout() {
    let grid = random_grid(5, 5, 0.2);
    let mut rng = rand::thread_rng();
    let x: Vec<f64> = (0..5).map(|_| rng.r#gen()).collect();
    let mut expected = vec![0.0; 5];
    grid.matvec(&x, &mut expected);

    let mut a = AdaptiveArray::from_dense(grid);
    let mut y = vec![0.0; 5];
    a.matvec(&x, &mut y);
    for i in 0..5 {
        assert_abs_diff_eq!(y[i], expected[i], epsilon = 1e-12);
    }

    a.sparsify();
    let mut y_sparse = vec![0.0; 5];
    a.matvec(&x, &mut y_sparse);
    for i in 0..5 {
        assert_abs_diff_eq!(y_sparse[i], expected[i], epsilon = 1e-12);
    }
}

/// A custom crossover moves the conversion decision.
#[test]
fn custom_threshold_is_honored() {
    // 2×2 with 3 nonzeros: fraction 0.75, far above the default crossover
    let d = mat_from_rows(2, 2, vec![1.0, 2.0, 3.0, 0.0]);
    let mut default_opts = AdaptiveArray::from_dense(d.clone());
    default_opts.adapt();
    assert!(default_opts.is_dense());

    let mut permissive = AdaptiveArray::from_dense(d).with_options(AdaptOptions {
        threshold_density: 1.0,
    });
    permissive.adapt();
    assert!(permissive.is_sparse());
}
