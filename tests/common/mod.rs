//! Common test utilities
#![allow(dead_code)]

/// Install a `tracing` subscriber driven by `RUST_LOG`
///
/// Safe to call from every test; only the first call installs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Max-norm distance between two points
pub fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).fold(0.0, f64::max)
}

/// Sort roots lexicographically
pub fn sorted(mut roots: Vec<Vec<f64>>) -> Vec<Vec<f64>> {
    roots.sort_by(|a, b| {
        a.iter()
            .zip(b)
            .map(|(x, y)| x.total_cmp(y))
            .find(|o| o.is_ne())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    roots
}

/// Every expected root is found and every found root is expected, within `tol`
pub fn assert_roots_match(found: &[Vec<f64>], expected: &[Vec<f64>], tol: f64, msg: &str) {
    for e in expected {
        assert!(
            found.iter().any(|f| distance(f, e) <= tol),
            "{}: expected root {:?} missing from {:?}",
            msg,
            e,
            found
        );
    }
    for f in found {
        assert!(
            expected.iter().any(|e| distance(f, e) <= tol),
            "{}: spurious root {:?}, expected {:?}",
            msg,
            f,
            expected
        );
    }
}
