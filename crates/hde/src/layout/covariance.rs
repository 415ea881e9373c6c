use nalgebra::DMatrix;

/// `S = X Xᵀ / N` for an `M x N` embedding.
///
/// Each entry is accumulated in vertex order and written to both `(r, c)` and `(c, r)`, so the
/// result is exactly symmetric.
pub fn covariance(x: &DMatrix<f64>) -> DMatrix<f64> {
    let (m, n) = x.shape();
    let mut s = DMatrix::<f64>::zeros(m, m);
    if n == 0 {
        return s;
    }

    let n = n as f64;
    for r in 0..m {
        for c in r..m {
            let mut acc = 0.0;
            for (a, b) in x.row(r).iter().zip(x.row(c).iter()) {
                acc += a * b;
            }
            let v = acc / n;
            s[(r, c)] = v;
            s[(c, r)] = v;
        }
    }
    s
}
