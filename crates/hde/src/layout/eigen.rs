use crate::cancel::{Cancellation, checkpoint};
use crate::error::Result;
use nalgebra::{DMatrix, DVector};
use rand::Rng;

// Relative to the Frobenius norm of the matrix being iterated.
const DEGENERATE_NORM: f64 = 1e-10;
// Residual of a unit vector after removing its components along accepted axes.
const COLLAPSED_NORM: f64 = 1e-9;

/// Leading eigenvectors of a symmetric matrix.
#[derive(Debug, Clone)]
pub struct EigenBasis {
    /// `K x M`: one unit-length eigenvector per row, pairwise orthogonal. Degenerate axes are
    /// all-zero rows.
    pub vectors: DMatrix<f64>,
    /// Rayleigh quotient of each accepted row (`0` for degenerate axes).
    pub values: Vec<f64>,
    pub degenerate: Vec<bool>,
    /// Power iteration attempts spent on each axis.
    pub iterations: Vec<usize>,
    pub converged: Vec<bool>,
}

/// Power iteration with Gram-Schmidt deflation.
#[derive(Debug, Clone, Copy)]
pub struct PowerIteration {
    pub epsilon: f64,
    pub max_iterations: usize,
}

enum Outcome {
    Accepted {
        vector: DVector<f64>,
        iterations: usize,
        converged: bool,
    },
    Degenerate {
        iterations: usize,
    },
}

impl PowerIteration {
    /// Finds the `k` leading eigenvectors of the symmetric matrix `s`.
    ///
    /// Each axis starts from a vector with entries drawn uniformly from `[0, 1)`. Iteration stops
    /// once consecutive iterates agree (`dot >= 1 - epsilon`) and the agreement has stabilised
    /// (`|dot - previous| <= epsilon`), or after `max_iterations` attempts. An axis whose iterate
    /// collapses to zero (rank-deficient `s`, or `k` larger than the matrix) is left as a zero
    /// row and the remaining axes are still attempted.
    pub fn solve<R, C>(
        &self,
        s: &DMatrix<f64>,
        k: usize,
        rng: &mut R,
        cancel: &C,
    ) -> Result<EigenBasis>
    where
        R: Rng + ?Sized,
        C: Cancellation + ?Sized,
    {
        let m = s.nrows();
        let threshold = DEGENERATE_NORM * s.norm().max(f64::MIN_POSITIVE);

        let mut vectors = DMatrix::<f64>::zeros(k, m);
        let mut values = vec![0.0; k];
        let mut degenerate = vec![false; k];
        let mut iterations = vec![0usize; k];
        let mut converged = vec![false; k];
        let mut accepted: Vec<DVector<f64>> = Vec::with_capacity(k);

        for axis in 0..k {
            checkpoint(cancel)?;
            let start = DVector::<f64>::from_fn(m, |_, _| rng.r#gen::<f64>());

            match self.iterate(s, start, &accepted, threshold) {
                Outcome::Accepted {
                    vector,
                    iterations: spent,
                    converged: ok,
                } => {
                    if !ok {
                        tracing::debug!(
                            axis,
                            attempts = spent,
                            "hde power iteration hit its iteration budget"
                        );
                    }
                    values[axis] = vector.dot(&(s * &vector));
                    vectors.set_row(axis, &vector.transpose());
                    iterations[axis] = spent;
                    converged[axis] = ok;
                    accepted.push(vector);
                }
                Outcome::Degenerate { iterations: spent } => {
                    tracing::warn!(axis, "hde eigen axis is degenerate; coordinates left at zero");
                    degenerate[axis] = true;
                    iterations[axis] = spent;
                }
            }
        }

        Ok(EigenBasis {
            vectors,
            values,
            degenerate,
            iterations,
            converged,
        })
    }

    fn iterate(
        &self,
        s: &DMatrix<f64>,
        mut current: DVector<f64>,
        accepted: &[DVector<f64>],
        threshold: f64,
    ) -> Outcome {
        if !normalize(&mut current, 0.0) {
            return Outcome::Degenerate { iterations: 0 };
        }

        let mut previous_dot = 0.0;
        let mut spent = 0;
        let mut converged = false;
        for attempt in 0..self.max_iterations {
            spent = attempt + 1;

            let mut candidate = current.clone();
            if !orthogonalize(&mut candidate, accepted) {
                return Outcome::Degenerate { iterations: spent };
            }
            let mut next = s * &candidate;
            if !normalize(&mut next, threshold) {
                return Outcome::Degenerate { iterations: spent };
            }

            let dot = next.dot(&candidate);
            current = next;
            if dot >= 1.0 - self.epsilon && (dot - previous_dot).abs() <= self.epsilon {
                converged = true;
                break;
            }
            previous_dot = dot;
        }

        // The last multiplication by `s` reintroduces rounding-level components along earlier
        // axes. Two passes keep the basis orthonormal to working precision.
        if !orthogonalize(&mut current, accepted) || !orthogonalize(&mut current, accepted) {
            return Outcome::Degenerate { iterations: spent };
        }
        Outcome::Accepted {
            vector: current,
            iterations: spent,
            converged,
        }
    }
}

/// Removes the components of the unit vector `v` along each unit vector in `basis`,
/// renormalizing after every step. Returns `false` if `v` collapses into the span of `basis`.
fn orthogonalize(v: &mut DVector<f64>, basis: &[DVector<f64>]) -> bool {
    for u in basis {
        let coeff = u.dot(v);
        v.axpy(-coeff, u, 1.0);
        if !normalize(v, COLLAPSED_NORM) {
            return false;
        }
    }
    true
}

fn normalize(v: &mut DVector<f64>, threshold: f64) -> bool {
    let norm = v.norm();
    if norm.is_finite() && norm > threshold.max(1e-12) {
        *v /= norm;
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::NeverCancel;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn solver() -> PowerIteration {
        PowerIteration {
            epsilon: 0.001,
            max_iterations: 1000,
        }
    }

    #[test]
    fn finds_diagonal_eigenvectors_in_order() {
        let s = DMatrix::from_diagonal(&DVector::from_vec(vec![1.0, 9.0, 4.0]));
        let mut rng = StdRng::seed_from_u64(7);
        let basis = solver().solve(&s, 2, &mut rng, &NeverCancel).unwrap();

        assert!(basis.vectors[(0, 1)].abs() > 0.99);
        assert!(basis.vectors[(1, 2)].abs() > 0.99);
        assert!((basis.values[0] - 9.0).abs() < 0.05);
        assert!((basis.values[1] - 4.0).abs() < 0.05);
        assert!(basis.converged.iter().all(|&c| c));
    }

    #[test]
    fn zero_matrix_is_degenerate_on_every_axis() {
        let s = DMatrix::<f64>::zeros(3, 3);
        let mut rng = StdRng::seed_from_u64(1);
        let basis = solver().solve(&s, 3, &mut rng, &NeverCancel).unwrap();
        assert_eq!(basis.degenerate, vec![true; 3]);
        assert_eq!(basis.vectors, DMatrix::zeros(3, 3));
    }

    #[test]
    fn more_axes_than_rows_leaves_the_surplus_zero() {
        let s = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 2.0]);
        let mut rng = StdRng::seed_from_u64(3);
        let basis = solver().solve(&s, 3, &mut rng, &NeverCancel).unwrap();
        assert_eq!(basis.degenerate, vec![false, false, true]);
        assert!(basis.vectors.row(2).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn single_iteration_budget_still_returns_unit_vectors() {
        let s = DMatrix::from_diagonal(&DVector::from_vec(vec![3.0, 2.0, 1.0]));
        let mut rng = StdRng::seed_from_u64(11);
        let basis = PowerIteration {
            epsilon: 0.001,
            max_iterations: 1,
        }
        .solve(&s, 2, &mut rng, &NeverCancel)
        .unwrap();
        assert_eq!(basis.iterations, vec![1, 1]);
        assert_eq!(basis.converged, vec![false, false]);
        for r in 0..2 {
            assert!((basis.vectors.row(r).norm() - 1.0).abs() < 1e-12);
        }
    }
}
