use super::bfs::UNVISITED;
use super::pivots::PivotSelector;
use crate::cancel::{Cancellation, checkpoint};
use crate::error::Result;
use crate::options::UnreachedPolicy;
use nalgebra::DMatrix;

/// Pivot-distance embedding of a graph.
#[derive(Debug, Clone)]
pub struct Embedding {
    /// Pivot vertices (dense indices), one per row of `x`.
    pub pivots: Vec<usize>,
    /// `pivots.len()` x `vertex_count` matrix of row-centered hop distances.
    pub x: DMatrix<f64>,
    /// Mean subtracted from each row.
    pub means: Vec<f64>,
    /// Number of (pivot, vertex) pairs with no path between them.
    pub unreached: usize,
}

/// Runs `pivot_count` BFS passes and assembles the centered embedding matrix.
///
/// `pivot_count` must not exceed the vertex count.
pub fn build<C: Cancellation + ?Sized>(
    adjacency: &[Vec<usize>],
    pivot_count: usize,
    policy: UnreachedPolicy,
    cancel: &C,
) -> Result<Embedding> {
    let n = adjacency.len();
    debug_assert!(pivot_count <= n);

    let mut selector = PivotSelector::new(adjacency);
    let mut x = DMatrix::<f64>::zeros(pivot_count, n);
    let mut means: Vec<f64> = Vec::with_capacity(pivot_count);
    let mut unreached = 0usize;

    for row in 0..pivot_count {
        checkpoint(cancel)?;
        let Some(step) = selector.advance() else {
            break;
        };
        let missing = n - step.summary.reached;
        unreached += missing;

        let mean = match policy {
            UnreachedPolicy::Sentinel => {
                let mean = step.summary.sum as f64 / n as f64;
                for (v, &d) in step.distances.iter().enumerate() {
                    x[(row, v)] = f64::from(d) - mean;
                }
                mean
            }
            UnreachedPolicy::Clamp => {
                let far = step.summary.max + 1;
                let sum = step.summary.sum + i64::from(far) * missing as i64;
                let mean = sum as f64 / n as f64;
                for (v, &d) in step.distances.iter().enumerate() {
                    let d = if d == UNVISITED { far } else { d };
                    x[(row, v)] = f64::from(d) - mean;
                }
                mean
            }
            UnreachedPolicy::Exclude => {
                let mean = step.summary.sum as f64 / step.summary.reached as f64;
                for (v, &d) in step.distances.iter().enumerate() {
                    x[(row, v)] = if d == UNVISITED {
                        0.0
                    } else {
                        f64::from(d) - mean
                    };
                }
                mean
            }
        };
        means.push(mean);
    }

    let pivots = selector.pivots().to_vec();
    Ok(Embedding {
        pivots,
        x,
        means,
        unreached,
    })
}
