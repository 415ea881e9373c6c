use super::bfs::{self, BfsSummary};
use std::collections::VecDeque;

/// Nearest-pivot distance of a vertex no pivot has reached yet.
pub const UNREACHED: i32 = i32::MAX;

/// One pivot and the hop distances its BFS produced.
#[derive(Debug)]
pub struct PivotStep<'a> {
    pub pivot: usize,
    pub distances: &'a [i32],
    pub summary: BfsSummary,
}

/// Farthest-point pivot selection over a dense adjacency.
///
/// The first pivot is vertex `0` (the first vertex in enumeration order). Each later pivot is the
/// non-pivot vertex with the largest distance to its nearest pivot, scanning in index order and
/// keeping the first maximum. Vertices no pivot has reached count as infinitely far away, so every
/// connected component eventually receives a pivot.
#[derive(Debug)]
pub struct PivotSelector<'a> {
    adjacency: &'a [Vec<usize>],
    nearest: Vec<i32>,
    is_pivot: Vec<bool>,
    pivots: Vec<usize>,
    dist: Vec<i32>,
    queue: VecDeque<usize>,
}

impl<'a> PivotSelector<'a> {
    pub fn new(adjacency: &'a [Vec<usize>]) -> Self {
        let n = adjacency.len();
        Self {
            adjacency,
            nearest: vec![UNREACHED; n],
            is_pivot: vec![false; n],
            pivots: Vec::new(),
            dist: vec![bfs::UNVISITED; n],
            queue: VecDeque::with_capacity(n),
        }
    }

    /// The vertex [`advance`](Self::advance) would pick next, or `None` once every vertex is a
    /// pivot.
    pub fn next_pivot(&self) -> Option<usize> {
        if self.pivots.is_empty() {
            return (!self.adjacency.is_empty()).then_some(0);
        }

        let mut best: Option<usize> = None;
        let mut best_dist = -1;
        for (v, &d) in self.nearest.iter().enumerate() {
            if self.is_pivot[v] {
                continue;
            }
            if d > best_dist {
                best_dist = d;
                best = Some(v);
            }
        }
        best
    }

    /// Selects the next pivot and runs its BFS, lowering the nearest-pivot table.
    pub fn advance(&mut self) -> Option<PivotStep<'_>> {
        let pivot = self.next_pivot()?;
        self.is_pivot[pivot] = true;
        self.pivots.push(pivot);

        let summary = bfs::hop_distances(
            self.adjacency,
            pivot,
            &mut self.dist,
            &mut self.queue,
            Some(&mut self.nearest),
        );
        tracing::trace!(
            pivot,
            reached = summary.reached,
            eccentricity = summary.max,
            "hde pivot"
        );

        Some(PivotStep {
            pivot,
            distances: &self.dist,
            summary,
        })
    }

    pub fn pivots(&self) -> &[usize] {
        &self.pivots
    }

    /// Distance from every vertex to its nearest pivot so far ([`UNREACHED`] if none reaches it).
    pub fn nearest(&self) -> &[i32] {
        &self.nearest
    }
}
