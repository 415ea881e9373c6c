use std::collections::VecDeque;

/// Distance of a vertex the BFS never reached.
pub const UNVISITED: i32 = -1;

/// Aggregates of one BFS pass, used for the per-pivot mean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BfsSummary {
    /// Sum of hop distances over reached vertices.
    pub sum: i64,
    pub reached: usize,
    /// Largest hop distance reached.
    pub max: i32,
}

/// Single-source hop distances from `start`.
///
/// `dist` is overwritten: reached vertices get their hop count, the rest get [`UNVISITED`]. When
/// `nearest` is given, each reached vertex's entry is lowered to its distance from `start`, so it
/// tracks the distance to the closest source seen so far.
pub fn hop_distances(
    adjacency: &[Vec<usize>],
    start: usize,
    dist: &mut [i32],
    queue: &mut VecDeque<usize>,
    mut nearest: Option<&mut [i32]>,
) -> BfsSummary {
    dist.fill(UNVISITED);
    queue.clear();

    let mut summary = BfsSummary::default();
    dist[start] = 0;
    queue.push_back(start);

    while let Some(v) = queue.pop_front() {
        let d = dist[v];
        summary.sum += i64::from(d);
        summary.reached += 1;
        summary.max = summary.max.max(d);
        if let Some(nearest) = nearest.as_deref_mut() {
            if d < nearest[v] {
                nearest[v] = d;
            }
        }

        for &u in &adjacency[v] {
            if dist[u] == UNVISITED {
                dist[u] = d.saturating_add(1);
                queue.push_back(u);
            }
        }
    }

    summary
}
