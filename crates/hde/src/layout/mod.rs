use crate::arena::VertexArena;
use crate::cancel::{Cancellation, checkpoint};
use crate::error::{Error, Result};
use crate::options::ArrangeOptions;
use hde_graph::GraphRead;
use rand::Rng;

pub mod bfs;
pub mod covariance;
pub mod eigen;
pub mod embedding;
pub mod pivots;
pub mod project;

pub use project::Layout;

#[derive(Debug, Default, Clone)]
struct HdeLayoutTimings {
    total: std::time::Duration,
    arena: std::time::Duration,
    embedding: std::time::Duration,
    covariance: std::time::Duration,
    eigen: std::time::Duration,
    project: std::time::Duration,
}

/// Runs the full pipeline against a read-only snapshot of `graph` and returns the coordinates
/// without writing them.
pub fn compute_layout<G, R, C>(
    graph: &G,
    opts: &ArrangeOptions,
    rng: &mut R,
    cancel: &C,
) -> Result<Layout>
where
    G: GraphRead,
    R: Rng + ?Sized,
    C: Cancellation + ?Sized,
{
    opts.validate()?;
    if graph.vertex_count() == 0 {
        return Err(Error::EmptyGraph);
    }
    checkpoint(cancel)?;

    let timing_enabled = std::env::var("HDE_TIMING").ok().as_deref() == Some("1");
    let mut timings = HdeLayoutTimings::default();
    let total_start = timing_enabled.then(std::time::Instant::now);

    let arena_start = timing_enabled.then(std::time::Instant::now);
    let arena = VertexArena::from_graph(graph)?;
    if let Some(s) = arena_start {
        timings.arena = s.elapsed();
    }

    let n = arena.len();
    let pivot_count = opts.pivot_count.min(n);
    if pivot_count < opts.pivot_count {
        tracing::debug!(
            requested = opts.pivot_count,
            pivot_count,
            "hde pivot count clamped to vertex count"
        );
    }

    let embedding_start = timing_enabled.then(std::time::Instant::now);
    let embedding = embedding::build(arena.adjacency(), pivot_count, opts.unreached, cancel)?;
    if let Some(s) = embedding_start {
        timings.embedding = s.elapsed();
    }
    if embedding.unreached > 0 {
        tracing::debug!(
            unreached = embedding.unreached,
            policy = ?opts.unreached,
            "hde graph is disconnected"
        );
    }

    let covariance_start = timing_enabled.then(std::time::Instant::now);
    let s = covariance::covariance(&embedding.x);
    if let Some(st) = covariance_start {
        timings.covariance = st.elapsed();
    }

    let eigen_start = timing_enabled.then(std::time::Instant::now);
    let solver = eigen::PowerIteration {
        epsilon: opts.epsilon,
        max_iterations: opts.max_iterations,
    };
    let basis = solver.solve(&s, opts.dimensions.count(), rng, cancel)?;
    if let Some(st) = eigen_start {
        timings.eigen = st.elapsed();
    }
    checkpoint(cancel)?;

    let project_start = timing_enabled.then(std::time::Instant::now);
    let coords = project::project(&embedding.x, &basis.vectors, opts.scale);
    let degenerate_axes: Vec<usize> = basis
        .degenerate
        .iter()
        .enumerate()
        .filter_map(|(axis, &d)| d.then_some(axis))
        .collect();
    let mut layout = project::to_layout(
        &arena,
        &coords,
        opts.dimensions,
        &embedding.pivots,
        degenerate_axes,
    );
    if opts.preserve_mean {
        let before = project::graph_mean(graph);
        let after = layout.mean();
        layout.translate(hde_graph::Position::new(
            before.x - after.x,
            before.y - after.y,
            before.z - after.z,
        ));
    }
    if let Some(s) = project_start {
        timings.project = s.elapsed();
    }

    if let Some(s) = total_start {
        timings.total = s.elapsed();
        tracing::info!(
            total = ?timings.total,
            arena = ?timings.arena,
            embedding = ?timings.embedding,
            covariance = ?timings.covariance,
            eigen = ?timings.eigen,
            project = ?timings.project,
            vertices = n,
            pivots = pivot_count,
            iterations = ?basis.iterations,
            "hde layout timing"
        );
    }

    Ok(layout)
}
