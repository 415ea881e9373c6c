#![forbid(unsafe_code)]

//! Headless high-dimensional embedding (HDE) graph layout.
//!
//! Every vertex is embedded in a pivot space (one axis per pivot, the coordinate being the hop
//! distance to that pivot), and the embedding is projected onto its principal components to get
//! 2D or 3D coordinates. Pivots are chosen with a farthest-point heuristic, and the principal
//! components come from power iteration with deflation on the embedding's covariance matrix.
//!
//! The engine reads and writes graphs through the [`hde_graph::GraphRead`] /
//! [`hde_graph::GraphWrite`] traits.

pub mod arena;
pub mod cancel;
pub mod error;
pub mod layout;
pub mod options;

pub use cancel::{Cancellation, NeverCancel};
pub use error::{Error, Result};
pub use layout::{Layout, compute_layout};
pub use options::{ArrangeOptions, Dimensions, UnreachedPolicy};

use hde_graph::GraphWrite;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Lays out `graph` and writes the resulting positions into it.
///
/// The eigenvector start vectors are seeded from `opts.random_seed`, or from OS entropy when it
/// is `None`.
pub fn arrange<G: GraphWrite>(graph: &mut G, opts: &ArrangeOptions) -> Result<()> {
    let mut rng = match opts.random_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    arrange_with(graph, opts, &mut rng, &NeverCancel)
}

/// [`arrange`] with an explicit random source and cancellation token.
///
/// Positions are written only after the whole computation has succeeded, so a cancelled or
/// failed run leaves `graph` untouched.
pub fn arrange_with<G, R, C>(
    graph: &mut G,
    opts: &ArrangeOptions,
    rng: &mut R,
    cancel: &C,
) -> Result<()>
where
    G: GraphWrite,
    R: Rng + ?Sized,
    C: Cancellation + ?Sized,
{
    let layout = compute_layout(&*graph, opts, rng, cancel)?;
    layout.apply(graph);
    tracing::debug!(
        vertices = layout.positions.len(),
        dimensions = opts.dimensions.count(),
        "hde arranged graph"
    );
    Ok(())
}
