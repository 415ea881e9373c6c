use crate::arena::VertexArena;
use crate::options::Dimensions;
use hde_graph::{GraphRead, GraphWrite, Position, VertexId};
use indexmap::IndexMap;
use nalgebra::DMatrix;

/// Final coordinates of one layout run, keyed by external vertex id in enumeration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub dimensions: Dimensions,
    pub positions: IndexMap<VertexId, Position>,
    /// Pivot vertices in selection order.
    pub pivots: Vec<VertexId>,
    /// Output axes that could not be resolved and were left at zero.
    pub degenerate_axes: Vec<usize>,
}

impl Layout {
    /// Writes x and y (and z for three dimensions) for every vertex. With two dimensions the z
    /// attribute is never touched.
    pub fn apply<G: GraphWrite + ?Sized>(&self, graph: &mut G) {
        for (&v, p) in &self.positions {
            graph.set_x(v, p.x);
            graph.set_y(v, p.y);
            if self.dimensions == Dimensions::Three {
                graph.set_z(v, p.z);
            }
        }
    }

    /// Mean of the positions along each axis.
    pub fn mean(&self) -> Position {
        mean_of(self.positions.values().copied())
    }

    /// Shifts every position by `offset` on the axes this layout writes.
    pub fn translate(&mut self, offset: Position) {
        let with_z = self.dimensions == Dimensions::Three;
        for p in self.positions.values_mut() {
            p.x += offset.x;
            p.y += offset.y;
            if with_z {
                p.z += offset.z;
            }
        }
    }
}

/// `scale * U X`: a `K x N` matrix of output coordinates.
pub fn project(x: &DMatrix<f64>, u: &DMatrix<f64>, scale: f64) -> DMatrix<f64> {
    (u * x) * scale
}

pub(crate) fn to_layout(
    arena: &VertexArena,
    coords: &DMatrix<f64>,
    dimensions: Dimensions,
    pivots: &[usize],
    degenerate_axes: Vec<usize>,
) -> Layout {
    let axis = |c: usize, v: usize| if c < coords.nrows() { coords[(c, v)] } else { 0.0 };
    let positions = (0..arena.len())
        .map(|v| {
            let z = if dimensions == Dimensions::Three {
                axis(2, v)
            } else {
                0.0
            };
            (arena.id(v), Position::new(axis(0, v), axis(1, v), z))
        })
        .collect();

    Layout {
        dimensions,
        positions,
        pivots: pivots.iter().map(|&p| arena.id(p)).collect(),
        degenerate_axes,
    }
}

/// Mean position of every vertex currently in `graph`.
pub(crate) fn graph_mean<G: GraphRead>(graph: &G) -> Position {
    mean_of(graph.vertices().map(|v| graph.position(v)))
}

fn mean_of(positions: impl Iterator<Item = Position>) -> Position {
    let mut sum = Position::default();
    let mut n = 0usize;
    for p in positions {
        sum.x += p.x;
        sum.y += p.y;
        sum.z += p.z;
        n += 1;
    }
    if n == 0 {
        return sum;
    }
    let n = n as f64;
    Position::new(sum.x / n, sum.y / n, sum.z / n)
}
