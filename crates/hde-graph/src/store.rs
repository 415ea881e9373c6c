use crate::VertexId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Read side of a graph store.
///
/// Vertices are enumerated by position (`0..vertex_count()`), and that order must be stable for
/// as long as the caller holds the graph. Identifiers returned by the store are always smaller
/// than [`vertex_capacity`](GraphRead::vertex_capacity), so callers may size id-indexed tables by
/// it.
///
/// Neighbor lookups are undirected: an edge `a -> b` makes `b` a neighbor of `a` and `a` a
/// neighbor of `b`.
pub trait GraphRead {
    fn vertex_count(&self) -> usize;

    /// Upper bound (exclusive) on vertex identifiers currently in use.
    fn vertex_capacity(&self) -> usize;

    /// Identifier of the vertex at enumeration `position`.
    ///
    /// Panics if `position >= vertex_count()`.
    fn vertex_at(&self, position: usize) -> VertexId;

    /// Panics if `v` is not a vertex of this graph.
    fn neighbor_count(&self, v: VertexId) -> usize;

    /// Panics if `v` is not a vertex of this graph or `position >= neighbor_count(v)`.
    fn neighbor_at(&self, v: VertexId, position: usize) -> VertexId;

    /// Panics if `v` is not a vertex of this graph.
    fn position(&self, v: VertexId) -> Position;

    fn vertices(&self) -> impl Iterator<Item = VertexId> + '_
    where
        Self: Sized,
    {
        (0..self.vertex_count()).map(move |p| self.vertex_at(p))
    }

    fn neighbors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_
    where
        Self: Sized,
    {
        (0..self.neighbor_count(v)).map(move |p| self.neighbor_at(v, p))
    }
}

/// Write side of a graph store: the position attributes a layout updates.
pub trait GraphWrite: GraphRead {
    fn set_x(&mut self, v: VertexId, value: f64);
    fn set_y(&mut self, v: VertexId, value: f64);
    fn set_z(&mut self, v: VertexId, value: f64);
}
