use crate::VertexId;
use crate::error::{Error, Result};
use crate::store::{GraphRead, GraphWrite, Position};
use rustc_hash::FxBuildHasher;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

#[derive(Debug, Clone)]
struct VertexSlot {
    label: Option<String>,
    // Index into `MemoryGraph::order`.
    order: usize,
    neighbors: Vec<VertexId>,
    position: Position,
}

/// In-memory graph with sparse vertex identifiers.
///
/// Identifiers are slot indices. Removing a vertex frees its slot, leaving a hole in the
/// identifier space until a later [`add_vertex`](MemoryGraph::add_vertex) reuses it, so
/// [`vertex_capacity`](GraphRead::vertex_capacity) can exceed
/// [`vertex_count`](GraphRead::vertex_count).
///
/// Edges are directed for bookkeeping, but both endpoints list each other as neighbors.
#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    slots: Vec<Option<VertexSlot>>,
    order: Vec<VertexId>,
    free: Vec<VertexId>,
    label_index: HashMap<String, VertexId>,
    edges: Vec<(VertexId, VertexId)>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// A graph with `n` unlabeled vertices `0..n` and no edges.
    pub fn with_vertices(n: usize) -> Self {
        let mut g = Self::new();
        for _ in 0..n {
            g.add_vertex();
        }
        g
    }

    pub fn add_vertex(&mut self) -> VertexId {
        self.insert_slot(None)
    }

    pub fn add_labeled_vertex(&mut self, label: impl Into<String>) -> Result<VertexId> {
        let label = label.into();
        if self.label_index.contains_key(&label) {
            return Err(Error::DuplicateVertex { label });
        }
        let id = self.insert_slot(Some(label.clone()));
        self.label_index.insert(label, id);
        Ok(id)
    }

    fn insert_slot(&mut self, label: Option<String>) -> VertexId {
        let slot = VertexSlot {
            label,
            order: self.order.len(),
            neighbors: Vec::new(),
            position: Position::default(),
        };
        let id = match self.free.pop() {
            Some(id) => {
                self.slots[id as usize] = Some(slot);
                id
            }
            None => {
                self.slots.push(Some(slot));
                (self.slots.len() - 1) as VertexId
            }
        };
        self.order.push(id);
        id
    }

    /// Removes `v` and every edge incident to it.
    ///
    /// The last vertex in enumeration order takes the removed vertex's position.
    pub fn remove_vertex(&mut self, v: VertexId) -> Result<()> {
        let slot = self
            .slots
            .get_mut(v as usize)
            .and_then(Option::take)
            .ok_or(Error::UnknownVertex { id: v })?;

        self.order.swap_remove(slot.order);
        if let Some(&moved) = self.order.get(slot.order) {
            if let Some(moved_slot) = self.slots[moved as usize].as_mut() {
                moved_slot.order = slot.order;
            }
        }

        for &n in &slot.neighbors {
            if let Some(other) = self.slots[n as usize].as_mut() {
                other.neighbors.retain(|&w| w != v);
            }
        }
        self.edges.retain(|&(a, b)| a != v && b != v);
        if let Some(label) = slot.label {
            self.label_index.remove(&label);
        }
        self.free.push(v);
        Ok(())
    }

    pub fn contains(&self, v: VertexId) -> bool {
        matches!(self.slots.get(v as usize), Some(Some(_)))
    }

    pub fn label(&self, v: VertexId) -> Option<&str> {
        self.slots
            .get(v as usize)
            .and_then(Option::as_ref)
            .and_then(|s| s.label.as_deref())
    }

    pub fn vertex_by_label(&self, label: &str) -> Option<VertexId> {
        self.label_index.get(label).copied()
    }

    pub fn add_edge(&mut self, source: VertexId, target: VertexId) -> Result<()> {
        for id in [source, target] {
            if !self.contains(id) {
                return Err(Error::UnknownVertex { id });
            }
        }
        self.edges.push((source, target));
        self.live_mut(source).neighbors.push(target);
        if source != target {
            self.live_mut(target).neighbors.push(source);
        }
        Ok(())
    }

    /// Adds edges `path[0] -> path[1] -> ... -> path[n - 1]`.
    pub fn set_path(&mut self, path: &[VertexId]) -> Result<()> {
        for w in path.windows(2) {
            self.add_edge(w[0], w[1])?;
        }
        Ok(())
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.edges.iter().copied()
    }

    pub fn set_position(&mut self, v: VertexId, position: Position) -> Result<()> {
        let slot = self
            .slots
            .get_mut(v as usize)
            .and_then(Option::as_mut)
            .ok_or(Error::UnknownVertex { id: v })?;
        slot.position = position;
        Ok(())
    }

    fn live(&self, v: VertexId) -> &VertexSlot {
        match self.slots.get(v as usize) {
            Some(Some(slot)) => slot,
            _ => panic!("vertex {v} does not exist"),
        }
    }

    fn live_mut(&mut self, v: VertexId) -> &mut VertexSlot {
        match self.slots.get_mut(v as usize) {
            Some(Some(slot)) => slot,
            _ => panic!("vertex {v} does not exist"),
        }
    }
}

impl GraphRead for MemoryGraph {
    fn vertex_count(&self) -> usize {
        self.order.len()
    }

    fn vertex_capacity(&self) -> usize {
        self.slots.len()
    }

    fn vertex_at(&self, position: usize) -> VertexId {
        self.order[position]
    }

    fn neighbor_count(&self, v: VertexId) -> usize {
        self.live(v).neighbors.len()
    }

    fn neighbor_at(&self, v: VertexId, position: usize) -> VertexId {
        self.live(v).neighbors[position]
    }

    fn position(&self, v: VertexId) -> Position {
        self.live(v).position
    }
}

impl GraphWrite for MemoryGraph {
    fn set_x(&mut self, v: VertexId, value: f64) {
        self.live_mut(v).position.x = value;
    }

    fn set_y(&mut self, v: VertexId, value: f64) {
        self.live_mut(v).position.y = value;
    }

    fn set_z(&mut self, v: VertexId, value: f64) {
        self.live_mut(v).position.z = value;
    }
}
