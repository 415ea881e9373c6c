use crate::error::{Error, Result};
use hde_graph::{GraphRead, VertexId};

const NO_INDEX: usize = usize::MAX;

/// Dense index space for one layout invocation.
///
/// Vertex `i` of the arena is the vertex at enumeration position `i` in the store. All pivot,
/// distance, and matrix work happens on these indices; external ids come back only when results
/// are written.
#[derive(Debug, Clone)]
pub struct VertexArena {
    ids: Vec<VertexId>,
    adjacency: Vec<Vec<usize>>,
}

impl VertexArena {
    pub fn from_graph<G: GraphRead>(graph: &G) -> Result<Self> {
        let n = graph.vertex_count();
        let capacity = graph.vertex_capacity();

        let mut ids: Vec<VertexId> = Vec::with_capacity(n);
        let mut index_of: Vec<usize> = vec![NO_INDEX; capacity];
        for position in 0..n {
            let id = graph.vertex_at(position);
            let slot = index_of
                .get_mut(id as usize)
                .ok_or(Error::UnknownVertex { id })?;
            *slot = position;
            ids.push(id);
        }

        let mut adjacency: Vec<Vec<usize>> = Vec::with_capacity(n);
        for &id in &ids {
            let count = graph.neighbor_count(id);
            let mut neigh: Vec<usize> = Vec::with_capacity(count);
            for p in 0..count {
                let w = graph.neighbor_at(id, p);
                match index_of.get(w as usize) {
                    Some(&idx) if idx != NO_INDEX => neigh.push(idx),
                    _ => return Err(Error::UnknownVertex { id: w }),
                }
            }
            adjacency.push(neigh);
        }

        Ok(Self { ids, adjacency })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn id(&self, index: usize) -> VertexId {
        self.ids[index]
    }

    pub fn ids(&self) -> &[VertexId] {
        &self.ids
    }

    pub fn adjacency(&self) -> &[Vec<usize>] {
        &self.adjacency
    }
}
